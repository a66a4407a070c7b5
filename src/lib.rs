// pfa-access - enrollment access core for Physics Fighter Academy

pub mod access;
pub mod clock;
pub mod config;
pub mod content;
pub mod error;
pub mod expiry;
pub mod models;
pub mod session;
pub mod timestamp;
