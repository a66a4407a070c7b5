use super::read_enrollment;
use pfa_access::access::{can_view_content, ContentAccess};
use pfa_access::clock::{Clock, SystemClock};
use pfa_access::error::Result;
use pfa_access::expiry::{format_time_remaining, time_remaining_at, urgency_tier};
use serde_json::json;
use std::path::Path;

pub fn execute(path: &Path, json: bool) -> Result<()> {
    let enrollment = read_enrollment(path)?;
    let clock = SystemClock;

    let remaining = time_remaining_at(&clock, &enrollment);
    let tier = urgency_tier(&remaining);
    let access = can_view_content(&enrollment, clock.now());

    if json {
        let output = json!({
            "course": enrollment.course_id,
            "status": enrollment.status,
            "remaining": remaining,
            "tier": tier,
            "label": format_time_remaining(&remaining),
            "content": access,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Course:     {}", enrollment.course_label());
        println!("Status:     {}", enrollment.status.as_str());
        println!("Remaining:  {}", format_time_remaining(&remaining));
        println!("Budget:     {:.1}%", remaining.percentage);
        println!("Urgency:    {}", tier.as_str());
        match access {
            ContentAccess::Granted { .. } => println!("Content:    open"),
            ContentAccess::Denied { reason } => println!("Content:    locked ({})", reason.as_str()),
        }
    }

    if remaining.expired {
        std::process::exit(1);
    }

    Ok(())
}
