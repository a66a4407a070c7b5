// CLI interface
pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use pfa_access::error::Result;
use pfa_access::models::Role;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pfa-access")]
#[command(about = "Enrollment access windows and route gating for Physics Fighter Academy", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show remaining access time for an enrollment document
    Status {
        /// Enrollment JSON file
        enrollment: PathBuf,

        /// Output in JSON format for scripting
        #[arg(long)]
        json: bool,
    },

    /// Live countdown for an enrollment, refreshed on a fixed interval
    Watch {
        /// Enrollment JSON file
        enrollment: PathBuf,

        /// Refresh interval in seconds (defaults to config ui.refresh_interval)
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Decide whether the signed-in user may open a path
    Gate {
        /// Path being navigated to, e.g. /admin/payments
        path: String,

        /// Enrollment JSON file checked against the course of a /courses/{id}/learn path
        #[arg(long)]
        enrollment: Option<PathBuf>,

        /// Output in JSON format for scripting
        #[arg(long)]
        json: bool,
    },

    /// Start a session with the given identity and role
    Login {
        /// User id
        #[arg(long)]
        uid: String,

        /// Email address
        #[arg(long)]
        email: String,

        /// Role carried in the claims
        #[arg(long, value_enum)]
        role: Role,

        /// Display name
        #[arg(long)]
        name: Option<String>,

        /// Claims lifetime in minutes
        #[arg(long, default_value_t = 60)]
        ttl_minutes: i64,
    },

    /// End the current session
    Logout,

    /// Show the current session
    Whoami {
        /// Output in JSON format for scripting
        #[arg(long)]
        json: bool,
    },

    /// Read a course document in any stored layout and print the canonical form
    Course {
        /// Course JSON file
        file: PathBuf,

        /// Course id (defaults to the file name)
        #[arg(long)]
        id: Option<String>,

        /// Print a short summary instead of JSON
        #[arg(long)]
        summary: bool,
    },

    /// Manage configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Generate shell completion scripts
    ///
    /// Bash:
    ///   eval "$(pfa-access completions bash)"
    ///
    /// Zsh:
    ///   eval "$(pfa-access completions zsh)"
    ///
    /// Fish:
    ///   pfa-access completions fish > ~/.config/fish/completions/pfa-access.fish
    Completions {
        /// Shell type to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Commands {
    /// Commands that keep redrawing stdout until interrupted
    pub fn is_live(&self) -> bool {
        matches!(self, Commands::Watch { .. })
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Create a sample config file
    Init,
    /// Show config file location and status
    Path,
}

#[derive(Debug, Clone, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

pub async fn execute(args: Cli) -> Result<()> {
    match args.command {
        Commands::Status { enrollment, json } => commands::status::execute(&enrollment, json),
        Commands::Watch {
            enrollment,
            interval,
        } => commands::watch::execute(&enrollment, interval).await,
        Commands::Gate {
            path,
            enrollment,
            json,
        } => commands::gate::execute(&path, enrollment.as_deref(), json),
        Commands::Login {
            uid,
            email,
            role,
            name,
            ttl_minutes,
        } => commands::login::execute(uid, email, role, name, ttl_minutes),
        Commands::Logout => commands::logout::execute(),
        Commands::Whoami { json } => commands::whoami::execute(json),
        Commands::Course { file, id, summary } => commands::course::execute(&file, id, summary),
        Commands::Config { command } => commands::config::execute(command),
        Commands::Completions { shell } => {
            commands::completions::execute(shell);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_login() {
        let cli = Cli::try_parse_from([
            "pfa-access",
            "login",
            "--uid",
            "u1",
            "--email",
            "a@b.c",
            "--role",
            "super-admin",
        ])
        .unwrap();

        match cli.command {
            Commands::Login {
                role, ttl_minutes, ..
            } => {
                assert_eq!(role, Role::SuperAdmin);
                assert_eq!(ttl_minutes, 60);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_watch_is_live() {
        let cli = Cli::try_parse_from(["pfa-access", "watch", "enr.json", "--interval", "5"]).unwrap();
        assert!(cli.command.is_live());

        let cli = Cli::try_parse_from(["pfa-access", "status", "enr.json"]).unwrap();
        assert!(!cli.command.is_live());
    }
}
