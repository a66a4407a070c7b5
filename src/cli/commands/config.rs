use crate::cli::ConfigCommand;
use pfa_access::config::Config;
use pfa_access::error::Result;

pub fn execute(command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Init => {
            let path = Config::create_sample()?;
            println!("Created sample config file at: {}", path.display());
        }
        ConfigCommand::Path => {
            let config_path = Config::config_file_path()?;
            println!("Config file path: {}", config_path.display());

            if config_path.exists() {
                println!("Status: File exists");

                match Config::load() {
                    Ok(config) => {
                        println!("Valid: Yes");
                        println!("\nSettings:");
                        println!("  Refresh interval: {}s", config.ui.refresh_interval);
                        println!(
                            "  Claims max age: {} minutes",
                            config.session.claims_max_age_minutes
                        );
                        if let Ok(dir) = config.cache_dir() {
                            println!("  Cache dir: {}", dir.display());
                        }
                    }
                    Err(e) => {
                        println!("Valid: No");
                        println!("Error: {}", e);
                    }
                }
            } else {
                println!("Status: File does not exist");
                println!("\nTo create a sample config file, run:");
                println!("  pfa-access config init");
            }
        }
    }

    Ok(())
}
