//! Config validation CLI tool
//!
//! Validates a weekender configuration file and reports any errors.

use std::path::PathBuf;
use std::process::ExitCode;
use weekender_util::default_config_path;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let config_path = match args.get(1) {
        Some(path) => PathBuf::from(path),
        None => {
            let default_path = default_config_path();
            eprintln!("Usage: validate-config [config-file]");
            eprintln!();
            eprintln!("Validates a weekender configuration file.");
            eprintln!();
            eprintln!("If no path is provided, uses: {}", default_path.display());
            return ExitCode::from(2);
        }
    };

    if !config_path.exists() {
        eprintln!("Error: Configuration file not found: {}", config_path.display());
        return ExitCode::from(1);
    }

    match weekender_config::load_config(&config_path) {
        Ok(settings) => {
            println!("✓ Configuration is valid");
            println!();
            println!("Summary:");
            println!("  Config version: {}", weekender_config::CURRENT_CONFIG_VERSION);
            println!("  Nextcloud: {} as {}", settings.nextcloud.server, settings.nextcloud.username);
            println!(
                "  Nextcloud token: {}",
                token_source(settings.nextcloud.token.is_some(), weekender_config::NEXTCLOUD_TOKEN_ENV)
            );
            println!(
                "  Telegram token: {}",
                token_source(settings.telegram.token.is_some(), weekender_config::TELEGRAM_TOKEN_ENV)
            );
            println!("  Ledger: {}", settings.telegram.database_path.display());
            println!("  Pairs per /extendpoll: {}", settings.schedule.extend_count);

            if !settings.channels.is_empty() {
                println!();
                println!("Channels:");
                for channel in &settings.channels {
                    println!("  - chat {} -> poll {}", channel.chat_id, channel.poll_id);
                }
            }

            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed");
            eprintln!();
            match &e {
                weekender_config::ConfigError::ReadError(io_err) => {
                    eprintln!("Failed to read file: {}", io_err);
                }
                weekender_config::ConfigError::ParseError(parse_err) => {
                    eprintln!("TOML parse error:");
                    eprintln!("  {}", parse_err);
                }
                weekender_config::ConfigError::ValidationFailed { errors } => {
                    eprintln!("Validation errors ({}):", errors.len());
                    for err in errors {
                        eprintln!("  - {}", err);
                    }
                }
                weekender_config::ConfigError::UnsupportedVersion(ver) => {
                    eprintln!(
                        "Unsupported config version: {} (expected {})",
                        ver,
                        weekender_config::CURRENT_CONFIG_VERSION
                    );
                }
            }
            ExitCode::from(1)
        }
    }
}

fn token_source(in_file: bool, env_var: &str) -> String {
    if in_file {
        "set in file".to_string()
    } else {
        format!("read from ${env_var} at startup")
    }
}
