use anyhow::{Context, Result};

use crate::config::{self, Config};

const VALID_KEYS: &str = "catalog_path, database_path, top_n";

/// Show the current effective configuration.
pub fn show_config(config: &Config) -> Result<()> {
    println!("Current Configuration");
    println!("=====================\n");

    let config_path = config::config_file_path();
    println!("Config file: {}", config_path.display());
    println!(
        "File exists: {}\n",
        if config_path.exists() { "yes" } else { "no (using defaults)" }
    );

    println!("Settings:");
    println!("  catalog_path: {}", config.catalog_path.display());
    println!("  database_path: {}", config.database_path.display());
    println!("  top_n: {}", config.top_n);

    println!("\nPriority: CLI args > ENV vars (FOODQUEST_*) > Config file > Defaults");

    Ok(())
}

/// Get a specific config value, or print the whole config file.
pub fn get_config(config: &Config, key: Option<String>) -> Result<()> {
    let Some(key) = key else {
        let config_path = config::config_file_path();

        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).context("Failed to read config file")?;
            print!("{}", contents);
        } else {
            println!("Config file does not exist: {}", config_path.display());
            println!("\nRun 'foodquest config init' to create it.");
        }
        return Ok(());
    };

    match key.as_str() {
        "catalog_path" => println!("{}", config.catalog_path.display()),
        "database_path" => println!("{}", config.database_path.display()),
        "top_n" => println!("{}", config.top_n),
        _ => {
            anyhow::bail!("Unknown config key: {}\n\nValid keys: {}", key, VALID_KEYS);
        }
    }

    Ok(())
}

pub fn show_path() -> Result<()> {
    println!("{}", config::config_file_path().display());
    Ok(())
}

pub fn show_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure foodquest.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}
