use anyhow::Result;
use clap::Parser;
use foodquest_search::{Preferences, DEFAULT_BROWSE_LIMIT};
use std::path::PathBuf;

mod commands;
mod config;

use config::Config;

#[derive(Debug, Parser)]
#[command(name = "foodquest", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the database (default: ~/.local/share/foodquest/foodquest.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Path to the restaurant catalog CSV (default: data/Dataset.csv)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Recommend restaurants similar to one you already like
    ///
    /// Finds the named restaurant in the given city (exact name first, then
    /// any name containing it) and lists the most similar restaurants in the
    /// same city. Similarity compares cuisines, name and city as a bag of
    /// words. Branches of the same chain are shown once.
    Recommend {
        /// Name of the reference restaurant
        name: String,

        /// City the reference restaurant is in
        #[arg(long)]
        city: String,

        /// Number of results
        #[arg(long)]
        top: Option<usize>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Recommend restaurants by cuisine, city, price and rating
    ///
    /// If nothing matches every preference, price is dropped first, then
    /// cuisine, then rating, then city, until something matches.
    Prefs {
        /// Cuisine substring, e.g. "chinese"
        #[arg(long)]
        cuisine: Option<String>,

        /// City substring
        #[arg(long)]
        city: Option<String>,

        /// Price tier; tiers within one step also match
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=4))]
        price: Option<u8>,

        /// Minimum aggregate rating
        #[arg(long)]
        min_rating: Option<f64>,

        /// Number of results
        #[arg(long)]
        top: Option<usize>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Look restaurants up by name, city or cuisine
    ///
    /// Each option matches any value containing it, ignoring case; given
    /// options must all match. At least one is required.
    Explore {
        /// Name substring
        #[arg(long)]
        name: Option<String>,

        /// City substring
        #[arg(long)]
        city: Option<String>,

        /// Cuisine substring
        #[arg(long)]
        cuisine: Option<String>,

        /// Maximum rows to list
        #[arg(long, default_value_t = DEFAULT_BROWSE_LIMIT)]
        limit: usize,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Manage users
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Mark a catalog restaurant as tried (+5 points the first time)
    Try {
        /// Restaurant name, as listed in the catalog
        restaurant: String,

        /// Username
        #[arg(long)]
        user: String,

        /// City, to pick one branch of a chain
        #[arg(long)]
        city: Option<String>,
    },
    /// Show the top users by points
    Leaderboard {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Show or manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Debug, clap::Subcommand)]
enum UserCommands {
    /// Register a new user
    Register {
        username: String,
        /// Password (prompted for when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Check a username and password
    Login {
        username: String,
        /// Password (prompted for when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Set a new password
    ResetPassword {
        username: String,
        /// New password (prompted for when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Show a user's points, badges and progress to the next badge
    Show { username: String },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Print one value, or the whole config file
    Get { key: Option<String> },
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with defaults
    Init,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?.with_overrides(cli.catalog, cli.db);

    let db_path = config.database_path.as_path();
    log::debug!(
        "Catalog {}, database {}",
        config.catalog_path.display(),
        db_path.display()
    );

    match cli.command {
        Commands::Recommend {
            name,
            city,
            top,
            json,
        } => {
            let top_n = top.unwrap_or(config.top_n);
            commands::run_recommend(&config.catalog_path, &name, &city, top_n, json)?;
        }
        Commands::Prefs {
            cuisine,
            city,
            price,
            min_rating,
            top,
            json,
        } => {
            let prefs = Preferences {
                cuisine,
                city,
                price_tier: price,
                min_rating,
            };
            let top_n = top.unwrap_or(config.top_n);
            commands::run_preferences(&config.catalog_path, &prefs, top_n, json)?;
        }
        Commands::Explore {
            name,
            city,
            cuisine,
            limit,
            json,
        } => {
            commands::run_explore(
                &config.catalog_path,
                name.as_deref().unwrap_or_default(),
                city.as_deref().unwrap_or_default(),
                cuisine.as_deref().unwrap_or_default(),
                limit,
                json,
            )?;
        }
        Commands::User { command } => match command {
            UserCommands::Register { username, password } => {
                commands::register_user(db_path, &username, password)?;
            }
            UserCommands::Login { username, password } => {
                commands::login(db_path, &username, password)?;
            }
            UserCommands::ResetPassword { username, password } => {
                commands::reset_password(db_path, &username, password)?;
            }
            UserCommands::Show { username } => commands::show_user(db_path, &username)?,
        },
        Commands::Try {
            restaurant,
            user,
            city,
        } => {
            commands::try_restaurant(
                &config.catalog_path,
                db_path,
                &user,
                &restaurant,
                city.as_deref(),
            )?;
        }
        Commands::Leaderboard { limit } => {
            commands::show_leaderboard(db_path, limit)?;
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => commands::config::show_config(&config)?,
            ConfigCommands::Get { key } => commands::config::get_config(&config, key)?,
            ConfigCommands::Path => commands::config::show_path()?,
            ConfigCommands::Example => commands::config::show_example()?,
            ConfigCommands::Init => commands::config::init_config()?,
        },
    }

    Ok(())
}
