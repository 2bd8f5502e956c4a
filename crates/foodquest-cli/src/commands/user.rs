use anyhow::{bail, Context, Result};
use foodquest_core::model::Badge;
use foodquest_core::progress::{self, TryOutcome};
use foodquest_core::schema::Database;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Open the user store, creating its parent directory on first use.
fn open_db(db_path: &Path) -> Result<Database> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Database::open(db_path).with_context(|| format!("Failed to open database {}", db_path.display()))
}

/// Use the password given on the command line, or ask for one on stdin.
fn password_or_prompt(password: Option<String>, prompt: &str) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    eprint!("{}: ", prompt);
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("A password is required");
    }
    Ok(password)
}

pub fn register_user(db_path: &Path, username: &str, password: Option<String>) -> Result<()> {
    let password = password_or_prompt(password, "Password")?;
    let db = open_db(db_path)?;

    if db.register_user(username, &password)? {
        println!("✓ Registered {}", username);
    } else {
        println!("Username {} is already taken.", username);
    }
    Ok(())
}

pub fn login(db_path: &Path, username: &str, password: Option<String>) -> Result<()> {
    let password = password_or_prompt(password, "Password")?;
    let db = open_db(db_path)?;

    match db.validate_user(username, &password)? {
        Some(user) => println!("✓ Welcome back, {} ({} points)", user.username, user.points),
        None => bail!("Invalid username or password"),
    }
    Ok(())
}

pub fn reset_password(db_path: &Path, username: &str, password: Option<String>) -> Result<()> {
    let password = password_or_prompt(password, "New password")?;
    let db = open_db(db_path)?;

    if !db.reset_password(username, &password)? {
        bail!("Unknown user: {}", username);
    }
    println!("✓ Password updated for {}", username);
    Ok(())
}

pub fn show_user(db_path: &Path, username: &str) -> Result<()> {
    let db = open_db(db_path)?;
    let Some(user) = db.get_user(username)? else {
        bail!("Unknown user: {}", username);
    };

    let current = user.current_badge();
    println!("\n👤 {}\n", user.username);
    println!("  Joined: {}", user.join_date);
    println!("  Points: {}", user.points);
    println!("  Restaurants tried: {}", user.tried_count);
    println!("  Current badge: {}", current);
    match current.next() {
        Some(next) => println!(
            "  Next badge: {} at {} points ({:.0}% there)",
            next,
            next.threshold(),
            Badge::progress(user.points) * 100.0
        ),
        None => println!("  Next badge: maxed out"),
    }

    let badges = db.badges_for(username)?;
    if !badges.is_empty() {
        println!("\n  Badges earned:");
        for earned in badges {
            println!(
                "    {} at {} points ({})",
                earned.badge,
                earned.score_at_time,
                earned.earned_on.format("%Y-%m-%d")
            );
        }
    }
    Ok(())
}

/// Award points for a restaurant, which must exist in the catalog.
pub fn try_restaurant(
    catalog_path: &Path,
    db_path: &Path,
    username: &str,
    name: &str,
    city: Option<&str>,
) -> Result<()> {
    let rows = foodquest_core::load_catalog(catalog_path)
        .with_context(|| format!("Failed to load catalog {}", catalog_path.display()))?;
    let Some(restaurant) = foodquest_core::find_restaurant(&rows, name, city) else {
        bail!("No restaurant called \"{}\" in the catalog", name.trim());
    };

    let db = open_db(db_path)?;
    match progress::try_restaurant(&db, username, restaurant)? {
        TryOutcome::Tried {
            points_awarded,
            total_points,
            new_badges,
        } => {
            println!(
                "✓ +{} points for trying {} ({} total)",
                points_awarded,
                restaurant.display_name(),
                total_points
            );
            for badge in new_badges {
                println!("  🏅 New badge: {}", badge);
            }
        }
        TryOutcome::AlreadyTried => {
            println!("You have already tried {}.", restaurant.display_name());
        }
    }
    Ok(())
}

pub fn show_leaderboard(db_path: &Path, limit: usize) -> Result<()> {
    let db = open_db(db_path)?;
    let users = db.leaderboard(limit)?;

    println!("\n🏆 Leaderboard\n");
    if users.is_empty() {
        println!("  No users yet. Run `foodquest user register <NAME>` to join.");
        return Ok(());
    }

    for (rank, user) in users.iter().enumerate() {
        println!(
            "  {:>2}. {:<20} {:>5} pts  {}",
            rank + 1,
            user.username,
            user.points,
            user.current_badge()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const CATALOG: &str = "\
Restaurant Name,City,Cuisines,Aggregate rating
Pizza Hut,New Delhi,\"Italian, Pizza\",3.9
Haldiram's,New Delhi,North Indian,4.1
";

    fn fixture() -> (TempDir, std::path::PathBuf, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let catalog = dir.path().join("Dataset.csv");
        fs::write(&catalog, CATALOG).unwrap();
        let db = dir.path().join("nested").join("data").join("foodquest.db");
        (dir, catalog, db)
    }

    #[test]
    fn test_open_db_creates_parent_directory() {
        let (_dir, _catalog, db_path) = fixture();
        assert!(!db_path.parent().unwrap().exists());

        open_db(&db_path).unwrap();
        assert!(db_path.exists());
    }

    #[test]
    fn test_register_and_login() {
        let (_dir, _catalog, db_path) = fixture();
        register_user(&db_path, "asha", Some("masala".into())).unwrap();

        login(&db_path, "asha", Some("masala".into())).unwrap();
        assert!(login(&db_path, "asha", Some("wrong".into())).is_err());

        reset_password(&db_path, "asha", Some("dosa".into())).unwrap();
        assert!(login(&db_path, "asha", Some("masala".into())).is_err());
        login(&db_path, "asha", Some("dosa".into())).unwrap();

        assert!(reset_password(&db_path, "nobody", Some("x".into())).is_err());
    }

    #[test]
    fn test_try_resolves_through_catalog() {
        let (_dir, catalog, db_path) = fixture();
        register_user(&db_path, "asha", Some("pw".into())).unwrap();

        try_restaurant(&catalog, &db_path, "asha", "pizza hut", None).unwrap();
        try_restaurant(&catalog, &db_path, "asha", "  PIZZA HUT ", None).unwrap();
        assert!(try_restaurant(&catalog, &db_path, "asha", "Imaginary Bistro", None).is_err());

        let user = Database::open(&db_path).unwrap().get_user("asha").unwrap().unwrap();
        assert_eq!(user.points, progress::POINTS_PER_TRY);
        assert_eq!(user.tried_count, 1);
    }

    #[test]
    fn test_try_with_unknown_name_leaves_no_database() {
        let (_dir, catalog, db_path) = fixture();
        assert!(try_restaurant(&catalog, &db_path, "asha", "Imaginary Bistro", None).is_err());
        assert!(!db_path.exists());
    }
}
