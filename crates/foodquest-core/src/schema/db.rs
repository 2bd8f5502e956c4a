use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::{Badge, EarnedBadge, User};
use crate::parse::normalize_key;
use crate::password::{hash_password, verify_password};

use super::migrations::MIGRATIONS;

/// A connection to the user store: accounts, tried-restaurant history and
/// earned badges.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) a database at the given path and apply migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::init(Connection::open(path)?)
    }

    /// Open an in-memory database (for tests).
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    // Foreign key enforcement is per connection, not stored in the file.
    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    /// Get a reference to the underlying connection (for advanced queries).
    #[must_use]
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Run `f` inside a transaction, committing only if it succeeds.
    ///
    /// Every statement `f` issues through the passed database is part of the
    /// transaction; an error rolls all of them back.
    pub fn transaction<T>(&self, f: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        let tx = self.conn.unchecked_transaction()?;
        let value = f(self)?;
        tx.commit()?;
        Ok(value)
    }

    fn apply_migrations(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )?;

        let mut stmt = self
            .conn
            .prepare("SELECT version FROM schema_migrations ORDER BY version")?;
        let applied: Vec<u32> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for migration in MIGRATIONS {
            if !applied.contains(&migration.version) {
                log::info!(
                    "Applying migration {} ({})",
                    migration.version,
                    migration.name
                );
                self.conn.execute_batch(migration.sql)?;
                self.conn.execute(
                    "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
                    rusqlite::params![migration.version, migration.name],
                )?;
            }
        }

        Ok(())
    }
}

// Users
impl Database {
    /// Register a new user with zero points and the starting badge.
    ///
    /// Returns `false` if the username is already taken.
    pub fn register_user(&self, username: &str, password: &str) -> Result<bool> {
        let user = User::new(username);
        let password_hash = hash_password(password)?;

        self.transaction(|db| {
            let inserted = db.conn.execute(
                "INSERT OR IGNORE INTO users (username, points, tried_count, join_date, password_hash)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![
                    user.username,
                    user.points,
                    user.tried_count,
                    user.join_date.to_string(),
                    password_hash,
                ],
            )?;

            if inserted == 0 {
                return Ok(false);
            }

            db.add_badge(username, Badge::FoodieBeginner, 0)?;
            log::debug!("Registered user {username}");
            Ok(true)
        })
    }

    /// The user, if `password` matches the stored hash.
    pub fn validate_user(&self, username: &str, password: &str) -> Result<Option<User>> {
        let stored: Option<String> = self
            .conn
            .query_row(
                "SELECT password_hash FROM users WHERE username = ?1",
                [username],
                |row| row.get(0),
            )
            .optional()?;

        match stored {
            Some(hash) if verify_password(password, &hash) => self.get_user(username),
            _ => Ok(None),
        }
    }

    /// Replace a user's password.
    ///
    /// Returns `false` if the user does not exist.
    pub fn reset_password(&self, username: &str, new_password: &str) -> Result<bool> {
        let password_hash = hash_password(new_password)?;
        let updated = self.conn.execute(
            "UPDATE users SET password_hash = ?2 WHERE username = ?1",
            rusqlite::params![username, password_hash],
        )?;
        Ok(updated > 0)
    }

    /// Look up a user by name.
    pub fn get_user(&self, username: &str) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT username, points, tried_count, join_date
                 FROM users
                 WHERE username = ?1",
                [username],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Add points and count one more tried restaurant.
    pub fn add_points(&self, username: &str, points: i64) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE users SET points = points + ?2, tried_count = tried_count + 1
             WHERE username = ?1",
            rusqlite::params![username, points],
        )?;

        if updated == 0 {
            return Err(Error::NotFound {
                entity: "user",
                id: username.to_string(),
            });
        }
        Ok(())
    }

    /// Top users by points, highest first.
    pub fn leaderboard(&self, limit: usize) -> Result<Vec<User>> {
        let mut stmt = self.conn.prepare(
            "SELECT username, points, tried_count, join_date
             FROM users
             ORDER BY points DESC, username
             LIMIT ?1",
        )?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let users = stmt
            .query_map([limit], row_to_user)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(users)
    }
}

// Restaurant history
impl Database {
    /// Record that a user tried a restaurant.
    ///
    /// The name is stored normalized (trimmed, lowercased), so case and
    /// padding variants of one restaurant share a history entry.
    pub fn add_history(&self, username: &str, restaurant_name: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO user_restaurant_history (username, restaurant_name, tried_on)
             VALUES (?1, ?2, ?3)",
            rusqlite::params![
                username,
                normalize_key(restaurant_name),
                Utc::now().to_rfc3339()
            ],
        )?;
        Ok(())
    }

    /// Whether the user has already tried a restaurant, ignoring case and
    /// surrounding whitespace.
    pub fn has_tried(&self, username: &str, restaurant_name: &str) -> Result<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM user_restaurant_history
                 WHERE username = ?1 AND restaurant_name = ?2
                 LIMIT 1",
                [username, normalize_key(restaurant_name).as_str()],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

// Badges
impl Database {
    /// Append a badge to the user's badge log.
    pub fn add_badge(&self, username: &str, badge: Badge, score_at_time: i64) -> Result<()> {
        self.conn.execute(
            "INSERT INTO user_badges (username, badge_name, score_at_time, earned_on)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                username,
                badge.label(),
                score_at_time,
                Utc::now().to_rfc3339()
            ],
        )?;
        Ok(())
    }

    /// All badges a user has earned, most recent first.
    pub fn badges_for(&self, username: &str) -> Result<Vec<EarnedBadge>> {
        let mut stmt = self.conn.prepare(
            "SELECT badge_name, score_at_time, earned_on
             FROM user_badges
             WHERE username = ?1
             ORDER BY earned_on DESC, id DESC",
        )?;

        let badges = stmt
            .query_map([username], row_to_earned_badge)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(badges)
    }
}

fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
    let join_date_str: String = row.get(3)?;
    let join_date = NaiveDate::parse_from_str(&join_date_str, "%Y-%m-%d")
        .map_err(|e| conversion_error(3, e))?;

    Ok(User {
        username: row.get(0)?,
        points: row.get(1)?,
        tried_count: row.get(2)?,
        join_date,
    })
}

fn row_to_earned_badge(row: &rusqlite::Row) -> rusqlite::Result<EarnedBadge> {
    let badge_name: String = row.get(0)?;
    let earned_on_str: String = row.get(2)?;

    let badge = Badge::from_label(&badge_name).ok_or_else(|| {
        conversion_error(0, Error::InvalidData(format!("unknown badge {badge_name:?}")))
    })?;
    let earned_on = DateTime::parse_from_rfc3339(&earned_on_str)
        .map_err(|e| conversion_error(2, e))?
        .with_timezone(&Utc);

    Ok(EarnedBadge {
        badge,
        score_at_time: row.get(1)?,
        earned_on,
    })
}

fn conversion_error<E>(column: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_foreign_keys_enabled_on_every_open() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("foodquest.db");
        drop(Database::open(&path).unwrap());

        let reopened = Database::open(&path).unwrap();
        let enabled: i64 = reopened
            .conn()
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);

        let err = reopened.add_history("ghost", "Pizza Hut").unwrap_err();
        assert!(matches!(err, Error::Database(_)));
    }

    #[test]
    fn test_validate_and_reset_password() {
        let db = Database::open_in_memory().unwrap();
        db.register_user("asha", "masala").unwrap();

        let stored: String = db
            .conn()
            .query_row(
                "SELECT password_hash FROM users WHERE username = 'asha'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_ne!(stored, "masala");

        assert_eq!(
            db.validate_user("asha", "masala").unwrap().map(|u| u.username),
            Some("asha".to_string())
        );
        assert!(db.validate_user("asha", "wrong").unwrap().is_none());
        assert!(db.validate_user("nobody", "masala").unwrap().is_none());

        assert!(db.reset_password("asha", "chai").unwrap());
        assert!(db.validate_user("asha", "masala").unwrap().is_none());
        assert!(db.validate_user("asha", "chai").unwrap().is_some());
        assert!(!db.reset_password("nobody", "chai").unwrap());
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let db = Database::open_in_memory().unwrap();
        db.register_user("ravi", "pw").unwrap();

        let result: Result<()> = db.transaction(|db| {
            db.add_points("ravi", 5)?;
            Err(Error::InvalidData("boom".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(db.get_user("ravi").unwrap().unwrap().points, 0);

        db.transaction(|db| db.add_points("ravi", 5)).unwrap();
        assert_eq!(db.get_user("ravi").unwrap().unwrap().points, 5);
    }

    #[test]
    fn test_register_user() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.register_user("asha", "pw").unwrap());
        assert!(!db.register_user("asha", "pw").unwrap());

        let user = db.get_user("asha").unwrap().unwrap();
        assert_eq!(user.points, 0);
        assert_eq!(user.tried_count, 0);

        let badges = db.badges_for("asha").unwrap();
        assert_eq!(badges.len(), 1);
        assert_eq!(badges[0].badge, Badge::FoodieBeginner);
        assert_eq!(badges[0].score_at_time, 0);
    }

    #[test]
    fn test_get_unknown_user() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.get_user("nobody").unwrap().is_none());
    }

    #[test]
    fn test_add_points_increments_tried_count() {
        let db = Database::open_in_memory().unwrap();
        db.register_user("ravi", "pw").unwrap();
        db.add_points("ravi", 5).unwrap();
        db.add_points("ravi", 5).unwrap();

        let user = db.get_user("ravi").unwrap().unwrap();
        assert_eq!(user.points, 10);
        assert_eq!(user.tried_count, 2);
    }

    #[test]
    fn test_add_points_unknown_user() {
        let db = Database::open_in_memory().unwrap();
        let err = db.add_points("ghost", 5).unwrap_err();
        assert!(matches!(err, Error::NotFound { entity: "user", .. }));
    }

    #[test]
    fn test_history() {
        let db = Database::open_in_memory().unwrap();
        db.register_user("meera", "pw").unwrap();

        assert!(!db.has_tried("meera", "Pizza Hut").unwrap());
        db.add_history("meera", "Pizza Hut").unwrap();
        assert!(db.has_tried("meera", "Pizza Hut").unwrap());
        assert!(db.has_tried("meera", "  pizza HUT ").unwrap());
        assert!(!db.has_tried("meera", "Domino's Pizza").unwrap());
    }

    #[test]
    fn test_leaderboard_order_and_limit() {
        let db = Database::open_in_memory().unwrap();
        for (name, tries) in [("a", 1), ("b", 3), ("c", 2)] {
            db.register_user(name, "pw").unwrap();
            for _ in 0..tries {
                db.add_points(name, 5).unwrap();
            }
        }

        let top = db.leaderboard(2).unwrap();
        let names: Vec<&str> = top.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);
        assert_eq!(top[0].points, 15);
    }
}
