/// A schema migration.
#[derive(Debug)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub sql: &'static str,
}

const MIGRATION_001: &str = r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Users and their running totals
CREATE TABLE IF NOT EXISTS users (
    username TEXT PRIMARY KEY,
    points INTEGER NOT NULL DEFAULT 0,
    tried_count INTEGER NOT NULL DEFAULT 0,
    join_date TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_users_points ON users(points);

-- Append-only log of restaurants a user has tried
CREATE TABLE IF NOT EXISTS user_restaurant_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL REFERENCES users(username),
    restaurant_name TEXT NOT NULL,
    tried_on TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_history_user_restaurant
    ON user_restaurant_history(username, restaurant_name);

-- Append-only log of badges earned
CREATE TABLE IF NOT EXISTS user_badges (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL REFERENCES users(username),
    badge_name TEXT NOT NULL,
    score_at_time INTEGER NOT NULL,
    earned_on TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_badges_username ON user_badges(username);
"#;

const MIGRATION_002: &str = r#"
-- Argon2 PHC string; empty until a password is set
ALTER TABLE users ADD COLUMN password_hash TEXT NOT NULL DEFAULT '';
"#;

pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "initial_schema",
        sql: MIGRATION_001,
    },
    Migration {
        version: 2,
        name: "user_passwords",
        sql: MIGRATION_002,
    },
];
