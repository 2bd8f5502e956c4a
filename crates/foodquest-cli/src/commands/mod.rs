pub mod config;
pub mod recommend;
pub mod user;

pub use recommend::{run_explore, run_preferences, run_recommend};
pub use user::{login, register_user, reset_password, show_leaderboard, show_user, try_restaurant};
