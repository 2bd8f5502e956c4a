pub mod badge;
pub mod recommendation;
pub mod restaurant;
pub mod user;

pub use badge::Badge;
pub use recommendation::{round_score, Recommendation};
pub use restaurant::Restaurant;
pub use user::{EarnedBadge, User};
