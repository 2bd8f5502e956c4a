use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Badge;

/// A user's progress record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub points: i64,

    /// Number of restaurants the user has marked as tried.
    pub tried_count: i64,

    pub join_date: NaiveDate,
}

impl User {
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            points: 0,
            tried_count: 0,
            join_date: Utc::now().date_naive(),
        }
    }

    /// The badge the user's current points qualify for.
    #[must_use]
    pub fn current_badge(&self) -> Badge {
        Badge::for_points(self.points)
    }
}

/// A badge grant from the user's append-only badge log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarnedBadge {
    pub badge: Badge,

    /// Points the user had when the badge was granted.
    pub score_at_time: i64,

    pub earned_on: DateTime<Utc>,
}
