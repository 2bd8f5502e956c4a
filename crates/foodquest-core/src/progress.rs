//! Points and badges earned by accepting recommendations.
//!
//! Marking a catalog restaurant as tried is worth [`POINTS_PER_TRY`] points
//! the first time; repeats earn nothing, however the name is cased or
//! padded. After every award the user is granted any badge their new total
//! qualifies for that they do not already hold.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{Badge, Restaurant};
use crate::schema::Database;

/// Points for trying a restaurant for the first time.
pub const POINTS_PER_TRY: i64 = 5;

/// Result of marking a restaurant as tried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TryOutcome {
    /// First visit: points were awarded.
    Tried {
        points_awarded: i64,
        total_points: i64,
        new_badges: Vec<Badge>,
    },
    /// The user had already tried this restaurant.
    AlreadyTried,
}

/// Mark a catalog restaurant as tried by `username`.
///
/// Points, history and badges are written in one transaction: either all
/// of them land or none do.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if the user is not registered.
pub fn try_restaurant(db: &Database, username: &str, restaurant: &Restaurant) -> Result<TryOutcome> {
    if db.get_user(username)?.is_none() {
        return Err(Error::NotFound {
            entity: "user",
            id: username.to_string(),
        });
    }

    let name = restaurant.name_key();
    db.transaction(|db| {
        if db.has_tried(username, name)? {
            log::debug!("{username} already tried {name}");
            return Ok(TryOutcome::AlreadyTried);
        }

        db.add_points(username, POINTS_PER_TRY)?;
        db.add_history(username, name)?;
        let new_badges = award_badges(db, username)?;

        let total_points = db.get_user(username)?.map_or(0, |u| u.points);
        log::info!("{username} tried {name}: +{POINTS_PER_TRY} points ({total_points} total)");

        Ok(TryOutcome::Tried {
            points_awarded: POINTS_PER_TRY,
            total_points,
            new_badges,
        })
    })
}

/// Grant every badge the user qualifies for but does not yet hold.
///
/// Returns the newly granted badges, lowest threshold first.
pub fn award_badges(db: &Database, username: &str) -> Result<Vec<Badge>> {
    let user = db.get_user(username)?.ok_or_else(|| Error::NotFound {
        entity: "user",
        id: username.to_string(),
    })?;

    let held: Vec<Badge> = db
        .badges_for(username)?
        .into_iter()
        .map(|earned| earned.badge)
        .collect();

    let mut granted = Vec::new();
    for badge in Badge::ALL {
        if user.points >= badge.threshold() && !held.contains(&badge) {
            db.add_badge(username, badge, user.points)?;
            granted.push(badge);
        }
    }

    if !granted.is_empty() {
        log::info!("{username} earned {} new badge(s)", granted.len());
    }
    Ok(granted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db_with_user(name: &str) -> Database {
        let db = Database::open_in_memory().unwrap();
        db.register_user(name, "pw").unwrap();
        db
    }

    fn place(name: &str) -> Restaurant {
        Restaurant::new(name, "New Delhi", "North Indian")
    }

    #[test]
    fn test_first_try_awards_points() {
        let db = db_with_user("asha");
        let outcome = try_restaurant(&db, "asha", &place("Pizza Hut")).unwrap();

        assert_eq!(
            outcome,
            TryOutcome::Tried {
                points_awarded: 5,
                total_points: 5,
                new_badges: Vec::new(),
            }
        );
        let user = db.get_user("asha").unwrap().unwrap();
        assert_eq!(user.tried_count, 1);
        assert!(db.has_tried("asha", "Pizza Hut").unwrap());
    }

    #[test]
    fn test_repeat_try_awards_nothing() {
        let db = db_with_user("asha");
        try_restaurant(&db, "asha", &place("Pizza Hut")).unwrap();
        let outcome = try_restaurant(&db, "asha", &place("Pizza Hut")).unwrap();

        assert_eq!(outcome, TryOutcome::AlreadyTried);
        assert_eq!(db.get_user("asha").unwrap().unwrap().points, 5);
    }

    #[test]
    fn test_name_variants_count_once() {
        let db = db_with_user("asha");
        let first = try_restaurant(&db, "asha", &place("Pizza Hut")).unwrap();
        assert!(matches!(first, TryOutcome::Tried { .. }));

        for variant in ["pizza hut", " Pizza Hut ", "PIZZA HUT"] {
            let outcome = try_restaurant(&db, "asha", &place(variant)).unwrap();
            assert_eq!(outcome, TryOutcome::AlreadyTried, "{variant:?}");
        }

        let user = db.get_user("asha").unwrap().unwrap();
        assert_eq!(user.points, 5);
        assert_eq!(user.tried_count, 1);
    }

    #[test]
    fn test_failed_badge_write_rolls_back_points() {
        let db = db_with_user("asha");
        db.conn().execute_batch("DROP TABLE user_badges").unwrap();

        assert!(try_restaurant(&db, "asha", &place("Pizza Hut")).is_err());

        let user = db.get_user("asha").unwrap().unwrap();
        assert_eq!(user.points, 0);
        assert_eq!(user.tried_count, 0);
        assert!(!db.has_tried("asha", "Pizza Hut").unwrap());
    }

    #[test]
    fn test_badge_granted_at_threshold() {
        let db = db_with_user("ravi");
        let mut last = TryOutcome::AlreadyTried;
        for i in 0..4 {
            last = try_restaurant(&db, "ravi", &place(&format!("Place {i}"))).unwrap();
        }

        match last {
            TryOutcome::Tried {
                total_points,
                new_badges,
                ..
            } => {
                assert_eq!(total_points, 20);
                assert_eq!(new_badges, vec![Badge::StreetExplorer]);
            }
            TryOutcome::AlreadyTried => panic!("expected a fresh try"),
        }
    }

    #[test]
    fn test_award_badges_catches_up_missing_levels() {
        let db = db_with_user("meera");
        for _ in 0..9 {
            db.add_points("meera", 5).unwrap();
        }

        let granted = award_badges(&db, "meera").unwrap();
        assert_eq!(
            granted,
            vec![Badge::StreetExplorer, Badge::FastFoodFanatic]
        );
        assert!(award_badges(&db, "meera").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_user() {
        let db = Database::open_in_memory().unwrap();
        let err = try_restaurant(&db, "ghost", &place("Pizza Hut")).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }
}
