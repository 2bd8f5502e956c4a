use serde::{Deserialize, Serialize};
use std::fmt;

/// A progression badge, earned by accumulating points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Badge {
    FoodieBeginner,
    StreetExplorer,
    FastFoodFanatic,
    LocalFoodie,
    FlavorChaser,
    TasteAdventurer,
    GourmetSeeker,
    FineDineExpert,
    CulinaryHero,
    CuisineLegend,
}

impl Badge {
    /// Every badge, lowest threshold first.
    pub const ALL: [Self; 10] = [
        Self::FoodieBeginner,
        Self::StreetExplorer,
        Self::FastFoodFanatic,
        Self::LocalFoodie,
        Self::FlavorChaser,
        Self::TasteAdventurer,
        Self::GourmetSeeker,
        Self::FineDineExpert,
        Self::CulinaryHero,
        Self::CuisineLegend,
    ];

    /// Points needed to earn this badge.
    #[must_use]
    pub const fn threshold(self) -> i64 {
        match self {
            Self::FoodieBeginner => 0,
            Self::StreetExplorer => 20,
            Self::FastFoodFanatic => 40,
            Self::LocalFoodie => 60,
            Self::FlavorChaser => 80,
            Self::TasteAdventurer => 100,
            Self::GourmetSeeker => 130,
            Self::FineDineExpert => 160,
            Self::CulinaryHero => 190,
            Self::CuisineLegend => 220,
        }
    }

    /// Stored name of the badge.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FoodieBeginner => "Foodie Beginner",
            Self::StreetExplorer => "Street Explorer",
            Self::FastFoodFanatic => "Fast-Food Fanatic",
            Self::LocalFoodie => "Local Foodie",
            Self::FlavorChaser => "Flavor Chaser",
            Self::TasteAdventurer => "Taste Adventurer",
            Self::GourmetSeeker => "Gourmet Seeker",
            Self::FineDineExpert => "Fine Dine Expert",
            Self::CulinaryHero => "Culinary Hero",
            Self::CuisineLegend => "Cuisine Legend",
        }
    }

    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::FoodieBeginner => "🍴",
            Self::StreetExplorer => "🍕",
            Self::FastFoodFanatic => "🍔",
            Self::LocalFoodie => "🍜",
            Self::FlavorChaser => "🍛",
            Self::TasteAdventurer => "🌮",
            Self::GourmetSeeker => "🍱",
            Self::FineDineExpert => "🍣",
            Self::CulinaryHero => "🥘",
            Self::CuisineLegend => "🥇",
        }
    }

    /// The highest badge a points total qualifies for.
    #[must_use]
    pub fn for_points(points: i64) -> Self {
        Self::ALL
            .iter()
            .rev()
            .copied()
            .find(|badge| points >= badge.threshold())
            .unwrap_or(Self::FoodieBeginner)
    }

    /// The badge after this one, or `None` at the top of the ladder.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        let pos = Self::ALL.iter().position(|&badge| badge == self)?;
        Self::ALL.get(pos + 1).copied()
    }

    /// How far a points total has come from its current badge's threshold
    /// toward the next one, in `[0, 1]`. Always `1.0` at the top badge.
    #[must_use]
    pub fn progress(points: i64) -> f64 {
        let current = Self::for_points(points);
        let Some(next) = current.next() else {
            return 1.0;
        };
        let span = (next.threshold() - current.threshold()) as f64;
        ((points - current.threshold()) as f64 / span).clamp(0.0, 1.0)
    }

    /// Look a badge up by its stored label (case-insensitive).
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|badge| badge.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.emoji(), self.label())
    }
}
