use crate::error::{Result, SettlementError};
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A non-negative course price.
///
/// Wrapper around `rust_decimal::Decimal` so that monetary values carry their
/// domain rule (never negative) in the type rather than in every call site.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Price(Decimal);

impl Price {
    pub fn new(value: Decimal) -> Result<Self> {
        if value >= Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(SettlementError::validation("Price must not be negative"))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Price {
    type Error = SettlementError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

/// A discount percentage, 0 through 100 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discount(u8);

impl Discount {
    pub const NONE: Self = Self(0);

    pub fn new(percent: u8) -> Result<Self> {
        if percent <= 100 {
            Ok(Self(percent))
        } else {
            Err(SettlementError::validation(
                "Discount must be between 0 and 100",
            ))
        }
    }

    pub fn percent(&self) -> u8 {
        self.0
    }
}

/// A course rating, 1 through 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating(u8);

impl Rating {
    pub fn new(value: u8) -> Result<Self> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(SettlementError::validation("Invalid Details"))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lecture {
    pub id: String,
    pub title: String,
    pub duration_minutes: u32,
    pub preview_free: bool,
    pub video_url: String,
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: String,
    pub title: String,
    pub order: u32,
    pub lectures: Vec<Lecture>,
}

/// One user's rating of a course. At most one entry per user is kept;
/// `Course::apply_rating` replaces an existing entry in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRating {
    pub user_id: String,
    pub rating: Rating,
}

/// Snapshot of the authoring educator, not a live join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducatorRef {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: Price,
    pub discount: Discount,
    pub thumbnail_url: String,
    pub chapters: Vec<Chapter>,
    pub enrolled_students: Vec<String>,
    pub ratings: Vec<CourseRating>,
    pub educator: EducatorRef,
    pub created_at: DateTime<Utc>,
}

impl Course {
    /// The price a buyer actually pays: `price - price * discount / 100`,
    /// rounded to the cent, midpoint away from zero.
    pub fn effective_price(&self) -> Decimal {
        let price = self.price.value();
        let discount = Decimal::from(self.discount.percent());
        (price - discount * price / Decimal::from(100))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    pub fn is_enrolled(&self, user_id: &str) -> bool {
        self.enrolled_students.iter().any(|id| id == user_id)
    }

    /// Adds a student to the enrolled set. Returns `false` when the student
    /// was already present (no change).
    pub fn enroll(&mut self, user_id: &str) -> bool {
        if self.is_enrolled(user_id) {
            return false;
        }
        self.enrolled_students.push(user_id.to_owned());
        true
    }

    pub fn total_lectures(&self) -> usize {
        self.chapters.iter().map(|c| c.lectures.len()).sum()
    }

    pub fn contains_lecture(&self, lecture_id: &str) -> bool {
        self.chapters
            .iter()
            .flat_map(|c| &c.lectures)
            .any(|l| l.id == lecture_id)
    }

    /// Records a rating, replacing any existing entry by the same user.
    pub fn apply_rating(&mut self, user_id: &str, rating: Rating) {
        match self.ratings.iter_mut().find(|r| r.user_id == user_id) {
            Some(existing) => existing.rating = rating,
            None => self.ratings.push(CourseRating {
                user_id: user_id.to_owned(),
                rating,
            }),
        }
    }

    pub fn average_rating(&self) -> Option<Decimal> {
        if self.ratings.is_empty() {
            return None;
        }
        let sum: u32 = self.ratings.iter().map(|r| u32::from(r.rating.value())).sum();
        Some(Decimal::from(sum) / Decimal::from(self.ratings.len() as u32))
    }
}
