use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{PlayerId, Surface};

pub type RatingValue = f64;

/// Rating of one player on one surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingEntry {
    pub rating: RatingValue,
    pub matches_played: u32,
    pub last_match_date: Option<NaiveDate>,
}

impl RatingEntry {
    pub fn new(baseline: RatingValue) -> Self {
        Self {
            rating: baseline,
            matches_played: 0,
            last_match_date: None,
        }
    }

    pub(crate) fn record(&mut self, delta: RatingValue, date: NaiveDate) {
        self.rating += delta;
        self.matches_played += 1;
        self.last_match_date = Some(date);
    }
}

/// Single result in a player's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormEntry {
    pub date: NaiveDate,
    pub surface: Surface,
    pub opponent: PlayerId,
    pub won: bool,
}

/// Meeting between two players
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub winner: PlayerId,
    pub date: NaiveDate,
    pub surface: Surface,
}

/// Wins for each side, from the perspective of the first player asked about
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadToHeadSummary {
    pub wins_a: u32,
    pub wins_b: u32,
}

impl HeadToHeadSummary {
    pub fn meetings(&self) -> u32 {
        self.wins_a + self.wins_b
    }
}
