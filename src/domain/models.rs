use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ValidationError;

/// Normalized player name
pub type PlayerId = String;

/// Court surface
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    #[default]
    Hard,
    Clay,
    Grass,
    IndoorHard,
}

impl Surface {
    pub const ALL: [Surface; 4] = [
        Surface::Hard,
        Surface::Clay,
        Surface::Grass,
        Surface::IndoorHard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Surface::Hard => "hard",
            Surface::Clay => "clay",
            Surface::Grass => "grass",
            Surface::IndoorHard => "indoor_hard",
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Surface {
    type Err = ValidationError;

    /// Blank input falls back to hard court; carpet is played indoors
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "" | "hard" => Ok(Surface::Hard),
            "clay" => Ok(Surface::Clay),
            "grass" => Ok(Surface::Grass),
            "indoor_hard" | "indoor hard" | "indoor-hard" | "carpet" => Ok(Surface::IndoorHard),
            _ => Err(ValidationError::UnknownSurface(s.to_string())),
        }
    }
}

/// Trim and collapse inner whitespace
pub fn normalize_name(name: &str) -> PlayerId {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One completed match
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRecord {
    date: NaiveDate,
    surface: Surface,
    winner: PlayerId,
    loser: PlayerId,
    score: String,
    best_of: u8,
    round: String,
}

impl MatchRecord {
    pub fn new(
        date: NaiveDate,
        surface: Surface,
        winner: &str,
        loser: &str,
        score: &str,
        best_of: u8,
        round: &str,
    ) -> Result<Self, ValidationError> {
        let winner = normalize_name(winner);
        let loser = normalize_name(loser);

        if winner.is_empty() {
            return Err(ValidationError::MissingPlayer("winner"));
        }
        if loser.is_empty() {
            return Err(ValidationError::MissingPlayer("loser"));
        }
        if winner == loser {
            return Err(ValidationError::SamePlayer(winner));
        }
        if best_of != 3 && best_of != 5 {
            return Err(ValidationError::InvalidBestOf(best_of));
        }

        Ok(Self {
            date,
            surface,
            winner,
            loser,
            score: score.trim().to_string(),
            best_of,
            round: round.trim().to_string(),
        })
    }

    /// Build from raw text fields as found in ATP/WTA match files
    pub fn parse(
        date: &str,
        surface: &str,
        winner: &str,
        loser: &str,
        score: &str,
        best_of: u8,
        round: &str,
    ) -> Result<Self, ValidationError> {
        let date = parse_match_date(date)?;
        let surface = surface.parse()?;
        Self::new(date, surface, winner, loser, score, best_of, round)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn winner(&self) -> &str {
        &self.winner
    }

    pub fn loser(&self) -> &str {
        &self.loser
    }

    pub fn score(&self) -> &str {
        &self.score
    }

    pub fn best_of(&self) -> u8 {
        self.best_of
    }

    pub fn round(&self) -> &str {
        &self.round
    }
}

/// Dates come as YYYYMMDD
fn parse_match_date(date_str: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = date_str.trim();
    if trimmed.len() != 8 {
        return Err(ValidationError::InvalidDate(date_str.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, "%Y%m%d")
        .map_err(|_| ValidationError::InvalidDate(date_str.to_string()))
}
