use serde::{Serialize, Serializer};
use std::fmt;

use crate::domain::{PlayerId, normalize_name};

/// One starting position of a draw
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Entrant {
    Player(PlayerId),
    Bye,
}

impl Entrant {
    pub fn player(name: &str) -> Self {
        Entrant::Player(normalize_name(name))
    }

    /// `bye`, `-` and blank names are empty slots
    pub fn parse(raw: &str) -> Self {
        let name = normalize_name(raw);
        if name.is_empty() || name == "-" || name.eq_ignore_ascii_case("bye") {
            Entrant::Bye
        } else {
            Entrant::Player(name)
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Entrant::Player(name) => Some(name),
            Entrant::Bye => None,
        }
    }
}

/// A match position: 1-based round, 0-based position within the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchSlot {
    pub round: usize,
    pub position: usize,
}

impl fmt::Display for MatchSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}-M{}", self.round, self.position + 1)
    }
}

// Serialized as a string so it can key a JSON object
impl Serialize for MatchSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Occupant of a slot: entrant index, or `None` for a bye
pub type Slot = Option<usize>;

/// Rounds of one simulated draw. Round 0 holds the seeded entrants.
#[derive(Debug, Clone, PartialEq)]
pub struct BracketState {
    rounds: Vec<Vec<Slot>>,
}

impl BracketState {
    pub fn seed(entrants: &[Entrant]) -> Self {
        let first = entrants
            .iter()
            .enumerate()
            .map(|(idx, e)| e.name().map(|_| idx))
            .collect();
        Self {
            rounds: vec![first],
        }
    }

    /// Slots still to be played
    pub fn current(&self) -> &[Slot] {
        self.rounds.last().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of rounds already decided
    pub fn rounds_played(&self) -> usize {
        self.rounds.len() - 1
    }

    pub fn is_complete(&self) -> bool {
        self.current().len() <= 1
    }

    pub fn push_round(&mut self, winners: Vec<Slot>) {
        self.rounds.push(winners);
    }

    pub fn champion(&self) -> Slot {
        if self.is_complete() {
            self.current().first().copied().flatten()
        } else {
            None
        }
    }
}

/// Matches in each round of a draw with `size` slots
pub fn round_sizes(size: usize) -> Vec<usize> {
    let mut sizes = Vec::new();
    let mut remaining = size;
    while remaining > 1 {
        remaining /= 2;
        sizes.push(remaining);
    }
    sizes
}
