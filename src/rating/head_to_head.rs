use std::collections::HashMap;

use super::types::{HeadToHeadSummary, Meeting};
use crate::domain::{PlayerId, Surface};

/// Meetings between every pair of players, in the order they were recorded
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadToHead {
    meetings: HashMap<(PlayerId, PlayerId), Vec<Meeting>>,
}

impl HeadToHead {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn meetings(&self, player_a: &str, player_b: &str) -> &[Meeting] {
        self.meetings
            .get(&pair_key(player_a, player_b))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Wins for `player_a` and `player_b`, optionally on one surface only
    pub fn summary(
        &self,
        player_a: &str,
        player_b: &str,
        surface: Option<Surface>,
    ) -> HeadToHeadSummary {
        self.meetings(player_a, player_b)
            .iter()
            .filter(|m| surface.is_none_or(|s| m.surface == s))
            .fold(HeadToHeadSummary::default(), |mut acc, m| {
                if m.winner == player_a {
                    acc.wins_a += 1;
                } else {
                    acc.wins_b += 1;
                }
                acc
            })
    }

    pub fn pair_count(&self) -> usize {
        self.meetings.len()
    }

    pub(crate) fn record(&mut self, winner: &str, loser: &str, meeting: Meeting) {
        self.meetings
            .entry(pair_key(winner, loser))
            .or_default()
            .push(meeting);
    }
}

fn pair_key(a: &str, b: &str) -> (PlayerId, PlayerId) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn meeting(winner: &str, day: u32, surface: Surface) -> Meeting {
        Meeting {
            winner: winner.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            surface,
        }
    }

    #[test]
    fn test_pair_is_unordered() {
        let mut h2h = HeadToHead::new();
        h2h.record("Sinner", "Alcaraz", meeting("Sinner", 1, Surface::Hard));
        h2h.record("Alcaraz", "Sinner", meeting("Alcaraz", 2, Surface::Clay));
        h2h.record("Alcaraz", "Sinner", meeting("Alcaraz", 3, Surface::Clay));

        assert_eq!(h2h.pair_count(), 1);
        assert_eq!(h2h.meetings("Sinner", "Alcaraz").len(), 3);
        assert_eq!(h2h.meetings("Alcaraz", "Sinner")[0].winner, "Sinner");
    }

    #[test]
    fn test_summary_by_surface() {
        let mut h2h = HeadToHead::new();
        h2h.record("Sinner", "Alcaraz", meeting("Sinner", 1, Surface::Hard));
        h2h.record("Alcaraz", "Sinner", meeting("Alcaraz", 2, Surface::Clay));
        h2h.record("Alcaraz", "Sinner", meeting("Alcaraz", 3, Surface::Clay));

        let overall = h2h.summary("Sinner", "Alcaraz", None);
        assert_eq!((overall.wins_a, overall.wins_b), (1, 2));

        let clay = h2h.summary("Alcaraz", "Sinner", Some(Surface::Clay));
        assert_eq!((clay.wins_a, clay.wins_b), (2, 0));

        let grass = h2h.summary("Alcaraz", "Sinner", Some(Surface::Grass));
        assert_eq!(grass.meetings(), 0);
        assert_eq!(h2h.summary("X", "Y", None), HeadToHeadSummary::default());
    }
}
