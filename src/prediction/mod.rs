//! Match forecasts read from a finished rating pass.

use serde::Serialize;

use crate::config::PredictionSettings;
use crate::domain::{PlayerId, Surface};
use crate::rating::{
    FormEntry, HeadToHead, HeadToHeadSummary, RatingStore, RatingValue, expected_score,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadToHeadReport {
    pub overall: HeadToHeadSummary,
    pub on_surface: HeadToHeadSummary,
}

/// Latest results of one player
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentForm {
    /// Most recent first, all surfaces
    pub results: Vec<FormEntry>,
    pub wins: u32,
    pub losses: u32,
    /// Record over the last N matches on the requested surface
    pub surface_wins: u32,
    pub surface_losses: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub player_a: PlayerId,
    pub player_b: PlayerId,
    pub surface: Surface,
    pub prob_a: f64,
    pub prob_b: f64,
    pub rating_a: RatingValue,
    pub rating_b: RatingValue,
    pub head_to_head: HeadToHeadReport,
    pub form_a: RecentForm,
    pub form_b: RecentForm,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerProfile {
    pub player: PlayerId,
    pub surface_ratings: Vec<(Surface, RatingValue)>,
    pub overall_rating: RatingValue,
    pub total_matches: u32,
    pub recent_form: RecentForm,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardRow {
    pub player: PlayerId,
    pub rating: RatingValue,
    pub matches_played: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSummary {
    pub player: PlayerId,
    pub overall_rating: RatingValue,
    pub total_matches: u32,
}

/// Read-only view over a rating pass. Shared freely across threads.
#[derive(Debug, Clone, Copy)]
pub struct PredictionService<'a> {
    store: &'a RatingStore,
    head_to_head: &'a HeadToHead,
    form_window: usize,
}

impl<'a> PredictionService<'a> {
    pub fn new(
        store: &'a RatingStore,
        head_to_head: &'a HeadToHead,
        settings: &PredictionSettings,
    ) -> Self {
        Self {
            store,
            head_to_head,
            form_window: settings.form_window,
        }
    }

    pub fn store(&self) -> &'a RatingStore {
        self.store
    }

    pub fn rating(&self, player: &str, surface: Surface) -> RatingValue {
        self.store.rating(player, surface)
    }

    /// Probability that `player_a` beats `player_b` on `surface`
    pub fn win_probability(&self, player_a: &str, player_b: &str, surface: Surface) -> f64 {
        expected_score(
            self.store.rating(player_a, surface),
            self.store.rating(player_b, surface),
        )
    }

    pub fn predict(&self, player_a: &str, player_b: &str, surface: Surface) -> Prediction {
        let rating_a = self.store.rating(player_a, surface);
        let rating_b = self.store.rating(player_b, surface);
        let prob_a = expected_score(rating_a, rating_b);

        Prediction {
            player_a: player_a.to_string(),
            player_b: player_b.to_string(),
            surface,
            prob_a,
            prob_b: 1.0 - prob_a,
            rating_a,
            rating_b,
            head_to_head: HeadToHeadReport {
                overall: self.head_to_head.summary(player_a, player_b, None),
                on_surface: self.head_to_head.summary(player_a, player_b, Some(surface)),
            },
            form_a: self.recent_form(player_a, surface),
            form_b: self.recent_form(player_b, surface),
        }
    }

    pub fn recent_form(&self, player: &str, surface: Surface) -> RecentForm {
        let results: Vec<FormEntry> = self
            .store
            .history(player)
            .take(self.form_window)
            .cloned()
            .collect();
        let wins = results.iter().filter(|r| r.won).count() as u32;

        let (surface_wins, surface_losses) = self
            .store
            .surface_history(player, surface)
            .take(self.form_window)
            .fold((0, 0), |(w, l), r| if r.won { (w + 1, l) } else { (w, l + 1) });

        RecentForm {
            losses: results.len() as u32 - wins,
            wins,
            results,
            surface_wins,
            surface_losses,
        }
    }

    pub fn player_profile(&self, player: &str, surface: Surface) -> PlayerProfile {
        PlayerProfile {
            player: player.to_string(),
            surface_ratings: Surface::ALL
                .iter()
                .map(|&s| (s, self.store.rating(player, s)))
                .collect(),
            overall_rating: self.store.overall_rating(player),
            total_matches: self.store.total_matches(player),
            recent_form: self.recent_form(player, surface),
        }
    }

    /// Every rated player in name order
    pub fn player_index(&self) -> Vec<PlayerSummary> {
        self.store
            .players()
            .into_iter()
            .map(|name| PlayerSummary {
                player: name.to_string(),
                overall_rating: self.store.overall_rating(name),
                total_matches: self.store.total_matches(name),
            })
            .collect()
    }

    /// Top `limit` players on a surface, highest rating first
    pub fn leaderboard(&self, surface: Surface, limit: usize) -> Vec<LeaderboardRow> {
        let mut rows: Vec<LeaderboardRow> = self
            .store
            .surface_entries(surface)
            .map(|(name, entry)| LeaderboardRow {
                player: name.to_string(),
                rating: entry.rating,
                matches_played: entry.matches_played,
            })
            .collect();
        rows.sort_by(|a, b| {
            b.rating
                .total_cmp(&a.rating)
                .then_with(|| a.player.cmp(&b.player))
        });
        rows.truncate(limit);
        rows
    }
}
