use chrono::NaiveDate;
use log::{debug, info};

use super::head_to_head::HeadToHead;
use super::store::RatingStore;
use super::types::{FormEntry, Meeting, RatingValue};
use super::weighting::calculate_weight;
use crate::config::RatingSettings;
use crate::domain::MatchRecord;
use crate::errors::OrderingError;

/// Probability that a player rated `ra` beats a player rated `rb`
pub fn expected_score(ra: RatingValue, rb: RatingValue) -> f64 {
    1.0 / (1.0 + 10f64.powf((rb - ra) / 400.0))
}

/// Surface Elo with recency-weighted K-factor
#[derive(Debug, Clone)]
pub struct EloEngine {
    settings: RatingSettings,
}

impl EloEngine {
    pub fn new(settings: RatingSettings) -> Self {
        Self { settings }
    }

    pub fn recency_weight(&self, match_date: NaiveDate, as_of: NaiveDate) -> f64 {
        calculate_weight(match_date, as_of, self.settings.half_life_days)
    }

    pub fn effective_k(&self, match_date: NaiveDate, as_of: NaiveDate) -> f64 {
        self.settings.k_factor * self.recency_weight(match_date, as_of)
    }

    /// Apply `matches` to the store and head-to-head book.
    ///
    /// `matches` must be sorted by date and must not start before the last
    /// match already in `store`. A store that already holds matches only
    /// takes more when `as_of` is configured. The batch is checked up
    /// front; on error nothing is applied.
    pub fn process(
        &self,
        matches: &[MatchRecord],
        store: &mut RatingStore,
        head_to_head: &mut HeadToHead,
    ) -> Result<(), OrderingError> {
        let Some(last) = matches.last() else {
            return Ok(());
        };
        if let (None, Some(latest)) = (self.settings.as_of, store.latest_match_date()) {
            return Err(OrderingError::UnanchoredFollowUp { latest });
        }
        check_order(matches, store.latest_match_date())?;

        let as_of = self.settings.as_of.unwrap_or(last.date());
        info!(
            "Processing {} matches (recency reference {})",
            matches.len(),
            as_of
        );

        for record in matches {
            self.apply(record, as_of, store, head_to_head);
        }

        debug!(
            "Store holds {} players, {} head-to-head pairs",
            store.len(),
            head_to_head.pair_count()
        );
        Ok(())
    }

    /// Rating change for the winner; the loser gets the negation
    pub fn rating_delta(
        &self,
        winner_rating: RatingValue,
        loser_rating: RatingValue,
        match_date: NaiveDate,
        as_of: NaiveDate,
    ) -> RatingValue {
        let expected = expected_score(winner_rating, loser_rating);
        self.effective_k(match_date, as_of) * (1.0 - expected)
    }

    fn apply(
        &self,
        record: &MatchRecord,
        as_of: NaiveDate,
        store: &mut RatingStore,
        head_to_head: &mut HeadToHead,
    ) {
        let (winner, loser, surface, date) =
            (record.winner(), record.loser(), record.surface(), record.date());

        let winner_rating = store.entry_mut(winner, surface).rating;
        let loser_rating = store.entry_mut(loser, surface).rating;
        let delta = self.rating_delta(winner_rating, loser_rating, date, as_of);

        store.entry_mut(winner, surface).record(delta, date);
        store.entry_mut(loser, surface).record(-delta, date);

        let bleed = self.settings.overall_bleed * delta;
        store.adjust_overall(winner, bleed);
        store.adjust_overall(loser, -bleed);

        store.push_result(
            winner,
            FormEntry {
                date,
                surface,
                opponent: loser.to_string(),
                won: true,
            },
        );
        store.push_result(
            loser,
            FormEntry {
                date,
                surface,
                opponent: winner.to_string(),
                won: false,
            },
        );
        store.mark_processed(date);

        head_to_head.record(
            winner,
            loser,
            Meeting {
                winner: winner.to_string(),
                date,
                surface,
            },
        );
    }
}

fn check_order(
    matches: &[MatchRecord],
    already_processed: Option<NaiveDate>,
) -> Result<(), OrderingError> {
    let mut previous = already_processed;
    for (index, record) in matches.iter().enumerate() {
        if let Some(prev) = previous {
            if record.date() < prev {
                return Err(OrderingError::OutOfOrder {
                    index,
                    previous: prev,
                    current: record.date(),
                });
            }
        }
        previous = Some(record.date());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Surface;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(d: NaiveDate, surface: Surface, winner: &str, loser: &str) -> MatchRecord {
        MatchRecord::new(d, surface, winner, loser, "6-4 6-4", 3, "R32").unwrap()
    }

    fn build(matches: &[MatchRecord]) -> (RatingStore, HeadToHead) {
        let settings = RatingSettings::default();
        let engine = EloEngine::new(settings.clone());
        let mut store = RatingStore::new(&settings);
        let mut h2h = HeadToHead::new();
        engine.process(matches, &mut store, &mut h2h).unwrap();
        (store, h2h)
    }

    #[test]
    fn test_expected_score() {
        assert!((expected_score(1500.0, 1500.0) - 0.5).abs() < 1e-12);
        assert!((expected_score(1900.0, 1500.0) - 10.0 / 11.0).abs() < 1e-12);
        let sum = expected_score(1620.0, 1480.0) + expected_score(1480.0, 1620.0);
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_first_win_moves_sixteen_points() {
        let (store, h2h) = build(&[record(date(2024, 1, 15), Surface::Hard, "A", "B")]);

        assert!((store.rating("A", Surface::Hard) - 1516.0).abs() < 1e-9);
        assert!((store.rating("B", Surface::Hard) - 1484.0).abs() < 1e-9);

        let a = store.entry("A", Surface::Hard).unwrap();
        assert_eq!(a.matches_played, 1);
        assert_eq!(a.last_match_date, Some(date(2024, 1, 15)));
        assert_eq!(h2h.summary("A", "B", None).wins_a, 1);
    }

    #[test]
    fn test_update_is_zero_sum() {
        let matches = vec![
            record(date(2022, 2, 1), Surface::Clay, "A", "B"),
            record(date(2023, 4, 1), Surface::Clay, "C", "A"),
            record(date(2023, 9, 1), Surface::Clay, "B", "C"),
            record(date(2024, 1, 1), Surface::Clay, "A", "C"),
        ];
        let (store, _) = build(&matches);

        let total: f64 = ["A", "B", "C"]
            .iter()
            .map(|p| store.rating(p, Surface::Clay))
            .sum();
        assert!((total - 3.0 * 1500.0).abs() < 1e-9);

        let overall: f64 = ["A", "B", "C"].iter().map(|p| store.overall_rating(p)).sum();
        assert!((overall - 3.0 * 1500.0).abs() < 1e-9);
    }

    #[test]
    fn test_surfaces_are_independent() {
        let (store, _) = build(&[
            record(date(2024, 1, 1), Surface::Clay, "A", "B"),
            record(date(2024, 1, 2), Surface::Clay, "A", "B"),
        ]);

        assert!(store.rating("A", Surface::Clay) > 1500.0);
        assert_eq!(store.rating("A", Surface::Grass), 1500.0);
        assert!(store.entry("A", Surface::Hard).is_none());
        // Overall rating only moves by the bleed share
        let clay_gain = store.rating("A", Surface::Clay) - 1500.0;
        let overall_gain = store.overall_rating("A") - 1500.0;
        assert!((overall_gain - 0.2 * clay_gain).abs() < 1e-9);
    }

    #[test]
    fn test_replay_is_deterministic() {
        let matches = vec![
            record(date(2021, 5, 1), Surface::Clay, "A", "B"),
            record(date(2022, 7, 1), Surface::Grass, "B", "C"),
            record(date(2022, 7, 1), Surface::Grass, "C", "A"),
            record(date(2024, 3, 1), Surface::Hard, "A", "C"),
        ];
        let (first, first_h2h) = build(&matches);
        let (second, second_h2h) = build(&matches);

        assert_eq!(first, second);
        assert_eq!(first_h2h, second_h2h);
        for player in ["A", "B", "C"] {
            for surface in Surface::ALL {
                let a = first.rating(player, surface).to_bits();
                let b = second.rating(player, surface).to_bits();
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn test_older_matches_move_ratings_less() {
        let engine = EloEngine::new(RatingSettings::default());
        let as_of = date(2024, 12, 31);

        let recent = engine.effective_k(date(2024, 12, 1), as_of);
        let old = engine.effective_k(date(2020, 12, 1), as_of);
        assert!(old <= recent);
        assert!(recent <= 32.0);

        let old_delta = engine.rating_delta(1500.0, 1500.0, date(2023, 1, 1), as_of);
        assert!((old_delta - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_configured_reference_date() {
        let settings = RatingSettings {
            as_of: Some(date(2026, 1, 15)),
            ..RatingSettings::default()
        };
        let engine = EloEngine::new(settings.clone());
        let mut store = RatingStore::new(&settings);
        let mut h2h = HeadToHead::new();
        // 730 days before the reference date
        let matches = [record(date(2024, 1, 16), Surface::Hard, "A", "B")];
        engine.process(&matches, &mut store, &mut h2h).unwrap();

        assert!((store.rating("A", Surface::Hard) - 1508.0).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_order_batch_is_rejected_untouched() {
        let settings = RatingSettings::default();
        let engine = EloEngine::new(settings.clone());
        let mut store = RatingStore::new(&settings);
        let mut h2h = HeadToHead::new();

        let matches = vec![
            record(date(2024, 2, 1), Surface::Hard, "A", "B"),
            record(date(2024, 1, 1), Surface::Hard, "B", "A"),
        ];
        let err = engine.process(&matches, &mut store, &mut h2h).unwrap_err();

        assert_eq!(
            err,
            OrderingError::OutOfOrder {
                index: 1,
                previous: date(2024, 2, 1),
                current: date(2024, 1, 1),
            }
        );
        assert!(store.is_empty());
        assert_eq!(h2h.pair_count(), 0);
    }

    #[test]
    fn test_batch_older_than_store_is_rejected() {
        let settings = RatingSettings {
            as_of: Some(date(2024, 12, 31)),
            ..RatingSettings::default()
        };
        let engine = EloEngine::new(settings.clone());
        let mut store = RatingStore::new(&settings);
        let mut h2h = HeadToHead::new();

        let first = [record(date(2024, 6, 1), Surface::Hard, "A", "B")];
        engine.process(&first, &mut store, &mut h2h).unwrap();
        let snapshot = store.clone();

        let stale = [record(date(2024, 5, 1), Surface::Hard, "B", "A")];
        let err = engine.process(&stale, &mut store, &mut h2h).unwrap_err();
        assert!(matches!(err, OrderingError::OutOfOrder { index: 0, .. }));
        assert_eq!(store, snapshot);

        let same_day = [record(date(2024, 6, 1), Surface::Hard, "C", "A")];
        assert!(engine.process(&same_day, &mut store, &mut h2h).is_ok());
    }

    #[test]
    fn test_follow_up_batch_needs_reference_date() {
        let (mut store, mut h2h) = build(&[record(date(2020, 1, 1), Surface::Hard, "A", "B")]);
        let snapshot = store.clone();

        let engine = EloEngine::new(RatingSettings::default());
        let later = [record(date(2024, 1, 1), Surface::Hard, "C", "D")];
        let err = engine.process(&later, &mut store, &mut h2h).unwrap_err();

        assert_eq!(
            err,
            OrderingError::UnanchoredFollowUp {
                latest: date(2020, 1, 1)
            }
        );
        assert_eq!(store, snapshot);
        // Nothing to apply is never an error
        assert!(engine.process(&[], &mut store, &mut h2h).is_ok());
    }

    #[test]
    fn test_split_batches_rate_like_one_batch() {
        let settings = RatingSettings {
            as_of: Some(date(2024, 1, 1)),
            ..RatingSettings::default()
        };
        let engine = EloEngine::new(settings.clone());
        let early = record(date(2020, 1, 1), Surface::Hard, "A", "B");
        let late = record(date(2024, 1, 1), Surface::Hard, "C", "D");

        let mut whole = RatingStore::new(&settings);
        let mut whole_h2h = HeadToHead::new();
        engine
            .process(&[early.clone(), late.clone()], &mut whole, &mut whole_h2h)
            .unwrap();

        let mut split = RatingStore::new(&settings);
        let mut split_h2h = HeadToHead::new();
        engine.process(&[early], &mut split, &mut split_h2h).unwrap();
        engine.process(&[late], &mut split, &mut split_h2h).unwrap();

        assert_eq!(whole, split);
        assert_eq!(whole_h2h, split_h2h);
        assert!(whole.rating("A", Surface::Hard) < 1505.0);
        assert!((whole.rating("C", Surface::Hard) - 1516.0).abs() < 1e-9);
    }

    #[test]
    fn test_recent_results_are_recorded() {
        let (store, _) = build(&[
            record(date(2024, 1, 1), Surface::Hard, "A", "B"),
            record(date(2024, 2, 1), Surface::Clay, "C", "A"),
        ]);

        let history: Vec<_> = store.history("A").collect();
        assert_eq!(history.len(), 2);
        assert!(!history[0].won);
        assert_eq!(history[0].opponent, "C");
        assert!(history[1].won);
        assert_eq!(store.total_matches("A"), 2);
    }
}
