use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap, VecDeque};

use super::types::{FormEntry, RatingEntry, RatingValue};
use crate::config::RatingSettings;
use crate::domain::{PlayerId, Surface};

/// Everything known about one player
#[derive(Debug, Clone, PartialEq)]
struct PlayerRecord {
    surfaces: BTreeMap<Surface, RatingEntry>,
    overall: RatingValue,
    total_matches: u32,
    history: VecDeque<FormEntry>,
    surface_history: BTreeMap<Surface, VecDeque<FormEntry>>,
}

impl PlayerRecord {
    fn new(baseline: RatingValue) -> Self {
        Self {
            surfaces: BTreeMap::new(),
            overall: baseline,
            total_matches: 0,
            history: VecDeque::new(),
            surface_history: BTreeMap::new(),
        }
    }
}

/// Per-surface ratings, overall ratings and recent results for every player.
///
/// Built by [`crate::rating::EloEngine`]; read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingStore {
    baseline: RatingValue,
    history_limit: usize,
    players: HashMap<PlayerId, PlayerRecord>,
    latest_match_date: Option<NaiveDate>,
}

impl RatingStore {
    pub fn new(settings: &RatingSettings) -> Self {
        Self {
            baseline: settings.baseline_rating,
            history_limit: settings.history_limit,
            players: HashMap::new(),
            latest_match_date: None,
        }
    }

    pub fn entry(&self, player: &str, surface: Surface) -> Option<&RatingEntry> {
        self.players.get(player)?.surfaces.get(&surface)
    }

    /// Surface rating; unseen players sit at the baseline
    pub fn rating(&self, player: &str, surface: Surface) -> RatingValue {
        self.entry(player, surface)
            .map(|e| e.rating)
            .unwrap_or(self.baseline)
    }

    pub fn overall_rating(&self, player: &str) -> RatingValue {
        self.players
            .get(player)
            .map(|p| p.overall)
            .unwrap_or(self.baseline)
    }

    pub fn total_matches(&self, player: &str) -> u32 {
        self.players.get(player).map(|p| p.total_matches).unwrap_or(0)
    }

    pub fn contains(&self, player: &str) -> bool {
        self.players.contains_key(player)
    }

    /// Results, most recent first
    pub fn history(&self, player: &str) -> impl Iterator<Item = &FormEntry> {
        self.players
            .get(player)
            .into_iter()
            .flat_map(|p| p.history.iter().rev())
    }

    /// Results on one surface, most recent first. Kept apart from
    /// [`Self::history`] so play elsewhere never pushes them out.
    pub fn surface_history(
        &self,
        player: &str,
        surface: Surface,
    ) -> impl Iterator<Item = &FormEntry> {
        self.players
            .get(player)
            .and_then(|p| p.surface_history.get(&surface))
            .into_iter()
            .flat_map(|h| h.iter().rev())
    }

    /// All player names, sorted
    pub fn players(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.players.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Players rated on the given surface
    pub fn surface_entries(&self, surface: Surface) -> impl Iterator<Item = (&str, &RatingEntry)> {
        self.players
            .iter()
            .filter_map(move |(name, p)| p.surfaces.get(&surface).map(|e| (name.as_str(), e)))
    }

    pub fn latest_match_date(&self) -> Option<NaiveDate> {
        self.latest_match_date
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub(crate) fn entry_mut(&mut self, player: &str, surface: Surface) -> &mut RatingEntry {
        let baseline = self.baseline;
        self.record_mut(player)
            .surfaces
            .entry(surface)
            .or_insert_with(|| RatingEntry::new(baseline))
    }

    pub(crate) fn adjust_overall(&mut self, player: &str, delta: RatingValue) {
        self.record_mut(player).overall += delta;
    }

    pub(crate) fn push_result(&mut self, player: &str, entry: FormEntry) {
        let limit = self.history_limit;
        let record = self.record_mut(player);
        record.total_matches += 1;
        if limit == 0 {
            return;
        }
        let by_surface = record.surface_history.entry(entry.surface).or_default();
        push_bounded(by_surface, entry.clone(), limit);
        push_bounded(&mut record.history, entry, limit);
    }

    pub(crate) fn mark_processed(&mut self, date: NaiveDate) {
        self.latest_match_date = Some(self.latest_match_date.map_or(date, |d| d.max(date)));
    }

    fn record_mut(&mut self, player: &str) -> &mut PlayerRecord {
        let baseline = self.baseline;
        self.players
            .entry(player.to_string())
            .or_insert_with(|| PlayerRecord::new(baseline))
    }
}

fn push_bounded(history: &mut VecDeque<FormEntry>, entry: FormEntry, limit: usize) {
    if history.len() == limit {
        history.pop_front();
    }
    history.push_back(entry);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_unknown_players_sit_at_baseline() {
        let store = RatingStore::new(&RatingSettings::default());

        assert_eq!(store.rating("Nobody", Surface::Clay), 1500.0);
        assert_eq!(store.overall_rating("Nobody"), 1500.0);
        assert!(store.entry("Nobody", Surface::Clay).is_none());
        assert_eq!(store.history("Nobody").count(), 0);
    }

    #[test]
    fn test_entries_are_created_lazily_per_surface() {
        let mut store = RatingStore::new(&RatingSettings::default());
        store.entry_mut("A", Surface::Grass).record(10.0, date(2024, 6, 30));

        assert_eq!(store.rating("A", Surface::Grass), 1510.0);
        assert!(store.entry("A", Surface::Hard).is_none());
        assert_eq!(store.surface_entries(Surface::Grass).count(), 1);
        assert_eq!(store.surface_entries(Surface::Clay).count(), 0);
    }

    #[test]
    fn test_history_is_bounded_and_newest_first() {
        let settings = RatingSettings {
            history_limit: 3,
            ..RatingSettings::default()
        };
        let mut store = RatingStore::new(&settings);

        for day in 1..=5 {
            store.push_result(
                "A",
                FormEntry {
                    date: date(2024, 1, day),
                    surface: Surface::Hard,
                    opponent: "B".to_string(),
                    won: day % 2 == 0,
                },
            );
        }

        let days: Vec<u32> = store
            .history("A")
            .map(|e| chrono::Datelike::day(&e.date))
            .collect();
        assert_eq!(days, vec![5, 4, 3]);
        assert_eq!(store.total_matches("A"), 5);
    }

    #[test]
    fn test_surface_history_survives_play_elsewhere() {
        let settings = RatingSettings {
            history_limit: 4,
            ..RatingSettings::default()
        };
        let mut store = RatingStore::new(&settings);
        let result = |day: u32, surface: Surface| FormEntry {
            date: date(2024, 3, day),
            surface,
            opponent: "B".to_string(),
            won: true,
        };

        for day in 1..=2 {
            store.push_result("A", result(day, Surface::Clay));
        }
        for day in 3..=10 {
            store.push_result("A", result(day, Surface::Hard));
        }

        assert!(store.history("A").all(|e| e.surface == Surface::Hard));
        assert_eq!(store.surface_history("A", Surface::Clay).count(), 2);
        assert_eq!(store.surface_history("A", Surface::Hard).count(), 4);
        assert_eq!(store.surface_history("A", Surface::Grass).count(), 0);
        assert_eq!(store.total_matches("A"), 10);
    }
}
