use anyhow::Result;
use log::info;
use std::path::Path;

use crate::config::settings::AppConfig;
use crate::domain::MatchRecord;
use crate::prediction::PredictionService;
use crate::rating::{EloEngine, HeadToHead, RatingStore};
use crate::services::ingestion::IngestionService;
use crate::simulation::TournamentSimulator;

/// Finished rating pass: read-only from here on
pub struct RatingModel {
    config: AppConfig,
    store: RatingStore,
    head_to_head: HeadToHead,
    matches_processed: usize,
}

impl RatingModel {
    pub fn store(&self) -> &RatingStore {
        &self.store
    }

    pub fn head_to_head(&self) -> &HeadToHead {
        &self.head_to_head
    }

    pub fn matches_processed(&self) -> usize {
        self.matches_processed
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn predictor(&self) -> PredictionService<'_> {
        PredictionService::new(&self.store, &self.head_to_head, &self.config.prediction)
    }

    pub fn simulator(&self) -> TournamentSimulator<'_> {
        TournamentSimulator::new(self.predictor(), self.config.simulation.clone())
    }
}

pub struct ProcessingService {
    config: AppConfig,
}

impl ProcessingService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Ingest match files and build ratings from them
    pub fn run<P: AsRef<Path>>(&self, paths: &[P]) -> Result<RatingModel> {
        let matches = IngestionService::new(paths).run()?;
        self.build(&matches)
    }

    /// Build ratings from matches already in chronological order
    pub fn build(&self, matches: &[MatchRecord]) -> Result<RatingModel> {
        info!("=== Starting Rating Pass ===");

        let engine = EloEngine::new(self.config.rating.clone());
        let mut store = RatingStore::new(&self.config.rating);
        let mut head_to_head = HeadToHead::new();
        engine.process(matches, &mut store, &mut head_to_head)?;

        info!(
            "  → Rated {} players from {} matches",
            store.len(),
            matches.len()
        );
        info!("=== Rating Pass Complete ===");

        Ok(RatingModel {
            config: self.config.clone(),
            store,
            head_to_head,
            matches_processed: matches.len(),
        })
    }
}
