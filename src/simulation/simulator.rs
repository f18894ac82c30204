use log::{debug, info};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use super::bracket::{BracketState, Entrant, MatchSlot, Slot, round_sizes};
use super::random::RandomSource;
use crate::config::SimulationSettings;
use crate::domain::{PlayerId, Surface};
use crate::errors::SimulationError;
use crate::prediction::PredictionService;
use crate::rating::RatingValue;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub surface: Surface,
    pub trials: usize,
    pub championship_probability: BTreeMap<PlayerId, f64>,
    pub per_match_upset_rate: BTreeMap<MatchSlot, f64>,
}

impl SimulationReport {
    /// Title odds, favourite first
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self
            .championship_probability
            .iter()
            .map(|(name, &p)| (name.as_str(), p))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}

/// First-round match whose favourite is not a safe pick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpsetRisk {
    pub slot: MatchSlot,
    pub favorite: PlayerId,
    pub underdog: PlayerId,
    pub favorite_prob: f64,
}

/// Validated draw with ratings looked up once
struct Field<'e> {
    entrants: &'e [Entrant],
    ratings: Vec<RatingValue>,
    rounds: Vec<usize>,
}

impl Field<'_> {
    fn name(&self, idx: usize) -> &str {
        self.entrants[idx].name().unwrap_or_default()
    }
}

/// Titles per entrant and upsets per match slot
#[derive(Debug, Clone)]
struct Tally {
    titles: Vec<u64>,
    upsets: Vec<Vec<u64>>,
}

impl Tally {
    fn new(field: &Field<'_>) -> Self {
        Self {
            titles: vec![0; field.entrants.len()],
            upsets: field.rounds.iter().map(|&n| vec![0; n]).collect(),
        }
    }

    fn merge(mut self, other: Tally) -> Tally {
        for (a, b) in self.titles.iter_mut().zip(other.titles) {
            *a += b;
        }
        for (round, other_round) in self.upsets.iter_mut().zip(other.upsets) {
            for (a, b) in round.iter_mut().zip(other_round) {
                *a += b;
            }
        }
        self
    }
}

/// Monte Carlo runner for single-elimination draws
pub struct TournamentSimulator<'a> {
    predictor: PredictionService<'a>,
    settings: SimulationSettings,
}

impl<'a> TournamentSimulator<'a> {
    pub fn new(predictor: PredictionService<'a>, settings: SimulationSettings) -> Self {
        Self {
            predictor,
            settings,
        }
    }

    /// Run `trials` independent draws in parallel.
    ///
    /// Every trial gets its own generator seeded from a master generator, so
    /// a configured seed reproduces the report exactly.
    pub fn simulate(
        &self,
        entrants: &[Entrant],
        surface: Surface,
        trials: usize,
    ) -> Result<SimulationReport, SimulationError> {
        let field = self.prepare(entrants, surface, trials)?;

        let mut master = match self.settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let seeds: Vec<u64> = (0..trials).map(|_| master.next_u64()).collect();

        info!(
            "Simulating {}-slot draw on {} ({} trials)",
            entrants.len(),
            surface,
            trials
        );

        let tally = seeds
            .par_iter()
            .fold(
                || Tally::new(&field),
                |mut tally, &seed| {
                    let mut rng = StdRng::seed_from_u64(seed);
                    self.play_trial(&field, surface, &mut rng, &mut tally);
                    tally
                },
            )
            .reduce(|| Tally::new(&field), Tally::merge);

        Ok(self.report(&field, surface, trials, tally))
    }

    /// Run `trials` draws one after another on a caller-supplied source
    pub fn simulate_with<S: RandomSource + ?Sized>(
        &self,
        entrants: &[Entrant],
        surface: Surface,
        trials: usize,
        source: &mut S,
    ) -> Result<SimulationReport, SimulationError> {
        let field = self.prepare(entrants, surface, trials)?;
        let mut tally = Tally::new(&field);
        for _ in 0..trials {
            self.play_trial(&field, surface, &mut *source, &mut tally);
        }
        Ok(self.report(&field, surface, trials, tally))
    }

    /// Title odds proportional to `2^(rating / 400)`, no simulation
    pub fn strength_share(
        &self,
        players: &[PlayerId],
        surface: Surface,
    ) -> BTreeMap<PlayerId, f64> {
        let strengths: Vec<f64> = players
            .iter()
            .map(|p| 2f64.powf(self.predictor.rating(p, surface) / 400.0))
            .collect();
        let total: f64 = strengths.iter().sum();

        players
            .iter()
            .zip(strengths)
            .map(|(p, s)| {
                let share = if total > 0.0 { s / total } else { 0.0 };
                (p.clone(), share)
            })
            .collect()
    }

    /// Opening matches the favourite wins with probability below the
    /// configured threshold, shakiest first
    pub fn opening_round_risks(&self, entrants: &[Entrant], surface: Surface) -> Vec<UpsetRisk> {
        let mut risks: Vec<UpsetRisk> = entrants
            .chunks(2)
            .enumerate()
            .filter_map(|(position, pair)| {
                let a = pair.first()?.name()?;
                let b = pair.get(1)?.name()?;
                let prob_a = self.predictor.win_probability(a, b, surface);
                let (favorite, underdog, favorite_prob) = if prob_a >= 0.5 {
                    (a, b, prob_a)
                } else {
                    (b, a, 1.0 - prob_a)
                };
                (favorite_prob < self.settings.upset_risk_threshold).then(|| UpsetRisk {
                    slot: MatchSlot { round: 1, position },
                    favorite: favorite.to_string(),
                    underdog: underdog.to_string(),
                    favorite_prob,
                })
            })
            .collect();
        risks.sort_by(|a, b| a.favorite_prob.total_cmp(&b.favorite_prob));
        risks
    }

    fn prepare<'e>(
        &self,
        entrants: &'e [Entrant],
        surface: Surface,
        trials: usize,
    ) -> Result<Field<'e>, SimulationError> {
        if trials == 0 {
            return Err(SimulationError::NoTrials);
        }
        if !self.settings.supports(entrants.len()) {
            return Err(SimulationError::InvalidBracketSize {
                players: entrants.len(),
                supported: self.settings.bracket_sizes.clone(),
            });
        }

        let mut seen = HashSet::new();
        for name in entrants.iter().filter_map(Entrant::name) {
            if !seen.insert(name) {
                return Err(SimulationError::DuplicatePlayer(name.to_string()));
            }
        }
        if seen.is_empty() {
            return Err(SimulationError::EmptyBracket);
        }

        let ratings = entrants
            .iter()
            .map(|e| {
                e.name()
                    .map(|n| self.predictor.rating(n, surface))
                    .unwrap_or_default()
            })
            .collect();
        debug!("Draw of {} entrants, {} players", entrants.len(), seen.len());

        Ok(Field {
            entrants,
            ratings,
            rounds: round_sizes(entrants.len()),
        })
    }

    fn play_trial<S: RandomSource + ?Sized>(
        &self,
        field: &Field<'_>,
        surface: Surface,
        source: &mut S,
        tally: &mut Tally,
    ) {
        let mut bracket = BracketState::seed(field.entrants);

        while !bracket.is_complete() {
            let round = bracket.rounds_played();
            let winners: Vec<Slot> = bracket
                .current()
                .chunks(2)
                .enumerate()
                .map(|(position, pair)| {
                    let (winner, upset) =
                        self.play_match(field, surface, pair[0], pair[1], &mut *source);
                    if upset {
                        tally.upsets[round][position] += 1;
                    }
                    winner
                })
                .collect();
            bracket.push_round(winners);
        }

        if let Some(champion) = bracket.champion() {
            tally.titles[champion] += 1;
        }
    }

    /// Winner of one pairing and whether it was an upset
    fn play_match<S: RandomSource + ?Sized>(
        &self,
        field: &Field<'_>,
        surface: Surface,
        a: Slot,
        b: Slot,
        source: &mut S,
    ) -> (Slot, bool) {
        let (a, b) = match (a, b) {
            (Some(a), Some(b)) => (a, b),
            // a bye hands the other slot through without a draw
            (occupant, None) | (None, occupant) => return (occupant, false),
        };

        let prob_a = self
            .predictor
            .win_probability(field.name(a), field.name(b), surface);
        let (winner, loser) = if source.next_unit() < prob_a {
            (a, b)
        } else {
            (b, a)
        };
        (Some(winner), field.ratings[winner] < field.ratings[loser])
    }

    fn report(
        &self,
        field: &Field<'_>,
        surface: Surface,
        trials: usize,
        tally: Tally,
    ) -> SimulationReport {
        let trials_f = trials as f64;

        let championship_probability = field
            .entrants
            .iter()
            .zip(&tally.titles)
            .filter_map(|(e, &titles)| e.name().map(|n| (n.to_string(), titles as f64 / trials_f)))
            .collect();

        let per_match_upset_rate = tally
            .upsets
            .iter()
            .enumerate()
            .flat_map(|(round, counts)| {
                counts.iter().enumerate().map(move |(position, &count)| {
                    let slot = MatchSlot {
                        round: round + 1,
                        position,
                    };
                    (slot, count as f64 / trials_f)
                })
            })
            .collect();

        SimulationReport {
            surface,
            trials,
            championship_probability,
            per_match_upset_rate,
        }
    }
}
