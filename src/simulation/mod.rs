//! Monte Carlo simulation of single-elimination draws.

pub mod bracket;
pub mod random;
pub mod simulator;

pub use bracket::{BracketState, Entrant, MatchSlot};
pub use random::{RandomSource, ScriptedSource};
pub use simulator::{SimulationReport, TournamentSimulator, UpsetRisk};
