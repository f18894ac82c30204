pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod prediction;
pub mod rating;
pub mod report;
pub mod services;
pub mod simulation;

use anyhow::{Result, bail};
use clap::Parser;
use cli::{Cli, DataArgs};

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::domain::{Surface, normalize_name};
use crate::services::processing::{ProcessingService, RatingModel};
use crate::simulation::Entrant;

pub fn interpret() -> Cli {
    Cli::parse()
}

fn load_model(data: &DataArgs, config: AppConfig) -> Result<RatingModel> {
    if data.csv.is_empty() {
        bail!("At least one --csv match file is required");
    }
    ProcessingService::new(config).run(&data.csv)
}

fn load_config(data: &DataArgs) -> Result<AppConfig> {
    AppConfig::load_or_default(data.config.as_ref())
}

pub fn handle_ratings(data: &DataArgs, surface: Surface, top: usize) -> Result<()> {
    let model = load_model(data, load_config(data)?)?;
    let rows = model.predictor().leaderboard(surface, top);
    if data.json {
        report::print_json(&rows)
    } else {
        report::print_leaderboard(surface, &rows);
        Ok(())
    }
}

pub fn handle_players(data: &DataArgs) -> Result<()> {
    let model = load_model(data, load_config(data)?)?;
    let players = model.predictor().player_index();
    if data.json {
        report::print_json(&players)
    } else {
        report::print_players(&players);
        Ok(())
    }
}

pub fn handle_profile(data: &DataArgs, player: &str, surface: Surface) -> Result<()> {
    let model = load_model(data, load_config(data)?)?;
    let player = normalize_name(player);
    if !model.store().contains(&player) {
        log::warn!("{} has no recorded matches; showing baseline values", player);
    }
    let profile = model.predictor().player_profile(&player, surface);
    if data.json {
        report::print_json(&profile)
    } else {
        report::print_profile(&profile, surface);
        Ok(())
    }
}

pub fn handle_predict(
    data: &DataArgs,
    player_a: &str,
    player_b: &str,
    surface: Surface,
) -> Result<()> {
    let model = load_model(data, load_config(data)?)?;
    let prediction =
        model
            .predictor()
            .predict(&normalize_name(player_a), &normalize_name(player_b), surface);
    if data.json {
        report::print_json(&prediction)
    } else {
        report::print_prediction(&prediction);
        Ok(())
    }
}

pub fn handle_simulate(
    data: &DataArgs,
    players: &[String],
    surface: Surface,
    trials: Option<usize>,
    seed: Option<u64>,
) -> Result<()> {
    let mut config = load_config(data)?;
    if seed.is_some() {
        config.simulation.seed = seed;
    }
    let trials = trials.unwrap_or(config.simulation.default_trials);
    let model = load_model(data, config)?;

    let entrants: Vec<Entrant> = players.iter().map(|p| Entrant::parse(p)).collect();
    let simulator = model.simulator();
    let simulation = simulator.simulate(&entrants, surface, trials)?;
    let risks = simulator.opening_round_risks(&entrants, surface);

    if data.json {
        report::print_json(&report::SimulationOutput {
            simulation: &simulation,
            opening_round_risks: &risks,
        })
    } else {
        report::print_simulation(&simulation, &risks);
        Ok(())
    }
}

pub fn execute(cli: &Cli) -> Result<()> {
    let data = &cli.data;
    match &cli.command {
        Command::Ratings { surface, top } => handle_ratings(data, *surface, *top),
        Command::Players => handle_players(data),
        Command::Profile { player, surface } => handle_profile(data, player, *surface),
        Command::Predict {
            player_a,
            player_b,
            surface,
        } => handle_predict(data, player_a, player_b, *surface),
        Command::Simulate {
            players,
            surface,
            trials,
            seed,
        } => handle_simulate(data, players, *surface, *trials, *seed),
    }
}
