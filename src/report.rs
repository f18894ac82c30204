//! Terminal output for the command line front end.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use crate::domain::Surface;
use crate::prediction::{LeaderboardRow, PlayerProfile, PlayerSummary, Prediction, RecentForm};
use crate::simulation::{SimulationReport, UpsetRisk};

/// Everything `simulate` prints in JSON mode
#[derive(Debug, Serialize)]
pub struct SimulationOutput<'a> {
    pub simulation: &'a SimulationReport,
    pub opening_round_risks: &'a [UpsetRisk],
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

pub fn print_leaderboard(surface: Surface, rows: &[LeaderboardRow]) {
    println!("\n{}", format!("=== {} court ratings ===", surface).bold());
    println!("{:<4} {:<30} {:>8} {:>8}", "#", "Player", "Elo", "Matches");
    println!("{}", "-".repeat(54));
    for (idx, row) in rows.iter().enumerate() {
        println!(
            "{:<4} {:<30} {:>8.1} {:>8}",
            idx + 1,
            row.player,
            row.rating,
            row.matches_played
        );
    }
    println!();
}

pub fn print_players(players: &[PlayerSummary]) {
    println!("\n{}", format!("=== {} players ===", players.len()).bold());
    for p in players {
        println!(
            "  {:<30} {:>8.1} {:>6} matches",
            p.player, p.overall_rating, p.total_matches
        );
    }
    println!();
}

pub fn print_profile(profile: &PlayerProfile, surface: Surface) {
    println!("\n{}", profile.player.bold());
    println!("  Overall Elo: {:.1}", profile.overall_rating);
    for (s, rating) in &profile.surface_ratings {
        println!("  {:<12} {:.1}", s.as_str(), rating);
    }
    println!("  Matches:     {}", profile.total_matches);
    print_form("  Recent form", &profile.recent_form, surface);
    println!();
}

pub fn print_prediction(prediction: &Prediction) {
    let (a, b) = (&prediction.player_a, &prediction.player_b);
    println!("\n{} vs {} on {}", a.bold(), b.bold(), prediction.surface);
    println!(
        "  {:<30} {:>6.1}%  (Elo {:.1})",
        a,
        prediction.prob_a * 100.0,
        prediction.rating_a
    );
    println!(
        "  {:<30} {:>6.1}%  (Elo {:.1})",
        b,
        prediction.prob_b * 100.0,
        prediction.rating_b
    );

    let h2h = &prediction.head_to_head;
    println!(
        "  Head-to-head: {}-{} overall, {}-{} on {}",
        h2h.overall.wins_a,
        h2h.overall.wins_b,
        h2h.on_surface.wins_a,
        h2h.on_surface.wins_b,
        prediction.surface
    );
    print_form(&format!("  {a}"), &prediction.form_a, prediction.surface);
    print_form(&format!("  {b}"), &prediction.form_b, prediction.surface);
    println!();
}

pub fn print_simulation(report: &SimulationReport, risks: &[UpsetRisk]) {
    println!(
        "\n{}",
        format!("=== Title odds on {} ({} trials) ===", report.surface, report.trials).bold()
    );
    for (player, prob) in report.ranked() {
        println!("  {:<30} {:>6.1}%", player, prob * 100.0);
    }

    let mut upsets: Vec<_> = report
        .per_match_upset_rate
        .iter()
        .filter(|&(_, &rate)| rate > 0.0)
        .collect();
    upsets.sort_by(|a, b| b.1.total_cmp(a.1));
    if !upsets.is_empty() {
        println!("\n{}", "Most upset-prone slots".bold());
        for (slot, rate) in upsets.iter().take(5) {
            println!("  {:<8} {:>6.1}%", slot.to_string(), *rate * 100.0);
        }
    }

    if !risks.is_empty() {
        println!("\n{}", "Opening-round upset risks".bold());
        for risk in risks {
            println!(
                "  {} {} over {} ({:.1}%)",
                risk.slot,
                risk.favorite,
                risk.underdog,
                risk.favorite_prob * 100.0
            );
        }
    }
    println!();
}

fn print_form(label: &str, form: &RecentForm, surface: Surface) {
    let streak: String = form
        .results
        .iter()
        .map(|r| {
            if r.won {
                "W".green().to_string()
            } else {
                "L".red().to_string()
            }
        })
        .collect();
    println!(
        "{}: {}-{} [{}], {}-{} on {}",
        label, form.wins, form.losses, streak, form.surface_wins, form.surface_losses, surface
    );
}
