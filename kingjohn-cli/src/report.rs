use anyhow::Result;
use colored::Colorize;
use kingjohn_game::{
    Date, GameState, ResourceSummary, SaveMetadata, final_score, format_location_name,
    weather_flavor,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

use crate::session::{DayEffect, Ending, FeastRecord, RunOutcome};

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub start_date: String,
    pub end_date: String,
    pub season: String,
    pub location: String,
    pub traveling_to: Option<String>,
    pub difficulty: String,
    pub ending: Ending,
    pub headline: String,
    pub days_simulated: u32,
    pub days_played: u32,
    pub resources: ResourceSummary,
    pub barons: BTreeMap<String, i32>,
    pub regions: BTreeMap<String, i32>,
    pub final_score: Option<i64>,
    pub effects: Vec<DayEffect>,
    pub feasts: Vec<FeastRecord>,
}

impl RunReport {
    pub fn build(start: Date, state: &GameState, outcome: RunOutcome) -> Self {
        let headline = match outcome.ending {
            Ending::GameOver { reason } => reason.headline().to_string(),
            Ending::YearComplete => {
                "The year 1205 is survived; the crown and the kingdom endure.".to_string()
            }
            Ending::DayLimit => format!("The court rests at {}.", state.current_date.format_long()),
        };
        Self {
            start_date: start.format_long(),
            end_date: state.current_date.format_long(),
            season: state.current_date.season().to_string(),
            location: format_location_name(&state.location),
            traveling_to: state.traveling_to.as_deref().map(format_location_name),
            difficulty: state.difficulty.to_string(),
            ending: outcome.ending,
            headline,
            days_simulated: outcome.days_simulated,
            days_played: state.days_played,
            resources: state.resource_summary(),
            barons: state.barons.clone(),
            regions: state.regions.clone(),
            final_score: matches!(outcome.ending, Ending::YearComplete)
                .then(|| final_score(state)),
            effects: outcome.effects,
            feasts: outcome.feasts,
        }
    }
}

pub fn write_json_report(out: &mut dyn Write, report: &RunReport) -> Result<()> {
    let json_output = serde_json::to_string_pretty(report)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn write_console_report(out: &mut dyn Write, report: &RunReport, weather: &str) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📜 Reign Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "================".cyan())?;
    writeln!(out, "From: {}", report.start_date)?;
    writeln!(out, "To:   {} ({})", report.end_date, report.season)?;
    writeln!(out, "{}", weather.dimmed())?;
    match &report.traveling_to {
        Some(destination) => writeln!(
            out,
            "Location: {} (travelling to {destination})",
            report.location
        )?,
        None => writeln!(out, "Location: {}", report.location)?,
    }
    writeln!(
        out,
        "Days simulated: {} (total {}, {} difficulty)",
        report.days_simulated, report.days_played, report.difficulty
    )?;
    writeln!(out)?;

    writeln!(out, "{}", "💰 Resources".bright_yellow().bold())?;
    writeln!(out, "{}", "-".repeat(30).yellow())?;
    let res = &report.resources;
    let treasury = format!("{} marks", res.treasury);
    if res.treasury < 0 {
        writeln!(out, "Treasury:           {}", treasury.red())?;
    } else {
        writeln!(out, "Treasury:           {}", treasury.green())?;
    }
    writeln!(out, "Royal authority:    {}", stat(res.royal_authority))?;
    writeln!(out, "Military readiness: {}", stat(res.military_readiness))?;
    writeln!(out, "Papal relations:    {:+}", res.papal_relations)?;
    writeln!(out, "Baronial loyalty:   {:.1}", res.average_baronial_loyalty)?;
    writeln!(out, "Kingdom stability:  {:.1}", res.kingdom_stability)?;
    writeln!(out)?;

    writeln!(out, "{}", "🏰 Barons".bright_blue().bold())?;
    for (baron, loyalty) in &report.barons {
        writeln!(out, "  {:25} {}", format_location_name(baron), stat(*loyalty))?;
    }
    writeln!(out, "{}", "🗺  Regions".bright_blue().bold())?;
    for (region, stability) in &report.regions {
        writeln!(out, "  {:25} {}", format_location_name(region), stat(*stability))?;
    }
    writeln!(out)?;

    if !report.feasts.is_empty() {
        writeln!(out, "{}", "⛪ Feasts observed".bright_magenta().bold())?;
        for feast in &report.feasts {
            writeln!(out, "  {}: {}", feast.date, feast.feast)?;
        }
        writeln!(out)?;
    }

    if !report.effects.is_empty() {
        writeln!(out, "{}", "⚖  Consequences".bright_yellow().bold())?;
        for effect in &report.effects {
            writeln!(out, "  {}", effect.date.bold())?;
            for change in &effect.changes {
                writeln!(out, "     • {change}")?;
            }
        }
        writeln!(out)?;
    }

    match report.ending {
        Ending::GameOver { reason } => {
            writeln!(out, "{} {}", "☠ GAME OVER:".red().bold(), reason.to_string().red())?;
            writeln!(out, "{}", report.headline)?;
        }
        Ending::YearComplete => {
            writeln!(out, "{}", "👑 YEAR END".green().bold())?;
            writeln!(out, "{}", report.headline)?;
            if let Some(score) = report.final_score {
                writeln!(out, "Final score: {}", score.to_string().bold())?;
            }
        }
        Ending::DayLimit => writeln!(out, "{}", report.headline)?,
    }
    Ok(())
}

pub fn write_save_list(out: &mut dyn Write, saves: &[SaveMetadata], json: bool) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(saves)?)?;
        return Ok(());
    }
    if saves.is_empty() {
        writeln!(out, "No saved games.")?;
        return Ok(());
    }
    writeln!(out, "Saved games:")?;
    for save in saves {
        writeln!(
            out,
            "  {:10} {} at {} (day {}, {} marks) saved {}",
            save.slot.to_string(),
            save.date,
            save.location,
            save.days_played,
            save.treasury,
            save.timestamp
        )?;
    }
    Ok(())
}

/// Weather line for the report's closing date.
pub fn closing_weather(state: &GameState) -> &'static str {
    weather_flavor(&state.current_date)
}

fn stat(value: i32) -> colored::ColoredString {
    let text = format!("{value}/100");
    if value >= 60 {
        text.green()
    } else if value >= 30 {
        text.yellow()
    } else {
        text.red()
    }
}
