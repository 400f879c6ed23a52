mod report;
mod schedule;
mod session;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use kingjohn_game::{
    Difficulty, FileStorage, GameEngine, GameState, Gazetteer, SaveSlot, StorageConfig,
    format_location_name,
};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;

use report::{RunReport, closing_weather, write_console_report, write_json_report, write_save_list};
use schedule::Schedule;
use session::LoopOptions;

type Engine = GameEngine<Gazetteer, FileStorage>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Colored human-readable summary
    Console,
    /// Machine-readable JSON
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DifficultyArg {
    Easy,
    Normal,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(value: DifficultyArg) -> Self {
        match value {
            DifficultyArg::Easy => Self::Easy,
            DifficultyArg::Normal => Self::Normal,
            DifficultyArg::Hard => Self::Hard,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "kingjohn", version)]
#[command(about = "King John 1205 - play out the king's year day by day from the command line")]
struct Args {
    /// Maximum days to simulate (stops earlier on game over or year end)
    #[arg(long, default_value_t = 365)]
    days: u32,

    /// Difficulty for a new reign
    #[arg(long, value_enum, default_value_t = DifficultyArg::Normal)]
    difficulty: DifficultyArg,

    /// Continue from a save slot ("autosave" or 1-5) instead of a new reign
    #[arg(long, value_name = "SLOT")]
    load: Option<String>,

    /// Save the final state to this slot
    #[arg(long, value_name = "SLOT")]
    save: Option<String>,

    /// Directory holding save files
    #[arg(long, default_value = "saves")]
    save_dir: PathBuf,

    /// Skip the daily autosave
    #[arg(long)]
    no_autosave: bool,

    /// Set out for this location before the first day
    #[arg(long, value_name = "LOCATION")]
    travel: Option<String>,

    /// Consequence schedule file (repeatable)
    #[arg(long = "consequences", value_name = "FILE")]
    consequences: Vec<PathBuf>,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose logging (debug level unless RUST_LOG says otherwise)
    #[arg(short, long)]
    verbose: bool,

    /// List occupied save slots and exit
    #[arg(long)]
    list_saves: bool,

    /// Delete a save slot and exit
    #[arg(long, value_name = "SLOT")]
    delete: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let engine = GameEngine::new(
        Gazetteer,
        FileStorage::new(StorageConfig::default().with_save_dir(&args.save_dir)),
    );

    if maybe_manage_saves(&args, &engine)? {
        return Ok(());
    }

    if args.report == ReportFormat::Console {
        announce_banner();
    }

    let mut state = initial_state(&args, &engine)?;
    if let Some(destination) = &args.travel {
        let days = engine.begin_journey(&mut state, destination);
        log::info!(
            "travelling to {} ({days} days)",
            format_location_name(destination)
        );
    }

    let schedule = load_schedule(&args.consequences, state.current_date.day_of_year())?;
    let start = state.current_date;
    let options = LoopOptions {
        max_days: args.days,
        autosave: !args.no_autosave,
    };
    let outcome = session::play(&engine, &mut state, &schedule, options)?;
    let game_over = outcome.ending.is_game_over();

    if let Some(raw) = &args.save {
        let slot = parse_slot(raw, &engine)?;
        engine
            .save_game(slot, &state)
            .with_context(|| format!("saving to {slot}"))?;
    }

    let report = RunReport::build(start, &state, outcome);
    write_report(&args, &report, &state)?;

    if game_over {
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn announce_banner() {
    println!("{}", "👑 King John 1205".bright_cyan().bold());
    println!("{}", "=================".cyan());
}

fn parse_slot(raw: &str, engine: &Engine) -> Result<SaveSlot> {
    let manual_slots = engine.storage().config().manual_slots;
    SaveSlot::parse(raw, manual_slots)
        .with_context(|| format!("invalid save slot `{raw}` (use autosave or 1-{manual_slots})"))
}

/// Handle `--list-saves` and `--delete`; returns true when nothing else should run.
fn maybe_manage_saves(args: &Args, engine: &Engine) -> Result<bool> {
    if let Some(raw) = &args.delete {
        let slot = parse_slot(raw, engine)?;
        let removed = engine
            .delete_save(slot)
            .with_context(|| format!("deleting {slot}"))?;
        let mut output_target = OutputTarget::new(args.output.clone())?;
        if removed {
            writeln!(output_target.writer(), "Deleted {slot}.")?;
        } else {
            writeln!(output_target.writer(), "No save in {slot}.")?;
        }
        output_target.flush_inner()?;
        return Ok(true);
    }

    if args.list_saves {
        let saves = engine.storage().list_saves().context("listing saves")?;
        let mut output_target = OutputTarget::new(args.output.clone())?;
        write_save_list(
            output_target.writer(),
            &saves,
            args.report == ReportFormat::Json,
        )?;
        output_target.flush_inner()?;
        return Ok(true);
    }

    Ok(false)
}

fn initial_state(args: &Args, engine: &Engine) -> Result<GameState> {
    let Some(raw) = &args.load else {
        return Ok(engine.new_game(args.difficulty.into()));
    };
    let slot = parse_slot(raw, engine)?;
    match engine
        .load_game(slot)
        .with_context(|| format!("loading {slot}"))?
    {
        Some(state) => {
            log::info!("continuing from {slot} at {}", state.current_date);
            Ok(state)
        }
        None => bail!("no saved game in {slot}"),
    }
}

fn load_schedule(paths: &[PathBuf], first_day: u32) -> Result<Schedule> {
    let mut schedule = Schedule::default();
    for path in paths {
        schedule.merge(Schedule::load(path, first_day)?);
    }
    if !schedule.is_empty() {
        log::info!("{} consequence(s) scheduled", schedule.len());
    }
    Ok(schedule)
}

fn write_report(args: &Args, report: &RunReport, state: &GameState) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.report {
        ReportFormat::Json => write_json_report(output_target.writer(), report)?,
        ReportFormat::Console => {
            write_console_report(output_target.writer(), report, closing_weather(state))?;
        }
    }
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}
