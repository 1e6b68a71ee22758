use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueHint};
use lift_cycle::{
    advance_roster, build_schedule, group_roster, ProgressionState, RosterEntry, Schedule,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Four-week strength cycle scheduler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the schedule CSV for the upcoming cycle
    Schedule(ScheduleArgs),
    /// Advance every training max by its per-cycle increment
    Advance(AdvanceArgs),
    /// Build the schedule, then advance training maxes for the next cycle
    Cycle(CycleArgs),
}

#[derive(Parser, Debug)]
struct ScheduleArgs {
    /// Roster CSV with day/exercise/type/training_max/increment_per_cycle columns
    #[arg(short = 'i', long, default_value = "input.csv", value_hint = ValueHint::FilePath)]
    roster: PathBuf,

    /// Output schedule CSV path (`-` for stdout)
    #[arg(short, long, default_value = "schedule.csv", value_hint = ValueHint::FilePath)]
    output: PathBuf,

    /// Use the six-slot main-lift form with warm-up ramp sets
    #[arg(long, action = ArgAction::SetTrue)]
    extended: bool,

    /// Progression state path (defaults next to the roster)
    #[arg(long, value_hint = ValueHint::FilePath)]
    state: Option<PathBuf>,

    /// Verbose logging
    #[arg(long, action = ArgAction::SetTrue)]
    verbose: bool,
}

#[derive(Parser, Debug)]
struct AdvanceArgs {
    /// Roster CSV to advance in place
    #[arg(short = 'i', long, default_value = "input.csv", value_hint = ValueHint::FilePath)]
    roster: PathBuf,

    /// Progression state path (defaults next to the roster)
    #[arg(long, value_hint = ValueHint::FilePath)]
    state: Option<PathBuf>,

    /// Verbose logging
    #[arg(long, action = ArgAction::SetTrue)]
    verbose: bool,
}

#[derive(Parser, Debug)]
struct CycleArgs {
    /// Roster CSV with day/exercise/type/training_max/increment_per_cycle columns
    #[arg(short = 'i', long, default_value = "input.csv", value_hint = ValueHint::FilePath)]
    roster: PathBuf,

    /// Output schedule CSV path (`-` for stdout)
    #[arg(short, long, default_value = "schedule.csv", value_hint = ValueHint::FilePath)]
    output: PathBuf,

    /// Use the six-slot main-lift form with warm-up ramp sets
    #[arg(long, action = ArgAction::SetTrue)]
    extended: bool,

    /// Progression state path (defaults next to the roster)
    #[arg(long, value_hint = ValueHint::FilePath)]
    state: Option<PathBuf>,

    /// Verbose logging
    #[arg(long, action = ArgAction::SetTrue)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbose = match &cli.command {
        Command::Schedule(args) => args.verbose,
        Command::Advance(args) => args.verbose,
        Command::Cycle(args) => args.verbose,
    };
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match cli.command {
        Command::Schedule(args) => handle_schedule(args),
        Command::Advance(args) => handle_advance(args),
        Command::Cycle(args) => handle_cycle(args),
    }
}

fn handle_schedule(args: ScheduleArgs) -> Result<()> {
    let roster_path = ensure_csv_extension(&args.roster);
    let state_path = args
        .state
        .unwrap_or_else(|| default_state_path(&roster_path));

    let entries = read_roster(&roster_path)?;
    let days = group_roster(&entries)?;
    let mut state = load_state(&state_path)?;
    state.start_next_cycle();

    let schedule = build_schedule(&days, args.extended)?;
    if schedule.is_empty() {
        warn!("Roster {} produced an empty schedule", roster_path.display());
    }
    info!(
        "Cycle {} schedule: {} rows across {} days",
        state.cycle,
        schedule.len(),
        days.len()
    );

    write_schedule(&schedule, &args.output)?;
    save_state(&state_path, &state)?;
    Ok(())
}

fn handle_advance(args: AdvanceArgs) -> Result<()> {
    let roster_path = ensure_csv_extension(&args.roster);
    let state_path = args
        .state
        .unwrap_or_else(|| default_state_path(&roster_path));

    let mut entries = read_roster(&roster_path)?;
    // Validate before touching the file so a malformed roster never half-advances.
    group_roster(&entries)?;
    let mut state = load_state(&state_path)?;
    advance_roster(&mut entries, &mut state)?;

    write_roster(&roster_path, &entries)?;
    save_state(&state_path, &state)?;
    info!(
        "Advanced {} training maxes; roster {} ready for cycle {}",
        entries.len(),
        roster_path.display(),
        state.cycle + 1
    );
    Ok(())
}

fn handle_cycle(args: CycleArgs) -> Result<()> {
    let roster_path = ensure_csv_extension(&args.roster);
    let state_path = args
        .state
        .unwrap_or_else(|| default_state_path(&roster_path));

    let mut entries = read_roster(&roster_path)?;
    let days = group_roster(&entries)?;
    let mut state = load_state(&state_path)?;
    state.start_next_cycle();

    let schedule = build_schedule(&days, args.extended)?;
    if schedule.is_empty() {
        warn!("Roster {} produced an empty schedule", roster_path.display());
    }
    info!(
        "Cycle {} schedule: {} rows across {} days",
        state.cycle,
        schedule.len(),
        days.len()
    );
    write_schedule(&schedule, &args.output)?;

    advance_roster(&mut entries, &mut state)?;
    write_roster(&roster_path, &entries)?;
    save_state(&state_path, &state)?;
    info!("Roster {} updated for the next cycle", roster_path.display());
    Ok(())
}

/// Append `.csv` when the name is missing it; `-` (stdout) passes through.
fn ensure_csv_extension(path: &Path) -> PathBuf {
    if path.as_os_str() == "-" {
        return path.to_path_buf();
    }
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("csv") => path.to_path_buf(),
        _ => {
            let mut name = path.as_os_str().to_owned();
            name.push(".csv");
            PathBuf::from(name)
        }
    }
}

fn default_state_path(roster: &Path) -> PathBuf {
    roster.with_extension("state.json")
}

fn read_roster(path: &Path) -> Result<Vec<RosterEntry>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open roster {}", path.display()))?;
    let mut entries = Vec::new();
    for result in reader.deserialize() {
        let entry: RosterEntry =
            result.with_context(|| format!("malformed roster row in {}", path.display()))?;
        entries.push(entry);
    }
    Ok(entries)
}

fn write_roster(path: &Path, entries: &[RosterEntry]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for entry in entries {
        writer
            .serialize(entry)
            .with_context(|| format!("failed to encode roster row for {}", entry.exercise))?;
    }
    let data = writer
        .into_inner()
        .map_err(|err| anyhow!("failed to finish roster CSV: {}", err))?;
    atomic_overwrite(path, &data)
}

fn load_state(path: &Path) -> Result<ProgressionState> {
    if !path.exists() {
        return Ok(ProgressionState::default());
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read progression state {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("{} is not a valid progression state", path.display()))
}

fn save_state(path: &Path, state: &ProgressionState) -> Result<()> {
    let text = serde_json::to_string_pretty(state)?;
    atomic_overwrite(path, text.as_bytes())
}

/// Overwrite `path` via a temporary sibling and rename, so a crash mid-write
/// never leaves a partially updated file behind.
fn atomic_overwrite(path: &Path, data: &[u8]) -> Result<()> {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    let tmp = PathBuf::from(name);
    fs::write(&tmp, data).with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}

fn write_schedule(schedule: &Schedule, path: &Path) -> Result<()> {
    if path.as_os_str() == "-" {
        let stdout = io::stdout();
        let handle = stdout.lock();
        let mut writer = csv::Writer::from_writer(handle);
        write_schedule_rows(schedule, &mut writer)
    } else {
        let path = ensure_csv_extension(path);
        let file = File::create(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        let mut writer = csv::Writer::from_writer(file);
        write_schedule_rows(schedule, &mut writer)?;
        info!("Wrote schedule CSV: {}", path.display());
        Ok(())
    }
}

fn write_schedule_rows<W: Write>(schedule: &Schedule, writer: &mut csv::Writer<W>) -> Result<()> {
    writer.write_record(Schedule::headers())?;
    for row in &schedule.rows {
        let mut record = Vec::with_capacity(11);
        record.push(row.day.to_string());
        record.push(row.exercise.clone());
        for cell in &row.weeks {
            match cell {
                Some(set) => {
                    record.push(set.reps.to_string());
                    record.push(format!("{:.2}", set.weight));
                }
                None => {
                    record.push(String::new());
                    record.push(String::new());
                }
            }
        }
        record.push(
            row.increment_next_cycle
                .map(|v| format!("{:.2}", v))
                .unwrap_or_default(),
        );
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}
