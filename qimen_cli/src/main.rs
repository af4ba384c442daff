//! # Qimen CLI Application
//!
//! Terminal front end for the four-pillar engine. Prints a text report by
//! default, or the JSON record with `--json` (for LLM/API use).
//!
//! ```text
//! qimen board --date 2024-02-10 --time 12:00 --longitude 116.4
//! qimen pillars --date 2024-02-10 --json
//! qimen terms 2024
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use qimen_core::board::{compute_board, compute_pillars, Board, PillarView, UNKNOWN};
use qimen_core::calendar::solar_terms;
use qimen_core::{load_settings, CalcError, CalcResult, CalendarSettings, ChartInput};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qimen", about = "Four-pillar calendar and divination board calculator")]
struct Cli {
    /// JSON settings file (time zone, default time, supported years)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Print JSON instead of the text report
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full divination board
    Board(MomentArgs),
    /// Four pillars only
    Pillars(MomentArgs),
    /// The 24 solar terms of a year, in civil time
    Terms {
        /// Gregorian year
        year: i32,
    },
}

#[derive(Args)]
struct MomentArgs {
    /// Civil date, YYYY-MM-DD
    #[arg(long)]
    date: String,
    /// Civil time, HH:MM or HH:MM:SS (omit if unknown)
    #[arg(long)]
    time: Option<String>,
    /// Observer longitude in degrees east
    #[arg(long, allow_hyphen_values = true)]
    longitude: Option<String>,
    /// Label stored in the board metadata
    #[arg(long, default_value = "")]
    label: String,
}

impl MomentArgs {
    fn to_input(&self) -> CalcResult<ChartInput> {
        ChartInput::parse(&self.date, self.time.as_deref(), self.longitude.as_deref())
            .map(|input| input.with_label(self.label.clone()))
    }
}

#[derive(Serialize)]
struct PillarsOutput {
    year: String,
    month: String,
    day: String,
    hour: Option<String>,
    solar_time: String,
}

#[derive(Serialize)]
struct TermOutput {
    name: &'static str,
    civil_time: String,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> CalcResult<()> {
    let settings = match &cli.settings {
        Some(path) => load_settings(path)?,
        None => CalendarSettings::default(),
    };

    match &cli.command {
        Commands::Board(args) => {
            let board = compute_board(&args.to_input()?, &settings)?;
            if cli.json {
                print_json(&board)?;
            } else {
                print_board(&board);
            }
        }
        Commands::Pillars(args) => {
            let reading = compute_pillars(&args.to_input()?, &settings)?;
            let pillars = reading.pillars;
            let output = PillarsOutput {
                year: pillars.year.to_string(),
                month: pillars.month.to_string(),
                day: pillars.day.to_string(),
                hour: pillars.hour.map(|p| p.to_string()),
                solar_time: reading.solar_time.to_string(),
            };
            if cli.json {
                print_json(&output)?;
            } else {
                println!("{} {} {} {}", output.year, output.month, output.day, output.hour.as_deref().unwrap_or(UNKNOWN));
                println!("(solar time {})", output.solar_time);
            }
        }
        Commands::Terms { year } => {
            if *year < settings.min_year || *year > settings.max_year {
                return Err(CalcError::invalid_input(
                    "year",
                    year.to_string(),
                    format!("Year must be between {} and {}", settings.min_year, settings.max_year),
                ));
            }
            let offset = settings.civil_offset()?;
            let mut terms: Vec<_> = solar_terms(*year).to_vec();
            terms.sort_by_key(|t| t.instant);
            let output: Vec<TermOutput> = terms
                .iter()
                .map(|t| TermOutput {
                    name: t.term.name(),
                    civil_time: t.instant.with_timezone(&offset).format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect();
            if cli.json {
                print_json(&output)?;
            } else {
                for term in &output {
                    println!("  {}  {}", term.name, term.civil_time);
                }
            }
            tracing::debug!(year, count = output.len(), "listed solar terms");
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> CalcResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// "甲(阳木) 辰(阳土)", or the unknown sentinel
fn describe_pillar(view: &PillarView) -> String {
    if view.is_unknown() {
        return UNKNOWN.to_string();
    }
    format!(
        "{}({}{}) {}({}{})",
        view.stem, view.stem_polarity, view.stem_element, view.branch, view.branch_polarity, view.branch_element
    )
}

fn print_board(board: &Board) {
    println!("═══════════════════════════════════════");
    println!("  QIMEN BOARD");
    println!("═══════════════════════════════════════");
    println!();
    println!("Time:");
    println!("  Civil:  {}", board.meta.original_time);
    println!("  Solar:  {}", board.meta.solar_time);
    if let Some(longitude) = board.meta.longitude {
        println!("  Lon:    {:.2}°E", longitude);
    }
    println!();
    println!("Pillars:");
    println!(
        "  {}年 {}月 {}日 {}时",
        board.pillars.year.text, board.pillars.month.text, board.pillars.day.text, board.pillars.hour.text
    );
    for (label, view) in [
        ("年", &board.pillars.year),
        ("月", &board.pillars.month),
        ("日", &board.pillars.day),
        ("时", &board.pillars.hour),
    ] {
        println!("  {} {}", label, describe_pillar(view));
    }
    println!("  旬空: {}{}", board.day_void[0], board.day_void[1]);
    println!();
    println!("Board:");
    println!("  节气: {}", board.solar_term);
    println!("  {} {}局", board.polarity_label, board.bureau);
    println!();
    for palace in &board.palaces {
        println!(
            "  [{}] {}{} {} {} {} 天{} 地{}{}{}",
            palace.index,
            palace.trigram,
            palace.element_name,
            palace.star,
            palace.gate,
            palace.deity,
            palace.heaven_stem,
            palace.earth_stem,
            if palace.empty { " 空" } else { "" },
            if palace.horse { " 马" } else { "" },
        );
    }
    println!();
    println!("═══════════════════════════════════════");
    println!("  {}", board.meta.formula);
    println!("═══════════════════════════════════════");
}
