//! classgrid CLI - Student Matrix Calendar Builder
//!
//! Command-line interface for merging per-student timetable workbooks into
//! one matrix calendar.

mod config;
mod pipeline;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use classgrid_parser::SheetSelection;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{Config, Overrides};

#[derive(Parser)]
#[command(name = "classgrid")]
#[command(author, version, about = "Student matrix calendar builder", long_about = None)]
struct Cli {
    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the matrix calendar workbook
    Build {
        #[command(flatten)]
        input: InputArgs,

        /// Output workbook path
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Load and validate timetables without writing anything
    Check {
        #[command(flatten)]
        input: InputArgs,

        /// Report format
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },

    /// Print the matrix as text
    Preview {
        #[command(flatten)]
        input: InputArgs,

        /// Only print rows where someone has a class
        #[arg(long)]
        busy_only: bool,

        /// Width of each student column
        #[arg(long, default_value_t = 14)]
        width: usize,
    },
}

/// Options shared by every command
#[derive(Args, Debug, Clone)]
struct InputArgs {
    /// Directory holding one workbook per student
    #[arg(short, long, value_name = "DIR")]
    input_dir: Option<PathBuf>,

    /// File name pattern for input workbooks
    #[arg(short, long, value_name = "GLOB")]
    pattern: Option<String>,

    /// Slot width in minutes
    #[arg(long, value_name = "MINUTES")]
    step: Option<u32>,

    /// Comma-separated day order, e.g. "Mon,Tue,Wed,Thu,Fri"
    #[arg(long, value_name = "DAYS")]
    days: Option<String>,

    /// Sheet to read from each workbook (first, best)
    #[arg(long, value_name = "MODE")]
    sheet: Option<SheetSelection>,

    /// Fail on unreadable files instead of skipping them
    #[arg(long)]
    strict: bool,

    /// Config file (default: classgrid.toml in the input directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl InputArgs {
    fn overrides(&self, output: Option<PathBuf>) -> Overrides {
        Overrides {
            input_dir: self.input_dir.clone(),
            pattern: self.pattern.clone(),
            output,
            step_minutes: self.step,
            days: self.days.clone(),
            sheet: self.sheet,
            strict: self.strict,
            config: self.config.clone(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG wins over -v
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    match cli.command {
        Commands::Build { input, output } => {
            let config = Config::resolve(&input.overrides(output))?;
            let summary = pipeline::build(&config)?;
            println!("Saved: {}", summary.output.display());
            if summary.skipped_rows > 0 || summary.skipped_files > 0 {
                eprintln!(
                    "Skipped {} row(s) and {} file(s); run `classgrid check` for details",
                    summary.skipped_rows, summary.skipped_files
                );
            }
        }
        Commands::Check { input, format } => {
            let config = Config::resolve(&input.overrides(None))?;
            let timetable = pipeline::load(&config)?;
            match format {
                ReportFormat::Text => print!("{}", pipeline::check_report(&timetable)),
                ReportFormat::Json => println!("{}", pipeline::check_json(&timetable)?),
            }
        }
        Commands::Preview {
            input,
            busy_only,
            width,
        } => {
            let config = Config::resolve(&input.overrides(None))?;
            println!("{}", pipeline::preview(&config, busy_only, width)?);
        }
    }

    Ok(())
}
