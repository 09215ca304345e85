//! # Tactile Charts CLI
//!
//! Command-line interface for generating the acuity charts.
//!
//! ## Usage
//!
//! ```bash
//! # List available charts
//! tactile-charts list
//!
//! # Show a chart's row table as JSON
//! tactile-charts describe landolt-v1
//!
//! # Render one chart (plain + labelled PNG) into the current directory
//! tactile-charts render dot-baseline
//!
//! # Render everything into out/, with fonts from elsewhere
//! tactile-charts render --all --out-dir out --label-font /usr/share/fonts/FreeSerif.ttf
//! ```
//!
//! Set `RUST_LOG=debug` to see per-row layout.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use tactile_charts::{
    ChartError, ChartSpec,
    charts::{self, FontOverrides},
};

/// Tactile acuity chart generator
#[derive(Parser, Debug)]
#[command(name = "tactile-charts")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List available charts
    List,

    /// Print a chart's configuration as JSON
    Describe {
        /// Chart name
        chart: String,
    },

    /// Render charts to PNG (plain and labelled)
    Render {
        /// Charts to render
        #[arg(required_unless_present = "all")]
        charts: Vec<String>,

        /// Render every chart
        #[arg(long)]
        all: bool,

        /// Output directory
        #[arg(long, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,

        /// Font for Landolt symbols (defaults to the chart's font path)
        #[arg(long, value_name = "FILE")]
        font: Option<PathBuf>,

        /// Font for row labels (defaults to the chart's label font path)
        #[arg(long, value_name = "FILE")]
        label_font: Option<PathBuf>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn lookup(name: &str) -> Result<&'static ChartSpec, ChartError> {
    charts::by_name(name).ok_or_else(|| ChartError::UnknownChart(name.to_string()))
}

fn run() -> Result<(), ChartError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::List => {
            println!("Available charts:");
            for spec in charts::CHARTS {
                println!(
                    "  {:<16} {} rows, sizes in {}",
                    spec.name,
                    spec.rows.len(),
                    spec.symbols.size_unit()
                );
            }
        }

        Commands::Describe { chart } => {
            let spec = lookup(&chart)?;
            let json = serde_json::to_string_pretty(spec).map_err(std::io::Error::from)?;
            println!("{}", json);
        }

        Commands::Render {
            charts: names,
            all,
            out_dir,
            font,
            label_font,
        } => {
            let selected: Vec<&ChartSpec> = if all {
                charts::CHARTS.iter().collect()
            } else {
                names.iter().map(|n| lookup(n)).collect::<Result<_, _>>()?
            };

            std::fs::create_dir_all(&out_dir)?;
            let fonts = FontOverrides {
                symbols: font,
                labels: label_font,
            };

            for spec in selected {
                log::info!("Rendering {}...", spec.name);
                let (plain, labelled) = charts::write_chart(spec, &fonts, &out_dir)?;
                println!("{}: {} {}", spec.name, plain.display(), labelled.display());
            }
        }
    }

    Ok(())
}
