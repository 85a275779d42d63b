//! genre-trends CLI - sales-by-genre chart tool

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use genre_trends::{FamilyFilter, RecordSchema, Region};

mod commands;

/// Sales-by-genre time chart tool.
#[derive(Parser)]
#[command(name = "genre-trends")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Dataset and filter selection shared by every command.
#[derive(Args, Debug, Clone)]
pub struct Selection {
    /// Input CSV or JSON file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Sales column to plot (NA_Sales, EU_Sales, JP_Sales, Other_Sales, Global_Sales)
    #[arg(long, default_value = "Global_Sales")]
    pub region: Region,

    /// Platform family (All, Nintendo, PlayStation, Xbox, PC, Other)
    #[arg(long, default_value = "All")]
    pub family: FamilyFilter,

    /// Name of the release-year column
    #[arg(long, default_value = "Year")]
    pub year_column: String,

    /// Name of the genre column
    #[arg(long, default_value = "Genre")]
    pub genre_column: String,

    /// Name of the platform column
    #[arg(long, default_value = "Platform")]
    pub platform_column: String,
}

impl Selection {
    /// Column names to read, as given on the command line.
    pub fn schema(&self) -> RecordSchema {
        RecordSchema::builder()
            .year_column(&self.year_column)
            .genre_column(&self.genre_column)
            .platform_column(&self.platform_column)
            .build()
    }

    #[cfg(test)]
    fn for_input(input: &std::path::Path) -> Self {
        Self {
            input: input.to_path_buf(),
            region: Region::Global,
            family: FamilyFilter::All,
            year_column: "Year".to_string(),
            genre_column: "Genre".to_string(),
            platform_column: "Platform".to_string(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print aggregated series, optionally exporting them as JSON
    Series {
        #[command(flatten)]
        selection: Selection,

        /// Output JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render the chart to SVG
    Render {
        #[command(flatten)]
        selection: Selection,

        /// Output SVG file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Chart config JSON file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Genres to hide (repeatable)
        #[arg(long)]
        hide: Vec<String>,
    },

    /// Replay a script of interactions and report each render pass
    Session {
        #[command(flatten)]
        selection: Selection,

        /// Script file, one command per line (stdin if omitted)
        #[arg(long)]
        script: Option<PathBuf>,

        /// Write the final chart to this SVG file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Chart config JSON file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::Series { selection, output } => commands::series::run(&selection, output),
        Commands::Render { selection, output, config, hide } => {
            commands::render::run(&selection, output, config, &hide)
        }
        Commands::Session { selection, script, output, config } => {
            commands::session::run(&selection, script, output, config)
        }
    }
}
