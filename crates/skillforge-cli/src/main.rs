//! skillforge CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "skillforge", version, about = "Adaptive skill-assessment engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a catalog TOML file
    Validate {
        /// Path to the catalog file
        #[arg(long)]
        catalog: PathBuf,
    },

    /// Run a simulated assessment against a catalog
    Simulate {
        /// Path to the catalog file
        #[arg(long)]
        catalog: PathBuf,

        /// Target role to assess for (e.g. "backend engineer")
        #[arg(long)]
        target_role: Option<String>,

        /// Probability that the synthetic respondent answers well
        #[arg(long, default_value = "0.7")]
        proficiency: f64,

        /// RNG seed for a reproducible run
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Comma-separated resume skills used as belief priors
        #[arg(long)]
        resume_skills: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("skillforge=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { catalog } => commands::validate::execute(catalog),
        Commands::Simulate {
            catalog,
            target_role,
            proficiency,
            seed,
            resume_skills,
        } => commands::simulate::execute(catalog, target_role, proficiency, seed, resume_skills).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
