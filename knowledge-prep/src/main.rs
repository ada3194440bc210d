use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use knowledge_prep::{convert_dir, generate_all};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert HTML service pages into structured JSON
    HtmlToJson {
        /// Folder holding the `.html` pages
        #[arg(long, default_value = "phase2_data")]
        input: PathBuf,
        /// Folder for the generated `.json` files
        #[arg(long, default_value = "preprocessing/jsons")]
        output: PathBuf,
    },
    /// Render one context file per (HMO, tier) pair from the JSON pages
    Generate {
        #[arg(long, default_value = "preprocessing/jsons")]
        input: PathBuf,
        #[arg(long, default_value = "user_specific_data")]
        output: PathBuf,
    },
    /// Run both steps
    RunAll {
        #[arg(long, default_value = "phase2_data")]
        html: PathBuf,
        #[arg(long, default_value = "preprocessing/jsons")]
        json: PathBuf,
        #[arg(long, default_value = "user_specific_data")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "knowledge_prep=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::HtmlToJson { input, output } => {
            convert_dir(&input, &output)?;
        }
        Commands::Generate { input, output } => {
            generate_all(&input, &output)?;
        }
        Commands::RunAll { html, json, output } => {
            let pages = convert_dir(&html, &json)?;
            let contexts = generate_all(&json, &output)?;
            info!(
                json_files = pages.len(),
                context_files = contexts.len(),
                "Preprocessing pipeline completed"
            );
        }
    }

    Ok(())
}
