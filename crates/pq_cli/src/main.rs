//! Pricing Engine CLI
//!
//! Thin front-end over the pq_core JSON API: reads a request from a
//! file or stdin, prints the result JSON. All computation lives in the
//! engine; this binary only moves bytes.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pq")]
#[command(about = "Project pricing and risk analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis pipeline on a JSON request
    Analyze {
        /// Request JSON file ("-" or absent reads stdin)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Pretty-print the result
        #[arg(long, default_value = "false")]
        pretty: bool,
    },

    /// Score a complexity profile
    Score {
        #[arg(long, default_value = "0")]
        hardware: u8,
        #[arg(long, default_value = "0")]
        software: u8,
        #[arg(long, default_value = "0")]
        ai_ml: u8,
        #[arg(long, default_value = "0")]
        deployment: u8,
        #[arg(long, default_value = "0")]
        risk_safety: u8,
    },

    /// Run a standalone Monte Carlo risk simulation on a JSON request
    Simulate {
        /// Request JSON file ("-" or absent reads stdin)
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

fn read_request(input: Option<PathBuf>) -> Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => {
            std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))
        }
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            Ok(buf)
        }
    }
}

fn reformat(json: &str, pretty: bool) -> Result<String> {
    if !pretty {
        return Ok(json.to_string());
    }
    let value: serde_json::Value = serde_json::from_str(json)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze { input, pretty } => {
            let request = read_request(input)?;
            let result = pq_core::analyze_project_json(&request)?;
            println!("{}", reformat(&result, pretty)?);
        }
        Commands::Score {
            hardware,
            software,
            ai_ml,
            deployment,
            risk_safety,
        } => {
            let request = serde_json::json!({
                "hardware": hardware,
                "software": software,
                "ai_ml": ai_ml,
                "deployment": deployment,
                "risk_safety": risk_safety,
            });
            let result = pq_core::score_complexity_json(&request.to_string())?;
            println!("{result}");
        }
        Commands::Simulate { input } => {
            let request = read_request(input)?;
            let result = pq_core::monte_carlo_json(&request)?;
            println!("{result}");
        }
    }
    Ok(())
}
