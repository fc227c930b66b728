#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the crime dashboard.
//!
//! With no subcommand, lets the user interactively pick between the
//! terminal dashboard and the HTTP server. Subcommands run a single
//! query (`predict`, `trend`, `compare`, `options`) and print it as text
//! or JSON.
//!
//! Uses `indicatif-log-bridge` (via [`crime_dash_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and loading spinners never fight for the terminal.

mod render;
mod terminal;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use crime_dash_analytics::Dashboard;
use crime_dash_analytics_models::Selection;
use crime_dash_config::DashboardConfig;
use crime_dash_crime_models::CrimeSelector;
use dialoguer::Select;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "crime_dash", about = "Crime statistics dashboard and predictor")]
struct Cli {
    /// TOML config file (overrides `CRIME_DASH_CONFIG`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Processed crime CSV (overrides the configured path)
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    /// Model artifact JSON (overrides the configured path)
    #[arg(long, global = true)]
    model: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive terminal dashboard
    Dashboard,
    /// Start the HTTP API server
    Serve {
        /// Address to bind (overrides `BIND_ADDR`)
        #[arg(long)]
        bind_addr: Option<String>,
        /// Port to listen on (overrides `PORT`)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Predict the crime count for a state, crime type, and year
    Predict {
        /// State name as it appears in the dataset
        #[arg(long)]
        state: String,
        /// Crime type; every crime type combined when omitted
        #[arg(long)]
        crime: Option<String>,
        /// Year to predict; the configured default when omitted
        #[arg(long)]
        year: Option<i32>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show the yearly trend for a state
    Trend {
        /// State name as it appears in the dataset
        #[arg(long)]
        state: String,
        /// Crime type; every crime type combined when omitted
        #[arg(long)]
        crime: Option<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Compare total counts per crime type for a state
    Compare {
        /// State name as it appears in the dataset
        #[arg(long)]
        state: String,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List the selectable states, crime types, and years
    Options {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

/// Top-level tool selection when no subcommand is given.
enum Tool {
    Dashboard,
    Server,
}

impl Tool {
    const ALL: &[Self] = &[Self::Dashboard, Self::Server];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Dashboard => "Open terminal dashboard",
            Self::Server => "Start server",
        }
    }
}

fn crime_arg(crime: Option<String>) -> CrimeSelector {
    crime.map_or(CrimeSelector::Combined, CrimeSelector::from)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Runs the server on its own actix system so it does not nest inside the
/// tokio runtime driving the CLI.
async fn serve(config: DashboardConfig, interactive: bool) -> Result<(), Box<dyn std::error::Error>> {
    tokio::task::spawn_blocking(move || {
        actix_web::rt::System::new().block_on(async move {
            if interactive {
                crime_dash_server::interactive::run(config).await
            } else {
                crime_dash_server::run_server(config).await
            }
        })
    })
    .await??;
    Ok(())
}

#[allow(clippy::too_many_lines)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = crime_dash_cli_utils::init_logger();
    let cli = Cli::parse();

    let mut config = DashboardConfig::load(cli.config.as_deref())?;
    if let Some(data) = cli.data {
        config.data_path = data;
    }
    if let Some(model) = cli.model {
        config.model_path = model;
    }
    log::debug!(
        "Using data {} and model {}",
        config.data_path.display(),
        config.model_path.display()
    );

    let Some(command) = cli.command else {
        println!("Crime Dashboard");
        println!();

        let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();
        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        return match Tool::ALL[idx] {
            Tool::Dashboard => {
                let dashboard = Dashboard::from_config(&config);
                tokio::task::spawn_blocking(move || {
                    terminal::run(&dashboard, &multi).map_err(|e| e.to_string())
                })
                .await?
                .map_err(Into::into)
            }
            Tool::Server => serve(config, true).await,
        };
    };

    match command {
        Commands::Dashboard => {
            let dashboard = Dashboard::from_config(&config);
            tokio::task::spawn_blocking(move || {
                terminal::run(&dashboard, &multi).map_err(|e| e.to_string())
            })
            .await??;
        }
        Commands::Serve { bind_addr, port } => {
            if let Some(bind_addr) = bind_addr {
                config.server.bind_addr = bind_addr;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config, false).await?;
        }
        Commands::Predict {
            state,
            crime,
            year,
            json,
        } => {
            let dashboard = Dashboard::from_config(&config);
            let bounds = dashboard.year_bounds()?;
            let year = year.unwrap_or(bounds.default);
            if !bounds.contains(year) {
                return Err(format!(
                    "Year {year} is outside {}..={}",
                    bounds.min, bounds.max
                )
                .into());
            }

            let selection = Selection {
                state,
                crime: crime_arg(crime),
                year,
            };
            let prediction = dashboard.predict(&selection)?;

            if json {
                print_json(&prediction)?;
            } else {
                print!("{}", render::selection(&selection));
                println!("{}", render::prediction(&prediction));
            }
        }
        Commands::Trend { state, crime, json } => {
            let dashboard = Dashboard::from_config(&config);
            let series = dashboard.trend(&state, &crime_arg(crime))?;
            if json {
                print_json(&series)?;
            } else {
                print!("{}", render::trend(&series));
            }
        }
        Commands::Compare { state, json } => {
            let dashboard = Dashboard::from_config(&config);
            let series = dashboard.comparison(&state)?;
            if json {
                print_json(&series)?;
            } else {
                print!("{}", render::comparison(&series));
            }
        }
        Commands::Options { json } => {
            let dashboard = Dashboard::from_config(&config);
            let options = dashboard.options()?;
            if json {
                print_json(&options)?;
            } else {
                print!("{}", render::options(&options));
            }
        }
    }

    Ok(())
}
