//! Resonant command-line interface.
//!
//! Step Lorentz-dispersive media from TOML configuration files:
//! ```sh
//! resonant-cli run job.toml
//! resonant-cli validate job.toml
//! resonant-cli components job.toml
//! ```

mod config;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resonant-cli")]
#[command(about = "Resonant: Lorentz-dispersive media on a Yee grid")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a job from a TOML configuration file.
    Run {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output directory (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file and build its material without stepping.
    Validate {
        /// Path to the job configuration file.
        config: PathBuf,
    },
    /// List the electric field components present in a job's grid.
    Components {
        /// Path to the job configuration file.
        config: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output } => {
            println!("Resonant Lorentz-medium driver");
            println!("==============================");
            let job = config::load_config(&config)?;
            println!("Configuration: {}", config.display());

            let result = runner::run_simulation(&job)?;

            let out_dir = output.unwrap_or_else(|| PathBuf::from(&job.output.directory));

            if job.output.save_csv {
                let csv_path = out_dir.join("probe.csv");
                runner::write_trace_csv(&result, &csv_path, &job)?;
            }

            if job.output.save_json {
                let json_path = out_dir.join("probe.json");
                runner::write_trace_json(&result, &json_path)?;
            }

            println!("Run complete.");
            Ok(())
        }
        Commands::Validate { config } => {
            let job = config::load_config(&config)?;
            let volume = runner::build_volume(&job.grid)?;
            let material = runner::build_material(volume, &job.material)?;
            println!(
                "Configuration is valid: {} ({} oscillator term(s))",
                config.display(),
                material.chain().len()
            );
            Ok(())
        }
        Commands::Components { config } => {
            let job = config::load_config(&config)?;
            let volume = runner::build_volume(&job.grid)?;
            println!("Electric components on the {} grid:", volume.dim);
            for c in volume.electric_components() {
                println!("  {c}");
            }
            Ok(())
        }
    }
}
