use anyhow::Context;
use clap::{Parser, Subcommand};
use seatcut::workflow::{self, Requester};
use seatcut::{init_logging, Config, ReqwestTransport};
use std::path::PathBuf;

/// SeatCut: cut decorative seats on a FabMo tool
#[derive(Debug, Parser)]
#[command(name = "seatcut")]
#[command(version = seatcut::VERSION, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file (.toml or .json)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Plan a sketch file and print or write the G-code
    Plan {
        /// Sketch file (JSON)
        sketches: PathBuf,

        /// Write the program here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Plan a sketch file and queue it on the tool
    Submit {
        /// Sketch file (JSON)
        sketches: PathBuf,

        /// Requester name
        #[arg(long)]
        name: String,

        /// Requester email
        #[arg(long)]
        email: String,

        /// Use the public demo tool
        #[arg(long)]
        demo: bool,
    },
    /// Show the tool's status
    Status {
        /// Use the public demo tool
        #[arg(long)]
        demo: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let mut config =
        Config::load_or_default(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Plan { sketches, output } => {
            let program = workflow::plan_sketch_file(&config, &sketches)?;
            match output {
                Some(path) => program
                    .write_to_file(&path)
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => print!("{}", program),
            }
        }
        Commands::Submit {
            sketches,
            name,
            email,
            demo,
        } => {
            config.discovery.demo_mode |= demo;
            let program = workflow::plan_sketch_file(&config, &sketches)?;
            let transport = ReqwestTransport::new(config.connection.to_options())?;
            let job = workflow::cut_seat(&transport, &config, &program, &Requester::new(name, email))?;

            println!("Job {} queued on {} ({})", job.handle.job_id, job.tool, job.handle.status);
            println!("Job manager: {}", job.job_manager_url());
        }
        Commands::Status { demo } => {
            config.discovery.demo_mode |= demo;
            let transport = ReqwestTransport::new(config.connection.to_options())?;
            let (tool, status) = workflow::tool_status(&transport, &config)?;

            println!("{}: {}", tool, status.state().unwrap_or("unknown"));
            println!("{}", serde_json::to_string_pretty(status.as_json())?);
        }
    }

    Ok(())
}
