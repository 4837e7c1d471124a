use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod console;
pub mod display;
pub mod input;
pub mod jobs;
pub mod menu;

pub use console::{Console, InquireConsole, LineConsole};
pub use input::InputHandler;
pub use jobs::JobManager;
pub use menu::ConsoleUI;

#[derive(Parser)]
#[command(name = "maintcmd")]
#[command(about = "Building maintenance work orders from the command line")]
#[command(version)]
pub struct Cli {
    /// SQLite database file (overrides config and MAINTCMD_DB)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,
    /// JSON config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all maintenance jobs
    List,
    /// Add a new job
    Add,
    /// Update an existing job
    Update(UpdateArgs),
    /// Delete a job
    Delete(DeleteArgs),
}

#[derive(Args)]
pub struct UpdateArgs {
    /// Job ID; prompted for when omitted
    pub id: Option<String>,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Job ID; prompted for when omitted
    pub id: Option<String>,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub force: bool,
}

/// Run one command, or the interactive menu when none is given
pub fn run_command<C: Console>(command: Option<Commands>, mut jobs: JobManager<'_, C>) -> Result<()> {
    match command {
        None => ConsoleUI::new(jobs).run(),
        Some(Commands::List) => jobs.list_jobs(),
        Some(Commands::Add) => jobs.add_job(),
        Some(Commands::Update(args)) => jobs.update_job(args.id.as_deref()),
        Some(Commands::Delete(args)) => jobs.delete_job(args.id.as_deref(), args.force),
    }
}
