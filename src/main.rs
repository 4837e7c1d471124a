use clap::Parser;
use std::io::{self, IsTerminal};

use maintcmd::cli::{run_command, Cli, InquireConsole, JobManager, LineConsole};
use maintcmd::db::{ConnectionProvider, Repositories};
use maintcmd::logging::initialize_tracing;
use maintcmd::AppConfig;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    initialize_tracing();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.database = Some(db);
    }
    let db = ConnectionProvider::new(config.database_path()?);

    let result = if io::stdin().is_terminal() {
        let jobs = JobManager::new(Repositories::sqlite(&db), &config, InquireConsole::new());
        run_command(cli.command, jobs)
    } else {
        // Piped input: plain line reads, no terminal rendering
        let console = LineConsole::new(io::stdin().lock(), io::stdout());
        let jobs = JobManager::new(Repositories::sqlite(&db), &config, console);
        run_command(cli.command, jobs)
    };

    db.close();
    result
}
