//! Main menu for maintcmd

use anyhow::Result;

use super::console::Console;
use super::jobs::JobManager;

/// Menu options with type-safe variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuOption {
    List,
    Add,
    Update,
    Delete,
    Exit,
}

impl MenuOption {
    const ALL: &'static [MenuOption] = &[
        MenuOption::List,
        MenuOption::Add,
        MenuOption::Update,
        MenuOption::Delete,
        MenuOption::Exit,
    ];

    fn label(self) -> &'static str {
        match self {
            MenuOption::List => "List jobs",
            MenuOption::Add => "Add job",
            MenuOption::Update => "Update job",
            MenuOption::Delete => "Delete job",
            MenuOption::Exit => "Exit",
        }
    }

    /// Map a typed "1".."5" to its option
    fn from_choice(s: &str) -> Option<MenuOption> {
        let n: usize = s.trim().parse().ok()?;
        n.checked_sub(1).and_then(|i| MenuOption::ALL.get(i)).copied()
    }
}

pub struct ConsoleUI<'a, C> {
    jobs: JobManager<'a, C>,
}

impl<'a, C: Console> ConsoleUI<'a, C> {
    pub fn new(jobs: JobManager<'a, C>) -> Self {
        Self { jobs }
    }

    pub fn into_console(self) -> C {
        self.jobs.into_console()
    }

    /// Run the menu until Exit is chosen or input ends
    pub fn run(&mut self) -> Result<()> {
        loop {
            let console = self.jobs.console();
            console.heading("\n--- BUILDING MAINTENANCE ---");
            for (i, option) in MenuOption::ALL.iter().enumerate() {
                console.say(&format!("{}. {}", i + 1, option.label()));
            }

            // Closed or interrupted input leaves the menu
            let answer = match console.ask("Select an option: ") {
                Ok(answer) => answer,
                Err(_) => return Ok(()),
            };

            let Some(choice) = MenuOption::from_choice(&answer) else {
                console.say("Invalid option. Please try again.");
                continue;
            };

            if choice == MenuOption::Exit {
                self.jobs.console().say("Exiting. Goodbye!");
                return Ok(());
            }

            if let Err(e) = self.execute(choice) {
                self.jobs.console().say(&format!("\nError: {}", e));
            }
        }
    }

    fn execute(&mut self, choice: MenuOption) -> Result<()> {
        match choice {
            MenuOption::List => self.jobs.list_jobs(),
            MenuOption::Add => self.jobs.add_job(),
            MenuOption::Update => self.jobs.update_job(None),
            MenuOption::Delete => self.jobs.delete_job(None, false),
            MenuOption::Exit => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::console::script::{self, ScriptConsole};
    use crate::config::AppConfig;
    use crate::db::{fixtures, ConnectionProvider, JobRepository, Repositories, SqliteJobRepository};

    fn ui<'a>(
        db: &'a ConnectionProvider,
        config: &'a AppConfig,
        lines: &[&str],
    ) -> ConsoleUI<'a, ScriptConsole> {
        let manager = JobManager::new(Repositories::sqlite(db), config, script::console(lines));
        ConsoleUI::new(manager)
    }

    #[test]
    fn test_from_choice() {
        assert_eq!(MenuOption::from_choice("1"), Some(MenuOption::List));
        assert_eq!(MenuOption::from_choice(" 5 "), Some(MenuOption::Exit));
        assert_eq!(MenuOption::from_choice("0"), None);
        assert_eq!(MenuOption::from_choice("6"), None);
        assert_eq!(MenuOption::from_choice("list"), None);
    }

    #[test]
    fn test_invalid_choice_reprompts_then_exit() {
        let db = fixtures::seeded();
        let config = AppConfig::default();
        let mut menu = ui(&db, &config, &["9", "x", "5"]);
        menu.run().unwrap();

        let out = script::output(menu.into_console());
        assert_eq!(out.matches("Invalid option. Please try again.").count(), 2);
        assert_eq!(out.matches("--- BUILDING MAINTENANCE ---").count(), 3);
        assert!(out.contains("1. List jobs\n"));
        assert!(out.contains("5. Exit\n"));
        assert!(out.ends_with("Exiting. Goodbye!\n"));
    }

    #[test]
    fn test_add_then_list_through_menu() {
        let db = fixtures::seeded();
        let config = AppConfig::default();
        let mut menu = ui(
            &db,
            &config,
            &[
                "2", "Fix elevator", "Cabin stuck", "2", "E", "1", "2025-03-15", "1", "3",
                "1", "5",
            ],
        );
        menu.run().unwrap();

        let out = script::output(menu.into_console());
        assert!(out.contains("Job added successfully."));
        assert!(out.contains("--- MAINTENANCE JOBS ---"));
        assert!(out.contains("15/3/2025"));
        assert_eq!(SqliteJobRepository::new(&db).get_all().len(), 1);
    }

    #[test]
    fn test_end_of_input_leaves_menu() {
        let db = fixtures::seeded();
        let config = AppConfig::default();
        let mut menu = ui(&db, &config, &["1"]);
        assert!(menu.run().is_ok());

        let out = script::output(menu.into_console());
        assert!(out.contains("No maintenance jobs recorded."));
        assert!(!out.contains("Goodbye"));
    }

    #[test]
    fn test_action_cut_short_reports_error_and_continues() {
        let db = fixtures::seeded();
        let config = AppConfig::default();
        // Delete prompt gets an id, then the confirmation hits end of input
        let mut menu = ui(&db, &config, &["4", "1"]);
        menu.run().unwrap();

        let out = script::output(menu.into_console());
        assert!(out.contains("Error: End of input"));
    }
}
