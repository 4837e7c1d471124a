//! Job workflows
//!
//! Each operation is a fixed sequence of prompts and repository lookups.
//! A failed lookup, a missing prerequisite list, or a missing required field
//! stops the operation with a message before anything is written.

use anyhow::Result;
use chrono::Local;

use super::console::Console;
use super::display::job_table;
use super::input::InputHandler;
use crate::config::AppConfig;
use crate::db::Repositories;
use crate::models::{JobRecord, NewJob};

const TARGET_PROMPT: &str = "Is this for the (E)ntire building or a specific (D)epartment?";

/// Parse a job id typed by the user; anything unparsable matches no job
fn parse_job_id(text: &str) -> Option<i64> {
    text.trim().parse().ok()
}

pub struct JobManager<'a, C> {
    repos: Repositories<'a>,
    config: &'a AppConfig,
    input: InputHandler<C>,
}

impl<'a, C: Console> JobManager<'a, C> {
    pub fn new(repos: Repositories<'a>, config: &'a AppConfig, console: C) -> Self {
        Self {
            repos,
            config,
            input: InputHandler::new(console),
        }
    }

    pub fn console(&mut self) -> &mut C {
        self.input.console()
    }

    pub fn into_console(self) -> C {
        self.input.into_console()
    }

    fn say(&mut self, line: &str) {
        self.input.console().say(line);
    }

    /// Print every job as a fixed-width table
    pub fn list_jobs(&mut self) -> Result<()> {
        let jobs = self.repos.jobs.get_all();

        if jobs.is_empty() {
            self.say("\nNo maintenance jobs recorded.");
            return Ok(());
        }

        self.input.console().heading("\n--- MAINTENANCE JOBS ---");
        for line in job_table(&jobs) {
            self.say(&line);
        }
        Ok(())
    }

    /// Collect a new job from the user and store it
    pub fn add_job(&mut self) -> Result<()> {
        self.input.console().heading("\n--- ADD NEW JOB ---");
        let title = self.input.get_string("Job title: ", None)?;
        let description = self.input.get_string("Description: ", None)?;

        // Building, then optionally one of its departments
        let buildings = self.repos.buildings.get_all();
        if buildings.is_empty() {
            self.say("No buildings available. Please add buildings first.");
            return Ok(());
        }
        let Some(building) = self
            .input
            .get_choice("\nSelect the building:", &buildings, None, false)?
        else {
            return Ok(());
        };
        let Some(building_id) = self.repos.buildings.get_by_name(building) else {
            self.say("Error: could not get the id of the selected building.");
            return Ok(());
        };
        let department_id = self.choose_department(building)?;

        // Contractor
        let contractors = self.repos.contractors.get_all();
        if contractors.is_empty() {
            self.say("No contractors available. Please add contractors first.");
            return Ok(());
        }
        let Some(contractor) = self.input.get_choice(
            "\nSelect the assigned contractor:",
            &contractors,
            None,
            false,
        )?
        else {
            return Ok(());
        };
        let Some(contractor_id) = self.repos.contractors.get_by_name(contractor) else {
            self.say("Error: could not get the id of the selected contractor.");
            return Ok(());
        };

        let due = self.input.get_date("Due date", None, false)?;
        if !due.is_complete() {
            self.say("Due date is required.");
            return Ok(());
        }

        // Status is resolved to an id; priority is stored as text
        let config = self.config;
        let Some(status) = self
            .input
            .get_choice("\nSelect the status:", &config.statuses, None, false)?
        else {
            return Ok(());
        };
        let Some(status_id) = self.repos.statuses.get_by_name(status) else {
            self.say("Error: could not get the id of the selected status.");
            return Ok(());
        };
        let Some(priority) = self
            .input
            .get_choice("\nSelect the priority:", &config.priorities, None, false)?
        else {
            return Ok(());
        };

        let job = NewJob {
            start: Local::now().date_naive().into(),
            record: JobRecord {
                title,
                description,
                due,
                building_id,
                department_id,
                contractor_id,
                status_id,
                priority: priority.clone(),
            },
        };

        if self.repos.jobs.add(&job) {
            self.say("\nJob added successfully.");
        } else {
            self.say("\nError: could not add the job.");
        }
        Ok(())
    }

    /// Re-prompt every field of an existing job; blank answers keep the
    /// current value
    pub fn update_job(&mut self, id: Option<&str>) -> Result<()> {
        let id_text = match id {
            Some(id) => id.to_string(),
            None => self
                .input
                .get_string("\nEnter the ID of the job to update: ", None)?,
        };
        let Some(existing) = parse_job_id(&id_text).and_then(|id| self.repos.jobs.get_by_id(id))
        else {
            self.say(&format!("No job found with ID {}.", id_text.trim()));
            return Ok(());
        };

        self.input.console().heading("\n--- UPDATE JOB ---");
        self.say(&format!(
            "Current job: title '{}', description '{}'",
            existing.title, existing.description
        ));

        let title = self.input.get_string("New title", Some(existing.title.as_str()))?;
        let description = self
            .input
            .get_string("New description", Some(existing.description.as_str()))?;

        // Building
        let current_building = self.repos.buildings.get_name_by_id(existing.building_id);
        let buildings = self.repos.buildings.get_all();
        let (building_name, building_id) = match self.input.get_choice(
            "\nSelect the new building:",
            &buildings,
            Some(current_building.as_str()),
            true,
        )? {
            None => (current_building.clone(), existing.building_id),
            Some(name) => match self.repos.buildings.get_by_name(name) {
                Some(id) => (name.clone(), id),
                None => {
                    self.say("Error: could not get the id of the selected building.");
                    return Ok(());
                }
            },
        };

        let department_id =
            self.rechoose_department(&building_name, existing.department_id)?;

        // Contractor
        let current_contractor = self.repos.contractors.get_name_by_id(existing.contractor_id);
        let contractors = self.repos.contractors.get_all();
        let contractor_id = match self.input.get_choice(
            "\nSelect the new assigned contractor:",
            &contractors,
            Some(current_contractor.as_str()),
            true,
        )? {
            None => existing.contractor_id,
            Some(name) => match self.repos.contractors.get_by_name(name) {
                Some(id) => id,
                None => {
                    self.say("Error: could not get the id of the selected contractor.");
                    return Ok(());
                }
            },
        };

        let due = self
            .input
            .get_date("New due date", existing.due.to_date(), true)?;
        let due = if due.is_empty() { existing.due } else { due };

        // Status and priority
        let config = self.config;
        let current_status = self.repos.statuses.get_name_by_id(existing.status_id);
        let status_id = match self.input.get_choice(
            "\nSelect the new status:",
            &config.statuses,
            Some(current_status.as_str()),
            true,
        )? {
            None => existing.status_id,
            Some(name) => match self.repos.statuses.get_by_name(name) {
                Some(id) => id,
                None => {
                    self.say("Error: could not get the id of the selected status.");
                    return Ok(());
                }
            },
        };

        let priority = self
            .input
            .get_choice(
                "\nSelect the new priority:",
                &config.priorities,
                Some(existing.priority.as_str()),
                true,
            )?
            .cloned()
            .unwrap_or_else(|| existing.priority.clone());

        let record = JobRecord {
            title,
            description,
            due,
            building_id,
            department_id,
            contractor_id,
            status_id,
            priority,
        };

        if self.repos.jobs.update(existing.id, &record) {
            self.say("\nJob updated successfully.");
        } else {
            self.say("\nNo changes were made or the job does not exist.");
        }
        Ok(())
    }

    /// Delete a job after confirmation, unless `force` is set.
    ///
    /// A missing job and a database error produce the same message.
    pub fn delete_job(&mut self, id: Option<&str>, force: bool) -> Result<()> {
        let id_text = match id {
            Some(id) => id.to_string(),
            None => self
                .input
                .get_string("\nEnter the ID of the job to delete: ", None)?,
        };
        let shown = id_text.trim().to_string();

        let confirmed = force
            || self
                .input
                .get_yes_no(&format!("Are you sure you want to delete job {}?", shown))?;
        if !confirmed {
            self.say("Deletion cancelled.");
            return Ok(());
        }

        let deleted = parse_job_id(&id_text).is_some_and(|id| self.repos.jobs.delete(id));
        if deleted {
            self.say(&format!("Job {} deleted successfully.", shown));
        } else {
            self.say(&format!(
                "No job found with ID {}, or an error occurred while deleting.",
                shown
            ));
        }
        Ok(())
    }

    /// Ask whether a new job targets the whole building or one department
    fn choose_department(&mut self, building: &str) -> Result<Option<i64>> {
        let target = self
            .input
            .get_string(&format!("{} (E/D): ", TARGET_PROMPT), None)?;
        if target.trim().to_uppercase() != "D" {
            return Ok(None);
        }

        let departments = self.repos.departments.get_all_by_building(Some(building));
        if departments.is_empty() {
            self.say(&format!(
                "No departments in {}. The job will cover the whole building.",
                building
            ));
            return Ok(None);
        }

        let choice = self.input.get_choice(
            &format!("\nDepartments in {}:", building),
            &departments,
            None,
            false,
        )?;
        Ok(choice.map(|d| d.id))
    }

    /// Same question as [`Self::choose_department`] for an existing job.
    ///
    /// The current department can only be kept if it belongs to `building`;
    /// otherwise a department of `building` must be picked.
    fn rechoose_department(&mut self, building: &str, current: Option<i64>) -> Result<Option<i64>> {
        let current_target = if current.is_some() { "D" } else { "E" };
        let target = self.input.get_string(TARGET_PROMPT, Some(current_target))?;

        match target.trim().to_uppercase().as_str() {
            "E" => Ok(None),
            "D" => {
                let departments = self.repos.departments.get_all_by_building(Some(building));
                if departments.is_empty() {
                    self.say(&format!(
                        "No departments in {}. The job will cover the whole building.",
                        building
                    ));
                    return Ok(None);
                }

                let kept = current.and_then(|id| departments.iter().find(|d| d.id == id));
                let kept_label = kept.map(|d| d.to_string());
                let choice = self.input.get_choice(
                    &format!("\nDepartments in {}:", building),
                    &departments,
                    kept_label.as_deref(),
                    kept.is_some(),
                )?;
                Ok(choice.or(kept).map(|d| d.id))
            }
            _ => {
                self.say("Invalid option. Keeping the current target.");
                match current {
                    Some(id) if !self.department_in_building(id, building) => {
                        self.say(&format!(
                            "The current department is not part of {}. The job will cover the whole building.",
                            building
                        ));
                        Ok(None)
                    }
                    other => Ok(other),
                }
            }
        }
    }

    fn department_in_building(&self, department_id: i64, building: &str) -> bool {
        self.repos
            .departments
            .get_all_by_building(Some(building))
            .iter()
            .any(|d| d.id == department_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::console::script::{self, ScriptConsole};
    use crate::db::fixtures::{
        self, ACME, BRIGHT_SPARKS, COMPLETED, DEPT_1A, DEPT_2B, HARBOUR_VIEW, PENDING, TOWER_A,
    };
    use crate::db::{ConnectionProvider, JobRepository, SqliteJobRepository};
    use crate::models::{DayMonthYear, Job};

    const PENTHOUSE: i64 = 200;

    fn manager<'a>(
        db: &'a ConnectionProvider,
        config: &'a AppConfig,
        lines: &[&str],
    ) -> JobManager<'a, ScriptConsole> {
        JobManager::new(Repositories::sqlite(db), config, script::console(lines))
    }

    fn output(manager: JobManager<'_, ScriptConsole>) -> String {
        script::output(manager.into_console())
    }

    fn all_jobs(db: &ConnectionProvider) -> Vec<Job> {
        let repo = SqliteJobRepository::new(db);
        repo.get_all()
            .iter()
            .filter_map(|row| repo.get_by_id(row.id))
            .collect()
    }

    /// Store a Tower A job in department 1A and return its id
    fn existing_job(db: &ConnectionProvider) -> i64 {
        let repo = SqliteJobRepository::new(db);
        assert!(repo.add(&NewJob {
            start: DayMonthYear::new(2, 1, 2025),
            record: JobRecord {
                title: "Paint hall".to_string(),
                description: "Ground floor".to_string(),
                due: DayMonthYear::new(20, 6, 2025),
                building_id: TOWER_A,
                department_id: Some(DEPT_1A),
                contractor_id: ACME,
                status_id: PENDING,
                priority: "Low".to_string(),
            },
        }));
        repo.get_all()[0].id
    }

    #[test]
    fn test_add_then_list_building_wide_job() {
        let db = fixtures::seeded();
        let config = AppConfig::default();
        let mut jobs = manager(
            &db,
            &config,
            &[
                "Fix elevator", // title
                "Cabin stuck",  // description
                "2",            // Tower A
                "E",            // whole building
                "1",            // ACME Elevators
                "2025-03-15",   // due
                "1",            // Pending
                "3",            // High
            ],
        );
        jobs.add_job().unwrap();
        jobs.list_jobs().unwrap();
        let out = output(jobs);
        assert!(out.contains("Job added successfully."));

        let stored = all_jobs(&db);
        assert_eq!(stored.len(), 1);
        let job = &stored[0];
        assert_eq!(job.title, "Fix elevator");
        assert_eq!(job.description, "Cabin stuck");
        assert_eq!(job.building_id, TOWER_A);
        assert_eq!(job.department_id, None);
        assert_eq!(job.contractor_id, ACME);
        assert_eq!(job.status_id, PENDING);
        assert_eq!(job.priority, "High");
        assert_eq!(job.due, DayMonthYear::new(15, 3, 2025));
        assert!(job.start.is_complete());

        let row = out
            .lines()
            .find(|l| l.contains("Fix elevator"))
            .expect("job row listed");
        assert!(row.contains("Tower A"));
        assert!(row.contains("15/3/2025"));
        assert!(row.contains("Pending"));
        assert!(row.contains("High"));
        assert!(!row.contains("N/A"));
    }

    #[test]
    fn test_add_for_department() {
        let db = fixtures::seeded();
        let config = AppConfig::default();
        let mut jobs = manager(
            &db,
            &config,
            &["Leak", "", "2", "d", "2", "2", "2025-04-01", "2", "1"],
        );
        jobs.add_job().unwrap();
        let out = output(jobs);
        assert!(out.contains("Departments in Tower A:"));
        assert!(out.contains("1. Unit: 1A (Order: 3) - Front flat"));

        let job = &all_jobs(&db)[0];
        assert_eq!(job.department_id, Some(DEPT_2B));
        assert_eq!(job.contractor_id, BRIGHT_SPARKS);
        assert_eq!(job.priority, "Low");
    }

    #[test]
    fn test_add_department_falls_back_to_building() {
        let db = fixtures::seeded();
        db.connection()
            .unwrap()
            .execute("INSERT INTO buildings (code, name) VALUES (3, 'Annex')", [])
            .unwrap();
        let config = AppConfig::default();
        // Buildings: Annex, Harbour View, Tower A
        let mut jobs = manager(
            &db,
            &config,
            &["Sweep", "", "1", "D", "1", "2025-05-05", "1", "1"],
        );
        jobs.add_job().unwrap();
        let out = output(jobs);
        assert!(out.contains("No departments in Annex. The job will cover the whole building."));

        let job = &all_jobs(&db)[0];
        assert_eq!(job.building_id, 3);
        assert_eq!(job.department_id, None);
    }

    #[test]
    fn test_add_aborts_without_buildings() {
        let db = ConnectionProvider::in_memory();
        let config = AppConfig::default();
        let mut jobs = manager(&db, &config, &["Title", "Desc"]);
        jobs.add_job().unwrap();
        let out = output(jobs);
        assert!(out.contains("No buildings available."));
        assert!(all_jobs(&db).is_empty());
    }

    #[test]
    fn test_add_aborts_without_contractors() {
        let db = ConnectionProvider::in_memory();
        db.connection()
            .unwrap()
            .execute("INSERT INTO buildings (code, name) VALUES (1, 'Tower A')", [])
            .unwrap();
        let config = AppConfig::default();
        let mut jobs = manager(&db, &config, &["Title", "Desc", "1", "E"]);
        jobs.add_job().unwrap();
        assert!(output(jobs).contains("No contractors available."));
        assert!(all_jobs(&db).is_empty());
    }

    #[test]
    fn test_add_aborts_when_status_cannot_be_resolved() {
        let db = fixtures::seeded();
        let config = AppConfig::default();
        // "Cancelled" is configured but missing from the statuses table
        let mut jobs = manager(
            &db,
            &config,
            &["Title", "Desc", "1", "E", "1", "2025-01-01", "4"],
        );
        jobs.add_job().unwrap();
        let out = output(jobs);
        assert!(out.contains("Error: could not get the id of the selected status."));
        assert!(!out.contains("Select the priority:"));
        assert!(all_jobs(&db).is_empty());
    }

    #[test]
    fn test_list_empty() {
        let db = fixtures::seeded();
        let config = AppConfig::default();
        let mut jobs = manager(&db, &config, &[]);
        jobs.list_jobs().unwrap();
        assert!(output(jobs).contains("No maintenance jobs recorded."));
    }

    #[test]
    fn test_update_all_blank_keeps_record() {
        let db = fixtures::seeded();
        let id = existing_job(&db);
        let before = SqliteJobRepository::new(&db).get_by_id(id).unwrap();
        let config = AppConfig::default();
        let id_text = id.to_string();
        let mut jobs = manager(
            &db,
            &config,
            &[&id_text, "", "", "", "", "", "", "", "", ""],
        );
        jobs.update_job(None).unwrap();
        let out = output(jobs);
        assert!(out.contains("Job updated successfully."));
        assert!(out.contains("current: Unit: 1A (Order: 3) - Front flat"));
        assert!(out.contains("current: 2025-06-20"));

        let after = SqliteJobRepository::new(&db).get_by_id(id).unwrap();
        assert_eq!(after, before);
    }

    #[test]
    fn test_update_changes_fields() {
        let db = fixtures::seeded();
        let id = existing_job(&db);
        let config = AppConfig::default();
        let id_text = id.to_string();
        let mut jobs = manager(
            &db,
            &config,
            &[
                "Paint stairwell", // title
                "",                // keep description
                "",                // keep building
                "E",               // whole building
                "2",               // Bright Sparks
                "2026-01-31",      // due
                "3",               // Completed
                "4",               // Urgent
            ],
        );
        jobs.update_job(Some(&id_text)).unwrap();
        assert!(output(jobs).contains("Job updated successfully."));

        let job = SqliteJobRepository::new(&db).get_by_id(id).unwrap();
        assert_eq!(job.title, "Paint stairwell");
        assert_eq!(job.description, "Ground floor");
        assert_eq!(job.building_id, TOWER_A);
        assert_eq!(job.department_id, None);
        assert_eq!(job.contractor_id, BRIGHT_SPARKS);
        assert_eq!(job.due, DayMonthYear::new(31, 1, 2026));
        assert_eq!(job.status_id, COMPLETED);
        assert_eq!(job.priority, "Urgent");
        assert_eq!(job.start, DayMonthYear::new(2, 1, 2025));
    }

    #[test]
    fn test_update_new_building_requires_matching_department() {
        let db = fixtures::seeded();
        let id = existing_job(&db);
        let config = AppConfig::default();
        let id_text = id.to_string();
        let mut jobs = manager(
            &db,
            &config,
            &[
                "", "", // title, description
                "1",  // Harbour View
                "",   // keep department target
                "",   // blank is refused: 1A is not in Harbour View
                "1",  // Penthouse
                "", "", "", "",
            ],
        );
        jobs.update_job(Some(&id_text)).unwrap();
        let out = output(jobs);
        assert!(out.contains("Departments in Harbour View:"));
        assert!(out.contains("Invalid input. Enter a number."));

        let job = SqliteJobRepository::new(&db).get_by_id(id).unwrap();
        assert_eq!(job.building_id, HARBOUR_VIEW);
        assert_eq!(job.department_id, Some(PENTHOUSE));
    }

    #[test]
    fn test_update_invalid_target_keeps_department() {
        let db = fixtures::seeded();
        let id = existing_job(&db);
        let config = AppConfig::default();
        let id_text = id.to_string();
        let mut jobs = manager(&db, &config, &["", "", "", "X", "", "", "", ""]);
        jobs.update_job(Some(&id_text)).unwrap();
        assert!(output(jobs).contains("Invalid option. Keeping the current target."));

        let job = SqliteJobRepository::new(&db).get_by_id(id).unwrap();
        assert_eq!(job.department_id, Some(DEPT_1A));
    }

    #[test]
    fn test_update_not_found() {
        let db = fixtures::seeded();
        let config = AppConfig::default();
        let mut jobs = manager(&db, &config, &["999"]);
        jobs.update_job(None).unwrap();
        jobs.update_job(Some("abc")).unwrap();
        let out = output(jobs);
        assert!(out.contains("No job found with ID 999."));
        assert!(out.contains("No job found with ID abc."));
        assert!(!out.contains("UPDATE JOB"));
    }

    #[test]
    fn test_delete_confirmed() {
        let db = fixtures::seeded();
        let id = existing_job(&db);
        let config = AppConfig::default();
        let id_text = id.to_string();
        let mut jobs = manager(&db, &config, &[&id_text, "y"]);
        jobs.delete_job(None, false).unwrap();
        assert!(output(jobs).contains(&format!("Job {} deleted successfully.", id)));
        assert!(all_jobs(&db).is_empty());
    }

    #[test]
    fn test_delete_declined() {
        let db = fixtures::seeded();
        let id = existing_job(&db);
        let config = AppConfig::default();
        let id_text = id.to_string();
        let mut jobs = manager(&db, &config, &[&id_text, "n"]);
        jobs.delete_job(None, false).unwrap();
        assert!(output(jobs).contains("Deletion cancelled."));
        assert_eq!(all_jobs(&db).len(), 1);
    }

    #[test]
    fn test_delete_missing_reports_not_found_or_error() {
        let db = fixtures::seeded();
        let config = AppConfig::default();
        let mut jobs = manager(&db, &config, &[]);
        jobs.delete_job(Some("42"), true).unwrap();
        assert!(output(jobs)
            .contains("No job found with ID 42, or an error occurred while deleting."));
    }

    #[test]
    fn test_delete_force_skips_confirmation() {
        let db = fixtures::seeded();
        let id = existing_job(&db);
        let config = AppConfig::default();
        let mut jobs = manager(&db, &config, &[]);
        jobs.delete_job(Some(&id.to_string()), true).unwrap();
        let out = output(jobs);
        assert!(!out.contains("(y/n)"));
        assert!(all_jobs(&db).is_empty());
    }

    #[test]
    fn test_parse_job_id() {
        assert_eq!(parse_job_id(" 12 "), Some(12));
        assert_eq!(parse_job_id("twelve"), None);
        assert_eq!(parse_job_id(""), None);
    }
}
