//! Jobs: the maintenance work orders themselves.

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, error};

use super::ConnectionProvider;
use crate::models::{DayMonthYear, Job, JobListRow, JobRecord, NewJob};

pub trait JobRepository {
    /// Every job joined with its building, department, contractor and status
    /// names, ordered by due year, month, then day, each descending
    fn get_all(&self) -> Vec<JobListRow>;

    fn get_by_id(&self, id: i64) -> Option<Job>;

    /// Insert and commit; `false` if the write failed and was rolled back
    fn add(&self, job: &NewJob) -> bool;

    /// Overwrite every mutable field; `true` only if a row was affected
    fn update(&self, id: i64, record: &JobRecord) -> bool;

    /// `true` only if a row was deleted
    fn delete(&self, id: i64) -> bool;
}

pub struct SqliteJobRepository<'a> {
    db: &'a ConnectionProvider,
}

impl<'a> SqliteJobRepository<'a> {
    pub fn new(db: &'a ConnectionProvider) -> Self {
        Self { db }
    }

    /// Run a single write inside a transaction, committing on success and
    /// rolling back if the statement or the commit fails. Returns the
    /// affected row count.
    fn write<F>(&self, context: &str, statement: F) -> Option<usize>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<usize>,
    {
        let conn = self.db.connection()?;
        let result = conn.execute_batch("BEGIN").and_then(|_| statement(&*conn));
        drop(conn);

        // A failed COMMIT is a failed write
        match result.and_then(|rows| self.db.commit().map(|_| rows)) {
            Ok(rows) => Some(rows),
            Err(e) => {
                error!(error = %e, "{}", context);
                self.db.rollback();
                None
            }
        }
    }

    fn row_to_list_row(row: &Row) -> rusqlite::Result<JobListRow> {
        Ok(JobListRow {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            due: DayMonthYear {
                day: row.get(3)?,
                month: row.get(4)?,
                year: row.get(5)?,
            },
            priority: row.get(6)?,
            building: row.get(7)?,
            department_id: row.get(8)?,
            department_unit: row.get(9)?,
            department_order: row.get(10)?,
            contractor: row.get(11)?,
            status: row.get(12)?,
        })
    }

    fn row_to_job(row: &Row) -> rusqlite::Result<Job> {
        Ok(Job {
            id: row.get("id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            start: DayMonthYear {
                day: row.get("start_day")?,
                month: row.get("start_month")?,
                year: row.get("start_year")?,
            },
            due: DayMonthYear {
                day: row.get("end_day")?,
                month: row.get("end_month")?,
                year: row.get("end_year")?,
            },
            building_id: row.get("building_fk")?,
            department_id: row.get("department_fk")?,
            contractor_id: row.get("contractor_fk")?,
            status_id: row.get("status_fk")?,
            priority: row.get("priority")?,
        })
    }
}

impl JobRepository for SqliteJobRepository<'_> {
    fn get_all(&self) -> Vec<JobListRow> {
        let Some(conn) = self.db.connection() else {
            return Vec::new();
        };
        // Independent integer columns, so this is not a strict calendar sort
        // when parts are missing.
        let result = (|| -> rusqlite::Result<Vec<JobListRow>> {
            let mut stmt = conn.prepare(
                r#"SELECT
                    j.id, j.title, j.description,
                    j.end_day, j.end_month, j.end_year,
                    j.priority,
                    b.name,
                    d.id, d.unit, d.unit_order,
                    c.display_name,
                    s.name
                FROM jobs j
                JOIN buildings b ON j.building_fk = b.code
                LEFT JOIN departments d ON j.department_fk = d.id
                JOIN contractors c ON j.contractor_fk = c.id
                JOIN statuses s ON j.status_fk = s.id
                ORDER BY j.end_year DESC, j.end_month DESC, j.end_day DESC"#,
            )?;
            let rows = stmt
                .query_map([], Self::row_to_list_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })();

        match result {
            Ok(rows) => rows,
            Err(e) => {
                error!(error = %e, "Error fetching jobs");
                Vec::new()
            }
        }
    }

    fn get_by_id(&self, id: i64) -> Option<Job> {
        let conn = self.db.connection()?;
        let result = conn
            .query_row("SELECT * FROM jobs WHERE id = ?", [id], Self::row_to_job)
            .optional();

        match result {
            Ok(job) => job,
            Err(e) => {
                error!(error = %e, id, "Error fetching job by id");
                None
            }
        }
    }

    fn add(&self, job: &NewJob) -> bool {
        let record = &job.record;
        let inserted = self.write("Error adding job", |conn| {
            conn.execute(
                r#"INSERT INTO jobs (
                    start_day, start_month, start_year,
                    building_fk, department_fk, title, description, contractor_fk,
                    end_day, end_month, end_year, status_fk, priority
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
                params![
                    job.start.day,
                    job.start.month,
                    job.start.year,
                    record.building_id,
                    record.department_id,
                    record.title,
                    record.description,
                    record.contractor_id,
                    record.due.day,
                    record.due.month,
                    record.due.year,
                    record.status_id,
                    record.priority,
                ],
            )
        });

        if inserted.is_some() {
            debug!(title = %record.title, "job added");
        }
        inserted.is_some()
    }

    fn update(&self, id: i64, record: &JobRecord) -> bool {
        let rows = self.write("Error updating job", |conn| {
            conn.execute(
                r#"UPDATE jobs SET
                    title = ?, description = ?, end_day = ?, end_month = ?, end_year = ?,
                    building_fk = ?, department_fk = ?, contractor_fk = ?, status_fk = ?,
                    priority = ?
                WHERE id = ?"#,
                params![
                    record.title,
                    record.description,
                    record.due.day,
                    record.due.month,
                    record.due.year,
                    record.building_id,
                    record.department_id,
                    record.contractor_id,
                    record.status_id,
                    record.priority,
                    id,
                ],
            )
        });

        debug!(id, rows = ?rows, "job update finished");
        rows.is_some_and(|n| n > 0)
    }

    fn delete(&self, id: i64) -> bool {
        let rows = self.write("Error deleting job", |conn| {
            conn.execute("DELETE FROM jobs WHERE id = ?", [id])
        });

        debug!(id, rows = ?rows, "job delete finished");
        rows.is_some_and(|n| n > 0)
    }
}
