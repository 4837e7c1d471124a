use serde::{Deserialize, Serialize};

use super::DayMonthYear;

/// A work order exactly as stored in the `jobs` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub start: DayMonthYear,
    pub due: DayMonthYear,
    pub building_id: i64,
    /// `None` for building-wide jobs
    pub department_id: Option<i64>,
    pub contractor_id: i64,
    pub status_id: i64,
    pub priority: String,
}

impl Job {
    /// The mutable part of the job, used as the starting point of an edit
    pub fn record(&self) -> JobRecord {
        JobRecord {
            title: self.title.clone(),
            description: self.description.clone(),
            due: self.due,
            building_id: self.building_id,
            department_id: self.department_id,
            contractor_id: self.contractor_id,
            status_id: self.status_id,
            priority: self.priority.clone(),
        }
    }
}

/// Fields written by both add and update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub description: String,
    pub due: DayMonthYear,
    pub building_id: i64,
    pub department_id: Option<i64>,
    pub contractor_id: i64,
    pub status_id: i64,
    pub priority: String,
}

/// A job about to be inserted; the start date is only set at creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewJob {
    pub start: DayMonthYear,
    pub record: JobRecord,
}

/// A job joined with the names of everything it references, for listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobListRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub due: DayMonthYear,
    pub priority: String,
    pub building: String,
    pub department_id: Option<i64>,
    pub department_unit: Option<String>,
    pub department_order: Option<i64>,
    pub contractor: String,
    pub status: String,
}

impl JobListRow {
    /// `Tower A` or `Tower A / 1A (3)` when the job targets a department
    pub fn location(&self) -> String {
        match (&self.department_unit, self.department_order) {
            (Some(unit), Some(order)) if !unit.is_empty() && order != 0 => {
                format!("{} / {} ({})", self.building, unit, order)
            }
            _ => self.building.clone(),
        }
    }
}
