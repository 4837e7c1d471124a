use serde::{Deserialize, Serialize};
use std::fmt;

/// A unit inside a building, as returned by the department listing join
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: i64,
    pub code: String,
    pub unit: String,
    pub order: i64,
    pub name: String,
    pub building_id: i64,
    pub building_name: String,
}

/// Label used when offering the department in a selection list
impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unit: {} (Order: {}) - {}", self.unit, self.order, self.name)
    }
}
