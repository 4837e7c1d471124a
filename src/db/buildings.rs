//! Buildings: the managed properties every job belongs to.

use super::{query_id_by_name, query_name_by_id, query_names, ConnectionProvider};

/// Read-only access to the `buildings` table
pub trait BuildingRepository {
    /// Every building name, sorted alphabetically
    fn get_all(&self) -> Vec<String>;

    /// Primary key of the building with this exact name
    fn get_by_name(&self, name: &str) -> Option<i64>;

    /// Name of the building, or `"Unknown"`
    fn get_name_by_id(&self, id: i64) -> String;
}

pub struct SqliteBuildingRepository<'a> {
    db: &'a ConnectionProvider,
}

impl<'a> SqliteBuildingRepository<'a> {
    pub fn new(db: &'a ConnectionProvider) -> Self {
        Self { db }
    }
}

impl BuildingRepository for SqliteBuildingRepository<'_> {
    fn get_all(&self) -> Vec<String> {
        query_names(
            self.db,
            "SELECT name FROM buildings ORDER BY name",
            "Error fetching buildings",
        )
    }

    fn get_by_name(&self, name: &str) -> Option<i64> {
        query_id_by_name(
            self.db,
            "SELECT code FROM buildings WHERE name = ?",
            name,
            "Error fetching building id",
        )
    }

    fn get_name_by_id(&self, id: i64) -> String {
        query_name_by_id(
            self.db,
            "SELECT name FROM buildings WHERE code = ?",
            id,
            "Error fetching building name",
        )
    }
}
