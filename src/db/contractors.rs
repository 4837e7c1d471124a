//! Contractors assigned to carry out jobs.

use super::{query_id_by_name, query_name_by_id, query_names, ConnectionProvider};

/// Read-only access to the `contractors` table
pub trait ContractorRepository {
    /// Every contractor display name, sorted alphabetically
    fn get_all(&self) -> Vec<String>;

    fn get_by_name(&self, display_name: &str) -> Option<i64>;

    fn get_name_by_id(&self, id: i64) -> String;
}

pub struct SqliteContractorRepository<'a> {
    db: &'a ConnectionProvider,
}

impl<'a> SqliteContractorRepository<'a> {
    pub fn new(db: &'a ConnectionProvider) -> Self {
        Self { db }
    }
}

impl ContractorRepository for SqliteContractorRepository<'_> {
    fn get_all(&self) -> Vec<String> {
        query_names(
            self.db,
            "SELECT display_name FROM contractors ORDER BY display_name",
            "Error fetching contractors",
        )
    }

    fn get_by_name(&self, display_name: &str) -> Option<i64> {
        query_id_by_name(
            self.db,
            "SELECT id FROM contractors WHERE display_name = ?",
            display_name,
            "Error fetching contractor id",
        )
    }

    fn get_name_by_id(&self, id: i64) -> String {
        query_name_by_id(
            self.db,
            "SELECT display_name FROM contractors WHERE id = ?",
            id,
            "Error fetching contractor name",
        )
    }
}
