//! Job statuses. Selection is driven by the configured status list, so
//! there is no listing here.

use super::{query_id_by_name, query_name_by_id, ConnectionProvider};

pub trait StatusRepository {
    fn get_by_name(&self, name: &str) -> Option<i64>;

    fn get_name_by_id(&self, id: i64) -> String;
}

pub struct SqliteStatusRepository<'a> {
    db: &'a ConnectionProvider,
}

impl<'a> SqliteStatusRepository<'a> {
    pub fn new(db: &'a ConnectionProvider) -> Self {
        Self { db }
    }
}

impl StatusRepository for SqliteStatusRepository<'_> {
    fn get_by_name(&self, name: &str) -> Option<i64> {
        query_id_by_name(
            self.db,
            "SELECT id FROM statuses WHERE name = ?",
            name,
            "Error fetching status id",
        )
    }

    fn get_name_by_id(&self, id: i64) -> String {
        query_name_by_id(
            self.db,
            "SELECT name FROM statuses WHERE id = ?",
            id,
            "Error fetching status name",
        )
    }
}
