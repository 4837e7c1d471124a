//! Departments: units inside a building that a job may target.

use rusqlite::Row;
use tracing::error;

use super::ConnectionProvider;
use crate::models::Department;

pub trait DepartmentRepository {
    /// Departments of the named building, or of every building when `None`,
    /// ordered by building name then department code
    fn get_all_by_building(&self, building_name: Option<&str>) -> Vec<Department>;
}

pub struct SqliteDepartmentRepository<'a> {
    db: &'a ConnectionProvider,
}

impl<'a> SqliteDepartmentRepository<'a> {
    pub fn new(db: &'a ConnectionProvider) -> Self {
        Self { db }
    }

    fn row_to_department(row: &Row) -> rusqlite::Result<Department> {
        Ok(Department {
            id: row.get(0)?,
            code: row.get(1)?,
            unit: row.get(2)?,
            order: row.get(3)?,
            name: row.get(4)?,
            building_id: row.get(5)?,
            building_name: row.get(6)?,
        })
    }
}

impl DepartmentRepository for SqliteDepartmentRepository<'_> {
    fn get_all_by_building(&self, building_name: Option<&str>) -> Vec<Department> {
        let Some(conn) = self.db.connection() else {
            return Vec::new();
        };
        let result = (|| -> rusqlite::Result<Vec<Department>> {
            let mut stmt = conn.prepare(
                r#"SELECT
                    d.id, d.code, d.unit, d.unit_order, d.name,
                    b.code, b.name
                FROM departments d
                JOIN buildings b ON d.building_fk = b.code
                WHERE ?1 IS NULL OR b.name = ?1
                ORDER BY b.name, d.code"#,
            )?;
            let departments = stmt
                .query_map([building_name], Self::row_to_department)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(departments)
        })();

        match result {
            Ok(departments) => departments,
            Err(e) => {
                error!(error = %e, building = ?building_name, "Error fetching departments");
                Vec::new()
            }
        }
    }
}
