/// Tables used by the application.
///
/// Applied on every connect with `IF NOT EXISTS`, so an existing database
/// is left untouched. Reference tables are provisioned outside the app.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS buildings (
    code INTEGER PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS departments (
    id INTEGER PRIMARY KEY,
    code TEXT NOT NULL,
    unit TEXT NOT NULL,
    unit_order INTEGER NOT NULL DEFAULT 0,
    name TEXT NOT NULL,
    building_fk INTEGER NOT NULL,
    FOREIGN KEY (building_fk) REFERENCES buildings(code)
);

CREATE TABLE IF NOT EXISTS contractors (
    id INTEGER PRIMARY KEY,
    display_name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS statuses (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS jobs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    start_day INTEGER,
    start_month INTEGER,
    start_year INTEGER,
    end_day INTEGER,
    end_month INTEGER,
    end_year INTEGER,
    building_fk INTEGER NOT NULL,
    department_fk INTEGER,
    contractor_fk INTEGER NOT NULL,
    status_fk INTEGER NOT NULL,
    priority TEXT NOT NULL,
    FOREIGN KEY (building_fk) REFERENCES buildings(code),
    FOREIGN KEY (department_fk) REFERENCES departments(id),
    FOREIGN KEY (contractor_fk) REFERENCES contractors(id),
    FOREIGN KEY (status_fk) REFERENCES statuses(id)
);

CREATE INDEX IF NOT EXISTS idx_department_building ON departments(building_fk);
CREATE INDEX IF NOT EXISTS idx_job_due ON jobs(end_year, end_month, end_day);
"#;
