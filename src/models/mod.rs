mod date;
mod department;
mod job;

pub use date::DayMonthYear;
pub use department::Department;
pub use job::{Job, JobListRow, JobRecord, NewJob};
