//! Fixed-width job table

use crate::models::JobListRow;

const RULE_WIDTH: usize = 120;

/// Characters kept from an over-long cell before the ellipsis
const TITLE_KEEP: usize = 28;
const LOCATION_KEEP: usize = 18;
const CONTRACTOR_KEEP: usize = 13;

/// Shorten `s` to `keep` characters plus `...` when it is longer than `keep`
pub fn truncate(s: &str, keep: usize) -> String {
    match s.char_indices().nth(keep) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

fn format_row(
    id: &str,
    title: &str,
    location: &str,
    contractor: &str,
    due: &str,
    status: &str,
    priority: &str,
) -> String {
    format!(
        "{:<5} {:<30} {:<20} {:<15} {:<15} {:<10} {:<15}",
        id, title, location, contractor, due, status, priority
    )
}

/// Header, one line per job, and closing rule
pub fn job_table(jobs: &[JobListRow]) -> Vec<String> {
    let rule = "-".repeat(RULE_WIDTH);
    let mut lines = Vec::with_capacity(jobs.len() + 3);

    lines.push(format_row(
        "ID",
        "Title",
        "Building/Unit",
        "Contractor",
        "Due date",
        "Status",
        "Priority",
    ));
    lines.push(rule.clone());

    for job in jobs {
        lines.push(format_row(
            &job.id.to_string(),
            &truncate(&job.title, TITLE_KEEP),
            &truncate(&job.location(), LOCATION_KEEP),
            &truncate(&job.contractor, CONTRACTOR_KEEP),
            &job.due.to_string(),
            &job.status,
            &job.priority,
        ));
    }

    lines.push(rule);
    lines
}
