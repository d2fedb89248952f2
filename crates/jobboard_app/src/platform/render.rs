//! Plain-text rendering of the view model.

use std::fmt::Write;

use jobboard_core::{AppViewModel, ApplicationRowView, JobRowView, PageStatus};

pub fn render_jobs(view: &AppViewModel, only_saved: bool) -> String {
    let mut out = String::new();
    if let Some(text) = status_line(&view.jobs_status) {
        out.push_str(&text);
        return out;
    }

    let rows: Vec<&JobRowView> = view
        .jobs
        .iter()
        .filter(|row| !only_saved || row.is_saved)
        .collect();

    if rows.is_empty() {
        out.push_str(if only_saved {
            "No saved jobs.\n"
        } else if view.filter_active {
            "No jobs match the current filters.\n"
        } else {
            "No jobs posted yet.\n"
        });
        return out;
    }

    for row in &rows {
        out.push_str(&job_line(row));
        out.push('\n');
    }

    if only_saved {
        let _ = writeln!(out, "{} saved", rows.len());
    } else if view.filter_active {
        let _ = writeln!(out, "{} of {} jobs", rows.len(), view.total_jobs);
    } else {
        let _ = writeln!(out, "{} jobs", rows.len());
    }
    out
}

pub fn render_applications(view: &AppViewModel) -> String {
    let mut out = String::new();
    if let Some(text) = status_line(&view.applications_status) {
        out.push_str(&text);
        return out;
    }
    if view.applications.is_empty() {
        out.push_str("No applications.\n");
        return out;
    }
    for row in &view.applications {
        out.push_str(&application_line(row));
        out.push('\n');
    }
    out
}

/// Header line naming the signed-in user, if any.
pub fn render_viewer(view: &AppViewModel) -> String {
    match &view.signed_in_as {
        Some(name) => format!("Signed in as {name}\n"),
        None => "Not signed in.\n".to_string(),
    }
}

fn status_line(status: &PageStatus) -> Option<String> {
    match status {
        PageStatus::Failed(message) => Some(format!("Error: {message}\n")),
        PageStatus::Loading => Some("Still loading...\n".to_string()),
        PageStatus::Idle | PageStatus::Ready => None,
    }
}

fn job_line(row: &JobRowView) -> String {
    let marker = if row.bookmark_pending {
        "[~]"
    } else if row.is_saved {
        "[*]"
    } else {
        "[ ]"
    };
    let mut line = format!("{marker} {:>5}  {}", row.job_id, row.title);
    let details: Vec<String> = [
        row.company.clone(),
        row.location.clone(),
        row.category.clone(),
        Some(row.salary.clone()),
        row.employment_type.map(|kind| kind.label().to_string()),
        row.updated_at
            .map(|at| format!("updated {}", at.format("%Y-%m-%d"))),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !details.is_empty() {
        let _ = write!(line, " | {}", details.join(" | "));
    }
    line
}

fn application_line(row: &ApplicationRowView) -> String {
    let mut line = format!(
        "{:>5}  {:<10} {}",
        row.application_id,
        row.status.label(),
        row.job_title
    );
    if let Some(company) = &row.company {
        let _ = write!(line, " @ {company}");
    }
    if let Some(at) = row.applied_at {
        let _ = write!(line, " | applied {}", at.format("%Y-%m-%d"));
    }
    if let Some(notes) = &row.employer_notes {
        let _ = write!(line, " | notes: {notes}");
    }
    line
}
