//! Static HTML report of the current course catalog

use std::fs;
use std::path::Path;

use chrono::Utc;
use tracing::info;

use crate::error::Result;
use crate::models::CourseRecord;

/// Render the full record list as a standalone HTML page, sorted by title
/// (case-folded), then id.
pub fn render_report(records: &[CourseRecord]) -> String {
    let mut sorted: Vec<&CourseRecord> = records.iter().collect();
    sorted.sort_by(|a, b| {
        (a.title.to_lowercase(), &a.id).cmp(&(b.title.to_lowercase(), &b.id))
    });

    let mut rows = String::new();
    for record in &sorted {
        rows.push_str(&format!(
            "<tr><td>{}</td><td><a href=\"{}\">{}</a></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape(&record.id),
            escape(&record.detail_url),
            escape(&record.title),
            escape(&record.instructor),
            escape(&record.term),
            escape(&record.schedule),
            escape(record.room.as_deref().unwrap_or("-")),
            escape(record.updated_at.as_deref().unwrap_or("-")),
        ));
    }

    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>Course catalog</title></head>\n\
         <body>\n<h1>Course catalog</h1>\n\
         <p>{} courses, generated {}</p>\n\
         <table border=\"1\">\n\
         <tr><th>Code</th><th>Title</th><th>Instructor</th><th>Term</th><th>Day/Period</th><th>Room</th><th>Updated</th></tr>\n\
         {}</table>\n</body></html>\n",
        records.len(),
        Utc::now().format("%Y-%m-%d %H:%M UTC"),
        rows
    )
}

/// Write the report, creating missing parent directories
pub fn write_report(path: &Path, records: &[CourseRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, render_report(records))?;
    info!(path = %path.display(), count = records.len(), "Wrote HTML report");
    Ok(())
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
