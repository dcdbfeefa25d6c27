//! Writing export jobs to disk
//!
//! Sheets become CSV files (UTF-8 with a byte-order mark so spreadsheet
//! programs keep the accents); reports become self-contained printable HTML.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use eudr_core::{ExportJob, Report, ReportSection, Sheet};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportWriteError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(String),
}

impl From<csv::Error> for ExportWriteError {
    fn from(error: csv::Error) -> Self {
        ExportWriteError::Csv(error.to_string())
    }
}

const BOM: &[u8] = "\u{feff}".as_bytes();

pub fn write_sheet<W: Write>(sheet: &Sheet, mut writer: W) -> Result<(), ExportWriteError> {
    writer.write_all(BOM)?;
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(&sheet.headers)?;
    for row in &sheet.rows {
        csv_writer.write_record(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const REPORT_STYLE: &str = "body{font-family:Helvetica,Arial,sans-serif;margin:24px;color:#222}\
h1{font-size:20px;margin-bottom:4px}h2{font-size:15px;margin:18px 0 6px}\
.subtitle{color:#666;font-size:12px}\
table{border-collapse:collapse;width:100%;font-size:11px}\
th{background:#2e7d32;color:#fff;text-align:left;padding:6px}\
td{border-bottom:1px solid #ddd;padding:5px;vertical-align:top}\
tr:nth-child(even) td{background:#f5f5f5}\
dl{display:grid;grid-template-columns:200px 1fr;gap:4px 12px;font-size:12px}\
dt{font-weight:bold}dd{margin:0}\
@media print{body{margin:0}}";

pub fn render_report(report: &Report) -> String {
    let mut html = String::new();
    // Writing into a String cannot fail
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{title}</title><style>{style}</style></head>\n<body>\n<h1>{title}</h1>\n",
        title = escape_html(&report.title),
        style = REPORT_STYLE,
    );
    if let Some(subtitle) = &report.subtitle {
        let _ = writeln!(html, "<p class=\"subtitle\">{}</p>", escape_html(subtitle));
    }

    for section in &report.sections {
        match section {
            ReportSection::Table { headers, rows } => {
                html.push_str("<table>\n<thead><tr>");
                for header in headers {
                    let _ = write!(html, "<th>{}</th>", escape_html(header));
                }
                html.push_str("</tr></thead>\n<tbody>\n");
                for row in rows {
                    html.push_str("<tr>");
                    for cell in row {
                        let _ = write!(html, "<td>{}</td>", escape_html(cell));
                    }
                    html.push_str("</tr>\n");
                }
                html.push_str("</tbody>\n</table>\n");
            }
            ReportSection::Fields(fields) => {
                html.push_str("<dl>\n");
                for (label, value) in fields {
                    let _ = writeln!(html, "<dt>{}</dt><dd>{}</dd>", escape_html(label), escape_html(value));
                }
                html.push_str("</dl>\n");
            }
            ReportSection::Paragraph { heading, text } => {
                let _ = writeln!(html, "<h2>{}</h2>\n<p>{}</p>", escape_html(heading), escape_html(text));
            }
        }
    }

    html.push_str("</body></html>\n");
    html
}

/// Write a job to `path`
pub fn write_job(job: &ExportJob, path: &Path) -> Result<(), ExportWriteError> {
    let mut writer = BufWriter::new(File::create(path)?);
    match job {
        ExportJob::Sheet(sheet) => write_sheet(sheet, &mut writer)?,
        ExportJob::Report(report) => writer.write_all(render_report(report).as_bytes())?,
    }
    writer.flush()?;
    tracing::info!("Exported {} to {:?}", job.file_name(), path);
    Ok(())
}

/// Ask for a destination, pre-filled with the job's file name, then write.
///
/// Returns `Ok(None)` when the dialog is cancelled.
pub fn save_with_dialog(job: &ExportJob, directory: Option<&Path>) -> Result<Option<PathBuf>, ExportWriteError> {
    let (filter_name, extension) = match job {
        ExportJob::Sheet(_) => ("CSV", "csv"),
        ExportJob::Report(_) => ("HTML Document", "html"),
    };

    let mut dialog = rfd::FileDialog::new()
        .set_title("Export restrictions")
        .add_filter(filter_name, &[extension])
        .set_file_name(job.file_name());
    if let Some(directory) = directory {
        dialog = dialog.set_directory(directory);
    }

    let Some(path) = dialog.save_file() else {
        return Ok(None);
    };
    write_job(job, &path)?;
    Ok(Some(path))
}
