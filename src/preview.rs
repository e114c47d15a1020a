//! Durable preview of the candidate set, written before anything is deleted.
//!
//! Two artifacts share the run stamp: a line-oriented preview document for
//! human inspection and a CSV export (`s3_uri,uploaded_at`) for tooling.
//! Both are written in full before the confirmation gate runs, so a crash
//! after preview still leaves a usable record of intent.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::SecondsFormat;
use csv::Writer;
use serde::Serialize;
use tracing::info;

use crate::error::PurgeError;
use crate::scan::Candidate;
use crate::stamp::RunStamp;
use crate::store::object_uri;
use crate::window::ScanWindow;

/// Paths of the artifacts a preview pass wrote.
#[derive(Debug, Clone)]
pub struct PreviewArtifacts {
    pub text_path: PathBuf,
    pub csv_path: PathBuf,
}

/// One CSV export row. Field names are the export schema.
#[derive(Serialize)]
struct ExportRow {
    s3_uri: String,
    uploaded_at: String,
}

/// Write the preview document and CSV export for this run's candidates.
pub fn record_preview(
    output_dir: &Path,
    stamp: RunStamp,
    bucket: &str,
    prefix: Option<&str>,
    window: &ScanWindow,
    candidates: &[Candidate],
) -> Result<PreviewArtifacts, PurgeError> {
    fs::create_dir_all(output_dir)?;

    let base = format!("candidates-{bucket}-{}", stamp.tag());
    let text_path = output_dir.join(format!("{base}.txt"));
    let csv_path = output_dir.join(format!("{base}.csv"));

    let text = render_preview_text(stamp, bucket, prefix, window, candidates);
    write_atomic(&text_path, text.as_bytes())?;

    let csv = render_export_csv(bucket, candidates)?;
    write_atomic(&csv_path, &csv)?;

    info!(
        preview = %text_path.display(),
        export = %csv_path.display(),
        candidates = candidates.len(),
        "Preview artifacts written"
    );

    Ok(PreviewArtifacts {
        text_path,
        csv_path,
    })
}

fn render_preview_text(
    stamp: RunStamp,
    bucket: &str,
    prefix: Option<&str>,
    window: &ScanWindow,
    candidates: &[Candidate],
) -> String {
    let mut out = String::new();
    out.push_str(&format!("run: {}\n", stamp.iso()));
    out.push_str(&format!("bucket: {bucket}\n"));
    out.push_str(&format!("prefix: {}\n", prefix.unwrap_or("(none)")));
    out.push_str(&format!(
        "window: {} .. {}\n",
        window.start.to_rfc3339_opts(SecondsFormat::Millis, true),
        window.end.to_rfc3339_opts(SecondsFormat::Millis, true)
    ));
    out.push_str(&format!("candidates: {}\n\n", candidates.len()));

    for candidate in candidates {
        out.push_str(&format!(
            "{}\t{}\n",
            candidate
                .last_modified
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            object_uri(bucket, &candidate.key)
        ));
    }
    out
}

fn render_export_csv(bucket: &str, candidates: &[Candidate]) -> Result<Vec<u8>, PurgeError> {
    let mut writer = Writer::from_writer(Vec::new());
    for candidate in candidates {
        writer.serialize(ExportRow {
            s3_uri: object_uri(bucket, &candidate.key),
            uploaded_at: candidate
                .last_modified
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        })?;
    }
    writer
        .into_inner()
        .map_err(|e| PurgeError::Io(std::io::Error::other(e.to_string())))
}

/// All-or-nothing write: temp file in the same directory, then rename.
fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, contents)?;
    fs::rename(&temp_path, path)
}
