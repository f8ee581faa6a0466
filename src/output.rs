//! Writing a parsed document into an output directory.

use crate::error::{Md2mapError, Result};
use crate::formats::parts::{plan_parts, PARTS_DIR};
use crate::formats::{all_formats, Document};
use crate::section::Section;
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|source| Md2mapError::io(path, source))?;
    debug!("Generated: {}", path.display());
    Ok(())
}

/// Writes `parts/`, INDEX.md and MAP.json under `out_dir`.
///
/// Part file names are recorded on `sections`. Returns the written paths.
///
/// # Errors
///
/// Returns an I/O error if a directory or file cannot be written.
pub fn write_outputs<S: AsRef<str>>(
    out_dir: &Path,
    input_file: &str,
    sections: &mut [Section],
    warnings: &[String],
    lines: &[S],
) -> Result<Vec<PathBuf>> {
    let parts_dir = out_dir.join(PARTS_DIR);
    fs::create_dir_all(&parts_dir).map_err(|source| Md2mapError::io(&parts_dir, source))?;

    info!("Generating parts...");
    let parts = plan_parts(sections, lines);
    let mut written = Vec::with_capacity(parts.len() + 2);
    for part in &parts {
        let path = out_dir.join(&part.relative_path);
        write_file(&path, &part.content)?;
        written.push(path);
    }

    let document = Document {
        input_file,
        sections,
        warnings,
        parts: &parts,
    };
    for format in all_formats() {
        info!("Generating {}...", format.file_name());
        let path = out_dir.join(format.file_name());
        write_file(&path, &format.render(&document)?)?;
        written.push(path);
    }

    info!("Output generated in: {}", out_dir.display());
    Ok(written)
}

/// Lists detected sections and the files a build would write.
///
/// Part file names are recorded on `sections`; nothing touches the disk.
#[must_use]
pub fn dry_run_report<S: AsRef<str>>(out_dir: &Path, sections: &mut [Section], lines: &[S]) -> String {
    let parts = plan_parts(sections, lines);
    let out = out_dir.display();
    let mut report = String::new();

    let _ = writeln!(report, "\n=== Detected Sections ({}) ===\n", sections.len());
    for section in sections.iter() {
        let indent = "  ".repeat(section.level.saturating_sub(1));
        let _ = writeln!(
            report,
            "{indent}[{}] [H{}] {} ({})",
            section.id.as_deref().unwrap_or("-"),
            section.level,
            section.subsplit_title.as_deref().unwrap_or(section.display_name()),
            section.line_range()
        );
    }

    let _ = writeln!(report, "\n=== Files to be generated ===\n");
    for format in all_formats() {
        let _ = writeln!(report, "  {out}/{}", format.file_name());
    }
    for part in &parts {
        let _ = writeln!(report, "  {out}/{}", part.relative_path);
    }
    report
}

#[cfg(test)]
#[path = "tests/output.rs"]
mod tests;
