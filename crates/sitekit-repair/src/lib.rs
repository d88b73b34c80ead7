//! Heuristic text repair for a single hand-damaged JavaScript file.
//!
//! This is string scanning, not parsing. Each pass runs once, in order:
//! byte-order mark, leading `)` on line 1, the `exportReport()` special case,
//! brace balancing, then template-literal and quote diagnostics.

pub mod balance;
pub mod export_report;
pub mod report;

pub use balance::{DelimiterCounts, DelimiterPair, QuoteIssue, QuoteKind};
pub use report::RepairReport;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const BACKUP_SUFFIX: &str = ".backup";

const BOM: char = '\u{feff}';

#[derive(Debug, Error)]
pub enum RepairError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("failed reading {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is not valid UTF-8", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },
    #[error("failed writing backup {}", path.display())]
    Backup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed writing {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repaired {
    pub content: String,
    pub report: RepairReport,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRepair {
    pub path: PathBuf,
    pub backup_path: PathBuf,
    pub report: RepairReport,
}

pub fn backup_path_for(file: &Path) -> PathBuf {
    let mut backup = file.as_os_str().to_os_string();
    backup.push(BACKUP_SUFFIX);
    PathBuf::from(backup)
}

/// Runs every pass over `source` without touching the filesystem.
pub fn repair_source(source: &str) -> Repaired {
    let mut report = RepairReport::default();

    let body = match source.strip_prefix(BOM) {
        Some(rest) => {
            report.bom_stripped = true;
            rest
        }
        None => source,
    };

    let mut lines: Vec<String> = body.split('\n').map(str::to_string).collect();

    report.leading_parens_removed = strip_leading_parens(&mut lines[0]);
    report.method_fixes = export_report::replace_incomplete_export_report(&mut lines);

    report.delimiters = balance::count_delimiters(&lines.join("\n"));
    report.braces_appended = report.delimiters.braces.excess_open();
    append_closing_braces(&mut lines, report.braces_appended);

    report.unclosed_template_lines = balance::unclosed_template_lines(&lines);

    let content = lines.join("\n");
    report.quote_issues = balance::quote_issues(&content);

    Repaired { content, report }
}

/// Reads `path`, writes `<path>.backup` with the original bytes, repairs the
/// text and writes it back to `path`, changed or not.
pub fn repair_file(path: &Path) -> Result<FileRepair, RepairError> {
    let bytes = fs::read(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            RepairError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            RepairError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    let source = String::from_utf8(bytes).map_err(|source| RepairError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let backup_path = backup_path_for(path);
    fs::write(&backup_path, source.as_bytes()).map_err(|source| RepairError::Backup {
        path: backup_path.clone(),
        source,
    })?;

    let repaired = repair_source(&source);
    fs::write(path, repaired.content.as_bytes()).map_err(|source| RepairError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(FileRepair {
        path: path.to_path_buf(),
        backup_path,
        report: repaired.report,
    })
}

fn strip_leading_parens(line: &mut String) -> usize {
    if !line.trim().starts_with(')') {
        return 0;
    }
    let unindented = line.trim_start();
    let stripped = unindented.trim_start_matches(')');
    let removed = unindented.len() - stripped.len();
    *line = stripped.to_string();
    removed
}

fn append_closing_braces(lines: &mut Vec<String>, count: usize) {
    if count == 0 {
        return;
    }
    let eol = if lines.iter().any(|line| line.ends_with('\r')) {
        "\r"
    } else {
        ""
    };
    let brace = format!("}}{eol}");

    if lines.len() > 1 && lines.last().is_some_and(String::is_empty) {
        // Keep the file's final newline after the appended braces.
        let trailing = lines.pop();
        lines.extend(std::iter::repeat_n(brace, count));
        lines.extend(trailing);
    } else {
        if let Some(last) = lines.last_mut() {
            last.push_str(eol);
        }
        lines.extend(std::iter::repeat_n(brace, count - 1));
        lines.push("}".to_string());
    }
}
