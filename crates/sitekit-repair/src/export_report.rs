//! Hardcoded repair for one known breakage in
//! `js/views/zero-trust-executive-platform.js`: the body of `exportReport()`
//! was cut off mid-statement. Only that method and that exact truncation are
//! recognised; nothing here is meant to generalise to other files.

use regex::Regex;
use std::sync::LazyLock;

pub const METHOD_NAME: &str = "exportReport";

const TRUNCATED_PREFIX: &str = "console.log('📄 Exporting";

const REPLACEMENT_BODY: &str = "        console.log('📄 Exporting comprehensive report...');\n        alert('Comprehensive report export initiated. This would generate a detailed PDF/Excel report.');";

static METHOD_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*exportReport\s*\(\s*\)\s*\{\s*$").expect("method header pattern is valid")
});

fn is_truncated_statement(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with(TRUNCATED_PREFIX) && !trimmed.ends_with(';')
}

/// Empties `line` but keeps a trailing `\r` so CRLF files stay CRLF.
fn blank_line(line: &mut String) {
    let carriage_return = line.ends_with('\r');
    line.clear();
    if carriage_return {
        line.push('\r');
    }
}

/// Rewrites every truncated `exportReport()` body in place and returns the
/// 1-based line numbers of the method headers that were repaired.
///
/// The truncated line is replaced with the full body; the lines after it are
/// blanked until one that starts with `}`, so the line count is unchanged.
/// Lines are expected to come from splitting on `\n`; a truncated line ending
/// in `\r` gets a CRLF replacement body.
pub fn replace_incomplete_export_report(lines: &mut [String]) -> Vec<usize> {
    let mut repaired = Vec::new();
    let mut i = 0;
    while i + 1 < lines.len() {
        if !METHOD_HEADER.is_match(&lines[i]) || !is_truncated_statement(&lines[i + 1]) {
            i += 1;
            continue;
        }

        let crlf = lines[i + 1].ends_with('\r');
        lines[i + 1] = if crlf {
            format!("{}\r", REPLACEMENT_BODY.replace('\n', "\r\n"))
        } else {
            REPLACEMENT_BODY.to_string()
        };
        let mut j = i + 2;
        while j < lines.len() && !lines[j].trim_start().starts_with('}') {
            blank_line(&mut lines[j]);
            j += 1;
        }
        repaired.push(i + 1);
        i = j;
    }
    repaired
}
