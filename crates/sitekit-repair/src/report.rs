use crate::balance::{DelimiterCounts, DelimiterPair, QuoteIssue};
use crate::export_report::METHOD_NAME;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RepairReport {
    pub bom_stripped: bool,
    pub leading_parens_removed: usize,
    pub method_fixes: Vec<usize>,
    pub delimiters: DelimiterCounts,
    pub braces_appended: usize,
    pub unclosed_template_lines: Vec<usize>,
    pub quote_issues: Vec<QuoteIssue>,
}

impl RepairReport {
    /// Whether any fix altered the content. Diagnostics alone do not count.
    pub fn changed(&self) -> bool {
        self.bom_stripped
            || self.leading_parens_removed > 0
            || !self.method_fixes.is_empty()
            || self.braces_appended > 0
    }

    pub fn diagnostic_lines(&self) -> Vec<String> {
        let mut out = Vec::new();

        if self.bom_stripped {
            out.push("stripped byte-order mark".to_string());
        }
        if self.leading_parens_removed > 0 {
            out.push(format!(
                "removed {} leading ')' from line 1",
                self.leading_parens_removed
            ));
        }

        if self.method_fixes.is_empty() {
            out.push(format!("warning: no incomplete {METHOD_NAME}() body found"));
        }
        for line in &self.method_fixes {
            out.push(format!("replaced incomplete {METHOD_NAME}() body after line {line}"));
        }

        out.push(count_line("braces", self.delimiters.braces));
        out.push(count_line("parentheses", self.delimiters.parens));
        out.push(count_line("brackets", self.delimiters.brackets));

        if self.braces_appended > 0 {
            out.push(format!("appended {} closing brace(s)", self.braces_appended));
        }
        let braces = self.delimiters.braces;
        if braces.close > braces.open {
            out.push(format!(
                "warning: {} more closing than opening braces",
                braces.close - braces.open
            ));
        }
        for (name, pair) in [
            ("parentheses", self.delimiters.parens),
            ("brackets", self.delimiters.brackets),
        ] {
            if !pair.is_balanced() {
                out.push(format!(
                    "warning: unbalanced {name} ({} open, {} close)",
                    pair.open, pair.close
                ));
            }
        }

        for line in &self.unclosed_template_lines {
            out.push(format!("warning: unclosed template literal on line {line}"));
        }
        for issue in &self.quote_issues {
            out.push(format!(
                "warning: odd number of {} ({})",
                issue.kind.label(),
                issue.count
            ));
        }

        out
    }
}

fn count_line(name: &str, pair: DelimiterPair) -> String {
    format!("{name}: {} open, {} close", pair.open, pair.close)
}
