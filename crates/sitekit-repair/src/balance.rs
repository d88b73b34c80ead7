#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DelimiterPair {
    pub open: usize,
    pub close: usize,
}

impl DelimiterPair {
    pub fn is_balanced(&self) -> bool {
        self.open == self.close
    }

    pub fn excess_open(&self) -> usize {
        self.open.saturating_sub(self.close)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DelimiterCounts {
    pub braces: DelimiterPair,
    pub parens: DelimiterPair,
    pub brackets: DelimiterPair,
}

pub fn count_delimiters(text: &str) -> DelimiterCounts {
    let mut counts = DelimiterCounts::default();
    for ch in text.chars() {
        match ch {
            '{' => counts.braces.open += 1,
            '}' => counts.braces.close += 1,
            '(' => counts.parens.open += 1,
            ')' => counts.parens.close += 1,
            '[' => counts.brackets.open += 1,
            ']' => counts.brackets.close += 1,
            _ => {}
        }
    }
    counts
}

/// 1-based numbers of lines holding an odd number of backticks.
pub fn unclosed_template_lines<S: AsRef<str>>(lines: &[S]) -> Vec<usize> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.as_ref().matches('`').count() % 2 == 1)
        .map(|(index, _)| index + 1)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteKind {
    Single,
    Double,
    Backtick,
}

impl QuoteKind {
    pub const ALL: [QuoteKind; 3] = [QuoteKind::Single, QuoteKind::Double, QuoteKind::Backtick];

    pub fn as_char(self) -> char {
        match self {
            QuoteKind::Single => '\'',
            QuoteKind::Double => '"',
            QuoteKind::Backtick => '`',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QuoteKind::Single => "single quotes",
            QuoteKind::Double => "double quotes",
            QuoteKind::Backtick => "backticks",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteIssue {
    pub kind: QuoteKind,
    pub count: usize,
}

/// Raw occurrences minus backslash-escaped occurrences. An escaped backslash
/// right before a quote (`\\"`) still counts as an escape, so the result can be
/// off for such input.
pub fn naive_quote_count(text: &str, kind: QuoteKind) -> usize {
    let quote = kind.as_char();
    let escaped = format!("\\{quote}");
    text.matches(quote).count() - text.matches(escaped.as_str()).count()
}

pub fn quote_issues(text: &str) -> Vec<QuoteIssue> {
    QuoteKind::ALL
        .into_iter()
        .map(|kind| QuoteIssue {
            kind,
            count: naive_quote_count(text, kind),
        })
        .filter(|issue| issue.count % 2 == 1)
        .collect()
}
