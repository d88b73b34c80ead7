use std::collections::BTreeMap;
use std::path::Path;

pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

const BUILT_IN: &[(&str, &str)] = &[
    ("html", "text/html; charset=utf-8"),
    ("htm", "text/html; charset=utf-8"),
    ("js", "application/javascript"),
    ("mjs", "application/javascript"),
    ("css", "text/css"),
    ("json", "application/json"),
    ("map", "application/json"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("txt", "text/plain; charset=utf-8"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
];

/// Extension to content-type table. Built once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimeMap {
    entries: BTreeMap<String, String>,
}

impl Default for MimeMap {
    fn default() -> Self {
        Self {
            entries: BUILT_IN
                .iter()
                .map(|(ext, content_type)| ((*ext).to_string(), (*content_type).to_string()))
                .collect(),
        }
    }
}

impl MimeMap {
    /// Layers `overrides` over the current entries. Keys may be given with or
    /// without the leading dot and in any case.
    pub fn with_overrides<I, K, V>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (ext, content_type) in overrides {
            self.entries
                .insert(normalize_extension(ext.as_ref()), content_type.into());
        }
        self
    }

    pub fn get(&self, extension: &str) -> Option<&str> {
        self.entries
            .get(&normalize_extension(extension))
            .map(String::as_str)
    }

    pub fn content_type_for(&self, path: &Path) -> &str {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.get(ext))
            .unwrap_or(FALLBACK_CONTENT_TYPE)
    }
}

fn normalize_extension(raw: &str) -> String {
    raw.trim().trim_start_matches('.').to_ascii_lowercase()
}
