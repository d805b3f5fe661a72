//! String literal table.

use std::fmt::Write;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

/// Deduplicated string literals, labelled `str0`, `str1`, ... in first-use
/// order.
#[derive(Debug, Default)]
pub struct StringTable {
    labels: IndexMap<String, String, FxBuildHasher>,
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The label of `text`, allocating one on first use.
    pub fn intern(&mut self, text: &str) -> String {
        if let Some(label) = self.labels.get(text) {
            return label.clone();
        }
        let label = format!("str{}", self.labels.len());
        self.labels.insert(text.to_string(), label.clone());
        label
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// `strN: "<text>"` lines in first-use order.
    pub fn render(&self, out: &mut String) {
        for (text, label) in &self.labels {
            let _ = writeln!(out, "{}: \"{}\"", label, escape(text));
        }
    }
}

/// Re-escape decoded literal contents for the IR text.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            c => escaped.push(c),
        }
    }
    escaped
}
