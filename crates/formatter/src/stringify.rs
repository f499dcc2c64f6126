use crate::labels::LabelMap;
use thoughts_protocol::{is_context_docs_key, ThoughtValue};

/// Renders a thoughts payload as a `Label: value` transcript.
#[derive(Debug, Clone, Copy)]
pub struct ThoughtStringifier<'a> {
    labels: &'a LabelMap,
}

impl Default for ThoughtStringifier<'static> {
    fn default() -> Self {
        Self::new(LabelMap::builtin())
    }
}

impl<'a> ThoughtStringifier<'a> {
    #[must_use]
    pub const fn new(labels: &'a LabelMap) -> Self {
        Self { labels }
    }

    /// Strings come back unchanged, arrays become one line per element and objects one
    /// `Label: value` line per non-empty entry. `context_docs` entries are never rendered.
    /// Bare scalars and null give `""`.
    #[must_use]
    pub fn to_transcript(&self, value: &ThoughtValue) -> String {
        match value {
            ThoughtValue::String(s) => s.clone(),
            ThoughtValue::Array(items) => items
                .iter()
                .map(|item| self.array_item(item))
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
            ThoughtValue::Object(entries) => entries
                .iter()
                .filter(|(key, _)| !is_context_docs_key(key))
                .filter_map(|(key, value)| self.labelled(key, value))
                .collect::<Vec<_>>()
                .join("\n"),
            ThoughtValue::Null | ThoughtValue::Bool(_) | ThoughtValue::Number(_) => String::new(),
        }
    }

    fn array_item(&self, item: &ThoughtValue) -> String {
        match item {
            ThoughtValue::String(s) => s.clone(),
            ThoughtValue::Object(_) | ThoughtValue::Array(_) => self.to_transcript(item),
            other => other.scalar_text().unwrap_or_default(),
        }
    }

    /// Single-line rendering of a field value.
    ///
    /// Strings are trimmed, arrays join with `", "` and nested objects join their own
    /// entries with `"; "`. An object that carries `context_docs` renders as `""`.
    #[must_use]
    pub fn format_value(&self, value: &ThoughtValue) -> String {
        match value {
            ThoughtValue::Null => String::new(),
            ThoughtValue::String(s) => s.trim().to_string(),
            ThoughtValue::Bool(_) | ThoughtValue::Number(_) => {
                value.scalar_text().unwrap_or_default()
            }
            ThoughtValue::Array(items) => items
                .iter()
                .map(|item| self.format_value(item))
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
            ThoughtValue::Object(_) if value.has_context_docs() => String::new(),
            ThoughtValue::Object(entries) => entries
                .iter()
                .filter_map(|(key, value)| self.labelled(key, value))
                .collect::<Vec<_>>()
                .join("; "),
        }
    }

    fn labelled(&self, key: &str, value: &ThoughtValue) -> Option<String> {
        let formatted = self.format_value(value);
        if formatted.is_empty() {
            return None;
        }
        Some(format!("{}: {formatted}", self.labels.label_for(key)))
    }
}

/// Transcript with the built-in label map.
#[must_use]
pub fn raw_thoughts_to_string(value: &ThoughtValue) -> String {
    ThoughtStringifier::default().to_transcript(value)
}

/// Field formatting with the built-in label map.
#[must_use]
pub fn format_value(value: &ThoughtValue) -> String {
    ThoughtStringifier::default().format_value(value)
}
