use crate::error::{FormatError, Result};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::collections::BTreeMap;
use thoughts_protocol::{MetaField, MetaFields};

const CONTENT_MARKER: &str = "content:";

/// Label synonyms per field, highest priority first.
const BUILTIN_SYNONYMS: &[(MetaField, &[&str])] = &[
    (MetaField::ModelUsed, &["Model Used", "LLM Used"]),
    (MetaField::ToolSelected, &["Tool Selected", "Selected Tool"]),
    (MetaField::QueryCategory, &["Query Category"]),
    (MetaField::RequiredRetrieval, &["Required Retrieval", "Retrieval Required"]),
    (
        MetaField::NumberOfDocumentsRetrieved,
        &["Number of documents retrieved", "Documents Retrieved"],
    ),
    (MetaField::McpToolUsed, &["MCP Tool Used", "Last MCP Tool Used"]),
    (MetaField::McpToolsUsed, &["MCP Tools Used"]),
    (MetaField::AgentType, &["Agent Type"]),
    (MetaField::ContextRetrieved, &["Context Retrieved"]),
    (MetaField::OriginalQuery, &["Original Query"]),
    (MetaField::RewrittenQuery, &["Rewritten Query"]),
];

static BUILTIN: Lazy<MetaFieldExtractor> = Lazy::new(|| {
    MetaFieldExtractor::with_overrides(&BTreeMap::new())
        .unwrap_or_else(|err| panic!("built-in meta labels must compile: {err}"))
});

/// Built-in synonym list for `field`.
#[must_use]
pub fn builtin_synonyms(field: MetaField) -> &'static [&'static str] {
    BUILTIN_SYNONYMS
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, labels)| *labels)
        .unwrap_or(&[])
}

/// Pulls named fields out of free text by label.
///
/// A label matches case-insensitively with any run of whitespace between its words,
/// followed by `:`. The value runs to the next `/`, CR or LF and is trimmed.
#[derive(Debug, Clone)]
pub struct MetaFieldExtractor {
    fields: Vec<(MetaField, Vec<Regex>)>,
}

impl MetaFieldExtractor {
    #[must_use]
    pub fn builtin() -> &'static MetaFieldExtractor {
        &BUILTIN
    }

    /// Built-in synonyms, with the lists in `overrides` replacing those of their fields.
    pub fn with_overrides(overrides: &BTreeMap<MetaField, Vec<String>>) -> Result<Self> {
        let mut fields = Vec::with_capacity(MetaField::ALL.len());
        for field in MetaField::ALL {
            let patterns = match overrides.get(&field) {
                Some(labels) => labels
                    .iter()
                    .map(|label| label_pattern(label))
                    .collect::<Result<Vec<_>>>()?,
                None => builtin_synonyms(field)
                    .iter()
                    .map(|label| label_pattern(label))
                    .collect::<Result<Vec<_>>>()?,
            };
            fields.push((field, patterns));
        }
        Ok(Self { fields })
    }

    #[must_use]
    pub fn parse(&self, text: &str) -> MetaFields {
        let mut meta = MetaFields::default();
        if text.is_empty() {
            return meta;
        }
        for (field, patterns) in &self.fields {
            if let Some(value) = patterns.iter().find_map(|re| first_value(re, text)) {
                meta.set(*field, value);
            }
        }
        meta
    }
}

fn first_value<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .find(|value| !value.is_empty())
}

/// `label \s* : [ \t]* (value)`, case-insensitive, label words split on `\s+`.
///
/// Only horizontal whitespace is skipped after the colon, so an empty label never captures
/// the following line. `first_value` moves on to the next occurrence when a capture is empty.
fn label_pattern(label: &str) -> Result<Regex> {
    let words: Vec<String> = label.split_whitespace().map(regex::escape).collect();
    if words.is_empty() {
        return Err(FormatError::invalid_config("meta label must not be blank"));
    }
    let boundary = if label.trim_start().starts_with(|c: char| c.is_alphanumeric()) {
        r"\b"
    } else {
        ""
    };
    let pattern = format!(r"{boundary}{}\s*:[^\S\r\n]*([^/\r\n]*)", words.join(r"\s+"));
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| FormatError::Pattern {
            label: label.to_string(),
            source,
        })
}

/// Parse with the built-in synonym table.
#[must_use]
pub fn parse_meta(text: &str) -> MetaFields {
    MetaFieldExtractor::builtin().parse(text)
}

/// Everything before the first case-insensitive `Content:` marker.
///
/// Transcripts put commentary first and the retrieved document dump after the marker;
/// metadata parsing should only see the commentary.
pub fn extract_pre_content<'a>(text: impl Into<Option<&'a str>>) -> &'a str {
    let Some(text) = text.into() else {
        return "";
    };
    match text.to_ascii_lowercase().find(CONTENT_MARKER) {
        Some(idx) => &text[..idx],
        None => text,
    }
}
