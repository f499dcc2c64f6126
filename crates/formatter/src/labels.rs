use once_cell::sync::Lazy;
use std::borrow::Cow;
use std::collections::HashMap;

/// Built-in display labels, keyed by normalized snake_case key.
const BUILTIN_LABELS: &[(&str, &str)] = &[
    ("model_used", "Model Used"),
    ("tool_selected", "Tool Selected"),
    ("query_category", "Query Category"),
    ("required_retrieval", "Required Retrieval"),
    ("number_of_documents_retrieved", "Number of Documents Retrieved"),
    ("mcp_tool_used", "MCP Tool Used"),
    ("mcp_tools_used", "MCP Tools Used"),
    ("last_mcp_tool_used", "Last MCP Tool Used"),
    ("agent_type", "Agent Type"),
    ("context_retrieved", "Context Retrieved"),
    ("original_query", "Original Query"),
    ("rewritten_query", "Rewritten Query"),
    ("llm", "LLM"),
    ("llm_used", "LLM Used"),
    ("mcp", "MCP"),
    ("url", "URL"),
    ("id", "ID"),
];

static BUILTIN: Lazy<LabelMap> = Lazy::new(|| LabelMap {
    overrides: BUILTIN_LABELS
        .iter()
        .map(|(key, label)| ((*key).to_string(), (*label).to_string()))
        .collect(),
});

/// Maps raw payload keys to display labels.
///
/// Lookups normalize the key first, so `modelUsed`, `model-used` and `model_used` all
/// resolve to the same entry. Keys without an entry fall back to [`humanize_key`].
#[derive(Debug, Clone, Default)]
pub struct LabelMap {
    overrides: HashMap<String, String>,
}

impl LabelMap {
    /// The immutable built-in table.
    #[must_use]
    pub fn builtin() -> &'static LabelMap {
        &BUILTIN
    }

    /// Built-in table with `extra` layered on top.
    pub fn with_overrides<I, K, V>(extra: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut map = BUILTIN.clone();
        for (key, label) in extra {
            map.overrides
                .insert(normalize_key(key.as_ref()), label.into());
        }
        map
    }

    #[must_use]
    pub fn label_for<'a>(&'a self, key: &str) -> Cow<'a, str> {
        match self.overrides.get(&normalize_key(key)) {
            Some(label) => Cow::Borrowed(label.as_str()),
            None => Cow::Owned(humanize_key(key)),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

/// `modelUsed` / `Model-Used` / `MCPToolUsed` -> `model_used` / `model_used` / `mcp_tool_used`.
#[must_use]
pub fn normalize_key(key: &str) -> String {
    let chars: Vec<char> = key.trim().chars().collect();
    let mut out = String::with_capacity(chars.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == '_' || c.is_whitespace() {
            if !out.ends_with('_') && !out.is_empty() {
                out.push('_');
            }
            continue;
        }
        if c.is_uppercase() && i > 0 && !out.ends_with('_') {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    out.trim_end_matches('_').to_string()
}

/// Generic key -> label conversion: separators become spaces, camelCase boundaries are
/// split and each word is capitalized.
#[must_use]
pub fn humanize_key(key: &str) -> String {
    let mut spaced = String::with_capacity(key.len() + 4);
    let mut prev: Option<char> = None;
    for c in key.chars() {
        if c == '_' || c == '-' {
            spaced.push(' ');
        } else {
            if c.is_uppercase() && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
                spaced.push(' ');
            }
            spaced.push(c);
        }
        prev = Some(c);
    }

    spaced
        .split_whitespace()
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
