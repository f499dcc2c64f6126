use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub mod value;

pub use value::{is_context_docs_key, ThoughtValue, CONTEXT_DOCS_KEY};

pub const DISPLAY_SCHEMA_VERSION: u32 = 1;

/// Classification of a displayable string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Html,
    Markdown,
    Text,
}

impl ContentType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Markdown => "markdown",
            Self::Text => "text",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A retrieved reference document surfaced alongside an answer.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct ContextDoc {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ContextDoc {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Named fields pulled out of a thought transcript. A field is `None` when its label is
/// absent; it is never `Some("")`.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetaFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_used: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_selected: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_retrieval: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_documents_retrieved: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcp_tool_used: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcp_tools_used: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_retrieved: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewritten_query: Option<String>,
}

/// Identifies one `MetaFields` slot; names match the camelCase JSON keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetaField {
    ModelUsed,
    ToolSelected,
    QueryCategory,
    RequiredRetrieval,
    NumberOfDocumentsRetrieved,
    McpToolUsed,
    McpToolsUsed,
    AgentType,
    ContextRetrieved,
    OriginalQuery,
    RewrittenQuery,
}

impl MetaField {
    pub const ALL: [MetaField; 11] = [
        Self::ModelUsed,
        Self::ToolSelected,
        Self::QueryCategory,
        Self::RequiredRetrieval,
        Self::NumberOfDocumentsRetrieved,
        Self::McpToolUsed,
        Self::McpToolsUsed,
        Self::AgentType,
        Self::ContextRetrieved,
        Self::OriginalQuery,
        Self::RewrittenQuery,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ModelUsed => "modelUsed",
            Self::ToolSelected => "toolSelected",
            Self::QueryCategory => "queryCategory",
            Self::RequiredRetrieval => "requiredRetrieval",
            Self::NumberOfDocumentsRetrieved => "numberOfDocumentsRetrieved",
            Self::McpToolUsed => "mcpToolUsed",
            Self::McpToolsUsed => "mcpToolsUsed",
            Self::AgentType => "agentType",
            Self::ContextRetrieved => "contextRetrieved",
            Self::OriginalQuery => "originalQuery",
            Self::RewrittenQuery => "rewrittenQuery",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }
}

impl MetaFields {
    #[must_use]
    pub fn get(&self, field: MetaField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    /// Stores `value` unless it is empty.
    pub fn set(&mut self, field: MetaField, value: impl Into<String>) {
        let value = value.into();
        *self.slot_mut(field) = (!value.is_empty()).then_some(value);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        MetaField::ALL.into_iter().all(|field| self.get(field).is_none())
    }

    const fn slot(&self, field: MetaField) -> &Option<String> {
        match field {
            MetaField::ModelUsed => &self.model_used,
            MetaField::ToolSelected => &self.tool_selected,
            MetaField::QueryCategory => &self.query_category,
            MetaField::RequiredRetrieval => &self.required_retrieval,
            MetaField::NumberOfDocumentsRetrieved => &self.number_of_documents_retrieved,
            MetaField::McpToolUsed => &self.mcp_tool_used,
            MetaField::McpToolsUsed => &self.mcp_tools_used,
            MetaField::AgentType => &self.agent_type,
            MetaField::ContextRetrieved => &self.context_retrieved,
            MetaField::OriginalQuery => &self.original_query,
            MetaField::RewrittenQuery => &self.rewritten_query,
        }
    }

    fn slot_mut(&mut self, field: MetaField) -> &mut Option<String> {
        match field {
            MetaField::ModelUsed => &mut self.model_used,
            MetaField::ToolSelected => &mut self.tool_selected,
            MetaField::QueryCategory => &mut self.query_category,
            MetaField::RequiredRetrieval => &mut self.required_retrieval,
            MetaField::NumberOfDocumentsRetrieved => &mut self.number_of_documents_retrieved,
            MetaField::McpToolUsed => &mut self.mcp_tool_used,
            MetaField::McpToolsUsed => &mut self.mcp_tools_used,
            MetaField::AgentType => &mut self.agent_type,
            MetaField::ContextRetrieved => &mut self.context_retrieved,
            MetaField::OriginalQuery => &mut self.original_query,
            MetaField::RewrittenQuery => &mut self.rewritten_query,
        }
    }
}

/// Everything the display layer needs for one thoughts payload.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThoughtDisplay {
    pub schema_version: u32,
    pub transcript: String,
    pub content_type: ContentType,
    pub plain_text: String,
    pub meta: MetaFields,
    #[serde(default)]
    pub context_docs: Vec<ContextDoc>,
}

pub fn serialize_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<String> {
    let raw = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_fields_serialize_camel_case_and_skip_missing() {
        let mut meta = MetaFields::default();
        meta.set(MetaField::ModelUsed, "gpt-4");
        meta.set(MetaField::AgentType, "");
        let raw = serde_json::to_string(&meta).unwrap();
        assert_eq!(raw, r#"{"modelUsed":"gpt-4"}"#);
        assert_eq!(meta.get(MetaField::AgentType), None);
    }

    #[test]
    fn meta_field_names_round_trip() {
        for field in MetaField::ALL {
            assert_eq!(MetaField::from_name(field.name()), Some(field));
        }
        assert_eq!(MetaField::from_name("model_used"), None);
    }

    #[test]
    fn context_doc_omits_missing_source() {
        let raw = serde_json::to_string(&ContextDoc::new("x")).unwrap();
        assert_eq!(raw, r#"{"content":"x"}"#);
        let with = ContextDoc::new("y").with_source("http://a");
        assert_eq!(with.source.as_deref(), Some("http://a"));
    }

    #[test]
    fn content_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ContentType::Markdown).unwrap(),
            "\"markdown\""
        );
        assert_eq!(ContentType::Html.to_string(), "html");
    }
}
