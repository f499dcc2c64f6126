use crate::config::FormatterConfig;
use crate::content_type::ContentTypeClassifier;
use crate::context_docs::extract_context_docs;
use crate::error::{FormatError, Result};
use crate::labels::LabelMap;
use crate::meta::{extract_pre_content, MetaFieldExtractor};
use crate::sanitize::PlainTextSanitizer;
use crate::stringify::ThoughtStringifier;
use thoughts_protocol::{
    ContentType, ContextDoc, MetaFields, ThoughtDisplay, ThoughtValue, DISPLAY_SCHEMA_VERSION,
};

/// Runs the whole pipeline over one thoughts payload.
///
/// Labels and meta patterns are compiled once at construction; every stage can still be
/// called on its own.
#[derive(Debug, Clone)]
pub struct ThoughtFormatter {
    labels: LabelMap,
    meta: MetaFieldExtractor,
    sanitizer: PlainTextSanitizer,
    pre_content_only: bool,
}

impl Default for ThoughtFormatter {
    fn default() -> Self {
        Self {
            labels: LabelMap::builtin().clone(),
            meta: MetaFieldExtractor::builtin().clone(),
            sanitizer: PlainTextSanitizer::new(),
            pre_content_only: true,
        }
    }
}

impl ThoughtFormatter {
    pub fn new(config: &FormatterConfig) -> Result<Self> {
        config.validate()?;
        let labels = LabelMap::with_overrides(&config.labels);
        let meta = MetaFieldExtractor::with_overrides(&config.meta_overrides())?;
        log::debug!(
            "formatter ready: {} labels, pre_content_only={}",
            labels.len(),
            config.pre_content_only
        );
        Ok(Self {
            labels,
            meta,
            sanitizer: PlainTextSanitizer::new(),
            pre_content_only: config.pre_content_only,
        })
    }

    #[must_use]
    pub fn stringifier(&self) -> ThoughtStringifier<'_> {
        ThoughtStringifier::new(&self.labels)
    }

    #[must_use]
    pub fn transcript(&self, thoughts: &ThoughtValue) -> String {
        self.stringifier().to_transcript(thoughts)
    }

    #[must_use]
    pub fn classify(&self, text: &str) -> ContentType {
        ContentTypeClassifier::classify(text)
    }

    #[must_use]
    pub fn plain_text(&self, text: &str) -> String {
        self.sanitizer.to_plain_text(text)
    }

    /// Metadata from `text`, restricted to the pre-content part when configured.
    #[must_use]
    pub fn meta(&self, text: &str) -> MetaFields {
        if self.pre_content_only {
            self.meta.parse(extract_pre_content(text))
        } else {
            self.meta.parse(text)
        }
    }

    #[must_use]
    pub fn context_docs(&self, thoughts: &ThoughtValue) -> Vec<ContextDoc> {
        extract_context_docs(thoughts)
    }

    #[must_use]
    pub fn render(&self, thoughts: &ThoughtValue) -> ThoughtDisplay {
        let transcript = self.transcript(thoughts);
        let content_type = self.classify(&transcript);
        let plain_text = self.plain_text(&transcript);
        // Markup around labels would leak into captured values.
        let meta = self.meta(&plain_text);
        let context_docs = self.context_docs(thoughts);
        log::trace!(
            "rendered thoughts: {} transcript bytes, type={content_type}, {} docs",
            transcript.len(),
            context_docs.len()
        );
        ThoughtDisplay {
            schema_version: DISPLAY_SCHEMA_VERSION,
            transcript,
            content_type,
            plain_text,
            meta,
            context_docs,
        }
    }
}

/// Decode a JSON thoughts payload, keeping object key order.
pub fn parse_thoughts(raw: &str) -> Result<ThoughtValue> {
    serde_json::from_str(raw).map_err(FormatError::from)
}
