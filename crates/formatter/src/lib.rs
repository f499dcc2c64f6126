//! # Thoughts Formatter
//!
//! Turns the loosely shaped "thoughts" payload of a chat backend into display-ready data.
//!
//! ## Architecture
//!
//! ```text
//! ThoughtValue (string | array | object | scalar)
//!     │
//!     ├──> ThoughtStringifier ──> "Label: value" transcript
//!     │        │
//!     │        ├──> ContentTypeClassifier ──> html | markdown | text
//!     │        ├──> PlainTextSanitizer ─────> safe plain text
//!     │        └──> MetaFieldExtractor ─────> MetaFields (pre-content portion)
//!     │
//!     └──> ContextDocNormalizer ──> Vec<ContextDoc>
//! ```
//!
//! Every stage is a pure function that degrades to empty output instead of failing.
//! Only configuration loading can return an error.
//!
//! ## Example
//!
//! ```rust
//! use thoughts_formatter::{extract_context_docs, parse_meta, raw_thoughts_to_string};
//! use thoughts_protocol::ThoughtValue;
//!
//! let thoughts: ThoughtValue = serde_json::from_str(
//!     r#"{"model_used": "gpt-4", "context_docs": [{"content": "x", "source": "http://a"}]}"#,
//! )
//! .unwrap();
//!
//! let transcript = raw_thoughts_to_string(&thoughts);
//! assert_eq!(transcript, "Model Used: gpt-4");
//! assert_eq!(parse_meta(&transcript).model_used.as_deref(), Some("gpt-4"));
//! assert_eq!(extract_context_docs(&thoughts).len(), 1);
//! ```

mod config;
mod content_type;
mod context_docs;
mod entities;
mod error;
mod formatter;
mod labels;
mod meta;
mod sanitize;
mod stringify;

pub use config::FormatterConfig;
pub use content_type::{classify, ContentTypeClassifier};
pub use context_docs::{
    extract_context_docs, normalize_doc, normalize_docs, CONTENT_KEYS, SOURCE_KEYS,
};
pub use entities::{decode_html_entities, EntityDecoder, HtmlEntityTable};
pub use error::{FormatError, Result};
pub use formatter::{parse_thoughts, ThoughtFormatter};
pub use labels::{humanize_key, normalize_key, LabelMap};
pub use meta::{builtin_synonyms, extract_pre_content, parse_meta, MetaFieldExtractor};
pub use sanitize::{markdown_to_text, normalize_whitespace, to_plain_text, PlainTextSanitizer};
pub use stringify::{format_value, raw_thoughts_to_string, ThoughtStringifier};
