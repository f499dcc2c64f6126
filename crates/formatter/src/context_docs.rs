use thoughts_protocol::{ContextDoc, ThoughtValue};

/// Keys tried for a document body, highest priority first.
pub const CONTENT_KEYS: [&str; 6] = ["content", "text", "body", "summary", "value", "snippet"];

/// Keys tried for a document source, highest priority first.
pub const SOURCE_KEYS: [&str; 5] = ["source", "url", "link", "document", "href"];

/// Collects every `context_docs` collection in a thoughts payload, depth first, in
/// encounter order.
///
/// An object carrying `context_docs` is consumed as a unit: its other entries are not
/// searched. Objects without the key are searched through their values.
#[must_use]
pub fn extract_context_docs(thoughts: &ThoughtValue) -> Vec<ContextDoc> {
    let mut docs = Vec::new();
    collect(thoughts, &mut docs);
    docs
}

fn collect(node: &ThoughtValue, docs: &mut Vec<ContextDoc>) {
    match node {
        ThoughtValue::Array(items) => {
            for item in items {
                collect(item, docs);
            }
        }
        ThoughtValue::Object(entries) => match node.context_docs() {
            Some(raw) => docs.extend(normalize_docs(raw)),
            None => {
                for (_, value) in entries {
                    collect(value, docs);
                }
            }
        },
        ThoughtValue::Null
        | ThoughtValue::Bool(_)
        | ThoughtValue::Number(_)
        | ThoughtValue::String(_) => {}
    }
}

/// Normalize one `context_docs` value, which may be a list or a single document.
#[must_use]
pub fn normalize_docs(raw: &ThoughtValue) -> Vec<ContextDoc> {
    match raw {
        ThoughtValue::Array(items) => items.iter().filter_map(normalize_doc).collect(),
        single => normalize_doc(single).into_iter().collect(),
    }
}

/// Normalize one document. Returns `None` when neither a body nor a source is found.
#[must_use]
pub fn normalize_doc(raw: &ThoughtValue) -> Option<ContextDoc> {
    match raw {
        ThoughtValue::Null => None,
        ThoughtValue::Object(_) => {
            let content = first_text(raw, &CONTENT_KEYS);
            let source = first_text(raw, &SOURCE_KEYS);
            if content.is_none() && source.is_none() {
                return None;
            }
            Some(ContextDoc {
                content: content.or_else(|| source.clone()).unwrap_or_default(),
                source,
            })
        }
        // A nested list is not a document.
        ThoughtValue::Array(_) => None,
        scalar => {
            let text = scalar.scalar_text()?;
            let text = text.trim();
            (!text.is_empty()).then(|| ContextDoc::new(text))
        }
    }
}

fn first_text(doc: &ThoughtValue, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        let text = doc.get(key)?.scalar_text()?;
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    })
}
