use pretty_assertions::assert_eq;
use serde_json::json;
use thoughts_formatter::{
    classify, extract_context_docs, extract_pre_content, parse_meta, raw_thoughts_to_string,
    to_plain_text, FormatterConfig, ThoughtFormatter,
};
use thoughts_protocol::{ContentType, ContextDoc, MetaFields, ThoughtValue};

fn thoughts(raw: &str) -> ThoughtValue {
    serde_json::from_str(raw).expect("valid thoughts json")
}

#[test]
fn backend_payload_with_snake_case_and_docs() {
    let payload = thoughts(
        r#"{
            "original_query": "How do refunds work?",
            "rewritten_query": "refund policy",
            "query_category": "billing",
            "required_retrieval": true,
            "number_of_documents_retrieved": 2,
            "mcp_tools_used": ["kb_search", "crm_lookup"],
            "context_docs": [
                {"content": "Refunds take 5 days.", "source": "https://kb/refunds"},
                {"text": "Contact support for exceptions."}
            ]
        }"#,
    );

    let transcript = raw_thoughts_to_string(&payload);
    assert_eq!(
        transcript,
        "Original Query: How do refunds work?\n\
         Rewritten Query: refund policy\n\
         Query Category: billing\n\
         Required Retrieval: true\n\
         Number of Documents Retrieved: 2\n\
         MCP Tools Used: kb_search, crm_lookup"
    );

    let meta = parse_meta(extract_pre_content(transcript.as_str()));
    assert_eq!(
        meta,
        MetaFields {
            query_category: Some("billing".to_string()),
            required_retrieval: Some("true".to_string()),
            number_of_documents_retrieved: Some("2".to_string()),
            mcp_tools_used: Some("kb_search, crm_lookup".to_string()),
            original_query: Some("How do refunds work?".to_string()),
            rewritten_query: Some("refund policy".to_string()),
            ..MetaFields::default()
        }
    );

    assert_eq!(
        extract_context_docs(&payload),
        vec![
            ContextDoc::new("Refunds take 5 days.").with_source("https://kb/refunds"),
            ContextDoc::new("Contact support for exceptions."),
        ]
    );
}

#[test]
fn mixed_array_payload_keeps_step_order() {
    let payload = thoughts(
        r#"[
            "Agent Type: planner / Model Used: gpt-4o",
            {"tool_selected": "web_search", "context_docs": ["first doc"]},
            null,
            {"step": {"context_docs": {"summary": "second doc", "link": "https://b"}}}
        ]"#,
    );

    assert_eq!(
        raw_thoughts_to_string(&payload),
        "Agent Type: planner / Model Used: gpt-4o\nTool Selected: web_search"
    );
    let meta = parse_meta(&raw_thoughts_to_string(&payload));
    assert_eq!(meta.agent_type.as_deref(), Some("planner"));
    assert_eq!(meta.model_used.as_deref(), Some("gpt-4o"));
    assert_eq!(meta.tool_selected.as_deref(), Some("web_search"));

    assert_eq!(
        extract_context_docs(&payload),
        vec![
            ContextDoc::new("first doc"),
            ContextDoc::new("second doc").with_source("https://b"),
        ]
    );
}

#[test]
fn pre_content_cut_and_labelled_meta() {
    assert_eq!(extract_pre_content(""), "");
    assert_eq!(extract_pre_content(None::<&str>), "");
    for marker in ["Content:", "content:", "CONTENT:"] {
        let text = format!("Header\n{marker} body");
        assert_eq!(extract_pre_content(text.as_str()), "Header\n");
    }

    assert_eq!(
        parse_meta("Model Used: gpt-4"),
        MetaFields {
            model_used: Some("gpt-4".to_string()),
            ..MetaFields::default()
        }
    );
    let meta = parse_meta("last mcp tool used :  data_analyst  / Number of documents retrieved:3");
    assert_eq!(meta.mcp_tool_used.as_deref(), Some("data_analyst"));
    assert_eq!(meta.number_of_documents_retrieved.as_deref(), Some("3"));
}

#[test]
fn context_docs_shapes() {
    assert!(extract_context_docs(&ThoughtValue::Null).is_empty());
    assert!(extract_context_docs(&thoughts("{}")).is_empty());

    let docs = extract_context_docs(&ThoughtValue::from(json!({
        "context_docs": [{"content": "x", "source": "http://a"}, {"content": "y"}]
    })));
    assert_eq!(
        docs,
        vec![ContextDoc::new("x").with_source("http://a"), ContextDoc::new("y")]
    );

    let docs = extract_context_docs(&ThoughtValue::from(json!({
        "context_docs": ["plain string one", "plain string two"]
    })));
    assert_eq!(
        docs,
        vec![
            ContextDoc::new("plain string one"),
            ContextDoc::new("plain string two")
        ]
    );
}

#[test]
fn html_beats_markdown_and_sanitizes_cleanly() {
    let mixed = "# Heading\n<div style=\"color:red\">**Answer** &amp; notes</div>";
    assert_eq!(classify(mixed), ContentType::Html);
    assert_eq!(to_plain_text(mixed), "# Heading\n**Answer** & notes");

    let page = r#"<html><head><style>body { margin: 0; }</style>
<script type="text/javascript">track();</script></head>
<body><p>Line&nbsp;one</p><p>Visit www.example.com or https://example.com/docs</p></body></html>"#;
    let text = to_plain_text(page);
    assert_eq!(text, "Line one\nVisit  or https://example.com/docs");
    for needle in ["<script", "<style", "<p>", "&nbsp;"] {
        assert!(!text.contains(needle), "{needle} left in {text:?}");
    }
}

#[test]
fn markdown_and_text_paths() {
    assert_eq!(
        to_plain_text("## Sources\n- [Refunds](https://kb/refunds)\n- `kb_search` result"),
        "Sources\nRefunds\nkb_search result"
    );
    assert_eq!(to_plain_text("plain   \ntext\u{00A0}here"), "plain\ntext here");
    assert_eq!(to_plain_text(None::<&str>), "");
}

#[test]
fn formatter_render_serializes_for_display_layer() {
    let config = FormatterConfig::from_toml_str(
        r#"
[labels]
confidence = "Confidence Score"

[meta_labels]
agentType = ["Agent Type", "Persona"]
"#,
    )
    .unwrap();
    let formatter = ThoughtFormatter::new(&config).unwrap();
    let display = formatter.render(&ThoughtValue::from(json!({
        "persona": "researcher",
        "confidence": 0.9,
        "context_docs": "one retrieved passage"
    })));

    let value = serde_json::to_value(&display).unwrap();
    assert_eq!(
        value,
        json!({
            "schemaVersion": 1,
            "transcript": "Persona: researcher\nConfidence Score: 0.9",
            "contentType": "text",
            "plainText": "Persona: researcher\nConfidence Score: 0.9",
            "meta": {"agentType": "researcher"},
            "contextDocs": [{"content": "one retrieved passage"}]
        })
    );
}
