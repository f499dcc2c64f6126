use crate::content_type::{compile, ContentTypeClassifier};
use crate::entities::{EntityDecoder, HtmlEntityTable};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;
use thoughts_protocol::ContentType;

static STYLE_BLOCK: Lazy<Regex> = Lazy::new(|| compile(r"(?is)<style\b[^>]*>.*?</style\s*>"));
static SCRIPT_BLOCK: Lazy<Regex> = Lazy::new(|| compile(r"(?is)<script\b[^>]*>.*?</script\s*>"));
static UNCLOSED_BLOCK: Lazy<Regex> = Lazy::new(|| compile(r"(?is)<(?:script|style)\b.*$"));
static HTML_COMMENT: Lazy<Regex> = Lazy::new(|| compile(r"(?s)<!--.*?-->"));
static CSS_COMMENT: Lazy<Regex> = Lazy::new(|| compile(r"(?s)/\*.*?\*/"));
// `selector { prop: value; ... }` with at least one terminated declaration.
static CSS_RULE: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?m)^[ \t]*[@.#]?[A-Za-z_*][^{}<>\n]*\{\s*(?:[-A-Za-z]+\s*:[^;{}]*;\s*)+\}[ \t]*")
});
static BR_TAG: Lazy<Regex> = Lazy::new(|| compile(r"(?i)<br\s*/?\s*>"));
static P_CLOSE: Lazy<Regex> = Lazy::new(|| compile(r"(?i)</p\s*>"));
static P_OPEN: Lazy<Regex> = Lazy::new(|| compile(r"(?i)<p\b[^>]*>"));
static ANY_TAG: Lazy<Regex> = Lazy::new(|| compile(r"<[!?/]?[a-zA-Z][^>]*>"));
static DANGLING_TAG: Lazy<Regex> = Lazy::new(|| compile(r"<[!?/]?[a-zA-Z][^>]*$"));
static RAW_BLOCK_OPENER: Lazy<Regex> = Lazy::new(|| compile(r"(?i)<(?:script|style)"));
static BARE_DOMAIN: Lazy<Regex> = Lazy::new(|| {
    compile(
        r#"(?i)(https?://[^\s<>"']+)|\b(?:www\.[a-z0-9-]+(?:\.[a-z0-9-]+)+|[a-z0-9-]+(?:\.[a-z0-9-]+)*\.(?:com|org|net|io|ai|co|edu|gov|dev|app|info|biz)\b)(?:/[^\s<>"']*)?"#,
    )
});
static ATTRIBUTE_ARTIFACT: Lazy<Regex> = Lazy::new(|| compile(r#""\s*>"#));
static TRAILING_SPACE: Lazy<Regex> = Lazy::new(|| compile(r"[ \t]+(\r?\n)"));

static MD_FENCE: Lazy<Regex> = Lazy::new(|| compile(r"(?s)```.*?```"));
static MD_HEADER: Lazy<Regex> = Lazy::new(|| compile(r"(?m)^[ \t]*#{1,6}[ \t]+"));
static MD_BULLET: Lazy<Regex> = Lazy::new(|| compile(r"(?m)^[ \t]*[-*+][ \t]+"));
static MD_LINK: Lazy<Regex> = Lazy::new(|| compile(r"!?\[([^\]\n]*)\]\([^)\n]*\)"));
static MD_BOLD: Lazy<Regex> = Lazy::new(|| compile(r"\*\*([^*\n]+)\*\*|__([^_\n]+)__"));
static MD_ITALIC: Lazy<Regex> = Lazy::new(|| compile(r"\*([^*\s][^*\n]*)\*"));
static MD_INLINE_CODE: Lazy<Regex> = Lazy::new(|| compile(r"`([^`\n]+)`"));

/// Converts html, markdown or text into plain text that is safe to display unescaped.
#[derive(Debug, Clone, Default)]
pub struct PlainTextSanitizer<D: EntityDecoder = HtmlEntityTable> {
    decoder: D,
}

impl PlainTextSanitizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: EntityDecoder> PlainTextSanitizer<D> {
    pub const fn with_decoder(decoder: D) -> Self {
        Self { decoder }
    }

    /// `None` and `""` give `""`. Everything else is classified first and routed to the
    /// matching path.
    pub fn to_plain_text<'a>(&self, input: impl Into<Option<&'a str>>) -> String {
        let Some(input) = input.into().filter(|s| !s.is_empty()) else {
            return String::new();
        };
        match ContentTypeClassifier::classify(input) {
            ContentType::Html => self.html_to_text(input),
            ContentType::Markdown => markdown_to_text(input),
            ContentType::Text => normalize_whitespace(input),
        }
    }

    /// Strip markup and styling from an html fragment.
    pub fn html_to_text(&self, html: &str) -> String {
        let text = STYLE_BLOCK.replace_all(html, "");
        let text = SCRIPT_BLOCK.replace_all(&text, "");
        let text = UNCLOSED_BLOCK.replace_all(&text, "");
        let text = HTML_COMMENT.replace_all(&text, "");
        let text = CSS_COMMENT.replace_all(&text, "");
        let text = CSS_RULE.replace_all(&text, "");
        let text = BR_TAG.replace_all(&text, "\n");
        let text = P_CLOSE.replace_all(&text, "\n");
        let text = P_OPEN.replace_all(&text, "");
        let text = strip_tags(&text, &DANGLING_TAG);
        let text = self.decoder.decode(&text);
        let text = strip_bare_domains(&text);
        let text = ATTRIBUTE_ARTIFACT.replace_all(&text, "");
        // Decoded `&lt;tag&gt;` must not survive as markup; a lone decoded `<` stays text.
        let text = strip_tags(&text, &RAW_BLOCK_OPENER);
        normalize_whitespace(&text)
    }
}

/// Removes complete tags and `leftover` matches until none are left; removing one tag can
/// join its neighbours into another.
fn strip_tags(input: &str, leftover: &Regex) -> String {
    let mut text = input.to_string();
    loop {
        let next = ANY_TAG.replace_all(&text, "").into_owned();
        let next = leftover.replace_all(&next, "").into_owned();
        if next.len() == text.len() {
            return text;
        }
        text = next;
    }
}

/// Drops domain-like tokens that are not part of an explicit `http(s)://` URL.
fn strip_bare_domains(input: &str) -> Cow<'_, str> {
    BARE_DOMAIN.replace_all(input, |caps: &Captures| {
        caps.get(1)
            .map_or_else(String::new, |url| url.as_str().to_string())
    })
}

/// Remove Markdown syntax, keeping link text and code span contents. Fenced blocks are
/// dropped with their contents.
#[must_use]
pub fn markdown_to_text(markdown: &str) -> String {
    let text = MD_FENCE.replace_all(markdown, "");
    let text = MD_HEADER.replace_all(&text, "");
    let text = MD_BULLET.replace_all(&text, "");
    let text = MD_LINK.replace_all(&text, "${1}");
    let text = MD_BOLD.replace_all(&text, "${1}${2}");
    let text = MD_ITALIC.replace_all(&text, "${1}");
    let text = MD_INLINE_CODE.replace_all(&text, "${1}");
    normalize_whitespace(&text)
}

/// Non-breaking spaces become spaces, spaces before line breaks go, ends are trimmed.
#[must_use]
pub fn normalize_whitespace(input: &str) -> String {
    let text = input.replace('\u{00A0}', " ");
    TRAILING_SPACE.replace_all(&text, "${1}").trim().to_string()
}

/// Sanitize with the built-in entity table.
pub fn to_plain_text<'a>(input: impl Into<Option<&'a str>>) -> String {
    PlainTextSanitizer::new().to_plain_text(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_and_missing_input_give_empty_string() {
        assert_eq!(to_plain_text(""), "");
        assert_eq!(to_plain_text(None::<&str>), "");
    }

    #[test]
    fn html_drops_script_and_style_blocks() {
        let html = "<style>.a { color: red; }</style><p>Hello</p><script>alert('x')</script>";
        assert_eq!(to_plain_text(html), "Hello");
    }

    #[test]
    fn html_paragraphs_and_breaks_become_newlines() {
        assert_eq!(
            to_plain_text("<p>First</p><p class=\"x\">Second<br/>Third</p>"),
            "First\nSecond\nThird"
        );
    }

    #[test]
    fn html_removes_css_comments_and_bare_rules() {
        let html = "<div>/* theme */\n.card { margin: 0; }\nVisible text</div>";
        assert_eq!(to_plain_text(html), "Visible text");
    }

    #[test]
    fn html_decodes_entities_after_stripping() {
        assert_eq!(
            to_plain_text("<b>Fish &amp; Chips</b>&nbsp;&quot;ok&quot;"),
            "Fish & Chips \"ok\""
        );
    }

    #[test]
    fn html_never_resurrects_escaped_markup() {
        let out = to_plain_text("<span>&lt;script&gt;alert(1)&lt;/script&gt; done</span>");
        assert!(!out.contains("<script"), "got {out:?}");
        assert!(out.contains("done"));
    }

    #[test]
    fn html_strips_bare_domains_but_keeps_explicit_urls() {
        let out = to_plain_text(
            "<a href=\"https://x.io\">www.example.com</a> see https://docs.rs/regex now",
        );
        assert_eq!(out, "see https://docs.rs/regex now");
    }

    #[test]
    fn html_decoded_less_than_stays_text() {
        assert_eq!(
            to_plain_text("<p>a&lt;b and more</p><p>second</p>"),
            "a<b and more\nsecond"
        );
        assert_eq!(to_plain_text("<p>if x&lt;y then z</p>"), "if x<y then z");
        assert_eq!(
            to_plain_text("<p>&lt;script keeps going</p>"),
            "keeps going"
        );
    }

    #[test]
    fn html_keeps_prose_with_braces() {
        assert_eq!(
            to_plain_text("<div>\nResult {status: ok}\nDone</div>"),
            "Result {status: ok}\nDone"
        );
        assert_eq!(
            to_plain_text("<div>\n@media print { color: red; }\nh1, .title {\n  margin: 0;\n  padding: 2px;\n}\nBody</div>"),
            "Body"
        );
    }

    #[test]
    fn html_drops_attribute_artifacts() {
        assert_eq!(to_plain_text("<i>x</i>\">y"), "xy");
    }

    #[test]
    fn html_unterminated_tag_swallows_the_rest() {
        assert_eq!(to_plain_text("<b>kept</b> <img src=\"broken"), "kept");
    }

    #[test]
    fn markdown_keeps_words_and_link_text() {
        let md = "# Title\n\nSome **bold** and *soft* text with [a link](https://x.io).\n- item one\n* item two\nUse `cargo test`.";
        assert_eq!(
            to_plain_text(md),
            "Title\n\nSome bold and soft text with a link.\nitem one\nitem two\nUse cargo test."
        );
    }

    #[test]
    fn markdown_removes_fenced_code_entirely() {
        let md = "Before\n```rust\nfn main() {}\n```\nAfter";
        assert_eq!(to_plain_text(md), "Before\n\nAfter");
    }

    #[test]
    fn text_only_normalizes_whitespace() {
        assert_eq!(
            to_plain_text("  line one\u{00A0}  \nline two  \r\n  "),
            "line one\nline two"
        );
    }

    #[test]
    fn custom_decoder_is_used_on_html_path() {
        struct Upper;
        impl EntityDecoder for Upper {
            fn decode<'a>(&self, input: &'a str) -> Cow<'a, str> {
                Cow::Owned(input.to_uppercase())
            }
        }
        let sanitizer = PlainTextSanitizer::with_decoder(Upper);
        assert_eq!(sanitizer.to_plain_text("<p>quiet</p>"), "QUIET");
        assert_eq!(sanitizer.to_plain_text("quiet"), "quiet");
    }

    proptest! {
        #[test]
        fn proptest_html_output_has_no_tags(
            tag in "[a-z]{1,6}",
            rest in r#"[<>/ "&;a-z!]{0,48}"#,
        ) {
            let input = format!("<{tag}>{rest}");
            let out = to_plain_text(input.as_str());
            let lowered = out.to_lowercase();
            prop_assert!(!lowered.contains("<script"));
            prop_assert!(!lowered.contains("<style"));
            prop_assert!(!ANY_TAG.is_match(&out), "tag left in {:?}", out);
        }

        #[test]
        fn proptest_html_output_drops_wrapped_tags(word in "[a-z]{1,12}", tag in "[a-z]{1,6}") {
            prop_assume!(tag != "script" && tag != "style");
            let input = format!("<{tag} class=\"c\">{word}</{tag}>");
            prop_assert_eq!(to_plain_text(input.as_str()), word);
        }
    }
}
