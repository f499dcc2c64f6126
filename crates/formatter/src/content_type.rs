use once_cell::sync::Lazy;
use regex::Regex;
use thoughts_protocol::ContentType;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| compile(r"(?i)<[a-z][^>]*>"));

/// Markdown signatures, checked in order; the first hit wins.
static MARKDOWN_SIGNATURES: Lazy<[Regex; 7]> = Lazy::new(|| {
    [
        // ATX header
        compile(r"(?m)^[ \t]*#{1,6}[ \t]+\S"),
        // bold
        compile(r"\*\*[^*\n]+\*\*"),
        // italic
        compile(r"\*[^*\s][^*\n]*\*"),
        // [text](url)
        compile(r"\[[^\]\n]+\]\([^)\n]+\)"),
        // bullet list
        compile(r"(?m)^[ \t]*[-*+][ \t]+\S"),
        // inline code
        compile(r"`[^`\n]+`"),
        // fenced code
        compile(r"(?m)^[ \t]*```"),
    ]
});

/// Built-in patterns only.
pub(crate) fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|err| panic!("invalid built-in pattern {pattern:?}: {err}"))
}

/// Decides how a displayable string should be sanitized.
pub struct ContentTypeClassifier;

impl ContentTypeClassifier {
    /// Label `input` as html, markdown or text.
    ///
    /// Any HTML-like tag wins over Markdown signatures in the same string.
    #[must_use]
    pub fn classify(input: &str) -> ContentType {
        if input.is_empty() {
            return ContentType::Text;
        }
        if HTML_TAG.is_match(input) {
            return ContentType::Html;
        }
        if Self::markdown_signature(input).is_some() {
            return ContentType::Markdown;
        }
        ContentType::Text
    }

    /// Index of the first Markdown signature found in `input`.
    #[must_use]
    pub fn markdown_signature(input: &str) -> Option<usize> {
        MARKDOWN_SIGNATURES.iter().position(|re| re.is_match(input))
    }
}

#[must_use]
pub fn classify(input: &str) -> ContentType {
    ContentTypeClassifier::classify(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_input_is_text() {
        assert_eq!(classify(""), ContentType::Text);
    }

    #[test]
    fn detects_html_tags() {
        assert_eq!(classify("<p>Hello</p>"), ContentType::Html);
        assert_eq!(classify("before <DIV class=\"x\">after"), ContentType::Html);
        assert_eq!(classify("<br/>"), ContentType::Html);
    }

    #[test]
    fn comparison_operators_are_not_tags() {
        assert_eq!(classify("a < b and c > d"), ContentType::Text);
        assert_eq!(classify("x <3 y>"), ContentType::Text);
    }

    #[test]
    fn detects_each_markdown_signature() {
        assert_eq!(classify("# Title"), ContentType::Markdown);
        assert_eq!(classify("this is **bold** text"), ContentType::Markdown);
        assert_eq!(classify("this is *soft* text"), ContentType::Markdown);
        assert_eq!(classify("see [docs](https://x.io)"), ContentType::Markdown);
        assert_eq!(classify("items:\n- one\n- two"), ContentType::Markdown);
        assert_eq!(classify("run `cargo fmt` first"), ContentType::Markdown);
        assert_eq!(classify("```\ncode\n```"), ContentType::Markdown);
    }

    #[test]
    fn signature_order_is_stable() {
        assert_eq!(ContentTypeClassifier::markdown_signature("# h **b**"), Some(0));
        assert_eq!(ContentTypeClassifier::markdown_signature("**b** `c`"), Some(1));
        assert_eq!(ContentTypeClassifier::markdown_signature("plain"), None);
    }

    #[test]
    fn plain_prose_is_text() {
        assert_eq!(
            classify("Model Used: gpt-4 / Tool Selected: search"),
            ContentType::Text
        );
        assert_eq!(classify("2 * 3 = 6"), ContentType::Text);
    }

    proptest! {
        #[test]
        fn proptest_html_wins_over_markdown(
            tag in "[a-zA-Z][a-zA-Z0-9]{0,8}",
            md in prop::sample::select(vec!["# head", "**b**", "- item", "`code`", "[a](b)"]),
        ) {
            let input = format!("{md}\n<{tag}>body");
            prop_assert_eq!(classify(&input), ContentType::Html);
        }

        #[test]
        fn proptest_classify_is_idempotent(input in ".{0,64}") {
            prop_assert_eq!(classify(&input), classify(&input));
        }
    }
}
