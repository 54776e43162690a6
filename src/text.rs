//! Markup helpers for notification text.

use std::sync::LazyLock;

use regex::Regex;

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*?>").expect("tag pattern is valid"));

/// Remove anything that looks like an HTML tag.
pub fn strip_tags(text: &str) -> String {
    TAG.replace_all(text, "").into_owned()
}

/// Decode named and numeric HTML entities. Unknown ones are kept verbatim.
pub fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

/// Plain text for the status bar: tags removed, entities decoded.
pub fn sanitize(text: &str) -> String {
    decode_entities(&strip_tags(text))
}
