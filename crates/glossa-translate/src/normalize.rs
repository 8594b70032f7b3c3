//! Cleans the backend's HTML-bearing reply into display text
//!
//! Every assumption about the reply's nested-list layout lives in
//! [`extract_fragment`]; the sanitizing steps after it are total.

use std::sync::OnceLock;

use html2text::render::TrivialDecorator;
use regex::Regex;
use serde_json::Value;

use crate::error::{Result, TranslateError};

/// Line width handed to the HTML renderer, wide enough that it never wraps
const RENDER_WIDTH: usize = 65_535;

/// Zero-width and joiner characters the backend sprinkles into its output
const INVISIBLE: [char; 5] = ['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}'];

/// Pull the translated HTML fragment out of a decoded reply
///
/// Accepted shapes:
/// - `[[fragment, ...], ...]` yields `fragment`
/// - `[]` yields an empty fragment; the backend had nothing to translate
///
/// Anything else is an [`TranslateError::UpstreamProtocol`] carrying the raw body.
pub fn extract_fragment(body: &Value) -> Result<&str> {
    let Value::Array(items) = body else {
        return Err(shape_error(body));
    };

    let Some(first) = items.first() else {
        return Ok("");
    };

    match first.get(0) {
        Some(Value::String(fragment)) => Ok(fragment.as_str()),
        _ => Err(shape_error(body)),
    }
}

/// Source language the backend detected, when it reports one
pub fn detected_language(body: &Value) -> Option<&str> {
    body.get(1)?.get(0)?.as_str()
}

/// Run the sanitizing pipeline: markup to text, drop invisibles, tidy whitespace
pub fn normalize(fragment: &str) -> String {
    let text = markup_to_text(fragment);
    let visible = strip_invisible(&text);
    tidy_whitespace(&visible)
}

fn shape_error(body: &Value) -> TranslateError {
    TranslateError::UpstreamProtocol { body: body.to_string() }
}

/// Parse `fragment` as HTML and keep only its text nodes
///
/// The trivial decorator in raw mode drops every tag and attribute: no link
/// footnotes, emphasis markers, list bullets, or table borders.
fn markup_to_text(fragment: &str) -> String {
    if fragment.trim().is_empty() {
        return String::new();
    }

    let rendered = html2text::config::with_decorator(TrivialDecorator::new())
        .raw_mode(true)
        .string_from_read(fragment.as_bytes(), RENDER_WIDTH);

    match rendered {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("HTML rendering failed, falling back to tag stripping: {e}");
            strip_tags(fragment)
        }
    }
}

fn strip_tags(fragment: &str) -> String {
    static TAG: OnceLock<Regex> = OnceLock::new();
    let tag = TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("must be valid regex"));

    tag.replace_all(fragment, "").into_owned()
}

fn strip_invisible(text: &str) -> String {
    text.chars().filter(|c| !INVISIBLE.contains(c)).collect()
}

/// Tidy whitespace in rendered text
///
/// Text is otherwise passed through verbatim; no markdown escaping is
/// applied, so identifiers like `snake_case` survive untouched. Trailing whitespace is dropped, runs of blanks inside a line collapse
/// to one space, and consecutive empty lines collapse into a single
/// paragraph break. Leading indentation is kept for nested lists.
fn tidy_whitespace(text: &str) -> String {
    let mut markdown = String::with_capacity(text.len());
    let mut pending_break = false;

    for line in text.lines() {
        let line = tidy_line(line);

        if line.is_empty() {
            pending_break = !markdown.is_empty();
            continue;
        }

        if !markdown.is_empty() {
            markdown.push_str(if pending_break { "\n\n" } else { "\n" });
        }
        pending_break = false;
        markdown.push_str(&line);
    }

    markdown
}

fn tidy_line(line: &str) -> String {
    let line = line.trim_end();
    let body = line.trim_start();
    let (indent, _) = line.split_at(line.len() - body.len());

    let mut tidy = String::with_capacity(line.len());
    tidy.push_str(indent);

    let mut in_blank = false;
    for c in body.chars() {
        if c == ' ' || c == '\t' {
            if !in_blank {
                tidy.push(' ');
            }
            in_blank = true;
        } else {
            tidy.push(c);
            in_blank = false;
        }
    }

    tidy
}
