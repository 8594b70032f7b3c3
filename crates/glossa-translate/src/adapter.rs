//! Turns an inbound chat request into the upstream translation payload

use serde::{Serialize, Serializer};

use crate::error::{Result, TranslateError};
use crate::protocol::ChatCompletionRequest;

/// Source language used when the caller does not name one
pub const AUTO_DETECT: &str = "auto";

/// Target chosen when the text contains CJK ideographs
const TARGET_FOR_CJK: &str = "en";

/// Target chosen for everything else
const TARGET_FOR_OTHER: &str = "zh-CN";

/// Client tag the upstream expects as the payload's second element
const CLIENT_TAG: &str = "te_lib";

/// Body of one upstream translation call
///
/// Serializes to `[[[text], source_lang, target_lang], "te_lib"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamPayload {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

impl Serialize for UpstreamPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let query = ([self.text.as_str()], self.source_lang.as_str(), self.target_lang.as_str());
        (query, CLIENT_TAG).serialize(serializer)
    }
}

/// Build the upstream payload from the last user message
///
/// Never touches the network.
pub fn build_payload(request: &ChatCompletionRequest) -> Result<UpstreamPayload> {
    let last = request
        .messages
        .last()
        .filter(|message| message.role == "user")
        .ok_or_else(|| TranslateError::InvalidRequest("the last message must have role 'user'".to_owned()))?;

    let text = last.content.clone().map(|content| content.into_text()).unwrap_or_default();

    let source_lang = non_empty(request.source_lang.as_deref())
        .unwrap_or(AUTO_DETECT)
        .to_owned();

    let target_lang = match non_empty(request.target_lang.as_deref()) {
        Some(explicit) => explicit.to_owned(),
        None => {
            let inferred = infer_target_lang(&text);
            tracing::debug!(target_lang = inferred, "no target language given, inferred from script");
            inferred.to_owned()
        }
    };

    Ok(UpstreamPayload {
        text,
        source_lang,
        target_lang,
    })
}

/// Pick a default target language from the script of `text`
///
/// Best-effort heuristic, not a language identifier: any character in
/// U+4E00..=U+9FA5 routes to English, everything else to Simplified
/// Chinese. The source language hint is not consulted.
pub fn infer_target_lang(text: &str) -> &'static str {
    if text.chars().any(is_cjk_ideograph) {
        TARGET_FOR_CJK
    } else {
        TARGET_FOR_OTHER
    }
}

const fn is_cjk_ideograph(c: char) -> bool {
    matches!(c, '\u{4E00}'..='\u{9FA5}')
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
