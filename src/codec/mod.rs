//! Tolerant decoding of analyzer replies into review comments.
//!
//! Models do not always answer with bare JSON. The decoder tries an
//! ordered list of [`DecodeStrategy`] implementations and takes the
//! first that produces comments:
//!
//! 1. the whole reply as a JSON array of comment objects,
//! 2. the first fenced block labelled `json`, parsed the same way,
//! 3. the entire reply as a single general comment.
//!
//! Each strategy is total: it returns `None` instead of failing, and the
//! last one always succeeds, so decoding itself never errors.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::ReviewComment;

/// First fenced block labelled `json`; the closing fence may follow on the same line.
static JSON_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```json\s*([\s\S]*?)```").expect("valid regex"));

/// One way of turning reply text into comments.
pub trait DecodeStrategy: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    /// `None` when this strategy does not apply to `text`.
    fn decode(&self, text: &str) -> Option<Vec<ReviewComment>>;
}

fn parse_array(text: &str) -> Option<Vec<ReviewComment>> {
    serde_json::from_str::<Vec<ReviewComment>>(text.trim()).ok()
}

/// The reply is exactly a JSON array of comments.
#[derive(Debug, Default)]
pub struct WholeDocumentJson;

impl DecodeStrategy for WholeDocumentJson {
    fn name(&self) -> &'static str {
        "json"
    }

    fn decode(&self, text: &str) -> Option<Vec<ReviewComment>> {
        parse_array(text)
    }
}

/// The reply wraps the array in a ```` ```json ```` fence.
#[derive(Debug, Default)]
pub struct FencedJsonBlock;

impl DecodeStrategy for FencedJsonBlock {
    fn name(&self) -> &'static str {
        "fenced-json"
    }

    fn decode(&self, text: &str) -> Option<Vec<ReviewComment>> {
        let inner = JSON_FENCE_RE.captures(text)?.get(1)?;
        parse_array(inner.as_str())
    }
}

/// Anything else becomes one general comment carrying the whole reply.
#[derive(Debug, Default)]
pub struct RawTextFallback;

impl DecodeStrategy for RawTextFallback {
    fn name(&self) -> &'static str {
        "raw-text"
    }

    fn decode(&self, text: &str) -> Option<Vec<ReviewComment>> {
        Some(vec![ReviewComment::general(text)])
    }
}

/// Result of decoding: the comments and which strategy produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub comments: Vec<ReviewComment>,
    pub strategy: &'static str,
}

/// Ordered strategy list.
pub struct Codec {
    strategies: Vec<Box<dyn DecodeStrategy>>,
}

impl Default for Codec {
    fn default() -> Self {
        Self {
            strategies: vec![
                Box::new(WholeDocumentJson),
                Box::new(FencedJsonBlock),
                Box::new(RawTextFallback),
            ],
        }
    }
}

impl Codec {
    pub fn decode(&self, text: &str) -> Decoded {
        self.strategies
            .iter()
            .find_map(|s| {
                s.decode(text).map(|comments| Decoded {
                    comments,
                    strategy: s.name(),
                })
            })
            .unwrap_or_else(|| Decoded {
                comments: vec![ReviewComment::general(text)],
                strategy: RawTextFallback.name(),
            })
    }
}

/// Decode with the default strategies.
pub fn decode(text: &str) -> Vec<ReviewComment> {
    Codec::default().decode(text).comments
}

/// Encode comments as the JSON array the decoder's first tier accepts.
pub fn encode(comments: &[ReviewComment]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(comments)
}
