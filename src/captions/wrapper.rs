use crate::captions::policy::{PunctuationPolicy, WrapWindow};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// One or two display rows of a caption
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrappedLine {
    pub rows: Vec<String>,
}

impl WrappedLine {
    pub fn single(text: impl Into<String>) -> Self {
        Self {
            rows: vec![text.into()],
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Break an overlong caption into two rows.
///
/// Text of at most `max_chars` characters is returned as is. Longer text
/// breaks right after the last soft-break character inside `window`, or at
/// the midpoint when there is none.
pub fn wrap(
    text: &str,
    max_chars: usize,
    window: WrapWindow,
    policy: &PunctuationPolicy,
) -> WrappedLine {
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    let len = graphemes.len();

    if len <= max_chars {
        return WrappedLine::single(text);
    }

    let split_at = graphemes
        .iter()
        .enumerate()
        .filter(|(i, g)| policy.is_soft_break(g) && window.contains(*i, len))
        .map(|(i, _)| i + 1)
        .last()
        .unwrap_or(len / 2);

    let head: String = graphemes[..split_at].concat();
    let tail: String = graphemes[split_at..].concat();

    WrappedLine {
        rows: vec![head.trim().to_string(), tail.trim().to_string()],
    }
}

/// Drop every strip mark from `text`; run this after wrapping.
pub fn strip_punctuation(text: &str, policy: &PunctuationPolicy) -> String {
    text.graphemes(true)
        .filter(|g| !policy.is_strip_mark(g))
        .collect()
}
