use crate::captions::policy::{char_len, PunctuationPolicy};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Which marks count as split points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// Sentence terminators only
    Coarse,
    /// Sentence terminators and clause marks
    Fine,
}

impl Granularity {
    /// Fine for monologue-length text, coarse otherwise
    pub fn for_text(text: &str, fine_threshold: usize) -> Self {
        if char_len(text) > fine_threshold {
            Granularity::Fine
        } else {
            Granularity::Coarse
        }
    }

    fn is_split_mark(self, policy: &PunctuationPolicy, grapheme: &str) -> bool {
        match self {
            Granularity::Coarse => policy.is_sentence_mark(grapheme),
            Granularity::Fine => {
                policy.is_sentence_mark(grapheme) || policy.is_clause_mark(grapheme)
            }
        }
    }
}

/// A sentence- or clause-level piece of a spoken line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
}

impl Segment {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn char_len(&self) -> usize {
        char_len(&self.text)
    }
}

/// Split `text` at the granularity's marks, keeping each mark with the
/// text before it.
///
/// Pieces are trimmed and blank pieces dropped. When nothing survives the
/// whole input comes back untouched as a single segment.
pub fn segment(text: &str, granularity: Granularity, policy: &PunctuationPolicy) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = String::new();

    for grapheme in text.graphemes(true) {
        current.push_str(grapheme);
        if granularity.is_split_mark(policy, grapheme) {
            push_trimmed(&mut segments, &current);
            current.clear();
        }
    }
    push_trimmed(&mut segments, &current);

    if segments.is_empty() {
        segments.push(Segment::new(text));
    }

    segments
}

fn push_trimmed(segments: &mut Vec<Segment>, piece: &str) {
    let trimmed = piece.trim();
    if !trimmed.is_empty() {
        segments.push(Segment::new(trimmed));
    }
}
