use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Punctuation sets driving segmentation, wrapping and display cleanup.
///
/// Each set is a string of single-character marks. The defaults target
/// Simplified Chinese captions; other scripts swap in their own sets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PunctuationPolicy {
    /// Sentence terminators, split points in both granularities
    #[serde(default = "default_sentence_marks")]
    pub sentence_marks: String,
    /// Clause marks, split points in fine granularity only
    #[serde(default = "default_clause_marks")]
    pub clause_marks: String,
    /// Wrap candidates inside an overlong caption
    #[serde(default = "default_soft_breaks")]
    pub soft_breaks: String,
    /// Removed from rendered caption text
    #[serde(default = "default_strip_marks")]
    pub strip_marks: String,
}

fn default_sentence_marks() -> String {
    "。！？!?".to_string()
}

fn default_clause_marks() -> String {
    "，,".to_string()
}

fn default_soft_breaks() -> String {
    "，、；： ".to_string()
}

fn default_strip_marks() -> String {
    "，。！？、；：“”‘’（）【】《》—…·,!?;:'\"()[]".to_string()
}

impl Default for PunctuationPolicy {
    fn default() -> Self {
        Self {
            sentence_marks: default_sentence_marks(),
            clause_marks: default_clause_marks(),
            soft_breaks: default_soft_breaks(),
            strip_marks: default_strip_marks(),
        }
    }
}

impl PunctuationPolicy {
    pub fn is_sentence_mark(&self, grapheme: &str) -> bool {
        contains_mark(&self.sentence_marks, grapheme)
    }

    pub fn is_clause_mark(&self, grapheme: &str) -> bool {
        contains_mark(&self.clause_marks, grapheme)
    }

    pub fn is_soft_break(&self, grapheme: &str) -> bool {
        contains_mark(&self.soft_breaks, grapheme)
    }

    pub fn is_strip_mark(&self, grapheme: &str) -> bool {
        contains_mark(&self.strip_marks, grapheme)
    }
}

/// A grapheme matches when it is exactly one char and that char is in the set.
fn contains_mark(set: &str, grapheme: &str) -> bool {
    let mut chars = grapheme.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => set.contains(c),
        _ => false,
    }
}

/// Fractional bounds of the region where a wrap may break
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WrapWindow {
    pub low: f64,
    pub high: f64,
}

impl Default for WrapWindow {
    fn default() -> Self {
        Self {
            low: 0.3,
            high: 0.7,
        }
    }
}

impl WrapWindow {
    /// Whether grapheme index `index` of a `len`-long text lies inside the window
    pub fn contains(&self, index: usize, len: usize) -> bool {
        let i = index as f64;
        let len = len as f64;
        i >= len * self.low && i <= len * self.high
    }
}

/// Tunables for the caption planner
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaptionConfig {
    #[serde(default = "default_max_chars_per_row")]
    pub max_chars_per_row: usize,
    /// Lines longer than this are segmented at clause marks too
    #[serde(default = "default_fine_threshold")]
    pub fine_threshold: usize,
    #[serde(default)]
    pub wrap_window: WrapWindow,
    #[serde(default)]
    pub punctuation: PunctuationPolicy,
}

fn default_max_chars_per_row() -> usize {
    14
}

fn default_fine_threshold() -> usize {
    20
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            max_chars_per_row: default_max_chars_per_row(),
            fine_threshold: default_fine_threshold(),
            wrap_window: WrapWindow::default(),
            punctuation: PunctuationPolicy::default(),
        }
    }
}

/// Caption length in user-perceived characters
pub fn char_len(text: &str) -> usize {
    text.graphemes(true).count()
}
