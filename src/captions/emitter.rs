use crate::captions::allocator::TimedSegment;
use crate::captions::policy::PunctuationPolicy;
use crate::captions::wrapper::{strip_punctuation, WrappedLine};
use serde::{Deserialize, Serialize};

/// What an external caption renderer needs to draw one segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionInstruction {
    /// Display rows, top row first, punctuation already stripped
    pub row_texts: Vec<String>,
    pub start: f64,
    pub end: f64,
    /// Stacking index of the top row; the last row is always index 0
    pub row_index_from_bottom: usize,
}

impl CaptionInstruction {
    /// Rows paired with their stacking index counted up from the bottom anchor.
    ///
    /// The index comes from the row count, so the last row is always 0.
    pub fn rows(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        let top = self.row_texts.len().saturating_sub(1);
        self.row_texts
            .iter()
            .enumerate()
            .map(move |(i, text)| (text.as_str(), top - i))
    }

    pub fn is_visible_at(&self, t: f64) -> bool {
        t >= self.start && t < self.end
    }
}

/// Vertical placement of caption rows, in pixels from the bottom edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowLayout {
    pub bottom_offset: u32,
    pub row_height: u32,
}

impl RowLayout {
    pub fn y_from_bottom(&self, row_index_from_bottom: usize) -> u32 {
        self.bottom_offset + row_index_from_bottom as u32 * self.row_height
    }
}

pub fn emit(
    timed: &TimedSegment,
    wrapped: &WrappedLine,
    policy: &PunctuationPolicy,
) -> CaptionInstruction {
    let row_texts: Vec<String> = wrapped
        .rows
        .iter()
        .map(|row| strip_punctuation(row, policy))
        .collect();
    let row_index_from_bottom = row_texts.len().saturating_sub(1);

    CaptionInstruction {
        row_texts,
        start: timed.start,
        end: timed.end,
        row_index_from_bottom,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::captions::segmenter::Segment;

    fn timed(text: &str, start: f64, end: f64) -> TimedSegment {
        TimedSegment {
            segment: Segment::new(text),
            start,
            end,
        }
    }

    #[test]
    fn test_single_row_sits_on_anchor() {
        let policy = PunctuationPolicy::default();
        let instruction = emit(
            &timed("你好。", 0.0, 2.0),
            &WrappedLine::single("你好。"),
            &policy,
        );
        assert_eq!(instruction.row_texts, vec!["你好"]);
        assert_eq!(instruction.row_index_from_bottom, 0);
        assert_eq!(instruction.rows().collect::<Vec<_>>(), vec![("你好", 0)]);
    }

    #[test]
    fn test_two_rows_stack_upwards() {
        let policy = PunctuationPolicy::default();
        let wrapped = WrappedLine {
            rows: vec!["第一行，".to_string(), "第二行".to_string()],
        };
        let instruction = emit(&timed("第一行，第二行", 1.0, 3.5), &wrapped, &policy);
        assert_eq!(instruction.row_index_from_bottom, 1);
        assert_eq!(
            instruction.rows().collect::<Vec<_>>(),
            vec![("第一行", 1), ("第二行", 0)]
        );
        assert_eq!(instruction.start, 1.0);
        assert_eq!(instruction.end, 3.5);
    }

    #[test]
    fn test_rows_ignore_inconsistent_top_index() {
        let instruction = CaptionInstruction {
            row_texts: vec!["上一行".into(), "下一行".into()],
            start: 0.0,
            end: 1.0,
            row_index_from_bottom: 0,
        };
        assert_eq!(
            instruction.rows().collect::<Vec<_>>(),
            vec![("上一行", 1), ("下一行", 0)]
        );
    }

    #[test]
    fn test_row_layout_offsets() {
        let layout = RowLayout {
            bottom_offset: 100,
            row_height: 40,
        };
        assert_eq!(layout.y_from_bottom(0), 100);
        assert_eq!(layout.y_from_bottom(1), 140);
    }

    #[test]
    fn test_visibility_window_is_half_open() {
        let instruction = CaptionInstruction {
            row_texts: vec!["好".into()],
            start: 1.0,
            end: 2.0,
            row_index_from_bottom: 0,
        };
        assert!(!instruction.is_visible_at(0.99));
        assert!(instruction.is_visible_at(1.0));
        assert!(instruction.is_visible_at(1.99));
        assert!(!instruction.is_visible_at(2.0));
    }

    #[test]
    fn test_serialized_shape() {
        let instruction = CaptionInstruction {
            row_texts: vec!["再见".into()],
            start: 2.0,
            end: 4.0,
            row_index_from_bottom: 0,
        };
        let json = serde_json::to_value(&instruction).unwrap();
        assert_eq!(json["row_texts"][0], "再见");
        assert_eq!(json["start"], 2.0);
        assert_eq!(json["end"], 4.0);
        assert_eq!(json["row_index_from_bottom"], 0);
    }
}
