use crate::captions::segmenter::Segment;
use serde::{Deserialize, Serialize};

/// A segment with its display window inside the line's audio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedSegment {
    pub segment: Segment,
    pub start: f64,
    pub end: f64,
}

impl TimedSegment {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Share `total_duration` across `segments` in proportion to their length.
///
/// Windows are laid back to back from zero and the last one ends exactly at
/// `total_duration`. With no characters at all the first segment takes the
/// whole duration and any others collapse to empty windows at the end.
pub fn allocate(segments: Vec<Segment>, total_duration: f64) -> Vec<TimedSegment> {
    let total_chars: usize = segments.iter().map(Segment::char_len).sum();
    let count = segments.len();

    let mut timed = Vec::with_capacity(count);
    let mut cursor = 0.0;

    for (idx, segment) in segments.into_iter().enumerate() {
        let duration = if total_chars > 0 {
            total_duration * segment.char_len() as f64 / total_chars as f64
        } else if idx == 0 {
            total_duration
        } else {
            0.0
        };

        let end = if idx + 1 == count {
            total_duration
        } else {
            cursor + duration
        };

        timed.push(TimedSegment {
            segment,
            start: cursor,
            end,
        });
        cursor = end;
    }

    timed
}
