use crate::captions::allocator::{allocate, TimedSegment};
use crate::captions::emitter::{emit, CaptionInstruction};
use crate::captions::policy::CaptionConfig;
use crate::captions::segmenter::{segment, Granularity, Segment};
use crate::captions::wrapper::{wrap, WrappedLine};
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// A spoken line together with the length of its synthesized audio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub character: String,
    pub text: String,
    pub audio_duration: f64,
}

impl Line {
    pub fn new(character: impl Into<String>, text: impl Into<String>, audio_duration: f64) -> Self {
        Self {
            character: character.into(),
            text: text.into(),
            audio_duration,
        }
    }
}

/// Turns spoken lines into timed, wrapped caption instructions
#[derive(Debug, Clone, Default)]
pub struct CaptionPlanner {
    config: CaptionConfig,
}

impl CaptionPlanner {
    pub fn new(config: CaptionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CaptionConfig {
        &self.config
    }

    pub fn granularity(&self, text: &str) -> Granularity {
        Granularity::for_text(text, self.config.fine_threshold)
    }

    pub fn segment(&self, text: &str) -> Vec<Segment> {
        segment(text, self.granularity(text), &self.config.punctuation)
    }

    pub fn time(&self, line: &Line) -> Vec<TimedSegment> {
        allocate(self.segment(&line.text), line.audio_duration)
    }

    pub fn wrap(&self, text: &str) -> WrappedLine {
        wrap(
            text,
            self.config.max_chars_per_row,
            self.config.wrap_window,
            &self.config.punctuation,
        )
    }

    /// Plan one line: segment, time, wrap and emit
    pub fn plan_line(&self, line: &Line) -> Vec<CaptionInstruction> {
        let timed = self.time(line);
        debug!(
            "{}: {} segment(s) over {:.3}s",
            line.character,
            timed.len(),
            line.audio_duration
        );

        timed
            .iter()
            .map(|t| {
                let wrapped = self.wrap(&t.segment.text);
                debug!(
                    "  [{:.3}, {:.3}) {:?}",
                    t.start, t.end, wrapped.rows
                );
                emit(t, &wrapped, &self.config.punctuation)
            })
            .collect()
    }

    /// Plan many lines; output order follows input order
    pub fn plan_lines(&self, lines: &[Line]) -> Vec<Vec<CaptionInstruction>> {
        lines.par_iter().map(|line| self.plan_line(line)).collect()
    }
}
