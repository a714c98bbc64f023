//! Scene descriptions for browser-rendered caption overlays.
//!
//! Each scene is a DOM block whose lines are revealed one after another by
//! CSS classes. Scene timing comes from a transcript, from silence
//! boundaries, or from an explicit timestamp list.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayScript {
    #[serde(default)]
    pub title: String,
    pub scenes: Vec<OverlayScene>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayScene {
    pub id: String,
    pub lines: Vec<OverlayLine>,
    #[serde(default)]
    pub counter: Option<Counter>,
    /// Transcript segment indices spoken during this scene
    #[serde(default)]
    pub segments: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayLine {
    pub text: String,
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default)]
    pub anim: Reveal,
}

fn default_style() -> String {
    "white".to_string()
}

/// CSS reveal class of a line
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Reveal {
    #[default]
    Fade,
    Pop,
}

impl Reveal {
    pub fn class(self) -> &'static str {
        match self {
            Reveal::Fade => "fade",
            Reveal::Pop => "pop",
        }
    }
}

/// A big number that counts up from zero
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Counter {
    pub id: String,
    pub target: u64,
    #[serde(default = "default_counter_color")]
    pub color: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub suffix: Option<String>,
}

fn default_counter_color() -> String {
    "red".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueAction {
    Fade,
    Pop,
    Counter(u64),
}

impl From<Reveal> for CueAction {
    fn from(reveal: Reveal) -> Self {
        match reveal {
            Reveal::Fade => CueAction::Fade,
            Reveal::Pop => CueAction::Pop,
        }
    }
}

impl fmt::Display for CueAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CueAction::Fade => write!(f, "fade"),
            CueAction::Pop => write!(f, "pop"),
            CueAction::Counter(target) => write!(f, "counter:{}", target),
        }
    }
}

/// Something that happens `delay` seconds into a scene
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    pub delay: f64,
    pub selector: String,
    pub action: CueAction,
}

impl OverlayScene {
    /// Line reveals `step` seconds apart, then the counter pops in and starts
    /// counting shortly after.
    pub fn cues(&self, step: f64) -> Vec<Cue> {
        let mut cues: Vec<Cue> = self
            .lines
            .iter()
            .enumerate()
            .map(|(j, line)| Cue {
                delay: j as f64 * step,
                selector: format!("#{} .{}:nth-child({})", self.id, line.anim.class(), j + 1),
                action: line.anim.into(),
            })
            .collect();

        if let Some(counter) = &self.counter {
            let delay = self.lines.len() as f64 * step;
            cues.push(Cue {
                delay,
                selector: format!("#{} .pop:nth-child({})", self.id, self.lines.len() + 1),
                action: CueAction::Pop,
            });
            cues.push(Cue {
                delay: delay + 0.2,
                selector: format!("#{}", counter.id),
                action: CueAction::Counter(counter.target),
            });
        }

        cues
    }
}

/// When a scene is on screen
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SceneTiming {
    pub start: f64,
    pub duration: f64,
}

impl SceneTiming {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Speech-recognition output with per-segment timestamps
#[derive(Debug, Clone, Deserialize)]
pub struct Transcript {
    pub segments: Vec<TranscriptSegment>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TranscriptSegment {
    pub start: f64,
    pub end: f64,
}

/// Scene spans from the transcript segments each scene covers
pub fn timings_from_transcript(
    scenes: &[OverlayScene],
    transcript: &Transcript,
) -> Result<Vec<SceneTiming>> {
    scenes
        .iter()
        .map(|scene| {
            let first = *scene
                .segments
                .first()
                .with_context(|| format!("Scene '{}' lists no transcript segments", scene.id))?;
            let last = *scene.segments.last().unwrap_or(&first);

            let start = transcript
                .segments
                .get(first)
                .with_context(|| format!("Scene '{}': no transcript segment {}", scene.id, first))?
                .start;
            let end = transcript
                .segments
                .get(last)
                .with_context(|| format!("Scene '{}': no transcript segment {}", scene.id, last))?
                .end;

            Ok(SceneTiming {
                start,
                duration: end - start,
            })
        })
        .collect()
}

/// Scene `i` runs from the end of silence `i - 1` to the end of silence `i`
pub fn timings_from_silences(silences: &[(f64, f64)]) -> Vec<SceneTiming> {
    let mut start = 0.0;
    silences
        .iter()
        .map(|&(_, silence_end)| {
            let timing = SceneTiming {
                start,
                duration: silence_end - start,
            };
            start = silence_end;
            timing
        })
        .collect()
}

/// Lay scenes back to back from zero, squeezing them proportionally when
/// they overrun the audio.
pub fn make_continuous(timings: &[SceneTiming], audio_total: Option<f64>) -> Vec<SceneTiming> {
    let sum: f64 = timings.iter().map(|t| t.duration).sum();
    let ratio = match audio_total {
        Some(total) if sum > total && sum > 0.0 => total / sum,
        _ => 1.0,
    };

    let mut cursor = 0.0;
    timings
        .iter()
        .map(|t| {
            let timing = SceneTiming {
                start: cursor * ratio,
                duration: t.duration * ratio,
            };
            cursor += t.duration;
            timing
        })
        .collect()
}
