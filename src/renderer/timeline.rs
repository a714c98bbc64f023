use crate::config::OverlayConfig;
use crate::overlay::{Cue, CueAction, OverlayScene, SceneTiming};
use anyhow::Result;
use serde::Serialize;

/// Timeline for managing overlay scene playback
pub struct Timeline {
    fps: u32,
    total_duration: f64,
    counter_seconds: f64,
    scenes: Vec<ScheduledScene>,
}

#[derive(Debug, Clone)]
struct ScheduledScene {
    scene_id: String,
    start: f64,
    duration: f64,
    cues: Vec<Cue>,
}

impl ScheduledScene {
    fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// What the overlay shows at one instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameState {
    pub time: f64,
    /// Fraction of the whole timeline elapsed, 0.0 to 1.0
    pub progress: f64,
    pub scene_id: Option<String>,
    /// Selectors whose reveal has fired, in cue order
    pub shown: Vec<String>,
    /// Current value of each running counter
    pub counters: Vec<(String, u64)>,
}

impl Timeline {
    /// Pair scenes with their timings, in order
    pub fn new(
        scenes: &[OverlayScene],
        timings: &[SceneTiming],
        config: &OverlayConfig,
    ) -> Result<Self> {
        if scenes.len() != timings.len() {
            anyhow::bail!(
                "Got {} scene timings for {} scenes",
                timings.len(),
                scenes.len()
            );
        }
        if config.fps == 0 {
            anyhow::bail!("Overlay fps must be positive");
        }

        let scheduled: Vec<ScheduledScene> = scenes
            .iter()
            .zip(timings)
            .map(|(scene, timing)| ScheduledScene {
                scene_id: scene.id.clone(),
                start: timing.start,
                duration: timing.duration,
                cues: scene.cues(config.cue_step),
            })
            .collect();

        let total_duration = scheduled.last().map_or(0.0, ScheduledScene::end);

        Ok(Self {
            fps: config.fps,
            total_duration,
            counter_seconds: config.counter_seconds,
            scenes: scheduled,
        })
    }

    /// Stretch or cut the playable length, e.g. to the narration's length
    pub fn with_total_duration(mut self, total: f64) -> Self {
        self.total_duration = total;
        self
    }

    /// Index of the scene on screen at `t`.
    ///
    /// A scene stays up through the gap after it until the next one starts.
    fn active_index(&self, t: f64) -> Option<usize> {
        for (i, scene) in self.scenes.iter().enumerate() {
            if t < scene.start {
                continue;
            }
            if t < scene.end() {
                return Some(i);
            }
            match self.scenes.get(i + 1) {
                Some(next) if t >= next.start => continue,
                _ => return Some(i),
            }
        }
        None
    }

    pub fn state_at(&self, t: f64) -> FrameState {
        let progress = if self.total_duration > 0.0 {
            (t / self.total_duration).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let mut state = FrameState {
            time: t,
            progress,
            scene_id: None,
            shown: Vec::new(),
            counters: Vec::new(),
        };

        let Some(index) = self.active_index(t) else {
            return state;
        };
        let scene = &self.scenes[index];
        state.scene_id = Some(scene.scene_id.clone());

        for cue in &scene.cues {
            let fired_at = scene.start + cue.delay;
            if t < fired_at {
                continue;
            }
            match cue.action {
                CueAction::Fade | CueAction::Pop => state.shown.push(cue.selector.clone()),
                CueAction::Counter(target) => {
                    let value = self.counter_value(target, t - fired_at);
                    state.counters.push((cue.selector.clone(), value));
                }
            }
        }

        state
    }

    fn counter_value(&self, target: u64, elapsed: f64) -> u64 {
        let progress = if self.counter_seconds > 0.0 {
            (elapsed / self.counter_seconds).min(1.0)
        } else {
            1.0
        };
        if progress >= 1.0 {
            target
        } else {
            (target as f64 * progress).floor() as u64
        }
    }

    /// Get total frame count
    pub fn total_frames(&self) -> u32 {
        (self.total_duration * self.fps as f64) as u32
    }

    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    /// Get FPS
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Convert frame number to time in seconds
    pub fn frame_to_time(&self, frame: u32) -> f64 {
        frame as f64 / self.fps as f64
    }

    /// Every frame's state, for screenshot-per-frame capture
    pub fn frames(&self) -> impl Iterator<Item = (u32, FrameState)> + '_ {
        (0..self.total_frames()).map(move |frame| {
            let state = self.state_at(self.frame_to_time(frame));
            (frame, state)
        })
    }

    /// The schedule as a JavaScript literal for the overlay page
    pub fn to_js(&self) -> String {
        let mut js = String::from("const timeline = [\n");

        for scene in &self.scenes {
            let cues: Vec<String> = scene
                .cues
                .iter()
                .map(|cue| format!("    [{:.1}, '{}', '{}']", cue.delay, cue.selector, cue.action))
                .collect();
            js.push_str(&format!(
                "  ['{}', {:5.2}, {:5.2}, [\n{}\n  ]],\n",
                scene.scene_id,
                scene.start,
                scene.duration,
                cues.join(",\n")
            ));
        }

        js.push_str("];\n");
        js.push_str(&format!("const TOTAL={:.2};\n", self.total_duration));
        js
    }
}
