use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::VoiceConfig;

/// An episode as stored next to its media (`剧本.json`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EpisodeScript {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub characters: Characters,
    #[serde(default)]
    pub dialogue: Vec<DialogueLine>,
}

fn default_title() -> String {
    "未命名".to_string()
}

/// The two on-screen speakers and the talking clip used for each
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Characters {
    #[serde(rename = "A", default, skip_serializing_if = "Option::is_none")]
    pub a: Option<CharacterSlot>,
    #[serde(rename = "B", default, skip_serializing_if = "Option::is_none")]
    pub b: Option<CharacterSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CharacterSlot {
    pub name: String,
    pub video: PathBuf,
}

impl CharacterSlot {
    pub fn new(name: impl Into<String>, video: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            video: video.into(),
        }
    }
}

/// One spoken line of the episode
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DialogueLine {
    pub character: String,
    pub text: String,
    /// Audio file name inside the episode's audio directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    /// Known audio length in seconds; probed from `audio` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl DialogueLine {
    pub fn new(character: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            character: character.into(),
            text: text.into(),
            audio: None,
            duration: None,
        }
    }
}

impl EpisodeScript {
    /// Build the stored form of a freshly parsed script.
    ///
    /// The first two distinct speakers become slots A and B; their clips come
    /// from the voice config's video map.
    pub fn from_dialogue(
        title: impl Into<String>,
        dialogue: Vec<DialogueLine>,
        voices: &VoiceConfig,
    ) -> Self {
        let speakers = first_appearances(&dialogue);
        let slot = |idx: usize| {
            speakers
                .get(idx)
                .map(|name| CharacterSlot::new(*name, voices.video_for(name)))
        };
        let characters = Characters {
            a: slot(0),
            b: slot(1),
        };

        Self {
            title: title.into(),
            characters,
            dialogue,
        }
    }

    /// Speakers in order of first appearance
    pub fn speakers(&self) -> Vec<&str> {
        first_appearances(&self.dialogue)
    }
}

fn first_appearances(dialogue: &[DialogueLine]) -> Vec<&str> {
    let mut speakers: Vec<&str> = Vec::new();
    for line in dialogue {
        if !speakers.contains(&line.character.as_str()) {
            speakers.push(&line.character);
        }
    }
    speakers
}

/// Title derived from an episode directory name: `第二集_学外语` → `学外语`.
///
/// `.` and the empty path resolve to the current directory; a directory with
/// no usable name yields `未命名`.
pub fn episode_title(dir: &Path) -> String {
    let dir = if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    };
    let resolved = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());

    let name = resolved
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let title = match name.split_once('_') {
        Some((_, rest)) => rest.to_string(),
        None => name,
    };
    if title.trim().is_empty() {
        default_title()
    } else {
        title
    }
}
