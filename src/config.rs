use crate::captions::CaptionConfig;
use crate::script::{CharacterSlot, EpisodeScript};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub captions: CaptionConfig,
    #[serde(default)]
    pub voices: VoiceConfig,
    #[serde(default)]
    pub episode: EpisodeConfig,
    #[serde(default)]
    pub overlay: OverlayConfig,
}

/// Speaker → TTS voice and speaker → talking clip
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct VoiceConfig {
    pub voices: BTreeMap<String, String>,
    pub default_voice: String,
    pub videos: BTreeMap<String, PathBuf>,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        let voices = [
            ("橘猫", "zh-CN-YunjianNeural"),
            ("白猫", "zh-CN-XiaoyiNeural"),
            ("老公", "zh-CN-YunyangNeural"),
            ("老婆", "zh-CN-XiaoxiaoNeural"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let videos = [("橘猫", "橘猫说话.mp4"), ("白猫", "白猫说话.mp4")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), PathBuf::from(v)))
            .collect();

        Self {
            voices,
            default_voice: "zh-CN-YunxiNeural".to_string(),
            videos,
        }
    }
}

impl VoiceConfig {
    pub fn voice_for(&self, character: &str) -> &str {
        self.voices
            .get(character)
            .map(String::as_str)
            .unwrap_or(&self.default_voice)
    }

    pub fn video_for(&self, character: &str) -> PathBuf {
        self.videos
            .get(character)
            .cloned()
            .unwrap_or_else(|| PathBuf::from(format!("{}说话.mp4", character)))
    }
}

/// Directory layout of an episode and its fallback speakers
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct EpisodeConfig {
    pub script_file: PathBuf,
    pub audio_dir: PathBuf,
    pub output_dir: PathBuf,
    pub temp_dir: PathBuf,
    pub character_a: CharacterSlot,
    pub character_b: CharacterSlot,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            script_file: PathBuf::from("剧本.json"),
            audio_dir: PathBuf::from("音频"),
            output_dir: PathBuf::from("成品"),
            temp_dir: PathBuf::from("temp_segments"),
            character_a: CharacterSlot::new("橘猫", "橘猫说话.mp4"),
            character_b: CharacterSlot::new("白猫", "白猫说话.mp4"),
        }
    }
}

impl EpisodeConfig {
    /// Clip for a speaker: slot A's clip when the name matches A, else slot B's.
    /// Slots missing from the script fall back to the configured defaults.
    pub fn clip_for<'a>(&'a self, script: &'a EpisodeScript, character: &str) -> &'a Path {
        let a = script.characters.a.as_ref().unwrap_or(&self.character_a);
        let b = script.characters.b.as_ref().unwrap_or(&self.character_b);

        if character == a.name {
            &a.video
        } else {
            &b.video
        }
    }
}

/// Browser overlay timing
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct OverlayConfig {
    pub fps: u32,
    /// Gap between successive line reveals within a scene
    pub cue_step: f64,
    /// How long a counter takes to reach its target
    pub counter_seconds: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            cue_step: 0.4,
            counter_seconds: 1.2,
        }
    }
}

impl AppConfig {
    /// Defaults, then `caption-planner.*` (or `file` when given), then
    /// `CAPTION_PLANNER_*` environment overrides.
    ///
    /// Map-valued defaults (voices, clips) come from the serde defaults, since
    /// config keys must be ASCII path expressions.
    pub fn load(file: Option<&Path>) -> Result<Self, config::ConfigError> {
        let defaults = CaptionConfig::default();
        let builder = config::Config::builder()
            .set_default("captions.max_chars_per_row", defaults.max_chars_per_row as i64)?
            .set_default("captions.fine_threshold", defaults.fine_threshold as i64)?
            .set_default("overlay.fps", 30)?;

        let builder = match file {
            Some(path) => builder.add_source(config::File::from(path).required(true)),
            None => builder.add_source(config::File::with_name("caption-planner").required(false)),
        };

        let config: AppConfig = builder
            // e.g. CAPTION_PLANNER_CAPTIONS__MAX_CHARS_PER_ROW=16
            .add_source(
                config::Environment::with_prefix("CAPTION_PLANNER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.captions.max_chars_per_row == 0 {
            return Err(config::ConfigError::Message(
                "captions.max_chars_per_row must be at least 1".to_string(),
            ));
        }
        if self.overlay.fps == 0 {
            return Err(config::ConfigError::Message(
                "overlay.fps must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::Characters;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_voice_lookup() {
        let voices = VoiceConfig::default();
        assert_eq!(voices.voice_for("橘猫"), "zh-CN-YunjianNeural");
        assert_eq!(voices.voice_for("老婆"), "zh-CN-XiaoxiaoNeural");
        assert_eq!(voices.voice_for("路人"), "zh-CN-YunxiNeural");
        assert_eq!(voices.video_for("白猫"), PathBuf::from("白猫说话.mp4"));
        assert_eq!(voices.video_for("老公"), PathBuf::from("老公说话.mp4"));
    }

    #[test]
    fn test_clip_selection() {
        let episode = EpisodeConfig::default();
        let script = EpisodeScript {
            title: "t".into(),
            characters: Characters {
                a: Some(CharacterSlot::new("老公", "husband.mp4")),
                b: Some(CharacterSlot::new("老婆", "wife.mp4")),
            },
            dialogue: vec![],
        };
        assert_eq!(episode.clip_for(&script, "老公"), Path::new("husband.mp4"));
        assert_eq!(episode.clip_for(&script, "老婆"), Path::new("wife.mp4"));
        // anyone who is not A speaks over B's clip
        assert_eq!(episode.clip_for(&script, "路人"), Path::new("wife.mp4"));
    }

    #[test]
    fn test_clip_selection_defaults() {
        let episode = EpisodeConfig::default();
        let script = EpisodeScript {
            title: "t".into(),
            characters: Characters::default(),
            dialogue: vec![],
        };
        assert_eq!(episode.clip_for(&script, "橘猫"), Path::new("橘猫说话.mp4"));
        assert_eq!(episode.clip_for(&script, "白猫"), Path::new("白猫说话.mp4"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[captions]\nmax_chars_per_row = 16\n\n[overlay]\nfps = 60").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.captions.max_chars_per_row, 16);
        assert_eq!(config.captions.fine_threshold, 20);
        assert_eq!(config.overlay.fps, 60);
        assert_eq!(config.episode.audio_dir, PathBuf::from("音频"));
    }

    #[test]
    fn test_load_defaults() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config.captions, CaptionConfig::default());
        assert_eq!(config.voices, VoiceConfig::default());
        assert_eq!(config.episode, EpisodeConfig::default());
        assert_eq!(config.overlay, OverlayConfig::default());
    }

    #[test]
    fn test_load_voice_map_from_file() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[voices]\ndefault_voice = \"zh-CN-XiaoyiNeural\"\n\n[voices.voices]\n\"路人\" = \"zh-CN-YunxiaNeural\""
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.voices.voice_for("路人"), "zh-CN-YunxiaNeural");
        assert_eq!(config.voices.voice_for("橘猫"), "zh-CN-XiaoyiNeural");
        // videos were not mentioned, so the defaults stay
        assert_eq!(config.voices.video_for("白猫"), PathBuf::from("白猫说话.mp4"));
    }

    #[test]
    fn test_zero_row_width_is_rejected() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[captions]\nmax_chars_per_row = 0").unwrap();

        let err = AppConfig::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("max_chars_per_row must be at least 1"));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/caption-planner.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_toml_roundtrip_of_defaults() {
        let rendered = AppConfig::default().to_toml().unwrap();
        assert!(rendered.contains("max_chars_per_row = 14"));
        let parsed: AppConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.captions, CaptionConfig::default());
        assert_eq!(parsed.voices, VoiceConfig::default());
    }
}
