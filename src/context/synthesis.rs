use crate::config::AppConfig;
use crate::parser::ScriptParser;
use crate::script::{episode_title, EpisodeScript};
use crate::tts::SpeechSynthesizer;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Plain-text script to speech files plus the episode's `剧本.json`
pub struct SynthesisContext;

impl SynthesisContext {
    pub fn run(episode_dir: &Path, script_file: &Path, config: &AppConfig) -> Result<PathBuf> {
        let dialogue = ScriptParser::parse_text_file(script_file)?;
        if dialogue.is_empty() {
            anyhow::bail!(
                "No 【speaker】 lines found in {}",
                script_file.display()
            );
        }

        let tts = SpeechSynthesizer::new(config.voices.clone());
        if !tts.is_available() {
            anyhow::bail!("edge-tts not found. Install it with `pip install edge-tts`.");
        }

        let title = episode_title(episode_dir);
        println!("🎙️  《{}》: {} lines", title, dialogue.len());

        let mut dialogue = dialogue;
        tts.synthesize(&mut dialogue, &episode_dir.join(&config.episode.audio_dir))?;

        let script = EpisodeScript::from_dialogue(title, dialogue, &config.voices);
        let path = episode_dir.join(&config.episode.script_file);
        Self::save(&script, &path)?;

        println!("\n✅ Saved: {}", path.display());
        Ok(path)
    }

    pub fn save(script: &EpisodeScript, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(script)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write script: {}", path.display()))
    }
}
