use crate::script::{DialogueLine, EpisodeScript};
use anyhow::{Context, Result};
use log::warn;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Script parser for episode JSON and plain-text dialogue scripts
pub struct ScriptParser;

fn speaker_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^【(.+?)】(.+)$").expect("speaker line pattern is valid"))
}

impl ScriptParser {
    /// Parse an episode JSON file
    pub fn parse_json(path: &Path) -> Result<EpisodeScript> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script file: {}", path.display()))?;

        let script: EpisodeScript = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON script: {}", path.display()))?;

        Self::validate_script(&script)?;

        Ok(script)
    }

    /// Parse a plain-text script file of `【角色】台词` lines
    pub fn parse_text_file(path: &Path) -> Result<Vec<DialogueLine>> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script file: {}", path.display()))?;
        Ok(Self::parse_text(&content))
    }

    /// Lines that don't carry a `【speaker】` prefix are skipped
    pub fn parse_text(content: &str) -> Vec<DialogueLine> {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|line| {
                let caps = speaker_line().captures(line)?;
                Some(DialogueLine::new(&caps[1], &caps[2]))
            })
            .collect()
    }

    /// Validate the script structure
    fn validate_script(script: &EpisodeScript) -> Result<()> {
        if script.dialogue.is_empty() {
            anyhow::bail!("Script must contain at least one dialogue line");
        }

        for (idx, line) in script.dialogue.iter().enumerate() {
            if line.character.trim().is_empty() {
                anyhow::bail!("Dialogue line {} has empty character", idx + 1);
            }

            if let Some(duration) = line.duration {
                if !duration.is_finite() || duration < 0.0 {
                    anyhow::bail!(
                        "Dialogue line {} duration must be a non-negative number",
                        idx + 1
                    );
                }
            }
        }

        let mapped: Vec<&str> = [&script.characters.a, &script.characters.b]
            .into_iter()
            .flatten()
            .map(|slot| slot.name.as_str())
            .collect();

        if !mapped.is_empty() {
            for speaker in script.speakers() {
                if !mapped.contains(&speaker) {
                    warn!(
                        "Speaker '{}' has no clip of its own and will use character B's",
                        speaker
                    );
                }
            }
        }

        Ok(())
    }

    /// Get a summary of the script structure
    pub fn summarize(script: &EpisodeScript) -> String {
        let mut summary = String::new();
        summary.push_str(&format!("Title: {}\n", script.title));

        for (label, slot) in [("A", &script.characters.a), ("B", &script.characters.b)] {
            if let Some(slot) = slot {
                summary.push_str(&format!(
                    "Character {}: {} ({})\n",
                    label,
                    slot.name,
                    slot.video.display()
                ));
            }
        }

        summary.push_str(&format!("Lines: {}\n", script.dialogue.len()));

        for (idx, line) in script.dialogue.iter().enumerate() {
            let preview: String = line.text.chars().take(20).collect();
            let audio = line.audio.as_deref().unwrap_or("-");
            summary.push_str(&format!(
                "  {:02}. {}: {} [{}]\n",
                idx + 1,
                line.character,
                preview,
                audio
            ));
        }

        summary
    }
}
