//! Speech synthesis through the `edge-tts` command line tool.

use crate::config::VoiceConfig;
use crate::script::DialogueLine;
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::Path;
use std::process::Command;

pub struct SpeechSynthesizer {
    voices: VoiceConfig,
    program: String,
}

impl SpeechSynthesizer {
    pub fn new(voices: VoiceConfig) -> Self {
        Self {
            voices,
            program: "edge-tts".to_string(),
        }
    }

    /// Use a different executable with the same arguments
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn is_available(&self) -> bool {
        Command::new(&self.program).arg("--version").output().is_ok()
    }

    /// `01_橘猫.mp3` for the first line; `index` is 1-based
    pub fn audio_file_name(index: usize, character: &str) -> String {
        format!("{:02}_{}.mp3", index, character)
    }

    pub fn command(&self, line: &DialogueLine, output: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("--voice")
            .arg(self.voices.voice_for(&line.character))
            .arg("--text")
            .arg(&line.text)
            .arg("--write-media")
            .arg(output);
        cmd
    }

    /// Speak one line into `audio_dir` and record the file name on it
    pub fn synthesize_line(
        &self,
        index: usize,
        line: &mut DialogueLine,
        audio_dir: &Path,
    ) -> Result<()> {
        let file_name = Self::audio_file_name(index, &line.character);
        let output = audio_dir.join(&file_name);

        let mut cmd = self.command(line, &output);
        debug!("{:?}", cmd);
        let result = cmd
            .output()
            .with_context(|| format!("Failed to execute {}", self.program))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            anyhow::bail!(
                "{} failed for line {} ({}): {}",
                self.program,
                index,
                line.character,
                stderr.trim()
            );
        }

        line.audio = Some(file_name);
        // the new file's length is probed when the episode is composed
        line.duration = None;
        Ok(())
    }

    /// Speak every line in order
    pub fn synthesize(&self, dialogue: &mut [DialogueLine], audio_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(audio_dir).with_context(|| {
            format!("Failed to create audio directory: {}", audio_dir.display())
        })?;

        info!(
            "Synthesizing {} lines into {}",
            dialogue.len(),
            audio_dir.display()
        );

        for (i, line) in dialogue.iter_mut().enumerate() {
            let index = i + 1;
            let preview: String = line.text.chars().take(20).collect();
            println!(
                "  🔊 {}: {}",
                Self::audio_file_name(index, &line.character),
                preview
            );
            self.synthesize_line(index, line, audio_dir)?;
        }

        Ok(())
    }
}
