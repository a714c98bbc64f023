use crate::assets::AssetLoader;
use crate::captions::{CaptionPlanner, Line};
use crate::config::{AppConfig, EpisodeConfig};
use crate::parser::ScriptParser;
use crate::renderer::drawtext::{filter_graph, BurnInStyle};
use crate::renderer::{SegmentJob, VideoEncoder};
use crate::script::EpisodeScript;
use anyhow::{Context, Result};
use log::info;
use std::path::{Path, PathBuf};

/// Burns captions into one clip per dialogue line and joins them
pub struct CompositionContext;

impl CompositionContext {
    pub fn run(episode_dir: &Path, config: &AppConfig) -> Result<PathBuf> {
        let episode = &config.episode;
        let script_path = episode_dir.join(&episode.script_file);
        if !script_path.exists() {
            anyhow::bail!(
                "Script not found: {} (run `caption-planner tts` first)",
                script_path.display()
            );
        }
        let script = ScriptParser::parse_json(&script_path)?;

        let temp_dir = episode_dir.join(&episode.temp_dir);
        let output_dir = episode_dir.join(&episode.output_dir);
        for dir in [&temp_dir, &output_dir] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }

        println!("{}", "=".repeat(50));
        println!("🎬 《{}》", script.title);
        println!("{}", "=".repeat(50));

        let mut loader = AssetLoader::new(episode_dir);
        let lines = Self::resolve_lines(&script, episode, &mut loader)?;

        info!("Planning captions for {} lines", lines.len());
        let planner = CaptionPlanner::new(config.captions.clone());
        let plans = planner.plan_lines(&lines);

        let mut segments = Vec::with_capacity(lines.len());
        for (i, ((line, dialogue), plan)) in lines
            .iter()
            .zip(&script.dialogue)
            .zip(&plans)
            .enumerate()
        {
            let index = i + 1;
            let clip = loader
                .load_clip(episode.clip_for(&script, &line.character))?
                .clone();
            let style = BurnInStyle::for_height(clip.height);

            let audio = match &dialogue.audio {
                Some(audio) => loader.resolve_path(&episode.audio_dir.join(audio)),
                None => anyhow::bail!("Line {} has no audio file", index),
            };

            let job = SegmentJob {
                clip: clip.path,
                clip_duration: clip.duration,
                audio,
                duration: line.audio_duration,
                filter_graph: filter_graph(line.audio_duration, plan, &style),
                output: temp_dir.join(format!("seg_{:02}.mp4", index)),
            };

            let preview: String = line.text.chars().take(20).collect();
            let pieces = if plan.len() > 1 {
                format!(" ({} captions)", plan.len())
            } else {
                String::new()
            };
            println!(
                "  🎞️  Segment {}: {} - {}... ({:.2}s){}",
                index, line.character, preview, line.audio_duration, pieces
            );

            VideoEncoder::compose_segment(&job)?;
            segments.push(job.output);
        }

        let output = output_dir.join(format!("{}_demo.mp4", script.title));
        println!("\n🔗 Joining {} segments...", segments.len());
        VideoEncoder::concat(&segments, &temp_dir.join("concat_list.txt"), &output)?;

        let total = VideoEncoder::probe_duration(&output)?;
        println!("\n✨ Done! Total length: {:.2}s", total);
        println!("   {}", output.display());
        info!("Asset cache: {}", loader.stats());

        Ok(output)
    }

    /// Caption-planner input for every line: the stored duration when the
    /// script has one, otherwise the length of its audio file.
    pub fn resolve_lines(
        script: &EpisodeScript,
        episode: &EpisodeConfig,
        loader: &mut AssetLoader,
    ) -> Result<Vec<Line>> {
        script
            .dialogue
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let duration = match (entry.duration, &entry.audio) {
                    (Some(duration), _) => duration,
                    (None, Some(audio)) => {
                        loader
                            .load_audio(&episode.audio_dir.join(audio))
                            .with_context(|| format!("Line {}: cannot read audio", i + 1))?
                            .duration
                    }
                    (None, None) => {
                        anyhow::bail!("Line {} has neither a duration nor an audio file", i + 1)
                    }
                };
                Ok(Line::new(&entry.character, &entry.text, duration))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::DialogueLine;
    use tempfile::TempDir;

    fn write_wav(path: &Path, frames: u32) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for _ in 0..frames {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    fn line(
        character: &str,
        text: &str,
        audio: Option<&str>,
        duration: Option<f64>,
    ) -> DialogueLine {
        DialogueLine {
            character: character.into(),
            text: text.into(),
            audio: audio.map(String::from),
            duration,
        }
    }

    #[test]
    fn test_resolve_lines_probes_missing_durations() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("音频")).unwrap();
        write_wav(&dir.path().join("音频/01_橘猫.wav"), 24000);

        let script = EpisodeScript {
            title: "学外语".into(),
            characters: Default::default(),
            dialogue: vec![
                line("橘猫", "你好。再见！", Some("01_橘猫.wav"), None),
                line("白猫", "好", Some("02_白猫.mp3"), Some(0.8)),
            ],
        };

        let mut loader = AssetLoader::new(dir.path());
        let lines =
            CompositionContext::resolve_lines(&script, &EpisodeConfig::default(), &mut loader)
                .unwrap();

        assert_eq!(lines.len(), 2);
        assert!((lines[0].audio_duration - 1.5).abs() < 1e-9);
        assert_eq!(lines[1], Line::new("白猫", "好", 0.8));
        // the stored duration means the mp3 was never opened
        assert_eq!(loader.stats().audio, 1);
    }

    #[test]
    fn test_resolve_lines_without_audio_fails() {
        let dir = TempDir::new().unwrap();
        let script = EpisodeScript {
            title: "t".into(),
            characters: Default::default(),
            dialogue: vec![line("橘猫", "你好", None, None)],
        };

        let mut loader = AssetLoader::new(dir.path());
        let err =
            CompositionContext::resolve_lines(&script, &EpisodeConfig::default(), &mut loader)
                .unwrap_err();
        assert!(err.to_string().contains("neither a duration nor an audio file"));
    }

    #[test]
    fn test_missing_script() {
        let dir = TempDir::new().unwrap();
        let err = CompositionContext::run(dir.path(), &AppConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Script not found"));
    }
}
