use anyhow::{Context, Result};
use log::debug;
use std::path::{Path, PathBuf};
use std::process::Command;

/// One dialogue line's clip: looped talking video, speech track and captions
#[derive(Debug, Clone)]
pub struct SegmentJob {
    pub clip: PathBuf,
    pub clip_duration: f64,
    pub audio: PathBuf,
    pub duration: f64,
    pub filter_graph: String,
    pub output: PathBuf,
}

impl SegmentJob {
    /// How many extra passes of the clip cover the audio
    pub fn extra_loops(&self) -> u64 {
        if self.clip_duration > 0.0 {
            (self.duration / self.clip_duration) as u64
        } else {
            0
        }
    }
}

/// Handles video encoding using external FFmpeg process
pub struct VideoEncoder;

impl VideoEncoder {
    /// Check if FFmpeg is available
    pub fn is_available() -> bool {
        Command::new("ffmpeg").arg("-version").output().is_ok()
    }

    /// Container duration in seconds as reported by ffprobe
    pub fn probe_duration(path: &Path) -> Result<f64> {
        let out = Self::ffprobe(
            path,
            &["-show_entries", "format=duration"],
        )?;
        if out.is_empty() {
            return Ok(0.0);
        }
        out.parse()
            .with_context(|| format!("Unexpected ffprobe duration '{}' for {}", out, path.display()))
    }

    /// Height of the first video stream
    pub fn probe_height(path: &Path) -> Result<u32> {
        let out = Self::ffprobe(
            path,
            &["-select_streams", "v:0", "-show_entries", "stream=height"],
        )?;
        out.parse()
            .with_context(|| format!("Unexpected ffprobe height '{}' for {}", out, path.display()))
    }

    fn ffprobe(path: &Path, entries: &[&str]) -> Result<String> {
        let output = Command::new("ffprobe")
            .args(["-v", "error"])
            .args(entries)
            .args(["-of", "default=noprint_wrappers=1:nokey=1"])
            .arg(path)
            .output()
            .context("Failed to execute ffprobe")?;

        if !output.status.success() {
            anyhow::bail!("ffprobe failed for {}", path.display());
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// ffmpeg invocation rendering one dialogue segment
    pub fn segment_command(job: &SegmentJob) -> Command {
        let mut cmd = Command::new("ffmpeg");
        cmd.arg("-y")
            .arg("-stream_loop")
            .arg(job.extra_loops().to_string())
            .arg("-i")
            .arg(&job.clip)
            .arg("-i")
            .arg(&job.audio)
            .arg("-filter_complex")
            .arg(&job.filter_graph)
            .args(["-map", "[v]", "-map", "1:a"])
            .args(["-c:v", "libx264", "-c:a", "aac"])
            .arg("-t")
            .arg(job.duration.to_string())
            .arg("-shortest")
            .arg(&job.output);
        cmd
    }

    pub fn compose_segment(job: &SegmentJob) -> Result<()> {
        Self::run(Self::segment_command(job), "segment composition")
    }

    /// Concat-demuxer list: one `file '<name>'` line per segment
    pub fn concat_list(segments: &[PathBuf]) -> String {
        segments
            .iter()
            .map(|seg| {
                let name = seg
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                format!("file '{}'\n", name)
            })
            .collect()
    }

    /// Join segments without re-encoding.
    ///
    /// The list is written next to the segments and ffmpeg runs from there,
    /// so entries are bare file names.
    pub fn concat(segments: &[PathBuf], list_file: &Path, output: &Path) -> Result<()> {
        std::fs::write(list_file, Self::concat_list(segments))
            .with_context(|| format!("Failed to write concat list: {}", list_file.display()))?;

        let output = if output.is_absolute() {
            output.to_path_buf()
        } else {
            std::env::current_dir()?.join(output)
        };
        let list_dir = list_file.parent().unwrap_or_else(|| Path::new("."));
        let list_name = list_file
            .file_name()
            .context("Concat list path has no file name")?;

        let mut cmd = Command::new("ffmpeg");
        cmd.current_dir(list_dir)
            .args(["-y", "-f", "concat", "-safe", "0", "-i"])
            .arg(list_name)
            .args(["-c", "copy"])
            .arg(&output);

        Self::run(cmd, "concatenation")
    }

    fn run(mut cmd: Command, what: &str) -> Result<()> {
        if !Self::is_available() {
            anyhow::bail!("FFmpeg not found. Please install ffmpeg to enable video encoding.");
        }

        debug!("{:?}", cmd);
        let output = cmd
            .output()
            .with_context(|| format!("Failed to execute ffmpeg for {}", what))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail: Vec<&str> = stderr.lines().rev().take(5).collect();
            anyhow::bail!(
                "FFmpeg {} failed: {}",
                what,
                tail.into_iter().rev().collect::<Vec<_>>().join(" | ")
            );
        }

        Ok(())
    }
}
