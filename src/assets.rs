use crate::audio::AudioProbe;
use crate::renderer::VideoEncoder;
use anyhow::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Asset types that can be loaded
#[derive(Debug, Clone)]
pub enum Asset {
    Audio(AudioAsset),
    Clip(ClipAsset),
}

/// Speech track of one dialogue line
#[derive(Debug, Clone)]
pub struct AudioAsset {
    pub path: PathBuf,
    pub duration: f64,
}

/// Talking-character video that gets looped under the speech
#[derive(Debug, Clone)]
pub struct ClipAsset {
    pub path: PathBuf,
    pub duration: f64,
    pub height: u32,
}

/// Asset loader that probes episode media once and caches the results.
///
/// The same two clips are reused for every line, so probing them through
/// ffprobe on each segment adds up quickly.
pub struct AssetLoader {
    assets: HashMap<PathBuf, Asset>,
    base_path: PathBuf,
}

impl AssetLoader {
    /// Create a new asset loader with a base path for resolving relative paths
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            assets: HashMap::new(),
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Load a speech track, reading its duration from the file
    pub fn load_audio(&mut self, path: &Path) -> Result<&AudioAsset> {
        let full_path = self.resolve_path(path);

        if !self.assets.contains_key(&full_path) {
            if !full_path.exists() {
                anyhow::bail!("Audio file not found: {}", full_path.display());
            }

            let duration = AudioProbe::duration(&full_path)?;
            let asset = Asset::Audio(AudioAsset {
                path: full_path.clone(),
                duration,
            });

            self.assets.insert(full_path.clone(), asset);
        }

        match self.assets.get(&full_path) {
            Some(Asset::Audio(audio)) => Ok(audio),
            _ => anyhow::bail!("Asset is not audio: {}", full_path.display()),
        }
    }

    /// Load a talking clip, probing its duration and height with ffprobe
    pub fn load_clip(&mut self, path: &Path) -> Result<&ClipAsset> {
        let full_path = self.resolve_path(path);

        if !self.assets.contains_key(&full_path) {
            if !full_path.exists() {
                anyhow::bail!("Video file not found: {}", full_path.display());
            }

            let asset = Asset::Clip(ClipAsset {
                path: full_path.clone(),
                duration: VideoEncoder::probe_duration(&full_path)?,
                height: VideoEncoder::probe_height(&full_path)?,
            });

            self.assets.insert(full_path.clone(), asset);
        }

        match self.assets.get(&full_path) {
            Some(Asset::Clip(clip)) => Ok(clip),
            _ => anyhow::bail!("Asset is not a video: {}", full_path.display()),
        }
    }

    /// Resolve a path relative to the base path
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }

    /// Get statistics about loaded assets
    pub fn stats(&self) -> AssetStats {
        let mut audio = 0;
        let mut clips = 0;

        for asset in self.assets.values() {
            match asset {
                Asset::Audio(_) => audio += 1,
                Asset::Clip(_) => clips += 1,
            }
        }

        AssetStats {
            total: self.assets.len(),
            audio,
            clips,
        }
    }
}

/// Statistics about loaded assets
#[derive(Debug, Clone)]
pub struct AssetStats {
    pub total: usize,
    pub audio: usize,
    pub clips: usize,
}

impl std::fmt::Display for AssetStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Total: {}, Audio: {}, Clips: {}",
            self.total, self.audio, self.clips
        )
    }
}
