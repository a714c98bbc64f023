use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;
use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Reads the playing time of synthesized speech
pub struct AudioProbe;

impl AudioProbe {
    /// Duration of an audio file in seconds
    pub fn duration(path: &Path) -> Result<f64> {
        let is_wav = path
            .extension()
            .and_then(|e| e.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case("wav"));

        if is_wav {
            Self::wav_duration(path)
        } else {
            Self::container_duration(path)
        }
    }

    fn wav_duration(path: &Path) -> Result<f64> {
        let reader = hound::WavReader::open(path)
            .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;
        let spec = reader.spec();
        if spec.sample_rate == 0 {
            anyhow::bail!("WAV file has zero sample rate: {}", path.display());
        }
        Ok(reader.duration() as f64 / spec.sample_rate as f64)
    }

    /// Frame count from the container header, or the sum of packet durations
    /// when the header doesn't carry one (common for VBR mp3).
    fn container_duration(path: &Path) -> Result<f64> {
        let src = File::open(path)
            .with_context(|| format!("Failed to open audio file: {}", path.display()))?;
        let mss = MediaSourceStream::new(Box::new(src), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let meta_opts: MetadataOptions = Default::default();
        let fmt_opts: FormatOptions = Default::default();

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &fmt_opts, &meta_opts)
            .context("Unsupported audio format")?;

        let mut format = probed.format;
        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .context("No supported audio track found")?;

        let track_id = track.id;
        let params = track.codec_params.clone();

        let frames = match params.n_frames {
            Some(n) => n,
            None => {
                let mut total = 0u64;
                while let Ok(packet) = format.next_packet() {
                    if packet.track_id() == track_id {
                        total += packet.dur;
                    }
                }
                total
            }
        };

        if let Some(time_base) = params.time_base {
            let time = time_base.calc_time(frames);
            return Ok(time.seconds as f64 + time.frac);
        }

        match params.sample_rate {
            Some(rate) if rate > 0 => Ok(frames as f64 / rate as f64),
            _ => anyhow::bail!("Cannot determine duration of {}", path.display()),
        }
    }
}
