use anyhow::{Context, Result};
use caption_planner::captions::{CaptionInstruction, CaptionPlanner, Line};
use caption_planner::context::{CompositionContext, SynthesisContext};
use caption_planner::overlay::{self, OverlayScript, SceneTiming, Transcript};
use caption_planner::script::episode_title;
use caption_planner::{AppConfig, AssetLoader, EpisodeScript, ScriptParser, Timeline};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "caption-planner")]
#[command(about = "Timed caption planning for short dialogue videos", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./caption-planner.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan captions for an episode script or a single line
    Plan {
        /// Episode JSON script
        #[arg(value_name = "SCRIPT", required_unless_present = "text")]
        script: Option<PathBuf>,

        /// Plan this text instead of a script
        #[arg(long, requires = "duration")]
        text: Option<String>,

        /// Audio length for --text, in seconds
        #[arg(short, long, value_parser = parse_seconds)]
        duration: Option<f64>,

        /// Print instructions as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert a plain-text 【speaker】 script to episode JSON
    Parse {
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,

        /// Episode title (defaults to the script's directory name)
        #[arg(long)]
        title: Option<String>,
    },

    /// Synthesize speech for every line and write the episode script
    Tts {
        #[arg(value_name = "EPISODE_DIR")]
        episode_dir: PathBuf,

        #[arg(value_name = "SCRIPT")]
        script: PathBuf,
    },

    /// Burn captions into each line's clip and join them
    Compose {
        #[arg(value_name = "EPISODE_DIR", default_value = ".")]
        episode_dir: PathBuf,
    },

    /// Build the overlay animation timeline
    Timeline {
        /// Scene description JSON
        #[arg(value_name = "SCENES")]
        scenes: PathBuf,

        /// JSON list of {start, duration}, one per scene
        #[arg(
            long,
            conflicts_with_all = ["transcript", "silences"],
            required_unless_present_any = ["transcript", "silences"]
        )]
        timestamps: Option<PathBuf>,

        /// Speech-recognition JSON with timed segments
        #[arg(long, conflicts_with = "silences")]
        transcript: Option<PathBuf>,

        /// JSON list of [start, end] silences; each scene ends where one ends
        #[arg(long)]
        silences: Option<PathBuf>,

        /// Lay scenes back to back from zero
        #[arg(long)]
        continuous: bool,

        /// Narration length: sets the timeline total, and with --continuous
        /// scenes are squeezed to fit it
        #[arg(long, value_name = "SECS", value_parser = parse_seconds)]
        audio_total: Option<f64>,

        /// Print the overlay state at this time instead of the script
        #[arg(long, value_name = "SECS")]
        at: Option<f64>,
    },

    /// Print the effective configuration
    Config,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Plan {
            script,
            text,
            duration,
            json,
        } => {
            let planner = CaptionPlanner::new(config.captions.clone());
            let lines = match (text, script) {
                (Some(text), _) => vec![Line::new("", text, duration.unwrap_or(0.0))],
                (None, Some(path)) => load_lines(&path, &config)?,
                (None, None) => anyhow::bail!("Either SCRIPT or --text is required"),
            };
            let plans = planner.plan_lines(&lines);

            if json {
                println!("{}", serde_json::to_string_pretty(&plans)?);
            } else {
                print_plans(&lines, &plans);
            }
        }

        Commands::Parse { script, title } => {
            let dialogue = ScriptParser::parse_text_file(&script)?;
            let title = title.unwrap_or_else(|| {
                episode_title(script.parent().unwrap_or_else(|| Path::new(".")))
            });
            let episode = EpisodeScript::from_dialogue(title, dialogue, &config.voices);
            eprint!("{}", ScriptParser::summarize(&episode));
            println!("{}", serde_json::to_string_pretty(&episode)?);
        }

        Commands::Tts {
            episode_dir,
            script,
        } => {
            SynthesisContext::run(&episode_dir, &script, &config)?;
        }

        Commands::Compose { episode_dir } => {
            CompositionContext::run(&episode_dir, &config)?;
        }

        Commands::Timeline {
            scenes,
            timestamps,
            transcript,
            silences,
            continuous,
            audio_total,
            at,
        } => {
            let overlay_script: OverlayScript = read_json(&scenes)?;

            let mut timings: Vec<SceneTiming> = match (transcript, silences, timestamps) {
                (Some(path), _, _) => {
                    let transcript: Transcript = read_json(&path)?;
                    overlay::timings_from_transcript(&overlay_script.scenes, &transcript)?
                }
                (None, Some(path), _) => {
                    let silences: Vec<(f64, f64)> = read_json(&path)?;
                    overlay::timings_from_silences(&silences)
                }
                (None, None, Some(path)) => read_json(&path)?,
                (None, None, None) => anyhow::bail!(
                    "One of --timestamps, --transcript or --silences is required"
                ),
            };
            if continuous {
                timings = overlay::make_continuous(&timings, audio_total);
            }

            let mut timeline = Timeline::new(&overlay_script.scenes, &timings, &config.overlay)?;
            if let Some(total) = audio_total {
                timeline = timeline.with_total_duration(total);
            }

            match at {
                Some(t) => println!("{}", serde_json::to_string_pretty(&timeline.state_at(t))?),
                None => print!("{}", timeline.to_js()),
            }
        }

        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

/// Lines of an episode script with durations resolved against its directory
fn load_lines(path: &Path, config: &AppConfig) -> Result<Vec<Line>> {
    let script = ScriptParser::parse_json(path)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let mut loader = AssetLoader::new(base);
    CompositionContext::resolve_lines(&script, &config.episode, &mut loader)
}

/// Seconds given on the command line: finite and not negative
fn parse_seconds(value: &str) -> Result<f64, String> {
    let seconds: f64 = value
        .parse()
        .map_err(|_| format!("`{}` is not a number", value))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(format!("`{}` must be a finite, non-negative number of seconds", value));
    }
    Ok(seconds)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn print_plans(lines: &[Line], plans: &[Vec<CaptionInstruction>]) {
    for (i, (line, plan)) in lines.iter().zip(plans).enumerate() {
        if line.character.is_empty() {
            println!("{:02} ({:.2}s)", i + 1, line.audio_duration);
        } else {
            println!("{:02} {} ({:.2}s)", i + 1, line.character, line.audio_duration);
        }
        for instruction in plan {
            println!(
                "   [{:7.3} - {:7.3}] {}",
                instruction.start,
                instruction.end,
                instruction.row_texts.join(" / ")
            );
        }
    }
}
