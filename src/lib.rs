pub mod assets;
pub mod audio;
pub mod captions;
pub mod config;
pub mod context;
pub mod overlay;
pub mod parser;
pub mod renderer;
pub mod script;
pub mod tts;

pub use assets::AssetLoader;
pub use audio::AudioProbe;
pub use captions::{CaptionConfig, CaptionInstruction, CaptionPlanner, Line};
pub use config::AppConfig;
pub use parser::ScriptParser;
pub use renderer::{Timeline, VideoEncoder};
pub use script::{DialogueLine, EpisodeScript};
pub use tts::SpeechSynthesizer;
