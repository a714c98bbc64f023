pub mod drawtext;
pub mod encoder;
pub mod timeline;

pub use drawtext::BurnInStyle;
pub use encoder::{SegmentJob, VideoEncoder};
pub use timeline::{FrameState, Timeline};
