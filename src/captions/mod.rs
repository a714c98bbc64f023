//! Caption segmentation and timing.
//!
//! A spoken line flows through four pure stages: the segmenter cuts it at
//! punctuation, the allocator hands each piece a slice of the audio in
//! proportion to its length, the wrapper folds overlong pieces into two rows,
//! and the emitter produces what a caption renderer draws.

pub mod allocator;
pub mod emitter;
pub mod planner;
pub mod policy;
pub mod segmenter;
pub mod wrapper;

pub use allocator::{allocate, TimedSegment};
pub use emitter::{emit, CaptionInstruction, RowLayout};
pub use planner::{CaptionPlanner, Line};
pub use policy::{char_len, CaptionConfig, PunctuationPolicy, WrapWindow};
pub use segmenter::{segment, Granularity, Segment};
pub use wrapper::{strip_punctuation, wrap, WrappedLine};
