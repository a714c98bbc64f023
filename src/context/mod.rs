pub mod composition;
pub mod synthesis;

pub use composition::CompositionContext;
pub use synthesis::SynthesisContext;
