//! Template renderer adapters.

mod engine;

pub use engine::TeraRenderer;
