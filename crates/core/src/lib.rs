pub mod aggregate;
pub mod classify;
pub mod duration;
pub mod lead;
pub mod normalize;
pub mod pipeline;
pub mod stats;

pub use lead::*;
