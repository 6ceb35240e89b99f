mod adjacency;
mod area;

pub use adjacency::SegmentAdjacency;
pub use area::{LoopArea, SurfaceArea};
