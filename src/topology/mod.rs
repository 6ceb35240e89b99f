pub mod curve_loop;
pub mod point;
pub mod registry;
pub mod segment;
pub mod surface;

pub use curve_loop::CurveLoop;
pub use point::{PointData, PointId};
pub use registry::GeometryRegistry;
pub use segment::{SegmentData, SegmentId, SegmentMatch, SignedSegment};
pub use surface::{SurfaceData, SurfaceId};
