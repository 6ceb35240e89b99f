pub mod error;
pub mod math;
pub mod mesh;
pub mod model;
pub mod operations;
pub mod topology;

pub use error::{Result, StackmeshError};
pub use mesh::{CdtMesher, Mesh, Mesher};
pub use model::{mesh_from_polygons, BuildModel, BuildParams, GeometryModel, Resolution, ResolutionTable};
pub use operations::tiling::RegionStack;
