pub mod assembly;
pub mod cleanup;
pub mod query;
pub mod tiling;
