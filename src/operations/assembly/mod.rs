mod assemble_surfaces;
mod make_loop;

pub use assemble_surfaces::AssembleSurfaces;
pub use make_loop::MakeLoop;
