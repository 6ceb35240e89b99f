//! Rib waveguide cross-section.
//!
//! Builds a silicon rib on buried oxide under oxide cladding, meshes it and
//! prints per-region statistics.
//!
//! ```text
//! cargo run --example waveguide
//! RUST_LOG=stackmesh=debug cargo run --example waveguide
//! ```

use geo::{Polygon, Rect};
use stackmesh::model::ResolutionTable;
use stackmesh::{BuildModel, BuildParams, CdtMesher, Mesher, RegionStack, Resolution, StackmeshError};

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon<f64> {
    Rect::new((x0, y0), (x1, y1)).to_polygon()
}

fn main() -> Result<(), StackmeshError> {
    // Default: WARN for everything, INFO for stackmesh.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("waveguide=info".parse().unwrap_or_default())
        .add_directive("stackmesh=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    // Later entries win overlaps, so the cladding goes first and the core last.
    let stack = RegionStack::new()
        .with("clad", rect(-3.0, 0.0, 3.0, 2.0))
        .with("box", rect(-3.0, -2.0, 3.0, 0.0))
        .with("slab", rect(-3.0, 0.0, 3.0, 0.09))
        .with("core", rect(-0.25, 0.0, 0.25, 0.22));

    let mut resolutions = ResolutionTable::new();
    resolutions.insert("core".into(), Resolution::new(0.02).with_distance(0.5));
    resolutions.insert("slab".into(), Resolution::new(0.04).with_distance(0.3));

    let params = BuildParams::default().with_resolution_bounds(0.01, 0.3);
    let model = BuildModel::new(&stack)
        .with_resolutions(resolutions)
        .with_params(params)
        .execute()?;

    println!("surfaces: {}", model.surface_count());
    println!(
        "slab/core interface segments: {}",
        model.interface("slab", "core").len()
    );

    let mesh = CdtMesher::new().generate(&model)?;
    println!(
        "mesh: {} vertices, {} triangles, {} boundary lines",
        mesh.vertices.len(),
        mesh.triangles.len(),
        mesh.lines.len()
    );
    for group in mesh.groups.iter().filter(|g| g.dimension == 2) {
        println!(
            "  {:<6} {:>6} triangles, area {:.4}",
            group.name,
            mesh.triangles_in(&group.name).count(),
            mesh.area_of(&group.name)
        );
    }
    Ok(())
}
