//! Stacking-priority resolution of overlapping regions.
//!
//! Regions are declared background first. Every region is clipped by all
//! regions declared after it, so the plane ends up tiled by disjoint
//! resolved layers.

mod tile_layers;
mod validate;

pub use tile_layers::TileLayers;
pub use validate::validate_polygon;

use geo::{Area, MultiPolygon, Polygon};
use indexmap::IndexMap;

/// Ordered mapping from region name to polygon.
///
/// Insertion order is stacking order: later regions cut into earlier ones.
/// Re-inserting an existing name replaces its polygon in place.
#[derive(Debug, Clone, Default)]
pub struct RegionStack {
    regions: IndexMap<String, Polygon<f64>>,
}

impl RegionStack {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a region on top of the stack, returning the polygon it replaced.
    pub fn insert(&mut self, name: impl Into<String>, polygon: Polygon<f64>) -> Option<Polygon<f64>> {
        self.regions.insert(name.into(), polygon)
    }

    /// Builder form of [`RegionStack::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, polygon: Polygon<f64>) -> Self {
        self.insert(name, polygon);
        self
    }

    /// Returns the polygon declared for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Polygon<f64>> {
        self.regions.get(name)
    }

    /// Number of regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Returns `true` if no region has been declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Iterates over regions in declaration order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, &Polygon<f64>)> + ExactSizeIterator {
        self.regions.iter().map(|(name, poly)| (name.as_str(), poly))
    }
}

impl<S: Into<String>> FromIterator<(S, Polygon<f64>)> for RegionStack {
    fn from_iter<I: IntoIterator<Item = (S, Polygon<f64>)>>(iter: I) -> Self {
        let mut stack = Self::new();
        for (name, polygon) in iter {
            stack.insert(name, polygon);
        }
        stack
    }
}

/// The area a region keeps once higher-priority regions are removed.
#[derive(Debug, Clone)]
pub enum LayerGeometry {
    /// Fully eclipsed by later regions.
    Empty,
    /// A single connected part.
    Polygon(Polygon<f64>),
    /// Several disjoint parts sharing one label.
    MultiPolygon(MultiPolygon<f64>),
}

impl LayerGeometry {
    /// Classifies a boolean result, dropping parts of area `<= min_area`.
    #[must_use]
    pub fn from_parts(parts: MultiPolygon<f64>, min_area: f64) -> Self {
        let mut kept: Vec<Polygon<f64>> = parts
            .0
            .into_iter()
            .filter(|p| p.unsigned_area() > min_area)
            .collect();
        match kept.len() {
            0 => Self::Empty,
            1 => Self::Polygon(kept.remove(0)),
            _ => Self::MultiPolygon(MultiPolygon::new(kept)),
        }
    }

    /// The connected parts, each meshed as its own surface.
    #[must_use]
    pub fn parts(&self) -> &[Polygon<f64>] {
        match self {
            Self::Empty => &[],
            Self::Polygon(p) => std::slice::from_ref(p),
            Self::MultiPolygon(mp) => &mp.0,
        }
    }

    /// Returns `true` for an eclipsed layer.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Total unsigned area of all parts.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.parts().iter().map(Area::unsigned_area).sum()
    }
}

/// A region's resolved layer.
#[derive(Debug, Clone)]
pub struct ResolvedLayer {
    /// Region name, used as the physical label.
    pub name: String,
    /// Position of the region in the input stack.
    pub index: usize,
    /// What remains after subtracting later regions.
    pub geometry: LayerGeometry,
}

/// Resolved layers in tiling order: the last declared region comes first.
#[derive(Debug, Clone, Default)]
pub struct TiledLayers {
    layers: Vec<ResolvedLayer>,
}

impl TiledLayers {
    pub(crate) fn new(layers: Vec<ResolvedLayer>) -> Self {
        Self { layers }
    }

    /// Iterates in tiling order (foreground first).
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ResolvedLayer> {
        self.layers.iter()
    }

    /// Iterates in declaration order (background first).
    pub fn in_input_order(&self) -> impl Iterator<Item = &ResolvedLayer> {
        self.layers.iter().rev()
    }

    /// Returns the resolved layer for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ResolvedLayer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Number of layers, eclipsed ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` if there are no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
