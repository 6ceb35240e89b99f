use std::collections::HashMap;

use crate::error::ConfigError;
use crate::math::DEFAULT_ATOL;

/// Parameters controlling one build.
#[derive(Debug, Clone, Copy)]
pub struct BuildParams {
    /// Absolute tolerance for point and segment identity.
    pub atol: f64,
    /// Smallest mesh element size anywhere in the model.
    pub resolution_min: f64,
    /// Largest mesh element size anywhere in the model.
    pub resolution_max: f64,
}

impl Default for BuildParams {
    fn default() -> Self {
        Self {
            atol: DEFAULT_ATOL,
            resolution_min: 0.01,
            resolution_max: 0.1,
        }
    }
}

impl BuildParams {
    /// Sets the match tolerance.
    #[must_use]
    pub fn with_atol(mut self, atol: f64) -> Self {
        self.atol = atol;
        self
    }

    /// Sets the global element size bounds.
    #[must_use]
    pub fn with_resolution_bounds(mut self, min: f64, max: f64) -> Self {
        self.resolution_min = min;
        self.resolution_max = max;
        self
    }

    /// The global element size bounds.
    #[must_use]
    pub fn bounds(&self) -> ResolutionBounds {
        ResolutionBounds {
            min: self.resolution_min,
            max: self.resolution_max,
        }
    }

    /// Checks the tolerance and bounds.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] describing the first invalid value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.atol.is_finite() && self.atol > 0.0) {
            return Err(ConfigError::InvalidTolerance(self.atol));
        }
        self.bounds().validate()
    }
}

/// Global element size bounds, passed through to the mesher unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolutionBounds {
    /// Minimum element size.
    pub min: f64,
    /// Maximum element size.
    pub max: f64,
}

impl ResolutionBounds {
    /// Checks `0 < min <= max`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBounds`] otherwise.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ok = self.min.is_finite() && self.max.is_finite() && self.min > 0.0 && self.min <= self.max;
        if ok {
            Ok(())
        } else {
            Err(ConfigError::InvalidBounds {
                min: self.min,
                max: self.max,
            })
        }
    }

    /// Clamps a requested size into the bounds.
    #[must_use]
    pub fn clamp(&self, size: f64) -> f64 {
        size.clamp(self.min, self.max)
    }
}

/// Requested element size for one region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// Element size inside the region and on its boundary.
    pub size: f64,
    /// Distance over which the size relaxes to the global maximum outside
    /// the region. Zero confines the hint to the region itself.
    pub distance: f64,
}

impl Resolution {
    /// A hint confined to the region.
    #[must_use]
    pub fn new(size: f64) -> Self {
        Self {
            size,
            distance: 0.0,
        }
    }

    /// Extends the hint `distance` past the region boundary.
    #[must_use]
    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = distance;
        self
    }

    /// Checks that `size` is positive and `distance` is non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidResolution`] naming `region`.
    pub fn validate(&self, region: &str) -> Result<(), ConfigError> {
        let reason = if !(self.size.is_finite() && self.size > 0.0) {
            format!("size must be positive, got {}", self.size)
        } else if !(self.distance.is_finite() && self.distance >= 0.0) {
            format!("distance must be non-negative, got {}", self.distance)
        } else {
            return Ok(());
        };
        Err(ConfigError::InvalidResolution {
            region: region.to_owned(),
            reason,
        })
    }
}

impl From<f64> for Resolution {
    fn from(size: f64) -> Self {
        Self::new(size)
    }
}

/// Per-region resolution hints. Regions without an entry get no local hint.
pub type ResolutionTable = HashMap<String, Resolution>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(BuildParams::default().validate().is_ok());
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let params = BuildParams::default().with_resolution_bounds(0.2, 0.1);
        assert!(matches!(
            params.validate(),
            Err(ConfigError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn zero_tolerance_is_rejected() {
        let params = BuildParams::default().with_atol(0.0);
        assert!(matches!(
            params.validate(),
            Err(ConfigError::InvalidTolerance(_))
        ));
    }

    #[test]
    fn resolution_validation_names_region() {
        let err = Resolution::new(-1.0).validate("core");
        assert!(matches!(err, Err(ConfigError::InvalidResolution { ref region, .. }) if region == "core"));
        assert!(Resolution::new(0.05).with_distance(1.0).validate("core").is_ok());
    }

    #[test]
    fn bounds_clamp_sizes() {
        let b = ResolutionBounds { min: 0.01, max: 0.1 };
        assert!((b.clamp(0.5) - 0.1).abs() < 1e-15);
        assert!((b.clamp(0.001) - 0.01).abs() < 1e-15);
    }
}
