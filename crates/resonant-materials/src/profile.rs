//! Continuous spatial profiles.
//!
//! A profile maps a physical position to a scalar. Material registration
//! samples it once per grid point (and, on cylindrical grids, at a few
//! half-cell offsets near the boundary), so implementations must be pure
//! functions of position.
//!
//! Any `Fn(&[f64; 3]) -> f64` closure is a profile. [`Uniform`] and
//! [`RegionProfile`] cover the shapes a TOML job file can describe.

use resonant_geometry::Region;
use serde::{Deserialize, Serialize};

/// A scalar field defined over the simulation volume.
pub trait SusceptibilityProfile {
    /// Value of the profile at `position` (`[r, 0, z]` on cylindrical grids).
    fn value(&self, position: &[f64; 3]) -> f64;
}

impl<F> SusceptibilityProfile for F
where
    F: Fn(&[f64; 3]) -> f64,
{
    fn value(&self, position: &[f64; 3]) -> f64 {
        self(position)
    }
}

/// The same value everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Uniform(pub f64);

impl SusceptibilityProfile for Uniform {
    fn value(&self, _position: &[f64; 3]) -> f64 {
        self.0
    }
}

/// `value` inside a region, `background` elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionProfile {
    pub region: Region,
    #[serde(default = "default_value")]
    pub value: f64,
    #[serde(default)]
    pub background: f64,
}

fn default_value() -> f64 {
    1.0
}

impl RegionProfile {
    pub fn new(region: Region, value: f64) -> Self {
        Self {
            region,
            value,
            background: 0.0,
        }
    }
}

impl SusceptibilityProfile for RegionProfile {
    fn value(&self, position: &[f64; 3]) -> f64 {
        if self.region.contains(position) {
            self.value
        } else {
            self.background
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resonant_geometry::region::Slab;

    #[test]
    fn test_closure_is_a_profile() {
        let ramp = |p: &[f64; 3]| 2.0 * p[2];
        assert_eq!(ramp.value(&[0.0, 0.0, 1.5]), 3.0);
    }

    #[test]
    fn test_region_profile() {
        let p = RegionProfile {
            region: Region::Slab(Slab { z_min: 0.0, z_max: 1.0 }),
            value: 4.0,
            background: 0.5,
        };
        assert_eq!(p.value(&[0.0, 0.0, 0.5]), 4.0);
        assert_eq!(p.value(&[0.0, 0.0, 1.5]), 0.5);
    }

    #[test]
    fn test_region_profile_from_toml() {
        let p: RegionProfile = toml::from_str(
            r#"
            value = 2.0
            region = { type = "slab", z_min = 1.0, z_max = 3.0 }
            "#,
        )
        .unwrap();
        assert_eq!(p.background, 0.0);
        assert_eq!(p.value(&[0.0, 0.0, 2.0]), 2.0);
        assert_eq!(Uniform(1.25).value(&[9.0, 9.0, 9.0]), 1.25);
    }
}
