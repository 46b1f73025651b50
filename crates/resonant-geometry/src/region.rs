//! Simple closed regions of a grid volume.
//!
//! Regions describe where a material is present. They are fully described by
//! their TOML parameters, so a job file can place an oscillator term in a
//! slab or a disk without writing code. Positions use the `[f64; 3]` layout
//! returned by [`Volume::loc`](crate::volume::Volume::loc); cylindrical
//! positions are `[r, 0, z]`.

use serde::{Deserialize, Serialize};

/// A region that can be tested for containment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Region {
    /// The whole volume.
    Everywhere,
    Slab(Slab),
    Disk(Disk),
    Cuboid(Cuboid),
}

/// All points with `z_min <= z <= z_max`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slab {
    pub z_min: f64,
    pub z_max: f64,
}

/// A finite cylinder around the axis: `r <= radius` and `z_min <= z <= z_max`.
///
/// The z-limits default to an unbounded column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disk {
    pub radius: f64,
    #[serde(default = "neg_infinity")]
    pub z_min: f64,
    #[serde(default = "infinity")]
    pub z_max: f64,
}

fn neg_infinity() -> f64 {
    f64::NEG_INFINITY
}

fn infinity() -> f64 {
    f64::INFINITY
}

/// An axis-aligned box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cuboid {
    pub centre: [f64; 3],
    pub half_extents: [f64; 3],
}

impl Region {
    /// Check whether a point lies inside this region (boundaries included).
    pub fn contains(&self, point: &[f64; 3]) -> bool {
        match self {
            Region::Everywhere => true,
            Region::Slab(s) => point[2] >= s.z_min && point[2] <= s.z_max,
            Region::Disk(d) => {
                point[0].abs() <= d.radius && point[2] >= d.z_min && point[2] <= d.z_max
            }
            Region::Cuboid(c) => (0..3).all(|k| (point[k] - c.centre[k]).abs() <= c.half_extents[k]),
        }
    }
}
