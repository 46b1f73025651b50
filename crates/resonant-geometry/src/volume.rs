//! Grid volume description.
//!
//! A [`Volume`] knows its dimensionality, the number of cells along each
//! axis, and the resolution $a$ (grid points per unit length). Field values
//! are stored on the $(n+1)$ grid points of every used axis, flattened with
//! the last axis fastest:
//!
//! $$ i = (x \cdot (n_y + 1) + y) \cdot (n_z + 1) + z $$
//!
//! Cylindrical volumes use the first axis for $r$ and the last for $z$, so a
//! point index is $i = r (n_z + 1) + z$.
//!
//! Every component sits at its own Yee offset inside the cell. For the
//! cylindrical grid (in cell units):
//!
//! | Component | Offset $(r, z)$ |
//! |-----------|-----------------|
//! | `Ep` | $(0, 0)$ |
//! | `Er`, `Hz` | $(\tfrac12, 0)$ |
//! | `Ez`, `Hr` | $(0, \tfrac12)$ |
//! | `Hp` | $(\tfrac12, \tfrac12)$ |

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::component::Component;

/// Speed of light in grid units.
///
/// Fixes the Courant factor $c \Delta t / \Delta x = \tfrac12$.
pub const C: f64 = 0.5;

/// Errors raised while describing a grid.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("Resolution must be positive and finite, got {0}")]
    InvalidResolution(f64),

    #[error("Grid axis '{0}' has no cells")]
    EmptyAxis(&'static str),

    #[error("Grid of {0:?} cells has more points than can be indexed")]
    TooManyPoints([usize; 3]),
}

/// Dimensionality tag of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimensionality {
    #[serde(rename = "1d")]
    D1,
    #[serde(rename = "2d")]
    D2,
    #[serde(rename = "3d")]
    D3,
    #[serde(rename = "cylindrical")]
    Cylindrical,
}

impl fmt::Display for Dimensionality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Dimensionality::D1 => "1d",
            Dimensionality::D2 => "2d",
            Dimensionality::D3 => "3d",
            Dimensionality::Cylindrical => "cylindrical",
        };
        f.write_str(s)
    }
}

/// The computational volume: dimensionality, cell counts and resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    /// Dimensionality of the grid.
    pub dim: Dimensionality,
    /// Cell counts along (x | r, y, z); unused axes hold 0.
    n: [usize; 3],
    /// Grid points per unit length.
    a: f64,
}

impl Volume {
    /// A 1-D grid along z with `nz` cells.
    pub fn d1(nz: usize, a: f64) -> Result<Self, GeometryError> {
        Self::build(Dimensionality::D1, [0, 0, nz], a, [None, None, Some("z")])
    }

    /// A 2-D grid in the x-y plane.
    pub fn d2(nx: usize, ny: usize, a: f64) -> Result<Self, GeometryError> {
        Self::build(Dimensionality::D2, [nx, ny, 0], a, [Some("x"), Some("y"), None])
    }

    /// A 3-D grid.
    pub fn d3(nx: usize, ny: usize, nz: usize, a: f64) -> Result<Self, GeometryError> {
        Self::build(
            Dimensionality::D3,
            [nx, ny, nz],
            a,
            [Some("x"), Some("y"), Some("z")],
        )
    }

    /// An axisymmetric (r, z) grid.
    pub fn cylindrical(nr: usize, nz: usize, a: f64) -> Result<Self, GeometryError> {
        Self::build(
            Dimensionality::Cylindrical,
            [nr, 0, nz],
            a,
            [Some("r"), None, Some("z")],
        )
    }

    fn build(
        dim: Dimensionality,
        n: [usize; 3],
        a: f64,
        axes: [Option<&'static str>; 3],
    ) -> Result<Self, GeometryError> {
        if !(a.is_finite() && a > 0.0) {
            return Err(GeometryError::InvalidResolution(a));
        }
        for (count, axis) in n.iter().zip(axes) {
            if let Some(name) = axis {
                if *count == 0 {
                    return Err(GeometryError::EmptyAxis(name));
                }
            }
        }
        n.iter()
            .try_fold(1_usize, |total, &count| {
                count.checked_add(1).and_then(|points| total.checked_mul(points))
            })
            .ok_or(GeometryError::TooManyPoints(n))?;
        Ok(Self { dim, n, a })
    }

    /// Grid points per unit length.
    pub fn a(&self) -> f64 {
        self.a
    }

    /// Grid spacing $1/a$.
    pub fn inva(&self) -> f64 {
        1.0 / self.a
    }

    pub fn nx(&self) -> usize {
        self.n[0]
    }

    pub fn ny(&self) -> usize {
        self.n[1]
    }

    /// Radial cell count (cylindrical grids).
    pub fn nr(&self) -> usize {
        self.n[0]
    }

    pub fn nz(&self) -> usize {
        self.n[2]
    }

    /// Total number of grid points, and the length of every field array.
    pub fn ntot(&self) -> usize {
        self.n.iter().map(|n| n + 1).product()
    }

    /// Flat point index from per-axis grid coordinates.
    #[inline]
    pub fn index(&self, coords: [usize; 3]) -> usize {
        debug_assert!(coords.iter().zip(self.n.iter()).all(|(c, n)| c <= n));
        (coords[0] * (self.n[1] + 1) + coords[1]) * (self.n[2] + 1) + coords[2]
    }

    /// Per-axis grid coordinates of a flat point index.
    #[inline]
    pub fn coords(&self, i: usize) -> [usize; 3] {
        debug_assert!(i < self.ntot());
        let sz = self.n[2] + 1;
        let sy = self.n[1] + 1;
        [i / (sy * sz), (i / sz) % sy, i % sz]
    }

    /// Whether this grid carries the given field component.
    pub fn has_field(&self, c: Component) -> bool {
        use Component::*;
        match self.dim {
            Dimensionality::D1 => matches!(c, Ex | Hy),
            Dimensionality::D2 | Dimensionality::D3 => matches!(c, Ex | Ey | Ez | Hx | Hy | Hz),
            Dimensionality::Cylindrical => matches!(c, Er | Ep | Ez | Hr | Hp | Hz),
        }
    }

    /// Electric components present in this grid, in storage order.
    pub fn electric_components(&self) -> impl Iterator<Item = Component> + '_ {
        Component::ALL
            .into_iter()
            .filter(move |&c| c.is_electric() && self.has_field(c))
    }

    /// Yee offset of a component inside its cell, in cell units.
    ///
    /// Offsets along axes the grid does not use are dropped.
    fn yee_offset(&self, c: Component) -> [f64; 3] {
        use Component::*;
        let offset = match (self.dim, c) {
            (Dimensionality::Cylindrical, Er) | (Dimensionality::Cylindrical, Hz) => {
                [0.5, 0.0, 0.0]
            }
            (Dimensionality::Cylindrical, Ez) | (Dimensionality::Cylindrical, Hr) => {
                [0.0, 0.0, 0.5]
            }
            (Dimensionality::Cylindrical, Hp) => [0.5, 0.0, 0.5],
            (Dimensionality::Cylindrical, _) => [0.0, 0.0, 0.0],
            (_, Ex) => [0.5, 0.0, 0.0],
            (_, Ey) => [0.0, 0.5, 0.0],
            (_, Ez) => [0.0, 0.0, 0.5],
            (_, Hx) => [0.0, 0.5, 0.5],
            (_, Hy) => [0.5, 0.0, 0.5],
            (_, Hz) => [0.5, 0.5, 0.0],
            _ => [0.0, 0.0, 0.0],
        };
        let mut masked = [0.0; 3];
        for axis in 0..3 {
            if self.uses_axis(axis) {
                masked[axis] = offset[axis];
            }
        }
        masked
    }

    fn uses_axis(&self, axis: usize) -> bool {
        match self.dim {
            Dimensionality::D1 => axis == 2,
            Dimensionality::D2 => axis < 2,
            Dimensionality::D3 => true,
            Dimensionality::Cylindrical => axis != 1,
        }
    }

    /// Physical position of component `c` at point `i`.
    ///
    /// Cylindrical positions are returned as `[r, 0, z]`.
    pub fn loc(&self, c: Component, i: usize) -> [f64; 3] {
        let coords = self.coords(i);
        let offset = self.yee_offset(c);
        let inva = self.inva();
        [
            (coords[0] as f64 + offset[0]) * inva,
            (coords[1] as f64 + offset[1]) * inva,
            (coords[2] as f64 + offset[2]) * inva,
        ]
    }

    /// One radial cell step.
    pub fn dr(&self) -> [f64; 3] {
        [self.inva(), 0.0, 0.0]
    }

    /// One axial cell step.
    pub fn dz(&self) -> [f64; 3] {
        [0.0, 0.0, self.inva()]
    }
}

/// Component-wise sum of two positions.
#[inline]
pub fn add(p: [f64; 3], q: [f64; 3]) -> [f64; 3] {
    [p[0] + q[0], p[1] + q[1], p[2] + q[2]]
}

/// Component-wise difference of two positions.
#[inline]
pub fn sub(p: [f64; 3], q: [f64; 3]) -> [f64; 3] {
    [p[0] - q[0], p[1] - q[1], p[2] - q[2]]
}

#[inline]
pub fn scale(p: [f64; 3], s: f64) -> [f64; 3] {
    [p[0] * s, p[1] * s, p[2] * s]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_ntot_per_dimensionality() {
        assert_eq!(Volume::d1(10, 1.0).unwrap().ntot(), 11);
        assert_eq!(Volume::d2(4, 3, 1.0).unwrap().ntot(), 20);
        assert_eq!(Volume::d3(2, 3, 4, 1.0).unwrap().ntot(), 60);
        assert_eq!(Volume::cylindrical(5, 7, 1.0).unwrap().ntot(), 48);
    }

    #[test]
    fn test_unindexable_grid_is_rejected() {
        assert_eq!(
            Volume::d1(usize::MAX, 1.0),
            Err(GeometryError::TooManyPoints([0, 0, usize::MAX]))
        );
        let huge = usize::MAX / 4;
        assert_eq!(
            Volume::cylindrical(huge, huge, 1.0),
            Err(GeometryError::TooManyPoints([huge, 0, huge]))
        );
        assert!(Volume::d3(1 << 20, 1 << 20, 1 << 24, 1.0).is_err());
    }

    #[test]
    fn test_cylindrical_index_layout() {
        let v = Volume::cylindrical(5, 7, 2.0).unwrap();
        // i = r * (nz + 1) + z
        assert_eq!(v.index([3, 0, 4]), 3 * 8 + 4);
        for i in 0..v.ntot() {
            assert_eq!(v.index(v.coords(i)), i);
        }
    }

    #[test]
    fn test_cylindrical_yee_locations() {
        let v = Volume::cylindrical(4, 4, 2.0).unwrap();
        let i = v.index([1, 0, 2]);

        let ep = v.loc(Component::Ep, i);
        let er = v.loc(Component::Er, i);
        let ez = v.loc(Component::Ez, i);
        let hp = v.loc(Component::Hp, i);

        assert_abs_diff_eq!(ep[0], 0.5, epsilon = 1e-14);
        assert_abs_diff_eq!(ep[2], 1.0, epsilon = 1e-14);
        assert_abs_diff_eq!(er[0], 0.75, epsilon = 1e-14);
        assert_abs_diff_eq!(er[2], 1.0, epsilon = 1e-14);
        assert_abs_diff_eq!(ez[0], 0.5, epsilon = 1e-14);
        assert_abs_diff_eq!(ez[2], 1.25, epsilon = 1e-14);
        assert_abs_diff_eq!(hp[0], 0.75, epsilon = 1e-14);
        assert_abs_diff_eq!(hp[2], 1.25, epsilon = 1e-14);

        // Half-cell steps connect Ep to its neighbours
        let half_dr = scale(v.dr(), 0.5);
        let half_dz = scale(v.dz(), 0.5);
        assert_eq!(add(ep, half_dr), er);
        assert_eq!(add(ep, half_dz), ez);
        assert_eq!(add(add(ep, half_dr), half_dz), hp);
        assert_eq!(sub(hp, half_dz), er);
    }

    #[test]
    fn test_1d_staggering() {
        let v = Volume::d1(8, 4.0).unwrap();
        let ex = v.loc(Component::Ex, 3);
        let hy = v.loc(Component::Hy, 3);
        assert_eq!(ex, [0.0, 0.0, 0.75]);
        assert_eq!(hy, [0.0, 0.0, 0.875]);
    }

    #[test]
    fn test_has_field() {
        let d1 = Volume::d1(4, 1.0).unwrap();
        assert_eq!(d1.electric_components().collect::<Vec<_>>(), vec![Component::Ex]);
        assert!(d1.has_field(Component::Hy));
        assert!(!d1.has_field(Component::Ez));

        let cyl = Volume::cylindrical(4, 4, 1.0).unwrap();
        assert_eq!(
            cyl.electric_components().collect::<Vec<_>>(),
            vec![Component::Er, Component::Ep, Component::Ez]
        );
        assert!(!cyl.has_field(Component::Ex));

        let d3 = Volume::d3(2, 2, 2, 1.0).unwrap();
        assert_eq!(d3.electric_components().count(), 3);
    }

    #[test]
    fn test_invalid_volumes_are_rejected() {
        assert_eq!(
            Volume::d1(4, 0.0).unwrap_err(),
            GeometryError::InvalidResolution(0.0)
        );
        assert!(matches!(
            Volume::cylindrical(0, 4, 1.0),
            Err(GeometryError::EmptyAxis("r"))
        ));
        assert!(Volume::d1(4, f64::NAN).is_err());
    }

    #[test]
    fn test_dimensionality_from_toml() {
        #[derive(Deserialize)]
        struct Grid {
            dimensionality: Dimensionality,
        }
        let g: Grid = toml::from_str("dimensionality = \"cylindrical\"").unwrap();
        assert_eq!(g.dimensionality, Dimensionality::Cylindrical);
        let g: Grid = toml::from_str("dimensionality = \"1d\"").unwrap();
        assert_eq!(g.dimensionality, Dimensionality::D1);
        assert_eq!(Dimensionality::D1.to_string(), "1d");
    }
}
