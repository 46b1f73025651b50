//! A single Lorentz susceptibility term.
//!
//! Each term describes one damped, driven harmonic oscillator
//!
//! $$ \ddot{P} + \gamma \dot{P} + \omega_0^2 P = s(\mathbf{r})\, E $$
//!
//! with a coupling strength $s$ that varies over the grid. The coupling is
//! obtained by sampling a continuous [`SusceptibilityProfile`] into a scalar
//! array `sigma`, then placing it on each electric component's Yee location.
//!
//! # Placement
//!
//! - **1-D**: every electric component is sampled directly at its own
//!   location; no averaging is needed.
//! - **Cylindrical**: `sigma` is sampled at the `Hp` location
//!   $(r+\tfrac12, z+\tfrac12)$, and each electric coupling is the average of
//!   the `sigma` values surrounding that component:
//!
//! $$ s_{E_r} = \tfrac12(\sigma_{r,z} + \sigma_{r,z-1}), \quad
//!    s_{E_\phi} = \tfrac14(\sigma_{r,z} + \sigma_{r,z-1} + \sigma_{r-1,z} + \sigma_{r-1,z-1}), \quad
//!    s_{E_z} = \tfrac12(\sigma_{r,z} + \sigma_{r-1,z}) $$
//!
//!   On the first row ($z = 0$) and column ($r = 0$) those neighbours do not
//!   exist, so the profile is evaluated again at the four $\pm\tfrac12$ cell
//!   offsets around the `Ep` location.

use ndarray::{Array1, ArrayViewMut1};
use resonant_geometry::volume::{add, scale, sub};
use resonant_geometry::{Component, ComponentMap, Dimensionality, Volume};

use crate::error::MaterialError;
use crate::profile::SusceptibilityProfile;
use crate::storage::try_filled;

/// Per-grid-point coefficients of one oscillator term.
#[derive(Debug, Clone, PartialEq)]
pub struct Polarizability {
    omega0: f64,
    gamma: f64,
    /// Scaled profile samples at the canonical location of every point.
    sigma: Array1<f64>,
    /// Coupling per electric component present in the grid.
    s: ComponentMap<Array1<f64>>,
    volume: Volume,
}

impl Polarizability {
    /// Build a term by sampling `profile` over the grid.
    ///
    /// `omega0` and `gamma` are in grid units; `sigscale` multiplies every
    /// sample and folds in the oscillator strength and unit conversion.
    ///
    /// # Errors
    /// [`MaterialError::UnsupportedDimensionality`] for 2-D and 3-D grids,
    /// [`MaterialError::AllocationFailure`] if a coefficient array cannot be
    /// allocated.
    pub fn new<P>(
        volume: &Volume,
        profile: &P,
        omega0: f64,
        gamma: f64,
        sigscale: f64,
    ) -> Result<Self, MaterialError>
    where
        P: SusceptibilityProfile + ?Sized,
    {
        let canonical = match volume.dim {
            Dimensionality::Cylindrical => Component::Hp,
            Dimensionality::D1 => Component::Ex,
            other => return Err(MaterialError::UnsupportedDimensionality(other)),
        };

        let ntot = volume.ntot();
        let mut sigma = try_filled(ntot, 0.0)?;
        for (i, value) in sigma.iter_mut().enumerate() {
            *value = sigscale * profile.value(&volume.loc(canonical, i));
        }

        let s = if volume.dim == Dimensionality::Cylindrical {
            cylindrical_couplings(volume, &sigma, profile, sigscale)?
        } else {
            ComponentMap::try_from_components(volume.electric_components(), |c| {
                let mut coupling = try_filled(ntot, 0.0)?;
                if c == canonical {
                    coupling.assign(&sigma);
                } else {
                    for (i, value) in coupling.iter_mut().enumerate() {
                        *value = sigscale * profile.value(&volume.loc(c, i));
                    }
                }
                Ok::<_, MaterialError>(coupling)
            })?
        };

        Ok(Self {
            omega0,
            gamma,
            sigma,
            s,
            volume: volume.clone(),
        })
    }

    /// Resonance frequency $\omega_0$ in grid units.
    pub fn omega0(&self) -> f64 {
        self.omega0
    }

    /// Damping rate $\gamma$ in grid units.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn sigma(&self) -> &Array1<f64> {
        &self.sigma
    }

    /// Coupling array for component `c`, if `c` is an electric component of
    /// this grid.
    pub fn coupling(&self, c: Component) -> Option<&Array1<f64>> {
        self.s.get(c)
    }

    /// Writable view of the coupling of component `c`; the length is fixed.
    pub fn coupling_mut(&mut self, c: Component) -> Option<ArrayViewMut1<'_, f64>> {
        self.s.get_mut(c).map(|s| s.view_mut())
    }

    pub fn couplings(&self) -> &ComponentMap<Array1<f64>> {
        &self.s
    }

    pub fn volume(&self) -> &Volume {
        &self.volume
    }
}

/// Average `sigma` onto the `Er`, `Ep` and `Ez` locations of a cylindrical grid.
fn cylindrical_couplings<P>(
    volume: &Volume,
    sigma: &Array1<f64>,
    profile: &P,
    sigscale: f64,
) -> Result<ComponentMap<Array1<f64>>, MaterialError>
where
    P: SusceptibilityProfile + ?Sized,
{
    let ntot = volume.ntot();
    let mut s_r = try_filled(ntot, 0.0)?;
    let mut s_p = try_filled(ntot, 0.0)?;
    let mut s_z = try_filled(ntot, 0.0)?;

    let dr = scale(volume.dr(), 0.5);
    let dz = scale(volume.dz(), 0.5);
    let row = volume.nz() + 1;

    for r in 0..=volume.nr() {
        for z in 0..=volume.nz() {
            let i = r * row + z;
            let (er, ep, ez) = if r > 0 && z > 0 {
                let here = sigma[i];
                let below = sigma[i - 1];
                let inner = sigma[i - row];
                let inner_below = sigma[i - row - 1];
                (
                    0.5 * (here + below),
                    0.25 * (here + below + inner + inner_below),
                    0.5 * (here + inner),
                )
            } else {
                let here = volume.loc(Component::Ep, i);
                let pp = profile.value(&add(add(here, dr), dz));
                let pm = profile.value(&sub(add(here, dr), dz));
                let mp = profile.value(&add(sub(here, dr), dz));
                let mm = profile.value(&sub(sub(here, dr), dz));
                (
                    0.5 * sigscale * (pp + pm),
                    0.25 * sigscale * (pp + mp + pm + mm),
                    0.5 * sigscale * (pp + mp),
                )
            };
            s_r[i] = er;
            s_p[i] = ep;
            s_z[i] = ez;
        }
    }

    let mut s = ComponentMap::new();
    s.insert(Component::Er, s_r);
    s.insert(Component::Ep, s_p);
    s.insert(Component::Ez, s_z);
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use crate::profile::Uniform;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_cylindrical_constant_profile_averages_to_constant() {
        let v = Volume::cylindrical(6, 5, 2.0).unwrap();
        let k = 0.7;
        let pb = Polarizability::new(&v, &Uniform(k), 1.0, 0.1, 1.0).unwrap();

        for c in [Component::Er, Component::Ep, Component::Ez] {
            let s = pb.coupling(c).unwrap();
            assert_eq!(s.len(), v.ntot());
            for value in s.iter() {
                assert_abs_diff_eq!(*value, k, epsilon = 1e-12);
            }
        }
        assert!(pb.coupling(Component::Ex).is_none());
        assert!(pb.coupling(Component::Hp).is_none());
    }

    #[test]
    fn test_cylindrical_sigma_sampled_at_hp() {
        let v = Volume::cylindrical(3, 3, 1.0).unwrap();
        // sigma(r, z) = r, sampled at r + 1/2
        let pb = Polarizability::new(&v, &|p: &[f64; 3]| p[0], 0.0, 0.0, 2.0).unwrap();
        let i = v.index([2, 0, 1]);
        assert_abs_diff_eq!(pb.sigma()[i], 2.0 * 2.5, epsilon = 1e-14);
    }

    #[test]
    fn test_cylindrical_interior_averaging_of_linear_profile() {
        // A profile linear in r and z is reproduced exactly by the averages.
        let v = Volume::cylindrical(4, 4, 1.0).unwrap();
        let profile = |p: &[f64; 3]| 3.0 * p[0] + p[2];
        let pb = Polarizability::new(&v, &profile, 0.0, 0.0, 1.0).unwrap();

        for r in 0..=v.nr() {
            for z in 0..=v.nz() {
                let i = v.index([r, 0, z]);
                for c in [Component::Er, Component::Ep, Component::Ez] {
                    let expected = profile(&v.loc(c, i));
                    assert_abs_diff_eq!(pb.coupling(c).unwrap()[i], expected, epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_boundary_uses_profile_not_neighbours() {
        // Profile that is non-zero only below z = 0: only the z = 0 row can
        // see it, through the re-evaluated half-cell offsets.
        let v = Volume::cylindrical(2, 2, 1.0).unwrap();
        let profile = |p: &[f64; 3]| if p[2] < 0.0 { 1.0 } else { 0.0 };
        let pb = Polarizability::new(&v, &profile, 0.0, 0.0, 1.0).unwrap();

        let edge = v.index([1, 0, 0]);
        assert_abs_diff_eq!(pb.coupling(Component::Er).unwrap()[edge], 0.5, epsilon = 1e-14);
        assert_abs_diff_eq!(pb.coupling(Component::Ep).unwrap()[edge], 0.5, epsilon = 1e-14);
        assert_abs_diff_eq!(pb.coupling(Component::Ez).unwrap()[edge], 0.0, epsilon = 1e-14);

        let interior = v.index([1, 0, 1]);
        assert_eq!(pb.coupling(Component::Er).unwrap()[interior], 0.0);
    }

    #[test]
    fn test_1d_samples_at_ex_location() {
        let v = Volume::d1(8, 4.0).unwrap();
        let pb = Polarizability::new(&v, &|p: &[f64; 3]| p[2], 2.0, 0.5, 3.0).unwrap();
        let s = pb.coupling(Component::Ex).unwrap();
        for i in 0..v.ntot() {
            assert_abs_diff_eq!(s[i], 3.0 * i as f64 / 4.0, epsilon = 1e-14);
            assert_abs_diff_eq!(pb.sigma()[i], s[i], epsilon = 1e-14);
        }
        assert_eq!(pb.couplings().len(), 1);
        assert_eq!(pb.omega0(), 2.0);
        assert_eq!(pb.gamma(), 0.5);
    }

    #[test]
    fn test_1d_profile_is_sampled_once_per_point() {
        let v = Volume::d1(6, 1.0).unwrap();
        let calls = Cell::new(0_usize);
        let profile = |p: &[f64; 3]| {
            calls.set(calls.get() + 1);
            p[2] + 1.0
        };
        let pb = Polarizability::new(&v, &profile, 1.0, 0.0, 2.0).unwrap();
        assert_eq!(calls.get(), v.ntot());
        assert_eq!(pb.coupling(Component::Ex).unwrap(), pb.sigma());
    }

    #[test]
    fn test_unsupported_dimensionality() {
        let v = Volume::d3(2, 2, 2, 1.0).unwrap();
        let err = Polarizability::new(&v, &Uniform(1.0), 1.0, 0.0, 1.0).unwrap_err();
        assert!(matches!(
            err,
            MaterialError::UnsupportedDimensionality(Dimensionality::D3)
        ));

        let v = Volume::d2(2, 2, 1.0).unwrap();
        assert!(Polarizability::new(&v, &Uniform(1.0), 1.0, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_clone_is_independent() {
        let v = Volume::cylindrical(3, 3, 1.0).unwrap();
        let original = Polarizability::new(&v, &Uniform(1.0), 1.0, 0.0, 1.0).unwrap();
        let mut copy = original.clone();
        assert_eq!(copy, original);

        copy.coupling_mut(Component::Ep).unwrap()[4] = 42.0;
        assert_eq!(original.coupling(Component::Ep).unwrap()[4], 1.0);
        assert_ne!(copy, original);
    }
}
