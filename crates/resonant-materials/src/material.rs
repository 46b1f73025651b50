//! Material description of a grid volume.
//!
//! A [`Material`] holds the background inverse permittivity of every
//! electric component and the chain of Lorentz susceptibility terms that
//! make the medium dispersive.
//!
//! # Units
//!
//! Frequencies passed to [`Material::add_polarizability`] are in units of
//! $c/a_0$ where $a_0$ is the unit length of the grid. They are converted to
//! grid units with
//!
//! $$ f_{\text{conv}} = \frac{2\pi c}{a} $$
//!
//! and the coupling scale becomes $f_{\text{conv}}^2\,\omega^2\,\Delta\epsilon$.

use std::f64::consts::PI;

use ndarray::Array1;
use resonant_geometry::{Component, ComponentMap, Volume, C};

use crate::chain::{PmlStrategy, SusceptibilityChain};
use crate::error::MaterialError;
use crate::polarizability::Polarizability;
use crate::profile::SusceptibilityProfile;
use crate::storage::try_filled;

/// Background permittivity and dispersive terms over a volume.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    volume: Volume,
    inveps: ComponentMap<Array1<f64>>,
    chain: SusceptibilityChain,
}

impl Material {
    /// Vacuum ($\epsilon = 1$) with no dispersive terms.
    pub fn vacuum(volume: Volume) -> Result<Self, MaterialError> {
        Self::with_epsilon(volume, 1.0)
    }

    /// A uniform background permittivity with no dispersive terms.
    pub fn with_epsilon(volume: Volume, epsilon: f64) -> Result<Self, MaterialError> {
        check_epsilon(epsilon)?;
        let inveps = ComponentMap::try_from_components(volume.electric_components(), |_| {
            try_filled(volume.ntot(), 1.0 / epsilon)
        })?;
        Ok(Self {
            volume,
            inveps,
            chain: SusceptibilityChain::new(),
        })
    }

    /// Resample the background permittivity from a profile.
    ///
    /// Each electric component is sampled at its own staggered location.
    pub fn set_epsilon<P>(&mut self, epsilon: &P) -> Result<(), MaterialError>
    where
        P: SusceptibilityProfile + ?Sized,
    {
        let volume = &self.volume;
        let inveps = ComponentMap::try_from_components(volume.electric_components(), |c| {
            let mut values = try_filled(volume.ntot(), 1.0)?;
            for (i, value) in values.iter_mut().enumerate() {
                let eps = epsilon.value(&volume.loc(c, i));
                check_epsilon(eps)?;
                *value = 1.0 / eps;
            }
            Ok::<_, MaterialError>(values)
        })?;
        self.inveps = inveps;
        Ok(())
    }

    /// Register a Lorentz resonance.
    ///
    /// `sigma` shapes the oscillator over the volume, `omega` and `gamma` are
    /// the resonance frequency and damping, and `delta_epsilon` is the
    /// oscillator strength (the static permittivity increment). The new term
    /// is placed at the head of the chain.
    ///
    /// # Errors
    /// Non-finite parameters are rejected. Unsupported dimensionality and
    /// allocation failure are returned from the term constructor; the
    /// material is left unchanged in every error case.
    pub fn add_polarizability<P>(
        &mut self,
        sigma: &P,
        omega: f64,
        gamma: f64,
        delta_epsilon: f64,
    ) -> Result<(), MaterialError>
    where
        P: SusceptibilityProfile + ?Sized,
    {
        check_finite("omega", omega)?;
        check_finite("gamma", gamma)?;
        check_finite("delta_epsilon", delta_epsilon)?;

        let freq_conversion = 2.0 * PI * C / self.volume.a();
        let sigma_scale = freq_conversion * freq_conversion * omega * omega * delta_epsilon;
        let term = Polarizability::new(
            &self.volume,
            sigma,
            freq_conversion * omega,
            freq_conversion * gamma,
            sigma_scale,
        )?;

        log::debug!(
            "Registered Lorentz term {}: omega0={:.4e}, gamma={:.4e}, scale={:.4e} (grid units)",
            self.chain.len() + 1,
            term.omega0(),
            term.gamma(),
            sigma_scale
        );
        self.chain.prepend(term);
        Ok(())
    }

    /// Attach a term already expressed in grid units.
    pub fn prepend_term(&mut self, term: Polarizability) -> Result<(), MaterialError> {
        if term.volume() != &self.volume {
            return Err(MaterialError::VolumeMismatch);
        }
        self.chain.prepend(term);
        Ok(())
    }

    /// Apply a PML strategy to every susceptibility term.
    pub fn use_pml(&mut self, strategy: &dyn PmlStrategy) {
        self.chain.use_pml(strategy);
    }

    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    /// Inverse permittivity of component `c`, if present in the grid.
    pub fn inveps(&self, c: Component) -> Option<&Array1<f64>> {
        self.inveps.get(c)
    }

    pub fn inveps_map(&self) -> &ComponentMap<Array1<f64>> {
        &self.inveps
    }

    pub fn chain(&self) -> &SusceptibilityChain {
        &self.chain
    }

    /// Whether any dispersive term is attached.
    pub fn is_dispersive(&self) -> bool {
        !self.chain.is_empty()
    }
}

fn check_finite(name: &'static str, value: f64) -> Result<(), MaterialError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(MaterialError::InvalidParameter { name, value })
    }
}

fn check_epsilon(value: f64) -> Result<(), MaterialError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MaterialError::InvalidParameter {
            name: "epsilon",
            value,
        })
    }
}
