//! Electric field storage and the dispersive update engine.
//!
//! [`Fields`] owns the electric field arrays of a grid (primary and PML
//! split), the [`Material`] that supplies inverse permittivity and Lorentz
//! terms, and the double-buffered oscillator store. A time-stepping driver
//! calls, once per global step and after its own curl update of $E$:
//!
//! 1. [`Fields::step_polarization_itself`]: $P^{n-1} \leftarrow P^{n+1}$,
//!    then swap roles.
//! 2. [`Fields::step_e_polarization`]:
//!    $E \mathrel{-}= \epsilon^{-1}(P^{n+1} - P^n)$.
//!
//! [`Fields::step_polarizations`] performs both in that order.

use std::sync::Arc;

use ndarray::{Array1, ArrayViewMut1};
use resonant_geometry::{Component, ComponentMap, Volume};
use resonant_materials::storage::try_filled;
use resonant_materials::{Material, MaterialError};
use thiserror::Error;

use crate::buffer::DoubleBuffer;
use crate::polarization::{attach_terms, PolarizationChain};
use crate::types::FieldScalar;

/// Oscillator states at two adjacent time levels.
pub type PolarizationStore<T> = DoubleBuffer<PolarizationChain<T>>;

/// Errors raised by the field container.
#[derive(Debug, Error)]
pub enum FieldsError {
    #[error("Polarization chains differ in length (previous: {previous}, current: {current})")]
    ChainLengthMismatch { previous: usize, current: usize },

    #[error("Component {0} is not present in this grid")]
    MissingComponent(Component),

    #[error("Point index {index} out of range for {ntot} grid points")]
    OutOfBounds { index: usize, ntot: usize },

    #[error("Susceptibility term {index} does not exist ({len} terms)")]
    NoSuchTerm { index: usize, len: usize },

    #[error("Oscillator states at position {index} refer to different terms")]
    TermMismatch { index: usize },

    #[error(transparent)]
    Material(#[from] MaterialError),
}

/// Build the oscillator store for a material.
///
/// Both chains hold one zeroed state per susceptibility term, in chain
/// order, and the k-th state of each refers to the same term. Returns
/// `None` when the material has no terms.
pub fn set_up_polarizations<T: FieldScalar>(
    material: &Material,
) -> Result<Option<PolarizationStore<T>>, MaterialError> {
    if !material.is_dispersive() {
        return Ok(None);
    }
    let terms = attach_terms(material.chain());
    let previous = PolarizationChain::new(&terms)?;
    let current = PolarizationChain::new(&terms)?;
    log::debug!(
        "Set up {} oscillator state(s) per time level over {} points",
        terms.len(),
        material.volume().ntot()
    );
    Ok(Some(DoubleBuffer::new(previous, current)))
}

/// Field arrays, material and oscillator store of one grid.
#[derive(Debug, Clone)]
pub struct Fields<T: FieldScalar = f64> {
    material: Material,
    f: ComponentMap<Array1<T>>,
    f_pml: ComponentMap<Array1<T>>,
    polarizations: Option<PolarizationStore<T>>,
}

impl<T: FieldScalar> Fields<T> {
    /// Zero fields over the material's volume, with oscillator states for
    /// every susceptibility term the material carries.
    pub fn new(material: Material) -> Result<Self, FieldsError> {
        let volume = material.volume();
        let f = zeroed(volume)?;
        let f_pml = zeroed(volume)?;
        let polarizations = set_up_polarizations(&material)?;
        Ok(Self {
            material,
            f,
            f_pml,
            polarizations,
        })
    }

    pub fn volume(&self) -> &Volume {
        self.material.volume()
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn field(&self, c: Component) -> Option<&Array1<T>> {
        self.f.get(c)
    }

    /// Writable view of component `c`; the array length is fixed.
    pub fn field_mut(&mut self, c: Component) -> Option<ArrayViewMut1<'_, T>> {
        self.f.get_mut(c).map(|e| e.view_mut())
    }

    pub fn field_pml(&self, c: Component) -> Option<&Array1<T>> {
        self.f_pml.get(c)
    }

    pub fn field_pml_mut(&mut self, c: Component) -> Option<ArrayViewMut1<'_, T>> {
        self.f_pml.get_mut(c).map(|e| e.view_mut())
    }

    /// Fill every electric component from a function of component and
    /// staggered position.
    pub fn set_field<F>(&mut self, mut value: F)
    where
        F: FnMut(Component, &[f64; 3]) -> T,
    {
        let volume = self.material.volume();
        for (c, e) in self.f.iter_mut() {
            for (i, x) in e.iter_mut().enumerate() {
                *x = value(c, &volume.loc(c, i));
            }
        }
    }

    /// Fill every PML split component, as [`Fields::set_field`] does.
    pub fn set_field_pml<F>(&mut self, mut value: F)
    where
        F: FnMut(Component, &[f64; 3]) -> T,
    {
        let volume = self.material.volume();
        for (c, e) in self.f_pml.iter_mut() {
            for (i, x) in e.iter_mut().enumerate() {
                *x = value(c, &volume.loc(c, i));
            }
        }
    }

    /// Electric field of component `c` at point `index`.
    pub fn field_at(&self, c: Component, index: usize) -> Result<T, FieldsError> {
        read_point(self.f.get(c), c, index)
    }

    /// Current polarization of term `term` for component `c` at point
    /// `index`.
    pub fn polarization_at(
        &self,
        term: usize,
        c: Component,
        index: usize,
    ) -> Result<T, FieldsError> {
        let len = self.num_polarization_terms();
        let state = self
            .polarizations
            .as_ref()
            .and_then(|store| store.current().get(term))
            .ok_or(FieldsError::NoSuchTerm { index: term, len })?;
        read_point(state.p(c), c, index)
    }

    pub fn polarizations(&self) -> Option<&PolarizationStore<T>> {
        self.polarizations.as_ref()
    }

    pub fn polarizations_mut(&mut self) -> Option<&mut PolarizationStore<T>> {
        self.polarizations.as_mut()
    }

    /// Replace the oscillator store.
    ///
    /// Both chains must have the same length, the k-th states of each must
    /// share one term, and every term must belong to this grid's volume.
    /// A rejected store leaves the current one in place.
    pub fn set_polarizations(
        &mut self,
        store: Option<PolarizationStore<T>>,
    ) -> Result<(), FieldsError> {
        if let Some(store) = &store {
            check_store(store, self.material.volume())?;
        }
        self.polarizations = store;
        Ok(())
    }

    /// Number of susceptibility terms with oscillator state.
    pub fn num_polarization_terms(&self) -> usize {
        self.polarizations
            .as_ref()
            .map_or(0, |store| store.current().len())
    }

    /// Seed both time levels of every oscillator with the current electric
    /// field. PML companions are left as they are.
    pub fn initialize_polarizations(&mut self) -> Result<(), FieldsError> {
        let Some(store) = self.polarizations.as_mut() else {
            return Ok(());
        };
        check_store(store, self.material.volume())?;
        let (previous, current) = store.split_mut();
        for (older, newer) in previous.iter_mut().zip(current.iter_mut()) {
            older.seed(&self.f);
            newer.seed(&self.f);
        }
        Ok(())
    }

    /// Advance every oscillator by one step from the present electric
    /// field, then swap the time levels.
    pub fn step_polarization_itself(&mut self) -> Result<(), FieldsError> {
        let Some(store) = self.polarizations.as_mut() else {
            return Ok(());
        };
        check_store(store, self.material.volume())?;
        let (previous, current) = store.split_mut();
        for (older, newer) in previous.iter_mut().zip(current.iter()) {
            older.advance(newer, &self.f, &self.f_pml);
        }
        store.advance();
        log::trace!("Advanced {} oscillator state(s)", store.current().len());
        Ok(())
    }

    /// Apply the change in polarization over the last step to the electric
    /// field.
    pub fn step_e_polarization(&mut self) -> Result<(), FieldsError> {
        let Some(store) = self.polarizations.as_ref() else {
            return Ok(());
        };
        check_store(store, self.material.volume())?;
        let inveps = self.material.inveps_map();
        for (newer, older) in store.current().iter().zip(store.previous().iter()) {
            newer.react(older, inveps, &mut self.f, &mut self.f_pml);
        }
        Ok(())
    }

    /// [`Fields::step_polarization_itself`] followed by
    /// [`Fields::step_e_polarization`].
    pub fn step_polarizations(&mut self) -> Result<(), FieldsError> {
        self.step_polarization_itself()?;
        self.step_e_polarization()
    }
}

fn zeroed<T: FieldScalar>(volume: &Volume) -> Result<ComponentMap<Array1<T>>, MaterialError> {
    ComponentMap::try_from_components(volume.electric_components(), |_| {
        try_filled(volume.ntot(), T::default())
    })
}

/// Validate a store before any of its arrays are touched.
///
/// States are only ever built at their term's volume and their arrays
/// cannot be resized, so a matching volume fixes every array length.
fn check_store<T: FieldScalar>(
    store: &PolarizationStore<T>,
    volume: &Volume,
) -> Result<(), FieldsError> {
    let previous = store.previous().len();
    let current = store.current().len();
    if previous != current {
        log::warn!("Oscillator chains out of step: {previous} vs {current}");
        return Err(FieldsError::ChainLengthMismatch { previous, current });
    }
    let pairs = store.previous().iter().zip(store.current().iter());
    for (index, (older, newer)) in pairs.enumerate() {
        if !Arc::ptr_eq(older.term(), newer.term()) {
            log::warn!("Oscillator states at position {index} refer to different terms");
            return Err(FieldsError::TermMismatch { index });
        }
        if older.term().volume() != volume {
            log::warn!("Oscillator state {index} was built for a different volume");
            return Err(MaterialError::VolumeMismatch.into());
        }
    }
    Ok(())
}

fn read_point<T: FieldScalar>(
    values: Option<&Array1<T>>,
    c: Component,
    index: usize,
) -> Result<T, FieldsError> {
    let values = values.ok_or(FieldsError::MissingComponent(c))?;
    values.get(index).copied().ok_or(FieldsError::OutOfBounds {
        index,
        ntot: values.len(),
    })
}
