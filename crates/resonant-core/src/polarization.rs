//! Oscillator state attached to the susceptibility terms of a material.
//!
//! Every [`Polarizability`] term gets one [`Polarization`]: the amplitude
//! $P$ of that oscillator at each grid point, for each electric component,
//! plus the companion amplitude $P_{\text{pml}}$ driven by the PML split
//! field. A [`PolarizationChain`] holds one state per term, in chain order.
//!
//! # Discretisation
//!
//! The oscillator equation $\ddot P + \gamma \dot P + \omega_0^2 P = s E$ is
//! integrated with central differences in time step units:
//!
//! $$ P^{n+1} = \frac{(2 - \omega_0^2) P^n + (\tfrac12\gamma - 1) P^{n-1}}{1 + \tfrac12\gamma} + s E^n $$
//!
//! The new level overwrites $P^{n-1}$ in place, which is why two chains are
//! kept in a [`DoubleBuffer`](crate::buffer::DoubleBuffer).

use std::sync::Arc;

use ndarray::{Array1, ArrayViewMut1, Zip};
use resonant_geometry::{Component, ComponentMap};
use resonant_materials::storage::try_filled;
use resonant_materials::{MaterialError, Polarizability, SusceptibilityChain};

use crate::types::FieldScalar;

/// Amplitudes of one oscillator term.
#[derive(Debug, Clone)]
pub struct Polarization<T: FieldScalar> {
    term: Arc<Polarizability>,
    p: ComponentMap<Array1<T>>,
    p_pml: ComponentMap<Array1<T>>,
}

impl<T: FieldScalar> Polarization<T> {
    /// Zeroed state for `term`, with arrays for every electric component of
    /// the term's grid.
    pub fn new(term: Arc<Polarizability>) -> Result<Self, MaterialError> {
        let volume = term.volume();
        let ntot = volume.ntot();
        let p = ComponentMap::try_from_components(volume.electric_components(), |_| {
            try_filled(ntot, T::default())
        })?;
        let p_pml = ComponentMap::try_from_components(volume.electric_components(), |_| {
            try_filled(ntot, T::default())
        })?;
        Ok(Self { term, p, p_pml })
    }

    /// The susceptibility term this state was built from.
    pub fn term(&self) -> &Arc<Polarizability> {
        &self.term
    }

    pub fn p(&self, c: Component) -> Option<&Array1<T>> {
        self.p.get(c)
    }

    /// Writable view of the amplitudes of component `c`.
    pub fn p_mut(&mut self, c: Component) -> Option<ArrayViewMut1<'_, T>> {
        self.p.get_mut(c).map(|p| p.view_mut())
    }

    pub fn p_pml(&self, c: Component) -> Option<&Array1<T>> {
        self.p_pml.get(c)
    }

    pub fn p_pml_mut(&mut self, c: Component) -> Option<ArrayViewMut1<'_, T>> {
        self.p_pml.get_mut(c).map(|p| p.view_mut())
    }

    /// Copy the electric field into the primary amplitudes.
    pub(crate) fn seed(&mut self, f: &ComponentMap<Array1<T>>) {
        for (c, p) in self.p.iter_mut() {
            if let Some(e) = f.get(c) {
                p.assign(e);
            }
        }
    }

    /// Overwrite this (older) level with the next one.
    ///
    /// Damping and resonance come from this state's term, the coupling from
    /// the term of `current`; both refer to the same term in a well-formed
    /// store.
    pub(crate) fn advance(
        &mut self,
        current: &Polarization<T>,
        f: &ComponentMap<Array1<T>>,
        f_pml: &ComponentMap<Array1<T>>,
    ) {
        let g = self.term.gamma();
        let om = self.term.omega0();
        let funinv = 1.0 / (1.0 + 0.5 * g);
        let a = funinv * (2.0 - om * om);
        let b = funinv * (0.5 * g - 1.0);

        for (c, s) in current.term.couplings().iter() {
            step_amplitude(self.p.get_mut(c), current.p.get(c), s, f.get(c), a, b);
            step_amplitude(
                self.p_pml.get_mut(c),
                current.p_pml.get(c),
                s,
                f_pml.get(c),
                a,
                b,
            );
        }
    }

    /// Subtract the change in polarization between `previous` and this
    /// (newer) level from the electric field.
    pub(crate) fn react(
        &self,
        previous: &Polarization<T>,
        inveps: &ComponentMap<Array1<f64>>,
        f: &mut ComponentMap<Array1<T>>,
        f_pml: &mut ComponentMap<Array1<T>>,
    ) {
        for (c, inv) in inveps.iter() {
            react_field(f.get_mut(c), self.p.get(c), previous.p.get(c), inv);
            react_field(f_pml.get_mut(c), self.p_pml.get(c), previous.p_pml.get(c), inv);
        }
    }
}

fn step_amplitude<T: FieldScalar>(
    older: Option<&mut Array1<T>>,
    current: Option<&Array1<T>>,
    s: &Array1<f64>,
    e: Option<&Array1<T>>,
    a: f64,
    b: f64,
) {
    let (Some(older), Some(current), Some(e)) = (older, current, e) else {
        return;
    };
    Zip::from(older)
        .and(current)
        .and(s)
        .and(e)
        .for_each(|o, &n, &s, &e| *o = n * a + *o * b + e * s);
}

fn react_field<T: FieldScalar>(
    e: Option<&mut Array1<T>>,
    current: Option<&Array1<T>>,
    previous: Option<&Array1<T>>,
    inveps: &Array1<f64>,
) {
    let (Some(e), Some(current), Some(previous)) = (e, current, previous) else {
        return;
    };
    Zip::from(e)
        .and(current)
        .and(previous)
        .and(inveps)
        .for_each(|e, &n, &o, &inv| *e -= (n - o) * inv);
}

/// One oscillator state per susceptibility term, in chain order.
#[derive(Debug, Clone)]
pub struct PolarizationChain<T: FieldScalar> {
    states: Vec<Polarization<T>>,
}

impl<T: FieldScalar> PolarizationChain<T> {
    /// Zeroed states for each of `terms`, in order.
    pub fn new(terms: &[Arc<Polarizability>]) -> Result<Self, MaterialError> {
        let states = terms
            .iter()
            .map(|term| Polarization::new(Arc::clone(term)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { states })
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Polarization<T>> {
        self.states.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Polarization<T>> {
        self.states.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Polarization<T>> {
        self.states.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Polarization<T>> {
        self.states.iter_mut()
    }
}

/// Deep-copy every term of a chain into shared, read-only handles.
///
/// Oscillator states built from the result are unaffected by later changes
/// to the material.
pub fn attach_terms(chain: &SusceptibilityChain) -> Vec<Arc<Polarizability>> {
    chain.iter().cloned().map(Arc::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use resonant_geometry::Volume;
    use resonant_materials::Uniform;

    fn term(volume: &Volume, omega0: f64, gamma: f64, s: f64) -> Arc<Polarizability> {
        Arc::new(Polarizability::new(volume, &Uniform(s), omega0, gamma, 1.0).unwrap())
    }

    fn field(volume: &Volume, value: f64) -> ComponentMap<Array1<f64>> {
        ComponentMap::try_from_components(volume.electric_components(), |_| {
            try_filled(volume.ntot(), value)
        })
        .unwrap()
    }

    #[test]
    fn test_new_state_is_zero_for_present_components_only() {
        let v = Volume::cylindrical(2, 3, 1.0).unwrap();
        let state: Polarization<f64> = Polarization::new(term(&v, 1.0, 0.0, 1.0)).unwrap();

        for c in v.electric_components() {
            assert_eq!(state.p(c).unwrap().len(), v.ntot());
            assert!(state.p(c).unwrap().iter().all(|&x| x == 0.0));
            assert!(state.p_pml(c).unwrap().iter().all(|&x| x == 0.0));
        }
        assert!(state.p(Component::Ex).is_none());
        assert!(state.p_pml(Component::Hp).is_none());
    }

    #[test]
    fn test_advance_matches_recurrence() {
        let v = Volume::d1(3, 1.0).unwrap();
        let t = term(&v, 0.5, 0.2, 0.3);
        let mut older: Polarization<f64> = Polarization::new(Arc::clone(&t)).unwrap();
        let mut current: Polarization<f64> = Polarization::new(t).unwrap();
        older.p_mut(Component::Ex).unwrap().fill(0.25);
        current.p_mut(Component::Ex).unwrap().fill(1.0);

        let f = field(&v, 2.0);
        let f_pml = field(&v, 0.0);
        older.advance(&current, &f, &f_pml);

        let funinv = 1.0 / (1.0 + 0.1);
        let expected = funinv * ((2.0 - 0.25) * 1.0 + (0.1 - 1.0) * 0.25) + 0.3 * 2.0;
        for &x in older.p(Component::Ex).unwrap() {
            assert!((x - expected).abs() < 1e-14);
        }
        // PML companions were zero and undriven
        assert!(older.p_pml(Component::Ex).unwrap().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_chain_follows_term_order() {
        let v = Volume::d1(3, 1.0).unwrap();
        let terms = vec![term(&v, 1.0, 0.0, 1.0), term(&v, 2.0, 0.0, 1.0)];
        let chain: PolarizationChain<f64> = PolarizationChain::new(&terms).unwrap();
        assert_eq!(chain.len(), 2);
        for (state, t) in chain.iter().zip(terms.iter()) {
            assert!(Arc::ptr_eq(state.term(), t));
        }
    }

    #[test]
    fn test_attach_terms_deep_copies() {
        let v = Volume::d1(3, 1.0).unwrap();
        let mut chain = SusceptibilityChain::new();
        chain.prepend(Polarizability::new(&v, &Uniform(1.0), 1.0, 0.0, 1.0).unwrap());

        let attached = attach_terms(&chain);
        chain.get_mut(0).unwrap().coupling_mut(Component::Ex).unwrap()[0] = 9.0;
        assert_eq!(attached[0].coupling(Component::Ex).unwrap()[0], 1.0);
    }
}
