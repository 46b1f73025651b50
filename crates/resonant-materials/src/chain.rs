//! Ordered list of susceptibility terms attached to a material.
//!
//! Terms are prepended as they are registered, so index 0 always holds the
//! most recent one. Cloning a chain deep-copies every term.

use crate::polarizability::Polarizability;

/// Per-term hook applied when a chain is prepared for an absorbing boundary
/// layer.
///
/// Strategies see every term in chain order and may adjust its coefficients.
pub trait PmlStrategy {
    fn apply(&self, index: usize, term: &mut Polarizability);
}

/// Leaves every term untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPml;

impl PmlStrategy for NoPml {
    fn apply(&self, _index: usize, _term: &mut Polarizability) {}
}

/// The susceptibility terms of a material, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SusceptibilityChain {
    terms: Vec<Polarizability>,
}

impl SusceptibilityChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a term at the head of the chain.
    pub fn prepend(&mut self, term: Polarizability) {
        self.terms.insert(0, term);
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Polarizability> {
        self.terms.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Polarizability> {
        self.terms.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Polarizability> {
        self.terms.iter()
    }

    pub fn terms(&self) -> &[Polarizability] {
        &self.terms
    }

    /// Run a PML strategy over every term, head first.
    pub fn use_pml(&mut self, strategy: &dyn PmlStrategy) {
        for (index, term) in self.terms.iter_mut().enumerate() {
            strategy.apply(index, term);
        }
    }
}

impl<'a> IntoIterator for &'a SusceptibilityChain {
    type Item = &'a Polarizability;
    type IntoIter = std::slice::Iter<'a, Polarizability>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.iter()
    }
}
