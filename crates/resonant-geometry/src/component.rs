//! Field components of the staggered Yee grid.
//!
//! The same ten-entry enumeration is shared by every dimensionality; a
//! [`Volume`](crate::volume::Volume) decides which of them actually exist.
//! Per-component data is held in a [`ComponentMap`], which keeps a slot for
//! every component and leaves the absent ones empty.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of distinct field components.
pub const NUM_COMPONENTS: usize = 10;

/// A single directional channel of the electromagnetic field.
///
/// Cartesian components (`Ex`, `Ey`, `Ez`, `Hx`, `Hy`, `Hz`) are used by the
/// 1-D, 2-D and 3-D grids; cylindrical grids use radial (`Er`, `Hr`),
/// azimuthal (`Ep`, `Hp`) and axial (`Ez`, `Hz`) components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Component {
    Ex,
    Ey,
    Er,
    Ep,
    Ez,
    Hx,
    Hy,
    Hr,
    Hp,
    Hz,
}

impl Component {
    /// Every component, in storage order.
    pub const ALL: [Component; NUM_COMPONENTS] = [
        Component::Ex,
        Component::Ey,
        Component::Er,
        Component::Ep,
        Component::Ez,
        Component::Hx,
        Component::Hy,
        Component::Hr,
        Component::Hp,
        Component::Hz,
    ];

    /// Storage slot of this component.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether this is an electric field component.
    pub fn is_electric(self) -> bool {
        matches!(
            self,
            Component::Ex | Component::Ey | Component::Er | Component::Ep | Component::Ez
        )
    }

    /// Whether this is a magnetic field component.
    pub fn is_magnetic(self) -> bool {
        !self.is_electric()
    }

    pub fn name(self) -> &'static str {
        match self {
            Component::Ex => "Ex",
            Component::Ey => "Ey",
            Component::Er => "Er",
            Component::Ep => "Ep",
            Component::Ez => "Ez",
            Component::Hx => "Hx",
            Component::Hy => "Hy",
            Component::Hr => "Hr",
            Component::Hp => "Hp",
            Component::Hz => "Hz",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Optional per-component storage.
///
/// Replaces the "array of ten pointers, null where unused" layout: a slot is
/// `Some` exactly when data exists for that component.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentMap<T> {
    slots: [Option<T>; NUM_COMPONENTS],
}

impl<T> Default for ComponentMap<T> {
    fn default() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }
}

impl<T> ComponentMap<T> {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map holding one value per listed component, stopping at the
    /// first error.
    pub fn try_from_components<E>(
        components: impl IntoIterator<Item = Component>,
        mut build: impl FnMut(Component) -> Result<T, E>,
    ) -> Result<Self, E> {
        let mut map = Self::new();
        for c in components {
            map.insert(c, build(c)?);
        }
        Ok(map)
    }

    #[inline]
    pub fn get(&self, c: Component) -> Option<&T> {
        self.slots[c.index()].as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, c: Component) -> Option<&mut T> {
        self.slots[c.index()].as_mut()
    }

    /// Store a value, returning the previous one if any.
    pub fn insert(&mut self, c: Component, value: T) -> Option<T> {
        self.slots[c.index()].replace(value)
    }

    pub fn contains(&self, c: Component) -> bool {
        self.slots[c.index()].is_some()
    }

    /// Number of populated components.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Populated components in storage order.
    pub fn components(&self) -> impl Iterator<Item = Component> + '_ {
        self.iter().map(|(c, _)| c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Component, &T)> {
        Component::ALL
            .into_iter()
            .zip(self.slots.iter())
            .filter_map(|(c, slot)| slot.as_ref().map(|v| (c, v)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Component, &mut T)> {
        Component::ALL
            .into_iter()
            .zip(self.slots.iter_mut())
            .filter_map(|(c, slot)| slot.as_mut().map(|v| (c, v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_electric_components() {
        let electric: Vec<_> = Component::ALL
            .into_iter()
            .filter(|c| c.is_electric())
            .collect();
        assert_eq!(
            electric,
            vec![
                Component::Ex,
                Component::Ey,
                Component::Er,
                Component::Ep,
                Component::Ez
            ]
        );
        assert!(Component::Hp.is_magnetic());
    }

    #[test]
    fn test_component_indices_match_storage_order() {
        for (i, c) in Component::ALL.into_iter().enumerate() {
            assert_eq!(c.index(), i);
        }
    }

    #[test]
    fn test_map_insert_and_iterate() {
        let mut map = ComponentMap::new();
        assert!(map.is_empty());

        map.insert(Component::Ez, 3.0);
        map.insert(Component::Er, 1.0);
        assert_eq!(map.len(), 2);
        assert!(map.contains(Component::Er));
        assert!(!map.contains(Component::Ep));

        // Iteration follows storage order, not insertion order
        let seen: Vec<_> = map.iter().map(|(c, v)| (c, *v)).collect();
        assert_eq!(seen, vec![(Component::Er, 1.0), (Component::Ez, 3.0)]);

        if let Some(v) = map.get_mut(Component::Ez) {
            *v = 4.0;
        }
        assert_eq!(map.get(Component::Ez), Some(&4.0));
    }

    #[test]
    fn test_try_from_components_stops_on_error() {
        let result: Result<ComponentMap<usize>, String> = ComponentMap::try_from_components(
            [Component::Ex, Component::Hy, Component::Ez],
            |c| {
                if c.is_electric() {
                    Ok(c.index())
                } else {
                    Err(format!("{} rejected", c))
                }
            },
        );
        assert_eq!(result.unwrap_err(), "Hy rejected");
    }
}
