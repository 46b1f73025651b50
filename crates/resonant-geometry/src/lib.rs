//! # Resonant Geometry
//!
//! Grid description shared by the Resonant crates. This crate provides:
//!
//! - **Field components** ([`component`]): the ten Yee-grid components and
//!   the [`ComponentMap`] used for per-component storage.
//! - **Volumes** ([`volume`]): dimensionality, cell counts, point indexing
//!   and the staggered location of every component.
//! - **Regions** ([`region`]): slabs, disks and boxes used to place
//!   materials.

pub mod component;
pub mod region;
pub mod volume;

pub use component::{Component, ComponentMap, NUM_COMPONENTS};
pub use region::Region;
pub use volume::{Dimensionality, GeometryError, Volume, C};
