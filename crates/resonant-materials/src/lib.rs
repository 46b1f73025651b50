//! # Resonant Materials
//!
//! Dispersive material descriptions for the Resonant FDTD core. A
//! [`Material`](material::Material) carries a background permittivity and a
//! [`SusceptibilityChain`](chain::SusceptibilityChain) of Lorentz terms, each
//! a [`Polarizability`](polarizability::Polarizability) sampled from a
//! continuous [`SusceptibilityProfile`](profile::SusceptibilityProfile).
//!
//! ## Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`polarizability`] | One oscillator term and its Yee-grid placement |
//! | [`chain`] | Ordered term list and the PML strategy hook |
//! | [`material`] | Registration entry point and background permittivity |
//! | [`profile`] | Spatial profiles (closures, uniform, region-based) |
//! | [`error`] | [`MaterialError`](error::MaterialError) |

pub mod chain;
pub mod error;
pub mod material;
pub mod polarizability;
pub mod profile;
pub mod storage;

pub use chain::{NoPml, PmlStrategy, SusceptibilityChain};
pub use error::MaterialError;
pub use material::Material;
pub use polarizability::Polarizability;
pub use profile::{RegionProfile, SusceptibilityProfile, Uniform};
