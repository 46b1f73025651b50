//! # Resonant Core
//!
//! Time-domain update engine for Lorentz-dispersive media on a Yee grid.
//! Each susceptibility term of a [`Material`](resonant_materials::Material)
//! gets an oscillator state that is advanced from the electric field every
//! step and fed back into it.
//!
//! ## Architecture
//!
//! Oscillator states are kept at two adjacent time levels in a
//! [`DoubleBuffer`](buffer::DoubleBuffer). The advance writes the next level
//! over the older one and swaps roles; the reaction subtracts the change in
//! polarization from $E$. Field arrays are generic over
//! [`FieldScalar`](types::FieldScalar) so real and complex runs share the
//! same kernels.
//!
//! ## Modules
//!
//! - [`types`]: field scalar abstraction (`f64`, `Complex64`).
//! - [`buffer`]: two-level ping-pong storage.
//! - [`polarization`]: per-term oscillator state and the update kernels.
//! - [`fields`]: field container, store set-up and the step operations.

pub mod buffer;
pub mod fields;
pub mod polarization;
pub mod types;

pub use buffer::DoubleBuffer;
pub use fields::{set_up_polarizations, Fields, FieldsError, PolarizationStore};
pub use polarization::{Polarization, PolarizationChain};
pub use types::FieldScalar;
