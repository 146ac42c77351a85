//! Satellite state propagation from two-line element sets, frame transforms
//! and Doppler shift of the relative motion between bodies and observers.

pub mod constants;
pub mod doppler;
pub mod elements;
pub mod error;
pub mod frames;
pub mod propagate;
pub mod relative;
pub mod scenario;
pub mod time;
pub mod tle;
pub mod units;
pub mod vector;

pub use elements::{Catalog, Classification, ElementParameters, OrbitalElementSet};
pub use error::Error;
pub use frames::ObserverLocation;
pub use propagate::{propagate, propagate_batch, Frame, Propagator, StateVector};
pub use relative::{pairwise, relative_motion, RelativeMotion};
pub use time::JulianDate;
