mod error;
mod propagator;
mod types;

pub use error::PropagationError;
pub use propagator::{propagate, propagate_batch, propagate_tle, Propagator};
pub use types::{Frame, StateVector};
