use thiserror::Error;

use crate::doppler::DopplerError;
use crate::propagate::PropagationError;
use crate::scenario::ScenarioError;
use crate::time::EpochError;
use crate::tle::ValidationError;
use crate::vector::InvalidGeometryError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid TLE: {0}")]
    Validation(#[from] ValidationError),
    #[error("propagation failed: {0}")]
    Propagation(#[from] PropagationError),
    #[error("invalid geometry: {0}")]
    Geometry(#[from] InvalidGeometryError),
    #[error("invalid Doppler input: {0}")]
    Doppler(#[from] DopplerError),
    #[error("invalid epoch: {0}")]
    Epoch(#[from] EpochError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("scenario error: {0}")]
    Scenario(#[from] ScenarioError),
}
