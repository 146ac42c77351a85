use thiserror::Error;

/// SGP4 failure, numbered like the status codes of the reference
/// implementation (see [`PropagationError::code`]).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PropagationError {
    #[error("mean eccentricity {eccentricity} out of range at {minutes} min from epoch")]
    MeanEccentricity { eccentricity: f64, minutes: f64 },
    #[error("elements rejected at initialisation: {0}")]
    Initialization(String),
    #[error("perturbed eccentricity {eccentricity} out of range at {minutes} min from epoch")]
    PerturbedEccentricity { eccentricity: f64, minutes: f64 },
    #[error("negative semi-latus rectum at {minutes} min from epoch")]
    NegativeSemiLatusRectum { minutes: f64 },
    #[error("orbit decayed (radius {radius_km:.1} km at {minutes} min from epoch)")]
    Decayed { radius_km: f64, minutes: f64 },
}

impl PropagationError {
    pub fn code(&self) -> u8 {
        match self {
            PropagationError::MeanEccentricity { .. } => 1,
            PropagationError::Initialization(_) => 2,
            PropagationError::PerturbedEccentricity { .. } => 3,
            PropagationError::NegativeSemiLatusRectum { .. } => 4,
            PropagationError::Decayed { .. } => 6,
        }
    }

    pub(crate) fn from_sgp4(err: sgp4::Error, minutes: f64) -> Self {
        match err {
            sgp4::Error::OutOfRangeEccentricity { eccentricity, .. } => {
                PropagationError::MeanEccentricity {
                    eccentricity,
                    minutes,
                }
            }
            sgp4::Error::OutOfRangePerturbedEccentricity { eccentricity, .. } => {
                PropagationError::PerturbedEccentricity {
                    eccentricity,
                    minutes,
                }
            }
            sgp4::Error::NegativeSemiLatusRectum { .. } => {
                PropagationError::NegativeSemiLatusRectum { minutes }
            }
        }
    }
}

impl From<sgp4::KozaiElementsError> for PropagationError {
    fn from(err: sgp4::KozaiElementsError) -> Self {
        PropagationError::Initialization(err.to_string())
    }
}

impl From<sgp4::OutOfRangeEpochEccentricity> for PropagationError {
    fn from(err: sgp4::OutOfRangeEpochEccentricity) -> Self {
        PropagationError::MeanEccentricity {
            eccentricity: err.0,
            minutes: 0.0,
        }
    }
}
