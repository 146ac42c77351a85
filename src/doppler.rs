//! First-order (classical) Doppler shift.
//!
//! Relativistic terms are of order (v/c)², below 1.2e-9 of the carrier for
//! orbital speeds under 10 km/s.

use nalgebra::Vector3;
use thiserror::Error;

use crate::constants::SPEED_OF_LIGHT_M_S;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DopplerError {
    #[error("carrier frequency must be positive and finite, got {0} Hz")]
    InvalidCarrier(f64),
}

fn check_carrier(carrier_hz: f64) -> Result<f64, DopplerError> {
    if carrier_hz.is_finite() && carrier_hz > 0.0 {
        Ok(carrier_hz)
    } else {
        Err(DopplerError::InvalidCarrier(carrier_hz))
    }
}

/// Magnitude of the shift (Hz) caused by the radial velocity component
/// `radial_velocity` (m/s).
pub fn doppler_shift(radial_velocity: &Vector3<f64>, carrier_hz: f64) -> Result<f64, DopplerError> {
    doppler_shift_speed(radial_velocity.norm(), carrier_hz)
}

/// Magnitude of the shift (Hz) for a radial speed (m/s).
pub fn doppler_shift_speed(speed: f64, carrier_hz: f64) -> Result<f64, DopplerError> {
    Ok(check_carrier(carrier_hz)? / SPEED_OF_LIGHT_M_S * speed.abs())
}

/// Signed shift (Hz), positive while the range is closing.
pub fn signed_doppler_shift(range_rate: f64, carrier_hz: f64) -> Result<f64, DopplerError> {
    Ok(-check_carrier(carrier_hz)? / SPEED_OF_LIGHT_M_S * range_rate)
}

/// Frequency received on the ground for a transmitter at range rate
/// `range_rate` (m/s).
pub fn downlink_frequency(carrier_hz: f64, range_rate: f64) -> Result<f64, DopplerError> {
    Ok(check_carrier(carrier_hz)? * (1.0 - range_rate / SPEED_OF_LIGHT_M_S))
}

/// Frequency to transmit so that the spacecraft receives `carrier_hz`.
pub fn uplink_frequency(carrier_hz: f64, range_rate: f64) -> Result<f64, DopplerError> {
    Ok(check_carrier(carrier_hz)? * (1.0 + range_rate / SPEED_OF_LIGHT_M_S))
}
