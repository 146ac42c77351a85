//! Relative motion between propagated bodies, and between a body and a
//! ground observer.

use nalgebra::Vector3;
use serde::Serialize;

use crate::doppler::{doppler_shift, signed_doppler_shift};
use crate::error::Error;
use crate::frames::{ground_observer_state, ObserverLocation};
use crate::propagate::StateVector;
use crate::vector::decompose;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RelativeMotion {
    /// Line of sight from reference to target (m)
    pub position: Vector3<f64>,
    pub range: f64,
    pub velocity: Vector3<f64>,
    /// Velocity along the line of sight
    pub radial: Vector3<f64>,
    pub tangential: Vector3<f64>,
    /// m/s, positive when receding
    pub range_rate: f64,
    /// Unsigned shift of the carrier (Hz)
    pub doppler_hz: Option<f64>,
    /// Signed shift, positive while approaching (Hz)
    pub signed_doppler_hz: Option<f64>,
}

/// Motion of body `to` as seen from body `from`. A failed pair leaves the
/// others untouched.
#[derive(Debug)]
pub struct PairMotion {
    pub from: usize,
    pub to: usize,
    pub motion: Result<RelativeMotion, Error>,
}

/// Motion of `target` seen from `reference`, decomposed along the line of
/// sight. The Doppler fields are filled when a carrier is given.
pub fn relative_motion(
    target: &StateVector,
    reference: &StateVector,
    carrier_hz: Option<f64>,
) -> Result<RelativeMotion, Error> {
    let relative = target.relative_to(reference)?;
    let split = decompose(relative.velocity(), relative.position())?;

    let (doppler_hz, signed_doppler_hz) = match carrier_hz {
        Some(carrier) => (
            Some(doppler_shift(&split.radial, carrier)?),
            Some(signed_doppler_shift(split.radial_speed, carrier)?),
        ),
        None => (None, None),
    };

    Ok(RelativeMotion {
        position: *relative.position(),
        range: relative.radius(),
        velocity: split.velocity,
        radial: split.radial,
        tangential: split.tangential,
        range_rate: split.radial_speed,
        doppler_hz,
        signed_doppler_hz,
    })
}

/// Every pair `i < j` of `states`: body `j` seen from body `i`.
pub fn pairwise(states: &[StateVector], carrier_hz: Option<f64>) -> Vec<PairMotion> {
    states
        .iter()
        .enumerate()
        .flat_map(|(from, reference)| {
            states
                .iter()
                .enumerate()
                .skip(from + 1)
                .map(move |(to, target)| PairMotion {
                    from,
                    to,
                    motion: relative_motion(target, reference, carrier_hz),
                })
        })
        .collect()
}

/// Motion of an inertial `state` seen from a ground observer, including the
/// observer's own velocity from Earth rotation.
pub fn observer_motion(
    state: &StateVector,
    observer: &ObserverLocation,
    carrier_hz: Option<f64>,
) -> Result<RelativeMotion, Error> {
    let station = ground_observer_state(observer, *state.epoch()).to_inertial()?;
    relative_motion(state, &station, carrier_hz)
}
