use nalgebra::Vector3;

use crate::constants::{EARTH_EQUATORIAL_RADIUS_KM, METERS_PER_KILOMETER};
use crate::elements::OrbitalElementSet;
use crate::error::Error;
use crate::propagate::error::PropagationError;
use crate::propagate::types::{Frame, StateVector};
use crate::time::JulianDate;

/// SGP4 model of one body: the element set and the constants derived from
/// it, computed once and reused for every epoch.
pub struct Propagator {
    elements: OrbitalElementSet,
    constants: sgp4::Constants,
}

impl Propagator {
    pub fn new(elements: OrbitalElementSet) -> Result<Self, PropagationError> {
        let orbit = sgp4::Orbit::from_kozai_elements(
            &sgp4::WGS72,
            elements.inclination(),
            elements.right_ascension(),
            elements.eccentricity(),
            elements.argument_of_perigee(),
            elements.mean_anomaly(),
            elements.mean_motion(),
        )?;

        let constants = sgp4::Constants::new(
            sgp4::WGS72,
            sgp4::iau_epoch_to_sidereal_time,
            elements.epoch().julian_years_since_j2000(),
            elements.drag_term(),
            orbit,
        )?;

        Ok(Self {
            elements,
            constants,
        })
    }

    pub fn elements(&self) -> &OrbitalElementSet {
        &self.elements
    }

    /// Inertial (TEME) state at `epoch`.
    pub fn propagate(&self, epoch: &JulianDate) -> Result<StateVector, PropagationError> {
        let minutes = epoch.minutes_since(self.elements.epoch());
        self.state_at(minutes, *epoch)
    }

    /// Inertial state `minutes` after the element epoch.
    pub fn propagate_minutes(&self, minutes: f64) -> Result<StateVector, PropagationError> {
        let epoch = self.elements.epoch().add_seconds(minutes * 60.0);
        self.state_at(minutes, epoch)
    }

    fn state_at(&self, minutes: f64, epoch: JulianDate) -> Result<StateVector, PropagationError> {
        log::debug!(
            "propagating {} to {:.6} min from epoch",
            self.elements.catalog().number,
            minutes
        );

        let prediction = self
            .constants
            .propagate(sgp4::MinutesSinceEpoch(minutes))
            .map_err(|e| PropagationError::from_sgp4(e, minutes))?;

        let position = Vector3::from(prediction.position);
        let radius_km = position.norm();
        if radius_km < EARTH_EQUATORIAL_RADIUS_KM {
            return Err(PropagationError::Decayed { radius_km, minutes });
        }

        Ok(StateVector::new(
            position * METERS_PER_KILOMETER,
            Vector3::from(prediction.velocity) * METERS_PER_KILOMETER,
            Frame::Inertial,
            epoch,
        ))
    }
}

/// Inertial state of `elements` at `epoch`.
pub fn propagate(
    elements: &OrbitalElementSet,
    epoch: &JulianDate,
) -> Result<StateVector, PropagationError> {
    Propagator::new(elements.clone())?.propagate(epoch)
}

/// Validates the TLE pair, then propagates it. Invalid text is never
/// propagated.
pub fn propagate_tle(line1: &str, line2: &str, epoch: &JulianDate) -> Result<StateVector, Error> {
    let elements = OrbitalElementSet::from_tle(line1, line2)?;
    Ok(propagate(&elements, epoch)?)
}

/// Propagates every element set to every epoch, one result per pair in
/// body-major order. Bodies are spread over scoped threads.
pub fn propagate_batch(
    sets: &[OrbitalElementSet],
    epochs: &[JulianDate],
) -> Vec<Result<StateVector, PropagationError>> {
    let workers = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let chunk_size = sets.len().div_ceil(workers).max(1);

    std::thread::scope(|scope| {
        let handles: Vec<_> = sets
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || {
                    chunk
                        .iter()
                        .flat_map(|set| propagate_all(set, epochs))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            })
            .collect()
    })
}

fn propagate_all(
    set: &OrbitalElementSet,
    epochs: &[JulianDate],
) -> Vec<Result<StateVector, PropagationError>> {
    match Propagator::new(set.clone()) {
        Ok(propagator) => epochs.iter().map(|epoch| propagator.propagate(epoch)).collect(),
        Err(e) => {
            log::warn!("cannot initialise {}: {}", set.catalog().number, e);
            vec![Err(e); epochs.len()]
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::elements::{Catalog, ElementParameters};
    use crate::tle::ValidationError;
    use rstest::*;

    const ISS_LINE1: &str = "1 25544U 98067A   19343.69339541  .00001764  00000-0  38792-4 0  9991";
    const ISS_LINE2: &str = "2 25544  51.6439 211.2001 0007417  17.6667  85.6398 15.50103472202482";

    // Spacetrack report #3 test object (column 69 of line 1 corrected)
    const SGP_LINE1: &str = "1 88888U 88888A   80275.98708465  .00073094  13844-3  66816-4 0  5554";
    const SGP_LINE2: &str = "2 88888  72.8435 115.9689 0086731  52.6988 110.5714 16.05824518   103";

    const GPS_LINE1: &str = "1 24876U 97035A   20356.89748757  .00000033  00000-0  00000-0 0  9998";
    const GPS_LINE2: &str = "2 24876  56.8476 310.8984 0158397  90.5550 270.3784  2.00561866123017";

    #[fixture]
    fn iss() -> OrbitalElementSet {
        OrbitalElementSet::from_tle(ISS_LINE1, ISS_LINE2).unwrap()
    }

    #[fixture]
    fn gps() -> OrbitalElementSet {
        OrbitalElementSet::from_tle(GPS_LINE1, GPS_LINE2).unwrap()
    }

    #[rstest]
    #[case::sgp(SGP_LINE1, SGP_LINE2)]
    #[case::iss(ISS_LINE1, ISS_LINE2)]
    #[case::gps(GPS_LINE1, GPS_LINE2)]
    fn radius_at_element_epoch_is_plausible(#[case] line1: &str, #[case] line2: &str) {
        let set = OrbitalElementSet::from_tle(line1, line2).unwrap();
        let state = propagate(&set, set.epoch()).unwrap();
        assert_eq!(state.frame(), Frame::Inertial);
        assert_eq!(state.epoch(), set.epoch());
        assert!(state.radius() > 6_378_000.0);
        assert!(state.radius() < 4.0e8);
    }

    #[test]
    fn reference_vector_at_epoch() {
        // 2328.97 -5995.22 1719.97 km, 2.912 -0.983 -7.091 km/s
        let set = OrbitalElementSet::from_tle(SGP_LINE1, SGP_LINE2).unwrap();
        let state = Propagator::new(set).unwrap().propagate_minutes(0.0).unwrap();

        let expected_position = Vector3::new(2328.97048951, -5995.22076416, 1719.97067261) * 1e3;
        let expected_velocity = Vector3::new(2.91207230, -0.98341546, -7.09081703) * 1e3;
        assert!((state.position() - expected_position).norm() < 100.0);
        assert!((state.velocity() - expected_velocity).norm() < 0.1);
    }

    #[test]
    fn reference_vector_after_six_hours() {
        let set = OrbitalElementSet::from_tle(SGP_LINE1, SGP_LINE2).unwrap();
        let state = Propagator::new(set).unwrap().propagate_minutes(360.0).unwrap();

        let expected_position = Vector3::new(2456.10705566, -6071.93853760, 1222.89727783) * 1e3;
        let expected_velocity = Vector3::new(2.67938992, -0.44829041, -7.22879231) * 1e3;
        assert!((state.position() - expected_position).norm() < 100.0);
        assert!((state.velocity() - expected_velocity).norm() < 0.1);
    }

    #[rstest]
    fn iss_low_earth_orbit(iss: OrbitalElementSet) {
        let epoch = JulianDate::parse("2019-12-10T00:00:00").unwrap();
        let state = propagate(&iss, &epoch).unwrap();
        // ~400 km above a 6371 km Earth, ~7.66 km/s
        assert!((state.radius() - 6.78e6).abs() < 5.0e4, "{}", state.radius());
        assert!((state.speed() - 7.66e3).abs() < 1.0e2, "{}", state.speed());
    }

    #[test]
    fn iss_four_years_after_its_elements() {
        let line1 = "1 25544U 98067A   20356.55504791  .00001282  00000-0  29609-4 0  9995";
        let line2 = "2 25544  51.6466 212.3523 0001540  71.6672  44.1667 15.49107850260485";
        let epoch = JulianDate::parse("2024-11-23T00:00:00").unwrap();

        let state = propagate_tle(line1, line2, &epoch).unwrap();
        assert_eq!(state.epoch(), &epoch);
        assert!((state.radius() - 6.786e6).abs() < 2.0e4, "{}", state.radius());
        assert!((state.speed() - 7.659e3).abs() < 50.0, "{}", state.speed());
    }

    #[rstest]
    fn epoch_and_minutes_agree(iss: OrbitalElementSet) {
        let propagator = Propagator::new(iss.clone()).unwrap();
        let epoch = iss.epoch().add_seconds(5400.0);
        let a = propagator.propagate(&epoch).unwrap();
        let b = propagator.propagate_minutes(90.0).unwrap();
        assert!((a.position() - b.position()).norm() < 1e-3);
    }

    #[test]
    fn refuses_invalid_tle() {
        let line1 = "1 25544U 98067A   20356.55504791  .00001282  00000-0  29609-4 0  9993";
        let line2 = "2 25544  51.6466 212.3523 0001540  71.6672  44.1667 15.49107850260485";
        let epoch = JulianDate::parse("2024-11-23T00:00:00").unwrap();
        let err = propagate_tle(line1, line2, &epoch).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::Checksum { line: 1, .. })
        ));
    }

    #[rstest]
    fn decays_under_heavy_drag(iss: OrbitalElementSet) {
        let params = ElementParameters {
            epoch: *iss.epoch(),
            eccentricity: iss.eccentricity(),
            inclination: iss.inclination(),
            right_ascension: iss.right_ascension(),
            argument_of_perigee: iss.argument_of_perigee(),
            mean_anomaly: iss.mean_anomaly(),
            mean_motion: iss.mean_motion(),
            mean_motion_dot: 0.0,
            mean_motion_ddot: 0.0,
            drag_term: 0.5,
        };
        let heavy = OrbitalElementSet::new(Catalog::default(), params).unwrap();
        let later = iss.epoch().add_seconds(10.0 * 86_400.0);

        // e0 - C4 t goes negative well before the radius drops
        let err = propagate(&heavy, &later).unwrap_err();
        assert!(
            matches!(
                err,
                PropagationError::MeanEccentricity { eccentricity, .. } if eccentricity < -0.001
            ),
            "{err}"
        );
        assert_eq!(err.code(), 1);
    }

    #[rstest]
    fn batch_keeps_order(iss: OrbitalElementSet, gps: OrbitalElementSet) {
        let epochs = [
            JulianDate::parse("2019-12-10T00:00:00").unwrap(),
            JulianDate::parse("2019-12-10T00:10:00").unwrap(),
        ];
        let sets = [iss.clone(), gps.clone()];
        let results = propagate_batch(&sets, &epochs);
        assert_eq!(results.len(), 4);

        for (i, (set, epoch)) in sets
            .iter()
            .flat_map(|s| epochs.iter().map(move |e| (s, e)))
            .enumerate()
        {
            let single = propagate(set, epoch).unwrap();
            assert_eq!(results[i].as_ref().unwrap(), &single);
        }
    }

    #[test]
    fn empty_batch() {
        assert!(propagate_batch(&[], &[JulianDate::new(2_460_637.5, 0.0)]).is_empty());
    }
}
