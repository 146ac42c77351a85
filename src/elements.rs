//! Mean orbital elements, the input of every propagation.

use std::f64::consts::{PI, TAU};

use serde::Serialize;

use crate::time::JulianDate;
use crate::tle::{self, ValidationError};
use crate::units::{
    rad_per_min_to_rev_per_day, rev_per_day2_to_rad_per_min2, rev_per_day3_to_rad_per_min3,
    rev_per_day_to_rad_per_min,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, strum_macros::Display)]
pub enum Classification {
    #[default]
    #[strum(serialize = "U")]
    Unclassified,
    #[strum(serialize = "C")]
    Classified,
    #[strum(serialize = "S")]
    Secret,
}

/// Catalog metadata attached to an element set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Catalog {
    pub number: u64,
    pub classification: Classification,
    /// Short TLE form, e.g. `98067A`
    pub international_designator: Option<String>,
    pub element_set_number: u64,
    pub revolution_number: u64,
    pub name: Option<String>,
}

/// Element values for direct construction, already in SGP4 units. Rates
/// given in revolutions per day go through [`crate::units`] first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementParameters {
    pub epoch: JulianDate,
    pub eccentricity: f64,
    /// rad
    pub inclination: f64,
    /// rad
    pub right_ascension: f64,
    /// rad
    pub argument_of_perigee: f64,
    /// rad
    pub mean_anomaly: f64,
    /// Kozai mean motion, rad/min
    pub mean_motion: f64,
    /// TLE first derivative field (ṅ/2), rad/min²
    pub mean_motion_dot: f64,
    /// TLE second derivative field (n̈/6), rad/min³
    pub mean_motion_ddot: f64,
    /// B*, 1/earth radii
    pub drag_term: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrbitalElementSet {
    catalog: Catalog,
    epoch: JulianDate,
    eccentricity: f64,
    inclination: f64,
    right_ascension: f64,
    argument_of_perigee: f64,
    mean_anomaly: f64,
    mean_motion: f64,
    mean_motion_dot: f64,
    mean_motion_ddot: f64,
    drag_term: f64,
}

impl OrbitalElementSet {
    pub fn new(catalog: Catalog, params: ElementParameters) -> Result<Self, ValidationError> {
        let finite = [
            ("eccentricity", params.eccentricity),
            ("inclination", params.inclination),
            ("right ascension", params.right_ascension),
            ("argument of perigee", params.argument_of_perigee),
            ("mean anomaly", params.mean_anomaly),
            ("mean motion", params.mean_motion),
            ("mean motion derivative", params.mean_motion_dot),
            ("mean motion second derivative", params.mean_motion_ddot),
            ("drag term", params.drag_term),
            ("epoch", params.epoch.day() + params.epoch.fraction()),
        ];
        if let Some(&(field, value)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ValidationError::OutOfRange { field, value });
        }

        if !(0.0..1.0).contains(&params.eccentricity) {
            return Err(ValidationError::OutOfRange {
                field: "eccentricity",
                value: params.eccentricity,
            });
        }
        if !(0.0..=PI).contains(&params.inclination) {
            return Err(ValidationError::OutOfRange {
                field: "inclination",
                value: params.inclination,
            });
        }
        if params.mean_motion <= 0.0 {
            return Err(ValidationError::OutOfRange {
                field: "mean motion",
                value: params.mean_motion,
            });
        }

        Ok(Self {
            catalog,
            epoch: params.epoch,
            eccentricity: params.eccentricity,
            inclination: params.inclination,
            right_ascension: params.right_ascension.rem_euclid(TAU),
            argument_of_perigee: params.argument_of_perigee.rem_euclid(TAU),
            mean_anomaly: params.mean_anomaly.rem_euclid(TAU),
            mean_motion: params.mean_motion,
            mean_motion_dot: params.mean_motion_dot,
            mean_motion_ddot: params.mean_motion_ddot,
            drag_term: params.drag_term,
        })
    }

    /// Validates the pair and decodes it.
    pub fn from_tle(line1: &str, line2: &str) -> Result<Self, ValidationError> {
        let elements = tle::validate::parse(line1, line2)?;
        Self::from_sgp4(&elements)
    }

    /// Same as [`Self::from_tle`] for a 2-line or named 3-line text block.
    pub fn from_tle_text(block: &str) -> Result<Self, ValidationError> {
        let text = tle::parse_tle_lines(block)?;
        let mut set = Self::from_tle(&text.line1, &text.line2)?;
        if text.name.is_some() {
            set.catalog.name = text.name;
        }
        Ok(set)
    }

    pub(crate) fn from_sgp4(elements: &sgp4::Elements) -> Result<Self, ValidationError> {
        let catalog = Catalog {
            number: elements.norad_id,
            classification: match elements.classification {
                sgp4::Classification::Unclassified => Classification::Unclassified,
                sgp4::Classification::Classified => Classification::Classified,
                sgp4::Classification::Secret => Classification::Secret,
            },
            international_designator: elements
                .international_designator
                .as_deref()
                .map(short_designator),
            element_set_number: elements.element_set_number,
            revolution_number: elements.revolution_number,
            name: elements.object_name.clone(),
        };

        let params = ElementParameters {
            epoch: JulianDate::from_datetime(&elements.datetime),
            eccentricity: elements.eccentricity,
            inclination: elements.inclination.to_radians(),
            right_ascension: elements.right_ascension.to_radians(),
            argument_of_perigee: elements.argument_of_perigee.to_radians(),
            mean_anomaly: elements.mean_anomaly.to_radians(),
            mean_motion: rev_per_day_to_rad_per_min(elements.mean_motion),
            mean_motion_dot: rev_per_day2_to_rad_per_min2(elements.mean_motion_dot),
            mean_motion_ddot: rev_per_day3_to_rad_per_min3(elements.mean_motion_ddot),
            drag_term: elements.drag_term,
        };

        Self::new(catalog, params)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn epoch(&self) -> &JulianDate {
        &self.epoch
    }

    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    /// rad
    pub fn inclination(&self) -> f64 {
        self.inclination
    }

    /// rad
    pub fn right_ascension(&self) -> f64 {
        self.right_ascension
    }

    /// rad
    pub fn argument_of_perigee(&self) -> f64 {
        self.argument_of_perigee
    }

    /// rad
    pub fn mean_anomaly(&self) -> f64 {
        self.mean_anomaly
    }

    /// Kozai mean motion, rad/min
    pub fn mean_motion(&self) -> f64 {
        self.mean_motion
    }

    /// rad/min²
    pub fn mean_motion_dot(&self) -> f64 {
        self.mean_motion_dot
    }

    /// rad/min³
    pub fn mean_motion_ddot(&self) -> f64 {
        self.mean_motion_ddot
    }

    pub fn drag_term(&self) -> f64 {
        self.drag_term
    }

    /// Orbital period in minutes.
    pub fn period_minutes(&self) -> f64 {
        TAU / self.mean_motion
    }

    pub fn revolutions_per_day(&self) -> f64 {
        rad_per_min_to_rev_per_day(self.mean_motion)
    }

    /// Writes the set back as two checksummed TLE lines.
    pub fn to_tle(&self) -> Result<tle::TleText, ValidationError> {
        tle::export_tle(self)
    }
}

/// `1998-067A` (OMM style) -> `98067A` (TLE style)
fn short_designator(designator: &str) -> String {
    match designator.split_once('-') {
        Some((year, rest)) if year.len() == 4 => format!("{}{}", &year[2..], rest),
        _ => designator.trim().to_string(),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::*;

    const ISS_LINE1: &str = "1 25544U 98067A   19343.69339541  .00001764  00000-0  38792-4 0  9991";
    const ISS_LINE2: &str = "2 25544  51.6439 211.2001 0007417  17.6667  85.6398 15.50103472202482";

    #[fixture]
    fn iss() -> OrbitalElementSet {
        OrbitalElementSet::from_tle(ISS_LINE1, ISS_LINE2).unwrap()
    }

    #[fixture]
    fn params() -> ElementParameters {
        ElementParameters {
            epoch: JulianDate::from_calendar(2019, 12, 9, 0, 0, 0.0).unwrap(),
            eccentricity: 0.0007417,
            inclination: 0.9013560935706996,
            right_ascension: 3.686137125541276,
            argument_of_perigee: 0.3083420829620822,
            mean_anomaly: 1.4946964807494398,
            mean_motion: 0.06763602333248933,
            mean_motion_dot: 0.0,
            mean_motion_ddot: 0.0,
            drag_term: 3.8792e-5,
        }
    }

    #[rstest]
    fn decodes_reference_tle(iss: OrbitalElementSet) {
        assert_eq!(iss.catalog().number, 25544);
        assert_eq!(iss.catalog().classification, Classification::Unclassified);
        assert_eq!(iss.catalog().international_designator.as_deref(), Some("98067A"));
        assert_eq!(iss.catalog().element_set_number, 999);
        assert_eq!(iss.catalog().revolution_number, 20248);
        assert_eq!(iss.eccentricity(), 0.0007417);
        assert!((iss.inclination() - 0.9013560935706996).abs() < 1e-12);
        assert!((iss.mean_motion() - 0.06763602333248933).abs() < 1e-12);
        assert!((iss.drag_term() - 3.8792e-5).abs() < 1e-15);
        assert!((iss.period_minutes() - 92.897).abs() < 1e-2);
    }

    #[rstest]
    fn epoch_keeps_two_parts(iss: OrbitalElementSet) {
        // 19343.69339541 -> 2019-12-09 16:38:29.363 UTC
        let epoch = iss.epoch();
        assert_eq!(epoch.day(), 2_458_826.5);
        assert!((epoch.fraction() - 0.69339541).abs() < 1e-8);
    }

    #[rstest]
    fn named_block_keeps_name() {
        let block = format!("ISS (ZARYA)\n{ISS_LINE1}\n{ISS_LINE2}\n");
        let set = OrbitalElementSet::from_tle_text(&block).unwrap();
        assert_eq!(set.catalog().name.as_deref(), Some("ISS (ZARYA)"));
    }

    #[rstest]
    fn angles_are_normalised(mut params: ElementParameters) {
        params.mean_anomaly = -0.5;
        params.right_ascension = TAU + 1.0;
        let set = OrbitalElementSet::new(Catalog::default(), params).unwrap();
        assert!((set.mean_anomaly() - (TAU - 0.5)).abs() < 1e-12);
        assert!((set.right_ascension() - 1.0).abs() < 1e-12);
    }

    #[rstest]
    #[case::hyperbolic("eccentricity", 1.0)]
    #[case::negative("eccentricity", -0.1)]
    #[case::retrograde_overflow("inclination", 3.2)]
    #[case::stalled("mean motion", 0.0)]
    #[case::nan("mean anomaly", f64::NAN)]
    fn rejects_invalid_parameters(
        mut params: ElementParameters,
        #[case] field: &'static str,
        #[case] value: f64,
    ) {
        match field {
            "eccentricity" => params.eccentricity = value,
            "inclination" => params.inclination = value,
            "mean motion" => params.mean_motion = value,
            _ => params.mean_anomaly = value,
        }
        let err = OrbitalElementSet::new(Catalog::default(), params).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { field: f, .. } if f == field));
    }

    #[rstest]
    #[case("1998-067A", "98067A")]
    #[case("98067A", "98067A")]
    #[case("2024-123BC", "24123BC")]
    fn designators(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(short_designator(input), expected);
    }
}
