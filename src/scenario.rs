//! YAML scenario files: an optional ground observer, an epoch (or a time
//! series), a carrier frequency and the bodies to propagate.

use chrono::Duration;
use serde::Deserialize;
use thiserror::Error;

use crate::elements::OrbitalElementSet;
use crate::frames::ObserverLocation;
use crate::time::{EpochError, JulianDate};
use crate::tle::ValidationError;

/// Upper bound on the epochs of one time series.
pub const MAX_EPOCHS: i64 = 100_000;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("epoch: {0}")]
    Epoch(#[from] EpochError),
    #[error("body {index}: {source}")]
    Tle {
        index: usize,
        source: ValidationError,
    },
    #[error("{field}: {message}")]
    Duration {
        field: &'static str,
        message: String,
    },
    #[error("scenario has no bodies")]
    NoBodies,
}

#[derive(Debug, Deserialize)]
struct ScenarioFile {
    observer: Option<ObserverLocation>,
    epoch: String,
    carrier_hz: Option<f64>,
    span: Option<String>,
    step: Option<String>,
    bodies: Vec<BodyConfig>,
}

#[derive(Debug, Deserialize)]
struct BodyConfig {
    name: Option<String>,
    tle: String,
}

#[derive(Debug, Clone)]
pub struct Body {
    pub name: String,
    pub elements: OrbitalElementSet,
}

#[derive(Debug, Clone)]
pub struct Scenario {
    pub observer: Option<ObserverLocation>,
    pub start: JulianDate,
    pub carrier_hz: Option<f64>,
    /// Length and spacing of the time series, when one is asked for
    pub series: Option<(Duration, Duration)>,
    pub bodies: Vec<Body>,
}

impl Scenario {
    pub fn from_file(path: &str) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ScenarioError> {
        let file: ScenarioFile = serde_yaml::from_str(yaml)?;

        if file.bodies.is_empty() {
            return Err(ScenarioError::NoBodies);
        }

        let series = match (file.span, file.step) {
            (None, None) => None,
            (Some(span), Some(step)) => {
                let span = parse_duration("span", &span)?;
                let step = parse_duration("step", &step)?;
                if step <= Duration::zero() {
                    return Err(ScenarioError::Duration {
                        field: "step",
                        message: "must be positive".into(),
                    });
                }
                let count = span
                    .num_nanoseconds()
                    .zip(step.num_nanoseconds())
                    .map(|(span, step)| span / step + 1);
                if !matches!(count, Some(n) if n <= MAX_EPOCHS) {
                    return Err(ScenarioError::Duration {
                        field: "step",
                        message: format!("more than {} epochs", MAX_EPOCHS),
                    });
                }
                Some((span, step))
            }
            (Some(_), None) => return Err(missing("step")),
            (None, Some(_)) => return Err(missing("span")),
        };

        let bodies = file
            .bodies
            .into_iter()
            .enumerate()
            .map(|(index, body)| {
                let elements = OrbitalElementSet::from_tle_text(&body.tle)
                    .map_err(|source| ScenarioError::Tle { index, source })?;
                let name = body
                    .name
                    .or_else(|| elements.catalog().name.clone())
                    .unwrap_or_else(|| elements.catalog().number.to_string());
                Ok(Body { name, elements })
            })
            .collect::<Result<Vec<_>, ScenarioError>>()?;

        Ok(Scenario {
            observer: file.observer,
            start: JulianDate::parse(&file.epoch)?,
            carrier_hz: file.carrier_hz,
            series,
            bodies,
        })
    }

    /// The start epoch, followed by one epoch per step up to the end of the
    /// span (inclusive).
    pub fn epochs(&self) -> Vec<JulianDate> {
        let Some((span, step)) = self.series else {
            return vec![self.start];
        };
        let mut epochs = Vec::new();
        let mut offset = Duration::zero();
        while offset <= span {
            epochs.push(self.start.add_duration(offset));
            offset += step;
        }
        epochs
    }

    pub fn element_sets(&self) -> Vec<OrbitalElementSet> {
        self.bodies.iter().map(|b| b.elements.clone()).collect()
    }
}

fn missing(field: &'static str) -> ScenarioError {
    ScenarioError::Duration {
        field,
        message: "span and step must be given together".into(),
    }
}

fn parse_duration(field: &'static str, s: &str) -> Result<Duration, ScenarioError> {
    let err = |message: String| ScenarioError::Duration { field, message };
    humantime::parse_duration(s.trim())
        .map_err(|e| err(e.to_string()))
        .and_then(|d| Duration::from_std(d).map_err(|e| err(e.to_string())))
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::*;

    const SCENARIO: &str = r#"
observer: { latitude: 52.3676, longitude: 4.9041 }
epoch: 2019-12-10T00:00:00
carrier_hz: 1575.42e6
span: 10m
step: 2m 30s
bodies:
  - name: ISS
    tle: |
      1 25544U 98067A   19343.69339541  .00001764  00000-0  38792-4 0  9991
      2 25544  51.6439 211.2001 0007417  17.6667  85.6398 15.50103472202482
  - tle: |
      GPS BIIR-2  (PRN 13)
      1 24876U 97035A   20356.89748757  .00000033  00000-0  00000-0 0  9998
      2 24876  56.8476 310.8984 0158397  90.5550 270.3784  2.00561866123017
"#;

    #[test]
    fn full_scenario() {
        let scenario = Scenario::from_str(SCENARIO).unwrap();
        let observer = scenario.observer.unwrap();
        assert_eq!(observer.latitude_deg(), 52.3676);
        assert_eq!(scenario.carrier_hz, Some(1575.42e6));
        assert_eq!(scenario.bodies.len(), 2);
        assert_eq!(scenario.bodies[0].name, "ISS");
        assert_eq!(scenario.bodies[1].name, "GPS BIIR-2  (PRN 13)");
        assert_eq!(scenario.bodies[1].elements.catalog().number, 24876);

        let epochs = scenario.epochs();
        assert_eq!(epochs.len(), 5);
        assert_eq!(epochs[0], scenario.start);
        assert!((epochs[4].minutes_since(&epochs[0]) - 10.0).abs() < 1e-6);
    }

    #[test]
    fn single_epoch() {
        let yaml = r#"
epoch: 2019-12-10T00:00:00Z
bodies:
  - tle: |
      1 25544U 98067A   19343.69339541  .00001764  00000-0  38792-4 0  9991
      2 25544  51.6439 211.2001 0007417  17.6667  85.6398 15.50103472202482
"#;
        let scenario = Scenario::from_str(yaml).unwrap();
        assert!(scenario.observer.is_none());
        assert_eq!(scenario.carrier_hz, None);
        assert_eq!(scenario.epochs(), [scenario.start]);
        assert_eq!(scenario.bodies[0].name, "25544");
    }

    #[rstest]
    #[case::bad_checksum(
        "epoch: 2019-12-10T00:00:00\nbodies:\n  - tle: |\n      1 25544U 98067A   20356.55504791  .00001282  00000-0  29609-4 0  9993\n      2 25544  51.6466 212.3523 0001540  71.6672  44.1667 15.49107850260485\n"
    )]
    #[case::no_bodies("epoch: 2019-12-10T00:00:00\nbodies: []\n")]
    #[case::bad_epoch("epoch: yesterday\nbodies: []\n")]
    #[case::not_yaml("epoch: [\n")]
    fn rejected(#[case] yaml: &str) {
        assert!(Scenario::from_str(yaml).is_err());
    }

    #[test]
    fn bad_tle_names_the_body() {
        let yaml = "epoch: 2019-12-10T00:00:00\nbodies:\n  - tle: nonsense\n";
        let err = Scenario::from_str(yaml).unwrap_err();
        assert!(matches!(err, ScenarioError::Tle { index: 0, .. }), "{err}");
    }

    #[rstest]
    #[case("span: 10m\n", "step")]
    #[case("span: 10m\nstep: 0s\n", "step")]
    #[case("step: 10s\n", "span")]
    #[case("span: ten minutes\nstep: 10s\n", "span")]
    #[case::too_many_epochs("span: 100days\nstep: 1ms\n", "step")]
    #[case::span_beyond_nanoseconds("span: 1000years\nstep: 1s\n", "step")]
    fn series_settings(#[case] series: &str, #[case] expected: &str) {
        let yaml = format!(
            "epoch: 2019-12-10T00:00:00\n{series}bodies:\n  - tle: |\n      1 25544U 98067A   19343.69339541  .00001764  00000-0  38792-4 0  9991\n      2 25544  51.6439 211.2001 0007417  17.6667  85.6398 15.50103472202482\n"
        );
        let err = Scenario::from_str(&yaml).unwrap_err();
        assert!(
            matches!(err, ScenarioError::Duration { field, .. } if field == expected),
            "{err}"
        );
    }

    #[test]
    fn invalid_observer() {
        let yaml = "observer: { latitude: 95.0, longitude: 0.0 }\nepoch: 2019-12-10T00:00:00\nbodies:\n  - tle: |\n      1 25544U 98067A   19343.69339541  .00001764  00000-0  38792-4 0  9991\n      2 25544  51.6439 211.2001 0007417  17.6667  85.6398 15.50103472202482\n";
        let err = Scenario::from_str(yaml).unwrap_err();
        assert!(matches!(err, ScenarioError::Yaml(_)), "{err}");
        assert!(err.to_string().contains("latitude 95"), "{err}");
    }
}
