use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::process::ExitCode;

use sat_doppler::elements::{Catalog, Classification, ElementParameters, OrbitalElementSet};
use sat_doppler::frames::{
    ground_observer_position, inertial_to_local_horizon, look_angles, ObserverLocation,
};
use sat_doppler::propagate::{propagate_batch, StateVector};
use sat_doppler::relative::{observer_motion, pairwise, RelativeMotion};
use sat_doppler::scenario::Scenario;
use sat_doppler::time::JulianDate;
use sat_doppler::tle::{self, ValidationError};
use sat_doppler::units::{
    rev_per_day2_to_rad_per_min2, rev_per_day3_to_rad_per_min3, rev_per_day_to_rad_per_min,
};
use sat_doppler::Error;

#[derive(Parser)]
#[command(name = "sat-doppler")]
#[command(about = "Satellite propagation and Doppler shift from TLEs")]
struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a TLE pair, or every entry of a TLE file
    Validate {
        #[arg(long, conflicts_with = "lines")]
        file: Option<String>,
        #[arg(num_args = 2, value_names = ["LINE1", "LINE2"])]
        lines: Vec<String>,
    },
    /// State vectors of every body of a scenario at every epoch
    Propagate { scenario: String },
    /// Pairwise relative motion and Doppler shift of a scenario
    Doppler { scenario: String },
    /// Build an element set from TLE-style values and print it as a TLE
    Export(ExportArgs),
}

#[derive(Args)]
struct ExportArgs {
    #[arg(long)]
    catalog: u64,
    #[arg(long)]
    designator: Option<String>,
    #[arg(long)]
    name: Option<String>,
    /// ISO-8601 UTC
    #[arg(long)]
    epoch: String,
    #[arg(long)]
    eccentricity: f64,
    /// deg
    #[arg(long)]
    inclination: f64,
    /// deg
    #[arg(long)]
    right_ascension: f64,
    /// deg
    #[arg(long)]
    argument_of_perigee: f64,
    /// deg
    #[arg(long)]
    mean_anomaly: f64,
    /// rev/day
    #[arg(long)]
    mean_motion: f64,
    /// rev/day²
    #[arg(long, default_value_t = 0.0)]
    mean_motion_dot: f64,
    /// rev/day³
    #[arg(long, default_value_t = 0.0)]
    mean_motion_ddot: f64,
    #[arg(long, default_value_t = 0.0)]
    bstar: f64,
    #[arg(long, default_value_t = 999)]
    element_set: u64,
    #[arg(long, default_value_t = 0)]
    revolution: u64,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let result = match cli.command {
        Commands::Validate { file, lines } => validate(file.as_deref(), &lines, cli.json),
        Commands::Propagate { scenario } => run_propagate(&scenario, cli.json),
        Commands::Doppler { scenario } => run_doppler(&scenario, cli.json),
        Commands::Export(args) => export(&args, cli.json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[derive(Serialize)]
struct ValidationRecord {
    name: Option<String>,
    valid: bool,
    error: Option<String>,
}

fn validate(file: Option<&str>, lines: &[String], json: bool) -> Result<ExitCode, Error> {
    let entries = match (file, lines) {
        (Some(path), _) => {
            let content = fs::read_to_string(path)?;
            tle::parse_multi_tle(&content)
        }
        (None, [line1, line2]) => vec![tle::TleText {
            name: None,
            line1: line1.clone(),
            line2: line2.clone(),
        }],
        _ => return Err(ValidationError::Format.into()),
    };

    let records: Vec<ValidationRecord> = entries
        .iter()
        .map(|entry| {
            let result = tle::validate(&entry.line1, &entry.line2);
            ValidationRecord {
                name: entry.name.clone(),
                valid: result.is_ok(),
                error: result.err().map(|e| e.to_string()),
            }
        })
        .collect();

    if json {
        print_json(&records);
    } else if records.is_empty() {
        println!("No TLE entries found");
    } else {
        for (i, record) in records.iter().enumerate() {
            let label = record.name.clone().unwrap_or_else(|| format!("entry {}", i + 1));
            match &record.error {
                None => println!("{}: valid", label),
                Some(e) => println!("{}: invalid ({})", label, e),
            }
        }
    }

    let all_valid = !records.is_empty() && records.iter().all(|r| r.valid);
    Ok(if all_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[derive(Serialize)]
struct StateRecord<'a> {
    body: &'a str,
    epoch: String,
    state: Option<StateVector>,
    error: Option<String>,
}

fn run_propagate(path: &str, json: bool) -> Result<ExitCode, Error> {
    let scenario = Scenario::from_file(path)?;
    let epochs = scenario.epochs();
    let results = propagate_batch(&scenario.element_sets(), &epochs);

    let records: Vec<StateRecord> = scenario
        .bodies
        .iter()
        .flat_map(|body| epochs.iter().map(move |epoch| (body, epoch)))
        .zip(results)
        .map(|((body, epoch), result)| StateRecord {
            body: &body.name,
            epoch: format_epoch(epoch),
            state: result.as_ref().ok().copied(),
            error: result.err().map(|e| e.to_string()),
        })
        .collect();

    if json {
        print_json(&records);
        return Ok(ExitCode::SUCCESS);
    }

    for record in &records {
        match (&record.state, &record.error) {
            (Some(state), _) => {
                let r = state.position() / 1e3;
                let v = state.velocity() / 1e3;
                println!(
                    "{} @ {}: r = [{:.3}, {:.3}, {:.3}] km, v = [{:.6}, {:.6}, {:.6}] km/s ({})",
                    record.body,
                    record.epoch,
                    r[0],
                    r[1],
                    r[2],
                    v[0],
                    v[1],
                    v[2],
                    state.frame()
                );
            }
            (None, Some(e)) => println!("{} @ {}: {}", record.body, record.epoch, e),
            (None, None) => {}
        }
    }
    Ok(ExitCode::SUCCESS)
}

#[derive(Serialize)]
struct MotionRecord<'a> {
    epoch: String,
    from: &'a str,
    to: &'a str,
    motion: RelativeMotion,
    /// Only for the ground observer
    azimuth_deg: Option<f64>,
    elevation_deg: Option<f64>,
}

fn run_doppler(path: &str, json: bool) -> Result<ExitCode, Error> {
    let scenario = Scenario::from_file(path)?;
    let epochs = scenario.epochs();
    let results = propagate_batch(&scenario.element_sets(), &epochs);

    let mut records = Vec::new();
    for (e, epoch) in epochs.iter().enumerate() {
        // results are body-major
        let (indices, states): (Vec<usize>, Vec<StateVector>) = scenario
            .bodies
            .iter()
            .enumerate()
            .filter_map(|(b, body)| match &results[b * epochs.len() + e] {
                Ok(state) => Some((b, *state)),
                Err(err) => {
                    log::warn!("{} skipped at {}: {}", body.name, format_epoch(epoch), err);
                    None
                }
            })
            .unzip();

        for pair in pairwise(&states, scenario.carrier_hz) {
            let from = &scenario.bodies[indices[pair.from]].name;
            let to = &scenario.bodies[indices[pair.to]].name;
            match pair.motion {
                Ok(motion) => records.push(MotionRecord {
                    epoch: format_epoch(epoch),
                    from,
                    to,
                    motion,
                    azimuth_deg: None,
                    elevation_deg: None,
                }),
                Err(err) => log::warn!(
                    "{} -> {} skipped at {}: {}",
                    from,
                    to,
                    format_epoch(epoch),
                    err
                ),
            }
        }

        if let Some(observer) = &scenario.observer {
            for (&b, state) in indices.iter().zip(&states) {
                let name = &scenario.bodies[b].name;
                match observed(state, observer, scenario.carrier_hz) {
                    Ok((motion, azimuth, elevation)) => records.push(MotionRecord {
                        epoch: format_epoch(epoch),
                        from: "observer",
                        to: name,
                        motion,
                        azimuth_deg: Some(azimuth),
                        elevation_deg: Some(elevation),
                    }),
                    Err(err) => log::warn!(
                        "observer -> {} skipped at {}: {}",
                        name,
                        format_epoch(epoch),
                        err
                    ),
                }
            }
        }
    }

    if json {
        print_json(&records);
        return Ok(ExitCode::SUCCESS);
    }

    for record in &records {
        let doppler = record
            .motion
            .signed_doppler_hz
            .map(|hz| format!(", doppler {:+.1} Hz", hz))
            .unwrap_or_default();
        let look = match (record.azimuth_deg, record.elevation_deg) {
            (Some(az), Some(el)) => format!(", az {:.1}° el {:.1}°", az, el),
            _ => String::new(),
        };
        println!(
            "{} {} -> {}: range {:.3} km, range rate {:.3} km/s{}{}",
            record.epoch,
            record.from,
            record.to,
            record.motion.range / 1e3,
            record.motion.range_rate / 1e3,
            doppler,
            look
        );
    }
    Ok(ExitCode::SUCCESS)
}

/// Motion of `state` seen from the observer, with its azimuth and elevation.
fn observed(
    state: &StateVector,
    observer: &ObserverLocation,
    carrier_hz: Option<f64>,
) -> Result<(RelativeMotion, f64, f64), Error> {
    let motion = observer_motion(state, observer, carrier_hz)?;
    let line_of_sight = state.to_earth_fixed()?.position() - ground_observer_position(observer);
    let (azimuth, elevation) = look_angles(&inertial_to_local_horizon(&line_of_sight, observer));
    Ok((motion, azimuth, elevation))
}

fn export(args: &ExportArgs, json: bool) -> Result<ExitCode, Error> {
    let catalog = Catalog {
        number: args.catalog,
        classification: Classification::Unclassified,
        international_designator: args.designator.clone(),
        element_set_number: args.element_set,
        revolution_number: args.revolution,
        name: args.name.clone(),
    };
    let params = ElementParameters {
        epoch: JulianDate::parse(&args.epoch)?,
        eccentricity: args.eccentricity,
        inclination: args.inclination.to_radians(),
        right_ascension: args.right_ascension.to_radians(),
        argument_of_perigee: args.argument_of_perigee.to_radians(),
        mean_anomaly: args.mean_anomaly.to_radians(),
        mean_motion: rev_per_day_to_rad_per_min(args.mean_motion),
        mean_motion_dot: rev_per_day2_to_rad_per_min2(args.mean_motion_dot),
        mean_motion_ddot: rev_per_day3_to_rad_per_min3(args.mean_motion_ddot),
        drag_term: args.bstar,
    };

    let set = OrbitalElementSet::new(catalog, params)?;
    let text = set.to_tle()?;

    if json {
        print_json(&text);
    } else {
        if let Some(name) = &text.name {
            println!("{}", name);
        }
        println!("{}", text.line1);
        println!("{}", text.line2);
    }
    Ok(ExitCode::SUCCESS)
}

fn format_epoch(epoch: &JulianDate) -> String {
    match epoch.to_datetime() {
        Ok(dt) => dt.format("%Y-%m-%dT%H:%M:%S%.3f").to_string(),
        Err(_) => format!("JD {}+{}", epoch.day(), epoch.fraction()),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON error: {}", e),
    }
}
