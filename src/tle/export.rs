//! Formatting of element sets as TLE text.

use crate::elements::OrbitalElementSet;
use crate::tle::error::ValidationError;
use crate::tle::parsing::TleText;
use crate::tle::validate::checksum;
use crate::units::{rad_per_min2_to_rev_per_day2, rad_per_min3_to_rev_per_day3};

/// Alpha-5 leading letters, worth 10 to 33 (I and O are not used).
const ALPHA5: &[u8; 24] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";

pub fn export_tle(set: &OrbitalElementSet) -> Result<TleText, ValidationError> {
    let catalog = set.catalog();
    let number = encode_catalog(catalog.number)?;

    let epoch = set.epoch();
    let (year, day_of_year) = epoch
        .year_and_day_of_year()
        .map_err(|_| out_of_range("epoch", epoch.day() + epoch.fraction()))?;
    if !(1957..2057).contains(&year) {
        return Err(out_of_range("epoch year", year as f64));
    }

    let designator: String = catalog
        .international_designator
        .as_deref()
        .unwrap_or_default()
        .chars()
        .take(8)
        .collect();

    let line1 = format!(
        "1 {}{} {:<8} {:02}{:012.8} {} {} {} 0 {:>4}",
        number,
        catalog.classification,
        designator,
        year % 100,
        day_of_year,
        format_decimal(rad_per_min2_to_rev_per_day2(set.mean_motion_dot()))?,
        format_exponent(
            rad_per_min3_to_rev_per_day3(set.mean_motion_ddot()),
            "mean motion second derivative"
        )?,
        format_exponent(set.drag_term(), "drag term")?,
        catalog.element_set_number % 10_000,
    );

    let eccentricity = format!("{:.7}", set.eccentricity());
    let eccentricity = eccentricity
        .strip_prefix("0.")
        .ok_or_else(|| out_of_range("eccentricity", set.eccentricity()))?;

    let line2 = format!(
        "2 {} {:8.4} {:8.4} {} {:8.4} {:8.4} {:11.8}{:>5}",
        number,
        set.inclination().to_degrees(),
        set.right_ascension().to_degrees(),
        eccentricity,
        set.argument_of_perigee().to_degrees(),
        set.mean_anomaly().to_degrees(),
        set.revolutions_per_day(),
        catalog.revolution_number % 100_000,
    );

    Ok(TleText {
        name: catalog.name.clone(),
        line1: with_checksum(line1),
        line2: with_checksum(line2),
    })
}

fn with_checksum(mut line: String) -> String {
    let sum = checksum(&line);
    line.push(char::from(b'0' + sum));
    line
}

fn out_of_range(field: &'static str, value: f64) -> ValidationError {
    ValidationError::OutOfRange { field, value }
}

fn encode_catalog(number: u64) -> Result<String, ValidationError> {
    if number < 100_000 {
        return Ok(format!("{number:05}"));
    }
    let index = (number / 10_000) as usize - 10;
    ALPHA5
        .get(index)
        .map(|&letter| format!("{}{:04}", letter as char, number % 10_000))
        .ok_or_else(|| out_of_range("catalog number", number as f64))
}

/// `.00001764` style, sign in the first column.
fn format_decimal(value: f64) -> Result<String, ValidationError> {
    if value.abs() >= 1.0 {
        return Err(out_of_range("mean motion derivative", value));
    }
    let digits = format!("{:.8}", value.abs());
    let sign = if value < 0.0 && digits != "0.00000000" {
        '-'
    } else {
        ' '
    };
    Ok(format!("{sign}{}", &digits[1..]))
}

/// Implied-decimal notation: ` 38792-4` is 0.38792e-4.
fn format_exponent(value: f64, field: &'static str) -> Result<String, ValidationError> {
    let magnitude = value.abs();
    if magnitude < 1e-10 {
        return Ok(" 00000-0".to_string());
    }

    let mut exponent = magnitude.log10().floor() as i32 + 1;
    let mut mantissa = (magnitude / 10f64.powi(exponent) * 1e5).round() as u64;
    if mantissa >= 100_000 {
        mantissa /= 10;
        exponent += 1;
    }
    if exponent > 9 {
        return Err(out_of_range(field, value));
    }

    let sign = if value < 0.0 { '-' } else { ' ' };
    let exponent_sign = if exponent < 0 { '-' } else { '+' };
    Ok(format!("{sign}{mantissa:05}{exponent_sign}{}", exponent.abs()))
}
