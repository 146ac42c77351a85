//! Column-level validation of TLE pairs.
//!
//! TLE is a punch-card format: every field lives at fixed columns and a
//! single shifted space silently changes the meaning of the line. The checks
//! below run before the pair is handed to the SGP4 parser so that every
//! failure comes back as a [`ValidationError`] naming the offending field.

use std::ops::Range;

use crate::tle::error::ValidationError;

pub const LINE_LENGTH: usize = 69;

// Columns are 1-based in the format description, ranges below are 0-based.
const CATALOG: Range<usize> = 2..7;
const L1_EPOCH_YEAR: Range<usize> = 18..20;
const L1_EPOCH_DAY: Range<usize> = 20..32;
const L1_MEAN_MOTION_DOT: Range<usize> = 33..43;
const L1_MEAN_MOTION_DDOT: Range<usize> = 44..52;
const L1_DRAG_TERM: Range<usize> = 53..61;
const L1_EPHEMERIS_TYPE: usize = 62;
const L1_ELEMENT_SET: Range<usize> = 64..68;
const L1_SEPARATORS: [usize; 8] = [1, 8, 17, 32, 43, 52, 61, 63];

const L2_INCLINATION: Range<usize> = 8..16;
const L2_RIGHT_ASCENSION: Range<usize> = 17..25;
const L2_ECCENTRICITY: Range<usize> = 26..33;
const L2_ARGUMENT_OF_PERIGEE: Range<usize> = 34..42;
const L2_MEAN_ANOMALY: Range<usize> = 43..51;
const L2_MEAN_MOTION: Range<usize> = 52..63;
const L2_REVOLUTION: Range<usize> = 63..68;
const L2_SEPARATORS: [usize; 7] = [1, 7, 16, 25, 33, 42, 51];

/// Permissive form of [`validate`].
pub fn is_valid(line1: &str, line2: &str) -> bool {
    validate(line1, line2).is_ok()
}

/// Checks that `line1` / `line2` form a well-formed TLE pair.
pub fn validate(line1: &str, line2: &str) -> Result<(), ValidationError> {
    parse(line1, line2).map(|_| ())
}

/// Validates the pair and returns the elements decoded by the SGP4 parser.
pub(crate) fn parse(line1: &str, line2: &str) -> Result<sgp4::Elements, ValidationError> {
    let line1 = check_layout(line1, 1, &L1_SEPARATORS)?;
    let line2 = check_layout(line2, 2, &L2_SEPARATORS)?;

    let catalog1 = &line1[CATALOG];
    let catalog2 = &line2[CATALOG];
    check_catalog(catalog1, 1)?;
    check_catalog(catalog2, 2)?;
    if catalog1.trim() != catalog2.trim() {
        return Err(ValidationError::CatalogMismatch {
            line1: catalog1.to_string(),
            line2: catalog2.to_string(),
        });
    }

    check_line1_fields(line1)?;
    check_line2_fields(line2)?;

    let elements = sgp4::Elements::from_tle(None, line1.as_bytes(), line2.as_bytes())?;
    Ok(elements)
}

/// TLE checksum: digits count for their value, '-' counts as one, modulo 10.
pub fn checksum(line: &str) -> u8 {
    let sum: u32 = line
        .chars()
        .take(LINE_LENGTH - 1)
        .map(|c| match c {
            '-' => 1,
            c => c.to_digit(10).unwrap_or(0),
        })
        .sum();
    (sum % 10) as u8
}

fn check_layout<'a>(
    line: &'a str,
    number: u8,
    separators: &[usize],
) -> Result<&'a str, ValidationError> {
    let line = line.trim_end();
    if !line.is_ascii() {
        return Err(ValidationError::NotAscii { line: number });
    }
    if line.len() != LINE_LENGTH {
        return Err(ValidationError::LineLength {
            line: number,
            length: line.len(),
        });
    }

    let bytes = line.as_bytes();
    if bytes[0] != b'0' + number || bytes[1] != b' ' {
        return Err(ValidationError::LineNumber { line: number });
    }

    if let Some(&col) = separators.iter().find(|&&col| bytes[col] != b' ') {
        return Err(ValidationError::Field {
            line: number,
            field: "separator",
            value: format!("column {}: '{}'", col + 1, bytes[col] as char),
        });
    }

    let found = bytes[LINE_LENGTH - 1] as char;
    let expected = checksum(line);
    if found.to_digit(10) != Some(expected as u32) {
        return Err(ValidationError::Checksum {
            line: number,
            expected,
            found,
        });
    }

    Ok(line)
}

fn check_catalog(field: &str, line: u8) -> Result<(), ValidationError> {
    let trimmed = field.trim_start();
    let mut chars = trimmed.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_digit() => chars.all(|c| c.is_ascii_digit()),
        // Alpha-5: letter (I and O excluded) followed by four digits
        Some(c) if c.is_ascii_uppercase() && c != 'I' && c != 'O' => {
            trimmed.len() == 5 && chars.all(|c| c.is_ascii_digit())
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(field_error(line, "catalog number", field))
    }
}

fn check_line1_fields(line: &str) -> Result<(), ValidationError> {
    parse_unsigned(&line[L1_EPOCH_YEAR], 1, "epoch year")?;

    let day = parse_decimal(&line[L1_EPOCH_DAY], 1, "epoch day")?;
    if !(1.0..367.0).contains(&day) {
        return Err(ValidationError::OutOfRange {
            field: "epoch day",
            value: day,
        });
    }

    parse_decimal(&line[L1_MEAN_MOTION_DOT], 1, "mean motion derivative")?;
    parse_exponent(&line[L1_MEAN_MOTION_DDOT], 1, "mean motion second derivative")?;
    parse_exponent(&line[L1_DRAG_TERM], 1, "drag term")?;

    let ephemeris = line.as_bytes()[L1_EPHEMERIS_TYPE];
    if !(ephemeris.is_ascii_digit() || ephemeris == b' ') {
        return Err(field_error(
            1,
            "ephemeris type",
            &line[L1_EPHEMERIS_TYPE..=L1_EPHEMERIS_TYPE],
        ));
    }

    if !line[L1_ELEMENT_SET].trim().is_empty() {
        parse_unsigned(&line[L1_ELEMENT_SET], 1, "element set number")?;
    }

    Ok(())
}

fn check_line2_fields(line: &str) -> Result<(), ValidationError> {
    let inclination = parse_decimal(&line[L2_INCLINATION], 2, "inclination")?;
    check_range("inclination", inclination, 0.0, 180.0)?;

    for (range, field) in [
        (L2_RIGHT_ASCENSION, "right ascension"),
        (L2_ARGUMENT_OF_PERIGEE, "argument of perigee"),
        (L2_MEAN_ANOMALY, "mean anomaly"),
    ] {
        let angle = parse_decimal(&line[range], 2, field)?;
        check_range(field, angle, 0.0, 360.0)?;
    }

    // implied leading decimal point, so always within [0, 1)
    let eccentricity = &line[L2_ECCENTRICITY];
    if !eccentricity.bytes().all(|b| b.is_ascii_digit()) {
        return Err(field_error(2, "eccentricity", eccentricity));
    }

    let mean_motion = parse_decimal(&line[L2_MEAN_MOTION], 2, "mean motion")?;
    if mean_motion <= 0.0 {
        return Err(ValidationError::OutOfRange {
            field: "mean motion",
            value: mean_motion,
        });
    }

    if !line[L2_REVOLUTION].trim().is_empty() {
        parse_unsigned(&line[L2_REVOLUTION], 2, "revolution number")?;
    }

    Ok(())
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange { field, value })
    }
}

fn field_error(line: u8, field: &'static str, value: &str) -> ValidationError {
    ValidationError::Field {
        line,
        field,
        value: value.to_string(),
    }
}

fn parse_unsigned(s: &str, line: u8, field: &'static str) -> Result<u64, ValidationError> {
    s.trim().parse().map_err(|_| field_error(line, field, s))
}

fn parse_decimal(s: &str, line: u8, field: &'static str) -> Result<f64, ValidationError> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| field_error(line, field, s))
}

/// Decodes the implied-decimal exponent notation, e.g. `-11606-4` for
/// -0.11606e-4.
pub(crate) fn parse_exponent(s: &str, line: u8, field: &'static str) -> Result<f64, ValidationError> {
    let err = || field_error(line, field, s);
    let trimmed = s.trim();

    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1.0, &trimmed[1..]),
        Some(b'+') => (1.0, &trimmed[1..]),
        _ => (1.0, trimmed),
    };
    if rest.len() < 3 {
        return Err(err());
    }

    let (mantissa, exponent) = rest.split_at(rest.len() - 2);
    if mantissa.is_empty() || !mantissa.bytes().all(|b| b.is_ascii_digit()) {
        return Err(err());
    }
    let exponent_sign = match exponent.as_bytes()[0] {
        b'-' => -1,
        b'+' | b' ' => 1,
        _ => return Err(err()),
    };
    let exponent_digit = (exponent.as_bytes()[1] as char).to_digit(10).ok_or_else(err)? as i32;

    let mantissa: f64 = format!("0.{mantissa}").parse().map_err(|_| err())?;
    Ok(sign * mantissa * 10f64.powi(exponent_sign * exponent_digit))
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::*;

    const ISS_LINE1: &str = "1 25544U 98067A   19343.69339541  .00001764  00000-0  38792-4 0  9991";
    const ISS_LINE2: &str = "2 25544  51.6439 211.2001 0007417  17.6667  85.6398 15.50103472202482";

    /// Recomputes column 69 after a test edits a line.
    fn with_checksum(line: &str) -> String {
        let body = &line[..LINE_LENGTH - 1];
        format!("{}{}", body, checksum(body))
    }

    fn replace(line: &str, at: usize, with: &str) -> String {
        let mut out = line.to_string();
        out.replace_range(at..at + with.len(), with);
        with_checksum(&out)
    }

    #[test]
    fn accepts_reference_pair() {
        assert!(validate(ISS_LINE1, ISS_LINE2).is_ok());
        assert!(is_valid(ISS_LINE1, ISS_LINE2));
    }

    #[test]
    fn ignores_trailing_whitespace() {
        let line1 = format!("{ISS_LINE1}  \r");
        assert!(is_valid(&line1, ISS_LINE2));
    }

    #[test]
    fn checksums_of_reference_lines() {
        assert_eq!(checksum(ISS_LINE1), 1);
        assert_eq!(checksum(ISS_LINE2), 2);
    }

    #[test]
    fn rejects_bad_checksum() {
        // published with a checksum digit that does not match its content
        let line1 = "1 25544U 98067A   20356.55504791  .00001282  00000-0  29609-4 0  9993";
        let line2 = "2 25544  51.6466 212.3523 0001540  71.6672  44.1667 15.49107850260485";
        assert_eq!(
            validate(line1, line2),
            Err(ValidationError::Checksum {
                line: 1,
                expected: 5,
                found: '3'
            })
        );
        assert!(!is_valid(line1, line2));
    }

    #[test]
    fn rejects_truncated_line() {
        let err = validate(&ISS_LINE1[..60], ISS_LINE2).unwrap_err();
        assert_eq!(err, ValidationError::LineLength { line: 1, length: 60 });
    }

    #[test]
    fn rejects_swapped_lines() {
        let err = validate(ISS_LINE2, ISS_LINE1).unwrap_err();
        assert_eq!(err, ValidationError::LineNumber { line: 1 });
    }

    #[test]
    fn rejects_catalog_mismatch() {
        let line2 = replace(ISS_LINE2, 2, "25545");
        assert!(matches!(
            validate(ISS_LINE1, &line2),
            Err(ValidationError::CatalogMismatch { .. })
        ));
    }

    #[test]
    fn rejects_shifted_columns() {
        // one column to the right: the separator before the epoch is lost
        let shifted = with_checksum(&format!("{} {}", &ISS_LINE1[..17], &ISS_LINE1[17..67]));
        assert!(matches!(
            validate(&shifted, ISS_LINE2),
            Err(ValidationError::Field { line: 1, .. })
        ));
    }

    #[rstest]
    #[case::eccentricity(26, "00x7417")]
    #[case::inclination(8, " 51.6x39")]
    #[case::mean_motion(52, "15.5010347x")]
    fn rejects_unparsable_line2_fields(#[case] at: usize, #[case] with: &str) {
        let line2 = replace(ISS_LINE2, at, with);
        assert!(matches!(
            validate(ISS_LINE1, &line2),
            Err(ValidationError::Field { line: 2, .. })
        ));
    }

    #[test]
    fn rejects_inclination_out_of_range() {
        let line2 = replace(ISS_LINE2, 8, "181.6439");
        assert_eq!(
            validate(ISS_LINE1, &line2),
            Err(ValidationError::OutOfRange {
                field: "inclination",
                value: 181.6439
            })
        );
    }

    #[test]
    fn rejects_bad_drag_term() {
        let line1 = replace(ISS_LINE1, 53, " 38792x4");
        assert!(matches!(
            validate(&line1, ISS_LINE2),
            Err(ValidationError::Field {
                line: 1,
                field: "drag term",
                ..
            })
        ));
    }

    #[rstest]
    #[case(" 38792-4", 0.38792e-4)]
    #[case("-11606-4", -0.11606e-4)]
    #[case(" 00000-0", 0.0)]
    #[case(" 13844-3", 0.13844e-3)]
    #[case(" 12345+1", 1.2345)]
    fn exponent_notation(#[case] field: &str, #[case] expected: f64) {
        let value = parse_exponent(field, 1, "drag term").unwrap();
        assert!((value - expected).abs() <= 1e-15 * expected.abs().max(1.0));
    }

    #[test]
    fn never_panics_on_garbage() {
        for (l1, l2) in [
            ("", ""),
            ("1", "2"),
            ("1 ééééééééééééééééééééééééééééééééééééééééééééééééééééééééééééééééééé", ISS_LINE2),
            (&"1".repeat(69), &"2".repeat(69)),
        ] {
            assert!(!is_valid(l1, l2));
        }
    }
}
