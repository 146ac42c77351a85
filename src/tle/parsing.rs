use serde::Serialize;

use crate::tle::error::ValidationError;
use crate::tle::validate::validate;

/// One TLE pair as found in a text block, with the optional title line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TleText {
    pub name: Option<String>,
    pub line1: String,
    pub line2: String,
}

/// Splits a single 2-line or 3-line (named) TLE block.
pub fn parse_tle_lines(tle: &str) -> Result<TleText, ValidationError> {
    let lines: Vec<&str> = tle.lines().map(|l| l.trim()).filter(|l| !l.is_empty()).collect();

    match lines.as_slice() {
        [line1, line2] => Ok(TleText {
            name: None,
            line1: line1.to_string(),
            line2: line2.to_string(),
        }),
        [name, line1, line2] => Ok(TleText {
            name: Some(title(name)),
            line1: line1.to_string(),
            line2: line2.to_string(),
        }),
        _ => Err(ValidationError::Format),
    }
}

/// Parses catalog text holding any number of 2-line or 3-line entries.
/// Lines that belong to no entry are skipped. Entries failing validation are
/// kept, with a warning, so callers can report them.
pub fn parse_multi_tle(content: &str) -> Vec<TleText> {
    let mut lines = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .peekable();

    let mut entries = Vec::new();
    let mut pending_name: Option<&str> = None;

    while let Some(line) = lines.next() {
        let starts_pair =
            line.starts_with("1 ") && lines.peek().is_some_and(|next| next.starts_with("2 "));
        if !starts_pair {
            if let Some(stray) = pending_name.replace(line) {
                log::warn!("skipping stray catalog line: {}", stray);
            }
            continue;
        }
        let Some(line2) = lines.next() else {
            break;
        };

        let entry = TleText {
            name: pending_name.take().map(title),
            line1: line.to_string(),
            line2: line2.to_string(),
        };
        if let Err(e) = validate(&entry.line1, &entry.line2) {
            let label = entry.name.as_deref().unwrap_or(&entry.line1);
            log::warn!("rejected TLE {}: {}", label, e);
        }
        entries.push(entry);
    }

    if let Some(stray) = pending_name {
        log::warn!("skipping stray catalog line: {}", stray);
    }
    entries
}

/// Title line, without the "0 " prefix of the three-line format.
fn title(line: &str) -> String {
    line.strip_prefix("0 ").unwrap_or(line).trim().to_string()
}
