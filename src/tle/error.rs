use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("line {line}: expected 69 columns, found {length}")]
    LineLength { line: u8, length: usize },
    #[error("line {line}: must start with '{line} '")]
    LineNumber { line: u8 },
    #[error("line {line}: non-ASCII character in TLE text")]
    NotAscii { line: u8 },
    #[error("line {line}: checksum mismatch (column 69 is {found}, computed {expected})")]
    Checksum { line: u8, expected: u8, found: char },
    #[error("catalog numbers differ between lines ('{line1}' / '{line2}')")]
    CatalogMismatch { line1: String, line2: String },
    #[error("line {line}: invalid {field} field '{value}'")]
    Field {
        line: u8,
        field: &'static str,
        value: String,
    },
    #[error("{field} = {value} is out of range")]
    OutOfRange { field: &'static str, value: f64 },
    #[error("rejected by the SGP4 parser: {0}")]
    Rejected(String),
    #[error("invalid tle format")]
    Format,
}

impl From<sgp4::TleError> for ValidationError {
    fn from(err: sgp4::TleError) -> Self {
        ValidationError::Rejected(err.to_string())
    }
}
