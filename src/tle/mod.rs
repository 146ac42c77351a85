mod error;
mod export;
mod parsing;
pub mod validate;

pub use error::ValidationError;
pub use export::export_tle;
pub use parsing::{parse_multi_tle, parse_tle_lines, TleText};
pub use validate::{is_valid, validate};
