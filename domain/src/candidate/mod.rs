//! Candidate workflows and the parser that extracts them from completions.

pub mod entities;
pub mod parsing;

pub use entities::{Candidate, Feasibility, ParsedResponse};
pub use parsing::{MalformedResponse, TABLE_COLUMNS, parse_response, try_parse_response};
