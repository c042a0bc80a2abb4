//! Plan file ingestion: raw upload bytes to validated room assignments.

pub mod decoder;
pub mod parser;

pub use decoder::{decode_plan_bytes, DecodedText, TextEncoding};
pub use parser::{parse_plan, ParsedPlan, PlanRecord};
