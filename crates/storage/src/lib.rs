#![forbid(unsafe_code)]

pub mod json;
pub mod repository;
pub mod store;

pub use json::{HttpJsonSource, JsonFileSource, parse_records, source_for_location};
pub use repository::{InMemorySource, LoadError, QuestionRecord, QuestionSource};
pub use store::QuestionStore;
