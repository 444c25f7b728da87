// Copy vs alias: numbers are copied when assigned or passed, records are shared

pub mod cli;
pub mod config;
pub mod demos;
pub mod record;

pub use config::{ConfigError, Literals};
pub use demos::{run, Demo, DemoError, Observation, Printer};
pub use record::{FieldValue, Record, RecordError};
