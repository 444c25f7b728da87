// Copy vs alias: the four demonstration blocks

use crate::config::{ConfigError, Literals};
use crate::record::{Record, RecordError};
use clap::ValueEnum;
use log::debug;
use serde::Serialize;
use std::io::{self, Write};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DemoError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("incrementing {value} overflows")]
    Overflow { value: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Demo {
    NumericAssignment,
    NumericParameter,
    RecordAssignment,
    RecordParameter,
}

impl Demo {
    pub const ALL: [Demo; 4] = [
        Demo::NumericAssignment,
        Demo::NumericParameter,
        Demo::RecordAssignment,
        Demo::RecordParameter,
    ];

    pub fn description(self) -> &'static str {
        match self {
            Demo::NumericAssignment => "assigning a number copies it",
            Demo::NumericParameter => "passing a number to a function copies it",
            Demo::RecordAssignment => "assigning a record copies the handle, not the record",
            Demo::RecordParameter => "passing a record to a function shares it with the caller",
        }
    }

    pub fn execute<W: Write>(self, literals: &Literals, out: &mut W) -> Result<Observation, DemoError> {
        debug!("running {:?}", self);
        match self {
            Demo::NumericAssignment => numeric_assignment(literals, out),
            Demo::NumericParameter => numeric_parameter(literals, out),
            Demo::RecordAssignment => record_assignment(literals, out),
            Demo::RecordParameter => record_parameter(literals, out),
        }
    }

    /// Canonical execution order for a selection. Empty means every block.
    pub fn ordered(selection: &[Demo]) -> Vec<Demo> {
        if selection.is_empty() {
            return Demo::ALL.to_vec();
        }
        Demo::ALL
            .into_iter()
            .filter(|demo| selection.contains(demo))
            .collect()
    }
}

/// What a block printed, and whether the source's mutation reached the copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Observation {
    pub demo: Demo,
    pub lines: Vec<String>,
    pub mutation_visible: bool,
}

/// Writes lines to the sink and remembers exactly what was written.
pub struct Printer<'a, W: Write> {
    out: &'a mut W,
    lines: Vec<String>,
}

impl<'a, W: Write> Printer<'a, W> {
    pub fn new(out: &'a mut W) -> Self {
        Self { out, lines: Vec::new() }
    }

    pub fn print(&mut self, value: impl ToString) -> io::Result<()> {
        let line = value.to_string();
        writeln!(self.out, "{}", line)?;
        self.lines.push(line);
        Ok(())
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    fn finish(self, demo: Demo, mutation_visible: bool) -> Observation {
        Observation {
            demo,
            lines: self.lines,
            mutation_visible,
        }
    }
}

// =============================================================================
// Numbers: copied on assignment and on call
// =============================================================================

pub fn numeric_assignment<W: Write>(literals: &Literals, out: &mut W) -> Result<Observation, DemoError> {
    let mut printer = Printer::new(out);

    let mut first = literals.initial_number;
    let second = first;
    first = literals.reassigned_number;
    debug!("first = {}, second = {}", first, second);

    printer.print(second)?;
    Ok(printer.finish(Demo::NumericAssignment, second == first))
}

/// Takes `number` by value, so the increment only touches this function's copy.
pub fn increase_number<W: Write>(mut number: i64, printer: &mut Printer<'_, W>) -> Result<i64, DemoError> {
    number = number
        .checked_add(1)
        .ok_or(DemoError::Overflow { value: number })?;
    printer.print(number)?;
    Ok(number)
}

pub fn numeric_parameter<W: Write>(literals: &Literals, out: &mut W) -> Result<Observation, DemoError> {
    let mut printer = Printer::new(out);

    let number = literals.parameter_number;
    let inside = increase_number(number, &mut printer)?;

    printer.print(number)?;
    Ok(printer.finish(Demo::NumericParameter, number == inside))
}

// =============================================================================
// Records: the handle is copied, the storage is shared
// =============================================================================

pub fn record_assignment<W: Write>(literals: &Literals, out: &mut W) -> Result<Observation, DemoError> {
    let mut printer = Printer::new(out);

    let first = Record::new().with_field("name", literals.original_name.as_str());
    let second = first.clone();
    first.set("name", literals.replacement_name.as_str());
    debug!("record handles: {}", second.handle_count());

    printer.print(&second)?;
    Ok(printer.finish(Demo::RecordAssignment, second.get("name") == first.get("name")))
}

/// Takes the handle by value. The record behind it is the caller's record.
pub fn increase_record_value<W: Write>(record: Record, printer: &mut Printer<'_, W>) -> Result<(), DemoError> {
    record.increment("value")?;
    printer.print(&record)?;
    Ok(())
}

pub fn record_parameter<W: Write>(literals: &Literals, out: &mut W) -> Result<Observation, DemoError> {
    let mut printer = Printer::new(out);

    let record = Record::new().with_field("value", literals.initial_value);
    let before = record.detached();
    increase_record_value(record.clone(), &mut printer)?;

    printer.print(&record)?;
    let changed = record.get("value") != before.get("value");
    Ok(printer.finish(Demo::RecordParameter, changed))
}

/// Runs the selected blocks in canonical order, writing their output to `out`.
pub fn run<W: Write>(literals: &Literals, selection: &[Demo], out: &mut W) -> Result<Vec<Observation>, DemoError> {
    Demo::ordered(selection)
        .into_iter()
        .map(|demo| demo.execute(literals, out))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output_of(selection: &[Demo], literals: &Literals) -> String {
        let mut out = Vec::new();
        run(literals, selection, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_full_run_prints_six_lines() {
        let output = output_of(&[], &Literals::default());
        assert_eq!(
            output,
            "5\n11\n10\n{ name: 'Mark' }\n{ value: 2 }\n{ value: 2 }\n"
        );
    }

    #[test]
    fn test_observations_match_printed_lines() {
        let mut out = Vec::new();
        let observations = run(&Literals::default(), &[], &mut out).unwrap();
        let printed: Vec<String> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect();
        let observed: Vec<String> = observations
            .iter()
            .flat_map(|obs| obs.lines.clone())
            .collect();

        assert_eq!(printed, observed);
    }

    #[test]
    fn test_numbers_never_alias() {
        let mut sink = io::sink();
        let assignment = numeric_assignment(&Literals::default(), &mut sink).unwrap();
        let parameter = numeric_parameter(&Literals::default(), &mut sink).unwrap();

        assert_eq!(assignment.lines, vec!["5"]);
        assert!(!assignment.mutation_visible);
        assert_eq!(parameter.lines, vec!["11", "10"]);
        assert!(!parameter.mutation_visible);
    }

    #[test]
    fn test_records_always_alias() {
        let mut sink = io::sink();
        let assignment = record_assignment(&Literals::default(), &mut sink).unwrap();
        let parameter = record_parameter(&Literals::default(), &mut sink).unwrap();

        assert_eq!(assignment.lines, vec!["{ name: 'Mark' }"]);
        assert!(assignment.mutation_visible);
        assert_eq!(parameter.lines, vec!["{ value: 2 }", "{ value: 2 }"]);
        assert!(parameter.mutation_visible);
    }

    #[test]
    fn test_increase_number_leaves_caller_alone() {
        let mut out = Vec::new();
        let mut printer = Printer::new(&mut out);
        let number = 10;
        let inside = increase_number(number, &mut printer).unwrap();

        assert_eq!(inside, 11);
        assert_eq!(number, 10);
        assert_eq!(printer.lines(), ["11"]);
        assert_eq!(out, b"11\n");
    }

    #[test]
    fn test_increase_number_overflow() {
        let mut sink = io::sink();
        let err = increase_number(i64::MAX, &mut Printer::new(&mut sink)).unwrap_err();
        assert!(matches!(err, DemoError::Overflow { value: i64::MAX }));
    }

    #[test]
    fn test_increase_record_value_reaches_caller() {
        let record = Record::new().with_field("value", 1);
        let mut out = Vec::new();
        increase_record_value(record.clone(), &mut Printer::new(&mut out)).unwrap();

        assert_eq!(record.to_string(), "{ value: 2 }");
        assert_eq!(out, b"{ value: 2 }\n");
        assert_eq!(record.handle_count(), 1);
    }

    #[test]
    fn test_printer_records_what_the_callee_wrote() {
        let record = Record::new().with_field("value", 1);
        let mut out = Vec::new();
        let mut printer = Printer::new(&mut out);
        increase_record_value(record.detached(), &mut printer).unwrap();
        printer.print(&record).unwrap();

        let lines = printer.lines().to_vec();
        assert_eq!(lines, ["{ value: 2 }", "{ value: 1 }"]);
        assert_eq!(String::from_utf8(out).unwrap(), "{ value: 2 }\n{ value: 1 }\n");
    }

    #[test]
    fn test_increase_record_value_without_field() {
        let record = Record::new().with_field("name", "John");
        let mut sink = io::sink();
        let err = increase_record_value(record, &mut Printer::new(&mut sink)).unwrap_err();
        assert!(matches!(err, DemoError::Record(RecordError::MissingField { .. })));
    }

    #[test]
    fn test_selection_runs_in_canonical_order() {
        let output = output_of(
            &[Demo::RecordParameter, Demo::NumericAssignment],
            &Literals::default(),
        );
        assert_eq!(output, "5\n{ value: 2 }\n{ value: 2 }\n");
    }

    #[test]
    fn test_custom_literals() {
        let literals = Literals {
            initial_number: 1,
            reassigned_number: 2,
            parameter_number: 41,
            original_name: "Ann".into(),
            replacement_name: "Bob".into(),
            initial_value: 9,
        };
        let output = output_of(&[], &literals);
        assert_eq!(output, "1\n42\n41\n{ name: 'Bob' }\n{ value: 10 }\n{ value: 10 }\n");
    }

    #[test]
    fn test_numeric_copy_ignores_source_mutation() {
        let literals = Literals {
            initial_number: 3,
            reassigned_number: 4,
            parameter_number: -1,
            ..Literals::default()
        };
        let assignment = numeric_assignment(&literals, &mut io::sink()).unwrap();
        let parameter = numeric_parameter(&literals, &mut io::sink()).unwrap();

        assert_eq!(assignment.lines, ["3"]);
        assert!(!assignment.mutation_visible);
        assert_eq!(parameter.lines, ["0", "-1"]);
        assert!(!parameter.mutation_visible);
    }

    #[test]
    fn test_observation_json() {
        let obs = numeric_assignment(&Literals::default(), &mut io::sink()).unwrap();
        let json = serde_json::to_value(&obs).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "demo": "numeric-assignment",
                "lines": ["5"],
                "mutation_visible": false
            })
        );
    }
}
