// Command line: option parsing and the plain/JSON output switch

use crate::config::Literals;
use crate::demos::{Demo, DemoError, Observation};
use clap::Parser;
use colored::Colorize;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;

/// Shows which values are copied and which are shared when assigned or passed.
#[derive(Parser, Debug)]
#[command(name = "value-semantics", version)]
pub struct Cli {
    /// TOML file overriding the literal inputs
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the observations as JSON instead of the plain lines
    #[arg(long)]
    pub json: bool,

    /// Describe each block on stderr before it runs
    #[arg(long)]
    pub explain: bool,

    /// Blocks to run (default: all, always in canonical order)
    #[arg(value_enum)]
    pub demos: Vec<Demo>,
}

/// Runs the blocks `cli` selects. Plain lines, or the JSON report, go to `out`;
/// `--explain` headings go to `err`.
pub fn run<W: Write, E: Write>(cli: &Cli, out: &mut W, err: &mut E) -> Result<Vec<Observation>, DemoError> {
    let literals = match &cli.config {
        Some(path) => Literals::load(path)?,
        None => Literals::default(),
    };

    let mut sink = io::sink();
    let mut observations = Vec::new();
    for demo in Demo::ordered(&cli.demos) {
        if cli.explain {
            writeln!(err, "{} {}", "==>".cyan().bold(), demo.description().bold())?;
        }
        let observation = if cli.json {
            demo.execute(&literals, &mut sink)?
        } else {
            demo.execute(&literals, out)?
        };
        observations.push(observation);
    }

    if cli.json {
        serde_json::to_writer_pretty(&mut *out, &observations)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(observations)
}

/// Parses `args` and runs them, returning the process exit code.
pub fn main_with<I, T, W, E>(args: I, out: &mut W, err: &mut E) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    W: Write,
    E: Write,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            let rendered = e.render();
            let written = if e.use_stderr() {
                write!(err, "{}", rendered)
            } else {
                write!(out, "{}", rendered)
            };
            return if written.is_ok() { e.exit_code() } else { 1 };
        }
    };

    match run(&cli, out, err) {
        Ok(_) => 0,
        Err(e) => {
            let _ = writeln!(err, "{} {}", "error:".red().bold(), e);
            1
        }
    }
}
