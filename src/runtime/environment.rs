use std::{
    collections::VecDeque,
    io::{self, BufRead, Write},
};

use tracing::warn;

use crate::errors::errors::ErrorImpl;

use super::value::Value;

/// The outside world as seen by a running program: a source of input values
/// for `raid` and a sink for `exodus`.
pub trait Environment {
    fn read_input(&mut self) -> Result<Value, ErrorImpl>;
    fn add_result(&mut self, value: Value);
}

/// Turns a line of input into a value: an Int when it parses as one,
/// otherwise the trimmed text.
pub fn parse_input(line: &str) -> Value {
    let line = line.trim();
    match line.parse::<i64>() {
        Ok(value) => Value::Int(value),
        Err(_) => Value::String(line.to_string()),
    }
}

/// Reads input lines from a reader and prints each result on its own line.
pub struct ConsoleEnvironment<R, W> {
    reader: R,
    writer: W,
}

impl ConsoleEnvironment<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        ConsoleEnvironment::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleEnvironment<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        ConsoleEnvironment { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<R: BufRead, W: Write> Environment for ConsoleEnvironment<R, W> {
    fn read_input(&mut self) -> Result<Value, ErrorImpl> {
        self.writer.flush().map_err(|error| ErrorImpl::InputError {
            message: error.to_string(),
        })?;

        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .map_err(|error| ErrorImpl::InputError {
                message: error.to_string(),
            })?;

        if read == 0 {
            return Err(ErrorImpl::MissingInput);
        }

        Ok(parse_input(&line))
    }

    fn add_result(&mut self, value: Value) {
        if let Err(error) = writeln!(self.writer, "{}", value) {
            warn!(%error, "failed to write program output");
        }
    }
}

/// Deterministic environment: serves inputs from a fixed queue and records
/// every result.
#[derive(Debug, Default)]
pub struct FakeEnvironment {
    inputs: VecDeque<Value>,
    results: Vec<Value>,
}

impl FakeEnvironment {
    pub fn new(inputs: Vec<Value>) -> Self {
        FakeEnvironment {
            inputs: inputs.into(),
            results: vec![],
        }
    }

    pub fn results(&self) -> &[Value] {
        &self.results
    }

    pub fn into_results(self) -> Vec<Value> {
        self.results
    }
}

impl Environment for FakeEnvironment {
    fn read_input(&mut self) -> Result<Value, ErrorImpl> {
        self.inputs.pop_front().ok_or(ErrorImpl::MissingInput)
    }

    fn add_result(&mut self, value: Value) {
        self.results.push(value);
    }
}
