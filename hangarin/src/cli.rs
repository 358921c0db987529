// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use thiserror::Error;

use crate::seed::DEFAULT_TASK_COUNT;

pub const USAGE: &str = "\
Seed Hangarin with fake data (Tasks, SubTasks, Notes)

Usage: seed_hangarin [--tasks <N>] [--seed <U64>]

Options:
  --tasks <N>    Number of tasks to create [default: 10]
  --seed <U64>   Seed for the random generator, for reproducible runs
  -h, --help     Print this help

Environment:
  HANGARIN_DATABASE_URL   SQLite URL [default: sqlite://database/hangarin.db]
  RUST_LOG                Log filter, e.g. info or hangarin=debug";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedArgs {
    pub tasks: usize,
    pub seed: Option<u64>,
}

impl Default for SeedArgs {
    fn default() -> Self {
        Self {
            tasks: DEFAULT_TASK_COUNT,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Seed(SeedArgs),
    Help,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgsError {
    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("missing value for {0}")]
    MissingValue(&'static str),

    #[error("invalid value '{value}' for {option}: expected {expected}")]
    InvalidValue {
        option: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Parses the arguments that follow the program name.
pub fn parse_args<I>(args: I) -> Result<Command, ArgsError>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = SeedArgs::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        let (name, inline_value) = match arg.split_once('=') {
            Some((name, value)) => (name.to_string(), Some(value.to_string())),
            None => (arg.clone(), None),
        };

        match name.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--tasks" => {
                let value = inline_value
                    .or_else(|| args.next())
                    .ok_or(ArgsError::MissingValue("--tasks"))?;
                parsed.tasks = parse_number("--tasks", &value, "a non-negative integer")?;
            }
            "--seed" => {
                let value = inline_value
                    .or_else(|| args.next())
                    .ok_or(ArgsError::MissingValue("--seed"))?;
                parsed.seed = Some(parse_number("--seed", &value, "an unsigned 64-bit integer")?);
            }
            _ => return Err(ArgsError::UnknownOption(name)),
        }
    }

    Ok(Command::Seed(parsed))
}

fn parse_number<T: std::str::FromStr>(
    option: &'static str,
    value: &str,
    expected: &'static str,
) -> Result<T, ArgsError> {
    value.parse().map_err(|_| ArgsError::InvalidValue {
        option,
        value: value.to_string(),
        expected,
    })
}
