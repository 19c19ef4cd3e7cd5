//! Conversion of call arguments into flat wire parameters.
//!
//! # Design
//! A [`Pipeline`] is an ordered list of [`Stage`]s. Each stage maps
//! [`CallArguments`] to [`CallArguments`] and only rewrites entries whose
//! value has the tag it handles, leaving the rest untouched. After the last
//! stage, the result is checked and lowered into [`FlatParameters`].
//!
//! Order matters:
//! - identifiers resolve before anything flattens, so `{"id": 7}` under
//!   `group_id` becomes `group_id=7` and not `group_id_id=7`;
//! - booleans stringify after flattening, so booleans inside sequences and
//!   records are converted too;
//! - absent values are dropped last, including ones exposed by flattening.

use tracing::trace;

use crate::error::{Error, Result};
use crate::identifier::{is_identifier_key, resolve};
use crate::records;
use crate::value::{CallArguments, FlatParameters, Param, Value};

/// One transformation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Format `education` records into strings.
    Education,
    /// Format `previous_companies` records into strings.
    PreviousCompanies,
    /// Replace identifier references with their ids.
    ResolveIdentifiers,
    /// `key: [a, b]` becomes `key1: a, key2: b`.
    FlattenSequences,
    /// `key: {a: x}` becomes `key_a: x`. One level per pass.
    FlattenRecords,
    /// Booleans become `"true"` / `"false"`.
    StringifyBooleans,
    /// Absent values are removed.
    DropAbsent,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Education => "education",
            Stage::PreviousCompanies => "previous_companies",
            Stage::ResolveIdentifiers => "resolve_identifiers",
            Stage::FlattenSequences => "flatten_sequences",
            Stage::FlattenRecords => "flatten_records",
            Stage::StringifyBooleans => "stringify_booleans",
            Stage::DropAbsent => "drop_absent",
        }
    }

    pub fn apply(&self, arguments: CallArguments) -> Result<CallArguments> {
        match self {
            Stage::Education => records::EDUCATION.apply(arguments),
            Stage::PreviousCompanies => records::PREVIOUS_COMPANIES.apply(arguments),
            Stage::ResolveIdentifiers => Ok(resolve_identifiers(arguments)),
            Stage::FlattenSequences => Ok(flatten_sequences(arguments)),
            Stage::FlattenRecords => Ok(flatten_records(arguments)),
            Stage::StringifyBooleans => Ok(stringify_booleans(arguments)),
            Stage::DropAbsent => Ok(drop_absent(arguments)),
        }
    }
}

/// An ordered composition of stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pipeline {
    stages: &'static [Stage],
}

impl Pipeline {
    /// The generic stages in canonical order.
    pub const STANDARD: Pipeline = Pipeline::new(&[
        Stage::ResolveIdentifiers,
        Stage::FlattenSequences,
        Stage::FlattenRecords,
        Stage::StringifyBooleans,
        Stage::DropAbsent,
    ]);

    /// Profile record formatting followed by the generic stages.
    pub const USERS: Pipeline = Pipeline::new(&[
        Stage::Education,
        Stage::PreviousCompanies,
        Stage::ResolveIdentifiers,
        Stage::FlattenSequences,
        Stage::FlattenRecords,
        Stage::StringifyBooleans,
        Stage::DropAbsent,
    ]);

    /// Group calls only take scalars and references.
    pub const GROUPS: Pipeline = Pipeline::new(&[
        Stage::ResolveIdentifiers,
        Stage::StringifyBooleans,
        Stage::DropAbsent,
    ]);

    pub const fn new(stages: &'static [Stage]) -> Self {
        Self { stages }
    }

    pub fn stages(&self) -> &'static [Stage] {
        self.stages
    }

    /// Run every stage in order.
    pub fn run(&self, arguments: CallArguments) -> Result<CallArguments> {
        self.stages.iter().try_fold(arguments, |arguments, stage| {
            let converted = stage.apply(arguments)?;
            trace!(stage = stage.name(), keys = converted.len(), "applied argument stage");
            Ok(converted)
        })
    }

    /// Run every stage, then lower the result into wire parameters.
    pub fn apply(&self, arguments: CallArguments) -> Result<FlatParameters> {
        finish(self.run(arguments)?)
    }
}

/// Rebuild `arguments`, letting `f` replace each entry with any number of
/// entries.
fn replace_each(
    arguments: CallArguments,
    mut f: impl FnMut(String, Value, &mut CallArguments),
) -> CallArguments {
    let mut result = CallArguments::new();
    for (key, value) in arguments {
        f(key, value, &mut result);
    }
    result
}

fn resolve_identifiers(arguments: CallArguments) -> CallArguments {
    replace_each(arguments, |key, value, out| {
        if is_identifier_key(&key) {
            out.insert(key, resolve(value));
        } else {
            out.insert(key, value);
        }
    })
}

/// Keys are visited in sorted order, so an explicit `topic1` is visited after
/// `topic` and replaces the expanded `topic1`.
fn flatten_sequences(arguments: CallArguments) -> CallArguments {
    replace_each(arguments, |key, value, out| match value {
        Value::Sequence(items) => {
            for (index, item) in items.into_iter().enumerate() {
                out.insert(format!("{key}{}", index + 1), item);
            }
        }
        other => out.insert(key, other),
    })
}

/// As with sequences, an explicit `og_url` replaces one expanded from `og`.
fn flatten_records(arguments: CallArguments) -> CallArguments {
    replace_each(arguments, |key, value, out| match value {
        Value::Record(record) => {
            for (field, item) in record {
                out.insert(format!("{key}_{field}"), item);
            }
        }
        other => out.insert(key, other),
    })
}

fn stringify_booleans(arguments: CallArguments) -> CallArguments {
    replace_each(arguments, |key, value, out| match value {
        Value::Bool(true) => out.insert(key, "true"),
        Value::Bool(false) => out.insert(key, "false"),
        other => out.insert(key, other),
    })
}

fn drop_absent(arguments: CallArguments) -> CallArguments {
    replace_each(arguments, |key, value, out| {
        if !value.is_absent() {
            out.insert(key, value);
        }
    })
}

/// Lower converted arguments into wire parameters. Anything that is not a
/// string or number at this point means the pipeline lacked a stage for it.
fn finish(arguments: CallArguments) -> Result<FlatParameters> {
    arguments
        .into_iter()
        .map(|(key, value)| match value {
            Value::String(s) => Ok((key, Param::String(s))),
            Value::Number(n) => Ok((key, Param::Number(n))),
            _ => Err(Error::UnflattenedArgument { key }),
        })
        .collect()
}
