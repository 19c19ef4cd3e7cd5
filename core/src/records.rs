//! Composite profile fields that the API expects as comma-joined strings.

use crate::error::{Error, Result};
use crate::value::{CallArguments, Record, Value};

/// A profile argument holding one record or a sequence of records, each
/// serialized as its required fields joined with commas.
pub(crate) struct CompositeField {
    key: &'static str,
    fields: &'static [&'static str],
    invalid: fn(String) -> Error,
}

pub(crate) const EDUCATION: CompositeField = CompositeField {
    key: "education",
    fields: &["school", "degree", "description", "start_year", "end_year"],
    invalid: |field| Error::InvalidEducationRecord { field },
};

pub(crate) const PREVIOUS_COMPANIES: CompositeField = CompositeField {
    key: "previous_companies",
    fields: &["company", "position", "description", "start_year", "end_year"],
    invalid: |field| Error::InvalidPreviousCompanyRecord { field },
};

impl CompositeField {
    /// Replace the field's records with a sequence of formatted strings.
    ///
    /// Absent input or an empty sequence removes the key. Every record must
    /// carry all required fields, so an empty record is invalid, and so is
    /// any value that is neither a record nor a sequence of records.
    pub(crate) fn apply(&self, mut arguments: CallArguments) -> Result<CallArguments> {
        let records = match arguments.remove(self.key) {
            None | Some(Value::Absent) => return Ok(arguments),
            Some(Value::Record(record)) => vec![Value::Record(record)],
            Some(Value::Sequence(items)) => items,
            Some(_) => return Err(self.missing_first_field()),
        };
        if records.is_empty() {
            return Ok(arguments);
        }

        let formatted = records
            .iter()
            .map(|value| match value {
                Value::Record(record) => self.format(record),
                _ => Err(self.missing_first_field()),
            })
            .collect::<Result<Vec<_>>>()?;
        arguments.insert(self.key, formatted);
        Ok(arguments)
    }

    fn missing_first_field(&self) -> Error {
        (self.invalid)(self.fields[0].to_string())
    }

    fn format(&self, record: &Record) -> Result<String> {
        let parts = self
            .fields
            .iter()
            .map(|field| {
                record
                    .get(*field)
                    .and_then(scalar_text)
                    .ok_or_else(|| (self.invalid)(field.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(parts.join(","))
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
