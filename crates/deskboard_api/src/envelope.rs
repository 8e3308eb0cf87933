use serde_json::Value;

use crate::{ApiError, Record};

/// One page of a listing, normalised from whatever shape the server sent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub records: Vec<Record>,
    /// Server-reported number of records matching the query
    pub total: usize,
}

impl Page {
    /// Accepts `{ "data": [...], "total": n }`, `{ "data": [...] }` or a bare
    /// array. A missing or zero total falls back to the number of records.
    pub fn from_json(body: Value) -> Result<Self, ApiError> {
        let (items, total) = match body {
            Value::Array(items) => (items, None),
            Value::Object(mut envelope) => {
                let total = envelope.get("total").and_then(Value::as_u64);
                match envelope.remove("data") {
                    Some(Value::Array(items)) => (items, total),
                    Some(_) => {
                        return Err(ApiError::UnexpectedShape(
                            "`data` is not an array",
                        ));
                    }
                    None => {
                        return Err(ApiError::UnexpectedShape(
                            "listing response has no `data` array",
                        ));
                    }
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                return Err(ApiError::UnexpectedShape(
                    "listing response is not an object or array",
                ));
            }
        };

        let records = items
            .into_iter()
            .map(Record::from_value)
            .collect::<Result<Vec<_>, _>>()?;
        let total = total
            .and_then(|t| usize::try_from(t).ok())
            .filter(|&t| t > 0)
            .unwrap_or(records.len());

        Ok(Self { records, total })
    }
}

/// Pull the record out of a write response, which may or may not wrap it in
/// `{ "data": {...} }`. Only objects carrying `_id` or `id` count as records;
/// empty bodies and acknowledgements yield `None`.
#[must_use]
pub fn written_record(body: Value) -> Option<Record> {
    let record = match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Object(inner)) => Record::from(inner),
            Some(_) => return None,
            None => Record::from(map),
        },
        Value::Null
        | Value::Bool(_)
        | Value::Number(_)
        | Value::String(_)
        | Value::Array(_) => return None,
    };
    record.id().is_some().then_some(record)
}
