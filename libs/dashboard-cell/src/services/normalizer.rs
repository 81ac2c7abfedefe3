//! Turns raw API payloads into keyed rows.
//!
//! The list endpoints disagree on shape: psychologists and users come wrapped
//! as `{"data": [...]}`, consultations come as a bare array.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::DashboardError;
use crate::models::{Consultation, Psychologist, Record, Row, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// `{"data": [...]}`; anything else under `data` is a shape error.
    DataField,
    /// Like `DataField`, but an absent or null `data` reads as an empty list.
    OptionalDataField,
    /// `[...]` at the top level.
    BareArray,
}

pub fn normalize<T>(payload: Value, shape: PayloadShape, resource: &str) -> Result<Vec<Row<T>>, DashboardError>
where
    T: DeserializeOwned + Record,
{
    let items = match (shape, payload) {
        (PayloadShape::BareArray, Value::Array(items)) => items,
        (PayloadShape::DataField | PayloadShape::OptionalDataField, Value::Object(mut body)) => {
            match body.remove("data") {
                Some(Value::Array(items)) => items,
                None | Some(Value::Null) if shape == PayloadShape::OptionalDataField => Vec::new(),
                _ => return Err(expected_array_of(resource)),
            }
        }
        (PayloadShape::OptionalDataField, Value::Null) => Vec::new(),
        _ => return Err(expected_array_of(resource)),
    };

    let rows = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<T>(item)
                .map(Row::new)
                .map_err(|e| DashboardError::Shape(format!("Malformed {} record at index {}: {}", resource, index, e)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!("Normalized {} {} records", rows.len(), resource);
    Ok(rows)
}

fn expected_array_of(resource: &str) -> DashboardError {
    DashboardError::Shape(format!("Expected an array of {}", resource))
}

pub fn psychologists(payload: Value) -> Result<Vec<Row<Psychologist>>, DashboardError> {
    normalize(payload, PayloadShape::DataField, "psychologists")
}

pub fn users(payload: Value) -> Result<Vec<Row<User>>, DashboardError> {
    normalize(payload, PayloadShape::DataField, "users")
}

pub fn consultations(payload: Value) -> Result<Vec<Row<Consultation>>, DashboardError> {
    normalize(payload, PayloadShape::BareArray, "consultations")
}
