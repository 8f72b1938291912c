//! Decoding of the public data portal's parking-facility records.
//!
//! The portal answers with `{"page":..,"perPage":..,"data":[...]}`; some
//! mirrors return the bare list. Field names are the dataset's Korean
//! column headers.

use parkrace_lot::{CapacityError, LotCounters, ParkingLot};
use serde::Deserialize;
use serde_json::Value;

use crate::SourceError;

/// One row of the upstream dataset.
#[derive(Debug, Deserialize)]
struct LotRecord {
    #[serde(rename = "순번")]
    sequence: u32,
    #[serde(rename = "대지위치주소")]
    address: String,
    #[serde(rename = "건축면적")]
    floor_area: FloorArea,
    #[serde(rename = "옥내 기계식 주차대수")]
    indoor_mechanical: u32,
    #[serde(rename = "옥외 기계식 주차대수")]
    outdoor_mechanical: u32,
    #[serde(rename = "옥내 자주식 주차대수")]
    indoor_self_park: u32,
    #[serde(rename = "옥외 자주식 주차대수")]
    outdoor_self_park: u32,
    #[serde(rename = "총 주차대수")]
    total_capacity: u32,
}

/// The dataset publishes floor area as text in some revisions and as a
/// number in others.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FloorArea {
    Text(String),
    Number(serde_json::Number),
}

impl FloorArea {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Number(n) => n.to_string(),
        }
    }
}

impl TryFrom<LotRecord> for ParkingLot {
    type Error = CapacityError;

    fn try_from(record: LotRecord) -> Result<Self, Self::Error> {
        let counters = LotCounters::new(
            record.indoor_mechanical,
            record.outdoor_mechanical,
            record.indoor_self_park,
            record.outdoor_self_park,
        );
        ParkingLot::try_new(
            record.sequence,
            record.address,
            record.floor_area.into_string(),
            counters,
            record.total_capacity,
        )
    }
}

/// Why a single upstream record was skipped.
#[derive(Debug, thiserror::Error)]
enum RecordError {
    #[error(transparent)]
    Schema(#[from] serde_json::Error),

    #[error(transparent)]
    Capacity(#[from] CapacityError),
}

fn decode_record(raw: Value) -> Result<ParkingLot, RecordError> {
    let record: LotRecord = serde_json::from_value(raw)?;
    Ok(ParkingLot::try_from(record)?)
}

/// Decodes an upstream response body into lots, in upstream order.
///
/// Individual records that don't match the dataset schema, or whose
/// capacity counters overflow or exceed [`parkrace_lot::MAX_LOT_SPACES`],
/// are skipped with a warning; the remaining records are still returned.
///
/// # Errors
/// - [`SourceError::Decode`]: the body is not JSON
/// - [`SourceError::UnexpectedShape`]: JSON, but no record list in it
pub fn decode_lots(body: &[u8]) -> Result<Vec<ParkingLot>, SourceError> {
    let value: Value = serde_json::from_slice(body)?;

    let records = match value {
        Value::Array(records) => records,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(records)) => records,
            _ => {
                return Err(SourceError::UnexpectedShape(
                    "object without a `data` array".into(),
                ));
            }
        },
        other => {
            return Err(SourceError::UnexpectedShape(format!(
                "expected object or array, got {}",
                json_kind(&other)
            )));
        }
    };

    let mut lots = Vec::with_capacity(records.len());
    for (index, raw) in records.into_iter().enumerate() {
        match decode_record(raw) {
            Ok(lot) => lots.push(lot),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping malformed lot record");
            }
        }
    }

    Ok(lots)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
