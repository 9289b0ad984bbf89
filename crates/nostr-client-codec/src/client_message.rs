use serde_json::Value;

use nostr_client_types::{Event, Filter};

use crate::error::DecodeError;

/// A message sent from client to relay, per NIP-01.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    Req { sub_id: String, filters: Vec<Filter> },
    Count { sub_id: String, filters: Vec<Filter> },
    Close { sub_id: String },
    Event { event: Event },
}

impl ClientMessage {
    /// Encodes this message to its wire JSON form, e.g. `["REQ","sub",{...}]`.
    pub fn to_json(&self) -> String {
        let value = match self {
            ClientMessage::Req { sub_id, filters } => {
                let mut arr = vec![Value::String("REQ".into()), Value::String(sub_id.clone())];
                arr.extend(filters.iter().map(|f| serde_json::to_value(f).expect("filter serializes")));
                Value::Array(arr)
            }
            ClientMessage::Count { sub_id, filters } => {
                let mut arr = vec![Value::String("COUNT".into()), Value::String(sub_id.clone())];
                arr.extend(filters.iter().map(|f| serde_json::to_value(f).expect("filter serializes")));
                Value::Array(arr)
            }
            ClientMessage::Close { sub_id } => {
                Value::Array(vec![Value::String("CLOSE".into()), Value::String(sub_id.clone())])
            }
            ClientMessage::Event { event } => Value::Array(vec![
                Value::String("EVENT".into()),
                serde_json::to_value(event).expect("event serializes"),
            ]),
        };
        serde_json::to_string(&value).expect("wire message serializes")
    }

    pub fn from_json(raw: &str) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(raw).map_err(|source| DecodeError::MalformedJson {
            source,
            raw: raw.to_string(),
        })?;
        let arr = value.as_array().ok_or(DecodeError::NotAnArray)?;
        let label = arr.first().and_then(Value::as_str).ok_or(DecodeError::MissingLabel)?;

        match label {
            "REQ" => {
                let sub_id = sub_id_at(arr, 1)?;
                let filters = filters_from(arr, 2)?;
                Ok(ClientMessage::Req { sub_id, filters })
            }
            "COUNT" => {
                let sub_id = sub_id_at(arr, 1)?;
                let filters = filters_from(arr, 2)?;
                Ok(ClientMessage::Count { sub_id, filters })
            }
            "CLOSE" => {
                let sub_id = sub_id_at(arr, 1)?;
                Ok(ClientMessage::Close { sub_id })
            }
            "EVENT" => {
                let raw_event = arr.get(1).ok_or(DecodeError::MissingField("event"))?;
                let event: Event = serde_json::from_value(raw_event.clone()).map_err(|e| DecodeError::WrongShape {
                    field: "event",
                    detail: e.to_string(),
                })?;
                Ok(ClientMessage::Event { event })
            }
            other => Err(DecodeError::UnknownType(other.to_string())),
        }
    }
}

fn sub_id_at(arr: &[Value], idx: usize) -> Result<String, DecodeError> {
    arr.get(idx)
        .and_then(Value::as_str)
        .map(|s| s.to_string())
        .ok_or(DecodeError::MissingField("subscription id"))
}

fn filters_from(arr: &[Value], start: usize) -> Result<Vec<Filter>, DecodeError> {
    arr[start.min(arr.len())..]
        .iter()
        .map(|v| {
            serde_json::from_value(v.clone()).map_err(|e| DecodeError::WrongShape {
                field: "filter",
                detail: e.to_string(),
            })
        })
        .collect()
}
