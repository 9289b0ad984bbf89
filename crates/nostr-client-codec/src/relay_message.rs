use serde_json::Value;

use nostr_client_types::{Event, EventId};

use crate::error::DecodeError;

/// A message sent from relay to client, per NIP-01 plus the NIP-45 `COUNT`
/// reply.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayMessage {
    Event { sub_id: String, event: Event },
    Ok { event_id: EventId, accepted: bool, message: String },
    Eose { sub_id: String },
    Closed { sub_id: String, message: String },
    Notice { message: String },
    Count { sub_id: String, count: u64 },
}

impl RelayMessage {
    pub fn to_json(&self) -> String {
        let value = match self {
            RelayMessage::Event { sub_id, event } => Value::Array(vec![
                Value::String("EVENT".into()),
                Value::String(sub_id.clone()),
                serde_json::to_value(event).expect("event serializes"),
            ]),
            RelayMessage::Ok { event_id, accepted, message } => Value::Array(vec![
                Value::String("OK".into()),
                Value::String(event_id.to_hex()),
                Value::Bool(*accepted),
                Value::String(message.clone()),
            ]),
            RelayMessage::Eose { sub_id } => {
                Value::Array(vec![Value::String("EOSE".into()), Value::String(sub_id.clone())])
            }
            RelayMessage::Closed { sub_id, message } => Value::Array(vec![
                Value::String("CLOSED".into()),
                Value::String(sub_id.clone()),
                Value::String(message.clone()),
            ]),
            RelayMessage::Notice { message } => {
                Value::Array(vec![Value::String("NOTICE".into()), Value::String(message.clone())])
            }
            RelayMessage::Count { sub_id, count } => Value::Array(vec![
                Value::String("COUNT".into()),
                Value::String(sub_id.clone()),
                serde_json::json!({ "count": count }),
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
            "EVENT" => {
                let sub_id = str_at(arr, 1, "subscription id")?;
                let raw_event = arr.get(2).ok_or(DecodeError::MissingField("event"))?;
                let event: Event = serde_json::from_value(raw_event.clone()).map_err(|e| DecodeError::WrongShape {
                    field: "event",
                    detail: e.to_string(),
                })?;
                Ok(RelayMessage::Event { sub_id, event })
            }
            "OK" => {
                let id_hex = str_at(arr, 1, "event id")?;
                let event_id = EventId::from_hex(&id_hex).map_err(|e| DecodeError::WrongShape {
                    field: "event id",
                    detail: e.to_string(),
                })?;
                let accepted = arr.get(2).and_then(Value::as_bool).ok_or(DecodeError::MissingField("accepted"))?;
                let message = arr.get(3).and_then(Value::as_str).unwrap_or("").to_string();
                Ok(RelayMessage::Ok { event_id, accepted, message })
            }
            "EOSE" => {
                let sub_id = str_at(arr, 1, "subscription id")?;
                Ok(RelayMessage::Eose { sub_id })
            }
            "CLOSED" => {
                let sub_id = str_at(arr, 1, "subscription id")?;
                let message = arr.get(2).and_then(Value::as_str).unwrap_or("").to_string();
                Ok(RelayMessage::Closed { sub_id, message })
            }
            "NOTICE" => {
                let message = str_at(arr, 1, "message")?;
                Ok(RelayMessage::Notice { message })
            }
            "COUNT" => {
                let sub_id = str_at(arr, 1, "subscription id")?;
                let count = arr
                    .get(2)
                    .and_then(|v| v.get("count"))
                    .and_then(Value::as_u64)
                    .ok_or(DecodeError::MissingField("count"))?;
                Ok(RelayMessage::Count { sub_id, count })
            }
            other => Err(DecodeError::UnknownType(other.to_string())),
        }
    }
}

fn str_at(arr: &[Value], idx: usize, field: &'static str) -> Result<String, DecodeError> {
    arr.get(idx)
        .and_then(Value::as_str)
        .map(|s| s.to_string())
        .ok_or(DecodeError::MissingField(field))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_round_trips() {
        let msg = RelayMessage::Ok {
            event_id: EventId::from_hex(&"ab".repeat(32)).unwrap(),
            accepted: true,
            message: "".into(),
        };
        let back = RelayMessage::from_json(&msg.to_json()).unwrap();
        assert_eq!(msg, back);
    }

    #[test]
    fn eose_round_trips() {
        let msg = RelayMessage::Eose { sub_id: "sub1".into() };
        let back = RelayMessage::from_json(&msg.to_json()).unwrap();
        assert_eq!(msg, back);
    }

    #[test]
    fn count_round_trips() {
        let msg = RelayMessage::Count { sub_id: "sub1".into(), count: 42 };
        let back = RelayMessage::from_json(&msg.to_json()).unwrap();
        assert_eq!(msg, back);
    }

    #[test]
    fn malformed_json_carries_raw_text() {
        let err = RelayMessage::from_json("not json").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedJson { .. }));
    }
}
