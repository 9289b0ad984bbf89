use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed JSON: {source}; raw: {raw}")]
    MalformedJson {
        #[source]
        source: serde_json::Error,
        raw: String,
    },

    #[error("message is not a JSON array")]
    NotAnArray,

    #[error("message has no type label")]
    MissingLabel,

    #[error("unknown message type: {0}")]
    UnknownType(String),

    #[error("message is missing field: {0}")]
    MissingField(&'static str),

    #[error("field {field} has the wrong shape: {detail}")]
    WrongShape { field: &'static str, detail: String },
}
