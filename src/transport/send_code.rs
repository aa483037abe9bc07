use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::{ApiKey, Options, PhoneNumber, TemplateId, TemplateValue};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("empty response body")]
    Empty,

    #[error("expected a JSON object, got: {found}")]
    NotAnObject { found: &'static str },
}

/// Gateway reply to a template send.
///
/// Only `code` and `msg` drive the outcome; the other fields are kept for
/// diagnostics. Field names are matched case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GatewayReply {
    pub http_status_code: i64,
    pub code: i64,
    pub msg: String,
    pub detail: String,
}

impl GatewayReply {
    const FIELDS: [&'static str; 4] = ["http_status_code", "code", "msg", "detail"];

    pub fn is_accepted(&self) -> bool {
        self.code == 0
    }
}

pub fn encode_send_code_form(
    options: &Options,
    phone_number: &str,
    code: &str,
) -> Vec<(String, String)> {
    vec![
        (
            ApiKey::WIRE_FIELD.to_owned(),
            options.key().as_str().to_owned(),
        ),
        (PhoneNumber::FIELD.to_owned(), phone_number.to_owned()),
        (
            TemplateId::FIELD.to_owned(),
            options.tpl_id().as_str().to_owned(),
        ),
        (
            TemplateValue::FIELD.to_owned(),
            options.tpl_value().render(code),
        ),
    ]
}

/// Decode the first JSON value in `json`; anything after it is ignored.
pub fn decode_send_code_json_response(json: &str) -> Result<GatewayReply, TransportError> {
    let value = serde_json::Deserializer::from_str(json)
        .into_iter::<Value>()
        .next()
        .ok_or(TransportError::Empty)??;

    let object = match value {
        Value::Object(object) => object,
        other => {
            return Err(TransportError::NotAnObject {
                found: json_kind(&other),
            });
        }
    };

    Ok(serde_json::from_value(Value::Object(fold_field_names(object)))?)
}

/// Rename keys that match a reply field ignoring case; exact matches win.
fn fold_field_names(object: Map<String, Value>) -> Map<String, Value> {
    let mut folded = Map::new();
    let mut exact = Vec::new();

    for (key, value) in object {
        let canonical = GatewayReply::FIELDS
            .iter()
            .find(|field| field.eq_ignore_ascii_case(&key));
        match canonical {
            Some(field) if *field == key => {
                exact.push(*field);
                folded.insert(key, value);
            }
            Some(field) if !exact.contains(field) => {
                folded.insert((*field).to_owned(), value);
            }
            Some(_) => {}
            None => {
                folded.insert(key, value);
            }
        }
    }

    folded
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
