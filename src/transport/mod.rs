//! Transport layer: HTTP and wire-format details (serialization/deserialization).

mod send_code;

pub use send_code::{decode_send_code_json_response, encode_send_code_form};
