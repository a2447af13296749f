pub(crate) mod call;
pub(crate) mod learned;
pub(crate) mod livekit;
pub(crate) mod meta;
pub(crate) mod requests;

use bytes::Bytes;
use serde_json::Value;

/// Parse an incoming JSON body; an empty body reads as `{}`.
pub(crate) fn parse_body(body: &Bytes) -> Result<Value, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_slice(body)
}
