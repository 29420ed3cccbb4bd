use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use bytes::{Bytes, BytesMut};
use logfield_api::{ConvertError, Handler, Subject, TypeKey};
use serde_json::Value;

fn as_slice<'a>(subject: &Subject<'a>) -> Option<&'a [u8]> {
    let any = subject.as_any();
    if let Some(v) = any.downcast_ref::<Vec<u8>>() {
        return Some(v.as_slice());
    }
    if let Some(v) = any.downcast_ref::<Box<[u8]>>() {
        return Some(&v[..]);
    }
    if let Some(v) = any.downcast_ref::<&'static [u8]>() {
        return Some(*v);
    }
    if let Some(v) = any.downcast_ref::<Bytes>() {
        return Some(&v[..]);
    }
    any.downcast_ref::<BytesMut>().map(|v| &v[..])
}

/// Byte buffers as URL-safe base64 with padding.
pub fn handler() -> Handler {
    Handler::one_of(
        "bytes",
        vec![
            TypeKey::of::<Vec<u8>>(),
            TypeKey::of::<Box<[u8]>>(),
            TypeKey::of::<&'static [u8]>(),
            TypeKey::of::<Bytes>(),
            TypeKey::of::<BytesMut>(),
        ],
        |subject| {
            as_slice(subject)
                .map(|raw| Value::String(URL_SAFE.encode(raw)))
                .ok_or_else(|| ConvertError::mismatch("bytes", subject.type_name()))
        },
    )
}
