use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use logfield_api::{ConvertError, Handler, Subject, TypeKey};
use serde_json::Value;

fn as_os_str<'a>(subject: &Subject<'a>) -> Option<&'a OsStr> {
    let any = subject.as_any();
    if let Some(p) = any.downcast_ref::<PathBuf>() {
        return Some(p.as_os_str());
    }
    if let Some(p) = any.downcast_ref::<Box<Path>>() {
        return Some(p.as_os_str());
    }
    if let Some(p) = any.downcast_ref::<Arc<Path>>() {
        return Some(p.as_os_str());
    }
    if let Some(p) = any.downcast_ref::<&'static Path>() {
        return Some(p.as_os_str());
    }
    any.downcast_ref::<OsString>().map(OsString::as_os_str)
}

/// Filesystem paths as text. Non-UTF-8 sequences are replaced.
pub fn handler() -> Handler {
    Handler::one_of(
        "path",
        vec![
            TypeKey::of::<PathBuf>(),
            TypeKey::of::<Box<Path>>(),
            TypeKey::of::<Arc<Path>>(),
            TypeKey::of::<&'static Path>(),
            TypeKey::of::<OsString>(),
        ],
        |subject| {
            as_os_str(subject)
                .map(|s| Value::String(s.to_string_lossy().into_owned()))
                .ok_or_else(|| ConvertError::mismatch("path", subject.type_name()))
        },
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn every_path_flavour_is_text() {
        let handler = handler();
        let owned = PathBuf::from("/var/log/app.log");
        let boxed: Box<Path> = owned.clone().into_boxed_path();
        let shared: Arc<Path> = Arc::from(owned.as_path());
        let borrowed: &'static Path = Path::new("/var/log/app.log");
        let os = OsString::from("/var/log/app.log");
        for subject in [
            Subject::new(&owned),
            Subject::new(&boxed),
            Subject::new(&shared),
            Subject::new(&borrowed),
            Subject::new(&os),
        ] {
            assert!(handler.recognizer().recognizes(&subject), "{}", subject.type_name());
            assert_eq!(handler.converter().convert(&subject).unwrap(), json!("/var/log/app.log"));
        }
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_is_lossy() {
        use std::os::unix::ffi::OsStringExt;

        let raw = OsString::from_vec(vec![b'a', 0xff, b'b']);
        let value = handler().converter().convert(&Subject::new(&raw)).unwrap();
        assert_eq!(value, json!("a\u{fffd}b"));
    }
}
