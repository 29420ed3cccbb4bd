use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use logfield_api::{ConvertError, Handler, Subject, TypeKey};
use serde::Serialize;
use serde_json::Value;

fn to_json<T: Serialize>(subject: &Subject<'_>, value: &T) -> Result<Value, ConvertError> {
    serde_json::to_value(value).map_err(|e| ConvertError::format(subject.type_name(), e.to_string()))
}

/// One handler covering a fixed list of serde-serializable container types.
/// Elements are not reduced any further.
macro_rules! serde_family {
    ($name:literal, [$($ty:ty),+ $(,)?]) => {
        Handler::one_of(
            $name,
            vec![$(TypeKey::of::<$ty>()),+],
            |subject| {
                let any = subject.as_any();
                $(
                    if let Some(value) = any.downcast_ref::<$ty>() {
                        return to_json(subject, value);
                    }
                )+
                Err(ConvertError::mismatch($name, subject.type_name()))
            },
        )
    };
}

pub fn sequences() -> Handler {
    serde_family!("sequence", [
        Vec<String>,
        Vec<&'static str>,
        Vec<i32>,
        Vec<i64>,
        Vec<u32>,
        Vec<u64>,
        Vec<f64>,
        Vec<bool>,
        Vec<Value>,
    ])
}

pub fn sets() -> Handler {
    serde_family!("set", [
        HashSet<String>,
        HashSet<&'static str>,
        HashSet<char>,
        HashSet<i32>,
        HashSet<i64>,
        HashSet<u32>,
        HashSet<u64>,
        BTreeSet<String>,
        BTreeSet<&'static str>,
        BTreeSet<char>,
        BTreeSet<i32>,
        BTreeSet<i64>,
        BTreeSet<u32>,
        BTreeSet<u64>,
    ])
}

pub fn deques() -> Handler {
    serde_family!("deque", [
        VecDeque<String>,
        VecDeque<i64>,
        VecDeque<u64>,
        VecDeque<f64>,
        VecDeque<bool>,
        VecDeque<Value>,
    ])
}

pub fn mappings() -> Handler {
    serde_family!("mapping", [
        HashMap<String, String>,
        HashMap<String, i64>,
        HashMap<String, u64>,
        HashMap<String, f64>,
        HashMap<String, bool>,
        HashMap<String, Value>,
        BTreeMap<String, String>,
        BTreeMap<String, i64>,
        BTreeMap<String, u64>,
        BTreeMap<String, f64>,
        BTreeMap<String, bool>,
        BTreeMap<String, Value>,
    ])
}

/// A stack of mappings, nearest layer first, kept as separate objects.
pub fn layered_mappings() -> Handler {
    serde_family!("layered_mapping", [
        Vec<HashMap<String, Value>>,
        Vec<BTreeMap<String, Value>>,
    ])
}

pub fn handlers() -> Vec<Handler> {
    vec![sequences(), sets(), deques(), mappings(), layered_mappings()]
}
