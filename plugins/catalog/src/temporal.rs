use std::time::{Duration, SystemTime};

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use logfield_api::Handler;
use serde_json::Value;

/// Seconds as decimal text, always with a fractional part (`"90.0"`).
fn seconds_text(secs: f64) -> Value {
    Value::String(format!("{secs:?}"))
}

fn delta_seconds(delta: &TimeDelta) -> f64 {
    delta.num_seconds() as f64 + f64::from(delta.subsec_nanos()) / 1e9
}

/// `"UTC"` for a zero offset, else `"UTC±HH:MM"` with seconds only when
/// present.
pub fn offset_name(offset_secs: i32) -> String {
    if offset_secs == 0 {
        return "UTC".to_string();
    }
    let sign = if offset_secs < 0 { '-' } else { '+' };
    let abs = offset_secs.unsigned_abs();
    let (hours, minutes, seconds) = (abs / 3600, abs % 3600 / 60, abs % 60);
    if seconds == 0 {
        format!("UTC{sign}{hours:02}:{minutes:02}")
    } else {
        format!("UTC{sign}{hours:02}:{minutes:02}:{seconds:02}")
    }
}

pub fn handlers() -> Vec<Handler> {
    vec![
        Handler::exact::<NaiveDate, _>("date", |v| Value::String(v.format("%Y-%m-%d").to_string())),
        Handler::exact::<NaiveTime, _>("time", |v| Value::String(v.format("%H:%M:%S%.f").to_string())),
        Handler::exact::<NaiveDateTime, _>("naive_datetime", |v| {
            Value::String(v.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
        }),
        Handler::exact::<DateTime<Utc>, _>("datetime_utc", |v| Value::String(v.to_rfc3339())),
        Handler::exact::<DateTime<FixedOffset>, _>("datetime_fixed", |v| Value::String(v.to_rfc3339())),
        Handler::exact::<DateTime<Local>, _>("datetime_local", |v| Value::String(v.to_rfc3339())),
        Handler::exact::<TimeDelta, _>("time_delta", |v| seconds_text(delta_seconds(v))),
        Handler::exact::<Duration, _>("duration", |v| seconds_text(v.as_secs_f64())),
        Handler::exact::<SystemTime, _>("system_time", |v| Value::String(DateTime::<Utc>::from(*v).to_rfc3339())),
        Handler::exact::<FixedOffset, _>("fixed_offset", |v| Value::String(offset_name(v.local_minus_utc()))),
        Handler::exact::<Utc, _>("utc", |_| Value::String(offset_name(0))),
    ]
}
