use logfield_api::Handler;
use regex::Regex;
use serde_json::{Map, Value, json};

/// Owned result of matching a pattern against a string.
///
/// Offsets are byte offsets into `string`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    string: String,
    pattern: String,
    groups: Vec<Option<String>>,
    named: Vec<(String, Option<String>)>,
    start: usize,
    end: usize,
}

impl PatternMatch {
    /// First match of `re` in `haystack`, if any.
    pub fn capture(re: &Regex, haystack: &str) -> Option<Self> {
        let caps = re.captures(haystack)?;
        let whole = caps.get(0)?;
        let text = |i: usize| caps.get(i).map(|m| m.as_str().to_string());
        let groups = (1..caps.len()).map(text).collect();
        let named = re
            .capture_names()
            .enumerate()
            .filter_map(|(i, name)| name.map(|n| (n.to_string(), text(i))))
            .collect();
        Some(Self {
            string: haystack.to_string(),
            pattern: re.as_str().to_string(),
            groups,
            named,
            start: whole.start(),
            end: whole.end(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.string[self.start..self.end]
    }

    pub fn span(&self) -> (usize, usize) {
        (self.start, self.end)
    }
}

fn match_value(m: &PatternMatch) -> Value {
    let groupdict: Map<String, Value> = m
        .named
        .iter()
        .map(|(name, text)| (name.clone(), json!(text)))
        .collect();
    json!({
        "string": m.string,
        "re": m.pattern,
        "groups": m.groups,
        "groupdict": groupdict,
        "start": m.start,
        "end": m.end,
        "span": [m.start, m.end]
    })
}

pub fn handlers() -> Vec<Handler> {
    vec![
        Handler::exact::<Regex, _>("regex", |re| Value::String(re.as_str().to_string())),
        Handler::exact::<regex::bytes::Regex, _>("bytes_regex", |re| Value::String(re.as_str().to_string())),
        Handler::exact::<PatternMatch, _>("pattern_match", match_value),
    ]
}
