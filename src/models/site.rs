// src/models/site.rs

//! Site probe definitions.

use std::collections::BTreeMap;
use std::fmt;

use fancy_regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One catalog entry: how to probe a site and interpret its answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteProfile {
    /// Site display name (the catalog key)
    #[serde(skip)]
    pub name: String,

    /// Human-facing homepage
    #[serde(rename = "urlMain", default)]
    pub url_main: String,

    /// Profile URL template with a `{}` placeholder
    #[serde(rename = "url")]
    pub url: String,

    /// URL actually fetched when the profile URL is not machine-checkable
    #[serde(rename = "urlProbe", default, skip_serializing_if = "Option::is_none")]
    pub url_probe: Option<String>,

    #[serde(
        rename = "request_method",
        default,
        deserialize_with = "RequestMethod::deserialize_lenient"
    )]
    pub request_method: RequestMethod,

    /// Body template, used for POST and PUT only
    #[serde(
        rename = "request_payload",
        default,
        deserialize_with = "payload::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub request_payload: Option<String>,

    /// Extra headers attached verbatim
    #[serde(
        default,
        deserialize_with = "lenient::headers",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub headers: BTreeMap<String, String>,

    /// Username naming rule
    #[serde(rename = "regexCheck", default, skip_serializing_if = "Option::is_none")]
    pub regex_check: Option<NamingRule>,

    #[serde(rename = "errorType")]
    pub error_type: ErrorType,

    #[serde(rename = "errorMsg", default, skip_serializing_if = "Option::is_none")]
    pub error_msg: Option<OneOrMany<String>>,

    #[serde(
        rename = "errorCode",
        default,
        deserialize_with = "lenient::status_codes",
        skip_serializing_if = "Option::is_none"
    )]
    pub error_code: Option<OneOrMany<u16>>,
}

impl SiteProfile {
    /// Create a GET profile with the given strategy and no optional fields.
    pub fn new(name: impl Into<String>, url: impl Into<String>, error_type: ErrorType) -> Self {
        Self {
            name: name.into(),
            url_main: String::new(),
            url: url.into(),
            url_probe: None,
            request_method: RequestMethod::default(),
            request_payload: None,
            headers: BTreeMap::new(),
            regex_check: None,
            error_type,
            error_msg: None,
            error_code: None,
        }
    }

    /// Homepage as displayed in results.
    pub fn main_url(&self) -> &str {
        self.url_main.trim()
    }
}

/// HTTP method used for the probe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestMethod {
    #[default]
    Get,
    Head,
    Post,
    Put,
}

impl RequestMethod {
    /// Case-insensitive lookup; anything unrecognised probes with GET.
    pub fn parse(name: &str) -> Self {
        [Self::Head, Self::Post, Self::Put]
            .into_iter()
            .find(|method| name.trim().eq_ignore_ascii_case(&method.to_string()))
            .unwrap_or_else(|| {
                if !name.trim().eq_ignore_ascii_case("GET") {
                    log::warn!("Unsupported request method '{name}', using GET");
                }
                Self::Get
            })
    }

    fn deserialize_lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
            Some(serde_json::Value::String(name)) => Self::parse(&name),
            None | Some(serde_json::Value::Null) => Self::Get,
            Some(other) => Self::parse(&other.to_string()),
        })
    }

    /// Whether a request body is sent with this method.
    pub fn carries_body(self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
        };
        f.write_str(name)
    }
}

/// Classification strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Body contains an error message when the account is absent
    Message,
    /// HTTP status code signals absence
    StatusCode,
    /// Redirect away from the profile path signals absence
    ResponseUrl,
    /// Anything else found in the catalog; never yields a verdict
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Message => "message",
            Self::StatusCode => "status_code",
            Self::ResponseUrl => "response_url",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// A catalog value given either as a scalar or as a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            Self::One(value) => std::slice::from_ref(value).iter(),
            Self::Many(values) => values.iter(),
        }
    }
}

/// Full-match username rule compiled from `regexCheck`.
///
/// Look-around and backreferences are supported. `\d`, `\w` and `\s` match
/// ASCII only.
#[derive(Debug, Clone)]
pub enum NamingRule {
    Compiled { pattern: String, regex: Regex },
    /// The pattern does not compile
    Unsupported { pattern: String, reason: String },
}

impl NamingRule {
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        match Regex::new(&format!("^(?:{})$", ascii_classes(&pattern))) {
            Ok(regex) => Self::Compiled { pattern, regex },
            Err(e) => Self::Unsupported {
                pattern,
                reason: e.to_string(),
            },
        }
    }

    pub fn pattern(&self) -> &str {
        match self {
            Self::Compiled { pattern, .. } | Self::Unsupported { pattern, .. } => pattern,
        }
    }

    /// `Some(true)` when the whole username matches, `None` when the rule is
    /// unusable or matching gave up.
    pub fn matches(&self, username: &str) -> Option<bool> {
        match self {
            Self::Compiled { pattern, regex } => match regex.is_match(username) {
                Ok(matched) => Some(matched),
                Err(e) => {
                    log::warn!("regexCheck '{pattern}' failed on '{username}': {e}");
                    None
                }
            },
            Self::Unsupported { .. } => None,
        }
    }
}

/// Rewrite the `\d`, `\w`, `\s` shorthands (and their negations) as ASCII
/// classes, inside or outside a bracket expression.
fn ascii_classes(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    let mut depth = 0usize;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let Some(next) = chars.next() else {
                    out.push(c);
                    break;
                };
                let ranges = match next.to_ascii_lowercase() {
                    'd' => Some("0-9"),
                    'w' => Some("0-9A-Za-z_"),
                    's' => Some(r" \t\n\x0B\x0C\r"),
                    _ => None,
                };
                match ranges {
                    Some(ranges) if depth > 0 && next.is_ascii_lowercase() => out.push_str(ranges),
                    Some(ranges) => {
                        let negate = if next.is_ascii_uppercase() { "^" } else { "" };
                        out.push_str(&format!("[{negate}{ranges}]"));
                    }
                    None => {
                        out.push(c);
                        out.push(next);
                    }
                }
            }
            '[' => {
                depth += 1;
                out.push(c);
            }
            ']' if depth > 0 => {
                depth -= 1;
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

impl Serialize for NamingRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.pattern())
    }
}

impl<'de> Deserialize<'de> for NamingRule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pattern = String::deserialize(deserializer)?;
        Ok(Self::new(pattern))
    }
}

mod lenient {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::OneOrMany;

    /// Header values are taken as text; numbers and booleans are stringified.
    pub fn headers<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<String, String>, D::Error> {
        let Some(Value::Object(map)) = Option::<Value>::deserialize(deserializer)? else {
            return Ok(BTreeMap::new());
        };
        Ok(map
            .into_iter()
            .filter_map(|(name, value)| match value {
                Value::String(text) => Some((name, text)),
                Value::Number(_) | Value::Bool(_) => Some((name, value.to_string())),
                _ => {
                    log::warn!("Ignoring header '{name}' with non-scalar value");
                    None
                }
            })
            .collect())
    }

    /// Status codes given as integers or numeric strings. Values that cannot
    /// be an HTTP status are dropped.
    pub fn status_codes<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<OneOrMany<u16>>, D::Error> {
        fn code(value: &Value) -> Option<u16> {
            match value {
                Value::Number(n) => n.as_i64().and_then(|n| u16::try_from(n).ok()),
                Value::String(text) => text.trim().parse().ok(),
                _ => None,
            }
        }

        Ok(match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => None,
            Some(Value::Array(values)) => Some(OneOrMany::Many(
                values.iter().filter_map(code).collect(),
            )),
            Some(value) => code(&value).map(OneOrMany::One),
        })
    }
}

mod payload {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Payloads are usually JSON objects; keep them as compact JSON text.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => Some(text),
            Some(other) => Some(other.to_string()),
        })
    }
}
