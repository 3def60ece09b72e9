//! URL template matching and query parsing.
//!
//! Templates are `/`-separated; a segment starting with `@` captures the
//! request segment at the same position under the name that follows.

use serde_json::{Map, Number, Value};
use tracing::trace;

/// Marker that turns a template segment into a parameter.
pub const PARAM_MARKER: char = '@';

/// Decoded route parameters, keyed by name.
pub type RouteParams = Map<String, Value>;

/// How a captured segment is coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Integral segments become JSON integers, other numerics become floats.
    Number,
    String,
}

impl ParamKind {
    fn coerce(self, segment: &str) -> Option<Value> {
        match self {
            Self::String => Some(Value::String(segment.to_string())),
            Self::Number => {
                if let Ok(integer) = segment.parse::<i64>() {
                    return Some(Value::from(integer));
                }
                segment
                    .parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
            }
        }
    }
}

/// Match `url` against `template` and coerce the captured segments.
///
/// Returns `None` when the segment counts differ, a literal segment differs,
/// or a captured segment cannot be coerced. Parameters missing from `kinds`
/// are captured as strings. A query string on `url` is ignored.
pub fn parse_parameters(url: &str, template: &str, kinds: &[(&str, ParamKind)]) -> Option<RouteParams> {
    let path = url.split_once('?').map_or(url, |(path, _)| path);
    let segments: Vec<&str> = path.split('/').collect();
    let expected: Vec<&str> = template.split('/').collect();
    if segments.len() != expected.len() {
        return None;
    }

    let mut params = RouteParams::new();
    for (segment, pattern) in segments.into_iter().zip(expected) {
        match pattern.strip_prefix(PARAM_MARKER) {
            Some(name) => {
                if segment.is_empty() {
                    return None;
                }
                let decoded = urlencoding::decode(segment).ok()?;
                let kind = kinds
                    .iter()
                    .find(|(key, _)| *key == name)
                    .map_or(ParamKind::String, |(_, kind)| *kind);
                let Some(value) = kind.coerce(&decoded) else {
                    trace!(param = name, segment, "route parameter rejected by coercion");
                    return None;
                };
                params.insert(name.to_string(), value);
            }
            None if pattern == segment => {}
            None => return None,
        }
    }
    Some(params)
}

/// Parse a query string into an object of strings. Repeated keys keep the last value.
pub fn parse_query(query: Option<&str>) -> Map<String, Value> {
    query
        .map(|query| {
            url::form_urlencoded::parse(query.as_bytes())
                .map(|(key, value)| (key.into_owned(), Value::String(value.into_owned())))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn number_parameters_are_numbers() {
        let params =
            parse_parameters("/members/42", "/members/@id", &[("id", ParamKind::Number)]).unwrap();
        assert_eq!(Value::Object(params), json!({ "id": 42 }));
    }

    #[test]
    fn fractional_numbers_become_floats() {
        let params =
            parse_parameters("/prices/2.5", "/prices/@amount", &[("amount", ParamKind::Number)])
                .unwrap();
        assert_eq!(params["amount"], json!(2.5));
    }

    #[test]
    fn non_numeric_segment_does_not_match() {
        assert!(parse_parameters("/members/abc", "/members/@id", &[("id", ParamKind::Number)]).is_none());
        assert!(parse_parameters("/members/NaN", "/members/@id", &[("id", ParamKind::Number)]).is_none());
    }

    #[test]
    fn undeclared_parameters_are_strings() {
        let params = parse_parameters("/groups/scouts%20a/members", "/groups/@slug/members", &[])
            .unwrap();
        assert_eq!(params["slug"], json!("scouts a"));
    }

    #[test]
    fn literals_and_lengths_must_agree() {
        assert!(parse_parameters("/members/42/records", "/members/@id", &[]).is_none());
        assert!(parse_parameters("/groups/42", "/members/@id", &[]).is_none());
        assert!(parse_parameters("/members/", "/members/@id", &[]).is_none());
        assert_eq!(parse_parameters("/members", "/members", &[]), Some(RouteParams::new()));
    }

    #[test]
    fn query_string_is_ignored_for_matching() {
        let params = parse_parameters("/members/7?expand=1", "/members/@id", &[("id", ParamKind::Number)])
            .unwrap();
        assert_eq!(params["id"], json!(7));
    }

    #[test]
    fn query_is_parsed_into_strings() {
        let query = parse_query(Some("name=Simon+Backx&limit=10&limit=20"));
        assert_eq!(Value::Object(query), json!({ "name": "Simon Backx", "limit": "20" }));
        assert!(parse_query(None).is_empty());
    }
}
