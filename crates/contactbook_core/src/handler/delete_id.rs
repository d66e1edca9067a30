//! Delete target resolution.
//!
//! The id comes from the JSON body `{"id": ...}`. When the body has no id the
//! trailing path segment is used (`/contacts/42`). Falsy ids (`0`, `""`,
//! `false`, `null`, missing) are rejected before any query runs; any other
//! string is parsed as an integer, so `"0"` is a present id that matches no row.

use super::error::InvocationError;
use crate::model::contact::ContactId;
use serde_json::Value;

pub(crate) fn resolve_delete_id(
    body: Option<&str>,
    path: &str,
) -> Result<ContactId, InvocationError> {
    let body_id = match body {
        Some(text) => id_from_body(text)?,
        None => None,
    };

    match body_id {
        Some(value) => classify_id(&value),
        None => id_from_path(path).ok_or(InvocationError::MissingContactId),
    }
}

/// Returns the raw `id` value, or `None` when the key is absent or null.
fn id_from_body(text: &str) -> Result<Option<Value>, InvocationError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|err| InvocationError::MalformedBody(err.to_string()))?;
    let Value::Object(mut fields) = value else {
        return Err(InvocationError::MalformedBody(
            "expected a JSON object".to_string(),
        ));
    };
    Ok(fields.remove("id").filter(|id| !id.is_null()))
}

fn classify_id(value: &Value) -> Result<ContactId, InvocationError> {
    match value {
        Value::Bool(false) => Err(InvocationError::MissingContactId),
        Value::Number(number) => match (number.as_i64(), number.as_f64()) {
            (Some(0), _) => Err(InvocationError::MissingContactId),
            (Some(id), _) => Ok(id),
            (None, Some(float)) if float == 0.0 => Err(InvocationError::MissingContactId),
            (None, Some(float)) => integral_id(float)
                .ok_or_else(|| InvocationError::InvalidContactId(number.to_string())),
            (None, None) => Err(InvocationError::InvalidContactId(number.to_string())),
        },
        Value::String(raw) if raw.is_empty() => Err(InvocationError::MissingContactId),
        Value::String(raw) => raw
            .trim()
            .parse::<ContactId>()
            .map_err(|_| InvocationError::InvalidContactId(raw.clone())),
        other => Err(InvocationError::InvalidContactId(other.to_string())),
    }
}

/// `2.0` names contact 2; fractions and out-of-range values name nothing.
fn integral_id(value: f64) -> Option<ContactId> {
    let in_range = value >= ContactId::MIN as f64 && value < ContactId::MAX as f64;
    (value.fract() == 0.0 && in_range).then_some(value as ContactId)
}

fn id_from_path(path: &str) -> Option<ContactId> {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse::<ContactId>().ok())
}

#[cfg(test)]
mod tests {
    use super::resolve_delete_id;
    use crate::handler::error::InvocationError;

    fn resolve(body: Option<&str>) -> Result<i64, InvocationError> {
        resolve_delete_id(body, "/contacts")
    }

    #[test]
    fn accepts_numeric_and_string_ids() {
        assert_eq!(resolve(Some(r#"{"id": 7}"#)).unwrap(), 7);
        assert_eq!(resolve(Some(r#"{"id": "12"}"#)).unwrap(), 12);
        assert_eq!(resolve(Some(r#"{"id": 2.0}"#)).unwrap(), 2);
    }

    #[test]
    fn zero_as_string_is_a_present_id() {
        assert_eq!(resolve(Some(r#"{"id": "0"}"#)).unwrap(), 0);
        assert_eq!(resolve_delete_id(None, "/contacts/0").unwrap(), 0);
    }

    #[test]
    fn whitespace_string_is_present_but_invalid() {
        assert!(matches!(
            resolve(Some(r#"{"id": "  "}"#)),
            Err(InvocationError::InvalidContactId(_))
        ));
    }

    #[test]
    fn falsy_ids_are_missing() {
        for body in [
            r#"{}"#,
            r#"{"id": null}"#,
            r#"{"id": 0}"#,
            r#"{"id": 0.0}"#,
            r#"{"id": ""}"#,
            r#"{"id": false}"#,
        ] {
            assert!(
                matches!(resolve(Some(body)), Err(InvocationError::MissingContactId)),
                "body {body} should be treated as missing id"
            );
        }
        assert!(matches!(resolve(None), Err(InvocationError::MissingContactId)));
    }

    #[test]
    fn non_integer_ids_are_invalid() {
        for body in [
            r#"{"id": "abc"}"#,
            r#"{"id": 1.5}"#,
            r#"{"id": 1e300}"#,
            r#"{"id": [1]}"#,
            r#"{"id": true}"#,
        ] {
            assert!(
                matches!(resolve(Some(body)), Err(InvocationError::InvalidContactId(_))),
                "body {body} should be rejected as invalid id"
            );
        }
    }

    #[test]
    fn malformed_body_is_a_shape_error() {
        assert!(matches!(
            resolve(Some("{not json")),
            Err(InvocationError::MalformedBody(_))
        ));
        assert!(matches!(
            resolve(Some("[1, 2]")),
            Err(InvocationError::MalformedBody(_))
        ));
    }

    #[test]
    fn path_segment_is_used_when_body_has_no_id() {
        assert_eq!(
            resolve_delete_id(None, "/.netlify/functions/contacts/42").unwrap(),
            42
        );
        assert_eq!(resolve_delete_id(Some("{}"), "/contacts/9/").unwrap(), 9);
        assert_eq!(
            resolve_delete_id(Some(r#"{"id": 3}"#), "/contacts/9").unwrap(),
            3
        );
    }
}
