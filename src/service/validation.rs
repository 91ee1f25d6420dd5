//! Request validation and shaping from field descriptors. Shared by create and update.

use crate::config::{EntityDescriptor, FieldDescriptor, FieldType};
use crate::error::AppError;
use crate::record::Attributes;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Number, Value};

pub struct RequestValidator;

impl RequestValidator {
    /// Validate a create payload. Every required field must be present and non-empty.
    /// Returns only the declared fields, shaped for storage; unknown keys are dropped.
    pub fn validate(entity: &EntityDescriptor, body: &Map<String, Value>) -> Result<Attributes, AppError> {
        let mut out = Attributes::new();
        for field in &entity.fields {
            match body.get(&field.name).filter(|v| !is_empty(v)) {
                Some(v) => {
                    out.insert(field.name.clone(), shape_field(field, v)?);
                }
                None if field.required => return Err(required(field)),
                None => {}
            }
        }
        Ok(out)
    }

    /// Validate a merge-update payload: only supplied fields are checked, each with the same
    /// rules as create. A required field may not be cleared; an optional one set to null is skipped.
    pub fn validate_partial(entity: &EntityDescriptor, body: &Map<String, Value>) -> Result<Attributes, AppError> {
        let mut out = Attributes::new();
        for field in &entity.fields {
            let Some(v) = body.get(&field.name) else {
                continue;
            };
            if is_empty(v) {
                if field.required {
                    return Err(required(field));
                }
                continue;
            }
            out.insert(field.name.clone(), shape_field(field, v)?);
        }
        Ok(out)
    }
}

fn required(field: &FieldDescriptor) -> AppError {
    AppError::validation(&field.name, format!("{} is required", field.name))
}

fn is_empty(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn shape_field(field: &FieldDescriptor, v: &Value) -> Result<Value, AppError> {
    match field.field_type {
        FieldType::Text => shape_text(field, v),
        FieldType::Number => shape_number(field, v),
        FieldType::Date => shape_date(field, v),
    }
}

fn shape_text(field: &FieldDescriptor, v: &Value) -> Result<Value, AppError> {
    match v {
        Value::String(_) => Ok(v.clone()),
        Value::Number(n) => Ok(Value::String(n.to_string())),
        Value::Bool(b) => Ok(Value::String(b.to_string())),
        _ => Err(AppError::validation(&field.name, format!("{} must be text", field.name))),
    }
}

fn shape_number(field: &FieldDescriptor, v: &Value) -> Result<Value, AppError> {
    let not_a_number = || AppError::validation(&field.name, format!("{} must be a number", field.name));
    let (n, stored) = match v {
        Value::Number(n) => (n.as_f64().ok_or_else(not_a_number)?, v.clone()),
        Value::String(s) => {
            let n: f64 = s.trim().parse().map_err(|_| not_a_number())?;
            (n, number_value(n).ok_or_else(not_a_number)?)
        }
        _ => return Err(not_a_number()),
    };
    if !n.is_finite() {
        return Err(not_a_number());
    }
    if let Some(min) = field.min {
        if n < min {
            return Err(AppError::validation(
                &field.name,
                format!("{} must be at least {}", field.name, min),
            ));
        }
    }
    if let Some(max) = field.max {
        if n > max {
            return Err(AppError::validation(
                &field.name,
                format!("{} must be at most {}", field.name, max),
            ));
        }
    }
    Ok(stored)
}

/// Whole numbers stay integers on the wire.
fn number_value(n: f64) -> Option<Value> {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Some(Value::Number(Number::from(n as i64)))
    } else {
        Number::from_f64(n).map(Value::Number)
    }
}

fn shape_date(field: &FieldDescriptor, v: &Value) -> Result<Value, AppError> {
    let valid = v.as_str().map(str::trim).is_some_and(parses_as_date);
    if valid {
        Ok(v.clone())
    } else {
        Err(AppError::validation(
            &field.name,
            format!("{} must be a valid date", field.name),
        ))
    }
}

/// `YYYY-MM-DD`, RFC 3339, or a zone-less `YYYY-MM-DDTHH:MM[:SS[.f]]`.
fn parses_as_date(s: &str) -> bool {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(s).is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Collection;
    use serde_json::json;

    fn feedbacks() -> EntityDescriptor {
        EntityDescriptor {
            name: "feedbacks".into(),
            collection: Collection::new("feedbacks"),
            fields: vec![
                FieldDescriptor::text("userName").required(),
                FieldDescriptor::number("rating").required().range(Some(1.0), Some(5.0)),
                FieldDescriptor::date("visited"),
                FieldDescriptor::text("comment"),
            ],
        }
    }

    fn body(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    fn failing_field(r: Result<Attributes, AppError>) -> String {
        match r {
            Err(AppError::Validation { field, .. }) => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn rating_bounds_are_inclusive() {
        let e = feedbacks();
        for ok in [1, 5] {
            assert!(RequestValidator::validate(&e, &body(json!({"userName": "a", "rating": ok}))).is_ok());
        }
        for bad in [0, 6] {
            let r = RequestValidator::validate(&e, &body(json!({"userName": "a", "rating": bad})));
            assert_eq!(failing_field(r), "rating");
        }
    }

    #[test]
    fn missing_or_empty_required_field_is_named() {
        let e = feedbacks();
        assert_eq!(failing_field(RequestValidator::validate(&e, &body(json!({"rating": 3})))), "userName");
        assert_eq!(
            failing_field(RequestValidator::validate(&e, &body(json!({"userName": "", "rating": 3})))),
            "userName"
        );
        assert_eq!(
            failing_field(RequestValidator::validate(&e, &body(json!({"userName": "a", "rating": null})))),
            "rating"
        );
    }

    #[test]
    fn numeric_strings_are_stored_as_numbers() {
        let e = feedbacks();
        let out = RequestValidator::validate(&e, &body(json!({"userName": "a", "rating": " 4 "}))).unwrap();
        assert_eq!(out["rating"], json!(4));
        let out = RequestValidator::validate(&e, &body(json!({"userName": "a", "rating": "4.5"}))).unwrap();
        assert_eq!(out["rating"], json!(4.5));
        let r = RequestValidator::validate(&e, &body(json!({"userName": "a", "rating": "four"})));
        assert_eq!(failing_field(r), "rating");
        let r = RequestValidator::validate(&e, &body(json!({"userName": "a", "rating": "NaN"})));
        assert_eq!(failing_field(r), "rating");
    }

    #[test]
    fn dates_must_be_calendar_dates() {
        let e = feedbacks();
        for ok in ["2024-02-29", "2024-03-01T10:00:00Z", "2024-03-01T10:00", "2024-03-01T10:00:00.5"] {
            let out = RequestValidator::validate(&e, &body(json!({"userName": "a", "rating": 3, "visited": ok})));
            assert_eq!(out.unwrap()["visited"], json!(ok));
        }
        for bad in [json!("2023-02-29"), json!("yesterday"), json!(20240101)] {
            let r = RequestValidator::validate(&e, &body(json!({"userName": "a", "rating": 3, "visited": bad})));
            assert_eq!(failing_field(r), "visited");
        }
    }

    #[test]
    fn unknown_and_reserved_keys_are_dropped() {
        let e = feedbacks();
        let out = RequestValidator::validate(
            &e,
            &body(json!({"userName": "a", "rating": 2, "mood": "ok", "_id": "x", "createdAt": "y"})),
        )
        .unwrap();
        let keys: Vec<&str> = out.keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&"userName") && keys.contains(&"rating"));
    }

    #[test]
    fn text_coerces_scalars_but_not_structures() {
        let e = feedbacks();
        let out = RequestValidator::validate(&e, &body(json!({"userName": 42, "rating": 2}))).unwrap();
        assert_eq!(out["userName"], json!("42"));
        let r = RequestValidator::validate(&e, &body(json!({"userName": ["a"], "rating": 2})));
        assert_eq!(failing_field(r), "userName");
    }

    #[test]
    fn partial_checks_only_supplied_fields() {
        let e = feedbacks();
        let out = RequestValidator::validate_partial(&e, &body(json!({"comment": "better"}))).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(
            failing_field(RequestValidator::validate_partial(&e, &body(json!({"rating": 9})))),
            "rating"
        );
        assert_eq!(
            failing_field(RequestValidator::validate_partial(&e, &body(json!({"userName": ""})))),
            "userName"
        );
        assert!(RequestValidator::validate_partial(&e, &body(json!({"comment": null})))
            .unwrap()
            .is_empty());
    }
}
