//! Response contracts and the fail-fast validator.
//!
//! A contract lists the keys a flavor's JSON answer must carry, in the order
//! they are checked. Validation stops at the first broken key. Keys the
//! contract does not mention are passed through untouched.

use serde_json::{Map, Value};

use crate::error::{ValidationError, Violation};

/// Expected shape of one top-level value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Non-empty string.
    Text,
    /// Non-empty array of non-empty strings.
    TextList,
    /// Object with non-empty string `title` and `text`.
    Card,
    /// Non-empty array of objects, each with the listed non-empty string keys.
    Records(&'static [&'static str]),
}

const CARD_KEYS: &[&str] = &["title", "text"];

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub key: &'static str,
    pub shape: Shape,
}

const fn field(key: &'static str, shape: Shape) -> Field {
    Field { key, shape }
}

#[derive(Debug)]
pub struct ResponseContract {
    pub name: &'static str,
    pub fields: &'static [Field],
}

pub static COACHING: ResponseContract = ResponseContract {
    name: "coaching",
    fields: &[
        field("now_fix", Shape::Card),
        field("activity", Shape::Card),
        field("explain", Shape::Card),
    ],
};

pub static LESSON_STEPS: ResponseContract = ResponseContract {
    name: "lesson_steps",
    fields: &[
        field("steps", Shape::TextList),
        field("engagement_idea", Shape::Text),
        field("exit_check", Shape::Text),
    ],
};

pub static LESSON_PLAN: ResponseContract = ResponseContract {
    name: "lesson_plan",
    fields: &[
        field("topic", Shape::Text),
        field("competencies", Shape::TextList),
        field("methods", Shape::Records(&["title", "description", "time"])),
        field("teacher_tip", Shape::Text),
    ],
};

pub static ACTIVITY: ResponseContract = ResponseContract {
    name: "activity",
    fields: &[
        field("steps", Shape::TextList),
        field("grouping", Shape::Text),
        field("quick_assessment", Shape::Text),
    ],
};

pub static PARENT_MESSAGE: ResponseContract = ResponseContract {
    name: "parent_message",
    fields: &[field("message", Shape::Text)],
};

pub static VIDEO_SUGGESTIONS: ResponseContract = ResponseContract {
    name: "video_suggestions",
    fields: &[field(
        "videos",
        Shape::Records(&["title", "channel", "duration", "url"]),
    )],
};

impl ResponseContract {
    /// Check `map` against every field in declaration order, stopping at the
    /// first violation. The map comes back unchanged on success.
    pub fn validate(&self, map: Map<String, Value>) -> Result<Map<String, Value>, ValidationError> {
        for f in self.fields {
            let value = map
                .get(f.key)
                .ok_or_else(|| ValidationError::new(f.key, Violation::Missing))?;
            check_shape(value, f.shape).map_err(|v| ValidationError::new(f.key, v))?;
        }
        Ok(map)
    }
}

fn check_shape(value: &Value, shape: Shape) -> Result<(), Violation> {
    match shape {
        Shape::Text => match value {
            Value::String(s) if s.trim().is_empty() => Err(Violation::Empty),
            Value::String(_) => Ok(()),
            Value::Null => Err(Violation::Empty),
            other => Err(Violation::Malformed(format!(
                "expected a string, found {}",
                kind(other)
            ))),
        },
        Shape::TextList => {
            let items = non_empty_array(value)?;
            for (i, item) in items.iter().enumerate() {
                match item {
                    Value::String(s) if !s.trim().is_empty() => {}
                    Value::String(_) => {
                        return Err(Violation::Malformed(format!("item {i} is empty")))
                    }
                    other => {
                        return Err(Violation::Malformed(format!(
                            "item {i} is {}, expected a string",
                            kind(other)
                        )))
                    }
                }
            }
            Ok(())
        }
        Shape::Card => match value {
            Value::Object(obj) => require_text_keys(obj, CARD_KEYS),
            Value::Null => Err(Violation::Empty),
            other => Err(Violation::Malformed(format!(
                "expected an object with `title` and `text`, found {}",
                kind(other)
            ))),
        },
        Shape::Records(keys) => {
            let items = non_empty_array(value)?;
            for (i, item) in items.iter().enumerate() {
                let obj = item.as_object().ok_or_else(|| {
                    Violation::Malformed(format!("item {i} is {}, expected an object", kind(item)))
                })?;
                require_text_keys(obj, keys).map_err(|v| match v {
                    Violation::Malformed(detail) => {
                        Violation::Malformed(format!("item {i}: {detail}"))
                    }
                    other => other,
                })?;
            }
            Ok(())
        }
    }
}

fn non_empty_array(value: &Value) -> Result<&Vec<Value>, Violation> {
    match value {
        Value::Array(items) if items.is_empty() => Err(Violation::Empty),
        Value::Array(items) => Ok(items),
        Value::Null => Err(Violation::Empty),
        other => Err(Violation::Malformed(format!(
            "expected an array, found {}",
            kind(other)
        ))),
    }
}

// Nested keys are part of the parent's shape, so any miss is a shape error.
fn require_text_keys(obj: &Map<String, Value>, keys: &[&str]) -> Result<(), Violation> {
    for key in keys {
        match obj.get(*key) {
            None => return Err(Violation::Malformed(format!("missing `{key}`"))),
            Some(Value::String(s)) if s.trim().is_empty() => {
                return Err(Violation::Malformed(format!("empty `{key}`")))
            }
            Some(Value::String(_)) => {}
            Some(other) => {
                return Err(Violation::Malformed(format!(
                    "`{key}` is {}, expected a string",
                    kind(other)
                )))
            }
        }
    }
    Ok(())
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("not an object"),
        }
    }

    fn card(title: &str, text: &str) -> Value {
        json!({ "title": title, "text": text })
    }

    #[test]
    fn coaching_passes_and_keeps_extra_keys() {
        let map = obj(json!({
            "now_fix": card("a", "b"),
            "activity": card("c", "d"),
            "explain": card("e", "f"),
            "confidence": 0.9
        }));
        let out = COACHING.validate(map.clone()).unwrap();
        assert_eq!(out, map);
        assert_eq!(out["confidence"], 0.9);
    }

    #[test]
    fn names_the_missing_key() {
        let map = obj(json!({
            "now_fix": card("a", "b"),
            "explain": card("e", "f"),
        }));
        let err = COACHING.validate(map).unwrap_err();
        assert_eq!(err, ValidationError::new("activity", Violation::Missing));
    }

    #[test]
    fn first_violation_in_declaration_order_wins() {
        // JSON key order differs from contract order on purpose
        let map = obj(json!({
            "teacher_tip": "",
            "topic": "Fractions",
            "competencies": []
        }));
        let err = LESSON_PLAN.validate(map).unwrap_err();
        assert_eq!(err, ValidationError::new("competencies", Violation::Empty));
    }

    #[test]
    fn card_missing_text_is_malformed() {
        let map = obj(json!({ "now_fix": { "title": "a" } }));
        let err = COACHING.validate(map).unwrap_err();
        assert_eq!(err.field, "now_fix");
        assert_eq!(err.violation, Violation::Malformed("missing `text`".into()));
    }

    #[test]
    fn card_as_plain_string_is_malformed() {
        let map = obj(json!({
            "now_fix": "just do it",
            "activity": card("c", "d"),
            "explain": card("e", "f"),
        }));
        let err = COACHING.validate(map).unwrap_err();
        assert_eq!(err.field, "now_fix");
        assert!(matches!(err.violation, Violation::Malformed(_)));
    }

    #[test]
    fn empty_and_blank_strings_are_empty() {
        let err = PARENT_MESSAGE.validate(obj(json!({ "message": "" }))).unwrap_err();
        assert_eq!(err.violation, Violation::Empty);

        let err = PARENT_MESSAGE.validate(obj(json!({ "message": "  \n" }))).unwrap_err();
        assert_eq!(err.violation, Violation::Empty);

        let err = PARENT_MESSAGE.validate(obj(json!({ "message": null }))).unwrap_err();
        assert_eq!(err.violation, Violation::Empty);
    }

    #[test]
    fn text_list_rejects_non_strings() {
        let map = obj(json!({
            "steps": ["count", 2],
            "engagement_idea": "x",
            "exit_check": "y"
        }));
        let err = LESSON_STEPS.validate(map).unwrap_err();
        assert_eq!(err.field, "steps");
        assert_eq!(
            err.violation,
            Violation::Malformed("item 1 is a number, expected a string".into())
        );
    }

    #[test]
    fn text_list_must_be_array() {
        let map = obj(json!({
            "steps": "count to ten",
            "grouping": "pairs",
            "quick_assessment": "ask"
        }));
        let err = ACTIVITY.validate(map).unwrap_err();
        assert_eq!(err.field, "steps");
        assert!(matches!(err.violation, Violation::Malformed(_)));
    }

    #[test]
    fn records_report_the_broken_item() {
        let map = obj(json!({
            "topic": "Fractions",
            "competencies": ["compare halves"],
            "methods": [
                { "title": "Roti split", "description": "share a roti", "time": "10 min" },
                { "title": "Number line", "description": "walk it" }
            ],
            "teacher_tip": "go slow"
        }));
        let err = LESSON_PLAN.validate(map).unwrap_err();
        assert_eq!(err.field, "methods");
        assert_eq!(
            err.violation,
            Violation::Malformed("item 1: missing `time`".into())
        );
    }

    #[test]
    fn records_reject_numeric_sub_keys() {
        let map = obj(json!({
            "videos": [{ "title": "t", "channel": "c", "duration": 5, "url": "u" }]
        }));
        let err = VIDEO_SUGGESTIONS.validate(map).unwrap_err();
        assert_eq!(err.field, "videos");
        assert!(matches!(err.violation, Violation::Malformed(_)));
    }

    #[test]
    fn full_lesson_plan_passes() {
        let map = obj(json!({
            "topic": "Fractions",
            "competencies": ["compare halves", "name quarters"],
            "methods": [
                { "title": "Roti split", "description": "share a roti", "time": "10 min" }
            ],
            "teacher_tip": "go slow"
        }));
        assert!(LESSON_PLAN.validate(map).is_ok());
    }

    #[test]
    fn keys_follow_declaration_order() {
        let keys: Vec<_> = LESSON_PLAN.fields.iter().map(|f| f.key).collect();
        assert_eq!(keys, ["topic", "competencies", "methods", "teacher_tip"]);
    }
}
