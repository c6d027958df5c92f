use serde_json::Value;

/// What sits inside the wrapper once it has been peeled.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Still text; needs another extraction pass.
    Text(String),
    Value(Value),
}

/// Peels the wrapper shapes webhook runners put around the course:
/// `[{"output": ...}]`, `[{"title", "modules", ...}]` and `{"output": ...}`.
pub fn unwrap(parsed: Value) -> Payload {
    let inner = match parsed {
        Value::Array(mut items) if !items.is_empty() => {
            if let Some(output) = take_output(&mut items[0]) {
                tracing::debug!(shape = "array_output", "Unwrapped payload");
                output
            } else if is_course_like(&items[0]) {
                tracing::debug!(shape = "array_course", "Unwrapped payload");
                items.swap_remove(0)
            } else {
                Value::Array(items)
            }
        }
        mut value @ Value::Object(_) => match take_output(&mut value) {
            Some(output) => {
                tracing::debug!(shape = "object_output", "Unwrapped payload");
                output
            }
            None => value,
        },
        other => other,
    };

    match inner {
        Value::String(text) => Payload::Text(text),
        value => Payload::Value(value),
    }
}

fn take_output(value: &mut Value) -> Option<Value> {
    let map = value.as_object_mut()?;
    match map.get("output") {
        None | Some(Value::Null) => None,
        Some(_) => map.remove("output"),
    }
}

fn is_course_like(value: &Value) -> bool {
    value.get("title").is_some() && value.get("modules").is_some()
}
