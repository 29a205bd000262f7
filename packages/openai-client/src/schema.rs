//! Type-safe schema generation for OpenAI structured outputs.
//!
//! Uses `schemars` to generate a JSON schema from the response type and then
//! rewrites it into the subset OpenAI accepts in strict mode.

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Keywords strict mode rejects. `format` is only kept on string schemas.
const UNSUPPORTED_KEYWORDS: &[&str] = &["default", "minimum", "maximum", "minItems", "maxItems"];

/// Trait for types that can be used as OpenAI structured output.
///
/// Automatically implemented for any type that implements `JsonSchema + DeserializeOwned`.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
    /// Generate an OpenAI strict-mode schema for this type.
    ///
    /// Strict mode requires `additionalProperties: false` on every object,
    /// every property listed in `required`, no `$ref`s, and no validation
    /// keywords outside its supported subset.
    fn openai_schema() -> Value {
        let schema = schema_for!(Self);
        let mut value = serde_json::to_value(schema).unwrap_or_default();

        inline_refs(&mut value);

        if let Value::Object(map) = &mut value {
            map.remove("definitions");
            map.remove("$schema");
        }

        flatten_single_all_of(&mut value);
        close_objects(&mut value);
        strip_unsupported(&mut value);

        value
    }

    fn type_name() -> String {
        <Self as JsonSchema>::schema_name()
    }
}

impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

/// Merge `allOf: [schema]` wrappers into their parent.
///
/// schemars emits these when a field with a doc comment points at another
/// type; after inlining they are just noise that strict mode rejects.
fn flatten_single_all_of(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let single = match map.get("allOf").and_then(Value::as_array) {
                Some(items) if items.len() == 1 => items[0].as_object().cloned(),
                _ => None,
            };
            if let Some(inner) = single {
                map.remove("allOf");
                for (key, v) in inner {
                    map.entry(key).or_insert(v);
                }
            }

            for (_, v) in map.iter_mut() {
                flatten_single_all_of(v);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(flatten_single_all_of),
        _ => {}
    }
}

/// Mark every object schema closed and require all of its properties.
fn close_objects(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if map.get("type").and_then(Value::as_str) == Some("object") {
                map.insert("additionalProperties".to_string(), Value::Bool(false));

                let required: Vec<Value> = map
                    .get("properties")
                    .and_then(Value::as_object)
                    .map(|props| props.keys().cloned().map(Value::String).collect())
                    .unwrap_or_default();
                map.insert("required".to_string(), Value::Array(required));
            }

            for (_, v) in map.iter_mut() {
                close_objects(v);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(close_objects),
        _ => {}
    }
}

fn strip_unsupported(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for keyword in UNSUPPORTED_KEYWORDS {
                map.remove(*keyword);
            }
            if map.get("type").and_then(Value::as_str) != Some("string") {
                map.remove("format");
            }

            // Property names are user data, not keywords; only descend into their schemas.
            for (key, v) in map.iter_mut() {
                if key == "properties" {
                    if let Value::Object(props) = v {
                        props.values_mut().for_each(strip_unsupported);
                    }
                } else {
                    strip_unsupported(v);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(strip_unsupported),
        _ => {}
    }
}

/// Replace every `#/definitions/...` reference with the definition itself.
fn inline_refs(value: &mut Value) {
    let definitions = match value {
        Value::Object(map) => map.get("definitions").and_then(Value::as_object).cloned(),
        _ => None,
    };

    if let Some(defs) = definitions {
        inline_refs_with(value, &defs);
    }
}

fn inline_refs_with(value: &mut Value, definitions: &Map<String, Value>) {
    match value {
        Value::Object(map) => {
            let target = map
                .get("$ref")
                .and_then(Value::as_str)
                .and_then(|r| r.strip_prefix("#/definitions/"))
                .and_then(|name| definitions.get(name))
                .cloned();

            if let Some(def) = target {
                *value = def;
                inline_refs_with(value, definitions);
                return;
            }

            for (_, v) in map.iter_mut() {
                inline_refs_with(v, definitions);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                inline_refs_with(item, definitions);
            }
        }
        _ => {}
    }
}
