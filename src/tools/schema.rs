//! Declarative argument schemas.
//!
//! Every tool declares its arguments as a table of [`FieldSpec`]s. The same
//! table drives validation, default filling and the JSON Schema published in
//! `tools/list`, so a default lives in exactly one place.

use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use crate::error::ToolError;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    String,
    Number {
        min: Option<f64>,
        max: Option<f64>,
        integer: bool,
    },
    Boolean,
    Enum(&'static [&'static str]),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Presence {
    Required,
    Default(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: FieldKind,
    pub presence: Presence,
}

impl FieldSpec {
    fn new(name: &'static str, description: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            description,
            kind,
            presence: Presence::Required,
        }
    }

    pub fn string(name: &'static str, description: &'static str) -> Self {
        Self::new(name, description, FieldKind::String)
    }

    pub fn number(name: &'static str, description: &'static str) -> Self {
        Self::new(
            name,
            description,
            FieldKind::Number {
                min: None,
                max: None,
                integer: false,
            },
        )
    }

    pub fn integer(name: &'static str, description: &'static str) -> Self {
        Self::new(
            name,
            description,
            FieldKind::Number {
                min: None,
                max: None,
                integer: true,
            },
        )
    }

    pub fn boolean(name: &'static str, description: &'static str) -> Self {
        Self::new(name, description, FieldKind::Boolean)
    }

    pub fn one_of(
        name: &'static str,
        description: &'static str,
        variants: &'static [&'static str],
    ) -> Self {
        Self::new(name, description, FieldKind::Enum(variants))
    }

    /// Inclusive bounds. Ignored on non-numeric fields.
    pub fn range(mut self, lower: f64, upper: f64) -> Self {
        if let FieldKind::Number { min, max, .. } = &mut self.kind {
            *min = Some(lower);
            *max = Some(upper);
        }
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.presence = Presence::Default(value.into());
        self
    }

    fn check(&self, value: &Value) -> Result<Value, String> {
        match &self.kind {
            FieldKind::String => value
                .as_str()
                .map(|_| value.clone())
                .ok_or_else(|| format!("'{}' must be a string", self.name)),
            FieldKind::Boolean => value
                .as_bool()
                .map(|_| value.clone())
                .ok_or_else(|| format!("'{}' must be a boolean", self.name)),
            FieldKind::Enum(variants) => match value.as_str() {
                Some(s) if variants.contains(&s) => Ok(value.clone()),
                _ => Err(format!(
                    "'{}' must be one of: {}",
                    self.name,
                    variants.join(", ")
                )),
            },
            FieldKind::Number { min, max, integer } => {
                let n = value
                    .as_f64()
                    .ok_or_else(|| format!("'{}' must be a number", self.name))?;
                if let Some(lower) = min {
                    if n < *lower {
                        return Err(format!("'{}' must be >= {}", self.name, lower));
                    }
                }
                if let Some(upper) = max {
                    if n > *upper {
                        return Err(format!("'{}' must be <= {}", self.name, upper));
                    }
                }
                if *integer {
                    if n.fract() != 0.0 {
                        return Err(format!("'{}' must be an integer", self.name));
                    }
                    return Ok(json!(n as i64));
                }
                Ok(value.clone())
            }
        }
    }

    fn json_schema(&self) -> Value {
        let mut prop = Map::new();
        match &self.kind {
            FieldKind::String => {
                prop.insert("type".into(), json!("string"));
            }
            FieldKind::Boolean => {
                prop.insert("type".into(), json!("boolean"));
            }
            FieldKind::Enum(variants) => {
                prop.insert("type".into(), json!("string"));
                prop.insert("enum".into(), json!(variants));
            }
            FieldKind::Number { min, max, integer } => {
                let ty = if *integer { "integer" } else { "number" };
                prop.insert("type".into(), json!(ty));
                if let Some(lower) = min {
                    prop.insert("minimum".into(), json!(lower));
                }
                if let Some(upper) = max {
                    prop.insert("maximum".into(), json!(upper));
                }
            }
        }
        if let Presence::Default(value) = &self.presence {
            prop.insert("default".into(), value.clone());
        }
        prop.insert("description".into(), json!(self.description));
        Value::Object(prop)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolSchema {
    fields: Vec<FieldSpec>,
}

impl ToolSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Check `raw` against the table and fill in defaults.
    ///
    /// All problems are collected into one `ToolError::Validation`. A missing
    /// or `null` argument object is treated as empty.
    pub fn validate(&self, raw: &Value) -> Result<ValidatedArgs, ToolError> {
        let empty = Map::new();
        let input = match raw {
            Value::Null => &empty,
            Value::Object(map) => map,
            _ => return Err(ToolError::validation("arguments must be an object")),
        };

        let mut problems = Vec::new();
        for key in input.keys() {
            if !self.fields.iter().any(|f| f.name == key) {
                problems.push(format!("unknown argument '{}'", key));
            }
        }

        let mut out = Map::new();
        for spec in &self.fields {
            let supplied = input.get(spec.name).filter(|v| !v.is_null());
            match (supplied, &spec.presence) {
                (Some(value), _) => match spec.check(value) {
                    Ok(v) => {
                        out.insert(spec.name.to_string(), v);
                    }
                    Err(problem) => problems.push(problem),
                },
                (None, Presence::Required) => {
                    problems.push(format!("missing required argument '{}'", spec.name));
                }
                (None, Presence::Default(value)) => {
                    out.insert(spec.name.to_string(), value.clone());
                }
            }
        }

        if problems.is_empty() {
            Ok(ValidatedArgs(out))
        } else {
            Err(ToolError::validation(problems.join("; ")))
        }
    }

    /// JSON Schema (draft-07) advertised to clients.
    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|f| (f.name.to_string(), f.json_schema()))
            .collect();
        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|f| f.presence == Presence::Required)
            .map(|f| f.name)
            .collect();
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
            "$schema": "http://json-schema.org/draft-07/schema#"
        })
    }
}

/// Arguments that passed validation, with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedArgs(Map<String, Value>);

impl ValidatedArgs {
    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Deserialize into the tool's typed argument struct.
    pub fn parse<T: DeserializeOwned>(self) -> Result<T, ToolError> {
        serde_json::from_value(Value::Object(self.0))
            .map_err(|e| ToolError::validation(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ToolSchema {
        ToolSchema::new()
            .field(FieldSpec::string("query", "search text"))
            .field(
                FieldSpec::integer("limit", "result count")
                    .range(1.0, 40.0)
                    .with_default(1),
            )
            .field(FieldSpec::boolean("details", "detail flag").with_default(true))
            .field(FieldSpec::one_of("lang", "language", &["ko", "en"]).with_default("ko"))
    }

    #[test]
    fn defaults_are_applied() {
        let args = sample().validate(&json!({"query": "Seoul"})).unwrap();
        assert_eq!(args.get("limit"), Some(&json!(1)));
        assert_eq!(args.get("details"), Some(&json!(true)));
        assert_eq!(args.get("lang"), Some(&json!("ko")));
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let err = sample().validate(&json!({})).unwrap_err();
        assert!(matches!(err, ToolError::Validation(ref m) if m.contains("'query'")));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = sample()
            .validate(&json!({"query": "x", "extra": 1}))
            .unwrap_err();
        assert!(matches!(err, ToolError::Validation(ref m) if m.contains("'extra'")));
    }

    #[test]
    fn range_and_integer_are_enforced() {
        let schema = sample();
        for bad in [json!(0), json!(41), json!(2.5), json!("3")] {
            let result = schema.validate(&json!({"query": "x", "limit": bad}));
            assert!(result.is_err(), "limit {bad} should be rejected");
        }
        let args = schema.validate(&json!({"query": "x", "limit": 40.0})).unwrap();
        assert_eq!(args.get("limit"), Some(&json!(40)));
    }

    #[test]
    fn enum_rejects_values_outside_the_set() {
        let err = sample()
            .validate(&json!({"query": "x", "lang": "fr"}))
            .unwrap_err();
        assert!(err.to_string().contains("ko, en"));
    }

    #[test]
    fn non_object_arguments_are_rejected() {
        assert!(sample().validate(&json!([1, 2])).is_err());
        assert!(sample().validate(&Value::Null).is_err());
    }

    #[test]
    fn json_schema_lists_required_fields_and_defaults() {
        let schema = sample().to_json_schema();
        assert_eq!(schema["required"], json!(["query"]));
        assert_eq!(schema["properties"]["limit"]["type"], json!("integer"));
        assert_eq!(schema["properties"]["limit"]["maximum"], json!(40.0));
        assert_eq!(schema["properties"]["details"]["default"], json!(true));
        assert_eq!(schema["properties"]["lang"]["enum"], json!(["ko", "en"]));
        assert_eq!(schema["additionalProperties"], json!(false));
    }
}
