//! Declared input schemas for MCP tools
//!
//! A [`ToolSchema`] is a list of [`FieldRule`]s. It serves two purposes: it renders
//! the JSON Schema advertised through `list_tools`, and it validates incoming
//! arguments field by field before a handler ever runs.

use crate::error::ValidationError;
use serde_json::{json, Map, Number, Value};

/// JSON type a field must have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Any JSON string
    String,
    /// Any JSON number
    Number,
    /// A whole number; integral floats such as `5.0` are accepted
    Integer,
}

impl FieldKind {
    fn json_type(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Integer => "integer",
        }
    }
}

/// Validation rule for a single argument
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRule {
    /// Argument name
    pub name: &'static str,
    /// Expected JSON type
    pub kind: FieldKind,
    /// Description shown to the agent host
    pub description: &'static str,
    /// Whether the argument must be present
    pub required: bool,
    /// Minimum string length in characters
    pub min_length: Option<usize>,
    /// Number must be greater than zero
    pub positive: bool,
    /// Message used instead of the generated one when a constraint fails
    pub message: Option<&'static str>,
}

impl FieldRule {
    fn new(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
            required: true,
            min_length: None,
            positive: false,
            message: None,
        }
    }

    /// Required string argument
    pub fn string(name: &'static str, description: &'static str) -> Self {
        Self::new(name, FieldKind::String, description)
    }

    /// Required number argument
    pub fn number(name: &'static str, description: &'static str) -> Self {
        Self::new(name, FieldKind::Number, description)
    }

    /// Required integer argument
    pub fn integer(name: &'static str, description: &'static str) -> Self {
        Self::new(name, FieldKind::Integer, description)
    }

    /// Make the argument optional
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Require at least `len` characters
    pub fn min_length(mut self, len: usize) -> Self {
        self.min_length = Some(len);
        self
    }

    /// Require a value greater than zero
    pub fn positive(mut self) -> Self {
        self.positive = true;
        self
    }

    /// Report constraint failures with `message`
    pub fn message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }

    fn fail(&self, generated: impl Into<String>) -> ValidationError {
        let reason = match self.message {
            Some(message) => message.to_string(),
            None => generated.into(),
        };
        ValidationError::new(self.name, reason)
    }

    fn to_json(&self) -> Value {
        let mut property = Map::new();
        property.insert("type".into(), json!(self.kind.json_type()));
        property.insert("description".into(), json!(self.description));
        if let Some(len) = self.min_length {
            property.insert("minLength".into(), json!(len));
        }
        if self.positive {
            property.insert("exclusiveMinimum".into(), json!(0));
        }
        Value::Object(property)
    }

    /// Check `value` and return it in normalised form
    fn check(&self, value: &Value) -> Result<Value, ValidationError> {
        match self.kind {
            FieldKind::String => {
                let text = value.as_str().ok_or_else(|| {
                    ValidationError::new(
                        self.name,
                        format!("expected a string, got {}", type_name(value)),
                    )
                })?;
                if let Some(min) = self.min_length {
                    if text.chars().count() < min {
                        return Err(self.fail(format!("must be at least {min} characters")));
                    }
                }
                Ok(value.clone())
            }
            FieldKind::Number => {
                let number = value.as_f64().ok_or_else(|| {
                    ValidationError::new(
                        self.name,
                        format!("expected a number, got {}", type_name(value)),
                    )
                })?;
                if self.positive && number <= 0.0 {
                    return Err(self.fail("must be positive"));
                }
                Ok(value.clone())
            }
            FieldKind::Integer => {
                let integer = match as_integer(value) {
                    Some(integer) => integer,
                    None if is_integral(value) => {
                        return Err(ValidationError::new(self.name, "is out of range"));
                    }
                    None => {
                        return Err(ValidationError::new(
                            self.name,
                            format!("expected an integer, got {}", type_name(value)),
                        ));
                    }
                };
                if self.positive && integer <= 0 {
                    return Err(self.fail("must be a positive integer"));
                }
                Ok(Value::Number(Number::from(integer)))
            }
        }
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    if let Some(i) = value.as_i64() {
        return Some(i);
    }
    let f = value.as_f64()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Whole number that may not fit in an `i64`
fn is_integral(value: &Value) -> bool {
    value.as_u64().is_some() || value.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) if is_integral(value) => "an integer",
        Value::Number(_) => "a fractional number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Input schema of a tool
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolSchema {
    fields: Vec<FieldRule>,
}

impl ToolSchema {
    /// Schema for a tool without arguments
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add a field rule
    pub fn field(mut self, rule: FieldRule) -> Self {
        self.fields.push(rule);
        self
    }

    /// Declared field rules, in declaration order
    pub fn fields(&self) -> &[FieldRule] {
        &self.fields
    }

    /// JSON Schema object advertised to the agent host
    pub fn to_json(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|rule| (rule.name.to_string(), rule.to_json()))
            .collect();
        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|rule| rule.required)
            .map(|rule| rule.name)
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required
        })
    }

    /// Validate `arguments`, returning only the declared fields in normalised form
    ///
    /// Fields are checked in declaration order and the first failure is reported.
    /// Undeclared arguments are dropped.
    pub fn validate(
        &self,
        arguments: &Map<String, Value>,
    ) -> Result<Map<String, Value>, ValidationError> {
        let mut validated = Map::new();

        for rule in &self.fields {
            match arguments.get(rule.name) {
                None | Some(Value::Null) => {
                    if rule.required {
                        return Err(ValidationError::new(rule.name, "is required"));
                    }
                }
                Some(value) => {
                    validated.insert(rule.name.to_string(), rule.check(value)?);
                }
            }
        }

        Ok(validated)
    }
}
