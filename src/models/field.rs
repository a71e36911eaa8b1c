use serde_json::{Number, Value};

/// The declared type of a kind's field.
///
/// Declared types drive value coercion on `update`. Only the scalar types
/// (`Str`, `Int`, `Float`) coerce; `List` fields accept a list literal or keep
/// the raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Str,
    Int,
    Float,
    List,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Str => "string",
            Self::Int => "integer",
            Self::Float => "float",
            Self::List => "list",
        }
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, Self::List)
    }

    /// The value an unset field of this type reads as through
    /// [`Entity::get`](super::Entity::get).
    pub fn default_value(&self) -> Value {
        match self {
            Self::Str => Value::String(String::new()),
            Self::Int => Value::from(0),
            Self::Float => Value::from(0.0),
            Self::List => Value::Array(Vec::new()),
        }
    }

    /// Convert `value` into this type.
    ///
    /// Returns `None` when the value has no sensible conversion, e.g. the text
    /// `"abc"` for an integer field. `List` never coerces.
    pub fn coerce(&self, value: &Value) -> Option<Value> {
        match self {
            // Constants keep the spelling of the literal syntax.
            Self::Str => Some(Value::String(match value {
                Value::String(s) => s.clone(),
                Value::Bool(true) => "True".to_string(),
                Value::Bool(false) => "False".to_string(),
                Value::Null => "None".to_string(),
                other => other.to_string(),
            })),
            Self::Int => match value {
                Value::String(s) => s.trim().parse::<i64>().ok().map(Value::from),
                Value::Number(n) => n
                    .as_i64()
                    .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
                    .map(Value::from),
                Value::Bool(b) => Some(Value::from(i64::from(*b))),
                _ => None,
            },
            Self::Float => {
                let f = match value {
                    Value::String(s) => s.trim().parse::<f64>().ok()?,
                    Value::Number(n) => n.as_f64()?,
                    Value::Bool(b) => f64::from(u8::from(*b)),
                    _ => return None,
                };
                Number::from_f64(f).map(Value::Number)
            }
            Self::List => None,
        }
    }
}

/// A field declared on an entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub ty: FieldType,
}

impl Field {
    pub const fn new(name: &'static str, ty: FieldType) -> Self {
        Self { name, ty }
    }
}
