use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::SchemaError;

/// The kind of value a value-bearing option accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    String,
    Integer,
    Float,
}

impl ValueType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "integer" => Ok(Self::Integer),
            "float" => Ok(Self::Float),
            other => Err(SchemaError::InvalidOptionType(other.to_string())),
        }
    }
}

/// A parsed option value.
///
/// Boolean flags produce `Flag`; value-bearing options produce the variant
/// matching their [`ValueType`]. Serializes as a bare JSON value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    Flag(bool),
    String(String),
    Integer(i64),
    Float(f64),
}

impl OptionValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            Self::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Whether the option was given at all (anything but `Flag(false)`).
    pub fn is_set(&self) -> bool {
        !matches!(self, Self::Flag(false))
    }
}

/// A flag or value slot of a [`Command`](crate::Command).
///
/// Without an accepted [`ValueType`] the option is a boolean presence flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDef {
    name: String,
    shorthand: Option<String>,
    description: Option<String>,
    required: bool,
    accepts: Option<ValueType>,
}

impl OptionDef {
    /// Create an optional boolean flag with no shorthand or description.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shorthand: None,
            description: None,
            required: false,
            accepts: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shorthand(&self) -> Option<&str> {
        self.shorthand.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn accepts(&self) -> Option<ValueType> {
        self.accepts
    }

    /// Whether the option consumes the following token as its value.
    pub fn takes_value(&self) -> bool {
        self.accepts.is_some()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    pub fn set_shorthand(&mut self, shorthand: impl Into<String>) -> &mut Self {
        self.shorthand = Some(shorthand.into());
        self
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    pub fn set_required(&mut self, required: bool) -> &mut Self {
        self.required = required;
        self
    }

    pub fn set_accepts(&mut self, accepts: ValueType) -> &mut Self {
        self.accepts = Some(accepts);
        self
    }

    /// Set the accepted type from its name (`"string"`, `"integer"` or `"float"`).
    pub fn set_accepts_str(&mut self, accepts: &str) -> Result<&mut Self, SchemaError> {
        let accepts = accepts.parse()?;
        Ok(self.set_accepts(accepts))
    }

    /// The long form of this option as written on a command line.
    pub fn long_token(&self) -> String {
        format!("--{}", self.name)
    }

    /// The short form of this option, if it has a shorthand.
    pub fn short_token(&self) -> Option<String> {
        self.shorthand.as_ref().map(|s| format!("-{s}"))
    }

    /// Whether `token` is exactly `--name` or `-shorthand`.
    pub fn matches(&self, token: &str) -> bool {
        if let Some(long) = token.strip_prefix("--") {
            if long == self.name {
                return true;
            }
        }
        match (&self.shorthand, token.strip_prefix('-')) {
            (Some(short), Some(rest)) => rest == short,
            _ => false,
        }
    }

    /// Whether `token` is an acceptable value for this option.
    ///
    /// Flags accept no value at all.
    pub fn is_valid_value(&self, token: &str) -> bool {
        match self.accepts {
            Some(ValueType::String) => true,
            Some(ValueType::Integer) => integer_from(parse_float_prefix(token)).is_some(),
            Some(ValueType::Float) => !parse_float_prefix(token).is_nan(),
            None => false,
        }
    }

    /// Coerce `token` into this option's value type.
    ///
    /// Returns `None` wherever [`is_valid_value`](Self::is_valid_value) is false.
    pub fn parse_value(&self, token: &str) -> Option<OptionValue> {
        match self.accepts? {
            ValueType::String => Some(OptionValue::String(token.to_string())),
            ValueType::Integer => integer_from(parse_float_prefix(token)).map(OptionValue::Integer),
            ValueType::Float => {
                let value = parse_float_prefix(token);
                (!value.is_nan()).then_some(OptionValue::Float(value))
            }
        }
    }
}

// 2^63; the largest f64 strictly below it is a valid i64.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn integer_from(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value >= -I64_BOUND && value < I64_BOUND {
        Some(value as i64)
    } else {
        None
    }
}

/// Parse the longest leading decimal literal of `token`, ignoring whatever
/// follows it. Returns NaN when there is no such prefix.
///
/// Accepts an optional sign followed by `Infinity` or by digits with an
/// optional fraction and exponent, so `"4.2kg"` is `4.2` and `"1e3"` is `1000`.
fn parse_float_prefix(token: &str) -> f64 {
    let s = token.trim_start();
    let bytes = s.as_bytes();
    let digits = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    if s[end..].starts_with("Infinity") {
        return if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_digits = digits(end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits(end + 1);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = digits(exp);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }

    s[..end].parse().unwrap_or(f64::NAN)
}
