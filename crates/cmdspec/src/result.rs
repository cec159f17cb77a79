use indexmap::IndexMap;
use serde::Serialize;

use crate::option::OptionValue;

/// The output of a single [`Command::parse`](crate::Command::parse) call.
///
/// Maps keep the order in which values were assigned.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParseResult {
    arguments: IndexMap<String, String>,
    options: IndexMap<String, OptionValue>,
    overflow: Vec<String>,
}

impl ParseResult {
    /// The value of a positional argument, if it was given.
    pub fn argument(&self, name: &str) -> Option<&str> {
        self.arguments.get(name).map(String::as_str)
    }

    /// The value of an option. Every declared option is present after a
    /// successful parse; absent flags read as `Flag(false)`.
    pub fn option(&self, name: &str) -> Option<&OptionValue> {
        self.options.get(name)
    }

    /// Whether the option was given (a flag set to `true` or any value).
    pub fn is_set(&self, name: &str) -> bool {
        self.options.get(name).is_some_and(OptionValue::is_set)
    }

    pub fn arguments(&self) -> &IndexMap<String, String> {
        &self.arguments
    }

    pub fn options(&self) -> &IndexMap<String, OptionValue> {
        &self.options
    }

    /// Tokens that could not be attributed to any argument or option, in
    /// input order.
    pub fn overflow(&self) -> &[String] {
        &self.overflow
    }
}

impl ParseResult {
    pub(crate) fn set_argument(&mut self, name: &str, value: &str) {
        self.arguments.insert(name.to_string(), value.to_string());
    }

    pub(crate) fn set_option(&mut self, name: &str, value: OptionValue) {
        self.options.insert(name.to_string(), value);
    }

    pub(crate) fn push_overflow(&mut self, token: &str) {
        self.overflow.push(token.to_string());
    }

    pub(crate) fn has_argument(&self, name: &str) -> bool {
        self.arguments.contains_key(name)
    }

    pub(crate) fn has_option(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }
}
