/// A positional slot of a [`Command`](crate::Command).
///
/// Slots are filled in declaration order, regardless of the token's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    name: String,
    description: Option<String>,
    required: bool,
}

impl Argument {
    /// Create an optional argument with no description.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            required: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
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
}
