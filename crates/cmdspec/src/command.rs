use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use futures_util::future::{Ready, ready};

use crate::argument::Argument;
use crate::error::{ParseError, SchemaError};
use crate::option::OptionDef;
use crate::parser;
use crate::result::ParseResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LastAdded {
    Argument(usize),
    Option(usize),
}

/// A command schema: the arguments and options one command accepts.
///
/// Build it once, then parse any number of inputs through `&self`.
#[derive(Debug, Clone)]
pub struct Command {
    name: String,
    description: Option<String>,
    version: Option<String>,
    strict: bool,
    arguments: Vec<Argument>,
    options: Vec<OptionDef>,
    last_added: Option<LastAdded>,
    /// Outcome of [`Command::validate`], reset whenever a definition is added.
    checked: OnceLock<Result<(), SchemaError>>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            version: None,
            strict: false,
            arguments: Vec::new(),
            options: Vec::new(),
            last_added: None,
            checked: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Whether unknown tokens fail the parse instead of going to overflow.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Declared arguments, in positional order.
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Declared options, in declaration order.
    pub fn options(&self) -> &[OptionDef] {
        &self.options
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    pub fn set_version(&mut self, version: impl Into<String>) -> &mut Self {
        self.version = Some(version.into());
        self
    }

    /// Reject undeclared options and surplus positionals.
    ///
    /// There is no way back to permissive mode.
    pub fn strict(&mut self) -> &mut Self {
        self.strict = true;
        self
    }

    /// Declare the next positional argument and return it for further setup.
    pub fn argument(&mut self, name: impl Into<String>) -> &mut Argument {
        self.add_argument(Argument::new(name))
    }

    /// Declare a boolean flag and return it for further setup.
    ///
    /// Give it a value type with [`OptionDef::set_accepts`] to make it
    /// value-bearing.
    pub fn option(&mut self, name: impl Into<String>) -> &mut OptionDef {
        self.add_option(OptionDef::new(name))
    }

    pub fn add_argument(&mut self, argument: Argument) -> &mut Argument {
        let idx = self.arguments.len();
        self.arguments.push(argument);
        self.checked.take();
        self.last_added = Some(LastAdded::Argument(idx));
        &mut self.arguments[idx]
    }

    pub fn add_option(&mut self, option: OptionDef) -> &mut OptionDef {
        let idx = self.options.len();
        self.options.push(option);
        self.checked.take();
        self.last_added = Some(LastAdded::Option(idx));
        &mut self.options[idx]
    }

    /// Set the accepted value type of the most recently added option.
    pub fn accepts(&mut self, accepts: &str) -> Result<&mut Self, SchemaError> {
        let option = self
            .options
            .last_mut()
            .ok_or(SchemaError::NoOptionDefined)?;
        option.set_accepts_str(accepts)?;
        Ok(self)
    }

    /// Mark the most recently added argument or option as required.
    pub fn required(&mut self) -> Result<&mut Self, SchemaError> {
        match self.last_added {
            Some(LastAdded::Argument(idx)) => {
                self.arguments[idx].set_required(true);
            }
            Some(LastAdded::Option(idx)) => {
                self.options[idx].set_required(true);
            }
            None => return Err(SchemaError::NoTargetForRequired),
        }
        Ok(self)
    }

    /// Check that no two arguments share a name and no command-line token
    /// matches more than one option.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut seen = HashSet::new();
        for argument in &self.arguments {
            if !seen.insert(argument.name()) {
                return Err(SchemaError::DuplicateArgument(argument.name().to_string()));
            }
        }

        let mut tokens: HashMap<String, usize> = HashMap::new();
        for (idx, option) in self.options.iter().enumerate() {
            for token in std::iter::once(option.long_token()).chain(option.short_token()) {
                if let Some(prev) = tokens.insert(token.clone(), idx) {
                    if prev != idx {
                        return Err(SchemaError::DuplicateOption(token));
                    }
                }
            }
        }

        Ok(())
    }

    /// Parse a raw command line (without the command name) against this schema.
    ///
    /// The schema is checked with [`validate`](Self::validate) first and a
    /// duplicate declaration fails the parse with [`ParseError::Schema`].
    /// That check runs once and is reused until another definition is added.
    pub fn parse(&self, input: &str) -> Result<ParseResult, ParseError> {
        self.checked.get_or_init(|| self.validate()).clone()?;
        parser::run(self, input)
    }

    /// [`parse`](Self::parse) as a future.
    ///
    /// The parse runs before this returns; the future is already complete.
    pub fn parse_async(&self, input: &str) -> Ready<Result<ParseResult, ParseError>> {
        ready(self.parse(input))
    }

    /// Render usage text for this command.
    pub fn help(&self) -> String {
        crate::help::render(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::ValueType;

    #[test]
    fn new_command_has_only_a_name() {
        let cmd = Command::new("cmd");
        assert_eq!(cmd.name(), "cmd");
        assert_eq!(cmd.description(), None);
        assert_eq!(cmd.version(), None);
        assert!(!cmd.is_strict());
        assert!(cmd.arguments().is_empty());
        assert!(cmd.options().is_empty());
    }

    #[test]
    fn setters_replace_metadata() {
        let mut cmd = Command::new("cmd");
        cmd.set_name("cmd2")
            .set_description("description")
            .set_version("1.0.0")
            .strict();

        assert_eq!(cmd.name(), "cmd2");
        assert_eq!(cmd.description(), Some("description"));
        assert_eq!(cmd.version(), Some("1.0.0"));
        assert!(cmd.is_strict());
    }

    #[test]
    fn handles_configure_the_new_definition() {
        let mut cmd = Command::new("cmd");
        cmd.argument("arg1").set_description("first").set_required(true);
        cmd.option("option1")
            .set_shorthand("o")
            .set_accepts(ValueType::Integer);

        assert_eq!(cmd.arguments()[0].description(), Some("first"));
        assert!(cmd.arguments()[0].is_required());
        assert_eq!(cmd.options()[0].shorthand(), Some("o"));
        assert_eq!(cmd.options()[0].accepts(), Some(ValueType::Integer));
    }

    #[test]
    fn add_keeps_prebuilt_definitions() {
        let mut arg = Argument::new("arg1");
        arg.set_required(true);
        let mut opt = OptionDef::new("option1");
        opt.set_shorthand("o");

        let mut cmd = Command::new("cmd");
        cmd.add_argument(arg.clone());
        cmd.add_option(opt.clone());

        assert_eq!(cmd.arguments(), &[arg]);
        assert_eq!(cmd.options(), &[opt]);
    }

    #[test]
    fn accepts_targets_the_last_option() {
        let mut cmd = Command::new("cmd");
        assert_eq!(
            cmd.accepts("string").unwrap_err(),
            SchemaError::NoOptionDefined
        );

        cmd.option("first");
        cmd.option("second");
        cmd.argument("arg");
        cmd.accepts("float").unwrap();

        assert_eq!(cmd.options()[0].accepts(), None);
        assert_eq!(cmd.options()[1].accepts(), Some(ValueType::Float));
        assert_eq!(
            cmd.accepts("bogus").unwrap_err(),
            SchemaError::InvalidOptionType("bogus".to_string())
        );
    }

    #[test]
    fn required_targets_the_last_definition() {
        let mut cmd = Command::new("cmd");
        assert_eq!(
            cmd.required().unwrap_err(),
            SchemaError::NoTargetForRequired
        );

        cmd.option("option1");
        cmd.required().unwrap();
        assert!(cmd.options()[0].is_required());

        cmd.argument("arg1");
        cmd.option("option2");
        cmd.argument("arg2");
        cmd.required().unwrap();
        assert!(!cmd.arguments()[0].is_required());
        assert!(cmd.arguments()[1].is_required());
        assert!(!cmd.options()[1].is_required());
    }

    #[test]
    fn fluent_convenience_chains() {
        let mut cmd = Command::new("cmd");
        cmd.option("option1").set_shorthand("o");
        cmd.accepts("string").unwrap().required().unwrap();

        let opt = &cmd.options()[0];
        assert_eq!(opt.accepts(), Some(ValueType::String));
        assert!(opt.is_required());
    }

    #[test]
    fn validate_rejects_duplicate_arguments() {
        let mut cmd = Command::new("cmd");
        cmd.argument("arg");
        cmd.argument("arg");
        assert_eq!(
            cmd.validate().unwrap_err(),
            SchemaError::DuplicateArgument("arg".to_string())
        );
    }

    #[test]
    fn validate_rejects_shared_option_tokens() {
        let mut cmd = Command::new("cmd");
        cmd.option("verbose").set_shorthand("v");
        cmd.option("version").set_shorthand("v");
        assert_eq!(
            cmd.validate().unwrap_err(),
            SchemaError::DuplicateOption("-v".to_string())
        );

        let mut cmd = Command::new("cmd");
        cmd.option("same");
        cmd.option("same");
        assert_eq!(
            cmd.validate().unwrap_err(),
            SchemaError::DuplicateOption("--same".to_string())
        );
    }

    #[test]
    fn definitions_added_after_a_parse_are_checked() {
        let mut cmd = Command::new("cmd");
        cmd.option("verbose").set_shorthand("v");
        assert!(cmd.parse("-v").is_ok());

        cmd.option("version").set_shorthand("v");
        for _ in 0..2 {
            assert_eq!(
                cmd.parse("-v").unwrap_err(),
                ParseError::Schema(SchemaError::DuplicateOption("-v".to_string()))
            );
        }
    }

    #[test]
    fn validate_accepts_distinct_definitions() {
        let mut cmd = Command::new("cmd");
        cmd.argument("input");
        cmd.argument("output");
        cmd.option("verbose").set_shorthand("v");
        cmd.option("v");
        assert!(cmd.validate().is_ok());
    }
}
