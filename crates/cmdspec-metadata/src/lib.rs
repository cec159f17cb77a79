//! Serializable description of cmdspec command schemas.
//!
//! These types mirror [`cmdspec::Command`] and its definitions so a set of
//! commands can be declared in a JSON manifest and turned into a working
//! [`cmdspec::CommandHandler`].

use cmdspec::{Argument, Command, CommandHandler, OptionDef, SchemaError};
use serde::{Deserialize, Serialize};

/// Schema version written by [`Manifest::example`].
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OptionMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shorthand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `"string"`, `"integer"` or `"float"`; absent for boolean flags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepts: Option<String>,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CommandMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub strict: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<ArgumentMeta>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionMeta>,
}

impl CommandMeta {
    /// Build the command schema. Fails on an unknown `accepts` type.
    pub fn to_command(&self) -> Result<Command, SchemaError> {
        let mut command = Command::new(&self.name);
        if let Some(description) = &self.description {
            command.set_description(description);
        }
        if let Some(version) = &self.version {
            command.set_version(version);
        }
        if self.strict {
            command.strict();
        }

        for a in &self.arguments {
            let argument = command.argument(&a.name);
            argument.set_required(a.required);
            if let Some(description) = &a.description {
                argument.set_description(description);
            }
        }

        for o in &self.options {
            let option = command.option(&o.name);
            option.set_required(o.required);
            if let Some(shorthand) = &o.shorthand {
                option.set_shorthand(shorthand);
            }
            if let Some(description) = &o.description {
                option.set_description(description);
            }
            if let Some(accepts) = &o.accepts {
                option.set_accepts_str(accepts)?;
            }
        }

        Ok(command)
    }

    pub fn from_command(command: &Command) -> Self {
        Self {
            name: command.name().to_string(),
            description: command.description().map(str::to_string),
            version: command.version().map(str::to_string),
            strict: command.is_strict(),
            arguments: command.arguments().iter().map(argument_meta).collect(),
            options: command.options().iter().map(option_meta).collect(),
        }
    }
}

fn argument_meta(a: &Argument) -> ArgumentMeta {
    ArgumentMeta {
        name: a.name().to_string(),
        description: a.description().map(str::to_string),
        required: a.is_required(),
    }
}

fn option_meta(o: &OptionDef) -> OptionMeta {
    OptionMeta {
        name: o.name().to_string(),
        shorthand: o.shorthand().map(str::to_string),
        description: o.description().map(str::to_string),
        accepts: o.accepts().map(|t| t.as_str().to_string()),
        required: o.is_required(),
    }
}

/// A set of command schemas, as stored in a manifest file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<u32>,
    #[serde(default)]
    pub commands: Vec<CommandMeta>,
}

impl Manifest {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Build each command and check it for duplicate declarations.
    pub fn to_commands(&self) -> Result<Vec<Command>, SchemaError> {
        self.commands
            .iter()
            .map(|meta| -> Result<Command, SchemaError> {
                let command = meta.to_command()?;
                command.validate()?;
                Ok(command)
            })
            .collect()
    }

    pub fn to_handler(&self) -> Result<CommandHandler, SchemaError> {
        let mut handler = CommandHandler::new();
        handler.add_commands(self.to_commands()?);
        Ok(handler)
    }

    /// A small manifest showing every kind of definition.
    pub fn example() -> Self {
        Self {
            schema_version: Some(SCHEMA_VERSION),
            commands: vec![CommandMeta {
                name: "greet".to_string(),
                description: Some("Print a greeting".to_string()),
                version: Some("0.1.0".to_string()),
                strict: false,
                arguments: vec![ArgumentMeta {
                    name: "name".to_string(),
                    description: Some("Who to greet".to_string()),
                    required: true,
                }],
                options: vec![
                    OptionMeta {
                        name: "greeting".to_string(),
                        shorthand: Some("g".to_string()),
                        description: Some("Greeting to use".to_string()),
                        accepts: Some("string".to_string()),
                        required: false,
                    },
                    OptionMeta {
                        name: "times".to_string(),
                        shorthand: Some("n".to_string()),
                        description: Some("How many times to repeat".to_string()),
                        accepts: Some("integer".to_string()),
                        required: false,
                    },
                    OptionMeta {
                        name: "shout".to_string(),
                        shorthand: Some("s".to_string()),
                        description: Some("Print in upper case".to_string()),
                        accepts: None,
                        required: false,
                    },
                ],
            }],
        }
    }
}
