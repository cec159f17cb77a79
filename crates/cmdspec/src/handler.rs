use futures_util::future::{Ready, ready};
use indexmap::IndexMap;

use crate::command::Command;
use crate::error::ParseError;
use crate::result::ParseResult;

/// The command selected by [`CommandHandler::parse`] and its parse result.
#[derive(Debug, Clone)]
pub struct Dispatch<'a> {
    pub command: &'a Command,
    pub result: ParseResult,
}

/// A registry of commands keyed by name.
///
/// The first token of an input line picks the command; the rest of the line
/// is parsed by it.
#[derive(Debug, Clone, Default)]
pub struct CommandHandler {
    commands: IndexMap<String, Command>,
}

impl CommandHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command under its current name, replacing any earlier
    /// command with the same name.
    pub fn add_command(&mut self, command: Command) -> &mut Self {
        let name = command.name().to_string();
        if self.commands.insert(name, command).is_some() {
            tracing::debug!("replaced an existing command");
        }
        self
    }

    pub fn add_commands(&mut self, commands: impl IntoIterator<Item = Command>) -> &mut Self {
        for command in commands {
            self.add_command(command);
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    /// Registered commands in registration order.
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Parse a full line such as `"copy a.txt b.txt --force"`.
    ///
    /// Returns `Ok(None)` when the leading token names no registered command.
    pub fn parse(&self, input: &str) -> Result<Option<Dispatch<'_>>, ParseError> {
        let (name, rest) = input.split_once(' ').unwrap_or((input, ""));
        let Some(command) = self.commands.get(name) else {
            tracing::debug!(command = name, "no such command");
            return Ok(None);
        };
        let result = command.parse(rest)?;
        Ok(Some(Dispatch { command, result }))
    }

    /// [`parse`](Self::parse) as an already-completed future.
    pub fn parse_async(&self, input: &str) -> Ready<Result<Option<Dispatch<'_>>, ParseError>> {
        ready(self.parse(input))
    }
}
