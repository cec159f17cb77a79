//! The single-pass state machine behind [`Command::parse`].

use crate::command::Command;
use crate::error::ParseError;
use crate::option::{OptionDef, OptionValue, ValueType};
use crate::result::ParseResult;

/// A value-bearing option waiting for its value.
#[derive(Debug, Clone, Copy)]
struct Pending<'c> {
    option: &'c OptionDef,
    accepts: ValueType,
}

#[derive(Debug)]
enum State<'c, 'i> {
    Normal,
    /// After `--`: everything is overflow.
    NonOptions,
    OptionValue(Pending<'c>),
    /// Inside a `"quoted string value"` spanning several tokens.
    OptionValueString(Pending<'c>, Vec<&'i str>),
}

struct Parser<'c> {
    command: &'c Command,
    result: ParseResult,
    argument_index: usize,
}

pub(crate) fn run(command: &Command, input: &str) -> Result<ParseResult, ParseError> {
    tracing::debug!(command = command.name(), strict = command.is_strict(), "parsing input");

    let mut parser = Parser {
        command,
        result: ParseResult::default(),
        argument_index: 0,
    };

    let mut state = State::Normal;
    for token in input.split(' ').filter(|t| !t.is_empty()) {
        state = parser.step(state, token)?;
    }

    match state {
        State::OptionValue(pending) | State::OptionValueString(pending, _) => {
            return Err(ParseError::IncompleteOptionValue(
                pending.option.name().to_string(),
            ));
        }
        State::Normal | State::NonOptions => {}
    }

    let result = parser.finish()?;
    tracing::debug!(
        command = command.name(),
        arguments = result.arguments().len(),
        overflow = result.overflow().len(),
        "parsed input"
    );
    Ok(result)
}

impl<'c> Parser<'c> {
    fn step<'i>(&mut self, state: State<'c, 'i>, token: &'i str) -> Result<State<'c, 'i>, ParseError> {
        match state {
            State::NonOptions => {
                self.result.push_overflow(token);
                Ok(State::NonOptions)
            }
            State::OptionValue(pending) => self.option_value(pending, token),
            State::OptionValueString(pending, mut pieces) => {
                if let Some(last) = token.strip_suffix('"') {
                    pieces.push(last);
                    self.assign(pending.option, OptionValue::String(pieces.join(" ")));
                    Ok(State::Normal)
                } else {
                    pieces.push(token);
                    Ok(State::OptionValueString(pending, pieces))
                }
            }
            State::Normal => self.normal(token),
        }
    }

    fn option_value<'i>(
        &mut self,
        pending: Pending<'c>,
        token: &'i str,
    ) -> Result<State<'c, 'i>, ParseError> {
        let option = pending.option;

        if pending.accepts == ValueType::String {
            if let Some(rest) = token.strip_prefix('"') {
                if let Some(value) = rest.strip_suffix('"') {
                    self.assign(option, OptionValue::String(value.to_string()));
                    return Ok(State::Normal);
                }
                tracing::trace!(option = option.name(), "reading quoted value");
                return Ok(State::OptionValueString(pending, vec![rest]));
            }
        }

        let invalid = || ParseError::InvalidOptionValue {
            option: option.name().to_string(),
            value: token.to_string(),
            expected: pending.accepts,
        };
        if !option.is_valid_value(token) {
            return Err(invalid());
        }
        let value = option.parse_value(token).ok_or_else(invalid)?;
        self.assign(option, value);
        Ok(State::Normal)
    }

    fn normal<'i>(&mut self, token: &'i str) -> Result<State<'c, 'i>, ParseError> {
        let command = self.command;

        if token == "--" {
            tracing::trace!("end of options");
            return Ok(State::NonOptions);
        }

        if token.starts_with('-') {
            return match command.options().iter().find(|o| o.matches(token)) {
                Some(option) => match option.accepts() {
                    Some(accepts) => {
                        tracing::trace!(option = option.name(), %accepts, "awaiting value");
                        Ok(State::OptionValue(Pending { option, accepts }))
                    }
                    None => {
                        self.assign(option, OptionValue::Flag(true));
                        Ok(State::Normal)
                    }
                },
                None if command.is_strict() => Err(ParseError::UnknownOption(token.to_string())),
                None => {
                    self.result.push_overflow(token);
                    Ok(State::Normal)
                }
            };
        }

        if let Some(argument) = command.arguments().get(self.argument_index) {
            tracing::trace!(argument = argument.name(), token, "positional");
            self.result.set_argument(argument.name(), token);
            self.argument_index += 1;
        } else if command.is_strict() {
            return Err(ParseError::UnknownArgument(token.to_string()));
        } else {
            self.result.push_overflow(token);
        }
        Ok(State::Normal)
    }

    fn assign(&mut self, option: &OptionDef, value: OptionValue) {
        tracing::trace!(option = option.name(), ?value, "option set");
        self.result.set_option(option.name(), value);
    }

    /// Fill in absent flags and check required definitions.
    fn finish(mut self) -> Result<ParseResult, ParseError> {
        for option in self.command.options() {
            if self.result.has_option(option.name()) {
                continue;
            }
            if option.is_required() {
                return Err(ParseError::MissingRequiredOption(option.name().to_string()));
            }
            self.result.set_option(option.name(), OptionValue::Flag(false));
        }

        for argument in self.command.arguments() {
            if argument.is_required() && !self.result.has_argument(argument.name()) {
                return Err(ParseError::MissingRequiredArgument(
                    argument.name().to_string(),
                ));
            }
        }

        Ok(self.result)
    }
}
