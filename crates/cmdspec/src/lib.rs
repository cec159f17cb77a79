//! Declarative command schemas and a small parser for command lines.
//!
//! A [`Command`] lists the positional [`Argument`]s and [`OptionDef`]s it
//! accepts. [`Command::parse`] splits a raw input string on spaces and runs a
//! single pass over the tokens, producing a [`ParseResult`].
//!
//! ```
//! use cmdspec::{Command, OptionValue, ValueType};
//!
//! let mut cmd = Command::new("greet");
//! cmd.argument("name").set_required(true);
//! cmd.option("greeting")
//!     .set_shorthand("g")
//!     .set_accepts(ValueType::String);
//!
//! let result = cmd.parse(r#"world -g "good morning""#).unwrap();
//! assert_eq!(result.argument("name"), Some("world"));
//! assert_eq!(
//!     result.option("greeting"),
//!     Some(&OptionValue::String("good morning".to_string()))
//! );
//! ```
//!
//! Around the parser sit a few thin layers:
//! - [`help`] renders usage text from a schema
//! - [`CommandHandler`] picks a command by the first token of a line
//! - `parse_async` on both exposes the same parse as a ready future

mod argument;
mod command;
mod error;
mod handler;
pub mod help;
mod option;
mod parser;
mod result;

pub use argument::Argument;
pub use command::Command;
pub use error::{ParseError, SchemaError};
pub use handler::{CommandHandler, Dispatch};
pub use option::{OptionDef, OptionValue, ValueType};
pub use result::ParseResult;
