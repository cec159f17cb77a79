//! Usage text for a [`Command`].

use crate::argument::Argument;
use crate::command::Command;
use crate::option::OptionDef;

fn format_argument_left(def: &Argument) -> String {
    if def.is_required() {
        format!("<{}>", def.name())
    } else {
        format!("[{}]", def.name())
    }
}

fn format_option_left(def: &OptionDef) -> String {
    let mut names: Vec<String> = Vec::new();
    if let Some(short) = def.short_token() {
        names.push(short);
    }
    names.push(def.long_token());
    let mut out = names.join(", ");
    if let Some(accepts) = def.accepts() {
        out.push_str(&format!(" <{}>", accepts.as_str().to_ascii_uppercase()));
    }
    out
}

fn format_help(description: Option<&str>, required: bool) -> String {
    let mut out = description.unwrap_or_default().trim().to_string();
    if required {
        if out.is_empty() {
            out.push_str("required");
        } else {
            out.push_str(" (required)");
        }
    }
    out
}

fn push_rows(out: &mut String, title: &str, rows: Vec<(String, String)>) {
    out.push_str(&format!("\n{title}:\n"));
    let width = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
    for (left, help) in rows {
        if help.is_empty() {
            out.push_str(&format!("  {}\n", left));
        } else {
            out.push_str(&format!("  {:width$}  {}\n", left, help, width = width));
        }
    }
}

/// Render a help message listing the command's arguments and options.
pub fn render(command: &Command) -> String {
    let mut out = String::new();
    if let Some(description) = command.description().map(str::trim).filter(|d| !d.is_empty()) {
        out.push_str(description);
        out.push_str("\n\n");
    }

    out.push_str("Usage: ");
    out.push_str(command.name());
    for argument in command.arguments() {
        out.push(' ');
        out.push_str(&format_argument_left(argument));
    }
    if !command.options().is_empty() {
        out.push_str(" [OPTIONS]");
    }
    out.push('\n');

    if !command.arguments().is_empty() {
        let rows = command
            .arguments()
            .iter()
            .map(|a| (format_argument_left(a), format_help(a.description(), false)))
            .collect();
        push_rows(&mut out, "Arguments", rows);
    }

    if !command.options().is_empty() {
        let rows = command
            .options()
            .iter()
            .map(|o| (format_option_left(o), format_help(o.description(), o.is_required())))
            .collect();
        push_rows(&mut out, "Options", rows);
    }

    out
}

/// Render a version line: `name version`, or just the name.
pub fn version(command: &Command) -> String {
    match command.version().map(str::trim).filter(|v| !v.is_empty()) {
        Some(version) => format!("{} {}\n", command.name(), version),
        None => format!("{}\n", command.name()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::ValueType;

    fn sample() -> Command {
        let mut cmd = Command::new("copy");
        cmd.set_description("Copy a file").set_version("1.2.0");
        cmd.argument("source").set_description("File to copy").set_required(true);
        cmd.argument("dest").set_description("Where to put it");
        cmd.option("force").set_shorthand("f").set_description("Overwrite");
        cmd.option("mode")
            .set_accepts(ValueType::Integer)
            .set_required(true);
        cmd
    }

    #[test]
    fn usage_line_marks_required_and_optional() {
        let text = render(&sample());
        assert!(text.starts_with("Copy a file\n\nUsage: copy <source> [dest] [OPTIONS]\n"));
    }

    #[test]
    fn sections_align_columns() {
        let text = render(&sample());
        assert!(text.contains("\nArguments:\n  <source>  File to copy\n  [dest]    Where to put it\n"));
        assert!(text.contains("\nOptions:\n"));
        assert!(text.contains("  -f, --force       Overwrite\n"));
        assert!(text.contains("  --mode <INTEGER>  required\n"));
    }

    #[test]
    fn bare_command_has_only_usage() {
        let text = render(&Command::new("noop"));
        assert_eq!(text, "Usage: noop\n");
    }

    #[test]
    fn version_line() {
        assert_eq!(version(&sample()), "copy 1.2.0\n");
        assert_eq!(version(&Command::new("noop")), "noop\n");
    }
}
