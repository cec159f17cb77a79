mod manifest;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use cmdspec::{CommandHandler, ParseResult};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt};

use crate::manifest::{DEFAULT_MANIFEST_NAME, load_manifest, write_default_manifest};

#[derive(Parser)]
#[command(name = "cmdspec")]
#[command(version, about = "Parse command lines against declared command schemas", long_about = None)]
#[command(disable_help_subcommand = true)]
struct Cli {
    /// Path to the command manifest
    #[arg(
        short,
        long,
        global = true,
        env = "CMDSPEC_MANIFEST",
        default_value = DEFAULT_MANIFEST_NAME,
        value_name = "FILE"
    )]
    manifest: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter cmdspec.json
    Init(InitArgs),

    /// Check every command in the manifest for schema errors
    Check,

    /// List commands, or show help for one command
    Help(HelpArgs),

    /// Parse input with a named command and print the result as JSON
    Parse(ParseArgs),

    /// Dispatch a full line (command name first) and print the result as JSON
    Run(RunArgs),
}

#[derive(Parser)]
struct InitArgs {
    /// Project directory (default: current directory)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Overwrite an existing manifest
    #[arg(long)]
    force: bool,
}

#[derive(Parser)]
struct HelpArgs {
    /// Command to describe
    #[arg(value_name = "COMMAND")]
    name: Option<String>,
}

#[derive(Parser)]
struct ParseArgs {
    /// Command whose schema to parse with, followed by the input
    #[arg(
        value_name = "COMMAND",
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    line: Vec<String>,
}

#[derive(Parser)]
struct RunArgs {
    /// The line to dispatch, command name first
    #[arg(value_name = "LINE", trailing_var_arg = true, allow_hyphen_values = true)]
    line: Vec<String>,
}

#[derive(Serialize)]
struct RunReport<'a> {
    command: &'a str,
    result: &'a ParseResult,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let Cli { manifest, command } = Cli::parse();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async move {
            match command {
                Commands::Init(args) => init(args),
                Commands::Check => check(&manifest),
                Commands::Help(args) => help(&manifest, args),
                Commands::Parse(args) => parse(&manifest, args).await,
                Commands::Run(args) => run(&manifest, args).await,
            }
        })
}

fn load_handler(path: &Path) -> Result<CommandHandler> {
    let manifest = load_manifest(path)?;
    manifest
        .to_handler()
        .with_context(|| format!("invalid command schema in {}", path.display()))
}

fn init(args: InitArgs) -> Result<()> {
    let dir = args.dir.unwrap_or_else(|| PathBuf::from("."));
    let dest = write_default_manifest(&dir, args.force)?;

    eprintln!("Created: {}", dest.display());
    eprintln!("\nNext steps:");
    eprintln!("  1. Edit {DEFAULT_MANIFEST_NAME} to declare your commands");
    eprintln!("  2. Run: cmdspec check");
    eprintln!("  3. Run: cmdspec run greet world --shout");

    Ok(())
}

fn check(path: &Path) -> Result<()> {
    tracing::debug!("executing check command");

    let handler = load_handler(path)?;
    eprintln!("OK: {} command(s) in {}", handler.len(), path.display());
    for command in handler.commands() {
        eprintln!(
            "  {:<16} {} argument(s), {} option(s)",
            command.name(),
            command.arguments().len(),
            command.options().len()
        );
    }
    Ok(())
}

fn help(path: &Path, args: HelpArgs) -> Result<()> {
    tracing::debug!("executing help command");

    let handler = load_handler(path)?;
    match args.name {
        Some(name) => {
            let Some(command) = handler.get(&name) else {
                bail!("unknown command: {name}");
            };
            print!("{}", cmdspec::help::version(command));
            println!();
            print!("{}", command.help());
        }
        None => {
            println!("Available commands:");
            for command in handler.commands() {
                match command.description() {
                    Some(description) => println!("  {:<16} {}", command.name(), description),
                    None => println!("  {}", command.name()),
                }
            }
        }
    }
    Ok(())
}

async fn parse(path: &Path, args: ParseArgs) -> Result<()> {
    tracing::debug!("executing parse command");

    let Some((name, input)) = args.line.split_first() else {
        bail!("missing command name");
    };

    let handler = load_handler(path)?;
    let Some(command) = handler.get(name) else {
        bail!("unknown command: {name}");
    };

    let input = join_argv(input);
    let result = command
        .parse_async(&input)
        .await
        .with_context(|| format!("failed to parse input for `{}`", command.name()))?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

async fn run(path: &Path, args: RunArgs) -> Result<()> {
    tracing::debug!("executing run command");

    let handler = load_handler(path)?;
    let line = join_argv(&args.line);
    let Some(dispatch) = handler.parse_async(&line).await? else {
        let name = line.split(' ').next().unwrap_or_default();
        bail!("unknown command: {name}");
    };

    let report = RunReport {
        command: dispatch.command.name(),
        result: &dispatch.result,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Rebuild a line from shell-split arguments, quoting any that contain spaces
/// so they reach the parser as a single quoted value.
fn join_argv(args: &[String]) -> String {
    args.iter()
        .map(|arg| {
            let quoted = arg.len() >= 2 && arg.starts_with('"') && arg.ends_with('"');
            if arg.contains(' ') && !quoted {
                format!("\"{arg}\"")
            } else {
                arg.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn join_argv_quotes_spaced_arguments() {
        assert_eq!(
            join_argv(&argv(&["world", "-g", "good day"])),
            r#"world -g "good day""#
        );
        assert_eq!(
            join_argv(&argv(&["-g", r#""already quoted""#])),
            r#"-g "already quoted""#
        );
        assert_eq!(join_argv(&argv(&["--", "-x"])), "-- -x");
        assert_eq!(join_argv(&[]), "");
    }

    #[test]
    fn parse_keeps_a_leading_terminator() {
        let cli = Cli::try_parse_from(["cmdspec", "parse", "greet", "--", "world"]).unwrap();
        let Commands::Parse(args) = cli.command else {
            panic!("expected the parse subcommand");
        };
        assert_eq!(args.line, argv(&["greet", "--", "world"]));
    }
}
