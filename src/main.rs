//! Purpose: `clusterwire` CLI entry point: inspect and canonicalize cluster-management DTO payloads.
//! Role: Binary crate root; parses args, runs commands, emits JSON on stdout.
//! Invariants: Commands emit stable stdout formats (compact JSON unless pretty or a TTY).
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
//! Invariants: Logs go to stderr only, filtered by `RUST_LOG` (default `warn`).
#![allow(clippy::result_large_err)]
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand, ValueEnum, ValueHint, error::ErrorKind as ClapErrorKind};
use clap_complete::aot::Shell;
use serde_json::{Map, Value, json};
use std::error::Error as StdError;
use tracing_subscriber::EnvFilter;

mod color_json;
mod command_dispatch;

use clusterwire::api::{Error, ErrorKind, to_exit_code};
use color_json::render_json;

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err((err, color_mode)) => {
            emit_error(&err, color_mode);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn run() -> Result<RunOutcome, (Error, ColorMode)> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    (
                        Error::new(ErrorKind::Io)
                            .with_message("failed to write help")
                            .with_source(io_err),
                        ColorMode::Auto,
                    )
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                return Err((
                    Error::new(ErrorKind::Usage).with_message(clap_error_summary(&err)),
                    ColorMode::Auto,
                ));
            }
        },
    };

    let color_mode = cli.color;
    command_dispatch::dispatch_command(cli.command, color_mode).map_err(|err| (err, color_mode))
}

#[derive(Parser)]
#[command(
    name = "clusterwire",
    version,
    about = "Decode and canonicalize cluster-management REST payloads",
    help_template = r#"{about-with-newline}
{before-help}USAGE
  {usage}

COMMANDS
{subcommands}

OPTIONS
{options}

{after-help}
"#,
    long_about = None,
    before_help = r#"Payloads are JSON objects whose concrete type is chosen by a discriminator
property such as "Kind", "StorageKind" or "kind".

Mental model:
  - `families` lists every known type and its discriminator tags
  - `decode` validates a payload and re-emits it in canonical form
"#,
    after_help = r#"EXAMPLES
  $ clusterwire families
  $ echo '{"Kind":"NodeUp","NodeName":"_Node_0"}' | clusterwire decode NodeEvent
  $ clusterwire decode BackupPolicyDescription --input policy.json --pretty
  $ clusterwire decode ChaosEvent --array --input history.json

LEARN MORE
  $ clusterwire <command> --help"#,
    arg_required_else_help = true,
    disable_help_subcommand = false
)]
struct Cli {
    #[arg(
        long,
        default_value = "auto",
        value_enum,
        help = "Colorize stderr diagnostics and pretty JSON output: auto|always|never"
    )]
    color: ColorMode,

    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn use_color(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    #[command(
        about = "List known types with their discriminators and tags",
        long_about = r#"Emit every registered type as JSON.

Polymorphic families report their discriminator property and the declared tags,
in the order they are matched. Plain types report a null discriminator."#,
        after_help = r#"EXAMPLES
  $ clusterwire families
  $ clusterwire families --pretty"#
    )]
    Families {
        #[arg(long, help = "Pretty-print JSON output")]
        pretty: bool,
    },
    #[command(
        arg_required_else_help = true,
        about = "Decode a payload and print its canonical encoding",
        long_about = r#"Decode JSON from stdin (or --input) as TYPE and print it re-encoded.

Canonical output writes the discriminator first, then required properties, then
optional properties that are present. Unrecognized properties are dropped."#,
        after_help = r#"EXAMPLES
  $ clusterwire decode PropertyValue <<< '{"Kind":"Int64","Data":42}'
  $ clusterwire decode ChaosEventsSegment --input segment.json --pretty
  $ clusterwire decode AutoScalingTrigger --array --input triggers.json

NOTES
  - TYPE is matched ignoring ASCII case
  - The first malformed element aborts an --array decode"#
    )]
    Decode {
        #[arg(help = "Registered type name (see `clusterwire families`)")]
        type_name: String,
        #[arg(long, help = "Read JSON from this file instead of stdin", value_hint = ValueHint::FilePath)]
        input: Option<PathBuf>,
        #[arg(long, help = "Input is a JSON array of TYPE")]
        array: bool,
        #[arg(long, help = "Pretty-print JSON output")]
        pretty: bool,
    },
    #[command(
        arg_required_else_help = true,
        about = "Generate shell completions",
        long_about = r#"Generate shell completion scripts.

Prints a completion script for the given shell to stdout."#,
        after_help = r#"EXAMPLES
  $ clusterwire completion bash > ~/.local/share/bash-completion/completions/clusterwire
  $ clusterwire completion zsh > ~/.zfunc/_clusterwire
  $ clusterwire completion fish > ~/.config/fish/completions/clusterwire.fish"#
    )]
    Completion {
        #[arg(help = "Shell to generate completions for")]
        shell: Shell,
    },
}

fn read_input(input: Option<&Path>) -> Result<Vec<u8>, Error> {
    match input {
        Some(path) => fs::read(path).map_err(|err| {
            let kind = if err.kind() == io::ErrorKind::NotFound {
                ErrorKind::NotFound
            } else {
                ErrorKind::Io
            };
            Error::new(kind)
                .with_message(format!("failed to read {}", path.display()))
                .with_source(err)
        }),
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf).map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message("failed to read stdin")
                    .with_source(err)
            })?;
            Ok(buf)
        }
    }
}

fn emit_json(value: Value, pretty: bool, color_mode: ColorMode) -> Result<(), Error> {
    let compact = serde_json::to_string(&value).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("json encode failed")
            .with_source(err)
    })?;
    emit_text(&compact, pretty, color_mode)
}

fn emit_text(compact: &str, pretty: bool, color_mode: ColorMode) -> Result<(), Error> {
    let is_tty = io::stdout().is_terminal();
    let use_color = color_mode.use_color(is_tty);
    if pretty || is_tty || use_color {
        println!("{}", render_json(compact, use_color)?);
    } else {
        println!("{compact}");
    }
    Ok(())
}

#[derive(Copy, Clone, Debug)]
enum AnsiColor {
    Red,
    Yellow,
}

fn colorize_label(label: &str, enabled: bool, color: AnsiColor) -> String {
    if !enabled {
        return label.to_string();
    }
    let code = match color {
        AnsiColor::Red => "31",
        AnsiColor::Yellow => "33",
    };
    format!("\u{1b}[{code}m{label}\u{1b}[0m")
}

fn emit_error(err: &Error, color_mode: ColorMode) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("{}", error_text(err, color_mode.use_color(is_tty)));
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::NotFound => "not found".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
        ErrorKind::MalformedValue => "malformed value".to_string(),
        ErrorKind::UnexpectedDiscriminatorPosition => {
            "discriminator is not the first property".to_string()
        }
        ErrorKind::UnknownDiscriminator => "unknown discriminator".to_string(),
        ErrorKind::Structural => "malformed JSON".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(property) = err.property() {
        inner.insert("property".to_string(), json!(property));
    }
    if let Some(expected) = err.expected() {
        inner.insert("expected".to_string(), json!(expected));
    }
    if let Some(tag) = err.discriminator() {
        inner.insert("discriminator".to_string(), json!(tag));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error, use_color: bool) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} {}",
        colorize_label("error:", use_color, AnsiColor::Red),
        error_message(err)
    ));
    if let Some(property) = err.property() {
        lines.push(format!(
            "{} {property}",
            colorize_label("property:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(expected) = err.expected() {
        lines.push(format!(
            "{} {expected}",
            colorize_label("expected:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(tag) = err.discriminator() {
        lines.push(format!(
            "{} {tag}",
            colorize_label("discriminator:", use_color, AnsiColor::Yellow)
        ));
    }
    for cause in error_causes(err) {
        lines.push(format!(
            "{} {cause}",
            colorize_label("caused by:", use_color, AnsiColor::Yellow)
        ));
    }
    lines.join("\n")
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}
