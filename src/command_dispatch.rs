//! Purpose: Hold top-level CLI command dispatch for `clusterwire`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate command execution.
//! Invariants: Decoding goes through the type registry; no command names Rust DTO types.
//! Invariants: Helpers in `main.rs` own output envelopes and error rendering.

use super::*;
use clusterwire::api::{JsonReader, JsonWriter, lookup, registrations};

pub(super) fn dispatch_command(command: Command, color_mode: ColorMode) -> Result<RunOutcome, Error> {
    match command {
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "clusterwire", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
        Command::Families { pretty } => {
            let families: Vec<Value> = registrations()
                .iter()
                .map(|entry| {
                    json!({
                        "name": entry.name,
                        "discriminator": entry.discriminator,
                        "tags": entry.tags(),
                    })
                })
                .collect();
            emit_json(json!({ "families": families }), pretty, color_mode)?;
            Ok(RunOutcome::ok())
        }
        Command::Decode {
            type_name,
            input,
            array,
            pretty,
        } => {
            let entry = lookup(&type_name).ok_or_else(|| {
                Error::new(ErrorKind::NotFound).with_message(format!(
                    "unknown type {type_name:?}; run `clusterwire families` for the list"
                ))
            })?;
            let bytes = read_input(input.as_deref())?;
            let mut reader = JsonReader::from_slice(&bytes)?;
            let mut writer = JsonWriter::with_capacity(bytes.len());
            tracing::debug!(type_name = entry.name, array, "decoding payload");
            if array {
                entry.transcode_array(&mut reader, &mut writer)?;
            } else {
                entry.transcode(&mut reader, &mut writer)?;
            }
            let canonical = writer.into_string()?;
            emit_text(&canonical, pretty, color_mode)?;
            Ok(RunOutcome::ok())
        }
    }
}
