//! Purpose: Render canonical JSON pretty-printed, with optional ANSI colorization, for CLI output.
//! Exports: render_json.
//! Role: Small formatter over the token reader used by CLI emission paths.
//! Invariants: Property order is preserved exactly as written by the encoder.
//! Invariants: When color is disabled, output matches serde_json's pretty layout.
//! Invariants: ANSI escapes appear only when explicitly enabled.
use clusterwire::core::error::{Error, ErrorKind};
use clusterwire::core::reader::JsonReader;
use clusterwire::core::token::{Token, TokenKind};

const INDENT: &str = "  ";

// Basic 8-color SGR codes only; 39 is the terminal's default foreground.
const COLOR_KEY: &str = "36";
const COLOR_STRING: &str = "32";
const COLOR_NUMBER: &str = "33";
const COLOR_BOOL: &str = "35";
const COLOR_NULL: &str = "39";
const COLOR_PUNCT: &str = "39";

pub fn render_json(json: &str, use_color: bool) -> Result<String, Error> {
    let mut reader = JsonReader::from_str(json)?;
    let mut out = String::with_capacity(json.len() * 2);
    write_value(&mut reader, 0, use_color, &mut out)?;
    Ok(out)
}

fn write_value(
    reader: &mut JsonReader,
    indent: usize,
    use_color: bool,
    out: &mut String,
) -> Result<(), Error> {
    match reader.next_token()? {
        Token::Null => push_colored("null", COLOR_NULL, use_color, out),
        Token::Bool(val) => {
            let text = if val { "true" } else { "false" };
            push_colored(text, COLOR_BOOL, use_color, out);
        }
        Token::Number(num) => push_colored(&num.to_string(), COLOR_NUMBER, use_color, out),
        Token::String(text) => push_colored(&quote(&text)?, COLOR_STRING, use_color, out),
        Token::StartArray => write_array(reader, indent, use_color, out)?,
        Token::StartObject => write_object(reader, indent, use_color, out)?,
        other => {
            return Err(Error::new(ErrorKind::Internal)
                .with_message(format!("unexpected {} in value position", other.kind().describe())));
        }
    }
    Ok(())
}

fn write_array(
    reader: &mut JsonReader,
    indent: usize,
    use_color: bool,
    out: &mut String,
) -> Result<(), Error> {
    if reader.peek_kind() == Some(TokenKind::EndArray) {
        reader.next_token()?;
        push_colored("[]", COLOR_PUNCT, use_color, out);
        return Ok(());
    }
    push_colored("[", COLOR_PUNCT, use_color, out);
    out.push('\n');
    let mut first = true;
    while reader.peek_kind() != Some(TokenKind::EndArray) {
        if !first {
            push_colored(",", COLOR_PUNCT, use_color, out);
            out.push('\n');
        }
        first = false;
        push_indent(indent + 1, out);
        write_value(reader, indent + 1, use_color, out)?;
    }
    reader.next_token()?;
    out.push('\n');
    push_indent(indent, out);
    push_colored("]", COLOR_PUNCT, use_color, out);
    Ok(())
}

fn write_object(
    reader: &mut JsonReader,
    indent: usize,
    use_color: bool,
    out: &mut String,
) -> Result<(), Error> {
    if reader.peek_kind() == Some(TokenKind::EndObject) {
        reader.next_token()?;
        push_colored("{}", COLOR_PUNCT, use_color, out);
        return Ok(());
    }
    push_colored("{", COLOR_PUNCT, use_color, out);
    out.push('\n');
    let mut first = true;
    while let Some(key) = reader.read_property_name()? {
        if !first {
            push_colored(",", COLOR_PUNCT, use_color, out);
            out.push('\n');
        }
        first = false;
        push_indent(indent + 1, out);
        push_colored(&quote(&key)?, COLOR_KEY, use_color, out);
        push_colored(":", COLOR_PUNCT, use_color, out);
        out.push(' ');
        write_value(reader, indent + 1, use_color, out)?;
    }
    out.push('\n');
    push_indent(indent, out);
    push_colored("}", COLOR_PUNCT, use_color, out);
    Ok(())
}

fn quote(text: &str) -> Result<String, Error> {
    serde_json::to_string(text).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("failed to quote string")
            .with_source(err)
    })
}

fn push_indent(level: usize, out: &mut String) {
    for _ in 0..level {
        out.push_str(INDENT);
    }
}

fn push_colored(text: &str, color: &str, use_color: bool, out: &mut String) {
    if !use_color {
        out.push_str(text);
        return;
    }
    out.push_str("\u{1b}[");
    out.push_str(color);
    out.push('m');
    out.push_str(text);
    out.push_str("\u{1b}[0m");
}

#[cfg(test)]
mod tests {
    use super::render_json;

    #[test]
    fn plain_rendering_keeps_encoder_order() {
        let rendered =
            render_json(r#"{"Kind":"NodeUp","Z":[1,true,null],"A":{},"B":[]}"#, false).unwrap();
        assert_eq!(
            rendered,
            "{\n  \"Kind\": \"NodeUp\",\n  \"Z\": [\n    1,\n    true,\n    null\n  ],\n  \"A\": {},\n  \"B\": []\n}"
        );
    }

    #[test]
    fn colored_rendering_emits_ansi() {
        let colored = render_json(r#"{"k":"v","n":1,"b":true,"z":null}"#, true).unwrap();
        assert!(colored.contains("\u{1b}[36m\"k\"\u{1b}[0m"));
        assert!(colored.contains("\u{1b}[32m\"v\"\u{1b}[0m"));
        assert!(colored.contains("\u{1b}[33m1\u{1b}[0m"));
        assert!(colored.contains("\u{1b}[35mtrue\u{1b}[0m"));
        assert!(colored.contains("\u{1b}[39mnull\u{1b}[0m"));
    }
}
