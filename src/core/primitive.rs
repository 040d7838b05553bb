//! Purpose: Scalar JSON codecs and the `JsonCodec` trait every DTO implements.
//! Exports: `JsonCodec`, `Bytes`, `DEFAULT_TIMESTAMP`, scalar `read_*` accessors on `JsonReader`.
//! Role: Leaf layer of the codec stack; structural and dispatch codecs build on it.
//! Invariants: No implicit coercion between token kinds (a string is never read as a number).
//! Invariants: Timestamps decode to UTC and encode with a `Z` designator.
//! Invariants: Byte arrays use the standard base64 alphabet with padding and no line breaks.
use std::collections::BTreeMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime, UtcOffset};

use crate::core::duration::{format_iso8601, parse_iso8601};
use crate::core::error::{Error, ErrorKind};
use crate::core::guid::Guid;
use crate::core::reader::JsonReader;
use crate::core::structural::{collect_array, decode_map};
use crate::core::token::{Token, TokenKind};
use crate::core::writer::JsonWriter;

/// Decode sentinel for required timestamps missing from the payload.
pub const DEFAULT_TIMESTAMP: OffsetDateTime = OffsetDateTime::UNIX_EPOCH;

pub trait JsonCodec: Sized {
    fn decode(reader: &mut JsonReader) -> Result<Self, Error>;

    fn encode(&self, writer: &mut JsonWriter) -> Result<(), Error>;
}

/// Binary payload carried as a base64 string.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Bytes(pub Vec<u8>);

impl From<Vec<u8>> for Bytes {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl JsonReader {
    pub fn read_string(&mut self) -> Result<String, Error> {
        match self.next_scalar("string")? {
            Token::String(value) => Ok(value),
            other => Err(mismatch(&other, "string")),
        }
    }

    pub fn read_bool(&mut self) -> Result<bool, Error> {
        match self.next_scalar("bool")? {
            Token::Bool(value) => Ok(value),
            other => Err(mismatch(&other, "bool")),
        }
    }

    pub fn read_i32(&mut self) -> Result<i32, Error> {
        let value = self.read_integer("int32")?;
        i32::try_from(value).map_err(|_| {
            Error::new(ErrorKind::MalformedValue)
                .with_message(format!("{value} is out of range"))
                .with_expected("int32")
        })
    }

    pub fn read_i64(&mut self) -> Result<i64, Error> {
        self.read_integer("int64")
    }

    pub fn read_f64(&mut self) -> Result<f64, Error> {
        match self.next_scalar("double")? {
            Token::Number(number) => number.as_f64().ok_or_else(|| {
                Error::new(ErrorKind::MalformedValue)
                    .with_message(format!("{number} is not representable"))
                    .with_expected("double")
            }),
            other => Err(mismatch(&other, "double")),
        }
    }

    pub fn read_guid(&mut self) -> Result<Guid, Error> {
        let text = self.read_typed_string("guid")?;
        Guid::parse(&text)
    }

    pub fn read_timestamp(&mut self) -> Result<OffsetDateTime, Error> {
        let text = self.read_typed_string("datetime")?;
        OffsetDateTime::parse(&text, &Rfc3339)
            .map(|ts| ts.to_offset(UtcOffset::UTC))
            .map_err(|err| {
                Error::new(ErrorKind::MalformedValue)
                    .with_message(format!("{text:?} is not an ISO-8601 timestamp"))
                    .with_expected("datetime")
                    .with_source(err)
            })
    }

    pub fn read_duration(&mut self) -> Result<Duration, Error> {
        let text = self.read_typed_string("duration")?;
        parse_iso8601(&text)
    }

    pub fn read_bytes(&mut self) -> Result<Vec<u8>, Error> {
        let text = self.read_typed_string("base64")?;
        STANDARD.decode(text.as_bytes()).map_err(|err| {
            Error::new(ErrorKind::MalformedValue)
                .with_message("invalid base64 payload")
                .with_expected("base64")
                .with_source(err)
        })
    }

    fn read_typed_string(&mut self, expected: &'static str) -> Result<String, Error> {
        match self.next_scalar(expected)? {
            Token::String(value) => Ok(value),
            other => Err(mismatch(&other, expected)),
        }
    }

    fn read_integer(&mut self, expected: &'static str) -> Result<i64, Error> {
        match self.next_scalar(expected)? {
            Token::Number(number) => number.as_i64().ok_or_else(|| {
                Error::new(ErrorKind::MalformedValue)
                    .with_message(format!("{number} is not an integer in range"))
                    .with_expected(expected)
            }),
            other => Err(mismatch(&other, expected)),
        }
    }

    // Containers and structural tokens are left in place so the mismatch is
    // reported against the value the caller asked for.
    fn next_scalar(&mut self, expected: &'static str) -> Result<Token, Error> {
        match self.peek_kind() {
            Some(kind) if kind.is_scalar() => self.next_token(),
            Some(TokenKind::StartObject) | Some(TokenKind::StartArray) => {
                Err(Error::new(ErrorKind::MalformedValue)
                    .with_message("found a container")
                    .with_expected(expected))
            }
            Some(kind) => Err(Error::new(ErrorKind::Structural)
                .with_message(format!("found {} where a value was required", kind.describe()))
                .with_expected(expected)),
            None => Err(Error::new(ErrorKind::Structural)
                .with_message("unexpected end of JSON input")
                .with_expected(expected)),
        }
    }
}

fn mismatch(found: &Token, expected: &'static str) -> Error {
    Error::new(ErrorKind::MalformedValue)
        .with_message(format!("found {}", found.kind().describe()))
        .with_expected(expected)
}

impl JsonCodec for String {
    fn decode(reader: &mut JsonReader) -> Result<Self, Error> {
        reader.read_string()
    }

    fn encode(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        writer.write_string(self)
    }
}

impl JsonCodec for bool {
    fn decode(reader: &mut JsonReader) -> Result<Self, Error> {
        reader.read_bool()
    }

    fn encode(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        writer.write_bool(*self)
    }
}

impl JsonCodec for i32 {
    fn decode(reader: &mut JsonReader) -> Result<Self, Error> {
        reader.read_i32()
    }

    fn encode(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        writer.write_i32(*self)
    }
}

impl JsonCodec for i64 {
    fn decode(reader: &mut JsonReader) -> Result<Self, Error> {
        reader.read_i64()
    }

    fn encode(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        writer.write_i64(*self)
    }
}

impl JsonCodec for f64 {
    fn decode(reader: &mut JsonReader) -> Result<Self, Error> {
        reader.read_f64()
    }

    fn encode(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        writer.write_f64(*self)
    }
}

impl JsonCodec for Guid {
    fn decode(reader: &mut JsonReader) -> Result<Self, Error> {
        reader.read_guid()
    }

    fn encode(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        writer.write_string(&self.to_string())
    }
}

impl JsonCodec for OffsetDateTime {
    fn decode(reader: &mut JsonReader) -> Result<Self, Error> {
        reader.read_timestamp()
    }

    fn encode(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        let text = self.to_offset(UtcOffset::UTC).format(&Rfc3339).map_err(|err| {
            Error::new(ErrorKind::MalformedValue)
                .with_message("timestamp format failed")
                .with_expected("datetime")
                .with_source(err)
        })?;
        writer.write_string(&text)
    }
}

impl JsonCodec for Duration {
    fn decode(reader: &mut JsonReader) -> Result<Self, Error> {
        reader.read_duration()
    }

    fn encode(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        writer.write_string(&format_iso8601(*self))
    }
}

impl JsonCodec for Bytes {
    fn decode(reader: &mut JsonReader) -> Result<Self, Error> {
        reader.read_bytes().map(Bytes)
    }

    fn encode(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        writer.write_string(&STANDARD.encode(&self.0))
    }
}

/// `null` decodes to `None`; `None` encodes to `null` (structural encoders omit it instead).
impl<T: JsonCodec> JsonCodec for Option<T> {
    fn decode(reader: &mut JsonReader) -> Result<Self, Error> {
        if reader.peek_kind() == Some(TokenKind::Null) {
            reader.next_token()?;
            return Ok(None);
        }
        T::decode(reader).map(Some)
    }

    fn encode(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        match self {
            Some(value) => value.encode(writer),
            None => writer.write_null(),
        }
    }
}

impl<T: JsonCodec> JsonCodec for Vec<T> {
    fn decode(reader: &mut JsonReader) -> Result<Self, Error> {
        collect_array(reader, T::decode)
    }

    fn encode(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        writer.start_array()?;
        for item in self {
            item.encode(writer)?;
        }
        writer.end_array()
    }
}

impl<T: JsonCodec> JsonCodec for BTreeMap<String, T> {
    fn decode(reader: &mut JsonReader) -> Result<Self, Error> {
        decode_map(reader, T::decode)
    }

    fn encode(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        writer.start_object()?;
        for (key, value) in self {
            writer.write_property_name(key)?;
            value.encode(writer)?;
        }
        writer.end_object()
    }
}
