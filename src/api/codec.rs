//! Purpose: One-call decode/encode entry points over the layered codec.
//! Exports: `from_str`, `from_slice`, `to_string`, `list_from_str`, `list_to_string`.
//! Role: Public convenience surface; callers never touch readers or writers directly.
//! Invariants: A decode consumes exactly one top-level value; leftovers are an error.
#![allow(clippy::result_large_err)]

use crate::core::error::{Error, ErrorKind};
use crate::core::primitive::JsonCodec;
use crate::core::reader::JsonReader;
use crate::core::structural::collect_array;
use crate::core::writer::JsonWriter;

pub type ApiResult<T> = Result<T, Error>;

pub fn from_str<T: JsonCodec>(input: &str) -> ApiResult<T> {
    let mut reader = JsonReader::from_str(input)?;
    let value = T::decode(&mut reader)?;
    finish(&reader, value)
}

pub fn from_slice<T: JsonCodec>(input: &[u8]) -> ApiResult<T> {
    let mut reader = JsonReader::from_slice(input)?;
    let value = T::decode(&mut reader)?;
    finish(&reader, value)
}

pub fn list_from_str<T: JsonCodec>(input: &str) -> ApiResult<Vec<T>> {
    let mut reader = JsonReader::from_str(input)?;
    let items = collect_array(&mut reader, T::decode)?;
    finish(&reader, items)
}

pub fn to_string<T: JsonCodec>(value: &T) -> ApiResult<String> {
    let mut writer = JsonWriter::new();
    value.encode(&mut writer)?;
    writer.into_string()
}

pub fn list_to_string<T: JsonCodec>(items: &[T]) -> ApiResult<String> {
    let mut writer = JsonWriter::new();
    writer.start_array()?;
    for item in items {
        item.encode(&mut writer)?;
    }
    writer.end_array()?;
    writer.into_string()
}

fn finish<T>(reader: &JsonReader, value: T) -> ApiResult<T> {
    if !reader.is_exhausted() {
        return Err(Error::new(ErrorKind::Internal)
            .with_message(format!("decoder stopped at token {}", reader.position())));
    }
    Ok(value)
}
