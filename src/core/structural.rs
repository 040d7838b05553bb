//! Purpose: Object, array, and map codecs layered over the scalar codecs.
//! Exports: `MatchMode`, `FieldTable`, `Visit`, `decode_object`, `decode_properties`,
//!   `decode_array`, `ArrayIter`, `collect_array`, `decode_map`, `read_field`, and the
//!   `encode_*_property` helpers.
//! Role: Every DTO decoder is a field handler driven by `decode_object`/`decode_properties`.
//! Invariants: Unrecognized properties are skipped, never rejected.
//! Invariants: Optional properties are omitted when absent, never written as `null`.
//! Invariants: A failure anywhere aborts the whole decode; there are no partial results.
use std::collections::BTreeMap;
use std::iter::FusedIterator;
use std::marker::PhantomData;

use crate::core::error::{Error, ErrorKind};
use crate::core::primitive::JsonCodec;
use crate::core::reader::JsonReader;
use crate::core::token::TokenKind;
use crate::core::writer::JsonWriter;

/// How a wire name is compared against an expected name or tag.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MatchMode {
    Ordinal,
    IgnoreCase,
}

impl MatchMode {
    pub fn matches(self, actual: &str, expected: &str) -> bool {
        match self {
            MatchMode::Ordinal => actual == expected,
            MatchMode::IgnoreCase => {
                if actual.is_ascii() && expected.is_ascii() {
                    return actual.eq_ignore_ascii_case(expected);
                }
                actual.chars().map(fold).eq(expected.chars().map(fold))
            }
        }
    }
}

// Simple one-to-one case folding; characters whose uppercase form expands stay as is.
fn fold(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => c,
    }
}

/// Outcome reported by a field handler for one property.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Visit {
    Consumed,
    Unknown,
}

#[derive(Clone, Copy, Debug)]
pub struct FieldSpec<F: 'static> {
    pub wire: &'static str,
    pub id: F,
    pub mode: Option<MatchMode>,
}

/// Field inheriting the table's match mode.
pub const fn field<F>(wire: &'static str, id: F) -> FieldSpec<F> {
    FieldSpec {
        wire,
        id,
        mode: None,
    }
}

/// Field with its own match mode, for DTOs that mix modes.
pub const fn field_with<F>(wire: &'static str, id: F, mode: MatchMode) -> FieldSpec<F> {
    FieldSpec {
        wire,
        id,
        mode: Some(mode),
    }
}

/// Static wire-name lookup for one DTO; entries are tried in declared order.
#[derive(Debug)]
pub struct FieldTable<F: 'static> {
    pub mode: MatchMode,
    pub fields: &'static [FieldSpec<F>],
}

impl<F: Copy> FieldTable<F> {
    pub const fn new(mode: MatchMode, fields: &'static [FieldSpec<F>]) -> Self {
        Self { mode, fields }
    }

    pub fn lookup(&self, name: &str) -> Option<F> {
        self.fields
            .iter()
            .find(|spec| spec.mode.unwrap_or(self.mode).matches(name, spec.wire))
            .map(|spec| spec.id)
    }
}

/// Reads a field value; `null` counts as absent.
pub fn read_field<T: JsonCodec>(reader: &mut JsonReader) -> Result<Option<T>, Error> {
    Option::<T>::decode(reader)
}

pub fn decode_object<H>(reader: &mut JsonReader, handler: H) -> Result<(), Error>
where
    H: FnMut(&str, &mut JsonReader) -> Result<Visit, Error>,
{
    reader.expect_start_object()?;
    decode_properties(reader, handler)
}

/// Drives `handler` over the remaining properties of an already opened object.
pub fn decode_properties<H>(reader: &mut JsonReader, mut handler: H) -> Result<(), Error>
where
    H: FnMut(&str, &mut JsonReader) -> Result<Visit, Error>,
{
    while let Some(name) = reader.read_property_name()? {
        let visit = handler(name.as_str(), &mut *reader)
            .map_err(|err| err.with_property_if_absent(&name))?;
        if visit == Visit::Unknown {
            tracing::trace!(property = %name, "skipping unrecognized property");
            reader
                .skip_value()
                .map_err(|err| err.with_property_if_absent(&name))?;
        }
    }
    Ok(())
}

/// Lazy single-pass view over a JSON array; yields until `]` or the first error.
pub struct ArrayIter<'r, T, F> {
    reader: &'r mut JsonReader,
    element: F,
    done: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<T, F> ArrayIter<'_, T, F>
where
    F: FnMut(&mut JsonReader) -> Result<T, Error>,
{
    /// Skips any elements not yet read, leaving the reader after `]`.
    pub fn finish(mut self) -> Result<(), Error> {
        while !self.done {
            match self.reader.peek_kind() {
                Some(TokenKind::EndArray) => {
                    self.reader.next_token()?;
                    self.done = true;
                }
                Some(_) => self.reader.skip_value()?,
                None => return Err(unterminated_array()),
            }
        }
        Ok(())
    }
}

impl<T, F> Iterator for ArrayIter<'_, T, F>
where
    F: FnMut(&mut JsonReader) -> Result<T, Error>,
{
    type Item = Result<T, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.peek_kind() {
            Some(TokenKind::EndArray) => {
                self.done = true;
                self.reader.next_token().err().map(Err)
            }
            Some(_) => {
                let item = (self.element)(&mut *self.reader);
                if item.is_err() {
                    self.done = true;
                }
                Some(item)
            }
            None => {
                self.done = true;
                Some(Err(unterminated_array()))
            }
        }
    }
}

impl<T, F> FusedIterator for ArrayIter<'_, T, F> where F: FnMut(&mut JsonReader) -> Result<T, Error> {}

fn unterminated_array() -> Error {
    Error::new(ErrorKind::Structural).with_message("unterminated array")
}

pub fn decode_array<T, F>(reader: &mut JsonReader, element: F) -> Result<ArrayIter<'_, T, F>, Error>
where
    F: FnMut(&mut JsonReader) -> Result<T, Error>,
{
    reader.expect_start_array()?;
    Ok(ArrayIter {
        reader,
        element,
        done: false,
        _marker: PhantomData,
    })
}

pub fn collect_array<T, F>(reader: &mut JsonReader, element: F) -> Result<Vec<T>, Error>
where
    F: FnMut(&mut JsonReader) -> Result<T, Error>,
{
    decode_array(reader, element)?.collect()
}

/// Dictionary-shaped property; a repeated key keeps its last value.
pub fn decode_map<T, F>(reader: &mut JsonReader, mut value: F) -> Result<BTreeMap<String, T>, Error>
where
    F: FnMut(&mut JsonReader) -> Result<T, Error>,
{
    let mut map = BTreeMap::new();
    decode_object(reader, |name, reader| {
        map.insert(name.to_owned(), value(reader)?);
        Ok(Visit::Consumed)
    })?;
    Ok(map)
}

pub fn encode_required_property<T: JsonCodec>(
    writer: &mut JsonWriter,
    name: &str,
    value: &T,
) -> Result<(), Error> {
    writer.write_property_name(name)?;
    value.encode(writer)
}

pub fn encode_optional_property<T: JsonCodec>(
    writer: &mut JsonWriter,
    name: &str,
    value: &Option<T>,
) -> Result<(), Error> {
    match value {
        Some(value) => encode_required_property(writer, name, value),
        None => Ok(()),
    }
}

pub fn encode_property_with<F>(writer: &mut JsonWriter, name: &str, encode: F) -> Result<(), Error>
where
    F: FnOnce(&mut JsonWriter) -> Result<(), Error>,
{
    writer.write_property_name(name)?;
    encode(writer)
}

pub fn encode_sequence_property<T: JsonCodec>(
    writer: &mut JsonWriter,
    name: &str,
    items: &[T],
) -> Result<(), Error> {
    encode_property_with(writer, name, |writer| {
        writer.start_array()?;
        for item in items {
            item.encode(writer)?;
        }
        writer.end_array()
    })
}

pub fn encode_map_property<T: JsonCodec>(
    writer: &mut JsonWriter,
    name: &str,
    map: &BTreeMap<String, T>,
) -> Result<(), Error> {
    encode_required_property(writer, name, map)
}
