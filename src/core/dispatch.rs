//! Purpose: Discriminator-driven decode/encode for closed families of DTO variants.
//! Exports: `Discriminated`, `Polymorphic`, `Interleaved`, `decode_polymorphic`,
//!   `decode_interleaved`, `encode_polymorphic`.
//! Role: Top layer of the codec stack; selects a variant's field codec from a tag string.
//! Invariants: Descriptor tables are `'static` and read-only; safe to share across threads.
//! Invariants: First matching table entry wins; tags are unique within a family.
//! Invariants: A family's base tag resolves to the base field list, never to an error.
//! Notes: Property-name and tag-value case rules are per family and intentionally differ.
use std::fmt;

use crate::core::error::{Error, ErrorKind};
use crate::core::reader::JsonReader;
use crate::core::structural::{MatchMode, Visit};
use crate::core::writer::JsonWriter;

/// Static description of one discriminated family.
#[derive(Debug)]
pub struct Discriminated<K: 'static> {
    pub family: &'static str,
    pub property: &'static str,
    pub property_match: MatchMode,
    pub value_match: MatchMode,
    pub variants: &'static [(&'static str, K)],
    /// Tag naming the family itself, when the base shape is decodable on its own.
    /// Matched after every variant.
    pub base: Option<(&'static str, K)>,
}

impl<K> Discriminated<K>
where
    K: Copy + PartialEq + fmt::Debug,
{
    pub fn is_discriminator(&self, name: &str) -> bool {
        self.property_match.matches(name, self.property)
    }

    /// Entries in match order: declared variants, then the base tag.
    fn entries(&self) -> impl Iterator<Item = &(&'static str, K)> + '_ {
        self.variants.iter().chain(self.base.as_ref())
    }

    pub fn resolve(&self, tag: &str) -> Result<K, Error> {
        self.entries()
            .find(|(wire, _)| self.value_match.matches(tag, wire))
            .map(|(_, kind)| *kind)
            .ok_or_else(|| {
                tracing::debug!(family = self.family, tag, "rejecting unknown discriminator");
                Error::new(ErrorKind::UnknownDiscriminator)
                    .with_message(format!("{} has no variant tagged {tag:?}", self.family))
                    .with_property(self.property)
                    .with_discriminator(tag)
            })
    }

    /// Declared tag for `kind`; a kind missing from the table is a programming error.
    pub fn tag(&self, kind: K) -> Result<&'static str, Error> {
        self.entries()
            .find(|(_, candidate)| *candidate == kind)
            .map(|(wire, _)| *wire)
            .ok_or_else(|| {
                Error::new(ErrorKind::Internal)
                    .with_message(format!("{} has no tag for {kind:?}", self.family))
                    .with_property(self.property)
            })
    }

    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries().map(|(wire, _)| *wire)
    }

    pub fn base_kind(&self) -> Option<K> {
        self.base.map(|(_, kind)| kind)
    }

    fn read_tag(&self, reader: &mut JsonReader) -> Result<String, Error> {
        reader
            .read_string()
            .map_err(|err| err.with_property(self.property))
    }
}

pub trait Polymorphic: Sized {
    type Kind: Copy + Eq + fmt::Debug + 'static;

    const FAMILY: Discriminated<Self::Kind>;

    fn kind(&self) -> Self::Kind;

    /// Decodes the rest of an object whose discriminator selected `kind`.
    fn decode_variant(kind: Self::Kind, reader: &mut JsonReader) -> Result<Self, Error>;

    /// Writes every property that follows the discriminator.
    fn encode_variant(&self, writer: &mut JsonWriter) -> Result<(), Error>;
}

/// Families whose base shape carries ordinary fields that may precede the discriminator.
/// The family's `base` entry names the tag that keeps those fields.
pub trait Interleaved: Polymorphic {
    type Base: Default;

    fn visit_base(base: &mut Self::Base, name: &str, reader: &mut JsonReader)
    -> Result<Visit, Error>;

    fn from_base(base: Self::Base) -> Self;
}

/// Decodes a family whose discriminator must be the first property.
pub fn decode_polymorphic<T: Polymorphic>(reader: &mut JsonReader) -> Result<T, Error> {
    let family = &T::FAMILY;
    reader.expect_start_object()?;
    match reader.read_property_name()? {
        Some(name) if family.is_discriminator(&name) => {}
        Some(name) => {
            return Err(Error::new(ErrorKind::UnexpectedDiscriminatorPosition)
                .with_message(format!(
                    "first property of {} must be {:?}, found {name:?}",
                    family.family, family.property
                ))
                .with_property(family.property));
        }
        None => {
            return Err(Error::new(ErrorKind::UnexpectedDiscriminatorPosition)
                .with_message(format!("{} object has no properties", family.family))
                .with_property(family.property));
        }
    }
    let tag = family.read_tag(reader)?;
    let kind = family.resolve(&tag)?;
    tracing::trace!(family = family.family, tag = %tag, "dispatching variant");
    T::decode_variant(kind, reader)
}

/// Decodes a family in document order. Fields seen before a non-base discriminator
/// are dropped; the variant decoder reads only what follows the tag.
pub fn decode_interleaved<T: Interleaved>(reader: &mut JsonReader) -> Result<T, Error> {
    let family = &T::FAMILY;
    reader.expect_start_object()?;
    let mut base = T::Base::default();
    while let Some(name) = reader.read_property_name()? {
        if family.is_discriminator(&name) {
            let tag = family.read_tag(reader)?;
            let kind = family.resolve(&tag)?;
            if family.base_kind() != Some(kind) {
                tracing::trace!(family = family.family, tag = %tag, "dispatching variant mid-object");
                return T::decode_variant(kind, reader);
            }
            continue;
        }
        let visit = T::visit_base(&mut base, &name, reader)
            .map_err(|err| err.with_property_if_absent(&name))?;
        if visit == Visit::Unknown {
            tracing::trace!(property = %name, "skipping unrecognized property");
            reader
                .skip_value()
                .map_err(|err| err.with_property_if_absent(&name))?;
        }
    }
    Ok(T::from_base(base))
}

/// Writes `{discriminator, variant fields...}` using the variant's declared tag.
pub fn encode_polymorphic<T: Polymorphic>(value: &T, writer: &mut JsonWriter) -> Result<(), Error> {
    let family = &T::FAMILY;
    let tag = family.tag(value.kind())?;
    writer.start_object()?;
    writer.write_property_name(family.property)?;
    writer.write_string(tag)?;
    value.encode_variant(writer)?;
    writer.end_object()
}
