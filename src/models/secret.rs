//! Purpose: Secret resource properties for mesh applications.
//! Exports: `SecretFields`, `SecretResourceProperties`.
//! Role: The family decoded in document order; `kind` may follow ordinary properties.
//! Invariants: A non-base `kind` discards properties read before it.
//! Invariants: Without any `kind`, the base shape is returned with what was read.
use crate::core::dispatch::{
    Discriminated, Interleaved, Polymorphic, decode_interleaved, encode_polymorphic,
};
use crate::core::error::Error;
use crate::core::primitive::JsonCodec;
use crate::core::reader::JsonReader;
use crate::core::structural::{
    FieldTable, MatchMode, Visit, decode_properties, encode_optional_property, field, read_field,
};
use crate::core::writer::JsonWriter;
use crate::models::enums::ResourceStatus;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SecretFields {
    pub description: Option<String>,
    pub status: Option<ResourceStatus>,
    pub status_details: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Clone, Copy)]
enum SecretField {
    Description,
    Status,
    StatusDetails,
    ContentType,
}

const SECRET_FIELDS: FieldTable<SecretField> = FieldTable::new(
    MatchMode::Ordinal,
    &[
        field("description", SecretField::Description),
        field("status", SecretField::Status),
        field("statusDetails", SecretField::StatusDetails),
        field("contentType", SecretField::ContentType),
    ],
);

impl SecretFields {
    fn visit(&mut self, name: &str, reader: &mut JsonReader) -> Result<Visit, Error> {
        match SECRET_FIELDS.lookup(name) {
            Some(SecretField::Description) => self.description = read_field(reader)?,
            Some(SecretField::Status) => self.status = read_field(reader)?,
            Some(SecretField::StatusDetails) => self.status_details = read_field(reader)?,
            Some(SecretField::ContentType) => self.content_type = read_field(reader)?,
            None => return Ok(Visit::Unknown),
        }
        Ok(Visit::Consumed)
    }

    fn encode(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        encode_optional_property(writer, "description", &self.description)?;
        encode_optional_property(writer, "status", &self.status)?;
        encode_optional_property(writer, "statusDetails", &self.status_details)?;
        encode_optional_property(writer, "contentType", &self.content_type)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SecretKind {
    SecretResourceProperties,
    InlinedValue,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SecretResourceProperties {
    Base(SecretFields),
    /// Secret whose value is stored inline with the resource.
    InlinedValue(SecretFields),
}

impl SecretResourceProperties {
    pub fn fields(&self) -> &SecretFields {
        match self {
            SecretResourceProperties::Base(fields)
            | SecretResourceProperties::InlinedValue(fields) => fields,
        }
    }
}

impl Polymorphic for SecretResourceProperties {
    type Kind = SecretKind;

    const FAMILY: Discriminated<SecretKind> = Discriminated {
        family: "SecretResourceProperties",
        property: "kind",
        property_match: MatchMode::Ordinal,
        value_match: MatchMode::Ordinal,
        variants: &[("inlinedValue", SecretKind::InlinedValue)],
        base: Some(("SecretResourceProperties", SecretKind::SecretResourceProperties)),
    };

    fn kind(&self) -> SecretKind {
        match self {
            SecretResourceProperties::Base(_) => SecretKind::SecretResourceProperties,
            SecretResourceProperties::InlinedValue(_) => SecretKind::InlinedValue,
        }
    }

    fn decode_variant(kind: SecretKind, reader: &mut JsonReader) -> Result<Self, Error> {
        let mut fields = SecretFields::default();
        decode_properties(reader, |name, reader| fields.visit(name, reader))?;
        Ok(match kind {
            SecretKind::SecretResourceProperties => SecretResourceProperties::Base(fields),
            SecretKind::InlinedValue => SecretResourceProperties::InlinedValue(fields),
        })
    }

    fn encode_variant(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        self.fields().encode(writer)
    }
}

impl Interleaved for SecretResourceProperties {
    type Base = SecretFields;

    fn visit_base(
        base: &mut SecretFields,
        name: &str,
        reader: &mut JsonReader,
    ) -> Result<Visit, Error> {
        base.visit(name, reader)
    }

    fn from_base(base: SecretFields) -> Self {
        SecretResourceProperties::Base(base)
    }
}

impl JsonCodec for SecretResourceProperties {
    fn decode(reader: &mut JsonReader) -> Result<Self, Error> {
        decode_interleaved(reader)
    }

    fn encode(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        encode_polymorphic(self, writer)
    }
}
