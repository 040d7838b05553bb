// Naming-service property values, tagged by `Kind`, and the property description wrapper.
use crate::core::dispatch::{Discriminated, Polymorphic, decode_polymorphic, encode_polymorphic};
use crate::core::error::Error;
use crate::core::guid::Guid;
use crate::core::primitive::{Bytes, JsonCodec};
use crate::core::reader::JsonReader;
use crate::core::structural::{
    FieldTable, MatchMode, Visit, decode_object, decode_properties, encode_optional_property,
    encode_required_property, field, read_field,
};
use crate::core::writer::JsonWriter;

const PROPERTY_MATCH: MatchMode = MatchMode::IgnoreCase;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PropertyValueKind {
    Binary,
    Int64,
    Double,
    String,
    Guid,
}

/// Every variant carries a single required `Data` property.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    Binary(Bytes),
    Int64(i64),
    Double(f64),
    String(String),
    Guid(Guid),
}

impl Default for PropertyValue {
    fn default() -> Self {
        PropertyValue::String(String::new())
    }
}

impl Polymorphic for PropertyValue {
    type Kind = PropertyValueKind;

    const FAMILY: Discriminated<PropertyValueKind> = Discriminated {
        family: "PropertyValue",
        property: "Kind",
        property_match: PROPERTY_MATCH,
        value_match: MatchMode::Ordinal,
        variants: &[
            ("Binary", PropertyValueKind::Binary),
            ("Int64", PropertyValueKind::Int64),
            ("Double", PropertyValueKind::Double),
            ("String", PropertyValueKind::String),
            ("Guid", PropertyValueKind::Guid),
        ],
        base: None,
    };

    fn kind(&self) -> PropertyValueKind {
        match self {
            PropertyValue::Binary(_) => PropertyValueKind::Binary,
            PropertyValue::Int64(_) => PropertyValueKind::Int64,
            PropertyValue::Double(_) => PropertyValueKind::Double,
            PropertyValue::String(_) => PropertyValueKind::String,
            PropertyValue::Guid(_) => PropertyValueKind::Guid,
        }
    }

    fn decode_variant(kind: PropertyValueKind, reader: &mut JsonReader) -> Result<Self, Error> {
        match kind {
            PropertyValueKind::Binary => read_data(reader).map(PropertyValue::Binary),
            PropertyValueKind::Int64 => read_data(reader).map(PropertyValue::Int64),
            PropertyValueKind::Double => read_data(reader).map(PropertyValue::Double),
            PropertyValueKind::String => read_data(reader).map(PropertyValue::String),
            PropertyValueKind::Guid => read_data(reader).map(PropertyValue::Guid),
        }
    }

    fn encode_variant(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        match self {
            PropertyValue::Binary(data) => encode_required_property(writer, "Data", data),
            PropertyValue::Int64(data) => encode_required_property(writer, "Data", data),
            PropertyValue::Double(data) => encode_required_property(writer, "Data", data),
            PropertyValue::String(data) => encode_required_property(writer, "Data", data),
            PropertyValue::Guid(data) => encode_required_property(writer, "Data", data),
        }
    }
}

fn read_data<T: JsonCodec + Default>(reader: &mut JsonReader) -> Result<T, Error> {
    let mut data = None;
    decode_properties(reader, |name, reader| {
        if !PROPERTY_MATCH.matches(name, "Data") {
            return Ok(Visit::Unknown);
        }
        data = read_field(reader)?;
        Ok(Visit::Consumed)
    })?;
    Ok(data.unwrap_or_default())
}

impl JsonCodec for PropertyValue {
    fn decode(reader: &mut JsonReader) -> Result<Self, Error> {
        decode_polymorphic(reader)
    }

    fn encode(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        encode_polymorphic(self, writer)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyDescription {
    pub property_name: String,
    pub custom_type_id: Option<String>,
    pub value: PropertyValue,
}

#[derive(Clone, Copy)]
enum DescriptionField {
    PropertyName,
    CustomTypeId,
    Value,
}

const DESCRIPTION_FIELDS: FieldTable<DescriptionField> = FieldTable::new(
    PROPERTY_MATCH,
    &[
        field("PropertyName", DescriptionField::PropertyName),
        field("CustomTypeId", DescriptionField::CustomTypeId),
        field("Value", DescriptionField::Value),
    ],
);

impl JsonCodec for PropertyDescription {
    fn decode(reader: &mut JsonReader) -> Result<Self, Error> {
        let mut description = PropertyDescription::default();
        decode_object(reader, |name, reader| {
            match DESCRIPTION_FIELDS.lookup(name) {
                Some(DescriptionField::PropertyName) => {
                    description.property_name = read_field(reader)?.unwrap_or_default()
                }
                Some(DescriptionField::CustomTypeId) => {
                    description.custom_type_id = read_field(reader)?
                }
                Some(DescriptionField::Value) => {
                    description.value = read_field(reader)?.unwrap_or_default()
                }
                None => return Ok(Visit::Unknown),
            }
            Ok(Visit::Consumed)
        })?;
        Ok(description)
    }

    fn encode(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        writer.start_object()?;
        encode_required_property(writer, "PropertyName", &self.property_name)?;
        encode_required_property(writer, "Value", &self.value)?;
        encode_optional_property(writer, "CustomTypeId", &self.custom_type_id)?;
        writer.end_object()
    }
}
