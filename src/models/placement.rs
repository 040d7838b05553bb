// Service placement policies; `Type` tags match ignoring case, property names do not.
use crate::core::dispatch::{Discriminated, Polymorphic, decode_polymorphic, encode_polymorphic};
use crate::core::error::Error;
use crate::core::primitive::JsonCodec;
use crate::core::reader::JsonReader;
use crate::core::structural::{
    FieldTable, MatchMode, Visit, decode_properties, encode_optional_property, field, read_field,
};
use crate::core::writer::JsonWriter;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlacementPolicyKind {
    InvalidDomain,
    RequiredDomain,
    PreferPrimaryDomain,
    RequiredDomainDistribution,
    NonPartiallyPlaceService,
    AllowMultipleStatelessInstancesOnNode,
}

#[derive(Clone, Copy)]
struct DomainNameField;

const PLACEMENT_FIELDS: FieldTable<DomainNameField> =
    FieldTable::new(MatchMode::Ordinal, &[field("DomainName", DomainNameField)]);

#[derive(Clone, Debug, PartialEq)]
pub enum ServicePlacementPolicyDescription {
    InvalidDomain { domain_name: Option<String> },
    RequiredDomain { domain_name: Option<String> },
    PreferPrimaryDomain { domain_name: Option<String> },
    RequiredDomainDistribution { domain_name: Option<String> },
    NonPartiallyPlaceService,
    AllowMultipleStatelessInstancesOnNode { domain_name: Option<String> },
}

impl ServicePlacementPolicyDescription {
    pub fn domain_name(&self) -> Option<&str> {
        match self {
            ServicePlacementPolicyDescription::InvalidDomain { domain_name }
            | ServicePlacementPolicyDescription::RequiredDomain { domain_name }
            | ServicePlacementPolicyDescription::PreferPrimaryDomain { domain_name }
            | ServicePlacementPolicyDescription::RequiredDomainDistribution { domain_name }
            | ServicePlacementPolicyDescription::AllowMultipleStatelessInstancesOnNode {
                domain_name,
            } => domain_name.as_deref(),
            ServicePlacementPolicyDescription::NonPartiallyPlaceService => None,
        }
    }
}

impl Polymorphic for ServicePlacementPolicyDescription {
    type Kind = PlacementPolicyKind;

    const FAMILY: Discriminated<PlacementPolicyKind> = Discriminated {
        family: "ServicePlacementPolicyDescription",
        property: "Type",
        property_match: MatchMode::Ordinal,
        value_match: MatchMode::IgnoreCase,
        variants: &[
            ("InvalidDomain", PlacementPolicyKind::InvalidDomain),
            ("RequiredDomain", PlacementPolicyKind::RequiredDomain),
            ("PreferPrimaryDomain", PlacementPolicyKind::PreferPrimaryDomain),
            (
                "RequiredDomainDistribution",
                PlacementPolicyKind::RequiredDomainDistribution,
            ),
            (
                "NonPartiallyPlaceService",
                PlacementPolicyKind::NonPartiallyPlaceService,
            ),
            (
                "AllowMultipleStatelessInstancesOnNode",
                PlacementPolicyKind::AllowMultipleStatelessInstancesOnNode,
            ),
        ],
        base: None,
    };

    fn kind(&self) -> PlacementPolicyKind {
        match self {
            ServicePlacementPolicyDescription::InvalidDomain { .. } => {
                PlacementPolicyKind::InvalidDomain
            }
            ServicePlacementPolicyDescription::RequiredDomain { .. } => {
                PlacementPolicyKind::RequiredDomain
            }
            ServicePlacementPolicyDescription::PreferPrimaryDomain { .. } => {
                PlacementPolicyKind::PreferPrimaryDomain
            }
            ServicePlacementPolicyDescription::RequiredDomainDistribution { .. } => {
                PlacementPolicyKind::RequiredDomainDistribution
            }
            ServicePlacementPolicyDescription::NonPartiallyPlaceService => {
                PlacementPolicyKind::NonPartiallyPlaceService
            }
            ServicePlacementPolicyDescription::AllowMultipleStatelessInstancesOnNode { .. } => {
                PlacementPolicyKind::AllowMultipleStatelessInstancesOnNode
            }
        }
    }

    fn decode_variant(kind: PlacementPolicyKind, reader: &mut JsonReader) -> Result<Self, Error> {
        let takes_domain = kind != PlacementPolicyKind::NonPartiallyPlaceService;
        let mut domain_name = None;
        decode_properties(reader, |name, reader| {
            if !takes_domain || PLACEMENT_FIELDS.lookup(name).is_none() {
                return Ok(Visit::Unknown);
            }
            domain_name = read_field(reader)?;
            Ok(Visit::Consumed)
        })?;
        Ok(match kind {
            PlacementPolicyKind::InvalidDomain => {
                ServicePlacementPolicyDescription::InvalidDomain { domain_name }
            }
            PlacementPolicyKind::RequiredDomain => {
                ServicePlacementPolicyDescription::RequiredDomain { domain_name }
            }
            PlacementPolicyKind::PreferPrimaryDomain => {
                ServicePlacementPolicyDescription::PreferPrimaryDomain { domain_name }
            }
            PlacementPolicyKind::RequiredDomainDistribution => {
                ServicePlacementPolicyDescription::RequiredDomainDistribution { domain_name }
            }
            PlacementPolicyKind::NonPartiallyPlaceService => {
                ServicePlacementPolicyDescription::NonPartiallyPlaceService
            }
            PlacementPolicyKind::AllowMultipleStatelessInstancesOnNode => {
                ServicePlacementPolicyDescription::AllowMultipleStatelessInstancesOnNode {
                    domain_name,
                }
            }
        })
    }

    fn encode_variant(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        match self {
            ServicePlacementPolicyDescription::NonPartiallyPlaceService => Ok(()),
            ServicePlacementPolicyDescription::InvalidDomain { domain_name }
            | ServicePlacementPolicyDescription::RequiredDomain { domain_name }
            | ServicePlacementPolicyDescription::PreferPrimaryDomain { domain_name }
            | ServicePlacementPolicyDescription::RequiredDomainDistribution { domain_name }
            | ServicePlacementPolicyDescription::AllowMultipleStatelessInstancesOnNode {
                domain_name,
            } => encode_optional_property(writer, "DomainName", domain_name),
        }
    }
}

impl JsonCodec for ServicePlacementPolicyDescription {
    fn decode(reader: &mut JsonReader) -> Result<Self, Error> {
        decode_polymorphic(reader)
    }

    fn encode(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        encode_polymorphic(self, writer)
    }
}

#[cfg(test)]
mod tests {
    use super::ServicePlacementPolicyDescription;
    use crate::core::error::ErrorKind;
    use crate::core::primitive::JsonCodec;
    use crate::core::reader::JsonReader;
    use crate::core::writer::JsonWriter;

    fn decode(input: &str) -> Result<ServicePlacementPolicyDescription, crate::core::error::Error> {
        ServicePlacementPolicyDescription::decode(&mut JsonReader::from_str(input).expect("parse"))
    }

    #[test]
    fn tags_ignore_case_and_encode_with_declared_casing() {
        let policy = decode(r#"{"Type":"requireddomain","DomainName":"fd:/rack1"}"#).expect("decode");
        assert_eq!(policy.domain_name(), Some("fd:/rack1"));

        let mut writer = JsonWriter::new();
        policy.encode(&mut writer).expect("encode");
        assert_eq!(
            writer.into_string().unwrap(),
            r#"{"Type":"RequiredDomain","DomainName":"fd:/rack1"}"#
        );
    }

    #[test]
    fn discriminator_name_is_case_sensitive() {
        let err = decode(r#"{"type":"RequiredDomain"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedDiscriminatorPosition);
    }

    #[test]
    fn variant_without_fields_skips_everything_else() {
        let policy =
            decode(r#"{"Type":"NonPartiallyPlaceService","DomainName":"ignored"}"#).expect("decode");
        assert_eq!(policy, ServicePlacementPolicyDescription::NonPartiallyPlaceService);
    }

    #[test]
    fn domain_name_matches_exact_case_only() {
        let policy =
            decode(r#"{"Type":"RequiredDomain","domainname":"fd:/rack2"}"#).expect("decode");
        assert_eq!(
            policy,
            ServicePlacementPolicyDescription::RequiredDomain { domain_name: None }
        );
    }
}
