// Pins per-family discriminator case rules and dispatch failure modes.
use clusterwire::api::{
    AutoScalingMetric, BackupStorage, BackupStorageDescription, ChaosEvent, ClusterEvent,
    ErrorKind, JsonCodec, NodeEvent, PropertyValue, SecretResourceProperties,
    ServicePlacementPolicyDescription, from_str,
};
use clusterwire::models::enums::AutoScalingResourceMetricName;

fn error_kind<T: JsonCodec + std::fmt::Debug>(input: &str) -> ErrorKind {
    from_str::<T>(input).expect_err("decode should fail").kind()
}

#[test]
fn event_families_ignore_property_case_but_not_tag_case() {
    let event: NodeEvent = from_str(r#"{"kind":"NodeUp","nodename":"n1"}"#).expect("decode");
    assert!(matches!(event, NodeEvent::Up(_)));
    assert_eq!(event.node().node_name, "n1");

    assert_eq!(
        error_kind::<NodeEvent>(r#"{"Kind":"nodeup"}"#),
        ErrorKind::UnknownDiscriminator
    );
    assert_eq!(
        error_kind::<ClusterEvent>(r#"{"Kind":"chaosstopped"}"#),
        ErrorKind::UnknownDiscriminator
    );
}

#[test]
fn chaos_events_match_both_ordinally() {
    assert_eq!(
        error_kind::<ChaosEvent>(r#"{"kind":"Stopped","TimeStampUtc":"2023-01-01T00:00:00Z"}"#),
        ErrorKind::UnexpectedDiscriminatorPosition
    );
    assert_eq!(
        error_kind::<ChaosEvent>(r#"{"Kind":"stopped"}"#),
        ErrorKind::UnknownDiscriminator
    );
    let event: ChaosEvent =
        from_str(r#"{"Kind":"Stopped","TimeStampUtc":"2023-01-01T00:00:00Z","Reason":"done"}"#)
            .expect("decode");
    assert!(matches!(event, ChaosEvent::Stopped(_)));
}

#[test]
fn placement_policies_ignore_tag_case_only() {
    let policy: ServicePlacementPolicyDescription =
        from_str(r#"{"Type":"requireddomain","DomainName":"fd:/dc1"}"#).expect("decode");
    assert_eq!(
        policy,
        ServicePlacementPolicyDescription::RequiredDomain {
            domain_name: Some("fd:/dc1".to_string())
        }
    );

    assert_eq!(
        error_kind::<ServicePlacementPolicyDescription>(r#"{"type":"RequiredDomain"}"#),
        ErrorKind::UnexpectedDiscriminatorPosition
    );
}

#[test]
fn placement_policies_have_no_base_tag() {
    assert_eq!(
        error_kind::<ServicePlacementPolicyDescription>(
            r#"{"Type":"ServicePlacementPolicyDescription"}"#
        ),
        ErrorKind::UnknownDiscriminator
    );
}

#[test]
fn backup_and_property_families_ignore_property_case_only() {
    let storage: BackupStorageDescription =
        from_str(r#"{"storagekind":"FileShare","Path":"\\\\share\\backups"}"#).expect("decode");
    match storage.storage {
        BackupStorage::FileShare(share) => assert_eq!(share.path, "\\\\share\\backups"),
        other => panic!("unexpected storage {other:?}"),
    }
    assert_eq!(
        error_kind::<BackupStorageDescription>(r#"{"StorageKind":"fileshare","Path":"p"}"#),
        ErrorKind::UnknownDiscriminator
    );

    let value: PropertyValue = from_str(r#"{"KIND":"Int64","Data":3}"#).expect("decode");
    assert_eq!(value, PropertyValue::Int64(3));
    assert_eq!(
        error_kind::<PropertyValue>(r#"{"Kind":"int64","Data":3}"#),
        ErrorKind::UnknownDiscriminator
    );
}

#[test]
fn scaling_families_use_lowercase_kind() {
    let metric: AutoScalingMetric = from_str(r#"{"kind":"Resource","name":"cpu"}"#).expect("decode");
    assert_eq!(
        metric,
        AutoScalingMetric::Resource {
            name: AutoScalingResourceMetricName::Cpu
        }
    );
    assert_eq!(
        error_kind::<AutoScalingMetric>(r#"{"Kind":"Resource","name":"cpu"}"#),
        ErrorKind::UnexpectedDiscriminatorPosition
    );
    assert_eq!(
        error_kind::<AutoScalingMetric>(r#"{"kind":"resource"}"#),
        ErrorKind::UnknownDiscriminator
    );
}

#[test]
fn secrets_treat_other_casings_as_ordinary_properties() {
    // "Kind" is not the discriminator here, so it is skipped like any unknown property.
    let secret: SecretResourceProperties =
        from_str(r#"{"Kind":"inlinedValue","description":"d"}"#).expect("decode");
    assert!(matches!(secret, SecretResourceProperties::Base(_)));
    assert_eq!(secret.fields().description.as_deref(), Some("d"));

    assert_eq!(
        error_kind::<SecretResourceProperties>(r#"{"kind":"InlinedValue"}"#),
        ErrorKind::UnknownDiscriminator
    );
}

#[test]
fn discriminator_must_be_a_string() {
    let err = from_str::<NodeEvent>(r#"{"Kind":null}"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedValue);
    assert_eq!(err.property(), Some("Kind"));
}

#[test]
fn non_object_payloads_are_malformed() {
    assert_eq!(error_kind::<PropertyValue>("[]"), ErrorKind::MalformedValue);
    assert_eq!(error_kind::<PropertyValue>(r#""Int64""#), ErrorKind::MalformedValue);
    assert_eq!(error_kind::<PropertyValue>("{"), ErrorKind::Structural);
}

#[test]
fn unknown_discriminator_reports_tag_and_property() {
    let err = from_str::<PropertyValue>(r#"{"Kind":"Decimal","Data":1}"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownDiscriminator);
    assert_eq!(err.discriminator(), Some("Decimal"));
    assert_eq!(err.property(), Some("Kind"));
}
