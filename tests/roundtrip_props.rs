// Property tests: canonical encodings decode back to the value that produced them.
use clusterwire::api::{
    AutoScalingMechanism, EventFields, Guid, NodeEvent, NodeEventFields, PropertyValue,
    RetentionPolicyDescription, ServicePlacementPolicyDescription, from_str, to_string,
};
use clusterwire::models::events::NodeUpEvent;
use clusterwire::models::scaling::AddRemoveReplicaScalingMechanism;
use proptest::prelude::*;
use time::{Duration, OffsetDateTime};

fn timestamp() -> impl Strategy<Value = OffsetDateTime> {
    // 1970-01-01 .. 2100-01-01, whole seconds.
    (0i64..4_102_444_800).prop_map(|secs| {
        OffsetDateTime::from_unix_timestamp(secs).expect("in range")
    })
}

fn property_value() -> impl Strategy<Value = PropertyValue> {
    prop_oneof![
        proptest::collection::vec(any::<u8>(), 0..48)
            .prop_map(|bytes| PropertyValue::Binary(bytes.into())),
        any::<i64>().prop_map(PropertyValue::Int64),
        (-4_000_000i32..4_000_000).prop_map(|n| PropertyValue::Double(f64::from(n) / 8.0)),
        ".{0,24}".prop_map(PropertyValue::String),
        any::<u128>().prop_map(|raw| PropertyValue::Guid(Guid::from_u128(raw))),
    ]
}

fn retention_duration() -> impl Strategy<Value = Duration> {
    prop_oneof![
        8 => (-10_000_000_000i64..10_000_000_000).prop_map(Duration::milliseconds),
        1 => Just(Duration::MIN),
        1 => Just(Duration::MAX),
        // Seconds and nanoseconds share a sign.
        1 => (any::<i64>(), 0i32..1_000_000_000).prop_map(|(secs, nanos)| {
            Duration::new(secs, if secs < 0 { -nanos } else { nanos })
        }),
    ]
}

fn mangle_case(text: &str, mask: u64) -> String {
    text.chars()
        .enumerate()
        .map(|(idx, ch)| {
            if mask & (1 << (idx % 64)) != 0 {
                ch.to_ascii_lowercase()
            } else {
                ch.to_ascii_uppercase()
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn property_values_round_trip(value in property_value()) {
        let encoded = to_string(&value).unwrap();
        prop_assert_eq!(from_str::<PropertyValue>(&encoded).unwrap(), value);
    }

    #[test]
    fn node_up_events_round_trip(
        raw_id in any::<u128>(),
        time_stamp in timestamp(),
        last_down in timestamp(),
        node_name in "[A-Za-z_][A-Za-z0-9_.]{0,16}",
        node_instance in any::<i64>(),
        category in proptest::option::of("[A-Za-z]{1,8}"),
    ) {
        let mut event = EventFields::new(Guid::from_u128(raw_id), time_stamp);
        event.category = category;
        let value = NodeEvent::Up(NodeUpEvent {
            node: NodeEventFields::new(event, node_name),
            node_instance,
            last_node_down_at: last_down,
        });
        let encoded = to_string(&value).unwrap();
        prop_assert!(encoded.starts_with(r#"{"Kind":"NodeUp","#), "encoded = {}", encoded);
        prop_assert_eq!(from_str::<NodeEvent>(&encoded).unwrap(), value);
    }

    #[test]
    fn retention_durations_round_trip(
        retention_duration in retention_duration(),
        minimum in proptest::option::of(0i32..1000),
    ) {
        let value = RetentionPolicyDescription::Basic {
            retention_duration,
            minimum_number_of_backups: minimum,
        };
        let encoded = to_string(&value).unwrap();
        prop_assert_eq!(from_str::<RetentionPolicyDescription>(&encoded).unwrap(), value);
    }

    #[test]
    fn unknown_properties_never_change_the_result(
        min_count in any::<i32>(),
        max_count in any::<i32>(),
        scale_increment in any::<i32>(),
        extra_name in "x[A-Za-z]{0,8}",
        extra_value in prop_oneof![
            Just("null".to_string()),
            any::<i64>().prop_map(|n| n.to_string()),
            "[a-z]{0,6}".prop_map(|s| format!("{s:?}")),
            Just(r#"{"a":[1,{"b":false}],"c":{}}"#.to_string()),
        ],
    ) {
        let input = format!(
            r#"{{"kind":"AddRemoveReplica","{extra_name}":{extra_value},"minCount":{min_count},"maxCount":{max_count},"scaleIncrement":{scale_increment}}}"#
        );
        let decoded: AutoScalingMechanism = from_str(&input).unwrap();
        prop_assert_eq!(
            decoded,
            AutoScalingMechanism::AddRemoveReplica(AddRemoveReplicaScalingMechanism {
                min_count,
                max_count,
                scale_increment,
            })
        );
    }

    #[test]
    fn placement_tags_match_in_any_case(mask in any::<u64>()) {
        let tag = mangle_case("PreferPrimaryDomain", mask);
        let input = format!(r#"{{"Type":"{tag}","DomainName":"fd:/east"}}"#);
        let decoded: ServicePlacementPolicyDescription = from_str(&input).unwrap();
        prop_assert_eq!(
            &decoded,
            &ServicePlacementPolicyDescription::PreferPrimaryDomain {
                domain_name: Some("fd:/east".to_string())
            }
        );
        // Encoding always uses the declared spelling.
        prop_assert_eq!(
            to_string(&decoded).unwrap(),
            r#"{"Type":"PreferPrimaryDomain","DomainName":"fd:/east"}"#
        );
    }
}
