// End-to-end decode/encode scenarios across the worked DTO families.
use clusterwire::api::{
    AutoScalingMechanism, AutoScalingMetric, AutoScalingPolicy, AutoScalingTrigger,
    BackupPolicyDescription, BackupScheduleDescription, BackupStorage, ChaosEvent,
    ChaosEventsSegment, ClusterEvent, DEFAULT_TIMESTAMP, ErrorKind, EventFields, Guid, NodeEvent,
    PagedBackupPolicyDescriptionList, PropertyDescription, PropertyValue,
    RetentionPolicyDescription, from_str, list_from_str, to_string,
};
use clusterwire::models::enums::{AutoScalingResourceMetricName, DayOfWeek, HealthState};
use clusterwire::models::scaling::{AddRemoveReplicaScalingMechanism, AverageLoadScalingTrigger};
use time::Duration;
use time::macros::datetime;

const INSTANCE_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[test]
fn node_up_decodes_with_defaults_for_missing_required_fields() {
    let input = r#"{"Kind":"NodeUp","EventInstanceId":"3fa85f64-5717-4562-b3fc-2c963f66afa6","TimeStamp":"2023-01-01T00:00:00Z","NodeName":"_Node_0"}"#;
    let event: NodeEvent = from_str(input).expect("decode");

    let NodeEvent::Up(up) = &event else {
        panic!("expected NodeUp, got {event:?}");
    };
    assert_eq!(up.node.node_name, "_Node_0");
    assert_eq!(up.node.event.event_instance_id, Guid::parse(INSTANCE_ID).unwrap());
    assert_eq!(up.node.event.time_stamp, datetime!(2023-01-01 00:00:00 UTC));
    assert_eq!(up.node.event.category, None);
    assert_eq!(up.node.event.has_correlated_events, None);
    assert_eq!(up.node_instance, 0);
    assert_eq!(up.last_node_down_at, DEFAULT_TIMESTAMP);
}

#[test]
fn average_load_trigger_encodes_every_property_in_order() {
    let trigger = AutoScalingTrigger::AverageLoad(AverageLoadScalingTrigger {
        metric: AutoScalingMetric::Resource {
            name: AutoScalingResourceMetricName::MemoryInGb,
        },
        lower_load_threshold: 0.2,
        upper_load_threshold: 0.8,
        scale_interval_in_seconds: 60,
    });
    assert_eq!(
        to_string(&trigger).unwrap(),
        r#"{"kind":"AverageLoad","metric":{"kind":"Resource","name":"memoryInGB"},"lowerLoadThreshold":0.2,"upperLoadThreshold":0.8,"scaleIntervalInSeconds":60}"#
    );
}

#[test]
fn family_base_tag_decodes_to_base_shape() {
    let input = format!(
        r#"{{"Kind":"ClusterEvent","EventInstanceId":"{INSTANCE_ID}","TimeStamp":"2023-06-01T12:30:00Z","Category":"Ops","HealthState":"Error"}}"#
    );
    let event: ClusterEvent = from_str(&input).expect("decode");

    let mut expected = EventFields::new(
        Guid::parse(INSTANCE_ID).unwrap(),
        datetime!(2023-06-01 12:30:00 UTC),
    );
    expected.category = Some("Ops".to_string());
    assert_eq!(event, ClusterEvent::Cluster(expected));

    assert_eq!(
        to_string(&event).unwrap(),
        format!(
            r#"{{"Kind":"ClusterEvent","EventInstanceId":"{INSTANCE_ID}","TimeStamp":"2023-06-01T12:30:00Z","Category":"Ops"}}"#
        )
    );
}

#[test]
fn health_report_reads_variant_fields_after_base_fields() {
    let input = format!(
        r#"{{"Kind":"ClusterNewHealthReport","EventInstanceId":"{INSTANCE_ID}","TimeStamp":"2023-01-01T00:00:00+02:00","SourceId":"watchdog","Property":"disk","HealthState":"warning","TimeToLiveMs":5000,"SequenceNumber":9,"Description":"low","RemoveWhenExpired":true,"SourceUtcTimestamp":"2023-01-01T00:00:00Z"}}"#
    );
    let event: ClusterEvent = from_str(&input).expect("decode");
    let ClusterEvent::NewHealthReport(report) = &event else {
        panic!("expected health report, got {event:?}");
    };
    assert_eq!(report.health_state, HealthState::Warning);
    assert_eq!(report.time_to_live_ms, 5000);
    assert!(report.remove_when_expired);
    // Offsets are normalized to UTC.
    assert_eq!(report.event.time_stamp, datetime!(2022-12-31 22:00:00 UTC));
}

#[test]
fn optional_properties_are_omitted_and_required_ones_always_written() {
    let event = ClusterEvent::Cluster(EventFields::new(Guid::nil(), DEFAULT_TIMESTAMP));
    assert_eq!(
        to_string(&event).unwrap(),
        r#"{"Kind":"ClusterEvent","EventInstanceId":"00000000-0000-0000-0000-000000000000","TimeStamp":"1970-01-01T00:00:00Z"}"#
    );

    let value: PropertyDescription =
        from_str(r#"{"PropertyName":"p","Value":{"Kind":"Double","Data":1.5},"CustomTypeId":null}"#)
            .expect("decode");
    assert_eq!(value.custom_type_id, None);
    assert_eq!(
        to_string(&value).unwrap(),
        r#"{"PropertyName":"p","Value":{"Kind":"Double","Data":1.5}}"#
    );
}

#[test]
fn unknown_properties_of_any_shape_are_skipped() {
    let input = r#"{"kind":"AddRemoveReplica","future":{"nested":[1,{"deep":null}],"flag":false},"minCount":1,"maxCount":5,"tags":["a","b"],"scaleIncrement":2}"#;
    let mechanism: AutoScalingMechanism = from_str(input).expect("decode");
    assert_eq!(
        mechanism,
        AutoScalingMechanism::AddRemoveReplica(AddRemoveReplicaScalingMechanism {
            min_count: 1,
            max_count: 5,
            scale_increment: 2,
        })
    );
}

#[test]
fn nested_families_decode_through_plain_dtos() {
    let input = r#"{
        "name": "scale-out",
        "trigger": {"kind":"AverageLoad","metric":{"kind":"Resource","name":"cpu"},"lowerLoadThreshold":0.1,"upperLoadThreshold":0.9,"scaleIntervalInSeconds":30},
        "mechanism": {"kind":"AddRemoveReplica","minCount":1,"maxCount":3,"scaleIncrement":1}
    }"#;
    let policy: AutoScalingPolicy = from_str(input).expect("decode");
    let AutoScalingTrigger::AverageLoad(trigger) = &policy.trigger;
    assert_eq!(
        trigger.metric,
        AutoScalingMetric::Resource {
            name: AutoScalingResourceMetricName::Cpu
        }
    );
    assert_eq!(trigger.scale_interval_in_seconds, 30);

    let encoded = to_string(&policy).unwrap();
    assert!(encoded.starts_with(r#"{"name":"scale-out","trigger":{"kind":"AverageLoad","#));
    assert_eq!(from_str::<AutoScalingPolicy>(&encoded).unwrap(), policy);
}

#[test]
fn nested_family_errors_surface_unchanged() {
    let input = r#"{"name":"p","trigger":{"kind":"AverageLoad","metric":{"kind":"Custom"}}}"#;
    let err = from_str::<AutoScalingPolicy>(input).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownDiscriminator);
    assert_eq!(err.discriminator(), Some("Custom"));
}

#[test]
fn backup_policy_page_round_trips() {
    let input = r#"{
        "ContinuationToken": "page-2",
        "Items": [{
            "Name": "nightly",
            "AutoRestoreOnDataLoss": false,
            "MaxIncrementalBackups": 3,
            "Schedule": {"ScheduleKind":"TimeBased","ScheduleFrequencyType":"Weekly","RunDays":["Monday","Friday"],"RunTimes":["2023-01-01T02:00:00Z"]},
            "Storage": {"StorageKind":"FileShare","FriendlyName":"share","Path":"\\\\fs\\backups","PrimaryUserName":"svc"},
            "RetentionPolicy": {"RetentionPolicyType":"Basic","RetentionDuration":"P30D","MinimumNumberOfBackups":10}
        }]
    }"#;
    let page: PagedBackupPolicyDescriptionList = from_str(input).expect("decode");
    let items = page.items.as_ref().expect("items");
    let policy: &BackupPolicyDescription = &items[0];
    assert_eq!(policy.name, "nightly");
    match &policy.schedule {
        BackupScheduleDescription::TimeBased(schedule) => {
            assert_eq!(
                schedule.run_days,
                Some(vec![DayOfWeek::Monday, DayOfWeek::Friday])
            );
            assert_eq!(schedule.run_times, vec![datetime!(2023-01-01 02:00:00 UTC)]);
        }
        other => panic!("expected time-based schedule, got {other:?}"),
    }
    assert_eq!(policy.storage.friendly_name.as_deref(), Some("share"));
    assert!(matches!(policy.storage.storage, BackupStorage::FileShare(_)));
    assert_eq!(
        policy.retention_policy,
        Some(RetentionPolicyDescription::Basic {
            retention_duration: Duration::days(30),
            minimum_number_of_backups: Some(10),
        })
    );

    let encoded = to_string(&page).unwrap();
    assert_eq!(from_str::<PagedBackupPolicyDescriptionList>(&encoded).unwrap(), page);
}

#[test]
fn chaos_history_keeps_event_order() {
    let input = r#"{"ContinuationToken":null,"History":[
        {"ChaosEvent":{"Kind":"Started","TimeStampUtc":"2023-01-01T00:00:00Z","ChaosParameters":{"MaxConcurrentFaults":2}}},
        {"ChaosEvent":{"Kind":"ExecutingFaults","TimeStampUtc":"2023-01-01T00:01:00Z","Faults":["restart node"]}},
        {"ChaosEvent":{"Kind":"Stopped","TimeStampUtc":"2023-01-01T00:02:00Z","Reason":"timeout"}}
    ]}"#;
    let segment: ChaosEventsSegment = from_str(input).expect("decode");
    assert_eq!(segment.continuation_token, None);
    let events: Vec<&ChaosEvent> = segment
        .history
        .as_ref()
        .expect("history")
        .iter()
        .filter_map(|wrapper| wrapper.chaos_event.as_ref())
        .collect();
    assert_eq!(events.len(), 3);
    assert!(matches!(events[0], ChaosEvent::Started(_)));
    assert!(matches!(events[1], ChaosEvent::ExecutingFaults(_)));
    assert!(matches!(events[2], ChaosEvent::Stopped(_)));
    assert_eq!(events[2].time_stamp_utc(), datetime!(2023-01-01 00:02:00 UTC));
}

#[test]
fn one_bad_list_element_aborts_the_whole_list() {
    let input = r#"{"History":[
        {"ChaosEvent":{"Kind":"Started","TimeStampUtc":"2023-01-01T00:00:00Z"}},
        {"ChaosEvent":{"Kind":"Paused","TimeStampUtc":"2023-01-01T00:00:00Z"}}
    ]}"#;
    let err = from_str::<ChaosEventsSegment>(input).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownDiscriminator);

    let err = list_from_str::<PropertyValue>(r#"[{"Kind":"Int64","Data":1},{"Kind":"Int64","Data":"x"}]"#)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedValue);
    assert_eq!(err.property(), Some("Data"));
}

#[test]
fn binary_and_guid_property_values_use_string_forms() {
    let values: Vec<PropertyValue> = list_from_str(&format!(
        r#"[{{"Kind":"Binary","Data":"AAEC/w=="}},{{"Kind":"Guid","Data":"{INSTANCE_ID}"}}]"#
    ))
    .expect("decode");
    assert_eq!(values[0], PropertyValue::Binary(vec![0, 1, 2, 255].into()));
    assert_eq!(values[1], PropertyValue::Guid(Guid::parse(INSTANCE_ID).unwrap()));
}
