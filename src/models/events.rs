//! Purpose: Cluster and node event families returned by the event store endpoints.
//! Exports: `EventFields`, `ClusterEvent` and its variants, `NodeEventFields`, `NodeEvent` and its variants.
//! Role: Worked discriminator-first families; both carry a decodable base tag.
//! Invariants: Property names match ignoring case; `Kind` values match ordinally.
//! Invariants: `EventInstanceId` and `TimeStamp` are always written; `Category` and
//!   `HasCorrelatedEvents` only when present.
use time::OffsetDateTime;

use crate::core::dispatch::{Discriminated, Polymorphic, decode_polymorphic, encode_polymorphic};
use crate::core::error::Error;
use crate::core::guid::Guid;
use crate::core::primitive::{DEFAULT_TIMESTAMP, JsonCodec};
use crate::core::reader::JsonReader;
use crate::core::structural::{
    FieldTable, MatchMode, Visit, decode_properties, encode_optional_property,
    encode_required_property, field, read_field,
};
use crate::core::writer::JsonWriter;
use crate::models::enums::{FailureAction, HealthState, UpgradeKind, UpgradeMode};

const EVENT_MATCH: MatchMode = MatchMode::IgnoreCase;

/// Properties shared by every event variant.
#[derive(Clone, Debug, PartialEq)]
pub struct EventFields {
    pub event_instance_id: Guid,
    pub category: Option<String>,
    pub time_stamp: OffsetDateTime,
    pub has_correlated_events: Option<bool>,
}

impl EventFields {
    pub fn new(event_instance_id: Guid, time_stamp: OffsetDateTime) -> Self {
        Self {
            event_instance_id,
            category: None,
            time_stamp,
            has_correlated_events: None,
        }
    }

    pub(crate) fn encode_required(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        encode_required_property(writer, "EventInstanceId", &self.event_instance_id)?;
        encode_required_property(writer, "TimeStamp", &self.time_stamp)
    }

    pub(crate) fn encode_optional(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        encode_optional_property(writer, "Category", &self.category)?;
        encode_optional_property(writer, "HasCorrelatedEvents", &self.has_correlated_events)
    }
}

#[derive(Clone, Copy)]
enum EventField {
    EventInstanceId,
    Category,
    TimeStamp,
    HasCorrelatedEvents,
}

const EVENT_FIELDS: FieldTable<EventField> = FieldTable::new(
    EVENT_MATCH,
    &[
        field("EventInstanceId", EventField::EventInstanceId),
        field("Category", EventField::Category),
        field("TimeStamp", EventField::TimeStamp),
        field("HasCorrelatedEvents", EventField::HasCorrelatedEvents),
    ],
);

#[derive(Default)]
pub(crate) struct EventFieldsBuilder {
    event_instance_id: Option<Guid>,
    category: Option<String>,
    time_stamp: Option<OffsetDateTime>,
    has_correlated_events: Option<bool>,
}

impl EventFieldsBuilder {
    pub(crate) fn visit(&mut self, name: &str, reader: &mut JsonReader) -> Result<Visit, Error> {
        match EVENT_FIELDS.lookup(name) {
            Some(EventField::EventInstanceId) => self.event_instance_id = read_field(reader)?,
            Some(EventField::Category) => self.category = read_field(reader)?,
            Some(EventField::TimeStamp) => self.time_stamp = read_field(reader)?,
            Some(EventField::HasCorrelatedEvents) => {
                self.has_correlated_events = read_field(reader)?
            }
            None => return Ok(Visit::Unknown),
        }
        Ok(Visit::Consumed)
    }

    pub(crate) fn build(self) -> EventFields {
        EventFields {
            event_instance_id: self.event_instance_id.unwrap_or_default(),
            category: self.category,
            time_stamp: self.time_stamp.unwrap_or(DEFAULT_TIMESTAMP),
            has_correlated_events: self.has_correlated_events,
        }
    }
}

// ---------------------------------------------------------------------------
// ClusterEvent family
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct ClusterNewHealthReportEvent {
    pub event: EventFields,
    pub source_id: String,
    pub property: String,
    pub health_state: HealthState,
    pub time_to_live_ms: i64,
    pub sequence_number: i64,
    pub description: String,
    pub remove_when_expired: bool,
    pub source_utc_timestamp: OffsetDateTime,
}

#[derive(Clone, Copy)]
enum HealthReportField {
    SourceId,
    Property,
    HealthState,
    TimeToLiveMs,
    SequenceNumber,
    Description,
    RemoveWhenExpired,
    SourceUtcTimestamp,
}

const HEALTH_REPORT_FIELDS: FieldTable<HealthReportField> = FieldTable::new(
    EVENT_MATCH,
    &[
        field("SourceId", HealthReportField::SourceId),
        field("Property", HealthReportField::Property),
        field("HealthState", HealthReportField::HealthState),
        field("TimeToLiveMs", HealthReportField::TimeToLiveMs),
        field("SequenceNumber", HealthReportField::SequenceNumber),
        field("Description", HealthReportField::Description),
        field("RemoveWhenExpired", HealthReportField::RemoveWhenExpired),
        field("SourceUtcTimestamp", HealthReportField::SourceUtcTimestamp),
    ],
);

impl ClusterNewHealthReportEvent {
    fn decode_fields(reader: &mut JsonReader) -> Result<Self, Error> {
        let mut event = EventFieldsBuilder::default();
        let mut source_id = None;
        let mut property = None;
        let mut health_state = None;
        let mut time_to_live_ms = None;
        let mut sequence_number = None;
        let mut description = None;
        let mut remove_when_expired = None;
        let mut source_utc_timestamp = None;
        decode_properties(reader, |name, reader| {
            match HEALTH_REPORT_FIELDS.lookup(name) {
                Some(HealthReportField::SourceId) => source_id = read_field(reader)?,
                Some(HealthReportField::Property) => property = read_field(reader)?,
                Some(HealthReportField::HealthState) => health_state = read_field(reader)?,
                Some(HealthReportField::TimeToLiveMs) => time_to_live_ms = read_field(reader)?,
                Some(HealthReportField::SequenceNumber) => sequence_number = read_field(reader)?,
                Some(HealthReportField::Description) => description = read_field(reader)?,
                Some(HealthReportField::RemoveWhenExpired) => {
                    remove_when_expired = read_field(reader)?
                }
                Some(HealthReportField::SourceUtcTimestamp) => {
                    source_utc_timestamp = read_field(reader)?
                }
                None => return event.visit(name, reader),
            }
            Ok(Visit::Consumed)
        })?;
        Ok(Self {
            event: event.build(),
            source_id: source_id.unwrap_or_default(),
            property: property.unwrap_or_default(),
            health_state: health_state.unwrap_or_default(),
            time_to_live_ms: time_to_live_ms.unwrap_or_default(),
            sequence_number: sequence_number.unwrap_or_default(),
            description: description.unwrap_or_default(),
            remove_when_expired: remove_when_expired.unwrap_or_default(),
            source_utc_timestamp: source_utc_timestamp.unwrap_or(DEFAULT_TIMESTAMP),
        })
    }

    fn encode_fields(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        self.event.encode_required(writer)?;
        encode_required_property(writer, "SourceId", &self.source_id)?;
        encode_required_property(writer, "Property", &self.property)?;
        encode_required_property(writer, "HealthState", &self.health_state)?;
        encode_required_property(writer, "TimeToLiveMs", &self.time_to_live_ms)?;
        encode_required_property(writer, "SequenceNumber", &self.sequence_number)?;
        encode_required_property(writer, "Description", &self.description)?;
        encode_required_property(writer, "RemoveWhenExpired", &self.remove_when_expired)?;
        encode_required_property(writer, "SourceUtcTimestamp", &self.source_utc_timestamp)?;
        self.event.encode_optional(writer)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClusterUpgradeStartedEvent {
    pub event: EventFields,
    pub current_cluster_version: String,
    pub target_cluster_version: String,
    pub upgrade_type: UpgradeKind,
    pub rolling_upgrade_mode: UpgradeMode,
    pub failure_action: FailureAction,
}

#[derive(Clone, Copy)]
enum UpgradeStartedField {
    CurrentClusterVersion,
    TargetClusterVersion,
    UpgradeType,
    RollingUpgradeMode,
    FailureAction,
}

const UPGRADE_STARTED_FIELDS: FieldTable<UpgradeStartedField> = FieldTable::new(
    EVENT_MATCH,
    &[
        field("CurrentClusterVersion", UpgradeStartedField::CurrentClusterVersion),
        field("TargetClusterVersion", UpgradeStartedField::TargetClusterVersion),
        field("UpgradeType", UpgradeStartedField::UpgradeType),
        field("RollingUpgradeMode", UpgradeStartedField::RollingUpgradeMode),
        field("FailureAction", UpgradeStartedField::FailureAction),
    ],
);

impl ClusterUpgradeStartedEvent {
    fn decode_fields(reader: &mut JsonReader) -> Result<Self, Error> {
        let mut event = EventFieldsBuilder::default();
        let mut current_cluster_version = None;
        let mut target_cluster_version = None;
        let mut upgrade_type = None;
        let mut rolling_upgrade_mode = None;
        let mut failure_action = None;
        decode_properties(reader, |name, reader| {
            match UPGRADE_STARTED_FIELDS.lookup(name) {
                Some(UpgradeStartedField::CurrentClusterVersion) => {
                    current_cluster_version = read_field(reader)?
                }
                Some(UpgradeStartedField::TargetClusterVersion) => {
                    target_cluster_version = read_field(reader)?
                }
                Some(UpgradeStartedField::UpgradeType) => upgrade_type = read_field(reader)?,
                Some(UpgradeStartedField::RollingUpgradeMode) => {
                    rolling_upgrade_mode = read_field(reader)?
                }
                Some(UpgradeStartedField::FailureAction) => failure_action = read_field(reader)?,
                None => return event.visit(name, reader),
            }
            Ok(Visit::Consumed)
        })?;
        Ok(Self {
            event: event.build(),
            current_cluster_version: current_cluster_version.unwrap_or_default(),
            target_cluster_version: target_cluster_version.unwrap_or_default(),
            upgrade_type: upgrade_type.unwrap_or_default(),
            rolling_upgrade_mode: rolling_upgrade_mode.unwrap_or_default(),
            failure_action: failure_action.unwrap_or_default(),
        })
    }

    fn encode_fields(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        self.event.encode_required(writer)?;
        encode_required_property(writer, "CurrentClusterVersion", &self.current_cluster_version)?;
        encode_required_property(writer, "TargetClusterVersion", &self.target_cluster_version)?;
        encode_required_property(writer, "UpgradeType", &self.upgrade_type)?;
        encode_required_property(writer, "RollingUpgradeMode", &self.rolling_upgrade_mode)?;
        encode_required_property(writer, "FailureAction", &self.failure_action)?;
        self.event.encode_optional(writer)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClusterUpgradeCompletedEvent {
    pub event: EventFields,
    pub target_cluster_version: String,
    pub overall_upgrade_elapsed_time_in_ms: f64,
}

#[derive(Clone, Copy)]
enum UpgradeCompletedField {
    TargetClusterVersion,
    OverallUpgradeElapsedTimeInMs,
}

const UPGRADE_COMPLETED_FIELDS: FieldTable<UpgradeCompletedField> = FieldTable::new(
    EVENT_MATCH,
    &[
        field("TargetClusterVersion", UpgradeCompletedField::TargetClusterVersion),
        field(
            "OverallUpgradeElapsedTimeInMs",
            UpgradeCompletedField::OverallUpgradeElapsedTimeInMs,
        ),
    ],
);

impl ClusterUpgradeCompletedEvent {
    fn decode_fields(reader: &mut JsonReader) -> Result<Self, Error> {
        let mut event = EventFieldsBuilder::default();
        let mut target_cluster_version = None;
        let mut elapsed = None;
        decode_properties(reader, |name, reader| {
            match UPGRADE_COMPLETED_FIELDS.lookup(name) {
                Some(UpgradeCompletedField::TargetClusterVersion) => {
                    target_cluster_version = read_field(reader)?
                }
                Some(UpgradeCompletedField::OverallUpgradeElapsedTimeInMs) => {
                    elapsed = read_field(reader)?
                }
                None => return event.visit(name, reader),
            }
            Ok(Visit::Consumed)
        })?;
        Ok(Self {
            event: event.build(),
            target_cluster_version: target_cluster_version.unwrap_or_default(),
            overall_upgrade_elapsed_time_in_ms: elapsed.unwrap_or_default(),
        })
    }

    fn encode_fields(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        self.event.encode_required(writer)?;
        encode_required_property(writer, "TargetClusterVersion", &self.target_cluster_version)?;
        encode_required_property(
            writer,
            "OverallUpgradeElapsedTimeInMs",
            &self.overall_upgrade_elapsed_time_in_ms,
        )?;
        self.event.encode_optional(writer)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChaosStartedEvent {
    pub event: EventFields,
    pub max_concurrent_faults: i64,
    pub time_to_run_in_seconds: f64,
    pub max_cluster_stabilization_timeout_in_seconds: f64,
    pub wait_time_between_iterations_in_seconds: f64,
    pub wait_time_between_faults_in_seconds: f64,
    pub move_replica_fault_enabled: bool,
    pub included_node_type_list: String,
    pub included_application_list: String,
    pub cluster_health_policy: String,
    pub chaos_context: String,
}

#[derive(Clone, Copy)]
enum ChaosStartedField {
    MaxConcurrentFaults,
    TimeToRunInSeconds,
    MaxClusterStabilizationTimeoutInSeconds,
    WaitTimeBetweenIterationsInSeconds,
    WaitTimeBetweenFaultsInSeconds,
    MoveReplicaFaultEnabled,
    IncludedNodeTypeList,
    IncludedApplicationList,
    ClusterHealthPolicy,
    ChaosContext,
}

const CHAOS_STARTED_FIELDS: FieldTable<ChaosStartedField> = FieldTable::new(
    EVENT_MATCH,
    &[
        field("MaxConcurrentFaults", ChaosStartedField::MaxConcurrentFaults),
        field("TimeToRunInSeconds", ChaosStartedField::TimeToRunInSeconds),
        field(
            "MaxClusterStabilizationTimeoutInSeconds",
            ChaosStartedField::MaxClusterStabilizationTimeoutInSeconds,
        ),
        field(
            "WaitTimeBetweenIterationsInSeconds",
            ChaosStartedField::WaitTimeBetweenIterationsInSeconds,
        ),
        // Misspelled on the wire.
        field(
            "WaitTimeBetweenFautlsInSeconds",
            ChaosStartedField::WaitTimeBetweenFaultsInSeconds,
        ),
        field("MoveReplicaFaultEnabled", ChaosStartedField::MoveReplicaFaultEnabled),
        field("IncludedNodeTypeList", ChaosStartedField::IncludedNodeTypeList),
        field("IncludedApplicationList", ChaosStartedField::IncludedApplicationList),
        field("ClusterHealthPolicy", ChaosStartedField::ClusterHealthPolicy),
        field("ChaosContext", ChaosStartedField::ChaosContext),
    ],
);

impl ChaosStartedEvent {
    fn decode_fields(reader: &mut JsonReader) -> Result<Self, Error> {
        let mut event = EventFieldsBuilder::default();
        let mut max_concurrent_faults = None;
        let mut time_to_run = None;
        let mut stabilization_timeout = None;
        let mut between_iterations = None;
        let mut between_faults = None;
        let mut move_replica_fault_enabled = None;
        let mut included_node_type_list = None;
        let mut included_application_list = None;
        let mut cluster_health_policy = None;
        let mut chaos_context = None;
        decode_properties(reader, |name, reader| {
            match CHAOS_STARTED_FIELDS.lookup(name) {
                Some(ChaosStartedField::MaxConcurrentFaults) => {
                    max_concurrent_faults = read_field(reader)?
                }
                Some(ChaosStartedField::TimeToRunInSeconds) => time_to_run = read_field(reader)?,
                Some(ChaosStartedField::MaxClusterStabilizationTimeoutInSeconds) => {
                    stabilization_timeout = read_field(reader)?
                }
                Some(ChaosStartedField::WaitTimeBetweenIterationsInSeconds) => {
                    between_iterations = read_field(reader)?
                }
                Some(ChaosStartedField::WaitTimeBetweenFaultsInSeconds) => {
                    between_faults = read_field(reader)?
                }
                Some(ChaosStartedField::MoveReplicaFaultEnabled) => {
                    move_replica_fault_enabled = read_field(reader)?
                }
                Some(ChaosStartedField::IncludedNodeTypeList) => {
                    included_node_type_list = read_field(reader)?
                }
                Some(ChaosStartedField::IncludedApplicationList) => {
                    included_application_list = read_field(reader)?
                }
                Some(ChaosStartedField::ClusterHealthPolicy) => {
                    cluster_health_policy = read_field(reader)?
                }
                Some(ChaosStartedField::ChaosContext) => chaos_context = read_field(reader)?,
                None => return event.visit(name, reader),
            }
            Ok(Visit::Consumed)
        })?;
        Ok(Self {
            event: event.build(),
            max_concurrent_faults: max_concurrent_faults.unwrap_or_default(),
            time_to_run_in_seconds: time_to_run.unwrap_or_default(),
            max_cluster_stabilization_timeout_in_seconds: stabilization_timeout
                .unwrap_or_default(),
            wait_time_between_iterations_in_seconds: between_iterations.unwrap_or_default(),
            wait_time_between_faults_in_seconds: between_faults.unwrap_or_default(),
            move_replica_fault_enabled: move_replica_fault_enabled.unwrap_or_default(),
            included_node_type_list: included_node_type_list.unwrap_or_default(),
            included_application_list: included_application_list.unwrap_or_default(),
            cluster_health_policy: cluster_health_policy.unwrap_or_default(),
            chaos_context: chaos_context.unwrap_or_default(),
        })
    }

    fn encode_fields(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        self.event.encode_required(writer)?;
        encode_required_property(writer, "MaxConcurrentFaults", &self.max_concurrent_faults)?;
        encode_required_property(writer, "TimeToRunInSeconds", &self.time_to_run_in_seconds)?;
        encode_required_property(
            writer,
            "MaxClusterStabilizationTimeoutInSeconds",
            &self.max_cluster_stabilization_timeout_in_seconds,
        )?;
        encode_required_property(
            writer,
            "WaitTimeBetweenIterationsInSeconds",
            &self.wait_time_between_iterations_in_seconds,
        )?;
        encode_required_property(
            writer,
            "WaitTimeBetweenFautlsInSeconds",
            &self.wait_time_between_faults_in_seconds,
        )?;
        encode_required_property(
            writer,
            "MoveReplicaFaultEnabled",
            &self.move_replica_fault_enabled,
        )?;
        encode_required_property(writer, "IncludedNodeTypeList", &self.included_node_type_list)?;
        encode_required_property(
            writer,
            "IncludedApplicationList",
            &self.included_application_list,
        )?;
        encode_required_property(writer, "ClusterHealthPolicy", &self.cluster_health_policy)?;
        encode_required_property(writer, "ChaosContext", &self.chaos_context)?;
        self.event.encode_optional(writer)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChaosStoppedEvent {
    pub event: EventFields,
    pub reason: String,
}

impl ChaosStoppedEvent {
    fn decode_fields(reader: &mut JsonReader) -> Result<Self, Error> {
        let mut event = EventFieldsBuilder::default();
        let mut reason = None;
        decode_properties(reader, |name, reader| {
            if EVENT_MATCH.matches(name, "Reason") {
                reason = read_field(reader)?;
                return Ok(Visit::Consumed);
            }
            event.visit(name, reader)
        })?;
        Ok(Self {
            event: event.build(),
            reason: reason.unwrap_or_default(),
        })
    }

    fn encode_fields(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        self.event.encode_required(writer)?;
        encode_required_property(writer, "Reason", &self.reason)?;
        self.event.encode_optional(writer)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ClusterEventKind {
    ClusterEvent,
    ClusterNewHealthReport,
    ClusterUpgradeStarted,
    ClusterUpgradeCompleted,
    ChaosStarted,
    ChaosStopped,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ClusterEvent {
    /// Tagged with the family's own name; carries only the shared fields.
    Cluster(EventFields),
    NewHealthReport(ClusterNewHealthReportEvent),
    UpgradeStarted(ClusterUpgradeStartedEvent),
    UpgradeCompleted(ClusterUpgradeCompletedEvent),
    ChaosStarted(ChaosStartedEvent),
    ChaosStopped(ChaosStoppedEvent),
}

impl ClusterEvent {
    pub fn event(&self) -> &EventFields {
        match self {
            ClusterEvent::Cluster(event) => event,
            ClusterEvent::NewHealthReport(variant) => &variant.event,
            ClusterEvent::UpgradeStarted(variant) => &variant.event,
            ClusterEvent::UpgradeCompleted(variant) => &variant.event,
            ClusterEvent::ChaosStarted(variant) => &variant.event,
            ClusterEvent::ChaosStopped(variant) => &variant.event,
        }
    }
}

impl Polymorphic for ClusterEvent {
    type Kind = ClusterEventKind;

    const FAMILY: Discriminated<ClusterEventKind> = Discriminated {
        family: "ClusterEvent",
        property: "Kind",
        property_match: EVENT_MATCH,
        value_match: MatchMode::Ordinal,
        variants: &[
            ("ClusterNewHealthReport", ClusterEventKind::ClusterNewHealthReport),
            ("ClusterUpgradeStarted", ClusterEventKind::ClusterUpgradeStarted),
            ("ClusterUpgradeCompleted", ClusterEventKind::ClusterUpgradeCompleted),
            ("ChaosStarted", ClusterEventKind::ChaosStarted),
            ("ChaosStopped", ClusterEventKind::ChaosStopped),
        ],
        base: Some(("ClusterEvent", ClusterEventKind::ClusterEvent)),
    };

    fn kind(&self) -> ClusterEventKind {
        match self {
            ClusterEvent::Cluster(_) => ClusterEventKind::ClusterEvent,
            ClusterEvent::NewHealthReport(_) => ClusterEventKind::ClusterNewHealthReport,
            ClusterEvent::UpgradeStarted(_) => ClusterEventKind::ClusterUpgradeStarted,
            ClusterEvent::UpgradeCompleted(_) => ClusterEventKind::ClusterUpgradeCompleted,
            ClusterEvent::ChaosStarted(_) => ClusterEventKind::ChaosStarted,
            ClusterEvent::ChaosStopped(_) => ClusterEventKind::ChaosStopped,
        }
    }

    fn decode_variant(kind: ClusterEventKind, reader: &mut JsonReader) -> Result<Self, Error> {
        Ok(match kind {
            ClusterEventKind::ClusterEvent => {
                let mut event = EventFieldsBuilder::default();
                decode_properties(reader, |name, reader| event.visit(name, reader))?;
                ClusterEvent::Cluster(event.build())
            }
            ClusterEventKind::ClusterNewHealthReport => {
                ClusterEvent::NewHealthReport(ClusterNewHealthReportEvent::decode_fields(reader)?)
            }
            ClusterEventKind::ClusterUpgradeStarted => {
                ClusterEvent::UpgradeStarted(ClusterUpgradeStartedEvent::decode_fields(reader)?)
            }
            ClusterEventKind::ClusterUpgradeCompleted => {
                ClusterEvent::UpgradeCompleted(ClusterUpgradeCompletedEvent::decode_fields(reader)?)
            }
            ClusterEventKind::ChaosStarted => {
                ClusterEvent::ChaosStarted(ChaosStartedEvent::decode_fields(reader)?)
            }
            ClusterEventKind::ChaosStopped => {
                ClusterEvent::ChaosStopped(ChaosStoppedEvent::decode_fields(reader)?)
            }
        })
    }

    fn encode_variant(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        match self {
            ClusterEvent::Cluster(event) => {
                event.encode_required(writer)?;
                event.encode_optional(writer)
            }
            ClusterEvent::NewHealthReport(variant) => variant.encode_fields(writer),
            ClusterEvent::UpgradeStarted(variant) => variant.encode_fields(writer),
            ClusterEvent::UpgradeCompleted(variant) => variant.encode_fields(writer),
            ClusterEvent::ChaosStarted(variant) => variant.encode_fields(writer),
            ClusterEvent::ChaosStopped(variant) => variant.encode_fields(writer),
        }
    }
}

impl JsonCodec for ClusterEvent {
    fn decode(reader: &mut JsonReader) -> Result<Self, Error> {
        decode_polymorphic(reader)
    }

    fn encode(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        encode_polymorphic(self, writer)
    }
}

// ---------------------------------------------------------------------------
// NodeEvent family
// ---------------------------------------------------------------------------

/// Shared event properties plus the node the event is about.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeEventFields {
    pub event: EventFields,
    pub node_name: String,
}

impl NodeEventFields {
    pub fn new(event: EventFields, node_name: impl Into<String>) -> Self {
        Self {
            event,
            node_name: node_name.into(),
        }
    }

    fn encode_required(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        self.event.encode_required(writer)?;
        encode_required_property(writer, "NodeName", &self.node_name)
    }

    fn encode_optional(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        self.event.encode_optional(writer)
    }
}

#[derive(Default)]
struct NodeEventBuilder {
    event: EventFieldsBuilder,
    node_name: Option<String>,
}

impl NodeEventBuilder {
    fn visit(&mut self, name: &str, reader: &mut JsonReader) -> Result<Visit, Error> {
        if EVENT_MATCH.matches(name, "NodeName") {
            self.node_name = read_field(reader)?;
            return Ok(Visit::Consumed);
        }
        self.event.visit(name, reader)
    }

    fn build(self) -> NodeEventFields {
        NodeEventFields {
            event: self.event.build(),
            node_name: self.node_name.unwrap_or_default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeUpEvent {
    pub node: NodeEventFields,
    pub node_instance: i64,
    pub last_node_down_at: OffsetDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeDownEvent {
    pub node: NodeEventFields,
    pub node_instance: i64,
    pub last_node_up_at: OffsetDateTime,
}

#[derive(Clone, Copy)]
enum NodeTransitionField {
    NodeInstance,
    LastNodeDownAt,
    LastNodeUpAt,
}

const NODE_TRANSITION_FIELDS: FieldTable<NodeTransitionField> = FieldTable::new(
    EVENT_MATCH,
    &[
        field("NodeInstance", NodeTransitionField::NodeInstance),
        field("LastNodeDownAt", NodeTransitionField::LastNodeDownAt),
        field("LastNodeUpAt", NodeTransitionField::LastNodeUpAt),
    ],
);

// NodeUp and NodeDown share a shape: an instance id plus the time of the opposite
// transition. `up` selects which timestamp property belongs to the variant.
fn decode_node_transition(
    reader: &mut JsonReader,
    up: bool,
) -> Result<(NodeEventFields, i64, OffsetDateTime), Error> {
    let mut node = NodeEventBuilder::default();
    let mut node_instance = None;
    let mut last_transition = None;
    decode_properties(reader, |name, reader| {
        match NODE_TRANSITION_FIELDS.lookup(name) {
            Some(NodeTransitionField::NodeInstance) => node_instance = read_field(reader)?,
            Some(NodeTransitionField::LastNodeDownAt) if up => {
                last_transition = read_field(reader)?
            }
            Some(NodeTransitionField::LastNodeUpAt) if !up => {
                last_transition = read_field(reader)?
            }
            Some(_) => return Ok(Visit::Unknown),
            None => return node.visit(name, reader),
        }
        Ok(Visit::Consumed)
    })?;
    Ok((
        node.build(),
        node_instance.unwrap_or_default(),
        last_transition.unwrap_or(DEFAULT_TIMESTAMP),
    ))
}

impl NodeUpEvent {
    fn decode_fields(reader: &mut JsonReader) -> Result<Self, Error> {
        let (node, node_instance, last_node_down_at) = decode_node_transition(reader, true)?;
        Ok(Self {
            node,
            node_instance,
            last_node_down_at,
        })
    }

    fn encode_fields(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        self.node.encode_required(writer)?;
        encode_required_property(writer, "NodeInstance", &self.node_instance)?;
        encode_required_property(writer, "LastNodeDownAt", &self.last_node_down_at)?;
        self.node.encode_optional(writer)
    }
}

impl NodeDownEvent {
    fn decode_fields(reader: &mut JsonReader) -> Result<Self, Error> {
        let (node, node_instance, last_node_up_at) = decode_node_transition(reader, false)?;
        Ok(Self {
            node,
            node_instance,
            last_node_up_at,
        })
    }

    fn encode_fields(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        self.node.encode_required(writer)?;
        encode_required_property(writer, "NodeInstance", &self.node_instance)?;
        encode_required_property(writer, "LastNodeUpAt", &self.last_node_up_at)?;
        self.node.encode_optional(writer)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeAddedEvent {
    pub node: NodeEventFields,
    pub node_id: String,
    pub node_instance: i64,
    pub node_type: String,
    pub fabric_version: String,
    pub ip_address_or_fqdn: String,
    pub node_capacities: String,
}

#[derive(Clone, Copy)]
enum NodeAddedField {
    NodeId,
    NodeInstance,
    NodeType,
    FabricVersion,
    IpAddressOrFqdn,
    NodeCapacities,
}

const NODE_ADDED_FIELDS: FieldTable<NodeAddedField> = FieldTable::new(
    EVENT_MATCH,
    &[
        field("NodeId", NodeAddedField::NodeId),
        field("NodeInstance", NodeAddedField::NodeInstance),
        field("NodeType", NodeAddedField::NodeType),
        field("FabricVersion", NodeAddedField::FabricVersion),
        field("IpAddressOrFQDN", NodeAddedField::IpAddressOrFqdn),
        field("NodeCapacities", NodeAddedField::NodeCapacities),
    ],
);

impl NodeAddedEvent {
    fn decode_fields(reader: &mut JsonReader) -> Result<Self, Error> {
        let mut node = NodeEventBuilder::default();
        let mut node_id = None;
        let mut node_instance = None;
        let mut node_type = None;
        let mut fabric_version = None;
        let mut ip_address_or_fqdn = None;
        let mut node_capacities = None;
        decode_properties(reader, |name, reader| {
            match NODE_ADDED_FIELDS.lookup(name) {
                Some(NodeAddedField::NodeId) => node_id = read_field(reader)?,
                Some(NodeAddedField::NodeInstance) => node_instance = read_field(reader)?,
                Some(NodeAddedField::NodeType) => node_type = read_field(reader)?,
                Some(NodeAddedField::FabricVersion) => fabric_version = read_field(reader)?,
                Some(NodeAddedField::IpAddressOrFqdn) => ip_address_or_fqdn = read_field(reader)?,
                Some(NodeAddedField::NodeCapacities) => node_capacities = read_field(reader)?,
                None => return node.visit(name, reader),
            }
            Ok(Visit::Consumed)
        })?;
        Ok(Self {
            node: node.build(),
            node_id: node_id.unwrap_or_default(),
            node_instance: node_instance.unwrap_or_default(),
            node_type: node_type.unwrap_or_default(),
            fabric_version: fabric_version.unwrap_or_default(),
            ip_address_or_fqdn: ip_address_or_fqdn.unwrap_or_default(),
            node_capacities: node_capacities.unwrap_or_default(),
        })
    }

    fn encode_fields(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        self.node.encode_required(writer)?;
        encode_required_property(writer, "NodeId", &self.node_id)?;
        encode_required_property(writer, "NodeInstance", &self.node_instance)?;
        encode_required_property(writer, "NodeType", &self.node_type)?;
        encode_required_property(writer, "FabricVersion", &self.fabric_version)?;
        encode_required_property(writer, "IpAddressOrFQDN", &self.ip_address_or_fqdn)?;
        encode_required_property(writer, "NodeCapacities", &self.node_capacities)?;
        self.node.encode_optional(writer)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NodeEventKind {
    NodeEvent,
    NodeUp,
    NodeDown,
    NodeAdded,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeEvent {
    Node(NodeEventFields),
    Up(NodeUpEvent),
    Down(NodeDownEvent),
    Added(NodeAddedEvent),
}

impl NodeEvent {
    pub fn node(&self) -> &NodeEventFields {
        match self {
            NodeEvent::Node(node) => node,
            NodeEvent::Up(variant) => &variant.node,
            NodeEvent::Down(variant) => &variant.node,
            NodeEvent::Added(variant) => &variant.node,
        }
    }
}

impl Polymorphic for NodeEvent {
    type Kind = NodeEventKind;

    const FAMILY: Discriminated<NodeEventKind> = Discriminated {
        family: "NodeEvent",
        property: "Kind",
        property_match: EVENT_MATCH,
        value_match: MatchMode::Ordinal,
        variants: &[
            ("NodeUp", NodeEventKind::NodeUp),
            ("NodeDown", NodeEventKind::NodeDown),
            ("NodeAdded", NodeEventKind::NodeAdded),
        ],
        base: Some(("NodeEvent", NodeEventKind::NodeEvent)),
    };

    fn kind(&self) -> NodeEventKind {
        match self {
            NodeEvent::Node(_) => NodeEventKind::NodeEvent,
            NodeEvent::Up(_) => NodeEventKind::NodeUp,
            NodeEvent::Down(_) => NodeEventKind::NodeDown,
            NodeEvent::Added(_) => NodeEventKind::NodeAdded,
        }
    }

    fn decode_variant(kind: NodeEventKind, reader: &mut JsonReader) -> Result<Self, Error> {
        Ok(match kind {
            NodeEventKind::NodeEvent => {
                let mut node = NodeEventBuilder::default();
                decode_properties(reader, |name, reader| node.visit(name, reader))?;
                NodeEvent::Node(node.build())
            }
            NodeEventKind::NodeUp => NodeEvent::Up(NodeUpEvent::decode_fields(reader)?),
            NodeEventKind::NodeDown => NodeEvent::Down(NodeDownEvent::decode_fields(reader)?),
            NodeEventKind::NodeAdded => NodeEvent::Added(NodeAddedEvent::decode_fields(reader)?),
        })
    }

    fn encode_variant(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        match self {
            NodeEvent::Node(node) => {
                node.encode_required(writer)?;
                node.encode_optional(writer)
            }
            NodeEvent::Up(variant) => variant.encode_fields(writer),
            NodeEvent::Down(variant) => variant.encode_fields(writer),
            NodeEvent::Added(variant) => variant.encode_fields(writer),
        }
    }
}

impl JsonCodec for NodeEvent {
    fn decode(reader: &mut JsonReader) -> Result<Self, Error> {
        decode_polymorphic(reader)
    }

    fn encode(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        encode_polymorphic(self, writer)
    }
}
