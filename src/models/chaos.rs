//! Purpose: Chaos test run parameters and the chaos event history segment.
//! Exports: `ChaosParameters`, `ChaosContext`, `ChaosEvent` and its variants,
//!   `ChaosEventWrapper`, `ChaosEventsSegment`.
//! Role: Worked family with case-sensitive names and tags; nested inside plain wrappers.
//! Invariants: Every variant requires `TimeStampUtc`; the remaining fields are optional.
use std::collections::BTreeMap;

use time::OffsetDateTime;

use crate::core::dispatch::{Discriminated, Polymorphic, decode_polymorphic, encode_polymorphic};
use crate::core::error::Error;
use crate::core::primitive::{DEFAULT_TIMESTAMP, JsonCodec};
use crate::core::reader::JsonReader;
use crate::core::structural::{
    FieldTable, MatchMode, Visit, decode_object, decode_properties, encode_map_property,
    encode_optional_property, encode_required_property, field, read_field,
};
use crate::core::writer::JsonWriter;

#[derive(Clone, Copy)]
struct MapField;

const CONTEXT_FIELDS: FieldTable<MapField> =
    FieldTable::new(MatchMode::Ordinal, &[field("Map", MapField)]);

/// Free-form key/value pairs attached to a chaos run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChaosContext {
    pub map: Option<BTreeMap<String, String>>,
}

impl JsonCodec for ChaosContext {
    fn decode(reader: &mut JsonReader) -> Result<Self, Error> {
        let mut context = ChaosContext::default();
        decode_object(reader, |name, reader| {
            if CONTEXT_FIELDS.lookup(name).is_none() {
                return Ok(Visit::Unknown);
            }
            context.map = read_field(reader)?;
            Ok(Visit::Consumed)
        })?;
        Ok(context)
    }

    fn encode(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        writer.start_object()?;
        if let Some(map) = &self.map {
            encode_map_property(writer, "Map", map)?;
        }
        writer.end_object()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChaosParameters {
    pub time_to_run_in_seconds: Option<String>,
    pub max_cluster_stabilization_timeout_in_seconds: Option<i64>,
    pub max_concurrent_faults: Option<i64>,
    pub enable_move_replica_faults: Option<bool>,
    pub wait_time_between_faults_in_seconds: Option<i64>,
    pub wait_time_between_iterations_in_seconds: Option<i64>,
    pub context: Option<ChaosContext>,
}

#[derive(Clone, Copy)]
enum ParametersField {
    TimeToRunInSeconds,
    MaxClusterStabilizationTimeoutInSeconds,
    MaxConcurrentFaults,
    EnableMoveReplicaFaults,
    WaitTimeBetweenFaultsInSeconds,
    WaitTimeBetweenIterationsInSeconds,
    Context,
}

const PARAMETERS_FIELDS: FieldTable<ParametersField> = FieldTable::new(
    MatchMode::Ordinal,
    &[
        field("TimeToRunInSeconds", ParametersField::TimeToRunInSeconds),
        field(
            "MaxClusterStabilizationTimeoutInSeconds",
            ParametersField::MaxClusterStabilizationTimeoutInSeconds,
        ),
        field("MaxConcurrentFaults", ParametersField::MaxConcurrentFaults),
        field("EnableMoveReplicaFaults", ParametersField::EnableMoveReplicaFaults),
        field(
            "WaitTimeBetweenFaultsInSeconds",
            ParametersField::WaitTimeBetweenFaultsInSeconds,
        ),
        field(
            "WaitTimeBetweenIterationsInSeconds",
            ParametersField::WaitTimeBetweenIterationsInSeconds,
        ),
        field("Context", ParametersField::Context),
    ],
);

impl JsonCodec for ChaosParameters {
    fn decode(reader: &mut JsonReader) -> Result<Self, Error> {
        let mut params = ChaosParameters::default();
        decode_object(reader, |name, reader| {
            match PARAMETERS_FIELDS.lookup(name) {
                Some(ParametersField::TimeToRunInSeconds) => {
                    params.time_to_run_in_seconds = read_field(reader)?
                }
                Some(ParametersField::MaxClusterStabilizationTimeoutInSeconds) => {
                    params.max_cluster_stabilization_timeout_in_seconds = read_field(reader)?
                }
                Some(ParametersField::MaxConcurrentFaults) => {
                    params.max_concurrent_faults = read_field(reader)?
                }
                Some(ParametersField::EnableMoveReplicaFaults) => {
                    params.enable_move_replica_faults = read_field(reader)?
                }
                Some(ParametersField::WaitTimeBetweenFaultsInSeconds) => {
                    params.wait_time_between_faults_in_seconds = read_field(reader)?
                }
                Some(ParametersField::WaitTimeBetweenIterationsInSeconds) => {
                    params.wait_time_between_iterations_in_seconds = read_field(reader)?
                }
                Some(ParametersField::Context) => params.context = read_field(reader)?,
                None => return Ok(Visit::Unknown),
            }
            Ok(Visit::Consumed)
        })?;
        Ok(params)
    }

    fn encode(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        writer.start_object()?;
        encode_optional_property(writer, "TimeToRunInSeconds", &self.time_to_run_in_seconds)?;
        encode_optional_property(
            writer,
            "MaxClusterStabilizationTimeoutInSeconds",
            &self.max_cluster_stabilization_timeout_in_seconds,
        )?;
        encode_optional_property(writer, "MaxConcurrentFaults", &self.max_concurrent_faults)?;
        encode_optional_property(
            writer,
            "EnableMoveReplicaFaults",
            &self.enable_move_replica_faults,
        )?;
        encode_optional_property(
            writer,
            "WaitTimeBetweenFaultsInSeconds",
            &self.wait_time_between_faults_in_seconds,
        )?;
        encode_optional_property(
            writer,
            "WaitTimeBetweenIterationsInSeconds",
            &self.wait_time_between_iterations_in_seconds,
        )?;
        encode_optional_property(writer, "Context", &self.context)?;
        writer.end_object()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StartedChaosEvent {
    pub time_stamp_utc: OffsetDateTime,
    pub chaos_parameters: Option<ChaosParameters>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExecutingFaultsChaosEvent {
    pub time_stamp_utc: OffsetDateTime,
    pub faults: Option<Vec<String>>,
}

/// Shape shared by every variant that only explains itself with a reason.
#[derive(Clone, Debug, PartialEq)]
pub struct ChaosReasonEvent {
    pub time_stamp_utc: OffsetDateTime,
    pub reason: Option<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChaosEventKind {
    Started,
    Stopped,
    ExecutingFaults,
    Waiting,
    ValidationFailed,
    TestError,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ChaosEvent {
    Started(StartedChaosEvent),
    Stopped(ChaosReasonEvent),
    ExecutingFaults(ExecutingFaultsChaosEvent),
    Waiting(ChaosReasonEvent),
    ValidationFailed(ChaosReasonEvent),
    TestError(ChaosReasonEvent),
}

impl ChaosEvent {
    pub fn time_stamp_utc(&self) -> OffsetDateTime {
        match self {
            ChaosEvent::Started(event) => event.time_stamp_utc,
            ChaosEvent::ExecutingFaults(event) => event.time_stamp_utc,
            ChaosEvent::Stopped(event)
            | ChaosEvent::Waiting(event)
            | ChaosEvent::ValidationFailed(event)
            | ChaosEvent::TestError(event) => event.time_stamp_utc,
        }
    }
}

#[derive(Clone, Copy)]
enum ChaosEventField {
    TimeStampUtc,
    ChaosParameters,
    Faults,
    Reason,
}

const CHAOS_EVENT_FIELDS: FieldTable<ChaosEventField> = FieldTable::new(
    MatchMode::Ordinal,
    &[
        field("TimeStampUtc", ChaosEventField::TimeStampUtc),
        field("ChaosParameters", ChaosEventField::ChaosParameters),
        field("Faults", ChaosEventField::Faults),
        field("Reason", ChaosEventField::Reason),
    ],
);

impl Polymorphic for ChaosEvent {
    type Kind = ChaosEventKind;

    const FAMILY: Discriminated<ChaosEventKind> = Discriminated {
        family: "ChaosEvent",
        property: "Kind",
        property_match: MatchMode::Ordinal,
        value_match: MatchMode::Ordinal,
        variants: &[
            ("Started", ChaosEventKind::Started),
            ("Stopped", ChaosEventKind::Stopped),
            ("ExecutingFaults", ChaosEventKind::ExecutingFaults),
            ("Waiting", ChaosEventKind::Waiting),
            ("ValidationFailed", ChaosEventKind::ValidationFailed),
            ("TestError", ChaosEventKind::TestError),
        ],
        base: None,
    };

    fn kind(&self) -> ChaosEventKind {
        match self {
            ChaosEvent::Started(_) => ChaosEventKind::Started,
            ChaosEvent::Stopped(_) => ChaosEventKind::Stopped,
            ChaosEvent::ExecutingFaults(_) => ChaosEventKind::ExecutingFaults,
            ChaosEvent::Waiting(_) => ChaosEventKind::Waiting,
            ChaosEvent::ValidationFailed(_) => ChaosEventKind::ValidationFailed,
            ChaosEvent::TestError(_) => ChaosEventKind::TestError,
        }
    }

    fn decode_variant(kind: ChaosEventKind, reader: &mut JsonReader) -> Result<Self, Error> {
        let mut time_stamp_utc = None;
        let mut chaos_parameters = None;
        let mut faults = None;
        let mut reason = None;
        decode_properties(reader, |name, reader| {
            match (CHAOS_EVENT_FIELDS.lookup(name), kind) {
                (Some(ChaosEventField::TimeStampUtc), _) => time_stamp_utc = read_field(reader)?,
                (Some(ChaosEventField::ChaosParameters), ChaosEventKind::Started) => {
                    chaos_parameters = read_field(reader)?
                }
                (Some(ChaosEventField::Faults), ChaosEventKind::ExecutingFaults) => {
                    faults = read_field(reader)?
                }
                (
                    Some(ChaosEventField::Reason),
                    ChaosEventKind::Stopped
                    | ChaosEventKind::Waiting
                    | ChaosEventKind::ValidationFailed
                    | ChaosEventKind::TestError,
                ) => reason = read_field(reader)?,
                _ => return Ok(Visit::Unknown),
            }
            Ok(Visit::Consumed)
        })?;
        let time_stamp_utc = time_stamp_utc.unwrap_or(DEFAULT_TIMESTAMP);
        let because = ChaosReasonEvent {
            time_stamp_utc,
            reason,
        };
        Ok(match kind {
            ChaosEventKind::Started => ChaosEvent::Started(StartedChaosEvent {
                time_stamp_utc,
                chaos_parameters,
            }),
            ChaosEventKind::ExecutingFaults => {
                ChaosEvent::ExecutingFaults(ExecutingFaultsChaosEvent {
                    time_stamp_utc,
                    faults,
                })
            }
            ChaosEventKind::Stopped => ChaosEvent::Stopped(because),
            ChaosEventKind::Waiting => ChaosEvent::Waiting(because),
            ChaosEventKind::ValidationFailed => ChaosEvent::ValidationFailed(because),
            ChaosEventKind::TestError => ChaosEvent::TestError(because),
        })
    }

    fn encode_variant(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        encode_required_property(writer, "TimeStampUtc", &self.time_stamp_utc())?;
        match self {
            ChaosEvent::Started(event) => {
                encode_optional_property(writer, "ChaosParameters", &event.chaos_parameters)
            }
            ChaosEvent::ExecutingFaults(event) => {
                encode_optional_property(writer, "Faults", &event.faults)
            }
            ChaosEvent::Stopped(event)
            | ChaosEvent::Waiting(event)
            | ChaosEvent::ValidationFailed(event)
            | ChaosEvent::TestError(event) => {
                encode_optional_property(writer, "Reason", &event.reason)
            }
        }
    }
}

impl JsonCodec for ChaosEvent {
    fn decode(reader: &mut JsonReader) -> Result<Self, Error> {
        decode_polymorphic(reader)
    }

    fn encode(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        encode_polymorphic(self, writer)
    }
}

#[derive(Clone, Copy)]
struct ChaosEventWrapperField;

const WRAPPER_FIELDS: FieldTable<ChaosEventWrapperField> =
    FieldTable::new(MatchMode::Ordinal, &[field("ChaosEvent", ChaosEventWrapperField)]);

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChaosEventWrapper {
    pub chaos_event: Option<ChaosEvent>,
}

impl JsonCodec for ChaosEventWrapper {
    fn decode(reader: &mut JsonReader) -> Result<Self, Error> {
        let mut wrapper = ChaosEventWrapper::default();
        decode_object(reader, |name, reader| {
            if WRAPPER_FIELDS.lookup(name).is_none() {
                return Ok(Visit::Unknown);
            }
            wrapper.chaos_event = read_field(reader)?;
            Ok(Visit::Consumed)
        })?;
        Ok(wrapper)
    }

    fn encode(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        writer.start_object()?;
        encode_optional_property(writer, "ChaosEvent", &self.chaos_event)?;
        writer.end_object()
    }
}

#[derive(Clone, Copy)]
enum SegmentField {
    ContinuationToken,
    History,
}

const SEGMENT_FIELDS: FieldTable<SegmentField> = FieldTable::new(
    MatchMode::Ordinal,
    &[
        field("ContinuationToken", SegmentField::ContinuationToken),
        field("History", SegmentField::History),
    ],
);

/// One page of chaos history.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChaosEventsSegment {
    pub continuation_token: Option<String>,
    pub history: Option<Vec<ChaosEventWrapper>>,
}

impl JsonCodec for ChaosEventsSegment {
    fn decode(reader: &mut JsonReader) -> Result<Self, Error> {
        let mut segment = ChaosEventsSegment::default();
        decode_object(reader, |name, reader| {
            match SEGMENT_FIELDS.lookup(name) {
                Some(SegmentField::ContinuationToken) => {
                    segment.continuation_token = read_field(reader)?
                }
                Some(SegmentField::History) => segment.history = read_field(reader)?,
                None => return Ok(Visit::Unknown),
            }
            Ok(Visit::Consumed)
        })?;
        Ok(segment)
    }

    fn encode(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        writer.start_object()?;
        encode_optional_property(writer, "ContinuationToken", &self.continuation_token)?;
        encode_optional_property(writer, "History", &self.history)?;
        writer.end_object()
    }
}

#[cfg(test)]
mod tests {
    use super::{ChaosContext, ChaosEvent, ChaosEventWrapper, ChaosEventsSegment, ChaosParameters};
    use crate::core::error::ErrorKind;
    use crate::core::primitive::JsonCodec;
    use crate::core::reader::JsonReader;
    use crate::core::writer::JsonWriter;
    use time::macros::datetime;

    fn decode<T: JsonCodec>(input: &str) -> Result<T, crate::core::error::Error> {
        T::decode(&mut JsonReader::from_str(input).expect("parse"))
    }

    #[test]
    fn segment_decodes_nested_events() {
        let segment: ChaosEventsSegment = decode(
            r#"{"ContinuationToken":"next","History":[
                {"ChaosEvent":{"Kind":"Started","TimeStampUtc":"2024-05-01T10:00:00Z",
                    "ChaosParameters":{"MaxConcurrentFaults":2,"Context":{"Map":{"team":"infra"}}}}},
                {"ChaosEvent":{"Kind":"ExecutingFaults","TimeStampUtc":"2024-05-01T10:01:00Z",
                    "Faults":["RestartNode"]}},
                {"ChaosEvent":{"Kind":"Stopped","TimeStampUtc":"2024-05-01T11:00:00Z"}}
            ]}"#,
        )
        .expect("decode");
        let history = segment.history.expect("history");
        assert_eq!(history.len(), 3);

        let Some(ChaosEvent::Started(started)) = &history[0].chaos_event else {
            panic!("expected Started");
        };
        let params = started.chaos_parameters.as_ref().expect("parameters");
        assert_eq!(params.max_concurrent_faults, Some(2));
        let map = params.context.as_ref().and_then(|c| c.map.as_ref()).expect("map");
        assert_eq!(map["team"], "infra");

        let Some(ChaosEvent::Stopped(stopped)) = &history[2].chaos_event else {
            panic!("expected Stopped");
        };
        assert_eq!(stopped.time_stamp_utc, datetime!(2024-05-01 11:00:00 UTC));
        assert_eq!(stopped.reason, None);
    }

    #[test]
    fn tags_and_names_are_case_sensitive() {
        let err = decode::<ChaosEvent>(r#"{"Kind":"stopped"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownDiscriminator);

        let err = decode::<ChaosEvent>(r#"{"kind":"Stopped"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedDiscriminatorPosition);
    }

    #[test]
    fn reason_is_ignored_on_variants_without_one() {
        let event: ChaosEvent = decode(
            r#"{"Kind":"ExecutingFaults","TimeStampUtc":"2024-05-01T10:01:00Z","Reason":"x"}"#,
        )
        .expect("decode");
        let mut writer = JsonWriter::new();
        event.encode(&mut writer).expect("encode");
        assert_eq!(
            writer.into_string().unwrap(),
            r#"{"Kind":"ExecutingFaults","TimeStampUtc":"2024-05-01T10:01:00Z"}"#
        );
    }

    #[test]
    fn empty_parameters_encode_as_empty_object() {
        let mut writer = JsonWriter::new();
        ChaosParameters::default().encode(&mut writer).expect("encode");
        assert_eq!(writer.into_string().unwrap(), "{}");
    }

    #[test]
    fn wrapper_names_match_exact_case_only() {
        let segment: ChaosEventsSegment = decode(
            r#"{"continuationToken":"next","History":[{"chaosEvent":{"Kind":"Bogus"}}]}"#,
        )
        .expect("decode");
        assert_eq!(segment.continuation_token, None);
        assert_eq!(
            segment.history,
            Some(vec![ChaosEventWrapper { chaos_event: None }])
        );

        let context: ChaosContext = decode(r#"{"map":{"team":"infra"}}"#).expect("decode");
        assert_eq!(context.map, None);
    }
}
