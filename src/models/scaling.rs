//! Purpose: Auto-scaling policy for mesh services: metric, trigger, and mechanism families.
//! Exports: `AutoScalingMetric`, `AutoScalingTrigger`, `AutoScalingMechanism`,
//!   `AutoScalingPolicy` and their variant structs.
//! Role: Worked families with camel-case wire names and a lower-case `kind` discriminator.
//! Invariants: Every field here is required and always written, in declared order.
//! Notes: A missing nested family decodes to the family's `Default` variant.
use crate::core::dispatch::{Discriminated, Polymorphic, decode_polymorphic, encode_polymorphic};
use crate::core::error::Error;
use crate::core::primitive::JsonCodec;
use crate::core::reader::JsonReader;
use crate::core::structural::{
    FieldTable, MatchMode, Visit, decode_object, decode_properties, encode_required_property,
    field, read_field,
};
use crate::core::writer::JsonWriter;
use crate::models::enums::AutoScalingResourceMetricName;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AutoScalingMetricKind {
    Resource,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AutoScalingMetric {
    Resource { name: AutoScalingResourceMetricName },
}

impl Default for AutoScalingMetric {
    fn default() -> Self {
        AutoScalingMetric::Resource {
            name: AutoScalingResourceMetricName::default(),
        }
    }
}

#[derive(Clone, Copy)]
struct MetricNameField;

const RESOURCE_METRIC_FIELDS: FieldTable<MetricNameField> =
    FieldTable::new(MatchMode::Ordinal, &[field("name", MetricNameField)]);

impl Polymorphic for AutoScalingMetric {
    type Kind = AutoScalingMetricKind;

    const FAMILY: Discriminated<AutoScalingMetricKind> = Discriminated {
        family: "AutoScalingMetric",
        property: "kind",
        property_match: MatchMode::Ordinal,
        value_match: MatchMode::Ordinal,
        variants: &[("Resource", AutoScalingMetricKind::Resource)],
        base: None,
    };

    fn kind(&self) -> AutoScalingMetricKind {
        match self {
            AutoScalingMetric::Resource { .. } => AutoScalingMetricKind::Resource,
        }
    }

    fn decode_variant(kind: AutoScalingMetricKind, reader: &mut JsonReader) -> Result<Self, Error> {
        match kind {
            AutoScalingMetricKind::Resource => {
                let mut name = None;
                decode_properties(reader, |wire, reader| {
                    if RESOURCE_METRIC_FIELDS.lookup(wire).is_none() {
                        return Ok(Visit::Unknown);
                    }
                    name = read_field(reader)?;
                    Ok(Visit::Consumed)
                })?;
                Ok(AutoScalingMetric::Resource {
                    name: name.unwrap_or_default(),
                })
            }
        }
    }

    fn encode_variant(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        match self {
            AutoScalingMetric::Resource { name } => encode_required_property(writer, "name", name),
        }
    }
}

impl JsonCodec for AutoScalingMetric {
    fn decode(reader: &mut JsonReader) -> Result<Self, Error> {
        decode_polymorphic(reader)
    }

    fn encode(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        encode_polymorphic(self, writer)
    }
}

/// Scales when the average load of `metric` leaves the threshold band.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AverageLoadScalingTrigger {
    pub metric: AutoScalingMetric,
    pub lower_load_threshold: f64,
    pub upper_load_threshold: f64,
    pub scale_interval_in_seconds: i32,
}

#[derive(Clone, Copy)]
enum AverageLoadField {
    Metric,
    LowerLoadThreshold,
    UpperLoadThreshold,
    ScaleIntervalInSeconds,
}

const AVERAGE_LOAD_FIELDS: FieldTable<AverageLoadField> = FieldTable::new(
    MatchMode::Ordinal,
    &[
        field("metric", AverageLoadField::Metric),
        field("lowerLoadThreshold", AverageLoadField::LowerLoadThreshold),
        field("upperLoadThreshold", AverageLoadField::UpperLoadThreshold),
        field("scaleIntervalInSeconds", AverageLoadField::ScaleIntervalInSeconds),
    ],
);

impl AverageLoadScalingTrigger {
    fn decode_fields(reader: &mut JsonReader) -> Result<Self, Error> {
        let mut metric = None;
        let mut lower_load_threshold = None;
        let mut upper_load_threshold = None;
        let mut scale_interval_in_seconds = None;
        decode_properties(reader, |name, reader| {
            match AVERAGE_LOAD_FIELDS.lookup(name) {
                Some(AverageLoadField::Metric) => metric = read_field(reader)?,
                Some(AverageLoadField::LowerLoadThreshold) => {
                    lower_load_threshold = read_field(reader)?
                }
                Some(AverageLoadField::UpperLoadThreshold) => {
                    upper_load_threshold = read_field(reader)?
                }
                Some(AverageLoadField::ScaleIntervalInSeconds) => {
                    scale_interval_in_seconds = read_field(reader)?
                }
                None => return Ok(Visit::Unknown),
            }
            Ok(Visit::Consumed)
        })?;
        Ok(Self {
            metric: metric.unwrap_or_default(),
            lower_load_threshold: lower_load_threshold.unwrap_or_default(),
            upper_load_threshold: upper_load_threshold.unwrap_or_default(),
            scale_interval_in_seconds: scale_interval_in_seconds.unwrap_or_default(),
        })
    }

    fn encode_fields(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        encode_required_property(writer, "metric", &self.metric)?;
        encode_required_property(writer, "lowerLoadThreshold", &self.lower_load_threshold)?;
        encode_required_property(writer, "upperLoadThreshold", &self.upper_load_threshold)?;
        encode_required_property(
            writer,
            "scaleIntervalInSeconds",
            &self.scale_interval_in_seconds,
        )
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AutoScalingTriggerKind {
    AverageLoad,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AutoScalingTrigger {
    AverageLoad(AverageLoadScalingTrigger),
}

impl Default for AutoScalingTrigger {
    fn default() -> Self {
        AutoScalingTrigger::AverageLoad(AverageLoadScalingTrigger::default())
    }
}

impl Polymorphic for AutoScalingTrigger {
    type Kind = AutoScalingTriggerKind;

    const FAMILY: Discriminated<AutoScalingTriggerKind> = Discriminated {
        family: "AutoScalingTrigger",
        property: "kind",
        property_match: MatchMode::Ordinal,
        value_match: MatchMode::Ordinal,
        variants: &[("AverageLoad", AutoScalingTriggerKind::AverageLoad)],
        base: None,
    };

    fn kind(&self) -> AutoScalingTriggerKind {
        match self {
            AutoScalingTrigger::AverageLoad(_) => AutoScalingTriggerKind::AverageLoad,
        }
    }

    fn decode_variant(
        kind: AutoScalingTriggerKind,
        reader: &mut JsonReader,
    ) -> Result<Self, Error> {
        match kind {
            AutoScalingTriggerKind::AverageLoad => Ok(AutoScalingTrigger::AverageLoad(
                AverageLoadScalingTrigger::decode_fields(reader)?,
            )),
        }
    }

    fn encode_variant(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        match self {
            AutoScalingTrigger::AverageLoad(trigger) => trigger.encode_fields(writer),
        }
    }
}

impl JsonCodec for AutoScalingTrigger {
    fn decode(reader: &mut JsonReader) -> Result<Self, Error> {
        decode_polymorphic(reader)
    }

    fn encode(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        encode_polymorphic(self, writer)
    }
}

/// Adds or removes replicas of a stateless service within `[min_count, max_count]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AddRemoveReplicaScalingMechanism {
    pub min_count: i32,
    pub max_count: i32,
    pub scale_increment: i32,
}

#[derive(Clone, Copy)]
enum AddRemoveReplicaField {
    MinCount,
    MaxCount,
    ScaleIncrement,
}

const ADD_REMOVE_REPLICA_FIELDS: FieldTable<AddRemoveReplicaField> = FieldTable::new(
    MatchMode::Ordinal,
    &[
        field("minCount", AddRemoveReplicaField::MinCount),
        field("maxCount", AddRemoveReplicaField::MaxCount),
        field("scaleIncrement", AddRemoveReplicaField::ScaleIncrement),
    ],
);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AutoScalingMechanismKind {
    AddRemoveReplica,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AutoScalingMechanism {
    AddRemoveReplica(AddRemoveReplicaScalingMechanism),
}

impl Default for AutoScalingMechanism {
    fn default() -> Self {
        AutoScalingMechanism::AddRemoveReplica(AddRemoveReplicaScalingMechanism::default())
    }
}

impl Polymorphic for AutoScalingMechanism {
    type Kind = AutoScalingMechanismKind;

    const FAMILY: Discriminated<AutoScalingMechanismKind> = Discriminated {
        family: "AutoScalingMechanism",
        property: "kind",
        property_match: MatchMode::Ordinal,
        value_match: MatchMode::Ordinal,
        variants: &[("AddRemoveReplica", AutoScalingMechanismKind::AddRemoveReplica)],
        base: None,
    };

    fn kind(&self) -> AutoScalingMechanismKind {
        match self {
            AutoScalingMechanism::AddRemoveReplica(_) => AutoScalingMechanismKind::AddRemoveReplica,
        }
    }

    fn decode_variant(
        kind: AutoScalingMechanismKind,
        reader: &mut JsonReader,
    ) -> Result<Self, Error> {
        match kind {
            AutoScalingMechanismKind::AddRemoveReplica => {
                let mut mechanism = AddRemoveReplicaScalingMechanism::default();
                decode_properties(reader, |name, reader| {
                    let slot = match ADD_REMOVE_REPLICA_FIELDS.lookup(name) {
                        Some(AddRemoveReplicaField::MinCount) => &mut mechanism.min_count,
                        Some(AddRemoveReplicaField::MaxCount) => &mut mechanism.max_count,
                        Some(AddRemoveReplicaField::ScaleIncrement) => {
                            &mut mechanism.scale_increment
                        }
                        None => return Ok(Visit::Unknown),
                    };
                    *slot = read_field(reader)?.unwrap_or_default();
                    Ok(Visit::Consumed)
                })?;
                Ok(AutoScalingMechanism::AddRemoveReplica(mechanism))
            }
        }
    }

    fn encode_variant(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        match self {
            AutoScalingMechanism::AddRemoveReplica(mechanism) => {
                encode_required_property(writer, "minCount", &mechanism.min_count)?;
                encode_required_property(writer, "maxCount", &mechanism.max_count)?;
                encode_required_property(writer, "scaleIncrement", &mechanism.scale_increment)
            }
        }
    }
}

impl JsonCodec for AutoScalingMechanism {
    fn decode(reader: &mut JsonReader) -> Result<Self, Error> {
        decode_polymorphic(reader)
    }

    fn encode(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        encode_polymorphic(self, writer)
    }
}

#[derive(Clone, Copy)]
enum PolicyField {
    Name,
    Trigger,
    Mechanism,
}

const POLICY_FIELDS: FieldTable<PolicyField> = FieldTable::new(
    MatchMode::Ordinal,
    &[
        field("name", PolicyField::Name),
        field("trigger", PolicyField::Trigger),
        field("mechanism", PolicyField::Mechanism),
    ],
);

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AutoScalingPolicy {
    pub name: String,
    pub trigger: AutoScalingTrigger,
    pub mechanism: AutoScalingMechanism,
}

impl JsonCodec for AutoScalingPolicy {
    fn decode(reader: &mut JsonReader) -> Result<Self, Error> {
        let mut name = None;
        let mut trigger = None;
        let mut mechanism = None;
        decode_object(reader, |wire, reader| {
            match POLICY_FIELDS.lookup(wire) {
                Some(PolicyField::Name) => name = read_field(reader)?,
                Some(PolicyField::Trigger) => trigger = read_field(reader)?,
                Some(PolicyField::Mechanism) => mechanism = read_field(reader)?,
                None => return Ok(Visit::Unknown),
            }
            Ok(Visit::Consumed)
        })?;
        Ok(Self {
            name: name.unwrap_or_default(),
            trigger: trigger.unwrap_or_default(),
            mechanism: mechanism.unwrap_or_default(),
        })
    }

    fn encode(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        writer.start_object()?;
        encode_required_property(writer, "name", &self.name)?;
        encode_required_property(writer, "trigger", &self.trigger)?;
        encode_required_property(writer, "mechanism", &self.mechanism)?;
        writer.end_object()
    }
}
