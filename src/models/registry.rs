//! Purpose: Name-indexed table of every decodable DTO for tooling that works by type name.
//! Exports: `Registration`, `registrations`, `lookup`.
//! Role: Lets the CLI transcode a payload without naming Rust types at compile time.
//! Invariants: Entries are static; lookup ignores ASCII case and returns the first match.
use crate::core::dispatch::Polymorphic;
use crate::core::error::Error;
use crate::core::primitive::JsonCodec;
use crate::core::reader::JsonReader;
use crate::core::structural::decode_array;
use crate::core::writer::JsonWriter;
use crate::models::backup::{
    BackupPolicyDescription, BackupScheduleDescription, BackupStorageDescription,
    PagedBackupPolicyDescriptionList, RetentionPolicyDescription,
};
use crate::models::chaos::{
    ChaosContext, ChaosEvent, ChaosEventWrapper, ChaosEventsSegment, ChaosParameters,
};
use crate::models::enums::{HealthState, ResourceStatus};
use crate::models::events::{ClusterEvent, NodeEvent};
use crate::models::placement::ServicePlacementPolicyDescription;
use crate::models::property::{PropertyDescription, PropertyValue};
use crate::models::scaling::{
    AutoScalingMechanism, AutoScalingMetric, AutoScalingPolicy, AutoScalingTrigger,
};
use crate::models::secret::SecretResourceProperties;

type Transcode = fn(&mut JsonReader, &mut JsonWriter) -> Result<(), Error>;

pub struct Registration {
    pub name: &'static str,
    /// Discriminator property; `None` for plain DTOs.
    pub discriminator: Option<&'static str>,
    tags: fn() -> Vec<&'static str>,
    transcode: Transcode,
}

impl Registration {
    const fn family<T: Polymorphic + JsonCodec>(name: &'static str) -> Self {
        Self {
            name,
            discriminator: Some(T::FAMILY.property),
            tags: family_tags::<T>,
            transcode: transcode_one::<T>,
        }
    }

    const fn plain<T: JsonCodec>(name: &'static str) -> Self {
        Self {
            name,
            discriminator: None,
            tags: Vec::new,
            transcode: transcode_one::<T>,
        }
    }

    /// Declared discriminator tags in table order.
    pub fn tags(&self) -> Vec<&'static str> {
        (self.tags)()
    }

    /// Decodes one value and writes its canonical encoding.
    pub fn transcode(&self, reader: &mut JsonReader, writer: &mut JsonWriter) -> Result<(), Error> {
        (self.transcode)(reader, writer)
    }

    /// Same as `transcode` for a JSON array of values; the first bad element aborts.
    pub fn transcode_array(
        &self,
        reader: &mut JsonReader,
        writer: &mut JsonWriter,
    ) -> Result<(), Error> {
        writer.start_array()?;
        for item in decode_array(reader, |reader| (self.transcode)(reader, &mut *writer))? {
            item?;
        }
        writer.end_array()
    }
}

fn family_tags<T: Polymorphic>() -> Vec<&'static str> {
    T::FAMILY.tags().collect()
}

fn transcode_one<T: JsonCodec>(reader: &mut JsonReader, writer: &mut JsonWriter) -> Result<(), Error> {
    T::decode(reader)?.encode(writer)
}

static REGISTRY: [Registration; 22] = [
    Registration::family::<ClusterEvent>("ClusterEvent"),
    Registration::family::<NodeEvent>("NodeEvent"),
    Registration::family::<ChaosEvent>("ChaosEvent"),
    Registration::plain::<ChaosEventWrapper>("ChaosEventWrapper"),
    Registration::plain::<ChaosEventsSegment>("ChaosEventsSegment"),
    Registration::plain::<ChaosParameters>("ChaosParameters"),
    Registration::plain::<ChaosContext>("ChaosContext"),
    Registration::family::<ServicePlacementPolicyDescription>("ServicePlacementPolicyDescription"),
    Registration::family::<BackupStorageDescription>("BackupStorageDescription"),
    Registration::family::<BackupScheduleDescription>("BackupScheduleDescription"),
    Registration::family::<RetentionPolicyDescription>("RetentionPolicyDescription"),
    Registration::plain::<BackupPolicyDescription>("BackupPolicyDescription"),
    Registration::plain::<PagedBackupPolicyDescriptionList>("PagedBackupPolicyDescriptionList"),
    Registration::family::<PropertyValue>("PropertyValue"),
    Registration::plain::<PropertyDescription>("PropertyDescription"),
    Registration::family::<AutoScalingMetric>("AutoScalingMetric"),
    Registration::family::<AutoScalingTrigger>("AutoScalingTrigger"),
    Registration::family::<AutoScalingMechanism>("AutoScalingMechanism"),
    Registration::plain::<AutoScalingPolicy>("AutoScalingPolicy"),
    Registration::family::<SecretResourceProperties>("SecretResourceProperties"),
    Registration::plain::<HealthState>("HealthState"),
    Registration::plain::<ResourceStatus>("ResourceStatus"),
];

pub fn registrations() -> &'static [Registration] {
    &REGISTRY
}

pub fn lookup(name: &str) -> Option<&'static Registration> {
    REGISTRY
        .iter()
        .find(|entry| entry.name.eq_ignore_ascii_case(name))
}
