//! Purpose: Define the stable public Rust API boundary for clusterwire.
//! Exports: Codec entry points, the codec traits, error types, and the worked DTO families.
//! Role: Public, additive-only surface; hides reader/writer plumbing behind `codec`.
//! Invariants: Every DTO reachable here implements `JsonCodec`.
//! Invariants: Error kinds are stable; new kinds are only ever appended.

mod codec;

pub use crate::core::dispatch::{Discriminated, Interleaved, Polymorphic};
#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::guid::Guid;
pub use crate::core::primitive::{Bytes, DEFAULT_TIMESTAMP, JsonCodec};
pub use crate::core::reader::JsonReader;
pub use crate::core::structural::MatchMode;
pub use crate::core::writer::JsonWriter;
pub use crate::models::backup::{
    BackupPolicyDescription, BackupScheduleDescription, BackupStorage, BackupStorageDescription,
    PagedBackupPolicyDescriptionList, RetentionPolicyDescription,
};
pub use crate::models::chaos::{
    ChaosContext, ChaosEvent, ChaosEventWrapper, ChaosEventsSegment, ChaosParameters,
};
pub use crate::models::events::{ClusterEvent, EventFields, NodeEvent, NodeEventFields};
pub use crate::models::placement::ServicePlacementPolicyDescription;
pub use crate::models::property::{PropertyDescription, PropertyValue};
pub use crate::models::registry::{Registration, lookup, registrations};
pub use crate::models::scaling::{
    AutoScalingMechanism, AutoScalingMetric, AutoScalingPolicy, AutoScalingTrigger,
};
pub use crate::models::secret::{SecretFields, SecretResourceProperties};
pub use codec::{ApiResult, from_slice, from_str, list_from_str, list_to_string, to_string};
