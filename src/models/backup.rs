//! Purpose: Backup policy DTOs and their storage, schedule, and retention families.
//! Exports: `BackupStorageDescription`, `BackupStorage`, `BackupScheduleDescription`,
//!   `RetentionPolicyDescription`, `BackupPolicyDescription`, `PagedBackupPolicyDescriptionList`.
//! Role: Worked families nested inside a plain DTO and a paged list.
//! Invariants: Property names match ignoring case; kind tags match ordinally.
//! Invariants: `FriendlyName` belongs to every storage variant and is written after the
//!   variant's required fields.
use time::{Duration, OffsetDateTime};

use crate::core::dispatch::{Discriminated, Polymorphic, decode_polymorphic, encode_polymorphic};
use crate::core::error::Error;
use crate::core::primitive::JsonCodec;
use crate::core::reader::JsonReader;
use crate::core::structural::{
    FieldTable, MatchMode, Visit, decode_object, decode_properties, encode_optional_property,
    encode_required_property, field, read_field,
};
use crate::core::writer::JsonWriter;
use crate::models::enums::{BackupScheduleFrequencyType, DayOfWeek, ManagedIdentityType};

const BACKUP_MATCH: MatchMode = MatchMode::IgnoreCase;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AzureBlobBackupStorage {
    pub connection_string: String,
    pub container_name: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FileShareBackupStorage {
    pub path: String,
    pub primary_user_name: Option<String>,
    pub primary_password: Option<String>,
    pub secondary_user_name: Option<String>,
    pub secondary_password: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DsmsAzureBlobBackupStorage {
    pub storage_credentials_source_location: String,
    pub container_name: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ManagedIdentityAzureBlobBackupStorage {
    pub managed_identity_type: ManagedIdentityType,
    pub blob_service_uri: String,
    pub container_name: String,
}

/// Variant-specific half of a storage description.
#[derive(Clone, Debug, PartialEq)]
pub enum BackupStorage {
    AzureBlobStore(AzureBlobBackupStorage),
    FileShare(FileShareBackupStorage),
    DsmsAzureBlobStore(DsmsAzureBlobBackupStorage),
    ManagedIdentityAzureBlobStore(ManagedIdentityAzureBlobBackupStorage),
}

impl Default for BackupStorage {
    fn default() -> Self {
        BackupStorage::AzureBlobStore(AzureBlobBackupStorage::default())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BackupStorageDescription {
    pub friendly_name: Option<String>,
    pub storage: BackupStorage,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BackupStorageKind {
    AzureBlobStore,
    FileShare,
    DsmsAzureBlobStore,
    ManagedIdentityAzureBlobStore,
}

#[derive(Clone, Copy)]
enum StorageField {
    FriendlyName,
    ConnectionString,
    ContainerName,
    Path,
    PrimaryUserName,
    PrimaryPassword,
    SecondaryUserName,
    SecondaryPassword,
    StorageCredentialsSourceLocation,
    ManagedIdentityType,
    BlobServiceUri,
}

const STORAGE_FIELDS: FieldTable<StorageField> = FieldTable::new(
    BACKUP_MATCH,
    &[
        field("FriendlyName", StorageField::FriendlyName),
        field("ConnectionString", StorageField::ConnectionString),
        field("ContainerName", StorageField::ContainerName),
        field("Path", StorageField::Path),
        field("PrimaryUserName", StorageField::PrimaryUserName),
        field("PrimaryPassword", StorageField::PrimaryPassword),
        field("SecondaryUserName", StorageField::SecondaryUserName),
        field("SecondaryPassword", StorageField::SecondaryPassword),
        field(
            "StorageCredentialsSourceLocation",
            StorageField::StorageCredentialsSourceLocation,
        ),
        field("ManagedIdentityType", StorageField::ManagedIdentityType),
        field("BlobServiceUri", StorageField::BlobServiceUri),
    ],
);

impl Polymorphic for BackupStorageDescription {
    type Kind = BackupStorageKind;

    const FAMILY: Discriminated<BackupStorageKind> = Discriminated {
        family: "BackupStorageDescription",
        property: "StorageKind",
        property_match: BACKUP_MATCH,
        value_match: MatchMode::Ordinal,
        variants: &[
            ("AzureBlobStore", BackupStorageKind::AzureBlobStore),
            ("FileShare", BackupStorageKind::FileShare),
            ("DsmsAzureBlobStore", BackupStorageKind::DsmsAzureBlobStore),
            (
                "ManagedIdentityAzureBlobStore",
                BackupStorageKind::ManagedIdentityAzureBlobStore,
            ),
        ],
        base: None,
    };

    fn kind(&self) -> BackupStorageKind {
        match self.storage {
            BackupStorage::AzureBlobStore(_) => BackupStorageKind::AzureBlobStore,
            BackupStorage::FileShare(_) => BackupStorageKind::FileShare,
            BackupStorage::DsmsAzureBlobStore(_) => BackupStorageKind::DsmsAzureBlobStore,
            BackupStorage::ManagedIdentityAzureBlobStore(_) => {
                BackupStorageKind::ManagedIdentityAzureBlobStore
            }
        }
    }

    fn decode_variant(kind: BackupStorageKind, reader: &mut JsonReader) -> Result<Self, Error> {
        let mut friendly_name = None;
        let mut storage = match kind {
            BackupStorageKind::AzureBlobStore => {
                BackupStorage::AzureBlobStore(AzureBlobBackupStorage::default())
            }
            BackupStorageKind::FileShare => BackupStorage::FileShare(FileShareBackupStorage::default()),
            BackupStorageKind::DsmsAzureBlobStore => {
                BackupStorage::DsmsAzureBlobStore(DsmsAzureBlobBackupStorage::default())
            }
            BackupStorageKind::ManagedIdentityAzureBlobStore => {
                BackupStorage::ManagedIdentityAzureBlobStore(
                    ManagedIdentityAzureBlobBackupStorage::default(),
                )
            }
        };
        decode_properties(reader, |name, reader| {
            let Some(id) = STORAGE_FIELDS.lookup(name) else {
                return Ok(Visit::Unknown);
            };
            if let StorageField::FriendlyName = id {
                friendly_name = read_field(reader)?;
                return Ok(Visit::Consumed);
            }
            storage.visit(id, reader)
        })?;
        Ok(Self {
            friendly_name,
            storage,
        })
    }

    fn encode_variant(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        match &self.storage {
            BackupStorage::AzureBlobStore(store) => {
                encode_required_property(writer, "ConnectionString", &store.connection_string)?;
                encode_required_property(writer, "ContainerName", &store.container_name)?;
            }
            BackupStorage::FileShare(share) => {
                encode_required_property(writer, "Path", &share.path)?;
            }
            BackupStorage::DsmsAzureBlobStore(store) => {
                encode_required_property(
                    writer,
                    "StorageCredentialsSourceLocation",
                    &store.storage_credentials_source_location,
                )?;
                encode_required_property(writer, "ContainerName", &store.container_name)?;
            }
            BackupStorage::ManagedIdentityAzureBlobStore(store) => {
                encode_required_property(
                    writer,
                    "ManagedIdentityType",
                    &store.managed_identity_type,
                )?;
                encode_required_property(writer, "BlobServiceUri", &store.blob_service_uri)?;
                encode_required_property(writer, "ContainerName", &store.container_name)?;
            }
        }
        encode_optional_property(writer, "FriendlyName", &self.friendly_name)?;
        if let BackupStorage::FileShare(share) = &self.storage {
            encode_optional_property(writer, "PrimaryUserName", &share.primary_user_name)?;
            encode_optional_property(writer, "PrimaryPassword", &share.primary_password)?;
            encode_optional_property(writer, "SecondaryUserName", &share.secondary_user_name)?;
            encode_optional_property(writer, "SecondaryPassword", &share.secondary_password)?;
        }
        Ok(())
    }
}

impl BackupStorage {
    // Fields that belong to a different storage kind are reported as unknown.
    fn visit(&mut self, id: StorageField, reader: &mut JsonReader) -> Result<Visit, Error> {
        match (self, id) {
            (BackupStorage::AzureBlobStore(store), StorageField::ConnectionString) => {
                store.connection_string = read_required(reader)?
            }
            (BackupStorage::AzureBlobStore(store), StorageField::ContainerName) => {
                store.container_name = read_required(reader)?
            }
            (BackupStorage::FileShare(share), StorageField::Path) => {
                share.path = read_required(reader)?
            }
            (BackupStorage::FileShare(share), StorageField::PrimaryUserName) => {
                share.primary_user_name = read_field(reader)?
            }
            (BackupStorage::FileShare(share), StorageField::PrimaryPassword) => {
                share.primary_password = read_field(reader)?
            }
            (BackupStorage::FileShare(share), StorageField::SecondaryUserName) => {
                share.secondary_user_name = read_field(reader)?
            }
            (BackupStorage::FileShare(share), StorageField::SecondaryPassword) => {
                share.secondary_password = read_field(reader)?
            }
            (
                BackupStorage::DsmsAzureBlobStore(store),
                StorageField::StorageCredentialsSourceLocation,
            ) => store.storage_credentials_source_location = read_required(reader)?,
            (BackupStorage::DsmsAzureBlobStore(store), StorageField::ContainerName) => {
                store.container_name = read_required(reader)?
            }
            (
                BackupStorage::ManagedIdentityAzureBlobStore(store),
                StorageField::ManagedIdentityType,
            ) => store.managed_identity_type = read_required(reader)?,
            (BackupStorage::ManagedIdentityAzureBlobStore(store), StorageField::BlobServiceUri) => {
                store.blob_service_uri = read_required(reader)?
            }
            (BackupStorage::ManagedIdentityAzureBlobStore(store), StorageField::ContainerName) => {
                store.container_name = read_required(reader)?
            }
            _ => return Ok(Visit::Unknown),
        }
        Ok(Visit::Consumed)
    }
}

fn read_required<T: JsonCodec + Default>(reader: &mut JsonReader) -> Result<T, Error> {
    Ok(read_field(reader)?.unwrap_or_default())
}

impl JsonCodec for BackupStorageDescription {
    fn decode(reader: &mut JsonReader) -> Result<Self, Error> {
        decode_polymorphic(reader)
    }

    fn encode(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        encode_polymorphic(self, writer)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BackupScheduleKind {
    FrequencyBased,
    TimeBased,
}

#[derive(Clone, Debug, PartialEq)]
pub enum BackupScheduleDescription {
    /// Back up every `interval`.
    FrequencyBased { interval: Duration },
    TimeBased(TimeBasedBackupSchedule),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimeBasedBackupSchedule {
    pub schedule_frequency_type: BackupScheduleFrequencyType,
    pub run_days: Option<Vec<DayOfWeek>>,
    pub run_times: Vec<OffsetDateTime>,
}

impl Default for BackupScheduleDescription {
    fn default() -> Self {
        BackupScheduleDescription::FrequencyBased {
            interval: Duration::ZERO,
        }
    }
}

#[derive(Clone, Copy)]
enum ScheduleField {
    Interval,
    ScheduleFrequencyType,
    RunDays,
    RunTimes,
}

const SCHEDULE_FIELDS: FieldTable<ScheduleField> = FieldTable::new(
    BACKUP_MATCH,
    &[
        field("Interval", ScheduleField::Interval),
        field("ScheduleFrequencyType", ScheduleField::ScheduleFrequencyType),
        field("RunDays", ScheduleField::RunDays),
        field("RunTimes", ScheduleField::RunTimes),
    ],
);

impl Polymorphic for BackupScheduleDescription {
    type Kind = BackupScheduleKind;

    const FAMILY: Discriminated<BackupScheduleKind> = Discriminated {
        family: "BackupScheduleDescription",
        property: "ScheduleKind",
        property_match: BACKUP_MATCH,
        value_match: MatchMode::Ordinal,
        variants: &[
            ("FrequencyBased", BackupScheduleKind::FrequencyBased),
            ("TimeBased", BackupScheduleKind::TimeBased),
        ],
        base: None,
    };

    fn kind(&self) -> BackupScheduleKind {
        match self {
            BackupScheduleDescription::FrequencyBased { .. } => BackupScheduleKind::FrequencyBased,
            BackupScheduleDescription::TimeBased(_) => BackupScheduleKind::TimeBased,
        }
    }

    fn decode_variant(kind: BackupScheduleKind, reader: &mut JsonReader) -> Result<Self, Error> {
        match kind {
            BackupScheduleKind::FrequencyBased => {
                let mut interval = None;
                decode_properties(reader, |name, reader| {
                    match SCHEDULE_FIELDS.lookup(name) {
                        Some(ScheduleField::Interval) => interval = read_field(reader)?,
                        _ => return Ok(Visit::Unknown),
                    }
                    Ok(Visit::Consumed)
                })?;
                Ok(BackupScheduleDescription::FrequencyBased {
                    interval: interval.unwrap_or_default(),
                })
            }
            BackupScheduleKind::TimeBased => {
                let mut schedule = TimeBasedBackupSchedule::default();
                decode_properties(reader, |name, reader| {
                    match SCHEDULE_FIELDS.lookup(name) {
                        Some(ScheduleField::ScheduleFrequencyType) => {
                            schedule.schedule_frequency_type = read_required(reader)?
                        }
                        Some(ScheduleField::RunDays) => schedule.run_days = read_field(reader)?,
                        Some(ScheduleField::RunTimes) => schedule.run_times = read_required(reader)?,
                        _ => return Ok(Visit::Unknown),
                    }
                    Ok(Visit::Consumed)
                })?;
                Ok(BackupScheduleDescription::TimeBased(schedule))
            }
        }
    }

    fn encode_variant(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        match self {
            BackupScheduleDescription::FrequencyBased { interval } => {
                encode_required_property(writer, "Interval", interval)
            }
            BackupScheduleDescription::TimeBased(schedule) => {
                encode_required_property(
                    writer,
                    "ScheduleFrequencyType",
                    &schedule.schedule_frequency_type,
                )?;
                encode_required_property(writer, "RunTimes", &schedule.run_times)?;
                encode_optional_property(writer, "RunDays", &schedule.run_days)
            }
        }
    }
}

impl JsonCodec for BackupScheduleDescription {
    fn decode(reader: &mut JsonReader) -> Result<Self, Error> {
        decode_polymorphic(reader)
    }

    fn encode(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        encode_polymorphic(self, writer)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetentionPolicyKind {
    Basic,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RetentionPolicyDescription {
    Basic {
        retention_duration: Duration,
        minimum_number_of_backups: Option<i32>,
    },
}

impl Polymorphic for RetentionPolicyDescription {
    type Kind = RetentionPolicyKind;

    const FAMILY: Discriminated<RetentionPolicyKind> = Discriminated {
        family: "RetentionPolicyDescription",
        property: "RetentionPolicyType",
        property_match: BACKUP_MATCH,
        value_match: MatchMode::Ordinal,
        variants: &[("Basic", RetentionPolicyKind::Basic)],
        base: None,
    };

    fn kind(&self) -> RetentionPolicyKind {
        match self {
            RetentionPolicyDescription::Basic { .. } => RetentionPolicyKind::Basic,
        }
    }

    fn decode_variant(kind: RetentionPolicyKind, reader: &mut JsonReader) -> Result<Self, Error> {
        match kind {
            RetentionPolicyKind::Basic => {
                let mut retention_duration = None;
                let mut minimum_number_of_backups = None;
                decode_properties(reader, |name, reader| {
                    if BACKUP_MATCH.matches(name, "RetentionDuration") {
                        retention_duration = read_field(reader)?;
                    } else if BACKUP_MATCH.matches(name, "MinimumNumberOfBackups") {
                        minimum_number_of_backups = read_field(reader)?;
                    } else {
                        return Ok(Visit::Unknown);
                    }
                    Ok(Visit::Consumed)
                })?;
                Ok(RetentionPolicyDescription::Basic {
                    retention_duration: retention_duration.unwrap_or_default(),
                    minimum_number_of_backups,
                })
            }
        }
    }

    fn encode_variant(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        match self {
            RetentionPolicyDescription::Basic {
                retention_duration,
                minimum_number_of_backups,
            } => {
                encode_required_property(writer, "RetentionDuration", retention_duration)?;
                encode_optional_property(
                    writer,
                    "MinimumNumberOfBackups",
                    minimum_number_of_backups,
                )
            }
        }
    }
}

impl JsonCodec for RetentionPolicyDescription {
    fn decode(reader: &mut JsonReader) -> Result<Self, Error> {
        decode_polymorphic(reader)
    }

    fn encode(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        encode_polymorphic(self, writer)
    }
}

/// Named backup policy; the unit the backup-restore service enables on an entity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BackupPolicyDescription {
    pub name: String,
    pub auto_restore_on_data_loss: bool,
    pub max_incremental_backups: i32,
    pub schedule: BackupScheduleDescription,
    pub storage: BackupStorageDescription,
    pub retention_policy: Option<RetentionPolicyDescription>,
}

#[derive(Clone, Copy)]
enum PolicyField {
    Name,
    AutoRestoreOnDataLoss,
    MaxIncrementalBackups,
    Schedule,
    Storage,
    RetentionPolicy,
}

const POLICY_FIELDS: FieldTable<PolicyField> = FieldTable::new(
    BACKUP_MATCH,
    &[
        field("Name", PolicyField::Name),
        field("AutoRestoreOnDataLoss", PolicyField::AutoRestoreOnDataLoss),
        field("MaxIncrementalBackups", PolicyField::MaxIncrementalBackups),
        field("Schedule", PolicyField::Schedule),
        field("Storage", PolicyField::Storage),
        field("RetentionPolicy", PolicyField::RetentionPolicy),
    ],
);

impl JsonCodec for BackupPolicyDescription {
    fn decode(reader: &mut JsonReader) -> Result<Self, Error> {
        let mut policy = BackupPolicyDescription::default();
        decode_object(reader, |name, reader| {
            match POLICY_FIELDS.lookup(name) {
                Some(PolicyField::Name) => policy.name = read_required(reader)?,
                Some(PolicyField::AutoRestoreOnDataLoss) => {
                    policy.auto_restore_on_data_loss = read_required(reader)?
                }
                Some(PolicyField::MaxIncrementalBackups) => {
                    policy.max_incremental_backups = read_required(reader)?
                }
                Some(PolicyField::Schedule) => policy.schedule = read_required(reader)?,
                Some(PolicyField::Storage) => policy.storage = read_required(reader)?,
                Some(PolicyField::RetentionPolicy) => {
                    policy.retention_policy = read_field(reader)?
                }
                None => return Ok(Visit::Unknown),
            }
            Ok(Visit::Consumed)
        })?;
        Ok(policy)
    }

    fn encode(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        writer.start_object()?;
        encode_required_property(writer, "Name", &self.name)?;
        encode_required_property(writer, "AutoRestoreOnDataLoss", &self.auto_restore_on_data_loss)?;
        encode_required_property(writer, "MaxIncrementalBackups", &self.max_incremental_backups)?;
        encode_required_property(writer, "Schedule", &self.schedule)?;
        encode_required_property(writer, "Storage", &self.storage)?;
        encode_optional_property(writer, "RetentionPolicy", &self.retention_policy)?;
        writer.end_object()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PagedBackupPolicyDescriptionList {
    pub continuation_token: Option<String>,
    pub items: Option<Vec<BackupPolicyDescription>>,
}

impl JsonCodec for PagedBackupPolicyDescriptionList {
    fn decode(reader: &mut JsonReader) -> Result<Self, Error> {
        let mut page = PagedBackupPolicyDescriptionList::default();
        decode_object(reader, |name, reader| {
            if BACKUP_MATCH.matches(name, "ContinuationToken") {
                page.continuation_token = read_field(reader)?;
            } else if BACKUP_MATCH.matches(name, "Items") {
                page.items = read_field(reader)?;
            } else {
                return Ok(Visit::Unknown);
            }
            Ok(Visit::Consumed)
        })?;
        Ok(page)
    }

    fn encode(&self, writer: &mut JsonWriter) -> Result<(), Error> {
        writer.start_object()?;
        encode_optional_property(writer, "ContinuationToken", &self.continuation_token)?;
        encode_optional_property(writer, "Items", &self.items)?;
        writer.end_object()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        BackupPolicyDescription, BackupScheduleDescription, BackupStorage,
        BackupStorageDescription, FileShareBackupStorage, PagedBackupPolicyDescriptionList,
        RetentionPolicyDescription,
    };
    use crate::core::error::ErrorKind;
    use crate::core::primitive::JsonCodec;
    use crate::core::reader::JsonReader;
    use crate::core::writer::JsonWriter;
    use crate::models::enums::{DayOfWeek, ManagedIdentityType};
    use time::Duration;

    fn decode<T: JsonCodec>(input: &str) -> Result<T, crate::core::error::Error> {
        T::decode(&mut JsonReader::from_str(input).expect("parse"))
    }

    fn encode<T: JsonCodec>(value: &T) -> String {
        let mut writer = JsonWriter::new();
        value.encode(&mut writer).expect("encode");
        writer.into_string().expect("finish")
    }

    #[test]
    fn friendly_name_is_shared_by_every_storage_kind() {
        let storage: BackupStorageDescription = decode(
            r#"{"storagekind":"ManagedIdentityAzureBlobStore","FriendlyName":"vault",
                "ManagedIdentityType":"Cluster","BlobServiceUri":"https://x","ContainerName":"c"}"#,
        )
        .expect("decode");
        assert_eq!(storage.friendly_name.as_deref(), Some("vault"));
        let BackupStorage::ManagedIdentityAzureBlobStore(store) = &storage.storage else {
            panic!("unexpected storage {storage:?}");
        };
        assert_eq!(store.managed_identity_type, ManagedIdentityType::Cluster);
        assert_eq!(
            encode(&storage),
            concat!(
                r#"{"StorageKind":"ManagedIdentityAzureBlobStore","ManagedIdentityType":"Cluster","#,
                r#""BlobServiceUri":"https://x","ContainerName":"c","FriendlyName":"vault"}"#
            )
        );
    }

    #[test]
    fn file_share_optionals_follow_required_path() {
        let storage = BackupStorageDescription {
            friendly_name: None,
            storage: BackupStorage::FileShare(FileShareBackupStorage {
                path: r"\\share\backups".to_string(),
                primary_user_name: Some("ops".to_string()),
                ..FileShareBackupStorage::default()
            }),
        };
        assert_eq!(
            encode(&storage),
            r#"{"StorageKind":"FileShare","Path":"\\\\share\\backups","PrimaryUserName":"ops"}"#
        );
    }

    #[test]
    fn fields_of_other_storage_kinds_are_skipped() {
        let storage: BackupStorageDescription = decode(
            r#"{"StorageKind":"FileShare","Path":"p","ConnectionString":"ignored"}"#,
        )
        .expect("decode");
        assert_eq!(
            storage.storage,
            BackupStorage::FileShare(FileShareBackupStorage {
                path: "p".to_string(),
                ..FileShareBackupStorage::default()
            })
        );
    }

    #[test]
    fn time_based_schedule_reads_days_and_times() {
        let schedule: BackupScheduleDescription = decode(
            r#"{"ScheduleKind":"TimeBased","ScheduleFrequencyType":"Weekly",
                "RunDays":["Monday","Friday"],"RunTimes":["0001-01-01T22:00:00Z"]}"#,
        )
        .expect("decode");
        let BackupScheduleDescription::TimeBased(schedule) = schedule else {
            panic!("expected TimeBased");
        };
        assert_eq!(schedule.run_days, Some(vec![DayOfWeek::Monday, DayOfWeek::Friday]));
        assert_eq!(schedule.run_times.len(), 1);
    }

    #[test]
    fn one_bad_run_day_aborts_the_schedule() {
        let err = decode::<BackupScheduleDescription>(
            r#"{"ScheduleKind":"TimeBased","ScheduleFrequencyType":"Weekly","RunDays":["Monday","Funday"]}"#,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedValue);
        assert_eq!(err.property(), Some("RunDays"));
    }

    #[test]
    fn policy_round_trips_with_nested_families() {
        let input = concat!(
            r#"{"Name":"daily","AutoRestoreOnDataLoss":false,"MaxIncrementalBackups":3,"#,
            r#""Schedule":{"ScheduleKind":"FrequencyBased","Interval":"PT4H"},"#,
            r#""Storage":{"StorageKind":"AzureBlobStore","ConnectionString":"cs","ContainerName":"b"},"#,
            r#""RetentionPolicy":{"RetentionPolicyType":"Basic","RetentionDuration":"P30D","MinimumNumberOfBackups":5}}"#
        );
        let page: PagedBackupPolicyDescriptionList =
            decode(&format!(r#"{{"ContinuationToken":null,"Items":[{input}]}}"#)).expect("decode");
        assert_eq!(page.continuation_token, None);
        let items = page.items.expect("items");
        let policy: &BackupPolicyDescription = &items[0];
        assert_eq!(
            policy.schedule,
            BackupScheduleDescription::FrequencyBased {
                interval: Duration::hours(4)
            }
        );
        assert_eq!(
            policy.retention_policy,
            Some(RetentionPolicyDescription::Basic {
                retention_duration: Duration::days(30),
                minimum_number_of_backups: Some(5),
            })
        );
        assert_eq!(encode(policy), input);
    }
}
