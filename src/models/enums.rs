// Closed string enums shared across the worked families.
use crate::core::wire_enum::wire_enum;

wire_enum! {
    pub enum HealthState: Tolerant(Invalid), IgnoreCase {
        Invalid => "Invalid",
        Ok => "Ok",
        Warning => "Warning",
        Error => "Error",
        Unknown => "Unknown",
    }
}

wire_enum! {
    pub enum UpgradeKind: Tolerant(Invalid), IgnoreCase {
        Invalid => "Invalid",
        Rolling => "Rolling",
    }
}

wire_enum! {
    pub enum UpgradeMode: Tolerant(Invalid), IgnoreCase {
        Invalid => "Invalid",
        UnmonitoredAuto => "UnmonitoredAuto",
        UnmonitoredManual => "UnmonitoredManual",
        Monitored => "Monitored",
        UnmonitoredDeferred => "UnmonitoredDeferred",
    }
}

wire_enum! {
    pub enum FailureAction: Tolerant(Invalid), IgnoreCase {
        Invalid => "Invalid",
        Rollback => "Rollback",
        Manual => "Manual",
    }
}

wire_enum! {
    pub enum ManagedIdentityType: Tolerant(Invalid), IgnoreCase {
        Invalid => "Invalid",
        Vmss => "VMSS",
        Cluster => "Cluster",
    }
}

wire_enum! {
    pub enum BackupScheduleFrequencyType: Strict(Invalid), Ordinal {
        Invalid => "Invalid",
        Daily => "Daily",
        Weekly => "Weekly",
    }
}

wire_enum! {
    pub enum DayOfWeek: Strict(Sunday), Ordinal {
        Sunday => "Sunday",
        Monday => "Monday",
        Tuesday => "Tuesday",
        Wednesday => "Wednesday",
        Thursday => "Thursday",
        Friday => "Friday",
        Saturday => "Saturday",
    }
}

wire_enum! {
    /// Resource tracked by an auto-scaling metric.
    pub enum AutoScalingResourceMetricName: Strict(Cpu), Ordinal {
        Cpu => "cpu",
        MemoryInGb => "memoryInGB",
    }
}

wire_enum! {
    pub enum ResourceStatus: Tolerant(Unknown), Ordinal {
        Unknown => "Unknown",
        Ready => "Ready",
        Upgrading => "Upgrading",
        Creating => "Creating",
        Deleting => "Deleting",
        Failed => "Failed",
    }
}

#[cfg(test)]
mod tests {
    use super::{AutoScalingResourceMetricName, DayOfWeek, HealthState, ManagedIdentityType};
    use crate::core::error::ErrorKind;
    use crate::core::primitive::JsonCodec;
    use crate::core::reader::JsonReader;

    fn decode<T: JsonCodec>(input: &str) -> Result<T, crate::core::error::Error> {
        T::decode(&mut JsonReader::from_str(input).expect("parse"))
    }

    #[test]
    fn health_state_tolerates_new_values() {
        assert_eq!(decode::<HealthState>(r#""warning""#).unwrap(), HealthState::Warning);
        assert_eq!(decode::<HealthState>(r#""Degraded""#).unwrap(), HealthState::Invalid);
    }

    #[test]
    fn identity_type_keeps_wire_spelling() {
        assert_eq!(decode::<ManagedIdentityType>(r#""vmss""#).unwrap(), ManagedIdentityType::Vmss);
        assert_eq!(ManagedIdentityType::Vmss.as_str(), "VMSS");
    }

    #[test]
    fn strict_enums_reject_case_variants() {
        assert_eq!(decode::<DayOfWeek>(r#""Friday""#).unwrap(), DayOfWeek::Friday);
        let err = decode::<DayOfWeek>(r#""friday""#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedValue);

        let err = decode::<AutoScalingResourceMetricName>(r#""gpu""#).unwrap_err();
        assert_eq!(err.expected(), Some("AutoScalingResourceMetricName"));
    }
}
