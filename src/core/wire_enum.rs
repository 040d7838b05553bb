// Closed string enums: a flat tag table with a per-enum fallback policy.
use crate::core::error::{Error, ErrorKind};
use crate::core::reader::JsonReader;
use crate::core::structural::MatchMode;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EnumPolicy {
    /// Unmatched strings decode to the fallback value.
    Tolerant,
    /// Unmatched strings fail with `MalformedValue`.
    Strict,
}

pub trait WireEnum: Copy + Eq + 'static {
    const NAME: &'static str;
    const MATCH: MatchMode;
    const POLICY: EnumPolicy;
    const VALUES: &'static [(&'static str, Self)];
    /// Tolerant fallback, and the sentinel for a missing required value.
    const FALLBACK: Self;
}

pub fn decode_enum<E: WireEnum>(reader: &mut JsonReader) -> Result<E, Error> {
    let text = reader.read_string()?;
    if let Some((_, value)) = E::VALUES
        .iter()
        .find(|(wire, _)| E::MATCH.matches(&text, wire))
    {
        return Ok(*value);
    }
    match E::POLICY {
        EnumPolicy::Tolerant => {
            tracing::debug!(enum_name = E::NAME, value = %text, "unrecognized enum value, using fallback");
            Ok(E::FALLBACK)
        }
        EnumPolicy::Strict => Err(Error::new(ErrorKind::MalformedValue)
            .with_message(format!("{text:?} is not a valid {}", E::NAME))
            .with_expected(E::NAME)),
    }
}

/// Declares a wire enum, its tag table, and its `JsonCodec` impl.
///
/// ```ignore
/// wire_enum! {
///     pub enum HealthState: Tolerant(Invalid), IgnoreCase {
///         Invalid => "Invalid",
///         Ok => "Ok",
///     }
/// }
/// ```
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $policy:ident($fallback:ident), $mode:ident {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        $vis enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$fallback
            }
        }

        impl $crate::core::wire_enum::WireEnum for $name {
            const NAME: &'static str = stringify!($name);
            const MATCH: $crate::core::structural::MatchMode =
                $crate::core::structural::MatchMode::$mode;
            const POLICY: $crate::core::wire_enum::EnumPolicy =
                $crate::core::wire_enum::EnumPolicy::$policy;
            const VALUES: &'static [(&'static str, Self)] = &[$(($wire, $name::$variant)),+];
            const FALLBACK: Self = $name::$fallback;
        }

        impl $crate::core::primitive::JsonCodec for $name {
            fn decode(
                reader: &mut $crate::core::reader::JsonReader,
            ) -> Result<Self, $crate::core::error::Error> {
                $crate::core::wire_enum::decode_enum(reader)
            }

            fn encode(
                &self,
                writer: &mut $crate::core::writer::JsonWriter,
            ) -> Result<(), $crate::core::error::Error> {
                writer.write_string($name::as_str(*self))
            }
        }
    };
}

pub(crate) use wire_enum;
