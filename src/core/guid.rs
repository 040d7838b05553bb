// 128-bit identifiers in canonical hyphenated form (8-4-4-4-12 hex digits).
use std::fmt;
use std::str::FromStr;

use crate::core::error::{Error, ErrorKind};

const HYPHENS: [usize; 4] = [8, 13, 18, 23];

#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Guid(u128);

impl Guid {
    pub const fn nil() -> Self {
        Self(0)
    }

    pub const fn from_u128(value: u128) -> Self {
        Self(value)
    }

    pub const fn as_u128(self) -> u128 {
        self.0
    }

    pub fn is_nil(self) -> bool {
        self.0 == 0
    }

    pub fn parse(text: &str) -> Result<Self, Error> {
        if text.len() != 36 {
            return Err(malformed(text));
        }
        let mut value = 0u128;
        for (idx, byte) in text.bytes().enumerate() {
            if HYPHENS.contains(&idx) {
                if byte != b'-' {
                    return Err(malformed(text));
                }
                continue;
            }
            let digit = (byte as char).to_digit(16).ok_or_else(|| malformed(text))?;
            value = (value << 4) | u128::from(digit);
        }
        Ok(Self(value))
    }
}

impl FromStr for Guid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:04x}-{:012x}",
            (v >> 96) as u32,
            ((v >> 80) & 0xffff) as u16,
            ((v >> 64) & 0xffff) as u16,
            ((v >> 48) & 0xffff) as u16,
            v & 0xffff_ffff_ffff
        )
    }
}

fn malformed(text: &str) -> Error {
    Error::new(ErrorKind::MalformedValue)
        .with_message(format!("{text:?} is not a hyphenated GUID"))
        .with_expected("guid")
}

#[cfg(test)]
mod tests {
    use super::Guid;
    use crate::core::error::ErrorKind;

    #[test]
    fn canonical_form_round_trips() {
        let text = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
        let guid = Guid::parse(text).expect("guid");
        assert_eq!(guid.as_u128(), 0x3fa85f64_5717_4562_b3fc_2c963f66afa6);
        assert_eq!(guid.to_string(), text);
    }

    #[test]
    fn uppercase_input_normalizes_to_lowercase() {
        let guid: Guid = "3FA85F64-5717-4562-B3FC-2C963F66AFA6".parse().expect("guid");
        assert_eq!(guid.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[test]
    fn nil_prints_all_zeroes() {
        assert_eq!(Guid::nil().to_string(), "00000000-0000-0000-0000-000000000000");
        assert!(Guid::default().is_nil());
    }

    #[test]
    fn non_canonical_forms_are_rejected() {
        for text in [
            "3fa85f6457174562b3fc2c963f66afa6",
            "{3fa85f64-5717-4562-b3fc-2c963f66afa6}",
            "3fa85f64-5717-4562-b3fc-2c963f66afaz",
            "3fa85f64+5717-4562-b3fc-2c963f66afa6",
            "",
        ] {
            let err = Guid::parse(text).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedValue, "input: {text:?}");
        }
    }
}
