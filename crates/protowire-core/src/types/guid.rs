use derive_more::{Display, FromStr};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

///
/// Guid
///
/// Wraps a UUID and exposes the two byte layouts the wire cares about:
/// the RFC 4122 big-endian order and the CLR `ToByteArray` order, which
/// stores the first three components little-endian.
///

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    Eq,
    FromStr,
    PartialEq,
    Hash,
    Ord,
    PartialOrd,
    Serialize,
    Deserialize,
)]
#[repr(transparent)]
pub struct Guid(Uuid);

impl Guid {
    pub const NIL: Self = Self(Uuid::nil());

    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    #[must_use]
    pub const fn is_nil(self) -> bool {
        self.0.is_nil()
    }

    // ---- RFC 4122 layout ----

    #[must_use]
    pub const fn to_rfc_bytes(self) -> [u8; 16] {
        self.0.into_bytes()
    }

    #[must_use]
    pub const fn from_rfc_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    // ---- CLR layout ----

    #[must_use]
    pub const fn to_clr_bytes(self) -> [u8; 16] {
        let b = self.0.into_bytes();

        [
            b[3], b[2], b[1], b[0], // data1, little-endian
            b[5], b[4], // data2
            b[7], b[6], // data3
            b[8], b[9], b[10], b[11], b[12], b[13], b[14], b[15],
        ]
    }

    #[must_use]
    pub const fn from_clr_bytes(b: [u8; 16]) -> Self {
        Self(Uuid::from_bytes([
            b[3], b[2], b[1], b[0], b[5], b[4], b[7], b[6], b[8], b[9], b[10], b[11], b[12], b[13],
            b[14], b[15],
        ]))
    }
}

impl From<Uuid> for Guid {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<Guid> for Uuid {
    fn from(guid: Guid) -> Self {
        guid.0
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Guid {
        "c416e4af-455e-414c-948c-f27873263547".parse().unwrap()
    }

    #[test]
    fn rfc_bytes_are_big_endian() {
        assert_eq!(
            fixture().to_rfc_bytes(),
            [
                0xC4, 0x16, 0xE4, 0xAF, 0x45, 0x5E, 0x41, 0x4C, 0x94, 0x8C, 0xF2, 0x78, 0x73,
                0x26, 0x35, 0x47
            ]
        );
    }

    #[test]
    fn clr_bytes_flip_the_first_three_components() {
        assert_eq!(
            fixture().to_clr_bytes(),
            [
                0xAF, 0xE4, 0x16, 0xC4, 0x5E, 0x45, 0x4C, 0x41, 0x94, 0x8C, 0xF2, 0x78, 0x73,
                0x26, 0x35, 0x47
            ]
        );
    }

    #[test]
    fn both_layouts_round_trip() {
        let g = fixture();
        assert_eq!(Guid::from_rfc_bytes(g.to_rfc_bytes()), g);
        assert_eq!(Guid::from_clr_bytes(g.to_clr_bytes()), g);
    }

    #[test]
    fn display_is_hyphenated_lowercase() {
        assert_eq!(fixture().to_string(), "c416e4af-455e-414c-948c-f27873263547");
    }

    #[test]
    fn nil_guid_is_nil() {
        assert!(Guid::NIL.is_nil());
        assert!(!fixture().is_nil());
    }
}
