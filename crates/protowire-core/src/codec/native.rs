//! Modern native forms: length-delimited text and raw byte payloads.

use crate::{
    codec::CodecError,
    types::{Decimal, Guid},
};

pub fn decode_guid_text(payload: &[u8]) -> Result<Guid, CodecError> {
    let text = std::str::from_utf8(payload).map_err(|_| CodecError::Utf8)?;

    text.parse()
        .map_err(|_| CodecError::GuidText(text.to_string()))
}

pub fn decode_guid_bytes(payload: &[u8]) -> Result<Guid, CodecError> {
    let bytes: [u8; 16] = payload
        .try_into()
        .map_err(|_| CodecError::GuidLength(payload.len()))?;

    Ok(Guid::from_rfc_bytes(bytes))
}

pub fn decode_decimal_text(payload: &[u8]) -> Result<Decimal, CodecError> {
    let text = std::str::from_utf8(payload).map_err(|_| CodecError::Utf8)?;

    text.parse()
        .map_err(|_| CodecError::DecimalText(text.to_string()))
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guid_text_round_trips_the_canonical_form() {
        let guid: Guid = "c416e4af-455e-414c-948c-f27873263547".parse().unwrap();
        let text = guid.to_string();
        assert_eq!(text.len(), 36);
        assert_eq!(decode_guid_text(text.as_bytes()).unwrap(), guid);
    }

    #[test]
    fn guid_bytes_use_rfc_order() {
        let guid: Guid = "c416e4af-455e-414c-948c-f27873263547".parse().unwrap();
        let bytes = guid.to_rfc_bytes();
        assert_eq!(bytes[0], 0xC4);
        assert_eq!(decode_guid_bytes(&bytes).unwrap(), guid);
    }

    #[test]
    fn short_guid_payloads_are_rejected() {
        assert_eq!(
            decode_guid_bytes(&[0; 15]),
            Err(CodecError::GuidLength(15))
        );
    }

    #[test]
    fn decimal_text_keeps_scale() {
        let decimal: Decimal = "12354.1451".parse().unwrap();
        let text = decimal.to_string();
        assert_eq!(text, "12354.1451");
        assert_eq!(decode_decimal_text(text.as_bytes()).unwrap(), decimal);
    }

    #[test]
    fn malformed_decimal_text_is_rejected() {
        assert_eq!(
            decode_decimal_text(b"12,3"),
            Err(CodecError::DecimalText("12,3".to_string()))
        );
    }

    #[test]
    fn non_utf8_payloads_are_rejected() {
        assert_eq!(decode_guid_text(&[0xFF]), Err(CodecError::Utf8));
        assert_eq!(decode_decimal_text(&[0xFF]), Err(CodecError::Utf8));
    }
}
