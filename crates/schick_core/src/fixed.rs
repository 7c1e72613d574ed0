use std::fmt;

use crate::error::{SaveError, SaveErrorCode};

/// Fixed-width null-terminated string field in the save file's
/// single-byte charset (Latin-1).
///
/// Decoding keeps everything up to the first null byte; the padding after
/// it is not reconstructible, only its zero fill survives a re-encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedString<const N: usize> {
    value: String,
}

impl<const N: usize> FixedString<N> {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn from_raw(raw: [u8; N]) -> Self {
        let end = raw.iter().position(|&b| b == 0).unwrap_or(N);
        let value = raw[..end].iter().map(|&b| b as char).collect();
        Self { value }
    }

    /// Encode to the raw field bytes, zero-padded. A value of exactly N
    /// chars encodes without a terminator, matching the on-disk format.
    pub fn to_raw(&self) -> Result<[u8; N], SaveError> {
        let mut raw = [0u8; N];
        let mut used = 0;
        for c in self.value.chars() {
            let code = u32::from(c);
            if code > 0xFF {
                return Err(SaveError::new(
                    SaveErrorCode::FieldOverflow,
                    format!("'{c}' in \"{}\" is not representable in the save charset", self.value),
                ));
            }
            if used == N {
                return Err(SaveError::new(
                    SaveErrorCode::FieldOverflow,
                    format!("\"{}\" does not fit in a {N}-byte field", self.value),
                ));
            }
            raw[used] = code as u8;
            used += 1;
        }
        Ok(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }
}

impl<const N: usize> fmt::Display for FixedString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Opaque fixed-width byte block carried through decode/encode untouched.
/// Once constructed the width cannot be wrong, so a mismatched replacement
/// blob is rejected at the only fallible entry point, [`FixedBytes::from_slice`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedBytes<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> FixedBytes<N> {
    pub fn new(bytes: [u8; N]) -> Self {
        Self { bytes }
    }

    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        let bytes: [u8; N] = slice.try_into().ok()?;
        Some(Self { bytes })
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::{FixedBytes, FixedString};
    use crate::error::SaveErrorCode;

    #[test]
    fn decode_stops_at_first_null() {
        let raw = *b"Alrik\0\0\0\0\0\0\0\0\0\0\0";
        let s = FixedString::<16>::from_raw(raw);
        assert_eq!(s.as_str(), "Alrik");
    }

    #[test]
    fn decode_without_null_keeps_all_bytes() {
        let raw = *b"ABCDEFGHIJKLMNOP";
        let s = FixedString::<16>::from_raw(raw);
        assert_eq!(s.as_str(), "ABCDEFGHIJKLMNOP");
    }

    #[test]
    fn decode_maps_high_bytes_as_latin1() {
        let mut raw = [0u8; 16];
        raw[..4].copy_from_slice(b"J\xf6rn");
        let s = FixedString::<16>::from_raw(raw);
        assert_eq!(s.as_str(), "J\u{f6}rn");
    }

    #[test]
    fn encode_zero_pads() {
        let s = FixedString::<16>::new("Alrik");
        let raw = s.to_raw().expect("short name should encode");
        assert_eq!(&raw[..5], b"Alrik");
        assert!(raw[5..].iter().all(|&b| b == 0));
    }

    #[test]
    fn encode_full_width_has_no_terminator() {
        let s = FixedString::<16>::new("ABCDEFGHIJKLMNOP");
        let raw = s.to_raw().expect("exact-width name should encode");
        assert_eq!(&raw, b"ABCDEFGHIJKLMNOP");
    }

    #[test]
    fn encode_rejects_overflow() {
        let s = FixedString::<16>::new("ABCDEFGHIJKLMNOPQ");
        let err = s.to_raw().expect_err("17 chars must not fit");
        assert_eq!(err.code, SaveErrorCode::FieldOverflow);
    }

    #[test]
    fn encode_rejects_non_latin1() {
        let s = FixedString::<16>::new("Alrik \u{2694}");
        let err = s.to_raw().expect_err("non-Latin-1 char must be rejected");
        assert_eq!(err.code, SaveErrorCode::FieldOverflow);
    }

    #[test]
    fn latin1_roundtrip() {
        let s = FixedString::<16>::new("J\u{f6}rn");
        let raw = s.to_raw().expect("Latin-1 name should encode");
        assert_eq!(FixedString::<16>::from_raw(raw), s);
    }

    #[test]
    fn fixed_bytes_from_slice_checks_length() {
        assert!(FixedBytes::<4>::from_slice(&[1, 2, 3, 4]).is_some());
        assert!(FixedBytes::<4>::from_slice(&[1, 2, 3]).is_none());
        assert!(FixedBytes::<4>::from_slice(&[1, 2, 3, 4, 5]).is_none());
    }
}
