//! Byte parameter decoder
//!
//! Reads typed values out of fixed-offset slices of a log payload. Every
//! field names its own offset, width and interpretation (see `layouts`), so
//! decoding is a walk over a constant table. A payload that ends before a
//! field does is rejected; nothing is zero-filled.

use num_bigint::{BigInt, BigUint};
use types::ids::Address;

use crate::errors::DecodeError;

/// ABI word size in bytes.
pub const WORD: usize = 32;

/// How the bytes of a field are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Big-endian unsigned integer
    Uint,
    /// Big-endian two's-complement signed integer
    Int,
    /// Last 20 bytes of the slice
    Address,
    /// UTF-8 text, trailing zero padding trimmed
    Text,
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Uint => "uint",
            FieldKind::Int => "int",
            FieldKind::Address => "address",
            FieldKind::Text => "text",
        }
    }
}

/// One entry of a layout table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub offset: usize,
    pub width: usize,
    pub kind: FieldKind,
}

impl Field {
    pub const fn new(name: &'static str, offset: usize, width: usize, kind: FieldKind) -> Self {
        Self {
            name,
            offset,
            width,
            kind,
        }
    }

    /// A full 32-byte word.
    pub const fn word(name: &'static str, offset: usize, kind: FieldKind) -> Self {
        Self::new(name, offset, WORD, kind)
    }

    /// Exclusive end offset.
    pub const fn end(&self) -> usize {
        self.offset + self.width
    }
}

/// A decoded field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Uint(BigUint),
    Int(BigInt),
    Address(Address),
    Text(String),
}

impl Value {
    fn kind_name(&self) -> &'static str {
        match self {
            Value::Uint(_) => FieldKind::Uint.name(),
            Value::Int(_) => FieldKind::Int.name(),
            Value::Address(_) => FieldKind::Address.name(),
            Value::Text(_) => FieldKind::Text.name(),
        }
    }
}

/// Read one field.
pub fn read_field(data: &[u8], field: &Field) -> Result<Value, DecodeError> {
    let bytes = data
        .get(field.offset..field.end())
        .ok_or(DecodeError::Truncated {
            field: field.name,
            need: field.end(),
            have: data.len(),
        })?;

    match field.kind {
        FieldKind::Uint => Ok(Value::Uint(BigUint::from_bytes_be(bytes))),
        FieldKind::Int => Ok(Value::Int(BigInt::from_signed_bytes_be(bytes))),
        FieldKind::Address => {
            let start = bytes.len().saturating_sub(20);
            Address::from_slice(&bytes[start..])
                .map(Value::Address)
                .map_err(|_| DecodeError::Truncated {
                    field: field.name,
                    need: field.offset + 20,
                    have: data.len(),
                })
        }
        FieldKind::Text => {
            let used = bytes.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
            String::from_utf8(bytes[..used].to_vec())
                .map(Value::Text)
                .map_err(|_| DecodeError::InvalidText { field: field.name })
        }
    }
}

/// Decode every field of a layout, failing on the first unreadable one.
pub fn decode<'l>(data: &[u8], layout: &'l [Field]) -> Result<Decoded<'l>, DecodeError> {
    let values = layout
        .iter()
        .map(|field| read_field(data, field))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Decoded { layout, values })
}

/// Values decoded from one payload, addressable by field name.
#[derive(Debug, Clone)]
pub struct Decoded<'l> {
    layout: &'l [Field],
    values: Vec<Value>,
}

impl<'l> Decoded<'l> {
    pub fn get(&self, name: &'static str) -> Result<&Value, DecodeError> {
        self.layout
            .iter()
            .position(|f| f.name == name)
            .and_then(|i| self.values.get(i))
            .ok_or(DecodeError::UnknownField { field: name })
    }

    pub fn uint(&self, name: &'static str) -> Result<BigUint, DecodeError> {
        match self.get(name)? {
            Value::Uint(v) => Ok(v.clone()),
            other => Err(mismatch(name, FieldKind::Uint, other)),
        }
    }

    pub fn int(&self, name: &'static str) -> Result<BigInt, DecodeError> {
        match self.get(name)? {
            Value::Int(v) => Ok(v.clone()),
            other => Err(mismatch(name, FieldKind::Int, other)),
        }
    }

    pub fn address(&self, name: &'static str) -> Result<Address, DecodeError> {
        match self.get(name)? {
            Value::Address(v) => Ok(*v),
            other => Err(mismatch(name, FieldKind::Address, other)),
        }
    }

    pub fn text(&self, name: &'static str) -> Result<String, DecodeError> {
        match self.get(name)? {
            Value::Text(v) => Ok(v.clone()),
            other => Err(mismatch(name, FieldKind::Text, other)),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn mismatch(field: &'static str, expected: FieldKind, actual: &Value) -> DecodeError {
    DecodeError::KindMismatch {
        field,
        expected: expected.name(),
        actual: actual.kind_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word_from_i64(v: i64) -> [u8; 32] {
        let fill = if v < 0 { 0xff } else { 0x00 };
        let mut out = [fill; 32];
        out[24..].copy_from_slice(&v.to_be_bytes());
        out
    }

    #[test]
    fn test_unsigned_word() {
        let mut data = [0u8; 32];
        data[31] = 0x2a;
        let field = Field::word("n", 0, FieldKind::Uint);
        assert_eq!(read_field(&data, &field).unwrap(), Value::Uint(BigUint::from(42u8)));
    }

    #[test]
    fn test_signed_word_negative() {
        let data = word_from_i64(-5);
        let field = Field::word("d", 0, FieldKind::Int);
        assert_eq!(read_field(&data, &field).unwrap(), Value::Int(BigInt::from(-5)));
    }

    #[test]
    fn test_signed_word_high_bit_clear() {
        let data = word_from_i64(1_000_000);
        let field = Field::word("d", 0, FieldKind::Int);
        assert_eq!(read_field(&data, &field).unwrap(), Value::Int(BigInt::from(1_000_000)));
    }

    #[test]
    fn test_address_takes_low_twenty_bytes() {
        let mut data = [0u8; 32];
        data[12..].copy_from_slice(&[0xab; 20]);
        let field = Field::word("usr", 0, FieldKind::Address);
        assert_eq!(
            read_field(&data, &field).unwrap(),
            Value::Address(Address::new([0xab; 20]))
        );
    }

    #[test]
    fn test_text_trims_padding() {
        let mut data = [0u8; 32];
        data[..5].copy_from_slice(b"ETH-A");
        let field = Field::word("ilk", 0, FieldKind::Text);
        assert_eq!(read_field(&data, &field).unwrap(), Value::Text("ETH-A".into()));
    }

    #[test]
    fn test_text_invalid_utf8() {
        let mut data = [0u8; 32];
        data[0] = 0xff;
        data[1] = 0xfe;
        let field = Field::word("ilk", 0, FieldKind::Text);
        assert_eq!(
            read_field(&data, &field).unwrap_err(),
            DecodeError::InvalidText { field: "ilk" }
        );
    }

    #[test]
    fn test_truncated_is_error() {
        let data = [0u8; 40];
        let field = Field::word("dart", 20, FieldKind::Int);
        assert_eq!(
            read_field(&data, &field).unwrap_err(),
            DecodeError::Truncated {
                field: "dart",
                need: 52,
                have: 40
            }
        );
    }

    #[test]
    fn test_decoded_accessors() {
        const LAYOUT: &[Field] = &[
            Field::word("what", 0, FieldKind::Text),
            Field::word("data", 32, FieldKind::Uint),
        ];
        let mut data = vec![0u8; 64];
        data[..4].copy_from_slice(b"Line");
        data[63] = 7;
        let decoded = decode(&data, LAYOUT).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded.text("what").unwrap(), "Line");
        assert_eq!(decoded.uint("data").unwrap(), BigUint::from(7u8));
        assert!(matches!(
            decoded.int("data"),
            Err(DecodeError::KindMismatch { expected: "int", actual: "uint", .. })
        ));
        assert_eq!(
            decoded.uint("missing").unwrap_err(),
            DecodeError::UnknownField { field: "missing" }
        );
    }

    #[test]
    fn test_decode_stops_at_first_short_field() {
        const LAYOUT: &[Field] = &[
            Field::word("a", 0, FieldKind::Uint),
            Field::word("b", 32, FieldKind::Uint),
        ];
        let err = decode(&[0u8; 33], LAYOUT).unwrap_err();
        assert!(matches!(err, DecodeError::Truncated { field: "b", need: 64, have: 33 }));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn signed_word_matches_i128(v in any::<i128>()) {
            let fill = if v < 0 { 0xff } else { 0x00 };
            let mut data = [fill; 32];
            data[16..].copy_from_slice(&v.to_be_bytes());
            let field = Field::word("v", 0, FieldKind::Int);
            prop_assert_eq!(read_field(&data, &field).unwrap(), Value::Int(BigInt::from(v)));
        }

        #[test]
        fn short_payload_never_decodes(len in 0usize..32) {
            let data = vec![0u8; len];
            let field = Field::word("v", 0, FieldKind::Uint);
            let is_truncated = matches!(read_field(&data, &field), Err(DecodeError::Truncated { .. }));
            prop_assert!(is_truncated);
        }
    }
}
