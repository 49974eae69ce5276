//! JSON-Cadence value codec.
//!
//! Script arguments, script results, and event payloads travel as
//! `{"type": <kind>, "value": <payload>}` documents. [`Value`] maps each
//! kind to one variant; its serde representation *is* the interchange
//! format, so encoding is validation followed by `serde_json` output.
//!
//! Integer and fixed-point values are kept as decimal strings, which is how
//! the format carries them, so arbitrary-precision kinds (`Int`, `UInt`,
//! 256-bit widths) lose nothing.

use serde::{Deserialize, Serialize};

use crate::error::ConversionError;
use crate::types::Address;

/// Maximum number of fractional digits for `Fix64` / `UFix64`.
const FIX64_SCALE: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Void,
    Optional(Option<Box<Value>>),
    Bool(bool),
    String(String),
    Character(String),
    Address(#[serde(with = "prefixed_address")] Address),

    Int(String),
    Int8(String),
    Int16(String),
    Int32(String),
    Int64(String),
    Int128(String),
    Int256(String),
    UInt(String),
    UInt8(String),
    UInt16(String),
    UInt32(String),
    UInt64(String),
    UInt128(String),
    UInt256(String),
    Word8(String),
    Word16(String),
    Word32(String),
    Word64(String),
    Word128(String),
    Word256(String),
    Fix64(String),
    UFix64(String),

    Array(Vec<Value>),
    Dictionary(Vec<DictionaryEntry>),
    Struct(Composite),
    Resource(Composite),
    Event(Composite),
    Contract(Composite),
    Enum(Composite),
    Path(PathValue),
    Type(TypeValue),
    /// Capability, function, and range payloads are passed through undecoded.
    Capability(serde_json::Value),
    Function(serde_json::Value),
    InclusiveRange(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub key: Value,
    pub value: Value,
}

/// Struct, resource, event, contract, and enum payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composite {
    /// Fully qualified type id, e.g. `A.0000000000000001.Token.Deposited`.
    pub id: String,
    pub fields: Vec<Field>,
}

impl Composite {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathValue {
    pub domain: String,
    pub identifier: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeValue {
    #[serde(rename = "staticType")]
    pub static_type: serde_json::Value,
}

/// Numeric shape a string-carried value must satisfy.
enum Numeric {
    Integer { signed: bool, bits: Option<u32> },
    Fixed { signed: bool },
}

impl Value {
    /// Encode as JSON-Cadence bytes, rejecting values whose string payloads
    /// do not parse as their declared kind.
    pub fn encode(&self) -> Result<Vec<u8>, ConversionError> {
        self.validate()?;
        serde_json::to_vec(self).map_err(|e| ConversionError::new("cadence value", e))
    }

    pub fn decode(bytes: &[u8]) -> Result<Value, ConversionError> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| ConversionError::new("cadence value", e))?;
        value.validate()?;
        Ok(value)
    }

    /// The JSON-Cadence kind name of this value.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Void => "Void",
            Value::Optional(_) => "Optional",
            Value::Bool(_) => "Bool",
            Value::String(_) => "String",
            Value::Character(_) => "Character",
            Value::Address(_) => "Address",
            Value::Int(_) => "Int",
            Value::Int8(_) => "Int8",
            Value::Int16(_) => "Int16",
            Value::Int32(_) => "Int32",
            Value::Int64(_) => "Int64",
            Value::Int128(_) => "Int128",
            Value::Int256(_) => "Int256",
            Value::UInt(_) => "UInt",
            Value::UInt8(_) => "UInt8",
            Value::UInt16(_) => "UInt16",
            Value::UInt32(_) => "UInt32",
            Value::UInt64(_) => "UInt64",
            Value::UInt128(_) => "UInt128",
            Value::UInt256(_) => "UInt256",
            Value::Word8(_) => "Word8",
            Value::Word16(_) => "Word16",
            Value::Word32(_) => "Word32",
            Value::Word64(_) => "Word64",
            Value::Word128(_) => "Word128",
            Value::Word256(_) => "Word256",
            Value::Fix64(_) => "Fix64",
            Value::UFix64(_) => "UFix64",
            Value::Array(_) => "Array",
            Value::Dictionary(_) => "Dictionary",
            Value::Struct(_) => "Struct",
            Value::Resource(_) => "Resource",
            Value::Event(_) => "Event",
            Value::Contract(_) => "Contract",
            Value::Enum(_) => "Enum",
            Value::Path(_) => "Path",
            Value::Type(_) => "Type",
            Value::Capability(_) => "Capability",
            Value::Function(_) => "Function",
            Value::InclusiveRange(_) => "InclusiveRange",
        }
    }

    fn numeric(&self) -> Option<(&str, Numeric)> {
        fn int(s: &str, signed: bool, bits: Option<u32>) -> Option<(&str, Numeric)> {
            Some((s, Numeric::Integer { signed, bits }))
        }
        match self {
            Value::Int(s) => int(s, true, None),
            Value::Int8(s) => int(s, true, Some(8)),
            Value::Int16(s) => int(s, true, Some(16)),
            Value::Int32(s) => int(s, true, Some(32)),
            Value::Int64(s) => int(s, true, Some(64)),
            Value::Int128(s) => int(s, true, Some(128)),
            Value::Int256(s) => int(s, true, Some(256)),
            Value::UInt(s) => int(s, false, None),
            Value::UInt8(s) | Value::Word8(s) => int(s, false, Some(8)),
            Value::UInt16(s) | Value::Word16(s) => int(s, false, Some(16)),
            Value::UInt32(s) | Value::Word32(s) => int(s, false, Some(32)),
            Value::UInt64(s) | Value::Word64(s) => int(s, false, Some(64)),
            Value::UInt128(s) | Value::Word128(s) => int(s, false, Some(128)),
            Value::UInt256(s) | Value::Word256(s) => int(s, false, Some(256)),
            Value::Fix64(s) => Some((s.as_str(), Numeric::Fixed { signed: true })),
            Value::UFix64(s) => Some((s.as_str(), Numeric::Fixed { signed: false })),
            _ => None,
        }
    }

    fn validate(&self) -> Result<(), ConversionError> {
        if let Some((text, shape)) = self.numeric() {
            return validate_numeric(self.kind(), text, shape);
        }

        match self {
            Value::Optional(Some(inner)) => inner.validate(),
            Value::Character(c) if c.chars().count() != 1 => Err(ConversionError::new(
                "Character",
                format!("expected a single character, got `{c}`"),
            )),
            Value::Array(items) => items.iter().try_for_each(Value::validate),
            Value::Dictionary(entries) => entries.iter().try_for_each(|entry| {
                entry.key.validate()?;
                entry.value.validate()
            }),
            Value::Struct(c)
            | Value::Resource(c)
            | Value::Event(c)
            | Value::Contract(c)
            | Value::Enum(c) => {
                if c.id.is_empty() {
                    return Err(ConversionError::new(self.kind(), "empty type id"));
                }
                c.fields.iter().try_for_each(|f| f.value.validate())
            }
            Value::Path(p) => match p.domain.as_str() {
                "storage" | "private" | "public" => Ok(()),
                other => Err(ConversionError::new(
                    "Path",
                    format!("unknown domain `{other}`"),
                )),
            },
            _ => Ok(()),
        }
    }
}

fn validate_numeric(kind: &str, text: &str, shape: Numeric) -> Result<(), ConversionError> {
    let (signed, digits) = match shape {
        Numeric::Integer { signed, .. } | Numeric::Fixed { signed } => {
            (signed, text.strip_prefix('-'))
        }
    };
    let negative = digits.is_some();
    if negative && !signed {
        return Err(ConversionError::new(
            kind,
            format!("negative value `{text}` for unsigned kind"),
        ));
    }
    let body = digits.unwrap_or(text);

    match shape {
        Numeric::Integer { bits, .. } => {
            if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ConversionError::new(
                    kind,
                    format!("`{text}` is not an integer"),
                ));
            }
            if let Some(bits) = bits.filter(|b| *b <= 128) {
                check_width(kind, text, signed, bits)?;
            }
            Ok(())
        }
        Numeric::Fixed { .. } => {
            let (whole, frac) = body.split_once('.').unwrap_or((body, ""));
            let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
            if whole.is_empty() || !all_digits(whole) || !all_digits(frac) {
                return Err(ConversionError::new(
                    kind,
                    format!("`{text}` is not a fixed-point number"),
                ));
            }
            if frac.len() > FIX64_SCALE {
                return Err(ConversionError::new(
                    kind,
                    format!("`{text}` has more than {FIX64_SCALE} fractional digits"),
                ));
            }
            // Both kinds are stored as 64-bit integers scaled by 10^8.
            let scaled = format!("{whole}{frac:0<8}");
            let in_range = if signed {
                format!("{}{scaled}", if negative { "-" } else { "" })
                    .parse::<i64>()
                    .is_ok()
            } else {
                scaled.parse::<u64>().is_ok()
            };
            if !in_range {
                return Err(ConversionError::new(
                    kind,
                    format!("`{text}` is out of range"),
                ));
            }
            Ok(())
        }
    }
}

fn check_width(kind: &str, text: &str, signed: bool, bits: u32) -> Result<(), ConversionError> {
    let out_of_range = || ConversionError::new(kind, format!("`{text}` is out of range"));
    if signed {
        let v: i128 = text.parse().map_err(|_| out_of_range())?;
        if bits < 128 {
            let limit = 1i128 << (bits - 1);
            if v < -limit || v >= limit {
                return Err(out_of_range());
            }
        }
    } else {
        let v: u128 = text.parse().map_err(|_| out_of_range())?;
        if bits < 128 && v >= (1u128 << bits) {
            return Err(out_of_range());
        }
    }
    Ok(())
}

/// JSON-Cadence addresses always carry a `0x` prefix.
mod prefixed_address {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::types::Address;

    pub fn serialize<S: Serializer>(address: &Address, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&address.to_hex_with_prefix())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Address, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
