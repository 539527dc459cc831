use std::fmt;

/// Failure of a single encode or decode call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Fixed-width primitive with the wrong number of bytes.
    LengthMismatch {
        type_name: String,
        expected: usize,
        actual: usize,
    },

    /// A `bool` byte other than 0 or 1.
    InvalidBool(u8),

    /// No primitive rule or registered decoder for this type.
    ///
    /// `raw` holds the bytes that were handed in, for callers that want to
    /// fall back to them.
    UnsupportedType { type_name: String, raw: Vec<u8> },

    /// Integer wider than the declared width.
    Overflow { type_name: String, value: String },

    /// Ran out of input inside a variable-length value.
    UnexpectedEnd { type_name: String },

    /// Input left over after the value was decoded.
    TrailingBytes { type_name: String, remaining: usize },

    /// Malformed ULEB128 length prefix.
    InvalidLength,

    InvalidUtf8 { type_name: String },

    InvalidAddress(String),

    /// The value's shape does not fit the declared type.
    ValueMismatch {
        type_name: String,
        value_kind: &'static str,
    },

    /// Error reported by a registered struct decoder.
    Custom(String),
}

impl CodecError {
    /// Raw bytes carried by an unsupported-type failure.
    pub fn raw_bytes(&self) -> Option<&[u8]> {
        match self {
            CodecError::UnsupportedType { raw, .. } => Some(raw),
            _ => None,
        }
    }

    pub fn custom(msg: impl fmt::Display) -> Self {
        CodecError::Custom(msg.to_string())
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::LengthMismatch {
                type_name,
                expected,
                actual,
            } => write!(
                f,
                "invalid {} length: expected {} bytes, got {}",
                type_name, expected, actual
            ),
            CodecError::InvalidBool(b) => {
                write!(f, "invalid bool byte 0x{:02x}: must be 0x00 or 0x01", b)
            }
            CodecError::UnsupportedType { type_name, raw } => {
                write!(f, "unsupported type {} ({} raw bytes)", type_name, raw.len())
            }
            CodecError::Overflow { type_name, value } => {
                write!(f, "value {} overflows {}", value, type_name)
            }
            CodecError::UnexpectedEnd { type_name } => {
                write!(f, "unexpected end of input while decoding {}", type_name)
            }
            CodecError::TrailingBytes {
                type_name,
                remaining,
            } => write!(
                f,
                "{} trailing bytes after decoding {}",
                remaining, type_name
            ),
            CodecError::InvalidLength => write!(f, "invalid ULEB128 length prefix"),
            CodecError::InvalidUtf8 { type_name } => {
                write!(f, "invalid UTF-8 in {}", type_name)
            }
            CodecError::InvalidAddress(msg) => write!(f, "invalid address: {}", msg),
            CodecError::ValueMismatch {
                type_name,
                value_kind,
            } => write!(f, "cannot encode {} value as {}", value_kind, type_name),
            CodecError::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for CodecError {}
