use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Encode error: {0}")]
    EncodeError(String),

    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    #[error("Conversion cancelled")]
    Cancelled,

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Generates factory methods for [`ConvertError`] variants that wrap a `String`.
macro_rules! error_constructors {
    ($(
        $(#[doc = $doc:expr])*
        $method:ident => $variant:ident
    ),* $(,)?) => {
        impl ConvertError {
            $(
                $(#[doc = $doc])*
                pub fn $method(msg: impl Into<String>) -> Self {
                    Self::$variant(msg.into())
                }
            )*
        }
    };
}

error_constructors! {
    /// Create a configuration error.
    config => ConfigError,
    /// Create a decode error.
    decode => DecodeError,
    /// Create an encode error.
    encode => EncodeError,
    /// Create an unsupported type error.
    unsupported_type => UnsupportedType,
    /// Create a cache error.
    cache => CacheError,
}

impl ConvertError {
    /// Whether this error came from the decode stage.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::DecodeError(_))
    }

    /// Whether this error came from the encode stage.
    pub fn is_encode(&self) -> bool {
        matches!(self, Self::EncodeError(_))
    }
}

impl From<serde_json::Error> for ConvertError {
    fn from(e: serde_json::Error) -> Self {
        Self::CacheError(e.to_string())
    }
}

impl From<serde_yml::Error> for ConvertError {
    fn from(e: serde_yml::Error) -> Self {
        Self::ConfigError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
