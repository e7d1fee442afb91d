use std::{error, fmt, io};

/// An error.
pub struct Error(String);

/// A result.
pub type Result<T> = ::std::result::Result<T, Error>;

impl Error {
    #[inline]
    pub fn new<T: ToString>(message: T) -> Error {
        Error(message.to_string())
    }
}

impl fmt::Debug for Error {
    #[inline]
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(formatter)
    }
}

impl fmt::Display for Error {
    #[inline]
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(formatter)
    }
}

impl error::Error for Error {}

macro_rules! convert(
    ($($kind:ty),*) => ($(
        impl From<$kind> for Error {
            #[inline]
            fn from(error: $kind) -> Error {
                Error::new(error)
            }
        }
    )*);
);

convert!(io::Error, ::serde_json::Error, ::toml::de::Error);
