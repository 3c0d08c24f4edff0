//! Error types.

use std::fmt;

/// A form field, as referenced by validation errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
   FullName,
   IdentificationNumber,
   Signature,
}

/// A single failed field check, with the message shown next to the field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
   pub field: Field,
   pub message: &'static str,
}

impl fmt::Display for FieldError {
   fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
      f.write_str(self.message)
   }
}

/// Joins field errors into one line for display.
struct FieldErrors<'a>(&'a [FieldError]);

impl fmt::Display for FieldErrors<'_> {
   fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
      for (i, error) in self.0.iter().enumerate() {
         if i > 0 {
            f.write_str(" ")?;
         }
         write!(f, "{}", error)?;
      }
      Ok(())
   }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
   #[error("input/output error: {0}")]
   Io(#[from] std::io::Error),

   #[error("image encoding failed: {0}")]
   Image(#[from] image::ImageError),

   #[error("JSON error: {0}")]
   Json(#[from] serde_json::Error),

   #[error("cannot read config: {0}")]
   TomlDe(#[from] toml::de::Error),

   #[error("cannot write config: {0}")]
   TomlSer(#[from] toml::ser::Error),

   #[error("invalid surface size {width}x{height}: both dimensions must be greater than zero")]
   InvalidSurfaceSize { width: u32, height: u32 },

   #[error("the form has errors: {}", FieldErrors(.errors))]
   InvalidForm { errors: Vec<FieldError> },

   #[error("{email} is not authorized to use this application")]
   NotAuthorized { email: String },

   #[error("the signature surface is unavailable")]
   SurfaceUnavailable,

   #[error("cannot determine where to store records")]
   NoStoreDirectory,
}

impl Error {
   /// Returns the field errors if this is a validation failure.
   pub fn field_errors(&self) -> &[FieldError] {
      match self {
         Error::InvalidForm { errors } => errors,
         _ => &[],
      }
   }
}

pub type Result<T> = std::result::Result<T, Error>;
