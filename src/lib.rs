//! Policy acceptance with a handwritten signature.
//!
//! The heart of the crate is [`surface::SignatureSurface`], a freehand drawing surface that reports
//! its contents to a [`form::PolicyForm`] as a PNG data URL. Accepted forms are appended to a
//! [`store::RecordStore`].

pub mod access;
pub mod cli;
pub mod config;
mod errors;
pub mod form;
pub mod image_coder;
pub mod store;
pub mod surface;
pub mod theme;

pub use errors::*;
pub use signpad_record::PolicyAcceptance;
