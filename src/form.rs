//! The policy acceptance form: identifying details plus the signature reported by a surface.

use std::cell::RefCell;
use std::rc::Rc;

use signpad_record::PolicyAcceptance;

use crate::errors::{Field, FieldError};
use crate::image_coder::ImageCoder;
use crate::store::RecordStore;
use crate::surface::SignatureSurface;
use crate::Error;

/// Owns the form's values. The signature field is shared with the surface's change callback,
/// obtained through [`PolicyForm::signature_sink`].
#[derive(Default)]
pub struct PolicyForm {
   pub full_name: String,
   pub identification_number: String,
   signature: Rc<RefCell<String>>,
}

impl PolicyForm {
   const MIN_FULL_NAME_LEN: usize = 2;
   const MIN_IDENTIFICATION_NUMBER_LEN: usize = 5;
   /// Anything this short cannot hold an actual image.
   const MIN_SIGNATURE_LEN: usize = 100;

   pub fn new() -> Self {
      Self::default()
   }

   /// Returns a callback that stores every value it receives as the form's signature. Pass this to
   /// [`SignatureSurface::new`].
   pub fn signature_sink(&self) -> impl FnMut(String) + 'static {
      let signature = Rc::clone(&self.signature);
      move |value| *signature.borrow_mut() = value
   }

   pub fn signature(&self) -> String {
      self.signature.borrow().clone()
   }

   /// Checks every field, collecting all failures.
   pub fn validate(&self) -> crate::Result<()> {
      let mut errors = Vec::new();
      if self.full_name.chars().count() < Self::MIN_FULL_NAME_LEN {
         errors.push(FieldError {
            field: Field::FullName,
            message: "Full name must be at least 2 characters.",
         });
      }
      if self.identification_number.chars().count() < Self::MIN_IDENTIFICATION_NUMBER_LEN {
         errors.push(FieldError {
            field: Field::IdentificationNumber,
            message: "Identification number must be at least 5 characters.",
         });
      }
      if !is_signature(&self.signature.borrow()) {
         errors.push(FieldError {
            field: Field::Signature,
            message: "A signature is required. Please draw your signature.",
         });
      }

      if errors.is_empty() {
         Ok(())
      } else {
         Err(Error::InvalidForm { errors })
      }
   }

   /// Validates the form and appends the resulting record to `store`.
   ///
   /// On success the form is reset, which also clears the surface, and the stored record is
   /// returned. On failure nothing changes.
   pub fn submit(
      &mut self,
      store: &mut dyn RecordStore,
      surface: &mut SignatureSurface,
   ) -> crate::Result<PolicyAcceptance> {
      self.validate()?;
      let record = PolicyAcceptance::now(
         self.full_name.clone(),
         self.identification_number.clone(),
         self.signature(),
      );
      store.append(record.clone())?;
      log::info!("policy accepted by {}", record.full_name);
      self.reset(surface);
      Ok(record)
   }

   /// Empties every field and the surface.
   pub fn reset(&mut self, surface: &mut SignatureSurface) {
      self.full_name.clear();
      self.identification_number.clear();
      self.signature.borrow_mut().clear();
      surface.clear();
   }
}

fn is_signature(value: &str) -> bool {
   value.starts_with(ImageCoder::PNG_DATA_URL_PREFIX) && value.len() > PolicyForm::MIN_SIGNATURE_LEN
}
