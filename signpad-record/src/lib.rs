//! The persisted policy acceptance record, shared between the signing form and the admin listing.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One accepted policy, as appended to the record store.
///
/// Field names are serialized in camelCase, so records written by other frontends of the same store
/// can be read back.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyAcceptance {
   /// Milliseconds since the Unix epoch at submission time, as a decimal string.
   pub id: String,
   pub full_name: String,
   pub identification_number: String,
   /// The signature's `data:image/png;base64,...` URL, stored verbatim.
   pub signature: String,
   /// ISO 8601 UTC timestamp with millisecond precision.
   pub timestamp: String,
}

impl PolicyAcceptance {
   /// Creates a record submitted at the given instant.
   pub fn new(
      full_name: String,
      identification_number: String,
      signature: String,
      submitted_at: DateTime<Utc>,
   ) -> Self {
      Self {
         id: submitted_at.timestamp_millis().to_string(),
         full_name,
         identification_number,
         signature,
         timestamp: submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true),
      }
   }

   /// Creates a record submitted right now.
   pub fn now(full_name: String, identification_number: String, signature: String) -> Self {
      Self::new(full_name, identification_number, signature, Utc::now())
   }
}
