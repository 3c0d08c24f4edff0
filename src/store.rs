//! Append-only storage of accepted policies.

use std::path::{Path, PathBuf};

use signpad_record::PolicyAcceptance;

/// The name records are stored under.
pub const STORAGE_KEY: &str = "policyAcceptances";

/// A flat, append-only list of acceptance records.
pub trait RecordStore {
   fn append(&mut self, record: PolicyAcceptance) -> crate::Result<()>;

   /// Returns all records in the order they were appended.
   fn list(&self) -> crate::Result<Vec<PolicyAcceptance>>;
}

/// Records kept in memory for the lifetime of the store.
#[derive(Default)]
pub struct MemoryRecordStore {
   records: Vec<PolicyAcceptance>,
}

impl MemoryRecordStore {
   pub fn new() -> Self {
      Self::default()
   }
}

impl RecordStore for MemoryRecordStore {
   fn append(&mut self, record: PolicyAcceptance) -> crate::Result<()> {
      self.records.push(record);
      Ok(())
   }

   fn list(&self) -> crate::Result<Vec<PolicyAcceptance>> {
      Ok(self.records.clone())
   }
}

/// Records kept as a JSON array in `<directory>/policyAcceptances.json`.
pub struct FileRecordStore {
   path: PathBuf,
}

impl FileRecordStore {
   /// Opens the store in the given directory, creating the directory if needed. The file itself is
   /// only created on the first append.
   pub fn open(directory: &Path) -> crate::Result<Self> {
      std::fs::create_dir_all(directory)?;
      Ok(Self {
         path: directory.join(format!("{}.json", STORAGE_KEY)),
      })
   }

   pub fn path(&self) -> &Path {
      &self.path
   }

   fn read(&self) -> Vec<PolicyAcceptance> {
      let file = match std::fs::read_to_string(&self.path) {
         Ok(file) => file,
         Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
         Err(error) => {
            log::error!("error while reading {}: {}", self.path.display(), error);
            return Vec::new();
         }
      };
      match serde_json::from_str(&file) {
         Ok(records) => records,
         Err(error) => {
            log::error!("error while deserializing {}: {}", self.path.display(), error);
            Vec::new()
         }
      }
   }
}

impl RecordStore for FileRecordStore {
   fn append(&mut self, record: PolicyAcceptance) -> crate::Result<()> {
      let mut records = self.read();
      log::info!("storing acceptance {} ({} records so far)", record.id, records.len());
      records.push(record);
      std::fs::write(&self.path, serde_json::to_string(&records)?)?;
      Ok(())
   }

   /// Unreadable or malformed files list as empty.
   fn list(&self) -> crate::Result<Vec<PolicyAcceptance>> {
      Ok(self.read())
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   fn record(name: &str) -> PolicyAcceptance {
      PolicyAcceptance {
         id: "1".into(),
         full_name: name.into(),
         identification_number: "12345".into(),
         signature: "data:image/png;base64,AAAA".into(),
         timestamp: "2024-05-01T12:00:00.000Z".into(),
      }
   }

   #[test]
   fn memory_store_appends_in_order() {
      let mut store = MemoryRecordStore::new();
      store.append(record("a")).unwrap();
      store.append(record("b")).unwrap();
      let names: Vec<_> = store.list().unwrap().into_iter().map(|r| r.full_name).collect();
      assert_eq!(names, ["a", "b"]);
   }

   #[test]
   fn file_store_persists_across_instances() {
      let dir = tempfile::tempdir().unwrap();
      let mut store = FileRecordStore::open(dir.path()).unwrap();
      assert!(store.list().unwrap().is_empty());
      store.append(record("a")).unwrap();
      store.append(record("b")).unwrap();

      let reopened = FileRecordStore::open(dir.path()).unwrap();
      assert_eq!(reopened.path(), dir.path().join("policyAcceptances.json"));
      assert_eq!(reopened.list().unwrap(), vec![record("a"), record("b")]);
   }

   #[test]
   fn signatures_are_stored_verbatim() {
      let dir = tempfile::tempdir().unwrap();
      let mut store = FileRecordStore::open(dir.path()).unwrap();
      store.append(record("a")).unwrap();
      let file = std::fs::read_to_string(store.path()).unwrap();
      assert!(file.contains(r#""signature":"data:image/png;base64,AAAA""#));
      assert!(file.contains(r#""fullName":"a""#));
   }

   #[test]
   fn corrupt_file_lists_as_empty_and_is_replaced_on_append() {
      let dir = tempfile::tempdir().unwrap();
      let mut store = FileRecordStore::open(dir.path()).unwrap();
      std::fs::write(store.path(), "{ not json").unwrap();
      assert!(store.list().unwrap().is_empty());

      store.append(record("a")).unwrap();
      assert_eq!(store.list().unwrap(), vec![record("a")]);
   }
}
