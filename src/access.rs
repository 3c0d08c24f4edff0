//! Who may use the signing form.

/// Decides whether a signed-in user may reach the form at all.
pub trait AccessGate {
   fn is_authorized(&self, email: &str) -> bool;
}

/// Grants access to an exact list of e-mail addresses.
#[derive(Clone, Debug, Default)]
pub struct AllowList {
   emails: Vec<String>,
}

impl AllowList {
   pub fn new(emails: impl IntoIterator<Item = String>) -> Self {
      Self {
         emails: emails.into_iter().collect(),
      }
   }

   /// Fails with [`crate::Error::NotAuthorized`] unless `email` is on the list.
   pub fn check(&self, email: &str) -> crate::Result<()> {
      if self.is_authorized(email) {
         Ok(())
      } else {
         log::warn!("refusing access to {}", email);
         Err(crate::Error::NotAuthorized {
            email: email.to_owned(),
         })
      }
   }
}

impl AccessGate for AllowList {
   fn is_authorized(&self, email: &str) -> bool {
      self.emails.iter().any(|allowed| allowed == email)
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn only_listed_emails_pass() {
      let list = AllowList::new(vec!["ana@example.com".to_owned()]);
      assert!(list.is_authorized("ana@example.com"));
      assert!(!list.is_authorized("ANA@example.com"));
      assert!(!list.is_authorized("bob@example.com"));
      assert!(list.check("ana@example.com").is_ok());
      assert!(matches!(
         list.check("bob@example.com"),
         Err(crate::Error::NotAuthorized { email }) if email == "bob@example.com"
      ));
   }

   #[test]
   fn empty_list_denies_everyone() {
      assert!(!AllowList::default().is_authorized(""));
   }
}
