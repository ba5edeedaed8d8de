//! In-memory adapters for development and testing

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value as JsonValue;
use uuid::Uuid;

use super::clock::ServerClock;
use super::secret::{check_secret_strength, hash_secret, verify_secret_hash};
use crate::domain::result::{Error, Result};
use crate::domain::Account;
use crate::ports::document_db::resolve_fields;
use crate::ports::{Document, DocumentDatabase, Fields, IdentityProvider};

/// In-memory document database
///
/// Documents of each collection are kept in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryDocumentDatabase {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    clock: ServerClock,
}

impl InMemoryDocumentDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection
    pub fn len(&self, collection: &str) -> Result<usize> {
        let collections = self
            .collections
            .read()
            .map_err(|e| Error::storage(e.to_string()))?;
        Ok(collections.get(collection).map(Vec::len).unwrap_or(0))
    }
}

impl DocumentDatabase for InMemoryDocumentDatabase {
    fn name(&self) -> &str {
        "memory"
    }

    fn insert(&self, collection: &str, fields: Fields) -> Result<String> {
        let id = Uuid::new_v4().to_string();

        let mut collections = self
            .collections
            .write()
            .map_err(|e| Error::storage(e.to_string()))?;
        let doc = Document::new(id.clone(), resolve_fields(fields, self.clock.now()));
        collections
            .entry(collection.to_string())
            .or_default()
            .push(doc);
        Ok(id)
    }

    fn get_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let collections = self
            .collections
            .read()
            .map_err(|e| Error::storage(e.to_string()))?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned())
    }

    fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &JsonValue,
    ) -> Result<Vec<Document>> {
        let collections = self
            .collections
            .read()
            .map_err(|e| Error::storage(e.to_string()))?;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| d.field_equals(field, value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn update_fields(&self, collection: &str, id: &str, fields: Fields) -> Result<()> {
        let mut collections = self
            .collections
            .write()
            .map_err(|e| Error::storage(e.to_string()))?;
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| Error::not_found(format!("{}/{}", collection, id)))?;

        // Stamped while the write lock is held, so timestamps commit in order
        doc.fields.extend(resolve_fields(fields, self.clock.now()));
        Ok(())
    }

    fn delete_by_id(&self, collection: &str, id: &str) -> Result<()> {
        let mut collections = self
            .collections
            .write()
            .map_err(|e| Error::storage(e.to_string()))?;
        if let Some(docs) = collections.get_mut(collection) {
            docs.retain(|d| d.id != id);
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct StoredAccount {
    account: Account,
    secret_hash: String,
}

/// In-memory identity provider
#[derive(Debug, Default)]
pub struct InMemoryIdentityProvider {
    accounts: RwLock<HashMap<String, StoredAccount>>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityProvider for InMemoryIdentityProvider {
    fn name(&self) -> &str {
        "memory"
    }

    fn find_by_email(&self, email: &str) -> Result<Account> {
        let accounts = self
            .accounts
            .read()
            .map_err(|e| Error::storage(e.to_string()))?;
        accounts
            .get(email)
            .map(|stored| stored.account.clone())
            .ok_or_else(|| Error::not_found(format!("account {}", email)))
    }

    fn create_account(&self, email: &str, secret: &str) -> Result<Account> {
        check_secret_strength(secret)?;

        let mut accounts = self
            .accounts
            .write()
            .map_err(|e| Error::storage(e.to_string()))?;
        if accounts.contains_key(email) {
            return Err(Error::already_exists(format!("account {}", email)));
        }

        let account = Account::new(Uuid::new_v4().to_string(), email);
        accounts.insert(
            email.to_string(),
            StoredAccount {
                account: account.clone(),
                secret_hash: hash_secret(secret)?,
            },
        );
        Ok(account)
    }

    fn verify_secret(&self, account_id: &str, secret: &str) -> Result<bool> {
        let accounts = self
            .accounts
            .read()
            .map_err(|e| Error::storage(e.to_string()))?;
        let stored = accounts
            .values()
            .find(|s| s.account.id == account_id)
            .ok_or_else(|| Error::not_found(format!("account {}", account_id)))?;
        verify_secret_hash(secret, &stored.secret_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::FieldValue;
    use serde_json::json;

    fn fields(pairs: &[(&str, FieldValue)]) -> Fields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_insert_assigns_unique_ids() {
        let db = InMemoryDocumentDatabase::new();
        let a = db.insert("tasks", fields(&[("title", "a".into())])).unwrap();
        let b = db.insert("tasks", fields(&[("title", "b".into())])).unwrap();
        assert_ne!(a, b);
        assert_eq!(db.len("tasks").unwrap(), 2);
    }

    #[test]
    fn test_update_merges_fields() {
        let db = InMemoryDocumentDatabase::new();
        let id = db
            .insert(
                "tasks",
                fields(&[("title", "a".into()), ("description", "keep".into())]),
            )
            .unwrap();

        db.update_fields("tasks", &id, fields(&[("title", "b".into())]))
            .unwrap();

        let doc = db.get_by_id("tasks", &id).unwrap().unwrap();
        assert_eq!(doc.fields["title"], json!("b"));
        assert_eq!(doc.fields["description"], json!("keep"));
    }

    #[test]
    fn test_update_missing_document() {
        let db = InMemoryDocumentDatabase::new();
        let err = db
            .update_fields("tasks", "nope", fields(&[("title", "b".into())]))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_query_by_field_keeps_insertion_order() {
        let db = InMemoryDocumentDatabase::new();
        let first = db
            .insert("tasks", fields(&[("user_uid", "u1".into())]))
            .unwrap();
        db.insert("tasks", fields(&[("user_uid", "u2".into())]))
            .unwrap();
        let third = db
            .insert("tasks", fields(&[("user_uid", "u1".into())]))
            .unwrap();

        let docs = db.query_by_field("tasks", "user_uid", &json!("u1")).unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d.id.clone()).collect();
        assert_eq!(ids, vec![first, third]);
    }

    #[test]
    fn test_delete_absent_is_ok() {
        let db = InMemoryDocumentDatabase::new();
        assert!(db.delete_by_id("tasks", "ghost").is_ok());
    }

    #[test]
    fn test_identity_register_and_find() {
        let idp = InMemoryIdentityProvider::new();
        let created = idp.create_account("a@b.co", "secret1").unwrap();
        let found = idp.find_by_email("a@b.co").unwrap();
        assert_eq!(created.id, found.id);

        assert!(matches!(
            idp.create_account("a@b.co", "secret2"),
            Err(Error::AlreadyExists(_))
        ));
        assert!(matches!(
            idp.find_by_email("x@y.co"),
            Err(Error::NotFound(_))
        ));
        assert!(idp.verify_secret(&created.id, "secret1").unwrap());
        assert!(!idp.verify_secret(&created.id, "secret2").unwrap());
    }
}
