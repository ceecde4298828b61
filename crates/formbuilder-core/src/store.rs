//! Form Store - persistence abstraction for form definitions
//!
//! Every transport handler goes through [`FormRepository`]. Two backends
//! exist: the process-local [`InMemoryFormStore`] and the Prompt.io backed
//! [`RemoteFormStore`](crate::sync::RemoteFormStore).

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::aggregates::{sample_forms, Form, FormDraft, FormId, FormPatch};
use crate::{FormsError, Result};

/// Which backend a repository writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Local,
    Vendor,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Vendor => write!(f, "vendor"),
        }
    }
}

/// Form repository
#[async_trait]
pub trait FormRepository: Send + Sync {
    /// All forms in insertion order
    async fn list(&self) -> Result<Vec<Form>>;

    /// Form by id
    async fn get(&self, id: FormId) -> Result<Form>;

    /// Validate and store a new form, assigning the next id
    async fn create(&self, draft: FormDraft) -> Result<Form>;

    /// Merge a patch over an existing form
    async fn update(&self, id: FormId, patch: FormPatch) -> Result<Form>;

    /// Remove a form; deleting an absent id is `NotFound`
    async fn delete(&self, id: FormId) -> Result<()>;

    /// Backend kind, for diagnostics
    fn backend(&self) -> StoreBackend;
}

/// In-memory form store.
///
/// Ids are allocated from a high-water mark that only grows, so an id is
/// never handed out twice even after the form holding it is deleted.
pub struct InMemoryFormStore {
    inner: RwLock<StoreInner>,
}

struct StoreInner {
    // Ids grow with insertion, so key order is insertion order.
    forms: BTreeMap<FormId, Form>,
    last_id: FormId,
}

impl InMemoryFormStore {
    pub fn new() -> Self {
        Self::with_forms(Vec::new())
    }

    /// Store seeded with the Contact and Survey demo forms (ids 1 and 2).
    pub fn with_sample_forms() -> Self {
        Self::with_forms(sample_forms(Utc::now()))
    }

    pub fn with_forms(forms: Vec<Form>) -> Self {
        let last_id = forms.iter().map(|f| f.id).max().unwrap_or(0);
        let forms = forms.into_iter().map(|f| (f.id, f)).collect();
        Self {
            inner: RwLock::new(StoreInner { forms, last_id }),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryFormStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FormRepository for InMemoryFormStore {
    async fn list(&self) -> Result<Vec<Form>> {
        Ok(self.inner.read().forms.values().cloned().collect())
    }

    async fn get(&self, id: FormId) -> Result<Form> {
        self.inner
            .read()
            .forms
            .get(&id)
            .cloned()
            .ok_or(FormsError::NotFound(id))
    }

    async fn create(&self, draft: FormDraft) -> Result<Form> {
        let draft = draft.validate()?;

        // Allocation and insert share one write guard.
        let mut inner = self.inner.write();
        let id = inner.last_id + 1;
        let form = Form::from_draft(id, draft, Utc::now());
        inner.last_id = id;
        inner.forms.insert(id, form.clone());

        tracing::info!(form_id = id, title = %form.title, "form created");
        Ok(form)
    }

    async fn update(&self, id: FormId, patch: FormPatch) -> Result<Form> {
        let patch = patch.validate()?;

        let mut inner = self.inner.write();
        let form = inner.forms.get_mut(&id).ok_or(FormsError::NotFound(id))?;
        form.apply(patch, Utc::now());

        tracing::info!(form_id = id, "form updated");
        Ok(form.clone())
    }

    async fn delete(&self, id: FormId) -> Result<()> {
        self.inner
            .write()
            .forms
            .remove(&id)
            .map(|_| tracing::info!(form_id = id, "form deleted"))
            .ok_or(FormsError::NotFound(id))
    }

    fn backend(&self) -> StoreBackend {
        StoreBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{Field, FieldType};
    use std::sync::Arc;

    fn contact_draft() -> FormDraft {
        FormDraft {
            title: "Newsletter".into(),
            description: "Join the list".into(),
            fields: vec![Field::new("email", FieldType::Email, "Email").required()],
            callback_url: Some("https://example.com/hook".into()),
        }
    }

    #[tokio::test]
    async fn test_seeded_store_lists_in_order() {
        let store = InMemoryFormStore::with_sample_forms();
        let forms = store.list().await.unwrap();
        let ids: Vec<_> = forms.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(forms[0].title, "Contact Form");
        assert_eq!(forms[1].title, "Survey Form");
    }

    #[tokio::test]
    async fn test_ids_increase_across_deletes() {
        let store = InMemoryFormStore::with_sample_forms();

        let third = store.create(FormDraft::new("Third")).await.unwrap();
        assert_eq!(third.id, 3);

        store.delete(3).await.unwrap();
        let fourth = store.create(FormDraft::new("Fourth")).await.unwrap();
        assert_eq!(fourth.id, 4);

        store.delete(1).await.unwrap();
        let fifth = store.create(FormDraft::new("Fifth")).await.unwrap();
        assert_eq!(fifth.id, 5);
    }

    #[tokio::test]
    async fn test_empty_store_starts_at_one() {
        let store = InMemoryFormStore::new();
        assert!(store.is_empty());
        assert_eq!(store.create(FormDraft::new("First")).await.unwrap().id, 1);
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let store = InMemoryFormStore::with_sample_forms();
        let draft = contact_draft();

        let created = store.create(draft.clone()).await.unwrap();
        let fetched = store.get(created.id).await.unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.title, draft.title);
        assert_eq!(fetched.description, draft.description);
        assert_eq!(fetched.fields, draft.fields);
        assert_eq!(fetched.callback_url, draft.callback_url);
        assert!(fetched.updated_at.is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_missing_title() {
        let store = InMemoryFormStore::with_sample_forms();
        let err = store.create(FormDraft::default()).await.unwrap_err();
        assert!(matches!(err, FormsError::Validation(_)));
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_is_not_found_the_second_time() {
        let store = InMemoryFormStore::with_sample_forms();

        store.delete(2).await.unwrap();
        assert!(matches!(store.get(2).await, Err(FormsError::NotFound(2))));
        assert!(matches!(store.delete(2).await, Err(FormsError::NotFound(2))));
        assert!(matches!(store.delete(99).await, Err(FormsError::NotFound(99))));

        let remaining: Vec<_> = store.list().await.unwrap().into_iter().map(|f| f.id).collect();
        assert_eq!(remaining, vec![1]);
    }

    #[tokio::test]
    async fn test_update_preserves_identity_and_refreshes_timestamp() {
        let store = InMemoryFormStore::with_sample_forms();
        let before = store.get(1).await.unwrap();

        let first = store
            .update(1, FormPatch { title: Some("Contact Us".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(first.id, before.id);
        assert_eq!(first.created_at, before.created_at);
        assert_eq!(first.title, "Contact Us");
        let first_stamp = first.updated_at.expect("updated_at set");

        let second = store
            .update(1, FormPatch { fields: Some(vec![]), ..Default::default() })
            .await
            .unwrap();
        assert!(second.fields.is_empty());
        assert!(second.updated_at.expect("updated_at set") >= first_stamp);
        assert_eq!(second.created_at, before.created_at);
    }

    #[tokio::test]
    async fn test_update_missing_form_is_not_found() {
        let store = InMemoryFormStore::with_sample_forms();
        let err = store.update(42, FormPatch::default()).await.unwrap_err();
        assert!(matches!(err, FormsError::NotFound(42)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_get_distinct_ids() {
        let store = Arc::new(InMemoryFormStore::with_sample_forms());

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.create(FormDraft::new(format!("Form {i}"))).await })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id);
        }
        ids.sort_unstable();
        assert_eq!(ids, (3..35).collect::<Vec<_>>());
    }
}
