//! In-memory fakes for service and router tests

use std::sync::Mutex;

use async_trait::async_trait;

use crate::db::{SchoolStore, StoreError};
use crate::media::{ImageUpload, MediaError, MediaStore};
use crate::models::{NewSchool, School, SchoolForm, SchoolId};

#[derive(Default)]
struct State {
    table: bool,
    unavailable: bool,
    rows: Vec<School>,
    next_id: SchoolId,
    schema_calls: usize,
}

/// `SchoolStore` that behaves like a MySQL table held in memory
pub(crate) struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    fn new(table: bool, unavailable: bool) -> Self {
        Self {
            state: Mutex::new(State {
                table,
                unavailable,
                next_id: 1,
                ..State::default()
            }),
        }
    }

    pub(crate) fn with_table() -> Self {
        Self::new(true, false)
    }

    pub(crate) fn without_table() -> Self {
        Self::new(false, false)
    }

    /// Every call fails as if the server were unreachable
    pub(crate) fn unavailable() -> Self {
        Self::new(true, true)
    }

    /// Rows in insertion order
    pub(crate) fn rows(&self) -> Vec<School> {
        self.state.lock().unwrap().rows.clone()
    }

    pub(crate) fn schema_calls(&self) -> usize {
        self.state.lock().unwrap().schema_calls
    }

    fn with_rows<T>(&self, f: impl FnOnce(&mut State) -> T) -> Result<T, StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.unavailable {
            return Err(StoreError::Backend("connect ECONNREFUSED".into()));
        }
        if !state.table {
            return Err(StoreError::MissingTable { table: "schools" });
        }
        Ok(f(&mut state))
    }
}

#[async_trait]
impl SchoolStore for MemoryStore {
    async fn list(&self) -> Result<Vec<School>, StoreError> {
        self.with_rows(|state| state.rows.iter().rev().cloned().collect())
    }

    async fn contact_exists(&self, contact: &str) -> Result<bool, StoreError> {
        self.with_rows(|state| state.rows.iter().any(|s| s.contact == contact))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        self.with_rows(|state| state.rows.iter().any(|s| s.email == email))
    }

    async fn insert(
        &self,
        school: &NewSchool,
        image_path: Option<&str>,
    ) -> Result<SchoolId, StoreError> {
        self.with_rows(|state| {
            let id = state.next_id;
            state.next_id += 1;
            state.rows.push(School {
                id,
                name: school.name().to_owned(),
                address: school.address().to_owned(),
                city: school.city().to_owned(),
                state: school.state().to_owned(),
                contact: school.contact().to_owned(),
                email: school.email().to_owned(),
                image_path: image_path.map(str::to_owned),
                created_at: Some(chrono::Utc::now()),
            });
            id
        })
    }

    async fn set_image(&self, id: SchoolId, image_path: &str) -> Result<u64, StoreError> {
        self.with_rows(|state| {
            let mut touched = 0;
            for row in state.rows.iter_mut().filter(|s| s.id == id) {
                row.image_path = Some(image_path.to_owned());
                touched += 1;
            }
            touched
        })
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.unavailable {
            return Err(StoreError::Backend("connect ECONNREFUSED".into()));
        }
        state.table = true;
        state.schema_calls += 1;
        Ok(())
    }
}

/// Media store that always returns the same reference
pub(crate) struct FixedMedia {
    reference: String,
}

impl FixedMedia {
    pub(crate) fn new(reference: &str) -> Self {
        Self {
            reference: reference.to_owned(),
        }
    }
}

#[async_trait]
impl MediaStore for FixedMedia {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn store(&self, _image: &ImageUpload) -> Result<String, MediaError> {
        Ok(self.reference.clone())
    }
}

/// Media store whose uploads are always rejected
pub(crate) struct FailingMedia;

#[async_trait]
impl MediaStore for FailingMedia {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn store(&self, _image: &ImageUpload) -> Result<String, MediaError> {
        Err(MediaError::Rejected {
            status: 401,
            message: "Invalid Signature".into(),
        })
    }
}

/// A valid submission with the given unique fields
pub(crate) fn school_form(contact: &str, email: &str) -> SchoolForm {
    SchoolForm {
        name: "Green Valley High".into(),
        address: "123 Park Ave".into(),
        city: "Delhi".into(),
        state: "Delhi".into(),
        contact: contact.into(),
        email: email.into(),
    }
}
