//! Resource catalog: upload and delete flows tying records to their files.
//!
//! Upload order matters: the extension check and file write happen before
//! any record is inserted, so a rejected upload mutates nothing. Deletion
//! removes the backing file best-effort and always proceeds to drop the
//! record.

use std::str::FromStr;
use std::sync::Arc;

use studyhub_core::error::CoreError;
use studyhub_core::traits::FileStore;

use crate::memory::MemoryStore;

/// The three kinds of uploadable resource, each with its own subfolder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Syllabus,
    Notes,
    Papers,
}

impl ResourceKind {
    /// Namespace in the file store.
    pub fn subfolder(self) -> &'static str {
        match self {
            ResourceKind::Syllabus => "syllabus",
            ResourceKind::Notes => "notes",
            ResourceKind::Papers => "papers",
        }
    }
}

impl FromStr for ResourceKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "syllabus" => Ok(ResourceKind::Syllabus),
            "notes" => Ok(ResourceKind::Notes),
            "papers" => Ok(ResourceKind::Papers),
            other => Err(CoreError::Validation(format!("invalid resource type: {other}"))),
        }
    }
}

/// Metadata accompanying an upload. `title` is used by notes (falling back
/// to the filename), `year` by question papers (falling back to "NA").
#[derive(Debug, Default, Clone)]
pub struct UploadMeta {
    pub semester: String,
    pub subject: String,
    pub title: Option<String>,
    pub year: Option<String>,
}

/// Couples the record store with the file store for resource CRUD.
pub struct ResourceCatalog {
    store: Arc<MemoryStore>,
    files: Arc<dyn FileStore>,
}

impl ResourceCatalog {
    pub fn new(store: Arc<MemoryStore>, files: Arc<dyn FileStore>) -> Self {
        Self { store, files }
    }

    /// Validate, persist the file, then insert the record. Returns the new
    /// record's id.
    pub async fn upload(
        &self,
        kind: ResourceKind,
        meta: UploadMeta,
        filename: &str,
        bytes: &[u8],
    ) -> Result<u64, CoreError> {
        if meta.semester.trim().is_empty() || meta.subject.trim().is_empty() {
            return Err(CoreError::Validation("semester and subject are required".into()));
        }
        self.files.save(kind.subfolder(), filename, bytes).await?;

        let id = match kind {
            ResourceKind::Syllabus => {
                self.store
                    .add_syllabus(&meta.semester, &meta.subject, filename)
                    .id
            }
            ResourceKind::Notes => {
                let title = meta
                    .title
                    .as_deref()
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or(filename);
                self.store
                    .add_note(&meta.semester, &meta.subject, title, filename)
                    .id
            }
            ResourceKind::Papers => {
                let year = meta
                    .year
                    .as_deref()
                    .filter(|y| !y.trim().is_empty())
                    .unwrap_or("NA");
                self.store
                    .add_paper(&meta.semester, &meta.subject, year, filename)
                    .id
            }
        };
        tracing::info!(kind = kind.subfolder(), id, filename, "resource uploaded");
        Ok(id)
    }

    /// Delete a resource record and, best-effort, its backing file. A
    /// missing file never blocks record deletion.
    pub async fn delete(&self, kind: ResourceKind, id: u64) -> Result<(), CoreError> {
        let filename = match kind {
            ResourceKind::Syllabus => self.store.remove_syllabus(id)?.filename,
            ResourceKind::Notes => self.store.remove_note(id)?.filename,
            ResourceKind::Papers => self.store.remove_paper(id)?.filename,
        };
        self.files.delete(kind.subfolder(), &filename).await;
        Ok(())
    }
}
