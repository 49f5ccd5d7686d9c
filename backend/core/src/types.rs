use std::fmt;

use bytes::Bytes;
use serde::Serialize;

use crate::traits::FileInput;

/// Multipart field name every selected file is appended under.
pub const FILE_FIELD: &str = "file";

/// Default upload path on the server.
pub const DEFAULT_ENDPOINT: &str = "/f/";

/// A selected file: its name and binary content.
#[derive(Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub name: String,
    pub content: Bytes,
    /// Explicit content type. When `None` the transport guesses from `name`.
    pub content_type: Option<String>,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

// Content is elided; handles can carry megabytes.
impl fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileHandle")
            .field("name", &self.name)
            .field("len", &self.content.len())
            .field("content_type", &self.content_type)
            .finish()
    }
}

/// Ordered snapshot of the files selected at the moment of invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSelection {
    files: Vec<FileHandle>,
}

impl FileSelection {
    pub fn new(files: Vec<FileHandle>) -> Self {
        Self { files }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Snapshot whatever `input` currently holds.
    ///
    /// A missing input, or one with nothing selected, yields an empty
    /// selection rather than an error.
    pub fn from_input(input: Option<&dyn FileInput>) -> Self {
        match input {
            Some(input) => Self::new(input.selected_files()),
            None => Self::empty(),
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn total_bytes(&self) -> usize {
        self.files.iter().map(FileHandle::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileHandle> {
        self.files.iter()
    }
}

impl FromIterator<FileHandle> for FileSelection {
    fn from_iter<I: IntoIterator<Item = FileHandle>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// One named part of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormEntry {
    pub field: String,
    pub file: FileHandle,
}

/// Multipart payload built fresh for every invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPayload {
    entries: Vec<FormEntry>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every selected file under [`FILE_FIELD`], in selection order.
    pub fn from_selection(selection: &FileSelection) -> Self {
        let mut payload = Self::new();
        for file in selection.iter() {
            payload.append(FILE_FIELD, file.clone());
        }
        payload
    }

    /// Append a part. Repeated field names are kept, not replaced.
    pub fn append(&mut self, field: impl Into<String>, file: FileHandle) {
        self.entries.push(FormEntry {
            field: field.into(),
            file,
        });
    }

    pub fn entries(&self) -> &[FormEntry] {
        &self.entries
    }

    /// All files appended under `field`, in insertion order.
    pub fn get_all(&self, field: &str) -> Vec<&FileHandle> {
        self.entries
            .iter()
            .filter(|entry| entry.field == field)
            .map(|entry| &entry.file)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What happened to one upload invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UploadOutcome {
    /// The server answered with a 2xx status.
    Success { status: u16 },
    /// The server answered with any other status.
    Failure { status: u16, diagnostic: String },
    /// No response arrived. Only produced when transport errors are logged
    /// rather than propagated.
    TransportFailed { error: String },
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Success { status } | Self::Failure { status, .. } => Some(*status),
            Self::TransportFailed { .. } => None,
        }
    }
}
