pub mod error;
pub mod traits;
pub mod types;

pub use error::UploadError;
pub use traits::{FileInput, Transport, TransportResponse};
pub use types::{
    FileHandle, FileSelection, FormEntry, FormPayload, UploadOutcome, DEFAULT_ENDPOINT,
    FILE_FIELD,
};
