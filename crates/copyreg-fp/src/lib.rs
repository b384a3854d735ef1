//! copyreg wire and file formats
//!
//! Response body of the external fingerprinting service and the corpus
//! snapshot files used for offline duplicate checks.

pub mod error;
pub mod json_format;
pub mod response;

pub use error::FormatError;
pub use json_format::{CorpusFile, CorpusFileMetadata, CorpusRecord, SNAPSHOT_VERSION};
pub use response::FingerprintResponse;
