//! Generated header lifecycle: delimiter profiles and the header codec.

pub mod codec;
pub mod delimiter;

pub use codec::{inject, render, strip, GitMetadataRecord, HeaderField, TIMESTAMP_FORMAT};
pub use delimiter::{DelimiterCatalog, DelimiterProfile};
