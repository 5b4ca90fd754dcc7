//! Record fetching and normalization for the thesis search service.
//!
//! `ThesisSource` abstracts the transport (`HttpThesisSource` talks to
//! theses.fr), `RecordFetcher` owns the processed-identifier set and the
//! full-page refetch policy, and `extract` turns a raw page into `Thesis`
//! records.

pub mod extract;
pub mod fetcher;
pub mod source;

pub use extract::{extract_theses, SupervisedTheses, UNKNOWN_NAME, UNTITLED};
pub use fetcher::{RawPage, RecordFetcher};
pub use source::{HttpThesisSource, ThesisSource};
