//! Record fetcher — single query plus one full-page refetch, with processed tracking.

use std::collections::HashSet;

use serde_json::Value;
use tracing::{info, warn};

use crate::source::ThesisSource;

/// A search response known to hold every thesis the service reported.
#[derive(Debug, Clone)]
pub struct RawPage {
    pub total_hits: u64,
    pub body: Value,
}

impl RawPage {
    /// Thesis records of the page; empty when the field is missing or malformed.
    pub fn records(&self) -> &[Value] {
        self.body
            .get("theses")
            .and_then(|t| t.as_array())
            .map(|t| t.as_slice())
            .unwrap_or(&[])
    }
}

/// Fetches the theses directed by a person, at most once per identifier.
pub struct RecordFetcher<S> {
    source: S,
    page_size: u64,
    processed: HashSet<String>,
}

impl<S: ThesisSource> RecordFetcher<S> {
    pub fn new(source: S, page_size: u64) -> Self {
        Self {
            source,
            page_size,
            processed: HashSet::new(),
        }
    }

    pub fn is_processed(&self, person_id: &str) -> bool {
        self.processed.contains(person_id)
    }

    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }

    /// Fetch every thesis directed by `person_id`.
    ///
    /// Returns `None` for an already processed identifier, an upstream or
    /// transport failure, or zero hits. The identifier is marked processed in
    /// every case except the first, so it is never queried twice.
    pub async fn fetch(&mut self, person_id: &str) -> Option<RawPage> {
        if self.is_processed(person_id) {
            return None;
        }

        info!("Fetching theses directed by {}", person_id);
        let page = self.fetch_all(person_id).await;
        self.processed.insert(person_id.to_string());
        page
    }

    async fn fetch_all(&self, person_id: &str) -> Option<RawPage> {
        let first = match self.source.search_by_director(person_id, None).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Fetch failed for {}: {}", person_id, e);
                return None;
            }
        };

        let total_hits = total_hits(&first);
        if total_hits == 0 {
            warn!("No thesis found for {}", person_id);
            return None;
        }

        if total_hits <= self.page_size {
            return Some(RawPage {
                total_hits,
                body: first,
            });
        }

        info!("Retrieving all {} theses for {}", total_hits, person_id);
        match self
            .source
            .search_by_director(person_id, Some(total_hits))
            .await
        {
            Ok(full) => Some(RawPage {
                total_hits,
                body: full,
            }),
            Err(e) => {
                warn!(
                    "Full refetch failed for {}: {}; keeping the first {} results",
                    person_id, e, self.page_size
                );
                Some(RawPage {
                    total_hits,
                    body: first,
                })
            }
        }
    }
}

fn total_hits(body: &Value) -> u64 {
    body.get("totalHits").and_then(|t| t.as_u64()).unwrap_or(0)
}
