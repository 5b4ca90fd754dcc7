//! Traversal engine — depth-bounded, deduplicating walk of the supervision graph.
//!
//! Each expanded person is fetched once, registered as a supervisor, and
//! every student with a resolvable identifier is recursed into, depth first,
//! in the order the upstream service lists the theses. Requests are issued
//! one at a time with a pause before each descent that will hit the network.

use std::future::Future;
use std::pin::Pin;

use tracing::{debug, info};

use genealogy_core::GenealogyConfig;
use genealogy_fetch::{extract_theses, RecordFetcher, ThesisSource};

use crate::pacing::{FixedDelay, Pacer};
use crate::store::GraphStore;

/// One discovery run. Owns its store; consumed by [`run`](Traversal::run).
pub struct Traversal<S, P = FixedDelay> {
    fetcher: RecordFetcher<S>,
    pacer: P,
    store: GraphStore,
    max_depth: u32,
}

impl<S: ThesisSource> Traversal<S, FixedDelay> {
    pub fn new(source: S, config: &GenealogyConfig) -> Self {
        Self::with_pacer(source, config, FixedDelay(config.request_delay))
    }
}

impl<S: ThesisSource, P: Pacer> Traversal<S, P> {
    pub fn with_pacer(source: S, config: &GenealogyConfig, pacer: P) -> Self {
        Self {
            fetcher: RecordFetcher::new(source, config.page_size),
            pacer,
            store: GraphStore::new(config.max_depth),
            max_depth: config.max_depth,
        }
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    /// Discover the graph rooted at `root_id` and hand back the filled store.
    pub async fn run(mut self, root_id: &str) -> GraphStore {
        info!(
            "Building genealogy from {} (max depth {})",
            root_id, self.max_depth
        );
        self.store.set_requested_root(root_id);
        self.traverse(root_id, 0).await;
        self.store
    }

    /// Expand `person_id` found at `depth`. A no-op past the depth budget or for
    /// an identifier already fetched.
    pub fn traverse<'a>(
        &'a mut self,
        person_id: &'a str,
        depth: u32,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
            if !self.should_expand(person_id, depth) {
                return;
            }

            let Some(page) = self.fetcher.fetch(person_id).await else {
                return;
            };
            let extracted = extract_theses(&page, person_id);
            if extracted.theses.is_empty() {
                return;
            }

            info!(
                "{}{}: {} thesis(es) directed",
                "  ".repeat(depth as usize),
                extracted.supervisor_name,
                extracted.theses.len()
            );

            self.store
                .upsert_supervisor(person_id, &extracted.supervisor_name);
            self.store.extend_theses(extracted.theses.iter().cloned());

            for thesis in &extracted.theses {
                let Some(student_id) = thesis.author_id.as_deref() else {
                    continue;
                };

                self.store.add_student(student_id, &thesis.author_name);
                self.store.add_edge(person_id, student_id);

                if self.should_expand(student_id, depth + 1) {
                    self.pacer.pause().await;
                    self.traverse(student_id, depth + 1).await;
                } else {
                    debug!("Not expanding {} at depth {}", student_id, depth + 1);
                }
            }
        })
    }

    fn should_expand(&self, person_id: &str, depth: u32) -> bool {
        depth <= self.max_depth && !self.fetcher.is_processed(person_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use genealogy_core::{Edge, Error, Result};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MapSource {
        pages: HashMap<String, Value>,
        calls: Mutex<Vec<String>>,
    }

    impl MapSource {
        fn with(mut self, id: &str, page: Value) -> Self {
            self.pages.insert(id.to_string(), page);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ThesisSource for MapSource {
        async fn search_by_director(&self, person_id: &str, _count: Option<u64>) -> Result<Value> {
            self.calls.lock().unwrap().push(person_id.to_string());
            self.pages
                .get(person_id)
                .cloned()
                .ok_or_else(|| Error::Upstream {
                    status: 404,
                    url: format!("mock://{}", person_id),
                })
        }
    }

    #[derive(Default)]
    struct CountingPacer(AtomicUsize);

    #[async_trait]
    impl Pacer for CountingPacer {
        async fn pause(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Page of theses directed by `sup`, one per listed student (`None` = no author).
    fn page(sup: &str, students: &[Option<&str>]) -> Value {
        let theses: Vec<Value> = students
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let mut t = json!({
                    "id": format!("{}-{}", sup, i),
                    "titrePrincipal": format!("Thesis {} of {}", i, sup),
                    "dateSoutenance": "2000",
                    "directeurs": [{ "ppn": sup, "prenom": "Dir", "nom": sup }],
                });
                if let Some(s) = s {
                    t["auteurs"] = json!([{ "ppn": s, "prenom": "Stu", "nom": s }]);
                }
                t
            })
            .collect();
        json!({ "totalHits": theses.len(), "theses": theses })
    }

    fn config(max_depth: u32) -> GenealogyConfig {
        GenealogyConfig::default()
            .with_max_depth(max_depth)
            .with_request_delay(std::time::Duration::ZERO)
    }

    #[tokio::test]
    async fn test_visited_person_is_noop() {
        let source = MapSource::default().with("1", page("1", &[Some("2")]));
        let mut traversal = Traversal::new(&source, &config(0));
        traversal.traverse("1", 0).await;
        let persons_before = traversal.store().summary();

        traversal.traverse("1", 0).await;

        assert_eq!(source.calls(), vec!["1"]);
        assert_eq!(traversal.store().summary(), persons_before);
    }

    #[tokio::test]
    async fn test_depth_zero_records_direct_students_only() {
        let source = MapSource::default()
            .with("1", page("1", &[Some("2"), None, Some("3")]))
            .with("2", page("2", &[Some("4")]));
        let store = Traversal::new(&source, &config(0)).run("1").await;

        assert_eq!(source.calls(), vec!["1"]);
        assert_eq!(store.edges(), vec![Edge::new("1", "2"), Edge::new("1", "3")]);
        assert!(store.person("4").is_none());
        assert_eq!(store.theses().len(), 3);
    }

    #[tokio::test]
    async fn test_depth_first_order() {
        let source = MapSource::default()
            .with("r", page("r", &[Some("a"), Some("b")]))
            .with("a", page("a", &[Some("a1")]))
            .with("b", page("b", &[Some("b1")]));
        let store = Traversal::new(&source, &config(3)).run("r").await;

        assert_eq!(source.calls(), vec!["r", "a", "a1", "b", "b1"]);
        assert_eq!(
            store.edges(),
            vec![
                Edge::new("r", "a"),
                Edge::new("a", "a1"),
                Edge::new("r", "b"),
                Edge::new("b", "b1"),
            ]
        );
        let thesis_ids: Vec<&str> = store.theses().iter().map(|t| t.thesis_id.as_str()).collect();
        assert_eq!(thesis_ids, vec!["r-0", "r-1", "a-0", "b-0"]);
    }

    #[tokio::test]
    async fn test_cycle_terminates_and_keeps_edge() {
        let source = MapSource::default()
            .with("1", page("1", &[Some("2")]))
            .with("2", page("2", &[Some("1")]));
        let store = Traversal::new(&source, &config(10)).run("1").await;

        assert_eq!(source.calls(), vec!["1", "2"]);
        assert_eq!(store.edges(), vec![Edge::new("1", "2"), Edge::new("2", "1")]);
        assert!(store.person("1").unwrap().is_supervisor);
        assert!(store.person("2").unwrap().is_supervisor);
    }

    #[tokio::test]
    async fn test_shared_student_expanded_once() {
        let source = MapSource::default()
            .with("r", page("r", &[Some("a"), Some("b")]))
            .with("a", page("a", &[Some("c")]))
            .with("b", page("b", &[Some("c")]))
            .with("c", page("c", &[Some("d")]));
        let store = Traversal::new(&source, &config(5)).run("r").await;

        assert_eq!(source.calls(), vec!["r", "a", "c", "d", "b"]);
        assert!(store.edges().contains(&Edge::new("b", "c")));
        assert_eq!(store.summary().total_edges, 5);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_a_leaf() {
        let source = MapSource::default().with("1", page("1", &[Some("2"), Some("3")]));
        let store = Traversal::new(&source, &config(2)).run("1").await;

        assert_eq!(source.calls(), vec!["1", "2", "3"]);
        assert!(!store.person("2").unwrap().is_supervisor);
        assert_eq!(store.summary().total_persons, 3);
    }

    #[tokio::test]
    async fn test_pause_only_before_network_descents() {
        let source = MapSource::default()
            .with("1", page("1", &[Some("2"), Some("2"), Some("3"), None]))
            .with("2", page("2", &[Some("5")]));
        let pacer = CountingPacer::default();
        let store = Traversal::with_pacer(&source, &config(1), &pacer).run("1").await;

        // "2" and "3" are fetched; the repeated "2" and "5" (depth 2) are not.
        assert_eq!(pacer.0.load(Ordering::SeqCst), 2);
        assert_eq!(source.calls(), vec!["1", "2", "3"]);
        assert_eq!(store.edges().len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_root_still_identified() {
        let source = MapSource::default();
        let store = Traversal::new(&source, &config(3)).run("42").await;

        assert!(store.is_empty());
        assert_eq!(store.export().metadata.root_person_id.as_deref(), Some("42"));
    }
}
