//! In-memory storage for parsed workbooks and generated suggestions.
//!
//! Both maps are bounded LRU caches behind one mutex. A store is cheap to
//! clone and clones share their contents, so a service can hand copies to
//! worker threads. Eviction is silent: a looked-up id that has been evicted
//! is simply absent.
//!
//! Workbooks are held as `Arc<WorkbookModel>` so lookups hand out shared
//! references instead of deep copies.

use crate::config::StoreConfig;
use crate::model::WorkbookModel;
use crate::suggestion::Suggestion;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    pub workbooks: usize,
    pub suggestions: usize,
    pub workbook_capacity: usize,
    pub suggestion_capacity: usize,
}

#[derive(Debug, Clone)]
pub struct SuggestionStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug)]
struct Inner {
    workbooks: LruCache<String, Arc<WorkbookModel>>,
    suggestions: LruCache<String, Suggestion>,
}

impl SuggestionStore {
    /// Capacities of zero are raised to one.
    pub fn new(config: &StoreConfig) -> Self {
        let inner = Inner {
            workbooks: LruCache::new(non_zero(config.capacity)),
            suggestions: LruCache::new(non_zero(config.suggestion_capacity)),
        };
        SuggestionStore { inner: Arc::new(Mutex::new(inner)) }
    }

    /// Store a workbook under its id, replacing any previous entry.
    pub fn put_workbook(&self, workbook: WorkbookModel) -> Arc<WorkbookModel> {
        let workbook = Arc::new(workbook);
        let mut inner = self.lock();
        if let Some((evicted, _)) = inner.workbooks.push(workbook.id.clone(), Arc::clone(&workbook)) {
            if evicted != workbook.id {
                tracing::debug!(workbook_id = %evicted, "evicted workbook");
            }
        }
        workbook
    }

    pub fn get_workbook(&self, id: &str) -> Option<Arc<WorkbookModel>> {
        self.lock().workbooks.get(id).cloned()
    }

    /// Store suggestions under their ids. Later entries win on id collision.
    pub fn put_suggestions<'a>(&self, suggestions: impl IntoIterator<Item = &'a Suggestion>) {
        let mut inner = self.lock();
        for suggestion in suggestions {
            inner.suggestions.put(suggestion.id.clone(), suggestion.clone());
        }
    }

    pub fn get_suggestion(&self, id: &str) -> Option<Suggestion> {
        self.lock().suggestions.get(id).cloned()
    }

    pub fn stats(&self) -> StoreStats {
        let inner = self.lock();
        StoreStats {
            workbooks: inner.workbooks.len(),
            suggestions: inner.suggestions.len(),
            workbook_capacity: inner.workbooks.cap().get(),
            suggestion_capacity: inner.suggestions.cap().get(),
        }
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.workbooks.clear();
        inner.suggestions.clear();
    }

    // A panic while holding the lock cannot leave the caches half-updated, so
    // a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SuggestionStore {
    fn default() -> Self {
        SuggestionStore::new(&StoreConfig::default())
    }
}

fn non_zero(capacity: usize) -> NonZeroUsize {
    NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Summary;
    use crate::suggestion::DataMapping;
    use crate::viz::VizType;

    fn workbook(id: &str) -> WorkbookModel {
        WorkbookModel {
            id: id.into(),
            filename: format!("{id}.twb"),
            summary: Summary {
                name: id.into(),
                version: String::new(),
                worksheet_count: 0,
                dashboard_count: 0,
                story_count: 0,
            },
            worksheets: Vec::new(),
            datasources: Vec::new(),
        }
    }

    fn suggestion() -> Suggestion {
        Suggestion::new(VizType::PieChart, "Pie Chart for S".into(), "d", "r", 0.55, DataMapping::new(), "S", &[])
    }

    #[test]
    fn workbooks_round_trip_by_id() {
        let store = SuggestionStore::default();
        let stored = store.put_workbook(workbook("a"));
        let fetched = store.get_workbook("a").unwrap();
        assert!(Arc::ptr_eq(&stored, &fetched));
        assert!(store.get_workbook("b").is_none());
    }

    #[test]
    fn least_recently_used_workbook_is_evicted() {
        let store = SuggestionStore::new(&StoreConfig { capacity: 2, suggestion_capacity: 10 });
        store.put_workbook(workbook("a"));
        store.put_workbook(workbook("b"));
        assert!(store.get_workbook("a").is_some());
        store.put_workbook(workbook("c"));

        assert!(store.get_workbook("a").is_some());
        assert!(store.get_workbook("b").is_none());
        assert!(store.get_workbook("c").is_some());
        assert_eq!(store.stats().workbooks, 2);
    }

    #[test]
    fn suggestions_are_shared_between_clones() {
        let store = SuggestionStore::default();
        let other = store.clone();
        let s = suggestion();
        store.put_suggestions([&s]);
        assert_eq!(other.get_suggestion(&s.id), Some(s));
        assert!(other.get_suggestion("missing").is_none());
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let store = SuggestionStore::new(&StoreConfig { capacity: 0, suggestion_capacity: 0 });
        let stats = store.stats();
        assert_eq!((stats.workbook_capacity, stats.suggestion_capacity), (1, 1));
    }

    #[test]
    fn usable_from_many_threads() {
        let store = SuggestionStore::default();
        std::thread::scope(|scope| {
            for i in 0..4 {
                let store = store.clone();
                scope.spawn(move || {
                    store.put_workbook(workbook(&format!("wb{i}")));
                });
            }
        });
        assert_eq!(store.stats().workbooks, 4);
        store.clear();
        let expected = StoreStats { workbook_capacity: 100, suggestion_capacity: 10_000, ..StoreStats::default() };
        assert_eq!(store.stats(), expected);
    }
}
