//! Identifier-indexed request element caches.
//!
//! Entries are keyed by the string form of their `Id` and keep load order so
//! list projections are stable. A [`CacheSet`] groups the process, work, and
//! project caches that were loaded together; it is always built off to the
//! side and published as one value.
use crate::error::WorkflowError;
use crate::model::{ElementKind, RequestElement};
use indexmap::IndexMap;

#[derive(Debug, Clone)]
pub struct EntityCache {
    kind: ElementKind,
    items: IndexMap<String, RequestElement>,
}

impl EntityCache {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            items: IndexMap::new(),
        }
    }

    pub fn from_elements(kind: ElementKind, elements: Vec<RequestElement>) -> Self {
        let mut cache = Self::new(kind);
        cache.load_all(elements);
        cache
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Replace the whole map. Elements without an `Id` cannot be keyed and are
    /// dropped.
    pub fn load_all(&mut self, elements: Vec<RequestElement>) {
        self.items.clear();
        for element in elements {
            match element.cache_key() {
                Some(key) => {
                    self.items.insert(key, element);
                }
                None => tracing::warn!(kind = %self.kind, "skipping cached element without Id"),
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&RequestElement> {
        self.items.get(id)
    }

    pub fn has(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// Upsert by `Id`; an existing entry keeps its position.
    pub fn replace(&mut self, element: RequestElement) -> Result<(), WorkflowError> {
        let key = element
            .cache_key()
            .ok_or(WorkflowError::MissingId { kind: self.kind })?;
        self.items.insert(key, element);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &RequestElement> {
        self.items.values()
    }

    /// A new cache holding only the entries matching `predicate`.
    pub fn filter(&self, predicate: impl Fn(&RequestElement) -> bool) -> EntityCache {
        EntityCache {
            kind: self.kind,
            items: self
                .items
                .iter()
                .filter(|(_, element)| predicate(element))
                .map(|(key, element)| (key.clone(), element.clone()))
                .collect(),
        }
    }
}

/// Processes with the works and projects they reference.
#[derive(Debug, Clone)]
pub struct CacheSet {
    pub processes: EntityCache,
    pub works: EntityCache,
    pub projects: EntityCache,
}

impl CacheSet {
    pub fn new(
        processes: Vec<RequestElement>,
        works: Vec<RequestElement>,
        projects: Vec<RequestElement>,
    ) -> Self {
        Self {
            processes: EntityCache::from_elements(ElementKind::Process, processes),
            works: EntityCache::from_elements(ElementKind::Work, works),
            projects: EntityCache::from_elements(ElementKind::Project, projects),
        }
    }

    pub fn cache(&self, kind: ElementKind) -> &EntityCache {
        match kind {
            ElementKind::Process => &self.processes,
            ElementKind::Work => &self.works,
            ElementKind::Project => &self.projects,
        }
    }

    pub fn cache_mut(&mut self, kind: ElementKind) -> &mut EntityCache {
        match kind {
            ElementKind::Process => &mut self.processes,
            ElementKind::Work => &mut self.works,
            ElementKind::Project => &mut self.projects,
        }
    }

    /// Resolve a process and the work and project it points at.
    pub fn resolve(
        &self,
        process_id: &str,
    ) -> Result<(&RequestElement, &RequestElement, &RequestElement), WorkflowError> {
        let process = self
            .processes
            .get(process_id)
            .ok_or_else(|| missing(ElementKind::Process, process_id))?;
        let work_id = process.work_id().ok_or_else(|| WorkflowError::MissingField {
            kind: ElementKind::Process,
            field: crate::model::FIELD_WORK_ID.to_string(),
        })?;
        let project_id = process
            .project_id()
            .ok_or_else(|| WorkflowError::MissingField {
                kind: ElementKind::Process,
                field: crate::model::FIELD_PROJECT_ID.to_string(),
            })?;
        let work = self
            .works
            .get(&work_id)
            .ok_or_else(|| missing(ElementKind::Work, &work_id))?;
        let project = self
            .projects
            .get(&project_id)
            .ok_or_else(|| missing(ElementKind::Project, &project_id))?;
        Ok((process, work, project))
    }
}

fn missing(kind: ElementKind, id: &str) -> WorkflowError {
    WorkflowError::MissingEntity {
        kind,
        id: id.to_string(),
    }
}

/// Numeric ids referenced by `field` across `elements`, deduplicated.
pub fn linked_ids(elements: &[RequestElement], field: &str) -> Vec<u32> {
    let mut ids: Vec<u32> = elements
        .iter()
        .filter_map(|element| element.text(field))
        .filter_map(|raw| raw.trim().parse().ok())
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FIELD_WORK_ID;

    fn process(id: u32, work: &str, project: &str) -> RequestElement {
        RequestElement::with_id(id)
            .field("workId", work)
            .field("projectId", project)
            .field("step", "Intake")
    }

    #[test]
    fn get_after_replace_returns_the_replaced_element() {
        let mut cache = EntityCache::new(ElementKind::Work);
        cache.load_all(vec![RequestElement::with_id(10).field("Title", "Song A")]);
        let updated = RequestElement::with_id(10).field("Title", "Song B");
        cache.replace(updated.clone()).expect("replace");
        assert_eq!(cache.get("10"), Some(&updated));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn replace_without_id_is_rejected() {
        let mut cache = EntityCache::new(ElementKind::Project);
        let err = cache.replace(RequestElement::new()).unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::MissingId {
                kind: ElementKind::Project
            }
        ));
    }

    #[test]
    fn load_all_replaces_previous_entries_and_keeps_order() {
        let mut cache = EntityCache::new(ElementKind::Process);
        cache.load_all(vec![process(1, "10", "100")]);
        cache.load_all(vec![
            process(3, "10", "100"),
            RequestElement::new(),
            process(2, "11", "100"),
        ]);
        assert!(!cache.has("1"));
        let ids: Vec<Option<u32>> = cache.values().map(|element| element.id).collect();
        assert_eq!(ids, vec![Some(3), Some(2)]);
    }

    #[test]
    fn resolve_fails_when_linked_work_is_missing() {
        let set = CacheSet::new(
            vec![process(1, "10", "100")],
            Vec::new(),
            vec![RequestElement::with_id(100)],
        );
        let err = set.resolve("1").unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::MissingEntity { kind: ElementKind::Work, ref id } if id == "10"
        ));
    }

    #[test]
    fn linked_ids_are_numeric_and_deduplicated() {
        let processes = vec![
            process(1, "10", "100"),
            process(2, "10", "100"),
            process(3, "x", "100"),
        ];
        assert_eq!(linked_ids(&processes, FIELD_WORK_ID), vec![10]);
    }
}
