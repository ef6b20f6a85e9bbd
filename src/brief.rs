//! Display summaries joining a process with its work and project.
use crate::cache::EntityCache;
use crate::model::RequestElement;
use crate::steps::StepGraph;
use serde::Serialize;

const AUTHOR_FIELDS: &[&str] = &["authorName", "artist", "composer"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Brief {
    pub header: String,
    pub subheader: String,
    pub body: String,
    pub id: u32,
    /// False when the process points at a work or project that was not loaded.
    pub selectable: bool,
}

/// Project every cached process into a brief.
///
/// Returns `None` when any cache is absent: the caller is not ready yet, which
/// is different from having nothing to show.
pub fn project(
    processes: Option<&EntityCache>,
    works: Option<&EntityCache>,
    projects: Option<&EntityCache>,
    steps: &StepGraph,
) -> Option<Vec<Brief>> {
    let (processes, works, projects) = (processes?, works?, projects?);
    let briefs = processes
        .values()
        .map(|process| brief_for(process, works, projects, steps))
        .collect();
    Some(briefs)
}

fn brief_for(
    process: &RequestElement,
    works: &EntityCache,
    projects: &EntityCache,
    steps: &StepGraph,
) -> Brief {
    let work = process.work_id().and_then(|id| works.get(&id));
    let project = process.project_id().and_then(|id| projects.get(&id));
    if work.is_none() || project.is_none() {
        tracing::warn!(
            process = ?process.id,
            "process references a work or project that is not cached"
        );
    }

    let department = project
        .and_then(|project| project.text("department"))
        .unwrap_or_default();
    let work_type = work
        .and_then(RequestElement::element_type)
        .unwrap_or_default();
    let step_name = process.step().unwrap_or_default();
    let received = received_date(process, &step_name, steps);
    let title = work
        .and_then(RequestElement::title)
        .unwrap_or_else(|| "untitled".to_string());
    let author = work
        .and_then(|work| AUTHOR_FIELDS.iter().find_map(|field| work.text(field)))
        .unwrap_or_else(|| "unknown artist".to_string());

    Brief {
        header: format!("{department} {work_type} Process"),
        subheader: format!(
            "submitted to {step_name} on {}",
            received.as_deref().unwrap_or("an unknown date")
        ),
        body: format!("{title} - {author}"),
        id: process.id.unwrap_or_default(),
        selectable: work.is_some() && project.is_some(),
    }
}

/// The date a process arrived at its current step: the submission date the
/// previous step recorded.
fn received_date(process: &RequestElement, step_name: &str, steps: &StepGraph) -> Option<String> {
    let previous = steps.previous_step(step_name).ok().flatten()?;
    process.text(&previous.submission_date_field_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ElementKind;
    use crate::steps::tests::sample_graph;

    fn caches() -> (EntityCache, EntityCache, EntityCache) {
        let processes = EntityCache::from_elements(
            ElementKind::Process,
            vec![RequestElement::with_id(1)
                .field("workId", "10")
                .field("projectId", "100")
                .field("step", "Intake")],
        );
        let works = EntityCache::from_elements(
            ElementKind::Work,
            vec![RequestElement::with_id(10)
                .field("Title", "Song A")
                .field("type", "Music")],
        );
        let projects = EntityCache::from_elements(
            ElementKind::Project,
            vec![RequestElement::with_id(100).field("department", "Film")],
        );
        (processes, works, projects)
    }

    #[test]
    fn projects_a_single_process_into_a_brief() {
        let (processes, works, projects) = caches();
        let briefs = project(Some(&processes), Some(&works), Some(&projects), &sample_graph())
            .expect("caches loaded");
        assert_eq!(
            briefs,
            vec![Brief {
                header: "Film Music Process".to_string(),
                subheader: "submitted to Intake on an unknown date".to_string(),
                body: "Song A - unknown artist".to_string(),
                id: 1,
                selectable: true,
            }]
        );
    }

    #[test]
    fn absent_cache_means_not_ready() {
        let (processes, works, _) = caches();
        assert!(project(Some(&processes), Some(&works), None, &sample_graph()).is_none());
        assert!(project(None, Some(&works), None, &sample_graph()).is_none());
    }

    #[test]
    fn received_date_comes_from_previous_step_and_author_priority_holds() {
        let (_, _, projects) = caches();
        let processes = EntityCache::from_elements(
            ElementKind::Process,
            vec![
                RequestElement::with_id(2)
                    .field("workId", "10")
                    .field("projectId", "100")
                    .field("step", "Review")
                    .field("intakeSubmissionDate", "03/14/2024"),
                RequestElement::with_id(3)
                    .field("workId", "99")
                    .field("projectId", "100")
                    .field("step", "Review"),
            ],
        );
        let works = EntityCache::from_elements(
            ElementKind::Work,
            vec![RequestElement::with_id(10)
                .field("Title", "Song A")
                .field("composer", "Bach")
                .field("artist", "Glenn Gould")],
        );
        let briefs = project(Some(&processes), Some(&works), Some(&projects), &sample_graph())
            .expect("caches loaded");
        assert_eq!(briefs.len(), processes.len());
        assert_eq!(briefs[0].subheader, "submitted to Review on 03/14/2024");
        assert_eq!(briefs[0].body, "Song A - Glenn Gould");
        assert!(!briefs[1].selectable);
        assert_eq!(briefs[1].body, "untitled - unknown artist");
    }
}
