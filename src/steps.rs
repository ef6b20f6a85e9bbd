//! The fixed approval sequence a process moves through.
//!
//! Steps are ordered by `order_id`, which must be contiguous so the successor
//! of a step is always `order_id + 1`. The graph is immutable once built.
use crate::error::WorkflowError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub name: String,
    pub order_id: u32,
    pub permitted_role: String,
    pub submitter_field_name: String,
    pub submission_date_field_name: String,
    pub view: String,
    /// Process fields filled in while the process sits at this step.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

impl Step {
    fn owns_field(&self, field_name: &str) -> bool {
        self.submitter_field_name == field_name
            || self.submission_date_field_name == field_name
            || self.fields.iter().any(|field| field == field_name)
    }
}

#[derive(Debug, Clone)]
pub struct StepGraph {
    steps: Vec<Step>,
}

impl StepGraph {
    /// Build a graph from configured steps, sorted by order id.
    ///
    /// Order ids must be unique and contiguous.
    pub fn new(mut steps: Vec<Step>) -> Result<Self, WorkflowError> {
        steps.sort_by_key(|step| step.order_id);
        for pair in steps.windows(2) {
            if pair[1].order_id != pair[0].order_id + 1 {
                return Err(WorkflowError::UnknownStepOrder(pair[0].order_id + 1));
            }
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn first_step(&self) -> Option<&Step> {
        self.steps.first()
    }

    pub fn step_by_name(&self, name: &str) -> Result<&Step, WorkflowError> {
        self.steps
            .iter()
            .find(|step| step.name == name)
            .ok_or_else(|| WorkflowError::UnknownStep(name.to_string()))
    }

    pub fn step_by_id(&self, order_id: u32) -> Result<&Step, WorkflowError> {
        self.steps
            .iter()
            .find(|step| step.order_id == order_id)
            .ok_or(WorkflowError::UnknownStepOrder(order_id))
    }

    /// The step after `current`; the terminal step has none.
    pub fn next_step(&self, current: &str) -> Result<&Step, WorkflowError> {
        let step = self.step_by_name(current)?;
        self.step_by_id(step.order_id + 1)
            .map_err(|_| WorkflowError::NoSuccessor(current.to_string()))
    }

    /// The step before `current`, or `None` for the first step.
    pub fn previous_step(&self, current: &str) -> Result<Option<&Step>, WorkflowError> {
        let step = self.step_by_name(current)?;
        match step.order_id.checked_sub(1) {
            Some(order_id) => Ok(self.step_by_id(order_id).ok()),
            None => Ok(None),
        }
    }

    /// The step owning a submitter, submission-date, or declared process field.
    pub fn step_for_field_name(&self, field_name: &str) -> Result<&Step, WorkflowError> {
        self.steps
            .iter()
            .find(|step| step.owns_field(field_name))
            .ok_or_else(|| WorkflowError::UnknownStep(format!("owner of {field_name}")))
    }

    /// One-based position of a step, with the total step count.
    pub fn position(&self, name: &str) -> Result<(usize, usize), WorkflowError> {
        let index = self
            .steps
            .iter()
            .position(|step| step.name == name)
            .ok_or_else(|| WorkflowError::UnknownStep(name.to_string()))?;
        Ok((index + 1, self.steps.len()))
    }
}
