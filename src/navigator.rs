//! Nested page history for the processor screens.
//!
//! The first entry is the home page and the last is the page being shown:
//! Dashboard -> ProcessDetail.
use crate::error::WorkflowError;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewKey {
    Dashboard,
    ProcessDetail,
}

impl ViewKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewKey::Dashboard => "DASHBOARD",
            ViewKey::ProcessDetail => "PROCESS_DETAIL",
        }
    }
}

impl fmt::Display for ViewKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub text: String,
    pub key: ViewKey,
    pub is_current: bool,
}

#[derive(Debug, Clone)]
pub struct Navigator {
    stack: Vec<ViewKey>,
}

impl Navigator {
    pub fn new(root: ViewKey) -> Self {
        Self { stack: vec![root] }
    }

    pub fn stack(&self) -> &[ViewKey] {
        &self.stack
    }

    pub fn current(&self) -> Option<ViewKey> {
        self.stack.last().copied()
    }

    pub fn push(&mut self, key: ViewKey) {
        self.stack.push(key);
    }

    /// Truncate the stack so it ends at the first occurrence of `key`.
    ///
    /// A key that is not on the stack leaves it untouched.
    pub fn reduce_to(&mut self, key: ViewKey) -> Result<(), WorkflowError> {
        let index = self
            .stack
            .iter()
            .position(|entry| *entry == key)
            .ok_or(WorkflowError::UnknownViewKey(key))?;
        self.stack.truncate(index + 1);
        Ok(())
    }

    /// One crumb per stack entry; the last is current.
    pub fn breadcrumbs(&self, label: impl Fn(ViewKey) -> String) -> Vec<Breadcrumb> {
        let last = self.stack.len().saturating_sub(1);
        self.stack
            .iter()
            .enumerate()
            .map(|(index, key)| Breadcrumb {
                text: label(*key),
                key: *key,
                is_current: index == last,
            })
            .collect()
    }

    /// Clicking a crumb navigates back to it.
    pub fn follow(&mut self, crumb: &Breadcrumb) -> Result<(), WorkflowError> {
        self.reduce_to(crumb.key)
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(ViewKey::Dashboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduce_to_present_key_ends_stack_at_that_key() {
        let mut navigator = Navigator::default();
        navigator.push(ViewKey::ProcessDetail);
        navigator.push(ViewKey::ProcessDetail);
        navigator.reduce_to(ViewKey::ProcessDetail).expect("present");
        assert_eq!(
            navigator.stack(),
            &[ViewKey::Dashboard, ViewKey::ProcessDetail]
        );
        navigator.reduce_to(ViewKey::Dashboard).expect("present");
        assert_eq!(navigator.current(), Some(ViewKey::Dashboard));
    }

    #[test]
    fn reduce_to_missing_key_fails_without_emptying_the_stack() {
        let mut navigator = Navigator::default();
        let err = navigator.reduce_to(ViewKey::ProcessDetail).unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::UnknownViewKey(ViewKey::ProcessDetail)
        ));
        assert_eq!(navigator.stack(), &[ViewKey::Dashboard]);
    }

    #[test]
    fn breadcrumbs_match_stack_and_flag_the_last_entry() {
        let mut navigator = Navigator::default();
        navigator.push(ViewKey::ProcessDetail);
        let crumbs = navigator.breadcrumbs(|key| key.as_str().to_lowercase());
        assert_eq!(crumbs.len(), navigator.stack().len());
        assert_eq!(crumbs[0].text, "dashboard");
        assert!(!crumbs[0].is_current);
        assert!(crumbs[1].is_current);

        navigator.follow(&crumbs[0]).expect("follow crumb");
        assert_eq!(navigator.stack(), &[ViewKey::Dashboard]);
        assert_eq!(navigator.breadcrumbs(|_| String::new()).len(), 1);
    }
}
