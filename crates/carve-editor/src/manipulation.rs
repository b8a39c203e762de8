//! Manipulations and plugin arbitration
//!
//! A [`Manipulation`] is one proposed edit around the cursor. Before it runs,
//! every registered plugin may veto it or claim it with its own executor;
//! [`arbitrate`] folds those reports into a single [`PluginVerdict`].

use std::fmt;

use carve_dom::NodeId;

use crate::{EditorController, EditorError, EditorResult};

/// A single proposed edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Manipulation {
    /// Remove the character at `position` (relative to the text node)
    RemoveCharacter { node: NodeId, position: usize },
    RemoveEmptyTextNode { node: NodeId },
    RemoveEmptyElement { node: NodeId },
    RemoveVoidElement { node: NodeId },
    RemoveOtherNode { node: NodeId },
    RemoveElementWithChildrenThatArentVisible { node: NodeId },
    MoveCursorToEndOfNode { node: NodeId },
    MoveCursorBeforeElement { node: NodeId },
    MoveCursorToStartOfElement { node: NodeId },
    MoveCursorAfterElement { node: NodeId },
    MoveCursorToEndOfElement { node: NodeId },
}

impl Manipulation {
    /// The node the manipulation acts on
    pub fn node(&self) -> NodeId {
        match *self {
            Manipulation::RemoveCharacter { node, .. }
            | Manipulation::RemoveEmptyTextNode { node }
            | Manipulation::RemoveEmptyElement { node }
            | Manipulation::RemoveVoidElement { node }
            | Manipulation::RemoveOtherNode { node }
            | Manipulation::RemoveElementWithChildrenThatArentVisible { node }
            | Manipulation::MoveCursorToEndOfNode { node }
            | Manipulation::MoveCursorBeforeElement { node }
            | Manipulation::MoveCursorToStartOfElement { node }
            | Manipulation::MoveCursorAfterElement { node }
            | Manipulation::MoveCursorToEndOfElement { node } => node,
        }
    }

    /// Stable name used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Manipulation::RemoveCharacter { .. } => "removeCharacter",
            Manipulation::RemoveEmptyTextNode { .. } => "removeEmptyTextNode",
            Manipulation::RemoveEmptyElement { .. } => "removeEmptyElement",
            Manipulation::RemoveVoidElement { .. } => "removeVoidElement",
            Manipulation::RemoveOtherNode { .. } => "removeOtherNode",
            Manipulation::RemoveElementWithChildrenThatArentVisible { .. } => {
                "removeElementWithChildrenThatArentVisible"
            }
            Manipulation::MoveCursorToEndOfNode { .. } => "moveCursorToEndOfNode",
            Manipulation::MoveCursorBeforeElement { .. } => "moveCursorBeforeElement",
            Manipulation::MoveCursorToStartOfElement { .. } => "moveCursorToStartOfElement",
            Manipulation::MoveCursorAfterElement { .. } => "moveCursorAfterElement",
            Manipulation::MoveCursorToEndOfElement { .. } => "moveCursorToEndOfElement",
        }
    }

    /// Whether the manipulation targets a text node
    pub fn targets_text(&self) -> bool {
        matches!(
            self,
            Manipulation::RemoveCharacter { .. } | Manipulation::RemoveEmptyTextNode { .. }
        )
    }
}

impl fmt::Display for Manipulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.kind(), self.node())
    }
}

/// Custom executor replacing the default DOM mutation
pub type ManipulationExecutor =
    Box<dyn FnOnce(&Manipulation, &mut EditorController) -> EditorResult<()>>;

/// A plugin's opinion on a manipulation
pub struct ManipulationGuidance {
    pub allow: bool,
    pub executor: Option<ManipulationExecutor>,
}

impl ManipulationGuidance {
    /// Allow the default executor
    pub fn allow() -> Self {
        Self {
            allow: true,
            executor: None,
        }
    }

    /// Veto the manipulation
    pub fn deny() -> Self {
        Self {
            allow: false,
            executor: None,
        }
    }

    /// Allow and take over execution
    pub fn execute_with<F>(executor: F) -> Self
    where
        F: FnOnce(&Manipulation, &mut EditorController) -> EditorResult<()> + 'static,
    {
        Self {
            allow: true,
            executor: Some(Box::new(executor)),
        }
    }
}

impl fmt::Debug for ManipulationGuidance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManipulationGuidance")
            .field("allow", &self.allow)
            .field("executor", &self.executor.is_some())
            .finish()
    }
}

/// Combined outcome of all plugin reports
pub struct PluginVerdict {
    pub may_execute: bool,
    pub executor: Option<ManipulationExecutor>,
}

impl fmt::Debug for PluginVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginVerdict")
            .field("may_execute", &self.may_execute)
            .field("executor", &self.executor.is_some())
            .finish()
    }
}

/// Fold plugin reports `(label, guidance)` into a verdict.
///
/// Any veto blocks execution. More than one custom executor is a
/// configuration error and fails the keystroke.
pub fn arbitrate(
    manipulation: &Manipulation,
    reports: Vec<(String, ManipulationGuidance)>,
) -> EditorResult<PluginVerdict> {
    for (label, guidance) in &reports {
        tracing::debug!(
            "Plugin {} reported on {}: allow={}, executor={}",
            label,
            manipulation,
            guidance.allow,
            guidance.executor.is_some()
        );
    }
    if reports.len() > 1 {
        let labels: Vec<&str> = reports.iter().map(|(label, _)| label.as_str()).collect();
        tracing::warn!(
            "Multiple plugins reported on {}: {}",
            manipulation,
            labels.join(", ")
        );
    }

    let may_execute = reports.iter().all(|(_, guidance)| guidance.allow);
    let claiming: Vec<String> = reports
        .iter()
        .filter(|(_, guidance)| guidance.executor.is_some())
        .map(|(label, _)| label.clone())
        .collect();
    if claiming.len() > 1 {
        return Err(EditorError::ManipulationConflict {
            manipulation: manipulation.kind().to_string(),
            labels: claiming,
        });
    }

    let executor = reports
        .into_iter()
        .find_map(|(_, guidance)| guidance.executor);
    Ok(PluginVerdict {
        may_execute,
        executor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manipulation() -> Manipulation {
        Manipulation::RemoveEmptyElement { node: NodeId::ROOT }
    }

    #[test]
    fn test_no_reports_allows_default() {
        let verdict = arbitrate(&manipulation(), Vec::new()).unwrap();
        assert!(verdict.may_execute);
        assert!(verdict.executor.is_none());
    }

    #[test]
    fn test_veto_wins() {
        let reports = vec![
            ("a".to_string(), ManipulationGuidance::allow()),
            ("b".to_string(), ManipulationGuidance::deny()),
        ];
        assert!(!arbitrate(&manipulation(), reports).unwrap().may_execute);
    }

    #[test]
    fn test_single_executor_is_used() {
        let reports = vec![(
            "a".to_string(),
            ManipulationGuidance::execute_with(|_, _| Ok(())),
        )];
        let verdict = arbitrate(&manipulation(), reports).unwrap();
        assert!(verdict.may_execute && verdict.executor.is_some());
    }

    #[test]
    fn test_conflicting_executors_fail() {
        let reports = vec![
            ("first".to_string(), ManipulationGuidance::execute_with(|_, _| Ok(()))),
            ("second".to_string(), ManipulationGuidance::execute_with(|_, _| Ok(()))),
        ];
        match arbitrate(&manipulation(), reports) {
            Err(EditorError::ManipulationConflict { labels, manipulation }) => {
                assert_eq!(labels, vec!["first", "second"]);
                assert_eq!(manipulation, "removeEmptyElement");
            }
            other => panic!("expected conflict, got {:?}", other.map(|v| v.may_execute)),
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(manipulation().to_string(), "removeEmptyElement on #0");
    }
}
