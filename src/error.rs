use crate::element::ElementId;
use thiserror::Error;

/// Errors from tree operations that take an element ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("no element with ID {0}")]
    NoSuchElement(ElementId),

    #[error("element {child} is not a child of {parent}")]
    NotAChild { parent: ElementId, child: ElementId },
}
