//! Deferred tree mutation.
//!
//! Handlers run while the tree is being traversed, so they can't restructure it directly. They
//! queue commands instead, and the tree applies them once the traversal is over.

use crate::element::{Element, ElementId};
use crossbeam::channel::Sender;
use tracing::warn;

/// A queued structural change.
#[derive(Debug)]
pub enum TreeCommand {
    AddChild { parent: ElementId, element: Element },
    RemoveChild { parent: ElementId, child: ElementId },
    ClearChildren(ElementId),
    SetVisible { id: ElementId, visible: bool },
    SetFocus(Option<ElementId>),
    Invalidate(ElementId),
}

/// Queues commands for a tree.
///
/// Cheap to clone; widgets may keep one around.
#[derive(Debug, Clone)]
pub struct CommandSender {
    sender: Sender<TreeCommand>,
}

impl CommandSender {
    pub(crate) fn new(sender: Sender<TreeCommand>) -> CommandSender {
        CommandSender { sender }
    }

    /// Queues a command. Commands for a tree that no longer exists are dropped.
    pub fn send(&self, command: TreeCommand) {
        if let Err(err) = self.sender.send(command) {
            warn!(command = ?err.into_inner(), "tree is gone; dropping command");
        }
    }

    /// Queues adding a child. Returns the ID it will have.
    pub fn add_child(&self, parent: ElementId, element: Element) -> ElementId {
        let id = element.id();
        self.send(TreeCommand::AddChild { parent, element });
        id
    }

    pub fn remove_child(&self, parent: ElementId, child: ElementId) {
        self.send(TreeCommand::RemoveChild { parent, child });
    }

    pub fn clear_children(&self, id: ElementId) {
        self.send(TreeCommand::ClearChildren(id));
    }

    pub fn set_visible(&self, id: ElementId, visible: bool) {
        self.send(TreeCommand::SetVisible { id, visible });
    }

    pub fn set_focus(&self, id: Option<ElementId>) {
        self.send(TreeCommand::SetFocus(id));
    }

    pub fn invalidate(&self, id: ElementId) {
        self.send(TreeCommand::Invalidate(id));
    }
}
