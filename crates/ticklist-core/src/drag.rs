use tracing::debug;

use crate::task::TaskId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(TaskId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderRequest {
    pub source: TaskId,
    pub target: TaskId,
}

/// Turns pointer (or keyboard, or touch) drag gestures into reorder
/// requests without knowing anything about the event API underneath.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn dragging(&self) -> Option<&TaskId> {
        match &self.state {
            DragState::Dragging(id) => Some(id),
            DragState::Idle => None,
        }
    }

    pub fn start(&mut self, source: TaskId) {
        debug!(source = %source, "drag started");
        self.state = DragState::Dragging(source);
    }

    /// Ends the gesture on `target`. The source is the id captured at drag
    /// start; if none was captured, `payload` (the id carried in the drag
    /// data) stands in. Always leaves the controller idle.
    pub fn drop_on(&mut self, target: TaskId, payload: Option<TaskId>) -> Option<ReorderRequest> {
        let source = match std::mem::take(&mut self.state) {
            DragState::Dragging(source) => Some(source),
            DragState::Idle => payload,
        };

        let Some(source) = source else {
            debug!(target = %target, "drop without a drag source");
            return None;
        };
        if source == target {
            debug!(target = %target, "dropped onto itself");
            return None;
        }

        Some(ReorderRequest { source, target })
    }

    /// Cancelled or finished drag; nothing is emitted.
    pub fn end(&mut self) {
        if let DragState::Dragging(source) = std::mem::take(&mut self.state) {
            debug!(source = %source, "drag ended");
        }
    }
}
