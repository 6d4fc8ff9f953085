//! List DragDrop
//!
//! Framework-free drag tracking for sortable lists.
//! Uses a movement threshold to distinguish click from drag, and reports
//! exactly one `MoveEvent` per completed drag.

/// Movement threshold in pixels to start dragging
pub const DRAG_THRESHOLD_PX: i32 = 6;

/// A completed drag: `from` was dropped onto `to`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveEvent<Id> {
    pub from: Id,
    pub to: Id,
}

/// Current gesture phase
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragPhase<Id> {
    Idle,
    /// Pointer is down on a row but has not moved past the threshold
    Pending { id: Id, start_x: i32, start_y: i32 },
    /// Row is being dragged, optionally hovering another row
    Dragging { id: Id, over: Option<Id> },
}

/// Pointer-driven drag state for one list
#[derive(Clone, Debug)]
pub struct DragTracker<Id> {
    phase: DragPhase<Id>,
    threshold: i32,
    drag_just_ended: bool,
}

impl<Id: Copy + Eq> Default for DragTracker<Id> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Id: Copy + Eq> DragTracker<Id> {
    pub fn new() -> Self {
        Self::with_threshold(DRAG_THRESHOLD_PX)
    }

    pub fn with_threshold(threshold: i32) -> Self {
        Self {
            phase: DragPhase::Idle,
            threshold: threshold.max(0),
            drag_just_ended: false,
        }
    }

    pub fn phase(&self) -> DragPhase<Id> {
        self.phase
    }

    /// Row currently being dragged
    pub fn dragging_id(&self) -> Option<Id> {
        match self.phase {
            DragPhase::Dragging { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Row currently hovered by the dragged row
    pub fn drop_target(&self) -> Option<Id> {
        match self.phase {
            DragPhase::Dragging { over, .. } => over,
            _ => None,
        }
    }

    /// Primary button pressed on a row's drag handle
    pub fn pointer_down(&mut self, id: Id, x: i32, y: i32) {
        self.phase = DragPhase::Pending { id, start_x: x, start_y: y };
    }

    /// Pointer moved; promotes a pending press to a drag past the threshold.
    /// Returns true when the drag started with this move.
    pub fn pointer_move(&mut self, x: i32, y: i32) -> bool {
        if let DragPhase::Pending { id, start_x, start_y } = self.phase {
            let threshold = self.threshold.unsigned_abs();
            if x.abs_diff(start_x) > threshold || y.abs_diff(start_y) > threshold {
                self.phase = DragPhase::Dragging { id, over: None };
                return true;
            }
        }
        false
    }

    /// Pointer entered a row while dragging
    pub fn enter(&mut self, target: Id) {
        if let DragPhase::Dragging { id, .. } = self.phase {
            // Don't allow dropping on self
            let over = if id == target { None } else { Some(target) };
            self.phase = DragPhase::Dragging { id, over };
        }
    }

    /// Pointer left the hovered row
    pub fn leave(&mut self) {
        if let DragPhase::Dragging { id, .. } = self.phase {
            self.phase = DragPhase::Dragging { id, over: None };
        }
    }

    /// Pointer released. Yields a move only for a real drag over another row.
    pub fn pointer_up(&mut self) -> Option<MoveEvent<Id>> {
        let phase = std::mem::replace(&mut self.phase, DragPhase::Idle);
        match phase {
            DragPhase::Dragging { id, over } => {
                self.drag_just_ended = true;
                over.map(|to| MoveEvent { from: id, to })
            }
            // Plain click: the click handler fires normally
            _ => None,
        }
    }

    /// Abort the gesture (escape key, list refresh)
    pub fn cancel(&mut self) {
        if matches!(self.phase, DragPhase::Dragging { .. }) {
            self.drag_just_ended = true;
        }
        self.phase = DragPhase::Idle;
    }

    /// True once after a drag ended, so the trailing click can be swallowed
    pub fn take_click_suppressed(&mut self) -> bool {
        std::mem::take(&mut self.drag_just_ended)
    }
}
