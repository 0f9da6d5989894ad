//! The editing state machine.
//!
//! ```text
//!              brush down            brush up (push)
//!   ┌──────┐ ─────────────► ┌─────────┐ ──────────┐
//!   │      │                │ Drawing │           │
//!   │ Idle │ ◄──────────────┴─────────┘ ◄─────────┘
//!   │      │
//!   │      │  wand click (push)   ┌────────────┐ ◄─┐ params changed (replace top)
//!   │      │ ───────────────────► │ WandActive │ ──┘ or new seed (push)
//!   └──────┘ ◄─────────────────── └────────────┘
//!             tool switch, undo, redo, reset, load
//! ```
//!
//! States are only changed through [`EditSession`](super::EditSession), which
//! validates every transition with [`EditorState::can_transition_to`].
use crate::buffer::{BufferRef, PixelBuffer};

/// The wand selection that is still being tuned.
///
/// `base` is the buffer as it was before the click; every parameter change
/// recomputes from it, so repeated edits never compound.
#[derive(Debug, Clone)]
pub struct LiveSelection {
    pub seed_x: u32,
    pub seed_y: u32,
    pub base: BufferRef,
}

/// The possible states of the editor.
#[derive(Debug, Default)]
pub enum EditorState {
    /// No active operation
    #[default]
    Idle,
    /// A brush stroke is in progress on a private working copy
    Drawing { canvas: PixelBuffer },
    /// A wand selection exists and its parameters may still change
    WandActive { live: LiveSelection },
}

impl EditorState {
    /// Validates whether a transition to the new state is allowed
    pub fn can_transition_to(&self, new_state: &EditorState) -> bool {
        match (self, new_state) {
            (EditorState::Idle, EditorState::Drawing { .. }) => true,
            (EditorState::Idle, EditorState::WandActive { .. }) => true,
            (EditorState::Drawing { .. }, EditorState::Idle) => true,
            (EditorState::WandActive { .. }, EditorState::WandActive { .. }) => true,
            (EditorState::WandActive { .. }, EditorState::Idle) => true,
            (EditorState::Idle, EditorState::Idle) => true,
            _ => false,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EditorState::Idle => "Idle",
            EditorState::Drawing { .. } => "Drawing",
            EditorState::WandActive { .. } => "WandActive",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, EditorState::Idle)
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, EditorState::Drawing { .. })
    }

    pub fn is_wand_active(&self) -> bool {
        matches!(self, EditorState::WandActive { .. })
    }

    /// The live selection, if the wand is active
    pub fn live_selection(&self) -> Option<&LiveSelection> {
        match self {
            EditorState::WandActive { live } => Some(live),
            _ => None,
        }
    }

    /// The stroke canvas, if drawing
    pub fn canvas(&self) -> Option<&PixelBuffer> {
        match self {
            EditorState::Drawing { canvas } => Some(canvas),
            _ => None,
        }
    }

    pub fn canvas_mut(&mut self) -> Option<&mut PixelBuffer> {
        match self {
            EditorState::Drawing { canvas } => Some(canvas),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live() -> EditorState {
        EditorState::WandActive {
            live: LiveSelection {
                seed_x: 0,
                seed_y: 0,
                base: PixelBuffer::filled(1, 1, [0, 0, 0, 255]).unwrap().into_ref(),
            },
        }
    }

    fn drawing() -> EditorState {
        EditorState::Drawing {
            canvas: PixelBuffer::filled(1, 1, [0, 0, 0, 255]).unwrap(),
        }
    }

    #[test]
    fn test_transitions() {
        assert!(EditorState::Idle.can_transition_to(&drawing()));
        assert!(EditorState::Idle.can_transition_to(&live()));
        assert!(drawing().can_transition_to(&EditorState::Idle));
        assert!(live().can_transition_to(&live()));
        assert!(live().can_transition_to(&EditorState::Idle));

        assert!(!drawing().can_transition_to(&live()));
        assert!(!drawing().can_transition_to(&drawing()));
        assert!(!live().can_transition_to(&drawing()));
    }
}
