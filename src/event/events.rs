use crate::settings::{BrushSettings, SelectionParams, ToolKind};

/// Discrete input the UI feeds into an [`EditSession`](crate::state::EditSession).
///
/// Coordinates are in image pixels. Brush positions keep their sub-pixel part,
/// wand seeds are whole pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    BrushDown { x: f32, y: f32 },
    BrushMove { x: f32, y: f32 },
    BrushUp,
    WandClick { x: u32, y: u32 },
    ParamsChanged(SelectionParams),
    BrushChanged(BrushSettings),
    ToolChanged(ToolKind),
    Undo,
    Redo,
    ResetToOriginal,
    SetHistoryCapacity(usize),
}

impl EditorEvent {
    pub fn name(&self) -> &'static str {
        match self {
            EditorEvent::BrushDown { .. } => "BrushDown",
            EditorEvent::BrushMove { .. } => "BrushMove",
            EditorEvent::BrushUp => "BrushUp",
            EditorEvent::WandClick { .. } => "WandClick",
            EditorEvent::ParamsChanged(_) => "ParamsChanged",
            EditorEvent::BrushChanged(_) => "BrushChanged",
            EditorEvent::ToolChanged(_) => "ToolChanged",
            EditorEvent::Undo => "Undo",
            EditorEvent::Redo => "Redo",
            EditorEvent::ResetToOriginal => "ResetToOriginal",
            EditorEvent::SetHistoryCapacity(_) => "SetHistoryCapacity",
        }
    }
}
