use eframe::egui;

// ============================================================================
// TOOLS PANEL — pencil / eraser / flood fill selector
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Pencil,
    Eraser,
    Fill,
}

impl Tool {
    pub fn label(&self) -> &'static str {
        match self {
            Tool::Pencil => "Pencil",
            Tool::Eraser => "Eraser",
            Tool::Fill => "Fill",
        }
    }

    /// Short glyph for the toolbar button.
    pub fn icon(&self) -> &'static str {
        match self {
            Tool::Pencil => "✏",
            Tool::Eraser => "◻",
            Tool::Fill => "🪣",
        }
    }

    pub fn all() -> &'static [Tool] {
        &[Tool::Pencil, Tool::Eraser, Tool::Fill]
    }
}

/// Renders the tool buttons. Selection state lives in the editor; this
/// panel only reports clicks back to the shell.
#[derive(Default)]
pub struct ToolsPanel;

impl ToolsPanel {
    /// Returns the tool the user clicked this frame, if any.
    pub fn show(&mut self, ui: &mut egui::Ui, active: Tool) -> Option<Tool> {
        let mut picked = None;
        ui.horizontal(|ui| {
            for tool in Tool::all() {
                let selected = *tool == active;
                let label = format!("{} {}", tool.icon(), tool.label());
                if ui.selectable_label(selected, label).clicked() && !selected {
                    picked = Some(*tool);
                }
            }
        });
        picked
    }
}
