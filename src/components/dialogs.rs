use eframe::egui;

use crate::canvas::GridSize;

// ============================================================================
// CONFIRMATION DIALOG — gate before every destructive action
// ============================================================================

/// Destructive actions that wait behind a confirmation. Each carries what
/// the app needs to finish the job once the user clicks Confirm.
#[derive(Clone, Debug, PartialEq)]
pub enum PendingAction {
    NewArtwork,
    ClearCanvas,
    /// Grid switch wipes the drawing (the raster is re-partitioned).
    ChangeGridSize(GridSize),
    /// Saving under a name that already exists in the store.
    OverwriteSave(String),
    /// Loading replaces the current canvas.
    LoadArtwork(String),
    DeleteArtwork(String),
}

impl PendingAction {
    fn title(&self) -> &'static str {
        match self {
            PendingAction::NewArtwork => "New artwork",
            PendingAction::ClearCanvas => "Clear canvas",
            PendingAction::ChangeGridSize(_) => "Change grid size",
            PendingAction::OverwriteSave(_) => "Overwrite artwork",
            PendingAction::LoadArtwork(_) => "Load artwork",
            PendingAction::DeleteArtwork(_) => "Delete artwork",
        }
    }

    fn message(&self) -> String {
        match self {
            PendingAction::NewArtwork => {
                "Start a new artwork? Current work will be lost.".to_string()
            }
            PendingAction::ClearCanvas => "Clear the entire canvas?".to_string(),
            PendingAction::ChangeGridSize(grid) => format!(
                "Switch to a {} grid? The canvas will be cleared.",
                grid.label()
            ),
            PendingAction::OverwriteSave(name) => {
                format!("\"{}\" already exists. Overwrite?", name)
            }
            PendingAction::LoadArtwork(name) => {
                format!("Load \"{}\"? Current work will be lost.", name)
            }
            PendingAction::DeleteArtwork(name) => {
                format!("Delete \"{}\" permanently?", name)
            }
        }
    }
}

/// Modal Confirm/Cancel window. At most one action is pending at a time;
/// asking again while open replaces the previous request.
#[derive(Default)]
pub struct ConfirmDialog {
    pending: Option<PendingAction>,
}

impl ConfirmDialog {
    pub fn ask(&mut self, action: PendingAction) {
        self.pending = Some(action);
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    /// Draw the dialog if an action is pending. Returns the action once the
    /// user confirms it; Cancel (or Escape) just drops it.
    pub fn show(&mut self, ctx: &egui::Context) -> Option<PendingAction> {
        let action = self.pending.clone()?;
        let mut confirmed = false;
        let mut cancelled = false;

        egui::Window::new(action.title())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(action.message());
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Confirm").clicked() {
                        confirmed = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancelled = true;
                    }
                });
            });

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            cancelled = true;
        }

        if confirmed {
            self.pending = None;
            Some(action)
        } else {
            if cancelled {
                self.pending = None;
            }
            None
        }
    }
}
