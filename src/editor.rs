use image::Rgba;

use crate::canvas::{GridSize, PixelCanvas, BACKGROUND};
use crate::components::tools::Tool;

// ============================================================================
// INPUT EVENTS — the shell-facing surface of the editor core
// ============================================================================

/// Discrete control changes, fired by toolbar widgets (or the CLI).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EditorCommand {
    SelectTool(Tool),
    SelectColor(Rgba<u8>),
    /// Switch the logical grid. Does not clear the raster; the shell issues
    /// a separate `ClearCanvas` when the user confirms starting over.
    SetGridSize(GridSize),
    /// Replace the canvas with a fresh one on the current grid.
    NewArtwork,
    ClearCanvas,
}

/// One external input event. Pointer coordinates are raster pixels relative
/// to the canvas origin — the shell converts from screen space before
/// handing events over, so the core never sees widget geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp,
    Command(EditorCommand),
}

// ============================================================================
// EDITOR — canvas + tool/color state, driven purely by InputEvents
// ============================================================================

/// The drawing session. Owns the canvas and everything a pointer stroke
/// needs; no ambient state, the UI shell holds exactly one of these.
pub struct Editor {
    pub canvas: PixelCanvas,
    pub active_tool: Tool,
    pub active_color: Rgba<u8>,
    /// True between PointerDown and PointerUp. Pencil and eraser keep
    /// painting on move while set; fill only triggers on the down event.
    drawing: bool,
    /// Unsaved changes since the last save/load/new.
    dirty: bool,
}

impl Editor {
    pub fn new() -> Self {
        Self {
            canvas: PixelCanvas::new(GridSize::default()),
            active_tool: Tool::default(),
            active_color: Rgba([255, 0, 0, 255]),
            drawing: false,
            dirty: false,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Replace the canvas wholesale (artwork load). Resets the stroke and
    /// dirty state.
    pub fn replace_canvas(&mut self, canvas: PixelCanvas) {
        self.canvas = canvas;
        self.drawing = false;
        self.dirty = false;
    }

    /// Feed one input event through the editor. All mutation of the canvas
    /// during a session funnels through here.
    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { x, y } => {
                self.drawing = true;
                self.apply_tool(x, y, true);
            }
            InputEvent::PointerMove { x, y } => {
                if self.drawing {
                    self.apply_tool(x, y, false);
                }
            }
            InputEvent::PointerUp => {
                self.drawing = false;
            }
            InputEvent::Command(cmd) => self.handle_command(cmd),
        }
    }

    fn handle_command(&mut self, cmd: EditorCommand) {
        match cmd {
            EditorCommand::SelectTool(tool) => self.active_tool = tool,
            EditorCommand::SelectColor(color) => self.active_color = color,
            EditorCommand::SetGridSize(grid) => self.canvas.set_grid_size(grid),
            EditorCommand::NewArtwork => {
                self.canvas = PixelCanvas::new(self.canvas.grid());
                self.drawing = false;
                self.dirty = false;
            }
            EditorCommand::ClearCanvas => {
                self.canvas.clear();
                self.dirty = true;
            }
        }
    }

    fn apply_tool(&mut self, x: f32, y: f32, stroke_start: bool) {
        // Outside the canvas: silent no-op, the stroke stays active so
        // re-entering keeps painting.
        let Some((gx, gy)) = self.canvas.cell_at(x, y) else {
            return;
        };
        match self.active_tool {
            Tool::Pencil => self.canvas.set_cell(gx, gy, self.active_color),
            Tool::Eraser => self.canvas.set_cell(gx, gy, BACKGROUND),
            Tool::Fill => {
                // One fill per click; dragging the fill tool does nothing.
                if stroke_start {
                    self.canvas.flood_fill(gx, gy, self.active_color);
                }
            }
        }
        self.dirty = true;
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::CANVAS_SIZE;

    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn center_of_cell(editor: &Editor, gx: u32, gy: u32) -> (f32, f32) {
        let cell = editor.canvas.grid().cell_size() as f32;
        (gx as f32 * cell + cell / 2.0, gy as f32 * cell + cell / 2.0)
    }

    #[test]
    fn pencil_paints_on_down_and_drag() {
        let mut editor = Editor::new();
        editor.handle_event(InputEvent::Command(EditorCommand::SelectColor(BLUE)));
        let (x0, y0) = center_of_cell(&editor, 2, 2);
        let (x1, y1) = center_of_cell(&editor, 3, 2);
        editor.handle_event(InputEvent::PointerDown { x: x0, y: y0 });
        editor.handle_event(InputEvent::PointerMove { x: x1, y: y1 });
        editor.handle_event(InputEvent::PointerUp);
        assert_eq!(editor.canvas.cell_color(2, 2), BLUE);
        assert_eq!(editor.canvas.cell_color(3, 2), BLUE);
        assert!(editor.is_dirty());
    }

    #[test]
    fn move_without_down_does_not_paint() {
        let mut editor = Editor::new();
        editor.handle_event(InputEvent::Command(EditorCommand::SelectColor(BLUE)));
        let (x, y) = center_of_cell(&editor, 4, 4);
        editor.handle_event(InputEvent::PointerMove { x, y });
        assert_eq!(editor.canvas.cell_color(4, 4), BACKGROUND);
        assert!(!editor.is_dirty());
    }

    #[test]
    fn eraser_restores_background() {
        let mut editor = Editor::new();
        editor.handle_event(InputEvent::Command(EditorCommand::SelectColor(BLUE)));
        let (x, y) = center_of_cell(&editor, 1, 1);
        editor.handle_event(InputEvent::PointerDown { x, y });
        editor.handle_event(InputEvent::PointerUp);
        assert_eq!(editor.canvas.cell_color(1, 1), BLUE);

        editor.handle_event(InputEvent::Command(EditorCommand::SelectTool(Tool::Eraser)));
        editor.handle_event(InputEvent::PointerDown { x, y });
        editor.handle_event(InputEvent::PointerUp);
        assert_eq!(editor.canvas.cell_color(1, 1), BACKGROUND);
    }

    #[test]
    fn fill_triggers_once_per_click() {
        let mut editor = Editor::new();
        editor.handle_event(InputEvent::Command(EditorCommand::SelectTool(Tool::Fill)));
        editor.handle_event(InputEvent::Command(EditorCommand::SelectColor(BLUE)));
        let (x, y) = center_of_cell(&editor, 0, 0);
        editor.handle_event(InputEvent::PointerDown { x, y });
        // Dragging the fill tool across the canvas must not re-fill.
        let (x2, y2) = center_of_cell(&editor, 8, 8);
        editor.handle_event(InputEvent::PointerMove { x: x2, y: y2 });
        editor.handle_event(InputEvent::PointerUp);
        for gy in 0..editor.canvas.grid().cells() {
            for gx in 0..editor.canvas.grid().cells() {
                assert_eq!(editor.canvas.cell_color(gx, gy), BLUE);
            }
        }
    }

    #[test]
    fn pointer_outside_canvas_is_ignored() {
        let mut editor = Editor::new();
        editor.handle_event(InputEvent::Command(EditorCommand::SelectColor(BLUE)));
        editor.handle_event(InputEvent::PointerDown {
            x: CANVAS_SIZE as f32 + 5.0,
            y: 10.0,
        });
        editor.handle_event(InputEvent::PointerUp);
        assert!(!editor.is_dirty());
        // The stroke still counts as started: re-entering paints.
        editor.handle_event(InputEvent::PointerDown { x: -3.0, y: -3.0 });
        let (x, y) = center_of_cell(&editor, 0, 0);
        editor.handle_event(InputEvent::PointerMove { x, y });
        assert_eq!(editor.canvas.cell_color(0, 0), BLUE);
    }

    #[test]
    fn new_artwork_resets_canvas_and_dirty_flag() {
        let mut editor = Editor::new();
        editor.handle_event(InputEvent::Command(EditorCommand::SelectColor(BLUE)));
        let (x, y) = center_of_cell(&editor, 0, 0);
        editor.handle_event(InputEvent::PointerDown { x, y });
        editor.handle_event(InputEvent::PointerUp);
        assert!(editor.is_dirty());

        editor.handle_event(InputEvent::Command(EditorCommand::NewArtwork));
        assert!(!editor.is_dirty());
        assert_eq!(editor.canvas.cell_color(0, 0), BACKGROUND);
    }

    #[test]
    fn grid_switch_keeps_tool_and_color() {
        let mut editor = Editor::new();
        editor.handle_event(InputEvent::Command(EditorCommand::SelectTool(Tool::Fill)));
        editor.handle_event(InputEvent::Command(EditorCommand::SelectColor(BLUE)));
        editor.handle_event(InputEvent::Command(EditorCommand::SetGridSize(
            GridSize::G64,
        )));
        assert_eq!(editor.canvas.grid(), GridSize::G64);
        assert_eq!(editor.active_tool, Tool::Fill);
        assert_eq!(editor.active_color, BLUE);
    }
}
