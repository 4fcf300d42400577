use eframe::egui;
use egui::{Color32, ColorImage, Pos2, Rect, TextureHandle, TextureOptions, Vec2};

use crate::canvas::{CANVAS_SIZE, GridSize};
use crate::components::colors::{self, PalettePanel};
use crate::components::dialogs::{ConfirmDialog, PendingAction};
use crate::components::gallery::{GalleryAction, GalleryPanel};
use crate::components::tools::ToolsPanel;
use crate::editor::{Editor, EditorCommand, InputEvent};
use crate::io;
use crate::store::ArtworkStore;

/// Grid guide line color — translucent so it reads over any cell color.
const GRID_LINE_COLOR: Color32 = Color32::from_rgba_premultiplied(70, 21, 29, 77);

/// Seconds a success notice stays visible.
const NOTICE_LIFETIME: f64 = 2.5;

// ============================================================================
// NOTICES — recoverable, user-visible feedback (never fatal)
// ============================================================================

struct Notice {
    text: String,
    is_error: bool,
    shown_at: f64,
}

// ============================================================================
// PIXELFE APP
// ============================================================================

pub struct PixelFEApp {
    editor: Editor,
    /// `None` when the store file could not be opened; drawing still works,
    /// only save/load are unavailable until the problem is fixed.
    store: Option<ArtworkStore>,

    // UI components
    tools_panel: ToolsPanel,
    palette: PalettePanel,
    gallery: GalleryPanel,
    confirm: ConfirmDialog,

    /// Name field for save/export; also set when loading an artwork.
    art_name: String,
    notice: Option<Notice>,

    // Canvas display texture, re-uploaded when the raster changes.
    canvas_texture: Option<TextureHandle>,
    uploaded_revision: Option<u64>,
}

impl PixelFEApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let mut notice = None;
        let store = match ArtworkStore::open(ArtworkStore::default_path()) {
            Ok(store) => Some(store),
            Err(e) => {
                crate::logger::write("ERROR", &format!("artwork store unavailable: {}", e));
                notice = Some(Notice {
                    text: format!("Artwork store unavailable: {}", e),
                    is_error: true,
                    shown_at: 0.0,
                });
                None
            }
        };

        Self {
            editor: Editor::new(),
            store,
            tools_panel: ToolsPanel,
            palette: PalettePanel::default(),
            gallery: GalleryPanel::default(),
            confirm: ConfirmDialog::default(),
            art_name: String::new(),
            notice,
            canvas_texture: None,
            uploaded_revision: None,
        }
    }

    fn show_notice(&mut self, ctx: &egui::Context, text: String, is_error: bool) {
        if is_error {
            crate::logger::write("WARN", &text);
        }
        self.notice = Some(Notice {
            text,
            is_error,
            shown_at: ctx.input(|i| i.time),
        });
    }

    // ---- save / load / export ---------------------------------------------

    /// Fallback name when the field is empty — `Artwork_<millis>` keeps
    /// unnamed saves distinct.
    fn effective_name(&self) -> String {
        let trimmed = self.art_name.trim();
        if trimmed.is_empty() {
            let millis = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0);
            format!("Artwork_{}", millis)
        } else {
            trimmed.to_string()
        }
    }

    fn request_save(&mut self, ctx: &egui::Context) {
        let name = self.effective_name();
        match &self.store {
            Some(store) if store.contains(&name) => {
                self.confirm.ask(PendingAction::OverwriteSave(name));
            }
            Some(_) => self.finish_save(ctx, &name),
            None => self.show_notice(ctx, "Artwork store is unavailable.".to_string(), true),
        }
    }

    fn finish_save(&mut self, ctx: &egui::Context, name: &str) {
        let Some(store) = &mut self.store else {
            return;
        };
        match store.save(name, &self.editor.canvas) {
            Ok(()) => {
                self.editor.mark_clean();
                self.art_name = name.to_string();
                crate::logger::write("INFO", &format!("saved artwork \"{}\"", name));
                self.show_notice(ctx, format!("Saved \"{}\"", name), false);
            }
            Err(e) => self.show_notice(ctx, format!("Save failed: {}", e), true),
        }
    }

    fn finish_load(&mut self, ctx: &egui::Context, name: &str) {
        let Some(store) = &self.store else {
            return;
        };
        match store.load(name) {
            Ok(canvas) => {
                self.editor.replace_canvas(canvas);
                self.art_name = name.to_string();
                crate::logger::write("INFO", &format!("loaded artwork \"{}\"", name));
            }
            Err(e) => self.show_notice(ctx, format!("Load failed: {}", e), true),
        }
    }

    fn finish_delete(&mut self, ctx: &egui::Context, name: &str) {
        let Some(store) = &mut self.store else {
            return;
        };
        match store.remove(name) {
            Ok(()) => self.show_notice(ctx, format!("Deleted \"{}\"", name), false),
            Err(e) => self.show_notice(ctx, format!("Delete failed: {}", e), true),
        }
    }

    fn export_png(&mut self, ctx: &egui::Context) {
        let fallback = {
            let trimmed = self.art_name.trim();
            if trimmed.is_empty() {
                let millis = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_millis())
                    .unwrap_or(0);
                format!("pixel-art-{}", millis)
            } else {
                io::sanitize_filename(trimmed)
            }
        };
        let Some(path) = io::pick_export_path(&fallback) else {
            return; // user cancelled
        };
        let result = self
            .editor
            .canvas
            .encode_png()
            .map_err(|e| e.to_string())
            .and_then(|png| io::write_png(&png, &path).map_err(|e| e.to_string()));
        match result {
            Ok(()) => {
                crate::logger::write("INFO", &format!("exported PNG to {}", path.display()));
                self.show_notice(ctx, format!("Exported {}", path.display()), false);
            }
            Err(e) => self.show_notice(ctx, format!("Export failed: {}", e), true),
        }
    }

    // ---- confirmed destructive actions ------------------------------------

    fn apply_action(&mut self, ctx: &egui::Context, action: PendingAction) {
        match action {
            PendingAction::NewArtwork => {
                self.editor
                    .handle_event(InputEvent::Command(EditorCommand::NewArtwork));
                self.art_name.clear();
            }
            PendingAction::ClearCanvas => {
                self.editor
                    .handle_event(InputEvent::Command(EditorCommand::ClearCanvas));
            }
            PendingAction::ChangeGridSize(grid) => {
                // New partition, fresh canvas — stale raster content would
                // masquerade as cell colors on the new grid.
                self.editor
                    .handle_event(InputEvent::Command(EditorCommand::SetGridSize(grid)));
                self.editor
                    .handle_event(InputEvent::Command(EditorCommand::NewArtwork));
            }
            PendingAction::OverwriteSave(name) => self.finish_save(ctx, &name),
            PendingAction::LoadArtwork(name) => self.finish_load(ctx, &name),
            PendingAction::DeleteArtwork(name) => self.finish_delete(ctx, &name),
        }
    }

    // ---- panels ------------------------------------------------------------

    fn show_toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                if let Some(tool) = self.tools_panel.show(ui, self.editor.active_tool) {
                    self.editor
                        .handle_event(InputEvent::Command(EditorCommand::SelectTool(tool)));
                }
                ui.separator();

                let current = self.editor.canvas.grid();
                let mut requested = None;
                egui::ComboBox::from_label("Grid")
                    .selected_text(current.label())
                    .show_ui(ui, |ui| {
                        for grid in GridSize::all() {
                            if ui
                                .selectable_label(*grid == current, grid.label())
                                .clicked()
                                && *grid != current
                            {
                                requested = Some(*grid);
                            }
                        }
                    });
                if let Some(grid) = requested {
                    self.confirm.ask(PendingAction::ChangeGridSize(grid));
                }
                ui.separator();

                if ui.button("New").clicked() {
                    self.confirm.ask(PendingAction::NewArtwork);
                }
                if ui.button("Clear").clicked() {
                    self.confirm.ask(PendingAction::ClearCanvas);
                }
                ui.separator();

                ui.add(
                    egui::TextEdit::singleline(&mut self.art_name)
                        .hint_text("Artwork name")
                        .desired_width(160.0),
                );
                if ui.button("Save").clicked() {
                    self.request_save(ctx);
                }
                if ui.button("Export PNG").clicked() {
                    self.export_png(ctx);
                }
            });
        });
    }

    fn show_side_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("side_panel")
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Palette");
                if let Some(color) = self.palette.show(ui) {
                    self.editor
                        .handle_event(InputEvent::Command(EditorCommand::SelectColor(
                            colors::color32_to_rgba(color),
                        )));
                }
                ui.separator();

                ui.heading("Saved artworks");
                match &self.store {
                    Some(store) => {
                        if let Some(action) = self.gallery.show(ui, store) {
                            match action {
                                GalleryAction::Load(name) => {
                                    self.confirm.ask(PendingAction::LoadArtwork(name));
                                }
                                GalleryAction::Delete(name) => {
                                    self.confirm.ask(PendingAction::DeleteArtwork(name));
                                }
                            }
                        }
                    }
                    None => {
                        ui.weak("Store unavailable — saving is disabled.");
                    }
                }
            });
    }

    fn show_notice_bar(&mut self, ctx: &egui::Context) {
        let Some(notice) = &self.notice else {
            return;
        };
        // Successes fade out on their own; errors stay until dismissed.
        if !notice.is_error && ctx.input(|i| i.time) - notice.shown_at > NOTICE_LIFETIME {
            self.notice = None;
            return;
        }
        let mut dismissed = false;
        egui::TopBottomPanel::bottom("notice_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let color = if notice.is_error {
                    Color32::from_rgb(230, 80, 80)
                } else {
                    Color32::from_rgb(80, 200, 120)
                };
                ui.colored_label(color, &notice.text);
                if notice.is_error && ui.small_button("Dismiss").clicked() {
                    dismissed = true;
                }
            });
        });
        if dismissed {
            self.notice = None;
        }
    }

    // ---- canvas area -------------------------------------------------------

    fn show_canvas(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let sense = egui::Sense::click_and_drag().union(egui::Sense::hover());
            let (response, painter) = ui.allocate_painter(ui.available_size(), sense);

            // Square display area, scaled to fit and centered.
            let side = response.rect.width().min(response.rect.height()).max(1.0);
            let canvas_rect = Rect::from_center_size(response.rect.center(), Vec2::splat(side));
            let scale = side / CANVAS_SIZE as f32;

            self.upload_canvas_texture(ctx);
            if let Some(tex) = &self.canvas_texture {
                painter.image(
                    tex.id(),
                    canvas_rect,
                    Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(1.0, 1.0)),
                    Color32::WHITE,
                );
            }
            self.draw_grid_overlay(&painter, canvas_rect);

            // Pointer → InputEvents. The confirm dialog is modal: while it
            // is open the canvas receives nothing.
            if !self.confirm.is_open() {
                let pressed = ui.input(|i| i.pointer.primary_pressed());
                let down = ui.input(|i| i.pointer.primary_down());
                let released = ui.input(|i| i.pointer.primary_released());
                let pos = ui.input(|i| i.pointer.interact_pos());

                if let Some(pos) = pos {
                    let x = (pos.x - canvas_rect.min.x) / scale;
                    let y = (pos.y - canvas_rect.min.y) / scale;
                    if pressed && response.hovered() {
                        self.editor.handle_event(InputEvent::PointerDown { x, y });
                    } else if down && !pressed {
                        self.editor.handle_event(InputEvent::PointerMove { x, y });
                    }
                }
                if released {
                    self.editor.handle_event(InputEvent::PointerUp);
                }
            }
        });
    }

    /// Re-upload the display texture when the raster changed.
    fn upload_canvas_texture(&mut self, ctx: &egui::Context) {
        let revision = self.editor.canvas.revision();
        if self.uploaded_revision == Some(revision) && self.canvas_texture.is_some() {
            return;
        }
        let image = ColorImage::from_rgba_unmultiplied(
            [CANVAS_SIZE as usize, CANVAS_SIZE as usize],
            self.editor.canvas.pixels().as_raw(),
        );
        match &mut self.canvas_texture {
            Some(tex) => tex.set(image, TextureOptions::NEAREST),
            None => {
                self.canvas_texture =
                    Some(ctx.load_texture("canvas", image, TextureOptions::NEAREST));
            }
        }
        self.uploaded_revision = Some(revision);
    }

    /// G+1 vertical and horizontal guide lines spaced one cell apart.
    /// Purely cosmetic — regenerated from the grid every frame.
    fn draw_grid_overlay(&self, painter: &egui::Painter, canvas_rect: Rect) {
        let cells = self.editor.canvas.grid().cells();
        let step = canvas_rect.width() / cells as f32;
        let stroke = (1.0, GRID_LINE_COLOR);

        for i in 0..=cells {
            let offset = i as f32 * step;
            let x = canvas_rect.min.x + offset;
            painter.line_segment(
                [
                    Pos2::new(x, canvas_rect.min.y),
                    Pos2::new(x, canvas_rect.max.y),
                ],
                stroke,
            );
            let y = canvas_rect.min.y + offset;
            painter.line_segment(
                [
                    Pos2::new(canvas_rect.min.x, y),
                    Pos2::new(canvas_rect.max.x, y),
                ],
                stroke,
            );
        }
    }

    fn window_title(&self) -> String {
        let name = {
            let trimmed = self.art_name.trim();
            if trimmed.is_empty() {
                "Untitled"
            } else {
                trimmed
            }
        };
        let dirty = if self.editor.is_dirty() { "*" } else { "" };
        format!("PixelFE — {}{}", name, dirty)
    }
}

impl eframe::App for PixelFEApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.send_viewport_cmd(egui::ViewportCommand::Title(self.window_title()));

        self.show_toolbar(ctx);
        self.show_side_panel(ctx);
        self.show_notice_bar(ctx);
        self.show_canvas(ctx);

        if let Some(action) = self.confirm.show(ctx) {
            self.apply_action(ctx, action);
        }
    }
}
