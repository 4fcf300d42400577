use std::collections::HashMap;

use eframe::egui;
use egui::{ColorImage, TextureHandle, TextureOptions};
use image::imageops::FilterType;

use crate::store::{ArtworkRecord, ArtworkStore};

/// Thumbnail edge length in the gallery list.
const THUMB_SIZE: u32 = 64;

// ============================================================================
// GALLERY PANEL — saved artworks with thumbnails
// ============================================================================

/// What the user asked for by clicking in the gallery.
#[derive(Clone, Debug, PartialEq)]
pub enum GalleryAction {
    Load(String),
    Delete(String),
}

/// Lists the store's artworks in name order. Thumbnails are decoded once
/// and cached per (name, savedAt) pair, so re-saving an artwork refreshes
/// its preview and untouched entries cost nothing per frame.
#[derive(Default)]
pub struct GalleryPanel {
    thumbnails: HashMap<String, (String, TextureHandle)>,
}

impl GalleryPanel {
    pub fn show(&mut self, ui: &mut egui::Ui, store: &ArtworkStore) -> Option<GalleryAction> {
        if store.is_empty() {
            ui.weak("No artworks saved yet. Create something amazing!");
            return None;
        }

        // Drop cache entries whose artwork was deleted.
        self.thumbnails.retain(|name, _| store.contains(name));

        let mut action = None;
        egui::ScrollArea::vertical()
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for (name, record) in store.iter() {
                    let texture = self.thumbnail(ui.ctx(), name, record);
                    ui.horizontal(|ui| {
                        match texture {
                            Some(tex) => {
                                let size = egui::Vec2::splat(THUMB_SIZE as f32);
                                let thumb = ui
                                    .add(egui::Image::new((tex.id(), size)).sense(egui::Sense::click()));
                                if thumb.clicked() {
                                    action = Some(GalleryAction::Load(name.clone()));
                                }
                            }
                            // Undecodable record: keep it listed so the user
                            // can still delete it.
                            None => {
                                ui.weak("?");
                            }
                        }
                        ui.vertical(|ui| {
                            if ui.link(name).clicked() {
                                action = Some(GalleryAction::Load(name.clone()));
                            }
                            ui.weak(format!("{0}×{0}", record.grid_size));
                            ui.weak(&record.saved_at);
                            if ui.small_button("Delete").clicked() {
                                action = Some(GalleryAction::Delete(name.clone()));
                            }
                        });
                    });
                    ui.separator();
                }
            });
        action
    }

    fn thumbnail(
        &mut self,
        ctx: &egui::Context,
        name: &str,
        record: &ArtworkRecord,
    ) -> Option<TextureHandle> {
        if let Some((saved_at, tex)) = self.thumbnails.get(name) {
            if *saved_at == record.saved_at {
                return Some(tex.clone());
            }
        }

        let canvas = ArtworkStore::decode_record(record).ok()?;
        let small = image::imageops::resize(
            canvas.pixels(),
            THUMB_SIZE,
            THUMB_SIZE,
            FilterType::Nearest,
        );
        let color_image = ColorImage::from_rgba_unmultiplied(
            [THUMB_SIZE as usize, THUMB_SIZE as usize],
            small.as_raw(),
        );
        let tex = ctx.load_texture(
            format!("gallery_thumb_{}", name),
            color_image,
            TextureOptions::NEAREST,
        );
        self.thumbnails
            .insert(name.to_string(), (record.saved_at.clone(), tex.clone()));
        Some(tex)
    }
}
