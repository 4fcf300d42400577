use std::io::Cursor;

use image::codecs::png::PngEncoder;
use image::{ImageError, Rgba, RgbaImage};

/// Canvas edge length in raster pixels. The raster is always square and
/// never resized; only the logical grid laid over it changes.
pub const CANVAS_SIZE: u32 = 512;

/// Background color — white, matching the eraser.
pub const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

// ============================================================================
// GRID SIZE
// ============================================================================

/// Supported grid subdivisions. Every variant divides `CANVAS_SIZE` evenly,
/// so `cells() * cell_size() == CANVAS_SIZE` always holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GridSize {
    G8,
    #[default]
    G16,
    G32,
    G64,
}

impl GridSize {
    /// Number of cells along one edge.
    pub fn cells(&self) -> u32 {
        match self {
            GridSize::G8 => 8,
            GridSize::G16 => 16,
            GridSize::G32 => 32,
            GridSize::G64 => 64,
        }
    }

    /// Raster pixels covered by one cell edge.
    pub fn cell_size(&self) -> u32 {
        CANVAS_SIZE / self.cells()
    }

    pub fn label(&self) -> String {
        format!("{0}×{0}", self.cells())
    }

    pub fn all() -> &'static [GridSize] {
        &[GridSize::G8, GridSize::G16, GridSize::G32, GridSize::G64]
    }

    /// Parse a persisted cell count back into a variant. Saved artwork
    /// records store the raw number, so unknown values must be rejected
    /// rather than defaulted (the raster would be misinterpreted).
    pub fn from_cells(cells: u32) -> Option<GridSize> {
        GridSize::all().iter().copied().find(|g| g.cells() == cells)
    }
}

// ============================================================================
// CODEC ERRORS
// ============================================================================

/// Error type for canvas PNG round-trips.
#[derive(Debug)]
pub enum CodecError {
    Encode(ImageError),
    Decode(ImageError),
    /// Decoded image was not `CANVAS_SIZE × CANVAS_SIZE`.
    Dimensions(u32, u32),
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::Encode(e) => write!(f, "PNG encode error: {}", e),
            CodecError::Decode(e) => write!(f, "PNG decode error: {}", e),
            CodecError::Dimensions(w, h) => write!(
                f,
                "unexpected image dimensions {}×{} (expected {}×{})",
                w, h, CANVAS_SIZE, CANVAS_SIZE
            ),
        }
    }
}

impl std::error::Error for CodecError {}

// ============================================================================
// PIXEL CANVAS — the raster grid editor core
// ============================================================================

/// A fixed 512×512 RGBA raster with a logical G×G grid laid over it.
///
/// All drawing happens at cell granularity: a cell's color is whatever its
/// center raster pixel holds, and painting a cell fills its whole
/// `cell_size × cell_size` block. The raster is owned exclusively by this
/// struct and mutated only through the methods below.
pub struct PixelCanvas {
    pixels: RgbaImage,
    grid: GridSize,
    /// Bumped on every mutation so the UI shell knows when to re-upload
    /// its display texture.
    revision: u64,
}

impl PixelCanvas {
    /// Fresh white canvas with the given grid.
    pub fn new(grid: GridSize) -> Self {
        let pixels = RgbaImage::from_pixel(CANVAS_SIZE, CANVAS_SIZE, BACKGROUND);
        Self {
            pixels,
            grid,
            revision: 0,
        }
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Raw raster access for texture upload. Read-only; mutations go
    /// through `set_cell` / `flood_fill` / `clear`.
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    // ---- grid coordinate mapping ------------------------------------------

    /// Map a raster-pixel position (e.g. a pointer position relative to the
    /// canvas origin) to a grid cell. Positions outside the canvas yield
    /// `None`, which call sites treat as a silent no-op — the edge-case
    /// policy for pointer events near the canvas border.
    pub fn cell_at(&self, px: f32, py: f32) -> Option<(u32, u32)> {
        if px < 0.0 || py < 0.0 {
            return None;
        }
        let cell = self.grid.cell_size() as f32;
        let gx = (px / cell).floor() as u32;
        let gy = (py / cell).floor() as u32;
        if gx < self.grid.cells() && gy < self.grid.cells() {
            Some((gx, gy))
        } else {
            None
        }
    }

    /// Color of a cell, sampled at its center raster pixel. Center sampling
    /// tolerates stale pixels near cell boundaries; the fill relies on it.
    pub fn cell_color(&self, gx: u32, gy: u32) -> Rgba<u8> {
        let cell = self.grid.cell_size();
        let cx = gx * cell + cell / 2;
        let cy = gy * cell + cell / 2;
        *self.pixels.get_pixel(cx, cy)
    }

    // ---- painting ----------------------------------------------------------

    /// Fill one cell's raster block with `color`. Out-of-range coordinates
    /// are ignored (the mapping guard in `cell_at` normally prevents them).
    pub fn set_cell(&mut self, gx: u32, gy: u32, color: Rgba<u8>) {
        if gx >= self.grid.cells() || gy >= self.grid.cells() {
            return;
        }
        let cell = self.grid.cell_size();
        let (x0, y0) = (gx * cell, gy * cell);
        for y in y0..y0 + cell {
            for x in x0..x0 + cell {
                self.pixels.put_pixel(x, y, color);
            }
        }
        self.revision += 1;
    }

    /// Repaint the maximal 4-connected region of the seed cell's color.
    ///
    /// Explicit-stack DFS over grid cells (visit order is unspecified; only
    /// the final filled set is deterministic). Each eligible cell is painted
    /// and marked visited before its neighbors are pushed, so the loop
    /// touches at most G² cells.
    pub fn flood_fill(&mut self, start_gx: u32, start_gy: u32, new_color: Rgba<u8>) {
        let cells = self.grid.cells();
        if start_gx >= cells || start_gy >= cells {
            return;
        }

        let target_color = self.cell_color(start_gx, start_gy);
        if target_color == new_color {
            // Filling a region with its own color never changes the raster;
            // bail before allocating the visited map.
            return;
        }

        let mut visited = vec![false; (cells * cells) as usize];
        let mut stack = vec![(start_gx, start_gy)];

        while let Some((gx, gy)) = stack.pop() {
            let idx = (gy * cells + gx) as usize;
            if visited[idx] {
                continue;
            }
            if self.cell_color(gx, gy) != target_color {
                continue;
            }

            self.set_cell(gx, gy, new_color);
            visited[idx] = true;

            if gx + 1 < cells {
                stack.push((gx + 1, gy));
            }
            if gx > 0 {
                stack.push((gx - 1, gy));
            }
            if gy + 1 < cells {
                stack.push((gx, gy + 1));
            }
            if gy > 0 {
                stack.push((gx, gy - 1));
            }
        }
    }

    /// Refill the whole raster with the background color.
    pub fn clear(&mut self) {
        for px in self.pixels.pixels_mut() {
            *px = BACKGROUND;
        }
        self.revision += 1;
    }

    // ---- grid resize -------------------------------------------------------

    /// Switch the logical grid. The raster content is left untouched — the
    /// caller decides whether to clear (the UI does, behind a confirmation
    /// gate; loading an artwork restores the raster right after).
    pub fn set_grid_size(&mut self, grid: GridSize) {
        self.grid = grid;
        self.revision += 1;
    }

    // ---- persistence codec -------------------------------------------------

    /// Encode the full raster as a lossless PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>, CodecError> {
        let mut out = Cursor::new(Vec::new());
        let encoder = PngEncoder::new(&mut out);
        #[allow(deprecated)]
        encoder
            .encode(
                self.pixels.as_raw(),
                CANVAS_SIZE,
                CANVAS_SIZE,
                image::ColorType::Rgba8,
            )
            .map_err(CodecError::Encode)?;
        Ok(out.into_inner())
    }

    /// Decode a PNG produced by `encode_png` back into a canvas with the
    /// given grid. Replaces all prior content; pixel-for-pixel lossless.
    pub fn decode_png(bytes: &[u8], grid: GridSize) -> Result<Self, CodecError> {
        let img = image::load_from_memory(bytes)
            .map_err(CodecError::Decode)?
            .into_rgba8();
        let (w, h) = img.dimensions();
        if w != CANVAS_SIZE || h != CANVAS_SIZE {
            return Err(CodecError::Dimensions(w, h));
        }
        Ok(Self {
            pixels: img,
            grid,
            revision: 0,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);

    #[test]
    fn grid_sizes_divide_canvas_evenly() {
        for g in GridSize::all() {
            assert_eq!(g.cells() * g.cell_size(), CANVAS_SIZE);
        }
    }

    #[test]
    fn from_cells_rejects_unknown_counts() {
        assert_eq!(GridSize::from_cells(16), Some(GridSize::G16));
        assert_eq!(GridSize::from_cells(7), None);
        assert_eq!(GridSize::from_cells(0), None);
    }

    #[test]
    fn set_cell_then_center_sample_round_trips() {
        for g in GridSize::all() {
            let mut canvas = PixelCanvas::new(*g);
            for gy in 0..g.cells() {
                for gx in 0..g.cells() {
                    canvas.set_cell(gx, gy, RED);
                    assert_eq!(canvas.cell_color(gx, gy), RED);
                }
            }
        }
    }

    #[test]
    fn set_cell_fills_the_whole_block() {
        let mut canvas = PixelCanvas::new(GridSize::G16);
        canvas.set_cell(3, 5, BLUE);
        let cell = GridSize::G16.cell_size();
        for y in 5 * cell..6 * cell {
            for x in 3 * cell..4 * cell {
                assert_eq!(*canvas.pixels().get_pixel(x, y), BLUE);
            }
        }
        // Neighboring cells stay untouched.
        assert_eq!(canvas.cell_color(2, 5), BACKGROUND);
        assert_eq!(canvas.cell_color(4, 5), BACKGROUND);
    }

    #[test]
    fn cell_at_maps_and_rejects() {
        let canvas = PixelCanvas::new(GridSize::G16);
        let cell = GridSize::G16.cell_size() as f32;
        assert_eq!(canvas.cell_at(0.0, 0.0), Some((0, 0)));
        assert_eq!(canvas.cell_at(cell - 0.5, cell - 0.5), Some((0, 0)));
        assert_eq!(canvas.cell_at(cell, cell), Some((1, 1)));
        assert_eq!(canvas.cell_at(511.9, 511.9), Some((15, 15)));
        assert_eq!(canvas.cell_at(-0.1, 10.0), None);
        assert_eq!(canvas.cell_at(512.0, 10.0), None);
        assert_eq!(canvas.cell_at(10.0, 600.0), None);
    }

    #[test]
    fn flood_fill_uniform_canvas_repaints_everything() {
        let mut canvas = PixelCanvas::new(GridSize::G16);
        canvas.flood_fill(0, 0, BLUE);
        for gy in 0..16 {
            for gx in 0..16 {
                assert_eq!(canvas.cell_color(gx, gy), BLUE);
            }
        }
    }

    #[test]
    fn flood_fill_same_color_is_a_noop() {
        let mut canvas = PixelCanvas::new(GridSize::G16);
        canvas.set_cell(0, 0, BLUE);
        let before = canvas.pixels().clone();
        canvas.flood_fill(0, 0, BLUE);
        assert_eq!(canvas.pixels().as_raw(), before.as_raw());
    }

    #[test]
    fn flood_fill_respects_4_connectivity() {
        // Checkerboard: diagonal neighbors share a color but are not
        // 4-connected, so a fill must stay on a single cell.
        let mut canvas = PixelCanvas::new(GridSize::G8);
        for gy in 0..8 {
            for gx in 0..8 {
                let color = if (gx + gy) % 2 == 0 { RED } else { BLUE };
                canvas.set_cell(gx, gy, color);
            }
        }
        canvas.flood_fill(0, 0, GREEN);
        for gy in 0..8u32 {
            for gx in 0..8u32 {
                let expected = if (gx, gy) == (0, 0) {
                    GREEN
                } else if (gx + gy) % 2 == 0 {
                    RED
                } else {
                    BLUE
                };
                assert_eq!(canvas.cell_color(gx, gy), expected, "at ({}, {})", gx, gy);
            }
        }
    }

    #[test]
    fn flood_fill_stops_at_region_border() {
        // Vertical wall splits the canvas; fill on the left must not leak.
        let mut canvas = PixelCanvas::new(GridSize::G16);
        for gy in 0..16 {
            canvas.set_cell(8, gy, RED);
        }
        canvas.flood_fill(0, 0, BLUE);
        for gy in 0..16 {
            for gx in 0..8 {
                assert_eq!(canvas.cell_color(gx, gy), BLUE);
            }
            assert_eq!(canvas.cell_color(8, gy), RED);
            for gx in 9..16 {
                assert_eq!(canvas.cell_color(gx, gy), BACKGROUND);
            }
        }
    }

    #[test]
    fn flood_fill_twice_is_idempotent() {
        let mut canvas = PixelCanvas::new(GridSize::G16);
        for gy in 0..16 {
            for gx in 0..16 {
                canvas.set_cell(gx, gy, RED);
            }
        }
        canvas.flood_fill(0, 0, BLUE);
        let after_first = canvas.pixels().clone();
        canvas.flood_fill(0, 0, BLUE);
        assert_eq!(canvas.pixels().as_raw(), after_first.as_raw());
    }

    #[test]
    fn flood_fill_out_of_bounds_seed_is_ignored() {
        let mut canvas = PixelCanvas::new(GridSize::G8);
        let before = canvas.pixels().clone();
        canvas.flood_fill(8, 0, BLUE);
        canvas.flood_fill(0, 200, BLUE);
        assert_eq!(canvas.pixels().as_raw(), before.as_raw());
    }

    #[test]
    fn png_round_trip_is_lossless_for_every_grid() {
        for g in GridSize::all() {
            let mut canvas = PixelCanvas::new(*g);
            for gy in 0..g.cells() {
                for gx in 0..g.cells() {
                    let color = Rgba([
                        (gx * 17 % 256) as u8,
                        (gy * 29 % 256) as u8,
                        ((gx + gy) * 13 % 256) as u8,
                        255,
                    ]);
                    canvas.set_cell(gx, gy, color);
                }
            }
            let png = canvas.encode_png().unwrap();
            let restored = PixelCanvas::decode_png(&png, *g).unwrap();
            assert_eq!(restored.grid(), *g);
            assert_eq!(restored.pixels().as_raw(), canvas.pixels().as_raw());
        }
    }

    #[test]
    fn decode_rejects_wrong_dimensions() {
        let small = RgbaImage::from_pixel(100, 100, BACKGROUND);
        let mut out = Cursor::new(Vec::new());
        #[allow(deprecated)]
        PngEncoder::new(&mut out)
            .encode(small.as_raw(), 100, 100, image::ColorType::Rgba8)
            .unwrap();
        match PixelCanvas::decode_png(&out.into_inner(), GridSize::G16) {
            Err(CodecError::Dimensions(100, 100)) => {}
            other => panic!("expected dimension error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn set_grid_size_keeps_raster_content() {
        let mut canvas = PixelCanvas::new(GridSize::G8);
        canvas.set_cell(0, 0, RED);
        canvas.set_grid_size(GridSize::G16);
        assert_eq!(canvas.grid().cell_size(), 32);
        // The old 64px block now spans the first 2×2 cells of the new grid.
        assert_eq!(canvas.cell_color(0, 0), RED);
        assert_eq!(canvas.cell_color(1, 1), RED);
        assert_eq!(canvas.cell_color(2, 2), BACKGROUND);
    }
}
