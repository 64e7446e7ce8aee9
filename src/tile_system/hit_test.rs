use bevy::prelude::*;
use image::RgbaImage;

use crate::resources::constants::ALPHA_THRESHOLD;
use crate::tile_system::types::GridCell;

/// A loaded tile as seen by the hit-tester
#[derive(Debug, Clone, Copy)]
pub struct HitCandidate<'a> {
    pub cell: GridCell,
    /// Where the sprite is drawn, in window coordinates
    pub rect: Rect,
    /// Pixels currently displayed (tile image or placeholder)
    pub pixels: &'a RgbaImage,
    /// Whether `pixels` is the tile's own image
    pub ready: bool,
}

impl HitCandidate<'_> {
    /// Alpha at a window-space point, stretched from the sprite rect onto the
    /// image. Points outside the image read as fully transparent.
    pub fn alpha_at(&self, point: Vec2) -> u8 {
        let size = self.rect.size();
        if size.x <= 0.0 || size.y <= 0.0 {
            return 0;
        }

        let local = (point - self.rect.min) / size;
        let px = (local.x * self.pixels.width() as f32).floor();
        let py = (local.y * self.pixels.height() as f32).floor();
        if px < 0.0 || py < 0.0 {
            return 0;
        }

        match self.pixels.get_pixel_checked(px as u32, py as u32) {
            Some(pixel) => pixel.0[3],
            None => 0,
        }
    }

    pub fn is_opaque_at(&self, point: Vec2) -> bool {
        self.alpha_at(point) >= ALPHA_THRESHOLD
    }
}

/// Resolve the tile a click at `point` was meant for.
///
/// `stack` holds the loaded tiles bottom to top. The topmost tile whose rect
/// contains the point is the one the pointer literally landed on; if it is
/// transparent there, the tiles underneath are tried from the top down and the
/// first opaque one wins. When none is opaque the topmost of them is returned
/// as a best guess.
pub fn resolve_click(stack: &[HitCandidate], point: Vec2) -> Option<GridCell> {
    let clicked_index = stack.iter().rposition(|c| c.rect.contains(point))?;
    let clicked = &stack[clicked_index];

    if clicked.is_opaque_at(point) {
        return Some(clicked.cell);
    }

    let candidates: Vec<&HitCandidate> = stack[..clicked_index]
        .iter()
        .rev()
        .filter(|c| c.rect.contains(point))
        .collect();

    candidates
        .iter()
        .filter(|c| c.ready)
        .find(|c| c.is_opaque_at(point))
        .or_else(|| candidates.first())
        .map(|c| c.cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn filled(alpha: u8) -> RgbaImage {
        RgbaImage::from_pixel(4, 4, Rgba([90, 140, 60, alpha]))
    }

    fn candidate(cell: GridCell, rect: Rect, pixels: &RgbaImage) -> HitCandidate<'_> {
        HitCandidate { cell, rect, pixels, ready: true }
    }

    #[test]
    fn opaque_top_tile_wins() {
        let below = filled(255);
        let above = filled(255);
        let a = GridCell::new(0, 0);
        let b = GridCell::new(1, 0);
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let stack = [candidate(a, rect, &below), candidate(b, rect, &above)];

        assert_eq!(resolve_click(&stack, Vec2::new(50.0, 50.0)), Some(b));
    }

    #[test]
    fn transparent_top_falls_through_to_opaque_tile_below() {
        let opaque = filled(255);
        let clear = filled(0);
        let below = GridCell::new(4, 4);
        let above = GridCell::new(5, 4);
        let stack = [
            candidate(below, Rect::new(10.0, 10.0, 90.0, 90.0), &opaque),
            candidate(above, Rect::new(0.0, 0.0, 100.0, 100.0), &clear),
        ];

        assert_eq!(resolve_click(&stack, Vec2::new(40.0, 60.0)), Some(below));
    }

    #[test]
    fn sampling_follows_local_pixel() {
        // Left half transparent, right half opaque
        let mut split = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 0]));
        split.put_pixel(1, 0, Rgba([0, 0, 0, 255]));
        let solid = filled(255);

        let below = GridCell::new(2, 2);
        let above = GridCell::new(3, 2);
        let rect = Rect::new(0.0, 0.0, 200.0, 100.0);
        let stack = [candidate(below, rect, &solid), candidate(above, rect, &split)];

        assert_eq!(resolve_click(&stack, Vec2::new(150.0, 50.0)), Some(above));
        assert_eq!(resolve_click(&stack, Vec2::new(50.0, 50.0)), Some(below));
    }

    #[test]
    fn alpha_below_threshold_counts_as_transparent() {
        let faint = filled(ALPHA_THRESHOLD - 1);
        let solid = filled(ALPHA_THRESHOLD);
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!candidate(GridCell::new(0, 0), rect, &faint).is_opaque_at(Vec2::new(5.0, 5.0)));
        assert!(candidate(GridCell::new(0, 0), rect, &solid).is_opaque_at(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn unloaded_candidates_are_skipped() {
        let opaque = filled(255);
        let clear = filled(0);
        let bottom = GridCell::new(0, 1);
        let pending = GridCell::new(0, 2);
        let top = GridCell::new(0, 3);
        let rect = Rect::new(0.0, 0.0, 50.0, 50.0);
        let stack = [
            candidate(bottom, rect, &opaque),
            HitCandidate { cell: pending, rect, pixels: &opaque, ready: false },
            candidate(top, rect, &clear),
        ];

        assert_eq!(resolve_click(&stack, Vec2::new(25.0, 25.0)), Some(bottom));
    }

    #[test]
    fn no_opaque_candidate_falls_back_to_topmost_underneath() {
        let clear = filled(0);
        let lowest = GridCell::new(6, 6);
        let middle = GridCell::new(6, 7);
        let top = GridCell::new(7, 7);
        let rect = Rect::new(0.0, 0.0, 50.0, 50.0);
        let stack = [
            candidate(lowest, rect, &clear),
            candidate(middle, rect, &clear),
            candidate(top, rect, &clear),
        ];

        assert_eq!(resolve_click(&stack, Vec2::new(10.0, 10.0)), Some(middle));
    }

    #[test]
    fn lone_transparent_tile_resolves_to_nothing() {
        let clear = filled(0);
        let stack = [candidate(GridCell::new(1, 1), Rect::new(0.0, 0.0, 50.0, 50.0), &clear)];
        assert_eq!(resolve_click(&stack, Vec2::new(10.0, 10.0)), None);
    }

    #[test]
    fn click_outside_every_tile_resolves_to_nothing() {
        let opaque = filled(255);
        let stack = [candidate(GridCell::new(1, 1), Rect::new(0.0, 0.0, 50.0, 50.0), &opaque)];
        assert_eq!(resolve_click(&stack, Vec2::new(80.0, 10.0)), None);
        assert_eq!(resolve_click(&[], Vec2::ZERO), None);
    }

    #[test]
    fn tiles_not_under_the_point_are_not_candidates() {
        let opaque = filled(255);
        let clear = filled(0);
        let elsewhere = GridCell::new(9, 9);
        let top = GridCell::new(1, 1);
        let stack = [
            candidate(elsewhere, Rect::new(200.0, 200.0, 250.0, 250.0), &opaque),
            candidate(top, Rect::new(0.0, 0.0, 50.0, 50.0), &clear),
        ];
        assert_eq!(resolve_click(&stack, Vec2::new(10.0, 10.0)), None);
    }
}
