//! Placement of newly created content.
//!
//! Pure functions over bounds; callers pass in whatever is currently on the
//! canvas. Nothing here touches the store.

use crate::config::EditorConfig;
use crate::viewport::{CanvasSize, Viewport};
use kurbo::{Point, Rect, Size};

/// Top-left corner for a new row of content.
///
/// With nothing on the canvas the row is centered in the visible area
/// (the canvas minus the chat panel). Otherwise it starts at the leftmost
/// existing x, `new_size.height + row_margin` below the lowest existing top
/// edge.
pub fn layout_next_row(
    existing: impl IntoIterator<Item = Rect>,
    new_size: Size,
    canvas: CanvasSize,
    viewport: &Viewport,
    config: &EditorConfig,
) -> Point {
    let mut min_x = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for r in existing {
        min_x = min_x.min(r.x0);
        max_y = max_y.max(r.y0);
    }

    if min_x.is_finite() {
        return Point::new(min_x, max_y + new_size.height + config.row_margin);
    }

    let center = visible_center(canvas, viewport, config);
    Point::new(
        center.x - new_size.width / 2.0,
        center.y - new_size.height / 2.0,
    )
}

/// World point under the center of the visible canvas area.
pub fn visible_center(canvas: CanvasSize, viewport: &Viewport, config: &EditorConfig) -> Point {
    let visible_width = (canvas.width - config.chat_panel_width).max(0.0);
    viewport.screen_to_world(Point::new(visible_width / 2.0, canvas.height / 2.0))
}

/// Position of item `index` in a row starting at `origin`.
pub fn row_slot(origin: Point, size: Size, index: usize, gap: f64) -> Point {
    Point::new(origin.x + index as f64 * (size.width + gap), origin.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Vec2;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_canvas_centers_in_visible_area() {
        let cfg = EditorConfig::default();
        let canvas = CanvasSize {
            width: 1600.0,
            height: 800.0,
        };
        let p = layout_next_row(
            Vec::<Rect>::new(),
            Size::new(300.0, 300.0),
            canvas,
            &Viewport::default(),
            &cfg,
        );
        // Visible width 1000 → center (500, 400).
        assert_eq!(p, Point::new(350.0, 250.0));
    }

    #[test]
    fn empty_canvas_respects_viewport() {
        let cfg = EditorConfig::default();
        let canvas = CanvasSize {
            width: 1600.0,
            height: 800.0,
        };
        let vp = Viewport {
            scale: 2.0,
            offset: Vec2::new(100.0, 0.0),
        };
        let p = layout_next_row(Vec::<Rect>::new(), Size::new(100.0, 100.0), canvas, &vp, &cfg);
        assert_eq!(p, Point::new(150.0, 150.0));
    }

    #[test]
    fn next_row_goes_below_lowest_row() {
        let cfg = EditorConfig::default();
        let existing = [
            Rect::new(100.0, 100.0, 280.0, 200.0),
            Rect::new(-20.0, 50.0, 80.0, 120.0),
        ];
        let p = layout_next_row(
            existing,
            Size::new(300.0, 300.0),
            CanvasSize::default(),
            &Viewport::default(),
            &cfg,
        );
        // Lowest top edge is 100: 100 + 300 + 20.
        assert_eq!(p, Point::new(-20.0, 420.0));
    }

    #[test]
    fn next_row_offset_follows_new_item_height() {
        let cfg = EditorConfig::default();
        let existing = [Rect::new(0.0, 0.0, 300.0, 300.0)];
        let small = layout_next_row(
            existing,
            Size::new(180.0, 100.0),
            CanvasSize::default(),
            &Viewport::default(),
            &cfg,
        );
        assert_eq!(small, Point::new(0.0, 120.0));
    }

    #[test]
    fn row_slots_advance_by_width_and_gap() {
        let origin = Point::new(10.0, 5.0);
        let size = Size::new(300.0, 300.0);
        assert_eq!(row_slot(origin, size, 0, 20.0), origin);
        assert_eq!(row_slot(origin, size, 2, 20.0), Point::new(650.0, 5.0));
    }
}
