//! Window geometry and snap-to-center while dragging

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }

    /// Overlapping part of two rects, if any
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = (self.x + self.width).min(other.x + other.width);
        let bottom = (self.y + self.height).min(other.y + other.height);
        (right > left && bottom > top).then(|| Rect::new(left, top, right - left, bottom - top))
    }

    /// Origin that centers a `width` x `height` window inside this rect
    pub fn centered_origin(&self, width: f32, height: f32) -> (f32, f32) {
        (
            self.x + (self.width - width) / 2.0,
            self.y + (self.height - height) / 2.0,
        )
    }
}

/// Snap a dragged window's center to the screen center, per axis.
/// Returns the new origin if either axis snapped, None otherwise.
pub fn find_snap_position(dragged: Rect, screen: Rect, threshold: f32) -> Option<(f32, f32)> {
    if threshold <= 0.0 {
        return None; // Snapping disabled
    }

    let snap_x = check_snap(dragged.center_x(), screen.center_x(), threshold)
        .map(|target| target - dragged.width / 2.0);
    let snap_y = check_snap(dragged.center_y(), screen.center_y(), threshold)
        .map(|target| target - dragged.height / 2.0);

    match (snap_x, snap_y) {
        (Some(x), Some(y)) => Some((x, y)),
        (Some(x), None) => Some((x, dragged.y)),
        (None, Some(y)) => Some((dragged.x, y)),
        (None, None) => None,
    }
}

fn check_snap(center: f32, target: f32, threshold: f32) -> Option<f32> {
    ((center - target).abs() < threshold).then_some(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Rect = Rect { x: 0.0, y: 0.0, width: 1920.0, height: 1080.0 };

    #[test]
    fn test_snap_x_only() {
        // Center at (965, 300): 5px off horizontally, far off vertically
        let dragged = Rect::new(765.0, 225.0, 400.0, 150.0);
        let snapped = find_snap_position(dragged, SCREEN, 15.0);
        assert_eq!(snapped, Some((760.0, 225.0)));
    }

    #[test]
    fn test_snap_y_only() {
        let dragged = Rect::new(100.0, 470.0, 400.0, 150.0);
        assert_eq!(find_snap_position(dragged, SCREEN, 15.0), Some((100.0, 465.0)));
    }

    #[test]
    fn test_snap_both_axes() {
        let dragged = Rect::new(770.0, 455.0, 400.0, 150.0);
        assert_eq!(find_snap_position(dragged, SCREEN, 15.0), Some((760.0, 465.0)));
    }

    #[test]
    fn test_no_snap_outside_threshold() {
        let dragged = Rect::new(780.0, 300.0, 400.0, 150.0); // 20px off on x
        assert_eq!(find_snap_position(dragged, SCREEN, 15.0), None);
    }

    #[test]
    fn test_snap_relative_to_offset_screen() {
        let screen = Rect::new(1920.0, 25.0, 2560.0, 1415.0);
        let dragged = Rect::new(2900.0, 0.0, 600.0, 200.0); // center x = 3200 = screen center
        assert_eq!(find_snap_position(dragged, screen, 15.0), Some((2900.0, 0.0)));
    }

    #[test]
    fn test_snap_disabled_with_zero_threshold() {
        let dragged = Rect::new(760.0, 465.0, 400.0, 150.0);
        assert_eq!(find_snap_position(dragged, SCREEN, 0.0), None);
    }

    #[test]
    fn test_centered_origin_exact() {
        let usable = Rect::new(1920.0, 25.0, 2560.0, 1415.0);
        let (x, y) = usable.centered_origin(400.0, 150.0);
        assert!((x - 3000.0).abs() < f32::EPSILON);
        assert!((y - 657.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_intersect() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 25.0, 100.0, 100.0);
        assert_eq!(a.intersect(&b), Some(Rect::new(50.0, 25.0, 50.0, 75.0)));
        assert_eq!(a.intersect(&Rect::new(200.0, 0.0, 10.0, 10.0)), None);
    }
}
