//! Borderless clock window behavior: drag, snap-to-center, edge resize and
//! geometry persistence
//!
//! egui reports the native frame in points; the display enumerator works in
//! screen pixels. `ViewportWindow` converts between the two.

use eframe::egui::{self, Pos2, ResizeDirection, ViewportCommand};
use raw_window_handle::{HasWindowHandle, RawWindowHandle};
use tracing::{debug, info};

use crate::config::SettingsStore;
use crate::constants::placement::{RESIZE_MARGIN, SNAP_THRESHOLD};
use crate::displays::{DisplayManager, HostWindow};
use crate::snapping::{Rect, find_snap_position};

/// The root viewport seen as a placeable window, in screen pixels
pub struct ViewportWindow<'a> {
    ctx: &'a egui::Context,
    frame: Rect,
    pixels_per_point: f32,
}

impl<'a> ViewportWindow<'a> {
    /// `None` until the native window has reported its frame
    pub fn current(ctx: &'a egui::Context) -> Option<Self> {
        let (outer, pixels_per_point) = ctx.input(|i| (i.viewport().outer_rect, i.pixels_per_point));
        let outer = outer?;
        Some(Self {
            ctx,
            frame: points_to_pixels(outer, pixels_per_point),
            pixels_per_point,
        })
    }
}

impl HostWindow for ViewportWindow<'_> {
    fn frame(&self) -> Rect {
        self.frame
    }

    fn set_origin(&mut self, x: f32, y: f32) {
        self.frame.x = x;
        self.frame.y = y;
        let position = Pos2::new(x / self.pixels_per_point, y / self.pixels_per_point);
        self.ctx
            .send_viewport_cmd_to(egui::ViewportId::ROOT, ViewportCommand::OuterPosition(position));
    }
}

fn points_to_pixels(rect: egui::Rect, pixels_per_point: f32) -> Rect {
    Rect::new(
        rect.min.x * pixels_per_point,
        rect.min.y * pixels_per_point,
        rect.width() * pixels_per_point,
        rect.height() * pixels_per_point,
    )
}

/// Tracks the clock window frame across frames
#[derive(Debug, Default)]
pub struct WindowTracker {
    last_frame: Option<egui::Rect>,
    dragging: bool,
    placed: bool,
    on_all_workspaces: bool,
}

impl WindowTracker {
    /// On the first frame with a known window frame, center on the selected
    /// display if it is connected
    pub fn place_on_startup(&mut self, ctx: &egui::Context, store: &SettingsStore, displays: &DisplayManager) {
        if self.placed {
            return;
        }
        let Some(mut window) = ViewportWindow::current(ctx) else {
            return;
        };
        self.placed = true;

        let selected = &store.settings().selected_display_id;
        if !selected.is_empty() {
            displays.center_window_on(&mut window, selected);
        }
    }

    /// Keep the clock on every workspace, retrying each frame until the
    /// native window is mapped
    pub fn show_on_all_workspaces(&mut self, native: &impl HasWindowHandle, displays: &DisplayManager) {
        if self.on_all_workspaces {
            return;
        }
        self.on_all_workspaces = match x11_window_id(native) {
            Some(window) => displays.show_on_all_workspaces(window),
            None => {
                debug!("Not an X11 window, workspace pinning skipped");
                true
            }
        };
    }

    /// Hand the move over to the window manager
    pub fn begin_drag(&mut self, ctx: &egui::Context) {
        debug!("Starting window drag");
        self.dragging = true;
        ctx.send_viewport_cmd(ViewportCommand::StartDrag);
    }

    /// Persist any move or resize seen since the last frame, snapping to the
    /// display center while a drag is in progress
    pub fn observe(&mut self, ctx: &egui::Context, store: &mut SettingsStore, displays: &DisplayManager) {
        let (outer, primary_down, primary_released) = ctx.input(|i| {
            (
                i.viewport().outer_rect,
                i.pointer.primary_down(),
                i.pointer.primary_released(),
            )
        });
        let Some(outer) = outer else {
            return;
        };

        let moved = self.last_frame != Some(outer);
        if self.dragging && (primary_released || (!moved && !primary_down)) {
            debug!("Window drag finished");
            self.dragging = false;
        }
        if self.dragging && moved {
            self.snap_to_center(ctx, displays);
        }

        if moved {
            self.last_frame = Some(outer);
            store.set_frame(
                outer.min.x as f64,
                outer.min.y as f64,
                outer.width() as f64,
                outer.height() as f64,
            );
        }
    }

    fn snap_to_center(&self, ctx: &egui::Context, displays: &DisplayManager) {
        let Some(mut window) = ViewportWindow::current(ctx) else {
            return;
        };
        let frame = window.frame();
        let Some(target) = displays.display_at(frame.center_x(), frame.center_y()) else {
            return;
        };

        if let Some((x, y)) = find_snap_position(frame, target.usable, SNAP_THRESHOLD)
            && (x != frame.x || y != frame.y)
        {
            info!(display = %target.id, x = x, y = y, "Snapping clock to display center");
            window.set_origin(x, y);
        }
    }

    /// Cursor for hovering an edge, and a native resize when the primary
    /// button is pressed there. Returns true if the pointer is on a resize edge.
    pub fn handle_edge_resize(&mut self, ctx: &egui::Context, rect: egui::Rect) -> bool {
        let (hover, pressed) = ctx.input(|i| (i.pointer.hover_pos(), i.pointer.primary_pressed()));
        let Some(direction) = hover.and_then(|pos| resize_direction(rect, pos, RESIZE_MARGIN)) else {
            return false;
        };

        ctx.set_cursor_icon(cursor_for(direction));
        if pressed {
            debug!(?direction, "Starting window resize");
            // The window manager may have swallowed the release that ended a drag
            self.dragging = false;
            ctx.send_viewport_cmd(ViewportCommand::BeginResize(direction));
        }
        true
    }
}

/// X11 window id of a native window, `None` on other platforms
fn x11_window_id(native: &impl HasWindowHandle) -> Option<u32> {
    match native.window_handle().ok()?.as_raw() {
        RawWindowHandle::Xlib(handle) => u32::try_from(handle.window).ok(),
        RawWindowHandle::Xcb(handle) => Some(handle.window.get()),
        _ => None,
    }
}

/// Which edge or corner of `rect` the pointer is over, if within `margin`
pub fn resize_direction(rect: egui::Rect, pointer: Pos2, margin: f32) -> Option<ResizeDirection> {
    if !rect.expand(0.5).contains(pointer) {
        return None;
    }
    let left = pointer.x - rect.left() < margin;
    let right = rect.right() - pointer.x < margin;
    let top = pointer.y - rect.top() < margin;
    let bottom = rect.bottom() - pointer.y < margin;

    match (left, right, top, bottom) {
        (true, _, true, _) => Some(ResizeDirection::NorthWest),
        (_, true, true, _) => Some(ResizeDirection::NorthEast),
        (true, _, _, true) => Some(ResizeDirection::SouthWest),
        (_, true, _, true) => Some(ResizeDirection::SouthEast),
        (true, _, _, _) => Some(ResizeDirection::West),
        (_, true, _, _) => Some(ResizeDirection::East),
        (_, _, true, _) => Some(ResizeDirection::North),
        (_, _, _, true) => Some(ResizeDirection::South),
        _ => None,
    }
}

fn cursor_for(direction: ResizeDirection) -> egui::CursorIcon {
    match direction {
        ResizeDirection::North => egui::CursorIcon::ResizeNorth,
        ResizeDirection::South => egui::CursorIcon::ResizeSouth,
        ResizeDirection::East => egui::CursorIcon::ResizeEast,
        ResizeDirection::West => egui::CursorIcon::ResizeWest,
        ResizeDirection::NorthEast => egui::CursorIcon::ResizeNorthEast,
        ResizeDirection::NorthWest => egui::CursorIcon::ResizeNorthWest,
        ResizeDirection::SouthEast => egui::CursorIcon::ResizeSouthEast,
        ResizeDirection::SouthWest => egui::CursorIcon::ResizeSouthWest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::store::tests::memory_store;
    use crate::displays::tests::{FakeDisplays, display};
    use eframe::egui::{Event, Modifiers, PointerButton, RawInput, ViewportId};

    fn window() -> egui::Rect {
        egui::Rect::from_min_size(Pos2::ZERO, egui::vec2(400.0, 150.0))
    }

    fn frame_at(x: f32, y: f32) -> egui::Rect {
        egui::Rect::from_min_size(Pos2::new(x, y), egui::vec2(400.0, 150.0))
    }

    /// One 1920x1080 display at the origin and one 2560x1440 to its right
    fn displays() -> DisplayManager {
        let source = FakeDisplays::default();
        source.displays.borrow_mut().extend([
            display(
                "eDP-1",
                Rect::new(0.0, 0.0, 1920.0, 1080.0),
                Rect::new(0.0, 0.0, 1920.0, 1080.0),
            ),
            display(
                "DP-2",
                Rect::new(1920.0, 0.0, 2560.0, 1440.0),
                Rect::new(1920.0, 0.0, 2560.0, 1440.0),
            ),
        ]);
        DisplayManager::new(Box::new(source))
    }

    /// Run one headless pass with the native window at `outer`, returning the
    /// commands sent to the root viewport
    fn run_pass(
        ctx: &egui::Context,
        outer: egui::Rect,
        events: Vec<Event>,
        mut body: impl FnMut(&egui::Context),
    ) -> Vec<ViewportCommand> {
        let mut input = RawInput {
            events,
            ..RawInput::default()
        };
        input.viewports.entry(ViewportId::ROOT).or_default().outer_rect = Some(outer);
        let output = ctx.run(input, |ctx| body(ctx));
        output
            .viewport_output
            .get(&ViewportId::ROOT)
            .map(|viewport| viewport.commands.clone())
            .unwrap_or_default()
    }

    fn moves(commands: &[ViewportCommand]) -> Vec<Pos2> {
        commands
            .iter()
            .filter_map(|command| match command {
                ViewportCommand::OuterPosition(pos) => Some(*pos),
                _ => None,
            })
            .collect()
    }

    fn primary(pos: Pos2, pressed: bool) -> Vec<Event> {
        vec![
            Event::PointerMoved(pos),
            Event::PointerButton {
                pos,
                button: PointerButton::Primary,
                pressed,
                modifiers: Modifiers::NONE,
            },
        ]
    }

    #[test]
    fn test_every_move_and_resize_is_persisted() {
        let ctx = egui::Context::default();
        let (mut store, backend) = memory_store();
        let displays = displays();
        let mut tracker = WindowTracker::default();

        let frames = [
            frame_at(100.0, 80.0),
            frame_at(130.0, 90.0),
            egui::Rect::from_min_size(Pos2::new(130.0, 90.0), egui::vec2(520.0, 200.0)),
        ];
        for (pass, frame) in frames.into_iter().enumerate() {
            run_pass(&ctx, frame, Vec::new(), |ctx| tracker.observe(ctx, &mut store, &displays));

            let settings = store.settings();
            assert_eq!(
                (settings.x, settings.y, settings.width, settings.height),
                (
                    frame.min.x as f64,
                    frame.min.y as f64,
                    frame.width() as f64,
                    frame.height() as f64
                )
            );
            assert_eq!(*backend.saves.borrow(), pass + 1);
        }

        run_pass(&ctx, frames[2], Vec::new(), |ctx| tracker.observe(ctx, &mut store, &displays));
        assert_eq!(*backend.saves.borrow(), frames.len());
    }

    #[test]
    fn test_move_without_drag_never_snaps() {
        let ctx = egui::Context::default();
        let (mut store, _backend) = memory_store();
        let displays = displays();
        let mut tracker = WindowTracker::default();

        run_pass(&ctx, frame_at(100.0, 100.0), Vec::new(), |ctx| {
            tracker.observe(ctx, &mut store, &displays)
        });
        // Center within a few pixels of the display center on both axes
        let commands = run_pass(&ctx, frame_at(763.0, 468.0), Vec::new(), |ctx| {
            tracker.observe(ctx, &mut store, &displays)
        });

        assert!(moves(&commands).is_empty());
        assert_eq!(store.settings().x, 763.0);
    }

    #[test]
    fn test_drag_near_center_snaps_one_axis() {
        let ctx = egui::Context::default();
        let (mut store, _backend) = memory_store();
        let displays = displays();
        let mut tracker = WindowTracker::default();

        let commands = run_pass(&ctx, frame_at(100.0, 100.0), Vec::new(), |ctx| {
            tracker.observe(ctx, &mut store, &displays);
            tracker.begin_drag(ctx);
        });
        assert!(commands.contains(&ViewportCommand::StartDrag));

        // Horizontal center 5 px off the display center, vertical far away
        let commands = run_pass(&ctx, frame_at(765.0, 100.0), Vec::new(), |ctx| {
            tracker.observe(ctx, &mut store, &displays)
        });
        assert_eq!(moves(&commands), vec![Pos2::new(760.0, 100.0)]);
    }

    #[test]
    fn test_drag_snaps_on_the_display_under_the_window() {
        let ctx = egui::Context::default();
        let (mut store, _backend) = memory_store();
        let displays = displays();
        let mut tracker = WindowTracker::default();

        run_pass(&ctx, frame_at(2000.0, 100.0), Vec::new(), |ctx| {
            tracker.observe(ctx, &mut store, &displays);
            tracker.begin_drag(ctx);
        });
        // Vertical center 10 px off the 1440 px display's center
        let commands = run_pass(&ctx, frame_at(2000.0, 655.0), Vec::new(), |ctx| {
            tracker.observe(ctx, &mut store, &displays)
        });
        assert_eq!(moves(&commands), vec![Pos2::new(2000.0, 645.0)]);
    }

    #[test]
    fn test_resize_after_drag_does_not_snap() {
        let ctx = egui::Context::default();
        let (mut store, _backend) = memory_store();
        let displays = displays();
        let mut tracker = WindowTracker::default();

        run_pass(&ctx, frame_at(100.0, 100.0), primary(Pos2::new(200.0, 75.0), true), |ctx| {
            tracker.observe(ctx, &mut store, &displays);
            tracker.begin_drag(ctx);
        });

        // Button still reported down; pressing on the right edge starts a resize
        let commands = run_pass(&ctx, frame_at(100.0, 100.0), primary(Pos2::new(398.0, 75.0), true), |ctx| {
            tracker.observe(ctx, &mut store, &displays);
            assert!(tracker.handle_edge_resize(ctx, window()));
        });
        assert!(commands.contains(&ViewportCommand::BeginResize(ResizeDirection::East)));

        // Grown until its center is 5 px from the display center
        let resized = egui::Rect::from_min_size(Pos2::new(100.0, 100.0), egui::vec2(1710.0, 150.0));
        let commands = run_pass(&ctx, resized, Vec::new(), |ctx| tracker.observe(ctx, &mut store, &displays));
        assert!(moves(&commands).is_empty());
        assert_eq!(store.settings().width, 1710.0);
    }

    #[test]
    fn test_release_ends_drag() {
        let ctx = egui::Context::default();
        let (mut store, _backend) = memory_store();
        let displays = displays();
        let mut tracker = WindowTracker::default();

        run_pass(&ctx, frame_at(100.0, 100.0), primary(Pos2::new(200.0, 75.0), true), |ctx| {
            tracker.observe(ctx, &mut store, &displays);
            tracker.begin_drag(ctx);
        });
        run_pass(&ctx, frame_at(300.0, 100.0), primary(Pos2::new(200.0, 75.0), false), |ctx| {
            tracker.observe(ctx, &mut store, &displays)
        });

        let commands = run_pass(&ctx, frame_at(765.0, 100.0), Vec::new(), |ctx| {
            tracker.observe(ctx, &mut store, &displays)
        });
        assert!(moves(&commands).is_empty());
    }

    #[test]
    fn test_startup_centers_on_selected_display_once() {
        let ctx = egui::Context::default();
        let (mut store, _backend) = memory_store();
        store.update(|s| s.selected_display_id = "DP-2".to_string());
        let displays = displays();
        let mut tracker = WindowTracker::default();

        let commands = run_pass(&ctx, frame_at(0.0, 0.0), Vec::new(), |ctx| {
            tracker.place_on_startup(ctx, &store, &displays)
        });
        assert_eq!(moves(&commands), vec![Pos2::new(3000.0, 645.0)]);

        let commands = run_pass(&ctx, frame_at(0.0, 0.0), Vec::new(), |ctx| {
            tracker.place_on_startup(ctx, &store, &displays)
        });
        assert!(moves(&commands).is_empty());
    }

    #[test]
    fn test_startup_ignores_missing_display() {
        let ctx = egui::Context::default();
        let (mut store, _backend) = memory_store();
        store.update(|s| s.selected_display_id = "HDMI-9".to_string());
        let displays = displays();
        let mut tracker = WindowTracker::default();

        let commands = run_pass(&ctx, frame_at(40.0, 40.0), Vec::new(), |ctx| {
            tracker.place_on_startup(ctx, &store, &displays)
        });
        assert!(moves(&commands).is_empty());
    }

    #[test]
    fn test_resize_direction_edges_and_corners() {
        let rect = window();
        assert_eq!(resize_direction(rect, Pos2::new(2.0, 75.0), 6.0), Some(ResizeDirection::West));
        assert_eq!(resize_direction(rect, Pos2::new(398.0, 75.0), 6.0), Some(ResizeDirection::East));
        assert_eq!(resize_direction(rect, Pos2::new(200.0, 1.0), 6.0), Some(ResizeDirection::North));
        assert_eq!(resize_direction(rect, Pos2::new(200.0, 149.0), 6.0), Some(ResizeDirection::South));
        assert_eq!(resize_direction(rect, Pos2::new(1.0, 1.0), 6.0), Some(ResizeDirection::NorthWest));
        assert_eq!(resize_direction(rect, Pos2::new(399.0, 149.0), 6.0), Some(ResizeDirection::SouthEast));
    }

    #[test]
    fn test_resize_direction_interior_and_outside() {
        let rect = window();
        assert_eq!(resize_direction(rect, Pos2::new(200.0, 75.0), 6.0), None);
        assert_eq!(resize_direction(rect, Pos2::new(-20.0, 75.0), 6.0), None);
    }

    #[test]
    fn test_points_to_pixels_scales_origin_and_size() {
        let rect = egui::Rect::from_min_size(Pos2::new(100.0, 50.0), egui::vec2(400.0, 150.0));
        assert_eq!(points_to_pixels(rect, 2.0), Rect::new(200.0, 100.0, 800.0, 300.0));
    }
}
