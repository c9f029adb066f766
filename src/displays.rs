//! Monitor enumeration and per-display window placement
//!
//! The display list is rebuilt wholesale from the source on every query and
//! every configuration-change event; nothing is diffed.

use anyhow::Result;
use tracing::{debug, error, info, warn};

use crate::constants::display::{BUILT_IN_NAME, EXTERNAL_NAME};
use crate::snapping::Rect;

/// One monitor as currently configured. Coordinates are screen pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayInfo {
    /// Stable per-monitor identifier (connector/monitor name)
    pub id: String,
    pub name: String,
    pub frame: Rect,
    /// Frame minus panels and docks
    pub usable: Rect,
    pub is_built_in: bool,
}

impl DisplayInfo {
    /// Label for menus and pickers
    pub fn display_name(&self) -> &str {
        if self.is_built_in {
            BUILT_IN_NAME
        } else if self.name.is_empty() {
            EXTERNAL_NAME
        } else {
            &self.name
        }
    }
}

/// Where monitor information comes from
pub trait DisplaySource {
    fn query(&self) -> Result<Vec<DisplayInfo>>;

    /// Drain pending configuration-change events; true if any arrived
    fn poll_changes(&mut self) -> bool;

    /// Ask the window manager to keep `window` on every workspace. `Ok(false)`
    /// while the window is not mapped yet. Sources without a window manager
    /// connection have nothing to do.
    fn show_on_all_workspaces(&self, _window: u32) -> Result<bool> {
        Ok(true)
    }
}

/// Source used when no display server connection is available
pub struct NoDisplays;

impl DisplaySource for NoDisplays {
    fn query(&self) -> Result<Vec<DisplayInfo>> {
        Ok(Vec::new())
    }

    fn poll_changes(&mut self) -> bool {
        false
    }
}

/// A window the enumerator can place. Frames are in screen pixels.
pub trait HostWindow {
    fn frame(&self) -> Rect;
    fn set_origin(&mut self, x: f32, y: f32);
}

pub struct DisplayManager {
    source: Box<dyn DisplaySource>,
    displays: Vec<DisplayInfo>,
}

impl DisplayManager {
    pub fn new(source: Box<dyn DisplaySource>) -> Self {
        let mut manager = Self {
            source,
            displays: Vec::new(),
        };
        manager.refresh();
        manager
    }

    /// Rebuild the display list from the source
    pub fn refresh(&mut self) {
        match self.source.query() {
            Ok(displays) => {
                info!(count = displays.len(), "Enumerated displays");
                self.displays = displays;
            }
            Err(e) => {
                error!(error = ?e, "Failed to enumerate displays");
                self.displays.clear();
            }
        }
    }

    /// Refresh if the source reported a configuration change since the last poll
    pub fn handle_changes(&mut self) -> bool {
        if self.source.poll_changes() {
            info!("Display configuration changed");
            self.refresh();
            true
        } else {
            false
        }
    }

    /// Fresh display list, queried from the source on every call
    pub fn list_displays(&mut self) -> &[DisplayInfo] {
        self.refresh();
        &self.displays
    }

    /// Display list as of the last refresh
    pub fn displays(&self) -> &[DisplayInfo] {
        &self.displays
    }

    pub fn find_display(&self, id: &str) -> Option<&DisplayInfo> {
        self.displays.iter().find(|display| display.id == id)
    }

    /// Display whose frame contains the given point
    pub fn display_at(&self, x: f32, y: f32) -> Option<&DisplayInfo> {
        self.displays.iter().find(|display| display.frame.contains(x, y))
    }

    /// Keep the native window `window` on every workspace. Returns true once
    /// there is nothing left to retry.
    pub fn show_on_all_workspaces(&self, window: u32) -> bool {
        match self.source.show_on_all_workspaces(window) {
            Ok(done) => done,
            Err(e) => {
                warn!(window = window, error = ?e, "Failed to show clock on all workspaces");
                true
            }
        }
    }

    /// Center the window inside the display's usable area, keeping its size.
    /// Unknown ids leave the window where it is. Returns whether it moved.
    pub fn center_window_on(&self, window: &mut dyn HostWindow, id: &str) -> bool {
        let Some(display) = self.find_display(id) else {
            debug!(display = %id, "Display not present, leaving window in place");
            return false;
        };

        let frame = window.frame();
        let (x, y) = display.usable.centered_origin(frame.width, frame.height);
        info!(display = %id, x = x, y = y, "Centering window on display");
        window.set_origin(x, y);
        true
    }
}
