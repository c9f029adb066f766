use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use x11rb::connection::Connection;
use x11rb::protocol::randr::{ConnectionExt as RandrExt, MonitorInfo, NotifyMask};
use x11rb::protocol::xproto::*;
use x11rb::protocol::Event;
use x11rb::rust_connection::RustConnection;

use crate::constants::display::BUILT_IN_CONNECTORS;
use crate::displays::{DisplayInfo, DisplaySource};
use crate::snapping::Rect;

/// `_NET_WM_DESKTOP` value for "every desktop"
const ALL_DESKTOPS: u32 = 0xFFFF_FFFF;
const NET_WM_STATE_ADD: u32 = 1;
/// EWMH source indication for a normal application
const SOURCE_APPLICATION: u32 = 1;

/// Pre-cached X11 atoms to avoid repeated roundtrips
pub struct CachedAtoms {
    pub net_workarea: Atom,
    pub net_current_desktop: Atom,
    pub net_wm_desktop: Atom,
    pub net_wm_state: Atom,
    pub net_wm_state_sticky: Atom,
    pub edid: Atom,
}

impl CachedAtoms {
    pub fn new(conn: &RustConnection) -> Result<Self> {
        Ok(Self {
            net_workarea: intern(conn, b"_NET_WORKAREA")?,
            net_current_desktop: intern(conn, b"_NET_CURRENT_DESKTOP")?,
            net_wm_desktop: intern(conn, b"_NET_WM_DESKTOP")?,
            net_wm_state: intern(conn, b"_NET_WM_STATE")?,
            net_wm_state_sticky: intern(conn, b"_NET_WM_STATE_STICKY")?,
            edid: intern(conn, b"EDID")?,
        })
    }
}

fn intern(conn: &RustConnection, name: &[u8]) -> Result<Atom> {
    let label = String::from_utf8_lossy(name);
    Ok(conn
        .intern_atom(false, name)
        .with_context(|| format!("Failed to intern {label} atom"))?
        .reply()
        .with_context(|| format!("Failed to get reply for {label} atom"))?
        .atom)
}

/// Monitor enumeration through the RandR extension (1.5+ for GetMonitors)
pub struct X11Displays {
    conn: RustConnection,
    root: Window,
    atoms: CachedAtoms,
}

impl X11Displays {
    /// Connect to the X server and subscribe to screen/output/CRTC changes
    /// for the lifetime of the connection
    pub fn connect() -> Result<Self> {
        let (conn, screen_num) = x11rb::connect(None).context("Failed to connect to X11")?;
        let root = conn.setup().roots[screen_num].root;

        let version = conn
            .randr_query_version(1, 5)
            .context("Failed to query RandR version")?
            .reply()
            .context("RandR extension not available")?;
        if (version.major_version, version.minor_version) < (1, 5) {
            anyhow::bail!(
                "RandR {}.{} is too old, monitor enumeration needs 1.5",
                version.major_version,
                version.minor_version
            );
        }

        conn.randr_select_input(
            root,
            NotifyMask::SCREEN_CHANGE | NotifyMask::OUTPUT_CHANGE | NotifyMask::CRTC_CHANGE,
        )
        .context("Failed to subscribe to RandR change notifications")?;
        conn.flush()
            .context("Failed to flush X11 connection after RandR subscription")?;

        let atoms = CachedAtoms::new(&conn)?;
        info!(screen = screen_num, randr = %format!("{}.{}", version.major_version, version.minor_version), "Connected to X11 for display enumeration");

        Ok(Self { conn, root, atoms })
    }

    fn monitor_to_display(&self, monitor: &MonitorInfo, workarea: Option<Rect>) -> Result<DisplayInfo> {
        let connector = String::from_utf8_lossy(
            &self
                .conn
                .get_atom_name(monitor.name)
                .context("Failed to query monitor name atom")?
                .reply()
                .context("Failed to get monitor name reply")?
                .name,
        )
        .into_owned();

        let frame = Rect::new(
            monitor.x as f32,
            monitor.y as f32,
            monitor.width as f32,
            monitor.height as f32,
        );
        let usable = workarea
            .and_then(|area| frame.intersect(&area))
            .unwrap_or(frame);

        let name = monitor
            .outputs
            .iter()
            .find_map(|&output| self.output_product_name(output))
            .unwrap_or_else(|| connector.clone());

        Ok(DisplayInfo {
            is_built_in: is_built_in_connector(&connector),
            id: connector,
            name,
            frame,
            usable,
        })
    }

    /// Product name from the output's EDID, if the driver exposes one
    fn output_product_name(&self, output: u32) -> Option<String> {
        let reply = self
            .conn
            .randr_get_output_property(output, self.atoms.edid, AtomEnum::ANY, 0, 128, false, false)
            .ok()?
            .reply()
            .inspect_err(|e| debug!(output = output, error = ?e, "No EDID for output"))
            .ok()?;
        edid_monitor_name(&reply.data)
    }

    /// Usable area of the current desktop from _NET_WORKAREA. The EWMH work
    /// area spans all monitors, so it is intersected with each monitor frame.
    fn workarea(&self) -> Option<Rect> {
        let desktop = self
            .conn
            .get_property(false, self.root, self.atoms.net_current_desktop, AtomEnum::CARDINAL, 0, 1)
            .ok()?
            .reply()
            .ok()
            .and_then(|prop| prop.value32().and_then(|mut values| values.next()))
            .unwrap_or(0);

        let prop = self
            .conn
            .get_property(false, self.root, self.atoms.net_workarea, AtomEnum::CARDINAL, 0, u32::MAX)
            .ok()?
            .reply()
            .inspect_err(|e| warn!(error = ?e, "Failed to read _NET_WORKAREA"))
            .ok()?;
        let values: Vec<u32> = prop.value32()?.collect();
        let start = desktop as usize * 4;
        let area = values.get(start..start + 4).or_else(|| values.get(0..4))?;
        Some(Rect::new(area[0] as f32, area[1] as f32, area[2] as f32, area[3] as f32))
    }
}

impl DisplaySource for X11Displays {
    fn query(&self) -> Result<Vec<DisplayInfo>> {
        let monitors = self
            .conn
            .randr_get_monitors(self.root, true)
            .context("Failed to request RandR monitors")?
            .reply()
            .context("Failed to get RandR monitors reply")?
            .monitors;

        let workarea = self.workarea();
        monitors
            .iter()
            .map(|monitor| self.monitor_to_display(monitor, workarea))
            .collect()
    }

    fn show_on_all_workspaces(&self, window: u32) -> Result<bool> {
        let attributes = self
            .conn
            .get_window_attributes(window)
            .context("Failed to request window attributes")?
            .reply()
            .context("Failed to get window attributes reply")?;
        if attributes.map_state != MapState::VIEWABLE {
            return Ok(false);
        }

        for request in all_workspaces_requests(window, &self.atoms) {
            self.conn
                .send_event(
                    false,
                    self.root,
                    EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY,
                    request,
                )
                .context("Failed to send workspace request")?;
        }
        self.conn
            .flush()
            .context("Failed to flush X11 connection after workspace requests")?;
        info!(window = window, "Clock shown on all workspaces");
        Ok(true)
    }

    fn poll_changes(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.conn.poll_for_event() {
                Ok(Some(Event::RandrScreenChangeNotify(_))) | Ok(Some(Event::RandrNotify(_))) => {
                    changed = true;
                }
                Ok(Some(event)) => debug!(?event, "Ignoring X11 event"),
                Ok(None) => break,
                Err(e) => {
                    warn!(error = ?e, "X11 connection error while polling display changes");
                    break;
                }
            }
        }
        changed
    }
}

/// EWMH client messages that put `window` on every desktop and mark it sticky
fn all_workspaces_requests(window: Window, atoms: &CachedAtoms) -> [ClientMessageEvent; 2] {
    [
        ClientMessageEvent::new(
            32,
            window,
            atoms.net_wm_desktop,
            [ALL_DESKTOPS, SOURCE_APPLICATION, 0, 0, 0],
        ),
        ClientMessageEvent::new(
            32,
            window,
            atoms.net_wm_state,
            [NET_WM_STATE_ADD, atoms.net_wm_state_sticky, 0, SOURCE_APPLICATION, 0],
        ),
    ]
}

fn is_built_in_connector(connector: &str) -> bool {
    BUILT_IN_CONNECTORS
        .iter()
        .any(|prefix| connector.starts_with(prefix))
}

/// Extract the monitor name descriptor (tag 0xFC) from an EDID base block
pub fn edid_monitor_name(edid: &[u8]) -> Option<String> {
    const DESCRIPTOR_OFFSETS: [usize; 4] = [54, 72, 90, 108];
    const DESCRIPTOR_LEN: usize = 18;
    const MONITOR_NAME_TAG: u8 = 0xFC;

    DESCRIPTOR_OFFSETS.iter().find_map(|&offset| {
        let descriptor = edid.get(offset..offset + DESCRIPTOR_LEN)?;
        if descriptor[0..3] != [0, 0, 0] || descriptor[3] != MONITOR_NAME_TAG {
            return None;
        }
        let text = &descriptor[5..];
        let end = text.iter().position(|&b| b == 0x0A).unwrap_or(text.len());
        let name = String::from_utf8_lossy(&text[..end]).trim().to_string();
        (!name.is_empty()).then_some(name)
    })
}
