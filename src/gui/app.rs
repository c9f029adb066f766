//! The clock application: a borderless always-on-top root viewport with the
//! clock face, plus an immediate settings viewport opened from its menu

use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use chrono::Local;
use eframe::{CreationContext, NativeOptions, egui};
use tracing::{debug, info};

use super::clock_view::ClockView;
use super::components::{SettingsEditorState, settings_editor};
use super::constants::*;
use super::window::{ViewportWindow, WindowTracker};
use crate::clock::ClockRenderer;
use crate::config::SettingsStore;
use crate::constants::validation::{MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH};
use crate::displays::DisplayManager;
use crate::fonts::ClockFont;

/// Upper bound between frames so display-change events are noticed while idle
const IDLE_POLL_INTERVAL: Duration = Duration::from_secs(1);

enum MenuAction {
    OpenSettings,
    MoveToDisplay(String),
    Quit,
}

struct SettingsWindow {
    editor: SettingsEditorState,
    position: egui::Pos2,
}

impl SettingsWindow {
    fn id() -> egui::ViewportId {
        egui::ViewportId::from_hash_of("clock_settings")
    }
}

pub struct ClockApp {
    store: SettingsStore,
    displays: DisplayManager,
    renderer: ClockRenderer,
    view: ClockView,
    font: ClockFont,
    window: WindowTracker,
    minimized: bool,
    settings_window: Option<SettingsWindow>,
}

impl ClockApp {
    fn new(_cc: &CreationContext<'_>, mut store: SettingsStore, displays: DisplayManager) -> Self {
        info!("Initializing clock window");

        let mut renderer = ClockRenderer::new(&mut store);
        let view = ClockView::new(&mut store);
        renderer.appear(store.settings(), Instant::now());

        Self {
            store,
            displays,
            renderer,
            view,
            font: ClockFont::default(),
            window: WindowTracker::default(),
            minimized: false,
            settings_window: None,
        }
    }

    fn track_visibility(&mut self, ctx: &egui::Context, now: Instant) {
        let minimized = ctx.input(|i| i.viewport().minimized.unwrap_or(false));
        if minimized == self.minimized {
            return;
        }
        self.minimized = minimized;
        if minimized {
            info!("Clock minimized, stopping ticks");
            self.renderer.disappear();
        } else if !self.renderer.is_running() {
            self.renderer.appear(self.store.settings(), now);
        }
    }

    fn open_settings(&mut self, ctx: &egui::Context) {
        if self.settings_window.is_some() {
            ctx.send_viewport_cmd_to(SettingsWindow::id(), egui::ViewportCommand::Focus);
            return;
        }

        self.displays.list_displays();
        let settings = self.store.settings();
        let position = egui::pos2(
            settings.x as f32,
            (settings.y as f32 - SETTINGS_HEIGHT - SETTINGS_GAP).max(0.0),
        );
        info!("Opening settings window");
        self.settings_window = Some(SettingsWindow {
            editor: SettingsEditorState::new(settings, Local::now().naive_local()),
            position,
        });
    }

    fn move_to_display(&mut self, ctx: &egui::Context, id: &str) {
        if let Some(mut window) = ViewportWindow::current(ctx) {
            self.displays.center_window_on(&mut window, id);
        }
    }

    fn handle_menu_action(&mut self, ctx: &egui::Context, action: MenuAction) {
        match action {
            MenuAction::OpenSettings => self.open_settings(ctx),
            MenuAction::MoveToDisplay(id) => {
                self.store.update(|s| s.selected_display_id = id.clone());
                self.move_to_display(ctx, &id);
            }
            MenuAction::Quit => {
                info!("Quit requested from context menu");
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }
    }

    fn show_settings(&mut self, ctx: &egui::Context) {
        let Some(window) = self.settings_window.as_mut() else {
            return;
        };

        let builder = egui::ViewportBuilder::default()
            .with_title(SETTINGS_TITLE)
            .with_inner_size([SETTINGS_WIDTH, SETTINGS_HEIGHT])
            .with_min_inner_size([SETTINGS_MIN_WIDTH, SETTINGS_MIN_HEIGHT])
            .with_position(window.position)
            .with_always_on_top();

        let mut draft = self.store.settings().clone();
        let displays = self.displays.displays();
        let editor = &mut window.editor;

        let (response, close_requested) = ctx.show_viewport_immediate(SettingsWindow::id(), builder, |ctx, _class| {
            let response = egui::CentralPanel::default()
                .show(ctx, |ui| settings_editor::ui(ui, &mut draft, editor, displays))
                .inner;
            (response, ctx.input(|i| i.viewport().close_requested()))
        });

        if response.changed {
            self.store.update(|s| *s = draft.clone());
            ctx.request_repaint_of(egui::ViewportId::ROOT);
        }
        if response.move_to_selected {
            let selected = &draft.selected_display_id;
            let target = if selected.is_empty() {
                self.displays.displays().first().map(|display| display.id.clone())
            } else {
                Some(selected.clone())
            };
            if let Some(id) = target {
                self.move_to_display(ctx, &id);
            }
        }
        if close_requested {
            debug!("Settings window closed");
            self.settings_window = None;
        }
    }
}

impl eframe::App for ClockApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        let now = Instant::now();

        self.displays.handle_changes();
        self.track_visibility(ctx, now);
        self.window.show_on_all_workspaces(&*frame, &self.displays);
        self.window.place_on_startup(ctx, &self.store, &self.displays);
        self.window.observe(ctx, &mut self.store, &self.displays);
        self.view.sync_style(self.store.settings());
        self.renderer
            .update(self.store.settings(), now, Local::now().naive_local());

        let family = self.font.family(ctx, &self.store.settings().font_name);

        let mut action = None;
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                let response = ui.interact(rect, egui::Id::new("clock_face"), egui::Sense::click_and_drag());

                let on_edge = self.window.handle_edge_resize(ctx, rect);
                if !on_edge && response.drag_started_by(egui::PointerButton::Primary) {
                    self.window.begin_drag(ctx);
                }

                self.view.paint(ui.painter(), rect, &self.renderer, family, now);

                response.context_menu(|ui| {
                    if let Some(chosen) = context_menu(ui, &self.displays) {
                        action = Some(chosen);
                    }
                });
            });

        if let Some(action) = action {
            self.handle_menu_action(ctx, action);
        }
        self.show_settings(ctx);

        let wait = self
            .renderer
            .next_wakeup(now)
            .map_or(IDLE_POLL_INTERVAL, |wait| wait.min(IDLE_POLL_INTERVAL));
        ctx.request_repaint_after(wait);
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        [0.0; 4]
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.renderer.disappear();
        info!("Clock exiting");
    }
}

fn context_menu(ui: &mut egui::Ui, displays: &DisplayManager) -> Option<MenuAction> {
    let mut action = None;

    if ui.button("Settings…").clicked() {
        action = Some(MenuAction::OpenSettings);
        ui.close();
    }
    ui.menu_button("Move to Display", |ui| {
        if displays.displays().is_empty() {
            ui.label(egui::RichText::new("No displays detected").weak());
        }
        for display in displays.displays() {
            if ui.button(display.display_name()).clicked() {
                action = Some(MenuAction::MoveToDisplay(display.id.clone()));
                ui.close();
            }
        }
    });
    ui.separator();
    if ui.button("Quit").clicked() {
        action = Some(MenuAction::Quit);
        ui.close();
    }

    action
}

pub fn run_gui(store: SettingsStore, displays: DisplayManager) -> Result<()> {
    let settings = store.settings();
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Desktop Clock")
            .with_app_id("desktop-clock")
            .with_inner_size([settings.width as f32, settings.height as f32])
            .with_min_inner_size([MIN_WINDOW_WIDTH as f32, MIN_WINDOW_HEIGHT as f32])
            .with_position([settings.x as f32, settings.y as f32])
            .with_decorations(false)
            .with_transparent(true)
            .with_resizable(true)
            .with_always_on_top(),
        ..Default::default()
    };

    eframe::run_native(
        "Desktop Clock",
        options,
        Box::new(move |cc| Ok(Box::new(ClockApp::new(cc, store, displays)))),
    )
    .map_err(|err| anyhow!("Failed to launch clock window: {err}"))
}
