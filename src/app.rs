use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::command::Command;
use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::input::InputHandler;
use crate::panels::{central_panel, layers_panel, menu_bar, tools_panel};
use crate::renderer::Renderer;
use crate::state::{AutoSaver, DirStore, EditorContext, ProjectStore};

/// Minimum gap between two autosave offers while the user keeps editing.
const OFFER_THROTTLE: Duration = Duration::from_secs(2);

/// Key the menu's Save and Open use.
pub const PROJECT_KEY: &str = "project";

fn data_dir() -> PathBuf {
    std::env::var_os("PIXSKETCH_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("pixsketch-data"))
}

/// The eframe shell around an [`EditorContext`].
pub struct PaintApp {
    pub(crate) editor: EditorContext,
    pub(crate) renderer: Renderer,
    pub(crate) input: InputHandler,
    projects: Box<dyn ProjectStore>,
    autosaver: Option<AutoSaver>,
    export_dir: PathBuf,
    /// A destructive command waiting for the user to confirm it
    pending_confirmation: Option<Command>,
    offered_revision: u64,
    last_offer: Instant,
    pub(crate) status: Option<String>,
    /// Canvas size typed into the resize fields
    pub(crate) resize_to: (u32, u32),
    /// Opacity being dragged on the layer slider, committed on release
    pub(crate) opacity_draft: Option<f32>,
}

impl std::fmt::Debug for PaintApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaintApp")
            .field("editor", &self.editor)
            .field("autosaver", &self.autosaver)
            .field("pending_confirmation", &self.pending_confirmation)
            .finish_non_exhaustive()
    }
}

impl PaintApp {
    /// Called once before the first frame. An explicit `config` wins over
    /// the one remembered from the last run.
    pub fn new(cc: &eframe::CreationContext<'_>, config: Option<EditorConfig>) -> Self {
        let config = config
            .or_else(|| cc.storage.and_then(|storage| eframe::get_value(storage, eframe::APP_KEY)))
            .unwrap_or_default();
        let dir = data_dir();
        Self::with_store(config, DirStore::new(&dir), dir)
    }

    /// Builds the app over any store, restoring the last autosave if there
    /// is one.
    pub fn with_store(config: EditorConfig, store: impl ProjectStore + Clone + 'static, export_dir: PathBuf) -> Self {
        let interval = Duration::from_secs(config.autosave_interval_secs.max(1));
        let resize_to = (config.grid_width as u32, config.grid_height as u32);
        let mut editor = EditorContext::with_config(config);

        let autosaver = match AutoSaver::spawn(store.clone(), interval) {
            Ok(saver) => Some(saver),
            Err(err) => {
                log::error!("Autosave disabled: {err}");
                None
            }
        };
        let mut status = None;
        if let Some(saver) = &autosaver {
            match saver.load() {
                Ok(Some(json)) => match futures::executor::block_on(editor.load_project(&json)) {
                    Ok(()) => status = Some("Restored autosave".to_string()),
                    Err(err) => log::warn!("Ignoring autosave: {err}"),
                },
                Ok(None) => {}
                Err(err) => log::warn!("Could not read autosave: {err}"),
            }
        }

        Self {
            offered_revision: editor.revision(),
            editor,
            renderer: Renderer::new(),
            input: InputHandler::new(),
            projects: Box::new(store),
            autosaver,
            export_dir,
            pending_confirmation: None,
            last_offer: Instant::now(),
            status,
            resize_to,
            opacity_draft: None,
        }
    }

    pub fn editor(&self) -> &EditorContext {
        &self.editor
    }

    pub fn pending_confirmation(&self) -> Option<&Command> {
        self.pending_confirmation.as_ref()
    }

    /// Runs a command from the UI. Destructive commands that would lose
    /// content are parked until the user confirms them.
    pub fn run_command(&mut self, command: Command) {
        match self.editor.execute(command.clone()) {
            Ok(()) => {}
            Err(EditorError::ConfirmationRequired(action)) => {
                log::info!("Asking before we {action}");
                self.pending_confirmation = Some(command);
            }
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    pub fn confirm_pending(&mut self) {
        if let Some(command) = self.pending_confirmation.take() {
            if let Err(err) = self.editor.execute_confirmed(command) {
                self.status = Some(err.to_string());
            }
        }
    }

    pub fn cancel_pending(&mut self) {
        self.pending_confirmation = None;
    }

    pub fn save_project(&mut self) {
        let result = self
            .editor
            .save_project()
            .and_then(|json| Ok(self.projects.save(PROJECT_KEY, &json)?));
        self.status = Some(match result {
            Ok(()) => "Project saved".to_string(),
            Err(err) => {
                log::error!("Save failed: {err}");
                err.to_string()
            }
        });
    }

    pub fn open_project(&mut self) {
        let json = match self.projects.load(PROJECT_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => {
                self.status = Some("No saved project".to_string());
                return;
            }
            Err(err) => {
                self.status = Some(err.to_string());
                return;
            }
        };
        self.status = Some(match futures::executor::block_on(self.editor.load_project(&json)) {
            Ok(()) => "Project opened".to_string(),
            Err(err) => err.to_string(),
        });
    }

    pub fn export_png(&mut self, scale: u32) {
        let path = self.export_dir.join("export.png");
        let result = self.editor.export_png(scale).and_then(|bytes| {
            std::fs::create_dir_all(&self.export_dir)
                .and_then(|()| std::fs::write(&path, bytes))
                .map_err(|err| EditorError::Persistence(err.into()))
        });
        self.status = Some(match result {
            Ok(()) => format!("Exported {}", path.display()),
            Err(err) => {
                log::error!("Export failed: {err}");
                err.to_string()
            }
        });
    }

    /// Hands the autosaver a fresh copy of the project when something
    /// changed, no gesture is half done and the last offer is not too
    /// recent.
    fn offer_autosave(&mut self, ctx: &egui::Context) {
        let Some(saver) = &self.autosaver else {
            return;
        };
        if self.editor.revision() == self.offered_revision || self.editor.is_gesture_active() {
            return;
        }
        let since = self.last_offer.elapsed();
        if since < OFFER_THROTTLE {
            ctx.request_repaint_after(OFFER_THROTTLE - since);
            return;
        }
        match self.editor.save_project() {
            Ok(json) => {
                saver.offer(json);
                self.offered_revision = self.editor.revision();
                self.last_offer = Instant::now();
            }
            Err(err) => log::error!("Could not serialize project for autosave: {err}"),
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        use egui::{Key, Modifiers};
        let (redo, undo) = ctx.input_mut(|input| {
            (
                input.consume_key(Modifiers::COMMAND | Modifiers::SHIFT, Key::Z),
                input.consume_key(Modifiers::COMMAND, Key::Z),
            )
        });
        if redo {
            self.editor.redo();
        } else if undo {
            self.editor.undo();
        }
    }

    fn confirmation_modal(&mut self, ctx: &egui::Context) {
        let Some(action) = self.pending_confirmation.as_ref().and_then(Command::destructive_action) else {
            return;
        };
        egui::Window::new("Are you sure?")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(format!("This will {action}. Your drawing will be lost."));
                ui.horizontal(|ui| {
                    if ui.button("Continue").clicked() {
                        self.confirm_pending();
                    }
                    if ui.button("Cancel").clicked() {
                        self.cancel_pending();
                    }
                });
            });
    }
}

impl eframe::App for PaintApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self.editor.config());
        if let Some(saver) = &self.autosaver {
            if let Ok(json) = self.editor.save_project() {
                saver.offer(json);
            }
            if let Err(err) = saver.flush() {
                log::error!("Autosave on exit failed: {err}");
            }
        }
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.pending_confirmation.is_none() {
            self.handle_shortcuts(ctx);
        }

        menu_bar(self, ctx);
        tools_panel(self, ctx);
        layers_panel(self, ctx);
        central_panel(self, ctx);
        self.confirmation_modal(ctx);

        self.offer_autosave(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PointerEvent;
    use crate::state::{AUTOSAVE_KEY, MemoryStore};
    use egui::Pos2;

    fn app(store: &MemoryStore) -> PaintApp {
        let dir = std::env::temp_dir();
        PaintApp::with_store(EditorConfig::default(), store.clone(), dir)
    }

    fn dot(app: &mut PaintApp) {
        app.editor.handle_pointer(PointerEvent::press(Pos2::new(1.0, 1.0)));
        app.editor.handle_pointer(PointerEvent::release(Pos2::new(1.0, 1.0)));
    }

    #[test]
    fn destructive_command_waits_for_confirmation() {
        let store = MemoryStore::new();
        let mut app = app(&store);
        dot(&mut app);
        app.run_command(Command::Clear);
        assert_eq!(app.pending_confirmation(), Some(&Command::Clear));
        assert!(!app.editor().state().grid.is_blank());

        app.cancel_pending();
        assert!(app.pending_confirmation().is_none());

        app.run_command(Command::Clear);
        app.confirm_pending();
        assert!(app.editor().state().grid.is_blank());
    }

    #[test]
    fn autosave_is_restored_on_start() {
        let store = MemoryStore::new();
        {
            let mut first = app(&store);
            dot(&mut first);
            let json = first.editor().save_project().unwrap();
            first.autosaver.as_ref().unwrap().offer(json);
        }
        assert!(store.load(AUTOSAVE_KEY).unwrap().is_some());
        let second = app(&store);
        assert!(second.editor().state().grid.get(1, 1).is_some());
        assert_eq!(second.status.as_deref(), Some("Restored autosave"));
    }

    #[test]
    fn save_and_open_use_project_key() {
        let store = MemoryStore::new();
        let mut app = app(&store);
        dot(&mut app);
        app.save_project();
        assert!(store.load(PROJECT_KEY).unwrap().is_some());
        app.run_command(Command::Clear);
        app.confirm_pending();
        app.open_project();
        assert!(app.editor().state().grid.get(1, 1).is_some());
    }
}
