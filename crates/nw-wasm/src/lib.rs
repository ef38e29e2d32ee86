//! WASM bridge for Nodeweave: exposes the editing session to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The host owns the DOM and
//! draws each frame from `snapshot_json()`; everything else goes through
//! `NodeCanvas`. Ids cross the boundary as plain numbers.

use nw_assist::{AssistResponse, MockCollaborator};
use nw_core::{Color, EditError, EditorConfig, EntityId, EntityKind, Point};
use nw_editor::{OutputKind, RequestToken, Session, ToolKind};
use nw_render::EXPORT_FILENAME;
use wasm_bindgen::prelude::*;

/// The WASM-facing canvas controller.
///
/// Holds the session and the collaborator used by `ask`. Hosts that talk
/// to a real backend use `submit_prompt` + `complete_request` instead.
#[wasm_bindgen]
pub struct NodeCanvas {
    session: Session,
    collaborator: MockCollaborator,
}

#[wasm_bindgen]
impl NodeCanvas {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_config(EditorConfig::default(), width, height)
    }

    /// Build a canvas from a camelCase config object; missing keys take
    /// defaults. Returns `undefined` if the JSON does not parse.
    pub fn from_config(config_json: &str, width: f64, height: f64) -> Option<NodeCanvas> {
        match serde_json::from_str::<EditorConfig>(config_json) {
            Ok(config) => Some(Self::with_config(config, width, height)),
            Err(e) => {
                log::warn!("bad canvas config: {e}");
                None
            }
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.session.set_canvas_size(width, height);
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Returns true if the frame needs a redraw.
    pub fn handle_pointer_down(&mut self, x: f64, y: f64) -> bool {
        self.session.pointer_down(x, y)
    }

    pub fn handle_pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.session.pointer_move(x, y)
    }

    pub fn handle_pointer_up(&mut self, x: f64, y: f64) -> bool {
        self.session.pointer_up(x, y)
    }

    /// Buffer a wheel event. Call `frame()` from `requestAnimationFrame`.
    pub fn handle_wheel(&mut self, x: f64, y: f64, delta_y: f64) {
        self.session.queue_wheel(Point::new(x, y), delta_y);
    }

    /// Apply buffered zoom. Returns true if the viewport changed.
    pub fn frame(&mut self) -> bool {
        self.session.flush_frame()
    }

    pub fn cancel_gesture(&mut self) {
        self.session.cancel_gesture();
    }

    /// Switch tools by name. Returns false for unknown names or mid-gesture.
    pub fn set_tool(&mut self, name: &str) -> bool {
        let Some(tool) = ToolKind::from_name(name) else {
            return false;
        };
        self.session.set_tool(tool).is_ok()
    }

    pub fn get_tool(&self) -> String {
        self.session.tool().name().to_string()
    }

    // ─── Toolbar ─────────────────────────────────────────────────────────

    /// Add a node of the named kind at the visible center.
    pub fn add_node(&mut self, kind: &str) -> Option<f64> {
        let kind = EntityKind::from_name(kind)?;
        Some(to_js_id(self.session.add_node(kind)))
    }

    pub fn mix_selection(&mut self) -> Option<f64> {
        report(self.session.create_mix_from_selection()).map(to_js_id)
    }

    /// `kind` is `"image"` or `"3d"`.
    pub fn generate(&mut self, kind: &str) -> Option<f64> {
        let output = match kind {
            "image" => OutputKind::Image,
            "3d" => OutputKind::Model3d,
            _ => return None,
        };
        report(self.session.generate_from_selection(output)).map(to_js_id)
    }

    pub fn compile(&mut self) {
        self.session.compile_workflow();
    }

    // ─── Entity edits ────────────────────────────────────────────────────

    pub fn set_text_content(&mut self, id: f64, text: &str) -> bool {
        report(self.session.set_text_content(from_js_id(id), text)).is_some()
    }

    pub fn set_image_file(&mut self, id: f64, reference: Option<String>) -> bool {
        report(self.session.set_image_file(from_js_id(id), reference)).is_some()
    }

    /// `hex` is `#RRGGBB` or `#RRGGBBAA`.
    pub fn set_color(&mut self, id: f64, hex: &str, opacity: u8) -> bool {
        let Some(color) = Color::from_hex(hex) else {
            return false;
        };
        report(self.session.set_color(from_js_id(id), color, opacity)).is_some()
    }

    pub fn set_size(&mut self, id: f64, x: Option<f64>, y: Option<f64>, z: Option<f64>) -> bool {
        report(self.session.set_size_values(from_js_id(id), x, y, z)).is_some()
    }

    pub fn set_input_weight(&mut self, target: f64, source: f64, weight: f64) -> bool {
        let result =
            self.session
                .set_input_weight(from_js_id(target), from_js_id(source), weight as i64);
        report(result).is_some()
    }

    pub fn set_text_block(&mut self, id: f64, text: &str) -> bool {
        report(self.session.set_text_block(from_js_id(id), text)).is_some()
    }

    pub fn toggle_selection(&mut self, id: f64) -> bool {
        report(self.session.toggle_selection(from_js_id(id))).unwrap_or(false)
    }

    /// Returns JSON: `{"ok":true}` or `{"ok":false,"error":"..."}`.
    pub fn connect(&mut self, from: f64, to: f64) -> String {
        match self.session.connect(from_js_id(from), from_js_id(to)) {
            Ok(()) => r#"{"ok":true}"#.to_string(),
            Err(e) => serde_json::json!({ "ok": false, "error": e.to_string() }).to_string(),
        }
    }

    pub fn disconnect(&mut self, from: f64, to: f64) -> bool {
        self.session.disconnect(from_js_id(from), from_js_id(to))
    }

    pub fn delete_entity(&mut self, id: f64) -> bool {
        self.session.delete_entity(from_js_id(id))
    }

    pub fn delete_shape(&mut self, id: f64) -> bool {
        self.session.delete_shape(from_js_id(id))
    }

    pub fn delete_text(&mut self, id: f64) -> bool {
        self.session.delete_text(from_js_id(id))
    }

    // ─── Assistant ───────────────────────────────────────────────────────

    /// Log a prompt and return `{"token":n,"request":{...}}` for the host to
    /// forward, or `null` for a blank prompt.
    pub fn submit_prompt(&mut self, prompt: &str) -> String {
        match self.session.submit_prompt(prompt) {
            Some(pending) => serde_json::json!({
                "token": pending.token.raw(),
                "request": pending.request,
            })
            .to_string(),
            None => "null".to_string(),
        }
    }

    /// Apply a response (`{"type":"message"|"new-entities","value":...}`)
    /// to the prompt holding `token`. Returns false if the JSON is bad or
    /// the token is not in flight.
    pub fn complete_request(&mut self, token: f64, response_json: &str) -> bool {
        let response: AssistResponse = match serde_json::from_str(response_json) {
            Ok(r) => r,
            Err(e) => {
                log::warn!("bad collaborator response: {e}");
                return false;
            }
        };
        let token = RequestToken::from_raw(token as u64);
        report(self.session.complete_request(token, response)).is_some()
    }

    /// Answer a prompt with the built-in mock collaborator. Returns the
    /// created ids as a JSON array.
    pub fn ask(&mut self, prompt: &str) -> String {
        let ids = report(self.session.ask(prompt, &self.collaborator)).unwrap_or_default();
        serde_json::to_string(&ids).unwrap_or_else(|_| "[]".to_string())
    }

    // ─── Output ──────────────────────────────────────────────────────────

    /// Standalone SVG of the whole canvas, or `undefined` when it is empty.
    pub fn export_svg(&self) -> Option<String> {
        report(self.session.export_svg()).map(|export| export.markup)
    }

    pub fn export_filename() -> String {
        EXPORT_FILENAME.to_string()
    }

    /// Everything needed to draw the current frame.
    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&self.session.snapshot()).unwrap_or_else(|e| {
            log::error!("snapshot serialization failed: {e}");
            "{}".to_string()
        })
    }

    pub fn config_json(&self) -> String {
        serde_json::to_string(self.session.config()).unwrap_or_else(|_| "{}".to_string())
    }
}

impl NodeCanvas {
    fn with_config(config: EditorConfig, width: f64, height: f64) -> Self {
        install_console_hooks();
        let mut session = Session::new(config);
        session.set_canvas_size(width, height);
        Self {
            session,
            collaborator: MockCollaborator::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

fn to_js_id(id: EntityId) -> f64 {
    id.raw() as f64
}

fn from_js_id(id: f64) -> EntityId {
    EntityId::from_raw(id as u64)
}

/// Log a rejected edit and drop the error; JS only sees success or failure.
fn report<T>(result: Result<T, EditError>) -> Option<T> {
    result
        .map_err(|e| log::debug!("edit rejected: {e}"))
        .ok()
}

// ─── Console ─────────────────────────────────────────────────────────────

#[cfg(target_arch = "wasm32")]
struct ConsoleLogger;

#[cfg(target_arch = "wasm32")]
impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = format!("[{}] {}: {}", record.level(), record.target(), record.args());
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&msg.into()),
            log::Level::Warn => web_sys::console::warn_1(&msg.into()),
            _ => web_sys::console::log_1(&msg.into()),
        }
    }

    fn flush(&self) {}
}

fn install_console_hooks() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static INSTALL: Once = Once::new();
        static LOGGER: ConsoleLogger = ConsoleLogger;
        INSTALL.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Nodeweave WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
            if log::set_logger(&LOGGER).is_ok() {
                log::set_max_level(log::LevelFilter::Info);
            }
        });
    }
}
