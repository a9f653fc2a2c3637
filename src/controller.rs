//! High-level controller wiring an [`EditorSession`] to a Slint window.
//!
//! The [`EditorController`] owns the session and the renderer behind shared
//! handles and hands out callback closures with Slint-friendly signatures.
//! Every mutating callback re-renders when the session revision changed.
//!
//! # Example
//!
//! ```ignore
//! use workflow_canvas::EditorController;
//!
//! slint::include_modules!();
//!
//! fn main() {
//!     workflow_canvas::logging::init_default();
//!     let window = MainWindow::new().unwrap();
//!     let ctrl = EditorController::default();
//!
//!     let paths = Rc::new(VecModel::<ConnectionPath>::default());
//!     ctrl.bind_connection_paths(paths.clone(), |index, commands, color| ConnectionPath {
//!         index,
//!         commands,
//!         color,
//!     });
//!     window.set_connection_paths(ModelRc::from(paths));
//!
//!     window.on_palette_drop(ctrl.place_node_callback());
//!     window.on_pointer_down(ctrl.pointer_down_callback());
//!     window.on_pointer_move(ctrl.pointer_move_callback());
//!     window.on_pointer_up(ctrl.pointer_up_callback());
//!     window.on_wheel(ctrl.wheel_callback());
//!     window.on_connect_clicked(ctrl.connect_clicked_callback());
//!     window.on_key_pressed(ctrl.key_pressed_callback());
//!     window.on_compute_preview_path(ctrl.preview_path_callback());
//!
//!     window.run().unwrap();
//! }
//! ```

use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use slint::{Color, SharedString, VecModel};

use crate::activity::ActivityEntry;
use crate::config::EditorConfig;
use crate::node::{NodeId, Point, WorkflowId};
use crate::render::{CanvasRenderer, ViewChanges};
use crate::session::{ConnectOutcome, EditorSession, Key};

fn node_id(id: i32) -> Option<NodeId> {
    u32::try_from(id).ok().map(NodeId)
}

/// Controller that manages editor state and provides callback implementations.
///
/// Clone this controller to share it across callbacks.
#[derive(Clone)]
pub struct EditorController {
    session: Rc<RefCell<EditorSession>>,
    renderer: Rc<RefCell<CanvasRenderer>>,
    rendered_revision: Rc<Cell<Option<u64>>>,
    selection_model: Rc<RefCell<Option<Rc<VecModel<i32>>>>>,
}

impl Default for EditorController {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorController {
    pub fn new(config: EditorConfig) -> Self {
        let ctrl = Self {
            session: Rc::new(RefCell::new(EditorSession::new(config))),
            renderer: Rc::new(RefCell::new(CanvasRenderer::new())),
            rendered_revision: Rc::new(Cell::new(None)),
            selection_model: Rc::new(RefCell::new(None)),
        };
        ctrl.refresh();
        ctrl
    }

    /// Read access to the session.
    pub fn session(&self) -> Ref<'_, EditorSession> {
        self.session.borrow()
    }

    /// Read access to the renderer.
    pub fn renderer(&self) -> Ref<'_, CanvasRenderer> {
        self.renderer.borrow()
    }

    /// Run `f` against the session, then re-render if anything changed.
    pub fn update<R>(&self, f: impl FnOnce(&mut EditorSession) -> R) -> R {
        let result = f(&mut *self.session.borrow_mut());
        self.refresh();
        result
    }

    /// Re-render if the session revision moved since the last render.
    ///
    /// Returns the view changes, or `None` when nothing needed redrawing.
    pub fn refresh(&self) -> Option<ViewChanges> {
        let session = self.session.borrow();
        let revision = session.revision();
        if self.rendered_revision.get() == Some(revision) {
            return None;
        }
        let changes = self.renderer.borrow_mut().render(&*session);
        if let Some(model) = self.selection_model.borrow().as_ref() {
            session.selection().sync_to_model(model);
        }
        self.rendered_revision.set(Some(revision));
        Some(changes)
    }

    /// Bind a Slint model that receives every rendered connection path.
    pub fn bind_connection_paths<P, F>(&self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(i32, SharedString, Color) -> P + 'static,
    {
        self.renderer.borrow_mut().bind_model(model, constructor);
        self.force_refresh();
    }

    /// Bind a Slint model that mirrors the selected node ids, in selection order.
    pub fn bind_selection(&self, model: Rc<VecModel<i32>>) {
        self.session.borrow().selection().sync_to_model(&model);
        *self.selection_model.borrow_mut() = Some(model);
    }

    fn force_refresh(&self) {
        self.rendered_revision.set(None);
        self.refresh();
    }

    /// Activity entries, newest first.
    pub fn activity(&self) -> Vec<ActivityEntry> {
        self.session.borrow().activity().entries().cloned().collect()
    }

    pub fn zoom(&self) -> f32 {
        self.session.borrow().viewport().zoom()
    }

    // === Callback factories ===

    /// Returns a callback for a palette drop: `(type name, screen x, screen y) -> node id`.
    pub fn place_node_callback(&self) -> impl Fn(SharedString, f32, f32) -> i32 {
        let ctrl = self.clone();
        move |type_name, x, y| {
            let id = ctrl.update(|s| s.place_node(type_name.as_str(), Point::new(x, y)));
            id.0 as i32
        }
    }

    pub fn pointer_down_callback(&self) -> impl Fn(f32, f32) {
        let ctrl = self.clone();
        move |x, y| {
            ctrl.update(|s| s.pointer_down(Point::new(x, y)));
        }
    }

    pub fn pointer_move_callback(&self) -> impl Fn(f32, f32) {
        let ctrl = self.clone();
        move |x, y| {
            ctrl.update(|s| s.pointer_move(Point::new(x, y)));
        }
    }

    pub fn pointer_up_callback(&self) -> impl Fn(f32, f32) {
        let ctrl = self.clone();
        move |x, y| {
            ctrl.update(|s| s.pointer_up(Point::new(x, y)));
        }
    }

    /// Returns a callback for wheel events. Only the vertical delta zooms.
    pub fn wheel_callback(&self) -> impl Fn(f32) {
        let ctrl = self.clone();
        move |delta_y| {
            ctrl.update(|s| s.wheel(delta_y));
        }
    }

    pub fn zoom_in_callback(&self) -> impl Fn() {
        let ctrl = self.clone();
        move || {
            ctrl.update(|s| s.zoom_in());
        }
    }

    pub fn zoom_out_callback(&self) -> impl Fn() {
        let ctrl = self.clone();
        move || {
            ctrl.update(|s| s.zoom_out());
        }
    }

    /// Returns a callback for a click on a node body: `(node id, shift held)`.
    pub fn node_clicked_callback(&self) -> impl Fn(i32, bool) {
        let ctrl = self.clone();
        move |id, shift| {
            if let Some(id) = node_id(id) {
                ctrl.update(|s| s.click_node(id, shift));
            }
        }
    }

    /// Returns a callback for a node's connect button.
    ///
    /// The callback returns the source node id while a connect is armed, or -1.
    pub fn connect_clicked_callback(&self) -> impl Fn(i32) -> i32 {
        let ctrl = self.clone();
        move |id| {
            let Some(id) = node_id(id) else {
                return -1;
            };
            ctrl.update(|s| match s.click_connect(id) {
                ConnectOutcome::Armed(source) => source.0 as i32,
                _ => -1,
            })
        }
    }

    pub fn remove_node_callback(&self) -> impl Fn(i32) {
        let ctrl = self.clone();
        move |id| {
            if let Some(id) = node_id(id) {
                ctrl.update(|s| s.remove_node(id));
            }
        }
    }

    /// Returns a callback that selects the connection under a screen position.
    ///
    /// The callback returns the connection index, or -1 if none was hit.
    pub fn connection_clicked_callback(&self) -> impl Fn(f32, f32) -> i32 {
        let ctrl = self.clone();
        move |x, y| {
            ctrl.update(|s| s.select_connection_at(Point::new(x, y)))
                .map_or(-1, |index| index as i32)
        }
    }

    /// Returns a callback for key presses. It returns whether the key was handled.
    pub fn key_pressed_callback(&self) -> impl Fn(SharedString) -> bool {
        let ctrl = self.clone();
        move |text| match Key::from_text(text.as_str()) {
            Some(key) => ctrl.update(|s| s.key_down(key)),
            None => false,
        }
    }

    pub fn close_panel_callback(&self) -> impl Fn() {
        let ctrl = self.clone();
        move || ctrl.update(|s| s.close_panel())
    }

    /// Returns a callback for the save button. It returns the flash label.
    pub fn save_callback(&self) -> impl Fn() -> SharedString {
        let ctrl = self.clone();
        move || SharedString::from(ctrl.update(|s| s.save_current()).label)
    }

    pub fn run_callback(&self) -> impl Fn() {
        let ctrl = self.clone();
        move || ctrl.update(|s| s.run_current())
    }

    pub fn run_all_callback(&self) -> impl Fn() {
        let ctrl = self.clone();
        move || ctrl.update(|s| s.run_all())
    }

    /// Returns a callback creating a default-named workflow. It returns the new id.
    pub fn create_workflow_callback(&self) -> impl Fn() -> i32 {
        let ctrl = self.clone();
        move || ctrl.update(|s| s.create_workflow(None)).0 as i32
    }

    /// Returns a callback switching workflows. It returns `false` for unknown ids.
    pub fn switch_workflow_callback(&self) -> impl Fn(i32) -> bool {
        let ctrl = self.clone();
        move |id| {
            let Ok(id) = u32::try_from(id) else {
                return false;
            };
            ctrl.update(|s| s.switch_workflow(WorkflowId(id)))
                .inspect_err(|err| tracing::debug!(error = %err, "workflow switch failed"))
                .is_ok()
        }
    }

    /// Returns a callback for `compute-connection-path`: path commands of a
    /// connection by index, empty when there is none.
    pub fn compute_connection_path_callback(&self) -> impl Fn(i32) -> SharedString {
        let renderer = self.renderer.clone();
        move |index| {
            let Ok(index) = usize::try_from(index) else {
                return SharedString::new();
            };
            renderer
                .borrow()
                .connection_paths()
                .iter()
                .find(|p| p.index == index)
                .map(|p| SharedString::from(p.path_commands.as_str()))
                .unwrap_or_default()
        }
    }

    /// Returns a callback for the drag preview path, empty when not dragging.
    pub fn preview_path_callback(&self) -> impl Fn() -> SharedString {
        let session = self.session.clone();
        move || {
            session
                .borrow()
                .preview_path()
                .map(SharedString::from)
                .unwrap_or_default()
        }
    }
}
