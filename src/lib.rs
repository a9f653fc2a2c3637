//! # Workflow Canvas
//!
//! The editing core of a visual workflow builder: typed nodes placed on a
//! zoomable, pannable canvas and wired together with curved connections.
//!
//! ## Features
//!
//! - **Model-Derived Geometry** - Port anchors, curves and hit tests are pure
//!   functions of the model and viewport; nothing is read back from a view
//! - **Typed Properties** - Every node type carries its own property struct,
//!   edited through [`PropertyEdit`]
//! - **Validated Connections** - Port arity, scenario ports and duplicates are
//!   checked by composable [`ConnectionValidator`]s
//! - **Explicit Session State** - Workflows, viewport, selection and gestures
//!   live in one [`EditorSession`] threaded through every action
//! - **Slint Integration** - [`EditorController`] hands out callbacks and keeps
//!   bound `VecModel`s in sync with the session
//!
//! ## Quick Start
//!
//! ```
//! use workflow_canvas::{EditorSession, NodeType, Point};
//!
//! let mut session = EditorSession::default();
//! let trigger = session.create_node(NodeType::Trigger, Point::new(0.0, 0.0));
//! let notify = session.create_node(NodeType::Notification, Point::new(400.0, 0.0));
//! session.add_connection(trigger, notify, None).unwrap();
//!
//! assert!(session.current().is_input_satisfied(notify));
//! session.remove_node(trigger);
//! assert!(session.current().connections().is_empty());
//! ```
//!
//! ## Modules
//!
//! - [`graph`] - Workflows, nodes, connections and validation
//! - [`ports`] - Port derivation and anchor geometry
//! - [`viewport`] - Zoom, pan and coordinate conversion
//! - [`routing`] - Connection curves, drag previews and click-to-connect
//! - [`session`] - The editor session and every user action
//! - [`render`] - Renderer projection with view handles
//! - [`format`] - JSON export and import of a workflow
//!
//! Logging goes through `tracing`; call [`logging::init_default`] from a host
//! binary to get console output.

pub mod activity;
pub mod config;
pub mod controller;
pub mod drag;
pub mod error;
pub mod format;
pub mod graph;
pub mod logging;
pub mod node;
pub mod path;
pub mod ports;
pub mod properties;
pub mod render;
pub mod routing;
pub mod selection;
pub mod session;
pub mod viewport;

// Re-export the public surface
pub use activity::{ActivityEntry, ActivityLog, ActivitySink, NullSink};
pub use config::{EditorConfig, NodeLayout, ZoomConfig};
pub use controller::EditorController;
pub use error::{ConfigError, ConnectionError, EditorError, FormatError};
pub use graph::{
    types_can_connect, CompositeValidator, Connection, ConnectionValidator, NoDuplicatesValidator,
    PortArityValidator, Workflow,
};
pub use hit_test::{find_connection_at, find_drop_target, find_node_at, find_port_at};
pub use node::{Node, NodeId, NodeKind, NodeType, Point, WorkflowId};
pub use path::{connection_path, distance_to_bezier, CubicBezier};
pub use ports::{PortKind, PortRef, PortState};
pub use properties::{apply_edit, EditOutcome, PropertyEdit};
pub use render::{CanvasRenderer, ConnectionPath, NodeView, PortDot, ViewChanges, ViewHandle};
pub use routing::{ConnectArm, PendingConnection};
pub use selection::SelectionManager;
pub use session::{
    ConnectOutcome, EditorSession, Gesture, Key, PointerOutcome, StatusFlash, WorkflowSummary,
};
pub use viewport::Viewport;
