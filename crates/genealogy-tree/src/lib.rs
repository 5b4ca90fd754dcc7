//! Tree projection of graph snapshots, and HTML rendering of the result.

pub mod projector;
pub mod render;

pub use projector::{project, project_snapshot, TreeNode};
pub use render::{render_html, RenderOptions, DEFAULT_TEMPLATE};
