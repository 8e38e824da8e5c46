//! Mind-map engine for learning roadmaps.
//!
//! The tree model, its layout, the pan/zoom view and minimap, export, and
//! roadmap acquisition (remote with a local fallback). With the `server`
//! feature the crate also carries the LLM-backed `/generate` service.

pub mod acquire;
pub mod export;
pub mod layout;
pub mod minimap;
pub mod output;
pub mod session;
pub mod tree;
pub mod view;

#[cfg(feature = "server")]
pub mod llm;
#[cfg(feature = "server")]
pub mod server;

#[cfg(target_arch = "wasm32")]
mod wasm;

pub use acquire::{Acquired, Acquirer, HttpRemote, Source, generate_local};
pub use layout::{CollapseState, LayoutConfig, PointF, Position, SizeF, layout};
pub use session::Session;
pub use tree::{Node, Resource};
pub use view::{LevelFilter, ViewConfig, ViewTransform};
