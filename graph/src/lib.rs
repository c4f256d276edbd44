pub mod config;
pub mod core;
pub mod diagnostics;
pub mod error;
pub mod git_backend;
pub mod layout;
pub mod render;

pub use config::RenderConfig;
pub use core::{Commit, CommitSet, GraphNode, LayoutGraph, RoutingNode};
pub use error::{GraphError, Result};
pub use git_backend::GitWalker;
pub use layout::{layout, Layout, LayoutContext};
pub use render::{render_commits, GridRenderer};
