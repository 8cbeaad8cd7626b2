//! Text rendering for the command-line front end.
//!
//! ```text
//! CollectionState + FilteredView → compute_list_view → ListView → render_list → String
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: list screen states and their fixed precedence
//! - [`renderer`]: plain-text table and dashboard output
//! - [`helpers`]: padding and highlight utilities

pub mod helpers;
pub mod renderer;
pub mod viewmodel;

pub use renderer::{render_dashboard, render_list, RenderOptions};
pub use viewmodel::{compute_list_view, DisplayRow, EmptyState, ListView, TableView, Tabular};
