//! Output layer: JSON artifact writing plus the console summary.

pub mod json;

pub use json::{print_summary, top_sources, write_graph_json};
