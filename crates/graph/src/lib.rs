pub mod cache;
pub mod graph_export;
pub mod layout;
pub mod plot;
pub mod relation_graph;

pub use cache::{GraphCache, fingerprint};
pub use graph_export::{GraphData, to_dot, to_json, write_dot};
pub use layout::{LayoutConfig, spring_layout};
pub use plot::{PlotOptions, render_graph};
pub use relation_graph::{Relation, RelationGraph};
