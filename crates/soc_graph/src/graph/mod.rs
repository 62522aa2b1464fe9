mod model;
mod project;

pub use model::*;
pub use project::{build_relationship_graph, edge_id, node_id};
