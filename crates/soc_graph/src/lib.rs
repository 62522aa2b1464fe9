pub mod graph;
pub mod related;
