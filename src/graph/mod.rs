/// Bundles, containers, items and content elements.
pub mod model;
/// The container graph and its pure queries.
pub mod graph;
