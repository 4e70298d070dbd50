//! Shortest path algorithms.

pub mod bidirectional_dijkstra;
pub mod cch;
pub mod dijkstra;
