//! Data structures.

pub mod graph;
pub mod heap;
pub mod id_mapper;
pub mod node_order;
