//! An engine for fast shortest path computations on road networks
//! based on Customizable Contraction Hierarchies.
//!
//! The pipeline has three phases:
//! metric independent preprocessing (contraction of the input graph along a given elimination order),
//! customization (baking a concrete metric into the contracted graph)
//! and queries (bidirectional searches over the customized graph including path unpacking).

#[macro_use]
pub mod report;
pub mod algo;
pub mod datastr;
pub mod util;
