//! Conversion pass modules.
//!
//! Each pass is a self-contained stage of the pipeline. Passes are executed
//! in order (0-3) and each assumes the output of previous passes.

pub mod p0_prune;
pub mod p1_paths;
pub mod p2_tree;
pub mod p3_types;
