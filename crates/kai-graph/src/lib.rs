#![deny(missing_docs)]

//! Composite-scenario to execution-graph compiler.
//!
//! A [`kai_core::CompositeScenario`] is a binary tree of chaos actions with
//! pairwise precedence; the external graph-execution tool wants a flat node
//! set with single-predecessor edges. [`compile`] performs the lowering.

mod compile;
mod node;

pub use compile::{compile, graph_to_json};
pub use node::{ExecutionGraph, GraphNode};
