//! # Workflows Module
//!
//! High-level entry points that run complete parameterization passes.
//!
//! ## Overview
//!
//! Workflows are the top-level API of the library. They build the pass context, drive
//! the engine stages in their fixed order with progress reporting, and hand back either
//! an assembled [`ParameterizedSystem`](crate::engine::system::ParameterizedSystem) or
//! the error of the stage that failed.
//!
//! ## Architecture
//!
//! - **Parameterization Workflow** ([`parameterize`]) - One molecule per call, or many
//!   independent molecules fanned out over a thread pool with the `parallel` feature.

pub mod parameterize;
