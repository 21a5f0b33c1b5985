//! # SMIRKS Module
//!
//! Pattern-level concerns of parameter assignment:
//!
//! - [`pattern`] - Syntax checks for tagged SMIRKS patterns
//! - [`matcher`] - The [`SmirksMatcher`] trait every substructure backend implements
//! - [`table`] - A backend that replays matches recorded by an external toolkit

pub mod matcher;
pub mod pattern;
pub mod table;

pub use matcher::{MatchError, SmirksMatcher};
pub use pattern::{SmirksError, SmirksPattern};
pub use table::{MatchRecord, TableMatcher};
