use super::pattern::{SmirksError, SmirksPattern};
use crate::core::models::graph::MolecularGraph;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatchError {
    #[error("Malformed SMIRKS pattern '{pattern}': {reason}")]
    MalformedPattern { pattern: String, reason: String },
    #[error("Matcher backend failed on '{pattern}': {message}")]
    Backend { pattern: String, message: String },
}

impl From<SmirksError> for MatchError {
    fn from(e: SmirksError) -> Self {
        let pattern = match &e {
            SmirksError::Empty => String::new(),
            SmirksError::Unbalanced { pattern, .. }
            | SmirksError::InvalidTag { pattern, .. }
            | SmirksError::DuplicateTag { pattern, .. }
            | SmirksError::NonContiguousTags { pattern, .. } => pattern.clone(),
        };
        MatchError::MalformedPattern {
            pattern,
            reason: e.to_string(),
        }
    }
}

/// Substructure search capability consumed by parameter assignment.
///
/// `find_matches` returns every occurrence of the pattern in the graph as a tuple of
/// zero-based atom indices, where position `i` holds the atom matched by the tagged
/// atom `:i+1`. Backends should already suppress hits that are identical up to the
/// pattern's own symmetry, but the handlers canonicalize again and do not rely on it.
///
/// Implementations must not mutate shared state, so one matcher can serve several
/// passes concurrently.
pub trait SmirksMatcher {
    fn find_matches(
        &self,
        graph: &dyn MolecularGraph,
        smirks: &str,
    ) -> Result<Vec<Vec<usize>>, MatchError>;

    /// Checks a pattern without matching it. The default only checks syntax the
    /// engine itself relies on; toolkit-backed matchers should parse fully.
    fn validate(&self, smirks: &str) -> Result<(), MatchError> {
        SmirksPattern::parse(smirks)?;
        Ok(())
    }
}
