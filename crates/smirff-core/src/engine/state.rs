use std::fmt;

/// The stages of one parameterization pass, in execution order.
///
/// A pass either ends in [`Assembled`](Self::Assembled) or in
/// [`Failed`](Self::Failed); the error that caused a failure records the stage that
/// was running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParameterizationStage {
    Idle,
    MatchingBonds,
    MatchingAngles,
    MatchingTorsions,
    MatchingVdW,
    MatchingElectrostatics,
    /// Also covers GBSA.
    MatchingConstraints,
    ValidatingCoverage,
    Assembled,
    Failed,
}

impl ParameterizationStage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::MatchingBonds => "Matching Bonds",
            Self::MatchingAngles => "Matching Angles",
            Self::MatchingTorsions => "Matching Torsions",
            Self::MatchingVdW => "Matching vdW",
            Self::MatchingElectrostatics => "Matching Electrostatics",
            Self::MatchingConstraints => "Matching Constraints",
            Self::ValidatingCoverage => "Validating Coverage",
            Self::Assembled => "Assembled",
            Self::Failed => "Failed",
        }
    }

    /// The stage that follows on success; terminal stages have none.
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::MatchingBonds),
            Self::MatchingBonds => Some(Self::MatchingAngles),
            Self::MatchingAngles => Some(Self::MatchingTorsions),
            Self::MatchingTorsions => Some(Self::MatchingVdW),
            Self::MatchingVdW => Some(Self::MatchingElectrostatics),
            Self::MatchingElectrostatics => Some(Self::MatchingConstraints),
            Self::MatchingConstraints => Some(Self::ValidatingCoverage),
            Self::ValidatingCoverage => Some(Self::Assembled),
            Self::Assembled | Self::Failed => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Assembled | Self::Failed)
    }
}

impl fmt::Display for ParameterizationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_advance_from_idle_to_assembled() {
        let mut stage = ParameterizationStage::Idle;
        let mut visited = vec![stage];
        while let Some(next) = stage.next() {
            stage = next;
            visited.push(stage);
        }
        assert_eq!(stage, ParameterizationStage::Assembled);
        assert_eq!(visited.len(), 9);
        assert!(visited.windows(2).all(|w| w[0] < w[1]));
        assert!(!visited.contains(&ParameterizationStage::Failed));
    }

    #[test]
    fn failed_is_terminal() {
        assert!(ParameterizationStage::Failed.is_terminal());
        assert_eq!(ParameterizationStage::Failed.next(), None);
        assert!(!ParameterizationStage::MatchingVdW.is_terminal());
    }
}
