use std::fmt;

use crate::{EffectId, SubjectId};

/// Failure raised by a tracked computation, usually a render function.
pub type ComputationError = Box<dyn std::error::Error + 'static>;

#[derive(Debug)]
pub enum ReactiveError {
    /// The computation itself failed. Tracking was released before this was returned.
    Computation {
        effect: EffectId,
        source: ComputationError,
    },
    /// A chain of writes kept re-triggering computations past the configured depth.
    ReentrantUpdate {
        effect: EffectId,
        depth: usize,
        limit: usize,
    },
    /// A subject was written while one of its reads was still in progress, or
    /// read while a write to it was in progress.
    SubjectBorrowed { subject: SubjectId },
}

impl ReactiveError {
    /// The computation that failed, if the failure came from one.
    pub fn effect(&self) -> Option<EffectId> {
        match self {
            ReactiveError::Computation { effect, .. } => Some(*effect),
            ReactiveError::ReentrantUpdate { effect, .. } => Some(*effect),
            ReactiveError::SubjectBorrowed { .. } => None,
        }
    }

    pub fn is_reentrant_update(&self) -> bool {
        matches!(self, ReactiveError::ReentrantUpdate { .. })
    }
}

impl fmt::Display for ReactiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReactiveError::Computation { effect, source } => {
                write!(f, "computation {effect} failed: {source}")
            }
            ReactiveError::ReentrantUpdate {
                effect,
                depth,
                limit,
            } => write!(
                f,
                "reentrant update in computation {effect}: depth {depth} exceeds limit {limit}"
            ),
            ReactiveError::SubjectBorrowed { subject } => {
                write!(f, "{subject} is already borrowed by an enclosing read or write")
            }
        }
    }
}

impl std::error::Error for ReactiveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReactiveError::Computation { source, .. } => Some(source.as_ref()),
            ReactiveError::ReentrantUpdate { .. } | ReactiveError::SubjectBorrowed { .. } => None,
        }
    }
}
