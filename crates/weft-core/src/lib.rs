#![doc = r"Fine-grained reactive runtime for the Weft UI experiment."]
//!
//! The pieces fit together like this:
//!
//! * a [`Runtime`] owns the dependency graph and the tracking stack,
//! * [`Reactive`] subjects record reads and announce writes per field,
//! * an [`Effect`] re-runs its computation whenever a field it read changes.
//!
//! Everything is single threaded and synchronous: a write returns only after
//! every dependent computation has re-run.

pub mod collections;
pub mod dependency;
pub mod effect;
pub mod error;
pub mod hash;
pub mod reactive;
pub mod runtime;

pub use dependency::{DependencyGraph, DependencyKey, DependencyRecord, FieldKey};
pub use effect::{register_effect, Effect};
pub use error::{ComputationError, ReactiveError};
pub use reactive::{Field, Reactive};
pub use runtime::{Runtime, RuntimeHandle, RuntimeOptions, DEFAULT_MAX_UPDATE_DEPTH};

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_SUBJECT_ID: AtomicUsize = AtomicUsize::new(1);
static NEXT_EFFECT_ID: AtomicUsize = AtomicUsize::new(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubjectId(usize);

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subject#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectId(usize);

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

fn next_subject_id() -> SubjectId {
    SubjectId(NEXT_SUBJECT_ID.fetch_add(1, Ordering::Relaxed))
}

fn next_effect_id() -> EffectId {
    EffectId(NEXT_EFFECT_ID.fetch_add(1, Ordering::Relaxed))
}

#[cfg(test)]
#[path = "tests/reactive_tests.rs"]
mod reactive_tests;

#[cfg(test)]
#[path = "tests/effect_tests.rs"]
mod effect_tests;
