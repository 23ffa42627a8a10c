//! Tracked computations.
//!
//! An [`Effect`] owns a re-runnable computation. Every run happens inside a
//! [`TrackingScope`], so reads performed by the computation subscribe it to
//! the fields it touched. A write to any of those fields re-runs it
//! synchronously.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::dependency::DependencyRecord;
use crate::error::{ComputationError, ReactiveError};
use crate::runtime::{Runtime, RuntimeHandle, TrackingScope};
use crate::{next_effect_id, EffectId};

type Computation = Box<dyn FnMut() -> Result<(), ComputationError> + 'static>;

pub(crate) struct EffectInner {
    pub(crate) id: EffectId,
    runtime: RuntimeHandle,
    computation: RefCell<Option<Computation>>,
    pub(crate) sources: RefCell<Vec<DependencyRecord>>,
    pub(crate) running: Cell<bool>,
    pending: Cell<bool>,
    disposed: Cell<bool>,
    runs: Cell<usize>,
}

impl EffectInner {
    fn new(runtime: RuntimeHandle, computation: Computation) -> Self {
        Self {
            id: next_effect_id(),
            runtime,
            computation: RefCell::new(Some(computation)),
            sources: RefCell::new(Vec::new()),
            running: Cell::new(false),
            pending: Cell::new(false),
            disposed: Cell::new(false),
            runs: Cell::new(0),
        }
    }

    fn prune_sources(&self) {
        let sources = std::mem::take(&mut *self.sources.borrow_mut());
        for record in sources {
            record.unsubscribe(self.id);
        }
    }
}

impl Drop for EffectInner {
    fn drop(&mut self) {
        self.prune_sources();
    }
}

/// The computation of a running effect, moved out of its cell so that it may
/// re-enter the effect. Dropping puts it back, unwinding included, unless the
/// effect was disposed meanwhile.
struct CheckedOut<'a> {
    effect: &'a EffectInner,
    computation: Option<Computation>,
}

impl<'a> CheckedOut<'a> {
    fn take(effect: &'a EffectInner) -> Self {
        let computation = effect.computation.borrow_mut().take();
        Self {
            effect,
            computation,
        }
    }
}

impl Drop for CheckedOut<'_> {
    fn drop(&mut self) {
        if self.effect.disposed.get() {
            return;
        }
        if let Ok(mut slot) = self.effect.computation.try_borrow_mut() {
            if slot.is_none() {
                *slot = self.computation.take();
            }
        }
    }
}

/// Handle to a registered computation. Clones share the same computation;
/// dropping the last handle unsubscribes it everywhere.
#[derive(Clone)]
pub struct Effect {
    inner: Rc<EffectInner>,
}

impl Effect {
    pub(crate) fn from_inner(inner: Rc<EffectInner>) -> Self {
        Self { inner }
    }

    pub fn id(&self) -> EffectId {
        self.inner.id
    }

    /// Runs the computation with tracking enabled.
    ///
    /// Subscriptions from the previous run are dropped first, so afterwards
    /// the effect depends on exactly the fields this run read. If the effect
    /// is already running further up the stack, the request is recorded and
    /// honoured as soon as the current run returns.
    pub fn run(&self) -> Result<(), ReactiveError> {
        let inner = &self.inner;
        if inner.disposed.get() {
            return Ok(());
        }
        if inner.running.get() {
            log::trace!("computation {} requested a re-run while running", inner.id);
            inner.pending.set(true);
            return Ok(());
        }
        let Some(runtime) = inner.runtime.inner() else {
            return Ok(());
        };
        let limit = runtime.options().max_update_depth;
        inner.pending.set(false);
        let mut reruns = 0usize;
        loop {
            let result = {
                let _scope = TrackingScope::enter(Rc::clone(&runtime), Rc::clone(inner))?;
                inner.prune_sources();
                inner.runs.set(inner.runs.get() + 1);
                log::debug!("running computation {} (run {})", inner.id, inner.runs.get());
                let mut slot = CheckedOut::take(inner);
                let result = match slot.computation.as_mut() {
                    Some(computation) => computation(),
                    None => Ok(()),
                };
                result
            };
            if let Err(source) = result {
                inner.pending.set(false);
                return Err(ReactiveError::Computation {
                    effect: inner.id,
                    source,
                });
            }
            if !inner.pending.replace(false) || inner.disposed.get() {
                return Ok(());
            }
            reruns += 1;
            if reruns > limit {
                log::warn!(
                    "computation {} re-triggered itself {reruns} times; aborting",
                    inner.id
                );
                return Err(ReactiveError::ReentrantUpdate {
                    effect: inner.id,
                    depth: reruns,
                    limit,
                });
            }
        }
    }

    /// Drops the computation and all of its subscriptions.
    pub fn dispose(&self) {
        if self.inner.disposed.replace(true) {
            return;
        }
        self.inner.prune_sources();
        if let Ok(mut computation) = self.inner.computation.try_borrow_mut() {
            computation.take();
        }
        log::debug!("disposed computation {}", self.inner.id);
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }

    pub fn run_count(&self) -> usize {
        self.inner.runs.get()
    }

    /// Number of fields read during the latest run.
    pub fn dependency_count(&self) -> usize {
        self.inner.sources.borrow().len()
    }

    pub fn dependencies(&self) -> Vec<DependencyRecord> {
        self.inner.sources.borrow().clone()
    }
}

impl PartialEq for Effect {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Effect {}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect")
            .field("id", &self.inner.id)
            .field("runs", &self.inner.runs.get())
            .field("dependencies", &self.dependency_count())
            .finish()
    }
}

/// Registers `computation` with `runtime` and performs its first tracked run.
pub fn register_effect(
    runtime: &Runtime,
    computation: impl FnMut() -> Result<(), ComputationError> + 'static,
) -> Result<Effect, ReactiveError> {
    let effect = Effect {
        inner: Rc::new(EffectInner::new(runtime.handle(), Box::new(computation))),
    };
    log::debug!("registered computation {}", effect.id());
    effect.run()?;
    Ok(effect)
}
