use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::dependency::{DependencyGraph, DependencyRecord, FieldKey};
use crate::effect::{register_effect, Effect, EffectInner};
use crate::error::{ComputationError, ReactiveError};
use crate::reactive::Reactive;
use crate::{EffectId, SubjectId};

/// Default bound on nested or self-triggered re-runs before a write fails fast.
pub const DEFAULT_MAX_UPDATE_DEPTH: usize = 64;

/// Tunables for a [`Runtime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeOptions {
    /// Maximum number of tracked runs that may be nested inside each other, and
    /// the maximum number of back-to-back re-runs a single computation may
    /// request for itself, before [`ReactiveError::ReentrantUpdate`] is raised.
    pub max_update_depth: usize,
}

impl RuntimeOptions {
    pub fn with_max_update_depth(mut self, depth: usize) -> Self {
        self.max_update_depth = depth.max(1);
        self
    }
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            max_update_depth: DEFAULT_MAX_UPDATE_DEPTH,
        }
    }
}

pub(crate) struct RuntimeInner {
    options: RuntimeOptions,
    graph: RefCell<DependencyGraph>,
    tracking: RefCell<Vec<Rc<EffectInner>>>,
    depth: Cell<usize>,
}

impl RuntimeInner {
    fn new(options: RuntimeOptions) -> Self {
        Self {
            options,
            graph: RefCell::new(DependencyGraph::default()),
            tracking: RefCell::new(Vec::new()),
            depth: Cell::new(0),
        }
    }

    pub(crate) fn options(&self) -> RuntimeOptions {
        self.options
    }

    pub(crate) fn active_effect(&self) -> Option<Rc<EffectInner>> {
        self.tracking.borrow().last().cloned()
    }

    pub(crate) fn record(self: &Rc<Self>, subject: SubjectId, field: FieldKey) -> DependencyRecord {
        let handle = RuntimeHandle(Rc::downgrade(self));
        self.graph
            .borrow_mut()
            .get_or_create(subject, field, &handle)
    }

    pub(crate) fn existing_record(&self, subject: SubjectId, field: &FieldKey) -> Option<DependencyRecord> {
        self.graph.borrow().get(subject, field)
    }

    fn forget_subject(&self, subject: SubjectId) {
        if let Ok(mut graph) = self.graph.try_borrow_mut() {
            graph.forget_subject(subject);
        }
    }
}

/// Owner of the dependency graph and the tracking stack.
///
/// Cloning a `Runtime` shares the same graph. Subjects and effects only keep a
/// [`RuntimeHandle`], so the runtime must outlive the work it tracks.
#[derive(Clone)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    pub fn new() -> Self {
        Self::with_options(RuntimeOptions::default())
    }

    /// A `max_update_depth` of zero is raised to one, so computations can run.
    pub fn with_options(options: RuntimeOptions) -> Self {
        let options = options.with_max_update_depth(options.max_update_depth);
        Self {
            inner: Rc::new(RuntimeInner::new(options)),
        }
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle(Rc::downgrade(&self.inner))
    }

    pub fn options(&self) -> RuntimeOptions {
        self.inner.options
    }

    /// Wraps `value` as a tracked subject owned by this runtime.
    pub fn reactive<T: 'static>(&self, value: T) -> Reactive<T> {
        Reactive::new(value, &self.handle())
    }

    /// Registers `computation` and runs it once with tracking enabled.
    pub fn effect(
        &self,
        computation: impl FnMut() -> Result<(), ComputationError> + 'static,
    ) -> Result<Effect, ReactiveError> {
        register_effect(self, computation)
    }

    /// The computation currently collecting dependencies, if any.
    pub fn active_effect(&self) -> Option<EffectId> {
        self.inner.active_effect().map(|effect| effect.id)
    }

    pub fn is_tracking(&self) -> bool {
        !self.inner.tracking.borrow().is_empty()
    }

    /// Number of tracked runs currently on the stack.
    pub fn update_depth(&self) -> usize {
        self.inner.depth.get()
    }

    /// Total number of dependency records across all live subjects.
    pub fn record_count(&self) -> usize {
        self.inner.graph.borrow().record_count()
    }

    /// Returns the record for `(subject, field)` if it was ever read.
    pub fn dependency(&self, subject: SubjectId, field: impl Into<FieldKey>) -> Option<DependencyRecord> {
        self.inner.existing_record(subject, &field.into())
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("options", &self.inner.options)
            .field("depth", &self.inner.depth.get())
            .field("records", &self.record_count())
            .finish()
    }
}

#[derive(Clone)]
pub struct RuntimeHandle(pub(crate) Weak<RuntimeInner>);

impl RuntimeHandle {
    pub fn upgrade(&self) -> Option<Runtime> {
        self.0.upgrade().map(|inner| Runtime { inner })
    }

    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }

    pub fn active_effect(&self) -> Option<EffectId> {
        self.0
            .upgrade()
            .and_then(|inner| inner.active_effect())
            .map(|effect| effect.id)
    }

    pub(crate) fn inner(&self) -> Option<Rc<RuntimeInner>> {
        self.0.upgrade()
    }

    pub(crate) fn forget_subject(&self, subject: SubjectId) {
        if let Some(inner) = self.0.upgrade() {
            inner.forget_subject(subject);
        }
    }
}

impl fmt::Debug for RuntimeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RuntimeHandle").field(&self.is_alive()).finish()
    }
}

/// Pushes an effect on the tracking stack for the duration of one run.
///
/// Dropping the scope pops the stack and clears the running flag, so tracking
/// is released even when the computation fails or unwinds.
pub(crate) struct TrackingScope {
    runtime: Rc<RuntimeInner>,
    effect: Rc<EffectInner>,
}

impl TrackingScope {
    pub(crate) fn enter(
        runtime: Rc<RuntimeInner>,
        effect: Rc<EffectInner>,
    ) -> Result<Self, ReactiveError> {
        let depth = runtime.depth.get() + 1;
        let limit = runtime.options.max_update_depth;
        if depth > limit {
            log::warn!(
                "computation {} exceeded update depth {limit}; aborting the update chain",
                effect.id
            );
            return Err(ReactiveError::ReentrantUpdate {
                effect: effect.id,
                depth,
                limit,
            });
        }
        runtime.depth.set(depth);
        runtime.tracking.borrow_mut().push(Rc::clone(&effect));
        effect.running.set(true);
        Ok(Self { runtime, effect })
    }
}

impl Drop for TrackingScope {
    fn drop(&mut self) {
        let popped = self.runtime.tracking.borrow_mut().pop();
        debug_assert!(
            popped.map(|e| e.id == self.effect.id).unwrap_or(false),
            "tracking stack out of balance"
        );
        self.runtime
            .depth
            .set(self.runtime.depth.get().saturating_sub(1));
        self.effect.running.set(false);
    }
}
