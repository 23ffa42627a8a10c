//! Per-(subject, field) subscriber bookkeeping.
//!
//! A [`DependencyRecord`] exists for every field that has been read at least
//! once. It remembers which computations read the field during their latest
//! run and re-runs them when the field is written.

use std::borrow::Cow;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use crate::collections::SubjectRecords;
use crate::effect::{Effect, EffectInner};
use crate::error::ReactiveError;
use crate::runtime::RuntimeHandle;
use crate::{EffectId, SubjectId};

/// Name of a field on a subject.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldKey(Cow<'static, str>);

impl FieldKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for FieldKey {
    fn from(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }
}

impl From<String> for FieldKey {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DependencyKey {
    pub subject: SubjectId,
    pub field: FieldKey,
}

impl fmt::Display for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.subject, self.field)
    }
}

struct RecordInner {
    key: DependencyKey,
    runtime: RuntimeHandle,
    subscribers: RefCell<IndexMap<EffectId, Weak<EffectInner>>>,
}

#[derive(Clone)]
pub struct DependencyRecord {
    inner: Rc<RecordInner>,
}

impl DependencyRecord {
    fn new(key: DependencyKey, runtime: RuntimeHandle) -> Self {
        Self {
            inner: Rc::new(RecordInner {
                key,
                runtime,
                subscribers: RefCell::new(IndexMap::new()),
            }),
        }
    }

    pub fn key(&self) -> &DependencyKey {
        &self.inner.key
    }

    /// Subscribes the computation on top of the tracking stack, if any.
    pub fn depend(&self) {
        let Some(runtime) = self.inner.runtime.inner() else {
            return;
        };
        let Some(effect) = runtime.active_effect() else {
            return;
        };
        let inserted = {
            let mut subscribers = self.inner.subscribers.borrow_mut();
            if subscribers.contains_key(&effect.id) {
                false
            } else {
                subscribers.insert(effect.id, Rc::downgrade(&effect));
                true
            }
        };
        if inserted {
            log::trace!("computation {} depends on {}", effect.id, self.inner.key);
            effect.sources.borrow_mut().push(self.clone());
        }
    }

    /// Re-runs every subscriber in subscription order.
    ///
    /// The subscriber list is snapshotted first because each re-run rebuilds
    /// its own subscriptions. The first failure aborts the pass.
    pub fn notify(&self) -> Result<(), ReactiveError> {
        let subscribers: Vec<Effect> = {
            let mut subscribers = self.inner.subscribers.borrow_mut();
            subscribers.retain(|_, effect| effect.strong_count() > 0);
            subscribers
                .values()
                .filter_map(Weak::upgrade)
                .map(Effect::from_inner)
                .collect()
        };
        if !subscribers.is_empty() {
            log::debug!(
                "{} changed; notifying {} computation(s)",
                self.inner.key,
                subscribers.len()
            );
        }
        for effect in subscribers {
            effect.run()?;
        }
        Ok(())
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .borrow()
            .values()
            .filter(|effect| effect.strong_count() > 0)
            .count()
    }

    pub fn subscribers(&self) -> Vec<EffectId> {
        self.inner
            .subscribers
            .borrow()
            .iter()
            .filter(|(_, effect)| effect.strong_count() > 0)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn is_subscribed(&self, effect: EffectId) -> bool {
        self.inner.subscribers.borrow().contains_key(&effect)
    }

    pub(crate) fn unsubscribe(&self, effect: EffectId) {
        self.inner.subscribers.borrow_mut().shift_remove(&effect);
    }
}

impl fmt::Debug for DependencyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencyRecord")
            .field("key", &self.inner.key)
            .field("subscribers", &self.subscribers())
            .finish()
    }
}

/// Maps each subject to the records of the fields read so far.
#[derive(Default)]
pub struct DependencyGraph {
    subjects: SubjectRecords,
}

impl DependencyGraph {
    pub fn get_or_create(
        &mut self,
        subject: SubjectId,
        field: FieldKey,
        runtime: &RuntimeHandle,
    ) -> DependencyRecord {
        let fields = self.subjects.entry(subject).or_default();
        if let Some(record) = fields.get(&field) {
            return record.clone();
        }
        let record = DependencyRecord::new(
            DependencyKey {
                subject,
                field: field.clone(),
            },
            runtime.clone(),
        );
        fields.insert(field, record.clone());
        record
    }

    pub fn get(&self, subject: SubjectId, field: &FieldKey) -> Option<DependencyRecord> {
        self.subjects
            .get(&subject)
            .and_then(|fields| fields.get(field))
            .cloned()
    }

    pub fn forget_subject(&mut self, subject: SubjectId) {
        self.subjects.remove(&subject);
    }

    pub fn record_count(&self) -> usize {
        self.subjects.values().map(|fields| fields.len()).sum()
    }
}
