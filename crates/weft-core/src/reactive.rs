//! Tracked state containers.
//!
//! [`Reactive`] wraps a plain value. Reads through it register the running
//! computation against the field that was read; writes through it notify the
//! computations registered against the written field. The wrapped value
//! itself is untouched, nested values are opaque unless wrapped separately.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::dependency::{DependencyRecord, FieldKey};
use crate::error::ReactiveError;
use crate::runtime::RuntimeHandle;
use crate::{next_subject_id, SubjectId};

/// Typed accessor for one field of `T`.
///
/// Usually built with the [`field!`](crate::field) macro.
pub struct Field<T, V> {
    name: &'static str,
    get: fn(&T) -> &V,
    get_mut: fn(&mut T) -> &mut V,
}

impl<T, V> Field<T, V> {
    pub const fn new(name: &'static str, get: fn(&T) -> &V, get_mut: fn(&mut T) -> &mut V) -> Self {
        Self { name, get, get_mut }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T, V> Clone for Field<T, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, V> Copy for Field<T, V> {}

impl<T, V> fmt::Debug for Field<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Field").field(&self.name).finish()
    }
}

/// Builds a [`Field`] for a named struct field.
///
/// ```
/// use weft_core::{field, Runtime};
///
/// struct Counter {
///     count: i32,
/// }
///
/// let runtime = Runtime::new();
/// let count = field!(Counter, count: i32);
/// let state = runtime.reactive(Counter { count: 0 });
/// state.set(&count, 3).unwrap();
/// assert_eq!(state.get(&count), 3);
/// ```
#[macro_export]
macro_rules! field {
    ($subject:ty, $name:ident : $value:ty) => {
        $crate::Field::<$subject, $value>::new(
            stringify!($name),
            |subject: &$subject| &subject.$name,
            |subject: &mut $subject| &mut subject.$name,
        )
    };
}

struct ReactiveInner<T> {
    id: SubjectId,
    value: RefCell<T>,
    runtime: RuntimeHandle,
}

impl<T> Drop for ReactiveInner<T> {
    fn drop(&mut self) {
        self.runtime.forget_subject(self.id);
    }
}

pub struct Reactive<T> {
    inner: Rc<ReactiveInner<T>>,
}

impl<T> Clone for Reactive<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> PartialEq for Reactive<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Eq for Reactive<T> {}

impl<T: 'static> Reactive<T> {
    pub fn new(value: T, runtime: &RuntimeHandle) -> Self {
        Self {
            inner: Rc::new(ReactiveInner {
                id: next_subject_id(),
                value: RefCell::new(value),
                runtime: runtime.clone(),
            }),
        }
    }

    pub fn id(&self) -> SubjectId {
        self.inner.id
    }

    fn record(&self, field: FieldKey) -> Option<DependencyRecord> {
        self.inner
            .runtime
            .inner()
            .map(|runtime| runtime.record(self.inner.id, field))
    }

    /// The record of `field`, only if some computation has read it before.
    fn existing_record(&self, field: &FieldKey) -> Option<DependencyRecord> {
        self.inner
            .runtime
            .inner()
            .and_then(|runtime| runtime.existing_record(self.inner.id, field))
    }

    fn borrowed(&self) -> ReactiveError {
        ReactiveError::SubjectBorrowed {
            subject: self.inner.id,
        }
    }

    /// Registers the running computation as a reader of `field` without reading.
    pub fn track(&self, field: impl Into<FieldKey>) {
        if let Some(record) = self.record(field.into()) {
            record.depend();
        }
    }

    /// Notifies the readers of `field` without mutating anything.
    pub fn trigger(&self, field: impl Into<FieldKey>) -> Result<(), ReactiveError> {
        match self.existing_record(&field.into()) {
            Some(record) => record.notify(),
            None => Ok(()),
        }
    }

    /// Tracked read of `field`.
    ///
    /// # Panics
    ///
    /// Panics if called from inside an [`update_field`](Self::update_field)
    /// closure of the same subject. [`try_with_field`](Self::try_with_field)
    /// reports that case as an error instead.
    pub fn with_field<R>(&self, field: impl Into<FieldKey>, f: impl FnOnce(&T) -> R) -> R {
        self.track(field);
        let value = self.inner.value.borrow();
        f(&value)
    }

    /// Tracked read of `field` that fails with [`ReactiveError::SubjectBorrowed`]
    /// while the subject is being written.
    pub fn try_with_field<R>(
        &self,
        field: impl Into<FieldKey>,
        f: impl FnOnce(&T) -> R,
    ) -> Result<R, ReactiveError> {
        let value = self.inner.value.try_borrow().map_err(|_| self.borrowed())?;
        self.track(field);
        Ok(f(&value))
    }

    /// Mutates the subject, then notifies every reader of `field`.
    ///
    /// Notification is synchronous: every dependent computation has re-run by
    /// the time this returns, and the first failure among them is returned.
    /// Writing while a read or write of the same subject is still in progress
    /// fails with [`ReactiveError::SubjectBorrowed`] and changes nothing.
    pub fn update_field<R>(
        &self,
        field: impl Into<FieldKey>,
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<R, ReactiveError> {
        let field = field.into();
        let result = {
            let mut value = self
                .inner
                .value
                .try_borrow_mut()
                .map_err(|_| self.borrowed())?;
            f(&mut value)
        };
        if let Some(record) = self.existing_record(&field) {
            record.notify()?;
        }
        Ok(result)
    }

    /// # Panics
    ///
    /// Same as [`with_field`](Self::with_field).
    pub fn get<V: Clone>(&self, field: &Field<T, V>) -> V {
        self.with_field(field.name, |subject| (field.get)(subject).clone())
    }

    /// # Panics
    ///
    /// Same as [`with_field`](Self::with_field).
    pub fn with<V, R>(&self, field: &Field<T, V>, f: impl FnOnce(&V) -> R) -> R {
        self.with_field(field.name, |subject| f((field.get)(subject)))
    }

    pub fn try_get<V: Clone>(&self, field: &Field<T, V>) -> Result<V, ReactiveError> {
        self.try_with_field(field.name, |subject| (field.get)(subject).clone())
    }

    pub fn try_with<V, R>(
        &self,
        field: &Field<T, V>,
        f: impl FnOnce(&V) -> R,
    ) -> Result<R, ReactiveError> {
        self.try_with_field(field.name, |subject| f((field.get)(subject)))
    }

    pub fn set<V>(&self, field: &Field<T, V>, value: V) -> Result<(), ReactiveError> {
        self.update_field(field.name, |subject| *(field.get_mut)(subject) = value)
    }

    pub fn update<V, R>(
        &self,
        field: &Field<T, V>,
        f: impl FnOnce(&mut V) -> R,
    ) -> Result<R, ReactiveError> {
        self.update_field(field.name, |subject| f((field.get_mut)(subject)))
    }

    /// Reads the subject without registering any dependency.
    ///
    /// # Panics
    ///
    /// Panics while the subject is being written.
    pub fn untracked<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let value = self.inner.value.borrow();
        f(&value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Reactive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reactive")
            .field("id", &self.inner.id)
            .field("value", &*self.inner.value.borrow())
            .finish()
    }
}
