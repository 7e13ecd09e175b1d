//! RAII update scope
//!
//! `UpdateScope` is the guard returned by `Immutable::begin_update`. It
//! dereferences to the draft. The success path and the failure path are
//! asymmetric:
//!
//! - `commit()`: `after_update`, `finalize`, then `on_commit`
//! - `abort()` or drop: nothing. The draft stays transient and is abandoned;
//!   no hook runs and no manager is notified.
//!
//! A reentrant scope (opened on an object that was already transient) wraps
//! the object itself; committing it does nothing.

use crate::error::Result;
use crate::immutable::Immutable;
use std::fmt;
use std::ops::Deref;
use tracing::debug;

/// Guard over an in-progress update
#[must_use = "dropping an update scope abandons the draft"]
pub struct UpdateScope<T: Immutable> {
    original: T,
    draft: T,
    context: T::Context,
    reentrant: bool,
    done: bool,
}

impl<T: Immutable> UpdateScope<T> {
    pub(crate) fn new(original: T, draft: T, context: T::Context) -> Self {
        Self {
            original,
            draft,
            context,
            reentrant: false,
            done: false,
        }
    }

    pub(crate) fn reentrant(obj: T) -> Self {
        Self {
            original: obj.clone(),
            draft: obj,
            context: T::Context::default(),
            reentrant: true,
            done: false,
        }
    }

    /// The object being edited
    pub fn draft(&self) -> &T {
        &self.draft
    }

    /// Whether this scope wraps an already-transient object
    pub fn is_reentrant(&self) -> bool {
        self.reentrant
    }

    /// Finish the update and return the new object
    ///
    /// For a reentrant scope this returns the (still transient) object
    /// unchanged.
    pub fn commit(mut self) -> Result<T> {
        if self.reentrant {
            self.done = true;
            return Ok(self.draft.clone());
        }
        self.draft.after_update(&self.context)?;
        self.draft.finalize()?;
        self.done = true;
        self.draft.on_commit(&self.original)?;
        debug!(
            target: "strata::im::update",
            kind = %self.draft.managed().kind(),
            "Update scope committed"
        );
        Ok(self.draft.clone())
    }

    /// Abandon the draft
    pub fn abort(self) {}
}

impl<T: Immutable> Deref for UpdateScope<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.draft
    }
}

impl<T: Immutable> Drop for UpdateScope<T> {
    fn drop(&mut self) {
        if !self.done && !self.reentrant {
            debug!(
                target: "strata::im::update",
                kind = %self.draft.managed().kind(),
                "Update scope dropped without commit, draft abandoned"
            );
        }
    }
}

impl<T: Immutable> fmt::Debug for UpdateScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateScope")
            .field("draft", self.draft.managed())
            .field("reentrant", &self.reentrant)
            .field("done", &self.done)
            .finish()
    }
}
