//! The `Immutable` trait: lifecycle, construction and the update protocol
//!
//! Every typed handle (`ImmutableObject`, `ImmutableMap`, `ImmutableList`,
//! `ImmutableSet`, `RevisionedObject`) implements this trait. It provides:
//!
//! - Classification (`state`, `mode`, `is_same`)
//! - Construction through a `Builder` (`create`)
//! - Deep cloning and finalization
//! - The update protocol (`begin_update`, `update`)
//! - Extension hooks, overridden by the revisioned extension
//!
//! ## Update protocol
//!
//! ```
//! use strata_immutable_core::{Immutable, ImmutableObject, State};
//!
//! let q = ImmutableObject::create().build(|q| q.set("answer", ())).unwrap();
//! let q2 = q.update((), |draft| draft.set("answer", 42i64)).unwrap();
//!
//! assert!(!q2.is_same(&q));
//! assert_eq!(q2.state(), State::Locked);
//! assert!(q.get("answer").unwrap().is_null());
//! ```

use crate::contract::{Mode, State};
use crate::error::{Error, Result};
use crate::node::Managed;
use crate::scope::UpdateScope;
use tracing::debug;

/// A typed view over a managed object
pub trait Immutable: Clone + Sized {
    /// Caller-supplied context threaded through construction and updates
    type Context: Default;

    /// The underlying handle
    fn managed(&self) -> &Managed;

    /// Consume into the underlying handle
    fn into_managed(self) -> Managed;

    /// Wrap a handle that is known to be of this type's kind
    ///
    /// Use the `TryFrom<Managed>` impls for unchecked handles.
    fn from_managed(managed: Managed) -> Self;

    /// A fresh, empty, transient master
    fn blank() -> Self;

    // =========================================================================
    // Extension hooks
    // =========================================================================

    /// Runs once, after the construction closure and before finalize
    fn after_create(&self, _context: &Self::Context) -> Result<()> {
        Ok(())
    }

    /// Runs on the fresh clone, before the caller sees it
    fn before_update(&self, _context: &Self::Context) -> Result<()> {
        Ok(())
    }

    /// Runs on the clone after the caller's mutations, before finalize
    fn after_update(&self, _context: &Self::Context) -> Result<()> {
        Ok(())
    }

    /// Runs on the finalized clone, with the object it was cloned from
    fn on_commit(&self, _previous: &Self) -> Result<()> {
        Ok(())
    }

    // =========================================================================
    // Provided methods
    // =========================================================================

    /// Current lifecycle state
    fn state(&self) -> State {
        self.managed().state()
    }

    /// Current ownership mode
    fn mode(&self) -> Mode {
        self.managed().mode()
    }

    /// Identity comparison
    fn is_same(&self, other: &Self) -> bool {
        self.managed().ptr_eq(other.managed())
    }

    /// Lock this object and everything it owns
    fn finalize(&self) -> Result<()> {
        self.managed().finalize()
    }

    /// Deep, identity-distinct copy in the transient state
    fn deep_clone(&self) -> Self {
        Self::from_managed(self.managed().deep_clone())
    }

    /// Start building a new instance
    fn create() -> Builder<Self> {
        Builder::new()
    }

    /// Open an update scope
    ///
    /// Fails with `Error::NotMaster` on slaves. A transient object is handed
    /// back as-is (reentrant scope, commit is a no-op). Otherwise the scope
    /// holds a deep clone that has already been through `before_update`.
    fn begin_update(&self, context: Self::Context) -> Result<UpdateScope<Self>> {
        if self.mode() != Mode::Master {
            return Err(Error::NotMaster);
        }
        if self.state().is_transient() {
            debug!(target: "strata::im::update", kind = %self.managed().kind(), "Reentrant update scope");
            return Ok(UpdateScope::reentrant(self.clone()));
        }
        let draft = self.deep_clone();
        draft.before_update(&context)?;
        debug!(
            target: "strata::im::update",
            kind = %self.managed().kind(),
            from_state = %self.state(),
            "Update scope opened"
        );
        Ok(UpdateScope::new(self.clone(), draft, context))
    }

    /// Run `f` against a draft and commit it
    ///
    /// If `f` fails, the draft is abandoned unfinalized and the error is
    /// returned. The original object is never touched.
    fn update<F>(&self, context: Self::Context, f: F) -> Result<Self>
    where
        F: FnOnce(&Self) -> Result<()>,
    {
        let scope = self.begin_update(context)?;
        f(scope.draft())?;
        scope.commit()
    }
}

/// Factory for new instances
///
/// Runs a construction closure against a fresh transient master, then the
/// `after_create` hook, then applies the requested mode and finalize policy.
#[must_use]
pub struct Builder<T: Immutable> {
    mode: Mode,
    finalize: bool,
    context: T::Context,
}

impl<T: Immutable> Builder<T> {
    fn new() -> Self {
        Self {
            mode: Mode::Master,
            finalize: true,
            context: T::Context::default(),
        }
    }

    /// Ownership mode of the result (default master)
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Whether to lock the result (default true)
    pub fn finalize(mut self, finalize: bool) -> Self {
        self.finalize = finalize;
        self
    }

    /// Context handed to `after_create`
    pub fn context(mut self, context: T::Context) -> Self {
        self.context = context;
        self
    }

    /// Construct with `init`
    pub fn build<F>(self, init: F) -> Result<T>
    where
        F: FnOnce(&T) -> Result<()>,
    {
        let obj = T::blank();
        init(&obj)?;
        obj.after_create(&self.context)?;
        obj.managed().set_mode(self.mode);
        if self.finalize {
            obj.finalize()?;
        }
        Ok(obj)
    }

    /// Construct with no initial content
    pub fn empty(self) -> Result<T> {
        self.build(|_| Ok(()))
    }
}
