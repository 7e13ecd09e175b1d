//! History queries over a revision list
//!
//! `HistoryQuery` carries the filter, ordering and pagination parameters of
//! `RevisionManager::revision_history`. `RevisionHistory` is the answer: a
//! snapshot of the manager's revision list paired with the query, evaluated
//! lazily every time it is iterated.
//!
//! ## Evaluation order
//!
//! 1. Filter: exact creator, comment substring, strict start-time bounds
//! 2. Order: oldest-first, or newest-first when `reversed`
//! 3. Paginate: skip `batch_start`, then take `batch_size`
//!
//! Pagination always applies to the filtered, ordered sequence.

use super::Timestamp;
use crate::revisioned::RevisionedObject;
use serde::{Deserialize, Serialize};

/// Filter, ordering and pagination for a revision history
///
/// Built with chained setters:
///
/// ```
/// use strata_immutable_core::HistoryQuery;
///
/// let q = HistoryQuery::new().creator("bob").reversed(true).batch_size(10);
/// assert_eq!(q.creator.as_deref(), Some("bob"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryQuery {
    /// Exact creator match
    pub creator: Option<String>,
    /// Substring match on the comment
    pub comment: Option<String>,
    /// Only revisions started strictly before this time
    pub start_before: Option<Timestamp>,
    /// Only revisions started strictly after this time
    pub start_after: Option<Timestamp>,
    /// Number of matching revisions to skip
    pub batch_start: usize,
    /// Maximum number of revisions to yield
    pub batch_size: Option<usize>,
    /// Newest-first instead of oldest-first
    pub reversed: bool,
}

impl HistoryQuery {
    /// Query matching every revision, oldest-first
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by exact creator
    pub fn creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    /// Filter by comment substring
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Filter to revisions started strictly before `ts`
    pub fn start_before(mut self, ts: Timestamp) -> Self {
        self.start_before = Some(ts);
        self
    }

    /// Filter to revisions started strictly after `ts`
    pub fn start_after(mut self, ts: Timestamp) -> Self {
        self.start_after = Some(ts);
        self
    }

    /// Skip the first `n` matches
    pub fn batch_start(mut self, n: usize) -> Self {
        self.batch_start = n;
        self
    }

    /// Yield at most `n` matches
    pub fn batch_size(mut self, n: usize) -> Self {
        self.batch_size = Some(n);
        self
    }

    /// Newest-first ordering
    pub fn reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    /// Check a revision against the filters (ordering and pagination aside)
    ///
    /// A revision without a start time never satisfies a time bound.
    pub fn matches(&self, revision: &RevisionedObject) -> bool {
        if let Some(creator) = &self.creator {
            if revision.creator().as_deref() != Some(creator.as_str()) {
                return false;
            }
        }
        if let Some(needle) = &self.comment {
            match revision.comment() {
                Some(comment) if comment.contains(needle.as_str()) => {}
                _ => return false,
            }
        }
        if self.start_before.is_some() || self.start_after.is_some() {
            let Some(started) = revision.started_at() else {
                return false;
            };
            if matches!(self.start_before, Some(bound) if !started.is_before(bound)) {
                return false;
            }
            if matches!(self.start_after, Some(bound) if !started.is_after(bound)) {
                return false;
            }
        }
        true
    }
}

/// Lazy, restartable view over a revision list
///
/// Holds handles to the revisions as they were when the history was
/// requested; later additions or rollbacks do not change it. Each call to
/// `iter` re-evaluates the query from the start.
#[derive(Debug, Clone)]
pub struct RevisionHistory {
    revisions: Vec<RevisionedObject>,
    query: HistoryQuery,
}

impl RevisionHistory {
    /// Pair a revision list (oldest-first) with a query
    pub fn new(revisions: Vec<RevisionedObject>, query: HistoryQuery) -> Self {
        Self { revisions, query }
    }

    /// The query this history answers
    pub fn query(&self) -> &HistoryQuery {
        &self.query
    }

    /// Iterate matching revisions
    pub fn iter(&self) -> Box<dyn Iterator<Item = &RevisionedObject> + '_> {
        let query = &self.query;
        let matching = self.revisions.iter().filter(move |r| query.matches(r));
        let ordered: Box<dyn Iterator<Item = &RevisionedObject>> = if query.reversed {
            Box::new(matching.rev())
        } else {
            Box::new(matching)
        };
        let paged = ordered.skip(query.batch_start);
        match query.batch_size {
            Some(n) => Box::new(paged.take(n)),
            None => Box::new(paged),
        }
    }

    /// Collect the matching revisions
    pub fn to_vec(&self) -> Vec<RevisionedObject> {
        self.iter().cloned().collect()
    }

    /// Number of matching revisions
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Check if no revision matches
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl<'a> IntoIterator for &'a RevisionHistory {
    type Item = &'a RevisionedObject;
    type IntoIter = Box<dyn Iterator<Item = &'a RevisionedObject> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
