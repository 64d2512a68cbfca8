//! Turns a retry selection into the ordered list of failure-record ids.

use crate::failed::{Column, FailedJobQuery, FailedJobStore, JobId, SortOrder, StoreError};

/// Id argument meaning "every failed job".
pub const ALL: &str = "all";

/// What the user asked to retry.
///
/// `limit`, `offset`, `queue` and `connection` only take part when the ids
/// are exactly `["all"]`; explicit ids are used as given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionCriteria {
    pub ids: Vec<JobId>,
    /// Maximum number of ids, `0` for no limit.
    pub limit: usize,
    /// Number of ids to skip, `0` for none.
    pub offset: usize,
    pub queue: Option<String>,
    pub connection: Option<String>,
    pub order: SortOrder,
}

impl SelectionCriteria {
    pub fn ids<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<JobId>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    #[cfg(test)]
    pub fn all() -> Self {
        Self::ids([ALL])
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_queue(mut self, queue: impl Into<String>) -> Self {
        self.queue = Some(queue.into());
        self
    }

    pub fn with_connection(mut self, connection: impl Into<String>) -> Self {
        self.connection = Some(connection.into());
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    /// True only for the single-element `["all"]` selection.
    pub fn is_all(&self) -> bool {
        matches!(self.ids.as_slice(), [id] if id.as_str() == ALL)
    }

    fn queue_filter(&self) -> Option<&str> {
        self.queue.as_deref().filter(|q| !q.is_empty())
    }

    fn connection_filter(&self) -> Option<&str> {
        self.connection.as_deref().filter(|c| !c.is_empty())
    }

    fn has_filters(&self) -> bool {
        self.limit != 0
            || self.offset != 0
            || self.queue_filter().is_some()
            || self.connection_filter().is_some()
    }

    /// Store query equivalent to this "all" selection.
    pub fn to_query(&self) -> FailedJobQuery {
        // Descending is only the base order; the final order_by_id wins.
        let mut query = FailedJobQuery::new().order_by_id(SortOrder::Descending);
        if self.limit != 0 {
            query = query.limit(self.limit);
        }
        if self.offset != 0 {
            query = query.offset(self.offset);
        }
        if let Some(queue) = self.queue_filter() {
            query = query.filter(Column::Queue, queue);
        }
        if let Some(connection) = self.connection_filter() {
            query = query.filter(Column::Connection, connection);
        }
        query.order_by_id(self.order)
    }
}

/// Resolves [`SelectionCriteria`] against a failed-job store.
pub struct JobIdResolver<'a> {
    store: &'a dyn FailedJobStore,
}

impl<'a> JobIdResolver<'a> {
    pub fn new(store: &'a dyn FailedJobStore) -> Self {
        Self { store }
    }

    /// Ids to retry, in the order they must be processed.
    ///
    /// Explicit ids come back verbatim. For `["all"]` a queryable store is
    /// asked for the filtered, paged, ordered ids; any other store yields all
    /// of its ids in native order, with filters ignored.
    pub async fn resolve(&self, criteria: &SelectionCriteria) -> Result<Vec<JobId>, StoreError> {
        if !criteria.is_all() {
            return Ok(criteria.ids.clone());
        }

        if let Some(queryable) = self.store.as_queryable() {
            let query = criteria.to_query();
            tracing::debug!(?query, "selecting failed job ids");
            return queryable.select_ids(&query).await;
        }

        if criteria.has_filters() {
            tracing::warn!(
                "failed-job store does not support queries; ignoring --limit, --offset, --queue and --connection"
            );
        }
        let records = self.store.all().await?;
        Ok(records.into_iter().map(|r| r.id).collect())
    }
}
