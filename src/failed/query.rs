use serde::{Deserialize, Serialize};

use super::record::{FailureRecord, JobId};

/// Direction in which failure-record ids are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Record columns a query can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Queue,
    Connection,
}

impl Column {
    fn value_of(self, record: &FailureRecord) -> &str {
        match self {
            Column::Queue => &record.queue,
            Column::Connection => &record.connection,
        }
    }
}

/// Selection over the failed-job store, built up by value and executed once.
///
/// Every builder method consumes the query and returns the extended one, so a
/// query handed to a store is never changed behind its back. Evaluation is
/// declarative: filters, then ordering by id, then offset, then limit,
/// regardless of the order the builder methods were called in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedJobQuery {
    order: SortOrder,
    limit: Option<usize>,
    offset: Option<usize>,
    filters: Vec<(Column, String)>,
}

impl Default for FailedJobQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl FailedJobQuery {
    /// A query over every record, newest id first.
    pub fn new() -> Self {
        Self {
            order: SortOrder::Descending,
            limit: None,
            offset: None,
            filters: Vec::new(),
        }
    }

    /// Orders by id. Replaces any earlier ordering.
    pub fn order_by_id(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn offset(mut self, n: usize) -> Self {
        self.offset = Some(n);
        self
    }

    /// Keeps only records whose `column` equals `value`. Filters accumulate.
    pub fn filter(mut self, column: Column, value: impl Into<String>) -> Self {
        self.filters.push((column, value.into()));
        self
    }

    pub fn matches(&self, record: &FailureRecord) -> bool {
        self.filters
            .iter()
            .all(|(column, value)| column.value_of(record) == value)
    }

    /// Evaluates the query against records held in memory.
    pub fn apply<'a, I>(&self, records: I) -> Vec<JobId>
    where
        I: IntoIterator<Item = &'a FailureRecord>,
    {
        let mut ids: Vec<JobId> = records
            .into_iter()
            .filter(|r| self.matches(r))
            .map(|r| r.id.clone())
            .collect();

        ids.sort();
        if self.order == SortOrder::Descending {
            ids.reverse();
        }

        ids.into_iter()
            .skip(self.offset.unwrap_or(0))
            .take(self.limit.unwrap_or(usize::MAX))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<FailureRecord> {
        vec![
            FailureRecord::new("1", "redis", "default", "{}"),
            FailureRecord::new("2", "redis", "emails", "{}"),
            FailureRecord::new("3", "sqs", "emails", "{}"),
            FailureRecord::new("10", "redis", "emails", "{}"),
        ]
    }

    fn ids(list: &[&str]) -> Vec<JobId> {
        list.iter().map(|s| JobId::from(*s)).collect()
    }

    #[test]
    fn new_query_orders_descending() {
        let q = FailedJobQuery::new();
        assert_eq!(q, FailedJobQuery::new().order_by_id(SortOrder::Descending));
        assert_eq!(q.apply(&records()), ids(&["10", "3", "2", "1"]));
    }

    #[test]
    fn later_order_replaces_earlier() {
        let q = FailedJobQuery::new()
            .order_by_id(SortOrder::Descending)
            .order_by_id(SortOrder::Ascending);
        assert_eq!(q.apply(&records()), ids(&["1", "2", "3", "10"]));
    }

    #[test]
    fn filters_are_conjunctive() {
        let q = FailedJobQuery::new()
            .filter(Column::Queue, "emails")
            .filter(Column::Connection, "redis")
            .order_by_id(SortOrder::Ascending);
        assert_eq!(q.apply(&records()), ids(&["2", "10"]));
    }

    #[test]
    fn offset_and_limit_apply_after_filter_and_sort() {
        // Builder call order does not change evaluation order.
        let q = FailedJobQuery::new()
            .limit(1)
            .offset(1)
            .filter(Column::Queue, "emails")
            .order_by_id(SortOrder::Ascending);
        assert_eq!(q.apply(&records()), ids(&["3"]));
    }

    #[test]
    fn offset_past_end_is_empty() {
        let q = FailedJobQuery::new().offset(10);
        assert!(q.apply(&records()).is_empty());
    }
}
