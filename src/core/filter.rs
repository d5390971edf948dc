//! Server-side scan filters.
//!
//! A `FilterList` travels with the scan request and is evaluated by the
//! store before rows are returned, never by the caller.

use crate::core::cell::Cell;
use std::cmp::Ordering;

/// Comparison applied between a cell value and the filter value,
/// byte-wise lexicographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl CompareOp {
    fn matches(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Equal => ordering == Ordering::Equal,
            CompareOp::NotEqual => ordering != Ordering::Equal,
            CompareOp::Less => ordering == Ordering::Less,
            CompareOp::LessOrEqual => ordering != Ordering::Greater,
            CompareOp::Greater => ordering == Ordering::Greater,
            CompareOp::GreaterOrEqual => ordering != Ordering::Less,
        }
    }
}

/// Predicate over a single (family, qualifier) column value.
///
/// A row missing the column passes by default; `filter_if_missing` drops
/// such rows instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnValueFilter {
    pub family: String,
    pub qualifier: String,
    pub op: CompareOp,
    pub value: Vec<u8>,
    pub filter_if_missing: bool,
}

impl ColumnValueFilter {
    pub fn new(
        family: impl Into<String>,
        qualifier: impl Into<String>,
        op: CompareOp,
        value: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            family: family.into(),
            qualifier: qualifier.into(),
            op,
            value: value.into(),
            filter_if_missing: false,
        }
    }

    pub fn filter_if_missing(mut self, drop_missing: bool) -> Self {
        self.filter_if_missing = drop_missing;
        self
    }

    pub(crate) fn accepts(&self, cells: &[Cell]) -> bool {
        let cell = cells
            .iter()
            .find(|c| c.family == self.family && c.qualifier == self.qualifier);
        match cell {
            Some(c) => self.op.matches(c.value.as_slice().cmp(self.value.as_slice())),
            None => !self.filter_if_missing,
        }
    }
}

/// How the filters of a list combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterOperator {
    #[default]
    MustPassAll,
    MustPassOne,
}

/// Composable list of column filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterList {
    operator: FilterOperator,
    filters: Vec<ColumnValueFilter>,
}

impl FilterList {
    /// Conjunction: every filter must accept the row.
    pub fn all() -> Self {
        Self {
            operator: FilterOperator::MustPassAll,
            filters: Vec::new(),
        }
    }

    /// Disjunction: at least one filter must accept the row.
    pub fn any() -> Self {
        Self {
            operator: FilterOperator::MustPassOne,
            filters: Vec::new(),
        }
    }

    pub fn with(mut self, filter: ColumnValueFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub(crate) fn accepts(&self, cells: &[Cell]) -> bool {
        if self.filters.is_empty() {
            return true;
        }
        match self.operator {
            FilterOperator::MustPassAll => self.filters.iter().all(|f| f.accepts(cells)),
            FilterOperator::MustPassOne => self.filters.iter().any(|f| f.accepts(cells)),
        }
    }
}
