//! Module: phi
//! Responsibility: the validated Phi operator `(S, N, V, F, P, H)` and its
//! line-oriented text format.
//! Does not own: expression syntax inside predicates, HAVING or S entries.

mod parse;

#[cfg(test)]
mod tests;

use derive_more::Display;
use serde::Serialize;
use std::{collections::HashSet, str::FromStr};
use thiserror::Error as ThisError;

// re-exports
pub use parse::parse_phi;

///
/// SpecError
///
/// Malformed or inconsistent Phi specification.
/// Always fatal before the first scan.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum SpecError {
    #[error("line {line}: expected 'key: value', found '{text}'")]
    MalformedLine { line: usize, text: String },

    #[error("line {line}: key '{key}' given more than once")]
    DuplicateKey { key: &'static str, line: usize },

    #[error("required key '{0}' is missing")]
    MissingKey(&'static str),

    #[error("'n' must be a positive integer, found '{0}'")]
    InvalidGroupingVarCount(String),

    #[error("'{0}' must list at least one entry")]
    EmptyList(&'static str),

    #[error("'{key}' has an empty entry at position {position}")]
    EmptyItem { key: &'static str, position: usize },

    #[error("grouping attribute '{0}' listed more than once")]
    DuplicateGroupingAttr(String),

    #[error("aggregate '{0}' must have the form <kind>_<gv>_<attribute>")]
    MalformedAggregate(String),

    #[error("aggregate '{text}' uses unknown function '{kind}' (expected sum, count, avg, max or min)")]
    UnknownAggregateKind { text: String, kind: String },

    #[error("aggregate '{text}' references grouping variable '{gv}', expected an integer in [1, {n}]")]
    GroupingVarOutOfRange { text: String, gv: String, n: u32 },

    #[error("aggregate '{0}' listed more than once")]
    DuplicateAggregate(String),

    #[error("'PRED-LIST' has {found} predicates but n = {expected}")]
    PredicateCountMismatch { expected: u32, found: usize },

    #[error("name '{0}' is both a grouping attribute and an aggregate")]
    AmbiguousName(String),
}

///
/// AggregateKind
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateKind {
    #[display("sum")]
    Sum,
    #[display("count")]
    Count,
    #[display("avg")]
    Avg,
    #[display("max")]
    Max,
    #[display("min")]
    Min,
}

impl AggregateKind {
    /// Parse a function keyword; matching is case-insensitive.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        match text.to_ascii_lowercase().as_str() {
            "sum" => Some(Self::Sum),
            "count" => Some(Self::Count),
            "avg" => Some(Self::Avg),
            "max" => Some(Self::Max),
            "min" => Some(Self::Min),
            _ => None,
        }
    }
}

///
/// GroupingVar
///
/// 1-based grouping-variable number.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct GroupingVar(u32);

impl GroupingVar {
    /// Build a grouping variable; zero is rejected.
    #[must_use]
    pub const fn new(number: u32) -> Option<Self> {
        if number == 0 { None } else { Some(Self(number)) }
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Zero-based position, used to index per-variable tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize - 1
    }
}

///
/// AggregateFn
///
/// One `F` descriptor `(kind, gv, attribute)`. Its name, as declared, is the
/// identifier HAVING, S and later predicates use to read its value.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct AggregateFn {
    kind: AggregateKind,
    gv: GroupingVar,
    attribute: String,
    name: String,
}

impl AggregateFn {
    #[must_use]
    pub fn new(kind: AggregateKind, gv: GroupingVar, attribute: impl Into<String>) -> Self {
        let attribute = attribute.into();
        let name = format!("{kind}_{gv}_{attribute}");

        Self {
            kind,
            gv,
            attribute,
            name,
        }
    }

    /// Parse `<kind>_<gv>_<attribute>` and check `gv` against `n`.
    ///
    /// The kind matches case-insensitively; the name keeps the text as
    /// declared.
    ///
    /// The attribute is everything after the second underscore, so source
    /// columns may contain underscores themselves.
    pub fn parse(text: &str, n: u32) -> Result<Self, SpecError> {
        let mut parts = text.splitn(3, '_');
        let (Some(kind), Some(gv), Some(attribute)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(SpecError::MalformedAggregate(text.to_string()));
        };
        if kind.is_empty() || gv.is_empty() || attribute.is_empty() {
            return Err(SpecError::MalformedAggregate(text.to_string()));
        }

        let kind = AggregateKind::parse(kind).ok_or_else(|| SpecError::UnknownAggregateKind {
            text: text.to_string(),
            kind: kind.to_string(),
        })?;
        // Plain digits only: `+1` and `01` would name a different aggregate.
        let canonical = gv.bytes().all(|b| b.is_ascii_digit()) && !gv.starts_with('0');
        let gv = Some(gv)
            .filter(|_| canonical)
            .and_then(|gv| gv.parse::<u32>().ok())
            .filter(|number| *number <= n)
            .and_then(GroupingVar::new)
            .ok_or_else(|| SpecError::GroupingVarOutOfRange {
                text: text.to_string(),
                gv: gv.to_string(),
                n,
            })?;

        Ok(Self {
            kind,
            gv,
            attribute: attribute.to_string(),
            name: text.to_string(),
        })
    }

    #[must_use]
    pub const fn kind(&self) -> AggregateKind {
        self.kind
    }

    #[must_use]
    pub const fn gv(&self) -> GroupingVar {
        self.gv
    }

    /// Source column read by this aggregate; `*` means no column (count only).
    #[must_use]
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

///
/// PhiOperator
///
/// Validated EMF query specification. Construction either succeeds with
/// every invariant checked or fails; there is no partial operator.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PhiOperator {
    select: Vec<String>,
    grouping_var_count: u32,
    grouping_attrs: Vec<String>,
    aggregates: Vec<AggregateFn>,
    predicates: Vec<Option<String>>,
    having: Option<String>,
}

impl PhiOperator {
    /// Validate and assemble an operator.
    ///
    /// `predicates` may be shorter than `n`; missing and blank entries are
    /// the always-true predicate.
    pub fn new(
        select: Vec<String>,
        n: u32,
        grouping_attrs: Vec<String>,
        aggregates: Vec<AggregateFn>,
        predicates: Vec<String>,
        having: Option<String>,
    ) -> Result<Self, SpecError> {
        if n == 0 {
            return Err(SpecError::InvalidGroupingVarCount(n.to_string()));
        }
        if select.is_empty() {
            return Err(SpecError::EmptyList("S"));
        }
        if grouping_attrs.is_empty() {
            return Err(SpecError::EmptyList("V"));
        }

        let mut seen = HashSet::new();
        for attr in &grouping_attrs {
            if !seen.insert(attr.as_str()) {
                return Err(SpecError::DuplicateGroupingAttr(attr.clone()));
            }
        }

        let mut names = HashSet::new();
        for aggregate in &aggregates {
            if aggregate.gv().get() > n {
                return Err(SpecError::GroupingVarOutOfRange {
                    text: aggregate.name().to_string(),
                    gv: aggregate.gv().to_string(),
                    n,
                });
            }
            if !names.insert(aggregate.name()) {
                return Err(SpecError::DuplicateAggregate(aggregate.name().to_string()));
            }
            if seen.contains(aggregate.name()) {
                return Err(SpecError::AmbiguousName(aggregate.name().to_string()));
            }
        }

        if predicates.len() > n as usize {
            return Err(SpecError::PredicateCountMismatch {
                expected: n,
                found: predicates.len(),
            });
        }
        let mut predicates: Vec<Option<String>> = predicates
            .into_iter()
            .map(|text| {
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_string())
            })
            .collect();
        predicates.resize(n as usize, None);

        let having = having
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty() && !text.eq_ignore_ascii_case("NONE"));

        Ok(Self {
            select,
            grouping_var_count: n,
            grouping_attrs,
            aggregates,
            predicates,
            having,
        })
    }

    /// Output column expressions `S`.
    #[must_use]
    pub fn select(&self) -> &[String] {
        &self.select
    }

    /// Number of grouping variables `N`.
    #[must_use]
    pub const fn grouping_var_count(&self) -> u32 {
        self.grouping_var_count
    }

    /// Grouping variables `1..=N` in pass order.
    pub fn grouping_vars(&self) -> impl Iterator<Item = GroupingVar> + use<> {
        (1..=self.grouping_var_count).filter_map(GroupingVar::new)
    }

    /// Grouping attributes `V` in key order.
    #[must_use]
    pub fn grouping_attrs(&self) -> &[String] {
        &self.grouping_attrs
    }

    /// Aggregate descriptors `F`; a descriptor's position is its identity.
    #[must_use]
    pub fn aggregates(&self) -> &[AggregateFn] {
        &self.aggregates
    }

    /// Predicate text for `gv`; `None` is the always-true predicate.
    #[must_use]
    pub fn predicate(&self, gv: GroupingVar) -> Option<&str> {
        self.predicates.get(gv.index()).and_then(Option::as_deref)
    }

    /// Post-aggregation filter `H`, if any.
    #[must_use]
    pub fn having(&self) -> Option<&str> {
        self.having.as_deref()
    }

    #[must_use]
    pub fn grouping_attr_slot(&self, name: &str) -> Option<usize> {
        self.grouping_attrs.iter().position(|attr| attr == name)
    }

    #[must_use]
    pub fn aggregate_slot(&self, name: &str) -> Option<usize> {
        self.aggregates
            .iter()
            .position(|aggregate| aggregate.name() == name)
    }
}

impl FromStr for PhiOperator {
    type Err = SpecError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        parse_phi(text)
    }
}
