use crate::{
    error::{EngineError, Stage},
    executor::{NULL, PassStats, aggregate::AccumulatorSlot},
    query::QueryPlan,
    source::{Record, SourceError},
    value::Value,
};
use std::{
    collections::HashMap,
    hash::{Hash, Hasher},
    mem,
};

///
/// GroupKey
///
/// Grouping-attribute values of one H-Table record, in `V` order.
///
/// Equality and hashing are canonical rather than numeric: `Int(1)` and
/// `Float(1.0)` are distinct keys, `Null` equals `Null`, and floats compare
/// by bit pattern with `-0.0` folded into `0.0`.
///

#[derive(Clone, Debug)]
pub(crate) struct GroupKey(Vec<Value>);

impl GroupKey {
    /// Project the key of one scanned row.
    pub(crate) fn from_row(row: &Record, grouping_slots: &[usize]) -> Self {
        Self(
            grouping_slots
                .iter()
                .map(|&slot| row.value(slot).clone())
                .collect(),
        )
    }

    #[must_use]
    pub(crate) fn value(&self, slot: usize) -> &Value {
        self.0.get(slot).unwrap_or(&NULL)
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len()
            && self
                .0
                .iter()
                .zip(&other.0)
                .all(|(left, right)| canonical_eq(left, right))
    }
}

impl Eq for GroupKey {}

impl Hash for GroupKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.len().hash(state);
        for value in &self.0 {
            mem::discriminant(value).hash(state);
            match value {
                Value::Null => {}
                Value::Bool(v) => v.hash(state),
                Value::Int(v) => v.hash(state),
                Value::Float(v) => canonical_float_bits(*v).hash(state),
                Value::Text(v) => v.hash(state),
            }
        }
    }
}

fn canonical_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Float(a), Value::Float(b)) => canonical_float_bits(*a) == canonical_float_bits(*b),
        (Value::Text(a), Value::Text(b)) => a == b,
        _ => false,
    }
}

fn canonical_float_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0_f64.to_bits()
    } else if value.is_nan() {
        f64::NAN.to_bits()
    } else {
        value.to_bits()
    }
}

///
/// GroupRecord
///
/// One H-Table row: its key plus one accumulator per `F` entry, addressed
/// by the entry's position in `F`.
///

#[derive(Clone, Debug)]
pub(crate) struct GroupRecord {
    key: GroupKey,
    slots: Vec<AccumulatorSlot>,
}

impl GroupRecord {
    pub(crate) fn new(key: GroupKey, plan: &QueryPlan) -> Self {
        let slots = plan
            .aggregates
            .iter()
            .map(|aggregate| AccumulatorSlot::for_kind(aggregate.kind))
            .collect();

        Self { key, slots }
    }

    #[must_use]
    pub(crate) const fn key(&self) -> &GroupKey {
        &self.key
    }

    #[must_use]
    pub(crate) fn slots(&self) -> &[AccumulatorSlot] {
        &self.slots
    }

    pub(in crate::executor) fn slot_mut(&mut self, slot: usize) -> Option<&mut AccumulatorSlot> {
        self.slots.get_mut(slot)
    }
}

///
/// GroupTable
///
/// Insertion-ordered H-Table with a key → position index.
///

#[derive(Clone, Debug, Default)]
pub(crate) struct GroupTable {
    records: Vec<GroupRecord>,
    index: HashMap<GroupKey, usize>,
}

impl GroupTable {
    /// Insert a fresh record for `key` unless one exists.
    /// Returns `true` when the key was new.
    pub(crate) fn insert_if_absent(&mut self, key: GroupKey, plan: &QueryPlan) -> bool {
        if self.index.contains_key(&key) {
            return false;
        }

        self.index.insert(key.clone(), self.records.len());
        self.records.push(GroupRecord::new(key, plan));

        true
    }

    #[must_use]
    pub(crate) fn records(&self) -> &[GroupRecord] {
        &self.records
    }

    pub(crate) fn records_mut(&mut self) -> &mut [GroupRecord] {
        &mut self.records
    }

    #[must_use]
    pub(crate) const fn len(&self) -> usize {
        self.records.len()
    }

    /// Keep only the records `keep` accepts, preserving order.
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&GroupRecord) -> bool) {
        self.records.retain(|record| keep(record));
        self.index = self
            .records
            .iter()
            .enumerate()
            .map(|(pos, record)| (record.key.clone(), pos))
            .collect();
    }
}

/// Build pass: one record per distinct grouping tuple, in first-sighting
/// order, with every accumulator freshly initialized.
pub(crate) fn build_group_table<I>(
    plan: &QueryPlan,
    rows: I,
    max_groups: u64,
) -> Result<(GroupTable, PassStats), EngineError>
where
    I: IntoIterator<Item = Result<Record, SourceError>>,
{
    let mut table = GroupTable::default();
    let mut stats = PassStats::new(Stage::Build);

    for row in rows {
        let row = row.map_err(|err| EngineError::source_failed(Stage::Build, err))?;
        stats.rows_scanned += 1;

        let key = GroupKey::from_row(&row, &plan.grouping_slots);
        if table.insert_if_absent(key, plan) && table.len() as u64 > max_groups {
            return Err(EngineError::GroupLimitExceeded { limit: max_groups });
        }
    }

    Ok((table, stats))
}
