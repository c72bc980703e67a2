use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::executor::QueryExecutor;
use super::query::{
    Aggregate, Condition, Direction, GroupedMax, Join, JoinKind, JoinTarget, Op, Projection,
    Select, Table,
};
use super::row::{Row, Value};
use crate::shared::AppError;

/// In-memory implementation of QueryExecutor for development and testing
///
/// Tables are plain vectors of rows keyed by bare column name. Queries are
/// evaluated with the same semantics the Postgres executor gets from SQL:
/// equi-joins, AND-ed conditions, NULL never equal to anything, ordering,
/// limit/offset and single-row aggregates.
#[derive(Debug, Default)]
pub struct InMemoryDatabase {
    tables: RwLock<HashMap<&'static str, Vec<Row>>>,
    unavailable: AtomicBool,
}

impl InMemoryDatabase {
    /// Creates a new empty in-memory database
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, table: Table, row: Row) {
        self.tables
            .write()
            .await
            .entry(table.name)
            .or_default()
            .push(row);
    }

    /// Makes every subsequent query fail as if the connection had dropped
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, AtomicOrdering::SeqCst);
    }
}

#[async_trait]
impl QueryExecutor for InMemoryDatabase {
    #[instrument(skip(self, query), fields(table = query.from.name))]
    async fn select(&self, query: &Select) -> Result<Vec<Row>, AppError> {
        if self.unavailable.load(AtomicOrdering::SeqCst) {
            warn!("In-memory database marked unavailable");
            return Err(AppError::DatabaseError(
                "connection to in-memory database refused".to_string(),
            ));
        }

        let tables = self.tables.read().await;
        let mut rows = qualified_rows(query.from.name, tables.get(query.from.name));

        for join in &query.joins {
            let right = match &join.target {
                JoinTarget::Table(table) => qualified_rows(table.name, tables.get(table.name)),
                JoinTarget::GroupedMax(grouped) => {
                    grouped_max_rows(grouped, tables.get(grouped.source.name))
                }
            };
            rows = join_rows(rows, &right, join);
        }

        rows.retain(|row| query.conditions.iter().all(|c| satisfies(row, c)));

        if query.is_aggregate() {
            debug!(matched = rows.len(), "Computed aggregate in memory");
            return Ok(vec![aggregate_row(&query.projections, &rows)]);
        }

        rows.sort_by(|a, b| {
            for (column, direction) in &query.order_by {
                let key = column.qualified();
                let ordering = a.value(&key).compare(b.value(&key));
                let ordering = match direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });

        let offset = query.offset.unwrap_or(0).max(0) as usize;
        let limit = query
            .limit
            .map(|l| l.max(0) as usize)
            .unwrap_or(usize::MAX);

        let page: Vec<Row> = rows
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|row| project(&query.projections, row))
            .collect();

        debug!(row_count = page.len(), "Select returned rows from memory");
        Ok(page)
    }
}

fn qualified_rows(table: &str, rows: Option<&Vec<Row>>) -> Vec<Row> {
    rows.map(|rows| {
        rows.iter()
            .map(|row| {
                let mut qualified = Row::new();
                for (column, value) in row.iter() {
                    qualified.insert(&format!("{}.{}", table, column), value.clone());
                }
                qualified
            })
            .collect()
    })
    .unwrap_or_default()
}

fn grouped_max_rows(grouped: &GroupedMax, rows: Option<&Vec<Row>>) -> Vec<Row> {
    let mut groups: Vec<(Value, Value)> = Vec::new();

    for row in rows.into_iter().flatten() {
        let key = row.value(grouped.group_by);
        if key.is_null() {
            continue;
        }
        let candidate = row.value(grouped.max_of);

        match groups.iter_mut().find(|(k, _)| *k == *key) {
            Some((_, max)) => {
                if !candidate.is_null()
                    && (max.is_null() || candidate.compare(max) == Ordering::Greater)
                {
                    *max = candidate.clone();
                }
            }
            None => groups.push((key.clone(), candidate.clone())),
        }
    }

    groups
        .into_iter()
        .map(|(key, max)| {
            Row::new()
                .with(&grouped.group_column().qualified(), key)
                .with(&grouped.max_column().qualified(), max)
        })
        .collect()
}

fn join_rows(left: Vec<Row>, right: &[Row], join: &Join) -> Vec<Row> {
    let left_key = join.left.qualified();
    let right_key = join.right.qualified();
    let mut joined = Vec::new();

    for row in left {
        let mut matched = false;
        for candidate in right {
            let mut merged = row.clone();
            merged.merge(candidate);
            let (l, r) = (merged.value(&left_key), merged.value(&right_key));
            if !l.is_null() && l == r {
                matched = true;
                joined.push(merged);
            }
        }
        if !matched && join.kind == JoinKind::Left {
            joined.push(row);
        }
    }

    joined
}

fn satisfies(row: &Row, condition: &Condition) -> bool {
    let value = row.value(&condition.column.qualified());
    if value.is_null() || condition.value.is_null() {
        return match condition.op {
            Op::Eq => value.is_null() && condition.value.is_null(),
            Op::Ne => !value.is_null() && condition.value.is_null(),
            Op::Contains => false,
        };
    }

    match condition.op {
        Op::Eq => *value == condition.value,
        Op::Ne => *value != condition.value,
        Op::Contains => match (value, &condition.value) {
            (Value::Text(haystack), Value::Text(needle)) => haystack
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => false,
        },
    }
}

fn aggregate_row(projections: &[Projection], rows: &[Row]) -> Row {
    let mut result = Row::new();
    for projection in projections {
        let value = match projection {
            Projection::Aggregate { func, column } => {
                let key = column.qualified();
                let present = rows.iter().map(|r| r.value(&key)).filter(|v| !v.is_null());
                match func {
                    Aggregate::Count => Value::Int(present.count() as i64),
                    Aggregate::Max => present
                        .max_by(|a, b| a.compare(b))
                        .cloned()
                        .unwrap_or(Value::Null),
                }
            }
            Projection::Column { column, .. } => rows
                .first()
                .map(|r| r.value(&column.qualified()).clone())
                .unwrap_or(Value::Null),
        };
        result.insert(&projection.output_name(), value);
    }
    result
}

fn project(projections: &[Projection], row: Row) -> Row {
    if projections.is_empty() {
        return row;
    }
    let mut projected = Row::new();
    for projection in projections {
        if let Projection::Column { column, .. } = projection {
            projected.insert(
                &projection.output_name(),
                row.value(&column.qualified()).clone(),
            );
        }
    }
    projected
}
