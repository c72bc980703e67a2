//! Typed description of a SELECT statement.
//!
//! Identifiers are `'static` constants from [`crate::schema`], values are
//! always carried as [`Value`]s and bound as parameters by the executor.

use super::row::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Table {
    pub name: &'static str,
}

impl Table {
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    /// Column belonging to this table (or derived-table alias)
    pub const fn column(&self, name: &'static str) -> Column {
        Column::new(self.name, name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub table: &'static str,
    pub name: &'static str,
}

impl Column {
    pub const fn new(table: &'static str, name: &'static str) -> Self {
        Self { table, name }
    }

    pub fn qualified(&self) -> String {
        format!("{}.{}", self.table, self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    /// Case-insensitive literal substring match
    Contains,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: Column,
    pub op: Op,
    pub value: Value,
}

impl Condition {
    pub fn eq(column: Column, value: impl Into<Value>) -> Self {
        Self {
            column,
            op: Op::Eq,
            value: value.into(),
        }
    }

    pub fn ne(column: Column, value: impl Into<Value>) -> Self {
        Self {
            column,
            op: Op::Ne,
            value: value.into(),
        }
    }

    pub fn contains(column: Column, needle: &str) -> Self {
        Self {
            column,
            op: Op::Contains,
            value: Value::Text(needle.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Count,
    Max,
}

impl Aggregate {
    pub fn prefix(&self) -> &'static str {
        match self {
            Aggregate::Count => "count",
            Aggregate::Max => "max",
        }
    }

    pub fn function(&self) -> &'static str {
        match self {
            Aggregate::Count => "COUNT",
            Aggregate::Max => "MAX",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    Column {
        column: Column,
        alias: Option<&'static str>,
    },
    Aggregate {
        func: Aggregate,
        column: Column,
    },
}

impl Projection {
    /// Name of the field in the returned row
    pub fn output_name(&self) -> String {
        match self {
            Projection::Column { column, alias } => alias.unwrap_or(column.name).to_string(),
            Projection::Aggregate { func, column } => format!("{}_{}", func.prefix(), column.name),
        }
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, Projection::Aggregate { .. })
    }
}

/// `SELECT group_by, MAX(max_of) AS max_alias FROM source GROUP BY group_by`,
/// joined under `alias`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupedMax {
    pub source: Table,
    pub group_by: &'static str,
    pub max_of: &'static str,
    pub max_alias: &'static str,
    pub alias: Table,
}

impl GroupedMax {
    /// Output column holding the per-group maximum
    pub fn max_column(&self) -> Column {
        self.alias.column(self.max_alias)
    }

    pub fn group_column(&self) -> Column {
        self.alias.column(self.group_by)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Left,
    Inner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinTarget {
    Table(Table),
    GroupedMax(GroupedMax),
}

impl JoinTarget {
    pub fn alias(&self) -> &'static str {
        match self {
            JoinTarget::Table(table) => table.name,
            JoinTarget::GroupedMax(grouped) => grouped.alias.name,
        }
    }
}

/// Equi-join: `target ON left = right`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Join {
    pub kind: JoinKind,
    pub target: JoinTarget,
    pub left: Column,
    pub right: Column,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub from: Table,
    pub projections: Vec<Projection>,
    pub joins: Vec<Join>,
    pub conditions: Vec<Condition>,
    pub order_by: Vec<(Column, Direction)>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Select {
    pub fn from(table: Table) -> Self {
        Self {
            from: table,
            projections: Vec::new(),
            joins: Vec::new(),
            conditions: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    pub fn column(mut self, column: Column) -> Self {
        self.projections.push(Projection::Column {
            column,
            alias: None,
        });
        self
    }

    pub fn column_as(mut self, column: Column, alias: &'static str) -> Self {
        self.projections.push(Projection::Column {
            column,
            alias: Some(alias),
        });
        self
    }

    pub fn columns(mut self, columns: impl IntoIterator<Item = Column>) -> Self {
        for column in columns {
            self = self.column(column);
        }
        self
    }

    pub fn aggregate(mut self, func: Aggregate, column: Column) -> Self {
        self.projections
            .push(Projection::Aggregate { func, column });
        self
    }

    pub fn left_join(self, table: Table, left: Column, right: Column) -> Self {
        self.join(JoinKind::Left, JoinTarget::Table(table), left, right)
    }

    pub fn inner_join(self, table: Table, left: Column, right: Column) -> Self {
        self.join(JoinKind::Inner, JoinTarget::Table(table), left, right)
    }

    pub fn inner_join_grouped_max(self, grouped: GroupedMax, left: Column) -> Self {
        let right = grouped.group_column();
        self.join(JoinKind::Inner, JoinTarget::GroupedMax(grouped), left, right)
    }

    pub fn join(mut self, kind: JoinKind, target: JoinTarget, left: Column, right: Column) -> Self {
        self.joins.push(Join {
            kind,
            target,
            left,
            right,
        });
        self
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn filters(mut self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        self.conditions.extend(conditions);
        self
    }

    pub fn order_by(mut self, column: Column, direction: Direction) -> Self {
        self.order_by.push((column, direction));
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn is_aggregate(&self) -> bool {
        self.projections.iter().any(Projection::is_aggregate)
    }
}
