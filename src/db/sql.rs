use sqlx::{Postgres, QueryBuilder};

use super::query::{Direction, Join, JoinKind, JoinTarget, Op, Projection, Select};
use super::row::Value;

/// Renders a [`Select`] into a Postgres statement. Every value is pushed
/// through `push_bind`; only schema identifiers end up in the SQL text.
pub fn render_select(select: &Select) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT ");

    if select.projections.is_empty() {
        builder.push("*");
    }
    for (i, projection) in select.projections.iter().enumerate() {
        if i > 0 {
            builder.push(", ");
        }
        match projection {
            Projection::Column { column, alias } => {
                builder.push(column.qualified());
                if let Some(alias) = alias {
                    builder.push(" AS ").push(*alias);
                }
            }
            Projection::Aggregate { func, column } => {
                builder
                    .push(func.function())
                    .push("(")
                    .push(column.qualified())
                    .push(") AS ")
                    .push(projection.output_name());
            }
        }
    }

    builder.push(" FROM ").push(select.from.name);

    for join in &select.joins {
        push_join(&mut builder, join);
    }

    for (i, condition) in select.conditions.iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        builder.push(condition.column.qualified());
        match (condition.op, &condition.value) {
            (Op::Eq, Value::Null) => {
                builder.push(" IS NULL");
            }
            (Op::Ne, Value::Null) => {
                builder.push(" IS NOT NULL");
            }
            (Op::Eq, value) => {
                builder.push(" = ");
                push_value(&mut builder, value);
            }
            (Op::Ne, value) => {
                builder.push(" <> ");
                push_value(&mut builder, value);
            }
            (Op::Contains, value) => {
                let needle = match value {
                    Value::Text(text) => text.clone(),
                    _ => String::new(),
                };
                builder
                    .push(" ILIKE ")
                    .push_bind(format!("%{}%", escape_like(&needle)));
            }
        }
    }

    for (i, (column, direction)) in select.order_by.iter().enumerate() {
        builder.push(if i == 0 { " ORDER BY " } else { ", " });
        builder.push(column.qualified());
        builder.push(match direction {
            Direction::Asc => " ASC",
            Direction::Desc => " DESC",
        });
    }

    if let Some(limit) = select.limit {
        builder.push(" LIMIT ").push_bind(limit);
    }
    if let Some(offset) = select.offset {
        builder.push(" OFFSET ").push_bind(offset);
    }

    builder
}

fn push_join(builder: &mut QueryBuilder<'static, Postgres>, join: &Join) {
    builder.push(match join.kind {
        JoinKind::Left => " LEFT JOIN ",
        JoinKind::Inner => " INNER JOIN ",
    });

    match &join.target {
        JoinTarget::Table(table) => {
            builder.push(table.name);
        }
        JoinTarget::GroupedMax(grouped) => {
            let group = grouped.source.column(grouped.group_by).qualified();
            builder
                .push("(SELECT ")
                .push(&group)
                .push(", MAX(")
                .push(grouped.source.column(grouped.max_of).qualified())
                .push(") AS ")
                .push(grouped.max_alias)
                .push(" FROM ")
                .push(grouped.source.name)
                .push(" GROUP BY ")
                .push(&group)
                .push(") AS ")
                .push(grouped.alias.name);
        }
    }

    builder
        .push(" ON ")
        .push(join.left.qualified())
        .push(" = ")
        .push(join.right.qualified());
}

fn push_value(builder: &mut QueryBuilder<'static, Postgres>, value: &Value) {
    match value {
        Value::Null => {
            builder.push("NULL");
        }
        Value::Int(v) => {
            builder.push_bind(*v);
        }
        Value::Bool(v) => {
            builder.push_bind(*v);
        }
        Value::Text(v) => {
            builder.push_bind(v.clone());
        }
        Value::Timestamp(v) => {
            builder.push_bind(*v);
        }
    }
}

/// Escapes LIKE metacharacters so the needle matches literally
pub fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
