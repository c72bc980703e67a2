// Typed query building and execution
pub mod executor;
pub mod memory;
pub mod query;
pub mod row;
pub mod sql;

pub use executor::{PostgresExecutor, QueryExecutor};
pub use memory::InMemoryDatabase;
pub use query::{Aggregate, Column, Condition, Direction, GroupedMax, Select, Table};
pub use row::{Row, Value};
