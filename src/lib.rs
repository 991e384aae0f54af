//! halo-dml：可组合的 SQL 语句构建、参数绑定与字面量插值引擎。

pub mod args;
#[cfg(test)]
mod args_tests;
pub mod column_map;
pub mod condition;
pub mod cte;
pub mod decimal;
#[cfg(test)]
mod decimal_tests;
pub mod delete;
pub mod error;
pub mod insert;
pub mod interpolate;
pub mod macros;
pub use crate::macros::*;
#[cfg(test)]
mod macros_tests;
pub mod query;
pub mod select;
pub mod statement;
pub mod string_builder;
pub mod union;
pub mod update;
#[cfg(test)]
mod update_delete_tests;
pub mod value;
pub mod valuer;

pub use crate::args::{Argument, Arguments};
pub use crate::column_map::{ColumnMap, ColumnMapMode, ColumnMapper};
pub use crate::condition::{
    Condition, Conjunction, Operator, column, exists, expr, expr_with, not_exists, paren_close,
    paren_open,
};
pub use crate::cte::{Cte, CteSource, TopStatement, With, cte, with, with_recursive};
pub use crate::decimal::Decimal;
pub use crate::delete::{Delete, delete};
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::insert::{Insert, insert};
pub use crate::interpolate::{
    Interpolation, expand_placeholders, interpolate, interpolate_into, write_literal,
};
pub use crate::query::{Query, QueryOptions};
pub use crate::select::{JoinKind, Select, select};
pub use crate::statement::{Statement, ToSql};
pub use crate::string_builder::Template;
pub use crate::union::{Union, union, union_all};
pub use crate::update::{Update, update};
pub use crate::value::SqlValue;
pub use crate::valuer::{SqlValuer, ValuerError};
