//! Update：构建 UPDATE 语句。

use crate::condition::{Condition, collect_bind_columns, column, write_conditions};
use crate::error::{Error, Result};
use crate::macros::{IntoStrings, collect_into_strings};
use crate::select::{OrderBy, write_limit, write_order_by};
use crate::string_builder::{StringBuilder, Template};
use crate::value::SqlValue;

/// UPDATE 语句。
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    table: String,
    sets: Vec<Condition>,
    where_: Vec<Condition>,
    order_by: Vec<OrderBy>,
    limit: Option<u64>,
}

pub fn update(table: impl Into<String>) -> Update {
    Update::new(table)
}

impl Update {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            sets: Vec::new(),
            where_: Vec::new(),
            order_by: Vec::new(),
            limit: None,
        }
    }

    /// 追加赋值。`column("a")` 写作 `a=?`，`column("a").int64(1)` 写作带值的 `a=?`，
    /// `column("a").expr("a + 1")` 写作 `a=a + 1`。
    pub fn set(mut self, assignment: Condition) -> Self {
        self.sets.push(assignment);
        self
    }

    /// 为每列追加 `col=?`。
    pub fn add_columns<T>(mut self, cols: T) -> Self
    where
        T: IntoStrings,
    {
        self.sets
            .extend(collect_into_strings(cols).into_iter().map(column));
        self
    }

    /// `col=?`，值在构造时给定。
    pub fn assign(self, col: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.set(column(col).value(value))
    }

    /// `col=col + 1`
    pub fn incr(self, col: impl Into<String>) -> Self {
        let col = col.into();
        let sql = format!("{col} + 1");
        self.set(column(col).expr(sql))
    }

    /// `col=col - 1`
    pub fn decr(self, col: impl Into<String>) -> Self {
        let col = col.into();
        let sql = format!("{col} - 1");
        self.set(column(col).expr(sql))
    }

    pub fn where_(mut self, cond: Condition) -> Self {
        self.where_.push(cond);
        self
    }

    pub fn where_all<I>(mut self, conds: I) -> Self
    where
        I: IntoIterator<Item = Condition>,
    {
        self.where_.extend(conds);
        self
    }

    pub fn order_by<T>(mut self, cols: T) -> Self
    where
        T: IntoStrings,
    {
        self.order_by
            .extend(collect_into_strings(cols).into_iter().map(OrderBy::asc));
        self
    }

    pub fn order_by_desc(mut self, col: impl Into<String>) -> Self {
        self.order_by.push(OrderBy::desc(col.into()));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn num_assignment(&self) -> usize {
        self.sets.len()
    }

    pub fn to_template(&self) -> Result<Template> {
        let mut w = StringBuilder::new();
        self.write_to(&mut w)?;
        Ok(w.into_template())
    }

    /// SET 占位符列 + WHERE 占位符列。
    pub fn bind_columns(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.bind_columns_into(&mut out);
        out
    }

    pub(crate) fn bind_columns_into(&self, out: &mut Vec<String>) {
        for s in &self.sets {
            s.assignment_bind_columns(out);
        }
        collect_bind_columns(&self.where_, out);
    }

    pub(crate) fn write_to(&self, w: &mut StringBuilder) -> Result<()> {
        if self.table.is_empty() {
            return Err(Error::Empty("update has no table".to_string()));
        }
        if self.sets.is_empty() {
            return Err(Error::NotAcceptable(format!(
                "update {} has no SET assignment",
                self.table
            )));
        }

        w.write_leading("UPDATE ");
        w.write_raw(&self.table);
        w.write_str(" SET ");
        for (i, s) in self.sets.iter().enumerate() {
            if i > 0 {
                w.write_str(", ");
            }
            s.write_assignment(w)?;
        }

        if !self.where_.is_empty() {
            w.write_leading("WHERE ");
            write_conditions(w, &self.where_)?;
        }
        write_order_by(w, &self.order_by);
        write_limit(w, self.limit);
        Ok(())
    }
}
