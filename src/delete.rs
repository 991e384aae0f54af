//! Delete：构建 DELETE 语句。

use crate::condition::{Condition, collect_bind_columns, write_conditions};
use crate::error::{Error, Result};
use crate::macros::{IntoStrings, collect_into_strings};
use crate::select::{OrderBy, write_limit, write_order_by};
use crate::string_builder::{StringBuilder, Template};

/// DELETE 语句。
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    table: String,
    where_: Vec<Condition>,
    order_by: Vec<OrderBy>,
    limit: Option<u64>,
}

pub fn delete(table: impl Into<String>) -> Delete {
    Delete::new(table)
}

impl Delete {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            where_: Vec::new(),
            order_by: Vec::new(),
            limit: None,
        }
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

    pub fn to_template(&self) -> Result<Template> {
        let mut w = StringBuilder::new();
        self.write_to(&mut w)?;
        Ok(w.into_template())
    }

    pub fn bind_columns(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_bind_columns(&self.where_, &mut out);
        out
    }

    pub(crate) fn write_to(&self, w: &mut StringBuilder) -> Result<()> {
        if self.table.is_empty() {
            return Err(Error::Empty("delete has no table".to_string()));
        }

        w.write_leading("DELETE FROM ");
        w.write_raw(&self.table);
        if !self.where_.is_empty() {
            w.write_leading("WHERE ");
            write_conditions(w, &self.where_)?;
        }
        write_order_by(w, &self.order_by);
        write_limit(w, self.limit);
        Ok(())
    }
}
