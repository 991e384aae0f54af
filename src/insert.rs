//! Insert：构建 INSERT 语句。
//!
//! 三种模式互斥：字面量行（`values`）、占位符行（列清单或 `placeholder_count`，
//! 重复 `row_count` 次）、`INSERT ... SELECT`。模式在渲染时检查，构造过程可以逐步进行。

use crate::condition::Condition;
use crate::error::{Error, Result};
use crate::macros::{IntoStrings, collect_into_strings};
use crate::select::Select;
use crate::string_builder::{Slot, StringBuilder, Template};
use crate::value::SqlValue;

#[derive(Debug, Clone, PartialEq)]
enum OnDuplicate {
    /// `col=VALUES(col)`
    Values(String),
    Set(Condition),
}

/// INSERT 语句。
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    table: String,
    ignore: bool,
    columns: Vec<String>,
    rows: Vec<Vec<SqlValue>>,
    placeholder_count: Option<usize>,
    row_count: usize,
    source: Option<Box<Select>>,
    on_duplicate: Vec<OnDuplicate>,
}

pub fn insert(table: impl Into<String>) -> Insert {
    Insert::new(table)
}

impl Insert {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ignore: false,
            columns: Vec::new(),
            rows: Vec::new(),
            placeholder_count: None,
            row_count: 1,
            source: None,
            on_duplicate: Vec::new(),
        }
    }

    /// `INSERT IGNORE INTO`
    pub fn ignore(mut self) -> Self {
        self.ignore = true;
        self
    }

    pub fn columns<T>(mut self, cols: T) -> Self
    where
        T: IntoStrings,
    {
        self.columns.extend(collect_into_strings(cols));
        self
    }

    /// 追加一行字面量值。
    pub fn values<I, V>(mut self, row: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
        self
    }

    /// 每行的占位符数量；未设置时取列数。
    pub fn placeholder_count(mut self, n: usize) -> Self {
        self.placeholder_count = Some(n);
        self
    }

    /// 占位符行重复的次数，默认 1。
    pub fn row_count(mut self, n: usize) -> Self {
        self.row_count = n;
        self
    }

    /// `INSERT ... SELECT`
    pub fn select(mut self, sel: Select) -> Self {
        self.source = Some(Box::new(sel));
        self
    }

    /// `ON DUPLICATE KEY UPDATE col=VALUES(col), ...`
    pub fn on_duplicate_key_update<T>(mut self, cols: T) -> Self
    where
        T: IntoStrings,
    {
        self.on_duplicate.extend(
            collect_into_strings(cols)
                .into_iter()
                .map(OnDuplicate::Values),
        );
        self
    }

    /// 自定义赋值，例如 `column("hits").expr("hits + 1")`。
    pub fn on_duplicate_key_set(mut self, assignment: Condition) -> Self {
        self.on_duplicate.push(OnDuplicate::Set(assignment));
        self
    }

    pub fn to_template(&self) -> Result<Template> {
        self.template_with_rows(None)
    }

    /// 占位符模式下用 `rows` 覆盖 `row_count`（按绑定的记录数生成行）。
    pub(crate) fn template_with_rows(&self, rows: Option<usize>) -> Result<Template> {
        let mut w = StringBuilder::new();
        self.write_insert(&mut w, rows)?;
        Ok(w.into_template())
    }

    /// 一行记录需要绑定的列；无列清单时为空，此时由记录自行描述全部列。
    pub fn bind_columns(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.bind_columns_into(&mut out);
        out
    }

    pub(crate) fn bind_columns_into(&self, out: &mut Vec<String>) {
        match &self.source {
            Some(sel) => sel.bind_columns_into(out),
            None if self.rows.is_empty() => out.extend(self.columns.iter().cloned()),
            None => {}
        }
    }

    /// 是否为占位符行模式。
    pub(crate) fn is_placeholder_mode(&self) -> bool {
        self.rows.is_empty() && self.source.is_none()
    }

    pub(crate) fn write_to(&self, w: &mut StringBuilder) -> Result<()> {
        self.write_insert(w, None)
    }

    fn write_insert(&self, w: &mut StringBuilder, rows_override: Option<usize>) -> Result<()> {
        if self.table.is_empty() {
            return Err(Error::Empty("insert has no table".to_string()));
        }
        if !self.rows.is_empty() && self.source.is_some() {
            return Err(Error::NotAcceptable(format!(
                "insert into {} has both literal rows and a source select",
                self.table
            )));
        }

        w.write_leading(if self.ignore {
            "INSERT IGNORE INTO "
        } else {
            "INSERT INTO "
        });
        w.write_raw(&self.table);
        if !self.columns.is_empty() {
            w.write_str(" (");
            w.write_raw_list(&self.columns, ",");
            w.write_char(')');
        }

        if let Some(sel) = &self.source {
            sel.write_to(w)?;
        } else if !self.rows.is_empty() {
            self.write_literal_rows(w)?;
        } else {
            self.write_placeholder_rows(w, rows_override.unwrap_or(self.row_count))?;
        }

        if !self.on_duplicate.is_empty() {
            w.write_leading("ON DUPLICATE KEY UPDATE ");
            for (i, item) in self.on_duplicate.iter().enumerate() {
                if i > 0 {
                    w.write_str(", ");
                }
                match item {
                    OnDuplicate::Values(col) => {
                        w.write_raw(col);
                        w.write_str("=VALUES(");
                        w.write_raw(col);
                        w.write_char(')');
                    }
                    OnDuplicate::Set(cond) => cond.write_assignment(w)?,
                }
            }
        }
        Ok(())
    }

    fn write_literal_rows(&self, w: &mut StringBuilder) -> Result<()> {
        let width = if self.columns.is_empty() {
            self.rows[0].len()
        } else {
            self.columns.len()
        };
        w.write_leading("VALUES ");
        for (i, row) in self.rows.iter().enumerate() {
            if row.len() != width {
                return Err(Error::NotValid(format!(
                    "insert into {}: row {i} has {} value(s), expected {width}",
                    self.table,
                    row.len()
                )));
            }
            if i > 0 {
                w.write_char(',');
            }
            w.write_char('(');
            for (j, v) in row.iter().enumerate() {
                if j > 0 {
                    w.write_char(',');
                }
                w.write_placeholder(Slot::Value(v.clone()), false);
            }
            w.write_char(')');
        }
        Ok(())
    }

    fn write_placeholder_rows(&self, w: &mut StringBuilder, rows: usize) -> Result<()> {
        let width = self.placeholder_count.unwrap_or(self.columns.len());
        if width == 0 {
            return Err(Error::NotAcceptable(format!(
                "insert into {} needs rows, a column list, a placeholder count or a source select",
                self.table
            )));
        }
        if rows == 0 {
            return Err(Error::NotAcceptable(format!(
                "insert into {} has a row count of zero",
                self.table
            )));
        }
        w.write_leading("VALUES ");
        for i in 0..rows {
            if i > 0 {
                w.write_char(',');
            }
            w.write_char('(');
            for j in 0..width {
                if j > 0 {
                    w.write_char(',');
                }
                w.write_placeholder(Slot::Positional, false);
            }
            w.write_char(')');
        }
        Ok(())
    }
}
