//! Select：构建 SELECT 语句。

use crate::condition::{Condition, collect_bind_columns, write_conditions};
use crate::error::{Error, Result};
use crate::macros::{IntoStrings, collect_into_strings};
use crate::string_builder::{StringBuilder, Template};
use crate::value::SqlValue;

/// JOIN 类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Cross,
}

impl JoinKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Cross => "CROSS JOIN",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Projection {
    Column(String),
    Expr {
        sql: String,
        values: Vec<SqlValue>,
        alias: Option<String>,
    },
    Sub {
        sel: Box<Select>,
        alias: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
enum Source {
    Table { name: String, alias: Option<String> },
    Sub { sel: Box<Select>, alias: String },
}

#[derive(Debug, Clone, PartialEq)]
struct Join {
    kind: JoinKind,
    table: String,
    on: Vec<Condition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lock {
    ForUpdate,
    LockInShareMode,
}

/// ORDER BY 中的一项。
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct OrderBy {
    col: String,
    desc: bool,
}

impl OrderBy {
    pub(crate) fn asc(col: String) -> Self {
        Self { col, desc: false }
    }

    pub(crate) fn desc(col: String) -> Self {
        Self { col, desc: true }
    }
}

pub(crate) fn write_order_by(w: &mut StringBuilder, items: &[OrderBy]) {
    if items.is_empty() {
        return;
    }
    w.write_leading("ORDER BY ");
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            w.write_str(", ");
        }
        w.write_raw(&item.col);
        if item.desc {
            w.write_str(" DESC");
        }
    }
}

pub(crate) fn write_limit(w: &mut StringBuilder, limit: Option<u64>) {
    if let Some(n) = limit {
        w.write_leading("LIMIT ");
        w.write_str(&n.to_string());
    }
}

/// 列名 `_preserve_result_set`：UNION 用它还原各成员的结果顺序。
pub(crate) const PRESERVE_RESULT_SET: &str = "_preserve_result_set";

/// SELECT 语句。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Select {
    distinct: bool,
    columns: Vec<Projection>,
    from: Option<Source>,
    joins: Vec<Join>,
    where_: Vec<Condition>,
    group_by: Vec<String>,
    having: Vec<Condition>,
    order_by: Vec<OrderBy>,
    limit: Option<u64>,
    offset: Option<u64>,
    lock: Option<Lock>,
}

/// 以给定列创建 SELECT；空列表渲染为 `*`。
pub fn select<T>(cols: T) -> Select
where
    T: IntoStrings,
{
    Select::new().add_columns(cols)
}

impl Select {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn add_columns<T>(mut self, cols: T) -> Self
    where
        T: IntoStrings,
    {
        self.columns
            .extend(collect_into_strings(cols).into_iter().map(Projection::Column));
        self
    }

    /// 追加表达式列，例如 `COUNT(*)`。
    pub fn add_expr(self, sql: impl Into<String>) -> Self {
        self.push_expr(sql.into(), Vec::new(), None)
    }

    pub fn add_expr_as(self, sql: impl Into<String>, alias: impl Into<String>) -> Self {
        self.push_expr(sql.into(), Vec::new(), Some(alias.into()))
    }

    /// 追加带值的表达式列：`sql` 中的 `?` 依次绑定 `values`。
    pub fn add_expr_with<I, V>(
        self,
        sql: impl Into<String>,
        values: I,
        alias: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        let alias = alias.into();
        let alias = (!alias.is_empty()).then_some(alias);
        self.push_expr(
            sql.into(),
            values.into_iter().map(Into::into).collect(),
            alias,
        )
    }

    fn push_expr(mut self, sql: String, values: Vec<SqlValue>, alias: Option<String>) -> Self {
        self.columns.push(Projection::Expr { sql, values, alias });
        self
    }

    /// 子查询列：`(SELECT ...) AS alias`。
    pub fn add_sub_select(mut self, sel: Select, alias: impl Into<String>) -> Self {
        self.columns.push(Projection::Sub {
            sel: Box::new(sel),
            alias: alias.into(),
        });
        self
    }

    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.from = Some(Source::Table {
            name: table.into(),
            alias: None,
        });
        self
    }

    pub fn from_as(mut self, table: impl Into<String>, alias: impl Into<String>) -> Self {
        self.from = Some(Source::Table {
            name: table.into(),
            alias: Some(alias.into()),
        });
        self
    }

    /// `FROM (SELECT ...) AS alias`
    pub fn from_sub(mut self, sel: Select, alias: impl Into<String>) -> Self {
        self.from = Some(Source::Sub {
            sel: Box::new(sel),
            alias: alias.into(),
        });
        self
    }

    pub fn join<I>(mut self, kind: JoinKind, table: impl Into<String>, on: I) -> Self
    where
        I: IntoIterator<Item = Condition>,
    {
        self.joins.push(Join {
            kind,
            table: table.into(),
            on: on.into_iter().collect(),
        });
        self
    }

    pub fn inner_join<I>(self, table: impl Into<String>, on: I) -> Self
    where
        I: IntoIterator<Item = Condition>,
    {
        self.join(JoinKind::Inner, table, on)
    }

    pub fn left_join<I>(self, table: impl Into<String>, on: I) -> Self
    where
        I: IntoIterator<Item = Condition>,
    {
        self.join(JoinKind::Left, table, on)
    }

    pub fn right_join<I>(self, table: impl Into<String>, on: I) -> Self
    where
        I: IntoIterator<Item = Condition>,
    {
        self.join(JoinKind::Right, table, on)
    }

    pub fn cross_join(self, table: impl Into<String>) -> Self {
        self.join(JoinKind::Cross, table, std::iter::empty())
    }

    /// 追加 WHERE 条件。
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

    pub fn group_by<T>(mut self, cols: T) -> Self
    where
        T: IntoStrings,
    {
        self.group_by.extend(collect_into_strings(cols));
        self
    }

    pub fn having(mut self, cond: Condition) -> Self {
        self.having.push(cond);
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

    /// OFFSET 需要同时设置 LIMIT。
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn for_update(mut self) -> Self {
        self.lock = Some(Lock::ForUpdate);
        self
    }

    pub fn lock_in_share_mode(mut self) -> Self {
        self.lock = Some(Lock::LockInShareMode);
        self
    }

    /// 未绑定参数的 SQL 模板。
    pub fn to_template(&self) -> Result<Template> {
        let mut w = StringBuilder::new();
        self.write_to(&mut w)?;
        Ok(w.into_template())
    }

    /// 位置占位符对应的列名（JOIN ON、WHERE、HAVING 中以列为左值的条件）。
    pub fn bind_columns(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.bind_columns_into(&mut out);
        out
    }

    pub(crate) fn bind_columns_into(&self, out: &mut Vec<String>) {
        for p in &self.columns {
            if let Projection::Sub { sel, .. } = p {
                sel.bind_columns_into(out);
            }
        }
        if let Some(Source::Sub { sel, .. }) = &self.from {
            sel.bind_columns_into(out);
        }
        for j in &self.joins {
            collect_bind_columns(&j.on, out);
        }
        collect_bind_columns(&self.where_, out);
        collect_bind_columns(&self.having, out);
    }

    pub(crate) fn write_to(&self, w: &mut StringBuilder) -> Result<()> {
        self.write_select(w, None)
    }

    /// `preserve` 为 UNION 成员序号：在列表末尾追加 `<i> AS _preserve_result_set`。
    pub(crate) fn write_select(&self, w: &mut StringBuilder, preserve: Option<usize>) -> Result<()> {
        let Some(from) = &self.from else {
            return Err(Error::Empty("select has no FROM table".to_string()));
        };
        if self.offset.is_some() && self.limit.is_none() {
            return Err(Error::NotAcceptable(
                "select has OFFSET without LIMIT".to_string(),
            ));
        }

        w.write_leading("SELECT");
        if self.distinct {
            w.write_str(" DISTINCT");
        }
        w.write_char(' ');
        if self.columns.is_empty() {
            w.write_char('*');
        }
        for (i, p) in self.columns.iter().enumerate() {
            if i > 0 {
                w.write_str(", ");
            }
            match p {
                Projection::Column(c) => w.write_raw(c),
                Projection::Expr { sql, values, alias } => {
                    w.write_fragment(sql, values)?;
                    if let Some(alias) = alias {
                        w.write_str(" AS ");
                        w.write_raw(alias);
                    }
                }
                Projection::Sub { sel, alias } => {
                    w.write_parenthesized(|inner| sel.write_to(inner))?;
                    w.write_str(" AS ");
                    w.write_raw(alias);
                }
            }
        }
        if let Some(i) = preserve {
            w.write_str(", ");
            w.write_str(&i.to_string());
            w.write_str(" AS ");
            w.write_str(PRESERVE_RESULT_SET);
        }

        w.write_leading("FROM ");
        match from {
            Source::Table { name, alias } => {
                w.write_raw(name);
                if let Some(alias) = alias {
                    w.write_str(" AS ");
                    w.write_raw(alias);
                }
            }
            Source::Sub { sel, alias } => {
                w.write_parenthesized(|inner| sel.write_to(inner))?;
                w.write_str(" AS ");
                w.write_raw(alias);
            }
        }

        for j in &self.joins {
            w.write_leading(j.kind.as_str());
            w.write_char(' ');
            w.write_raw(&j.table);
            if !j.on.is_empty() {
                w.write_str(" ON ");
                write_conditions(w, &j.on)?;
            }
        }

        if !self.where_.is_empty() {
            w.write_leading("WHERE ");
            write_conditions(w, &self.where_)?;
        }

        if !self.group_by.is_empty() {
            w.write_leading("GROUP BY ");
            w.write_raw_list(&self.group_by, ", ");
        }

        if !self.having.is_empty() {
            w.write_leading("HAVING ");
            write_conditions(w, &self.having)?;
        }

        write_order_by(w, &self.order_by);
        write_limit(w, self.limit);
        if let Some(n) = self.offset {
            w.write_leading("OFFSET ");
            w.write_str(&n.to_string());
        }

        match self.lock {
            Some(Lock::ForUpdate) => w.write_leading("FOR UPDATE"),
            Some(Lock::LockInShareMode) => w.write_leading("LOCK IN SHARE MODE"),
            None => {}
        }
        Ok(())
    }
}
