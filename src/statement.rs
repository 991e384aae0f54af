//! Statement：六种语句的闭合集合与统一的渲染入口。

use crate::args::Arguments;
use crate::cte::With;
use crate::delete::Delete;
use crate::error::Result;
use crate::insert::Insert;
use crate::interpolate::{Mode, render};
use crate::select::Select;
use crate::string_builder::{StringBuilder, Template};
use crate::union::Union;
use crate::update::Update;
use crate::value::SqlValue;

/// 渲染为 SQL 与按顺序排列的参数。
pub trait ToSql {
    fn to_sql(&self) -> Result<(String, Vec<SqlValue>)>;
}

/// 可渲染的语句。
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(Select),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
    Union(Union),
    With(With),
}

macro_rules! statement_from {
    ($($variant:ident),+ $(,)?) => {
        $(impl From<$variant> for Statement {
            fn from(v: $variant) -> Self {
                Self::$variant(v)
            }
        })+
    };
}

statement_from!(Select, Insert, Update, Delete, Union, With);

impl Statement {
    pub(crate) fn write_to(&self, w: &mut StringBuilder) -> Result<()> {
        match self {
            Self::Select(s) => s.write_to(w),
            Self::Insert(s) => s.write_to(w),
            Self::Update(s) => s.write_to(w),
            Self::Delete(s) => s.write_to(w),
            Self::Union(s) => s.write_to(w),
            Self::With(s) => s.write_to(w),
        }
    }

    pub fn to_template(&self) -> Result<Template> {
        let mut w = StringBuilder::new();
        self.write_to(&mut w)?;
        Ok(w.into_template())
    }

    /// 位置占位符对应的列名，用于按列绑定记录。
    pub fn bind_columns(&self) -> Vec<String> {
        match self {
            Self::Select(s) => s.bind_columns(),
            Self::Insert(s) => s.bind_columns(),
            Self::Update(s) => s.bind_columns(),
            Self::Delete(s) => s.bind_columns(),
            Self::Union(s) => s.bind_columns(),
            Self::With(s) => s.bind_columns(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Select(_) => "select",
            Self::Insert(_) => "insert",
            Self::Update(_) => "update",
            Self::Delete(_) => "delete",
            Self::Union(_) => "union",
            Self::With(_) => "with",
        }
    }
}

/// 按 `args` 渲染模板，`prefix` 原样写在最前面。`Mode::Literal` 时参数列表为空。
pub(crate) fn emit(
    tpl: &Template,
    args: &Arguments,
    mode: Mode,
    prefix: &str,
) -> Result<(String, Vec<SqlValue>)> {
    let mut out = String::with_capacity(prefix.len() + tpl.sql().len());
    out.push_str(prefix);
    let values = render(tpl, args, mode, &mut out)?;
    Ok((out, values))
}

macro_rules! to_sql_without_args {
    ($($t:ty),+ $(,)?) => {
        $(impl ToSql for $t {
            /// 只含构造时给定的值；需要外部参数时使用 `Query`。
            fn to_sql(&self) -> Result<(String, Vec<SqlValue>)> {
                emit(&self.to_template()?, &Arguments::new(), Mode::Placeholders, "")
            }
        })+
    };
}

to_sql_without_args!(Statement, Select, Insert, Update, Delete, Union, With);
