//! With：公共表表达式（CTE）+ 一个顶层语句。

use crate::delete::Delete;
use crate::error::{Error, Result};
use crate::macros::{IntoStrings, collect_into_strings};
use crate::select::Select;
use crate::string_builder::{StringBuilder, Template};
use crate::union::Union;
use crate::update::Update;

/// CTE 的查询体。
#[derive(Debug, Clone, PartialEq)]
pub enum CteSource {
    Select(Select),
    Union(Union),
}

impl From<Select> for CteSource {
    fn from(v: Select) -> Self {
        Self::Select(v)
    }
}

impl From<Union> for CteSource {
    fn from(v: Union) -> Self {
        Self::Union(v)
    }
}

/// `name [(cols)] AS (<select|union>)`
#[derive(Debug, Clone, PartialEq)]
pub struct Cte {
    name: String,
    columns: Vec<String>,
    source: CteSource,
}

pub fn cte(name: impl Into<String>, source: impl Into<CteSource>) -> Cte {
    Cte {
        name: name.into(),
        columns: Vec::new(),
        source: source.into(),
    }
}

impl Cte {
    /// 声明列名。列数不与查询体的投影对齐校验。
    pub fn columns<T>(mut self, cols: T) -> Self
    where
        T: IntoStrings,
    {
        self.columns.extend(collect_into_strings(cols));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn write_to(&self, w: &mut StringBuilder) -> Result<()> {
        w.write_raw(&self.name);
        if !self.columns.is_empty() {
            w.write_str(" (");
            w.write_raw_list(&self.columns, ", ");
            w.write_char(')');
        }
        w.write_str(" AS ");
        w.write_parenthesized(|inner| match &self.source {
            CteSource::Select(s) => s.write_to(inner),
            CteSource::Union(u) => u.write_to(inner),
        })
    }

    fn bind_columns_into(&self, out: &mut Vec<String>) {
        match &self.source {
            CteSource::Select(s) => s.bind_columns_into(out),
            CteSource::Union(u) => u.bind_columns_into(out),
        }
    }
}

/// WITH 之后的顶层语句。
#[derive(Debug, Clone, PartialEq)]
pub enum TopStatement {
    Select(Select),
    Union(Union),
    Update(Update),
    Delete(Delete),
}

/// WITH 语句。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct With {
    recursive: bool,
    ctes: Vec<Cte>,
    top: Option<TopStatement>,
}

pub fn with(ctes: impl IntoIterator<Item = Cte>) -> With {
    With::new().add_ctes(ctes)
}

/// `WITH RECURSIVE ...`
pub fn with_recursive(ctes: impl IntoIterator<Item = Cte>) -> With {
    With::new().recursive().add_ctes(ctes)
}

impl With {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recursive(mut self) -> Self {
        self.recursive = true;
        self
    }

    pub fn add(mut self, cte: Cte) -> Self {
        self.ctes.push(cte);
        self
    }

    pub fn add_ctes(mut self, ctes: impl IntoIterator<Item = Cte>) -> Self {
        self.ctes.extend(ctes);
        self
    }

    pub fn select(mut self, sel: Select) -> Self {
        self.top = Some(TopStatement::Select(sel));
        self
    }

    pub fn union(mut self, u: Union) -> Self {
        self.top = Some(TopStatement::Union(u));
        self
    }

    pub fn update(mut self, u: Update) -> Self {
        self.top = Some(TopStatement::Update(u));
        self
    }

    pub fn delete(mut self, d: Delete) -> Self {
        self.top = Some(TopStatement::Delete(d));
        self
    }

    /// CTE 名称列表。
    pub fn table_names(&self) -> Vec<&str> {
        self.ctes.iter().map(Cte::name).collect()
    }

    pub fn to_template(&self) -> Result<Template> {
        let mut w = StringBuilder::new();
        self.write_to(&mut w)?;
        Ok(w.into_template())
    }

    pub fn bind_columns(&self) -> Vec<String> {
        let mut out = Vec::new();
        for c in &self.ctes {
            c.bind_columns_into(&mut out);
        }
        match &self.top {
            Some(TopStatement::Select(s)) => s.bind_columns_into(&mut out),
            Some(TopStatement::Union(u)) => u.bind_columns_into(&mut out),
            Some(TopStatement::Update(u)) => u.bind_columns_into(&mut out),
            Some(TopStatement::Delete(d)) => out.extend(d.bind_columns()),
            None => {}
        }
        out
    }

    pub(crate) fn write_to(&self, w: &mut StringBuilder) -> Result<()> {
        let Some(top) = &self.top else {
            return Err(Error::Empty("with has no top-level statement".to_string()));
        };

        if !self.ctes.is_empty() {
            w.write_leading(if self.recursive {
                "WITH RECURSIVE "
            } else {
                "WITH "
            });
            for (i, c) in self.ctes.iter().enumerate() {
                if i > 0 {
                    w.write_str(", ");
                }
                c.write_to(w)?;
            }
        }

        match top {
            TopStatement::Select(s) => s.write_to(w),
            TopStatement::Union(u) => u.write_to(w),
            TopStatement::Update(u) => u.write_to(w),
            TopStatement::Delete(d) => d.write_to(w),
        }
    }
}
