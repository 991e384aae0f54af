//! Query：语句 + 参数 + 渲染选项，一次执行所需的全部输入。

use crate::args::Arguments;
use crate::column_map::{self, ColumnMapper};
use crate::error::{Error, Result};
use crate::interpolate::Mode;
use crate::statement::{Statement, ToSql, emit};
use crate::string_builder::Template;
use crate::value::SqlValue;

/// 渲染选项。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// 输出字面量 SQL（参数列表为空）。
    pub interpolate: bool,
    /// 以 `/*$ID$<key>*/` 注释作为 SQL 前缀，供外部语句缓存识别。
    pub cache_key: Option<String>,
}

/// 绑定了参数的语句。
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    stmt: Statement,
    args: Arguments,
    options: QueryOptions,
    records: usize,
}

impl Query {
    pub fn new(stmt: impl Into<Statement>) -> Self {
        Self::with_options(stmt, QueryOptions::default())
    }

    pub fn with_options(stmt: impl Into<Statement>, options: QueryOptions) -> Self {
        Self {
            stmt: stmt.into(),
            args: Arguments::new(),
            options,
            records: 0,
        }
    }

    /// 渲染为字面量 SQL。
    pub fn interpolate(mut self) -> Self {
        self.options.interpolate = true;
        self
    }

    pub fn with_cache_key(mut self, key: impl Into<String>) -> Self {
        self.options.cache_key = Some(key.into());
        self
    }

    pub fn with_args(mut self, args: Arguments) -> Self {
        self.args = args;
        self
    }

    pub fn statement(&self) -> &Statement {
        &self.stmt
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    pub fn args(&self) -> &Arguments {
        &self.args
    }

    pub fn args_mut(&mut self) -> &mut Arguments {
        &mut self.args
    }

    pub fn bind(&mut self, value: impl Into<SqlValue>) -> &mut Self {
        self.args.bind(value);
        self
    }

    pub fn bind_named(&mut self, name: impl Into<String>, value: impl Into<SqlValue>) -> &mut Self {
        self.args.bind_named(name, value);
        self
    }

    /// 按语句的可绑定列追加一条记录的值。占位符模式的 INSERT 每条记录生成一行。
    pub fn bind_record(&mut self, record: &dyn ColumnMapper) -> Result<&mut Self> {
        let columns = self.stmt.bind_columns();
        column_map::bind_record(&mut self.args, &columns, record)?;
        self.records += 1;
        Ok(self)
    }

    /// 已绑定的记录数。
    pub fn record_count(&self) -> usize {
        self.records
    }

    /// 清空参数与记录计数，保留语句与选项，便于重复执行。
    pub fn reset(&mut self) {
        self.args.reset();
        self.records = 0;
    }

    pub fn to_template(&self) -> Result<Template> {
        match &self.stmt {
            Statement::Insert(ins) if self.records > 0 && ins.is_placeholder_mode() => {
                ins.template_with_rows(Some(self.records))
            }
            stmt => stmt.to_template(),
        }
    }

    fn render(&self) -> Result<(String, Vec<SqlValue>)> {
        let prefix = match &self.options.cache_key {
            Some(key) if key.is_empty() || key.contains("*/") => {
                return Err(Error::NotValid(format!("invalid cache key {key:?}")));
            }
            Some(key) => format!("/*$ID${key}*/ "),
            None => String::new(),
        };

        let tpl = self.to_template()?;
        let mode = if self.options.interpolate {
            Mode::Literal
        } else {
            Mode::Placeholders
        };
        emit(&tpl, &self.args, mode, &prefix)
    }
}

impl ToSql for Query {
    fn to_sql(&self) -> Result<(String, Vec<SqlValue>)> {
        let result = self.render();
        match &result {
            Ok((sql, values)) => tracing::debug!(
                statement = self.stmt.kind(),
                sql_len = sql.len(),
                args = values.len(),
                interpolated = self.options.interpolate,
                "sql rendered"
            ),
            Err(e) => tracing::trace!(
                statement = self.stmt.kind(),
                kind = ?e.kind(),
                error = %e,
                "sql render failed"
            ),
        }
        result
    }
}
