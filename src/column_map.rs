//! 记录绑定：业务类型把自己的字段值按列追加到 `Arguments`。
//!
//! 列名序列与错误传播由本模块负责，字段取值由记录类型负责：
//! - 语句没有可绑定列时（例如无列清单的批量 INSERT），调用 `describe_columns`，按声明顺序追加全部字段；
//! - 否则按列名逐个调用 `map_column`，每次必须恰好追加一个值。

use crate::args::Arguments;
use crate::decimal::Decimal;
use crate::error::{Error, Result};
use crate::value::SqlValue;
use crate::valuer::SqlValuer;
use std::any::Any;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnMapMode {
    /// 追加全部字段。
    DescribeAll,
    /// 只追加当前列。
    ByName,
}

/// 由记录类型实现。
pub trait ColumnMapper {
    /// 按声明顺序追加全部字段。
    fn describe_columns(&self, cm: &mut ColumnMap<'_>) -> Result<()>;

    /// 追加 `column` 对应的一个值；未知列返回 `Error::NotFound`。
    fn map_column(&self, column: &str, cm: &mut ColumnMap<'_>) -> Result<()>;
}

/// 追加值的游标。
#[derive(Debug)]
pub struct ColumnMap<'a> {
    args: &'a mut Arguments,
    mode: ColumnMapMode,
    column: Option<&'a str>,
    appended: usize,
}

macro_rules! appenders {
    ($($name:ident($t:ty)),+ $(,)?) => {
        $(
            pub fn $name(&mut self, v: $t) -> &mut Self {
                self.value(v)
            }
        )+
    };
}

impl<'a> ColumnMap<'a> {
    fn new(args: &'a mut Arguments, mode: ColumnMapMode, column: Option<&'a str>) -> Self {
        Self {
            args,
            mode,
            column,
            appended: 0,
        }
    }

    pub fn mode(&self) -> ColumnMapMode {
        self.mode
    }

    /// `ByName` 模式下的当前列名。
    pub fn column(&self) -> Option<&str> {
        self.column
    }

    /// 本次回调已追加的值数量。
    pub fn appended(&self) -> usize {
        self.appended
    }

    pub fn value(&mut self, v: impl Into<SqlValue>) -> &mut Self {
        self.args.bind(v);
        self.appended += 1;
        self
    }

    pub fn null(&mut self) -> &mut Self {
        self.value(SqlValue::Null)
    }

    appenders!(
        bool(bool),
        int64(i64),
        uint64(u64),
        float64(f64),
        string(String),
        bytes(Vec<u8>),
        time(OffsetDateTime),
        decimal(Decimal),
    );

    pub fn valuer(&mut self, v: &dyn SqlValuer) -> Result<&mut Self> {
        self.args.bind_valuer(v)?;
        self.appended += 1;
        Ok(self)
    }

    /// 类型不在支持的闭集内时返回 `NotSupported`。
    pub fn any<T: Any>(&mut self, v: &T) -> Result<&mut Self> {
        self.args.bind_any(v)?;
        self.appended += 1;
        Ok(self)
    }
}

/// 把一条记录按 `columns` 追加到 `args`。出错时 `args` 恢复到调用前的长度。
pub(crate) fn bind_record(
    args: &mut Arguments,
    columns: &[String],
    record: &dyn ColumnMapper,
) -> Result<()> {
    let before = args.len();
    let result = map_record(args, columns, record);
    if result.is_err() {
        args.truncate(before);
    }
    result
}

fn map_record(args: &mut Arguments, columns: &[String], record: &dyn ColumnMapper) -> Result<()> {
    if columns.is_empty() {
        let mut cm = ColumnMap::new(args, ColumnMapMode::DescribeAll, None);
        record.describe_columns(&mut cm)?;
        if cm.appended == 0 {
            return Err(Error::NotValid("record described no columns".to_string()));
        }
        return Ok(());
    }

    for col in columns {
        let mut cm = ColumnMap::new(args, ColumnMapMode::ByName, Some(col.as_str()));
        record.map_column(col, &mut cm)?;
        if cm.appended != 1 {
            return Err(Error::NotValid(format!(
                "column {col} mapped to {} value(s), expected 1",
                cm.appended
            )));
        }
    }
    Ok(())
}
