//! Arguments：按绑定顺序存储参数，支持命名参数、切片以及先占位后赋值的槽位。

use crate::decimal::Decimal;
use crate::error::{Error, Result};
use crate::interpolate;
use crate::value::SqlValue;
use crate::valuer::SqlValuer;
use std::any::Any;
use time::OffsetDateTime;

/// 单个参数。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Argument {
    pub(crate) name: Option<String>,
    pub(crate) value: SqlValue,
    pub(crate) set: bool,
}

impl Argument {
    pub fn new(value: impl Into<SqlValue>) -> Self {
        Self {
            name: None,
            value: value.into(),
            set: true,
        }
    }

    pub fn named(name: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self {
            name: Some(name.into()),
            value: value.into(),
            set: true,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn value(&self) -> &SqlValue {
        &self.value
    }

    /// 未赋值的槽位在解析时返回 `NotValid`。
    pub fn is_set(&self) -> bool {
        self.set
    }
}

/// 参数容器。可复用：`reset()` 清空内容但保留容量。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    args: Vec<Argument>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            args: Vec::with_capacity(n),
        }
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn get(&self, ordinal: usize) -> Option<&Argument> {
        self.args.get(ordinal)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Argument> {
        self.args.iter()
    }

    /// 追加一个未命名参数，返回其序号。
    pub fn bind(&mut self, value: impl Into<SqlValue>) -> usize {
        self.push(Argument::new(value))
    }

    /// 追加命名参数；同名参数已存在时替换其值并返回原序号。
    pub fn bind_named(&mut self, name: impl Into<String>, value: impl Into<SqlValue>) -> usize {
        let name = name.into();
        if let Some(idx) = self.position_of(&name) {
            let arg = &mut self.args[idx];
            arg.value = value.into();
            arg.set = true;
            return idx;
        }
        self.push(Argument::named(name, value))
    }

    /// 绑定任意值：类型不在支持的闭集内时返回 `NotSupported`。
    pub fn bind_any<T: Any>(&mut self, value: &T) -> Result<usize> {
        let v = SqlValue::try_from_any(value)?;
        Ok(self.bind(v))
    }

    /// 通过 `SqlValuer` 绑定；转换失败返回 `Fatal`。
    pub fn bind_valuer(&mut self, value: &dyn SqlValuer) -> Result<usize> {
        let v = value.value()?;
        Ok(self.bind(v))
    }

    /// 追加一个尚未赋值的槽位，之后用 `set` 填充。
    pub fn push_unset(&mut self) -> usize {
        self.push(Argument::default())
    }

    /// 追加一个尚未赋值的命名槽位。
    pub fn push_unset_named(&mut self, name: impl Into<String>) -> usize {
        self.push(Argument {
            name: Some(name.into()),
            ..Argument::default()
        })
    }

    pub fn set(&mut self, ordinal: usize, value: impl Into<SqlValue>) -> Result<()> {
        let len = self.args.len();
        let arg = self.args.get_mut(ordinal).ok_or_else(|| {
            Error::NotFound(format!("argument {ordinal} out of range ({len} bound)"))
        })?;
        arg.value = value.into();
        arg.set = true;
        Ok(())
    }

    /// 清空参数，保留已分配容量。
    pub fn reset(&mut self) {
        self.args.clear();
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.args.truncate(len);
    }

    /// 按 `sql` 中占位符的出现顺序解析参数，返回驱动可直接使用的值序列（切片已展开）。
    pub fn to_positional_values(&self, sql: &str) -> Result<Vec<SqlValue>> {
        interpolate::expand_placeholders(sql, self).map(|(_, values)| values)
    }

    pub fn null(&mut self) -> &mut Self {
        self.bind(SqlValue::Null);
        self
    }

    pub fn bool(&mut self, v: bool) -> &mut Self {
        self.bind(v);
        self
    }

    pub fn int64(&mut self, v: i64) -> &mut Self {
        self.bind(v);
        self
    }

    pub fn uint64(&mut self, v: u64) -> &mut Self {
        self.bind(v);
        self
    }

    pub fn float64(&mut self, v: f64) -> &mut Self {
        self.bind(v);
        self
    }

    pub fn string(&mut self, v: impl Into<String>) -> &mut Self {
        self.bind(v.into());
        self
    }

    /// 字节形式的文本，插值时校验 UTF-8。
    pub fn raw_string(&mut self, v: impl Into<Vec<u8>>) -> &mut Self {
        self.bind(SqlValue::RawString(v.into()));
        self
    }

    pub fn bytes(&mut self, v: impl Into<Vec<u8>>) -> &mut Self {
        self.bind(SqlValue::Bytes(v.into()));
        self
    }

    pub fn time(&mut self, v: OffsetDateTime) -> &mut Self {
        self.bind(v);
        self
    }

    pub fn decimal(&mut self, v: Decimal) -> &mut Self {
        self.bind(v);
        self
    }

    pub fn bools(&mut self, v: impl Into<Vec<bool>>) -> &mut Self {
        self.bind(SqlValue::Bools(v.into()));
        self
    }

    pub fn int64s(&mut self, v: impl Into<Vec<i64>>) -> &mut Self {
        self.bind(SqlValue::I64s(v.into()));
        self
    }

    pub fn uint64s(&mut self, v: impl Into<Vec<u64>>) -> &mut Self {
        self.bind(SqlValue::U64s(v.into()));
        self
    }

    pub fn float64s(&mut self, v: impl Into<Vec<f64>>) -> &mut Self {
        self.bind(SqlValue::F64s(v.into()));
        self
    }

    pub fn strings<I, S>(&mut self, v: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bind(SqlValue::Strings(v.into_iter().map(Into::into).collect()));
        self
    }

    pub fn bytes_list(&mut self, v: Vec<Vec<u8>>) -> &mut Self {
        self.bind(SqlValue::BytesList(v));
        self
    }

    pub fn times(&mut self, v: impl Into<Vec<OffsetDateTime>>) -> &mut Self {
        self.bind(SqlValue::Times(v.into()));
        self
    }

    pub fn decimals(&mut self, v: impl Into<Vec<Decimal>>) -> &mut Self {
        self.bind(SqlValue::Decimals(v.into()));
        self
    }

    pub fn named(&mut self, name: impl Into<String>, value: impl Into<SqlValue>) -> &mut Self {
        self.bind_named(name, value);
        self
    }

    fn push(&mut self, arg: Argument) -> usize {
        self.args.push(arg);
        self.args.len() - 1
    }

    fn position_of(&self, name: &str) -> Option<usize> {
        self.args.iter().position(|a| a.name.as_deref() == Some(name))
    }
}

impl<'a> IntoIterator for &'a Arguments {
    type Item = &'a Argument;
    type IntoIter = std::slice::Iter<'a, Argument>;

    fn into_iter(self) -> Self::IntoIter {
        self.args.iter()
    }
}

impl<V: Into<SqlValue>> FromIterator<V> for Arguments {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            args: iter.into_iter().map(Argument::new).collect(),
        }
    }
}

/// 占位符解析：命名占位符按名字认领参数；`?` 依次取下一个未命名且未被认领的参数。
pub(crate) struct Resolver<'a> {
    args: &'a [Argument],
    claimed: Vec<bool>,
    next: usize,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(args: &'a Arguments) -> Self {
        Self {
            args: &args.args,
            claimed: vec![false; args.args.len()],
            next: 0,
        }
    }

    pub(crate) fn positional(&mut self) -> Result<&'a SqlValue> {
        while self.next < self.args.len()
            && (self.claimed[self.next] || self.args[self.next].name.is_some())
        {
            self.next += 1;
        }
        let idx = self.next;
        let args = self.args;
        let arg = args.get(idx).ok_or_else(|| {
            Error::NotValid(format!(
                "more placeholders than bound arguments ({} bound)",
                args.len()
            ))
        })?;
        self.claimed[idx] = true;
        self.next += 1;
        checked(idx, arg)
    }

    pub(crate) fn named(&mut self, name: &str) -> Result<&'a SqlValue> {
        let args = self.args;
        let idx = args
            .iter()
            .position(|a| a.name.as_deref() == Some(name))
            .ok_or_else(|| Error::NotFound(format!("named argument :{name} is not bound")))?;
        self.claimed[idx] = true;
        checked(idx, &args[idx])
    }

    /// 未命名参数必须全部被消费；未被引用的命名参数允许存在。
    pub(crate) fn finish(&self) -> Result<()> {
        let left = self
            .args
            .iter()
            .zip(&self.claimed)
            .filter(|(a, claimed)| a.name.is_none() && !**claimed)
            .count();
        if left > 0 {
            return Err(Error::NotValid(format!(
                "{left} bound argument(s) not consumed by any placeholder"
            )));
        }
        Ok(())
    }
}

fn checked(idx: usize, arg: &Argument) -> Result<&SqlValue> {
    if !arg.set {
        return Err(Error::NotValid(format!("argument {idx} is not set")));
    }
    Ok(&arg.value)
}
