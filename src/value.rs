//! SQL 参数值：绑定边界上接受的闭合值类型集合（标量及其同质切片）。

use crate::decimal::Decimal;
use crate::error::{Error, Result};
use std::any::Any;
use std::borrow::Cow;
use time::OffsetDateTime;

/// SQL 参数值。
///
/// 切片变体在源 SQL 中只占一个 `?`，展开时变成 `(?,?,?)`。
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SqlValue {
    #[default]
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    String(Cow<'static, str>),
    /// 来自字节源的文本，写入字面量时才校验 UTF-8。
    RawString(Vec<u8>),
    Bytes(Vec<u8>),
    Time(OffsetDateTime),
    Decimal(Decimal),
    Bools(Vec<bool>),
    I64s(Vec<i64>),
    U64s(Vec<u64>),
    F64s(Vec<f64>),
    Strings(Vec<String>),
    BytesList(Vec<Vec<u8>>),
    Times(Vec<OffsetDateTime>),
    Decimals(Vec<Decimal>),
}

impl SqlValue {
    /// 将 `Option<T>` 映射为 `SqlValue`：`None => Null`，`Some(v) => v.into()`。
    pub fn from_option<T: Into<SqlValue>>(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }

    /// 受检的动态转换：类型不在闭集内时返回 `NotSupported`。
    pub fn try_from_any<T: Any>(v: &T) -> Result<Self> {
        let any = v as &dyn Any;

        macro_rules! downcast {
            ($($t:ty),+ $(,)?) => {
                $(
                    if let Some(x) = any.downcast_ref::<$t>() {
                        return Ok(SqlValue::from(x.clone()));
                    }
                )+
            };
        }

        downcast!(
            SqlValue,
            (),
            bool,
            i8,
            i16,
            i32,
            i64,
            isize,
            u8,
            u16,
            u32,
            u64,
            usize,
            f32,
            f64,
            String,
            &'static str,
            Vec<u8>,
            OffsetDateTime,
            Decimal,
            Vec<bool>,
            Vec<i64>,
            Vec<u64>,
            Vec<f64>,
            Vec<String>,
            Vec<Vec<u8>>,
            Vec<OffsetDateTime>,
            Vec<Decimal>,
            Option<bool>,
            Option<i64>,
            Option<u64>,
            Option<f64>,
            Option<String>,
            Option<OffsetDateTime>,
            Option<Decimal>,
        );

        Err(Error::NotSupported(format!(
            "value of type {} is not a supported SQL value kind",
            std::any::type_name::<T>()
        )))
    }

    pub fn is_null(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Decimal(d) => !d.valid,
            _ => false,
        }
    }

    pub fn is_slice(&self) -> bool {
        matches!(
            self,
            Self::Bools(_)
                | Self::I64s(_)
                | Self::U64s(_)
                | Self::F64s(_)
                | Self::Strings(_)
                | Self::BytesList(_)
                | Self::Times(_)
                | Self::Decimals(_)
        )
    }

    /// 展开后占用的占位符数量：标量为 1，切片为其长度。
    pub fn placeholder_len(&self) -> usize {
        match self {
            Self::Bools(v) => v.len(),
            Self::I64s(v) => v.len(),
            Self::U64s(v) => v.len(),
            Self::F64s(v) => v.len(),
            Self::Strings(v) => v.len(),
            Self::BytesList(v) => v.len(),
            Self::Times(v) => v.len(),
            Self::Decimals(v) => v.len(),
            _ => 1,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::I64(_) => "int64",
            Self::U64(_) => "uint64",
            Self::F64(_) => "float64",
            Self::String(_) | Self::RawString(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Time(_) => "time",
            Self::Decimal(_) => "decimal",
            Self::Bools(_) => "[]bool",
            Self::I64s(_) => "[]int64",
            Self::U64s(_) => "[]uint64",
            Self::F64s(_) => "[]float64",
            Self::Strings(_) => "[]string",
            Self::BytesList(_) => "[]bytes",
            Self::Times(_) => "[]time",
            Self::Decimals(_) => "[]decimal",
        }
    }

    /// 把值追加为驱动可直接消费的标量序列（切片逐个展开，无效 Decimal 变为 Null）。
    pub fn flatten_into(&self, out: &mut Vec<SqlValue>) {
        match self {
            Self::Decimal(d) => out.push(decimal_or_null(*d)),
            Self::Bools(v) => out.extend(v.iter().map(|&x| Self::Bool(x))),
            Self::I64s(v) => out.extend(v.iter().map(|&x| Self::I64(x))),
            Self::U64s(v) => out.extend(v.iter().map(|&x| Self::U64(x))),
            Self::F64s(v) => out.extend(v.iter().map(|&x| Self::F64(x))),
            Self::Strings(v) => out.extend(v.iter().map(|x| Self::String(Cow::Owned(x.clone())))),
            Self::BytesList(v) => out.extend(v.iter().map(|x| Self::Bytes(x.clone()))),
            Self::Times(v) => out.extend(v.iter().map(|&x| Self::Time(x))),
            Self::Decimals(v) => out.extend(v.iter().map(|&d| decimal_or_null(d))),
            other => out.push(other.clone()),
        }
    }
}

fn decimal_or_null(d: Decimal) -> SqlValue {
    if d.valid {
        SqlValue::Decimal(d)
    } else {
        SqlValue::Null
    }
}

macro_rules! from_as {
    ($variant:ident, $target:ty, $($t:ty),+ $(,)?) => {
        $(impl From<$t> for SqlValue {
            fn from(v: $t) -> Self {
                Self::$variant(v as $target)
            }
        })+
    };
}

from_as!(I64, i64, i8, i16, i32, i64, isize);
from_as!(U64, u64, u8, u16, u32, u64, usize);
from_as!(F64, f64, f32, f64);

macro_rules! from_variant {
    ($($t:ty => $variant:ident),+ $(,)?) => {
        $(impl From<$t> for SqlValue {
            fn from(v: $t) -> Self {
                Self::$variant(v)
            }
        })+
    };
}

from_variant!(
    bool => Bool,
    Vec<u8> => Bytes,
    OffsetDateTime => Time,
    Decimal => Decimal,
    Vec<bool> => Bools,
    Vec<i64> => I64s,
    Vec<u64> => U64s,
    Vec<f64> => F64s,
    Vec<String> => Strings,
    Vec<Vec<u8>> => BytesList,
    Vec<OffsetDateTime> => Times,
    Vec<Decimal> => Decimals,
);

impl From<()> for SqlValue {
    fn from(_: ()) -> Self {
        Self::Null
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        Self::String(Cow::Owned(v))
    }
}

impl From<&'static str> for SqlValue {
    fn from(v: &'static str) -> Self {
        Self::String(Cow::Borrowed(v))
    }
}

impl From<Cow<'static, str>> for SqlValue {
    fn from(v: Cow<'static, str>) -> Self {
        Self::String(v)
    }
}

impl From<&[u8]> for SqlValue {
    fn from(v: &[u8]) -> Self {
        Self::Bytes(v.to_vec())
    }
}

impl From<Vec<i32>> for SqlValue {
    fn from(v: Vec<i32>) -> Self {
        Self::I64s(v.into_iter().map(i64::from).collect())
    }
}

impl From<Vec<&'static str>> for SqlValue {
    fn from(v: Vec<&'static str>) -> Self {
        Self::Strings(v.into_iter().map(str::to_string).collect())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        Self::from_option(v)
    }
}

#[cfg(test)]
mod tests {
    use super::SqlValue;
    use crate::decimal::Decimal;
    use crate::error::ErrorKind;

    #[test]
    fn from_option_some() {
        assert_eq!(SqlValue::from_option(Some(123_i64)), SqlValue::I64(123));
    }

    #[test]
    fn from_option_none() {
        assert_eq!(SqlValue::from_option::<i64>(None), SqlValue::Null);
    }

    #[test]
    fn from_unit_is_null() {
        let v: SqlValue = ().into();
        assert_eq!(v, SqlValue::Null);
    }

    #[test]
    fn small_ints_widen() {
        assert_eq!(SqlValue::from(-3_i8), SqlValue::I64(-3));
        assert_eq!(SqlValue::from(7_u16), SqlValue::U64(7));
        assert_eq!(SqlValue::from(vec![1_i32, 2]), SqlValue::I64s(vec![1, 2]));
    }

    #[test]
    fn slices_report_length() {
        let v = SqlValue::from(vec!["a", "b", "c"]);
        assert!(v.is_slice());
        assert_eq!(v.placeholder_len(), 3);
        assert_eq!(SqlValue::from(1_i64).placeholder_len(), 1);
    }

    #[test]
    fn flatten_expands_slices_and_nulls_invalid_decimals() {
        let mut out = Vec::new();
        SqlValue::Decimals(vec![Decimal::new(1, 0), Decimal::null()]).flatten_into(&mut out);
        SqlValue::U64s(vec![5]).flatten_into(&mut out);
        assert_eq!(
            out,
            vec![
                SqlValue::Decimal(Decimal::new(1, 0)),
                SqlValue::Null,
                SqlValue::U64(5)
            ]
        );
    }

    #[test]
    fn try_from_any_accepts_closed_set() {
        assert_eq!(SqlValue::try_from_any(&5_u8).unwrap(), SqlValue::U64(5));
        assert_eq!(
            SqlValue::try_from_any(&Some(String::from("x"))).unwrap(),
            SqlValue::String("x".into())
        );
        assert_eq!(
            SqlValue::try_from_any(&None::<i64>).unwrap(),
            SqlValue::Null
        );
    }

    #[test]
    fn try_from_any_rejects_unknown_kinds() {
        struct Point;
        let err = SqlValue::try_from_any(&Point).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotSupported);

        let err = SqlValue::try_from_any(&vec![1_i16]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotSupported);
    }
}
