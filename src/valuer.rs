//! SqlValuer：自定义类型在绑定阶段转换为 `SqlValue` 的能力。
//!
//! 转换在 `Arguments::bind_valuer` 时立即执行，之后的 emission / 插值只面对闭合的
//! `SqlValue` 集合。

use crate::error::Error;
use crate::value::SqlValue;

/// Valuer 错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("dml sql valuer error: {0}")]
pub struct ValuerError(pub String);

/// 声明了标量转换能力却转换失败，属于内部不变量被破坏。
impl From<ValuerError> for Error {
    fn from(e: ValuerError) -> Self {
        Error::Fatal(e.to_string())
    }
}

/// 可转换为 SQL 参数值的类型。
pub trait SqlValuer: std::fmt::Debug {
    fn value(&self) -> Result<SqlValue, ValuerError>;
}

#[cfg(test)]
mod tests {
    use super::{SqlValuer, ValuerError};
    use crate::error::{Error, ErrorKind};
    use crate::value::SqlValue;

    #[derive(Debug)]
    struct Cents(i64);

    impl SqlValuer for Cents {
        fn value(&self) -> Result<SqlValue, ValuerError> {
            if self.0 < 0 {
                return Err(ValuerError("negative cents".into()));
            }
            Ok(SqlValue::I64(self.0))
        }
    }

    #[test]
    fn valuer_converts() {
        assert_eq!(Cents(5).value().unwrap(), SqlValue::I64(5));
    }

    #[test]
    fn valuer_error_is_fatal() {
        let e: Error = Cents(-1).value().unwrap_err().into();
        assert_eq!(e.kind(), ErrorKind::Fatal);
        assert_eq!(e.to_string(), "dml fatal: dml sql valuer error: negative cents");
    }
}
