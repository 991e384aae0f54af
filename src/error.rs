//! 错误分类：所有可恢复错误都在 emission / 绑定 / 插值阶段以类型化错误返回。

/// 错误种类，便于调用方按类别分支处理。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Empty,
    NotAcceptable,
    NotValid,
    NotFound,
    NotSupported,
    Fatal,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// 无法生成任何 SQL（缺少表名、缺少顶层语句等）。
    #[error("dml empty: {0}")]
    Empty(String),
    /// 缺少结构上必需的配置（例如 INSERT 既无列也无占位符数量）。
    #[error("dml not acceptable: {0}")]
    NotAcceptable(String),
    /// 输入值不合法（非法 UTF-8、操作符参数个数不符、占位符数量不符等）。
    #[error("dml not valid: {0}")]
    NotValid(String),
    /// 引用的命名参数或映射列不存在。
    #[error("dml not found: {0}")]
    NotFound(String),
    /// 值类型不在支持的闭集内。
    #[error("dml not supported: {0}")]
    NotSupported(String),
    /// 内部不变量被破坏（例如 SqlValuer 转换失败）。
    #[error("dml fatal: {0}")]
    Fatal(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Empty(_) => ErrorKind::Empty,
            Self::NotAcceptable(_) => ErrorKind::NotAcceptable,
            Self::NotValid(_) => ErrorKind::NotValid,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::NotSupported(_) => ErrorKind::NotSupported,
            Self::Fatal(_) => ErrorKind::Fatal,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Empty(m)
            | Self::NotAcceptable(m)
            | Self::NotValid(m)
            | Self::NotFound(m)
            | Self::NotSupported(m)
            | Self::Fatal(m) => m,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind};

    #[test]
    fn kind_matches_variant() {
        assert_eq!(Error::Empty("x".into()).kind(), ErrorKind::Empty);
        assert_eq!(Error::NotFound("x".into()).kind(), ErrorKind::NotFound);
        assert_eq!(Error::Fatal("x".into()).kind(), ErrorKind::Fatal);
    }

    #[test]
    fn display_has_kind_prefix() {
        let e = Error::NotValid("bad arity".into());
        assert_eq!(e.to_string(), "dml not valid: bad arity");
        assert_eq!(e.message(), "bad arity");
    }
}
