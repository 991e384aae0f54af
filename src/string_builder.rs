//! SQL 文本拼接：一边写文本，一边按出现顺序记录占位符标记，产出 `Template`。

use crate::error::{Error, Result};
use crate::value::SqlValue;

/// 占位符来源。
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Slot {
    /// 构造语句时已经给定的值。
    Value(SqlValue),
    /// `?`：按绑定顺序取下一个未命名参数。
    Positional,
    /// `:name`：按名字取参数。
    Named(String),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Mark {
    /// 占位符在 SQL 文本中的字节偏移。
    pub(crate) at: usize,
    pub(crate) len: usize,
    pub(crate) slot: Slot,
    /// 位于 `IN` 之后：标量值也需要包一层括号。
    pub(crate) in_list: bool,
}

/// 未绑定参数的 SQL：文本（含 `?` / `:name`）+ 按出现顺序排列的占位符标记。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Template {
    sql: String,
    pub(crate) marks: Vec<Mark>,
}

impl Template {
    /// 扫描自由文本中的占位符；引号与 `/* */` 注释内的字符不算占位符。
    pub fn parse(sql: impl Into<String>) -> Self {
        let sql = sql.into();
        let marks = scan_placeholders(&sql);
        Self { sql, marks }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// 源文本中的占位符数量（切片展开之前）。
    pub fn placeholder_count(&self) -> usize {
        self.marks.len()
    }

    /// 尚需由 `Arguments` 提供值的占位符数量。
    pub fn unbound_count(&self) -> usize {
        self.marks
            .iter()
            .filter(|m| !matches!(m.slot, Slot::Value(_)))
            .count()
    }

    /// 按出现顺序返回命名占位符的名字。
    pub fn named_placeholders(&self) -> Vec<&str> {
        self.marks
            .iter()
            .filter_map(|m| match &m.slot {
                Slot::Named(n) => Some(n.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Default, Clone)]
pub(crate) struct StringBuilder {
    buf: String,
    marks: Vec<Mark>,
}

impl StringBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// 写入 `s`；如果不是首次写入，会先写入一个空格。
    pub(crate) fn write_leading(&mut self, s: &str) {
        if !self.buf.is_empty() {
            self.buf.push(' ');
        }
        self.buf.push_str(s);
    }

    pub(crate) fn write_str(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    pub(crate) fn write_char(&mut self, c: char) {
        self.buf.push(c);
    }

    /// 写入一个占位符：命名占位符写作 `:name`，其余写作 `?`。
    pub(crate) fn write_placeholder(&mut self, slot: Slot, in_list: bool) {
        let at = self.buf.len();
        match &slot {
            Slot::Named(name) => {
                self.buf.push(':');
                self.buf.push_str(name);
            }
            _ => self.buf.push('?'),
        }
        let len = self.buf.len() - at;
        self.marks.push(Mark {
            at,
            len,
            slot,
            in_list,
        });
    }

    /// 写入调用方提供的 SQL 片段（标识符、表达式等），其中的 `?` / `:name` 同样记为占位符。
    pub(crate) fn write_raw(&mut self, sql: &str) {
        let base = self.buf.len();
        self.buf.push_str(sql);
        self.marks
            .extend(scan_placeholders(sql).into_iter().map(|mut m| {
                m.at += base;
                m
            }));
    }

    /// 写入带值的表达式片段：片段中的 `?` 依次绑定 `values`，数量必须一致。
    pub(crate) fn write_fragment(&mut self, sql: &str, values: &[SqlValue]) -> Result<()> {
        if values.is_empty() {
            self.write_raw(sql);
            return Ok(());
        }

        let scanned = scan_placeholders(sql);
        let positional = scanned
            .iter()
            .filter(|m| m.slot == Slot::Positional)
            .count();
        if positional != values.len() {
            return Err(Error::NotValid(format!(
                "expression {sql:?} has {positional} placeholder(s) but {} value(s)",
                values.len()
            )));
        }

        let base = self.buf.len();
        self.buf.push_str(sql);
        let mut values = values.iter();
        for mut m in scanned {
            m.at += base;
            if m.slot == Slot::Positional
                && let Some(v) = values.next()
            {
                m.slot = Slot::Value(v.clone());
            }
            self.marks.push(m);
        }
        Ok(())
    }

    /// 写入多个片段，用 `sep` 分隔。
    pub(crate) fn write_raw_list(&mut self, items: &[String], sep: &str) {
        for (i, s) in items.iter().enumerate() {
            if i > 0 {
                self.buf.push_str(sep);
            }
            self.write_raw(s);
        }
    }

    /// 追加另一个 builder 的内容，占位符标记随之平移。
    pub(crate) fn append(&mut self, other: StringBuilder) {
        let base = self.buf.len();
        self.buf.push_str(&other.buf);
        self.marks.extend(other.marks.into_iter().map(|mut m| {
            m.at += base;
            m
        }));
    }

    /// 把 `f` 写出的内容包在括号内追加。
    pub(crate) fn write_parenthesized(
        &mut self,
        f: impl FnOnce(&mut StringBuilder) -> Result<()>,
    ) -> Result<()> {
        let mut inner = StringBuilder::new();
        f(&mut inner)?;
        self.buf.push('(');
        self.append(inner);
        self.buf.push(')');
        Ok(())
    }

    pub(crate) fn into_template(self) -> Template {
        Template {
            sql: self.buf,
            marks: self.marks,
        }
    }
}

/// 扫描 `?` 与 `:name`。跳过单引号、双引号、反引号内的内容，跳过 `/* */` 与 `-- ` 注释
/// （`--` 之后须为空白、控制字符或文本结尾，`1--?` 仍是表达式），
/// `::` 视为类型转换而非命名占位符。
pub(crate) fn scan_placeholders(sql: &str) -> Vec<Mark> {
    let b = sql.as_bytes();
    let mut marks = Vec::new();
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < b.len() {
        let c = b[i];

        if let Some(q) = quote {
            if c == b'\\' && q != b'`' {
                i += 2;
                continue;
            }
            if c == q {
                quote = None;
            }
            i += 1;
            continue;
        }

        match c {
            b'\'' | b'"' | b'`' => {
                quote = Some(c);
                i += 1;
            }
            b'/' if b.get(i + 1) == Some(&b'*') => {
                i = match sql[i + 2..].find("*/") {
                    Some(end) => i + 2 + end + 2,
                    None => b.len(),
                };
            }
            b'-' if b.get(i + 1) == Some(&b'-')
                && b.get(i + 2).is_none_or(|n| n.is_ascii_whitespace() || n.is_ascii_control()) =>
            {
                i = match sql[i..].find('\n') {
                    Some(end) => i + end + 1,
                    None => b.len(),
                };
            }
            b'?' => {
                marks.push(Mark {
                    at: i,
                    len: 1,
                    slot: Slot::Positional,
                    in_list: false,
                });
                i += 1;
            }
            b':' if b.get(i + 1) == Some(&b':') => i += 2,
            b':' if b
                .get(i + 1)
                .is_some_and(|n| n.is_ascii_alphabetic() || *n == b'_') =>
            {
                let mut j = i + 1;
                while j < b.len() && (b[j].is_ascii_alphanumeric() || b[j] == b'_') {
                    j += 1;
                }
                marks.push(Mark {
                    at: i,
                    len: j - i,
                    slot: Slot::Named(sql[i + 1..j].to_string()),
                    in_list: false,
                });
                i = j;
            }
            _ => i += 1,
        }
    }

    marks
}

#[cfg(test)]
mod tests {
    use super::{Slot, StringBuilder, Template};
    use crate::error::ErrorKind;
    use crate::value::SqlValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_finds_positional_and_named() {
        let t = Template::parse("SELECT * FROM t WHERE a = ? AND b = :bee AND c IN ?");
        assert_eq!(t.placeholder_count(), 3);
        assert_eq!(t.named_placeholders(), vec!["bee"]);
    }

    #[test]
    fn parse_skips_quotes_comments_and_casts() {
        let t = Template::parse(
            "/*$ID$key?*/ SELECT '?', \"a?\", `b?`, 'it\\'s ?', x::text -- what?\nFROM t WHERE y = ?",
        );
        assert_eq!(t.placeholder_count(), 1);
        assert_eq!(t.marks[0].at, t.sql().len() - 1);
    }

    #[test]
    fn double_dash_needs_trailing_space_to_comment() {
        assert_eq!(Template::parse("SELECT 1--?").placeholder_count(), 1);
        assert_eq!(Template::parse("SELECT a--:n FROM t").named_placeholders(), vec!["n"]);
        assert_eq!(Template::parse("SELECT 1 -- ?").placeholder_count(), 0);
        assert_eq!(Template::parse("SELECT 1 --\t?\nFROM t").placeholder_count(), 0);
        assert_eq!(Template::parse("SELECT ? --").placeholder_count(), 1);
    }

    #[test]
    fn parse_handles_unterminated_comment() {
        let t = Template::parse("SELECT 1 /* ? ");
        assert_eq!(t.placeholder_count(), 0);
    }

    #[test]
    fn fragment_binds_values_in_order() {
        let mut sb = StringBuilder::new();
        sb.write_str("(");
        sb.write_fragment("a = ? OR b = ?", &[1_i64.into(), "x".into()])
            .unwrap();
        sb.write_str(")");
        let t = sb.into_template();
        assert_eq!(t.sql(), "(a = ? OR b = ?)");
        assert_eq!(t.marks[0].at, 5);
        assert_eq!(t.marks[0].slot, Slot::Value(SqlValue::I64(1)));
        assert_eq!(t.marks[1].slot, Slot::Value(SqlValue::from("x")));
        assert_eq!(t.unbound_count(), 0);
    }

    #[test]
    fn fragment_value_count_mismatch() {
        let mut sb = StringBuilder::new();
        let err = sb
            .write_fragment("a = ?", &[1_i64.into(), 2_i64.into()])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotValid);
    }

    #[test]
    fn write_leading_spaces_after_first() {
        let mut sb = StringBuilder::new();
        sb.write_leading("SELECT");
        sb.write_leading("1");
        sb.write_placeholder(Slot::Named("n".into()), false);
        let t = sb.into_template();
        assert_eq!(t.sql(), "SELECT 1:n");
        assert_eq!(t.named_placeholders(), vec!["n"]);
    }
}
