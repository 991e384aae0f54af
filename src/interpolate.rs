//! SQL 插值与占位符展开。
//!
//! 同一份 `Template` 可以渲染成两种形式：
//! - 参数化：`?` 保留（切片展开为 `(?,?,?)`，命名占位符改写为 `?`），值按顺序返回；
//! - 字面量：每个占位符替换为转义后的字面量。
//!
//! 安全警告：插值永远不如预编译参数安全；仅用于不支持参数化的场景。

use crate::args::{Arguments, Resolver};
use crate::error::{Error, Result};
use crate::statement::{ToSql, emit};
use crate::string_builder::{Slot, Template};
use crate::value::SqlValue;
use time::OffsetDateTime;
use time::macros::format_description;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Placeholders,
    Literal,
}

/// 把 `tpl` 按 `args` 渲染到 `out`。出错时 `out` 保留已写入的部分。
pub(crate) fn render(
    tpl: &Template,
    args: &Arguments,
    mode: Mode,
    out: &mut String,
) -> Result<Vec<SqlValue>> {
    let sql = tpl.sql();
    out.reserve(sql.len() + tpl.marks.len() * 8);

    let mut resolver = Resolver::new(args);
    let mut values = Vec::new();
    let mut last = 0;
    for mark in &tpl.marks {
        out.push_str(&sql[last..mark.at]);
        last = mark.at + mark.len;

        let value = match &mark.slot {
            Slot::Value(v) => v,
            Slot::Positional => resolver.positional()?,
            Slot::Named(name) => resolver.named(name)?,
        };
        match mode {
            Mode::Placeholders => write_placeholders(out, value, mark.in_list, &mut values)?,
            Mode::Literal if mark.in_list && !value.is_slice() => {
                out.push('(');
                write_literal(out, value)?;
                out.push(')');
            }
            Mode::Literal => write_literal(out, value)?,
        }
    }
    out.push_str(&sql[last..]);
    resolver.finish()?;
    Ok(values)
}

fn write_placeholders(
    out: &mut String,
    value: &SqlValue,
    in_list: bool,
    values: &mut Vec<SqlValue>,
) -> Result<()> {
    if value.is_slice() {
        let n = value.placeholder_len();
        if n == 0 {
            return Err(empty_slice(value));
        }
        out.push('(');
        for i in 0..n {
            if i > 0 {
                out.push(',');
            }
            out.push('?');
        }
        out.push(')');
    } else if in_list {
        out.push_str("(?)");
    } else {
        out.push('?');
    }
    value.flatten_into(values);
    Ok(())
}

fn empty_slice(value: &SqlValue) -> Error {
    Error::NotValid(format!("empty {} cannot be expanded", value.kind()))
}

/// 扫描 `sql` 中的占位符并用 `args` 展开，返回 `?` 形式的 SQL 与按顺序排列的值。
pub fn expand_placeholders(sql: &str, args: &Arguments) -> Result<(String, Vec<SqlValue>)> {
    let tpl = Template::parse(sql);
    let mut out = String::new();
    let values = render(&tpl, args, Mode::Placeholders, &mut out)?;
    Ok((out, values))
}

/// 把 `args` 以字面量形式嵌入 `sql`。
pub fn interpolate(sql: &str, args: &Arguments) -> Result<String> {
    let mut out = String::new();
    interpolate_into(&mut out, sql, args)?;
    Ok(out)
}

/// 同 `interpolate`，追加写入调用方的缓冲区；出错时缓冲区保留已写入的部分。
pub fn interpolate_into(out: &mut String, sql: &str, args: &Arguments) -> Result<()> {
    let tpl = Template::parse(sql);
    render(&tpl, args, Mode::Literal, out)
        .map(|_| ())
        .inspect_err(|e| tracing::trace!(kind = ?e.kind(), error = %e, "interpolate failed"))
}

/// 写入单个值的 SQL 字面量。切片写作 `(a,b,c)`。
pub fn write_literal(out: &mut String, value: &SqlValue) -> Result<()> {
    match value {
        SqlValue::Null => out.push_str("NULL"),
        SqlValue::Bool(b) => write_bool(out, *b),
        SqlValue::I64(n) => out.push_str(&n.to_string()),
        SqlValue::U64(n) => out.push_str(&n.to_string()),
        SqlValue::F64(n) => write_float(out, *n)?,
        SqlValue::String(s) => quote_string(out, s),
        SqlValue::RawString(b) => {
            let s = std::str::from_utf8(b)
                .map_err(|e| Error::NotValid(format!("string argument is not valid UTF-8: {e}")))?;
            quote_string(out, s);
        }
        SqlValue::Bytes(b) => write_bytes(out, b),
        SqlValue::Time(t) => write_time(out, t)?,
        SqlValue::Decimal(d) => {
            if d.valid {
                d.check_scale()?;
                d.write_canonical(out);
            } else {
                out.push_str("NULL");
            }
        }
        SqlValue::Bools(v) => write_list(out, value, v, |out, b| {
            write_bool(out, *b);
            Ok(())
        })?,
        SqlValue::I64s(v) => write_list(out, value, v, |out, n| {
            out.push_str(&n.to_string());
            Ok(())
        })?,
        SqlValue::U64s(v) => write_list(out, value, v, |out, n| {
            out.push_str(&n.to_string());
            Ok(())
        })?,
        SqlValue::F64s(v) => write_list(out, value, v, |out, n| write_float(out, *n))?,
        SqlValue::Strings(v) => write_list(out, value, v, |out, s| {
            quote_string(out, s);
            Ok(())
        })?,
        SqlValue::BytesList(v) => write_list(out, value, v, |out, b| {
            write_bytes(out, b);
            Ok(())
        })?,
        SqlValue::Times(v) => write_list(out, value, v, write_time)?,
        SqlValue::Decimals(v) => write_list(out, value, v, |out, d| {
            write_literal(out, &SqlValue::Decimal(*d))
        })?,
    }
    Ok(())
}

fn write_list<T>(
    out: &mut String,
    value: &SqlValue,
    items: &[T],
    mut f: impl FnMut(&mut String, &T) -> Result<()>,
) -> Result<()> {
    if items.is_empty() {
        return Err(empty_slice(value));
    }
    out.push('(');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        f(out, item)?;
    }
    out.push(')');
    Ok(())
}

fn write_bool(out: &mut String, b: bool) {
    out.push(if b { '1' } else { '0' });
}

fn write_float(out: &mut String, n: f64) -> Result<()> {
    if !n.is_finite() {
        return Err(Error::NotValid(format!(
            "float {n} has no SQL literal form"
        )));
    }
    out.push_str(&n.to_string());
    Ok(())
}

fn write_bytes(out: &mut String, data: &[u8]) {
    if data.is_empty() {
        out.push_str("''");
        return;
    }
    out.push_str("0x");
    push_hex(out, data);
}

fn write_time(out: &mut String, t: &OffsetDateTime) -> Result<()> {
    let s = t
        .format(format_description!(
            "'[year]-[month]-[day] [hour]:[minute]:[second]'"
        ))
        .map_err(|e| Error::Fatal(format!("format time {t}: {e}")))?;
    out.push_str(&s);
    Ok(())
}

fn push_hex(out: &mut String, data: &[u8]) {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    for &b in data {
        out.push(HEX[((b >> 4) & 0xF) as usize] as char);
        out.push(HEX[(b & 0xF) as usize] as char);
    }
}

fn quote_string(out: &mut String, s: &str) {
    out.push('\'');
    for ch in s.chars() {
        match ch {
            '\u{0000}' => out.push_str("\\0"),
            '\u{0008}' => out.push_str("\\b"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{001a}' => out.push_str("\\Z"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
}

/// 自由文本 SQL + 参数；`to_sql` 返回插值后的字面量 SQL，参数列表为空。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interpolation {
    template: Template,
    args: Arguments,
}

impl Interpolation {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            template: Template::parse(sql),
            args: Arguments::new(),
        }
    }

    pub fn with_args(sql: impl Into<String>, args: Arguments) -> Self {
        Self {
            template: Template::parse(sql),
            args,
        }
    }

    pub fn sql(&self) -> &str {
        self.template.sql()
    }

    pub fn args(&self) -> &Arguments {
        &self.args
    }

    pub fn args_mut(&mut self) -> &mut Arguments {
        &mut self.args
    }
}

impl ToSql for Interpolation {
    fn to_sql(&self) -> Result<(String, Vec<SqlValue>)> {
        emit(&self.template, &self.args, Mode::Literal, "")
    }
}
