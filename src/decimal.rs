//! Decimal：以 `u64` 幅值 + 小数位数表示的定点数，提供无损的文本与二进制编解码。
//!
//! 数值为 `(-1)^negative × precision × 10^-scale`。超出 `u64` 幅值的数无法表示，
//! 解析时返回 `NotValid`，而不是静默截断。

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// 二进制编码长度：8 字节幅值 + 4 字节 scale + 1 字节 flags + 1 字节长度标记。
pub const BINARY_LEN: usize = 14;

/// 解析与解码接受的最大 scale。
pub const MAX_SCALE: i32 = 1024;

const FLAG_VALID: u8 = 0x01;
const FLAG_NEGATIVE: u8 = 0x02;
const FLAG_QUOTE: u8 = 0x04;

/// 定点数。`Default` 为无效（NULL）的零值。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Decimal {
    pub precision: u64,
    pub scale: i32,
    pub negative: bool,
    /// false 表示 SQL NULL。
    pub valid: bool,
    /// 文本编码时是否加双引号。
    pub quote: bool,
}

impl Decimal {
    pub const fn new(precision: u64, scale: i32) -> Self {
        Self {
            precision,
            scale,
            negative: false,
            valid: true,
            quote: false,
        }
    }

    /// 无效（NULL）的 Decimal。
    pub const fn null() -> Self {
        Self {
            precision: 0,
            scale: 0,
            negative: false,
            valid: false,
            quote: false,
        }
    }

    pub const fn from_i64(v: i64, scale: i32) -> Self {
        Self {
            precision: v.unsigned_abs(),
            scale,
            negative: v < 0,
            valid: true,
            quote: false,
        }
    }

    /// 由 `f64` 构造，使用最短可往返的十进制表示。
    ///
    /// - NaN 与 +Inf 映射为零，-Inf 映射为负零；
    /// - 幅值超出 `u64` 的数返回 `NotValid`。
    pub fn from_f64(v: f64) -> Result<Self> {
        if v.is_nan() {
            return Ok(Self::new(0, 0));
        }
        if v.is_infinite() {
            return Ok(Self::new(0, 0).with_negative(v.is_sign_negative()));
        }
        // f64 的 Display 输出最短可往返表示，且从不使用指数形式。
        v.to_string().parse()
    }

    pub const fn with_negative(mut self, negative: bool) -> Self {
        self.negative = negative;
        self
    }

    pub const fn with_quote(mut self, quote: bool) -> Self {
        self.quote = quote;
        self
    }

    pub const fn is_zero(&self) -> bool {
        self.precision == 0
    }

    /// 返回 `(value, scale)`；幅值超出 `i64` 或为 NULL 时返回 `(0, 0)`。
    pub fn to_i64(&self) -> (i64, i32) {
        if !self.valid {
            return (0, 0);
        }
        let v = if self.negative {
            0_i64.checked_sub_unsigned(self.precision)
        } else {
            i64::try_from(self.precision).ok()
        };
        match v {
            Some(v) => (v, self.scale),
            None => (0, 0),
        }
    }

    /// 有损转换：超过约 15-17 位有效数字的部分会丢失精度。NULL 返回 0。
    pub fn to_f64(&self) -> f64 {
        if !self.valid {
            return 0.0;
        }
        self.to_text().parse::<f64>().unwrap_or(0.0)
    }

    /// 规范文本形式 `[-]digits[.digits]`；NULL 返回 `NULL`。
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// scale 是否在 `0..=MAX_SCALE` 内；超出范围的值不能编码，也不能写成 SQL 字面量。
    pub const fn has_valid_scale(&self) -> bool {
        self.scale >= 0 && self.scale <= MAX_SCALE
    }

    pub(crate) fn check_scale(&self) -> Result<()> {
        if !self.has_valid_scale() {
            return Err(Error::NotValid(format!(
                "decimal: scale {} out of range 0..={MAX_SCALE}",
                self.scale
            )));
        }
        Ok(())
    }

    /// 规范形式；scale 超出范围时写作 `digits e -scale`，不展开补零。
    pub(crate) fn write_canonical(&self, out: &mut String) {
        if self.negative {
            out.push('-');
        }
        let digits = self.precision.to_string();
        if !self.has_valid_scale() {
            out.push_str(&digits);
            out.push('e');
            out.push_str(&(-i64::from(self.scale)).to_string());
            return;
        }

        let scale = self.scale as usize;
        if digits.len() > scale {
            let (int_part, frac_part) = digits.split_at(digits.len() - scale);
            out.push_str(int_part);
            if !frac_part.is_empty() {
                out.push('.');
                out.push_str(frac_part);
            }
        } else {
            out.push_str("0.");
            for _ in 0..scale - digits.len() {
                out.push('0');
            }
            out.push_str(&digits);
        }
    }

    /// 14 字节二进制编码；NULL 编码为空，scale 超出 `0..=MAX_SCALE` 返回 `NotValid`。
    pub fn marshal_binary(&self) -> Result<Vec<u8>> {
        if !self.valid {
            return Ok(Vec::new());
        }
        self.check_scale()?;
        let mut flags = FLAG_VALID;
        if self.negative {
            flags |= FLAG_NEGATIVE;
        }
        if self.quote {
            flags |= FLAG_QUOTE;
        }

        let mut out = Vec::with_capacity(BINARY_LEN);
        out.extend_from_slice(&self.precision.to_be_bytes());
        out.extend_from_slice(&self.scale.to_be_bytes());
        out.push(flags);
        out.push(BINARY_LEN as u8);
        Ok(out)
    }

    pub fn unmarshal_binary(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Ok(Self::null());
        }
        if data.len() != BINARY_LEN || data[BINARY_LEN - 1] != BINARY_LEN as u8 {
            return Err(Error::NotValid(format!(
                "decimal: binary data must be {BINARY_LEN} bytes with a length marker, got {} bytes",
                data.len()
            )));
        }

        let flags = data[12];
        if flags & FLAG_VALID == 0 || flags & !(FLAG_VALID | FLAG_NEGATIVE | FLAG_QUOTE) != 0 {
            return Err(Error::NotValid(format!(
                "decimal: invalid binary flags {flags:#04x}"
            )));
        }

        let mut precision = [0_u8; 8];
        precision.copy_from_slice(&data[..8]);
        let mut scale = [0_u8; 4];
        scale.copy_from_slice(&data[8..12]);
        let scale = i32::from_be_bytes(scale);
        if !(0..=MAX_SCALE).contains(&scale) {
            return Err(Error::NotValid(format!(
                "decimal: binary scale {scale} out of range"
            )));
        }

        Ok(Self {
            precision: u64::from_be_bytes(precision),
            scale,
            negative: flags & FLAG_NEGATIVE != 0,
            valid: true,
            quote: flags & FLAG_QUOTE != 0,
        })
    }

    /// 文本编码：规范形式，`quote` 时加双引号；NULL 编码为空，scale 超出范围返回 `NotValid`。
    pub fn marshal_text(&self) -> Result<Vec<u8>> {
        if !self.valid {
            return Ok(Vec::new());
        }
        self.check_scale()?;
        let mut s = String::with_capacity(24);
        if self.quote {
            s.push('"');
        }
        self.write_canonical(&mut s);
        if self.quote {
            s.push('"');
        }
        Ok(s.into_bytes())
    }

    /// 空、`null`、`NULL` 解码为 NULL；带双引号的文本会设置 `quote`。
    pub fn unmarshal_text(data: &[u8]) -> Result<Self> {
        let s = std::str::from_utf8(data)
            .map_err(|e| Error::NotValid(format!("decimal: text is not valid UTF-8: {e}")))?;
        if s.is_empty() || s == "null" || s == "NULL" {
            return Ok(Self::null());
        }
        if let Some(inner) = s.strip_prefix('"').and_then(|r| r.strip_suffix('"')) {
            return Ok(inner.parse::<Self>()?.with_quote(true));
        }
        s.parse()
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.valid {
            return f.write_str("NULL");
        }
        let mut s = String::with_capacity(24);
        self.write_canonical(&mut s);
        f.write_str(&s)
    }
}

impl FromStr for Decimal {
    type Err = Error;

    /// 接受 `[+-]digits[.digits][e[+-]n]`；结果总是 `scale >= 0`。
    fn from_str(s: &str) -> Result<Self> {
        let invalid = |why: &str| Error::NotValid(format!("decimal: cannot parse {s:?}: {why}"));

        let bytes = s.as_bytes();
        let mut i = 0;
        let mut negative = false;
        match bytes.first() {
            Some(b'-') => {
                negative = true;
                i = 1;
            }
            Some(b'+') => i = 1,
            _ => {}
        }

        let mut precision: u64 = 0;
        let mut digits = 0_usize;
        let mut frac_digits: i64 = 0;
        let mut seen_point = false;
        while i < bytes.len() {
            match bytes[i] {
                b @ b'0'..=b'9' => {
                    precision = precision
                        .checked_mul(10)
                        .and_then(|p| p.checked_add(u64::from(b - b'0')))
                        .ok_or_else(|| invalid("magnitude exceeds 64 bits"))?;
                    digits += 1;
                    if seen_point {
                        frac_digits += 1;
                    }
                }
                b'.' if !seen_point => seen_point = true,
                b'e' | b'E' => break,
                _ => return Err(invalid("unexpected character")),
            }
            i += 1;
        }
        if digits == 0 {
            return Err(invalid("no digits"));
        }

        let mut exp: i64 = 0;
        if i < bytes.len() {
            exp = s[i + 1..]
                .parse::<i64>()
                .map_err(|_| invalid("bad exponent"))?;
        }

        let mut scale = frac_digits
            .checked_sub(exp)
            .ok_or_else(|| invalid("exponent out of range"))?;
        if scale < 0 {
            if precision != 0 {
                let pow = u32::try_from(-scale)
                    .ok()
                    .and_then(|e| 10_u64.checked_pow(e))
                    .ok_or_else(|| invalid("magnitude exceeds 64 bits"))?;
                precision = precision
                    .checked_mul(pow)
                    .ok_or_else(|| invalid("magnitude exceeds 64 bits"))?;
            }
            scale = 0;
        }
        if scale > i64::from(MAX_SCALE) {
            return Err(invalid("scale out of range"));
        }

        Ok(Self {
            precision,
            scale: scale as i32,
            negative,
            valid: true,
            quote: false,
        })
    }
}
