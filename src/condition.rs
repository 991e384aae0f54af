//! Condition：WHERE / HAVING / ON 中的条件节点。
//!
//! 节点是不可变值，每个方法消费 `self` 并返回新节点；同一个节点多次设置操作符时以最后一次为准。
//!
//! ```ignore
//! let c = column("age").greater().int64(18);
//! let grouped = [paren_open(), column("a").int64(1), column("b").int64(2).or(), paren_close()];
//! ```

use crate::decimal::Decimal;
use crate::error::{Error, Result};
use crate::select::Select;
use crate::string_builder::{Slot, StringBuilder};
use crate::value::SqlValue;
use time::OffsetDateTime;

/// 比较操作符。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    /// `<=>`：NULL 安全的等于。
    Spaceship,
    Like,
    NotLike,
    In,
    NotIn,
    Between,
    NotBetween,
    IsNull,
    IsNotNull,
    Regexp,
    NotRegexp,
    Exists,
    NotExists,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::Spaceship => "<=>",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
            Self::Between => "BETWEEN",
            Self::NotBetween => "NOT BETWEEN",
            Self::IsNull => "IS NULL",
            Self::IsNotNull => "IS NOT NULL",
            Self::Regexp => "REGEXP",
            Self::NotRegexp => "NOT REGEXP",
            Self::Exists => "EXISTS",
            Self::NotExists => "NOT EXISTS",
        }
    }
}

/// 与前一个节点的连接方式。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Conjunction {
    #[default]
    And,
    Or,
}

impl Conjunction {
    fn as_str(self) -> &'static str {
        match self {
            Self::And => " AND ",
            Self::Or => " OR ",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Left {
    Column(String),
    Expr(String, Vec<SqlValue>),
    ParenOpen,
    ParenClose,
}

#[derive(Debug, Clone, Default, PartialEq)]
enum Operand {
    #[default]
    None,
    Values(Vec<SqlValue>),
    Placeholders(usize),
    Named(String),
    Sub(Box<Select>),
    Column(String),
    Expr(String, Vec<SqlValue>),
}

impl Operand {
    fn count(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Values(v) => v.len(),
            Self::Placeholders(n) => *n,
            _ => 1,
        }
    }
}

/// 条件节点。
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    left: Left,
    op: Option<Operator>,
    operand: Operand,
    conj: Conjunction,
}

/// 以列（或限定名 `t.col`）为左值的节点。
pub fn column(name: impl Into<String>) -> Condition {
    Condition::with_left(Left::Column(name.into()))
}

/// 以原样 SQL 表达式为左值的节点；其中的 `?` / `:name` 作为占位符。
pub fn expr(sql: impl Into<String>) -> Condition {
    Condition::with_left(Left::Expr(sql.into(), Vec::new()))
}

/// 带值的表达式：`sql` 中的 `?` 依次绑定 `values`。
pub fn expr_with<I, V>(sql: impl Into<String>, values: I) -> Condition
where
    I: IntoIterator<Item = V>,
    V: Into<SqlValue>,
{
    Condition::with_left(Left::Expr(
        sql.into(),
        values.into_iter().map(Into::into).collect(),
    ))
}

/// 左括号伪节点；`.or()` 时用 OR 连接前一个节点。
pub fn paren_open() -> Condition {
    Condition::with_left(Left::ParenOpen)
}

pub fn paren_close() -> Condition {
    Condition::with_left(Left::ParenClose)
}

/// `EXISTS (<sub>)`
pub fn exists(sub: Select) -> Condition {
    expr("").exists().sub(sub)
}

/// `NOT EXISTS (<sub>)`
pub fn not_exists(sub: Select) -> Condition {
    expr("").not_exists().sub(sub)
}

macro_rules! operators {
    ($($(#[$doc:meta])* $name:ident => $op:ident),+ $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $name(self) -> Self {
                self.op(Operator::$op)
            }
        )+
    };
}

macro_rules! typed_values {
    ($($name:ident($t:ty)),+ $(,)?) => {
        $(
            pub fn $name(self, v: $t) -> Self {
                self.value(v)
            }
        )+
    };
}

impl Condition {
    fn with_left(left: Left) -> Self {
        Self {
            left,
            op: None,
            operand: Operand::None,
            conj: Conjunction::And,
        }
    }

    /// 设置操作符，覆盖之前设置的操作符。
    pub fn op(mut self, op: Operator) -> Self {
        self.op = Some(op);
        self
    }

    operators!(
        equal => Equal,
        not_equal => NotEqual,
        less => Less,
        less_or_equal => LessOrEqual,
        greater => Greater,
        greater_or_equal => GreaterOrEqual,
        spaceship => Spaceship,
        like => Like,
        not_like => NotLike,
        in_ => In,
        not_in => NotIn,
        between => Between,
        not_between => NotBetween,
        /// `IS NULL`
        null => IsNull,
        /// `IS NOT NULL`
        not_null => IsNotNull,
        regexp => Regexp,
        not_regexp => NotRegexp,
        exists => Exists,
        not_exists => NotExists,
    );

    /// 用 OR 连接前一个节点。
    pub fn or(mut self) -> Self {
        self.conj = Conjunction::Or;
        self
    }

    pub fn and(mut self) -> Self {
        self.conj = Conjunction::And;
        self
    }

    /// 追加一个字面量操作数（构造时给定，不占用 `Arguments`）。
    pub fn value(mut self, v: impl Into<SqlValue>) -> Self {
        match &mut self.operand {
            Operand::Values(values) => values.push(v.into()),
            _ => self.operand = Operand::Values(vec![v.into()]),
        }
        self
    }

    pub fn values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        self.operand = Operand::Values(values.into_iter().map(Into::into).collect());
        self
    }

    typed_values!(
        bool(bool),
        int64(i64),
        uint64(u64),
        float64(f64),
        string(String),
        str(&'static str),
        bytes(Vec<u8>),
        time(OffsetDateTime),
        decimal(Decimal),
        int64s(Vec<i64>),
        uint64s(Vec<u64>),
        strings(Vec<String>),
    );

    /// 追加一个 `?`，值在绑定时按位置提供。
    pub fn placeholder(mut self) -> Self {
        self.operand = match self.operand {
            Operand::Placeholders(n) => Operand::Placeholders(n + 1),
            _ => Operand::Placeholders(1),
        };
        self
    }

    pub fn placeholders(mut self, n: usize) -> Self {
        self.operand = Operand::Placeholders(n);
        self
    }

    /// `:name`：绑定时按名字查找参数。
    pub fn named_arg(mut self, name: impl Into<String>) -> Self {
        self.operand = Operand::Named(name.into());
        self
    }

    /// 子查询操作数，其占位符按出现位置嵌入外层语句。
    pub fn sub(mut self, sub: Select) -> Self {
        self.operand = Operand::Sub(Box::new(sub));
        self
    }

    /// 以另一列为操作数，例如 JOIN 的 `a.id = b.a_id`。
    pub fn column(mut self, name: impl Into<String>) -> Self {
        self.operand = Operand::Column(name.into());
        self
    }

    pub fn expr(mut self, sql: impl Into<String>) -> Self {
        self.operand = Operand::Expr(sql.into(), Vec::new());
        self
    }

    pub fn expr_with<I, V>(mut self, sql: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        self.operand = Operand::Expr(sql.into(), values.into_iter().map(Into::into).collect());
        self
    }

    pub fn operator(&self) -> Option<Operator> {
        self.op
    }

    pub fn conjunction(&self) -> Conjunction {
        self.conj
    }

    /// 左值列名（仅列节点）。
    pub fn column_name(&self) -> Option<&str> {
        match &self.left {
            Left::Column(name) => Some(name),
            _ => None,
        }
    }

    /// 实际生效的操作符：未设置但有操作数时为 `=`；`= NULL` / `!= NULL` 改写为 `IS [NOT] NULL`。
    fn effective_op(&self) -> Option<Operator> {
        let op = match (self.op, &self.operand) {
            (None, Operand::None) => return None,
            (None, _) => Operator::Equal,
            (Some(op), _) => op,
        };
        let null_literal = self.is_null_literal();
        Some(match op {
            Operator::Equal if null_literal => Operator::IsNull,
            Operator::NotEqual if null_literal => Operator::IsNotNull,
            op => op,
        })
    }

    fn check_arity(&self, op: Operator) -> Result<()> {
        let n = self.operand.count();
        let ok = match op {
            Operator::Between | Operator::NotBetween => n == 2,
            Operator::IsNull | Operator::IsNotNull => n == 0 || self.is_null_literal(),
            Operator::In | Operator::NotIn => n >= 1,
            Operator::Exists | Operator::NotExists => {
                matches!(self.operand, Operand::Sub(_) | Operand::Expr(..))
            }
            _ => n == 1,
        };
        if !ok {
            return Err(Error::NotValid(format!(
                "operator {} does not accept {n} operand(s) on {}",
                op.as_str(),
                self.left_text()
            )));
        }
        if !matches!(op, Operator::In | Operator::NotIn)
            && let Operand::Values(values) = &self.operand
            && let Some(v) = values.iter().find(|v| v.is_slice())
        {
            return Err(Error::NotValid(format!(
                "{} value is only accepted by IN on {}",
                v.kind(),
                self.left_text()
            )));
        }
        Ok(())
    }

    fn left_text(&self) -> &str {
        match &self.left {
            Left::Column(s) | Left::Expr(s, _) => s,
            Left::ParenOpen => "(",
            Left::ParenClose => ")",
        }
    }

    /// 写入节点本身（不含外层括号与连接词）。
    pub(crate) fn write_to(&self, w: &mut StringBuilder) -> Result<()> {
        let lhs_empty = match &self.left {
            Left::Column(name) => {
                w.write_raw(name);
                name.is_empty()
            }
            Left::Expr(sql, values) => {
                w.write_fragment(sql, values)?;
                sql.is_empty()
            }
            Left::ParenOpen | Left::ParenClose => {
                return Err(Error::NotValid(
                    "parenthesis node cannot be rendered alone".to_string(),
                ));
            }
        };

        let Some(op) = self.effective_op() else {
            return Ok(());
        };
        self.check_arity(op)?;

        if !lhs_empty {
            w.write_char(' ');
        }
        w.write_str(op.as_str());

        match op {
            Operator::IsNull | Operator::IsNotNull => Ok(()),
            Operator::Between | Operator::NotBetween => {
                w.write_char(' ');
                self.write_operand_item(w, 0)?;
                w.write_str(" AND ");
                self.write_operand_item(w, 1)
            }
            Operator::In | Operator::NotIn => {
                w.write_char(' ');
                self.write_in_list(w)
            }
            _ => {
                w.write_char(' ');
                self.write_operand_item(w, 0)
            }
        }
    }

    fn write_operand_item(&self, w: &mut StringBuilder, idx: usize) -> Result<()> {
        match &self.operand {
            Operand::Values(values) => {
                if let Some(v) = values.get(idx) {
                    w.write_placeholder(Slot::Value(v.clone()), false);
                }
            }
            Operand::Placeholders(_) => w.write_placeholder(Slot::Positional, false),
            Operand::Named(name) => w.write_placeholder(Slot::Named(name.clone()), false),
            Operand::Sub(sel) => write_sub(w, sel)?,
            Operand::Column(name) => w.write_raw(name),
            Operand::Expr(sql, values) => w.write_fragment(sql, values)?,
            Operand::None => {}
        }
        Ok(())
    }

    fn write_in_list(&self, w: &mut StringBuilder) -> Result<()> {
        match &self.operand {
            Operand::Values(values) if values.len() == 1 => {
                w.write_placeholder(Slot::Value(values[0].clone()), true);
            }
            Operand::Values(values) => {
                if let Some(v) = values.iter().find(|v| v.is_slice()) {
                    return Err(Error::NotValid(format!(
                        "{} value must be the only IN operand on {}",
                        v.kind(),
                        self.left_text()
                    )));
                }
                w.write_char('(');
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        w.write_char(',');
                    }
                    w.write_placeholder(Slot::Value(v.clone()), false);
                }
                w.write_char(')');
            }
            Operand::Placeholders(1) => w.write_placeholder(Slot::Positional, true),
            Operand::Placeholders(n) => {
                w.write_char('(');
                for i in 0..*n {
                    if i > 0 {
                        w.write_char(',');
                    }
                    w.write_placeholder(Slot::Positional, false);
                }
                w.write_char(')');
            }
            Operand::Named(name) => w.write_placeholder(Slot::Named(name.clone()), true),
            Operand::Sub(sel) => write_sub(w, sel)?,
            Operand::Column(name) => {
                w.write_char('(');
                w.write_raw(name);
                w.write_char(')');
            }
            Operand::Expr(sql, values) => {
                w.write_char('(');
                w.write_fragment(sql, values)?;
                w.write_char(')');
            }
            Operand::None => {}
        }
        Ok(())
    }

    /// SET 子句中的赋值 `col=value`；没有操作数时写 `?`。
    pub(crate) fn write_assignment(&self, w: &mut StringBuilder) -> Result<()> {
        let Left::Column(name) = &self.left else {
            return Err(Error::NotValid(format!(
                "assignment target must be a column, got {}",
                self.left_text()
            )));
        };
        if !matches!(self.op, None | Some(Operator::Equal)) || self.operand.count() > 1 {
            return Err(Error::NotValid(format!(
                "assignment to {name} takes a single value"
            )));
        }
        if let Operand::Values(values) = &self.operand
            && values.iter().any(SqlValue::is_slice)
        {
            return Err(Error::NotValid(format!(
                "assignment to {name} cannot take a slice"
            )));
        }
        w.write_raw(name);
        w.write_char('=');
        match self.operand {
            Operand::None => w.write_placeholder(Slot::Positional, false),
            _ => self.write_operand_item(w, 0)?,
        }
        Ok(())
    }

    /// 位置占位符对应的列名（按出现顺序），用于按列绑定记录。
    pub(crate) fn bind_columns(&self, out: &mut Vec<String>) {
        match (&self.left, &self.operand) {
            (Left::Column(name), Operand::Placeholders(n)) => {
                out.extend(std::iter::repeat_n(name.clone(), *n));
            }
            (_, Operand::Sub(sel)) => sel.bind_columns_into(out),
            _ => {}
        }
    }

    /// SET 子句中位置占位符对应的列名；裸列写作 `col=?`。
    pub(crate) fn assignment_bind_columns(&self, out: &mut Vec<String>) {
        match (&self.left, &self.operand) {
            (Left::Column(name), Operand::None) => out.push(name.clone()),
            _ => self.bind_columns(out),
        }
    }

    fn is_null_literal(&self) -> bool {
        matches!(&self.operand, Operand::Values(v) if v.len() == 1 && v[0].is_null())
    }
}

fn write_sub(w: &mut StringBuilder, sel: &Select) -> Result<()> {
    w.write_parenthesized(|inner| sel.write_to(inner))
}

/// 写入条件列表：每个条件包一层括号，按各自的连接词拼接；括号伪节点用于分组。
pub(crate) fn write_conditions(w: &mut StringBuilder, conds: &[Condition]) -> Result<()> {
    let mut depth = 0_usize;
    let mut need_conj = false;
    for c in conds {
        match c.left {
            Left::ParenOpen => {
                if need_conj {
                    w.write_str(c.conj.as_str());
                }
                w.write_char('(');
                depth += 1;
                need_conj = false;
            }
            Left::ParenClose => {
                if depth == 0 {
                    return Err(Error::NotValid(
                        "unbalanced parenthesis: close without open".to_string(),
                    ));
                }
                if !need_conj {
                    return Err(Error::NotValid("empty parenthesis group".to_string()));
                }
                w.write_char(')');
                depth -= 1;
            }
            _ => {
                if need_conj {
                    w.write_str(c.conj.as_str());
                }
                w.write_char('(');
                c.write_to(w)?;
                w.write_char(')');
                need_conj = true;
            }
        }
    }
    if depth != 0 {
        return Err(Error::NotValid(format!(
            "unbalanced parenthesis: {depth} group(s) left open"
        )));
    }
    Ok(())
}

/// 条件列表中位置占位符对应的列名。
pub(crate) fn collect_bind_columns(conds: &[Condition], out: &mut Vec<String>) {
    for c in conds {
        c.bind_columns(out);
    }
}
