//! Union：把多个 SELECT 用 `UNION [ALL]` 拼接。

use crate::error::{Error, Result};
use crate::macros::{IntoStrings, collect_into_strings};
use crate::select::{OrderBy, PRESERVE_RESULT_SET, Select, write_limit, write_order_by};
use crate::string_builder::{StringBuilder, Template};

/// UNION 语句。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Union {
    all: bool,
    members: Vec<Select>,
    preserve: bool,
    order_by: Vec<OrderBy>,
    limit: Option<u64>,
}

/// `(SELECT ...) UNION (SELECT ...)`
pub fn union(members: impl IntoIterator<Item = Select>) -> Union {
    Union::new().add_members(members)
}

/// `(SELECT ...) UNION ALL (SELECT ...)`
pub fn union_all(members: impl IntoIterator<Item = Select>) -> Union {
    Union::new().all().add_members(members)
}

impl Union {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(mut self) -> Self {
        self.all = true;
        self
    }

    pub fn add(mut self, member: Select) -> Self {
        self.members.push(member);
        self
    }

    pub fn add_members(mut self, members: impl IntoIterator<Item = Select>) -> Self {
        self.members.extend(members);
        self
    }

    /// 为第 i 个成员追加 `i AS _preserve_result_set` 列，并以它作为 ORDER BY 的第一项，
    /// 使结果按成员顺序排列。
    pub fn preserve_result_set(mut self) -> Self {
        self.preserve = true;
        self
    }

    pub fn order_by<T>(mut self, cols: T) -> Self
    where
        T: IntoStrings,
    {
        self.order_by
            .extend(collect_into_strings(cols).into_iter().map(OrderBy::asc));
        self
    }

    pub fn order_by_desc(mut self, col: impl Into<String>) -> Self {
        self.order_by.push(OrderBy::desc(col.into()));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn to_template(&self) -> Result<Template> {
        let mut w = StringBuilder::new();
        self.write_to(&mut w)?;
        Ok(w.into_template())
    }

    pub fn bind_columns(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.bind_columns_into(&mut out);
        out
    }

    pub(crate) fn bind_columns_into(&self, out: &mut Vec<String>) {
        for m in &self.members {
            m.bind_columns_into(out);
        }
    }

    pub(crate) fn write_to(&self, w: &mut StringBuilder) -> Result<()> {
        if self.members.is_empty() {
            return Err(Error::Empty("union has no member select".to_string()));
        }

        let sep = if self.all { " UNION ALL " } else { " UNION " };
        let mut body = StringBuilder::new();
        for (i, m) in self.members.iter().enumerate() {
            if i > 0 {
                body.write_str(sep);
            }
            let preserve = self.preserve.then_some(i);
            body.write_parenthesized(|inner| m.write_select(inner, preserve))?;
        }
        w.write_leading("");
        w.append(body);

        if self.preserve {
            let mut items = vec![OrderBy::asc(PRESERVE_RESULT_SET.to_string())];
            items.extend(self.order_by.iter().cloned());
            write_order_by(w, &items);
        } else {
            write_order_by(w, &self.order_by);
        }
        write_limit(w, self.limit);
        Ok(())
    }
}
