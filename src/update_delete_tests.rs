#[cfg(test)]
mod tests {
    use crate::condition::{column, expr, paren_close, paren_open};
    use crate::delete::delete;
    use crate::error::ErrorKind;
    use crate::select::select;
    use crate::statement::ToSql;
    use crate::update::update;
    use crate::value::SqlValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn update_with_all_clauses() {
        let (sql, values) = update("user")
            .assign("name", "x")
            .incr("visits")
            .where_(column("id").int64(1))
            .order_by("id")
            .limit(1)
            .to_sql()
            .unwrap();
        assert_eq!(
            sql,
            "UPDATE user SET name=?, visits=visits + 1 WHERE (id = ?) ORDER BY id LIMIT 1"
        );
        assert_eq!(values, vec![SqlValue::from("x"), SqlValue::I64(1)]);
    }

    #[test]
    fn update_expression_assignments() {
        let (sql, values) = update("player")
            .set(column("score").expr_with("score + ?", [5_i64]))
            .decr("lives")
            .set(column("note").value(()))
            .where_(column("id").int64(3))
            .to_sql()
            .unwrap();
        assert_eq!(
            sql,
            "UPDATE player SET score=score + ?, lives=lives - 1, note=? WHERE (id = ?)"
        );
        assert_eq!(
            values,
            vec![SqlValue::I64(5), SqlValue::Null, SqlValue::I64(3)]
        );
    }

    #[test]
    fn update_columns_as_placeholders() {
        let upd = update("user")
            .add_columns(["name", "age"])
            .where_(column("id").placeholder());
        assert_eq!(upd.num_assignment(), 2);
        assert_eq!(upd.bind_columns(), vec!["name", "age", "id"]);
        assert_eq!(
            upd.to_template().unwrap().sql(),
            "UPDATE user SET name=?, age=? WHERE (id = ?)"
        );
    }

    #[test]
    fn update_errors() {
        assert_eq!(
            update("").assign("a", 1_i64).to_sql().unwrap_err().kind(),
            ErrorKind::Empty
        );
        assert_eq!(
            update("t").to_sql().unwrap_err().kind(),
            ErrorKind::NotAcceptable
        );
        assert_eq!(
            update("t").set(expr("a = 1")).to_sql().unwrap_err().kind(),
            ErrorKind::NotValid
        );
        assert_eq!(
            update("t")
                .set(column("a").greater().int64(1))
                .to_sql()
                .unwrap_err()
                .kind(),
            ErrorKind::NotValid
        );
        assert_eq!(
            update("t")
                .assign("a", vec![1_i64, 2])
                .to_sql()
                .unwrap_err()
                .kind(),
            ErrorKind::NotValid
        );
    }

    #[test]
    fn update_where_with_sub_select() {
        let vip = select("user_id").from("vip").where_(column("level").greater().int64(3));
        let (sql, values) = update("user")
            .assign("discount", 10_i64)
            .where_(column("id").in_().sub(vip))
            .to_sql()
            .unwrap();
        assert_eq!(
            sql,
            "UPDATE user SET discount=? WHERE (id IN (SELECT user_id FROM vip WHERE (level > ?)))"
        );
        assert_eq!(values, vec![SqlValue::I64(10), SqlValue::I64(3)]);
    }

    #[test]
    fn delete_with_all_clauses() {
        let (sql, values) = delete("user")
            .where_all([
                column("id").in_().values([1_i64, 2]),
                paren_open().or(),
                column("state").int64(0),
                column("deleted").bool(true).or(),
                paren_close(),
            ])
            .order_by_desc("id")
            .limit(10)
            .to_sql()
            .unwrap();
        assert_eq!(
            sql,
            "DELETE FROM user WHERE (id IN (?,?)) OR ((state = ?) OR (deleted = ?)) ORDER BY id DESC LIMIT 10"
        );
        assert_eq!(
            values,
            vec![
                SqlValue::I64(1),
                SqlValue::I64(2),
                SqlValue::I64(0),
                SqlValue::Bool(true),
            ]
        );
    }

    #[test]
    fn delete_without_where() {
        assert_eq!(delete("t").to_sql().unwrap().0, "DELETE FROM t");
        assert_eq!(delete("").to_sql().unwrap_err().kind(), ErrorKind::Empty);
    }

    #[test]
    fn delete_bind_columns() {
        let del = delete("t").where_all([column("a").placeholder(), column("b").int64(1)]);
        assert_eq!(del.bind_columns(), vec!["a"]);
    }
}
