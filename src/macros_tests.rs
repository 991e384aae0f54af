#[cfg(test)]
mod tests {
    use crate::condition::column;
    use crate::cte::{cte, with};
    use crate::insert::insert;
    use crate::macros::collect_into_strings;
    use crate::select::{Select, select};
    use crate::statement::ToSql;
    use crate::update::update;
    use pretty_assertions::assert_eq;

    #[test]
    fn select_macro_variadic_builds_sql() {
        let sel = crate::select_cols!(Select::new(), "id", "name").from("users");
        let sel = crate::where_conds!(sel, column("a").int64(1), column("b").int64(2));
        let sel = crate::group_by_cols!(sel, "name", vec!["id"]);
        let sel = crate::order_by_cols!(sel, "name");

        let (sql, args) = sel.to_sql().unwrap();
        assert_eq!(
            sql,
            "SELECT id, name FROM users WHERE (a = ?) AND (b = ?) GROUP BY name, id ORDER BY name"
        );
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn insert_and_update_macros() {
        let ins = crate::on_duplicate_cols!(crate::insert_cols!(insert("t"), "id", "name"), "name");
        assert_eq!(
            ins.to_template().unwrap().sql(),
            "INSERT INTO t (id,name) VALUES (?,?) ON DUPLICATE KEY UPDATE name=VALUES(name)"
        );

        let upd = crate::update_cols!(update("t"), ["a", "b"]);
        assert_eq!(upd.to_template().unwrap().sql(), "UPDATE t SET a=?, b=?");
    }

    #[test]
    fn cte_macro() {
        let c = crate::cte_cols!(cte("x", select("id").from("t")), "a");
        let w = with([c]).select(select("*").from("x"));
        assert_eq!(
            w.to_sql().unwrap().0,
            "WITH x (a) AS (SELECT id FROM t) SELECT * FROM x"
        );
    }

    #[test]
    fn into_strings_accepts_mixed_shapes() {
        let owned = vec!["c".to_string()];
        let slice: &[&str] = &["d", "e"];
        let mut all = collect_into_strings("a");
        all.extend(collect_into_strings(String::from("b")));
        all.extend(collect_into_strings(&owned));
        all.extend(collect_into_strings(slice));
        assert_eq!(all, vec!["a", "b", "c", "d", "e"]);
    }
}
