#[cfg(test)]
mod tests {
    use crate::args::Arguments;
    use crate::error::ErrorKind;
    use crate::value::SqlValue;
    use crate::valuer::{SqlValuer, ValuerError};
    use pretty_assertions::assert_eq;

    #[test]
    fn bind_returns_ordinals_in_order() {
        let mut args = Arguments::new();
        assert_eq!(args.bind(1_i64), 0);
        assert_eq!(args.bind("x"), 1);
        assert_eq!(args.bind_named("n", 2.5), 2);
        assert_eq!(args.len(), 3);
        assert_eq!(args.get(2).unwrap().name(), Some("n"));
        assert_eq!(args.get(1).unwrap().value(), &SqlValue::from("x"));
    }

    #[test]
    fn rebinding_a_name_replaces_its_value() {
        let mut args = Arguments::new();
        args.bind_named("id", 1_i64);
        args.bind(9_i64);
        assert_eq!(args.bind_named("id", 2_i64), 0);
        assert_eq!(args.len(), 2);
        assert_eq!(args.get(0).unwrap().value(), &SqlValue::I64(2));
    }

    #[test]
    fn chaining_helpers_snapshot_slices() {
        let mut ids = vec![1_i64, 2, 3];
        let mut args = Arguments::new();
        args.int64(7)
            .string("a")
            .int64s(ids.clone())
            .strings(["x", "y"])
            .named("k", true);
        ids.push(4);

        let values: Vec<_> = args.iter().map(|a| a.value().clone()).collect();
        assert_eq!(
            values,
            vec![
                SqlValue::I64(7),
                SqlValue::from("a"),
                SqlValue::I64s(vec![1, 2, 3]),
                SqlValue::Strings(vec!["x".into(), "y".into()]),
                SqlValue::Bool(true),
            ]
        );
    }

    #[test]
    fn reset_keeps_capacity() {
        let mut args = Arguments::with_capacity(8);
        args.int64(1).int64(2);
        args.reset();
        assert!(args.is_empty());
        assert_eq!(args.bind(3_i64), 0);
    }

    #[test]
    fn bind_any_rejects_unsupported_kinds() {
        #[derive(Clone)]
        struct Opaque;

        let mut args = Arguments::new();
        assert_eq!(args.bind_any(&42_u32).unwrap(), 0);
        let err = args.bind_any(&Opaque).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotSupported);
        assert_eq!(args.len(), 1);
    }

    #[derive(Debug)]
    struct Money(i64);

    impl SqlValuer for Money {
        fn value(&self) -> Result<SqlValue, ValuerError> {
            if self.0 < 0 {
                return Err(ValuerError(format!("negative amount {}", self.0)));
            }
            Ok(SqlValue::I64(self.0))
        }
    }

    #[test]
    fn bind_valuer_converts_at_bind_time() {
        let mut args = Arguments::new();
        args.bind_valuer(&Money(100)).unwrap();
        assert_eq!(args.get(0).unwrap().value(), &SqlValue::I64(100));

        let err = args.bind_valuer(&Money(-1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Fatal);
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn unset_slot_fails_until_set() {
        let mut args = Arguments::new();
        let idx = args.push_unset();
        let err = args.to_positional_values("SELECT ?").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotValid);

        args.set(idx, "ok").unwrap();
        assert_eq!(
            args.to_positional_values("SELECT ?").unwrap(),
            vec![SqlValue::from("ok")]
        );

        let err = args.set(5, 1_i64).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn named_slot_can_be_filled_later() {
        let mut args = Arguments::new();
        args.push_unset_named("when");
        assert!(!args.get(0).unwrap().is_set());
        args.bind_named("when", 5_i64);
        assert_eq!(
            args.to_positional_values("x = :when").unwrap(),
            vec![SqlValue::I64(5)]
        );
    }

    #[test]
    fn positional_values_skip_named_arguments() {
        let mut args = Arguments::new();
        args.named("b", 2_i64).int64(1).named("a", 3_i64).int64(4);
        let values = args
            .to_positional_values("SELECT ? , :a, ?, :b")
            .unwrap();
        assert_eq!(
            values,
            vec![
                SqlValue::I64(1),
                SqlValue::I64(3),
                SqlValue::I64(4),
                SqlValue::I64(2),
            ]
        );
    }

    #[test]
    fn positional_values_count_must_match() {
        let args: Arguments = [1_i64, 2].into_iter().collect();
        assert_eq!(
            args.to_positional_values("? ? ?").unwrap_err().kind(),
            ErrorKind::NotValid
        );
        assert_eq!(
            args.to_positional_values("?").unwrap_err().kind(),
            ErrorKind::NotValid
        );
        assert_eq!(args.to_positional_values("? ?").unwrap().len(), 2);
    }

    #[test]
    fn unknown_name_is_not_found() {
        let args = Arguments::new();
        let err = args.to_positional_values("x = :missing").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn unused_named_arguments_are_allowed() {
        let mut args = Arguments::new();
        args.named("unused", 1_i64).int64(2);
        assert_eq!(
            args.to_positional_values("x = ?").unwrap(),
            vec![SqlValue::I64(2)]
        );
    }
}
