#[cfg(test)]
mod tests {
    use crate::decimal::{BINARY_LEN, Decimal, MAX_SCALE};
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn canonical_text_pads_scale() {
        assert_eq!(Decimal::new(1234, 2).to_string(), "12.34");
        assert_eq!(Decimal::new(1234, 11).to_string(), "0.00000001234");
        assert_eq!(Decimal::new(1234, 4).to_string(), "0.1234");
        assert_eq!(Decimal::new(0, 2).to_string(), "0.00");
        assert_eq!(Decimal::new(7, 0).to_string(), "7");
        assert_eq!(Decimal::from_i64(-505, 1).to_string(), "-50.5");
        assert_eq!(Decimal::null().to_string(), "NULL");
    }

    #[test]
    fn canonical_text_handles_full_u64_range() {
        let d = Decimal::new(u64::MAX, 30);
        assert_eq!(d.to_text(), "0.000000000018446744073709551615");
        assert_eq!(d.to_text().parse::<Decimal>().unwrap(), d);
    }

    #[test]
    fn out_of_range_scale_renders_exponent() {
        assert_eq!(Decimal::new(12, -3).to_string(), "12e3");
        assert_eq!(Decimal::new(1, i32::MAX).to_string(), "1e-2147483647");
        assert_eq!(
            Decimal::new(5, i32::MIN).with_negative(true).to_string(),
            "-5e2147483648"
        );
    }

    #[test]
    fn parse_keeps_written_scale() {
        let d: Decimal = "1.50".parse().unwrap();
        assert_eq!(d, Decimal::new(150, 2));
        let d: Decimal = "-0.001".parse().unwrap();
        assert_eq!(d, Decimal::from_i64(-1, 3));
        let d: Decimal = "+42".parse().unwrap();
        assert_eq!(d, Decimal::new(42, 0));
        let d: Decimal = ".5".parse().unwrap();
        assert_eq!(d, Decimal::new(5, 1));
    }

    #[test]
    fn parse_exponent_normalizes_to_non_negative_scale() {
        assert_eq!("1.5e3".parse::<Decimal>().unwrap(), Decimal::new(1500, 0));
        assert_eq!("15e-3".parse::<Decimal>().unwrap(), Decimal::new(15, 3));
        assert_eq!("0e30".parse::<Decimal>().unwrap(), Decimal::new(0, 0));
    }

    #[test]
    fn parse_rejects_malformed_and_overflow() {
        for bad in ["", "-", ".", "1.2.3", "12a", "1e", "1ex", "--1"] {
            let err = bad.parse::<Decimal>().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotValid, "input {bad:?}");
        }
        let err = "18446744073709551616".parse::<Decimal>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotValid);
        assert!("18446744073709551615".parse::<Decimal>().is_ok());
    }

    #[test]
    fn to_i64_reports_overflow_as_zero() {
        assert_eq!(Decimal::new(1234, 2).to_i64(), (1234, 2));
        assert_eq!(Decimal::from_i64(-9, 0).to_i64(), (-9, 0));
        assert_eq!(Decimal::new(u64::MAX, 3).to_i64(), (0, 0));
        assert_eq!(Decimal::new(1 << 63, 0).to_i64(), (0, 0));
        assert_eq!(
            Decimal::new(1 << 63, 1).with_negative(true).to_i64(),
            (i64::MIN, 1)
        );
        assert_eq!(Decimal::null().to_i64(), (0, 0));
    }

    #[test]
    fn float_round_trip() {
        let samples = [
            0.1,
            -0.1,
            1.0,
            123.456,
            -98765.4321,
            1e-7,
            5e-324,
            f64::MIN_POSITIVE,
            9007199254740993.0,
            1.8e19,
            0.30000000000000004,
        ];
        for x in samples {
            let d = Decimal::from_f64(x).unwrap();
            assert_eq!(d.to_f64(), x, "value {x}");
        }
    }

    #[test]
    fn float_uses_shortest_digits() {
        assert_eq!(Decimal::from_f64(0.1).unwrap(), Decimal::new(1, 1));
        assert_eq!(Decimal::from_f64(-2.5).unwrap(), Decimal::from_i64(-25, 1));
        assert_eq!(Decimal::from_f64(100.0).unwrap(), Decimal::new(100, 0));
    }

    #[test]
    fn non_finite_floats_map_to_sentinels() {
        assert_eq!(Decimal::from_f64(f64::NAN).unwrap(), Decimal::new(0, 0));
        assert_eq!(Decimal::from_f64(f64::INFINITY).unwrap(), Decimal::new(0, 0));
        let neg = Decimal::from_f64(f64::NEG_INFINITY).unwrap();
        assert!(neg.negative && neg.is_zero() && neg.valid);
        assert_eq!(neg.to_string(), "-0");
    }

    #[test]
    fn huge_float_is_not_representable() {
        let err = Decimal::from_f64(1e30).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotValid);
    }

    #[test]
    fn binary_round_trip() {
        let values = [
            Decimal::new(0, 0),
            Decimal::new(1234, 2),
            Decimal::new(u64::MAX, 11).with_negative(true),
            Decimal::new(5, 324).with_quote(true),
        ];
        for d in values {
            let bin = d.marshal_binary().unwrap();
            assert_eq!(bin.len(), BINARY_LEN);
            assert_eq!(Decimal::unmarshal_binary(&bin).unwrap(), d);
        }
    }

    #[test]
    fn binary_layout() {
        let bin = Decimal::from_i64(-1, 2).with_quote(true).marshal_binary().unwrap();
        assert_eq!(
            bin,
            vec![0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 2, 0x07, BINARY_LEN as u8]
        );
    }

    #[test]
    fn binary_null_sentinel() {
        assert!(Decimal::null().marshal_binary().unwrap().is_empty());
        assert_eq!(Decimal::unmarshal_binary(&[]).unwrap(), Decimal::default());
    }

    #[test]
    fn binary_rejects_garbage() {
        let mut bin = Decimal::new(1, 1).marshal_binary().unwrap();
        bin[13] = 0;
        assert_eq!(
            Decimal::unmarshal_binary(&bin).unwrap_err().kind(),
            ErrorKind::NotValid
        );

        let mut bin = Decimal::new(1, 1).marshal_binary().unwrap();
        bin[12] = 0x80 | 0x01;
        assert!(Decimal::unmarshal_binary(&bin).is_err());

        let mut bin = Decimal::new(1, 1).marshal_binary().unwrap();
        bin[8..12].copy_from_slice(&(-1_i32).to_be_bytes());
        assert!(Decimal::unmarshal_binary(&bin).is_err());

        assert!(Decimal::unmarshal_binary(&[1, 2, 3]).is_err());
    }

    #[test]
    fn text_round_trip() {
        let values = [
            Decimal::new(1234, 2),
            Decimal::new(1234, 11).with_negative(true),
            Decimal::new(0, 3),
            Decimal::new(77, 1).with_quote(true),
            Decimal::new(u64::MAX, 0),
        ];
        for d in values {
            let text = d.marshal_text().unwrap();
            assert_eq!(Decimal::unmarshal_text(&text).unwrap(), d);
        }
    }

    #[test]
    fn codecs_accept_scale_bounds_only() {
        let edge = Decimal::new(7, MAX_SCALE).with_negative(true);
        let bin = edge.marshal_binary().unwrap();
        assert_eq!(Decimal::unmarshal_binary(&bin).unwrap(), edge);
        let text = edge.marshal_text().unwrap();
        assert_eq!(Decimal::unmarshal_text(&text).unwrap(), edge);

        for d in [Decimal::new(1, MAX_SCALE + 1), Decimal::new(12, -3)] {
            assert!(!d.has_valid_scale());
            assert_eq!(d.marshal_binary().unwrap_err().kind(), ErrorKind::NotValid);
            assert_eq!(d.marshal_text().unwrap_err().kind(), ErrorKind::NotValid);
        }
    }

    #[test]
    fn text_quote_hint() {
        assert_eq!(
            Decimal::new(1234, 2).with_quote(true).marshal_text().unwrap(),
            b"\"12.34\"".to_vec()
        );
        assert_eq!(Decimal::new(1234, 2).marshal_text().unwrap(), b"12.34".to_vec());
    }

    #[test]
    fn text_null_sentinel() {
        assert!(Decimal::null().marshal_text().unwrap().is_empty());
        assert_eq!(Decimal::unmarshal_text(b"").unwrap(), Decimal::default());
        assert_eq!(Decimal::unmarshal_text(b"null").unwrap(), Decimal::default());
        assert_eq!(Decimal::unmarshal_text(b"NULL").unwrap(), Decimal::default());
        assert_ne!(Decimal::unmarshal_text(b"0").unwrap(), Decimal::default());
    }

    #[test]
    fn text_rejects_invalid_utf8() {
        let err = Decimal::unmarshal_text(&[0xff, 0x31]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotValid);
    }
}
