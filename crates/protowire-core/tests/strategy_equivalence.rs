//! Property check: the three strategies are interchangeable. Identical
//! input must produce identical bytes, and identical bytes must decode to
//! identical records, for arbitrary values over a representative model.

use proptest::prelude::*;
use protowire_core::prelude::*;
use protowire_core::strategy::Strategy;
use std::sync::Arc;

const ALL_STRATEGIES: [Strategy; 3] =
    [Strategy::Interpreted, Strategy::Planned, Strategy::Compiled];

fn order_model() -> Arc<TypeModel> {
    let model = TypeModelBuilder::new("Demo.Wire")
        .message(
            MessageDef::new("Line")
                .field(FieldDef::new(1, "Sku", FieldType::Scalar(ScalarType::String)))
                .field(FieldDef::new(2, "Count", FieldType::Scalar(ScalarType::Int32))),
        )
        .message(
            MessageDef::new("Order")
                .field(FieldDef::new(1, "Name", FieldType::Scalar(ScalarType::String)))
                .field(FieldDef::new(2, "Count", FieldType::Scalar(ScalarType::Int32)))
                .field(
                    FieldDef::new(3, "Delta", FieldType::Scalar(ScalarType::Int64))
                        .format(FormatOverride::ZigZag),
                )
                .field(FieldDef::new(4, "Flags", FieldType::Scalar(ScalarType::UInt32)).repeated())
                .field(FieldDef::new(5, "When", FieldType::Builtin(BuiltinKind::Instant)))
                .field(FieldDef::new(6, "Gap", FieldType::Builtin(BuiltinKind::Duration)))
                .field(FieldDef::new(7, "Id", FieldType::Builtin(BuiltinKind::Guid)))
                .field(FieldDef::new(8, "Total", FieldType::Builtin(BuiltinKind::Decimal)))
                .field(FieldDef::new(
                    9,
                    "Tags",
                    FieldType::map(
                        FieldType::Scalar(ScalarType::String),
                        FieldType::Scalar(ScalarType::Int64),
                    ),
                ))
                .field(FieldDef::new(10, "First", FieldType::message("Line"))),
        )
        .build()
        .unwrap();

    Arc::new(model)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn strategies_agree_on_arbitrary_records(
        name in ".*",
        count in any::<i32>(),
        delta in any::<i64>(),
        flags in proptest::collection::vec(any::<u32>(), 0..8),
        when_ticks in any::<i64>(),
        gap_ticks in any::<i64>(),
        id in any::<u128>(),
        mantissa in any::<i64>(),
        scale in 0u32..=28,
        tags in proptest::collection::btree_map(".*", any::<i64>(), 0..6),
        sku in ".*",
    ) {
        let model = order_model();
        let record = Record::new()
            .with(1, name)
            .with(2, count)
            .with(3, delta)
            .with(4, Value::List(flags.into_iter().map(Value::U32).collect()))
            .with(5, Instant::from_ticks(when_ticks))
            .with(6, Duration::from_ticks(gap_ticks))
            .with(7, Guid::from_u128(id))
            .with(8, Decimal::new(mantissa, scale))
            .with(
                9,
                Value::Map(
                    tags.into_iter()
                        .map(|(k, v)| (Value::Str(k), Value::I64(v)))
                        .collect(),
                ),
            )
            .with(10, Value::Record(Record::new().with(1, sku).with(2, count)));

        let reference = Serializer::new(Arc::clone(&model), Strategy::Interpreted)
            .encode("Order", &record)
            .expect("reference encode should succeed");

        for strategy in ALL_STRATEGIES {
            let serializer = Serializer::new(Arc::clone(&model), strategy);

            let bytes = serializer
                .encode("Order", &record)
                .expect("encode should succeed");
            prop_assert_eq!(&bytes, &reference, "{} encode drifted", strategy);

            let decoded = serializer
                .decode("Order", &reference)
                .expect("decode should succeed");
            let baseline = Serializer::new(Arc::clone(&model), Strategy::Interpreted)
                .decode("Order", &reference)
                .expect("reference decode should succeed");
            prop_assert_eq!(decoded, baseline, "{} decode drifted", strategy);
        }
    }

    #[test]
    fn scalar_defaults_never_reach_the_wire_in_any_strategy(
        count in prop_oneof![Just(0_i32), any::<i32>()],
    ) {
        let model = order_model();
        let record = Record::new().with(2, count);

        for strategy in ALL_STRATEGIES {
            let bytes = Serializer::new(Arc::clone(&model), strategy)
                .encode("Order", &record)
                .expect("encode should succeed");
            prop_assert_eq!(bytes.is_empty(), count == 0, "{}", strategy);
        }
    }

    #[test]
    fn unknown_fields_are_skipped_without_disturbing_known_ones(
        name in ".*",
        count in 1..i32::MAX,
        delta in any::<i64>(),
        flags in proptest::collection::vec(any::<u32>(), 1..8),
    ) {
        let wide = order_model();
        let narrow = Arc::new(
            TypeModelBuilder::new("Demo.Wire")
                .message(
                    MessageDef::new("Order")
                        .field(FieldDef::new(2, "Count", FieldType::Scalar(ScalarType::Int32))),
                )
                .build()
                .unwrap(),
        );

        let record = Record::new()
            .with(1, name)
            .with(2, count)
            .with(3, delta)
            .with(4, Value::List(flags.into_iter().map(Value::U32).collect()));
        let bytes = Serializer::new(Arc::clone(&wide), Strategy::Interpreted)
            .encode("Order", &record)
            .expect("encode should succeed");

        for strategy in ALL_STRATEGIES {
            let decoded = Serializer::new(Arc::clone(&narrow), strategy)
                .decode("Order", &bytes)
                .expect("decode should skip the unrecognized fields");
            prop_assert_eq!(decoded.get(2), Some(&Value::I32(count)), "{}", strategy);
            prop_assert_eq!(decoded.len(), 1, "{}", strategy);
        }
    }
}
