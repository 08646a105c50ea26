use prost::Message;
use proptest::prelude::*;
use resource_provider_sdk::generated::Struct;
use resource_provider_sdk::property::{
    deep_equals, deep_equals_with, fold_output_value, fold_with_dependencies, make_computed,
    make_secret, Asset, EqualityOptions, Output, PropertyMap, PropertyValue, ResourceReference,
    Urn,
};
use resource_provider_sdk::{marshal_properties, unmarshal_properties, MarshalOptions};

const MAX_DEPTH: u32 = 4;
const MAX_COLLECTION_LEN: usize = 4;
const MAX_STRING_LEN: usize = 16;
const MAX_IDENT_LEN: usize = 8;

fn ident_strategy() -> impl Strategy<Value = String> {
    let ch = prop_oneof![
        prop::char::range('a', 'z'),
        prop::char::range('A', 'Z'),
        prop::char::range('0', '9'),
        Just('_'),
    ];
    prop::collection::vec(ch, 1..=MAX_IDENT_LEN).prop_map(|chars| chars.into_iter().collect())
}

fn string_strategy() -> impl Strategy<Value = String> {
    let ch = prop_oneof![
        prop::char::range('a', 'z'),
        prop::char::range('0', '9'),
        Just(' '),
        Just('-'),
        Just('"'),
        Just('\\'),
        Just('\n'),
        Just('é'),
    ];
    prop::collection::vec(ch, 0..=MAX_STRING_LEN).prop_map(|chars| chars.into_iter().collect())
}

fn number_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        (-1_000_000i64..1_000_000).prop_map(|n| n as f64),
        -1.0e9f64..1.0e9,
    ]
}

fn urn_strategy() -> impl Strategy<Value = Urn> {
    ident_strategy()
        .prop_map(|name| Urn::new(format!("urn:pulumi:dev::proj::pkg:index:Res::{}", name)))
}

fn plain_leaf_strategy() -> impl Strategy<Value = PropertyValue> + Clone {
    prop_oneof![
        Just(PropertyValue::Null),
        any::<bool>().prop_map(PropertyValue::Bool),
        number_strategy().prop_map(PropertyValue::Number),
        string_strategy().prop_map(PropertyValue::String),
    ]
}

fn leaf_strategy() -> impl Strategy<Value = PropertyValue> + Clone {
    prop_oneof![
        6 => plain_leaf_strategy(),
        1 => string_strategy().prop_map(|text| PropertyValue::Asset(Asset::from_text(text))),
        1 => (urn_strategy(), ident_strategy()).prop_map(|(urn, id)| {
            PropertyValue::ResourceReference(ResourceReference::new(urn).with_id(id))
        }),
    ]
}

fn object_strategy(
    inner: impl Strategy<Value = PropertyValue> + Clone,
) -> impl Strategy<Value = PropertyMap> {
    prop::collection::btree_map(ident_strategy(), inner, 0..=MAX_COLLECTION_LEN)
}

/// Values without markers, assets or resource references.
fn plain_value_strategy() -> impl Strategy<Value = PropertyValue> + Clone {
    plain_leaf_strategy().prop_recursive(MAX_DEPTH, 32, MAX_COLLECTION_LEN as u32, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..=MAX_COLLECTION_LEN)
                .prop_map(PropertyValue::Array),
            object_strategy(inner).prop_map(PropertyValue::Object),
        ]
    })
}

/// Values with markers nested anywhere.
fn value_strategy() -> impl Strategy<Value = PropertyValue> + Clone {
    leaf_strategy().prop_recursive(MAX_DEPTH, 48, MAX_COLLECTION_LEN as u32, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..=MAX_COLLECTION_LEN)
                .prop_map(PropertyValue::Array),
            object_strategy(inner.clone()).prop_map(PropertyValue::Object),
            inner.clone().prop_map(PropertyValue::secret),
            inner.clone().prop_map(PropertyValue::computed),
            (
                inner,
                any::<bool>(),
                any::<bool>(),
                prop::collection::vec(urn_strategy(), 0..=2),
            )
                .prop_map(|(element, known, secret, deps)| {
                    PropertyValue::Output(
                        Output::new(element)
                            .with_known(known)
                            .with_secret(secret)
                            .with_dependencies(deps),
                    )
                }),
        ]
    })
}

fn maps_equal(a: &PropertyMap, b: &PropertyMap, opts: EqualityOptions) -> bool {
    a.len() == b.len()
        && a.iter().all(|(k, av)| {
            b.get(k)
                .map(|bv| deep_equals_with(av, bv, opts))
                .unwrap_or(false)
        })
}

/// Fold markers at every level, dropping dependencies.
fn canonical(v: &PropertyValue) -> PropertyValue {
    match fold_output_value(v) {
        PropertyValue::Output(o) => PropertyValue::Output(Output {
            element: Box::new(canonical_inner(&o.element)),
            ..o
        }),
        other => canonical_inner(&other),
    }
}

fn canonical_inner(v: &PropertyValue) -> PropertyValue {
    match v {
        PropertyValue::Array(items) => PropertyValue::Array(items.iter().map(canonical).collect()),
        PropertyValue::Object(map) => PropertyValue::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), canonical(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn lossless_wire_roundtrip(props in object_strategy(value_strategy())) {
        let opts = MarshalOptions::lossless();
        let encoded = marshal_properties(&props, &opts).expect("marshal");
        let bytes = encoded.encode_to_vec();
        let decoded_struct = Struct::decode(bytes.as_slice()).expect("decode");
        prop_assert_eq!(&decoded_struct, &encoded);

        let decoded = unmarshal_properties(&decoded_struct, &opts).expect("unmarshal");
        let with_deps = EqualityOptions::new().with_compare_dependencies(true);
        prop_assert!(maps_equal(&props, &decoded, with_deps));
    }

    #[test]
    fn plain_values_roundtrip_exactly(props in object_strategy(plain_value_strategy())) {
        let opts = MarshalOptions::new();
        let encoded = marshal_properties(&props, &opts).expect("marshal");
        let decoded = unmarshal_properties(&encoded, &opts).expect("unmarshal");
        prop_assert_eq!(decoded, props);
    }

    #[test]
    fn fold_is_idempotent(v in value_strategy()) {
        let once = fold_output_value(&v);
        prop_assert_eq!(fold_output_value(&once), once.clone());
        prop_assert!(deep_equals(&once, &v));
        prop_assert!(deep_equals(&canonical(&v), &v));

        let once = fold_with_dependencies(&v);
        prop_assert_eq!(fold_with_dependencies(&once), once);
    }

    #[test]
    fn deep_equals_is_reflexive(v in value_strategy()) {
        prop_assert!(deep_equals(&v, &v));
        let with_deps = EqualityOptions::new().with_compare_dependencies(true);
        prop_assert!(deep_equals_with(&v, &v, with_deps));
    }

    #[test]
    fn deep_equals_matches_structural_equality_without_markers(
        a in plain_value_strategy(),
        b in plain_value_strategy(),
    ) {
        prop_assert_eq!(deep_equals(&a, &b), a == b);
    }

    #[test]
    fn deep_equals_distinguishes_different_folded_values(
        a in value_strategy(),
        b in value_strategy(),
    ) {
        let folded_a = format!("{:?}", canonical(&a));
        let folded_b = format!("{:?}", canonical(&b));
        if folded_a != folded_b {
            prop_assert!(!deep_equals(&a, &b));
        }
    }

    #[test]
    fn markers_commute(v in value_strategy()) {
        let secret_first = make_computed(make_secret(v.clone()));
        let computed_first = make_secret(make_computed(v.clone()));
        prop_assert!(deep_equals(&secret_first, &computed_first));

        let nested_a = PropertyValue::secret(PropertyValue::computed(v.clone()));
        let nested_b = PropertyValue::computed(PropertyValue::secret(v));
        prop_assert!(deep_equals(&nested_a, &nested_b));
    }

    #[test]
    fn secret_alone_is_not_computed_alone(v in plain_value_strategy()) {
        prop_assert!(!deep_equals(&make_secret(v.clone()), &make_computed(v)));
    }

    #[test]
    fn markers_do_not_distribute_over_arrays(v in plain_value_strategy()) {
        let outer = PropertyValue::secret(PropertyValue::Array(vec![v.clone()]));
        let inner = PropertyValue::Array(vec![PropertyValue::secret(v)]);
        prop_assert!(!deep_equals(&outer, &inner));
    }
}
