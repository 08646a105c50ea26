//! Dependency collection and side-channel merging.

use std::collections::BTreeMap;

use super::{walk, PropertyMap, PropertyValue, Urn};

/// Every dependency carried by any output anywhere in `v`, sorted and
/// deduplicated.
pub fn get_property_dependencies(v: &PropertyValue) -> Vec<Urn> {
    let mut deps = Vec::new();
    walk(v, |v, state| {
        if state.entering {
            deps.extend(v.dependencies().iter().cloned());
        }
    });
    deps.sort();
    deps.dedup();
    deps
}

/// Merge side-channel dependencies into the values of `map`.
///
/// Only top-level entries named in `dependencies` are touched. URNs already
/// carried somewhere inside the value are skipped, since those belong to
/// nested outputs rather than to the value itself. The remainder is merged
/// with the value's own dependencies.
pub fn merge_property_dependencies(
    mut map: PropertyMap,
    dependencies: &BTreeMap<String, Vec<Urn>>,
) -> PropertyMap {
    for (name, deps) in dependencies {
        let Some(v) = map.remove(name) else {
            continue;
        };
        let nested = get_property_dependencies(&v);
        let mut merged: Vec<Urn> = v.dependencies().to_vec();
        merged.extend(deps.iter().filter(|d| !nested.contains(*d)).cloned());
        merged.sort();
        merged.dedup();
        map.insert(name.clone(), v.with_dependencies(merged));
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::Output;

    fn urn(name: &str) -> Urn {
        Urn::new(format!("urn:pulumi:test::test::test:index:Res::{}", name))
    }

    #[test]
    fn test_get_property_dependencies_is_deep() {
        let v = PropertyValue::array(vec![
            PropertyValue::Output(
                Output::new(PropertyValue::from("a")).with_dependencies(vec![urn("b")]),
            ),
            PropertyValue::object([(
                "k",
                PropertyValue::Output(
                    Output::unknown(PropertyValue::Null)
                        .with_dependencies(vec![urn("a"), urn("b")]),
                ),
            )]),
        ]);
        assert_eq!(get_property_dependencies(&v), vec![urn("a"), urn("b")]);
        assert!(get_property_dependencies(&PropertyValue::from(1.0)).is_empty());
    }

    #[test]
    fn test_merge_legacy_value() {
        let mut map = PropertyMap::new();
        map.insert("out".to_string(), PropertyValue::from("x"));
        map.insert("other".to_string(), PropertyValue::from("y"));

        let mut deps = BTreeMap::new();
        deps.insert("out".to_string(), vec![urn("b"), urn("a"), urn("b")]);
        deps.insert("missing".to_string(), vec![urn("c")]);

        let merged = merge_property_dependencies(map, &deps);
        assert_eq!(
            merged["out"],
            PropertyValue::Output(
                Output::new(PropertyValue::from("x")).with_dependencies(vec![urn("a"), urn("b")])
            )
        );
        assert_eq!(merged["other"], PropertyValue::from("y"));
        assert!(!merged.contains_key("missing"));
    }

    #[test]
    fn test_merge_skips_nested_dependencies() {
        let nested = PropertyValue::object([(
            "inner",
            PropertyValue::Output(
                Output::new(PropertyValue::from(1.0)).with_dependencies(vec![urn("a")]),
            ),
        )]);
        let mut map = PropertyMap::new();
        map.insert("obj".to_string(), nested.clone());

        let mut deps = BTreeMap::new();
        deps.insert("obj".to_string(), vec![urn("a")]);

        let merged = merge_property_dependencies(map, &deps);
        assert_eq!(merged["obj"], nested);
    }

    #[test]
    fn test_merge_keeps_secret() {
        let mut map = PropertyMap::new();
        map.insert("s".to_string(), PropertyValue::secret(PropertyValue::from("x")));
        let mut deps = BTreeMap::new();
        deps.insert("s".to_string(), vec![urn("a")]);

        let merged = merge_property_dependencies(map, &deps);
        assert_eq!(
            merged["s"],
            PropertyValue::Output(
                Output::new(PropertyValue::from("x"))
                    .with_secret(true)
                    .with_dependencies(vec![urn("a")])
            )
        );
    }
}
