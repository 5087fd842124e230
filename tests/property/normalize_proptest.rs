//! Property-based tests for payload normalization

use proptest::prelude::*;
use serde_json::{json, Map, Value};

use taskboard_sync::remote::normalize_payload;

proptest! {
    /// Array-with-holes and keyed-object payloads normalize to the same list
    #[test]
    fn test_array_and_object_agree(
        ids in prop::collection::btree_set(1u64..100_000, 0..30),
        holes in prop::collection::vec(any::<bool>(), 30),
    ) {
        let ids: Vec<u64> = ids.into_iter().collect();

        let mut array = Vec::new();
        for (i, id) in ids.iter().enumerate() {
            if holes[i] {
                array.push(Value::Null);
            }
            array.push(json!({"id": id, "title": format!("t{}", id)}));
        }
        let object: Map<String, Value> = ids
            .iter()
            .map(|id| (id.to_string(), json!({"title": format!("t{}", id)})))
            .collect();

        let from_array = normalize_payload(Value::Array(array));
        let from_object = normalize_payload(Value::Object(object));

        prop_assert_eq!(&from_array, &from_object);
        prop_assert!(from_array.iter().all(|v| !v.is_null()));
        prop_assert_eq!(from_array.len(), ids.len());
    }
}
