use json_condition_query as jcq;
use serde_json::{json, Value};

fn check(value: &Value, condition: Value) -> bool {
    jcq::is_match(value, &condition).unwrap()
}

#[test]
fn test_index_entries() {
    let value = json!({"a": 4, "b": 5, "c": 6, "_1234": 4});
    assert!(check(&value, json!({"$indexEntries": {"a": 4, "b": 5}})));
    assert!(check(&value, json!({"$indexEntries": {"a": 4, "$w": {"$exists": false}}})));
    assert!(!check(&value, json!({"$indexEntries": {"a": 5}})));
    // keys are literal, not paths
    let dotted = json!({"a.b": 1});
    assert!(check(&dotted, json!({"$indexEntries": {"a.b": 1}})));
}

#[test]
fn test_index_as_array() {
    let value = json!({"a": 4, "b": 5, "c": 6, "_1234": 4});
    assert!(check(&value, json!({"$indexAsArray": {"$someMatch": {"$key": {"$length": 5}, "$value": 4}}})));
    assert!(!check(&value, json!({"$indexAsArray": {"$someMatch": {"$key": {"$length": 5}, "$value": 5}}})));
    assert!(check(&value, json!({"$indexAsArray": {"$size": 4}})));
    assert!(check(&value, json!({"$indexAsArray": {"$containsAll": [4, 6]}})));
    assert!(check(&value, json!({"$indexAsArray": {"$allMatch": {"$value": {"$gt": 3}}}})));
    assert!(check(&value, json!({"$indexAsArray": {"$singleMatch": {"$key": "b"}}})));
    assert!(check(&value, json!({"$indexAsArray": {"$eq": {"a": 4, "b": 5, "c": 6, "_1234": 4}}})));
    assert!(!check(&json!({"o": null}), json!({"o": {"$indexAsArray": {"$size": 0}}})));
    // the indexed view has no fields of its own
    assert!(!check(&value, json!({"$indexAsArray": {"a": 4}})));
    assert!(check(&value, json!({"$indexAsArray": {"a": {"$exists": false}}})));
}

#[test]
fn test_equality() {
    let value = json!({"a": 4, "b": 5, "c": 6});
    assert!(!check(&value, json!({"$eq": {"a": 4}})));
    assert!(check(&value, json!({"$eq": {"c": 6, "b": 5, "a": 4}})));
    assert!(check(&value, json!({"a": 4, "b": {"$ne": 4}})));
    assert!(check(&json!({"xs": [2, 1, 3]}), json!({"xs": [2, 1, 3]})));
    assert!(!check(&json!({"xs": [2, 1, 3]}), json!({"xs": [1, 2, 3]})));
    assert!(check(&json!({"n": 2}), json!({"n": 2.0})));
    assert!(check(&json!({"n": null}), json!({"n": null})));
    // a bigint is never equal to a number
    let big = json!({"n": 9007199254740993_u64});
    assert!(!check(&big, json!({"n": {"$eq": 9007199254740992.0}})));
    assert!(check(&big, json!({"n": {"$ne": 9007199254740992.0}})));
    assert!(check(&big, json!({"n": 9007199254740993_u64})));
}

#[test]
fn test_comparison() {
    let value = json!({"a": 4, "s": "m"});
    assert!(check(&value, json!({"a": {"$gt": 3, "$lt": 5}})));
    assert!(check(&value, json!({"a": {"$gte": 4, "$lte": 4}})));
    assert!(!check(&value, json!({"a": {"$gt": 4}})));
    assert!(check(&value, json!({"s": {"$gt": "a", "$lt": "z"}})));
    assert!(!check(&value, json!({"a": {"$gt": "3"}})));
    // composed negation: a type mismatch is never less, so $gte holds
    assert!(check(&value, json!({"a": {"$gte": "9"}})));
}

#[test]
fn test_set_membership() {
    let value = json!({"a": 4, "allowed": [4, 5], "none": null});
    assert!(check(&value, json!({"a": {"$in": [1, 4]}})));
    assert!(check(&value, json!({"a": {"$nin": [1, 2]}})));
    assert!(check(&value, json!({"a": {"$in": {"$field": "^allowed"}}})));
    assert!(!check(&value, json!({"a": {"$in": {"$field": "^missing"}}})));
    assert!(!check(&value, json!({"a": {"$in": {"$field": "^none"}}})));
    assert!(check(&value, json!({"a": {"$in": [{"$field": "^allowed.1"}, {"$field": "../a"}]}})));
}

#[test]
fn test_field_references() {
    let value = json!({"min": 1, "max": 3, "nested": {"limit": 2}});
    assert!(check(&value, json!({"max": {"$gt": {"$field": "../min"}}})));
    assert!(check(&value, json!({"max": {"$gt": {"$field": "^min"}}})));
    assert!(check(&value, json!({"nested": {"limit": {"$lt": {"$field": "^max"}}}})));
    assert!(!check(&value, json!({"$eq": {"$field": "nested"}})));
    assert!(check(&value, json!({"nested": {"$eq": {"$field": "^nested"}}})));

    let reference: Value = jcq::make_field_reference("^min").into();
    assert!(check(&value, json!({"max": {"$gte": reference}})));
}

#[test]
fn test_element_references() {
    let value = json!({"budget": 10, "items": [{"price": 20}, {"price": 5}]});
    assert!(check(&value, json!({"items": {"$someMatch": {"price": {"$lt": {"$field": "^budget"}}}}})));
    assert!(!check(&value, json!({"items": {"$allMatch": {"price": {"$lt": {"$field": "^budget"}}}}})));

    let value = json!({"items": [{"qty": 1, "max": 2}, {"qty": 3, "max": 3}]});
    assert!(check(&value, json!({"items": {"$allMatch": {"qty": {"$lte": {"$field": "../max"}}}}})));
}

#[test]
fn test_exists() {
    let value = json!({"a": "a", "n": null});
    assert!(!check(&value, json!({"b": {"$exists": true}})));
    assert!(check(&value, json!({"b": {"$exists": false}})));
    assert!(!check(&value, json!({"a": {"$exists": false}})));
    assert!(check(&value, json!({"a": {"$exists": true, "$eq": "a"}})));
    assert!(check(&value, json!({"n": {"$exists": true}})));
    // a missing field fails every other condition, negated ones included
    assert!(!check(&value, json!({"b": {"$gt": 1}})));
    assert!(!check(&value, json!({"b": {"$not": {"$gt": 1}}})));
    assert!(!check(&value, json!({"b": {"$containsNone": [1]}})));
    assert!(!check(&value, json!({"x.y.z": 1})));
    assert!(check(&value, json!({"x.y.z": {"$exists": false}})));
}

#[test]
fn test_logical() {
    let value = json!({"a": 4});
    assert!(check(&value, json!({"$or": [{"a": 1}, {"a": 4}]})));
    assert!(!check(&value, json!({"$nor": [{"a": 1}, {"a": 4}]})));
    assert!(check(&value, json!({"$and": [{"a": {"$gt": 1}}, {"a": {"$lt": 5}}]})));
    assert!(!check(&value, json!({"$and": "x"})));
    assert!(!check(&value, json!({"$or": {"a": 4}})));
    assert!(check(&value, json!({"$nor": "x"})));
    assert!(!check(&value, json!({"$not": {"a": 4}})));
    assert!(check(&value, json!({"$and": []})));
    assert!(!check(&value, json!({"$or": []})));
}

#[test]
fn test_strings() {
    let value = json!({"s": "hello", "n": 5});
    assert!(check(&value, json!({"s": {"$eqi": "HeLLo"}})));
    assert!(check(&value, json!({"s": {"$contains": "ell"}})));
    assert!(check(&value, json!({"s": {"$startsWith": "he"}})));
    assert!(check(&value, json!({"s": {"$endsWith": "lo"}})));
    assert!(!check(&value, json!({"s": {"$endsWith": "he"}})));
    assert!(check(&value, json!({"s": {"$regexp": "/^H.*O$/i"}})));
    assert!(!check(&value, json!({"s": {"$regexp": "/^H/"}})));
    assert!(check(&value, json!({"s": {"$length": 5}})));
    assert!(check(&value, json!({"s": {"$length": {"$gt": 3}}})));
    assert!(check(&value, json!({"s": {"$charAt": [1, "e"]}})));
    assert!(!check(&value, json!({"s": {"$charAt": [9, "e"]}})));
    assert!(!check(&value, json!({"n": {"$contains": "5"}})));
    assert!(!check(&value, json!({"n": {"$length": 1}})));
    assert!(!check(&value, json!({"s": {"$contains": 5}})));
    assert!(check(&json!({"w": "héllo"}), json!({"w": {"$length": 5, "$charAt": [1, "é"]}})));
}

#[test]
fn test_containment() {
    let value = json!({"xs": [2, 1, 3, 2], "ys": [2, 1, 2], "nothing": null});
    assert!(check(&value, json!({"xs": {"$containsAll": [1, 1, 2]}})));
    assert!(!check(&value, json!({"xs": {"$containsAll": [4]}})));
    assert!(check(&value, json!({"ys": {"$containsSame": [1, 2, 2]}})));
    assert!(!check(&value, json!({"ys": {"$containsSame": [1, 2]}})));
    assert!(!check(&value, json!({"ys": {"$containsSame": [1, 1, 2]}})));
    assert!(check(&value, json!({"xs": {"$containsSome": [9, 3]}})));
    assert!(check(&value, json!({"xs": {"$containsNone": [9]}})));
    assert!(!check(&value, json!({"xs": {"$containsNone": [3]}})));
    assert!(check(&value, json!({"xs": {"$containsAll": {"$field": "^ys"}}})));
    // a null target contains nothing, so its negation holds
    assert!(!check(&value, json!({"nothing": {"$containsSome": [1]}})));
    assert!(check(&value, json!({"nothing": {"$containsNone": [1]}})));
    assert!(check(&json!({"s": "abc"}), json!({"s": {"$containsAll": ["c", "a"]}})));
}

#[test]
fn test_element_matching() {
    let value = json!({"xs": [2, 1, 3], "fs": [0, false]});
    assert!(check(&value, json!({"xs": {"$allMatch": {"$gt": 0}}})));
    assert!(check(&value, json!({"xs": {"$someMatch": {"$gt": 2}}})));
    assert!(check(&value, json!({"xs": {"$singleMatch": {"$gt": 2}}})));
    assert!(!check(&value, json!({"xs": {"$singleMatch": {"$gt": 1}}})));
    assert!(check(&value, json!({"xs": {"$noneMatch": {"$gt": 5}}})));
    assert!(check(&value, json!({"xs": {"$elementAt": [1, 1]}})));
    assert!(!check(&value, json!({"xs": {"$elementAt": [5, 1]}})));
    assert!(check(&value, json!({"fs": {"$elementAt": [0, 0]}})));
    assert!(check(&value, json!({"fs": {"$elementAt": [1, false]}})));
    assert!(check(&value, json!({"xs": {"$size": 3}})));
    assert!(check(&value, json!({"xs": {"$size": {"$gte": 2}}})));
    assert!(check(&json!({"s": "abc"}), json!({"s": {"$size": 3, "$someMatch": "b"}})));
    assert!(check(&value, json!({"xs.0": 2})));
    assert!(!check(&value, json!({"xs.first": 2})));
}

#[test]
fn test_types() {
    let value = json!({"a": 4, "s": "x", "b": true, "big": 9007199254740993_u64, "f": 1.5});
    assert!(check(&value, json!({"a": {"$type": "number"}})));
    assert!(!check(&value, json!({"a": {"$type": "string"}})));
    assert!(check(&value, json!({"s": {"$type": "string"}})));
    assert!(check(&value, json!({"b": {"$type": "boolean"}})));
    assert!(check(&value, json!({"f": {"$type": "number"}})));
    assert!(check(&value, json!({"big": {"$type": "bigint"}})));
    assert!(!check(&value, json!({"big": {"$type": "number"}})));
    assert!(check(&value, json!({"a": {"$type": ["number", {"$gt": 3}]}})));
    assert!(!check(&value, json!({"s": {"$type": ["number", {"$gt": 3}]}})));
}

#[test]
fn test_entry_operators_outside_entries() {
    let value = json!({"key": "a", "value": 1});
    assert!(!check(&value, json!({"$key": "a"})));
    assert!(!check(&value, json!({"$value": 1})));
}

#[test]
fn test_quoted_paths() {
    let value = json!({"a.b": {"c": 1}, "it's": 2});
    assert!(check(&value, json!({"'a.b'.c": 1})));
    assert!(check(&value, json!({"\"a.b\".c": 1})));
    assert!(check(&value, json!({"\"it's\"": 2})));
    assert!(!check(&value, json!({"a.b.c": 1})));
}

#[test]
fn test_compiled_condition() {
    let engine = jcq::Engine::new();
    let compiled = engine
        .compile(&json!({"tags": {"$containsSome": ["rust"]}, "stars": {"$gte": 10}}))
        .unwrap();
    assert!(compiled.is_match(&json!({"tags": ["rust", "json"], "stars": 12})).unwrap());
    assert!(!compiled.is_match(&json!({"tags": ["go"], "stars": 12})).unwrap());
    assert!(!compiled.is_match(&json!({"tags": ["rust"]})).unwrap());
}
