use crate::key::{CompositeKey, combine, hash_one};

fn key(parts: &[&'static str]) -> CompositeKey<&'static str> {
    parts.iter().copied().collect()
}

#[test]
fn equal_keys_hash_equal() {
    assert_eq!(key(&["a", "b"]), key(&["a", "b"]));
    assert_eq!(
        key(&["a", "b"]).combined_hash(),
        key(&["a", "b"]).combined_hash()
    );
}

#[test]
fn order_sensitive() {
    let ab = key(&["a", "b"]);
    let ba = key(&["b", "a"]);
    assert_ne!(ab, ba);
    assert_ne!(ab.combined_hash(), ba.combined_hash());
}

#[test]
fn hash_folds_component_hashes() {
    let ab = key(&["a", "b"]);
    assert_eq!(ab.combined_hash(), combine([hash_one("a"), hash_one("b")]));
    assert_eq!(ab.arity(), 2);
    assert_eq!(ab.parts(), ["a", "b"]);
}

#[test]
fn empty_fold_is_seed() {
    assert_ne!(combine(std::iter::empty()), 0);
    assert_ne!(combine([0]), combine(std::iter::empty()));
}

#[test]
fn debug_lists_components() {
    assert_eq!(format!("{:?}", key(&["x", "y"])), r#"["x", "y"]"#);
}
