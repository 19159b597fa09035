use std::collections::BTreeMap;

use crate::{Error, MultiKeyMap, Result};

/// `(1,"a")→10, (1,"b")→20, (2,"a")→30`, components as strings.
fn sample() -> MultiKeyMap<&'static str, i32, 2> {
    let mut map = MultiKeyMap::new();
    map.insert(["1", "a"], 10);
    map.insert(["1", "b"], 20);
    map.insert(["2", "a"], 30);
    map
}

#[test]
fn slice_sees_matching_entries() -> Result<()> {
    let map = sample();
    let ones: MultiKeyMap<_, _, 1> = map.slice(0, "1")?;
    assert!(ones.is_slice());
    assert_eq!(ones.arity(), 1);
    assert_eq!(ones.len(), 2);
    let entries: BTreeMap<_, _> = ones.iter().collect();
    assert_eq!(entries, BTreeMap::from([(["a"], 10), (["b"], 20)]));
    Ok(())
}

#[test]
fn slice_is_live() -> Result<()> {
    let mut map = sample();
    let ones: MultiKeyMap<_, _, 1> = map.slice(0, "1")?;

    map.insert(["1", "c"], 40);
    assert_eq!(ones.len(), 3);
    assert_eq!(ones.get(&["c"])?, 40);

    map.insert(["1", "a"], 11);
    assert_eq!(ones.get(&["a"])?, 11);

    map.insert(["2", "c"], 50);
    assert!(!ones.contains_key(&["z"]));
    assert_eq!(ones.len(), 3, "entries outside the slice stay invisible");
    Ok(())
}

#[test]
fn slice_lookup_stays_in_scope() -> Result<()> {
    let map = sample();
    let twos: MultiKeyMap<_, _, 1> = map.slice(0, "2")?;
    assert_eq!(twos.try_get(&["a"]), Some(30));
    assert_eq!(twos.try_get(&["b"]), None);
    assert!(!twos.contains_in(0, &"b"), "(1, b) exists but is outside the slice");
    assert!(twos.contains_in(0, &"a"));
    Ok(())
}

#[test]
fn slice_on_second_dimension() -> Result<()> {
    let map = sample();
    let a_column: MultiKeyMap<_, _, 1> = map.slice(1, "a")?;
    let entries: BTreeMap<_, _> = a_column.iter().collect();
    assert_eq!(entries, BTreeMap::from([(["1"], 10), (["2"], 30)]));
    Ok(())
}

#[test]
fn insert_through_slice_fills_fixed_component() -> Result<()> {
    let map = sample();
    let mut ones: MultiKeyMap<_, _, 1> = map.slice(0, "1")?;
    ones.insert(["d"], 60);
    assert_eq!(map.try_get(&["1", "d"]), Some(60));
    assert_eq!(map.len(), 4);

    let err = ones.add(["a"], 0).unwrap_err();
    assert_eq!(
        err,
        Error::DuplicateKey {
            key: r#"["1", "a"]"#.to_owned()
        }
    );
    Ok(())
}

#[test]
fn remove_through_slice_reaches_parent() -> Result<()> {
    let map = sample();
    let mut ones: MultiKeyMap<_, _, 1> = map.slice(0, "1")?;
    assert_eq!(ones.remove(&["a"]), Some(10));
    assert!(!map.contains_key(&["1", "a"]));
    assert_eq!(map.len(), 2);
    assert_eq!(ones.remove(&["a"]), None);
    Ok(())
}

#[test]
fn slice_of_slice_order_independent() -> Result<()> {
    let mut map = MultiKeyMap::<u32, u32, 3>::new();
    for a in 0..3 {
        for b in 0..3 {
            for c in 0..2 {
                map.insert([a, b, c], a * 100 + b * 10 + c);
            }
        }
    }

    let first_a: MultiKeyMap<_, _, 1> = map.slice::<2>(0, 1)?.slice(0, 2)?;
    let first_b: MultiKeyMap<_, _, 1> = map.slice::<2>(1, 2)?.slice(0, 1)?;

    let expected: BTreeMap<[u32; 1], u32> = map
        .iter()
        .filter(|([a, b, _], _)| *a == 1 && *b == 2)
        .map(|([_, _, c], v)| ([c], v))
        .collect();
    assert_eq!(expected.len(), 2);
    assert_eq!(first_a.iter().collect::<BTreeMap<_, _>>(), expected);
    assert_eq!(first_b.iter().collect::<BTreeMap<_, _>>(), expected);
    assert_eq!(first_a.len(), 2);
    Ok(())
}

#[test]
fn slice_to_zero_free_dimensions() -> Result<()> {
    let mut map = sample();
    let pinned: MultiKeyMap<_, _, 0> = map.slice::<1>(0, "1")?.slice(0, "b")?;
    assert_eq!(pinned.arity(), 0);
    assert_eq!(pinned.len(), 1);
    assert_eq!(pinned.get(&[])?, 20);
    let entries: Vec<([&str; 0], i32)> = pinned.iter().collect();
    assert_eq!(entries, vec![([], 20)]);

    map.insert(["1", "b"], 21);
    assert_eq!(pinned.try_get(&[]), Some(21));

    map.remove(&["1", "b"]);
    assert!(pinned.is_empty());
    assert_eq!(pinned.try_get(&[]), None);
    Ok(())
}

#[test]
fn try_slice_unknown_value() {
    let map = sample();
    let before = map.storage_len();
    let missing: Option<MultiKeyMap<_, _, 1>> = map.try_slice(0, "9");
    assert!(missing.is_none());
    assert_eq!(map.storage_len(), before);
    assert_eq!(map.len(), 3);
}

#[test]
fn slice_unknown_value_fails() {
    let map = sample();
    let err = map.slice::<1>(1, "z").unwrap_err();
    assert_eq!(
        err,
        Error::KeyNotFound {
            key: r#"[_, "z"]"#.to_owned()
        }
    );
}

#[test]
fn set_all_through_slice_is_scoped() -> Result<()> {
    let map = sample();
    let mut ones: MultiKeyMap<_, _, 1> = map.slice(0, "1")?;
    ones.set_all(0);
    assert_eq!(map.try_get(&["1", "a"]), Some(0));
    assert_eq!(map.try_get(&["1", "b"]), Some(0));
    assert_eq!(map.try_get(&["2", "a"]), Some(30));
    Ok(())
}

#[test]
fn values_through_slice() -> Result<()> {
    let map = sample();
    let a_column: MultiKeyMap<_, _, 1> = map.slice(1, "a")?;
    let mut values: Vec<i32> = a_column.values().collect();
    values.sort_unstable();
    assert_eq!(values, [10, 30]);
    assert_eq!(a_column.keys().count(), 2);
    Ok(())
}

#[test]
fn slice_to_map_keys_by_free_components() -> Result<()> {
    let map = sample();
    let ones: MultiKeyMap<_, _, 1> = map.slice(0, "1")?;
    let snapshot = ones.to_map();
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot.get(&["b"]), Some(&20));
    Ok(())
}

#[test]
fn slice_errors_name_full_key() -> Result<()> {
    let map = sample();
    let ones: MultiKeyMap<_, _, 1> = map.slice(0, "1")?;
    let err = ones.get(&["z"]).unwrap_err();
    assert_eq!(err.to_string(), r#"key not found: ["1", "z"]"#);

    let a_column: MultiKeyMap<_, _, 1> = map.slice(1, "a")?;
    let err = a_column.get(&["9"]).unwrap_err();
    assert_eq!(
        err,
        Error::KeyNotFound {
            key: r#"["9", "a"]"#.to_owned()
        }
    );
    Ok(())
}

#[test]
fn nested_slice_on_value_outside_view() -> Result<()> {
    let mut map = sample();
    map.insert(["2", "c"], 50);
    let ones: MultiKeyMap<_, _, 1> = map.slice(0, "1")?;

    // "c" exists in the lineage, only under "2".
    let pinned: MultiKeyMap<_, _, 0> = ones.slice(0, "c")?;
    assert_eq!(pinned.len(), 0);
    assert!(pinned.is_empty());
    assert_eq!(pinned.try_get(&[]), None);

    map.insert(["1", "c"], 60);
    assert_eq!(pinned.len(), 1);
    assert_eq!(pinned.try_get(&[]), Some(60));

    // A value unknown to the whole lineage still fails.
    let missing: Option<MultiKeyMap<_, _, 0>> = ones.try_slice(0, "z");
    assert!(missing.is_none());
    let err = ones.slice::<0>(0, "z").unwrap_err();
    assert_eq!(
        err,
        Error::KeyNotFound {
            key: r#"["z"]"#.to_owned()
        }
    );
    Ok(())
}

#[test]
fn clear_nested_slice() -> Result<()> {
    let mut map = MultiKeyMap::<u32, u32, 3>::new();
    for a in 0..3 {
        for b in 0..3 {
            for c in 0..2 {
                map.insert([a, b, c], a * 100 + b * 10 + c);
            }
        }
    }
    let first: MultiKeyMap<_, _, 2> = map.slice(0, 1)?;
    let mut pinned: MultiKeyMap<_, _, 1> = first.slice(0, 2)?;
    assert_eq!(pinned.len(), 2);

    pinned.clear();
    assert!(pinned.is_empty());
    assert_eq!(first.len(), 4);
    assert_eq!(map.len(), 16);
    assert_eq!(map.storage_len(), (16, 0));
    assert!(!map.contains_key(&[1, 2, 0]));
    assert!(map.contains_key(&[1, 1, 0]));
    assert!(map.contains_key(&[0, 2, 0]));
    assert_eq!(map.try_get(&[2, 2, 1]), Some(221));
    Ok(())
}
