use avl_collections::avl_tree::{AvlMap, AvlSet};
use rand::{Rng, SeedableRng, XorShiftRng};
use std::collections::{BTreeMap, BTreeSet};

fn seeded_rng() -> XorShiftRng {
    XorShiftRng::from_seed([1, 2, 3, 4])
}

// worst case height of an avl tree holding `len` nodes
fn height_bound(len: usize) -> f64 {
    1.4405 * ((len + 2) as f64).log2() - 0.3277
}

#[test]
fn test_random_operations_match_btreemap() {
    let mut rng = seeded_rng();
    let mut map = AvlMap::new();
    let mut expected = BTreeMap::new();

    for _ in 0..20_000 {
        let key = rng.gen_range(0u32, 512);
        if rng.gen::<bool>() {
            let value = rng.gen::<u32>();
            assert_eq!(map.insert(key, value), expected.insert(key, value));
        } else {
            assert_eq!(map.remove(&key), expected.remove(&key).map(|value| (key, value)));
        }
        assert_eq!(map.validate(), Ok(()));
        assert_eq!(map.len(), expected.len());
    }

    assert!(map.iter().eq(expected.iter()));
    assert!(map.into_iter().eq(expected.into_iter()));
}

#[test]
fn test_insert_then_remove_all_in_random_order() {
    let mut rng = seeded_rng();
    let mut keys: Vec<u32> = (0..5_000).collect();
    rng.shuffle(&mut keys);

    let mut map = AvlMap::new();
    for &key in &keys {
        assert_eq!(map.insert(key, key * 2), None);
    }
    assert_eq!(map.len(), keys.len());
    assert_eq!(map.validate(), Ok(()));

    rng.shuffle(&mut keys);
    for (removed, &key) in keys.iter().enumerate() {
        assert_eq!(map.remove(&key), Some((key, key * 2)));
        if removed % 97 == 0 {
            assert_eq!(map.validate(), Ok(()));
        }
    }

    assert!(map.is_empty());
    assert_eq!(map.height(), 0);
    assert_eq!(map.min(), None);
    assert_eq!(map.validate(), Ok(()));
}

#[test]
fn test_height_bound_sequential() {
    let mut map = AvlMap::new();
    for key in 0..100_000u32 {
        map.insert(key, ());
    }
    assert!((map.height() as f64) <= height_bound(map.len()));
    assert_eq!(map.validate(), Ok(()));
}

#[test]
fn test_height_bound_random() {
    let mut rng = seeded_rng();
    let mut map = AvlMap::new();
    for _ in 0..100_000 {
        map.insert(rng.gen::<u32>(), ());
    }
    assert!((map.height() as f64) <= height_bound(map.len()));
    assert_eq!(map.validate(), Ok(()));
}

#[test]
fn test_height_bound_after_removals() {
    let mut map = AvlMap::new();
    for key in 0..4_096u32 {
        map.insert(key, ());
    }
    // removing every other key leaves many nodes with a single child
    for key in (0..4_096u32).filter(|key| key % 2 == 0) {
        map.remove(&key);
    }
    assert_eq!(map.len(), 2_048);
    assert!((map.height() as f64) <= height_bound(map.len()));
    assert_eq!(map.validate(), Ok(()));
}

#[test]
fn test_overwrite_keeps_structure() {
    let mut rng = seeded_rng();
    let mut map = AvlMap::new();
    for _ in 0..1_000 {
        map.insert(rng.gen_range(0u32, 10_000), 0u32);
    }
    let keys: Vec<u32> = map.iter().map(|(key, _)| *key).collect();
    let height = map.height();

    for &key in &keys {
        assert_eq!(map.insert(key, key), Some(0));
    }

    assert_eq!(map.height(), height);
    assert_eq!(map.len(), keys.len());
    assert_eq!(map.validate(), Ok(()));
    assert!(map.iter().all(|(key, value)| key == value));
}

#[test]
fn test_remove_from_empty() {
    let mut map: AvlMap<u32, u32> = AvlMap::new();
    assert_eq!(map.remove(&0), None);
    assert!(map.is_empty());
    assert_eq!(map.validate(), Ok(()));
}

#[test]
fn test_random_set_operations_match_btreeset() {
    let mut rng = seeded_rng();
    let mut set = AvlSet::new();
    let mut expected = BTreeSet::new();

    for _ in 0..10_000 {
        let key = rng.gen_range(0i64, 256);
        if rng.gen_weighted_bool(3) {
            assert_eq!(set.remove(&key), expected.take(&key));
        } else {
            assert_eq!(set.insert(key), expected.insert(key));
        }
    }

    assert_eq!(set.validate(), Ok(()));
    assert!(set.iter().eq(expected.iter()));
}
