use std::sync::{Arc, Mutex, RwLock};
use std::thread;

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

use skiplist::{SkipList, SkipListError, MAX_LEVEL};

fn bytes(s: &str) -> Vec<u8> {
    s.as_bytes().to_vec()
}

struct Case {
    name: &'static str,
    inserts: Vec<(&'static str, &'static str)>,
    searches: Vec<(&'static str, Option<&'static str>)>,
}

#[test]
fn insert_and_search() {
    let cases = vec![
        Case {
            name: "with 1 pair, key found",
            inserts: vec![("foo", "bar")],
            searches: vec![("foo", Some("bar")), ("baz", None)],
        },
        Case {
            name: "with 2 sequential pairs",
            inserts: vec![("a", "b"), ("c", "d")],
            searches: vec![("a", Some("b")), ("c", Some("d")), ("b", None)],
        },
        Case {
            name: "with overwritten key",
            inserts: vec![("k", "v1"), ("j", "x"), ("k", "v2")],
            searches: vec![("k", Some("v2")), ("j", Some("x"))],
        },
        Case {
            name: "with empty key and value",
            inserts: vec![("", ""), ("a", "")],
            searches: vec![("", Some("")), ("a", Some("")), ("b", None)],
        },
    ];
    for case in cases {
        let mut list = SkipList::new(2).unwrap();
        for &(k, v) in &case.inserts {
            list.insert(bytes(k), bytes(v));
        }
        for &(k, expected) in &case.searches {
            assert_eq!(
                list.search(&bytes(k)),
                expected.map(bytes).as_ref(),
                "{}: search({:?})",
                case.name,
                k
            );
        }
    }
}

#[test]
fn level_zero_chain_order() {
    let mut list = SkipList::new(2).unwrap();
    list.insert(bytes("a"), bytes("b"));
    list.insert(bytes("c"), bytes("d"));
    let keys: Vec<_> = list.iter().map(|(k, _)| k.clone()).collect();
    assert_eq!(keys, vec![bytes("a"), bytes("c")]);
    assert_eq!(list.search(&bytes("a")), Some(&bytes("b")));
}

#[test]
fn integer_key_delete() {
    let mut list = SkipList::new(8).unwrap();
    list.insert(1u64, bytes("testing"));
    assert_eq!(list.iter().next(), Some((&1, &bytes("testing"))));
    assert!(list.delete(&1));
    assert_eq!(list.search(&1), None);
    assert!(!list.delete(&1));
    assert!(list.is_empty());
}

#[test]
fn duplicates_overwrite() {
    let mut list = SkipList::new(8).unwrap();
    assert_eq!(list.insert(bytes("dup"), bytes("first")), None);
    assert_eq!(list.insert(bytes("dup"), bytes("second")), Some(bytes("first")));
    assert_eq!(list.search(&bytes("dup")), Some(&bytes("second")));
    assert_eq!(list.iter().filter(|(k, _)| **k == bytes("dup")).count(), 1);
    assert_eq!(list.len(), 1);
}

#[test]
fn round_trip_random_keys() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut list = SkipList::new(12).unwrap();
    let mut pairs = vec![];
    for _ in 0..1000 {
        let key: Vec<u8> = (0..rng.gen_range(1..16)).map(|_| rng.gen()).collect();
        let value: Vec<u8> = (0..rng.gen_range(0..32)).map(|_| rng.gen()).collect();
        list.insert(key.clone(), value.clone());
        pairs.push((key, value));
    }
    // later inserts of the same key win
    for (i, (key, value)) in pairs.iter().enumerate() {
        if pairs[i + 1..].iter().all(|(k, _)| k != key) {
            assert_eq!(list.search(key), Some(value));
        }
    }
    let keys: Vec<_> = list.iter().map(|(k, _)| k).collect();
    assert!(keys.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn delete_then_reinsert() {
    let mut list = SkipList::new(6).unwrap();
    list.extend((0..200u32).map(|i| (i, i)));
    for i in (0..200).filter(|i| i % 3 == 0) {
        assert!(list.delete(&i));
    }
    for i in 0..200 {
        assert_eq!(list.contains_key(&i), i % 3 != 0);
    }
    for i in (0..200).filter(|i| i % 3 == 0) {
        assert_eq!(list.insert(i, i + 1), None);
    }
    assert_eq!(list.len(), 200);
    assert_eq!(list.search(&9), Some(&10));
    assert_eq!(list.search(&10), Some(&10));
}

#[test]
fn remove_returns_value() {
    let mut list = SkipList::new(4).unwrap();
    list.insert("key", 42);
    assert_eq!(list.remove(&"key"), Some(42));
    assert_eq!(list.remove(&"key"), None);
}

#[test]
fn zero_max_level_rejected() {
    match SkipList::<u32, u32>::new(0) {
        Err(SkipListError::InvalidMaxLevel(0)) => (),
        Err(e) => panic!("Expected InvalidMaxLevel, got {}", e),
        Ok(_) => panic!("Expected InvalidMaxLevel"),
    }
}

#[test]
fn huge_max_level_rejected() {
    let huge = usize::max_value() / 2;
    match SkipList::<u32, u32>::new(huge) {
        Err(SkipListError::InvalidMaxLevel(n)) => assert_eq!(n, huge),
        Err(e) => panic!("Expected InvalidMaxLevel, got {}", e),
        Ok(_) => panic!("Expected InvalidMaxLevel"),
    }
    assert_eq!(SkipList::<u32, u32>::new(MAX_LEVEL).unwrap().max_level(), MAX_LEVEL);
}

#[test]
fn shared_behind_mutex() {
    let list = Arc::new(Mutex::new(SkipList::new(10).unwrap()));
    let handles: Vec<_> = (0..4u32)
        .map(|t| {
            let list = list.clone();
            thread::spawn(move || {
                for i in 0..250 {
                    list.lock().unwrap().insert(t * 1000 + i, t);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    let list = list.lock().unwrap();
    assert_eq!(list.len(), 1000);
    assert_eq!(list.search(&3249), Some(&3));
}

#[test]
fn concurrent_readers() {
    let mut list = SkipList::new(8).unwrap();
    list.extend((0..500u32).map(|i| (i, i * 2)));
    let list = Arc::new(RwLock::new(list));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let list = list.clone();
            thread::spawn(move || {
                let list = list.read().unwrap();
                (0..500u32).all(|i| list.search(&i) == Some(&(i * 2)))
            })
        })
        .collect();
    for h in handles {
        assert!(h.join().unwrap());
    }
}

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn shareable_between_threads() {
    // `RwLock<T>` is only `Sync` when `T` is `Send + Sync`, which needs the boxed `RandomSource`
    // inside the default generator to be both
    assert_send_sync::<SkipList<u32, u32>>();
    assert_send_sync::<RwLock<SkipList<Vec<u8>, Vec<u8>>>>();
}
