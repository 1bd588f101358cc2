#![cfg(test)]

// Property tests for QuadraticMap slot accounting, kept inside the crate so
// they can count slots by state.

use crate::hash::{hash_function_1, hash_function_2, HashFn};
use crate::prime::is_prime;
use crate::quadratic::QuadraticMap;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations: indices shrink to earlier keys, the pool shrinks,
// and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Put(usize, i32),
    Remove(usize),
    Get(usize),
    Resize(usize),
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-d]{0,4}", 1..=12).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Put(i, v)),
            3 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Get),
            1 => (0usize..40).prop_map(OpI::Resize),
            1 => Just(OpI::Clear),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn collide(_: &str) -> u64 {
    0
}

fn hasher_for(choice: u8) -> HashFn {
    match choice {
        0 => hash_function_1,
        1 => hash_function_2,
        // Everything collides: longest probe walks and most tombstone reuse.
        _ => collide,
    }
}

// Property: slot bookkeeping under random put/remove/resize/clear.
// Invariants exercised after every op:
// - len equals the number of Occupied slots; the three states sum to capacity.
// - empty_buckets counts Empty slots only.
// - capacity is prime.
// - The distinct keys in the export are exactly the keys whose last op was a
//   put (duplicate live slots may exist, missing keys may not).
// - A removed or never-inserted key reads as None.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_slot_accounting(
        (pool, ops) in arb_scenario(),
        hasher in 0u8..3,
        initial in 0usize..12,
    ) {
        let mut sut: QuadraticMap<i32> = QuadraticMap::new(initial, hasher_for(hasher));
        let mut model: HashMap<String, i32> = HashMap::new();

        for op in ops {
            match op {
                OpI::Put(i, v) => {
                    sut.put(&pool[i], v);
                    model.insert(pool[i].clone(), v);
                    prop_assert!(sut.table_load() <= 0.5 + 1.0 / sut.capacity() as f64);
                }
                OpI::Remove(i) => {
                    sut.remove(&pool[i]);
                    model.remove(&pool[i]);
                    prop_assert_eq!(sut.get(&pool[i]), None);
                }
                OpI::Get(i) => {
                    if !model.contains_key(&pool[i]) {
                        prop_assert_eq!(sut.get(&pool[i]), None);
                    }
                }
                OpI::Resize(n) => {
                    let before = sut.capacity();
                    match sut.resize_table(n) {
                        Ok(()) => prop_assert!(sut.capacity() >= n),
                        Err(_) => prop_assert_eq!(sut.capacity(), before),
                    }
                }
                OpI::Clear => {
                    sut.clear();
                    model.clear();
                    prop_assert_eq!(sut.empty_buckets(), sut.capacity());
                }
            }

            let (empty, tombstones, occupied) = sut.slot_census();
            prop_assert_eq!(sut.len(), occupied);
            prop_assert_eq!(empty + tombstones + occupied, sut.capacity());
            prop_assert_eq!(sut.empty_buckets(), empty);
            prop_assert!(is_prime(sut.capacity()));

            let exported: BTreeSet<String> =
                sut.get_keys_and_values().into_iter().map(|(k, _)| k).collect();
            let expected: BTreeSet<String> = model.keys().cloned().collect();
            prop_assert_eq!(exported, expected);
            prop_assert!(sut.len() >= model.len());
        }
    }
}
