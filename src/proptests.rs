use super::*;

use proptest::prelude::*;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
enum Op {
    Insert(Key, u32),
    Update(Key, u32),
    Remove(Key),
    Get(Key),
    Bounded(usize),
}

fn key_strategy() -> impl Strategy<Value = Key> + Clone {
    // A narrow domain so removals and duplicates actually hit.
    -256..256i32
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let key = key_strategy();
    let op = prop_oneof![
        40 => (key.clone(), any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        10 => (key.clone(), any::<u32>()).prop_map(|(k, v)| Op::Update(k, v)),
        30 => key.clone().prop_map(Op::Remove),
        15 => key.prop_map(Op::Get),
        5 => (0usize..64).prop_map(Op::Bounded),
    ];
    prop::collection::vec(op, 0..=1000)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in ops_strategy()) {
        let mut index: AvlIndex<u32> = AvlIndex::new();
        let mut model: BTreeMap<Key, u32> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    let inserted = index.insert(key, value);
                    let expected = !model.contains_key(&key);
                    model.entry(key).or_insert(value);
                    prop_assert_eq!(inserted, expected);
                }
                Op::Update(key, value) => {
                    let updated = index.update(key, value);
                    let expected = match model.get_mut(&key) {
                        Some(slot) => {
                            *slot = value;
                            true
                        }
                        None => false,
                    };
                    prop_assert_eq!(updated, expected);
                }
                Op::Remove(key) => {
                    prop_assert_eq!(index.remove(key), model.remove(&key));
                }
                Op::Get(key) => {
                    prop_assert_eq!(index.get(key), model.get(&key));
                }
                Op::Bounded(limit) => {
                    let got: Vec<(Key, u32)> =
                        index.bounded_in_order(limit).into_iter().map(|(k, v)| (k, *v)).collect();
                    let expected: Vec<(Key, u32)> =
                        model.iter().take(limit).map(|(k, v)| (*k, *v)).collect();
                    prop_assert_eq!(got, expected);
                }
            }

            prop_assert_eq!(index.len(), model.len());
            prop_assert!(index.is_balanced());
            prop_assert_eq!(index.validate(), Ok(()));
        }

        let got: Vec<(Key, u32)> = index.iter().map(|(k, v)| (k, *v)).collect();
        let expected: Vec<(Key, u32)> = model.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_insert_then_remove_subset(
        keys in prop::collection::hash_set(any::<Key>(), 0..500),
        seed in any::<u64>(),
    ) {
        use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

        let mut keys: Vec<Key> = keys.into_iter().collect();
        let mut index = AvlIndex::new();
        for &key in &keys {
            prop_assert!(index.insert(key, key.to_string()));
            prop_assert!(index.is_balanced());
        }
        prop_assert_eq!(index.validate(), Ok(()));

        let mut rng = StdRng::seed_from_u64(seed);
        keys.shuffle(&mut rng);
        let (removed, kept) = keys.split_at(keys.len() / 2);
        for &key in removed {
            prop_assert_eq!(index.remove(key), Some(key.to_string()));
            prop_assert!(index.is_balanced());
        }
        prop_assert_eq!(index.validate(), Ok(()));

        for &key in removed {
            prop_assert!(index.get(key).is_none());
        }
        for &key in kept {
            prop_assert_eq!(index.get(key), Some(&key.to_string()));
        }

        // 1.44 * log2(n + 2) bounds the height of any AVL tree
        let bound = 1.44 * ((index.len() + 2) as f64).log2();
        prop_assert!(index.height() as f64 <= bound.ceil());
    }
}
