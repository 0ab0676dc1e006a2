use avl_index::AvlIndex;

fn main() {
    env_logger::init();

    let mut index = AvlIndex::new();
    index.insert(0, "zero");
    index.insert(1, "one");
    index.insert(2, "two");
    index.insert(2, "deux");
    index.insert(3, "three");
    index.insert(4, "four");
    index.insert(5, "five");
    assert_eq!(index.get(2), Some(&"two"));
    index.update(2, "deux");
    assert_eq!(index.get(2), Some(&"deux"));
    index.remove(1);
    assert!(index.get(1).is_none());
    assert!(index.is_balanced());

    for (k, v) in &index {
        println!("{k} => {v}");
    }
    println!("first two: {:?}", index.bounded_in_order(2));
}
