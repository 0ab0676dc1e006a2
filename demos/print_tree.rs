use std::fmt::Display;

use avl_index::{AvlIndex, NodeRef};

const INDENT: usize = 10;

// Prints the tree rotated a quarter turn: the right subtree above, the left below.
fn print_tree<V: Display>(index: &AvlIndex<V>) {
    if let Some(root) = index.root() {
        print_node(root, 0, "");
    }
}

fn print_node<V: Display>(node: NodeRef<'_, V>, depth: usize, prefix: &str) {
    if let Some(right) = node.right() {
        print_node(right, depth + 1, "/");
    }
    println!();
    println!(
        "{:indent$}{}{} ({})",
        "",
        prefix,
        node.key(),
        node.value(),
        indent = depth * INDENT
    );
    if let Some(left) = node.left() {
        print_node(left, depth + 1, "\\");
    }
}

fn main() {
    env_logger::init();

    let mut index = AvlIndex::new();
    for key in 0..=500 {
        index.insert(key, format!("Value{key}"));
    }
    println!("Tree after insertion:");
    print_tree(&index);

    index.update(30, String::from("UpdatedValue30"));
    println!("\nTree after updating key 30:");
    print_tree(&index);

    for key in 100..=300 {
        index.remove(key);
    }
    println!("\nTree after deleting keys 100 to 300:");
    print_tree(&index);

    let required = 2;
    println!("\nFirst {required} entries in the tree:");
    for (key, value) in index.bounded_in_order(required) {
        println!("{key} ({value})");
    }

    for key in [300, 400] {
        match index.get(key) {
            Some(value) => println!("\nValue of node with key {key}: {value}"),
            None => println!("\nNo node with key {key}"),
        }
    }

    println!("\nIs the AVL tree balanced? {}", index.is_balanced());
}
