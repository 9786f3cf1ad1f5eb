//! Examples of using the radix map
use radix_pattern::{PatternOptions, RadixMap};

fn main() {
    // Create a map and insert some values
    let mut map = RadixMap::new();
    map.set("cat", 1).set("car", 2).set("dog", 3);

    // Check values
    assert_eq!(map.get("car"), Some(&2));
    assert_eq!(map.get("cow"), None);

    // Keys under a prefix, in insertion order
    for (key, value) in map.entries("ca") {
        println!("{} => {}", key, value);
    }

    // The key set as a compact pattern
    println!("pattern: {}", map);

    let regex = match map.to_pattern(&PatternOptions::new().anchored(true)) {
        Ok(regex) => regex,
        Err(err) => {
            eprintln!("{}", err);
            return;
        }
    };
    for word in &["cat", "cart", "dog"] {
        println!("{:>5}: {}", word, regex.is_match(word));
    }
}

#[test]
fn test_prefix_view() {
    let mut map = RadixMap::new();
    map.set("hello", 1).set("help", 2).set("world", 3);

    // Create a view of the "hel" prefix
    let view = map.starts_with("hel").unwrap();

    assert_eq!(view.len(), 2);
    assert_eq!(view.keys().collect::<Vec<_>>(), vec!["hello", "help"]);
    assert_eq!(view.pattern(), "hel(lo|p)");
}
