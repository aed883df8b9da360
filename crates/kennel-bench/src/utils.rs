//! Benchmark utilities and helpers.

use kennel_common::RowId;
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const BREEDS: [&str; 12] = [
    "Labrador",
    "Beagle",
    "Bulldog",
    "Poodle",
    "Boxer",
    "Dachshund",
    "Husky",
    "Pug",
    "Chihuahua",
    "Rottweiler",
    "Doberman",
    "Shih Tzu",
];

/// Generates a random alphanumeric string.
pub fn random_string(rng: &mut StdRng, len: usize) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generates `count` distinct breed names in random order.
pub fn generate_breeds(count: usize) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count)
        .map(|i| format!("{}-{}", random_string(&mut rng, 6), i))
        .collect()
}

/// Generates `(breed, row id)` pairs drawing from a small set of common
/// breeds, so most keys repeat.
pub fn generate_entries(count: usize) -> Vec<(String, RowId)> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count as u64)
        .map(|i| {
            let breed = BREEDS[rng.gen_range(0..BREEDS.len())].to_string();
            (breed, RowId::new(100 + i))
        })
        .collect()
}

/// Builds dogs table text with `count` rows after the header.
pub fn generate_dogs_text(count: usize) -> String {
    let mut text = String::from("dog_id,breed,dog_name,owner_id");
    for (breed, id) in generate_entries(count) {
        text.push_str(&format!("\n{id},{breed},Dog{id},1"));
    }
    text
}

/// Builds one INSERT statement for the dogs table with `count` tuples, each
/// with a unique name.
pub fn generate_dogs_insert(count: usize) -> String {
    let tuples: Vec<String> = generate_entries(count)
        .into_iter()
        .enumerate()
        .map(|(i, (breed, _))| format!("('{breed}', 'Pup{i}', '{}')", i % 3 + 1))
        .collect();
    format!("INSERT INTO dogs VALUES {};", tuples.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_breeds_distinct() {
        let breeds = generate_breeds(50);
        let mut sorted = breeds.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 50);
    }

    #[test]
    fn test_generate_dogs_text_rows() {
        let text = generate_dogs_text(5);
        assert_eq!(text.lines().count(), 6);
        assert!(text.starts_with("dog_id,breed,dog_name,owner_id\n100,"));
    }

    #[test]
    fn test_generate_dogs_insert_tuples() {
        let sql = generate_dogs_insert(3);
        assert!(sql.starts_with("INSERT INTO dogs VALUES ('"));
        assert_eq!(sql.matches("('").count(), 3);
    }
}
