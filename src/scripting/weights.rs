//! Weighted random choice
//!
//! Cumulative-weight selection over a script-supplied table of
//! `path -> weight`.

use rand::Rng;

/// Ordered `(choice, weight)` pairs
pub type Weights = Vec<(String, u32)>;

/// Sum of all weights, widened so large script tables cannot overflow
pub fn total_weight(weights: &[(String, u32)]) -> u64 {
    weights.iter().map(|(_, w)| u64::from(*w)).sum()
}

/// Pick with an explicit draw in `1..=total`. Returns the first entry whose
/// cumulative weight reaches the draw, or an empty string.
pub fn pick_with_draw(weights: &[(String, u32)], draw: u64) -> String {
    let mut cumulative = 0u64;
    for (choice, weight) in weights {
        cumulative += u64::from(*weight);
        if draw <= cumulative {
            return choice.clone();
        }
    }
    String::new()
}

/// Draw uniformly and pick. Empty or all-zero tables yield `""` (no spawn).
pub fn pick_weighted(weights: &[(String, u32)], rng: &mut impl Rng) -> String {
    let total = total_weight(weights);
    if total == 0 {
        return String::new();
    }
    pick_with_draw(weights, rng.gen_range(1..=total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn table() -> Weights {
        vec![("a".to_string(), 1), ("b".to_string(), 3)]
    }

    #[test]
    fn test_forced_draws() {
        assert_eq!(pick_with_draw(&table(), 1), "a");
        assert_eq!(pick_with_draw(&table(), 2), "b");
        assert_eq!(pick_with_draw(&table(), 4), "b");
    }

    #[test]
    fn test_empty_and_zero_tables() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(pick_weighted(&[], &mut rng), "");
        let zeros = vec![("a".to_string(), 0), ("b".to_string(), 0)];
        assert_eq!(pick_weighted(&zeros, &mut rng), "");
    }

    #[test]
    fn test_zero_weight_entry_never_chosen() {
        let mut rng = StdRng::seed_from_u64(5);
        let weights = vec![("never".to_string(), 0), ("always".to_string(), 2)];
        for _ in 0..50 {
            assert_eq!(pick_weighted(&weights, &mut rng), "always");
        }
    }

    #[test]
    fn test_huge_weights_do_not_overflow() {
        let weights = vec![("a".to_string(), 3_000_000_000), ("b".to_string(), 3_000_000_000)];
        assert_eq!(total_weight(&weights), 6_000_000_000);
        assert_eq!(pick_with_draw(&weights, 3_000_000_001), "b");

        let mut rng = StdRng::seed_from_u64(9);
        let picked = pick_weighted(&weights, &mut rng);
        assert!(picked == "a" || picked == "b");
    }
}
