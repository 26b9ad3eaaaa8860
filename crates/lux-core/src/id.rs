use rand::Rng;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random suffix.
pub const SUFFIX_LEN: usize = 9;

/// Build a record id of the form `<prefix>_<millis>_<9 base36 chars>`.
///
/// Unique in practice, not by construction: two ids minted in the same
/// millisecond collide with probability 36⁻⁹.
pub fn record_id(prefix: &str, millis: u64, rng: &mut impl Rng) -> String {
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();
    format!("{prefix}_{millis}_{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_shape() {
        let mut rng = SmallRng::seed_from_u64(7);
        let id = record_id("mem", 1_700_000_000_000, &mut rng);
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "mem");
        assert_eq!(parts[1], "1700000000000");
        assert_eq!(parts[2].len(), SUFFIX_LEN);
        assert!(parts[2].bytes().all(|b| BASE36.contains(&b)));
    }

    #[test]
    fn test_distinct_within_same_millis() {
        let mut rng = SmallRng::seed_from_u64(7);
        let a = record_id("light", 5, &mut rng);
        let b = record_id("light", 5, &mut rng);
        assert_ne!(a, b);
    }
}
