pub use anyhow::{Error, Result, anyhow, bail};

/// Creates a new collision-resistant identifier.
pub fn create_id() -> String {
    cuid2::create_id()
}

/// Returns the last `n` characters of an identifier, upper-cased.
///
/// Used wherever a short human-readable reference is shown for a longer id.
pub fn short_ref(id: &str, n: usize) -> String {
    let count = id.chars().count();
    id.chars()
        .skip(count.saturating_sub(n))
        .collect::<String>()
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        assert_ne!(create_id(), create_id());
    }

    #[test]
    fn short_ref_takes_tail() {
        assert_eq!(short_ref("cs_test_a1b2c3d4e5f6", 8), "C3D4E5F6");
        assert_eq!(short_ref("abc", 8), "ABC");
    }
}
