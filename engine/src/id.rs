//! Identifier generation for members and transactions.

use uuid::Uuid;

/// Prefix for member identifiers.
pub const MEMBER_ID_PREFIX: &str = "MEM";

/// Prefix for transaction identifiers.
pub const TRANSACTION_ID_PREFIX: &str = "TXN";

pub(crate) const MEMBER_SUFFIX_LEN: usize = 8;
pub(crate) const TRANSACTION_SUFFIX_LEN: usize = 12;

/// Generate a prefixed identifier guaranteed not to collide with the
/// caller's key space.
///
/// The suffix is drawn from a v4 UUID; while `taken` reports a collision a
/// new suffix is drawn, so uniqueness is guaranteed rather than merely
/// probable.
pub fn fresh_id(prefix: &str, suffix_len: usize, taken: impl Fn(&str) -> bool) -> String {
    loop {
        let hex = Uuid::new_v4().simple().to_string().to_uppercase();
        let candidate = format!("{}-{}", prefix, &hex[..suffix_len]);
        if !taken(&candidate) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashSet;

    #[test]
    fn id_shape() {
        let id = fresh_id(MEMBER_ID_PREFIX, MEMBER_SUFFIX_LEN, |_| false);

        assert!(id.starts_with("MEM-"));
        assert_eq!(id.len(), "MEM-".len() + MEMBER_SUFFIX_LEN);
        assert!(id["MEM-".len()..]
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    }

    #[test]
    fn transaction_id_shape() {
        let id = fresh_id(TRANSACTION_ID_PREFIX, TRANSACTION_SUFFIX_LEN, |_| false);

        assert!(id.starts_with("TXN-"));
        assert_eq!(id.len(), "TXN-".len() + TRANSACTION_SUFFIX_LEN);
    }

    #[test]
    fn regenerates_on_collision() {
        let rejections = Cell::new(0);
        let id = fresh_id(MEMBER_ID_PREFIX, MEMBER_SUFFIX_LEN, |_| {
            // Reject the first three candidates
            if rejections.get() < 3 {
                rejections.set(rejections.get() + 1);
                true
            } else {
                false
            }
        });

        assert_eq!(rejections.get(), 3);
        assert!(id.starts_with("MEM-"));
    }

    #[test]
    fn ids_are_distinct() {
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(fresh_id(TRANSACTION_ID_PREFIX, TRANSACTION_SUFFIX_LEN, |_| false)));
        }
    }
}
