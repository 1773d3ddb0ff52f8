//! Domain factories for creating domain entities and value objects.

use rand::{RngCore, rngs::OsRng};

use super::TrackingId;

/// Entropy of a generated tracking ID, in bytes.
pub const TRACKING_ID_BYTES: usize = 16;

/// Factory for generating TrackingId instances.
///
/// Tracking IDs are drawn from the operating system's CSPRNG; store-level
/// uniqueness constraints are the only collision safeguard.
pub struct TrackingIdFactory;

impl TrackingIdFactory {
    /// Generate a new TrackingId: 128 random bits rendered as 32 lowercase hex characters.
    ///
    /// # Panics
    ///
    /// Panics if the operating system's random source fails. There is no
    /// fallback to a weaker generator.
    pub fn generate() -> TrackingId {
        let mut bytes = [0u8; TRACKING_ID_BYTES];
        OsRng.fill_bytes(&mut bytes);
        TrackingId::from_generated(hex::encode(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tracking_id_factory_generate() {
        // テスト項目: 32 文字の 16 進文字列が生成される
        // when (操作):
        let tracking_id = TrackingIdFactory::generate();

        // then (期待する結果):
        let id_str = tracking_id.as_str();
        assert_eq!(id_str.len(), 32);
        assert!(
            id_str
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
        );
    }

    #[test]
    fn test_tracking_id_factory_generate_uniqueness() {
        // テスト項目: generate() は毎回異なる ID を生成する
        // when (操作):
        let ids: HashSet<_> = (0..1000).map(|_| TrackingIdFactory::generate()).collect();

        // then (期待する結果):
        assert_eq!(ids.len(), 1000);
    }
}
