use rand::Rng;

/// Primary keys for users, forms and responses: 128 random bits.
pub fn generate_id() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    hex::encode(bytes)
}

/// Public share identifiers: 80 random bits, short enough for a link.
pub fn generate_share_id() -> String {
    let bytes: [u8; 10] = rand::rng().random();
    hex::encode(bytes)
}

/// Password reset tokens: 256 random bits.
pub fn generate_reset_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_have_expected_width() {
        assert_eq!(generate_id().len(), 32);
        assert_eq!(generate_share_id().len(), 20);
        assert_eq!(generate_reset_token().len(), 64);
        assert!(generate_id().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn share_ids_do_not_repeat() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_share_id()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
