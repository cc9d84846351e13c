use rand::Rng;

/// Generate a 4-digit numeric code (1000..=9999), used for both account
/// verification and password resets.
pub fn generate_code() -> String {
    rand::rng().random_range(1000..10000).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use enroll_types::models::valid_code;

    #[test]
    fn codes_are_four_digits() {
        for _ in 0..200 {
            let code = generate_code();
            assert!(valid_code(&code), "bad code {code}");
        }
    }
}
