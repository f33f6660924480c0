use rand::distr::Alphanumeric;
use rand::{rng, Rng};

/// Random token for email verification links.
pub fn generate_verification_token() -> String {
    let mut rng = rng();
    (0..32).map(|_| rng.sample(Alphanumeric) as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_32_alphanumeric_chars() {
        let token = generate_verification_token();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn tokens_are_unique_enough() {
        assert_ne!(
            generate_verification_token(),
            generate_verification_token()
        );
    }
}
