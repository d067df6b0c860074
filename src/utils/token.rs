use rand::{rngs::OsRng, Rng};

/// Numeric one-time code of `length` digits drawn from the OS RNG.
pub fn generate_otp_code(length: usize) -> String {
    let mut rng = OsRng;
    (0..length)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_numeric_with_requested_length() {
        for length in [1, 6, 8] {
            let code = generate_otp_code(length);
            assert_eq!(code.len(), length);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
