use rand::Rng;

const ACCOUNT_NUMBER_RANGE: i64 = 1_000_000;

/// Pseudo-random account number in `[0, 1_000_000)`. Collisions are possible
/// and tolerated; the primary id is what identifies an account.
pub fn generate_account_number() -> i64 {
    rand::thread_rng().gen_range(0..ACCOUNT_NUMBER_RANGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_numbers_stay_in_range() {
        for _ in 0..1000 {
            let number = generate_account_number();
            assert!((0..ACCOUNT_NUMBER_RANGE).contains(&number));
        }
    }
}
