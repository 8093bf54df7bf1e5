//! bcrypt password hashing. The cost comes from `BCRYPT_COST`.

use crate::error::AppError;

/// Salted bcrypt hash of `password`. The cost and salt are embedded in the result.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    let hashed = bcrypt::hash(password, cost).map_err(|e| {
        AppError::InternalServerError(format!("Failed to hash password (cost {}): {}", cost, e))
    })?;
    Ok(hashed)
}

/// A stored hash bcrypt cannot parse is an error, not a mismatch.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AppError> {
    Ok(bcrypt::verify(password, stored_hash)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Cheapest cost bcrypt accepts.
    const TEST_COST: u32 = 4;

    #[test]
    fn test_hash_is_salted_and_verifies() {
        let first = hash_password("Password123!", TEST_COST).unwrap();
        let second = hash_password("Password123!", TEST_COST).unwrap();

        assert_ne!(first, second);
        assert!(first.starts_with("$2b$04$"));
        assert!(verify_password("Password123!", &first).unwrap());
        assert!(verify_password("Password123!", &second).unwrap());
        assert!(!verify_password("password123!", &first).unwrap());
    }

    #[test]
    fn test_out_of_range_cost_is_rejected() {
        match hash_password("Password123!", 3) {
            Err(AppError::InternalServerError(msg)) => assert!(msg.contains("cost 3")),
            other => panic!("expected InternalServerError, got {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_stored_hash() {
        assert!(matches!(
            verify_password("Password123!", "not-a-bcrypt-hash"),
            Err(AppError::InternalServerError(_))
        ));
    }
}
