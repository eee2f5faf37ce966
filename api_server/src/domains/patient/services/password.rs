use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::password_hash::{rand_core::OsRng, SaltString};
use crate::shared::errors::PatientError;

/// 비밀번호 해싱 (argon2, 랜덤 salt, PHC 문자열)
/// Hash a password into a PHC string
pub fn hash_password(password: &str) -> Result<String, PatientError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PatientError::PasswordHashingFailed(format!("Failed to hash password: {}", e)))?
        .to_string();

    Ok(password_hash)
}

/// 비밀번호 검증; 불일치 시 InvalidCredentials
pub fn verify_password(password: &str, password_hash: &str) -> Result<(), PatientError> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| PatientError::PasswordVerificationFailed(format!("Invalid password hash: {}", e)))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| PatientError::InvalidCredentials)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("Passw0rd!").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(!hash.contains("Passw0rd!"));

        assert!(verify_password("Passw0rd!", &hash).is_ok());
        assert!(matches!(
            verify_password("Passw0rd?", &hash),
            Err(PatientError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("Passw0rd!").unwrap();
        let b = hash_password("Passw0rd!").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_corrupt_hash_is_internal_error() {
        assert!(matches!(
            verify_password("Passw0rd!", "not-a-phc-string"),
            Err(PatientError::PasswordVerificationFailed(_))
        ));
    }
}
