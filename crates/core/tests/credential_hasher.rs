use std::collections::HashSet;
use std::sync::Arc;

use credhash_config::HasherConfig;
use credhash_core::{
    CredentialAccount, CredentialHasher, HashFormat, HasherError, HasherSettings, LegacyScheme,
    StoredHash, hash_password, verify_password,
};
use credhash_errors::AppError;
use mockall::mock;

mock! {
    pub Legacy {}

    impl LegacyScheme for Legacy {
        fn check_password(&self, plaintext: &[u8], stored: &str) -> bool;
        fn encode(&self, plaintext: &[u8]) -> String;
    }
}

const LEGACY_MD5: &str = "5f4dcc3b5aa765d61d8327deb882cf99";

fn silent_legacy() -> MockLegacy {
    let mut legacy = MockLegacy::new();
    legacy.expect_check_password().never();
    legacy.expect_encode().never();
    legacy
}

fn hasher_with(work_factor: u32, legacy: MockLegacy) -> CredentialHasher<MockLegacy> {
    let config = HasherConfig {
        use_slow_hash: true,
        hash_work_factor: work_factor,
    };
    CredentialHasher::install(&config, legacy).expect("slow hash should be installed")
}

struct User {
    username: String,
    password: String,
}

impl CredentialAccount for User {
    fn password_hash(&self) -> &str {
        &self.password
    }

    fn set_password_hash(&mut self, hash: StoredHash) {
        self.password = hash.into_inner();
    }
}

#[test]
fn test_round_trip_for_assorted_credentials() {
    let legacy = silent_legacy();
    let long = "x".repeat(100);
    for plaintext in ["", "a", "Test1234!", "пароль-密码", long.as_str()] {
        let stored = hash_password(plaintext, 4).unwrap();
        assert!(
            verify_password(plaintext, stored.as_str(), &legacy).unwrap(),
            "{plaintext:?} should verify"
        );
    }
}

#[test]
fn test_different_credential_is_rejected() {
    let legacy = silent_legacy();
    let stored = hash_password("correct horse", 4).unwrap();
    for other in ["correct horse ", "Correct horse", "", "battery staple"] {
        assert!(!verify_password(other, stored.as_str(), &legacy).unwrap());
    }
}

#[test]
fn test_same_credential_hashes_differently_and_both_verify() {
    let hasher = hasher_with(4, silent_legacy());
    let first = hasher.hash("Test1234!").unwrap();
    let second = hasher.hash("Test1234!").unwrap();

    assert_ne!(first, second);
    assert!(hasher.verify("Test1234!", first.as_str()).unwrap());
    assert!(hasher.verify("Test1234!", second.as_str()).unwrap());
}

#[test]
fn test_work_factor_change_keeps_old_hashes_valid() {
    let hasher = hasher_with(10, silent_legacy());
    let stored = hasher.hash("Test1234!").unwrap();

    hasher.settings().set_work_factor(14);
    assert!(hasher.verify("Test1234!", stored.as_str()).unwrap());
    assert!(!hasher.verify("Test1234?", stored.as_str()).unwrap());
    assert!(matches!(
        stored.format().unwrap(),
        HashFormat::Bcrypt { work_factor, .. } if work_factor.get() == 10
    ));
}

#[test]
fn test_legacy_value_goes_to_legacy_verifier() {
    let mut legacy = MockLegacy::new();
    legacy
        .expect_check_password()
        .times(1)
        .returning(|plaintext, stored| plaintext == b"password" && stored == LEGACY_MD5);
    legacy.expect_encode().never();

    let hasher = hasher_with(4, legacy);
    assert!(hasher.verify("password", LEGACY_MD5).unwrap());
}

#[test]
fn test_legacy_verifier_answer_is_returned() {
    let mut legacy = MockLegacy::new();
    legacy.expect_check_password().times(2).return_const(false);
    legacy.expect_encode().never();

    let hasher = hasher_with(4, legacy);
    assert!(!hasher.verify("password", LEGACY_MD5).unwrap());
    assert!(!hasher.verify("password", "sha1$a1976$a36cc8cbf81742a8fb52e221aaeab48ed7f58ab4").unwrap());
}

#[test]
fn test_empty_stored_value_is_malformed() {
    let hasher = hasher_with(4, silent_legacy());
    let err = hasher.verify("password", "").unwrap_err();
    assert!(matches!(err, HasherError::MalformedHash(_)));
}

#[test]
fn test_no_credential_rejects_everything() {
    let hasher = hasher_with(4, silent_legacy());
    let mut user = User {
        username: "lamby".to_string(),
        password: LEGACY_MD5.to_string(),
    };

    hasher.set_password(&mut user, None::<&str>).unwrap();
    for plaintext in ["", " ", "password", "!", "$2a$04$"] {
        assert!(
            !hasher.check_password(&user, plaintext).unwrap(),
            "{} must not log in with {plaintext:?}",
            user.username
        );
    }
}

#[test]
fn test_invalid_work_factor_is_configuration_error() {
    for work_factor in [0, 3, 21, 32, 100] {
        let hasher = CredentialHasher::new(
            Arc::new(HasherSettings::new(true, work_factor)),
            silent_legacy(),
        );
        let err = hasher.hash("Test1234!").unwrap_err();
        assert!(err.is_configuration(), "work factor {work_factor}");
        assert!(matches!(AppError::from(err), AppError::Configuration(_)));
    }
}

#[test]
fn test_malformed_and_wrong_password_look_the_same_to_clients() {
    let hasher = hasher_with(4, silent_legacy());
    let stored = hasher.hash("Test1234!").unwrap();
    assert!(!hasher.verify("wrong", stored.as_str()).unwrap());

    let wrong_password = AppError::unauthorized(credhash_core::INVALID_CREDENTIALS);
    let malformed: AppError = hasher.verify("wrong", "$2a$05$broken").unwrap_err().into();
    assert_eq!(malformed.to_string(), wrong_password.to_string());
    assert_eq!(malformed.status_code(), 401);

    let body = serde_json::to_value(malformed.to_problem_details()).unwrap();
    assert_eq!(
        body,
        serde_json::to_value(wrong_password.to_problem_details()).unwrap()
    );
    assert_eq!(body["title"], "Unauthorized");
}

#[test]
fn test_lazy_migration_on_login() {
    let mut legacy = MockLegacy::new();
    legacy
        .expect_check_password()
        .times(1)
        .returning(|plaintext, stored| plaintext == b"password" && stored == LEGACY_MD5);
    legacy.expect_encode().never();

    let hasher = hasher_with(4, legacy);
    let mut user = User {
        username: "lamby".to_string(),
        password: LEGACY_MD5.to_string(),
    };

    assert!(hasher.verify_and_upgrade(&mut user, "password").unwrap());
    assert!(user.password.starts_with("$2a$04$"));
    // 升级后不再经过旧算法
    assert!(hasher.check_password(&user, "password").unwrap());
}

#[test]
fn test_concurrent_hashing_is_independent() {
    let hasher = hasher_with(4, silent_legacy());

    let hashes: Vec<StoredHash> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let hasher = &hasher;
                scope.spawn(move || {
                    let plaintext = format!("password-{}", i % 2);
                    let stored = hasher.hash(&plaintext).unwrap();
                    assert!(hasher.verify(&plaintext, stored.as_str()).unwrap());
                    stored
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let unique: HashSet<_> = hashes.iter().collect();
    assert_eq!(unique.len(), hashes.len());
}
