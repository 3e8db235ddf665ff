use credhash_config::{ConfigError, ENV_KEYS, HasherConfig};
use figment::Jail;

/// dotenvy 直接写进程环境，先让 jail 登记这些变量，结束时一并恢复
fn isolate_env(jail: &mut Jail) {
    for key in ENV_KEYS {
        jail.set_env(key, "");
    }
    jail.clear_env();
}

#[test]
fn test_dotenv_file_feeds_hasher_config() {
    Jail::expect_with(|jail| {
        isolate_env(jail);
        jail.create_file(".env", "USE_SLOW_HASH=false\nHASH_WORK_FACTOR=9\n")?;

        let env_file = jail.directory().join(".env");
        let config = HasherConfig::from_env_with_dotenv(Some(&env_file))
            .expect(".env should load");
        assert!(!config.use_slow_hash);
        assert_eq!(config.hash_work_factor, 9);
        Ok(())
    });
}

#[test]
fn test_dotenv_is_found_from_current_directory() {
    Jail::expect_with(|jail| {
        isolate_env(jail);
        jail.create_file(".env", "HASH_WORK_FACTOR=7\n")?;

        let config = HasherConfig::from_env_with_dotenv(None)
            .expect(".env should be found");
        assert!(config.use_slow_hash);
        assert_eq!(config.hash_work_factor, 7);
        Ok(())
    });
}

#[test]
fn test_existing_env_wins_over_dotenv() {
    Jail::expect_with(|jail| {
        isolate_env(jail);
        jail.set_env("HASH_WORK_FACTOR", 14);
        jail.create_file(".env", "HASH_WORK_FACTOR=9\n")?;

        let env_file = jail.directory().join(".env");
        let config = HasherConfig::from_env_with_dotenv(Some(&env_file))
            .expect(".env should load");
        assert_eq!(config.hash_work_factor, 14);
        Ok(())
    });
}

#[test]
fn test_missing_dotenv_falls_back_to_defaults() {
    Jail::expect_with(|jail| {
        isolate_env(jail);

        let missing = jail.directory().join("missing.env");
        let config = HasherConfig::from_env_with_dotenv(Some(&missing))
            .expect("missing .env is ignored");
        assert_eq!(config, HasherConfig::default());
        Ok(())
    });
}

#[test]
fn test_unparsable_dotenv_is_an_error() {
    Jail::expect_with(|jail| {
        isolate_env(jail);
        jail.create_file(".env", ".HASH_WORK_FACTOR=9\n")?;

        let env_file = jail.directory().join(".env");
        let err = HasherConfig::from_env_with_dotenv(Some(&env_file)).unwrap_err();
        assert!(matches!(err, ConfigError::Dotenv(_)));
        Ok(())
    });
}
