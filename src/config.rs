/// 配置管理模組
///
/// 本模組負責加載、驗證和管理系統配置。
/// 支持從開發、測試和生產三種環境中加載不同的配置。
// 宣告子模組
pub mod loader;
pub mod manager;
pub mod types;
pub mod validation;

// 重新導出常用組件
pub use loader::{ConfigLoader, Environment};
pub use manager::{get_config, init_config};
pub use types::*;
pub use validation::{validate_config, ValidationError, ValidationUtils, Validator};

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serial_test::serial;
    use std::path::Path;

    /// 專案內附的各環境配置檔都必須能載入並通過驗證
    #[rstest]
    #[case(Environment::Development, 5555)]
    #[case(Environment::Test, 5556)]
    #[case(Environment::Production, 5555)]
    #[serial]
    fn test_bundled_config_files_are_valid(#[case] env: Environment, #[case] port: u16) {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("config");
        let source = ConfigLoader::load_from_dir(env, dir).unwrap();
        let config = ApplicationConfig::from_source(source).unwrap();

        assert!(validate_config(&config).is_ok());
        assert_eq!(config.server.port, port);
    }

    #[test]
    #[serial]
    fn test_test_environment_uses_in_memory_database() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("config");
        let source = ConfigLoader::load_from_dir(Environment::Test, dir).unwrap();
        let config = ApplicationConfig::from_source(source).unwrap();

        assert!(config.database.is_in_memory());
    }
}
