//! Configuration file loading tests using real files on disk.

use std::fs;

use staffgrid::db::{RepositoryConfig, RepositoryError, RepositoryType};

#[test]
fn test_config_loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("staffgrid.toml");
    fs::write(
        &path,
        r#"
[repository]
type = "local"

[database]
url = "postgres://planner@db/staffing"
max_connections = 4
"#,
    )
    .unwrap();

    let config = RepositoryConfig::from_file(&path).unwrap();
    assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);
    assert_eq!(config.database.url, "postgres://planner@db/staffing");
    assert_eq!(config.database.max_connections, 4);
}

#[test]
fn test_missing_database_section_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("staffgrid.toml");
    fs::write(&path, "[repository]\ntype = \"local\"\n").unwrap();

    let config = RepositoryConfig::from_file(&path).unwrap();
    assert_eq!(config.database.url, "");
    assert_eq!(config.database.max_connections, 10);
}

#[test]
fn test_missing_file_is_a_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.toml");

    let err = RepositoryConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, RepositoryError::ConfigurationError(_)));
}

#[test]
fn test_malformed_toml_is_a_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("staffgrid.toml");
    fs::write(&path, "[repository\ntype = local").unwrap();

    let err = RepositoryConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, RepositoryError::ConfigurationError(_)));
}
