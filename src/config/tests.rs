#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.default_docker_config, PathBuf::from("/"));
        assert!(config.helper_dirs.is_empty());
    }

    #[test]
    fn test_parse_toml_config() {
        let config: Config = toml::from_str(
            r#"
            default_docker_config = "/etc/docker"
            helper_dirs = ["/opt/helpers"]
            "#,
        )
        .unwrap();
        assert_eq!(config.default_docker_config, PathBuf::from("/etc/docker"));
        assert_eq!(config.helper_dirs, vec![PathBuf::from("/opt/helpers")]);

        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.default_docker_config, PathBuf::from("/"));
    }

    #[test]
    fn test_load_from_missing_file() {
        let tmp_dir = tempfile::TempDir::new().unwrap();
        let config = Config::load_from(&tmp_dir.path().join("config.toml")).unwrap();
        assert_eq!(config.default_docker_config, PathBuf::from("/"));
    }

    #[test]
    fn test_broken_config_falls_back_to_defaults() {
        let tmp_dir = tempfile::TempDir::new().unwrap();
        let config_path = tmp_dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            "default_docker_config = [not toml\nhelper_dirs = [\"/opt/helpers\"]",
        )
        .unwrap();

        let loaded = Config::load_from(&config_path);
        assert!(loaded.is_err());

        let config = Config::or_default(loaded);
        assert_eq!(config.default_docker_config, PathBuf::from("/"));
        assert!(config.helper_dirs.is_empty());
    }

    #[test]
    fn test_docker_config_dir_prefers_env() {
        let config = Config::default();
        let env = Env {
            docker_config: Some(PathBuf::from("/home/me/.docker")),
            ..Default::default()
        };
        assert_eq!(config.docker_config_dir(&env), PathBuf::from("/home/me/.docker"));
    }

    #[test]
    fn test_docker_config_dir_ignores_empty_env() {
        let config = Config::default();
        let env = Env {
            docker_config: Some(PathBuf::new()),
            ..Default::default()
        };
        assert_eq!(config.docker_config_dir(&env), PathBuf::from("/"));
        assert_eq!(config.docker_config_dir(&Env::default()), PathBuf::from("/"));
    }

    #[cfg(unix)]
    #[test]
    fn test_helper_search_path() {
        let env = Env {
            path: Some(OsString::from("/usr/bin:/bin")),
            ..Default::default()
        };

        let config = Config::default();
        assert_eq!(config.helper_search_path(&env), Some(OsString::from("/usr/bin:/bin")));

        let config = Config {
            helper_dirs: vec![PathBuf::from("/opt/helpers")],
            ..Default::default()
        };
        assert_eq!(
            config.helper_search_path(&env),
            Some(OsString::from("/opt/helpers:/usr/bin:/bin"))
        );
        assert_eq!(
            config.helper_search_path(&Env::default()),
            Some(OsString::from("/opt/helpers"))
        );
    }
}
