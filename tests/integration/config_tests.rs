use dupsift::config::{Config, ConfigError};
use dupsift::duplicates::DuplicateFinder;
use figment::Jail;
use std::fs;

#[test]
fn test_config_file_drives_scan() {
    Jail::expect_with(|jail| {
        let data = jail.directory().join("data");
        fs::create_dir_all(data.join("node_modules")).unwrap();
        fs::write(data.join("a.txt"), b"shared").unwrap();
        fs::write(data.join("b.txt"), b"shared").unwrap();
        fs::write(data.join("node_modules").join("c.txt"), b"shared").unwrap();
        fs::write(data.join("tiny1"), b"x").unwrap();
        fs::write(data.join("tiny2"), b"x").unwrap();

        jail.create_file(
            "dupsift.toml",
            r#"
                min_size = 2
                ignore_patterns = ["node_modules/"]
            "#,
        )?;

        let config = Config::load(Some(&jail.directory().join("dupsift.toml"))).unwrap();
        let finder = DuplicateFinder::new(config.finder_config());
        let (sets, summary) = finder.find_duplicates(&data).unwrap();

        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].paths, vec![data.join("a.txt"), data.join("b.txt")]);
        assert_eq!(summary.total_files, 2);
        Ok(())
    });
}

#[test]
fn test_env_overrides_file() {
    Jail::expect_with(|jail| {
        jail.create_file("dupsift.toml", "io_threads = 2\nskip_hidden = false")?;
        jail.set_env("DUPSIFT_IO_THREADS", "6");
        jail.set_env("DUPSIFT_SKIP_HIDDEN", "true");

        let config = Config::load(Some(&jail.directory().join("dupsift.toml"))).unwrap();

        assert_eq!(config.io_threads, 6);
        assert!(config.skip_hidden);
        assert_eq!(config.finder_config().io_threads, 6);
        Ok(())
    });
}

#[test]
fn test_missing_explicit_file() {
    Jail::expect_with(|jail| {
        let path = jail.directory().join("absent.toml");
        let err = Config::load(Some(&path)).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(p) if p == path));
        Ok(())
    });
}

#[test]
fn test_malformed_explicit_file() {
    Jail::expect_with(|jail| {
        jail.create_file("dupsift.toml", "io_threads = \"many\"")?;
        let err = Config::load(Some(&jail.directory().join("dupsift.toml"))).unwrap_err();

        assert!(matches!(err, ConfigError::Invalid(_)));
        Ok(())
    });
}

#[test]
fn test_inverted_size_bounds_rejected() {
    Jail::expect_with(|jail| {
        jail.create_file("dupsift.toml", "min_size = 100\nmax_size = 10")?;
        let config = Config::load(Some(&jail.directory().join("dupsift.toml"))).unwrap();
        let err = config.validate().unwrap_err();

        assert!(matches!(
            err,
            ConfigError::InvalidSizeRange { min: 100, max: 10 }
        ));
        Ok(())
    });
}

#[test]
fn test_written_toml_round_trips() {
    Jail::expect_with(|jail| {
        let config = Config {
            io_threads: 3,
            skip_empty: true,
            ignore_patterns: vec!["*.tmp".to_string()],
            ..Default::default()
        };
        jail.create_file("dupsift.toml", &toml::to_string(&config).unwrap())?;

        let loaded = Config::load(Some(&jail.directory().join("dupsift.toml"))).unwrap();
        assert_eq!(loaded, config);
        Ok(())
    });
}
