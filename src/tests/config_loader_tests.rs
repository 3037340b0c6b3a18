#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::config::loader::{ConfigError, load_config_from_path, save_config_to_path};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    // Helper function to create a test config path
    fn create_test_config_path() -> (tempfile::TempDir, PathBuf) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let config_path = temp_dir.path().join("test_config.toml");
        (temp_dir, config_path)
    }

    #[test]
    fn test_load_nonexistent_config() {
        let (_temp_dir, config_path) = create_test_config_path();

        // Loading a non-existent config should create a default one
        let config = load_config_from_path(&config_path).expect("Failed to load default config");

        assert!(config_path.exists(), "Config file should have been created");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load_config() {
        let (_temp_dir, config_path) = create_test_config_path();

        let mut config = Config::default();
        config.gameplay.play_area_width = 640.0;
        config.audio.sound_enabled = false;
        config.display.frame_interval_ms = 50;

        save_config_to_path(&config, &config_path).expect("Failed to save config");
        let loaded_config = load_config_from_path(&config_path).expect("Failed to load config");

        assert_eq!(loaded_config, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let (_temp_dir, config_path) = create_test_config_path();
        fs::write(&config_path, "[audio]\nvolume = 0.2\n").unwrap();

        let config = load_config_from_path(&config_path).expect("Failed to load config");

        assert!((config.audio.volume - 0.2).abs() < f32::EPSILON);
        assert!(config.audio.sound_enabled);
        assert_eq!(config.gameplay, Config::default().gameplay);
        assert_eq!(config.storage.best_score_path, None);
    }

    #[test]
    fn test_malformed_config() {
        let (_temp_dir, config_path) = create_test_config_path();
        fs::write(&config_path, "[audio\nvolume = ").unwrap();

        let result = load_config_from_path(&config_path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let config_path = temp_dir.path().join("a").join("b").join("config.toml");

        save_config_to_path(&Config::default(), &config_path).expect("Failed to save config");
        assert!(config_path.exists());
    }
}
