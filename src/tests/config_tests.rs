#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use crate::components::PlayArea;
    use crate::config::{AudioConfig, Config, GameplayConfig, StorageConfig};
    use std::path::PathBuf;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.gameplay.play_area(), PlayArea::default());
        assert!(config.audio.sound_enabled);
        assert!((config.audio.volume - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.display.frame_interval_ms, 33);
        assert_eq!(config.storage.best_score_path, None);
    }

    #[test]
    fn test_play_area_falls_back_on_bad_sizes() {
        let gameplay = GameplayConfig {
            play_area_width: -1.0,
            play_area_height: 300.0,
        };
        let area = gameplay.play_area();

        assert!((area.width - 800.0).abs() < f32::EPSILON);
        assert!((area.height - 300.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_storage_path_override() {
        let storage = StorageConfig {
            best_score_path: Some(PathBuf::from("/tmp/scores.toml")),
        };
        assert_eq!(storage.best_score_path(), PathBuf::from("/tmp/scores.toml"));

        let default_path = StorageConfig::default().best_score_path();
        assert!(default_path.ends_with("scores.toml"));
    }

    #[test]
    fn test_config_serializes_to_toml() {
        let config = Config {
            audio: AudioConfig {
                sound_enabled: false,
                volume: 0.25,
            },
            ..Config::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();

        assert!(text.contains("[audio]"));
        assert!(text.contains("sound_enabled = false"));
        assert!(!text.contains("best_score_path"));

        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_update_edits_global_config() {
        Config::update(|config| config.display.frame_interval_ms = 16);
        assert_eq!(Config::current().display.frame_interval_ms, 16);

        Config::update(|config| config.display.frame_interval_ms = 33);
        assert_eq!(Config::current().display.frame_interval_ms, 33);
    }
}
