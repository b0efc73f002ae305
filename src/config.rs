use std::fs;
use std::path::Path;

use tracing::warn;
use voxelstream_world::WorldConfig;

const DEFAULT_CONFIG_PATH: &str = "config/world.toml";

/// Load the world configuration from the default path.
pub fn load() -> WorldConfig {
    load_from_path(Path::new(DEFAULT_CONFIG_PATH))
}

/// Load configuration from an explicit path, falling back to defaults on errors.
pub fn load_from_path(path: &Path) -> WorldConfig {
    match fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<WorldConfig>(&contents) {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!("Failed to parse {}: {err}. Using defaults", path.display());
                WorldConfig::default()
            }
        },
        Err(err) => {
            if path != Path::new(DEFAULT_CONFIG_PATH) {
                warn!("Failed to read {}: {err}. Using defaults", path.display());
            } else if err.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to read {}: {err}. Using defaults", path.display());
            } else {
                warn!("World config not found at {}. Using defaults", path.display());
            }
            WorldConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(name: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("voxelstream_{name}_{nanos}.toml"))
    }

    #[test]
    fn full_config_parses() {
        let path = temp_path("full");
        fs::write(
            &path,
            "seed = 42\nchunk_size = 8\nrender_distance = 2\nnoise_scale = 30.0\nheight_scale = 5.0\nwater_level = 2\nbuild_workers = 4\n",
        )
        .unwrap();
        let cfg = load_from_path(&path);
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.chunk_size, 8);
        assert_eq!(cfg.render_distance, 2);
        assert_eq!(cfg.noise_scale, 30.0);
        assert_eq!(cfg.water_level, 2);
        assert_eq!(cfg.build_workers, 4);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let path = temp_path("partial");
        fs::write(&path, "seed = 7\n").unwrap();
        let cfg = load_from_path(&path);
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.chunk_size, 16);
        assert_eq!(cfg.render_distance, 3);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn malformed_config_falls_back_to_defaults() {
        let path = temp_path("malformed");
        fs::write(&path, "seed = \"not a number\"\n").unwrap();
        let cfg = load_from_path(&path);
        assert_eq!(cfg.seed, 0);
        assert_eq!(cfg.chunk_size, 16);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = load_from_path(Path::new("/definitely/not/here.toml"));
        assert_eq!(cfg.chunk_size, 16);
    }
}
