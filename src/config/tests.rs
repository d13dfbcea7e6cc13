use super::load::{default_config_path, default_log_dir, resolve_config_path};
use super::schema::*;
use crate::view::GroupingMode;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_explicit_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("TRACKDECK_CONFIG_PATH", "/tmp/trackdeck-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/trackdeck-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("trackdeck")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("trackdeck")
            .join("config.toml")
    );
}

#[test]
fn default_log_dir_uses_xdg_state_home_then_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_STATE_HOME", "/tmp/xdg-state");
    assert_eq!(
        default_log_dir().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-state").join("trackdeck")
    );

    let _g2 = EnvGuard::remove("XDG_STATE_HOME");
    let _g3 = EnvGuard::set("HOME", "/tmp/home-dir");
    assert_eq!(
        default_log_dir().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir/.local/state/trackdeck")
    );
}

#[test]
fn settings_load_from_config_file_and_parse_grouping_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
initial_volume = 35
tick_ms = 250

[stream]
connect_timeout_secs = 3

[controls]
volume_step = 10
seek_step_percent = 2

[ui]
grouping = "by-artist-and-album"
header_text = "hello"

[library]
extensions = ["mp3"]
recursive = false
include_hidden = true
follow_links = false

[logging]
directory = "/tmp/trackdeck-logs"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("TRACKDECK_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("TRACKDECK__AUDIO__TICK_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.initial_volume, 35);
    assert_eq!(s.audio.tick_ms, 250);
    assert_eq!(s.stream.connect_timeout_secs, 3);
    assert_eq!(s.controls.volume_step, 10);
    assert_eq!(s.controls.seek_step_percent, 2);
    assert_eq!(s.ui.grouping, GroupingSetting::ArtistAlbum);
    assert_eq!(GroupingMode::from(s.ui.grouping), GroupingMode::ByArtistAndAlbum);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(!s.library.recursive);
    assert!(s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert_eq!(
        s.logging.directory.as_deref(),
        Some(std::path::Path::new("/tmp/trackdeck-logs"))
    );
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
tick_ms = 250
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("TRACKDECK_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("TRACKDECK__AUDIO__TICK_MS", "1000");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.tick_ms, 1000);
}

#[test]
fn missing_config_file_yields_defaults() {
    let _lock = env_lock();
    let dir = tempfile::tempdir().unwrap();
    let _g1 = EnvGuard::set(
        "TRACKDECK_CONFIG_PATH",
        dir.path().join("absent.toml").to_str().unwrap(),
    );
    let _g2 = EnvGuard::remove("TRACKDECK__AUDIO__TICK_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.initial_volume, 80);
    assert_eq!(s.audio.tick_ms, 500);
    assert_eq!(s.ui.grouping, GroupingSetting::Flat);
    assert_eq!(s.library.extensions.len(), 5);
}

#[test]
fn validate_rejects_zero_tick_and_loud_volume() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());

    s.audio.tick_ms = 0;
    assert!(s.validate().is_err());

    s.audio.tick_ms = 500;
    s.audio.initial_volume = 101;
    assert!(s.validate().is_err());

    s.audio.initial_volume = 80;
    s.library.extensions = vec!["  ".to_string()];
    assert!(s.validate().is_err());
}
