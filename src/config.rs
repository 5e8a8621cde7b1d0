/// External configuration loader.
///
/// Reads `cometeer.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use log::warn;
use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub general: GeneralConfig,
    pub player: PlayerConfig,
}

#[derive(Clone, Debug)]
pub struct GeneralConfig {
    pub tick_rate_ms: u64,
    pub start_level: u8,
    pub start_stage: u8,
}

#[derive(Clone, Debug)]
pub struct PlayerConfig {
    pub start_with_door_key: bool,
    pub start_with_boots: bool,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    player: TomlPlayer,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default)]
    start_level: u8,
    #[serde(default)]
    start_stage: u8,
}

#[derive(Deserialize, Debug, Default)]
struct TomlPlayer {
    #[serde(default)]
    start_with_door_key: bool,
    #[serde(default)]
    start_with_boots: bool,
}

// ── Defaults ──

// The reference machine's 18.2 Hz timer, rounded to whole milliseconds.
fn default_tick_rate() -> u64 { 55 }

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            tick_rate_ms: default_tick_rate(),
            start_level: 0,
            start_stage: 0,
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `cometeer.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());

        GameConfig {
            general: GeneralConfig {
                tick_rate_ms: toml_cfg.general.tick_rate_ms,
                start_level: toml_cfg.general.start_level,
                start_stage: toml_cfg.general.start_stage,
            },
            player: PlayerConfig {
                start_with_door_key: toml_cfg.player.start_with_door_key,
                start_with_boots: toml_cfg.player.start_with_boots,
            },
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        let toml_cfg = TomlConfig::default();
        GameConfig {
            general: GeneralConfig {
                tick_rate_ms: toml_cfg.general.tick_rate_ms,
                start_level: toml_cfg.general.start_level,
                start_stage: toml_cfg.general.start_stage,
            },
            player: PlayerConfig {
                start_with_door_key: false,
                start_with_boots: false,
            },
        }
    }
}

/// Candidate directories to search: exe dir + CWD + system paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so /usr/bin/cometeer → /usr/games/cometeer
        // still finds data relative to the real binary.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/cometeer)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/cometeer");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory (/usr/share/cometeer)
    let sys = PathBuf::from("/usr/share/cometeer");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    // 5. Fallback
    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for cometeer.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("cometeer.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        warn!("cometeer.toml parse error: {e}; using default settings");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    warn!("could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

// ══════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.general.tick_rate_ms, default_tick_rate());
        assert_eq!(cfg.general.start_level, 0);
        assert!(!cfg.player.start_with_boots);
    }

    #[test]
    fn partial_file_overrides_only_named_keys() {
        let cfg: TomlConfig = toml::from_str(
            "[general]\nstart_level = 2\n\n[player]\nstart_with_door_key = true\n",
        )
        .unwrap();
        assert_eq!(cfg.general.start_level, 2);
        assert_eq!(cfg.general.tick_rate_ms, default_tick_rate());
        assert!(cfg.player.start_with_door_key);
        assert!(!cfg.player.start_with_boots);
    }
}
