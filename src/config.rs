//! Plugin configuration: settings and user-facing message templates.
//!
//! Both files are TOML and load leniently — a missing or broken file
//! falls back to defaults with a warning, so a bad edit never takes the
//! plugin down.

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;

/// File names under the plugin data directory.
pub const SETTINGS_FILE: &str = "settings.toml";
pub const MESSAGES_FILE: &str = "messages.toml";
pub const TABLES_FILE: &str = "tables.json";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Host version; 16 and newer supports 24-bit chat color.
    pub host_version: u32,
    /// Help lines shown per page of `/admin help`.
    pub help_page_size: usize,
    pub permissions: Permissions,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Permissions {
    pub admin: String,
    pub admin_reload: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host_version: 16,
            help_page_size: 5,
            permissions: Permissions::default(),
        }
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self {
            admin: "voxdrops.admin".to_string(),
            admin_reload: "voxdrops.admin.reload".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        load_toml_or_default(path, "Settings")
    }
}

/// User-facing message templates. Placeholders in braces are substituted
/// by [`render_template`]; the strings run through the colorizer before
/// display, so they may carry `&` codes and pattern markup.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Messages {
    pub no_permission: String,
    pub only_numbers_allowed: String,
    pub reload_done: String,
    pub duplicates_found: String,
    pub max_chance_invalid: String,
    pub help_header: String,
    pub help_lines: Vec<String>,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            no_permission: "&cYou don't have permission to do that.".to_string(),
            only_numbers_allowed: "&cInvalid argument '{arg}': only numbers are allowed."
                .to_string(),
            reload_done: "&aConfiguration reloaded.".to_string(),
            duplicates_found:
                "&c{duplicates} drop tables found for {mob-drop-table} ({mob-drop-table-upper}). \
                 Fix tables.json."
                    .to_string(),
            max_chance_invalid:
                "&cDrop table for {mob-drop-table} ({mob-drop-table-upper}) does not sum to 100."
                    .to_string(),
            help_header: "&6Admin help &7(page {page}/{pages})".to_string(),
            help_lines: vec![
                "&e/admin &7- show this help".to_string(),
                "&e/admin help <page> &7- open a help page".to_string(),
                "&e/admin reload &7- reload settings, messages and tables".to_string(),
            ],
        }
    }
}

impl Messages {
    /// Load messages from `path`, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        load_toml_or_default(path, "Messages")
    }
}

/// Substitute `{placeholder}` markers. Unknown markers are left in place
/// so a template typo stays visible instead of vanishing.
pub fn render_template(template: &str, substitutions: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (placeholder, value) in substitutions {
        out = out.replace(placeholder, value);
    }
    out
}

fn load_toml_or_default<T>(path: &Path, what: &str) -> T
where
    T: serde::de::DeserializeOwned + Default,
{
    match fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<T>(&contents) {
            Ok(value) => value,
            Err(err) => {
                warn!("Failed to parse {}: {err}. Using defaults", path.display());
                T::default()
            }
        },
        Err(err) => {
            if err.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to read {}: {err}. Using defaults", path.display());
            } else {
                warn!("{what} not found at {}. Using defaults", path.display());
            }
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_file(name: &str) -> std::path::PathBuf {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("voxdrops_config_{timestamp}_{name}"))
    }

    #[test]
    fn missing_files_fall_back_to_defaults() {
        let settings = Settings::load_from_path(Path::new("does/not/exist.toml"));
        assert_eq!(settings.host_version, 16);
        assert_eq!(settings.permissions.admin, "voxdrops.admin");

        let messages = Messages::load_from_path(Path::new("does/not/exist.toml"));
        assert!(!messages.help_lines.is_empty());
    }

    #[test]
    fn partial_settings_keep_defaults_for_the_rest() {
        let path = unique_temp_file("settings.toml");
        fs::write(&path, "host_version = 12\n").expect("write settings");

        let settings = Settings::load_from_path(&path);
        assert_eq!(settings.host_version, 12);
        assert_eq!(settings.help_page_size, 5);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn broken_toml_falls_back_to_defaults() {
        let path = unique_temp_file("broken.toml");
        fs::write(&path, "host_version = [not toml").expect("write settings");

        let settings = Settings::load_from_path(&path);
        assert_eq!(settings.host_version, 16);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn template_rendering_substitutes_and_keeps_unknown_markers() {
        let out = render_template(
            "{duplicates} tables for {mob-drop-table} {unknown}",
            &[("{duplicates}", "2"), ("{mob-drop-table}", "Zombie")],
        );
        assert_eq!(out, "2 tables for Zombie {unknown}");
    }
}
