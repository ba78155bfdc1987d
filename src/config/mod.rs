mod colors;
mod keys;

use std::{env, path::PathBuf};

use color_eyre::Result;
use directories::ProjectDirs;
use serde::Deserialize;
use tracing::error;

use crate::config::{colors::Styles, keys::KeyBindings};

const DEFAULT_CONFIG: &str = include_str!("../../.config/config.json5");

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub keybindings: KeyBindings,
    #[serde(default)]
    pub styles: Styles,
}

impl Config {
    pub fn new() -> Result<Self, config::ConfigError> {
        let default_config: Config = json5::from_str(DEFAULT_CONFIG)
            .expect("embedded default config must always deserialize");
        let data_dir = get_data_dir();
        let config_dir = get_config_dir();
        let mut builder = config::Config::builder()
            .set_default("data_dir", data_dir.to_str().unwrap_or_default())?
            .set_default("config_dir", config_dir.to_str().unwrap_or_default())?;

        let config_files = [
            ("config.json5", config::FileFormat::Json5),
            ("config.json", config::FileFormat::Json),
            ("config.yaml", config::FileFormat::Yaml),
            ("config.toml", config::FileFormat::Toml),
            ("config.ini", config::FileFormat::Ini),
        ];
        let mut found_config = false;
        for (file, format) in &config_files {
            let source = config::File::from(config_dir.join(file))
                .format(*format)
                .required(false);
            builder = builder.add_source(source);
            if config_dir.join(file).exists() {
                found_config = true
            }
        }
        if !found_config {
            error!("No configuration file found. Application may not behave as expected");
        }

        let mut cfg: Self = builder.build()?.try_deserialize()?;

        // user config only overrides what it names, defaults fill the rest
        for (mode, default_bindings) in default_config.keybindings.iter() {
            let user_bindings = cfg.keybindings.entry(*mode).or_default();
            for (key, action) in default_bindings.iter() {
                user_bindings
                    .entry(key.clone())
                    .or_insert_with(|| action.clone());
            }
        }
        for (mode, default_styles) in default_config.styles.iter() {
            let user_styles = cfg.styles.entry(*mode).or_default();
            for (style_key, style) in default_styles.iter() {
                user_styles.entry(style_key.clone()).or_insert(*style);
            }
        }

        Ok(cfg)
    }
}

pub fn get_data_dir() -> PathBuf {
    if let Some(data_folder) = env::var("REQLIST_DATA").ok().map(PathBuf::from) {
        data_folder
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

pub fn get_config_dir() -> PathBuf {
    if let Some(config_folder) = env::var("REQLIST_CONFIG").ok().map(PathBuf::from) {
        config_folder
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("dev.reqlist", "", env!("CARGO_PKG_NAME"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_deserializes() {
        let config: Config = json5::from_str(DEFAULT_CONFIG).unwrap();
        assert!(!config.keybindings.is_empty());
        assert!(!config.styles.is_empty());
    }
}
