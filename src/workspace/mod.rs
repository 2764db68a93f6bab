mod config;
pub mod layout;

pub use config::{
    config_file_path, load_or_default, save, workspace_root, AppConfig, CommunitySettings,
    LlmSettings, PlacesSettings, CONFIG_FILE_NAME, HOME_ENV, LLM_API_KEY_ENV, PLACES_API_KEY_ENV,
};
pub use layout::{user_file_stem, DataLayout};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Owns the configuration and directory layout of one Compass install.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub config: AppConfig,
    pub layout: DataLayout,
    pub config_path: PathBuf,
}

impl Workspace {
    /// Opens the workspace at the root resolved from the environment/OS.
    pub fn open() -> Result<Self> {
        let root = workspace_root()?;
        Self::open_at(&root)
    }

    /// Opens (and creates, if needed) a workspace at an explicit root.
    pub fn open_at(root: &Path) -> Result<Self> {
        let layout = DataLayout::new(root);
        for dir in [
            &layout.root,
            &layout.users_dir,
            &layout.community_dir,
            &layout.wellbeing_dir,
        ] {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create workspace directory {:?}", dir))?;
        }
        let config_path = config_file_path(root);
        let mut config = load_or_default(&config_path)?;
        config.apply_env_overrides();
        tracing::debug!(root = %root.display(), "opened workspace");
        Ok(Self {
            config,
            layout,
            config_path,
        })
    }

    /// Persists the current configuration.
    pub fn save_config(&self) -> Result<()> {
        save(&self.config, &self.config_path)
    }

    pub fn root(&self) -> &Path {
        &self.layout.root
    }
}
