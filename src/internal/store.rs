use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;
use strum_macros::Display;
use tracing::{debug, info};

use super::models::PostModel;

pub const SAVED_POSTS: &str = "SAVED_POSTS";
pub const APP_THEME: &str = "APP_THEME";
pub const USE_SYSTEM_PALETTE: &str = "USE_SYSTEM_PALETTE";

const STORE_DIR: &str = "blogdesk";
const STORE_FILE: &str = "preferences.json";

/// Theme choice persisted under `APP_THEME` by enum name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum AppTheme {
    #[strum(serialize = "SYSTEM_DEFAULT")]
    SystemDefault,
    #[default]
    #[strum(serialize = "DARK")]
    Dark,
    #[strum(serialize = "LIGHT")]
    Light,
}

impl AppTheme {
    /// Name round-trip; anything unrecognized falls back to `Dark`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "SYSTEM_DEFAULT" => Self::SystemDefault,
            "LIGHT" => Self::Light,
            _ => Self::Dark,
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Self::SystemDefault => "System Default",
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

/// File-backed key-value preference store.
///
/// One JSON file of string keys and string values. Saved posts live under
/// the single `SAVED_POSTS` key as a JSON-serialized array; save/remove is
/// a read-modify-write of the whole array, and removing the last post
/// deletes the key instead of writing an empty array. A `HashMap` keyed by
/// post id mirrors the array so `is_saved` is O(1).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PrefStore {
    values: BTreeMap<String, String>,
    #[serde(skip)]
    saved_index: HashMap<String, PostModel>,
    #[serde(skip)]
    file_path: Option<PathBuf>,
}

impl PrefStore {
    /// In-memory store with no backing file. Writes are kept but never
    /// persisted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the preferences file in the OS config directory, creating the
    /// directory if needed.
    pub fn load_or_create() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join(STORE_DIR);

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).with_context(|| {
                format!("Failed to create config directory {}", config_dir.display())
            })?;
            info!(config_dir = %config_dir.display(), "Created config directory for preferences");
        }

        Self::open(config_dir.join(STORE_FILE))
    }

    /// Open a preferences file at an explicit path.
    pub fn open(file_path: PathBuf) -> Result<Self> {
        match file_path.exists() {
            true => {
                let content = fs::read_to_string(&file_path)
                    .context("Failed to read preferences file")?;
                let mut store: PrefStore =
                    serde_json::from_str(&content).context("Failed to parse preferences file")?;
                store.file_path = Some(file_path.clone());
                store.rebuild_index();
                info!(preferences_file = %file_path.display(), "Loaded preferences from file");
                Ok(store)
            }
            false => {
                info!(preferences_file = %file_path.display(), "No preferences file found, starting empty");
                Ok(Self {
                    file_path: Some(file_path),
                    ..Self::default()
                })
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        match &self.file_path {
            Some(path) => {
                let content =
                    serde_json::to_string_pretty(self).context("Failed to serialize preferences")?;
                fs::write(path, content).context("Failed to write preferences file")?;
                debug!(preferences_file = %path.display(), "Saved preferences to file");
            }
            None => {
                debug!("PrefStore.save() called but no file_path is set; skipping write");
            }
        }
        Ok(())
    }

    // -- typed accessors ------------------------------------------------

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.values
            .get(key)
            .map(|v| v == "true")
            .unwrap_or(default)
    }

    pub fn get_int(&self, key: &str) -> i64 {
        self.values
            .get(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let key = key.into();
        self.values.insert(key.clone(), value.into());
        // Writing SAVED_POSTS through the generic accessor must not leave
        // the id index stale.
        if key == SAVED_POSTS {
            self.rebuild_index();
        }
        self.save()
    }

    pub fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        if key == SAVED_POSTS {
            self.saved_index.clear();
        }
        self.save()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.values.clear();
        self.saved_index.clear();
        self.save()
    }

    // -- saved posts ----------------------------------------------------

    /// Posts the user has bookmarked, in save order. A missing or
    /// unparseable `SAVED_POSTS` value reads as no saved posts.
    pub fn saved_posts(&self) -> Vec<PostModel> {
        self.values
            .get(SAVED_POSTS)
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default()
    }

    pub fn is_saved(&self, post_id: &str) -> bool {
        self.saved_index.contains_key(post_id)
    }

    /// Bookmark a post. Saving an already saved id is a no-op.
    pub fn save_post(&mut self, post: &PostModel) -> Result<()> {
        if self.is_saved(&post.id) {
            return Ok(());
        }

        let mut posts = self.saved_posts();
        let mut saved = post.clone();
        saved.is_selected = true;
        posts.push(saved);
        self.write_saved(posts)
    }

    /// Drop a bookmark. Removing an id that is not saved is a no-op.
    /// Removing the last post deletes the key entirely.
    pub fn remove_post(&mut self, post_id: &str) -> Result<()> {
        if !self.is_saved(post_id) {
            return Ok(());
        }

        let posts: Vec<PostModel> = self
            .saved_posts()
            .into_iter()
            .filter(|p| p.id != post_id)
            .collect();

        if posts.is_empty() {
            self.saved_index.clear();
            self.values.remove(SAVED_POSTS);
            self.save()
        } else {
            self.write_saved(posts)
        }
    }

    pub fn toggle_post(&mut self, post: &PostModel) -> Result<()> {
        match self.is_saved(&post.id) {
            true => self.remove_post(&post.id),
            false => self.save_post(post),
        }
    }

    fn write_saved(&mut self, posts: Vec<PostModel>) -> Result<()> {
        let raw = serde_json::to_string(&posts).context("Failed to serialize saved posts")?;
        self.values.insert(SAVED_POSTS.to_string(), raw);
        self.saved_index = posts.into_iter().map(|p| (p.id.clone(), p)).collect();
        self.save()
    }

    fn rebuild_index(&mut self) {
        self.saved_index = self
            .saved_posts()
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();
    }

    // -- theme and palette ----------------------------------------------

    pub fn theme(&self) -> AppTheme {
        self.get_string(APP_THEME)
            .map(|name| AppTheme::from_name(&name))
            .unwrap_or_default()
    }

    pub fn save_theme(&mut self, theme: AppTheme) -> Result<()> {
        self.set(APP_THEME, theme.to_string())
    }

    pub fn use_system_palette(&self) -> bool {
        self.get_bool(USE_SYSTEM_PALETTE, false)
    }

    pub fn save_system_palette(&mut self, use_system_palette: bool) -> Result<()> {
        self.set(USE_SYSTEM_PALETTE, use_system_palette.to_string())
    }
}
