use crate::profile::Profile;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk profile store: one default profile plus named profiles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileStore {
    pub default_profile: Profile,
    pub profiles: Vec<Profile>,
}

impl ProfileStore {
    pub fn find(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub profiles_path: PathBuf,
}

pub fn app_paths() -> Result<AppPaths> {
    let proj = ProjectDirs::from("com", "batchrenamer", "batch-renamer")
        .context("OS標準設定ディレクトリを取得できませんでした")?;
    let config_dir = proj.config_dir().to_path_buf();
    Ok(AppPaths {
        profiles_path: config_dir.join("profiles.toml"),
        config_dir,
    })
}

pub fn load_profiles() -> Result<ProfileStore> {
    let paths = app_paths()?;
    load_profiles_from(&paths.profiles_path)
}

pub fn save_profiles(store: &ProfileStore) -> Result<()> {
    let paths = app_paths()?;
    fs::create_dir_all(&paths.config_dir).with_context(|| {
        format!(
            "設定ディレクトリを作成できませんでした: {}",
            paths.config_dir.display()
        )
    })?;
    save_profiles_to(&paths.profiles_path, store)
}

fn load_profiles_from(path: &Path) -> Result<ProfileStore> {
    if !path.exists() {
        return Ok(ProfileStore::default());
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("プロファイルを読めませんでした: {}", path.display()))?;
    let store =
        toml::from_str::<ProfileStore>(&raw).context("プロファイルのパースに失敗しました")?;
    Ok(store)
}

fn save_profiles_to(path: &Path, store: &ProfileStore) -> Result<()> {
    let body =
        toml::to_string_pretty(store).context("プロファイルのシリアライズに失敗しました")?;
    fs::write(path, body)
        .with_context(|| format!("プロファイルを書き込めませんでした: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_store_yields_defaults() {
        let temp = tempdir().expect("tempdir");
        let store = load_profiles_from(&temp.path().join("profiles.toml"))
            .expect("missing file should not be an error");
        assert_eq!(store.default_profile, Profile::default());
        assert!(store.profiles.is_empty());
    }

    #[test]
    fn store_round_trips_through_disk() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("profiles.toml");

        let mut store = ProfileStore::default();
        let mut audio = Profile::default();
        audio.name = "Audio Files".to_string();
        audio.template = "$T(Audio.Title).$e".to_string();
        store.profiles.push(audio);

        save_profiles_to(&path, &store).expect("save");
        let loaded = load_profiles_from(&path).expect("load");
        assert_eq!(loaded.profiles.len(), 1);
        assert_eq!(
            loaded.find("Audio Files").map(|p| p.template.as_str()),
            Some("$T(Audio.Title).$e")
        );
    }
}
