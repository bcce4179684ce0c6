// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! The cluster selected with `ngctl use`, persisted between invocations.

use crate::shared::error::KubeError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Overrides the preference file location
pub const PREFERENCE_PATH_ENV: &str = "NGCTL_CONFIG";
const PREFERENCE_DIR: &str = ".ngctl";
const PREFERENCE_FILE: &str = "config";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preference {
    pub namespace: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$NGCTL_CONFIG`, or `~/.ngctl/config`
    pub fn locate() -> Result<Self, KubeError> {
        if let Some(path) = std::env::var_os(PREFERENCE_PATH_ENV) {
            return Ok(Self::new(path));
        }
        let home = dirs::home_dir().ok_or_else(|| {
            KubeError::ConfigError("Cannot determine home directory".to_string())
        })?;
        Ok(Self::new(home.join(PREFERENCE_DIR).join(PREFERENCE_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Preference, KubeError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(KubeError::ConfigMissing(format!(
                    "{} does not exist, select a cluster with `ngctl use <name> --namespace <namespace>`",
                    self.path.display()
                )));
            }
            Err(e) => {
                return Err(KubeError::ConfigMissing(format!(
                    "cannot read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        serde_json::from_str(&content).map_err(|e| {
            KubeError::ConfigMissing(format!(
                "{} is not a valid preference file ({}), run `ngctl use` again",
                self.path.display(),
                e
            ))
        })
    }

    pub fn save(&self, preference: &Preference) -> Result<(), KubeError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                create_private_dir(dir)?;
            }
        }

        let content = serde_json::to_vec(preference)?;
        fs::write(&self.path, content)?;
        restrict_file_mode(&self.path)?;
        Ok(())
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> Result<(), KubeError> {
    use std::os::unix::fs::DirBuilderExt;
    // rwxr-x---
    fs::DirBuilder::new().recursive(true).mode(0o750).create(dir)?;
    Ok(())
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> Result<(), KubeError> {
    fs::create_dir_all(dir)?;
    Ok(())
}

#[cfg(unix)]
fn restrict_file_mode(path: &Path) -> Result<(), KubeError> {
    use std::os::unix::fs::PermissionsExt;
    // rw-r-----
    fs::set_permissions(path, fs::Permissions::from_mode(0o640))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_file_mode(_path: &Path) -> Result<(), KubeError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = PreferenceStore::new(dir.path().join(".ngctl").join("config"));
        let preference = Preference {
            namespace: "nebula".to_string(),
            name: "graph".to_string(),
        };

        store.save(&preference).unwrap();
        assert_eq!(store.load().unwrap(), preference);

        let raw = fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, r#"{"namespace":"nebula","name":"graph"}"#);
    }

    #[test]
    fn test_missing_file_is_config_missing() {
        let dir = TempDir::new().unwrap();
        let store = PreferenceStore::new(dir.path().join("absent"));
        assert!(matches!(store.load(), Err(KubeError::ConfigMissing(_))));
    }

    #[test]
    fn test_garbage_file_is_config_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "not json").unwrap();
        let store = PreferenceStore::new(&path);
        assert!(matches!(store.load(), Err(KubeError::ConfigMissing(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_modes() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = PreferenceStore::new(dir.path().join(".ngctl").join("config"));
        store
            .save(&Preference {
                namespace: "default".to_string(),
                name: "nebula".to_string(),
            })
            .unwrap();

        let file_mode = fs::metadata(store.path()).unwrap().permissions().mode() & 0o777;
        assert_eq!(file_mode, 0o640);
        let dir_mode = fs::metadata(dir.path().join(".ngctl"))
            .unwrap()
            .permissions()
            .mode()
            & 0o777;
        // umask may only clear bits
        assert_eq!(dir_mode & !0o750, 0);
    }
}
