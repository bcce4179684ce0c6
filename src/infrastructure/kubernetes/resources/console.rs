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


use crate::domain::config::ConsoleOptions;
use crate::infrastructure::constants::{
    CONSOLE_IDLE_COMMAND, CONSOLE_LABEL_KEY, CONSOLE_MOUNT_PATH, CONSOLE_VOLUME_NAME,
    IMAGE_PULL_IF_NOT_PRESENT,
};
use crate::shared::error::KubeError;
use k8s_openapi::api::core::v1::{
    ConfigMap, ConfigMapVolumeSource, Container, KeyToPath, Pod, PodSpec, ResourceRequirements,
    Volume, VolumeMount,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;

/// Builds the console pod and the config map carrying its local files.
/// Both are named after the pod.
pub struct ConsoleBuilder<'a> {
    pod_name: String,
    namespace: String,
    image: String,
    options: &'a ConsoleOptions,
}

impl<'a> ConsoleBuilder<'a> {
    pub fn new(
        pod_name: String,
        namespace: String,
        image: String,
        options: &'a ConsoleOptions,
    ) -> Self {
        Self {
            pod_name,
            namespace,
            image,
            options,
        }
    }

    pub fn name(&self) -> &str {
        &self.pod_name
    }

    /// Reads every provided local file; keys without a file hold "".
    pub fn build_config_map(&self) -> Result<ConfigMap, KubeError> {
        let mut data = BTreeMap::new();
        for (key, path) in self.options.mounted_files() {
            let content = match path {
                Some(path) => std::fs::read_to_string(path).map_err(|e| {
                    KubeError::config_error(format!("failed to read {}: {}", path.display(), e))
                })?,
                None => String::new(),
            };
            data.insert(key.to_string(), content);
        }

        Ok(ConfigMap {
            metadata: self.metadata(),
            data: Some(data),
            ..Default::default()
        })
    }

    pub fn build_pod(&self) -> Pod {
        let mut requests = BTreeMap::new();
        requests.insert("cpu".to_string(), Quantity("100m".to_string()));
        requests.insert("memory".to_string(), Quantity("64Mi".to_string()));

        let mut container = Container {
            name: self.pod_name.clone(),
            image: Some(self.image.clone()),
            image_pull_policy: Some(IMAGE_PULL_IF_NOT_PRESENT.to_string()),
            command: Some(vec![
                "sh".to_string(),
                "-c".to_string(),
                CONSOLE_IDLE_COMMAND.to_string(),
            ]),
            resources: Some(ResourceRequirements {
                requests: Some(requests),
                ..Default::default()
            }),
            ..Default::default()
        };

        let keys = self.options.provided_keys();
        let volumes = if keys.is_empty() {
            None
        } else {
            container.volume_mounts = Some(vec![VolumeMount {
                name: CONSOLE_VOLUME_NAME.to_string(),
                mount_path: CONSOLE_MOUNT_PATH.to_string(),
                ..Default::default()
            }]);
            Some(vec![Volume {
                name: CONSOLE_VOLUME_NAME.to_string(),
                config_map: Some(ConfigMapVolumeSource {
                    name: self.pod_name.clone(),
                    items: Some(
                        keys.into_iter()
                            .map(|key| KeyToPath {
                                key: key.to_string(),
                                path: key.to_string(),
                                ..Default::default()
                            })
                            .collect(),
                    ),
                    ..Default::default()
                }),
                ..Default::default()
            }])
        };

        Pod {
            metadata: self.metadata(),
            spec: Some(PodSpec {
                containers: vec![container],
                volumes,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    pub fn get_labels(&self) -> BTreeMap<String, String> {
        let mut labels = BTreeMap::new();
        labels.insert(CONSOLE_LABEL_KEY.to_string(), self.pod_name.clone());
        labels
    }

    fn metadata(&self) -> ObjectMeta {
        ObjectMeta {
            name: Some(self.pod_name.clone()),
            namespace: Some(self.namespace.clone()),
            labels: Some(self.get_labels()),
            ..Default::default()
        }
    }
}
