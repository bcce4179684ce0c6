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


//! Typed view of the `NebulaCluster` custom resource.
//!
//! Only the fields ngctl reports on are modelled; everything else in the
//! object is ignored during decoding.

use crate::domain::cluster::quantity::sum_quantities;
use crate::infrastructure::constants::{COMPONENT_GRAPHD, COMPONENT_METAD, COMPONENT_STORAGED};
use crate::shared::error::KubeError;
use k8s_openapi::api::core::v1::ResourceRequirements;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use kube::core::DynamicObject;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct NebulaCluster {
    pub name: String,
    pub namespace: String,
    pub creation_timestamp: Option<Time>,
    pub spec: NebulaClusterSpec,
    pub status: NebulaClusterStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NebulaClusterSpec {
    #[serde(default)]
    pub graphd: ComponentSpec,
    #[serde(default)]
    pub metad: ComponentSpec,
    #[serde(default)]
    pub storaged: ComponentSpec,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSpec {
    pub replicas: Option<i32>,
    pub version: Option<String>,
    pub resources: Option<ResourceRequirements>,
    pub log_volume_claim: Option<StorageClaim>,
    pub data_volume_claim: Option<StorageClaim>,
    #[serde(default)]
    pub data_volume_claims: Vec<StorageClaim>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageClaim {
    pub resources: Option<ResourceRequirements>,
    pub storage_class_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NebulaClusterStatus {
    #[serde(default)]
    pub graphd: ComponentStatus,
    #[serde(default)]
    pub metad: ComponentStatus,
    #[serde(default)]
    pub storaged: ComponentStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentStatus {
    pub phase: Option<String>,
    pub workload: Option<WorkloadStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadStatus {
    pub replicas: Option<i32>,
    pub ready_replicas: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Graphd,
    Metad,
    Storaged,
}

impl Component {
    pub const ALL: [Component; 3] = [Component::Metad, Component::Storaged, Component::Graphd];

    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Graphd => COMPONENT_GRAPHD,
            Component::Metad => COMPONENT_METAD,
            Component::Storaged => COMPONENT_STORAGED,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Component::Graphd => "Graphd",
            Component::Metad => "Metad",
            Component::Storaged => "Storaged",
        }
    }
}

impl std::str::FromStr for Component {
    type Err = KubeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            COMPONENT_GRAPHD => Ok(Component::Graphd),
            COMPONENT_METAD => Ok(Component::Metad),
            COMPONENT_STORAGED => Ok(Component::Storaged),
            _ => Err(KubeError::ConfigError(format!(
                "Invalid component: {}",
                s
            ))),
        }
    }
}

impl ComponentSpec {
    pub fn cpu_limit(&self) -> Option<String> {
        self.limit("cpu")
    }

    pub fn memory_limit(&self) -> Option<String> {
        self.limit("memory")
    }

    fn limit(&self, resource: &str) -> Option<String> {
        self.resources
            .as_ref()
            .and_then(|r| r.limits.as_ref())
            .and_then(|limits| limits.get(resource))
            .map(|q| q.0.clone())
    }

    pub fn log_volume(&self) -> Option<String> {
        self.log_volume_claim.as_ref().and_then(StorageClaim::storage)
    }

    /// Storage requested for data. Storaged spreads data over several
    /// claims, which are summed.
    pub fn data_volume(&self) -> Option<String> {
        if !self.data_volume_claims.is_empty() {
            let sizes: Vec<String> = self
                .data_volume_claims
                .iter()
                .filter_map(StorageClaim::storage)
                .collect();
            return sum_quantities(&sizes);
        }
        self.data_volume_claim.as_ref().and_then(StorageClaim::storage)
    }
}

impl StorageClaim {
    pub fn storage(&self) -> Option<String> {
        self.resources
            .as_ref()
            .and_then(|r| r.requests.as_ref())
            .and_then(|requests| requests.get("storage"))
            .map(|q| q.0.clone())
    }
}

impl NebulaCluster {
    pub fn component_spec(&self, component: Component) -> &ComponentSpec {
        match component {
            Component::Graphd => &self.spec.graphd,
            Component::Metad => &self.spec.metad,
            Component::Storaged => &self.spec.storaged,
        }
    }

    pub fn component_status(&self, component: Component) -> &ComponentStatus {
        match component {
            Component::Graphd => &self.status.graphd,
            Component::Metad => &self.status.metad,
            Component::Storaged => &self.status.storaged,
        }
    }

    pub fn ready_replicas(&self, component: Component) -> u32 {
        self.component_status(component)
            .workload
            .as_ref()
            .and_then(|w| w.ready_replicas)
            .unwrap_or(0)
            .max(0) as u32
    }

    pub fn desired_replicas(&self, component: Component) -> u32 {
        self.component_spec(component)
            .replicas
            .unwrap_or(0)
            .max(0) as u32
    }
}

impl TryFrom<DynamicObject> for NebulaCluster {
    type Error = KubeError;

    fn try_from(object: DynamicObject) -> Result<Self, Self::Error> {
        let name = object
            .metadata
            .name
            .clone()
            .ok_or_else(|| KubeError::InvalidResource("NebulaCluster without a name".to_string()))?;
        let namespace = object.metadata.namespace.clone().unwrap_or_default();

        let spec = match object.data.get("spec") {
            Some(value) => serde_json::from_value(value.clone())?,
            None => NebulaClusterSpec::default(),
        };
        let status = match object.data.get("status") {
            Some(value) if !value.is_null() => serde_json::from_value(value.clone())?,
            _ => NebulaClusterStatus::default(),
        };

        Ok(Self {
            name,
            namespace,
            creation_timestamp: object.metadata.creation_timestamp.clone(),
            spec,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cluster_object() -> DynamicObject {
        serde_json::from_value(json!({
            "apiVersion": "apps.nebula-graph.io/v1alpha1",
            "kind": "NebulaCluster",
            "metadata": {
                "name": "nebula",
                "namespace": "default",
                "creationTimestamp": "2024-01-02T03:04:05Z"
            },
            "spec": {
                "graphd": {
                    "replicas": 2,
                    "version": "v3.6.0",
                    "resources": {"limits": {"cpu": "1", "memory": "1Gi"}},
                    "logVolumeClaim": {"resources": {"requests": {"storage": "2Gi"}}}
                },
                "metad": {
                    "replicas": 3,
                    "version": "v3.6.0",
                    "dataVolumeClaim": {"resources": {"requests": {"storage": "5Gi"}}}
                },
                "storaged": {
                    "replicas": 3,
                    "version": "v3.6.0",
                    "dataVolumeClaims": [
                        {"resources": {"requests": {"storage": "10Gi"}}},
                        {"resources": {"requests": {"storage": "512Mi"}}}
                    ]
                },
                "unknownField": true
            },
            "status": {
                "graphd": {"phase": "Running", "workload": {"readyReplicas": 2}},
                "metad": {"phase": "Running", "workload": {"readyReplicas": 1}}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_decode_cluster() {
        let cluster = NebulaCluster::try_from(cluster_object()).unwrap();
        assert_eq!(cluster.name, "nebula");
        assert_eq!(cluster.namespace, "default");
        assert!(cluster.creation_timestamp.is_some());

        assert_eq!(cluster.desired_replicas(Component::Graphd), 2);
        assert_eq!(cluster.ready_replicas(Component::Graphd), 2);
        assert_eq!(cluster.ready_replicas(Component::Metad), 1);
        assert_eq!(cluster.ready_replicas(Component::Storaged), 0);
        assert!(cluster.status.storaged.phase.is_none());

        let graphd = cluster.component_spec(Component::Graphd);
        assert_eq!(graphd.cpu_limit().as_deref(), Some("1"));
        assert_eq!(graphd.memory_limit().as_deref(), Some("1Gi"));
        assert_eq!(graphd.log_volume().as_deref(), Some("2Gi"));
        assert_eq!(graphd.data_volume(), None);
    }

    #[test]
    fn test_storaged_data_volume_is_summed() {
        let cluster = NebulaCluster::try_from(cluster_object()).unwrap();
        assert_eq!(
            cluster.component_spec(Component::Storaged).data_volume().as_deref(),
            Some("10752Mi")
        );
        assert_eq!(
            cluster.component_spec(Component::Metad).data_volume().as_deref(),
            Some("5Gi")
        );
    }

    #[test]
    fn test_component_parse() {
        assert_eq!("graphd".parse::<Component>().unwrap(), Component::Graphd);
        assert!("volume".parse::<Component>().is_err());
    }
}
