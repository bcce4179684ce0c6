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


use crate::domain::cluster::nebula::{Component, NebulaCluster};
use crate::infrastructure::constants::{
    LABEL_CLUSTER, LABEL_COMPONENT, LABEL_NAME, LABEL_NAME_VALUE, OPERATOR_SELECTOR,
    POD_CLUSTER_DOMAIN,
};
use crate::infrastructure::kubernetes::client::{NgctlKubeClient, NgctlKubeClientImpl};
use crate::shared::error::KubeError;
use chrono::{DateTime, Utc};
use k8s_openapi::api::core::v1::{Node, PersistentVolume, Pod, Service};
use std::collections::HashMap;

pub const SERVICE_TYPE_NODE_PORT: &str = "NodePort";
pub const SERVICE_TYPE_CLUSTER_IP: &str = "ClusterIP";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub component: String,
    pub port_name: String,
    pub service_type: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PodSummary {
    pub name: String,
    pub ready: bool,
    pub phase: String,
    pub memory: String,
    pub cpu: String,
    pub restarts: i32,
    pub created: Option<DateTime<Utc>>,
    pub host_ip: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeSummary {
    pub volume: String,
    pub claim: String,
    pub status: String,
    pub capacity: String,
    pub host_ip: String,
}

pub struct NebulaClusterDescriptor {
    client: Box<dyn NgctlKubeClient>,
    namespace: String,
}

impl NebulaClusterDescriptor {
    pub async fn new_with_config(
        namespace: String,
        kubeconfig_path: Option<String>,
        context: Option<String>,
    ) -> Result<Self, KubeError> {
        let client =
            NgctlKubeClientImpl::new_with_config(namespace.clone(), kubeconfig_path, context)
                .await?;
        Ok(Self {
            client: Box::new(client),
            namespace,
        })
    }

    pub fn with_client(client: Box<dyn NgctlKubeClient>) -> Self {
        let namespace = client.namespace().to_string();
        Self { client, namespace }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Confirms the cluster exists before it becomes the selected one.
    pub async fn use_cluster(&self, name: &str) -> Result<NebulaCluster, KubeError> {
        self.client.get_nebula_cluster(name).await
    }

    pub async fn get_cluster(&self, name: &str) -> Result<NebulaCluster, KubeError> {
        self.client.get_nebula_cluster(name).await
    }

    pub async fn list_clusters(&self, all_namespaces: bool) -> Result<Vec<NebulaCluster>, KubeError> {
        let mut clusters = self.client.list_nebula_clusters(all_namespaces).await?;
        clusters.sort_by(|a, b| (&a.namespace, &a.name).cmp(&(&b.namespace, &b.name)));
        Ok(clusters)
    }

    /// First service of the component, or "no service found".
    pub async fn component_service(
        &self,
        cluster: &str,
        component: Component,
    ) -> Result<Service, KubeError> {
        let selector = component_selector(cluster, Some(component));
        self.client
            .list_services(&selector)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                KubeError::InvalidResource(format!(
                    "no service found for {} of cluster {} in namespace {}",
                    component.as_str(),
                    cluster,
                    self.namespace
                ))
            })
    }

    pub async fn graphd_service_name(&self, cluster: &str) -> Result<String, KubeError> {
        let service = self.component_service(cluster, Component::Graphd).await?;
        Ok(service.metadata.name.unwrap_or_default())
    }

    /// NodePort endpoints of graphd on every node, then the in-cluster
    /// address of every component port.
    pub async fn endpoints(&self, cluster: &str) -> Result<Vec<Endpoint>, KubeError> {
        let graphd = self.component_service(cluster, Component::Graphd).await?;
        let mut endpoints = Vec::new();

        if service_type(&graphd) == SERVICE_TYPE_NODE_PORT {
            let nodes = self.client.list_nodes().await?;
            endpoints.extend(node_port_endpoints(
                Component::Graphd,
                &graphd,
                &internal_ips(&nodes),
            ));
        }

        for component in Component::ALL {
            let service = self.component_service(cluster, component).await?;
            endpoints.extend(cluster_ip_endpoints(component, &service));
        }
        Ok(endpoints)
    }

    pub async fn component_pods(
        &self,
        cluster: &str,
        component: Component,
        all_namespaces: bool,
    ) -> Result<Vec<PodSummary>, KubeError> {
        let selector = if all_namespaces {
            any_component_selector()
        } else {
            component_selector(cluster, Some(component))
        };
        let pods = self.client.list_pods(&selector, all_namespaces).await?;
        Ok(pods.iter().map(PodSummary::from_pod).collect())
    }

    pub async fn volumes(
        &self,
        cluster: &str,
        all_namespaces: bool,
    ) -> Result<Vec<VolumeSummary>, KubeError> {
        let pv_selector = if all_namespaces {
            format!("{}={}", LABEL_NAME, LABEL_NAME_VALUE)
        } else {
            component_selector(cluster, None)
        };
        let volumes = self.client.list_persistent_volumes(&pv_selector).await?;

        let pod_selector = if all_namespaces {
            any_component_selector()
        } else {
            component_selector(cluster, None)
        };
        let pods = self.client.list_pods(&pod_selector, all_namespaces).await?;

        let namespace = if all_namespaces {
            None
        } else {
            Some(self.namespace.as_str())
        };
        Ok(volume_summaries(&volumes, &claim_host_ips(&pods), namespace))
    }

    /// Image of the nebula-operator controller manager, if it is installed.
    pub async fn operator_image(&self, operator_namespace: &str) -> Result<Option<String>, KubeError> {
        let deployments = self
            .client
            .list_deployments(operator_namespace, OPERATOR_SELECTOR)
            .await?;
        Ok(deployments.into_iter().next().and_then(|d| {
            d.spec
                .and_then(|s| s.template.spec)
                .and_then(|s| s.containers.into_iter().next())
                .and_then(|c| c.image)
        }))
    }
}

impl PodSummary {
    pub fn from_pod(pod: &Pod) -> Self {
        let first_status = pod
            .status
            .as_ref()
            .and_then(|s| s.container_statuses.as_ref())
            .and_then(|statuses| statuses.first());
        let requests = pod
            .spec
            .as_ref()
            .and_then(|s| s.containers.first())
            .and_then(|c| c.resources.as_ref())
            .and_then(|r| r.requests.as_ref());
        let request = |key: &str| {
            requests
                .and_then(|r| r.get(key))
                .map(|q| q.0.clone())
                .unwrap_or_default()
        };

        Self {
            name: pod.metadata.name.clone().unwrap_or_default(),
            ready: first_status.map(|s| s.ready).unwrap_or(false),
            phase: pod
                .status
                .as_ref()
                .and_then(|s| s.phase.clone())
                .unwrap_or_default(),
            memory: request("memory"),
            cpu: request("cpu"),
            restarts: first_status.map(|s| s.restart_count).unwrap_or(0),
            created: pod.metadata.creation_timestamp.as_ref().map(|t| t.0),
            host_ip: pod
                .status
                .as_ref()
                .and_then(|s| s.host_ip.clone())
                .unwrap_or_default(),
        }
    }
}

/// `cluster=<name>[,component=<kind>],name=nebula-graph`
pub fn component_selector(cluster: &str, component: Option<Component>) -> String {
    match component {
        Some(component) => format!(
            "{}={},{}={},{}={}",
            LABEL_CLUSTER,
            cluster,
            LABEL_COMPONENT,
            component.as_str(),
            LABEL_NAME,
            LABEL_NAME_VALUE
        ),
        None => format!(
            "{}={},{}={}",
            LABEL_CLUSTER, cluster, LABEL_NAME, LABEL_NAME_VALUE
        ),
    }
}

fn any_component_selector() -> String {
    format!("{}={},{}", LABEL_NAME, LABEL_NAME_VALUE, LABEL_COMPONENT)
}

fn service_type(service: &Service) -> &str {
    service
        .spec
        .as_ref()
        .and_then(|s| s.type_.as_deref())
        .unwrap_or(SERVICE_TYPE_CLUSTER_IP)
}

pub fn internal_ips(nodes: &[Node]) -> Vec<String> {
    nodes
        .iter()
        .filter_map(|n| n.status.as_ref())
        .filter_map(|s| s.addresses.as_ref())
        .flatten()
        .filter(|a| a.type_ == "InternalIP")
        .map(|a| a.address.clone())
        .collect()
}

pub fn node_port_endpoints(component: Component, service: &Service, ips: &[String]) -> Vec<Endpoint> {
    let ports = service.spec.as_ref().and_then(|s| s.ports.as_ref());
    let mut endpoints = Vec::new();
    for port in ports.into_iter().flatten() {
        let node_port = match port.node_port {
            Some(p) if p > 0 => p,
            _ => continue,
        };
        for ip in ips {
            endpoints.push(Endpoint {
                component: component.as_str().to_string(),
                port_name: port.name.clone().unwrap_or_default(),
                service_type: SERVICE_TYPE_NODE_PORT.to_string(),
                address: format!("{}:{}", ip, node_port),
            });
        }
    }
    endpoints
}

pub fn cluster_ip_endpoints(component: Component, service: &Service) -> Vec<Endpoint> {
    let name = service.metadata.name.as_deref().unwrap_or_default();
    let namespace = service.metadata.namespace.as_deref().unwrap_or_default();
    service
        .spec
        .as_ref()
        .and_then(|s| s.ports.as_ref())
        .into_iter()
        .flatten()
        .map(|port| Endpoint {
            component: component.as_str().to_string(),
            port_name: port.name.clone().unwrap_or_default(),
            service_type: SERVICE_TYPE_CLUSTER_IP.to_string(),
            address: format!(
                "{}.{}.svc.{}:{}",
                name, namespace, POD_CLUSTER_DOMAIN, port.port
            ),
        })
        .collect()
}

/// `<namespace>/<claim>` to the host IP of the pod mounting it
pub fn claim_host_ips(pods: &[Pod]) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for pod in pods {
        let namespace = pod.metadata.namespace.clone().unwrap_or_default();
        let host_ip = pod
            .status
            .as_ref()
            .and_then(|s| s.host_ip.clone())
            .unwrap_or_default();
        let volumes = pod.spec.as_ref().and_then(|s| s.volumes.as_ref());
        for claim in volumes
            .into_iter()
            .flatten()
            .filter_map(|v| v.persistent_volume_claim.as_ref())
        {
            map.insert(format!("{}/{}", namespace, claim.claim_name), host_ip.clone());
        }
    }
    map
}

/// Bound volumes only; `namespace` of `None` keeps every namespace.
pub fn volume_summaries(
    volumes: &[PersistentVolume],
    host_ips: &HashMap<String, String>,
    namespace: Option<&str>,
) -> Vec<VolumeSummary> {
    volumes
        .iter()
        .filter_map(|pv| {
            let claim = pv.spec.as_ref()?.claim_ref.as_ref()?;
            let claim_namespace = claim.namespace.clone().unwrap_or_default();
            if namespace.is_some_and(|ns| ns != claim_namespace) {
                return None;
            }
            let claim_name = claim.name.clone().unwrap_or_default();
            Some(VolumeSummary {
                volume: pv.metadata.name.clone().unwrap_or_default(),
                status: pv
                    .status
                    .as_ref()
                    .and_then(|s| s.phase.clone())
                    .unwrap_or_default(),
                capacity: pv
                    .spec
                    .as_ref()
                    .and_then(|s| s.capacity.as_ref())
                    .and_then(|c| c.get("storage"))
                    .map(|q| q.0.clone())
                    .unwrap_or_default(),
                host_ip: host_ips
                    .get(&format!("{}/{}", claim_namespace, claim_name))
                    .cloned()
                    .unwrap_or_default(),
                claim: claim_name,
            })
        })
        .collect()
}
