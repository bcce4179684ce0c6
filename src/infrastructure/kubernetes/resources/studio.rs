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


use crate::infrastructure::constants::{
    IMAGE_PULL_IF_NOT_PRESENT, PORT_NAME_HTTP, STUDIO_CONTAINER_NAME, STUDIO_HTTP_PORT,
    STUDIO_LABEL_KEY,
};
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, HTTPGetAction, PodSpec, PodTemplateSpec, Probe,
    ResourceRequirements, Service, ServicePort, ServiceSpec,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use std::collections::BTreeMap;

pub struct StudioBuilder {
    name: String,
    namespace: String,
    image: String,
    node_port: i32,
    replicas: i32,
}

impl StudioBuilder {
    pub fn new(name: String, namespace: String, image: String, node_port: i32) -> Self {
        Self {
            name,
            namespace,
            image,
            node_port,
            replicas: 1,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn build_deployment(&self) -> Deployment {
        let labels = self.get_labels();

        let container = Container {
            name: STUDIO_CONTAINER_NAME.to_string(),
            image: Some(self.image.clone()),
            image_pull_policy: Some(IMAGE_PULL_IF_NOT_PRESENT.to_string()),
            ports: Some(vec![ContainerPort {
                name: Some(PORT_NAME_HTTP.to_string()),
                container_port: STUDIO_HTTP_PORT,
                ..Default::default()
            }]),
            resources: Some(ResourceRequirements {
                requests: Some(resource_list("200m", "256Mi")),
                limits: Some(resource_list("1", "1Gi")),
                ..Default::default()
            }),
            liveness_probe: Some(http_probe(10, 10)),
            readiness_probe: Some(http_probe(5, 5)),
            ..Default::default()
        };

        Deployment {
            metadata: self.metadata(),
            spec: Some(DeploymentSpec {
                replicas: Some(self.replicas),
                selector: LabelSelector {
                    match_labels: Some(labels.clone()),
                    ..Default::default()
                },
                template: PodTemplateSpec {
                    metadata: Some(ObjectMeta {
                        labels: Some(labels),
                        ..Default::default()
                    }),
                    spec: Some(PodSpec {
                        containers: vec![container],
                        ..Default::default()
                    }),
                },
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    pub fn build_service(&self) -> Service {
        Service {
            metadata: self.metadata(),
            spec: Some(ServiceSpec {
                type_: Some("NodePort".to_string()),
                selector: Some(self.get_labels()),
                ports: Some(vec![ServicePort {
                    name: Some(PORT_NAME_HTTP.to_string()),
                    port: STUDIO_HTTP_PORT,
                    node_port: Some(self.node_port),
                    target_port: Some(IntOrString::Int(STUDIO_HTTP_PORT)),
                    protocol: Some("TCP".to_string()),
                    ..Default::default()
                }]),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    /// The ownership label doubles as the pod selector
    pub fn get_labels(&self) -> BTreeMap<String, String> {
        let mut labels = BTreeMap::new();
        labels.insert(STUDIO_LABEL_KEY.to_string(), self.name.clone());
        labels
    }

    fn metadata(&self) -> ObjectMeta {
        ObjectMeta {
            name: Some(self.name.clone()),
            namespace: Some(self.namespace.clone()),
            labels: Some(self.get_labels()),
            ..Default::default()
        }
    }
}

fn resource_list(cpu: &str, memory: &str) -> BTreeMap<String, Quantity> {
    let mut list = BTreeMap::new();
    list.insert("cpu".to_string(), Quantity(cpu.to_string()));
    list.insert("memory".to_string(), Quantity(memory.to_string()));
    list
}

fn http_probe(initial_delay_seconds: i32, period_seconds: i32) -> Probe {
    Probe {
        http_get: Some(HTTPGetAction {
            path: Some("/".to_string()),
            port: IntOrString::Int(STUDIO_HTTP_PORT),
            ..Default::default()
        }),
        failure_threshold: Some(3),
        initial_delay_seconds: Some(initial_delay_seconds),
        period_seconds: Some(period_seconds),
        success_threshold: Some(1),
        timeout_seconds: Some(1),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> StudioBuilder {
        StudioBuilder::new(
            "studio".to_string(),
            "default".to_string(),
            "vesoft/nebula-graph-studio:v3.7.0".to_string(),
            30180,
        )
    }

    #[test]
    fn test_deployment_is_labelled_and_selected_by_owner() {
        let deployment = builder().build_deployment();
        let labels = deployment.metadata.labels.as_ref().unwrap();
        assert_eq!(labels.get("ngctl/nebula-studio"), Some(&"studio".to_string()));

        let spec = deployment.spec.unwrap();
        assert_eq!(spec.replicas, Some(1));
        assert_eq!(spec.selector.match_labels.as_ref(), Some(labels));

        let container = &spec.template.spec.unwrap().containers[0];
        assert_eq!(container.name, "studio");
        assert_eq!(container.ports.as_ref().unwrap()[0].container_port, 7001);
        let probe = container.readiness_probe.as_ref().unwrap();
        assert_eq!(probe.initial_delay_seconds, Some(5));
        let limits = container.resources.as_ref().unwrap().limits.as_ref().unwrap();
        assert_eq!(limits.get("memory"), Some(&Quantity("1Gi".to_string())));
    }

    #[test]
    fn test_service_exposes_node_port() {
        let service = builder().build_service();
        assert_eq!(service.metadata.name.as_deref(), Some("studio"));
        let spec = service.spec.unwrap();
        assert_eq!(spec.type_.as_deref(), Some("NodePort"));
        let port = &spec.ports.unwrap()[0];
        assert_eq!(port.port, 7001);
        assert_eq!(port.node_port, Some(30180));
    }
}
