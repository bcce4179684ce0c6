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


use crate::domain::cluster::nebula::NebulaCluster;
use crate::infrastructure::constants::{
    NEBULA_GROUP, NEBULA_KIND, NEBULA_PLURAL, NEBULA_VERSION,
};
use crate::infrastructure::kubernetes::reconciler::{HasLabels, ResourceApi};
use crate::shared::error::KubeError;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Node, PersistentVolume, Pod, Service};
use k8s_openapi::NamespaceResourceScope;
use kube::api::{DeleteParams, ListParams, Patch, PatchParams, PostParams};
use kube::core::{ApiResource, DynamicObject, GroupVersionKind};
use kube::{Api, Client};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// Field manager used for server-side apply
const FIELD_MANAGER: &str = "ngctl";

#[async_trait::async_trait]
pub trait NgctlKubeClient: Send + Sync {
    fn namespace(&self) -> &str;

    async fn get_nebula_cluster(&self, name: &str) -> Result<NebulaCluster, KubeError>;

    async fn list_nebula_clusters(
        &self,
        all_namespaces: bool,
    ) -> Result<Vec<NebulaCluster>, KubeError>;

    async fn list_services(&self, label_selector: &str) -> Result<Vec<Service>, KubeError>;

    async fn list_pods(
        &self,
        label_selector: &str,
        all_namespaces: bool,
    ) -> Result<Vec<Pod>, KubeError>;

    async fn list_nodes(&self) -> Result<Vec<Node>, KubeError>;

    async fn list_persistent_volumes(
        &self,
        label_selector: &str,
    ) -> Result<Vec<PersistentVolume>, KubeError>;

    async fn list_deployments(
        &self,
        namespace: &str,
        label_selector: &str,
    ) -> Result<Vec<Deployment>, KubeError>;
}

pub struct NgctlKubeClientImpl {
    client: Client,
    namespace: String,
}

impl NgctlKubeClientImpl {
    pub async fn new(namespace: String) -> Result<Self, KubeError> {
        let client = Client::try_default().await.map_err(|e| {
            KubeError::KubeError(format!("Failed to create Kubernetes client: {}", e))
        })?;

        Ok(Self { client, namespace })
    }

    pub async fn new_with_config(
        namespace: String,
        kubeconfig_path: Option<String>,
        context: Option<String>,
    ) -> Result<Self, KubeError> {
        use kube::config::{KubeConfigOptions, Kubeconfig};

        if kubeconfig_path.is_none() && context.is_none() {
            return Self::new(namespace).await;
        }

        let kubeconfig = if let Some(path) = kubeconfig_path {
            Kubeconfig::read_from(path)
                .map_err(|e| KubeError::KubeError(format!("Failed to load kubeconfig: {}", e)))?
        } else {
            Kubeconfig::read()
                .map_err(|e| KubeError::KubeError(format!("Failed to load kubeconfig: {}", e)))?
        };

        let config_options = KubeConfigOptions {
            context,
            cluster: None,
            user: None,
        };

        let config = kube::Config::from_custom_kubeconfig(kubeconfig, &config_options)
            .await
            .map_err(|e| {
                KubeError::KubeError(format!("Failed to create Kubernetes config: {}", e))
            })?;

        let client = Client::try_from(config).map_err(|e| {
            KubeError::KubeError(format!("Failed to create Kubernetes client: {}", e))
        })?;

        Ok(Self { client, namespace })
    }

    /// Reconciler handle for one kind in `namespace`
    pub fn resource_api<K>(&self, namespace: &str) -> KubeResourceApi<K>
    where
        K: kube::Resource<Scope = NamespaceResourceScope>,
        <K as kube::Resource>::DynamicType: Default,
    {
        KubeResourceApi::namespaced(self.client.clone(), namespace)
    }

    pub fn pods(&self, namespace: &str) -> Api<Pod> {
        Api::namespaced(self.client.clone(), namespace)
    }

    fn nebula_cluster_resource() -> ApiResource {
        let gvk = GroupVersionKind::gvk(NEBULA_GROUP, NEBULA_VERSION, NEBULA_KIND);
        ApiResource::from_gvk_with_plural(&gvk, NEBULA_PLURAL)
    }
}

#[async_trait::async_trait]
impl NgctlKubeClient for NgctlKubeClientImpl {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn get_nebula_cluster(&self, name: &str) -> Result<NebulaCluster, KubeError> {
        let ar = Self::nebula_cluster_resource();
        let api: Api<DynamicObject> = Api::namespaced_with(self.client.clone(), &self.namespace, &ar);
        let object = api.get(name).await.map_err(|e| {
            if let kube::Error::Api(ae) = e {
                if ae.code == 404 {
                    KubeError::not_found(NEBULA_KIND, name, &self.namespace)
                } else {
                    KubeError::KubeError(ae.message)
                }
            } else {
                KubeError::KubeError(e.to_string())
            }
        })?;
        NebulaCluster::try_from(object)
    }

    async fn list_nebula_clusters(
        &self,
        all_namespaces: bool,
    ) -> Result<Vec<NebulaCluster>, KubeError> {
        let ar = Self::nebula_cluster_resource();
        let api: Api<DynamicObject> = if all_namespaces {
            Api::all_with(self.client.clone(), &ar)
        } else {
            Api::namespaced_with(self.client.clone(), &self.namespace, &ar)
        };

        let list = api.list(&ListParams::default()).await?;
        list.items.into_iter().map(NebulaCluster::try_from).collect()
    }

    async fn list_services(&self, label_selector: &str) -> Result<Vec<Service>, KubeError> {
        let api: Api<Service> = Api::namespaced(self.client.clone(), &self.namespace);
        let list_params = ListParams::default().labels(label_selector);

        api.list(&list_params)
            .await
            .map(|list| list.items)
            .map_err(|e| KubeError::KubeError(e.to_string()))
    }

    async fn list_pods(
        &self,
        label_selector: &str,
        all_namespaces: bool,
    ) -> Result<Vec<Pod>, KubeError> {
        let api: Api<Pod> = if all_namespaces {
            Api::all(self.client.clone())
        } else {
            Api::namespaced(self.client.clone(), &self.namespace)
        };
        let lp = ListParams::default().labels(label_selector);

        let pods = api.list(&lp).await?;
        Ok(pods.items)
    }

    async fn list_nodes(&self) -> Result<Vec<Node>, KubeError> {
        let api: Api<Node> = Api::all(self.client.clone());
        let nodes = api.list(&ListParams::default()).await?;
        Ok(nodes.items)
    }

    async fn list_persistent_volumes(
        &self,
        label_selector: &str,
    ) -> Result<Vec<PersistentVolume>, KubeError> {
        let api: Api<PersistentVolume> = Api::all(self.client.clone());
        let lp = ListParams::default().labels(label_selector);
        let pvs = api.list(&lp).await?;
        Ok(pvs.items)
    }

    async fn list_deployments(
        &self,
        namespace: &str,
        label_selector: &str,
    ) -> Result<Vec<Deployment>, KubeError> {
        let api: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
        let lp = ListParams::default().labels(label_selector);
        let deployments = api.list(&lp).await?;
        Ok(deployments.items)
    }
}

/// `ResourceApi` backed by a namespaced `kube::Api`
pub struct KubeResourceApi<K> {
    api: Api<K>,
    namespace: String,
}

impl<K> KubeResourceApi<K>
where
    K: kube::Resource<Scope = NamespaceResourceScope>,
    <K as kube::Resource>::DynamicType: Default,
{
    pub fn namespaced(client: Client, namespace: &str) -> Self {
        Self {
            api: Api::namespaced(client, namespace),
            namespace: namespace.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl<K> ResourceApi for KubeResourceApi<K>
where
    K: kube::Resource + HasLabels + Clone + DeserializeOwned + Serialize + Debug + Send + Sync,
    <K as kube::Resource>::DynamicType: Default,
{
    type Resource = K;

    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn fetch(&self, name: &str) -> Result<Option<K>, KubeError> {
        match self.api.get(name).await {
            Ok(resource) => Ok(Some(resource)),
            Err(kube::Error::Api(ae)) if ae.code == 404 => Ok(None),
            Err(e) => Err(KubeError::KubeError(e.to_string())),
        }
    }

    async fn create(&self, resource: &K) -> Result<K, KubeError> {
        let pp = PostParams::default();
        match self.api.create(&pp, resource).await {
            Ok(created) => Ok(created),
            Err(kube::Error::Api(ae)) if ae.code == 409 => Err(KubeError::already_exists(
                K::KIND,
                resource.meta().name.clone().unwrap_or_default(),
                &self.namespace,
            )),
            Err(e) => Err(KubeError::KubeError(e.to_string())),
        }
    }

    async fn replace(&self, name: &str, resource: &K) -> Result<K, KubeError> {
        let patch_params = PatchParams::apply(FIELD_MANAGER).force();
        let patch = serde_json::to_value(resource).map_err(|e| {
            KubeError::KubeError(format!("Failed to serialize {}: {}", K::KIND, e))
        })?;
        let applied = self
            .api
            .patch(name, &patch_params, &Patch::Apply(patch))
            .await?;
        Ok(applied)
    }

    async fn delete(&self, name: &str) -> Result<(), KubeError> {
        let dp = DeleteParams::default();

        self.api.delete(name, &dp).await?;
        Ok(())
    }
}
