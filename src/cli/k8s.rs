//! Cluster inspection commands

use super::commands::KubeArgs;
use super::display::TableRenderer;
use crate::domain::cluster::NebulaClusterDescriptor;
use crate::domain::cluster::Component;
use crate::domain::config::{Preference, PreferenceStore};
use crate::infrastructure::constants::{DEFAULT_NAMESPACE, DEFAULT_OPERATOR_NAMESPACE};
use crate::shared::error::KubeError;
use crate::shared::version::version_string;
use clap::Parser;
use tracing::info;

const KIND_VOLUME: &str = "volume";

pub(crate) async fn descriptor_for(
    kube: &KubeArgs,
    namespace: &str,
) -> anyhow::Result<NebulaClusterDescriptor> {
    let descriptor = NebulaClusterDescriptor::new_with_config(
        namespace.to_string(),
        kube.kubeconfig.clone(),
        kube.context.clone(),
    )
    .await?;
    Ok(descriptor)
}

/// The cluster chosen by `ngctl use`
pub(crate) fn selected_cluster() -> anyhow::Result<Preference> {
    let store = PreferenceStore::locate()?;
    Ok(store.load()?)
}

#[derive(Parser, Debug, Clone)]
pub struct UseCommand {
    /// Name of the NebulaCluster
    pub name: String,

    /// Kubernetes namespace
    #[arg(long, short = 'n', default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,
}

impl UseCommand {
    pub async fn execute(&self, kube: &KubeArgs) -> anyhow::Result<()> {
        let descriptor = descriptor_for(kube, &self.namespace).await?;
        descriptor.use_cluster(&self.name).await?;

        let store = PreferenceStore::locate()?;
        store.save(&Preference {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
        })?;

        info!(
            "use nebula graph cluster {} in namespace {}",
            self.name, self.namespace
        );
        Ok(())
    }
}

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    /// Kubernetes namespace
    #[arg(long, short = 'n', default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    /// List clusters across all namespaces
    #[arg(long, short = 'A')]
    pub all_namespaces: bool,
}

impl ListCommand {
    pub async fn execute(&self, kube: &KubeArgs) -> anyhow::Result<()> {
        let descriptor = descriptor_for(kube, &self.namespace).await?;
        let clusters = descriptor.list_clusters(self.all_namespaces).await?;

        let scope = if self.all_namespaces {
            "all"
        } else {
            self.namespace.as_str()
        };
        println!("{}", TableRenderer::new().render_clusters_list(&clusters, scope));
        Ok(())
    }
}

#[derive(Parser, Debug, Clone)]
pub struct InfoCommand {}

impl InfoCommand {
    pub async fn execute(&self, kube: &KubeArgs) -> anyhow::Result<()> {
        let preference = selected_cluster()?;
        let descriptor = descriptor_for(kube, &preference.namespace).await?;
        let cluster = descriptor.get_cluster(&preference.name).await?;
        let renderer = TableRenderer::new();

        println!("{}", renderer.render_basic_info(&cluster));
        info!("Overview:");
        println!("{}", renderer.render_overview(&cluster));

        let endpoints = descriptor.endpoints(&cluster.name).await?;
        info!("Endpoints:");
        println!("{}", renderer.render_endpoints(&endpoints));
        Ok(())
    }
}

/// What `ngctl get` lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetKind {
    Component(Component),
    Volume,
}

impl std::str::FromStr for GetKind {
    type Err = KubeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == KIND_VOLUME {
            return Ok(GetKind::Volume);
        }
        s.parse::<Component>().map(GetKind::Component).map_err(|_| {
            KubeError::ConfigError(format!(
                "unsupported kind {}, expected one of graphd, metad, storaged, volume",
                s
            ))
        })
    }
}

#[derive(Parser, Debug, Clone)]
pub struct GetCommand {
    /// graphd, metad, storaged or volume
    pub kind: String,

    /// List across all namespaces
    #[arg(long, short = 'A')]
    pub all_namespaces: bool,
}

impl GetCommand {
    pub async fn execute(&self, kube: &KubeArgs) -> anyhow::Result<()> {
        let kind: GetKind = self.kind.parse()?;

        let preference = if self.all_namespaces {
            selected_cluster().unwrap_or_else(|_| Preference {
                namespace: DEFAULT_NAMESPACE.to_string(),
                name: String::new(),
            })
        } else {
            selected_cluster()?
        };

        let descriptor = descriptor_for(kube, &preference.namespace).await?;
        let renderer = TableRenderer::new();

        match kind {
            GetKind::Component(component) => {
                let pods = descriptor
                    .component_pods(&preference.name, component, self.all_namespaces)
                    .await?;
                if !pods.is_empty() {
                    println!("{}", renderer.render_pods(&pods, chrono::Utc::now()));
                }
            }
            GetKind::Volume => {
                let volumes = descriptor
                    .volumes(&preference.name, self.all_namespaces)
                    .await?;
                println!("{}", renderer.render_volumes(&volumes));
            }
        }
        Ok(())
    }
}

#[derive(Parser, Debug, Clone)]
pub struct VersionCommand {
    /// Namespace nebula-operator is installed in
    #[arg(long, default_value = DEFAULT_OPERATOR_NAMESPACE)]
    pub operator_namespace: String,
}

impl VersionCommand {
    pub async fn execute(&self, kube: &KubeArgs) -> anyhow::Result<()> {
        info!("ngctl Version: {}", version_string());

        let descriptor = descriptor_for(kube, &self.operator_namespace).await?;
        match descriptor.operator_image(&self.operator_namespace).await? {
            Some(image) => info!("nebula operator Version: {}", image),
            None => info!("nebula operator is not installed"),
        }
        Ok(())
    }
}
