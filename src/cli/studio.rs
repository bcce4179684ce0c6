//! nebula-graph-studio install and uninstall

use super::commands::KubeArgs;
use crate::domain::cluster::validator::{validate_node_port, validate_resource_name};
use crate::domain::workload::{install_studio, uninstall_studio};
use crate::infrastructure::constants::{
    DEFAULT_NAMESPACE, DEFAULT_STUDIO_IMAGE, DEFAULT_STUDIO_NAME, DEFAULT_STUDIO_NODE_PORT,
};
use crate::infrastructure::kubernetes::resources::StudioBuilder;
use crate::infrastructure::kubernetes::NgctlKubeClientImpl;
use clap::{Parser, Subcommand};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use tracing::info;

#[derive(Parser, Debug, Clone)]
pub struct StudioCommand {
    #[command(subcommand)]
    pub action: StudioAction,
}

#[derive(Subcommand, Debug, Clone)]
pub enum StudioAction {
    /// Install nebula-graph-studio as a Deployment exposed through a NodePort Service
    Install(InstallStudioCommand),

    /// Remove the studio Deployment and Service created by ngctl
    Uninstall(UninstallStudioCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct InstallStudioCommand {
    /// Name of the studio Deployment and Service
    #[arg(long, default_value = DEFAULT_STUDIO_NAME)]
    pub name: String,

    /// Kubernetes namespace
    #[arg(long, short = 'n', default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    /// Node port the studio web UI is exposed on
    #[arg(long, alias = "nodePort", default_value_t = DEFAULT_STUDIO_NODE_PORT)]
    pub node_port: i32,

    #[arg(long, default_value = DEFAULT_STUDIO_IMAGE)]
    pub image: String,

    /// Print the manifests as YAML instead of applying them
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct UninstallStudioCommand {
    #[arg(long, default_value = DEFAULT_STUDIO_NAME)]
    pub name: String,

    /// Kubernetes namespace
    #[arg(long, short = 'n', default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,
}

impl StudioCommand {
    pub async fn execute(&self, kube: &KubeArgs) -> anyhow::Result<()> {
        match &self.action {
            StudioAction::Install(cmd) => cmd.execute(kube).await,
            StudioAction::Uninstall(cmd) => cmd.execute(kube).await,
        }
    }
}

impl InstallStudioCommand {
    fn builder(&self) -> StudioBuilder {
        StudioBuilder::new(
            self.name.clone(),
            self.namespace.clone(),
            self.image.clone(),
            self.node_port,
        )
    }

    /// Deployment and Service as a multi-document YAML stream
    pub fn render_manifests(&self) -> anyhow::Result<String> {
        let builder = self.builder();
        let deployment = serde_yaml::to_string(&builder.build_deployment())?;
        let service = serde_yaml::to_string(&builder.build_service())?;
        Ok(format!("---\n{}---\n{}", deployment, service))
    }

    pub async fn execute(&self, kube: &KubeArgs) -> anyhow::Result<()> {
        validate_resource_name("studio", &self.name)?;
        validate_node_port(self.node_port)?;

        if self.dry_run {
            print!("{}", self.render_manifests()?);
            return Ok(());
        }

        let client = NgctlKubeClientImpl::new_with_config(
            self.namespace.clone(),
            kube.kubeconfig.clone(),
            kube.context.clone(),
        )
        .await?;
        let deployments = client.resource_api::<Deployment>(&self.namespace);
        let services = client.resource_api::<Service>(&self.namespace);

        let outcome = install_studio(&deployments, &services, &self.builder()).await?;
        info!(
            "Deployment {}: {}, Service {}: {}",
            self.name,
            outcome.deployment.as_str(),
            self.name,
            outcome.service.as_str()
        );
        info!(
            "nebula-graph-studio {} is installed in namespace {}, web UI on node port {}",
            self.name, self.namespace, self.node_port
        );
        Ok(())
    }
}

impl UninstallStudioCommand {
    pub async fn execute(&self, kube: &KubeArgs) -> anyhow::Result<()> {
        validate_resource_name("studio", &self.name)?;

        let client = NgctlKubeClientImpl::new_with_config(
            self.namespace.clone(),
            kube.kubeconfig.clone(),
            kube.context.clone(),
        )
        .await?;
        let deployments = client.resource_api::<Deployment>(&self.namespace);
        let services = client.resource_api::<Service>(&self.namespace);

        let outcome = uninstall_studio(&deployments, &services, &self.name).await?;
        info!(
            "Deployment {}: {}, Service {}: {}",
            self.name,
            outcome.deployment.as_str(),
            self.name,
            outcome.service.as_str()
        );
        info!(
            "nebula-graph-studio {} is uninstalled from namespace {}",
            self.name, self.namespace
        );
        Ok(())
    }
}
