//! Interactive nebula-console inside the cluster

use super::commands::KubeArgs;
use super::k8s::selected_cluster;
use crate::domain::cluster::validator::validate_resource_name;
use crate::domain::cluster::NebulaClusterDescriptor;
use crate::domain::config::ConsoleOptions;
use crate::domain::workload::prepare_console;
use crate::infrastructure::constants::{
    DEFAULT_CONSOLE_IMAGE, DEFAULT_CONSOLE_POD_NAME, DEFAULT_WAIT_TIMEOUT_SECS,
};
use crate::infrastructure::kubernetes::exec::attach_interactive;
use crate::infrastructure::kubernetes::resources::ConsoleBuilder;
use crate::infrastructure::kubernetes::wait::wait_for_pod_running;
use crate::infrastructure::kubernetes::NgctlKubeClientImpl;
use clap::Parser;
use k8s_openapi::api::core::v1::{ConfigMap, Pod};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug, Clone)]
pub struct ConsoleCommand {
    /// nebula-console image
    #[arg(long, default_value = DEFAULT_CONSOLE_IMAGE)]
    pub image: String,

    /// Name of the console pod, also used for its container and config map
    #[arg(long, short = 'n', alias = "pod_name", default_value = DEFAULT_CONSOLE_POD_NAME)]
    pub pod_name: String,

    #[arg(long, short = 'u', default_value = "root")]
    pub user: String,

    #[arg(long, short = 'p', default_value = "")]
    pub password: String,

    /// Connection timeout in milliseconds
    #[arg(long, short = 't', default_value_t = 120)]
    pub timeout: u32,

    /// Statement to execute, the console exits afterwards
    #[arg(long, short = 'e')]
    pub eval: Option<String>,

    /// Local file of statements to execute
    #[arg(long, short = 'f', value_name = "PATH")]
    pub file: Option<PathBuf>,

    #[arg(long, alias = "enable_ssl")]
    pub enable_ssl: bool,

    #[arg(long, alias = "ssl_root_ca_path", value_name = "PATH")]
    pub ssl_root_ca_path: Option<PathBuf>,

    #[arg(long, alias = "ssl_cert_path", value_name = "PATH")]
    pub ssl_cert_path: Option<PathBuf>,

    #[arg(long, alias = "ssl_private_key_path", value_name = "PATH")]
    pub ssl_private_key_path: Option<PathBuf>,

    /// Seconds to wait for the console pod to be running
    #[arg(long, default_value_t = DEFAULT_WAIT_TIMEOUT_SECS)]
    pub wait_timeout: u64,
}

impl ConsoleCommand {
    pub fn options(&self) -> ConsoleOptions {
        ConsoleOptions {
            user: self.user.clone(),
            password: self.password.clone(),
            timeout_ms: self.timeout,
            eval: self.eval.clone(),
            file: self.file.clone(),
            enable_ssl: self.enable_ssl,
            ssl_root_ca_path: self.ssl_root_ca_path.clone(),
            ssl_cert_path: self.ssl_cert_path.clone(),
            ssl_private_key_path: self.ssl_private_key_path.clone(),
        }
    }

    pub async fn execute(&self, kube: &KubeArgs) -> anyhow::Result<()> {
        validate_resource_name("console pod", &self.pod_name)?;
        let preference = selected_cluster()?;
        let namespace = preference.namespace.clone();

        let client = NgctlKubeClientImpl::new_with_config(
            namespace.clone(),
            kube.kubeconfig.clone(),
            kube.context.clone(),
        )
        .await?;
        let config_maps = client.resource_api::<ConfigMap>(&namespace);
        let pods = client.resource_api::<Pod>(&namespace);
        let pod_api = client.pods(&namespace);
        let descriptor = NebulaClusterDescriptor::with_client(Box::new(client));

        let options = self.options();
        let builder = ConsoleBuilder::new(
            self.pod_name.clone(),
            namespace.clone(),
            self.image.clone(),
            &options,
        );
        let outcome = prepare_console(&config_maps, &pods, &builder).await?;
        info!("console pod {} {}", self.pod_name, outcome.as_str());

        wait_for_pod_running(
            pod_api.clone(),
            &self.pod_name,
            Duration::from_secs(self.wait_timeout),
        )
        .await?;

        let graphd_service = descriptor.graphd_service_name(&preference.name).await?;
        let command = options.console_command(&graphd_service, &namespace);
        attach_interactive(&pod_api, &self.pod_name, &self.pod_name, command).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_map_to_options() {
        let cmd = ConsoleCommand::try_parse_from([
            "console",
            "-u",
            "admin",
            "-p",
            "secret",
            "-t",
            "0",
            "-e",
            "SHOW SPACES;",
            "--enable-ssl",
            "--ssl-cert-path",
            "/tmp/cert.pem",
        ])
        .unwrap();
        let options = cmd.options();
        assert_eq!(options.user, "admin");
        assert_eq!(options.password, "secret");
        assert_eq!(options.timeout_ms, 0);
        assert_eq!(options.eval.as_deref(), Some("SHOW SPACES;"));
        assert!(options.enable_ssl);
        assert_eq!(options.provided_keys(), vec!["ssl.cert"]);
        assert_eq!(cmd.wait_timeout, 300);
        assert_eq!(cmd.pod_name, "nebula-console");
    }

    #[test]
    fn test_snake_case_flags_still_accepted() {
        let cmd = ConsoleCommand::try_parse_from([
            "console",
            "--pod_name",
            "my-console",
            "--enable_ssl",
            "--ssl_root_ca_path",
            "/tmp/ca.pem",
            "--ssl_cert_path",
            "/tmp/cert.pem",
            "--ssl_private_key_path",
            "/tmp/key.pem",
        ])
        .unwrap();
        assert_eq!(cmd.pod_name, "my-console");
        assert!(cmd.enable_ssl);
        assert_eq!(
            cmd.options().provided_keys(),
            vec!["ssl.ca", "ssl.cert", "private.key"]
        );
    }
}
