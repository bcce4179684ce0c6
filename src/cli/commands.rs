// CLI command definitions

use super::console::ConsoleCommand;
use super::k8s::{GetCommand, InfoCommand, ListCommand, UseCommand, VersionCommand};
use super::studio::StudioCommand;
use clap::{Args, Parser};

#[derive(Parser, Debug)]
#[command(
    name = "ngctl",
    version,
    about = "NebulaGraph Kubernetes Command Line Tool",
    long_about = "Inspect NebulaGraph clusters managed by nebula-operator, open a console against them and run the web studio"
)]
pub struct CliArgs {
    #[command(flatten)]
    pub kube: KubeArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Connection flags, accepted before or after any subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct KubeArgs {
    /// Path to kubeconfig file
    /// If not specified, uses default kubeconfig resolution (KUBECONFIG env or ~/.kube/config)
    #[arg(long, global = true)]
    pub kubeconfig: Option<String>,

    /// Kubernetes context to use
    /// If not specified, uses current context from kubeconfig
    #[arg(long, global = true)]
    pub context: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Select the NebulaGraph cluster later commands work on
    Use(UseCommand),

    /// List NebulaGraph clusters
    List(ListCommand),

    /// Show information of the selected cluster
    Info(InfoCommand),

    /// Get graphd, metad, storaged pods or volumes of the selected cluster
    Get(GetCommand),

    /// Open a nebula-console session against the selected cluster
    Console(ConsoleCommand),

    /// Install or uninstall nebula-graph-studio
    Studio(StudioCommand),

    /// Show ngctl and nebula-operator versions
    Version(VersionCommand),
}

impl Commands {
    pub async fn execute(&self, kube: &KubeArgs) -> anyhow::Result<()> {
        match self {
            Commands::Use(cmd) => cmd.execute(kube).await,
            Commands::List(cmd) => cmd.execute(kube).await,
            Commands::Info(cmd) => cmd.execute(kube).await,
            Commands::Get(cmd) => cmd.execute(kube).await,
            Commands::Console(cmd) => cmd.execute(kube).await,
            Commands::Studio(cmd) => cmd.execute(kube).await,
            Commands::Version(cmd) => cmd.execute(kube).await,
        }
    }
}
