//! Table rendering for CLI output

use super::{ColorTheme, StatusIcon};
use crate::domain::cluster::{Component, Endpoint, NebulaCluster, PodSummary, VolumeSummary};
use chrono::{DateTime, Utc};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};

/// Table renderer for formatted output
pub struct TableRenderer {
    theme: ColorTheme,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer {
    pub fn new() -> Self {
        Self {
            theme: ColorTheme::default(),
        }
    }

    fn table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table
    }

    fn header(names: &[&str]) -> Vec<Cell> {
        names
            .iter()
            .map(|n| Cell::new(n).set_alignment(CellAlignment::Left))
            .collect()
    }

    /// `ready/desired` per component, colored by health
    pub fn render_clusters_list(&self, clusters: &[NebulaCluster], scope: &str) -> String {
        if clusters.is_empty() {
            return format!("No NebulaGraph clusters found in namespace(s): {}", scope);
        }

        let mut table = self.table();
        table.set_header(Self::header(&["NAMESPACE", "NAME", "GRAPHD", "METAD", "STORAGED"]));

        for cluster in clusters {
            let mut row = vec![Cell::new(&cluster.namespace), Cell::new(&cluster.name)];
            for component in [Component::Graphd, Component::Metad, Component::Storaged] {
                let ready = cluster.ready_replicas(component);
                let desired = cluster.desired_replicas(component);
                row.push(
                    Cell::new(format!(
                        "{} {}/{}",
                        StatusIcon::get_replica_icon(ready, desired),
                        ready,
                        desired
                    ))
                    .fg(self.theme.get_replica_color(ready, desired))
                    .set_alignment(CellAlignment::Center),
                );
            }
            table.add_row(row);
        }

        let mut output = String::new();
        output.push_str(&format!(
            "╭─ NebulaGraph Clusters {} ─╮\n",
            format!("[{} clusters]", clusters.len()).bright_black()
        ));
        output.push_str(&table.to_string());
        output.push('\n');
        output.push_str(&format!(
            "Legend: {} Healthy  {} Degraded  {} Failed\n",
            StatusIcon::SUCCESS.green(),
            StatusIcon::WARNING.yellow(),
            StatusIcon::ERROR.red()
        ));
        output
    }

    pub fn render_basic_info(&self, cluster: &NebulaCluster) -> String {
        let created = cluster
            .creation_timestamp
            .as_ref()
            .map(|t| t.0.to_rfc3339())
            .unwrap_or_default();

        let mut table = self.table();
        table.add_row(vec![Cell::new("Name"), Cell::new(&cluster.name)]);
        table.add_row(vec![Cell::new("Namespace"), Cell::new(&cluster.namespace)]);
        table.add_row(vec![Cell::new("CreationTimestamp"), Cell::new(created)]);
        table.to_string()
    }

    pub fn render_overview(&self, cluster: &NebulaCluster) -> String {
        let mut table = self.table();
        table.set_header(Self::header(&[
            "",
            "Phase",
            "Ready",
            "Desired",
            "CPU",
            "Memory",
            "DataVolume",
            "LogVolume",
            "Version",
        ]));

        for component in Component::ALL {
            let spec = cluster.component_spec(component);
            let phase = cluster
                .component_status(component)
                .phase
                .clone()
                .unwrap_or_default();
            let ready = cluster.ready_replicas(component);
            let desired = cluster.desired_replicas(component);
            let data_volume = match component {
                Component::Graphd => None,
                _ => spec.data_volume(),
            };

            table.add_row(vec![
                Cell::new(component.title()),
                Cell::new(format!("{} {}", StatusIcon::get_phase_icon(&phase), phase))
                    .fg(self.theme.get_phase_color(&phase)),
                Cell::new(ready).fg(self.theme.get_replica_color(ready, desired)),
                Cell::new(desired),
                Cell::new(spec.cpu_limit().unwrap_or_default()),
                Cell::new(spec.memory_limit().unwrap_or_default()),
                Cell::new(data_volume.unwrap_or_default()),
                Cell::new(spec.log_volume().unwrap_or_default()),
                Cell::new(spec.version.clone().unwrap_or_default()),
            ]);
        }
        table.to_string()
    }

    pub fn render_endpoints(&self, endpoints: &[Endpoint]) -> String {
        let mut table = self.table();
        table.set_header(Self::header(&["COMPONENT", "PORT", "TYPE", "ENDPOINT"]));
        for endpoint in endpoints {
            table.add_row(vec![
                Cell::new(&endpoint.component),
                Cell::new(&endpoint.port_name),
                Cell::new(&endpoint.service_type),
                Cell::new(&endpoint.address).fg(self.theme.info),
            ]);
        }
        table.to_string()
    }

    pub fn render_pods(&self, pods: &[PodSummary], now: DateTime<Utc>) -> String {
        let mut table = self.table();
        table.set_header(Self::header(&[
            "NAME", "READY", "STATUS", "MEMORY", "CPU", "RESTARTS", "AGE", "NODE",
        ]));
        for pod in pods {
            let age = pod
                .created
                .map(|created| humanize_age(now.signed_duration_since(created)))
                .unwrap_or_default();
            let ready_color = if pod.ready {
                self.theme.success
            } else {
                self.theme.error
            };
            table.add_row(vec![
                Cell::new(&pod.name),
                Cell::new(pod.ready).fg(ready_color),
                Cell::new(&pod.phase).fg(self.theme.get_phase_color(&pod.phase)),
                Cell::new(&pod.memory),
                Cell::new(&pod.cpu),
                Cell::new(pod.restarts),
                Cell::new(age),
                Cell::new(&pod.host_ip),
            ]);
        }
        table.to_string()
    }

    pub fn render_volumes(&self, volumes: &[VolumeSummary]) -> String {
        let mut table = self.table();
        table.set_header(Self::header(&["VOLUME", "CLAIM", "STATUS", "CAPACITY", "HOST IP"]));
        for volume in volumes {
            table.add_row(vec![
                Cell::new(&volume.volume),
                Cell::new(&volume.claim),
                Cell::new(&volume.status).fg(self.theme.get_phase_color(&volume.status)),
                Cell::new(&volume.capacity),
                Cell::new(&volume.host_ip),
            ]);
        }
        table.to_string()
    }
}

/// Two most significant units, e.g. `3d4h`, `5m12s`
pub fn humanize_age(age: chrono::Duration) -> String {
    let secs = age.num_seconds().max(0);
    let (days, hours, minutes, seconds) = (
        secs / 86_400,
        (secs % 86_400) / 3_600,
        (secs % 3_600) / 60,
        secs % 60,
    );
    if days > 0 {
        format!("{}d{}h", days, hours)
    } else if hours > 0 {
        format!("{}h{}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m{}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cluster::nebula::{ComponentStatus, WorkloadStatus};

    fn cluster() -> NebulaCluster {
        let mut cluster = NebulaCluster {
            name: "nebula".to_string(),
            namespace: "default".to_string(),
            creation_timestamp: None,
            spec: Default::default(),
            status: Default::default(),
        };
        cluster.spec.graphd.replicas = Some(2);
        cluster.spec.metad.replicas = Some(3);
        cluster.spec.storaged.replicas = Some(3);
        cluster.status.graphd = ComponentStatus {
            phase: Some("Running".to_string()),
            workload: Some(WorkloadStatus {
                replicas: Some(2),
                ready_replicas: Some(1),
            }),
        };
        cluster
    }

    #[test]
    fn test_render_empty_clusters() {
        let output = TableRenderer::new().render_clusters_list(&[], "default");
        assert_eq!(output, "No NebulaGraph clusters found in namespace(s): default");
    }

    #[test]
    fn test_render_cluster_replicas() {
        let output = TableRenderer::new().render_clusters_list(&[cluster()], "default");
        assert!(output.contains("nebula"));
        assert!(output.contains("1/2"));
        assert!(output.contains("0/3"));
    }

    #[test]
    fn test_render_overview_rows() {
        let output = TableRenderer::new().render_overview(&cluster());
        assert!(output.contains("Metad"));
        assert!(output.contains("Storaged"));
        assert!(output.contains("Graphd"));
        assert!(output.contains("Running"));
    }

    #[test]
    fn test_render_endpoints() {
        let endpoints = vec![Endpoint {
            component: "graphd".to_string(),
            port_name: "thrift".to_string(),
            service_type: "ClusterIP".to_string(),
            address: "nebula-graphd-svc.default.svc.cluster.local:9669".to_string(),
        }];
        let output = TableRenderer::new().render_endpoints(&endpoints);
        assert!(output.contains("ENDPOINT"));
        assert!(output.contains("nebula-graphd-svc.default.svc.cluster.local:9669"));
    }

    #[test]
    fn test_humanize_age() {
        assert_eq!(humanize_age(chrono::Duration::seconds(42)), "42s");
        assert_eq!(humanize_age(chrono::Duration::seconds(312)), "5m12s");
        assert_eq!(humanize_age(chrono::Duration::hours(27)), "1d3h");
        assert_eq!(humanize_age(chrono::Duration::seconds(-5)), "0s");
    }
}
