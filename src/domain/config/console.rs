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
    CONSOLE_BINARY, CONSOLE_MOUNT_PATH, GRAPHD_PORT, POD_CLUSTER_DOMAIN, SSL_CERT_KEY,
    SSL_PRIVATE_KEY_KEY, SSL_ROOT_CA_KEY, STATEMENT_FILE_KEY,
};
use std::path::PathBuf;

/// How the console connects to graphd, and which local files it needs
#[derive(Debug, Clone, Default)]
pub struct ConsoleOptions {
    pub user: String,
    pub password: String,
    /// Connection timeout in milliseconds, 0 keeps the console default
    pub timeout_ms: u32,
    pub eval: Option<String>,
    pub file: Option<PathBuf>,
    pub enable_ssl: bool,
    pub ssl_root_ca_path: Option<PathBuf>,
    pub ssl_cert_path: Option<PathBuf>,
    pub ssl_private_key_path: Option<PathBuf>,
}

impl ConsoleOptions {
    /// Local files to ship into the pod, keyed by their ConfigMap key
    pub fn mounted_files(&self) -> Vec<(&'static str, Option<&PathBuf>)> {
        vec![
            (SSL_ROOT_CA_KEY, self.ssl_root_ca_path.as_ref()),
            (SSL_CERT_KEY, self.ssl_cert_path.as_ref()),
            (SSL_PRIVATE_KEY_KEY, self.ssl_private_key_path.as_ref()),
            (STATEMENT_FILE_KEY, self.file.as_ref()),
        ]
    }

    /// ConfigMap keys that have a local file behind them
    pub fn provided_keys(&self) -> Vec<&'static str> {
        self.mounted_files()
            .into_iter()
            .filter(|(_, path)| path.is_some())
            .map(|(key, _)| key)
            .collect()
    }

    /// Command line run inside the console pod
    pub fn console_command(&self, graphd_service: &str, namespace: &str) -> Vec<String> {
        let address = format!(
            "{}.{}.svc.{}",
            graphd_service, namespace, POD_CLUSTER_DOMAIN
        );
        let mut cmd = vec![
            CONSOLE_BINARY.to_string(),
            "-addr".to_string(),
            address,
            "-port".to_string(),
            GRAPHD_PORT.to_string(),
            "-u".to_string(),
            self.user.clone(),
            "-p".to_string(),
            self.password.clone(),
        ];

        if self.timeout_ms > 0 {
            cmd.push("-t".to_string());
            cmd.push(self.timeout_ms.to_string());
        }
        if let Some(eval) = &self.eval {
            cmd.push("-e".to_string());
            cmd.push(eval.clone());
        }
        if self.file.is_some() {
            cmd.push("-f".to_string());
            cmd.push(mounted_path(STATEMENT_FILE_KEY));
        }
        if self.enable_ssl {
            cmd.push("-enable_ssl".to_string());
        }
        if self.ssl_root_ca_path.is_some() {
            cmd.push("-ssl_root_ca_path".to_string());
            cmd.push(mounted_path(SSL_ROOT_CA_KEY));
        }
        if self.ssl_cert_path.is_some() {
            cmd.push("-ssl_cert_path".to_string());
            cmd.push(mounted_path(SSL_CERT_KEY));
        }
        if self.ssl_private_key_path.is_some() {
            cmd.push("-ssl_private_key_path".to_string());
            cmd.push(mounted_path(SSL_PRIVATE_KEY_KEY));
        }
        cmd
    }
}

fn mounted_path(key: &str) -> String {
    format!("{}/{}", CONSOLE_MOUNT_PATH, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> ConsoleOptions {
        ConsoleOptions {
            user: "root".to_string(),
            password: "nebula".to_string(),
            timeout_ms: 120,
            ..Default::default()
        }
    }

    #[test]
    fn test_minimal_command() {
        let cmd = options().console_command("nebula-graphd-svc", "default");
        assert_eq!(
            cmd,
            vec![
                "/usr/local/bin/nebula-console",
                "-addr",
                "nebula-graphd-svc.default.svc.cluster.local",
                "-port",
                "9669",
                "-u",
                "root",
                "-p",
                "nebula",
                "-t",
                "120",
            ]
        );
    }

    #[test]
    fn test_zero_timeout_is_omitted() {
        let mut opts = options();
        opts.timeout_ms = 0;
        let cmd = opts.console_command("svc", "ns");
        assert!(!cmd.contains(&"-t".to_string()));
    }

    #[test]
    fn test_files_point_into_mount() {
        let mut opts = options();
        opts.eval = Some("SHOW HOSTS;".to_string());
        opts.file = Some(PathBuf::from("/tmp/query.nql"));
        opts.enable_ssl = true;
        opts.ssl_root_ca_path = Some(PathBuf::from("/tmp/ca.pem"));
        let cmd = opts.console_command("svc", "ns").join(" ");

        assert!(cmd.contains("-e SHOW HOSTS;"));
        assert!(cmd.contains("-f /etc/nebula/file.nql"));
        assert!(cmd.contains("-enable_ssl"));
        assert!(cmd.contains("-ssl_root_ca_path /etc/nebula/ssl.ca"));
        assert!(!cmd.contains("-ssl_cert_path"));
        assert_eq!(opts.provided_keys(), vec!["ssl.ca", "file.nql"]);
    }
}
