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


/// Ownership labels
pub const STUDIO_LABEL_KEY: &str = "ngctl/nebula-studio";
pub const CONSOLE_LABEL_KEY: &str = "ngctl/nebula-console";

/// NebulaGraph labels set by nebula-operator
pub const LABEL_CLUSTER: &str = "app.kubernetes.io/cluster";
pub const LABEL_COMPONENT: &str = "app.kubernetes.io/component";
pub const LABEL_NAME: &str = "app.kubernetes.io/name";
pub const LABEL_NAME_VALUE: &str = "nebula-graph";

/// Selector of the nebula-operator controller manager deployment
pub const OPERATOR_SELECTOR: &str =
    "app.kubernetes.io/component=controller-manager,app.kubernetes.io/instance=nebula-operator";
pub const DEFAULT_OPERATOR_NAMESPACE: &str = "nebula-operator-system";

/// NebulaCluster custom resource
pub const NEBULA_GROUP: &str = "apps.nebula-graph.io";
pub const NEBULA_VERSION: &str = "v1alpha1";
pub const NEBULA_KIND: &str = "NebulaCluster";
pub const NEBULA_PLURAL: &str = "nebulaclusters";

/// Components
pub const COMPONENT_GRAPHD: &str = "graphd";
pub const COMPONENT_METAD: &str = "metad";
pub const COMPONENT_STORAGED: &str = "storaged";

/// Network configuration
pub const POD_CLUSTER_DOMAIN: &str = "cluster.local";
pub const GRAPHD_PORT: u16 = 9669;

/// Studio
pub const DEFAULT_STUDIO_NAME: &str = "studio";
pub const DEFAULT_STUDIO_IMAGE: &str = "vesoft/nebula-graph-studio:v3.7.0";
pub const DEFAULT_STUDIO_NODE_PORT: i32 = 30180;
pub const STUDIO_CONTAINER_NAME: &str = "studio";
pub const STUDIO_HTTP_PORT: i32 = 7001;
pub const PORT_NAME_HTTP: &str = "http";

/// Console
pub const DEFAULT_CONSOLE_IMAGE: &str = "vesoft/nebula-console:v3.5";
pub const DEFAULT_CONSOLE_POD_NAME: &str = "nebula-console";
pub const CONSOLE_BINARY: &str = "/usr/local/bin/nebula-console";
pub const CONSOLE_MOUNT_PATH: &str = "/etc/nebula";
pub const CONSOLE_VOLUME_NAME: &str = "mount";
pub const CONSOLE_IDLE_COMMAND: &str = "while true; do sleep 2; done";

/// ConfigMap keys mounted into the console pod
pub const SSL_ROOT_CA_KEY: &str = "ssl.ca";
pub const SSL_CERT_KEY: &str = "ssl.cert";
pub const SSL_PRIVATE_KEY_KEY: &str = "private.key";
pub const STATEMENT_FILE_KEY: &str = "file.nql";

/// Image pull policy
pub const IMAGE_PULL_IF_NOT_PRESENT: &str = "IfNotPresent";

/// Default namespace
pub const DEFAULT_NAMESPACE: &str = "default";

/// Pod readiness wait
pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 300;
