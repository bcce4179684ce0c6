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


use clap::Parser;
use ngctl::cli::commands::Commands;
use ngctl::cli::studio::StudioAction;
use ngctl::cli::CliArgs;
use ngctl::{Preference, PreferenceStore};

#[test]
fn test_use_requires_name() {
    assert!(CliArgs::try_parse_from(["ngctl", "use"]).is_err());

    let args = CliArgs::try_parse_from(["ngctl", "use", "nebula", "--namespace", "graph"]).unwrap();
    match args.command {
        Commands::Use(cmd) => {
            assert_eq!(cmd.name, "nebula");
            assert_eq!(cmd.namespace, "graph");
        }
        other => panic!("unexpected command {:?}", other),
    }
}

#[test]
fn test_global_kube_flags_after_subcommand() {
    let args = CliArgs::try_parse_from([
        "ngctl",
        "list",
        "-A",
        "--kubeconfig",
        "/tmp/kubeconfig",
        "--context",
        "kind-nebula",
    ])
    .unwrap();
    assert_eq!(args.kube.kubeconfig.as_deref(), Some("/tmp/kubeconfig"));
    assert_eq!(args.kube.context.as_deref(), Some("kind-nebula"));
    match args.command {
        Commands::List(cmd) => {
            assert!(cmd.all_namespaces);
            assert_eq!(cmd.namespace, "default");
        }
        other => panic!("unexpected command {:?}", other),
    }
}

#[test]
fn test_studio_install_defaults() {
    let args = CliArgs::try_parse_from(["ngctl", "studio", "install"]).unwrap();
    let Commands::Studio(studio) = args.command else {
        panic!("expected studio command");
    };
    match studio.action {
        StudioAction::Install(cmd) => {
            assert_eq!(cmd.name, "studio");
            assert_eq!(cmd.namespace, "default");
            assert_eq!(cmd.node_port, 30180);
            assert_eq!(cmd.image, "vesoft/nebula-graph-studio:v3.7.0");
            assert!(!cmd.dry_run);
        }
        StudioAction::Uninstall(_) => panic!("expected install"),
    }
}

#[test]
fn test_legacy_flag_spellings() {
    let args =
        CliArgs::try_parse_from(["ngctl", "studio", "install", "--nodePort", "30200"]).unwrap();
    let Commands::Studio(studio) = args.command else {
        panic!("expected studio command");
    };
    match studio.action {
        StudioAction::Install(cmd) => assert_eq!(cmd.node_port, 30200),
        StudioAction::Uninstall(_) => panic!("expected install"),
    }

    let args = CliArgs::try_parse_from([
        "ngctl",
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
    let Commands::Console(console) = args.command else {
        panic!("expected console command");
    };
    assert_eq!(console.pod_name, "my-console");
    assert!(console.enable_ssl);
    assert_eq!(console.ssl_root_ca_path.as_deref(), Some(std::path::Path::new("/tmp/ca.pem")));
    assert_eq!(console.ssl_cert_path.as_deref(), Some(std::path::Path::new("/tmp/cert.pem")));
    assert_eq!(
        console.ssl_private_key_path.as_deref(),
        Some(std::path::Path::new("/tmp/key.pem"))
    );
}

#[test]
fn test_console_and_version_defaults() {
    let args = CliArgs::try_parse_from(["ngctl", "console"]).unwrap();
    let Commands::Console(console) = args.command else {
        panic!("expected console command");
    };
    assert_eq!(console.image, "vesoft/nebula-console:v3.5");
    assert_eq!(console.user, "root");
    assert_eq!(console.password, "");
    assert_eq!(console.timeout, 120);

    let args = CliArgs::try_parse_from(["ngctl", "version"]).unwrap();
    let Commands::Version(version) = args.command else {
        panic!("expected version command");
    };
    assert_eq!(version.operator_namespace, "nebula-operator-system");
}

#[test]
fn test_get_takes_kind() {
    let args = CliArgs::try_parse_from(["ngctl", "get", "storaged", "-A"]).unwrap();
    let Commands::Get(get) = args.command else {
        panic!("expected get command");
    };
    assert_eq!(get.kind, "storaged");
    assert!(get.all_namespaces);
}

#[test]
fn test_preference_round_trip_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = PreferenceStore::new(dir.path().join(".ngctl").join("config"));

    assert!(matches!(store.load(), Err(ngctl::KubeError::ConfigMissing(_))));

    let preference = Preference {
        namespace: "nebula".to_string(),
        name: "nebula-cluster".to_string(),
    };
    store.save(&preference).unwrap();

    let raw = std::fs::read_to_string(store.path()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["namespace"], "nebula");
    assert_eq!(json["name"], "nebula-cluster");

    let loaded = store.load().unwrap();
    assert_eq!(loaded.name, "nebula-cluster");
}
