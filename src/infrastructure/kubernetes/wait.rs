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


use crate::shared::error::{KubeError, Result};
use futures::TryStreamExt;
use k8s_openapi::api::core::v1::Pod;
use kube::runtime::watcher;
use kube::Api;
use std::time::Duration;
use tracing::{debug, info};

pub const POD_PHASE_RUNNING: &str = "Running";
pub const POD_PHASE_FAILED: &str = "Failed";

pub fn pod_phase(pod: &Pod) -> Option<&str> {
    pod.status.as_ref().and_then(|s| s.phase.as_deref())
}

pub fn is_pod_running(pod: &Pod) -> bool {
    pod_phase(pod) == Some(POD_PHASE_RUNNING)
}

/// Watches the named pod until it reports `Running`, or fails once the
/// deadline passes.
pub async fn wait_for_pod_running(pods: Api<Pod>, name: &str, deadline: Duration) -> Result<()> {
    info!("Waiting for pod {} to be running", name);
    match tokio::time::timeout(deadline, watch_until_running(pods, name)).await {
        Ok(result) => result,
        Err(_) => Err(KubeError::Timeout(format!(
            "pod {} was not running after {}s",
            name,
            deadline.as_secs()
        ))),
    }
}

async fn watch_until_running(pods: Api<Pod>, name: &str) -> Result<()> {
    let config = watcher::Config::default().fields(&format!("metadata.name={}", name));
    let mut stream = Box::pin(watcher(pods, config));

    while let Some(event) = stream
        .try_next()
        .await
        .map_err(|e| KubeError::KubeError(format!("watch on pod {} failed: {}", name, e)))?
    {
        match event {
            watcher::Event::Apply(pod) | watcher::Event::InitApply(pod) => {
                debug!("pod {} phase {:?}", name, pod_phase(&pod));
                if is_pod_running(&pod) {
                    info!("Pod {} is running", name);
                    return Ok(());
                }
                if pod_phase(&pod) == Some(POD_PHASE_FAILED) {
                    return Err(KubeError::ValidationError(format!(
                        "pod {} failed before it was running",
                        name
                    )));
                }
            }
            watcher::Event::Delete(_) => {
                debug!("pod {} deleted while waiting", name);
            }
            watcher::Event::Init | watcher::Event::InitDone => {}
        }
    }

    Err(KubeError::KubeError(format!(
        "watch on pod {} ended before it was running",
        name
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::PodStatus;

    fn pod_in(phase: Option<&str>) -> Pod {
        Pod {
            status: phase.map(|p| PodStatus {
                phase: Some(p.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_running_phase() {
        assert!(is_pod_running(&pod_in(Some("Running"))));
        assert!(!is_pod_running(&pod_in(Some("Pending"))));
        assert!(!is_pod_running(&pod_in(None)));
    }
}
