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


use crate::infrastructure::constants::STUDIO_LABEL_KEY;
use crate::infrastructure::kubernetes::reconciler::{ReconcileOutcome, Reconciler, ResourceApi};
use crate::infrastructure::kubernetes::resources::StudioBuilder;
use crate::shared::error::Result;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudioOutcome {
    pub deployment: ReconcileOutcome,
    pub service: ReconcileOutcome,
}

/// Deployment first, then its service. A conflict on the deployment stops
/// before the service is touched.
pub async fn install_studio<D, S>(
    deployments: &D,
    services: &S,
    builder: &StudioBuilder,
) -> Result<StudioOutcome>
where
    D: ResourceApi<Resource = Deployment>,
    S: ResourceApi<Resource = Service>,
{
    let name = builder.name();
    let deployment = Reconciler::new(deployments, STUDIO_LABEL_KEY)
        .ensure_created(&builder.build_deployment(), name)
        .await?;
    let service = Reconciler::new(services, STUDIO_LABEL_KEY)
        .ensure_created(&builder.build_service(), name)
        .await?;

    Ok(StudioOutcome {
        deployment,
        service,
    })
}

pub async fn uninstall_studio<D, S>(deployments: &D, services: &S, name: &str) -> Result<StudioOutcome>
where
    D: ResourceApi<Resource = Deployment>,
    S: ResourceApi<Resource = Service>,
{
    let deployment = Reconciler::new(deployments, STUDIO_LABEL_KEY)
        .ensure_removed(name)
        .await?;
    let service = Reconciler::new(services, STUDIO_LABEL_KEY)
        .ensure_removed(name)
        .await?;

    Ok(StudioOutcome {
        deployment,
        service,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::kubernetes::fake::FakeResourceApi;
    use crate::shared::error::KubeError;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn builder() -> StudioBuilder {
        StudioBuilder::new(
            "studio-test".to_string(),
            "default".to_string(),
            "vesoft/nebula-graph-studio:v3.7.0".to_string(),
            30180,
        )
    }

    fn foreign_service() -> Service {
        Service {
            metadata: ObjectMeta {
                name: Some("studio-test".to_string()),
                labels: Some(
                    [("owner".to_string(), "other-tool".to_string())]
                        .into_iter()
                        .collect(),
                ),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_install_then_reinstall() {
        let deployments = FakeResourceApi::<Deployment>::new("default");
        let services = FakeResourceApi::<Service>::new("default");

        let first = install_studio(&deployments, &services, &builder()).await.unwrap();
        assert_eq!(first.deployment, ReconcileOutcome::Created);
        assert_eq!(first.service, ReconcileOutcome::Created);

        let second = install_studio(&deployments, &services, &builder()).await.unwrap();
        assert_eq!(second.deployment, ReconcileOutcome::AlreadyExists);
        assert_eq!(second.service, ReconcileOutcome::AlreadyExists);
        assert_eq!(deployments.create_calls(), 1);
        assert_eq!(services.create_calls(), 1);
    }

    #[tokio::test]
    async fn test_foreign_service_blocks_install_but_not_uninstall() {
        let deployments = FakeResourceApi::<Deployment>::new("default");
        let services = FakeResourceApi::with_objects("default", vec![foreign_service()]);

        let err = install_studio(&deployments, &services, &builder())
            .await
            .unwrap_err();
        assert!(matches!(err, KubeError::Conflict { .. }));
        assert_eq!(services.create_calls(), 0);

        let outcome = uninstall_studio(&deployments, &services, "studio-test")
            .await
            .unwrap();
        assert_eq!(outcome.deployment, ReconcileOutcome::Removed);
        assert_eq!(outcome.service, ReconcileOutcome::SkippedForeign);
        assert_eq!(services.delete_calls(), 0);
        assert!(services.contains("studio-test"));
        assert!(!deployments.contains("studio-test"));
    }

    #[tokio::test]
    async fn test_uninstall_when_absent() {
        let deployments = FakeResourceApi::<Deployment>::new("default");
        let services = FakeResourceApi::<Service>::new("default");

        let outcome = uninstall_studio(&deployments, &services, "studio").await.unwrap();
        assert_eq!(outcome.deployment, ReconcileOutcome::NotPresent);
        assert_eq!(outcome.service, ReconcileOutcome::NotPresent);
        assert_eq!(deployments.delete_calls(), 0);
    }
}
