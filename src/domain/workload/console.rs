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


use crate::infrastructure::constants::CONSOLE_LABEL_KEY;
use crate::infrastructure::kubernetes::reconciler::{ReconcileOutcome, Reconciler, ResourceApi};
use crate::infrastructure::kubernetes::resources::ConsoleBuilder;
use crate::shared::error::Result;
use k8s_openapi::api::core::v1::{ConfigMap, Pod};

/// Applies the console config map and creates the console pod. The pod is
/// reused when ngctl already owns it.
pub async fn prepare_console<C, P>(
    config_maps: &C,
    pods: &P,
    builder: &ConsoleBuilder<'_>,
) -> Result<ReconcileOutcome>
where
    C: ResourceApi<Resource = ConfigMap>,
    P: ResourceApi<Resource = Pod>,
{
    let name = builder.name();
    let config_map = builder.build_config_map()?;
    Reconciler::new(config_maps, CONSOLE_LABEL_KEY)
        .ensure_applied(&config_map, name)
        .await?;

    Reconciler::new(pods, CONSOLE_LABEL_KEY)
        .ensure_created(&builder.build_pod(), name)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::ConsoleOptions;
    use crate::infrastructure::kubernetes::fake::FakeResourceApi;
    use crate::shared::error::KubeError;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn builder(options: &ConsoleOptions) -> ConsoleBuilder<'_> {
        ConsoleBuilder::new(
            "nebula-console".to_string(),
            "default".to_string(),
            "vesoft/nebula-console:v3.5".to_string(),
            options,
        )
    }

    #[tokio::test]
    async fn test_second_run_updates_config_and_reuses_pod() {
        let options = ConsoleOptions::default();
        let config_maps = FakeResourceApi::<ConfigMap>::new("default");
        let pods = FakeResourceApi::<Pod>::new("default");

        let first = prepare_console(&config_maps, &pods, &builder(&options))
            .await
            .unwrap();
        assert_eq!(first, ReconcileOutcome::Created);

        let second = prepare_console(&config_maps, &pods, &builder(&options))
            .await
            .unwrap();
        assert_eq!(second, ReconcileOutcome::AlreadyExists);
        assert_eq!(config_maps.create_calls(), 1);
        assert_eq!(config_maps.replace_calls(), 1);
        assert_eq!(pods.create_calls(), 1);
    }

    #[tokio::test]
    async fn test_foreign_config_map_stops_before_pod() {
        let options = ConsoleOptions::default();
        let foreign = ConfigMap {
            metadata: ObjectMeta {
                name: Some("nebula-console".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let config_maps = FakeResourceApi::with_objects("default", vec![foreign]);
        let pods = FakeResourceApi::<Pod>::new("default");

        let err = prepare_console(&config_maps, &pods, &builder(&options))
            .await
            .unwrap_err();
        assert!(matches!(err, KubeError::Conflict { .. }));
        assert_eq!(config_maps.replace_calls(), 0);
        assert_eq!(pods.create_calls(), 0);
    }
}
