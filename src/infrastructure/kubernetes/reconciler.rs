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


//! Ownership-aware create/remove of namespaced resources.
//!
//! A resource belongs to ngctl when its label `<label_key>` carries the
//! resource's own name. Anything else sharing the name is treated as foreign
//! and is never created over, replaced, or deleted.

use crate::shared::error::{KubeError, Result};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{ConfigMap, Pod, Service};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Uniform read access to the labels of a managed kind.
pub trait HasLabels {
    /// Kind name used in log lines and errors
    const KIND: &'static str;

    fn labels(&self) -> Option<&BTreeMap<String, String>>;
}

macro_rules! impl_has_labels {
    ($($kind:ty),* $(,)?) => {
        $(
            impl HasLabels for $kind {
                const KIND: &'static str = stringify!($kind);

                fn labels(&self) -> Option<&BTreeMap<String, String>> {
                    self.metadata.labels.as_ref()
                }
            }
        )*
    };
}

impl_has_labels!(Pod, Service, Deployment, ConfigMap);

/// The control-plane calls the reconciler needs for one resource kind in one
/// namespace.
#[async_trait::async_trait]
pub trait ResourceApi: Send + Sync {
    type Resource: HasLabels + Send + Sync;

    fn namespace(&self) -> &str;

    /// `Ok(None)` means the server answered "not found". Every other failure
    /// is an error.
    async fn fetch(&self, name: &str) -> Result<Option<Self::Resource>>;

    async fn create(&self, resource: &Self::Resource) -> Result<Self::Resource>;

    async fn replace(&self, name: &str, resource: &Self::Resource) -> Result<Self::Resource>;

    async fn delete(&self, name: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipStatus {
    Absent,
    OwnedAndPresent,
    PresentButForeign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Created,
    AlreadyExists,
    Updated,
    Removed,
    NotPresent,
    SkippedForeign,
}

impl ReconcileOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReconcileOutcome::Created => "created",
            ReconcileOutcome::AlreadyExists => "already exists",
            ReconcileOutcome::Updated => "updated",
            ReconcileOutcome::Removed => "removed",
            ReconcileOutcome::NotPresent => "not present",
            ReconcileOutcome::SkippedForeign => "skipped (not managed by ngctl)",
        }
    }
}

/// Ownership of an observed resource, given the name it was fetched by.
pub fn ownership_of<K: HasLabels>(resource: &K, name: &str, label_key: &str) -> OwnershipStatus {
    match resource.labels().and_then(|labels| labels.get(label_key)) {
        Some(owner) if owner == name => OwnershipStatus::OwnedAndPresent,
        _ => OwnershipStatus::PresentButForeign,
    }
}

pub struct Reconciler<'a, A: ResourceApi> {
    api: &'a A,
    label_key: &'a str,
}

impl<'a, A: ResourceApi> Reconciler<'a, A> {
    pub fn new(api: &'a A, label_key: &'a str) -> Self {
        Self { api, label_key }
    }

    pub async fn classify(&self, name: &str) -> Result<OwnershipStatus> {
        match self.api.fetch(name).await? {
            None => Ok(OwnershipStatus::Absent),
            Some(resource) => Ok(ownership_of(&resource, name, self.label_key)),
        }
    }

    /// Create `desired` unless ngctl already owns a resource with that name.
    /// A foreign resource with the same name is a hard conflict.
    pub async fn ensure_created(
        &self,
        desired: &A::Resource,
        name: &str,
    ) -> Result<ReconcileOutcome> {
        let kind = <A::Resource as HasLabels>::KIND;
        match self.classify(name).await? {
            OwnershipStatus::OwnedAndPresent => {
                info!("Resource {} {} is already created", kind, name);
                Ok(ReconcileOutcome::AlreadyExists)
            }
            OwnershipStatus::PresentButForeign => {
                warn!("Resource {} {} is conflicted", kind, name);
                Err(self.conflict(name))
            }
            OwnershipStatus::Absent => {
                self.api.create(desired).await?;
                info!("Resource {} {} is created", kind, name);
                Ok(ReconcileOutcome::Created)
            }
        }
    }

    /// Create `desired`, or replace the owned resource with it.
    pub async fn ensure_applied(
        &self,
        desired: &A::Resource,
        name: &str,
    ) -> Result<ReconcileOutcome> {
        let kind = <A::Resource as HasLabels>::KIND;
        match self.classify(name).await? {
            OwnershipStatus::OwnedAndPresent => {
                self.api.replace(name, desired).await?;
                info!("Resource {} {} is updated", kind, name);
                Ok(ReconcileOutcome::Updated)
            }
            OwnershipStatus::PresentButForeign => {
                warn!("Resource {} {} is conflicted", kind, name);
                Err(self.conflict(name))
            }
            OwnershipStatus::Absent => {
                self.api.create(desired).await?;
                info!("Resource {} {} is created", kind, name);
                Ok(ReconcileOutcome::Created)
            }
        }
    }

    /// Delete the resource if ngctl owns it. A foreign resource is left alone
    /// and only logged, so a teardown of several resources keeps going.
    pub async fn ensure_removed(&self, name: &str) -> Result<ReconcileOutcome> {
        let kind = <A::Resource as HasLabels>::KIND;
        match self.classify(name).await? {
            OwnershipStatus::Absent => Ok(ReconcileOutcome::NotPresent),
            OwnershipStatus::PresentButForeign => {
                warn!(
                    "Resource {} {} is conflicted, it is not managed by ngctl and was left in place",
                    kind, name
                );
                Ok(ReconcileOutcome::SkippedForeign)
            }
            OwnershipStatus::OwnedAndPresent => {
                self.api.delete(name).await?;
                info!("Resource {} {} is removed", kind, name);
                Ok(ReconcileOutcome::Removed)
            }
        }
    }

    fn conflict(&self, name: &str) -> KubeError {
        KubeError::conflict(
            <A::Resource as HasLabels>::KIND,
            name,
            self.api.namespace(),
            self.label_key,
        )
    }
}
