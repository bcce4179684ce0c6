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


//! In-memory `ResourceApi` used by unit tests.

use crate::infrastructure::kubernetes::reconciler::{HasLabels, ResourceApi};
use crate::shared::error::{KubeError, Result};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub struct FakeResourceApi<K> {
    namespace: String,
    objects: Mutex<BTreeMap<String, K>>,
    // Objects that exist on the "server" but are not returned by fetch,
    // standing in for a concurrent creator.
    hidden: Mutex<BTreeMap<String, K>>,
    fetch_error: Mutex<Option<u16>>,
    creates: AtomicUsize,
    replaces: AtomicUsize,
    deletes: AtomicUsize,
}

impl<K> FakeResourceApi<K>
where
    K: kube::Resource + HasLabels + Clone + Send + Sync,
{
    pub fn new(namespace: &str) -> Self {
        Self::with_objects(namespace, Vec::new())
    }

    pub fn with_objects(namespace: &str, objects: Vec<K>) -> Self {
        let objects = objects
            .into_iter()
            .map(|o| (o.meta().name.clone().unwrap_or_default(), o))
            .collect();
        Self {
            namespace: namespace.to_string(),
            objects: Mutex::new(objects),
            hidden: Mutex::new(BTreeMap::new()),
            fetch_error: Mutex::new(None),
            creates: AtomicUsize::new(0),
            replaces: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
        }
    }

    pub fn fail_fetch_with(&self, code: u16) {
        *self.fetch_error.lock().unwrap() = Some(code);
    }

    pub fn hide_from_fetch(&self, name: &str, object: K) {
        self.hidden.lock().unwrap().insert(name.to_string(), object);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.objects.lock().unwrap().contains_key(name)
    }

    pub fn create_calls(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn replace_calls(&self) -> usize {
        self.replaces.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl<K> ResourceApi for FakeResourceApi<K>
where
    K: kube::Resource + HasLabels + Clone + Send + Sync,
{
    type Resource = K;

    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn fetch(&self, name: &str) -> Result<Option<K>> {
        if let Some(code) = *self.fetch_error.lock().unwrap() {
            return Err(KubeError::KubeError(format!(
                "simulated server error {} fetching {}",
                code, name
            )));
        }
        Ok(self.objects.lock().unwrap().get(name).cloned())
    }

    async fn create(&self, resource: &K) -> Result<K> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        let name = resource.meta().name.clone().unwrap_or_default();
        let mut objects = self.objects.lock().unwrap();
        if objects.contains_key(&name) || self.hidden.lock().unwrap().contains_key(&name) {
            return Err(KubeError::already_exists(K::KIND, name, &self.namespace));
        }
        objects.insert(name, resource.clone());
        Ok(resource.clone())
    }

    async fn replace(&self, name: &str, resource: &K) -> Result<K> {
        self.replaces.fetch_add(1, Ordering::SeqCst);
        let mut objects = self.objects.lock().unwrap();
        if !objects.contains_key(name) {
            return Err(KubeError::not_found(K::KIND, name, &self.namespace));
        }
        objects.insert(name.to_string(), resource.clone());
        Ok(resource.clone())
    }

    async fn delete(&self, name: &str) -> Result<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        match self.objects.lock().unwrap().remove(name) {
            Some(_) => Ok(()),
            None => Err(KubeError::not_found(K::KIND, name, &self.namespace)),
        }
    }
}
