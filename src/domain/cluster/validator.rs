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


use crate::shared::error::KubeError;
use regex::Regex;
use std::sync::LazyLock;

/// RFC 1123 label, the rule Kubernetes applies to pod, service and
/// deployment names.
const DNS1123_LABEL_PATTERN: &str = r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$";
const DNS1123_LABEL_MAX_LENGTH: usize = 63;

static DNS1123_LABEL_RE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(DNS1123_LABEL_PATTERN));

fn dns1123_label_regex() -> Result<&'static Regex, KubeError> {
    DNS1123_LABEL_RE
        .as_ref()
        .map_err(|e| KubeError::ConfigError(format!("Invalid name pattern: {}", e)))
}

const NODE_PORT_RANGE: std::ops::RangeInclusive<i32> = 30000..=32767;

pub fn validate_resource_name(resource_type: &str, name: &str) -> Result<(), KubeError> {
    let re = dns1123_label_regex()?;

    if name.len() > DNS1123_LABEL_MAX_LENGTH || !re.is_match(name) {
        return Err(KubeError::ValidationError(format!(
            "Invalid {} name '{}': must be at most {} characters of lowercase letters, digits or '-', \
            and start and end with a letter or digit",
            resource_type, name, DNS1123_LABEL_MAX_LENGTH
        )));
    }

    Ok(())
}

pub fn validate_node_port(node_port: i32) -> Result<(), KubeError> {
    if !NODE_PORT_RANGE.contains(&node_port) {
        return Err(KubeError::ValidationError(format!(
            "Invalid node port {}: must be within {}-{}",
            node_port,
            NODE_PORT_RANGE.start(),
            NODE_PORT_RANGE.end()
        )));
    }
    Ok(())
}
