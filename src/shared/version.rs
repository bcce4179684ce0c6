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


/// Human readable tool name reported by `ngctl version`
pub const TOOL_NAME: &str = "NebulaGraph Kubernetes Command Line Tool";

const UNKNOWN: &str = "UNKNOWN";

/// Git revision baked in at build time through `NGCTL_GIT_SHA`
pub fn git_sha() -> &'static str {
    option_env!("NGCTL_GIT_SHA").unwrap_or(UNKNOWN)
}

/// Git ref baked in at build time through `NGCTL_GIT_REF`
pub fn git_ref() -> &'static str {
    option_env!("NGCTL_GIT_REF").unwrap_or(UNKNOWN)
}

pub fn version_string() -> String {
    format!(
        "{},V-{} [GitSha: {} GitRef: {}]",
        TOOL_NAME,
        env!("CARGO_PKG_VERSION"),
        git_sha(),
        git_ref()
    )
}
