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


//! Arithmetic on Kubernetes storage quantities (`10Gi`, `500M`, `1024`).

use crate::shared::error::KubeError;
use regex::Regex;
use std::sync::LazyLock;

const QUANTITY_PATTERN: &str = r"^([0-9]+)(Ei|Pi|Ti|Gi|Mi|Ki|E|P|T|G|M|k)?$";

static QUANTITY_RE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(QUANTITY_PATTERN));

fn quantity_regex() -> Result<&'static Regex, KubeError> {
    QUANTITY_RE
        .as_ref()
        .map_err(|e| KubeError::ConfigError(format!("Invalid quantity pattern: {}", e)))
}

const BINARY_UNITS: &[(&str, u128)] = &[
    ("Ei", 1 << 60),
    ("Pi", 1 << 50),
    ("Ti", 1 << 40),
    ("Gi", 1 << 30),
    ("Mi", 1 << 20),
    ("Ki", 1 << 10),
];

const DECIMAL_UNITS: &[(&str, u128)] = &[
    ("E", 1_000_000_000_000_000_000),
    ("P", 1_000_000_000_000_000),
    ("T", 1_000_000_000_000),
    ("G", 1_000_000_000),
    ("M", 1_000_000),
    ("k", 1_000),
];

/// Parse a whole-number quantity into bytes.
pub fn parse_quantity(s: &str) -> Result<u128, KubeError> {
    let s = s.trim();
    let caps = quantity_regex()?
        .captures(s)
        .ok_or_else(|| KubeError::InvalidResource(format!("Invalid quantity: {}", s)))?;

    let value: u128 = caps[1]
        .parse()
        .map_err(|_| KubeError::InvalidResource(format!("Invalid quantity: {}", s)))?;

    let multiplier = match caps.get(2).map(|m| m.as_str()) {
        None => 1,
        Some(suffix) => BINARY_UNITS
            .iter()
            .chain(DECIMAL_UNITS.iter())
            .find(|(unit, _)| *unit == suffix)
            .map(|(_, m)| *m)
            .unwrap_or(1),
    };

    value
        .checked_mul(multiplier)
        .ok_or_else(|| KubeError::InvalidResource(format!("Quantity overflows: {}", s)))
}

/// Render bytes with the largest unit that divides them exactly, binary
/// units first.
pub fn format_quantity(bytes: u128) -> String {
    if bytes == 0 {
        return "0".to_string();
    }
    for (unit, multiplier) in BINARY_UNITS.iter().chain(DECIMAL_UNITS.iter()) {
        if bytes % multiplier == 0 {
            return format!("{}{}", bytes / multiplier, unit);
        }
    }
    bytes.to_string()
}

/// Sum of the given quantities, `None` for an empty slice. Values that
/// cannot be parsed (fractions, exponents) are joined verbatim instead.
pub fn sum_quantities(values: &[String]) -> Option<String> {
    match values {
        [] => None,
        [single] => Some(single.clone()),
        _ => {
            let parsed: Result<Vec<u128>, _> = values.iter().map(|v| parse_quantity(v)).collect();
            match parsed {
                Ok(bytes) => Some(format_quantity(bytes.iter().sum())),
                Err(_) => Some(values.join("+")),
            }
        }
    }
}
