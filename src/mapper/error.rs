// This file is part of the terraform-provider-fortios project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
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

use serde_json::Value;
use thiserror::Error;

use super::path::FieldPath;

/// Error raised when a value does not have the shape its descriptor declares
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("descriptor mismatch at `{path}`: expected {expected}, found {found}")]
    Mismatch {
        path: FieldPath,
        expected: &'static str,
        found: String,
    },
}

impl MapError {
    pub fn mismatch(path: &FieldPath, expected: &'static str, found: impl ToString) -> Self {
        MapError::Mismatch {
            path: path.clone(),
            expected,
            found: found.to_string(),
        }
    }

    pub fn path(&self) -> &FieldPath {
        match self {
            MapError::Mismatch { path, .. } => path,
        }
    }
}

/// Short description of a wire value for error messages
pub(crate) fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::Bool(b) => format!("bool {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("string {s:?}"),
        Value::Array(items) => format!("array of {} elements", items.len()),
        Value::Object(_) => "object".to_owned(),
    }
}
