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

//! Binding of the mapping engine to the Terraform plugin protocol

use std::sync::Arc;

use anyhow::Error;
use tf_provider::value::Value;
use tf_provider::{AttributePath, Diagnostics};

use crate::mapper::{FieldPath, ImportOptions, MapError, Segment, SortMode};
use crate::provider::{Session, SessionHandle};

mod data_source;
mod normalize;
mod resource;
mod schema;
pub mod state;
mod validate;

pub use data_source::FortiosDataSource;
pub use resource::FortiosResource;
pub use schema::{data_source_schema, resource_schema};

pub(crate) const ID: &str = "id";
pub(crate) const SORT: &str = "dynamic_sort_subtable";
pub(crate) const GET_ALL_TABLES: &str = "get_all_tables";
pub(crate) const VDOMPARAM: &str = "vdomparam";

/// Attributes present on every resource besides the object fields
pub(crate) const META_ATTRIBUTES: &[&str] = &[ID, SORT, GET_ALL_TABLES, VDOMPARAM];

use state::{TfNode, TfObject};

fn meta_string<'a>(object: &'a TfObject, name: &str) -> Option<&'a str> {
    match object.get(name) {
        Some(Value::Value(TfNode::String(s))) if !s.is_empty() => Some(s),
        _ => None,
    }
}

pub(crate) fn identity(object: &TfObject) -> Option<&str> {
    meta_string(object, ID)
}

/// VDOM of a resource: `vdomparam` or the provider default
pub(crate) fn vdom<'a>(object: &'a TfObject, session: &'a Session) -> Option<&'a str> {
    meta_string(object, VDOMPARAM).or(session.vdom.as_deref())
}

pub(crate) fn import_options(object: &TfObject, session: &Session) -> ImportOptions {
    let import_all = match object.get(GET_ALL_TABLES) {
        Some(Value::Value(TfNode::Bool(flag))) => *flag,
        _ => session.import_all,
    };
    ImportOptions {
        import_all,
        // validated beforehand
        sort: meta_string(object, SORT)
            .and_then(|mode| mode.parse().ok())
            .unwrap_or(SortMode::Natural),
    }
}

/// Copy the engine-wide attributes that are not part of the object
pub(crate) fn copy_meta(from: &TfObject, to: &mut TfObject) {
    for name in META_ATTRIBUTES.iter().filter(|name| **name != ID) {
        to.insert(
            (*name).to_owned(),
            from.get(*name).cloned().unwrap_or(Value::Null),
        );
    }
}

pub(crate) async fn session(
    handle: &SessionHandle,
    diags: &mut Diagnostics,
) -> Option<Arc<Session>> {
    let session = handle.read().await.clone();
    if session.is_none() {
        diags.root_error(
            "Provider is not configured",
            "The FortiOS provider must be configured before managing resources",
        );
    }
    session
}

pub(crate) fn attribute_path(path: &FieldPath) -> AttributePath {
    let mut attribute_path: Option<AttributePath> = None;
    for segment in path.segments() {
        attribute_path = Some(match (attribute_path, segment) {
            (None, Segment::Field(name)) => AttributePath::new(name.clone()),
            (Some(path), Segment::Field(name)) => path.attribute(name.clone()),
            (Some(path), Segment::Index(i)) => path.index(*i as i64),
            (None, Segment::Index(_)) => AttributePath::default(),
        });
    }
    attribute_path.unwrap_or_default()
}

/// Report an engine failure, attached to the offending attribute when there is one
pub(crate) fn report(diags: &mut Diagnostics, summary: &str, err: Error) {
    let detail = format!("{err:#}");
    match err.downcast_ref::<MapError>() {
        Some(map_error) if !map_error.path().is_root() => {
            diags.error(summary.to_owned(), detail, attribute_path(map_error.path()));
        }
        _ => diags.root_error(summary.to_owned(), detail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::memory::MemoryTransport;

    fn session(vdom: Option<&str>, import_all: bool) -> Session {
        Session {
            transport: Arc::new(MemoryTransport::new()),
            vdom: vdom.map(str::to_owned),
            import_all,
        }
    }

    #[test]
    fn field_paths_become_attribute_paths() {
        let path = FieldPath::root().field("rules").index(2).field("file_type");
        assert_eq!(
            attribute_path(&path),
            AttributePath::new("rules").index(2).attribute("file_type")
        );
        assert_eq!(attribute_path(&FieldPath::root()), AttributePath::default());
    }

    #[test]
    fn meta_overrides_session() {
        let session = session(Some("root"), true);
        let mut object = TfObject::new();
        assert_eq!(vdom(&object, &session), Some("root"));
        assert_eq!(
            import_options(&object, &session),
            ImportOptions {
                import_all: true,
                sort: SortMode::Natural
            }
        );

        object.insert(VDOMPARAM.into(), Value::Value("customer".into()));
        object.insert(GET_ALL_TABLES.into(), Value::Value(TfNode::Bool(false)));
        object.insert(SORT.into(), Value::Value("false".into()));
        assert_eq!(vdom(&object, &session), Some("customer"));
        assert_eq!(
            import_options(&object, &session),
            ImportOptions {
                import_all: false,
                sort: SortMode::Preserve
            }
        );
    }
}
