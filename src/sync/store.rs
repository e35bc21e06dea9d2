// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The narrow object store contract the reconciler runs against.

use crate::error::{MirrorError, Result};
use crate::types::SecretMirror;
use k8s_openapi::api::core::v1::Secret;
use kube::ResourceExt;
use std::fmt;
use std::future::Future;

/// Identity of a namespaced object
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectKey {
    pub namespace: String,
    pub name: String,
}

impl ObjectKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Key of an existing object, which must be namespaced
    pub fn for_object<K: ResourceExt>(obj: &K) -> Result<Self> {
        let name = obj.name_any();
        let namespace = obj
            .namespace()
            .ok_or_else(|| MirrorError::MissingNamespace(name.clone()))?;
        Ok(Self { namespace, name })
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Reads and writes for the two object kinds the operator touches.
///
/// `get_*` return `Ok(None)` when the object does not exist; every other
/// failure is returned as an error and never retried here.
pub trait ObjectStore: Send + Sync {
    fn get_mirror(&self, key: &ObjectKey)
        -> impl Future<Output = Result<Option<SecretMirror>>> + Send;

    fn list_mirrors(&self) -> impl Future<Output = Result<Vec<SecretMirror>>> + Send;

    fn get_secret(&self, key: &ObjectKey) -> impl Future<Output = Result<Option<Secret>>> + Send;

    fn create_secret(&self, secret: &Secret) -> impl Future<Output = Result<Secret>> + Send;

    /// Replace the whole object
    fn update_secret(&self, secret: &Secret) -> impl Future<Output = Result<Secret>> + Send;

    fn delete_secret(&self, secret: &Secret) -> impl Future<Output = Result<()>> + Send;
}
