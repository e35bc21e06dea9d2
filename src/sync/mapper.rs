// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Maps a changed source secret back to the SecretMirrors that copy it.

use crate::error::Result;
use crate::sync::store::{ObjectKey, ObjectStore};
use crate::types::SecretMirror;
use kube::runtime::reflector::ObjectRef;
use kube::ResourceExt;
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Select every mirror whose `fromNamespace` and name match the changed
/// secret at `namespace/name`. `fromNamespace` is read through
/// [`SecretMirror::source_namespace`], the same way the reconciler reads it.
///
/// Mirrors are keyed by their destination, so this is a linear scan of the
/// listing. An empty result is the usual case.
pub fn mirrors_for_secret<'a, I>(
    namespace: &str,
    name: &str,
    mirrors: I,
) -> HashSet<ObjectRef<SecretMirror>>
where
    I: IntoIterator<Item = &'a SecretMirror>,
{
    mirrors
        .into_iter()
        .filter(|mirror| {
            mirror.name_any() == name
                && mirror.source_namespace().is_ok_and(|source| source == namespace)
        })
        .map(ObjectRef::from_obj)
        .collect()
}

/// Same as [`mirrors_for_secret`], listing the mirrors from `store` first.
///
/// For callers without a mirror cache of their own; the controller maps
/// events through its reflector store instead.
#[instrument(skip(store, key), fields(secret = %key))]
pub async fn lookup_mirrors_for_secret<S: ObjectStore>(
    store: &S,
    key: &ObjectKey,
) -> Result<HashSet<ObjectRef<SecretMirror>>> {
    let mirrors = store.list_mirrors().await?;
    let targets = mirrors_for_secret(&key.namespace, &key.name, &mirrors);
    debug!("Secret change maps to {} of {} SecretMirrors", targets.len(), mirrors.len());
    Ok(targets)
}
