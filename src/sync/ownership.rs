// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Ownership checks and payload comparison for mirrored secrets.

use crate::error::{MirrorError, Result};
use crate::types::SecretMirror;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use k8s_openapi::ByteString;
use kube::{Resource, ResourceExt};
use std::collections::BTreeMap;

/// Check whether `secret` is controlled by `mirror`.
///
/// Scans every owner reference; only one flagged as controller, pointing at a
/// SecretMirror with the mirror's UID, counts. The API version is not
/// compared beyond its group so ownership survives a version bump.
pub fn is_controlled_by(secret: &Secret, mirror: &SecretMirror) -> bool {
    let Some(uid) = mirror.uid() else {
        return false;
    };

    secret
        .owner_references()
        .iter()
        .any(|owner| is_mirror_controller_ref(owner, &uid))
}

fn is_mirror_controller_ref(owner: &OwnerReference, uid: &str) -> bool {
    let group = owner.api_version.split('/').next().unwrap_or_default();

    owner.controller == Some(true)
        && owner.uid == uid
        && owner.kind == SecretMirror::kind(&())
        && group == SecretMirror::group(&())
}

/// Owner reference marking `mirror` as the controller of a secret
/// (`controller` and `blockOwnerDeletion` both set).
pub fn controller_owner_link(mirror: &SecretMirror) -> Result<OwnerReference> {
    let owner = mirror.controller_owner_ref(&()).ok_or_else(|| {
        MirrorError::MissingUid(format!(
            "{}/{}",
            mirror.namespace().unwrap_or_default(),
            mirror.name_any()
        ))
    })?;

    // controller_owner_ref leaves blockOwnerDeletion unset
    Ok(OwnerReference {
        block_owner_deletion: Some(true),
        ..owner
    })
}

/// Compare two secret payloads key by key, byte for byte.
///
/// A missing map counts as empty.
pub fn data_matches(
    left: Option<&BTreeMap<String, ByteString>>,
    right: Option<&BTreeMap<String, ByteString>>,
) -> bool {
    let empty = BTreeMap::new();
    let left = left.unwrap_or(&empty);
    let right = right.unwrap_or(&empty);

    left.len() == right.len()
        && left
            .iter()
            .all(|(key, value)| right.get(key).is_some_and(|other| other.0 == value.0))
}
