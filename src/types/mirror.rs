// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::error::{MirrorError, Result};
use kube::{CustomResource, ResourceExt};
use serde::{Deserialize, Serialize};

/// Mirrors the Secret with the same name from `fromNamespace` into the
/// namespace this resource lives in.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[kube(
    group = "secret.nakamasato.com",
    version = "v1alpha1",
    kind = "SecretMirror",
    shortname = "sm"
)]
#[kube(namespaced)]
#[kube(status = "SecretMirrorStatus")]
#[kube(printcolumn = r#"{"name":"From","type":"string","jsonPath":".spec.fromNamespace"}"#)]
#[serde(rename_all = "camelCase")]
pub struct SecretMirrorSpec {
    /// Namespace from which the Secret is mirrored
    pub from_namespace: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
pub struct SecretMirrorStatus {}

impl SecretMirror {
    /// Namespace of the source Secret, rejecting an empty value
    pub fn source_namespace(&self) -> Result<&str> {
        let ns = self.spec.from_namespace.trim();
        if ns.is_empty() {
            return Err(MirrorError::InvalidSpec(format!(
                "{}/{}: fromNamespace must not be empty",
                self.namespace().unwrap_or_default(),
                self.name_any()
            )));
        }
        Ok(ns)
    }
}
