// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("SecretMirror {0} has no UID, cannot become an owner")]
    MissingUid(String),

    #[error("Object {0} has no namespace")]
    MissingNamespace(String),

    #[error("Invalid SecretMirror spec: {0}")]
    InvalidSpec(String),

    #[error("Reconciliation of {0} timed out")]
    Timeout(String),
}

pub type Result<T> = std::result::Result<T, MirrorError>;
