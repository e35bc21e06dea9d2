// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Prints the SecretMirror CustomResourceDefinition as YAML.

use kube::CustomResourceExt;
use secret_mirror::types::SecretMirror;

fn main() -> anyhow::Result<()> {
    print!("{}", serde_yaml::to_string(&SecretMirror::crd())?);
    Ok(())
}
