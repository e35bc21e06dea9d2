// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Custom resource types owned by the operator.

pub mod mirror;

pub use mirror::{SecretMirror, SecretMirrorSpec, SecretMirrorStatus};
