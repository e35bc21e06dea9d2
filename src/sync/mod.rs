// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Secret mirroring logic, independent of how it is driven.

pub mod mapper;
pub mod mirror;
pub mod ownership;
pub mod store;

pub use mapper::{lookup_mirrors_for_secret, mirrors_for_secret};
pub use mirror::{MirrorReconciler, ReconcileOutcome};
pub use ownership::{controller_owner_link, data_matches, is_controlled_by};
pub use store::{ObjectKey, ObjectStore};
