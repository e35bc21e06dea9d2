// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Convergence of a destination secret towards its source.

use crate::error::Result;
use crate::sync::ownership::{controller_owner_link, data_matches, is_controlled_by};
use crate::sync::store::{ObjectKey, ObjectStore};
use crate::types::SecretMirror;
use k8s_openapi::api::core::v1::Secret;
use kube::api::ObjectMeta;
use tracing::{debug, info, instrument, warn};

/// Result of a successful reconciliation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Nothing left to do until something changes
    Converged,
    /// The destination secret was deleted; check again shortly
    Requeue,
}

/// Level-triggered reconciler for SecretMirrors.
///
/// Holds no state between passes: everything is read from the store on each
/// call, so distinct mirrors may be reconciled concurrently.
pub struct MirrorReconciler<S> {
    store: S,
}

impl<S: ObjectStore> MirrorReconciler<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Bring the secret named after the mirror in the mirror's namespace in
    /// line with the secret of the same name in `fromNamespace`.
    #[instrument(skip(self, key), fields(mirror = %key))]
    pub async fn reconcile(&self, key: &ObjectKey) -> Result<ReconcileOutcome> {
        let Some(mirror) = self.store.get_mirror(key).await? else {
            debug!("SecretMirror not found, nothing to do");
            return Ok(ReconcileOutcome::Converged);
        };

        let source_key = ObjectKey::new(mirror.source_namespace()?, key.name.clone());

        let Some(source) = self.store.get_secret(&source_key).await? else {
            debug!("Source secret {} not found", source_key);
            return self.remove_target(&mirror, key).await;
        };

        let Some(mut target) = self.store.get_secret(key).await? else {
            let secret = mirrored_secret(&mirror, key, &source)?;
            self.store.create_secret(&secret).await?;
            info!("Created secret {} from {}", key, source_key);
            return Ok(ReconcileOutcome::Converged);
        };

        if !is_controlled_by(&target, &mirror) {
            warn!(
                "Secret {} exists but is not controlled by this SecretMirror, leaving it untouched",
                key
            );
            return Ok(ReconcileOutcome::Converged);
        }

        if data_matches(target.data.as_ref(), source.data.as_ref()) {
            debug!("Secret {} already up to date", key);
            return Ok(ReconcileOutcome::Converged);
        }

        target.data = source.data;
        self.store.update_secret(&target).await?;
        info!("Updated secret {} with data from {}", key, source_key);

        Ok(ReconcileOutcome::Converged)
    }

    /// The source is gone: delete the destination, but only if we own it
    async fn remove_target(
        &self,
        mirror: &SecretMirror,
        key: &ObjectKey,
    ) -> Result<ReconcileOutcome> {
        let Some(target) = self.store.get_secret(key).await? else {
            debug!("Secret {} does not exist either, nothing to do", key);
            return Ok(ReconcileOutcome::Converged);
        };

        if !is_controlled_by(&target, mirror) {
            debug!("Secret {} is not controlled by this SecretMirror, not deleting", key);
            return Ok(ReconcileOutcome::Converged);
        }

        self.store.delete_secret(&target).await?;
        info!("Deleted secret {} as its source is gone", key);

        Ok(ReconcileOutcome::Requeue)
    }
}

/// Build the destination secret for `mirror`, carrying the source payload and
/// a controller reference back to the mirror
fn mirrored_secret(mirror: &SecretMirror, key: &ObjectKey, source: &Secret) -> Result<Secret> {
    Ok(Secret {
        metadata: ObjectMeta {
            name: Some(key.name.clone()),
            namespace: Some(key.namespace.clone()),
            owner_references: Some(vec![controller_owner_link(mirror)?]),
            ..Default::default()
        },
        data: source.data.clone(),
        type_: source.type_.clone(),
        ..Default::default()
    })
}
