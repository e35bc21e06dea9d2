// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! SecretMirror reconciler - drives [`MirrorReconciler`] from watch events.
//!
//! Besides the mirrors themselves, two secret watches feed the queue: edits
//! to a secret owned by a mirror re-trigger that mirror, and any change to a
//! secret is mapped back to the mirrors copying it.

use crate::config::Config;
use crate::error::{MirrorError, Result};
use crate::kubernetes::KubeStore;
use crate::sync::{
    mirrors_for_secret, MirrorReconciler, ObjectKey, ObjectStore, ReconcileOutcome,
};
use crate::types::SecretMirror;
use futures::StreamExt;
use k8s_openapi::api::core::v1::Secret;
use kube::{
    runtime::{
        controller::Action,
        reflector::{ObjectRef, Store},
        Controller,
    },
    Api, Client, ResourceExt,
};
use kube_runtime::watcher::Config as WatcherConfig;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub struct MirrorController {
    client: Client,
    config: Config,
    reconciler: MirrorReconciler<KubeStore>,
}

impl MirrorController {
    pub fn new(client: Client, config: Config) -> Self {
        let reconciler = MirrorReconciler::new(KubeStore::new(client.clone()));
        Self {
            client,
            config,
            reconciler,
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let mirrors: Api<SecretMirror> = match &self.config.watch_namespace {
            Some(ns) => Api::namespaced(self.client.clone(), ns),
            None => Api::all(self.client.clone()),
        };
        let secrets: Api<Secret> = Api::all(self.client.clone());

        let controller = Controller::new(mirrors, WatcherConfig::default());
        let cache = controller.store();
        let context = Arc::new(self);

        info!("Watching SecretMirrors and Secrets");

        controller
            .owns(secrets.clone(), WatcherConfig::default())
            .watches(secrets, WatcherConfig::default(), move |secret: Secret| {
                source_change_targets(&secret, &cache)
            })
            .shutdown_on_signal()
            .run(reconcile, error_policy, context)
            .for_each(|res| async move {
                match res {
                    Ok(o) => debug!("Reconciled SecretMirror: {:?}", o),
                    Err(e) => warn!("Reconciliation error: {:?}", e),
                }
            })
            .await;

        info!("SecretMirror controller stopped");
        Ok(())
    }
}

/// Mirrors to re-run for a changed secret, looked up in the controller's
/// own mirror cache. The cache may lag behind or still be empty.
fn source_change_targets(
    secret: &Secret,
    cache: &Store<SecretMirror>,
) -> HashSet<ObjectRef<SecretMirror>> {
    let Some(namespace) = secret.namespace() else {
        return HashSet::new();
    };

    let mirrors = cache.state();
    mirrors_for_secret(
        &namespace,
        &secret.name_any(),
        mirrors.iter().map(|m| m.as_ref()),
    )
}

async fn reconcile(mirror: Arc<SecretMirror>, ctx: Arc<MirrorController>) -> Result<Action> {
    let key = ObjectKey::for_object(mirror.as_ref())?;
    let outcome =
        reconcile_with_timeout(&ctx.reconciler, &key, ctx.config.reconcile_timeout).await?;

    Ok(action_for(outcome, &ctx.config))
}

/// Run one pass, giving up after `timeout`.
///
/// On timeout the pass is dropped wherever it is; the next one starts over.
async fn reconcile_with_timeout<S: ObjectStore>(
    reconciler: &MirrorReconciler<S>,
    key: &ObjectKey,
    timeout: Duration,
) -> Result<ReconcileOutcome> {
    tokio::time::timeout(timeout, reconciler.reconcile(key))
        .await
        .map_err(|_| MirrorError::Timeout(key.to_string()))?
}

fn action_for(outcome: ReconcileOutcome, config: &Config) -> Action {
    match outcome {
        ReconcileOutcome::Converged => Action::await_change(),
        ReconcileOutcome::Requeue => Action::requeue(config.requeue_after_delete),
    }
}

fn error_policy(
    mirror: Arc<SecretMirror>,
    error: &MirrorError,
    ctx: Arc<MirrorController>,
) -> Action {
    error!(
        "Reconciliation of SecretMirror {}/{} failed: {}",
        mirror.namespace().unwrap_or_default(),
        mirror.name_any(),
        error
    );
    Action::requeue(ctx.config.error_requeue)
}
