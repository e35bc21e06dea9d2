// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use kube::Client;
use tracing::info;
use tracing_subscriber::EnvFilter;

use secret_mirror::config::Config;
use secret_mirror::kubernetes::wait_for_mirror_crd;
use secret_mirror::reconcilers::MirrorController;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting secret-mirror operator");

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: watch_namespace={}",
        config.watch_namespace.as_deref().unwrap_or("<all>")
    );

    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    info!("Waiting for SecretMirror CRD to become available...");
    wait_for_mirror_crd(&client).await?;

    MirrorController::new(client, config).run().await
}
