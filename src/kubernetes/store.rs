// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! [`ObjectStore`] backed by the Kubernetes API

use crate::constants::OPERATOR_NAME;
use crate::error::Result;
use crate::sync::store::{ObjectKey, ObjectStore};
use crate::types::SecretMirror;
use k8s_openapi::api::core::v1::Secret;
use kube::{
    api::{DeleteParams, ListParams, PostParams},
    Api, Client, ResourceExt,
};
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl KubeStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn secrets(&self, namespace: &str) -> Api<Secret> {
        Api::namespaced(self.client.clone(), namespace)
    }

    fn post_params() -> PostParams {
        PostParams {
            field_manager: Some(OPERATOR_NAME.to_string()),
            ..Default::default()
        }
    }
}

impl ObjectStore for KubeStore {
    async fn get_mirror(&self, key: &ObjectKey) -> Result<Option<SecretMirror>> {
        let mirrors: Api<SecretMirror> = Api::namespaced(self.client.clone(), &key.namespace);
        Ok(mirrors.get_opt(&key.name).await?)
    }

    #[instrument(skip(self))]
    async fn list_mirrors(&self) -> Result<Vec<SecretMirror>> {
        let mirrors: Api<SecretMirror> = Api::all(self.client.clone());
        let list = mirrors.list(&ListParams::default()).await?;
        debug!("Listed {} SecretMirrors", list.items.len());
        Ok(list.items)
    }

    async fn get_secret(&self, key: &ObjectKey) -> Result<Option<Secret>> {
        Ok(self.secrets(&key.namespace).get_opt(&key.name).await?)
    }

    async fn create_secret(&self, secret: &Secret) -> Result<Secret> {
        let key = ObjectKey::for_object(secret)?;
        Ok(self
            .secrets(&key.namespace)
            .create(&Self::post_params(), secret)
            .await?)
    }

    async fn update_secret(&self, secret: &Secret) -> Result<Secret> {
        let key = ObjectKey::for_object(secret)?;
        Ok(self
            .secrets(&key.namespace)
            .replace(&key.name, &Self::post_params(), secret)
            .await?)
    }

    async fn delete_secret(&self, secret: &Secret) -> Result<()> {
        let key = ObjectKey::for_object(secret)?;
        let params = DeleteParams {
            preconditions: secret.uid().map(|uid| kube::api::Preconditions {
                uid: Some(uid),
                resource_version: None,
            }),
            ..Default::default()
        };
        self.secrets(&key.namespace)
            .delete(&key.name, &params)
            .await?;
        Ok(())
    }
}
