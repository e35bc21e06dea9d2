// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities: fixtures, an in-memory object store and a mock API server.

use crate::error::{MirrorError, Result};
use crate::sync::ownership::controller_owner_link;
use crate::sync::store::{ObjectKey, ObjectStore};
use crate::types::{SecretMirror, SecretMirrorSpec};
use http::{Request, Response};
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use kube::api::ObjectMeta;
use kube::client::Body;
use kube::error::ErrorResponse;
use kube::Client;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

pub fn make_secret(name: &str, namespace: &str, data: &[(&str, &str)]) -> Secret {
    Secret {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        data: Some(
            data.iter()
                .map(|(k, v)| (k.to_string(), ByteString(v.as_bytes().to_vec())))
                .collect(),
        ),
        type_: Some("Opaque".to_string()),
        ..Default::default()
    }
}

/// A mirror as the API server would return it, with a UID derived from its key
pub fn make_mirror(name: &str, namespace: &str, from_namespace: &str) -> SecretMirror {
    let mut mirror = SecretMirror::new(
        name,
        SecretMirrorSpec {
            from_namespace: from_namespace.to_string(),
        },
    );
    mirror.metadata.namespace = Some(namespace.to_string());
    mirror.metadata.uid = Some(format!("uid-{}-{}", namespace, name));
    mirror
}

/// Add a controller reference to `mirror` on `secret`
pub fn owned_by(mut secret: Secret, mirror: &SecretMirror) -> Secret {
    let link = controller_owner_link(mirror).expect("mirror fixture has a uid");
    secret
        .metadata
        .owner_references
        .get_or_insert_with(Vec::new)
        .push(link);
    secret
}

/// Secret data as sorted UTF-8 pairs, for readable assertions
pub fn secret_data(secret: &Secret) -> Vec<(String, String)> {
    secret
        .data
        .iter()
        .flatten()
        .map(|(k, v)| (k.clone(), String::from_utf8_lossy(&v.0).into_owned()))
        .collect()
}

/// Store operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetMirror,
    ListMirrors,
    GetSecret,
    Create,
    Update,
    Delete,
}

/// Writes performed through [`ObjectStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Create(ObjectKey),
    Update(ObjectKey),
    Delete(ObjectKey),
}

/// An in-memory [`ObjectStore`] recording every write.
///
/// Operations listed via [`MemoryStore::fail`] return a 500 error until
/// [`MemoryStore::recover`] is called.
#[derive(Default)]
pub struct MemoryStore {
    mirrors: Mutex<BTreeMap<ObjectKey, SecretMirror>>,
    secrets: Mutex<BTreeMap<ObjectKey, Secret>>,
    mutations: Mutex<Vec<Mutation>>,
    failing: Mutex<HashSet<Operation>>,
    stalled: Mutex<HashSet<Operation>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mirror(self, mirror: SecretMirror) -> Self {
        let key = ObjectKey::for_object(&mirror).expect("mirror fixture is namespaced");
        self.mirrors.lock().unwrap().insert(key, mirror);
        self
    }

    pub fn with_secret(self, secret: Secret) -> Self {
        self.put_secret(secret);
        self
    }

    pub fn failing(self, op: Operation) -> Self {
        self.fail(op);
        self
    }

    /// Insert or replace a secret behind the reconciler's back
    pub fn put_secret(&self, secret: Secret) {
        let key = ObjectKey::for_object(&secret).expect("secret fixture is namespaced");
        self.secrets.lock().unwrap().insert(key, secret);
    }

    pub fn remove_secret(&self, key: &ObjectKey) {
        self.secrets.lock().unwrap().remove(key);
    }

    pub fn secret(&self, key: &ObjectKey) -> Option<Secret> {
        self.secrets.lock().unwrap().get(key).cloned()
    }

    pub fn mirror(&self, key: &ObjectKey) -> Option<SecretMirror> {
        self.mirrors.lock().unwrap().get(key).cloned()
    }

    pub fn mutations(&self) -> Vec<Mutation> {
        self.mutations.lock().unwrap().clone()
    }

    pub fn fail(&self, op: Operation) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn recover(&self) {
        self.failing.lock().unwrap().clear();
    }

    /// Make `op` hang forever, like a call to an unresponsive API server
    pub fn stalling(self, op: Operation) -> Self {
        self.stalled.lock().unwrap().insert(op);
        self
    }

    async fn check(&self, op: Operation) -> Result<()> {
        let stalled = self.stalled.lock().unwrap().contains(&op);
        if stalled {
            std::future::pending::<()>().await;
        }
        if self.failing.lock().unwrap().contains(&op) {
            return Err(api_error(500, "InternalError", &format!("{:?} failed", op)));
        }
        Ok(())
    }

    fn record(&self, mutation: Mutation) {
        self.mutations.lock().unwrap().push(mutation);
    }
}

fn api_error(code: u16, reason: &str, message: &str) -> MirrorError {
    MirrorError::KubeError(kube::Error::Api(ErrorResponse {
        status: "Failure".to_string(),
        message: message.to_string(),
        reason: reason.to_string(),
        code,
    }))
}

impl ObjectStore for MemoryStore {
    async fn get_mirror(&self, key: &ObjectKey) -> Result<Option<SecretMirror>> {
        self.check(Operation::GetMirror).await?;
        Ok(self.mirror(key))
    }

    async fn list_mirrors(&self) -> Result<Vec<SecretMirror>> {
        self.check(Operation::ListMirrors).await?;
        Ok(self.mirrors.lock().unwrap().values().cloned().collect())
    }

    async fn get_secret(&self, key: &ObjectKey) -> Result<Option<Secret>> {
        self.check(Operation::GetSecret).await?;
        Ok(self.secret(key))
    }

    async fn create_secret(&self, secret: &Secret) -> Result<Secret> {
        self.check(Operation::Create).await?;
        let key = ObjectKey::for_object(secret)?;
        let mut secrets = self.secrets.lock().unwrap();
        if secrets.contains_key(&key) {
            return Err(api_error(409, "AlreadyExists", &format!("{} already exists", key)));
        }
        secrets.insert(key.clone(), secret.clone());
        drop(secrets);
        self.record(Mutation::Create(key));
        Ok(secret.clone())
    }

    async fn update_secret(&self, secret: &Secret) -> Result<Secret> {
        self.check(Operation::Update).await?;
        let key = ObjectKey::for_object(secret)?;
        let mut secrets = self.secrets.lock().unwrap();
        if !secrets.contains_key(&key) {
            return Err(api_error(404, "NotFound", &format!("{} not found", key)));
        }
        secrets.insert(key.clone(), secret.clone());
        drop(secrets);
        self.record(Mutation::Update(key));
        Ok(secret.clone())
    }

    async fn delete_secret(&self, secret: &Secret) -> Result<()> {
        self.check(Operation::Delete).await?;
        let key = ObjectKey::for_object(secret)?;
        if self.secrets.lock().unwrap().remove(&key).is_none() {
            return Err(api_error(404, "NotFound", &format!("{} not found", key)));
        }
        self.record(Mutation::Delete(key));
        Ok(())
    }
}

/// A mock HTTP service that returns predefined responses based on request
/// method and path, and records every request it receives.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    requests: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a response for requests with `method` matching the exact path
    pub fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses.lock().unwrap().insert(
            (method.to_string(), path.to_string()),
            (status, body.to_string()),
        );
        self
    }

    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.on("POST", path, status, body)
    }

    pub fn on_put(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PUT", path, status, body)
    }

    pub fn on_delete(self, path: &str, status: u16, body: &str) -> Self {
        self.on("DELETE", path, status, body)
    }

    /// Requests seen so far as (method, path)
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests seen so far that were not reads
    pub fn writes(&self) -> Vec<(String, String)> {
        self.requests()
            .into_iter()
            .filter(|(method, _)| method != "GET")
            .collect()
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        self.responses
            .lock()
            .unwrap()
            .get(&(method.to_string(), path.to_string()))
            .cloned()
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = std::result::Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        self.requests
            .lock()
            .unwrap()
            .push((method.clone(), path.clone()));
        let response = self.find_response(&method, &path);

        Box::pin(async move {
            let (status, body) =
                response.unwrap_or_else(|| (404, not_found_json("resource", &path)));
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// API path of a secret, or of the secrets collection when `name` is empty
pub fn secret_path(namespace: &str, name: &str) -> String {
    let collection = format!("/api/v1/namespaces/{}/secrets", namespace);
    if name.is_empty() {
        collection
    } else {
        format!("{}/{}", collection, name)
    }
}

/// API path of a SecretMirror
pub fn mirror_path(namespace: &str, name: &str) -> String {
    format!(
        "/apis/secret.nakamasato.com/v1alpha1/namespaces/{}/secretmirrors/{}",
        namespace, name
    )
}

pub fn secret_json(secret: &Secret) -> String {
    let mut value = serde_json::to_value(secret).unwrap();
    value["apiVersion"] = "v1".into();
    value["kind"] = "Secret".into();
    value.to_string()
}

pub fn mirror_json(mirror: &SecretMirror) -> String {
    serde_json::to_string(mirror).unwrap()
}

pub fn mirror_list_json(mirrors: &[SecretMirror]) -> String {
    serde_json::json!({
        "apiVersion": "secret.nakamasato.com/v1alpha1",
        "kind": "SecretMirrorList",
        "metadata": { "resourceVersion": "1" },
        "items": mirrors,
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    status_json(404, "NotFound", &format!("{} \"{}\" not found", resource, name))
}

pub fn status_json(code: u16, reason: &str, message: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
    .to_string()
}
