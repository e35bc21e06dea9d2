// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// The operator name, used as field manager on every write
pub const OPERATOR_NAME: &str = "secret-mirror";

/// API group and version served by the SecretMirror CRD
pub mod api {
    pub const GROUP: &str = "secret.nakamasato.com";
    pub const VERSION: &str = "v1alpha1";
    pub const KIND: &str = "SecretMirror";
}

/// CRD polling configuration
pub mod crd {
    /// Initial polling interval in seconds when waiting for CRD
    pub const POLL_INTERVAL_SECS: u64 = 10;
    /// Maximum polling interval in seconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_SECS: u64 = 60;
}

/// Defaults for the requeue and timeout settings in [`crate::config::Config`]
pub mod defaults {
    pub const REQUEUE_AFTER_DELETE_SECS: u64 = 1;
    pub const ERROR_REQUEUE_SECS: u64 = 60;
    pub const RECONCILE_TIMEOUT_SECS: u64 = 30;
}
