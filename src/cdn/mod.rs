//! CDN publishing to Google Cloud Storage.

pub mod auth;
pub mod credentials;
pub mod gcs;
pub mod store;
pub mod sync;

pub use credentials::{DEFAULT_CREDENTIALS_ENV, ServiceAccountKey};
pub use gcs::{DEFAULT_BUCKET, DEFAULT_ENDPOINT, GcsClient, content_type_for};
pub use store::{MemoryStore, ObjectStore, PutOutcome, RemoteObject};
pub use sync::{
    DEFAULT_PREFIX, DEFAULT_SOURCE_DIR, SyncOptions, SyncReport, destination_key, sync_directory,
};
