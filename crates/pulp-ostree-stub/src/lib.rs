//! In-memory Pulp ostree API stub.
//!
//! Serves the subset of the Pulp v3 REST API that `pulp-ostree-client`
//! uses: artifact upload, ostree repository list/create/import, ostree
//! distribution create, and task reads. Tasks advance one state per read,
//! so a polling client sees `waiting → running → completed`.
//!
//! Storage is in-memory (DashMap) with no persistence.

pub mod routes;
pub mod store;

pub use routes::router;
pub use store::AppState;
