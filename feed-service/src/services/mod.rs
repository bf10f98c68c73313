pub mod database;
pub mod enrichment;
pub mod memory;
pub mod metrics;
pub mod store;

pub use database::MongoStore;
pub use enrichment::{AuthorEnrichment, UNKNOWN_AUTHOR};
pub use memory::MemoryStore;
pub use self::metrics::{get_metrics, init_metrics};
pub use store::{DocumentStore, StoreError, JOBS, POSTS, USERS};
