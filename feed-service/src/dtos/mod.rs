pub mod fields;
pub mod jobs;
pub mod posts;

pub use jobs::JobResponse;
pub use posts::PostResponse;
