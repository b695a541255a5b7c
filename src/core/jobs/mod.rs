pub mod model;
pub mod pipeline;
pub mod status;
pub mod store;

pub use model::{Job, JobPhase};
pub use pipeline::SetupPipeline;
pub use status::{query_status, StatusReport};
pub use store::JobStore;
