//! sharehub-notify: hub storage, push delivery, and the weekly digest pipeline

pub mod delivery;
pub mod pipeline;
pub mod push;
pub mod store;

pub use delivery::{DeliveryError, DeliveryTally, PushTransport, deliver_digest};
pub use pipeline::{PipelineError, RunReport, build_digest, run_weekly};
pub use push::{FcmTransport, LogTransport};
pub use store::{HubStore, JsonFileStore, RegistrationStore};
