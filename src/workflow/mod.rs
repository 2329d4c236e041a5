pub mod attempt_flow;
pub mod authoring_ctx;
pub mod authoring_flow;

pub use attempt_flow::AttemptFlow;
pub use authoring_ctx::AuthoringCtx;
pub use authoring_flow::AuthoringFlow;
