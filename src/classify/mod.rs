//! Classifier backends.
//!
//! A backend scores one frame against a fixed label set and returns the
//! full ranked `Sample`. The rest of the pipeline treats backends as
//! opaque oracles; only the stability detector decides what gets typed.

pub mod backend;
pub mod backends;
pub mod registry;

pub use backend::ClassifierBackend;
pub use backends::StubBackend;
#[cfg(feature = "backend-tract")]
pub use backends::TractBackend;
pub use registry::BackendRegistry;
