//! Session lifecycle: pure transition functions, the session store, and
//! the async orchestration service.

pub mod machine;
pub mod service;
pub mod store;
