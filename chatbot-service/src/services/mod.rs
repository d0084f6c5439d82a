pub mod documents;
pub mod metrics;
pub mod prompts;
pub mod providers;
pub mod rag;
pub mod vector_store;
