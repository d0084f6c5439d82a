//! chatbot-service: LLM chat, translation and retrieval-augmented answers
//! behind a uniform JSON envelope.

pub mod config;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
