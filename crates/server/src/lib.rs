//! Server crate for the ReelAssist movie assistant.
//!
//! This crate contains the dispatcher that routes each query to keyword
//! search, the recommendation backend or the conversational backend, plus
//! the wiring that builds it from configuration.

pub mod collaborators;
pub mod config;
pub mod dispatcher;
pub mod wiring;

pub use collaborators::{GrpcConversationalist, GrpcRecommender};
pub use config::{DispatchConfig, ServiceConfig};
pub use dispatcher::QueryDispatcher;
pub use wiring::{attach_services, build_dispatcher};
