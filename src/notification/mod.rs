//! Handles the dispatching of rendered notifications to the delivery service.
//!
//! The handler talks to the fan-out topic through the `TopicPublisher` trait
//! from `core`, keeping it unaware of the concrete transport. This module
//! holds the production implementation.
pub mod http;
