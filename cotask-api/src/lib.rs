//! # CoTask API Server Library
//!
//! This library provides the core functionality for the CoTask API server.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `response`: Uniform success envelope
//! - `routes`: API route handlers
//! - `realtime`: Connection registry, event fan-out, and WebSocket endpoint

pub mod app;
pub mod config;
pub mod error;
pub mod realtime;
pub mod response;
pub mod routes;
