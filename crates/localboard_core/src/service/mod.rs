//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation, store mutation and transient feedback.
//! - Keep presentation layers decoupled from storage details.

pub mod cart_service;
pub mod feedback;
pub mod tracker_controller;
