//! # Task API
//!
//! A small REST service for managing tasks, built with Axum, SQLx, and Tokio.
pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod service;

#[cfg(test)]
mod tests;
