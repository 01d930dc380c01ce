/// State management module
///
/// This module handles all application state, including:
/// - Database connection and queries (library.rs)
/// - Shared data structures (data.rs)
/// - Recipe form buffers and validation (form.rs)
/// - User settings and the theme variant (settings.rs)
pub mod data;
pub mod form;
pub mod library;
pub mod settings;
