/// State management module
///
/// This module owns the application state:
/// - The session state machine and action transitions (session.rs)
/// - Artist search results and coordinate extraction (artist.rs)
/// - Shared data structures (data.rs)

pub mod artist;
pub mod data;
pub mod session;
