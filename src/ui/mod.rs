/// Presentation shell module
///
/// This module renders from state and never mutates it:
/// - Screen view functions (screens.rs)
/// - Input-layer trigger suppression (cooldown.rs)

pub mod cooldown;
pub mod screens;
