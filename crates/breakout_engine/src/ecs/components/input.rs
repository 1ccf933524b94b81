//! Input binding marker

/// Marks an entity as accepting player control
///
/// Carries no payload. The input adapter targets entities that have one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputComponent;

impl InputComponent {
    /// Document tag
    pub const TAG: &'static str = "InputComponent";
}
