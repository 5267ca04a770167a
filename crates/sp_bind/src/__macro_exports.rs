//! Items used by exported macros. Not public API.

#[cfg(feature = "auto_register")]
pub mod auto_register {
    pub use inventory;

    use crate::Descriptor;

    /// A descriptor builder collected by `submit_descriptor!`.
    pub struct Submission(pub fn() -> Descriptor);

    inventory::collect!(Submission);
}
