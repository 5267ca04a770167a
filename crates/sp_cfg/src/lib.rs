//! Compile-time configuration helpers.
//!
//! Crates in this workspace expose their cargo features as macros, so a
//! feature-gated block reads like ordinary code instead of a pile of
//! `#[cfg]` attributes:
//!
//! ```
//! pub mod cfg {
//!     sp_cfg::define_alias! {
//!         #[cfg(debug_assertions)] => debug,
//!         #[cfg(feature = "never_enabled")] => never,
//!     }
//! }
//!
//! fn mode() -> &'static str {
//!     cfg::never! {
//!         if { "never" } else { "default" }
//!     }
//! }
//!
//! assert_eq!(mode(), "default");
//! assert_eq!(cfg::never!(), false);
//! ```
#![no_std]

// -----------------------------------------------------------------------------
// Switches

/// Passes the provided code through unchanged.
///
/// - `enabled!()` evaluates to `true`.
/// - `enabled! { if { A } else { B } }` expands to `A`.
/// - `enabled! { A }` expands to `A`.
#[macro_export]
macro_rules! enabled {
    () => { true };
    (if { $($p:tt)* } else { $($n:tt)* }) => { $($p)* };
    ($($p:tt)*) => { $($p)* };
}

/// Removes the provided code.
///
/// - `disabled!()` evaluates to `false`.
/// - `disabled! { if { A } else { B } }` expands to `B`.
/// - `disabled! { A }` expands to nothing.
#[macro_export]
macro_rules! disabled {
    () => { false };
    (if { $($p:tt)* } else { $($n:tt)* }) => { $($n)* };
    ($($p:tt)*) => {};
}

// -----------------------------------------------------------------------------
// Alias

/// Defines one macro per configuration predicate.
///
/// Each alias resolves to [`enabled!`] when its predicate holds in the
/// *calling* crate and to [`disabled!`] otherwise.
#[macro_export]
macro_rules! define_alias {
    ($(#[cfg($meta:meta)] => $name:ident),* $(,)?) => {
        $(
            #[cfg($meta)]
            #[doc = concat!("Keeps the provided code, `#[cfg(", stringify!($meta), ")]` is active.")]
            pub use $crate::enabled as $name;

            #[cfg(not($meta))]
            #[doc = concat!("Drops the provided code, `#[cfg(", stringify!($meta), ")]` is inactive.")]
            pub use $crate::disabled as $name;
        )*
    };
}
