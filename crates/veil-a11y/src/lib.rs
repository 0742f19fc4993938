//! Veil Accessibility
//!
//! ARIA attribute delegation for shadow-DOM components.
//!
//! Features:
//! - Attribute/property mapping for the reflective accessibility surface
//! - Host-to-child attribute delegation across the shadow boundary
//! - Clone-based fallback for IDREF attributes without reflection support

pub mod delegation;
pub mod reflection;

pub use delegation::{AriaDelegation, DelegationError, DELEGATED_ARIA_ATTRIBUTE};
pub use reflection::{ReflectionSupport, ARIA_PROPERTIES, CLONEABLE_ATTRIBUTES};
