//! Element and face types shared by the readers and the connectivity builder.
//!
//! - [`cell_type`]: canonical element types and the type-name alias table.
//! - [`face`]: oriented faces and their order-independent identity keys.

pub mod cell_type;
pub mod face;
