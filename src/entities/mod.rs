//! Repository node types
//!
//! **Ancestors** (resolved by name, never created here):
//! - [`Group`]
//! - [`Project`]
//! - [`Collection`] - scoped to a group and project
//!
//! **Written by an upload:**
//! - [`Inventory`] - ordered list of material references
//! - [`Material`] - one polymer per CSV row

pub mod collection;
pub mod group;
pub mod inventory;
pub mod material;
pub mod project;

pub use collection::Collection;
pub use group::Group;
pub use inventory::{Inventory, MaterialRef};
pub use material::{Identifier, Material};
pub use project::Project;
