//! Inventory create-or-reuse

use tracing::info;

use crate::core::repository::{save, Repository, SaveOutcome};
use crate::entities::{Collection, Group, Inventory};

use super::IngestError;

/// Save an empty inventory named `name`, reusing one with the same identity
///
/// The returned inventory always has an empty material list, whatever the
/// stored one held before; the final save replaces the remote list.
pub fn resolve_inventory(
    repo: &dyn Repository,
    name: &str,
    group: &Group,
    collection: &Collection,
    public: bool,
) -> Result<(Inventory, SaveOutcome), IngestError> {
    let mut inventory = Inventory::new(name, group, collection, public)?;
    let outcome = save(repo, &mut inventory, true)?;
    info!(inventory = %inventory.name, %outcome, "inventory ready");
    Ok((inventory, outcome))
}
