//! Group / project / collection lookup

use tracing::info;

use crate::core::config::Settings;
use crate::core::repository::{get, Repository};
use crate::entities::{Collection, Group, Project};

use super::IngestError;

/// The three existing containers an upload writes into
#[derive(Debug, Clone, PartialEq)]
pub struct Ancestors {
    pub group: Group,
    pub project: Project,
    pub collection: Collection,
}

/// Look up group, project and collection by name; none of them is created
pub fn resolve_ancestors(
    repo: &dyn Repository,
    settings: &Settings,
) -> Result<Ancestors, IngestError> {
    let group: Group = get(repo, &Group::by_name(&settings.group))?;
    let project: Project = get(repo, &Project::by_name(&settings.project))?;
    let collection: Collection = get(
        repo,
        &Collection::lookup(&settings.collection, &group, &project)?,
    )?;

    info!(
        group = %group.name,
        project = %project.name,
        collection = %collection.name,
        "resolved ancestors"
    );

    Ok(Ancestors {
        group,
        project,
        collection,
    })
}
