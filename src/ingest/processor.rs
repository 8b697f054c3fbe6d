//! Drive the row mapper over a CSV file

use csv::ReaderBuilder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

use crate::core::config::Settings;
use crate::core::repository::{save, Repository, SaveOutcome};
use crate::entities::{Group, Inventory, Material, Project};

use super::ancestors::{resolve_ancestors, Ancestors};
use super::inventory::resolve_inventory;
use super::mapper::upload_polymer;
use super::row::PolymerRow;
use super::IngestError;

/// Emitted after each material is saved
#[derive(Debug)]
pub struct RowEvent<'a> {
    /// 1-based line in the CSV file (header is line 1)
    pub line: usize,
    pub material: &'a Material,
    pub outcome: SaveOutcome,
}

/// Counts for one pass over a CSV file
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub rows_processed: usize,
    pub materials_created: usize,
    pub materials_updated: usize,
}

/// Everything an upload produced
#[derive(Debug)]
pub struct UploadSummary {
    pub ancestors: Ancestors,
    pub inventory: Inventory,
    pub inventory_outcome: SaveOutcome,
    pub materials: Vec<Material>,
    pub report: IngestReport,
}

/// Parse every row up front so a malformed file fails before anything is written
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<PolymerRow>, IngestError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    rdr.headers()
        .map_err(|source| IngestError::Csv { row: 1, source })?;

    let rows = rdr
        .deserialize::<PolymerRow>()
        .enumerate()
        .map(|(idx, result)| {
            result.map_err(|source| IngestError::Csv {
                row: idx + 2, // +2 for 1-indexed and header row
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Upsert one material per row, appending each to `inventory`, then save the inventory once
pub fn process_reader<R: Read>(
    reader: R,
    inventory: &mut Inventory,
    repo: &dyn Repository,
    group: &Group,
    project: &Project,
    public: bool,
    mut on_row: impl FnMut(RowEvent<'_>),
) -> Result<(Vec<Material>, IngestReport), IngestError> {
    let rows = read_rows(reader)?;
    let mut report = IngestReport::default();
    let mut materials = Vec::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        let (material, outcome) = upload_polymer(repo, index, row, group, project, public)?;
        inventory.push(&material)?;

        report.rows_processed += 1;
        match outcome {
            SaveOutcome::Created => report.materials_created += 1,
            SaveOutcome::Updated => report.materials_updated += 1,
        }

        on_row(RowEvent {
            line: index + 2,
            material: &material,
            outcome,
        });
        materials.push(material);
    }

    save(repo, inventory, true)?;
    info!(
        inventory = %inventory.name,
        materials = inventory.materials.len(),
        "inventory saved"
    );

    Ok((materials, report))
}

/// [`process_reader`] over the file at `path`
pub fn process_file(
    path: &Path,
    inventory: &mut Inventory,
    repo: &dyn Repository,
    group: &Group,
    project: &Project,
    public: bool,
    on_row: impl FnMut(RowEvent<'_>),
) -> Result<(Vec<Material>, IngestReport), IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    process_reader(
        BufReader::new(file),
        inventory,
        repo,
        group,
        project,
        public,
        on_row,
    )
}

/// Run a complete upload described by `settings`
pub fn upload(
    repo: &dyn Repository,
    settings: &Settings,
    on_row: impl FnMut(RowEvent<'_>),
) -> Result<UploadSummary, IngestError> {
    let ancestors = resolve_ancestors(repo, settings)?;
    let (mut inventory, inventory_outcome) = resolve_inventory(
        repo,
        &settings.inventory,
        &ancestors.group,
        &ancestors.collection,
        settings.public,
    )?;

    let (materials, report) = process_file(
        &settings.path,
        &mut inventory,
        repo,
        &ancestors.group,
        &ancestors.project,
        settings.public,
        on_row,
    )?;

    Ok(UploadSummary {
        ancestors,
        inventory,
        inventory_outcome,
        materials,
        report,
    })
}
