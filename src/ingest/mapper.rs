//! CSV row → material

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::repository::{save, Node, Repository, SaveOutcome};
use crate::entities::{Group, Identifier, Material, Project};

use super::row::{cell, PolymerRow};
use super::IngestError;

/// Per-monomer block in the notes payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentNotes {
    pub name: Value,
    #[serde(rename = "N")]
    pub n: Value,
    #[serde(rename = "v(nm3)")]
    pub volume: Value,
    #[serde(rename = "Rg(nm)")]
    pub radius_of_gyration: Value,
}

/// Notes payload stored (JSON-encoded) on each polymer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolymerNotes {
    pub component1: ComponentNotes,
    pub component2: ComponentNotes,
    #[serde(rename = "Lapprox")]
    pub contour_length: Value,
    pub nchains: Value,
    #[serde(rename = "Vbox(nm3)")]
    pub box_volume: Value,
    #[serde(rename = "T(K)")]
    pub temperature: Value,
    #[serde(rename = "chi(vref=0.1nm3)")]
    pub chi: Value,
    pub chistd: Value,
    pub directory: Value,
}

impl PolymerNotes {
    pub fn from_row(row: &PolymerRow) -> Self {
        Self {
            component1: ComponentNotes {
                name: cell(&row.name1),
                n: cell(&row.n1),
                volume: cell(&row.v1),
                radius_of_gyration: cell(&row.rg1),
            },
            // N for the second block comes from N1 as well; the N2 column is not used.
            component2: ComponentNotes {
                name: cell(&row.name2),
                n: cell(&row.n1),
                volume: cell(&row.v2),
                radius_of_gyration: cell(&row.rg2),
            },
            contour_length: cell(&row.lapprox),
            nchains: cell(&row.nchains),
            box_volume: cell(&row.vbox),
            temperature: cell(&row.temperature),
            chi: cell(&row.chi),
            chistd: cell(&row.chistd),
            directory: cell(&row.directory),
        }
    }
}

/// Polymer name for the row at 0-based `index`: `{name1}-db-{name2}_({index+1})`
pub fn material_name(index: usize, row: &PolymerRow) -> String {
    format!("{}-db-{}_({})", row.name1, row.name2, index + 1)
}

/// Build the (unsaved) material for one row
pub fn build_material(
    index: usize,
    row: &PolymerRow,
    group: &Group,
    project: &Project,
    public: bool,
) -> Result<Material, IngestError> {
    let name = material_name(index, row);

    if let Some(n2) = row.n2.as_deref() {
        if !n2.trim().is_empty() && n2.trim() != row.n1.trim() {
            warn!(
                material = %name,
                n1 = %row.n1,
                n2 = %n2,
                "N2 differs from N1; component2 N is taken from N1"
            );
        }
    }

    let notes = serde_json::to_string(&PolymerNotes::from_row(row)).map_err(|source| {
        IngestError::Notes {
            name: name.clone(),
            source,
        }
    })?;

    Ok(Material {
        uid: None,
        group: group.require_uid()?.to_string(),
        project: project.require_uid()?.to_string(),
        identifiers: vec![
            Identifier::new("preferred_name", name.clone()),
            Identifier::new("bigsmiles", row.bigsmiles.clone()),
        ],
        name,
        notes,
        public,
    })
}

/// Build the material for one row and create-or-update it by name
pub fn upload_polymer(
    repo: &dyn Repository,
    index: usize,
    row: &PolymerRow,
    group: &Group,
    project: &Project,
    public: bool,
) -> Result<(Material, SaveOutcome), IngestError> {
    let mut material = build_material(index, row, group, project, public)?;
    let outcome = save(repo, &mut material, true)?;
    debug!(material = %material.name, %outcome, "saved material");
    Ok((material, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::repository::{MemoryRepository, NodeKind};
    use serde_json::json;

    fn row(name1: &str, name2: &str) -> PolymerRow {
        PolymerRow {
            name1: name1.into(),
            name2: name2.into(),
            bigsmiles: "{[<]CC(c1ccccc1)[>]}".into(),
            n1: "20".into(),
            v1: "0.17".into(),
            rg1: "1.2".into(),
            n2: Some("30".into()),
            v2: "0.15".into(),
            rg2: "1.1".into(),
            lapprox: "12.5".into(),
            nchains: "100".into(),
            vbox: "8000".into(),
            temperature: "298".into(),
            chi: "0.04".into(),
            chistd: "0.002".into(),
            directory: "runs/ps_pmma".into(),
        }
    }

    fn group() -> Group {
        Group {
            uid: Some("group-1".into()),
            name: "Polymers".into(),
        }
    }

    fn project() -> Project {
        Project {
            uid: Some("project-2".into()),
            name: "Diblocks".into(),
        }
    }

    #[test]
    fn test_material_name_is_one_based() {
        assert_eq!(material_name(0, &row("A", "B")), "A-db-B_(1)");
        assert_eq!(material_name(41, &row("PS", "PMMA")), "PS-db-PMMA_(42)");
    }

    #[test]
    fn test_notes_have_exact_keys() {
        let material = build_material(0, &row("PS", "PMMA"), &group(), &project(), false).unwrap();
        let notes: Value = serde_json::from_str(&material.notes).unwrap();

        let mut keys: Vec<&str> = notes.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "Lapprox",
                "T(K)",
                "Vbox(nm3)",
                "chi(vref=0.1nm3)",
                "chistd",
                "component1",
                "component2",
                "directory",
                "nchains",
            ]
        );

        for component in ["component1", "component2"] {
            let mut keys: Vec<&str> = notes[component]
                .as_object()
                .unwrap()
                .keys()
                .map(String::as_str)
                .collect();
            keys.sort_unstable();
            assert_eq!(keys, vec!["N", "Rg(nm)", "name", "v(nm3)"]);
        }
    }

    #[test]
    fn test_notes_values() {
        let material = build_material(0, &row("PS", "PMMA"), &group(), &project(), false).unwrap();
        let notes: Value = serde_json::from_str(&material.notes).unwrap();

        assert_eq!(notes["component1"]["name"], json!("PS"));
        assert_eq!(notes["component1"]["N"], json!(20));
        assert_eq!(notes["component2"]["name"], json!("PMMA"));
        assert_eq!(notes["component2"]["v(nm3)"], json!(0.15));
        assert_eq!(notes["T(K)"], json!(298));
        assert_eq!(notes["directory"], json!("runs/ps_pmma"));
    }

    #[test]
    fn test_component2_n_comes_from_n1() {
        let notes = PolymerNotes::from_row(&row("PS", "PMMA"));
        assert_eq!(notes.component2.n, json!(20));
    }

    #[test]
    fn test_notes_field_order() {
        let encoded = serde_json::to_string(&PolymerNotes::from_row(&row("A", "B"))).unwrap();
        let c1 = encoded.find("component1").unwrap();
        let c2 = encoded.find("component2").unwrap();
        let dir = encoded.find("directory").unwrap();
        assert!(c1 < c2 && c2 < dir);
    }

    #[test]
    fn test_identifiers() {
        let material = build_material(2, &row("A", "B"), &group(), &project(), true).unwrap();
        assert_eq!(material.identifier("preferred_name"), Some("A-db-B_(3)"));
        assert_eq!(material.identifier("bigsmiles"), Some("{[<]CC(c1ccccc1)[>]}"));
        assert_eq!(material.group, "group-1");
        assert_eq!(material.project, "project-2");
        assert!(material.public);
    }

    #[test]
    fn test_upload_polymer_is_idempotent_by_name() {
        let repo = MemoryRepository::new();

        let (first, outcome) =
            upload_polymer(&repo, 0, &row("A", "B"), &group(), &project(), false).unwrap();
        assert_eq!(outcome, SaveOutcome::Created);

        let (second, outcome) =
            upload_polymer(&repo, 0, &row("A", "B"), &group(), &project(), true).unwrap();
        assert_eq!(outcome, SaveOutcome::Updated);
        assert_eq!(first.uid, second.uid);

        let stored = repo.nodes(NodeKind::Material);
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0]["public"], json!(true));
    }
}
