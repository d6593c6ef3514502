use super::TaxonomyError;
use super::node::{TaxId, TaxonomyNode};
use super::tree::TaxonomyTree;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, instrument};

pub const NODES_FILE: &str = "nodes.dmp";
pub const NAMES_FILE: &str = "names.dmp";

const FIELD_SEPARATOR: &str = "\t|\t";
const SCIENTIFIC_NAME: &str = "scientific name";

impl TaxonomyTree {
    /// Builds the tree from an NCBI taxdump directory holding `nodes.dmp` and
    /// `names.dmp`. This is the cold path: it parses every line of both files.
    #[instrument(skip_all, name = "taxonomy_build", fields(dump_dir = %dump_dir.display()))]
    pub fn build(dump_dir: &Path) -> Result<Self, TaxonomyError> {
        let open = |name: &str| {
            let path = dump_dir.join(name);
            File::open(&path)
                .map(BufReader::new)
                .map_err(|e| TaxonomyError::Io { path, source: e })
        };
        let tree = Self::from_dump_readers(open(NODES_FILE)?, open(NAMES_FILE)?)?;
        info!(
            nodes = tree.len(),
            max_depth = tree.max_depth(),
            "Built taxonomy from raw dump."
        );
        Ok(tree)
    }

    /// Builds the tree from any pair of `nodes.dmp` / `names.dmp` readers.
    pub fn from_dump_readers(
        nodes: impl BufRead,
        names: impl BufRead,
    ) -> Result<Self, TaxonomyError> {
        let mut scientific_names = parse_names(names)?;
        debug!(names = scientific_names.len(), "Parsed scientific names.");

        let mut tree_nodes = Vec::new();
        for (line_idx, line) in nodes.lines().enumerate() {
            let line = line.map_err(|e| TaxonomyError::Io {
                path: NODES_FILE.into(),
                source: e,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let fields = split_fields(&line);
            if fields.len() < 3 {
                return Err(malformed(NODES_FILE, line_idx, "expected at least 3 fields"));
            }
            let id = parse_id(fields[0], NODES_FILE, line_idx)?;
            let parent = parse_id(fields[1], NODES_FILE, line_idx)?;
            let name = scientific_names
                .remove(&id)
                .unwrap_or_else(|| format!("Unnamed taxon {}", id));

            tree_nodes.push(TaxonomyNode {
                id,
                parent,
                name,
                rank: fields[2].to_string(),
            });
        }

        TaxonomyTree::from_nodes(tree_nodes)
    }
}

fn parse_names(names: impl BufRead) -> Result<HashMap<TaxId, String>, TaxonomyError> {
    let mut scientific_names = HashMap::new();
    for (line_idx, line) in names.lines().enumerate() {
        let line = line.map_err(|e| TaxonomyError::Io {
            path: NAMES_FILE.into(),
            source: e,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_fields(&line);
        if fields.len() < 4 {
            return Err(malformed(NAMES_FILE, line_idx, "expected 4 fields"));
        }
        if fields[3] != SCIENTIFIC_NAME {
            continue;
        }
        let id = parse_id(fields[0], NAMES_FILE, line_idx)?;
        scientific_names.insert(id, fields[1].to_string());
    }
    Ok(scientific_names)
}

/// Splits a `.dmp` line on `\t|\t`, dropping the trailing `\t|` terminator.
fn split_fields(line: &str) -> Vec<&str> {
    let line = line.trim_end_matches(['\r', '\n']);
    let line = line.strip_suffix("\t|").unwrap_or(line);
    line.split(FIELD_SEPARATOR).collect()
}

fn parse_id(field: &str, file: &'static str, line_idx: usize) -> Result<TaxId, TaxonomyError> {
    match field.trim().parse::<TaxId>() {
        Ok(0) => Err(TaxonomyError::ZeroTaxId),
        Ok(id) => Ok(id),
        Err(_) => Err(malformed(
            file,
            line_idx,
            &format!("invalid taxonomy id '{}'", field),
        )),
    }
}

fn malformed(file: &'static str, line_idx: usize, message: &str) -> TaxonomyError {
    TaxonomyError::Parse {
        file,
        line: line_idx + 1,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const NODES: &str = "\
1\t|\t1\t|\tno rank\t|\t\t|\t8\t|\t0\t|\t1\t|\t0\t|\t0\t|\t0\t|\t0\t|\t0\t|\t\t|
2\t|\t131567\t|\tsuperkingdom\t|\t\t|\t0\t|\t0\t|\t11\t|\t0\t|\t0\t|\t0\t|\t0\t|\t0\t|\t\t|
131567\t|\t1\t|\tno rank\t|\t\t|\t8\t|\t1\t|\t1\t|\t1\t|\t0\t|\t1\t|\t1\t|\t0\t|\t\t|
562\t|\t2\t|\tspecies\t|\tEC\t|\t0\t|\t1\t|\t11\t|\t1\t|\t0\t|\t1\t|\t1\t|\t0\t|\t\t|
";

    const NAMES: &str = "\
1\t|\tall\t|\t\t|\tsynonym\t|
1\t|\troot\t|\t\t|\tscientific name\t|
2\t|\tBacteria\t|\tBacteria <bacteria>\t|\tscientific name\t|
2\t|\teubacteria\t|\t\t|\tgenbank common name\t|
131567\t|\tcellular organisms\t|\t\t|\tscientific name\t|
";

    #[test]
    fn parses_ncbi_dump_lines_with_scientific_names_and_ranks() {
        let tree = TaxonomyTree::from_dump_readers(NODES.as_bytes(), NAMES.as_bytes()).unwrap();
        assert_eq!(tree.len(), 4);

        let bacteria = tree.get_node(2).unwrap();
        assert_eq!(bacteria.name, "Bacteria");
        assert_eq!(bacteria.rank, "superkingdom");
        assert_eq!(bacteria.parent, 131567);

        assert_eq!(tree.get_node(1).unwrap().name, "root");
        assert_eq!(tree.get_node(562).unwrap().name, "Unnamed taxon 562");
    }

    #[test]
    fn builds_from_a_dump_directory() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(NODES_FILE), NODES).unwrap();
        fs::write(dir.path().join(NAMES_FILE), NAMES).unwrap();

        let tree = TaxonomyTree::build(dir.path()).unwrap();
        let lineage: Vec<_> = tree.lineage(562).unwrap().iter().map(|n| n.id).collect();
        assert_eq!(lineage, vec![1, 131567, 2, 562]);
    }

    #[test]
    fn missing_dump_file_is_fatal() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(NODES_FILE), NODES).unwrap();
        let err = TaxonomyTree::build(dir.path()).unwrap_err();
        assert!(matches!(err, TaxonomyError::Io { .. }));
    }

    #[test]
    fn malformed_node_line_reports_position() {
        let nodes = "1\t|\t1\t|\tno rank\t|\nabc\t|\t1\t|\tgenus\t|\n";
        let err = TaxonomyTree::from_dump_readers(nodes.as_bytes(), NAMES.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            TaxonomyError::Parse {
                file: NODES_FILE,
                line: 2,
                ..
            }
        ));
    }

    #[test]
    fn zero_id_is_rejected() {
        let nodes = "1\t|\t1\t|\tno rank\t|\n0\t|\t1\t|\tgenus\t|\n";
        let err = TaxonomyTree::from_dump_readers(nodes.as_bytes(), NAMES.as_bytes()).unwrap_err();
        assert!(matches!(err, TaxonomyError::ZeroTaxId));
    }

    #[test]
    fn repeated_builds_are_identical() {
        let a = TaxonomyTree::from_dump_readers(NODES.as_bytes(), NAMES.as_bytes()).unwrap();
        let b = TaxonomyTree::from_dump_readers(NODES.as_bytes(), NAMES.as_bytes()).unwrap();
        let a_nodes: Vec<_> = a.iter().cloned().collect();
        let b_nodes: Vec<_> = b.iter().cloned().collect();
        assert_eq!(a_nodes, b_nodes);
    }
}
