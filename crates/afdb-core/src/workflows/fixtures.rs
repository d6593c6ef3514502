//! A miniature data directory shared by the workflow tests.

use crate::core::codec::encode;
use crate::core::store::StoreWriter;
use crate::core::taxonomy::dump::{NAMES_FILE, NODES_FILE};
use crate::engine::config::{DataConfig, DataConfigBuilder, Dataset, DatasetPaths};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const NODES: &str = "\
1\t|\t1\t|\tno rank\t|
131567\t|\t1\t|\tno rank\t|
2\t|\t131567\t|\tsuperkingdom\t|
1224\t|\t2\t|\tphylum\t|
1236\t|\t1224\t|\tclass\t|
561\t|\t1236\t|\tgenus\t|
562\t|\t561\t|\tspecies\t|
2759\t|\t131567\t|\tsuperkingdom\t|
9606\t|\t2759\t|\tspecies\t|
";

pub const NAMES: &str = "\
1\t|\troot\t|\t\t|\tscientific name\t|
131567\t|\tcellular organisms\t|\t\t|\tscientific name\t|
2\t|\tBacteria\t|\t\t|\tscientific name\t|
1224\t|\tPseudomonadota\t|\t\t|\tscientific name\t|
1236\t|\tGammaproteobacteria\t|\t\t|\tscientific name\t|
561\t|\tEscherichia\t|\t\t|\tscientific name\t|
562\t|\tEscherichia coli\t|\t\t|\tscientific name\t|
2759\t|\tEukaryota\t|\t\t|\tscientific name\t|
9606\t|\tHomo sapiens\t|\t\t|\tscientific name\t|
";

/// Axis-major coordinates for `n` residues along x, `step` Å apart.
pub fn straight_line(n: usize, step: f32) -> Vec<f32> {
    let mut coords = Vec::with_capacity(3 * n);
    coords.extend((0..n).map(|i| i as f32 * step));
    coords.extend((0..n).map(|i| 1.5 + i as f32 * 0.01));
    coords.extend(std::iter::repeat_n(-2.0, n));
    coords
}

fn ca_block(n: usize, step: f32) -> Vec<u8> {
    let mut block = encode(&straight_line(n, step)).unwrap();
    block.push(0);
    block
}

fn write_store(dir: &Path, dataset: Dataset, records: &[(&str, Vec<u8>)]) {
    let paths = DatasetPaths::in_dir(dir, dataset);
    let mut writer = StoreWriter::create(&paths.data, &paths.index).unwrap();
    for (key, bytes) in records {
        writer.append(key, bytes).unwrap();
    }
    writer.finish().unwrap();
}

/// Lays out five stores and a taxonomy dump under a fresh temp directory.
///
/// * `A0A000`: 4 residues, plausible trace, pLDDT, description, similars.
/// * `A0A001`: 2 residues, plausible trace, pLDDT, no description.
/// * `A0A002`: 3 residues, 10 Å steps (implausible), no pLDDT.
/// * `C0C000`: trace only, no sequence.
pub fn data_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write_store(
        root,
        Dataset::Sequences,
        &[
            ("A0A000", b"MKVL\n\0".to_vec()),
            ("A0A001", b"MA\n\0".to_vec()),
            ("A0A002", b"MAG\n\0".to_vec()),
        ],
    );
    write_store(
        root,
        Dataset::CaTraces,
        &[
            ("A0A000", ca_block(4, 3.8)),
            ("A0A001", ca_block(2, 3.8)),
            ("A0A002", ca_block(3, 10.0)),
            ("C0C000", ca_block(2, 3.8)),
        ],
    );
    write_store(
        root,
        Dataset::Plddt,
        &[
            ("A0A000", b"95 90 88 70\n\0".to_vec()),
            ("A0A001", b"50 60\n\0".to_vec()),
        ],
    );
    write_store(
        root,
        Dataset::Descriptions,
        &[("A0A000", "Uncharacterized protein YqfB\n\0".as_bytes().to_vec())],
    );
    write_store(
        root,
        Dataset::Similars,
        &[(
            "A0A000",
            b"A0A001 1e-10\nA0A000 0\nbroken-row\nA0A002 1e-50\n".to_vec(),
        )],
    );

    fs::write(root.join(NODES_FILE), NODES).unwrap();
    fs::write(root.join(NAMES_FILE), NAMES).unwrap();
    dir
}

pub fn config(dir: &Path) -> DataConfig {
    DataConfigBuilder::new()
        .data_dir(dir.to_path_buf())
        .build()
        .unwrap()
}
