//! End-to-end pipeline tests over temporary directories.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use ssmix_core::{create_ssmix, CreateOptions, RunOutcome};

const HEADER: &str = "timestamp,type,text,icd10,mdcdx2,provisional,hot,jlac10,lab_value,unit,discharge_disposition,dob";

fn write_csv(dir: &Path, name: &str, rows: &[&str]) {
    let path = dir.join(name);
    let mut file = fs::File::create(path).unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
}

/// Relative path -> file bytes for every file under a directory.
fn tree_snapshot(dir: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    let mut snapshot = BTreeMap::new();
    collect(dir, dir, &mut snapshot);
    snapshot
}

fn collect(root: &Path, dir: &Path, snapshot: &mut BTreeMap<PathBuf, Vec<u8>>) {
    if !dir.exists() {
        return;
    }
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect(root, &path, snapshot);
        } else {
            let rel = path.strip_prefix(root).unwrap().to_path_buf();
            snapshot.insert(rel, fs::read(&path).unwrap());
        }
    }
}

fn options(source: &Path, output: &Path, workers: usize) -> CreateOptions {
    let mut opts = CreateOptions::new(source, output);
    opts.max_workers = workers;
    opts.seed = 42;
    opts
}

#[test]
fn ointment_prescription_yields_null_literal_rxe3() {
    let source = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_csv(
        source.path(),
        "64_M_p1.csv",
        &["20200401100000000000,3,仮白色ワセリン軟膏,,,,123456789,,,,,"],
    );

    let outcome = create_ssmix(&options(source.path(), output.path(), 1)).unwrap();
    let RunOutcome::Generated { patients, messages, .. } = outcome else {
        panic!("expected generation");
    };
    assert_eq!(patients, 1);
    // Visit, prescription, demographics.
    assert_eq!(messages, 3);

    let snapshot = tree_snapshot(output.path());
    let (path, bytes) = snapshot
        .iter()
        .find(|(path, _)| path.to_string_lossy().contains("OMP-01"))
        .expect("an OMP-01 file exists");
    assert!(!path.to_string_lossy().contains('.'), "no dot-extension");
    let text = String::from_utf8(bytes.clone()).unwrap();
    assert!(!text.contains('\n'), "segments are CR-framed");

    let segments: Vec<&str> = text.split('\r').filter(|s| !s.is_empty()).collect();
    assert_eq!(segments.iter().filter(|s| s.starts_with("PID|")).count(), 1);
    assert_eq!(segments.iter().filter(|s| s.starts_with("PV1|")).count(), 1);
    let rxe = segments.iter().find(|s| s.starts_with("RXE|")).unwrap();
    let fields: Vec<&str> = rxe.split('|').collect();
    assert_eq!(fields[3], "\"\"", "RXE-3 carries the visible null literal");
}

#[test]
fn free_text_encoding_characters_are_escaped_once() {
    let source = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_csv(
        source.path(),
        "50_F_esc.csv",
        &[r"20200401100000000000,3,A|B^C\D,,,,123456789,,,,,"],
    );

    create_ssmix(&options(source.path(), output.path(), 1)).unwrap();
    let snapshot = tree_snapshot(output.path());
    let (_, bytes) = snapshot
        .iter()
        .find(|(path, _)| path.to_string_lossy().contains("OMP-01"))
        .unwrap();
    let text = String::from_utf8(bytes.clone()).unwrap();
    assert!(text.contains(r"A\F\B\S\C\E\D"));
    assert!(!text.contains("A|B^C"));
}

#[test]
fn temporal_violation_blocks_generation_and_writes_report() {
    let source = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_csv(
        source.path(),
        "0_M_t.csv",
        &["20190101120000000000,0,,,,,,,,,,20200101"],
    );

    let outcome = create_ssmix(&options(source.path(), output.path(), 1)).unwrap();
    let RunOutcome::ValidationFailed { report_path, errors } = outcome else {
        panic!("expected validation failure");
    };
    assert_eq!(errors, 1);
    assert!(report_path.exists());
    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["errors"].as_array().unwrap().len(), 1);
    assert!(!output.path().join("ssmixtwins").exists(), "no message tree");
}

#[test]
fn identical_seeds_give_byte_identical_trees() {
    let source = tempfile::tempdir().unwrap();
    write_csv(
        source.path(),
        "64_M_a.csv",
        &[
            "20200401090000000000,2,高血圧症,I10,20540293,,,,,,,",
            "20200401100000000000,3,アムロジピン錠,,,,117230101,,,,,",
            "20200402080000000000,0,,,,,,,,,,",
            "20200402090000000000,5,白血球数,,,,,2A990000001930102,6500,/ul,,",
            "20200405100000000000,1,,,,,,,,,02,",
        ],
    );
    write_csv(
        source.path(),
        "30_F_b.csv",
        &[
            "20210301090000000000,4,生理食塩液,,,,640453002,,,,,",
            "20210301090000000000,4,アドナ注,,,,620002559,,,,,",
        ],
    );

    let out1 = tempfile::tempdir().unwrap();
    let out2 = tempfile::tempdir().unwrap();
    create_ssmix(&options(source.path(), out1.path(), 1)).unwrap();
    create_ssmix(&options(source.path(), out2.path(), 1)).unwrap();

    let a = tree_snapshot(out1.path());
    let b = tree_snapshot(out2.path());
    assert!(!a.is_empty());
    assert_eq!(a, b, "same seed and inputs must reproduce the tree");
}

#[test]
fn worker_count_does_not_change_the_tree() {
    let source = tempfile::tempdir().unwrap();
    for i in 0..6 {
        write_csv(
            source.path(),
            &format!("4{i}_M_w{i}.csv"),
            &[
                "20200401090000000000,2,胃炎,K297,20054174,,,,,,,",
                "20200401100000000000,3,ダーゼン錠,,,,108665201,,,,,",
            ],
        );
    }

    let out1 = tempfile::tempdir().unwrap();
    let out8 = tempfile::tempdir().unwrap();
    create_ssmix(&options(source.path(), out1.path(), 1)).unwrap();
    create_ssmix(&options(source.path(), out8.path(), 8)).unwrap();

    let a = tree_snapshot(out1.path());
    let b = tree_snapshot(out8.path());
    assert!(!a.is_empty());
    assert_eq!(a, b, "worker count must not affect the output");
}

#[test]
fn changing_one_patient_only_touches_their_subtree() {
    let source1 = tempfile::tempdir().unwrap();
    let source2 = tempfile::tempdir().unwrap();
    let rows_a = ["20200401100000000000,3,ダーゼン錠,,,,108665201,,,,,"];
    let rows_b1 = ["20210301100000000000,5,白血球数,,,,,2A990000001930102,6500,/ul,,"];
    let rows_b2 = ["20210301100000000000,5,白血球数,,,,,2A990000001930102,7100,/ul,,"];
    write_csv(source1.path(), "64_M_a.csv", &rows_a);
    write_csv(source1.path(), "30_F_b.csv", &rows_b1);
    write_csv(source2.path(), "64_M_a.csv", &rows_a);
    write_csv(source2.path(), "30_F_b.csv", &rows_b2);

    let out1 = tempfile::tempdir().unwrap();
    let out2 = tempfile::tempdir().unwrap();
    create_ssmix(&options(source1.path(), out1.path(), 1)).unwrap();
    create_ssmix(&options(source2.path(), out2.path(), 1)).unwrap();

    let a = tree_snapshot(out1.path());
    let b = tree_snapshot(out2.path());
    assert_eq!(
        a.keys().collect::<Vec<_>>(),
        b.keys().collect::<Vec<_>>(),
        "path sets match"
    );

    // Patient ids are assigned by sorted file name: 30_F_b sorts first.
    let mut changed_subtrees = std::collections::BTreeSet::new();
    for (path, bytes) in &a {
        if b[path] != *bytes {
            // <root>/ssmixtwins/<lv1>/<lv2>/<pid>/...
            let pid = path.components().nth(3).unwrap().as_os_str().to_string_lossy().to_string();
            changed_subtrees.insert(pid);
        }
    }
    assert_eq!(changed_subtrees.len(), 1, "exactly one patient subtree differs");
}

#[test]
fn patient_messages_are_in_clinical_order() {
    let source = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_csv(
        source.path(),
        "64_M_ord.csv",
        &[
            "20200402080000000000,0,,,,,,,,,,",
            "20200403090000000000,3,ダーゼン錠,,,,108665201,,,,,",
            "20200405100000000000,1,,,,,,,,,02,",
        ],
    );

    create_ssmix(&options(source.path(), output.path(), 1)).unwrap();
    let snapshot = tree_snapshot(output.path());

    let date_of = |category: &str| -> String {
        snapshot
            .keys()
            .find(|path| path.to_string_lossy().contains(category))
            .unwrap_or_else(|| panic!("{category} missing"))
            .components()
            .nth(4)
            .unwrap()
            .as_os_str()
            .to_string_lossy()
            .to_string()
    };
    assert_eq!(date_of("ADT-22"), "20200402");
    assert_eq!(date_of("OMP-01"), "20200403");
    assert_eq!(date_of("ADT-52"), "20200405");
    // Demographics land in the static bucket.
    assert_eq!(date_of("ADT-00"), "-");
}

#[test]
fn msh_constants_hold_for_every_message() {
    let source = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_csv(
        source.path(),
        "64_M_c.csv",
        &[
            "20200401090000000000,2,胃炎,K297,20054174,,,,,,,",
            "20200401100000000000,3,ダーゼン錠,,,,108665201,,,,,",
            "20200401110000000000,5,総蛋白,,,,,3A010000002327101,7.2,g/dl,,",
        ],
    );
    create_ssmix(&options(source.path(), output.path(), 1)).unwrap();

    let snapshot = tree_snapshot(output.path());
    assert!(!snapshot.is_empty());
    for (path, bytes) in snapshot {
        let text = String::from_utf8(bytes).unwrap();
        assert!(
            text.starts_with("MSH|^~\\&|"),
            "{}: MSH leads with the fixed delimiters",
            path.display()
        );
        assert!(!text.contains('\n'), "{}: no line feeds", path.display());
        // MSH-1 is the separator itself, so MSH-11/12 sit at split
        // indices 10 and 11.
        let msh_fields: Vec<&str> = text.split('\r').next().unwrap().split('|').collect();
        assert_eq!(msh_fields[10], "P");
        assert_eq!(msh_fields[11], "2.5");
    }
}
