// End-to-end comparison of DBC snapshot directories
use dbc_diff::{compare_directories, BatchRequest, DbcLoader, DiffConfig, DiffEngine, FieldValue};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const HEADER: &str = r#"
VERSION ""

NS_ :
    CM_
    BA_DEF_
    BA_
    VAL_

BS_:

BU_: ECU1 ECU2
"#;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn write_dbc(dir: &Path, name: &str, body: &str) {
    fs::write(dir.join(name), format!("{}{}", HEADER, body)).unwrap();
}

fn setup() -> (TempDir, BatchRequest) {
    let root = TempDir::new().unwrap();
    let current = root.path().join("dbc");
    let baseline = current.join("old");
    fs::create_dir_all(&baseline).unwrap();
    let request = BatchRequest::new(&current, &baseline);
    (root, request)
}

#[test]
fn powertrain_snapshot_changes() {
    init_logging();
    let (_root, request) = setup();

    write_dbc(
        &request.baseline_dir,
        "powertrain.dbc",
        r#"
BO_ 100 Speed: 8 ECU1
 SG_ v : 0|16@1+ (0.1,0) [0|250] "km/h" ECU2
 SG_ rpm : 16|16@1+ (1,0) [0|8000] "rpm" ECU2
"#,
    );
    write_dbc(
        &request.current_dir,
        "powertrain.dbc",
        r#"
BO_ 100 Speed: 8 ECU1
 SG_ v : 0|16@1+ (0.01,0) [0|250] "km/h" ECU2

BO_ 200 Door: 2 ECU2
 SG_ open : 0|1@1+ (1,0) [0|1] "" ECU1
"#,
    );

    let engine = DiffEngine::new(DiffConfig::default());
    let report = compare_directories(&request, &DbcLoader, &engine).unwrap();

    assert!(report.failures.is_empty());
    assert_eq!(report.files.len(), 1);
    let file = &report.files[0];
    assert_eq!(file.file_name, "powertrain.dbc");
    assert_eq!(file.stats.num_messages, 2);

    let result = &file.result;
    assert_eq!(result.nodes, vec!["ECU1", "ECU2"]);
    assert_eq!(result.messages.added.len(), 1);
    assert_eq!(result.messages.added[0].frame_id, 200);
    assert_eq!(result.messages.changed.len(), 1);
    assert_eq!(result.messages.changed[0].diffs.fields(), vec!["signals"]);

    assert_eq!(result.signals.removed.len(), 1);
    assert_eq!(result.signals.removed[0].signal_name, "rpm");
    assert_eq!(result.signals.changed.len(), 1);
    let scale = result.signals.changed[0].diffs.get("scale").unwrap();
    assert_eq!(scale.old, FieldValue::Float(0.1));
    assert_eq!(scale.new, FieldValue::Float(0.01));
}

#[test]
fn first_snapshot_and_broken_file() {
    init_logging();
    let (_root, request) = setup();

    write_dbc(
        &request.current_dir,
        "body.dbc",
        r#"
BO_ 300 Lights: 1 ECU1
 SG_ head : 0|1@1+ (1,0) [0|1] "" ECU2
"#,
    );
    fs::write(request.current_dir.join("broken.dbc"), "this is not a DBC file").unwrap();
    write_dbc(&request.baseline_dir, "gone.dbc", "");

    let engine = DiffEngine::new(DiffConfig::default());
    let report = compare_directories(&request, &DbcLoader, &engine).unwrap();

    assert_eq!(report.added_files, vec!["body.dbc", "broken.dbc"]);
    assert_eq!(report.removed_files, vec!["gone.dbc"]);
    assert_eq!(report.files.len(), 1);
    assert_eq!(report.files[0].result.messages.added.len(), 1);
    assert_eq!(report.files[0].result.signals.added.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].file_name, "broken.dbc");
}
