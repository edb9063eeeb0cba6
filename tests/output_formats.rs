use std::io::Write;
use std::process::{Command, Stdio};

fn sciname() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sciname"));
    cmd.env("NO_COLOR", "1").env_remove("CLICOLOR_FORCE");
    cmd
}

#[test]
fn pretty_json_is_indented() {
    let out = sciname()
        .args(["--pretty", "Homo sapiens L."])
        .output()
        .expect("run pretty");
    assert!(out.status.success());
    let s = String::from_utf8_lossy(&out.stdout);
    assert!(s.trim_start().starts_with('{'));
    assert!(s.lines().count() > 10);
    assert!(s.contains("\n  \"verbatim\": \"Homo sapiens L.\""));
    let v: serde_json::Value = serde_json::from_str(&s).unwrap();
    assert_eq!(v["quality"], 1);
}

#[test]
fn csv_has_header_and_rows() {
    let out = sciname()
        .args(["--csv", "Homo sapiens L.", "Aus bus Smith, 1900"])
        .output()
        .expect("run csv");
    assert!(out.status.success());
    let s = String::from_utf8_lossy(&out.stdout);
    let mut rdr = csv::Reader::from_reader(s.as_bytes());
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        ["id", "verbatim", "canonical", "canonical_ranked", "authorship", "year", "quality"]
    );
    let rows: Vec<csv::StringRecord> = rdr.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][1], "Homo sapiens L.");
    assert_eq!(&rows[1][1], "Aus bus Smith, 1900");
    assert_eq!(&rows[1][4], "Smith 1900");
    assert_eq!(&rows[1][5], "1900");
}

#[test]
fn table_without_colors() {
    let out = sciname()
        .args(["--table", "Homo sapiens L.", "Tobacco mosaic virus"])
        .output()
        .expect("run table");
    assert!(out.status.success());
    let s = String::from_utf8_lossy(&out.stdout);
    assert!(!s.contains('\x1b'));
    assert!(s.lines().next().unwrap().starts_with("Verbatim"));
    assert!(s.contains("Parsed 1 of 2 names, 0 with warnings"));
}

#[test]
fn output_flags_are_exclusive() {
    let out = sciname()
        .args(["--csv", "--table", "Homo sapiens"])
        .output()
        .expect("run");
    assert!(!out.status.success());
}

#[test]
fn reads_names_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("names.txt");
    std::fs::write(&path, "Homo sapiens L.\r\n\nSalix ×rubens Schrank\n").unwrap();

    for extra in [&["--no-mmap"][..], &["--mmap-large", "0"][..]] {
        let out = sciname()
            .arg("--input")
            .arg(&path)
            .args(extra)
            .output()
            .expect("run with input");
        assert!(out.status.success());
        let s = String::from_utf8_lossy(&out.stdout);
        let docs: Vec<serde_json::Value> =
            s.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0]["verbatim"], "Homo sapiens L.");
        assert_eq!(docs[1]["hybrid"], "named_hybrid");
    }
}

#[test]
fn reads_names_from_stdin() {
    let mut child = sciname()
        .args(["--input", "-", "--csv"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"Poaceae Barnhart\nAus sp.\n")
        .unwrap();
    let out = child.wait_with_output().unwrap();
    assert!(out.status.success());
    let s = String::from_utf8_lossy(&out.stdout);
    assert_eq!(s.lines().count(), 3);
    assert!(s.contains(",Poaceae Barnhart,Poaceae,Poaceae,Barnhart,,1"));
}

#[test]
fn threads_and_progress_keep_order() {
    let names: Vec<String> = (0..200).map(|i| format!("Aus bus{} Smith", "a".repeat(i % 7))).collect();
    let out = sciname()
        .args(["--threads", "4", "--progress", "--csv"])
        .args(&names)
        .output()
        .expect("run");
    assert!(out.status.success());
    let s = String::from_utf8_lossy(&out.stdout);
    let mut rdr = csv::Reader::from_reader(s.as_bytes());
    let verbatims: Vec<String> = rdr
        .records()
        .map(|r| r.unwrap()[1].to_string())
        .collect();
    assert_eq!(verbatims, names);
}
