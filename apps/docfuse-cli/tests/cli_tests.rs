use std::fs;
use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;

fn docfuse(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_docfuse"));
    // Keep stray config.toml / APP_* settings out of the run.
    cmd.current_dir(dir.path()).env_remove("RUST_LOG").env("RUST_ENV", "test");
    cmd
}

#[test]
fn split_prints_chunk_records() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("notes.txt");
    fs::write(&file, "aaaaaaaaaa\n\nbbbbbbbbbb\n\ncccccccccc").unwrap();

    let out = docfuse(&tmp)
        .args(["split", file.to_str().unwrap(), "--splitter", "character", "--chunk-size", "20", "--chunk-overlap", "0"])
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let chunks: Value = serde_json::from_slice(&out.stdout).unwrap();
    let chunks = chunks.as_array().unwrap();
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[1]["content"], "bbbbbbbbbb");
    assert_eq!(chunks[1]["chunk_index"], 1);
    assert_eq!(chunks[1]["metadata"]["total_chunks"], 3);
}

#[test]
fn fuse_merges_two_ranked_files() {
    let tmp = TempDir::new().unwrap();
    let semantic = tmp.path().join("semantic.json");
    let keyword = tmp.path().join("keyword.json");
    fs::write(&semantic, r#"[{"id":"A","content":"a","rank":0},{"id":"B","content":"b","rank":1}]"#).unwrap();
    fs::write(&keyword, r#"[{"id":"B","content":"b","rank":0},{"id":"A","content":"a","rank":1}]"#).unwrap();

    let out = docfuse(&tmp)
        .args(["fuse", semantic.to_str().unwrap(), keyword.to_str().unwrap(), "--alpha", "0.5"])
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let fused: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(fused[0]["id"], "A");
    assert_eq!(fused[1]["id"], "B");
    assert_eq!(fused[0]["fused_score"], 0.75);
}

#[test]
fn invalid_overrides_fail() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("notes.txt");
    fs::write(&file, "text").unwrap();
    let out = docfuse(&tmp)
        .args(["split", file.to_str().unwrap(), "--chunk-size", "10", "--chunk-overlap", "10"])
        .output()
        .unwrap();
    assert!(!out.status.success());
}

#[test]
fn query_prints_fused_results_and_context() {
    let tmp = TempDir::new().unwrap();
    let data = tmp.path().join("data");
    fs::create_dir_all(data.join("garden")).unwrap();
    fs::write(data.join("garden/compost.txt"), "Turn the compost heap every week.").unwrap();
    fs::write(data.join("wood.md"), "Split firewood dries faster under cover.").unwrap();

    let out = docfuse(&tmp)
        .args(["query", data.to_str().unwrap(), "compost heap", "--json", "-k", "1"])
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let output: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(output["results"].as_array().unwrap().len(), 1);
    assert_eq!(output["context"], "Turn the compost heap every week.");
    assert_eq!(output["results"][0]["metadata"]["category"], "garden");
}
