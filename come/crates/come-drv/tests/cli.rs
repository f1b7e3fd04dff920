//! End-to-end CLI scenarios (spec §8), driven through the `come` binary
//! via `assert_cmd` rather than the library API directly. `genc`-then-
//! inspect-C-text, since the test environment has no guaranteed host C
//! runtime library to link and run a `build` output against.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn come() -> Command {
    Command::cargo_bin("come").unwrap()
}

#[test]
fn genc_hello_world_emits_printf_call() {
    let dir = tempdir().unwrap();
    let main_co = dir.path().join("main.co");
    fs::write(&main_co, "main() { printf(\"hello, world\\n\"); }").unwrap();
    let out_c = dir.path().join("main.c");

    come()
        .arg("genc")
        .arg(&main_co)
        .arg("-o")
        .arg(&out_c)
        .assert()
        .success();

    let generated = fs::read_to_string(&out_c).unwrap();
    assert!(generated.contains("printf("));
    assert!(generated.contains("come_main__main"));
    assert!(generated.contains("int main(int argc, char** argv)"));
}

#[test]
fn genc_struct_method_mangles_receiver_call() {
    let dir = tempdir().unwrap();
    let main_co = dir.path().join("main.co");
    fs::write(
        &main_co,
        "struct Rect { int w; int h; } \
         int Rect.area() { return self.w; } \
         main() { }",
    )
    .unwrap();
    let out_c = dir.path().join("main.c");

    come()
        .arg("genc")
        .arg(&main_co)
        .arg("-o")
        .arg(&out_c)
        .assert()
        .success();

    let generated = fs::read_to_string(&out_c).unwrap();
    assert!(generated.contains("come_main__Rect__area"));
    assert!(generated.contains("typedef struct Rect Rect;"));
}

#[test]
fn genc_with_import_emits_both_modules_init_chain() {
    let dir = tempdir().unwrap();
    let helper_co = dir.path().join("helper.co");
    fs::write(&helper_co, "module helper\n").unwrap();
    let main_co = dir.path().join("main.co");
    fs::write(&main_co, "import helper\nmain() { }").unwrap();
    let out_c = dir.path().join("main.c");

    come()
        .arg("genc")
        .arg(&main_co)
        .arg("-o")
        .arg(&out_c)
        .assert()
        .success();

    let main_generated = fs::read_to_string(&out_c).unwrap();
    assert!(main_generated.contains("extern void come_helper__init(void);"));
    assert!(main_generated.contains("come_helper__init();"));

    let helper_generated = fs::read_to_string(dir.path().join("helper.c")).unwrap();
    assert!(helper_generated.contains("come_helper__init"));
}

#[test]
fn missing_input_file_reports_error_and_exits_nonzero() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.co");

    come()
        .arg("genc")
        .arg(&missing)
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn directory_input_resolves_to_main_co() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("main.co"), "main() { }").unwrap();
    let out_c = dir.path().join("out.c");

    come()
        .arg("genc")
        .arg(dir.path())
        .arg("-o")
        .arg(&out_c)
        .assert()
        .success();

    assert!(out_c.exists());
}
