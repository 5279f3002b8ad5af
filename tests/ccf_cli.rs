use std::error::Error;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_fs::prelude::*;
use predicates::prelude::*;

type TestResult = Result<(), Box<dyn Error>>;

const COMMENTED_JAVA: &str = "package demo;

/** Entry point.
 */
public class Main {
    public static void main(String[] args) {
        run(); /* inline */ stop();
    }
}
";

#[test]
fn strips_block_comments_and_prints_headers() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    let src_dir = temp.child("src");
    src_dir.create_dir_all()?;
    src_dir.child("Main.java").write_str(COMMENTED_JAVA)?;
    src_dir
        .child("notes.txt")
        .write_str("/* this should not appear */\n")?;

    let mut cmd = cargo_bin_cmd!("ccf");
    cmd.current_dir(&temp)
        .arg("-t")
        .arg("java")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "========== FILE: src/Main.java ==========",
        ))
        .stdout(predicate::str::contains("package demo;\n\npublic class Main {"))
        .stdout(predicate::str::contains("run();  stop();"))
        .stdout(predicate::str::contains("Entry point").not())
        .stdout(predicate::str::contains("notes.txt").not());

    Ok(())
}

#[test]
fn default_types_cover_c_style_sources() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    temp.child("lib.rs").write_str("// doc\nfn main() {}\n")?;
    temp.child("script.py").write_str("# not c-style\n")?;

    let mut cmd = cargo_bin_cmd!("ccf");
    cmd.current_dir(&temp)
        .assert()
        .success()
        .stdout(predicate::str::contains("FILE: lib.rs"))
        .stdout(predicate::str::contains("fn main() {}"))
        .stdout(predicate::str::contains("// doc").not())
        .stdout(predicate::str::contains("script.py").not());

    Ok(())
}

#[test]
fn respects_gitignore_by_default() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    temp.child(".gitignore").write_str("Ignored.java\n")?;
    temp.child("Included.java").write_str("class Included {}\n")?;
    temp.child("Ignored.java").write_str("class Ignored {}\n")?;

    let mut cmd = cargo_bin_cmd!("ccf");
    cmd.current_dir(&temp)
        .arg("-t")
        .arg("java")
        .assert()
        .success()
        .stdout(predicate::str::contains("Included.java"))
        .stdout(predicate::str::contains("Ignored.java").not());

    Ok(())
}

#[test]
fn exclude_glob_skips_matching_paths() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    let src = temp.child("src");
    let generated = temp.child("generated");
    src.create_dir_all()?;
    generated.create_dir_all()?;
    src.child("a.ts").write_str("let a = 1;\n")?;
    generated.child("b.ts").write_str("let b = 2;\n")?;

    let mut cmd = cargo_bin_cmd!("ccf");
    cmd.current_dir(&temp)
        .arg("-t")
        .arg("ts")
        .arg("--exclude")
        .arg("generated/**")
        .assert()
        .success()
        .stdout(predicate::str::contains("src/a.ts"))
        .stdout(predicate::str::contains("generated/b.ts").not());

    Ok(())
}

#[test]
fn max_bytes_skips_large_files_and_logs_to_stderr() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    temp.child("big.c").write_str(&"int x;\n".repeat(20))?;

    let mut cmd = cargo_bin_cmd!("ccf");
    cmd.current_dir(&temp)
        .arg("-t")
        .arg("c")
        .arg("--max-bytes")
        .arg("50")
        .assert()
        .success()
        .stdout(predicate::str::contains("big.c").not())
        .stderr(predicate::str::contains("Skipping big.c"));

    Ok(())
}

#[test]
fn json_output_reports_comments() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    temp.child("main.go").write_str("x := 1 // one\n")?;

    let mut cmd = cargo_bin_cmd!("ccf");
    cmd.current_dir(&temp)
        .arg("-t")
        .arg("go")
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "[\n{\"path\":\"main.go\",\"file_name\":\"main.go\",\"had_comments\":true,\"content\":\"x := 1\\n\"}\n]",
        ));

    Ok(())
}

#[test]
fn only_commented_hides_clean_files() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    temp.child("clean.js").write_str("let a = 1;\n")?;
    temp.child("noisy.js").write_str("/* hi */\nlet b = 2;\n")?;

    let mut cmd = cargo_bin_cmd!("ccf");
    cmd.current_dir(&temp)
        .arg("-t")
        .arg("js")
        .arg("--only-commented")
        .assert()
        .success()
        .stdout(predicate::str::contains("FILE: noisy.js"))
        .stdout(predicate::str::contains("let b = 2;"))
        .stdout(predicate::str::contains("clean.js").not());

    Ok(())
}

#[test]
fn check_lists_commented_files_and_fails() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    temp.child("clean.kt").write_str("val a = 1\n")?;
    temp.child("noisy.kt").write_str("val b = 2 // two\n")?;

    let mut cmd = cargo_bin_cmd!("ccf");
    cmd.current_dir(&temp)
        .arg("-t")
        .arg("kt")
        .arg("--check")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("noisy.kt"))
        .stdout(predicate::str::contains("clean.kt").not())
        .stdout(predicate::str::contains("FILE:").not());

    Ok(())
}

#[test]
fn check_passes_without_comments() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    temp.child("clean.kt").write_str("val a = 1\n")?;

    let mut cmd = cargo_bin_cmd!("ccf");
    cmd.current_dir(&temp)
        .arg("-t")
        .arg("kt")
        .arg("--check")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    Ok(())
}

#[test]
fn stdin_is_filtered_to_stdout() -> TestResult {
    let mut cmd = cargo_bin_cmd!("ccf");
    cmd.arg("-")
        .write_stdin("// header\nclass C {}")
        .assert()
        .success()
        .stdout("class C {}");

    Ok(())
}

#[test]
fn verbose_reports_summary_on_stderr() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    temp.child("a.h").write_str("int a; /* x */\n")?;
    temp.child("b.h").write_str("int b;\n")?;

    let mut cmd = cargo_bin_cmd!("ccf");
    cmd.current_dir(&temp)
        .arg("-t")
        .arg("h")
        .arg("--verbose")
        .assert()
        .success()
        .stderr(predicate::str::contains("a.h: comments removed"))
        .stderr(predicate::str::contains("b.h: no comments"))
        .stderr(predicate::str::contains(
            "Filtered 2 file(s), 1 had comments",
        ));

    Ok(())
}

#[test]
fn missing_root_is_an_error() -> TestResult {
    let temp = assert_fs::TempDir::new()?;

    let mut cmd = cargo_bin_cmd!("ccf");
    cmd.current_dir(&temp)
        .arg("does-not-exist")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Skipping root"));

    Ok(())
}

#[test]
fn stdin_json_is_a_single_entry() -> TestResult {
    let mut cmd = cargo_bin_cmd!("ccf");
    cmd.arg("--json")
        .arg("-")
        .write_stdin("a(); // c\n")
        .assert()
        .success()
        .stdout(
            "[\n{\"path\":\"-\",\"file_name\":\"-\",\"had_comments\":true,\"content\":\"a();\\n\"}\n]\n",
        );

    Ok(())
}

#[test]
fn stdin_json_joins_with_files() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    temp.child("A.java").write_str("class A {}\n")?;

    let mut cmd = cargo_bin_cmd!("ccf");
    cmd.current_dir(&temp)
        .arg("--json")
        .arg("-")
        .arg(".")
        .write_stdin("b(); // c\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "\"content\":\"b();\\n\"},\n{\"path\":\"A.java\"",
        ));

    Ok(())
}

#[test]
fn stdin_check_prints_only_the_dash() -> TestResult {
    let mut cmd = cargo_bin_cmd!("ccf");
    cmd.arg("--check")
        .arg("-")
        .write_stdin("a(); // c\n")
        .assert()
        .code(1)
        .stdout("-\n");

    Ok(())
}

#[test]
fn stdin_only_commented_suppresses_clean_input() -> TestResult {
    let mut cmd = cargo_bin_cmd!("ccf");
    cmd.arg("--only-commented")
        .arg("-")
        .write_stdin("a();\n")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    Ok(())
}
