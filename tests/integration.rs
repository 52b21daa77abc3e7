use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const HELLO: &str = "src/main/java/org/eclipse/che/examples/HelloWorld.java";

fn classloc_cmd(fixture: &str) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_classloc"));
    cmd.current_dir(fixture_dir(fixture));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn fixture_dir(fixture: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(fixture)
}

fn hello_uri() -> String {
    url::Url::from_file_path(fixture_dir("helloworld").join(HELLO))
        .unwrap()
        .to_string()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim_end().to_string()
}

fn name_at(line: &str) -> Output {
    classloc_cmd("helloworld")
        .args(["name-at", &hello_uri(), line])
        .output()
        .unwrap()
}

#[test]
fn name_at_field_line_is_top_level_class() {
    let out = name_at("5");
    assert!(out.status.success(), "name-at failed: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(stdout(&out), "org.eclipse.che.examples.HelloWorld");
}

#[test]
fn name_at_local_classes_are_numbered() {
    assert_eq!(stdout(&name_at("10")), "org.eclipse.che.examples.HelloWorld$1LocalClass1");
    assert_eq!(stdout(&name_at("15")), "org.eclipse.che.examples.HelloWorld$2LocalClass2");
}

#[test]
fn name_at_anonymous_class() {
    assert_eq!(stdout(&name_at("21")), "org.eclipse.che.examples.HelloWorld$1");
}

#[test]
fn name_at_package_line_is_not_resolvable() {
    let out = name_at("1");
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Location Not Resolvable"));
}

#[test]
fn name_at_line_past_end_is_malformed() {
    let out = name_at("500");
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn name_at_passes_non_uri_through() {
    let out = classloc_cmd("helloworld")
        .args(["name-at", "org.acme.Already$Binary", "7"])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(stdout(&out), "org.acme.Already$Binary");
}

#[test]
fn name_at_outside_source_roots_passes_through() {
    let uri = url::Url::from_file_path(fixture_dir("helloworld").join("docs/Notes.java"))
        .unwrap()
        .to_string();
    let out = classloc_cmd("helloworld").args(["name-at", &uri, "2"]).output().unwrap();
    assert!(out.status.success());
    assert_eq!(stdout(&out), uri);
}

#[test]
fn location_of_source_class_reports_line_range() {
    let out = classloc_cmd("helloworld")
        .args(["location-of", "org.eclipse.che.examples.HelloWorld$1LocalClass1", "3"])
        .output()
        .unwrap();
    assert!(out.status.success(), "location-of failed: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(stdout(&out), format!("{}:35..60", hello_uri()));
}

#[test]
fn location_of_library_class_as_json() {
    let out = classloc_cmd("helloworld")
        .args(["location-of", "java.lang.String", "42", "--json"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["kind"], "archive");
    assert_eq!(json["library_id"], "org.eclipse.jdt.launching.JRE_CONTAINER");
    assert_eq!(json["member_binary_name"], "java.lang.String");
}

#[test]
fn location_of_unknown_class_exits_not_found() {
    let out = classloc_cmd("helloworld")
        .args(["location-of", "com.nowhere.Missing", "1"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Type Not Found"));
}

#[test]
fn symbols_lists_every_type() {
    let out = classloc_cmd("helloworld").args(["symbols", HELLO]).output().unwrap();
    assert!(out.status.success(), "symbols failed: {}", String::from_utf8_lossy(&out.stderr));
    let text = stdout(&out);
    let names: Vec<&str> = text.lines().filter_map(|l| l.split_whitespace().last()).collect();
    assert_eq!(
        names,
        [
            "org.eclipse.che.examples.HelloWorld",
            "org.eclipse.che.examples.HelloWorld$1LocalClass1",
            "org.eclipse.che.examples.HelloWorld$2LocalClass2",
            "org.eclipse.che.examples.HelloWorld$1",
        ]
    );
}

#[test]
fn types_reports_source_match() {
    let out = classloc_cmd("helloworld")
        .args(["types", "org.eclipse.che.examples.HelloWorld$1"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.starts_with("source  org.eclipse.che.examples.HelloWorld  examples"), "{text}");
}

#[test]
fn missing_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let out = Command::new(env!("CARGO_BIN_EXE_classloc"))
        .current_dir(dir.path())
        .args(["location-of", "a.B", "1"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Config Not Found"));
}
