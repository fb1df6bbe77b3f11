use std::env;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;
use zip::CompressionMethod;
use zip::write::{FileOptions, ZipWriter};

const CHROME_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const FIREFOX_MAC_UA: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.14; rv:69.0) Gecko/20100101 Firefox/69.0";
const FIREFOX_ANDROID_UA: &str =
    "Mozilla/5.0 (Android 10; Mobile; rv:79.0) Gecko/79.0 Firefox/79.0";
const FIREFOX_IOS_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 8_3 like Mac OS X) AppleWebKit/600.1.4 (KHTML, like Gecko) FxiOS/1.0 Mobile/12F69 Safari/600.1.4";

struct CommandResult {
    code: Option<i32>,
    stdout: String,
    output: String,
}

impl CommandResult {
    fn success(&self) -> bool {
        self.code == Some(0)
    }
}

fn run_command(args: &[&str], test_dir: &str) -> CommandResult {
    // Use cargo run which will build if needed
    // Set AMO_COMPAT_DIR in the environment for the subprocess
    let output = Command::new("cargo")
        .args(["run", "--quiet", "--"])
        .args(args)
        .env("AMO_COMPAT_DIR", test_dir)
        .env_remove("RUST_LOG")
        .current_dir(env::current_dir().unwrap())
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8(output.stdout).unwrap_or_default();
    let stderr = String::from_utf8(output.stderr).unwrap_or_default();

    // Filter out cargo compilation messages from stderr
    let filtered_stderr: String = stderr
        .lines()
        .filter(|line| {
            !line.contains("Compiling")
                && !line.contains("Finished")
                && !line.contains("warning:")
                && !line.contains("note:")
        })
        .collect::<Vec<_>>()
        .join("\n");

    // Combine stdout and filtered stderr for checking messages
    let combined_output = if stdout.is_empty() {
        filtered_stderr.clone()
    } else if filtered_stderr.is_empty() {
        stdout.clone()
    } else {
        format!("{}\n{}", stdout, filtered_stderr)
    };

    CommandResult {
        code: output.status.code(),
        stdout,
        output: combined_output,
    }
}

fn run_json(args: &[&str], test_dir: &str) -> (Option<i32>, serde_json::Value) {
    let result = run_command(args, test_dir);
    let value = serde_json::from_str(&result.stdout).unwrap_or_else(|e| {
        panic!("Expected JSON on stdout ({}): {}", e, result.output);
    });
    (result.code, value)
}

fn setup_test_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

fn write_addon_json(dir: &str, name: &str, json: &str) -> String {
    let path = format!("{}/{}", dir, name);
    fs::write(&path, json).expect("Failed to write add-on JSON");
    path
}

fn sample_addon_json() -> &'static str {
    r#"{
        "guid": "tabs@example.com",
        "slug": "tab-tidy",
        "name": {"en-US": "Tab Tidy"},
        "type": "extension",
        "promoted": {"category": "recommended", "apps": ["firefox"]},
        "current_version": {
            "version": "2.4.0",
            "compatibility": {"firefox": {"min": "48.0", "max": "*"}},
            "files": [{
                "platform": "all",
                "url": "https://addons.example.com/files/tab-tidy-2.4.0.xpi",
                "hash": "sha256:0000",
                "is_webextension": true,
                "is_mozilla_signed_extension": false,
                "is_restart_required": false
            }],
            "is_strict_compatibility_enabled": false
        }
    }"#
}

/// Create a test .xpi with the given entries
fn create_test_xpi(path: &Path, entries: &[(&str, &str)]) {
    let file = fs::File::create(path).expect("Failed to create xpi file");
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::<()>::default().compression_method(CompressionMethod::Stored);

    for (name, contents) in entries {
        zip.start_file(*name, options)
            .expect("Failed to start zip entry");
        zip.write_all(contents.as_bytes())
            .expect("Failed to write zip entry");
    }
    zip.finish().expect("Failed to finish zip");
}

fn webextension_manifest() -> &'static str {
    r#"{
        "manifest_version": 2,
        "name": "Page Notes",
        "version": "1.3",
        "browser_specific_settings": {"gecko": {"id": "notes@example.com", "strict_min_version": "60.0"}}
    }"#
}

fn legacy_install_rdf() -> &'static str {
    r#"<?xml version="1.0"?>
<RDF xmlns="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:em="http://www.mozilla.org/2004/em-rdf#">
  <Description about="urn:mozilla:install-manifest">
    <em:id>legacy@example.com</em:id>
    <em:version>0.5</em:version>
    <em:targetApplication>
      <Description>
        <em:id>{ec8030f7-c20a-464f-9b0e-13a3a9e97384}</em:id>
        <em:minVersion>38.0</em:minVersion>
        <em:maxVersion>56.*</em:maxVersion>
      </Description>
    </em:targetApplication>
  </Description>
</RDF>"#
}

#[test]
fn test_init_creates_settings() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();

    let result = run_command(&["init"], test_dir);

    assert!(result.success(), "Init should succeed. output: {}", result.output);
    assert!(
        result.output.contains("Initialized"),
        "Expected 'Initialized' in output: {}",
        result.output
    );

    let settings_path = format!("{}/amo-compat.toml", test_dir);
    assert!(
        Path::new(&settings_path).exists(),
        "Settings file should be created"
    );

    let content = fs::read_to_string(&settings_path).unwrap();
    assert!(content.contains("client_app = \"firefox\""));
    assert!(content.contains("lang = \"en-US\""));
    assert!(content.contains("show_pages = 7"));
}

#[test]
fn test_init_skips_if_exists() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();

    assert!(run_command(&["init"], test_dir).success());

    let result = run_command(&["init"], test_dir);
    assert!(result.success(), "Second init should succeed: {}", result.output);
    assert!(
        result.output.contains("Skipping"),
        "Expected 'Skipping' in output: {}",
        result.output
    );
}

#[test]
fn test_check_compatible_addon_from_file() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();
    let addon = write_addon_json(test_dir, "addon.json", sample_addon_json());

    let result = run_command(&["check", &addon, "--source", "file"], test_dir);

    assert!(result.success(), "Check should succeed: {}", result.output);
    assert!(
        result.output.contains("Tab Tidy is compatible"),
        "Expected compatibility message: {}",
        result.output
    );
    assert!(
        result
            .output
            .contains("https://addons.example.com/files/tab-tidy-2.4.0.xpi"),
        "Expected install URL: {}",
        result.output
    );
}

#[test]
fn test_check_incompatible_exits_with_one() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();
    let addon = write_addon_json(test_dir, "addon.json", sample_addon_json());

    let result = run_command(
        &["check", &addon, "--source", "file", "--user-agent", CHROME_UA],
        test_dir,
    );

    assert_eq!(result.code, Some(1), "Expected exit code 1: {}", result.output);
    assert!(
        result.output.contains("NOT_FIREFOX"),
        "Expected NOT_FIREFOX reason: {}",
        result.output
    );
}

#[test]
fn test_check_json_output() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();
    let addon = write_addon_json(test_dir, "addon.json", sample_addon_json());

    let (code, value) = run_json(
        &[
            "check",
            &addon,
            "--source",
            "file",
            "--src",
            "featured",
            "--json",
        ],
        test_dir,
    );

    assert_eq!(code, Some(0));
    assert_eq!(value["schema_version"], 1);
    assert_eq!(value["addon"]["guid"], "tabs@example.com");
    assert_eq!(value["compatible"], true);
    assert!(value["reason"].is_null());
    assert_eq!(value["min_version"], "48.0");
    assert_eq!(value["quantum_compatible"], true);
    assert_eq!(value["android_installable"], false);
    assert_eq!(
        value["install_url"],
        "https://addons.example.com/files/tab-tidy-2.4.0.xpi?src=featured"
    );
}

#[test]
fn test_check_uses_install_source_from_settings() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();
    fs::write(
        format!("{}/amo-compat.toml", test_dir),
        "install_source = \"homepage\"\n",
    )
    .unwrap();
    let addon = write_addon_json(test_dir, "addon.json", sample_addon_json());

    let (_, value) = run_json(&["check", &addon, "--source", "file", "--json"], test_dir);
    assert_eq!(
        value["install_url"],
        "https://addons.example.com/files/tab-tidy-2.4.0.xpi?src=homepage"
    );
}

#[test]
fn test_check_android_not_installable() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();
    let addon = write_addon_json(test_dir, "addon.json", sample_addon_json());

    let (code, value) = run_json(
        &[
            "check",
            &addon,
            "--source",
            "file",
            "--client-app",
            "android",
            "--user-agent",
            FIREFOX_ANDROID_UA,
            "--json",
        ],
        test_dir,
    );

    assert_eq!(code, Some(1));
    assert_eq!(value["client_app"], "android");
    assert_eq!(value["reason"], "ANDROID_UNSUPPORTED");
}

#[test]
fn test_check_firefox_for_ios() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();
    let addon = write_addon_json(test_dir, "addon.json", sample_addon_json());

    let (code, value) = run_json(
        &[
            "check",
            &addon,
            "--source",
            "file",
            "--user-agent",
            FIREFOX_IOS_UA,
            "--json",
        ],
        test_dir,
    );

    assert_eq!(code, Some(1));
    assert_eq!(value["reason"], "FIREFOX_FOR_IOS");
}

#[test]
fn test_check_webextension_package() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();
    let xpi = temp_dir.path().join("page-notes.xpi");
    create_test_xpi(&xpi, &[("manifest.json", webextension_manifest())]);

    let (code, value) = run_json(
        &[
            "check",
            xpi.to_str().unwrap(),
            "--source",
            "xpi",
            "--json",
        ],
        test_dir,
    );

    assert_eq!(code, Some(0));
    assert_eq!(value["addon"]["guid"], "notes@example.com");
    assert_eq!(value["addon"]["version"], "1.3");
    assert_eq!(value["min_version"], "60.0");
    assert_eq!(value["max_version"], "*");
}

#[test]
fn test_check_legacy_package_is_non_restartless() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();
    let xpi = temp_dir.path().join("legacy.xpi");
    create_test_xpi(&xpi, &[("install.rdf", legacy_install_rdf())]);

    let (code, value) = run_json(
        &["check", xpi.to_str().unwrap(), "--source", "xpi", "--json"],
        test_dir,
    );

    assert_eq!(code, Some(1));
    assert_eq!(value["reason"], "NON_RESTARTLESS_ADDON");
    assert_eq!(value["quantum_compatible"], false);
}

#[test]
fn test_check_fails_with_unknown_source() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();

    let result = run_command(&["check", "some-addon", "--source", "modrinth"], test_dir);

    assert!(!result.success());
    assert!(
        result.output.contains("Unsupported source: 'modrinth'"),
        "Expected unsupported source error: {}",
        result.output
    );
}

#[test]
fn test_check_fails_with_missing_file() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();

    let result = run_command(
        &["check", "/no/such/addon.json", "--source", "file"],
        test_dir,
    );

    assert!(!result.success());
    assert!(
        result.output.contains("File not found"),
        "Expected missing file error: {}",
        result.output
    );
}

#[test]
fn test_check_rejects_unknown_client_app() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();
    let addon = write_addon_json(test_dir, "addon.json", sample_addon_json());

    let result = run_command(
        &["check", &addon, "--source", "file", "--client-app", "thunderbird"],
        test_dir,
    );

    assert!(!result.success());
    assert!(result.output.contains("Unsupported client app"));
}

#[test]
fn test_redirect_desktop_from_android_page() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();

    let result = run_command(
        &[
            "redirect",
            "/en-US/android/addon/awesome-android-extension/",
            "--search",
            "?src=featured",
            "--user-agent",
            FIREFOX_MAC_UA,
        ],
        test_dir,
    );

    assert!(result.success(), "Redirect should succeed: {}", result.output);
    assert_eq!(
        result.stdout.trim(),
        "/en-US/firefox/addon/awesome-android-extension/?src=featured"
    );
}

#[test]
fn test_redirect_android_to_mobile_homepage() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();

    let result = run_command(
        &[
            "redirect",
            "/fr/firefox/addon/some-addon/",
            "--lang",
            "fr",
            "--user-agent",
            FIREFOX_ANDROID_UA,
        ],
        test_dir,
    );

    assert!(result.success(), "Redirect should succeed: {}", result.output);
    assert_eq!(result.stdout.trim(), "/fr/android/");
}

#[test]
fn test_redirect_none_needed() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();

    let result = run_command(
        &["redirect", "/en-US/firefox/", "--user-agent", FIREFOX_MAC_UA],
        test_dir,
    );

    assert_eq!(result.code, Some(1), "Expected exit code 1: {}", result.output);
    assert!(result.output.contains("No redirect needed"));
}

#[test]
fn test_pages_window() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();

    let result = run_command(
        &["pages", "--page-count", "30", "--current", "15"],
        test_dir,
    );

    assert!(result.success(), "Pages should succeed: {}", result.output);
    assert_eq!(result.stdout.trim(), "12 13 14 [15] 16 17 18");
}

#[test]
fn test_pages_json_from_count() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();

    let (code, value) = run_json(
        &[
            "pages",
            "--count",
            "95",
            "--per-page",
            "25",
            "--current",
            "abc",
            "--json",
        ],
        test_dir,
    );

    assert_eq!(code, Some(0));
    assert_eq!(value["page_count"], 4);
    assert_eq!(value["current_page"], 1);
    assert_eq!(value["pages"], serde_json::json!([1, 2, 3, 4]));
}

#[test]
fn test_pages_requires_a_count() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();

    let result = run_command(&["pages"], test_dir);
    assert!(!result.success());
}

#[test]
fn test_ua_json() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();

    let (code, value) = run_json(&["ua", FIREFOX_ANDROID_UA, "--json"], test_dir);

    assert_eq!(code, Some(0));
    assert_eq!(value["browser"]["name"], "Mobile Firefox");
    assert_eq!(value["browser"]["version"], "79.0");
    assert_eq!(value["os"]["name"], "Android");
    assert_eq!(value["is_firefox"], true);
    assert_eq!(value["is_firefox_for_android"], true);
    assert_eq!(value["is_firefox_for_ios"], false);
}

#[test]
fn test_fetch_package_into_download_dir() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();
    let xpi = temp_dir.path().join("page-notes.xpi");
    create_test_xpi(&xpi, &[("manifest.json", webextension_manifest())]);

    let result = run_command(
        &["fetch", xpi.to_str().unwrap(), "--source", "xpi"],
        test_dir,
    );

    assert!(result.success(), "Fetch should succeed: {}", result.output);
    assert!(
        result.output.contains("verified"),
        "Expected verified download: {}",
        result.output
    );

    let saved = temp_dir.path().join("downloads").join("page-notes.xpi");
    assert!(saved.exists(), "Package should be saved to downloads/");
    assert_eq!(fs::read(&saved).unwrap(), fs::read(&xpi).unwrap());
}

#[test]
fn test_fetch_refuses_incompatible_addon() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();
    let xpi = temp_dir.path().join("legacy.xpi");
    create_test_xpi(&xpi, &[("install.rdf", legacy_install_rdf())]);
    let out_dir = temp_dir.path().join("out");

    let result = run_command(
        &[
            "fetch",
            xpi.to_str().unwrap(),
            "--source",
            "xpi",
            "--out",
            out_dir.to_str().unwrap(),
        ],
        test_dir,
    );

    assert!(!result.success());
    assert!(
        result.output.contains("is not compatible"),
        "Expected incompatibility error: {}",
        result.output
    );
    assert!(!out_dir.exists(), "Nothing should be written");
}
