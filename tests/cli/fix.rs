use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::{CliTest, MAIN_CS, sample_dump};

#[test]
fn test_fix_dry_run_leaves_files_unchanged() -> Result<()> {
    let test = CliTest::sample()?;

    assert_cmd_snapshot!(test.fix_command());
    assert_eq!(test.read_file("Main.cs")?, MAIN_CS);

    Ok(())
}

#[test]
fn test_fix_apply_writes_documents() -> Result<()> {
    let test = CliTest::sample()?;

    let mut cmd = test.fix_command();
    cmd.arg("--apply");
    assert_cmd_snapshot!(cmd);

    let expected = MAIN_CS
        .replace("\"Hello\"", "GettextCatalog.GetString (\"Hello\")")
        .replace("\"2x3\"", "\"2\u{d7}3\"");
    assert_eq!(test.read_file("Main.cs")?, expected);

    Ok(())
}

#[test]
fn test_fix_with_chosen_catalog() -> Result<()> {
    let test = CliTest::new()?;
    let mut dump = sample_dump(MAIN_CS);
    dump["types"]
        .as_array_mut()
        .unwrap()
        .push(json!({ "name": "Mono.Addins.AddinLocalizer" }));
    test.write_file("Main.cs", MAIN_CS)?;
    test.write_file("App.cmodel.json", &dump.to_string())?;

    let mut cmd = test.fix_command();
    cmd.args(["--apply", "--catalog", "addins"]);
    assert_cmd_snapshot!(cmd);

    let content = test.read_file("Main.cs")?;
    assert!(
        content.contains("label.Text = AddinManager.CurrentLocalizer.GetString (\"Hello\");"),
        "Expected addin localizer call, got:\n{}",
        content
    );

    Ok(())
}

#[test]
fn test_fix_nothing_to_fix() -> Result<()> {
    let test = CliTest::sample()?;

    // Only the empty catch remains, which has no automatic fix.
    test.write_file(
        ".catalintrc.json",
        r#"{ "rules": { "MD0005": { "enabled": false }, "MD0007": { "enabled": false } } }"#,
    )?;

    assert_cmd_snapshot!(test.fix_command());
    assert_eq!(test.read_file("Main.cs")?, MAIN_CS);

    Ok(())
}

#[test]
fn test_fix_skips_inline_documents() -> Result<()> {
    let test = CliTest::new()?;
    let mut dump = sample_dump(MAIN_CS);
    dump["documents"] = json!([{ "id": "Main.cs", "text": MAIN_CS }]);
    test.write_file("App.cmodel.json", &dump.to_string())?;

    let mut cmd = test.fix_command();
    cmd.arg("--apply");
    assert_cmd_snapshot!(cmd);

    Ok(())
}
