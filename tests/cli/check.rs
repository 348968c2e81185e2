use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::{CliTest, MAIN_CS, run, sample_dump};

#[test]
fn test_check_reports_issues() -> Result<()> {
    let test = CliTest::sample()?;

    // Label text, dimension literal and empty catch, in source order.
    assert_cmd_snapshot!(test.check_command());

    Ok(())
}

#[test]
fn test_check_no_issues() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("Main.cs", "var s = \"plain\";\n")?;
    test.write_file(
        "App.cmodel.json",
        r#"{ "documents": [{ "id": "Main.cs", "path": "Main.cs" }] }"#,
    )?;

    assert_cmd_snapshot!(test.check_command());

    Ok(())
}

#[test]
fn test_check_selected_rules() -> Result<()> {
    let test = CliTest::sample()?;

    assert_cmd_snapshot!(test.check_command().arg("MD0010"));

    Ok(())
}

#[test]
fn test_check_info_only_exits_zero() -> Result<()> {
    let test = CliTest::sample()?;

    assert_cmd_snapshot!(test.check_command().arg("MD0007"));

    Ok(())
}

#[test]
fn test_check_config_overrides() -> Result<()> {
    let test = CliTest::sample()?;
    test.write_file(
        ".catalintrc.json",
        r#"{
            "ignoreTexts": ["Hello"],
            "rules": { "MD0010": { "severity": "warning" } }
        }"#,
    )?;

    // No error left, so the run succeeds.
    assert_cmd_snapshot!(test.check_command());

    Ok(())
}

#[test]
fn test_check_ignored_documents() -> Result<()> {
    let test = CliTest::sample()?;
    test.write_file(".catalintrc.json", r#"{ "ignores": ["Main.*"] }"#)?;

    assert_cmd_snapshot!(test.check_command());

    Ok(())
}

#[test]
fn test_check_json_format() -> Result<()> {
    let test = CliTest::sample()?;

    let output = run(test.check_command().args(["--format", "json"]))?;

    assert_eq!(output.code, Some(1));
    let value: Value = serde_json::from_str(&output.stdout)?;
    assert_eq!(value["errors"], 2);
    assert_eq!(value["infos"], 1);
    assert_eq!(value["compilations"], 1);

    let first = &value["issues"][0];
    assert_eq!(first["rule"], "MD0005");
    assert_eq!(first["severity"], "error");
    assert_eq!(first["line"], 3);
    assert_eq!(first["col"], 22);
    assert_eq!(first["payload"]["kind"], "localize");

    Ok(())
}

#[test]
fn test_check_source_root() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("project/Main.cs", MAIN_CS)?;
    test.write_file(
        "project/App.cmodel.json",
        &sample_dump(MAIN_CS).to_string(),
    )?;

    assert_cmd_snapshot!(test.check_command().args(["--source-root", "project"]));

    Ok(())
}

#[test]
fn test_check_unreadable_dump() -> Result<()> {
    let test = CliTest::sample()?;
    test.write_file("Broken.cmodel.json", "{ not json")?;

    // stderr also carries a timestamped log line, so only parts are checked.
    let output = run(&mut test.check_command())?;

    assert_eq!(output.code, Some(2));
    assert!(output.stdout.contains("MD0010"));
    assert!(output.stderr.contains("1 compilation dump(s) could not be loaded"));

    Ok(())
}

#[test]
fn test_check_invalid_config() -> Result<()> {
    let test = CliTest::sample()?;
    test.write_file(".catalintrc.json", r#"{ "rules": { "MD0042": {} } }"#)?;

    let output = run(&mut test.check_command())?;

    assert_eq!(output.code, Some(2));
    assert!(output.stderr.contains("Unknown rule id"));
    assert!(output.stderr.contains("MD0042"));

    Ok(())
}

#[test]
fn test_check_unknown_rule_argument() -> Result<()> {
    let test = CliTest::sample()?;

    let output = run(test.check_command().arg("MD0042"))?;

    assert_eq!(output.code, Some(2));
    assert!(output.stderr.contains("unknown rule id 'MD0042'"));

    Ok(())
}
