use anyhow::{Context, Result};
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::{CliTest, run};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert_eq!(parsed["toolkits"], serde_json::json!(["gtk", "xwt"]));
    assert_eq!(parsed["enDash"], false);
    assert!(parsed.get("ignores").is_some(), "Config should have 'ignores' field");
    assert!(parsed.get("rules").is_some(), "Config should have 'rules' field");

    // 2-space indentation
    assert!(content.contains("\n  \""), "Config should be pretty-printed");

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command().arg("init"));

    assert!(test.root().join(".catalintrc.json").exists());
    assert_config_content(&test.read_file(".catalintrc.json")?)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".catalintrc.json", "{}")?;

    assert_cmd_snapshot!(test.command().arg("init"));

    assert_eq!(test.read_file(".catalintrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::sample()?;

    run(test.command().arg("init"))?;
    assert_cmd_snapshot!(test.check_command());

    Ok(())
}

#[test]
fn test_rules_lists_catalogue() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".catalintrc.json", r#"{ "enDash": true }"#)?;

    // MD0008 is switched on by the config; MD0009 stays off.
    assert_cmd_snapshot!(test.command().arg("rules"));

    Ok(())
}

#[test]
fn test_no_command_prints_help() -> Result<()> {
    let test = CliTest::new()?;

    let output = run(&mut test.command())?;

    assert_eq!(output.code, Some(0));
    assert!(output.stdout.contains("Usage: catalint"));

    Ok(())
}
