use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use anyhow::{Context, Ok, Result};
use insta_cmd::get_cargo_bin;
use serde_json::{Value, json};
use tempfile::TempDir;

mod check;
mod fix;
mod init;

const BIN_NAME: &str = "catalint";

/// Source file used by most tests.
pub const MAIN_CS: &str = r#"class MainWindow : Gtk.Window {
    void Build () {
        label.Text = "Hello";
        var size = "2x3";
        try { Run (); } catch {}
    }
}
"#;

pub struct CliTest {
    _temp_dir: TempDir,
    project_dir: PathBuf,
}

impl CliTest {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().canonicalize()?;
        // Stops config discovery at the project root.
        fs::create_dir(project_dir.join(".git"))?;
        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
        })
    }

    /// A project with `Main.cs` and a dump describing it.
    pub fn sample() -> Result<Self> {
        let test = Self::new()?;
        test.write_file("Main.cs", MAIN_CS)?;
        test.write_file("App.cmodel.json", &sample_dump(MAIN_CS).to_string())?;
        Ok(test)
    }

    pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let file_path = self.project_dir.join(path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory:{}", parent.display()))?;
        }

        fs::write(&file_path, content)
            .with_context(|| format!("Failed to write file: {}", file_path.display()))?;

        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.project_dir
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(get_cargo_bin(BIN_NAME));
        cmd.current_dir(&self.project_dir);
        cmd.env_clear();
        cmd.env("NO_COLOR", "1"); // Disable colors for consistent test output
        cmd
    }

    pub fn check_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("check");
        cmd
    }

    pub fn fix_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("fix");
        cmd
    }

    pub fn read_file(&self, path: &str) -> Result<String> {
        let file_path = self.project_dir.join(path);
        fs::read_to_string(&file_path)
            .with_context(|| format!("Failed to read file: {}", file_path.display()))
    }
}

/// Captured output of a finished command.
pub struct Run {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

pub fn run(cmd: &mut Command) -> Result<Run> {
    let Output {
        status,
        stdout,
        stderr,
    } = cmd.output()?;
    Ok(Run {
        code: status.code(),
        stdout: String::from_utf8(stdout)?,
        stderr: String::from_utf8(stderr)?,
    })
}

/// `[start, len]` of the first occurrence of `needle`.
pub fn span(text: &str, needle: &str) -> Value {
    let start = text
        .find(needle)
        .unwrap_or_else(|| panic!("'{needle}' not in text"));
    json!([start, needle.len()])
}

/// Dump for [`MAIN_CS`]: a label text, a dimension literal and an empty catch.
pub fn sample_dump(text: &str) -> Value {
    json!({
        "name": "Sample",
        "documents": [{ "id": "Main.cs", "path": "Main.cs" }],
        "types": [
            { "name": "Gtk.Widget" },
            { "name": "Gtk.Label", "base": "Gtk.Widget" },
            { "name": "MonoDevelop.Core.GettextCatalog" },
        ],
        "operations": [
            {
                "document": "Main.cs",
                "containingType": "MainWindow",
                "containingMember": "Build",
                "operation": {
                    "kind": "assignment",
                    "property": "Text",
                    "propertyType": "Gtk.Label",
                    "value": { "kind": "literal", "value": "Hello", "span": span(text, "\"Hello\"") },
                    "span": span(text, "label.Text = \"Hello\""),
                },
            },
            {
                "document": "Main.cs",
                "operation": { "kind": "literal", "value": "2x3", "span": span(text, "\"2x3\"") },
            },
            {
                "document": "Main.cs",
                "operation": { "kind": "catchClause", "handlerIsEmpty": true, "span": span(text, "catch {}") },
            },
        ],
    })
}
