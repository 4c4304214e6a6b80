//! Shared helpers for the ngx-link test suites
//!
//! Every run gets its own settings file inside the fixture's temp directory,
//! so tests never read or write `~/.ngx-linker`.

// Not every suite uses every helper
#![allow(dead_code)]

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use ngx_linker::config::Settings;
use ngx_linker::test_utils::LinkFixture;

/// A host project plus an ngx-lib checkout with a private settings file
pub struct TestProject {
    pub fixture: LinkFixture,
    config_path: PathBuf,
}

impl TestProject {
    /// Fixture with default settings (module path unset)
    pub fn new() -> Result<Self> {
        let fixture = LinkFixture::new()?;
        let config_path = fixture.root().join("settings").join("config.toml");
        Ok(Self {
            fixture,
            config_path,
        })
    }

    /// Settings file used by every run
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Host project root
    pub fn host(&self) -> &Path {
        &self.fixture.host
    }

    /// ngx-lib checkout root
    pub fn module(&self) -> &Path {
        &self.fixture.module
    }

    /// Overwrite the settings file
    pub fn write_settings(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.config_path, toml::to_string_pretty(settings)?)?;
        Ok(())
    }

    /// Current settings file contents, parsed
    pub fn read_settings(&self) -> Result<Settings> {
        let content = fs::read_to_string(&self.config_path)
            .with_context(|| format!("reading {}", self.config_path.display()))?;
        Ok(toml::from_str(&content)?)
    }

    /// Settings with the module path pointing at the fixture checkout
    pub fn configure_module(&self) -> Result<Settings> {
        let settings = Settings {
            ngx_module_path: Some(self.fixture.module.clone()),
            ..Settings::default()
        };
        self.write_settings(&settings)?;
        Ok(settings)
    }

    /// Install a shell script standing in for npm and point the settings at it
    ///
    /// The script logs every invocation to `npm-calls.log` in the temp root
    /// and mimics `run build:lib` and both `link` forms on disk.
    #[cfg(unix)]
    pub fn install_fake_npm(&self) -> Result<PathBuf> {
        use std::os::unix::fs::PermissionsExt;

        let root = self.fixture.root();
        let script = root.join("fake-npm.sh");
        let calls = root.join("npm-calls.log");
        let global = &self.fixture.global;
        let body = format!(
            r#"#!/bin/sh
echo "$(pwd)|$*" >> "{calls}"
case "$1" in
  run)
    mkdir -p distribution/ngx-lib
    echo '{{"name": "@vfde-care/ngx-lib"}}' > distribution/ngx-lib/package.json
    ;;
  link)
    if [ -z "$2" ]; then
      mkdir -p "{global}/@vfde-care"
      ln -sfn "$(pwd)" "{global}/@vfde-care/ngx-lib"
    else
      mkdir -p node_modules/@vfde-care
      ln -sfn "{global}/$2" "node_modules/$2"
    fi
    ;;
esac
"#,
            calls = calls.display(),
            global = global.display(),
        );
        fs::write(&script, body)?;
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755))?;

        let settings = Settings {
            ngx_module_path: Some(self.fixture.module.clone()),
            npm_command: script.display().to_string(),
            ..Settings::default()
        };
        self.write_settings(&settings)?;
        Ok(calls)
    }

    /// Run `ngx-link` against the host project
    pub fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        self.run_in(self.host(), args)
    }

    /// Run `ngx-link` from `dir` with the private settings file
    pub fn run_in(&self, dir: &Path, args: &[&str]) -> Result<CommandOutput> {
        let output = Command::new(env!("CARGO_BIN_EXE_ngx-link"))
            .args(args)
            .current_dir(dir)
            .env("NGX_LINKER_CONFIG", &self.config_path)
            .env("NGX_LINKER_NO_PROGRESS", "1")
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .output()
            .context("Failed to run ngx-link")?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        })
    }
}

/// Captured process output
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

impl CommandOutput {
    pub fn assert_success(&self) -> &Self {
        assert!(
            self.success,
            "Command failed with code {:?}\nStdout: {}\nStderr: {}",
            self.code, self.stdout, self.stderr
        );
        self
    }

    pub fn assert_failure(&self) -> &Self {
        assert!(!self.success, "Command unexpectedly succeeded\nStdout: {}", self.stdout);
        self
    }

    pub fn assert_stdout_contains(&self, text: &str) -> &Self {
        assert!(
            self.stdout.contains(text),
            "Expected stdout to contain '{text}'\nActual stdout: {}",
            self.stdout
        );
        self
    }

    pub fn assert_stderr_contains(&self, text: &str) -> &Self {
        assert!(
            self.stderr.contains(text),
            "Expected stderr to contain '{text}'\nActual stderr: {}",
            self.stderr
        );
        self
    }
}
