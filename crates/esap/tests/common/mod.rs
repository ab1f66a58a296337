//! Common helpers for esap CLI tests
#![allow(dead_code)]

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};

/// An isolated HOME so `~/.esap/config.json` never touches the real one
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub data_dir: PathBuf,
}

impl TestEnv {
    pub fn new() -> anyhow::Result<Self> {
        let temp_dir = tempdir()?;
        let data_dir = temp_dir.path().join(".esap");
        Ok(Self { temp_dir, data_dir })
    }

    pub fn config_file(&self) -> PathBuf {
        self.data_dir.join("config.json")
    }

    /// esap with HOME pointed at the temp dir and credential variables cleared
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_esap"));
        cmd.env("HOME", self.temp_dir.path());
        cmd.env_remove("OPENROUTER_API_KEY");
        cmd.env_remove("ESAP_HRMS_TOKEN");
        cmd.env_remove("ESAP_SCM_TOKEN");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    pub fn write_config(&self, config: &serde_json::Value) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::write(self.config_file(), serde_json::to_string_pretty(config)?)?;
        Ok(())
    }

    /// Config with a fake key and HRMS/SCM pointed at `base_url`
    pub fn config_with_services(&self, base_url: &str) -> anyhow::Result<()> {
        self.write_config(&serde_json::json!({
            "agent": {"model": "test/model"},
            "providers": {"openrouter": {"api_key": "sk-or-test"}},
            "services": {
                "hrms": {"base_url": base_url, "api_token": "hrms-token"},
                "scm": {"base_url": base_url},
                "timeout_secs": 5
            }
        }))
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new().expect("Failed to create test environment")
    }
}
