use crate::error::{OracleError, Result};
use incull_unit::Directive;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Default command template. `{file}` is the unit's root-relative path,
/// `{root}` the project root.
pub const DEFAULT_COMPILE_TEMPLATE: &str = "g++ -Wall -c -o /dev/null {file}";

/// Capability interface over the external build toolchain.
///
/// The engine treats the verdict as a boolean black box: syntax errors,
/// missing symbols and toolchain failures are indistinguishable. The caller
/// materializes the unit on disk before asking; `directives` is the tentative
/// list that was just materialized, which the production oracle ignores
/// because it reads from storage.
pub trait BuildOracle {
    fn try_compile(&mut self, unit: &str, directives: &[Directive]) -> Result<bool>;
}

/// Oracle that runs a rendered command template through the shell with the
/// project root as working directory. The process exit code is the sole
/// success signal.
pub struct CommandOracle {
    root: PathBuf,
    template: String,
}

impl CommandOracle {
    pub fn new(root: impl Into<PathBuf>, template: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            template: template.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn render(&self, unit: &str) -> String {
        self.template
            .replace("{root}", &self.root.to_string_lossy())
            .replace("{file}", unit)
    }
}

impl BuildOracle for CommandOracle {
    fn try_compile(&mut self, unit: &str, _directives: &[Directive]) -> Result<bool> {
        let command = self.render(unit);
        log::debug!("compile trial: {command}");

        let status = Command::new("sh")
            .arg("-c")
            .arg(&command)
            .current_dir(&self.root)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| OracleError::Invocation {
                command: command.clone(),
                source,
            })?;

        log::debug!("{unit}: exit {:?}", status.code());
        Ok(status.success())
    }
}
