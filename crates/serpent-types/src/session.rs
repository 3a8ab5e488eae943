//! Incremental checking of top-level chunks against an accumulated environment.

use crate::{Checked, CheckerConfig, GlobalEnv, TypeChecker, TypeResult};
use serpent_ast::Program;
use tracing::debug;

/// Holds the current environment revision between chunks.
///
/// A chunk's declarations and first assignments are committed only when
/// the whole chunk checks; a failing chunk leaves the session as it was.
#[derive(Debug, Clone)]
pub struct Session {
    checker: TypeChecker,
    env: GlobalEnv,
    chunks: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_config(CheckerConfig::default())
    }

    pub fn with_config(config: CheckerConfig) -> Self {
        Self::with_env(GlobalEnv::default(), config)
    }

    /// Start from a prepared environment instead of the builtins.
    pub fn with_env(env: GlobalEnv, config: CheckerConfig) -> Self {
        Self {
            checker: TypeChecker::with_config(config),
            env,
            chunks: 0,
        }
    }

    pub fn env(&self) -> &GlobalEnv {
        &self.env
    }

    /// Number of chunks committed so far.
    pub fn committed_chunks(&self) -> usize {
        self.chunks
    }

    pub fn check_chunk(&mut self, chunk: &Program) -> TypeResult<Checked> {
        let checked = self.checker.check_program(&self.env, chunk)?;
        self.env = checked.env.clone();
        self.chunks += 1;
        debug!(chunk = self.chunks, "committed environment revision");
        Ok(checked)
    }

    /// Drop everything committed and return to the builtins.
    pub fn reset(&mut self) {
        self.env = GlobalEnv::default();
        self.chunks = 0;
    }
}
