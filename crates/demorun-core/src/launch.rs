//! Fixed post-pass table: demos that only run under the distributed launcher.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{LAUNCHER_PROCESS_FLAG, POST_PASS_PROCESSES};
use crate::environment::RunEnvironment;
use crate::error::RunError;
use crate::invocation::Invocation;

/// One fixed invocation under the distributed launcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchSpec {
    /// Demo program, relative to the working directory.
    pub program: PathBuf,
    /// Arguments passed to the demo.
    #[serde(default)]
    pub args: Vec<String>,
    /// Number of ranks the launcher starts.
    #[serde(default = "default_processes")]
    pub processes: u32,
}

fn default_processes() -> u32 {
    POST_PASS_PROCESSES
}

impl LaunchSpec {
    /// Entry for `program` with `args`, using the default rank count.
    pub fn new<I, S>(program: impl Into<PathBuf>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            processes: POST_PASS_PROCESSES,
        }
    }

    /// Reject entries that cannot be launched.
    pub fn validate(&self) -> Result<(), RunError> {
        if self.processes == 0 {
            return Err(RunError::Config(format!(
                "post-pass {} needs at least one process",
                self.program.display()
            )));
        }
        if self.program.as_os_str().is_empty() {
            return Err(RunError::Config("post-pass program must not be empty".into()));
        }
        Ok(())
    }

    /// `<launcher> -np <processes> <interpreter> <program> <args...>`, run in `workdir`.
    #[must_use]
    pub fn invocation(
        &self,
        launcher: &str,
        interpreter: &str,
        workdir: &Path,
        env: &RunEnvironment,
    ) -> Invocation {
        Invocation::new(launcher)
            .arg(LAUNCHER_PROCESS_FLAG)
            .arg(self.processes.to_string())
            .arg(interpreter)
            .arg(&self.program)
            .args(&self.args)
            .with_env(env)
            .current_dir(workdir)
    }
}

/// The two demos that need three ranks to exercise distributed assembly.
#[must_use]
pub fn default_post_pass() -> Vec<LaunchSpec> {
    vec![
        LaunchSpec::new("fenics-book/hodge.py", ["N=4"]),
        LaunchSpec::new("parallelmixedpoisson.py", Vec::<String>::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table() {
        let table = default_post_pass();
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].program, PathBuf::from("fenics-book/hodge.py"));
        assert_eq!(table[0].args, vec!["N=4".to_string()]);
        assert_eq!(table[0].processes, 3);
        assert_eq!(table[1].program, PathBuf::from("parallelmixedpoisson.py"));
        assert!(table[1].args.is_empty());
        assert_eq!(table[1].processes, 3);
    }

    #[test]
    fn invocation_layout() {
        let spec = LaunchSpec::new("fenics-book/hodge.py", ["N=4"]);
        let inv = spec.invocation(
            "mpirun",
            "python3",
            Path::new("/demo"),
            &RunEnvironment::default(),
        );
        assert_eq!(inv.to_string(), "mpirun -np 3 python3 fenics-book/hodge.py N=4");
        assert_eq!(inv.cwd.as_deref(), Some(Path::new("/demo")));
        assert!(inv.env.iter().any(|(k, v)| k == "DOLFIN_NOPLOT" && v == "1"));
    }

    #[test]
    fn zero_processes_rejected() {
        let mut spec = LaunchSpec::new("x.py", Vec::<String>::new());
        spec.processes = 0;
        assert!(matches!(spec.validate(), Err(RunError::Config(_))));
    }

    #[test]
    fn deserialize_fills_defaults() {
        let spec: LaunchSpec = serde_json::from_str(r#"{"program": "parallelmixedpoisson.py"}"#)
            .unwrap();
        assert!(spec.args.is_empty());
        assert_eq!(spec.processes, 3);
    }
}
