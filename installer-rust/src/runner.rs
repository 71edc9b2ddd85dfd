use std::{
    io,
    path::Path,
    process::{Command, Output, Stdio},
};

use crate::error::ForgeError;

const INTERPRETER: &str = "cmd.exe";

/// What the vendor script left behind once it exited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ScriptOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<Output> for ScriptOutput {
    fn from(output: Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

pub fn hide_console(cmd: &mut Command) -> &mut Command {
    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        const CREATE_NO_WINDOW: u32 = 0x08000000;
        cmd.creation_flags(CREATE_NO_WINDOW);
    }
    cmd
}

pub fn script_command(script: &Path, work_dir: &Path) -> Command {
    let mut c = Command::new(INTERPRETER);
    c.arg("/c")
        .arg(script)
        .current_dir(work_dir)
        .stdin(Stdio::null());
    hide_console(&mut c);
    c
}

/// Runs `cmd` to completion with stdout and stderr captured.
pub fn exec_captured(cmd: &mut Command) -> io::Result<Output> {
    tracing::info!(command = %format_command(cmd), "spawning");
    let output = cmd.output()?;
    let exit = output
        .status
        .code()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    tracing::info!(exit = %exit, "process exited");
    Ok(output)
}

/// Runs the vendor script through `exec`. Only exit code zero counts as
/// success; anything else returns the captured stderr untouched.
pub fn run_script(
    script: &Path,
    work_dir: &Path,
    exec: &mut impl FnMut(&mut Command) -> io::Result<Output>,
) -> Result<ScriptOutput, ForgeError> {
    let mut cmd = script_command(script, work_dir);
    let output: ScriptOutput = exec(&mut cmd)
        .map_err(|err| ForgeError::ScriptExecution {
            code: None,
            stderr: format!("failed to start {}: {err}", format_command(&cmd)),
        })?
        .into();

    if !output.stdout.is_empty() {
        tracing::debug!(stdout = %output.stdout.trim_end(), "script output");
    }
    if !output.success() {
        return Err(ForgeError::ScriptExecution {
            code: output.code,
            stderr: output.stderr,
        });
    }
    Ok(output)
}

pub fn format_command(cmd: &Command) -> String {
    let program = cmd.get_program().to_string_lossy();
    let args = cmd
        .get_args()
        .map(|arg| arg.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ");
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{program} {args}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fake_output(code: i32, stderr: &str) -> Output {
        #[cfg(windows)]
        let status = {
            use std::os::windows::process::ExitStatusExt;
            std::process::ExitStatus::from_raw(code as u32)
        };
        #[cfg(unix)]
        let status = {
            use std::os::unix::process::ExitStatusExt;
            std::process::ExitStatus::from_raw(code << 8)
        };
        Output {
            status,
            stdout: b"fetching files\n".to_vec(),
            stderr: stderr.as_bytes().to_vec(),
        }
    }

    #[test]
    fn script_command_uses_interpreter_and_work_dir() {
        let work = PathBuf::from("work");
        let script = work.join("uup_download_windows.cmd");
        let cmd = script_command(&script, &work);
        assert_eq!(cmd.get_program(), "cmd.exe");
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, vec![std::ffi::OsStr::new("/c"), script.as_os_str()]);
        assert_eq!(cmd.get_current_dir(), Some(work.as_path()));
    }

    #[test]
    fn zero_exit_is_success() {
        let work = PathBuf::from("work");
        let out = run_script(&work.join("s.cmd"), &work, &mut |_cmd: &mut Command| {
            Ok(fake_output(0, ""))
        })
        .unwrap();
        assert!(out.success());
        assert_eq!(out.stdout, "fetching files\n");
    }

    #[test]
    fn non_zero_exit_carries_stderr() {
        let work = PathBuf::from("work");
        let err = run_script(&work.join("s.cmd"), &work, &mut |_cmd: &mut Command| {
            Ok(fake_output(2, "aria2c missing\n"))
        })
        .unwrap_err();
        match err {
            ForgeError::ScriptExecution { code, stderr } => {
                assert_eq!(code, Some(2));
                assert_eq!(stderr, "aria2c missing\n");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn spawn_failure_is_script_error() {
        let work = PathBuf::from("work");
        let err = run_script(&work.join("s.cmd"), &work, &mut |_cmd: &mut Command| {
            Err(io::Error::new(io::ErrorKind::NotFound, "no interpreter"))
        })
        .unwrap_err();
        assert_eq!(err.kind(), "ScriptExecutionError");
        assert!(err.to_string().contains("no interpreter"));
    }

    #[test]
    fn format_command_joins_args() {
        let mut cmd = Command::new("powershell");
        cmd.arg("-Command").arg("Get-Date");
        assert_eq!(format_command(&cmd), "powershell -Command Get-Date");
    }
}
