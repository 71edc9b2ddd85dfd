use std::{
    io,
    path::Path,
    process::{Command, Output, Stdio},
};

use crate::{error::ForgeError, runner};

fn quote_ps(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

pub fn mount_command(image: &Path) -> Command {
    let script = format!(
        "Mount-DiskImage -ImagePath {}",
        quote_ps(&image.to_string_lossy())
    );
    let mut c = Command::new("powershell");
    c.arg("-NoProfile")
        .arg("-NonInteractive")
        .arg("-Command")
        .arg(script)
        .stdin(Stdio::null());
    runner::hide_console(&mut c);
    c
}

/// Asks Windows to attach `image` as a virtual drive. Success is the
/// absence of an error from the host command.
pub fn mount_image(
    image: &Path,
    exec: &mut impl FnMut(&mut Command) -> io::Result<Output>,
) -> Result<(), ForgeError> {
    let mut cmd = mount_command(image);
    let output = exec(&mut cmd).map_err(|err| ForgeError::MountFailure {
        image: image.to_path_buf(),
        detail: format!("failed to start powershell: {err}"),
    })?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let detail = if stderr.is_empty() {
            format!("Mount-DiskImage exited with {:?}", output.status.code())
        } else {
            stderr
        };
        return Err(ForgeError::MountFailure {
            image: image.to_path_buf(),
            detail,
        });
    }
    tracing::info!(image = %image.display(), "image mounted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn quotes_are_doubled() {
        assert_eq!(quote_ps(r"C:\it's\a.iso"), r"'C:\it''s\a.iso'");
    }

    #[test]
    fn mount_command_targets_image_path() {
        let image = PathBuf::from("/tmp/flames-iso-x/result.iso");
        let cmd = mount_command(&image);
        assert_eq!(cmd.get_program(), "powershell");
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().to_string())
            .collect();
        assert_eq!(
            args.last().unwrap(),
            "Mount-DiskImage -ImagePath '/tmp/flames-iso-x/result.iso'"
        );
    }

    #[test]
    fn spawn_failure_is_mount_failure() {
        let image = PathBuf::from("result.iso");
        let err = mount_image(&image, &mut |_cmd: &mut Command| {
            Err(io::Error::new(io::ErrorKind::NotFound, "powershell missing"))
        })
        .unwrap_err();
        assert_eq!(err.kind(), "MountFailureError");
        assert!(err.to_string().contains("powershell missing"));
    }

    #[test]
    fn silent_non_zero_exit_reports_exit_code() {
        let image = PathBuf::from("result.iso");
        let err = mount_image(&image, &mut |_cmd: &mut Command| {
            #[cfg(windows)]
            let status = {
                use std::os::windows::process::ExitStatusExt;
                std::process::ExitStatus::from_raw(1)
            };
            #[cfg(unix)]
            let status = {
                use std::os::unix::process::ExitStatusExt;
                std::process::ExitStatus::from_raw(1 << 8)
            };
            Ok(Output {
                status,
                stdout: Vec::new(),
                stderr: Vec::new(),
            })
        })
        .unwrap_err();
        match err {
            ForgeError::MountFailure { image: failed, detail } => {
                assert_eq!(failed, image);
                assert_eq!(detail, "Mount-DiskImage exited with Some(1)");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
