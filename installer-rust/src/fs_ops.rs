use std::{
    fs,
    io::{self, Read, Write},
    path::{Path, PathBuf},
    time::Duration,
};

use thiserror::Error;

fn temp_path_for(dest: &Path) -> io::Result<PathBuf> {
    let parent = dest
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "dest has no parent"))?;
    let name = dest
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "dest has no filename"))?
        .to_string_lossy();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or(Duration::from_millis(0))
        .as_nanos();
    Ok(parent.join(format!("{name}.tmp-{nonce}")))
}

/// Which end of a stream copy failed.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("read failed: {0}")]
    Read(#[source] io::Error),
    #[error("write failed: {0}")]
    Write(#[source] io::Error),
}

fn copy_tagged(src: &mut impl Read, dst: &mut impl Write) -> Result<u64, StreamError> {
    let mut buf = vec![0u8; 64 * 1024];
    let mut total = 0u64;
    loop {
        let n = match src.read(&mut buf) {
            Ok(0) => return Ok(total),
            Ok(n) => n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(StreamError::Read(err)),
        };
        dst.write_all(&buf[..n]).map_err(StreamError::Write)?;
        total += n as u64;
    }
}

/// Streams `src` into a sibling temp file and renames it onto `dest` once
/// the stream is exhausted. On error the temp file is removed and `dest`
/// is left untouched.
pub fn write_stream_atomic(dest: &Path, src: &mut impl Read) -> Result<u64, StreamError> {
    let tmp = temp_path_for(dest).map_err(StreamError::Write)?;
    let written = (|| {
        let mut file = fs::File::create(&tmp).map_err(StreamError::Write)?;
        let n = copy_tagged(src, &mut file)?;
        file.sync_all().map_err(StreamError::Write)?;
        Ok::<_, StreamError>(n)
    })();
    let written = match written {
        Ok(n) => n,
        Err(err) => {
            let _ = fs::remove_file(&tmp);
            return Err(err);
        }
    };
    let placed = (|| {
        if dest.exists() {
            fs::remove_file(dest)?;
        }
        fs::rename(&tmp, dest)
    })();
    if let Err(err) = placed {
        let _ = fs::remove_file(&tmp);
        return Err(StreamError::Write(err));
    }
    Ok(written)
}
