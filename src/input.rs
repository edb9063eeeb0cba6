use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::{Error, Result};

pub struct InputOptions {
    /// Disable memory-mapping entirely.
    pub no_mmap: bool,
    /// Files at least this large are memory-mapped.
    pub mmap_threshold: u64,
}

impl Default for InputOptions {
    fn default() -> Self {
        InputOptions {
            no_mmap: false,
            mmap_threshold: 4 * 1024 * 1024,
        }
    }
}

/// Reads one name per line from a file, or stdin when `path` is `-`.
///
/// # Errors
/// Returns an error if the file cannot be opened or read, or a line is not UTF-8.
pub fn read_names_from_path(path: &Path, opts: &InputOptions) -> Result<Vec<String>> {
    if path.as_os_str() == "-" {
        let stdin = io::stdin();
        let mut lock = stdin.lock();
        return read_names(&mut lock, path);
    }
    let io_err = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_err)?;
    if !opts.no_mmap
        && let Ok(meta) = file.metadata()
        && meta.len() >= opts.mmap_threshold
    {
        // Safety: read-only map; the file is not mutated while we hold it
        if let Ok(mmap) = unsafe { memmap2::Mmap::map(&file) } {
            tracing::debug!(path = %path.display(), bytes = mmap.len(), "memory-mapped input");
            return split_names(&mmap[..]);
        }
    }
    let mut reader = BufReader::new(file);
    read_names(&mut reader, path)
}

/// Reads one name per line from any reader.
///
/// # Errors
/// Returns an error if reading fails or a line is not UTF-8.
pub fn read_names<R: BufRead + ?Sized>(reader: &mut R, path_hint: &Path) -> Result<Vec<String>> {
    let mut data = Vec::with_capacity(8192);
    loop {
        match reader.read_to_end(&mut data) {
            Ok(_) => break,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(source) => {
                return Err(Error::Io {
                    path: path_hint.to_path_buf(),
                    source,
                });
            }
        }
    }
    split_names(&data)
}

/// Splits on `\n`, strips `\r` and a UTF-8 BOM, skips blank lines.
fn split_names(data: &[u8]) -> Result<Vec<String>> {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
    let mut out = Vec::new();
    let mut start = 0;
    let mut line_no = 0;
    let ends = memchr::memchr_iter(b'\n', data).chain(std::iter::once(data.len()));
    for end in ends {
        line_no += 1;
        let line = trim_cr(&data[start..end]);
        start = end + 1;
        let line = std::str::from_utf8(line).map_err(|_| Error::InvalidUtf8 { line: line_no })?;
        if line.trim().is_empty() {
            continue;
        }
        out.push(line.to_string());
    }
    Ok(out)
}

const fn trim_cr(s: &[u8]) -> &[u8] {
    if let Some((&last, body)) = s.split_last() {
        if last == b'\r' {
            return body;
        }
    }
    s
}
