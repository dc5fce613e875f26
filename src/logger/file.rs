/// Optional log file mirror
///
/// Plain (uncolored) lines are appended to a single file for the lifetime of
/// the process. The writer is line buffered: the static holding it is never
/// dropped, so nothing may sit in the buffer past the end of a line.
use once_cell::sync::Lazy;
use std::fs::{self, File, OpenOptions};
use std::io::{LineWriter, Write};
use std::path::Path;
use std::sync::Mutex;

static LOG_FILE: Lazy<Mutex<Option<LineWriter<File>>>> = Lazy::new(|| Mutex::new(None));

pub fn init_file_logging(path: &str) -> std::io::Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;

    if let Ok(mut guard) = LOG_FILE.lock() {
        *guard = Some(LineWriter::new(file));
    }
    Ok(())
}

pub fn write_to_file(line: &str) {
    if let Ok(mut guard) = LOG_FILE.lock() {
        if let Some(writer) = guard.as_mut() {
            let _ = writeln!(writer, "{}", line);
        }
    }
}

pub fn flush_file_logging() {
    if let Ok(mut guard) = LOG_FILE.lock() {
        if let Some(writer) = guard.as_mut() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_reach_disk_without_flush() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("primer.log");
        let path = path.to_str().unwrap();

        init_file_logging(path).unwrap();
        write_to_file("[POOL] Price: 1000.000000");
        write_to_file("[RPC] getSlot completed in 3ms");

        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.contains("[POOL] Price: 1000.000000\n"));
        assert!(contents.contains("[RPC] getSlot completed in 3ms\n"));

        *LOG_FILE.lock().unwrap() = None;
    }
}
