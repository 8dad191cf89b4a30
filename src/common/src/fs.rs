//! Write-then-rename helpers. A reader never observes a half-written table
//! file: output goes to `<path>.tmp` and is renamed over `<path>` only after
//! the writer finished and the data hit the disk.

use std::fs;
use std::fs::File;
use std::io;
use std::io::BufWriter;
use std::path::Path;
use std::path::PathBuf;

use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::errors::ParquetError;
use parquet::file::properties::WriterProperties;
use tracing::warn;

pub const TMP_EXTENSION: &str = "tmp";

pub fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(TMP_EXTENSION);
    PathBuf::from(name)
}

pub fn write_atomic<T, E, F>(path: &Path, f: F) -> Result<T, E>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<T, E>,
    E: From<io::Error>,
{
    let tmp = tmp_path(path);
    let res: Result<T, E> = (|| {
        let mut w = BufWriter::new(File::create(&tmp)?);
        let out = f(&mut w)?;
        let file = w.into_inner().map_err(|err| err.into_error())?;
        file.sync_all()?;
        Ok(out)
    })();

    match res {
        Ok(out) => {
            fs::rename(&tmp, path)?;
            Ok(out)
        }
        Err(err) => {
            if let Err(rm_err) = fs::remove_file(&tmp) {
                warn!("can't remove {:?}: {rm_err}", tmp);
            }
            Err(err)
        }
    }
}

/// Writes `batches` as one snappy-compressed parquet file, atomically.
pub fn write_parquet<E>(path: &Path, schema: SchemaRef, batches: &[RecordBatch]) -> Result<(), E>
where
    E: From<io::Error> + From<ParquetError>,
{
    write_atomic(path, |w| -> Result<(), E> {
        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();
        let mut writer = ArrowWriter::try_new(w, schema, Some(props))?;
        for batch in batches {
            writer.write(batch)?;
        }
        writer.close()?;
        Ok(())
    })
}

/// Removes `*.tmp` leftovers of an interrupted run from `dir`.
pub fn remove_stale_tmp(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut removed = vec![];
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == TMP_EXTENSION) {
            fs::remove_file(&path)?;
            removed.push(path);
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use std::env::temp_dir;
    use std::fs;
    use std::io;
    use std::io::Write;

    use uuid::Uuid;

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = temp_dir().join(format!("common-fs-{name}-{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn replaces_target_on_success() {
        let dir = scratch_dir("ok");
        let path = dir.join("t.csv");
        fs::write(&path, "old").unwrap();

        write_atomic(&path, |w| -> io::Result<()> { w.write_all(b"new") }).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn keeps_previous_file_on_failure() {
        let dir = scratch_dir("err");
        let path = dir.join("t.csv");
        fs::write(&path, "old").unwrap();

        let res = write_atomic(&path, |w| -> io::Result<()> {
            w.write_all(b"partial")?;
            Err(io::Error::new(io::ErrorKind::Other, "boom"))
        });

        assert!(res.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "old");
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn removes_only_tmp_files() {
        let dir = scratch_dir("stale");
        fs::write(dir.join("a.parquet"), "").unwrap();
        fs::write(dir.join("a.parquet.tmp"), "").unwrap();

        let removed = remove_stale_tmp(&dir).unwrap();

        assert_eq!(removed, vec![dir.join("a.parquet.tmp")]);
        assert!(dir.join("a.parquet").exists());
    }
}
