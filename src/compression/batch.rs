//! Parallel compression of independent inputs.
//!
//! Every input is its own session with its own dictionary, so the work splits
//! across rayon's pool without any coordination.

use crate::compression::container::Lzw;
use crate::compression::{Compression, Result};
use crate::error::Error;
use log::{debug, warn};
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extension appended to compressed file names.
pub const EXTENSION: &str = "lzw";

/// Compresses each input independently, in parallel.
///
/// Results come back in input order.
pub fn compress_all<T>(lzw: &Lzw, inputs: &[T]) -> Vec<Result<Vec<u8>>>
where
    T: AsRef<[u8]> + Sync,
{
    inputs
        .par_iter()
        .map(|input| lzw.compress(input.as_ref()))
        .collect()
}

/// Decompresses each container independently, in parallel.
///
/// Results come back in input order; one corrupt input does not affect the
/// others.
pub fn decompress_all<T>(lzw: &Lzw, inputs: &[T]) -> Vec<Result<Vec<u8>>>
where
    T: AsRef<[u8]> + Sync,
{
    let results: Vec<Result<Vec<u8>>> = inputs
        .par_iter()
        .map(|input| lzw.decompress(input.as_ref()))
        .collect();

    for (index, result) in results.iter().enumerate() {
        if let Err(err) = result {
            warn!("input {} failed to decompress: {}", index, err);
        }
    }
    results
}

/// Compresses every regular file under `input_dir`, at any depth, into
/// `output_dir`, mirroring the directory layout and appending `.lzw` to each
/// file name.
///
/// Creates directories under `output_dir` as needed and returns the written
/// paths, sorted. Stops at the first failure.
pub fn compress_dir(lzw: &Lzw, input_dir: &Path, output_dir: &Path) -> Result<Vec<PathBuf>> {
    let jobs = files_under(input_dir)?
        .into_iter()
        .map(|relative| {
            let mut name = relative.clone().into_os_string();
            name.push(".");
            name.push(EXTENSION);
            (input_dir.join(&relative), output_dir.join(name))
        })
        .collect::<Vec<_>>();

    let written = convert_files(&jobs, |data| lzw.compress(data))?;
    debug!(
        "compressed {} files from {} into {}",
        written.len(),
        input_dir.display(),
        output_dir.display()
    );
    Ok(written)
}

/// Restores every `.lzw` file under `input_dir` into `output_dir`, mirroring
/// the directory layout and dropping the extension.
///
/// Other files are skipped. Returns the written paths, sorted, and stops at
/// the first failure.
pub fn decompress_dir(lzw: &Lzw, input_dir: &Path, output_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut jobs = Vec::new();
    for relative in files_under(input_dir)? {
        if relative.extension().is_some_and(|ext| ext == EXTENSION) {
            let target = output_dir.join(relative.with_extension(""));
            jobs.push((input_dir.join(&relative), target));
        } else {
            debug!("skipping {}", relative.display());
        }
    }

    let written = convert_files(&jobs, |data| lzw.decompress(data))?;
    debug!(
        "decompressed {} files from {} into {}",
        written.len(),
        input_dir.display(),
        output_dir.display()
    );
    Ok(written)
}

/// Regular files under `root` as paths relative to it, sorted.
fn files_under(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|err| Error::InvalidInput(err.to_string()))?;
        files.push(relative.to_path_buf());
    }
    files.sort();
    Ok(files)
}

/// Runs `convert` over each `(source, target)` pair in parallel.
fn convert_files<F>(jobs: &[(PathBuf, PathBuf)], convert: F) -> Result<Vec<PathBuf>>
where
    F: Fn(&[u8]) -> Result<Vec<u8>> + Sync,
{
    jobs.par_iter()
        .map(|(source, target)| -> Result<PathBuf> {
            let data = fs::read(source)?;
            let converted = convert(&data).map_err(|err| {
                warn!("{}: {}", source.display(), err);
                err
            })?;

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(target, &converted)?;

            debug!(
                "{} -> {} ({} -> {} bytes)",
                source.display(),
                target.display(),
                data.len(),
                converted.len()
            );
            Ok(target.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::config::{LzwConfig, OnFull};
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use tempfile::TempDir;

    fn inputs() -> Vec<Vec<u8>> {
        let mut rng = StdRng::seed_from_u64(5150);
        (0..16)
            .map(|i| {
                let len = rng.gen_range(0..8000);
                (0..len).map(|_| rng.gen_range(0..=(i as u8 * 16))).collect()
            })
            .collect()
    }

    #[test]
    fn test_parallel_round_trip() {
        let lzw = Lzw::new(LzwConfig::new(10, OnFull::Freeze).unwrap());
        let inputs = inputs();

        let packed: Vec<Vec<u8>> = compress_all(&lzw, &inputs)
            .into_iter()
            .collect::<Result<_>>()
            .unwrap();
        let unpacked: Vec<Vec<u8>> = decompress_all(&lzw, &packed)
            .into_iter()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(unpacked, inputs);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let lzw = Lzw::default();
        let inputs = inputs();
        let parallel = compress_all(&lzw, &inputs);
        for (input, packed) in inputs.iter().zip(parallel) {
            assert_eq!(packed.unwrap(), lzw.compress(input).unwrap());
        }
    }

    #[test]
    fn test_one_corrupt_input() {
        let lzw = Lzw::default();
        let mut packed: Vec<Vec<u8>> = compress_all(&lzw, &[b"first".to_vec(), b"second".to_vec()])
            .into_iter()
            .collect::<Result<_>>()
            .unwrap();
        packed[0][0] = 0;

        let results = decompress_all(&lzw, &packed);
        assert!(matches!(results[0], Err(Error::InvalidHeader(_))));
        assert_eq!(results[1].as_ref().unwrap(), b"second");
    }

    fn create_file(dir: &Path, name: &str, content: &[u8]) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_compress_dir() {
        let temp_dir = TempDir::new().unwrap();
        let input_dir = temp_dir.path().join("in");
        let output_dir = temp_dir.path().join("out");
        create_file(&input_dir, "a.txt", b"aaaaaaaaaaaaaaaaaaaaaaaa");
        create_file(&input_dir, "b.bin", &[0, 1, 2, 3, 0, 1, 2, 3]);
        create_file(&input_dir, "sub/c.txt", b"nested nested nested");

        let lzw = Lzw::default();
        let written = compress_dir(&lzw, &input_dir, &output_dir).unwrap();
        assert_eq!(
            written,
            vec![
                output_dir.join("a.txt.lzw"),
                output_dir.join("b.bin.lzw"),
                output_dir.join("sub").join("c.txt.lzw"),
            ]
        );

        let restored = lzw.decompress(&fs::read(&written[0]).unwrap()).unwrap();
        assert_eq!(restored, b"aaaaaaaaaaaaaaaaaaaaaaaa");
        let restored = lzw.decompress(&fs::read(&written[2]).unwrap()).unwrap();
        assert_eq!(restored, b"nested nested nested");
    }

    #[test]
    fn test_dir_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let input_dir = temp_dir.path().join("in");
        let packed_dir = temp_dir.path().join("packed");
        let restored_dir = temp_dir.path().join("restored");

        let files = inputs();
        let names: Vec<String> = (0..files.len())
            .map(|i| format!("d{}/e{}/file{}.dat", i % 3, i % 2, i))
            .collect();
        for (name, content) in names.iter().zip(&files) {
            create_file(&input_dir, name, content);
        }

        let lzw = Lzw::new(LzwConfig::new(12, OnFull::Reset).unwrap());
        compress_dir(&lzw, &input_dir, &packed_dir).unwrap();
        create_file(&packed_dir, "notes.txt", b"not a container");

        let written = decompress_dir(&lzw, &packed_dir, &restored_dir).unwrap();
        assert_eq!(written.len(), files.len());
        for (name, content) in names.iter().zip(&files) {
            assert_eq!(&fs::read(restored_dir.join(name)).unwrap(), content);
        }
        assert!(!restored_dir.join("notes").exists());
    }

    #[test]
    fn test_decompress_dir_stops_on_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "in/bad.lzw", b"LZWT garbage");

        let result = decompress_dir(
            &Lzw::default(),
            &temp_dir.path().join("in"),
            &temp_dir.path().join("out"),
        );
        assert!(matches!(result, Err(Error::InvalidHeader(_))));
    }

    #[test]
    fn test_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        let result = compress_dir(
            &Lzw::default(),
            &temp_dir.path().join("absent"),
            &temp_dir.path().join("out"),
        );
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
