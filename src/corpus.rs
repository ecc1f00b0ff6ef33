// src/corpus.rs
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use log::debug;
use serde_json::{Map, Value};

use crate::errors::{AnalysisError, Result};
use crate::models::{Cluster, CorpusFile, SourceFile};

/// Lists the cluster files in a folder, sorted by file name.
///
/// Hidden files and sub-directories are skipped.
pub fn list_cluster_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let io_err = |source: std::io::Error| AnalysisError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        if !entry.file_type().map_err(io_err)?.is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        files.push(entry.path());
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    debug!("Found {} cluster files in {}", files.len(), dir.display());
    Ok(files)
}

/// Reads one cluster file: a JSON object of cluster key to cluster record.
///
/// Files ending in `.gz` are decompressed first.
pub fn read_cluster_file(path: &Path) -> Result<CorpusFile> {
    let file = File::open(path).map_err(|source| AnalysisError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let reader: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "gz") {
        Box::new(BufReader::new(GzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    let data: Value = serde_json::from_reader(reader).map_err(|source| AnalysisError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let Value::Object(records) = data else {
        return Err(AnalysisError::InvalidCorpus {
            path: path.to_path_buf(),
            reason: "top level must be an object of cluster records".to_string(),
        });
    };

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(CorpusFile {
        name: SourceFile(name),
        clusters: clusters_from_records(records)?,
    })
}

// Validates every record up front, short clusters included, so one bad record aborts the file
fn clusters_from_records(records: Map<String, Value>) -> Result<Vec<Cluster>> {
    records
        .into_iter()
        .map(|(key, record)| Cluster::from_record(&key, record))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    const RECORDS: &str = r#"{
        "zeta": {"span": 1980, "hits": [{"date": "2000-01-01"}, {"date": "2005-06-03"}]},
        "alpha": {"span": 3, "hits": [{"date": "2000-01-01"}]}
    }"#;

    fn write_gz(path: &Path, body: &str) {
        let mut encoder = GzEncoder::new(File::create(path).unwrap(), Compression::default());
        encoder.write_all(body.as_bytes()).unwrap();
        encoder.finish().unwrap();
    }

    #[test]
    fn test_read_gzip_keeps_key_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("part-0001.json.gz");
        write_gz(&path, RECORDS);

        let corpus = read_cluster_file(&path).unwrap();
        assert_eq!(corpus.name, SourceFile("part-0001.json.gz".to_string()));
        let keys: Vec<&str> = corpus.clusters.iter().map(|c| c.key.0.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        assert_eq!(corpus.clusters[0].hits.len(), 2);
    }

    #[test]
    fn test_read_plain_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.json");
        fs::write(&path, RECORDS).unwrap();
        assert_eq!(read_cluster_file(&path).unwrap().clusters.len(), 2);
    }

    #[test]
    fn test_read_rejects_non_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.json");
        fs::write(&path, "[1, 2, 3]").unwrap();
        let err = read_cluster_file(&path).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidCorpus { .. }));

        fs::write(&path, "{ not json").unwrap();
        let err = read_cluster_file(&path).unwrap_err();
        assert!(matches!(err, AnalysisError::Json { .. }));
    }

    #[test]
    fn test_read_propagates_record_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"c": {"hits": []}}"#).unwrap();
        let err = read_cluster_file(&path).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingField { field: "span", .. }));
    }

    #[test]
    fn test_read_rejects_bad_short_cluster_next_to_long_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.json");
        let body = r#"{
            "long": {"span": 1980, "hits": [{"date": "2000-01-01"}, {"date": "2005-06-03"}]},
            "short": {"span": 0, "hits": [{"date": "not a date"}]}
        }"#;
        fs::write(&path, body).unwrap();
        let err = read_cluster_file(&path).unwrap_err();
        match err {
            AnalysisError::DateParse { cluster, value } => {
                assert_eq!(cluster, "short");
                assert_eq!(value, "not a date");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_list_cluster_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.json.gz", "a.json.gz", ".hidden", "c.json"] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }
        fs::create_dir(dir.path().join("nested")).unwrap();

        let files = list_cluster_files(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.json.gz", "b.json.gz", "c.json"]);
    }

    #[test]
    fn test_list_missing_dir() {
        let err = list_cluster_files(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, AnalysisError::Io { .. }));
    }
}
