//! Registry output writer.

use crate::errors::RuntimeError;
use shared_types::ResolvedRegistry;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write the registry list as a JSON array, replacing `path` atomically.
pub fn write_registries(path: &Path, registries: &[ResolvedRegistry]) -> Result<(), RuntimeError> {
    let output_err = |source| RuntimeError::Output {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(output_err)?;
    }

    let json = serde_json::to_vec_pretty(registries)
        .map_err(|e| output_err(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    let written = write_synced(&tmp, &json).and_then(|()| fs::rename(&tmp, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(output_err(e));
    }

    tracing::info!(path = %path.display(), count = registries.len(), "Wrote registry output");
    Ok(())
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{CandidateOutput, RegistryMetadata, TxId};

    fn registry() -> ResolvedRegistry {
        let candidate = CandidateOutput {
            txid: TxId([0xaa; 32]),
            output_index: 1,
            locking_script: vec![0x6a],
            block_height: Some(790_001),
            is_first_output_in_tx: false,
        };
        let metadata = RegistryMetadata {
            hash: [0x01; 32],
            uris: vec!["https://example.com/bcmr.json".into()],
        };
        ResolvedRegistry::new(&candidate, metadata, TxId([0xbb; 32]), 2, true)
    }

    #[test]
    fn test_writes_camel_case_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("registries.json");

        write_registries(&path, &[registry()]).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let first = &value[0];
        assert_eq!(first["authchainLength"], 2);
        assert_eq!(first["isAuthheadUnspent"], true);
        assert_eq!(first["contentHash"], "01".repeat(32));
        assert_eq!(first["blockHeight"], 790_001);
        assert!(!dir.path().join("out").join("registries.json.tmp").exists());
    }

    #[test]
    fn test_replaces_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registries.json");
        write_registries(&path, &[registry(), registry()]).unwrap();
        write_registries(&path, &[]).unwrap();

        let value: Vec<ResolvedRegistry> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(value.is_empty());
    }

    #[test]
    fn test_unwritable_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();

        let result = write_registries(&blocker.join("registries.json"), &[]);
        assert!(matches!(result, Err(RuntimeError::Output { .. })));
    }

    #[test]
    fn test_tmp_named_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registries.tmp");
        write_registries(&path, &[registry()]).unwrap();

        let value: Vec<ResolvedRegistry> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value.len(), 1);
        assert!(!dir.path().join("registries.tmp.tmp").exists());
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registries.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("occupant"), b"x").unwrap();

        let result = write_registries(&path, &[registry()]);
        assert!(matches!(result, Err(RuntimeError::Output { .. })));
        assert!(!dir.path().join("registries.json.tmp").exists());
    }
}
