//! Workspace scaffolding
//!
//! Creates the fixed directory tree for an extractor kind under a root
//! folder and returns a configuration pointing at it. Safe to re-run on
//! the same root: existing directories and files are left alone.

use super::speakers::SpeakerRegistry;
use super::types::{
    BinaryWorkspace, CryptographyWorkspace, ExtractorKind, ScenarioWorkspace, WorkspaceConfig,
};
use crate::error::{Result, WorkspaceError};
use std::fs;
use std::io::Write;
use std::path::Path;

/// File name of the scenario speaker document created at the root
pub const SPEAKER_DEFINITIONS_FILE: &str = "speaker_definitions.json";

/// Create the directory tree for `kind` under `root` and return a
/// configuration whose fields point at it.
pub fn scaffold(kind: ExtractorKind, root: &Path) -> Result<WorkspaceConfig> {
    if root.as_os_str().is_empty() {
        return Err(WorkspaceError::invalid_operation(
            "Workspace root path is empty",
        ));
    }

    tracing::debug!(kind = %kind, root = %root.display(), "Scaffolding workspace");

    let mut config = match kind {
        ExtractorKind::Binary => WorkspaceConfig::Binary(binary_layout(root)),
        ExtractorKind::Scenario => WorkspaceConfig::Scenario(scenario_layout(root)),
        ExtractorKind::Cryptography => WorkspaceConfig::Cryptography(cryptography_layout(root)),
    };

    for (_, dir) in config.directories() {
        ensure_dir(dir)?;
    }

    if let WorkspaceConfig::Scenario(ws) = &mut config {
        seed_speaker_definitions(&ws.speaker_definition_path)?;
        ws.reload_speakers();
    }

    tracing::info!(kind = %kind, root = %root.display(), "Workspace scaffolded");
    Ok(config)
}

fn binary_layout(root: &Path) -> BinaryWorkspace {
    BinaryWorkspace {
        root_workspace_path: root.to_path_buf(),
        extraction_input_path: root.join("extraction").join("input"),
        extraction_output_path: root.join("extraction").join("output"),
        insertion_input_path: root.join("insertion").join("input"),
        insertion_output_path: root.join("insertion").join("output"),
    }
}

fn scenario_layout(root: &Path) -> ScenarioWorkspace {
    let binary = binary_layout(root);
    ScenarioWorkspace {
        root_workspace_path: binary.root_workspace_path,
        extraction_input_path: binary.extraction_input_path,
        extraction_output_path: binary.extraction_output_path,
        insertion_input_path: binary.insertion_input_path,
        insertion_output_path: binary.insertion_output_path,
        speaker_definition_path: root.join(SPEAKER_DEFINITIONS_FILE),
        simplification_input_path: root.join("simplification").join("input"),
        simplification_output_path: root.join("simplification").join("output"),
        desimplification_original_path: root.join("desimplification").join("original"),
        desimplification_input_path: root.join("desimplification").join("input"),
        desimplification_output_path: root.join("desimplification").join("output"),
        speaker_definitions: SpeakerRegistry::new(),
    }
}

fn cryptography_layout(root: &Path) -> CryptographyWorkspace {
    CryptographyWorkspace {
        root_workspace_path: root.to_path_buf(),
        decryption_input_path: root.join("decryption").join("input"),
        decryption_output_path: root.join("decryption").join("output"),
        encryption_input_path: root.join("encryption").join("input"),
        encryption_output_path: root.join("encryption").join("output"),
    }
}

/// Create `dir` and its parents; an existing directory is success.
fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| WorkspaceError::io_context(e, "Failed to create", dir))
}

/// Write the seed speaker document unless one already exists.
fn seed_speaker_definitions(path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(&serde_json::json!({
        "Speakers": SpeakerRegistry::seeded().entries(),
    }))?;

    match fs::OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(mut file) => {
            fill_new_file(path, &mut file, content.as_bytes())?;
            tracing::debug!(path = %path.display(), "Seeded speaker definitions");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(WorkspaceError::io_context(e, "Failed to create", path)),
    }
}

/// Write `content` into a file just created at `path`. On failure the
/// file is removed so a later run seeds it again.
fn fill_new_file(path: &Path, file: &mut impl Write, content: &[u8]) -> Result<()> {
    file.write_all(content)
        .and_then(|()| file.flush())
        .map_err(|e| {
            let _ = fs::remove_file(path);
            WorkspaceError::io_context(e, "Failed to write", path)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::speakers::{SpeakerEntry, UNKNOWN_SPEAKER};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_binary_scaffold() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("project");

        let config = scaffold(ExtractorKind::Binary, &root).unwrap();

        for sub in ["extraction/input", "extraction/output", "insertion/input", "insertion/output"] {
            assert!(root.join(sub).is_dir(), "{} missing", sub);
        }
        assert!(config.is_valid());
        assert_eq!(config.kind(), ExtractorKind::Binary);
        assert_eq!(config.root_path(), root.as_path());
    }

    #[test]
    fn test_cryptography_scaffold() {
        let dir = TempDir::new().unwrap();
        let config = scaffold(ExtractorKind::Cryptography, dir.path()).unwrap();

        assert!(config.is_valid());
        match config {
            WorkspaceConfig::Cryptography(ws) => {
                assert_eq!(ws.encryption_output_path, dir.path().join("encryption").join("output"));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_scenario_scaffold_seeds_speakers() {
        let dir = TempDir::new().unwrap();
        let config = scaffold(ExtractorKind::Scenario, dir.path()).unwrap();

        assert!(config.is_valid());
        let ws = config.as_scenario().unwrap();
        assert_eq!(ws.speaker_definition_path, dir.path().join(SPEAKER_DEFINITIONS_FILE));
        assert_eq!(
            ws.speaker_definitions.entries(),
            &[SpeakerEntry::new(0, UNKNOWN_SPEAKER)]
        );
        assert!(dir.path().join("desimplification").join("original").is_dir());
    }

    #[test]
    fn test_rerun_preserves_speaker_file() {
        let dir = TempDir::new().unwrap();
        scaffold(ExtractorKind::Scenario, dir.path()).unwrap();

        let speakers = dir.path().join(SPEAKER_DEFINITIONS_FILE);
        let custom = r#"{"Speakers":[{"Id":3,"Name":"Franziska"}]}"#;
        fs::write(&speakers, custom).unwrap();
        fs::write(dir.path().join("extraction").join("input").join("keep.bin"), b"x").unwrap();

        let config = scaffold(ExtractorKind::Scenario, dir.path()).unwrap();

        assert_eq!(fs::read_to_string(&speakers).unwrap(), custom);
        assert!(dir.path().join("extraction/input/keep.bin").exists());
        assert_eq!(
            config.as_scenario().unwrap().speaker_definitions.entries(),
            &[SpeakerEntry::new(3, "Franziska")]
        );
    }

    #[test]
    fn test_scaffold_is_deterministic() {
        let dir = TempDir::new().unwrap();
        let first = scaffold(ExtractorKind::Binary, dir.path()).unwrap();
        let second = scaffold(ExtractorKind::Binary, dir.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_root_rejected() {
        assert!(matches!(
            scaffold(ExtractorKind::Binary, Path::new("")),
            Err(WorkspaceError::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_root_blocked_by_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"").unwrap();
        assert!(matches!(
            scaffold(ExtractorKind::Binary, &blocker),
            Err(WorkspaceError::Io(_))
        ));
    }

    #[test]
    fn test_failed_seed_write_removes_file() {
        struct FullDisk;

        impl Write for FullDisk {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SPEAKER_DEFINITIONS_FILE);
        fs::write(&path, b"").unwrap();

        let result = fill_new_file(&path, &mut FullDisk, b"{}");

        assert!(matches!(result, Err(WorkspaceError::Io(_))));
        assert!(!path.exists());

        let config = scaffold(ExtractorKind::Scenario, dir.path()).unwrap();
        assert_eq!(config.as_scenario().unwrap().speaker_definitions.len(), 1);
    }

    #[test]
    fn test_directory_counts() {
        let root = Path::new("/ws");
        assert_eq!(WorkspaceConfig::Binary(binary_layout(root)).directories().len(), 5);
        assert_eq!(WorkspaceConfig::Scenario(scenario_layout(root)).directories().len(), 10);
        assert_eq!(
            WorkspaceConfig::Cryptography(cryptography_layout(root)).directories().len(),
            5
        );
    }
}
