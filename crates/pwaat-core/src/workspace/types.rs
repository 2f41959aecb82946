//! Workspace type definitions
//!
//! One configuration record per extractor kind, joined by [`WorkspaceConfig`].
//! Records are serializable for the workspace envelope; the scenario speaker
//! list is in-memory only and lives in its own side document.

use super::speakers::SpeakerRegistry;
use crate::error::Result;
use crate::path::paths_equal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which extractor a workspace drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtractorKind {
    Binary,
    Scenario,
    Cryptography,
}

impl ExtractorKind {
    pub const ALL: [ExtractorKind; 3] = [
        ExtractorKind::Binary,
        ExtractorKind::Scenario,
        ExtractorKind::Cryptography,
    ];

    /// Envelope discriminant
    pub fn tag(self) -> u8 {
        match self {
            ExtractorKind::Binary => 0,
            ExtractorKind::Scenario => 1,
            ExtractorKind::Cryptography => 2,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(ExtractorKind::Binary),
            1 => Some(ExtractorKind::Scenario),
            2 => Some(ExtractorKind::Cryptography),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExtractorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ExtractorKind::Binary => "Binary",
            ExtractorKind::Scenario => "Scenario",
            ExtractorKind::Cryptography => "Cryptography",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for ExtractorKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ExtractorKind::ALL
            .into_iter()
            .find(|kind| kind.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown extractor kind: {}", s))
    }
}

/// Binary extractor workspace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct BinaryWorkspace {
    pub root_workspace_path: PathBuf,
    pub extraction_input_path: PathBuf,
    pub extraction_output_path: PathBuf,
    pub insertion_input_path: PathBuf,
    pub insertion_output_path: PathBuf,
}

impl BinaryWorkspace {
    /// Named directory fields, root first
    pub fn directories(&self) -> Vec<(&'static str, &Path)> {
        vec![
            ("Root", self.root_workspace_path.as_path()),
            ("Extraction Input", self.extraction_input_path.as_path()),
            ("Extraction Output", self.extraction_output_path.as_path()),
            ("Insertion Input", self.insertion_input_path.as_path()),
            ("Insertion Output", self.insertion_output_path.as_path()),
        ]
    }

    pub fn is_valid(&self) -> bool {
        all_directories_exist(&self.directories())
    }

    pub fn structurally_equals(&self, other: &Self) -> bool {
        same_paths(&self.directories(), &other.directories())
    }
}

/// Scenario extractor workspace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ScenarioWorkspace {
    pub root_workspace_path: PathBuf,
    pub extraction_input_path: PathBuf,
    pub extraction_output_path: PathBuf,
    pub insertion_input_path: PathBuf,
    pub insertion_output_path: PathBuf,
    pub speaker_definition_path: PathBuf,
    pub simplification_input_path: PathBuf,
    pub simplification_output_path: PathBuf,
    pub desimplification_original_path: PathBuf,
    pub desimplification_input_path: PathBuf,
    pub desimplification_output_path: PathBuf,

    /// Loaded from `speaker_definition_path`, never written to the envelope
    #[serde(skip)]
    pub speaker_definitions: SpeakerRegistry,
}

impl ScenarioWorkspace {
    /// Named directory fields, root first. The speaker file is not a directory
    /// and is left out.
    pub fn directories(&self) -> Vec<(&'static str, &Path)> {
        vec![
            ("Root", self.root_workspace_path.as_path()),
            ("Extraction Input", self.extraction_input_path.as_path()),
            ("Extraction Output", self.extraction_output_path.as_path()),
            ("Insertion Input", self.insertion_input_path.as_path()),
            ("Insertion Output", self.insertion_output_path.as_path()),
            ("Simplification Input", self.simplification_input_path.as_path()),
            ("Simplification Output", self.simplification_output_path.as_path()),
            (
                "Desimplification Original",
                self.desimplification_original_path.as_path(),
            ),
            (
                "Desimplification Input",
                self.desimplification_input_path.as_path(),
            ),
            (
                "Desimplification Output",
                self.desimplification_output_path.as_path(),
            ),
        ]
    }

    pub fn is_valid(&self) -> bool {
        all_directories_exist(&self.directories())
    }

    pub fn structurally_equals(&self, other: &Self) -> bool {
        same_paths(&self.directories(), &other.directories())
            && paths_equal(&self.speaker_definition_path, &other.speaker_definition_path)
            && self
                .speaker_definitions
                .structurally_equals(&other.speaker_definitions)
    }

    /// Write the speaker registry to `speaker_definition_path`.
    ///
    /// Nothing is written when the path is blank.
    pub fn save_speakers(&self) -> Result<()> {
        if self.speaker_definition_path.as_os_str().is_empty() {
            return Ok(());
        }
        self.speaker_definitions.save(&self.speaker_definition_path)
    }

    /// Replace the registry with the contents of `speaker_definition_path`.
    pub fn reload_speakers(&mut self) {
        self.speaker_definitions = SpeakerRegistry::load_or_empty(&self.speaker_definition_path);
    }
}

/// Cryptography workspace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CryptographyWorkspace {
    pub root_workspace_path: PathBuf,
    pub decryption_input_path: PathBuf,
    pub decryption_output_path: PathBuf,
    pub encryption_input_path: PathBuf,
    pub encryption_output_path: PathBuf,
}

impl CryptographyWorkspace {
    /// Named directory fields, root first
    pub fn directories(&self) -> Vec<(&'static str, &Path)> {
        vec![
            ("Root", self.root_workspace_path.as_path()),
            ("Decryption Input", self.decryption_input_path.as_path()),
            ("Decryption Output", self.decryption_output_path.as_path()),
            ("Encryption Input", self.encryption_input_path.as_path()),
            ("Encryption Output", self.encryption_output_path.as_path()),
        ]
    }

    pub fn is_valid(&self) -> bool {
        all_directories_exist(&self.directories())
    }

    pub fn structurally_equals(&self, other: &Self) -> bool {
        same_paths(&self.directories(), &other.directories())
    }
}

/// Workspace configuration, one variant per extractor kind.
///
/// `Clone` is a deep copy: every path and the speaker list are owned, so a
/// clone taken as a saved snapshot never aliases the live instance.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkspaceConfig {
    Binary(BinaryWorkspace),
    Scenario(ScenarioWorkspace),
    Cryptography(CryptographyWorkspace),
}

impl WorkspaceConfig {
    /// Empty configuration of the given kind
    pub fn empty(kind: ExtractorKind) -> Self {
        match kind {
            ExtractorKind::Binary => WorkspaceConfig::Binary(BinaryWorkspace::default()),
            ExtractorKind::Scenario => WorkspaceConfig::Scenario(ScenarioWorkspace::default()),
            ExtractorKind::Cryptography => {
                WorkspaceConfig::Cryptography(CryptographyWorkspace::default())
            }
        }
    }

    pub fn kind(&self) -> ExtractorKind {
        match self {
            WorkspaceConfig::Binary(_) => ExtractorKind::Binary,
            WorkspaceConfig::Scenario(_) => ExtractorKind::Scenario,
            WorkspaceConfig::Cryptography(_) => ExtractorKind::Cryptography,
        }
    }

    pub fn root_path(&self) -> &Path {
        match self {
            WorkspaceConfig::Binary(ws) => &ws.root_workspace_path,
            WorkspaceConfig::Scenario(ws) => &ws.root_workspace_path,
            WorkspaceConfig::Cryptography(ws) => &ws.root_workspace_path,
        }
    }

    pub fn set_root_path(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        match self {
            WorkspaceConfig::Binary(ws) => ws.root_workspace_path = path,
            WorkspaceConfig::Scenario(ws) => ws.root_workspace_path = path,
            WorkspaceConfig::Cryptography(ws) => ws.root_workspace_path = path,
        }
    }

    /// Named directory fields of the active variant
    pub fn directories(&self) -> Vec<(&'static str, &Path)> {
        match self {
            WorkspaceConfig::Binary(ws) => ws.directories(),
            WorkspaceConfig::Scenario(ws) => ws.directories(),
            WorkspaceConfig::Cryptography(ws) => ws.directories(),
        }
    }

    /// Every declared directory field exists on disk
    pub fn is_valid(&self) -> bool {
        match self {
            WorkspaceConfig::Binary(ws) => ws.is_valid(),
            WorkspaceConfig::Scenario(ws) => ws.is_valid(),
            WorkspaceConfig::Cryptography(ws) => ws.is_valid(),
        }
    }

    /// Field-wise equality using path equivalence; false across kinds.
    pub fn structurally_equals(&self, other: &WorkspaceConfig) -> bool {
        match (self, other) {
            (WorkspaceConfig::Binary(a), WorkspaceConfig::Binary(b)) => a.structurally_equals(b),
            (WorkspaceConfig::Scenario(a), WorkspaceConfig::Scenario(b)) => {
                a.structurally_equals(b)
            }
            (WorkspaceConfig::Cryptography(a), WorkspaceConfig::Cryptography(b)) => {
                a.structurally_equals(b)
            }
            _ => false,
        }
    }

    /// Persist documents that live beside the workspace file
    pub fn save_side_documents(&self) -> Result<()> {
        match self {
            WorkspaceConfig::Scenario(ws) => ws.save_speakers(),
            WorkspaceConfig::Binary(_) | WorkspaceConfig::Cryptography(_) => Ok(()),
        }
    }

    /// Load documents that live beside the workspace file. Never fails.
    pub fn load_side_documents(&mut self) {
        if let WorkspaceConfig::Scenario(ws) = self {
            ws.reload_speakers();
        }
    }

    pub fn as_scenario(&self) -> Option<&ScenarioWorkspace> {
        match self {
            WorkspaceConfig::Scenario(ws) => Some(ws),
            _ => None,
        }
    }

    pub fn as_scenario_mut(&mut self) -> Option<&mut ScenarioWorkspace> {
        match self {
            WorkspaceConfig::Scenario(ws) => Some(ws),
            _ => None,
        }
    }
}

impl From<BinaryWorkspace> for WorkspaceConfig {
    fn from(ws: BinaryWorkspace) -> Self {
        WorkspaceConfig::Binary(ws)
    }
}

impl From<ScenarioWorkspace> for WorkspaceConfig {
    fn from(ws: ScenarioWorkspace) -> Self {
        WorkspaceConfig::Scenario(ws)
    }
}

impl From<CryptographyWorkspace> for WorkspaceConfig {
    fn from(ws: CryptographyWorkspace) -> Self {
        WorkspaceConfig::Cryptography(ws)
    }
}

fn all_directories_exist(fields: &[(&'static str, &Path)]) -> bool {
    fields
        .iter()
        .all(|(_, path)| !path.as_os_str().is_empty() && path.is_dir())
}

fn same_paths(a: &[(&'static str, &Path)], b: &[(&'static str, &Path)]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|((_, left), (_, right))| paths_equal(left, right))
}
