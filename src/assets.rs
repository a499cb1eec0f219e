//! Font loading - the readiness gate in front of the plate screen.
//!
//! A [`FontManifest`] maps logical family names ("Manjari-Bold", ...) to
//! optional font files. Loading reads and checks each file, then resolves
//! every family to the text style the terminal draws it with. The screen
//! renders nothing but a loading line until this resolves.
//!
//! The load runs as a single tokio task owned by an [`AssetLoad`] handle.
//! Dropping the handle aborts the task, and the result channel dies with
//! it, so a load that finishes late can't touch a screen that is gone.

use ratatui::style::{Modifier, Style};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio::task::JoinHandle;

pub const MANJARI_BOLD: &str = "Manjari-Bold";
pub const MANJARI_REGULAR: &str = "Manjari-Regular";
pub const PUBLIC_SANS_BOLD: &str = "PublicSans-Bold";

/// Font loading errors
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read font '{family}' from {path}: {source}")]
    Read {
        family: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("font '{family}' at {path} is not a TrueType/OpenType file")]
    NotAFont { family: String, path: PathBuf },
    #[error("font '{0}' is declared twice")]
    DuplicateFamily(String),
    #[error("font loading was cancelled")]
    Cancelled,
}

/// Weight a family is drawn with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

/// One logical font family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontFace {
    pub family: String,
    /// Font file; relative paths resolve against `assets.root`
    #[serde(default)]
    pub asset: Option<PathBuf>,
    #[serde(default)]
    pub weight: FontWeight,
}

impl FontFace {
    fn builtin(family: &str, weight: FontWeight) -> Self {
        Self {
            family: family.to_string(),
            asset: None,
            weight,
        }
    }
}

/// The fonts the screen asks for before it renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FontManifest(pub Vec<FontFace>);

impl Default for FontManifest {
    fn default() -> Self {
        Self(vec![
            FontFace::builtin(MANJARI_BOLD, FontWeight::Bold),
            FontFace::builtin(MANJARI_REGULAR, FontWeight::Regular),
            FontFace::builtin(PUBLIC_SANS_BOLD, FontWeight::Bold),
        ])
    }
}

/// Resolved families, ready for drawing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontBook {
    styles: HashMap<String, Style>,
}

impl FontBook {
    /// Style for a family; unknown families draw plain
    pub fn style(&self, family: &str) -> Style {
        self.styles.get(family).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    fn insert(&mut self, face: &FontFace) -> Result<(), AssetError> {
        let style = match face.weight {
            FontWeight::Bold => Style::default().add_modifier(Modifier::BOLD),
            FontWeight::Regular => Style::default(),
        };
        if self.styles.insert(face.family.clone(), style).is_some() {
            return Err(AssetError::DuplicateFamily(face.family.clone()));
        }
        Ok(())
    }
}

/// sfnt signatures: TrueType, OpenType/CFF, Apple TrueType, collection
const FONT_SIGNATURES: [[u8; 4]; 4] = [*b"\x00\x01\x00\x00", *b"OTTO", *b"true", *b"ttcf"];

fn is_font(bytes: &[u8]) -> bool {
    bytes.len() >= 4 && FONT_SIGNATURES.iter().any(|sig| bytes[..4] == sig[..])
}

/// Load every face in the manifest
pub async fn load_fonts(manifest: FontManifest, root: PathBuf) -> Result<FontBook, AssetError> {
    let mut book = FontBook::default();
    for face in &manifest.0 {
        if let Some(asset) = &face.asset {
            let path = resolve(&root, asset);
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|source| AssetError::Read {
                    family: face.family.clone(),
                    path: path.clone(),
                    source,
                })?;
            if !is_font(&bytes) {
                return Err(AssetError::NotAFont {
                    family: face.family.clone(),
                    path,
                });
            }
            tracing::debug!("Loaded font {} ({} bytes)", face.family, bytes.len());
        }
        book.insert(face)?;
    }
    Ok(book)
}

fn resolve(root: &Path, asset: &Path) -> PathBuf {
    if asset.is_absolute() {
        asset.to_path_buf()
    } else {
        root.join(asset)
    }
}

/// Handle to the background font load
pub struct AssetLoad {
    rx: oneshot::Receiver<Result<FontBook, AssetError>>,
    task: JoinHandle<()>,
}

impl AssetLoad {
    /// Spawn the load on the tokio runtime
    pub fn spawn<F>(load: F) -> Self
    where
        F: Future<Output = Result<FontBook, AssetError>> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let task = tokio::spawn(async move {
            let result = load.await;
            if tx.send(result).is_err() {
                tracing::debug!("Screen dropped before font load finished");
            }
        });
        Self { rx, task }
    }

    /// Non-blocking check; `None` while the load is still running
    pub fn try_take(&mut self) -> Option<Result<FontBook, AssetError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(AssetError::Cancelled)),
        }
    }

    /// Wait for the load to finish
    #[cfg(test)]
    pub async fn wait(&mut self) -> Result<FontBook, AssetError> {
        (&mut self.rx).await.unwrap_or(Err(AssetError::Cancelled))
    }
}

impl Drop for AssetLoad {
    fn drop(&mut self) {
        self.task.abort();
    }
}
