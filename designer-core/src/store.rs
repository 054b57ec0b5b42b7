//! Shared editor access and on-disk persistence.
//!
//! [`SharedEditor`] wraps an [`Editor`] so the UI thread, an export worker
//! and an autosave hook can all reach the same session. [`AutoSave`] is a
//! [`DocumentObserver`] that writes the design to disk after every settled
//! change.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::{schema, ChangeReason, Document, DocumentObserver, Editor, EditorResult};

/// Extension used for persisted designs.
pub const DESIGN_EXTENSION: &str = "json";

/// Thread-safe handle to one editing session.
///
/// Cloning the handle shares the session.
#[derive(Debug, Clone, Default)]
pub struct SharedEditor {
    inner: Arc<RwLock<Editor>>,
}

impl SharedEditor {
    /// Wrap an editor.
    #[must_use]
    pub fn new(editor: Editor) -> Self {
        Self {
            inner: Arc::new(RwLock::new(editor)),
        }
    }

    /// Run `f` with shared access to the editor.
    pub fn read<R>(&self, f: impl FnOnce(&Editor) -> R) -> R {
        let editor = self
            .inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&editor)
    }

    /// Run `f` with exclusive access to the editor.
    pub fn update<R>(&self, f: impl FnOnce(&mut Editor) -> R) -> R {
        let mut editor = self
            .inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut editor)
    }

    /// Owned copy of the current document.
    #[must_use]
    pub fn snapshot(&self) -> Document {
        self.read(Editor::snapshot)
    }
}

/// Writes the design to a file whenever the document settles.
///
/// Write failures are logged and never interrupt editing.
#[derive(Debug, Clone)]
pub struct AutoSave {
    path: PathBuf,
}

impl AutoSave {
    /// Save to an explicit file path.
    #[must_use]
    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Save as `<name>.json` inside `data_dir`, creating the directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn in_dir(data_dir: impl AsRef<Path>, name: &str) -> EditorResult<Self> {
        let data_dir = data_dir.as_ref();
        std::fs::create_dir_all(data_dir)?;
        Ok(Self::to_file(design_path(data_dir, name)))
    }

    /// Target file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, document: &Document) {
        let json = match schema::save(document) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to serialize design: {e}");
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, json) {
            tracing::warn!("Failed to save design to {}: {e}", self.path.display());
        }
    }
}

impl DocumentObserver for AutoSave {
    fn document_changed(&mut self, document: &Document, reason: ChangeReason) {
        tracing::trace!(?reason, path = %self.path.display(), "Autosave");
        self.persist(document);
    }
}

/// File path of a named design inside `data_dir`.
#[must_use]
pub fn design_path(data_dir: &Path, name: &str) -> PathBuf {
    data_dir.join(format!("{}.{DESIGN_EXTENSION}", sanitize_filename(name)))
}

/// Read a design file.
///
/// # Errors
///
/// Returns [`crate::EditorError::Io`] if the file cannot be read and
/// [`crate::EditorError::Parse`] if it is not a valid design.
pub fn load_file(path: &Path) -> EditorResult<Document> {
    let contents = std::fs::read_to_string(path)?;
    schema::load(&contents)
}

/// Write a design file.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn save_file(path: &Path, document: &Document) -> EditorResult<()> {
    std::fs::write(path, schema::save(document)?)?;
    Ok(())
}

/// Replace anything but alphanumerics, `-` and `_` with `_`.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EditorError, ElementPatch};

    #[test]
    fn test_shared_editor_update_and_snapshot() {
        let shared = SharedEditor::default();
        let clone = shared.clone();
        let id = clone.update(|editor| editor.add_text(&ElementPatch::default()));

        let snapshot = shared.snapshot();
        assert!(snapshot.contains(id));
        assert_eq!(shared.read(|editor| editor.selection()), Some(id));
    }

    #[test]
    fn test_shared_editor_across_threads() {
        let shared = SharedEditor::default();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                std::thread::spawn(move || {
                    shared.update(|editor| editor.add_text(&ElementPatch::default()));
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("thread");
        }
        assert_eq!(shared.snapshot().len(), 4);
    }

    #[test]
    fn test_autosave_writes_on_change() {
        let dir = tempfile::tempdir().expect("tempdir");
        let autosave = AutoSave::in_dir(dir.path(), "spring sale/flyer").expect("autosave");
        let path = autosave.path().to_path_buf();
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("spring_sale_flyer.json")
        );

        let mut editor = Editor::default();
        editor.subscribe(autosave);
        let id = editor.add_text(&ElementPatch::default());
        editor
            .update_element(id, &ElementPatch::position(42.0, 7.0))
            .expect("update");

        let loaded = load_file(&path).expect("load");
        let element = loaded.get(id).expect("element");
        assert!((element.transform.x - 42.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = design_path(dir.path(), "card");

        let mut editor = Editor::default();
        editor.add_text(&ElementPatch::default());
        save_file(&path, editor.document()).expect("save");

        assert_eq!(&load_file(&path).expect("load"), editor.document());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = load_file(&dir.path().join("nope.json"));
        assert!(matches!(result, Err(EditorError::Io(_))));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("simple"), "simple");
        assert_eq!(sanitize_filename("with-dash"), "with-dash");
        assert_eq!(sanitize_filename("has space"), "has_space");
        assert_eq!(sanitize_filename("a.b/c"), "a_b_c");
    }
}
