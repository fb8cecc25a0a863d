//! File-backed templates searched across view paths.

use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::SystemTime;

use super::{interpolate, View, ViewData};
use crate::error::ViewError;

/// Extensions probed, in order, when resolving a template name.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".html.slv", ".html.erb", ".html"];

/// Maximum size for path cache to prevent unbounded memory growth.
const PATH_CACHE_MAX_SIZE: usize = 1000;

/// Maximum size for template cache to prevent unbounded memory growth.
const TEMPLATE_CACHE_MAX_SIZE: usize = 500;

/// A cached template source with the modification time it was read at.
#[derive(Debug, Clone)]
struct CachedTemplate {
    source: Arc<str>,
    modified: SystemTime,
}

/// Templates loaded from disk.
///
/// Names are resolved against each view path in the order the paths were
/// added, trying every extension in turn. Sources are cached and re-read when
/// the file's modification time changes.
#[derive(Debug)]
pub struct FileView {
    paths: RwLock<Vec<PathBuf>>,
    extensions: Vec<String>,
    /// Cached template sources (path -> source)
    cache: RwLock<HashMap<PathBuf, CachedTemplate>>,
    /// Cached path resolutions (template_name -> resolved_path)
    path_cache: RwLock<HashMap<String, PathBuf>>,
}

impl Default for FileView {
    fn default() -> Self {
        Self::with_extensions(DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect())
    }
}

impl FileView {
    /// Create a view searching a single directory.
    pub fn new(views_dir: impl Into<PathBuf>) -> Self {
        let view = Self::default();
        view.add_path(views_dir);
        view
    }

    pub fn with_extensions(extensions: Vec<String>) -> Self {
        Self {
            paths: RwLock::new(Vec::new()),
            extensions,
            cache: RwLock::new(HashMap::new()),
            path_cache: RwLock::new(HashMap::new()),
        }
    }

    /// Add a view path. Paths already present are ignored.
    pub fn add_path(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        let mut paths = self.paths.write().unwrap_or_else(PoisonError::into_inner);
        if !paths.contains(&path) {
            log::debug!("Added view path {}", path.display());
            paths.push(path);
            // Earlier resolutions may now be shadowed.
            self.path_cache
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .clear();
        }
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.paths
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Resolve a template name to a file path (cached).
    pub fn resolve_template_path(&self, name: &str) -> Result<PathBuf, ViewError> {
        if let Some(path) = self
            .path_cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return Ok(path.clone());
        }

        let resolved = self.do_resolve_template_path(name)?;

        let mut path_cache = self
            .path_cache
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if path_cache.len() >= PATH_CACHE_MAX_SIZE {
            path_cache.clear();
        }
        path_cache.insert(name.to_string(), resolved.clone());

        Ok(resolved)
    }

    fn do_resolve_template_path(&self, name: &str) -> Result<PathBuf, ViewError> {
        // Template names never escape the view paths.
        let escapes = Path::new(name)
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if name.is_empty() || escapes {
            return Err(ViewError::template_not_found(name));
        }

        let paths = self.paths.read().unwrap_or_else(PoisonError::into_inner);
        for dir in paths.iter() {
            for ext in &self.extensions {
                let path = dir.join(format!("{}{}", name, ext));
                if path.is_file() {
                    return Ok(path);
                }
            }
        }

        Err(ViewError::template_not_found(name))
    }

    /// Get a template source from cache or load it from disk.
    fn get_or_load_template(&self, path: &Path) -> Result<Arc<str>, ViewError> {
        let modified = fs::metadata(path)
            .and_then(|m| m.modified())
            .map_err(|e| ViewError::io(path, e))?;

        if let Some(cached) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
        {
            if cached.modified == modified {
                return Ok(cached.source.clone());
            }
        }

        let source: Arc<str> = fs::read_to_string(path)
            .map_err(|e| ViewError::io(path, e))?
            .into();

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        if cache.len() >= TEMPLATE_CACHE_MAX_SIZE {
            cache.clear();
        }
        cache.insert(
            path.to_path_buf(),
            CachedTemplate {
                source: source.clone(),
                modified,
            },
        );

        Ok(source)
    }

    /// Drop every cached resolution and source.
    pub fn clear_cache(&self) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.path_cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl View for FileView {
    fn render(&self, template: &str, data: &ViewData) -> Result<String, ViewError> {
        let path = self.resolve_template_path(template)?;
        let source = match self.get_or_load_template(&path) {
            Ok(source) => source,
            Err(err) => {
                // The file moved since it was resolved; resolve once more.
                self.path_cache
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .remove(template);
                let path = self.resolve_template_path(template).map_err(|_| err)?;
                self.get_or_load_template(&path)?
            }
        };
        log::trace!("Rendering {} from {}", template, path.display());
        interpolate(template, &source, data)
    }
}
