//! Manifest Content Source
//!
//! A `site.toml` listing every content and media item. Implements the three
//! content ports so a site can be published without a CMS:
//! - dependencies: requested items, their descendants when asked, and the
//!   transitive `depends_on` closure, de-duplicated in discovery order
//! - rendering: the item's `source` file is the page html
//! - media: the item's `source` file is copied to its `path`
//!
//! Sources resolve relative to the manifest's directory.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::entities::{Dependency, DependencyKind, PublishItem};
use crate::domain::ports::{
    unresolved_item_path, DependencyResolver, MediaStore, PageRenderer, ProgressReporter,
};
use crate::domain::value_objects::StagingPath;

/// Default manifest file name
pub const MANIFEST_FILE: &str = "site.toml";

/// One entry of `site.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestItem {
    pub id: String,

    #[serde(default)]
    pub kind: DependencyKind,

    #[serde(default)]
    pub name: String,

    /// Url path for documents, staging path for media
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Html (documents) or backing file (media), relative to the manifest
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    #[serde(default = "default_published")]
    pub published: bool,
}

fn default_published() -> bool {
    true
}

impl ManifestItem {
    pub fn new(id: impl Into<String>, kind: DependencyKind) -> Self {
        Self {
            id: id.into(),
            kind,
            name: String::new(),
            path: None,
            source: None,
            depends_on: Vec::new(),
            parent: None,
            published: true,
        }
    }

    fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    fn to_dependency(&self) -> Dependency {
        Dependency::new(self.id.clone(), self.kind, self.display_name())
    }
}

#[derive(Debug, Deserialize)]
struct ManifestFile {
    #[serde(default)]
    items: Vec<ManifestItem>,
}

/// Content source backed by a manifest file
#[derive(Debug, Clone)]
pub struct ManifestContent {
    root: PathBuf,
    items: Vec<ManifestItem>,
    index: HashMap<String, usize>,
}

impl ManifestContent {
    /// Load `site.toml`; sources resolve against its directory
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let manifest: ManifestFile = toml::from_str(&content)
            .with_context(|| format!("Invalid TOML: {}", path.display()))?;

        let root = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::from_items(root, manifest.items)
    }

    pub fn from_items(root: impl Into<PathBuf>, items: Vec<ManifestItem>) -> Result<Self> {
        let mut index = HashMap::new();
        for (i, item) in items.iter().enumerate() {
            if index.insert(item.id.clone(), i).is_some() {
                bail!("duplicate item id '{}' in manifest", item.id);
            }
        }
        Ok(Self {
            root: root.into(),
            items,
            index,
        })
    }

    pub fn items(&self) -> &[ManifestItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&ManifestItem> {
        self.index.get(id).map(|&i| &self.items[i])
    }

    fn children<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a ManifestItem> + 'a {
        self.items
            .iter()
            .filter(move |item| item.parent.as_deref() == Some(id))
    }

    fn source_path(&self, item: &ManifestItem) -> Result<PathBuf> {
        let Some(source) = item.source.as_deref() else {
            bail!("item '{}' has no source", item.id);
        };
        Ok(StagingPath::parse(source)?.resolve(&self.root))
    }

    /// `seen` maps each collected id to whether its children were walked
    fn collect(
        &self,
        id: &str,
        descendants: bool,
        seen: &mut HashMap<String, bool>,
        out: &mut Vec<Dependency>,
    ) {
        let Some(item) = self.get(id) else {
            warn!(id, "unknown item referenced, skipping");
            return;
        };

        match seen.get(&item.id).copied() {
            Some(expanded) if expanded || !descendants => return,
            // collected earlier as a plain dependency, now asked for its subtree
            Some(_) => {
                seen.insert(item.id.clone(), true);
                self.collect_children(&item.id, seen, out);
                return;
            }
            None => {
                seen.insert(item.id.clone(), descendants);
            }
        }

        out.push(item.to_dependency());
        for dependency in &item.depends_on {
            self.collect(dependency, false, seen, out);
        }
        if descendants {
            self.collect_children(&item.id, seen, out);
        }
    }

    fn collect_children(&self, id: &str, seen: &mut HashMap<String, bool>, out: &mut Vec<Dependency>) {
        for child in self.children(id) {
            self.collect(&child.id, true, seen, out);
        }
    }
}

impl DependencyResolver for ManifestContent {
    fn dependencies(
        &self,
        items: &[PublishItem],
        reporter: &dyn ProgressReporter,
    ) -> Result<Vec<Dependency>> {
        let mut seen = HashMap::new();
        let mut out = Vec::new();

        for (i, requested) in items.iter().enumerate() {
            let Some(item) = self.get(&requested.id) else {
                bail!("item '{}' is not in the manifest", requested.id);
            };
            reporter.tick(
                &format!("Calculating: {}", item.display_name()),
                i + 1,
                items.len(),
            );
            self.collect(&requested.id, requested.include_descendants, &mut seen, &mut out);
        }

        debug!(requested = items.len(), resolved = out.len(), "manifest dependencies");
        Ok(out)
    }
}

impl PageRenderer for ManifestContent {
    fn is_published(&self, id: &str) -> bool {
        self.get(id)
            .is_some_and(|item| item.published && item.kind == DependencyKind::Document)
    }

    fn render(&self, id: &str) -> Result<String> {
        let item = self
            .get(id)
            .with_context(|| format!("item '{}' is not in the manifest", id))?;
        let path = self.source_path(item)?;
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
    }

    fn item_path(&self, id: &str) -> String {
        match self.get(id) {
            Some(item) if item.published => item
                .path
                .clone()
                .unwrap_or_else(|| unresolved_item_path(id)),
            _ => unresolved_item_path(id),
        }
    }
}

impl MediaStore for ManifestContent {
    fn copy_media(&self, media: &Dependency, destination_root: &Path) -> Result<PathBuf> {
        let item = self
            .get(&media.id)
            .with_context(|| format!("media '{}' is not in the manifest", media.id))?;
        let source = self.source_path(item)?;

        let relative = match item.path.as_deref() {
            Some(path) => StagingPath::parse(path)?,
            None => {
                let name = source
                    .file_name()
                    .with_context(|| format!("media '{}' source has no file name", media.id))?;
                StagingPath::parse("media")?.join(&name.to_string_lossy())?
            }
        };

        let target = relative.resolve(destination_root);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::copy(&source, &target)
            .with_context(|| format!("Failed to copy {}", source.display()))?;

        Ok(relative.resolve(Path::new("")))
    }
}
