//! Sitemap Extension
//!
//! Collects the path of every page that reaches it in the html chain and
//! adds a `sitemap.xml` to the Files step. Register it last so pages
//! dropped by other extensions are not listed.

use anyhow::Result;
use chrono::Utc;

use crate::config::SitemapConfig;
use crate::domain::entities::{CustomFile, Dependency, RenderedPage, StagingFiles};
use crate::domain::ports::{ExtensionContext, PageTransform, PublishExtension};

#[derive(Debug, Clone)]
pub struct SitemapExtension {
    base_url: String,
    file: String,
}

impl SitemapExtension {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            file: "sitemap.xml".to_string(),
        }
    }

    pub fn from_config(config: &SitemapConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            file: config.file.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.replace('\\', "/");
        let path = path.trim_matches('/');
        if path.is_empty() {
            format!("{}/", base)
        } else {
            format!("{}/{}/", base, path)
        }
    }

    fn render(&self, paths: &[String]) -> String {
        let lastmod = Utc::now().format("%Y-%m-%d");
        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
        );
        for path in paths {
            xml.push_str(&format!(
                "  <url><loc>{}</loc><lastmod>{}</lastmod></url>\n",
                escape(&self.url(path)),
                lastmod
            ));
        }
        xml.push_str("</urlset>\n");
        xml
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

impl PublishExtension for SitemapExtension {
    /// Page paths in staging order
    type State = Vec<String>;

    fn name(&self) -> &str {
        "sitemap"
    }

    fn initialize(&self, _ctx: &ExtensionContext<'_>) -> Result<Self::State> {
        Ok(Vec::new())
    }

    fn transform_html(
        &self,
        state: Option<&mut Self::State>,
        _content: &Dependency,
        page: &RenderedPage,
    ) -> Result<PageTransform> {
        if let Some(paths) = state {
            if !paths.contains(&page.path) {
                paths.push(page.path.clone());
            }
        }
        Ok(PageTransform::Unchanged)
    }

    fn transform_custom_files(
        &self,
        state: Option<&mut Self::State>,
        files: &mut StagingFiles,
    ) -> Result<()> {
        let Some(paths) = state else {
            return Ok(());
        };
        files
            .custom
            .push(CustomFile::from_bytes(self.file.clone(), self.render(paths)));
        Ok(())
    }
}
