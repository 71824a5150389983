//! Publish command handler

use std::path::PathBuf;

use anyhow::{Context, Result};
use sitepush::domain::ports::ProgressReporter;
use sitepush::infrastructure::{ConsoleReporter, JsonReporter, SitemapExtension, TomlServerStore};
use sitepush::{
    CancellationToken, ExtensionRegistry, ManifestContent, PublishItem, PublishOptions,
    PublishReport, PublishSettings, PublishUseCase, SessionId,
};
use tracing::warn;

use super::load_config;

/// Arguments of `sitepush publish`
#[derive(Debug, Clone)]
pub struct PublishArgs {
    pub server: String,
    pub config: PathBuf,
    pub manifest: PathBuf,
    pub items: Vec<String>,
    pub descendants: bool,
    pub session: Option<SessionId>,
    pub files: bool,
    pub clean: bool,
}

pub fn cmd_publish(args: PublishArgs, json: bool, verbose: u8) -> Result<()> {
    let config = load_config(&args.config)?;
    let content = ManifestContent::load(&args.manifest)?;

    let items = requested_items(&content, &args.items, args.descendants);
    if items.is_empty() {
        anyhow::bail!("nothing to publish: {} has no items", args.manifest.display());
    }

    let mut extensions = ExtensionRegistry::new();
    if let Some(sitemap) = &config.sitemap {
        extensions.register(SitemapExtension::from_config(sitemap));
    }

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || on_interrupt.cancel()) {
        warn!(error = %e, "could not install Ctrl-C handler");
    }

    let mut options = PublishOptions::new(&args.server)
        .with_items(items)
        .with_files(args.files)
        .with_clean_staging(args.clean)
        .with_cancellation(cancel);
    if let Some(id) = args.session {
        options = options.with_session_id(id);
    }

    let use_case = PublishUseCase::new(
        content.clone(),
        content.clone(),
        content,
        TomlServerStore::new(&args.config),
        PublishSettings::from_config(&config),
    )
    .with_extensions(extensions);

    let reporter: Box<dyn ProgressReporter> = if json {
        Box::new(JsonReporter::stdout())
    } else {
        Box::new(ConsoleReporter::stderr(verbose > 0))
    };

    let report = use_case.publish(&options, reporter.as_ref());
    if !json {
        print_summary(&report, &config.sync_root);
    }

    match report.error {
        Some(e) => Err(e).with_context(|| format!("publish to '{}' failed", args.server)),
        None => Ok(()),
    }
}

/// Explicit ids, or every top-level manifest item with its descendants
fn requested_items(content: &ManifestContent, ids: &[String], descendants: bool) -> Vec<PublishItem> {
    if ids.is_empty() {
        return content
            .items()
            .iter()
            .filter(|item| item.parent.is_none())
            .map(|item| PublishItem::new(item.id.clone()).with_descendants(true))
            .collect();
    }
    ids.iter()
        .map(|id| PublishItem::new(id.clone()).with_descendants(descendants))
        .collect()
}

fn print_summary(report: &PublishReport, sync_root: &std::path::Path) {
    eprintln!(
        "  pages: {} written, {} skipped; media: {}; files: {} written, {} failed",
        report.pages_written,
        report.pages_skipped,
        report.media_saved,
        report.files_written,
        report.files_failed
    );
    if !report.is_success() && !report.completed_steps.is_empty() {
        eprintln!(
            "  staging kept at {}",
            sync_root.join(report.session_id.to_string()).display()
        );
    }
}
