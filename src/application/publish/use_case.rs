//! Publish Use Case
//!
//! Runs one publish session:
//! 1. Pre-flight: server record, deployer alias, deployer settings
//! 2. Calculate: resolve dependencies, let extensions reshape the list
//! 3. Creating Pages: render each document into the staging tree
//! 4. Gathering Media: copy each media item into the staging tree
//! 5. Files: stage folders, file copies and generated files
//! 6. Upload: hand the staging tree to the deployer
//!
//! A failing step stops the run and leaves the staging tree in place.
//! Cancellation is checked between steps, between items and, through the
//! token handed to `save_files` and the deployer, between files.
//! Per-item page failures and extension failures are logged and skipped.

use tracing::{debug, info, warn};

use crate::application::extensions::{ExtensionChain, ExtensionRegistry};
use crate::application::staging::StagingArea;
use crate::config::ServerConfig;
use crate::domain::entities::{Dependency, PublishSession, RenderedPage, StagingFiles};
use crate::domain::ports::{
    DependencyResolver, DeployError, Deployer, ExtensionContext, MediaStore, PageRenderer,
    ProgressReporter, PublishEvent, ServerConfigStore,
};
use crate::domain::value_objects::PublishStep;
use crate::error::{ConfigError, PublishError, PublishResult, StagingError};
use crate::infrastructure::deployers::DeployerRegistry;

use super::options::{PublishOptions, PublishSettings};
use super::result::PublishReport;

/// Publish use case, parameterized by its content and config ports
pub struct PublishUseCase<R, P, M, S>
where
    R: DependencyResolver,
    P: PageRenderer,
    M: MediaStore,
    S: ServerConfigStore,
{
    resolver: R,
    renderer: P,
    media: M,
    servers: S,
    settings: PublishSettings,
    deployers: DeployerRegistry,
    extensions: ExtensionRegistry,
}

/// State threaded through the steps of one run
struct Run<'a> {
    session: &'a PublishSession,
    server: &'a ServerConfig,
    deployer: &'a dyn Deployer,
    options: &'a PublishOptions,
    reporter: &'a dyn ProgressReporter,
    staging: StagingArea,
    chain: ExtensionChain,
    report: PublishReport,
}

impl Run<'_> {
    fn check_cancelled(&self) -> PublishResult<()> {
        if self.options.cancel.is_cancelled() {
            return Err(PublishError::Cancelled {
                after: self.report.last_completed_step(),
            });
        }
        Ok(())
    }
}

fn staging_failed(step: PublishStep) -> impl FnOnce(StagingError) -> PublishError {
    move |source| PublishError::Staging { step, source }
}

impl<R, P, M, S> PublishUseCase<R, P, M, S>
where
    R: DependencyResolver,
    P: PageRenderer,
    M: MediaStore,
    S: ServerConfigStore,
{
    /// Use case with the default deployers and no extensions
    pub fn new(resolver: R, renderer: P, media: M, servers: S, settings: PublishSettings) -> Self {
        Self {
            resolver,
            renderer,
            media,
            servers,
            settings,
            deployers: DeployerRegistry::with_defaults(),
            extensions: ExtensionRegistry::new(),
        }
    }

    pub fn with_deployers(mut self, deployers: DeployerRegistry) -> Self {
        self.deployers = deployers;
        self
    }

    pub fn with_extensions(mut self, extensions: ExtensionRegistry) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn settings(&self) -> &PublishSettings {
        &self.settings
    }

    /// Run a publish session. The report always carries the session id,
    /// including when pre-flight fails.
    pub fn publish(
        &self,
        options: &PublishOptions,
        reporter: &dyn ProgressReporter,
    ) -> PublishReport {
        let session = PublishSession::start(options.session_id, &self.settings.sync_root);
        reporter.report(PublishEvent::Started {
            session: session.id(),
            destination: options.destination.clone(),
        });

        let (server, deployer) = match self.preflight(&options.destination) {
            Ok(found) => found,
            Err(e) => {
                warn!(destination = %options.destination, error = %e, "publish pre-flight failed");
                let mut report = PublishReport::new(session.id());
                report.error = Some(e.into());
                reporter.report(PublishEvent::Completed {
                    session: session.id(),
                    success: false,
                    transferred: 0,
                });
                return report;
            }
        };

        info!(
            session = %session.id(),
            destination = %server.alias,
            deployer = deployer.alias(),
            "publish started"
        );

        let mut chain = self.extensions.start_session();
        chain.initialize(&ExtensionContext {
            session: &session,
            destination: &options.destination,
            items: &options.items,
            include_files: options.include_files,
            server: &server,
        });

        let mut run = Run {
            session: &session,
            server: &server,
            deployer,
            options,
            reporter,
            staging: StagingArea::new(&self.settings.sync_root),
            chain,
            report: PublishReport::new(session.id()),
        };

        match self.run_steps(&mut run) {
            Ok(()) => {
                run.chain.push_complete();
                if options.clean_staging {
                    if let Err(e) = run.staging.discard(&session) {
                        warn!(session = %session.id(), error = %e, "could not remove staging tree");
                    }
                }
                run.report.success = true;
                info!(
                    session = %session.id(),
                    pages = run.report.pages_written,
                    media = run.report.media_saved,
                    transferred = run.report.transferred,
                    "publish complete"
                );
            }
            Err(e) => {
                warn!(session = %session.id(), error = %e, "publish failed");
                run.report.error = Some(e);
            }
        }

        reporter.report(PublishEvent::Completed {
            session: session.id(),
            success: run.report.success,
            transferred: run.report.transferred,
        });
        run.report
    }

    fn preflight(&self, destination: &str) -> Result<(ServerConfig, &dyn Deployer), ConfigError> {
        let server = self
            .servers
            .server(destination)
            .map_err(|e| ConfigError::Store {
                alias: destination.to_string(),
                message: format!("{:#}", e),
            })?
            .ok_or_else(|| ConfigError::MissingServer {
                alias: destination.to_string(),
            })?;

        let alias = server.deployer.alias.trim();
        if alias.is_empty() {
            return Err(ConfigError::MissingDeployerAlias {
                server: server.alias.clone(),
            });
        }

        let deployer = self
            .deployers
            .get(alias)
            .ok_or_else(|| ConfigError::UnknownDeployer {
                alias: alias.to_string(),
            })?;

        deployer
            .validate(&server.deployer)
            .map_err(|source| ConfigError::InvalidDeployerSettings {
                server: server.alias.clone(),
                source,
            })?;

        Ok((server, deployer))
    }

    fn run_steps(&self, run: &mut Run<'_>) -> PublishResult<()> {
        let mut dependencies = Vec::new();

        for step in PublishStep::ALL {
            run.check_cancelled()?;
            run.reporter.report(PublishEvent::StepStarted { step });
            info!(step = %step, index = step.index(), "step started");

            match step {
                PublishStep::Calculate => dependencies = self.calculate(run)?,
                PublishStep::CreatePages => self.create_pages(run, &dependencies)?,
                PublishStep::GatherMedia => self.gather_media(run, &dependencies)?,
                PublishStep::Files => self.gather_files(run)?,
                PublishStep::Upload => self.upload(run)?,
            }

            run.reporter.report(PublishEvent::StepCompleted { step });
            run.chain.step_completed(step);
            run.report.completed_steps.push(step);
        }

        Ok(())
    }

    fn calculate(&self, run: &mut Run<'_>) -> PublishResult<Vec<Dependency>> {
        run.staging
            .prepare(run.session)
            .map_err(staging_failed(PublishStep::Calculate))?;

        let mut dependencies = self
            .resolver
            .dependencies(&run.options.items, run.reporter)
            .map_err(|e| PublishError::Dependencies {
                message: format!("{:#}", e),
            })?;
        run.chain.transform_dependencies(&mut dependencies);

        info!(count = dependencies.len(), "dependencies calculated");
        Ok(dependencies)
    }

    fn create_pages(&self, run: &mut Run<'_>, dependencies: &[Dependency]) -> PublishResult<()> {
        let pages: Vec<&Dependency> = dependencies.iter().filter(|d| d.is_document()).collect();
        let total = pages.len();

        for (index, page) in pages.into_iter().enumerate() {
            run.check_cancelled()?;
            if self.save_page(run, page, index, total) {
                run.report.pages_written += 1;
            } else {
                run.report.pages_skipped += 1;
            }
        }
        Ok(())
    }

    /// Render and stage one page. `false` when it was skipped.
    fn save_page(&self, run: &mut Run<'_>, content: &Dependency, index: usize, total: usize) -> bool {
        if !self.renderer.is_published(&content.id) {
            debug!(id = %content.id, "not published, skipping");
            return false;
        }

        run.reporter
            .tick(&format!("Generating: {} html", content.name), index + 1, total);

        let html = match self.renderer.render(&content.id) {
            Ok(html) => html,
            Err(e) => {
                warn!(id = %content.id, error = %format!("{:#}", e), "render failed, skipping page");
                return false;
            }
        };
        let page = RenderedPage::new(self.renderer.item_path(&content.id), html);

        let Some(page) = run.chain.transform_html(content, page) else {
            return false;
        };

        match run.staging.save_page(run.session, &page) {
            Ok(_) => true,
            Err(e) => {
                warn!(id = %content.id, path = %page.path, error = %e, "could not stage page");
                false
            }
        }
    }

    fn gather_media(&self, run: &mut Run<'_>, dependencies: &[Dependency]) -> PublishResult<()> {
        let media: Vec<&Dependency> = dependencies.iter().filter(|d| d.is_media()).collect();
        let total = media.len();

        for (index, item) in media.into_iter().enumerate() {
            run.check_cancelled()?;
            run.reporter
                .tick(&format!("Saving: {}", item.name), index + 1, total);

            let staged = run
                .staging
                .save_media(run.session, item, &self.media)
                .map_err(staging_failed(PublishStep::GatherMedia))?;
            run.chain.transform_media(item, &staged);
            run.report.media_saved += 1;
        }
        Ok(())
    }

    fn gather_files(&self, run: &mut Run<'_>) -> PublishResult<()> {
        if !run.options.include_files {
            debug!("files not requested, skipping");
            return Ok(());
        }

        let mut files = StagingFiles::with_folders(run.server.copy_folders());
        run.chain.transform_custom_files(&mut files);

        let report = run.staging.save_files(
            run.session,
            &self.settings.site_root,
            files,
            run.reporter,
            &run.options.cancel,
        );
        if !report.is_success() {
            warn!(failed = report.failures.len(), "some files could not be staged");
        }
        run.report.files_written = report.written;
        run.report.files_failed = report.failures.len();
        if report.cancelled {
            run.check_cancelled()?;
        }
        Ok(())
    }

    fn upload(&self, run: &mut Run<'_>) -> PublishResult<()> {
        let source = run.staging.session_root(run.session);
        let transferred = run
            .deployer
            .deploy(&source, &run.server.deployer, run.reporter, &run.options.cancel)
            .map_err(|e| match e {
                DeployError::Cancelled { transferred } => {
                    warn!(transferred, "upload cancelled");
                    PublishError::Cancelled {
                        after: run.report.last_completed_step(),
                    }
                }
                e => PublishError::Transfer(e),
            })?;

        info!(deployer = run.deployer.alias(), transferred, "upload complete");
        run.report.transferred = transferred;
        Ok(())
    }
}
