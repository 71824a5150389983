//! Extension Hook Chain
//!
//! `ExtensionRegistry` holds the registered extensions in order. Each publish
//! run calls `start_session()` to get an `ExtensionChain` with one empty state
//! slot per extension, so state never leaks between runs or extensions.
//!
//! Every hook call is an isolation boundary: an error or panic from one
//! extension is logged and the chain moves on to the next extension.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, warn};

use crate::domain::entities::{Dependency, RenderedPage, StagingFiles};
use crate::domain::ports::{ExtensionContext, PageTransform, PublishExtension};
use crate::domain::value_objects::PublishStep;

/// Type-erased view of one extension bound to its session state
trait SessionHooks: Send {
    fn initialize(&mut self, ctx: &ExtensionContext<'_>) -> Result<()>;
    fn transform_dependencies(&mut self, dependencies: &mut Vec<Dependency>) -> Result<()>;
    fn transform_html(&mut self, content: &Dependency, page: &RenderedPage)
        -> Result<PageTransform>;
    fn transform_media(&mut self, media: &Dependency, staged_path: &Path) -> Result<()>;
    fn transform_custom_files(&mut self, files: &mut StagingFiles) -> Result<()>;
    fn step_completed(&mut self, step: PublishStep) -> Result<()>;
    fn push_complete(&mut self) -> Result<()>;
}

struct ExtensionSlot<E: PublishExtension> {
    extension: Arc<E>,
    state: Option<E::State>,
}

impl<E: PublishExtension> SessionHooks for ExtensionSlot<E> {
    fn initialize(&mut self, ctx: &ExtensionContext<'_>) -> Result<()> {
        self.state = None;
        self.state = Some(self.extension.initialize(ctx)?);
        Ok(())
    }

    fn transform_dependencies(&mut self, dependencies: &mut Vec<Dependency>) -> Result<()> {
        self.extension
            .transform_dependencies(self.state.as_mut(), dependencies)
    }

    fn transform_html(
        &mut self,
        content: &Dependency,
        page: &RenderedPage,
    ) -> Result<PageTransform> {
        self.extension
            .transform_html(self.state.as_mut(), content, page)
    }

    fn transform_media(&mut self, media: &Dependency, staged_path: &Path) -> Result<()> {
        self.extension
            .transform_media(self.state.as_mut(), media, staged_path)
    }

    fn transform_custom_files(&mut self, files: &mut StagingFiles) -> Result<()> {
        self.extension
            .transform_custom_files(self.state.as_mut(), files)
    }

    fn step_completed(&mut self, step: PublishStep) -> Result<()> {
        self.extension.step_completed(self.state.as_mut(), step)
    }

    fn push_complete(&mut self) -> Result<()> {
        self.extension.push_complete(self.state.as_mut())
    }
}

type SlotFactory = Box<dyn Fn() -> Box<dyn SessionHooks> + Send + Sync>;

struct Registration {
    name: String,
    factory: SlotFactory,
}

/// Ordered set of extensions, in registration order
#[derive(Default)]
pub struct ExtensionRegistry {
    registrations: Vec<Registration>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an extension to the end of the chain
    pub fn register<E: PublishExtension>(&mut self, extension: E) -> &mut Self {
        let name = extension.name().to_string();
        let extension = Arc::new(extension);
        self.registrations.push(Registration {
            name,
            factory: Box::new(move || {
                Box::new(ExtensionSlot {
                    extension: Arc::clone(&extension),
                    state: None,
                })
            }),
        });
        self
    }

    pub fn with<E: PublishExtension>(mut self, extension: E) -> Self {
        self.register(extension);
        self
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.registrations.iter().map(|r| r.name.as_str())
    }

    /// Fresh chain with empty state slots for one publish run
    pub fn start_session(&self) -> ExtensionChain {
        ExtensionChain {
            slots: self
                .registrations
                .iter()
                .map(|r| Slot {
                    name: r.name.clone(),
                    hooks: (r.factory)(),
                })
                .collect(),
        }
    }
}

struct Slot {
    name: String,
    hooks: Box<dyn SessionHooks>,
}

/// The extensions of one publish run with their session state
pub struct ExtensionChain {
    slots: Vec<Slot>,
}

impl ExtensionChain {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Initialize every extension once, in order. A failure leaves that
    /// extension without state; it still receives later hooks.
    pub fn initialize(&mut self, ctx: &ExtensionContext<'_>) {
        for slot in &mut self.slots {
            isolate(&slot.name, "initialize", || slot.hooks.initialize(ctx));
        }
    }

    pub fn transform_dependencies(&mut self, dependencies: &mut Vec<Dependency>) {
        for slot in &mut self.slots {
            isolate(&slot.name, "transform_dependencies", || {
                slot.hooks.transform_dependencies(dependencies)
            });
        }
    }

    /// Run the html transforms in order. `None` means an extension dropped
    /// the page; later extensions are not asked about it.
    pub fn transform_html(
        &mut self,
        content: &Dependency,
        page: RenderedPage,
    ) -> Option<RenderedPage> {
        let mut page = page;
        for slot in &mut self.slots {
            let outcome = isolate(&slot.name, "transform_html", || {
                slot.hooks.transform_html(content, &page)
            });
            match outcome {
                Some(PageTransform::Rewrite(rewritten)) => page = rewritten,
                Some(PageTransform::Skip) => {
                    debug!(extension = %slot.name, item = %content.id, "page dropped by extension");
                    return None;
                }
                Some(PageTransform::Unchanged) | None => {}
            }
        }
        Some(page)
    }

    pub fn transform_media(&mut self, media: &Dependency, staged_path: &Path) {
        for slot in &mut self.slots {
            isolate(&slot.name, "transform_media", || {
                slot.hooks.transform_media(media, staged_path)
            });
        }
    }

    pub fn transform_custom_files(&mut self, files: &mut StagingFiles) {
        for slot in &mut self.slots {
            isolate(&slot.name, "transform_custom_files", || {
                slot.hooks.transform_custom_files(files)
            });
        }
    }

    pub fn step_completed(&mut self, step: PublishStep) {
        for slot in &mut self.slots {
            isolate(&slot.name, "step_completed", || slot.hooks.step_completed(step));
        }
    }

    pub fn push_complete(&mut self) {
        for slot in &mut self.slots {
            isolate(&slot.name, "push_complete", || slot.hooks.push_complete());
        }
    }
}

/// Run one hook, turning errors and panics into a logged `None`
fn isolate<T>(extension: &str, hook: &'static str, f: impl FnOnce() -> Result<T>) -> Option<T> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Some(value),
        Ok(Err(error)) => {
            warn!(extension, hook, error = %format!("{:#}", error), "extension hook failed");
            None
        }
        Err(payload) => {
            warn!(extension, hook, panic = %panic_message(payload.as_ref()), "extension hook panicked");
            None
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DeployerSettings, ServerConfig};
    use crate::domain::entities::{CustomFile, PublishSession};
    use std::sync::Mutex;

    /// Appends its marker to dependencies and html
    struct Marker {
        marker: &'static str,
    }

    impl PublishExtension for Marker {
        type State = Vec<String>;

        fn name(&self) -> &str {
            self.marker
        }

        fn initialize(&self, _ctx: &ExtensionContext<'_>) -> Result<Self::State> {
            Ok(Vec::new())
        }

        fn transform_dependencies(
            &self,
            state: Option<&mut Self::State>,
            dependencies: &mut Vec<Dependency>,
        ) -> Result<()> {
            let seen: Vec<String> = dependencies.iter().map(|d| d.id.clone()).collect();
            if let Some(state) = state {
                *state = seen;
            }
            dependencies.push(Dependency::document(self.marker, self.marker));
            Ok(())
        }

        fn transform_html(
            &self,
            _state: Option<&mut Self::State>,
            _content: &Dependency,
            page: &RenderedPage,
        ) -> Result<PageTransform> {
            Ok(PageTransform::Rewrite(
                page.clone().with_html(format!("{}[{}]", page.html, self.marker)),
            ))
        }
    }

    /// Records which hooks ran and whether state was present
    struct Probe {
        fail_init: bool,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl PublishExtension for Probe {
        type State = u32;

        fn name(&self) -> &str {
            "probe"
        }

        fn initialize(&self, _ctx: &ExtensionContext<'_>) -> Result<Self::State> {
            if self.fail_init {
                anyhow::bail!("cannot start");
            }
            Ok(0)
        }

        fn step_completed(&self, state: Option<&mut Self::State>, step: PublishStep) -> Result<()> {
            let entry = match state {
                Some(count) => {
                    *count += 1;
                    format!("{}:{}", step, count)
                }
                None => format!("{}:none", step),
            };
            self.log.lock().unwrap().push(entry);
            Ok(())
        }

        fn push_complete(&self, _state: Option<&mut Self::State>) -> Result<()> {
            self.log.lock().unwrap().push("done".to_string());
            Ok(())
        }
    }

    struct Panicky;

    impl PublishExtension for Panicky {
        type State = ();

        fn name(&self) -> &str {
            "panicky"
        }

        fn initialize(&self, _ctx: &ExtensionContext<'_>) -> Result<()> {
            panic!("boom");
        }

        fn transform_custom_files(&self, _state: Option<&mut ()>, _files: &mut StagingFiles) -> Result<()> {
            panic!("boom again");
        }
    }

    struct Dropper;

    impl PublishExtension for Dropper {
        type State = ();

        fn name(&self) -> &str {
            "dropper"
        }

        fn initialize(&self, _ctx: &ExtensionContext<'_>) -> Result<()> {
            Ok(())
        }

        fn transform_html(
            &self,
            _state: Option<&mut ()>,
            content: &Dependency,
            _page: &RenderedPage,
        ) -> Result<PageTransform> {
            if content.id == "drop-me" {
                Ok(PageTransform::Skip)
            } else {
                Ok(PageTransform::Unchanged)
            }
        }

        fn transform_custom_files(&self, _state: Option<&mut ()>, files: &mut StagingFiles) -> Result<()> {
            files.custom.push(CustomFile::from_bytes("robots.txt", "User-agent: *"));
            Ok(())
        }
    }

    fn init(chain: &mut ExtensionChain) {
        let session = PublishSession::start(None, "/tmp/pack");
        let server = ServerConfig::new("local", DeployerSettings::new("folder"));
        let ctx = ExtensionContext {
            session: &session,
            destination: "local",
            items: &[],
            include_files: true,
            server: &server,
        };
        chain.initialize(&ctx);
    }

    #[test]
    fn dependency_transforms_see_earlier_mutations() {
        let registry = ExtensionRegistry::new()
            .with(Marker { marker: "A" })
            .with(Marker { marker: "B" });
        let mut chain = registry.start_session();
        init(&mut chain);

        let mut deps = vec![Dependency::document("1", "Home")];
        chain.transform_dependencies(&mut deps);

        let ids: Vec<&str> = deps.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "A", "B"]);
    }

    #[test]
    fn html_transforms_chain_in_order() {
        let registry = ExtensionRegistry::new()
            .with(Marker { marker: "A" })
            .with(Marker { marker: "B" });
        let mut chain = registry.start_session();
        init(&mut chain);

        let page = chain
            .transform_html(&Dependency::document("1", "Home"), RenderedPage::new("/", "x"))
            .unwrap();
        assert_eq!(page.html, "x[A][B]");
    }

    #[test]
    fn skip_drops_page_and_stops_chain() {
        let registry = ExtensionRegistry::new()
            .with(Dropper)
            .with(Marker { marker: "A" });
        let mut chain = registry.start_session();
        init(&mut chain);

        let dropped = chain.transform_html(
            &Dependency::document("drop-me", "Gone"),
            RenderedPage::new("/gone", "x"),
        );
        assert!(dropped.is_none());

        let kept = chain
            .transform_html(&Dependency::document("keep", "Kept"), RenderedPage::new("/k", "x"))
            .unwrap();
        assert_eq!(kept.html, "x[A]");
    }

    #[test]
    fn failed_initialize_does_not_block_others() {
        let failing_log = Arc::new(Mutex::new(Vec::new()));
        let healthy_log = Arc::new(Mutex::new(Vec::new()));
        let registry = ExtensionRegistry::new()
            .with(Probe {
                fail_init: true,
                log: failing_log.clone(),
            })
            .with(Panicky)
            .with(Probe {
                fail_init: false,
                log: healthy_log.clone(),
            });
        let mut chain = registry.start_session();
        init(&mut chain);

        chain.step_completed(PublishStep::Calculate);
        chain.step_completed(PublishStep::Upload);
        chain.push_complete();

        assert_eq!(
            *failing_log.lock().unwrap(),
            vec!["Calculate:none", "Upload:none", "done"]
        );
        assert_eq!(
            *healthy_log.lock().unwrap(),
            vec!["Calculate:1", "Upload:2", "done"]
        );
    }

    #[test]
    fn panicking_hook_is_isolated() {
        let registry = ExtensionRegistry::new().with(Panicky).with(Dropper);
        let mut chain = registry.start_session();
        init(&mut chain);

        let mut files = StagingFiles::default();
        chain.transform_custom_files(&mut files);

        assert_eq!(files.custom.len(), 1);
        assert_eq!(files.custom[0].path, "robots.txt");
    }

    #[test]
    fn sessions_do_not_share_state() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = ExtensionRegistry::new().with(Probe {
            fail_init: false,
            log: log.clone(),
        });

        let mut first = registry.start_session();
        init(&mut first);
        first.step_completed(PublishStep::Calculate);

        let mut second = registry.start_session();
        init(&mut second);
        second.step_completed(PublishStep::Calculate);

        assert_eq!(*log.lock().unwrap(), vec!["Calculate:1", "Calculate:1"]);
    }

    #[test]
    fn registry_keeps_registration_order() {
        let registry = ExtensionRegistry::new()
            .with(Marker { marker: "first" })
            .with(Dropper);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["first", "dropper"]);
        assert_eq!(registry.start_session().len(), 2);
    }
}
