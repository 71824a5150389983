//! Reusable site content for integration tests.

use super::TestEnv;

/// Staging root configured by `SITE_CONFIG`
pub const STAGING_DIR: &str = "staging";

/// Folder the `local` server copies into
pub const OUTPUT_DIR: &str = "out";

pub const SITE_CONFIG: &str = r#"
sync_root = "staging"
site_root = "."

[[servers]]
alias = "local"
name = "Local preview"
deployer = { alias = "folder", folder = "out" }

[[servers]]
alias = "nowhere"
deployer = { alias = "carrier-pigeon" }

[[servers]]
alias = "unset"
deployer = { alias = "folder" }

[sitemap]
base_url = "https://example.com"
"#;

pub const SITE_MANIFEST: &str = r#"
[[items]]
id = "home"
kind = "document"
name = "Home"
path = "/home"
source = "pages/home.html"
depends_on = ["logo"]

[[items]]
id = "about"
kind = "document"
name = "About"
path = "/home/about"
source = "pages/about.html"
parent = "home"

[[items]]
id = "draft"
kind = "document"
name = "Draft"
path = "/home/draft"
source = "pages/draft.html"
parent = "home"
published = false

[[items]]
id = "logo"
kind = "media"
name = "Logo"
path = "media/logo.png"
source = "assets/logo.png"
"#;

pub const HOME_HTML: &str = "<html><body><h1>Home</h1></body></html>";
pub const ABOUT_HTML: &str = "<html><body><h1>About</h1></body></html>";

/// A complete site: config, manifest, two pages, one draft, a logo and css
pub fn site() -> TestEnv {
    let env = TestEnv::new();
    env.write("sitepush.toml", SITE_CONFIG);
    env.write("site.toml", SITE_MANIFEST);
    env.write("pages/home.html", HOME_HTML);
    env.write("pages/about.html", ABOUT_HTML);
    env.write("pages/draft.html", "<p>not yet</p>");
    env.write("assets/logo.png", "PNG");
    env.write("css/site.css", "body { margin: 0 }");
    env
}
