//! Built-in publish extensions

mod sitemap;

pub use sitemap::SitemapExtension;
