//! `docnav resolve` command implementation.

use clap::Args;
use docnav_site::{DocRoutes, Opened};

use super::StoreArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the resolve command.
#[derive(Args)]
pub(crate) struct ResolveArgs {
    /// Document path, with or without the route prefix (e.g., "guide/intro").
    path: String,

    /// Follow redirects and report the final target.
    #[arg(short, long)]
    follow: bool,

    #[command(flatten)]
    store: StoreArgs,
}

impl ResolveArgs {
    /// Execute the resolve command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let (_config, docs) = self.store.open()?;
        let segments = slug_segments(docs.routes(), &self.path);

        if self.follow {
            match docs.open(&segments)? {
                Opened::Page(page) => {
                    output.highlight(&page.href);
                    output.info(&format!("source: {}", page.source));
                }
                Opened::Redirect { to } => output.highlight(&format!("redirect: {to}")),
            }
            return Ok(());
        }

        let resolution = docs.resolve(&segments)?;
        output.result(&serde_json::to_string_pretty(&resolution)?)?;
        Ok(())
    }
}

/// Split a user-supplied path into slug segments.
///
/// Accepts hrefs under the route prefix as well as bare store paths.
fn slug_segments<'a>(routes: &DocRoutes, path: &'a str) -> Vec<&'a str> {
    if let Some(segments) = routes.segments(path) {
        return segments;
    }
    path.split('/').filter(|s| !s.is_empty()).collect()
}
