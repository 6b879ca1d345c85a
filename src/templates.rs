//! # Template Cache
//!
//! Every page template is parsed once at startup, together with the shared
//! layout and partial fragments it merges with, and kept in an immutable
//! cache keyed by page name. Request handlers only ever look templates up;
//! nothing is parsed (or mutated) after the build, which is what makes the
//! cache safe to share across requests without locking.
//!
//! ## Naming convention
//! The template directory holds three kinds of file:
//! - `*.page.html`: route-specific content, the names handlers render by
//!   (e.g. `home.page`)
//! - `*.layout.html`: shared chrome that pages extend
//! - `*.partial.html`: shared fragments that layouts/pages include
//!
//! ## Failure policy
//! The build is all-or-nothing. A file that fails to parse, a page that
//! extends or includes a fragment missing from the directory, or a directory
//! with no layout at all each abort startup. There is no degraded cache.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tera::{Context, Tera, Value};
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::db::models::Snippet;
use crate::forms::Form;

/// Errors raised while building or using the template cache.
///
/// Everything here is an internal/configuration error. Clients never see the
/// detail; a render-time failure surfaces as a generic 500.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("reading template directory {path}: {source}")]
    ReadDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no *.layout.html template found in {0}")]
    MissingLayout(String),

    #[error("template {name} references {fragment}, which is not in the template directory")]
    MissingFragment { name: String, fragment: String },

    #[error("the template {name} does not exist in the cache")]
    MissingTemplate { name: String },

    #[error("parsing templates: {0}")]
    Parse(#[from] tera::Error),

    #[error("rendering {name}: {source}")]
    Render {
        name: String,
        #[source]
        source: tera::Error,
    },
}

/// A filter callable from inside templates.
pub type TemplateFilter = fn(&Value, &HashMap<String, Value>) -> tera::Result<Value>;

/// The function table registered into the cache at build time.
///
/// This is an explicit configuration value handed to `TemplateCache::build`,
/// not a process-global registry, so the builder has no hidden state and
/// tests can pass a custom table.
#[derive(Clone)]
pub struct TemplateFuncs {
    filters: Vec<(&'static str, TemplateFilter)>,
}

impl TemplateFuncs {
    /// The standard table used by the running server. Currently just
    /// `human_date`.
    pub fn standard() -> Self {
        Self { filters: vec![("human_date", human_date)] }
    }

    /// An empty table, for tests that want full control.
    pub fn none() -> Self {
        Self { filters: Vec::new() }
    }

    pub fn with_filter(mut self, name: &'static str, filter: TemplateFilter) -> Self {
        self.filters.push((name, filter));
        self
    }
}

/// Format an RFC 3339 timestamp as a human-readable date.
///
/// `"2022-01-02T15:04:05Z"` becomes `"02 Jan 2022 at 15:04"`. Snippet
/// timestamps serialize as RFC 3339 strings, so this is what templates see.
fn human_date(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let raw = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("human_date expects an RFC 3339 string"))?;
    let parsed = OffsetDateTime::parse(raw, &Rfc3339)
        .map_err(|e| tera::Error::msg(format!("human_date: {e}")))?;

    let format = format_description!("[day] [month repr:short] [year] at [hour]:[minute]");
    let formatted = parsed
        .format(&format)
        .map_err(|e| tera::Error::msg(format!("human_date: {e}")))?;

    Ok(Value::String(formatted))
}

/// The dynamic data handed to a render call.
///
/// Handlers fill in their specific payload (a snippet, the latest snippets,
/// a form); the render helper injects the ambient fields (current year,
/// pending flash message, authentication flag) on every call. Constructed
/// fresh per render, never shared across requests.
#[derive(Debug, Default, Serialize)]
pub struct TemplateData {
    pub current_year: i32,
    pub flash: Option<String>,
    pub is_authenticated: bool,
    pub snippet: Option<Snippet>,
    pub snippets: Vec<Snippet>,
    pub form: Option<Form>,
}

// Matches {% extends "..." %} and {% include "..." %} so the build can
// verify every referenced fragment was actually loaded.
static FRAGMENT_REF_RX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{%-?\s*(?:extends|include)\s+"([^"]+)""#).expect("fragment pattern is a valid regex")
});

/// The immutable, startup-built mapping of page name to pre-parsed template
/// set. Cheap to share behind an `Arc`; read-only after `build` returns.
#[derive(Debug)]
pub struct TemplateCache {
    tera: Tera,
}

impl TemplateCache {
    /// Scan `dir` and parse every page, layout, and partial into one cache.
    ///
    /// Fails if the directory is unreadable, holds no layout, any template
    /// fails to parse, or any `extends`/`include` target is missing from the
    /// directory. Callers are expected to abort startup on error.
    pub fn build(dir: &Path, funcs: TemplateFuncs) -> Result<Self, TemplateError> {
        let read_err = |source| TemplateError::ReadDir { path: dir.display().to_string(), source };

        // Gather (name, source) for every template file in the directory.
        let mut sources: Vec<(String, String)> = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(read_err)? {
            let path = entry.map_err(read_err)?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.ends_with(".page.html")
                || name.ends_with(".layout.html")
                || name.ends_with(".partial.html")
            {
                let source = std::fs::read_to_string(&path).map_err(read_err)?;
                sources.push((name.to_string(), source));
            }
        }

        if !sources.iter().any(|(name, _)| name.ends_with(".layout.html")) {
            return Err(TemplateError::MissingLayout(dir.display().to_string()));
        }

        // The engine reports a missing `extends` parent on its own, but a
        // missing `include` target only fails at render time. Checking both
        // here keeps the all-or-nothing build guarantee.
        let loaded: HashSet<&str> = sources.iter().map(|(name, _)| name.as_str()).collect();
        for (name, source) in &sources {
            for capture in FRAGMENT_REF_RX.captures_iter(source) {
                let fragment = &capture[1];
                if !loaded.contains(fragment) {
                    return Err(TemplateError::MissingFragment {
                        name: name.clone(),
                        fragment: fragment.to_string(),
                    });
                }
            }
        }

        let mut tera = Tera::default();
        for (name, filter) in &funcs.filters {
            tera.register_filter(name, *filter);
        }
        tera.add_raw_templates(sources)?;

        Ok(Self { tera })
    }

    /// Render the named page (e.g. `"home.page"`) with the given data.
    ///
    /// An unknown name is a programmer/configuration error and reported as
    /// such, never as a client error. The output is produced into an owned
    /// buffer, so a mid-render failure yields a clean error instead of a
    /// truncated page on the wire.
    pub fn render(&self, name: &str, data: &TemplateData) -> Result<String, TemplateError> {
        let file = format!("{name}.html");
        if !self.tera.get_template_names().any(|loaded| loaded == file) {
            return Err(TemplateError::MissingTemplate { name: name.to_string() });
        }

        let context = Context::from_serialize(data)
            .map_err(|source| TemplateError::Render { name: name.to_string(), source })?;
        self.tera
            .render(&file, &context)
            .map_err(|source| TemplateError::Render { name: name.to_string(), source })
    }
}
