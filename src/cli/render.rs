//! Render templates to stdout or a file.
//!
//! Every page and every `--partial` are registered together, so a page can
//! `{% extends %}` or `{% include %}` any other template by its name. Names
//! are the file paths relative to `--root` (or as given when no root is set),
//! with `/` separators and any leading `./` dropped.
//!
//! The base context is built once; each page is rendered with its own copy,
//! in the order given, and the results are written one after another.

use anyhow::{Context as _, Result};
use clap::Args;
use std::path::{Component, Path, PathBuf};

use crate::config::RenderOptions;
use crate::core::TplcError;
use crate::templating::{
    Context, TemplateRenderer, TemplateSource, build_base_context, parse_data,
};

/// Render one or more templates.
#[derive(Args, Debug)]
pub struct RenderCommand {
    /// Templates to render, in output order
    #[arg(required = true, value_name = "TEMPLATE")]
    pub templates: Vec<PathBuf>,

    /// JSON data file; its top-level object becomes the base context
    #[arg(short, long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Partial or layout template to register without rendering it (repeatable)
    #[arg(short, long = "partial", value_name = "FILE")]
    pub partials: Vec<PathBuf>,

    /// JSON renderer options file
    #[arg(long, value_name = "FILE")]
    pub options: Option<PathBuf>,

    /// Write the result here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Directory template names are relative to
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Do not expose environment variables under `env`
    #[arg(long)]
    pub no_env: bool,
}

impl RenderCommand {
    pub async fn execute(self) -> Result<()> {
        let options = self.load_options().await?;
        let base = self.load_base_context().await?;

        let mut sources = Vec::with_capacity(self.templates.len() + self.partials.len());
        let mut pages = Vec::with_capacity(self.templates.len());
        for template in &self.templates {
            let source = self.load_source(template).await?;
            pages.push(source.name.clone());
            sources.push(source);
        }
        for partial in &self.partials {
            let source = self.load_source(partial).await?;
            if pages.contains(&source.name) {
                return Err(TplcError::InvalidArgument {
                    message: format!("'{}' is given both as a template and a partial", source.name),
                }
                .into());
            }
            sources.push(source);
        }

        let mut renderer = TemplateRenderer::new(&options)?;
        renderer.add_templates(sources)?;

        let mut rendered = String::new();
        for page in &pages {
            let output = renderer.render(page, &base)?;
            tracing::info!("Rendered '{}' ({} bytes)", page, output.len());
            rendered.push_str(&output);
        }

        match &self.output {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent).await.with_context(|| {
                        format!("Failed to create output directory {}", parent.display())
                    })?;
                }
                tokio::fs::write(path, rendered)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
            None => print!("{}", rendered),
        }

        Ok(())
    }

    async fn load_options(&self) -> Result<RenderOptions> {
        let Some(path) = &self.options else {
            return Ok(RenderOptions::default());
        };

        let content = read_file(path).await?;
        Ok(RenderOptions::from_json(&content, &path.display().to_string())?)
    }

    async fn load_base_context(&self) -> Result<Context> {
        let data = match &self.data {
            Some(path) => {
                let content = read_file(path).await?;
                Some(parse_data(&content, &path.display().to_string())?)
            }
            None => None,
        };

        Ok(build_base_context(data, !self.no_env))
    }

    async fn load_source(&self, path: &Path) -> Result<TemplateSource> {
        let content = read_file(path).await?;
        let name = template_name(path, self.root.as_deref());
        tracing::debug!("Loaded {} as '{}'", path.display(), name);
        Ok(TemplateSource::new(name, content).with_path(path))
    }
}

async fn read_file(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// Name a template is registered under.
///
/// Relative to `root` when the path lies inside it; otherwise relative paths
/// are kept and absolute paths fall back to their file name.
pub(crate) fn template_name(path: &Path, root: Option<&Path>) -> String {
    let relative = root
        .and_then(|root| {
            path.strip_prefix(root).ok().or_else(|| {
                // `./a.tpl` and `a.tpl` should both sit under root `.`
                let stripped = strip_current_dir(path);
                stripped.strip_prefix(strip_current_dir(root)).ok()
            })
        })
        .unwrap_or(path);

    if relative.is_absolute() {
        return relative
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| relative.display().to_string());
    }

    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn strip_current_dir(path: &Path) -> &Path {
    path.strip_prefix(".").unwrap_or(path)
}
