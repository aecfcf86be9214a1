//! Editor state: the current image, its provenance and the caption settings.

use std::path::{Path, PathBuf};

use crate::{
    assets::{
        decode::SourceImage,
        source::{ImageLoader, ImageSelection, LoadTicket, load_from_path, load_from_url},
    },
    export,
    foundation::error::{MemeError, MemeResult},
    render::{
        canvas::Canvas,
        compositor::{Compositor, RenderSummary},
        config::RenderConfig,
    },
    search::model::Attribution,
};

/// Shown in place of the canvas when an image fails to load.
pub const LOAD_ERROR_MESSAGE: &str = "Error loading image. Please try again.";

/// Result of handing a finished load to the session.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadOutcome {
    /// The image was accepted and rendered immediately.
    Loaded(RenderSummary),
    /// The image could not be used; generation stays disabled until the next successful load.
    Failed(String),
    /// A newer load started in the meantime; nothing changed.
    Stale,
}

/// Owns the current image and config and feeds them to a stateless [`Compositor`].
pub struct EditorSession<C> {
    compositor: Compositor,
    loader: ImageLoader,
    image: Option<SourceImage>,
    selection: Option<ImageSelection>,
    config: RenderConfig,
    canvas: C,
    last_render: Option<RenderSummary>,
}

impl<C: Canvas> EditorSession<C> {
    pub fn new(canvas: C) -> Self {
        Self::with_compositor(canvas, Compositor::default())
    }

    pub fn with_compositor(canvas: C, compositor: Compositor) -> Self {
        Self {
            compositor,
            loader: ImageLoader::new(),
            image: None,
            selection: None,
            config: RenderConfig::default(),
            canvas,
            last_render: None,
        }
    }

    /// Start a load. Any load still in flight becomes stale.
    pub fn begin_load(&self) -> LoadTicket {
        self.loader.begin()
    }

    /// Shared handle to the generation counter, for loads driven outside the session.
    pub fn loader(&self) -> ImageLoader {
        self.loader.clone()
    }

    /// Accept the result of the load identified by `ticket`.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: MemeResult<SourceImage>,
        selection: ImageSelection,
    ) -> LoadOutcome {
        let Some(result) = self.loader.complete(ticket, result) else {
            return LoadOutcome::Stale;
        };

        match result {
            Ok(image) => {
                self.image = Some(image);
                self.selection = Some(selection);
                match self.generate() {
                    Ok(summary) => LoadOutcome::Loaded(summary),
                    Err(e) => {
                        tracing::error!(error = %e, "render after load failed");
                        self.clear_image();
                        LoadOutcome::Failed(LOAD_ERROR_MESSAGE.to_string())
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "image load failed");
                self.clear_image();
                LoadOutcome::Failed(LOAD_ERROR_MESSAGE.to_string())
            }
        }
    }

    /// Load a local file, as an upload.
    pub fn load_path(&mut self, path: &Path) -> LoadOutcome {
        let ticket = self.begin_load();
        let result = load_from_path(path);
        self.finish_load(ticket, result, ImageSelection::Upload)
    }

    /// Fetch and load a remote image or data URI.
    pub async fn load_url(
        &mut self,
        http: &reqwest::Client,
        url: &str,
        selection: ImageSelection,
    ) -> LoadOutcome {
        let ticket = self.begin_load();
        let result = load_from_url(http, url).await;
        self.finish_load(ticket, result, selection)
    }

    fn clear_image(&mut self) {
        self.image = None;
        self.selection = None;
        self.last_render = None;
    }

    pub fn can_generate(&self) -> bool {
        self.image.is_some()
    }

    pub fn image(&self) -> Option<&SourceImage> {
        self.image.as_ref()
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Replace the settings used by the next [`EditorSession::generate`].
    pub fn set_config(&mut self, config: RenderConfig) {
        self.config = config;
    }

    /// Render the current image with the current config.
    pub fn generate(&mut self) -> MemeResult<RenderSummary> {
        let image = self
            .image
            .as_ref()
            .ok_or_else(|| MemeError::validation("no image loaded"))?;
        let summary = self.compositor.render(image, &self.config, &mut self.canvas)?;
        self.last_render = Some(summary);
        Ok(summary)
    }

    pub fn last_render(&self) -> Option<RenderSummary> {
        self.last_render
    }

    /// Credit line for search selections; uploads have none.
    pub fn attribution(&self) -> Option<Attribution> {
        self.selection.as_ref().and_then(ImageSelection::attribution)
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    fn rendered_canvas(&mut self) -> MemeResult<&mut C> {
        if self.last_render.is_none() {
            return Err(MemeError::validation("nothing rendered yet"));
        }
        Ok(&mut self.canvas)
    }

    pub fn to_png(&mut self) -> MemeResult<Vec<u8>> {
        export::to_png(self.rendered_canvas()?)
    }

    pub fn to_data_uri(&mut self) -> MemeResult<String> {
        export::to_data_uri(self.rendered_canvas()?)
    }

    pub fn save_png(&mut self, path: &Path) -> MemeResult<PathBuf> {
        export::save_png(self.rendered_canvas()?, path)
    }
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
