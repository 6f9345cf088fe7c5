// SPDX-License-Identifier: GPL-3.0-only

//! Filter preview handlers
//!
//! Decoded stills are rendered once per filter on demand and cached for the
//! current capture, so switching back to a filter is immediate.

use crate::app::state::{AppModel, Message, image_handle};
use crate::backends::media_library::{Album, DirectoryLibrary, MediaLibrary};
use crate::constants::ui;
use crate::filters::FilterType;
use crate::pipelines::photo::{
    DecodedImage, PhotoEncoder, SaveRequest, filter_image, render_filter_thumbnails,
    save_to_library,
};
use cosmic::Task;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

impl AppModel {
    pub(crate) fn handle_photo_decoded(
        &mut self,
        source: PathBuf,
        result: Result<DecodedImage, String>,
    ) -> Task<cosmic::Action<Message>> {
        if !self.session.on_decoded(&source, result) {
            if self.session.captured.is_none() {
                self.preview.reset(None);
            }
            return Task::none();
        }

        let Some(decoded) = self.session.decoded_for_capture().cloned() else {
            return Task::none();
        };

        info!(
            width = decoded.width,
            height = decoded.height,
            "Showing filter preview"
        );
        self.preview
            .filtered
            .insert(FilterType::Normal, image_handle(&decoded));

        let thumbnails_source = source.clone();
        let thumbnails = Task::perform(
            render_filter_thumbnails(decoded, ui::FILTER_THUMBNAIL_SIZE),
            move |thumbnails| {
                cosmic::Action::App(Message::ThumbnailsRendered(
                    thumbnails_source.clone(),
                    thumbnails,
                ))
            },
        );

        Task::batch([thumbnails, self.render_selected_filter()])
    }

    /// Render the selected filter for the current capture unless cached
    fn render_selected_filter(&self) -> Task<cosmic::Action<Message>> {
        let filter = self.session.selected_filter;
        if self.preview.filtered.contains_key(&filter) {
            return Task::none();
        }
        let Some(decoded) = self.session.decoded_for_capture().cloned() else {
            return Task::none();
        };

        debug!(%filter, "Rendering filter preview");
        Task::perform(
            async move {
                let filtered = filter_image(&decoded, filter).await;
                (decoded.source, filter, filtered)
            },
            |(source, filter, image)| {
                cosmic::Action::App(Message::FilterRendered(source, filter, image))
            },
        )
    }

    pub(crate) fn handle_filter_rendered(
        &mut self,
        source: PathBuf,
        filter: FilterType,
        image: DecodedImage,
    ) -> Task<cosmic::Action<Message>> {
        if self.preview.is_for(&source) {
            self.preview.filtered.insert(filter, image_handle(&image));
        }
        Task::none()
    }

    pub(crate) fn handle_thumbnails_rendered(
        &mut self,
        source: PathBuf,
        thumbnails: HashMap<FilterType, DecodedImage>,
    ) -> Task<cosmic::Action<Message>> {
        if self.preview.is_for(&source) {
            self.preview.thumbnails = thumbnails
                .iter()
                .map(|(filter, image)| (*filter, image_handle(image)))
                .collect();
        }
        Task::none()
    }

    pub(crate) fn handle_select_filter(&mut self, filter: FilterType) -> Task<cosmic::Action<Message>> {
        self.session.select_filter(filter);
        info!(%filter, "Filter selected");
        self.render_selected_filter()
    }

    /// Discard the capture and go back to the live camera
    ///
    /// A save in flight still completes with the capture it was given.
    pub(crate) fn handle_retake(&mut self) -> Task<cosmic::Action<Message>> {
        info!("Retake");
        self.session.retake();
        self.preview.reset(None);
        Task::none()
    }

    /// Import the capture into the library and file it into the album
    pub(crate) fn handle_save(&mut self) -> Task<cosmic::Action<Message>> {
        let Some(captured) = self.session.begin_save() else {
            info!("Save ignored");
            return Task::none();
        };

        let library: Arc<dyn MediaLibrary> = Arc::new(DirectoryLibrary::new(
            crate::storage::library_root(),
        ));
        let request = SaveRequest {
            captured,
            album: self.config.effective_album_name().to_string(),
            filter: self.session.selected_filter,
            bake_filter: self.config.bake_filter_on_save,
            encoder: PhotoEncoder::new(self.config.effective_jpeg_quality()),
        };
        info!(album = %request.album, filter = %request.filter, "Saving photo");

        Task::perform(
            async move {
                save_to_library(library, request)
                    .await
                    .map(|saved| saved.album)
                    .map_err(|e| e.to_string())
            },
            |result| cosmic::Action::App(Message::PhotoSaved(result)),
        )
    }

    pub(crate) fn handle_photo_saved(
        &mut self,
        result: Result<Album, String>,
    ) -> Task<cosmic::Action<Message>> {
        let succeeded = result.is_ok();
        self.session.on_saved(result);
        if succeeded {
            self.preview.reset(None);
        }
        Task::none()
    }
}
