// SPDX-License-Identifier: GPL-3.0-only

//! Permission gate handlers

use crate::app::state::{AppModel, Message};
use crate::backends::permissions::{PermissionStatus, request_all};
use cosmic::Task;
use tracing::info;

impl AppModel {
    pub(crate) fn handle_permissions_resolved(
        &mut self,
        camera: PermissionStatus,
        library: PermissionStatus,
    ) -> Task<cosmic::Action<Message>> {
        self.session.set_permissions(camera, library);
        Task::none()
    }

    /// Request camera then library access; retried as often as the user asks
    pub(crate) fn handle_request_permissions(&mut self) -> Task<cosmic::Action<Message>> {
        if !self.session.begin_permission_request() {
            return Task::none();
        }

        info!("Requesting camera and library access");
        let camera = self.camera_access.clone();
        let library = self.library_access.clone();

        Task::perform(
            async move { request_all(&camera, &library).await },
            |(camera, library)| cosmic::Action::App(Message::PermissionsRequested(camera, library)),
        )
    }
}
