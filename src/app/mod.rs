// SPDX-License-Identifier: GPL-3.0-only

//! Main application module for Filter Camera
//!
//! # Architecture
//!
//! - `session`: Capture screen state machine (permission gate, capture, filter preview)
//! - `state`: Application model and messages
//! - `layout`: Scale-to-fit for the filter preview
//! - `controls`: Shutter and action row
//! - `filter_picker`: Per-filter thumbnails
//! - `settings`: Settings drawer UI
//! - `view`: Main view rendering
//! - `update`: Message handling

mod controls;
mod filter_picker;
mod handlers;
pub mod layout;
pub mod session;
mod settings;
mod state;
mod update;
mod view;

use crate::backends::notifications::{FreedesktopNotifier, NotificationBehavior};
use crate::backends::permissions::{LibraryPermission, PermissionProvider, PortalCameraPermission};
use crate::backends::push::DbusPushProvider;
use crate::config::Config;
use crate::constants::{app_info, capture, pipeline, timing, ui};
use crate::fl;
use cosmic::app::context_drawer;
use cosmic::cosmic_config::{self, CosmicConfigEntry};
use cosmic::iced::{Size, Subscription};
use cosmic::widget::{self, about::About};
use cosmic::{Element, Task};
use session::CaptureSession;
pub use state::{AppModel, ContextPage, Message, PreviewImages};
use std::sync::Arc;
use tracing::{error, info, warn};

const REPOSITORY: &str = env!("CARGO_PKG_REPOSITORY");

impl cosmic::Application for AppModel {
    /// The async executor that will be used to run your application's commands.
    type Executor = cosmic::executor::Default;

    /// Data that your application receives to its init method.
    type Flags = ();

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    /// Unique identifier in RDNN (reverse domain name notation) format.
    const APP_ID: &'static str = app_info::APP_ID;

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    /// Initializes the application with any given flags and startup commands.
    fn init(
        core: cosmic::Core,
        _flags: Self::Flags,
    ) -> (Self, Task<cosmic::Action<Self::Message>>) {
        let about = About::default()
            .name(fl!("app-title"))
            .icon(widget::icon::from_name(Self::APP_ID).handle())
            .version(env!("GIT_VERSION"))
            .links([(fl!("repository"), REPOSITORY)])
            .license(env!("CARGO_PKG_LICENSE"));

        let (config_handler, config) =
            match cosmic_config::Config::new(Self::APP_ID, Config::VERSION) {
                Ok(handler) => {
                    let config = match Config::get_entry(&handler) {
                        Ok(config) => config,
                        Err((errors, config)) => {
                            error!(?errors, "Errors loading config");
                            config
                        }
                    };
                    (Some(handler), config)
                }
                Err(err) => {
                    error!(%err, "Failed to create config handler");
                    (None, Config::default())
                }
            };

        // Required before any pipeline is built
        if let Err(e) = gstreamer::init() {
            error!(error = %e, "Failed to initialize GStreamer");
        }

        let capture_dir = crate::storage::capture_dir();
        if let Err(e) = crate::storage::prune_stale_captures(&capture_dir, capture::STALE_CAPTURE_AGE)
        {
            warn!(error = %e, dir = %capture_dir.display(), "Failed to prune capture directory");
        }

        let app = AppModel {
            core,
            context_page: ContextPage::default(),
            about,
            session: CaptureSession::new(config.default_facing),
            camera_access: PortalCameraPermission::new(),
            library_access: LibraryPermission::new(crate::storage::library_root()),
            album_name_input: config.album_name.clone(),
            notifications_active: config.notifications_enabled,
            theme_options: vec![fl!("theme-system"), fl!("theme-dark"), fl!("theme-light")],
            config,
            config_handler,
            current_frame: None,
            camera_error: None,
            preview: PreviewImages::default(),
            viewport: Size::new(ui::DEFAULT_VIEWPORT.0, ui::DEFAULT_VIEWPORT.1),
            notification_report: None,
        };

        let camera = app.camera_access.clone();
        let library = app.library_access.clone();
        let permissions_task = Task::perform(
            async move { (camera.status().await, library.status().await) },
            |(camera, library)| cosmic::Action::App(Message::PermissionsQueried(camera, library)),
        );

        if app.notifications_active {
            info!("Starting notification bootstrap");
        } else {
            info!("Notifications disabled, bootstrap skipped");
        }

        (app, permissions_task)
    }

    /// Elements to pack at the end of the header bar.
    fn header_end(&self) -> Vec<Element<'_, Self::Message>> {
        vec![
            widget::button::icon(widget::icon::from_name("preferences-system-symbolic"))
                .on_press(Message::ToggleContextPage(ContextPage::Settings))
                .into(),
        ]
    }

    /// Display a context drawer if the context page is requested.
    fn context_drawer(&self) -> Option<context_drawer::ContextDrawer<'_, Self::Message>> {
        if !self.core.window.show_context {
            return None;
        }

        Some(match self.context_page {
            ContextPage::About => context_drawer::about(
                &self.about,
                |url| Message::LaunchUrl(url.to_string()),
                Message::ToggleContextPage(ContextPage::About),
            ),
            ContextPage::Settings => self.settings_view(),
        })
    }

    /// Modal alert for capture and save results.
    fn dialog(&self) -> Option<Element<'_, Self::Message>> {
        self.alert_dialog()
    }

    /// Describes the interface based on the current state of the application model.
    fn view(&self) -> Element<'_, Self::Message> {
        self.view()
    }

    /// Register subscriptions for this application.
    fn subscription(&self) -> Subscription<Self::Message> {
        let config_sub = self
            .core()
            .watch_config::<Config>(Self::APP_ID)
            .map(|update| Message::UpdateConfig(update.config));

        let resize_sub = cosmic::iced::window::resize_events()
            .map(|(_id, size)| Message::WindowResized(size));

        // The feed only runs on the capture view; leaving it stops the camera
        let camera_sub = if self.session.view_kind() == session::ViewKind::Capture {
            camera_subscription(self.session.facing)
        } else {
            Subscription::none()
        };

        // Started once per session; toggling the setting applies after a restart
        let notification_sub = if self.notifications_active {
            notification_subscription(self.config.notification_behavior())
        } else {
            Subscription::none()
        };

        Subscription::batch([config_sub, resize_sub, camera_sub, notification_sub])
    }

    /// Handles messages emitted by the application and its widgets.
    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        self.update(message)
    }
}

/// Push-to-local notification forwarding for the whole session
///
/// Reports once the push subscription is set up and again when the
/// message stream ends.
fn notification_subscription(behavior: NotificationBehavior) -> Subscription<Message> {
    Subscription::run_with_id(
        "notifications",
        cosmic::iced::stream::channel(4, move |mut output| async move {
            let report = crate::notifications::bootstrap(
                DbusPushProvider::new(),
                FreedesktopNotifier::new(),
                behavior,
                |report| {
                    let _ = output.try_send(Message::NotificationReport(report.clone()));
                },
            )
            .await;

            let _ = output.try_send(Message::NotificationReport(report));
        }),
    )
}

/// Live preview frames for the camera facing `facing`
///
/// The subscription is keyed by facing, so a flip tears down the running
/// pipeline and starts one on the other camera.
fn camera_subscription(facing: crate::backends::camera::Facing) -> Subscription<Message> {
    use cosmic::iced::futures::StreamExt;

    Subscription::run_with_id(
        ("camera", facing),
        cosmic::iced::stream::channel(pipeline::FRAME_CHANNEL_CAPACITY, move |mut output| async move {
            info!(%facing, "Camera subscription started");
            let mut backend = crate::backends::camera::get_backend();
            let mut frame_count = 0u64;

            loop {
                if output.is_closed() {
                    break;
                }

                let device = match crate::backends::camera::resolve_device(backend.as_ref(), facing) {
                    Ok(device) => device,
                    Err(e) => {
                        warn!(error = %e, %facing, "No camera for facing");
                        let _ = output.try_send(Message::CameraUnavailable(e.to_string()));
                        tokio::time::sleep(timing::PIPELINE_RETRY_DELAY).await;
                        continue;
                    }
                };

                let (sender, mut receiver) =
                    cosmic::iced::futures::channel::mpsc::channel(pipeline::FRAME_CHANNEL_CAPACITY);

                if let Err(e) = backend.start_preview(&device, sender) {
                    error!(error = %e, device = %device.name, "Failed to start preview");
                    let _ = output.try_send(Message::CameraUnavailable(e.to_string()));
                    tokio::time::sleep(timing::PIPELINE_RETRY_DELAY).await;
                    continue;
                }

                loop {
                    if output.is_closed() {
                        info!("Output channel closed - camera subscription cancelled");
                        break;
                    }

                    // Timeout keeps the loop checking for cancellation
                    match tokio::time::timeout(
                        std::time::Duration::from_millis(100),
                        receiver.next(),
                    )
                    .await
                    {
                        Ok(Some(frame)) => {
                            frame_count += 1;
                            if frame_count % timing::FRAME_LOG_INTERVAL == 0 {
                                tracing::debug!(
                                    frame = frame_count,
                                    width = frame.width,
                                    height = frame.height,
                                    "Preview frame"
                                );
                            }

                            // Dropping frames is fine for live preview
                            if let Err(e) = output.try_send(Message::CameraFrame(Arc::new(frame)))
                                && e.is_disconnected()
                            {
                                break;
                            }
                        }
                        Ok(None) => {
                            warn!("Preview frame stream ended");
                            break;
                        }
                        Err(_) => continue,
                    }
                }

                if let Err(e) = backend.stop_preview() {
                    warn!(error = %e, "Failed to stop preview cleanly");
                }

                if output.is_closed() {
                    break;
                }
                tokio::time::sleep(timing::PIPELINE_RETRY_DELAY).await;
            }

            info!(%facing, "Camera subscription stopped");
        }),
    )
}
