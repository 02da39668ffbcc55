// SPDX-License-Identifier: GPL-3.0-only

//! Main application view
//!
//! The capture page is composed per layout:
//! - Camera unavailable: static notice only
//! - Camera active: live preview, capture guide and capture trigger
//! - Chooser: "Take a Photo" / "Upload a Photo"
//! - Preview: the photo with "Retake" / "Use Photo"
//!
//! The feature page shows the forwarded photo and the analysis result.

use crate::app::state::{AppModel, FeatureState, Message, Page};
use crate::constants::guide::BORDER_WIDTH;
use crate::features::FeatureOutcome;
use crate::fl;
use crate::screen::{Control, FeatureTarget, ImageResult, OverlayGuide, Route, ScreenLayout};
use cosmic::Element;
use cosmic::iced::alignment::{Horizontal, Vertical};
use cosmic::iced::{Alignment, Background, Border, Color, ContentFit, Length};
use cosmic::widget;

impl AppModel {
    /// Build the main application view
    pub fn view(&self) -> Element<'_, Message> {
        match &self.page {
            Page::Capture => self.capture_view(),
            Page::Feature { route, state } => self.feature_view(route, state),
        }
    }

    fn capture_view(&self) -> Element<'_, Message> {
        let layout = self.screen.layout();
        let controls = self.controls_row(&layout);

        let content: Element<'_, Message> = match &layout {
            ScreenLayout::CameraUnavailable => {
                return centered(widget::text::title3(fl!("camera-not-available")).into());
            }
            ScreenLayout::CameraActive { guide, .. } => cosmic::iced::widget::stack![
                self.live_preview(),
                guide_overlay(*guide)
            ]
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
            ScreenLayout::Chooser { picking } => {
                if *picking {
                    centered(widget::text::body(fl!("choosing")).into())
                } else {
                    widget::Space::new(Length::Fill, Length::Fill).into()
                }
            }
            ScreenLayout::Preview {
                image,
                aspect_ratio,
            } => photo_view(image, *aspect_ratio),
        };

        widget::column()
            .push(content)
            .push(controls)
            .spacing(cosmic::theme::spacing().space_s)
            .padding(cosmic::theme::spacing().space_s)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Live camera frame, or a placeholder until the first frame arrives
    fn live_preview(&self) -> Element<'_, Message> {
        let Some(frame) = &self.preview_frame else {
            let label = match self.screen.permission() {
                Some(status) if !status.is_granted() => fl!("permission-denied"),
                _ => fl!("camera-starting"),
            };
            return widget::container(widget::text::body(label))
                .width(Length::Fill)
                .height(Length::Fill)
                .align_x(Horizontal::Center)
                .align_y(Vertical::Center)
                .style(|_theme| widget::container::Style {
                    background: Some(Background::Color(Color::BLACK)),
                    text_color: Some(Color::WHITE),
                    ..Default::default()
                })
                .into();
        };

        widget::image(frame.handle.clone())
            .content_fit(ContentFit::Cover)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn controls_row(&self, layout: &ScreenLayout) -> Element<'_, Message> {
        let busy = matches!(
            layout,
            ScreenLayout::CameraActive {
                capturing: true,
                ..
            } | ScreenLayout::Chooser { picking: true }
        );

        let mut row = widget::row()
            .push(widget::Space::new(Length::Fill, Length::Shrink))
            .spacing(cosmic::theme::spacing().space_s)
            .align_y(Alignment::Center)
            .width(Length::Fill);

        for control in layout.controls() {
            let (label, message) = match control {
                Control::TakePhoto => (fl!("take-photo"), Message::TakePhoto),
                Control::UploadPhoto => (fl!("upload-photo"), Message::UploadPhoto),
                Control::Capture if busy => (fl!("capturing"), Message::Capture),
                Control::Capture => (fl!("capture"), Message::Capture),
                Control::Retake => (fl!("retake"), Message::Retake),
                Control::UsePhoto => (fl!("use-photo"), Message::UsePhoto),
            };
            let button = match control {
                Control::Capture | Control::UsePhoto => widget::button::suggested(label),
                _ => widget::button::standard(label),
            };
            row = row.push(button.on_press_maybe((!busy).then_some(message)));
        }

        row.push(widget::Space::new(Length::Fill, Length::Shrink))
            .into()
    }

    fn feature_view<'a>(&'a self, route: &'a Route, state: &'a FeatureState) -> Element<'a, Message> {
        let title = match route.screen {
            FeatureTarget::Scantext => fl!("feature-scantext"),
            FeatureTarget::ColorDetector => fl!("feature-color-detector"),
            FeatureTarget::QrScanner => fl!("feature-qr-scanner"),
        };

        let result = match state {
            FeatureState::Analyzing => fl!("feature-analyzing"),
            FeatureState::Failed(error) => fl!("feature-error", error = error.as_str()),
            FeatureState::Done(FeatureOutcome::Text(text)) if text.is_empty() => {
                fl!("feature-no-text")
            }
            FeatureState::Done(FeatureOutcome::QrCodes(codes)) if codes.is_empty() => {
                fl!("feature-no-qr")
            }
            FeatureState::Done(FeatureOutcome::Color(report)) => fl!(
                "feature-color",
                name = report.name,
                hex = report.hex(),
                coverage = report.coverage_percent
            ),
            FeatureState::Done(outcome) => outcome.to_string(),
        };

        let photo: Element<'_, Message> = match route.params.image_path.to_path() {
            Some(path) => widget::image(widget::image::Handle::from_path(path))
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::FillPortion(3))
                .into(),
            None => widget::Space::new(Length::Fill, Length::FillPortion(3)).into(),
        };

        widget::column()
            .push(widget::text::title3(title))
            .push(photo)
            .push(
                widget::scrollable(widget::text::body(result).width(Length::Fill))
                    .height(Length::FillPortion(2)),
            )
            .push(widget::button::standard(fl!("back")).on_press(Message::Back))
            .spacing(cosmic::theme::spacing().space_s)
            .padding(cosmic::theme::spacing().space_s)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

/// Center a single element in the available space
fn centered(content: Element<'_, Message>) -> Element<'_, Message> {
    widget::container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(Horizontal::Center)
        .align_y(Vertical::Center)
        .into()
}

/// Captured or picked photo
///
/// With known dimensions the photo keeps its aspect ratio; otherwise it
/// fills a default square frame.
fn photo_view<'a>(image: &ImageResult, aspect_ratio: Option<f32>) -> Element<'a, Message> {
    let Some(path) = image.locator.to_path() else {
        return widget::Space::new(Length::Fill, Length::Fill).into();
    };
    let handle = widget::image::Handle::from_path(path);

    match aspect_ratio {
        Some(_) => widget::image(handle)
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        None => centered(
            widget::image(handle)
                .content_fit(ContentFit::Cover)
                .width(Length::Fixed(DEFAULT_PHOTO_SIZE))
                .height(Length::Fixed(DEFAULT_PHOTO_SIZE))
                .into(),
        ),
    }
}

/// Side of the frame used when the photo size is unknown
const DEFAULT_PHOTO_SIZE: f32 = 300.0;

/// Capture guide drawn over the live preview
fn guide_overlay<'a>(guide: OverlayGuide) -> Element<'a, Message> {
    let frame = widget::container(widget::Space::new(Length::Fill, Length::Fill))
        .width(Length::FillPortion(guide.width_percent))
        .height(Length::Fill)
        .style(|_theme| widget::container::Style {
            border: Border {
                color: Color::WHITE,
                width: BORDER_WIDTH,
                radius: 4.0.into(),
            },
            ..Default::default()
        });

    let band = widget::row()
        .push(widget::Space::new(
            Length::FillPortion(guide.left_percent),
            Length::Fill,
        ))
        .push(frame)
        .push(widget::Space::new(
            Length::FillPortion(guide.right_percent()),
            Length::Fill,
        ))
        .height(Length::FillPortion(guide.height_percent));

    widget::column()
        .push(widget::Space::new(
            Length::Fill,
            Length::FillPortion(guide.top_percent),
        ))
        .push(band)
        .push(widget::Space::new(
            Length::Fill,
            Length::FillPortion(guide.bottom_percent()),
        ))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
