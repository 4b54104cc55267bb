use iced::widget::{container, image, text};
use iced::{ContentFit, Element, Length};
use scrub::ThumbnailImage;

/// UI-ready image converted from an engine bitmap.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewImage {
    pub handle: image::Handle,
    pub width: u32,
    pub height: u32,
}

impl PreviewImage {
    /// Converts an RGBA bitmap into an iced image handle.
    pub fn from_bitmap(bitmap: &ThumbnailImage) -> Option<Self> {
        let expected_bytes = bitmap.width.checked_mul(bitmap.height)?.checked_mul(4)? as usize;
        if bitmap.bytes.len() != expected_bytes {
            return None;
        }

        Some(Self {
            handle: image::Handle::from_rgba(bitmap.width, bitmap.height, bitmap.bytes.to_vec()),
            width: bitmap.width,
            height: bitmap.height,
        })
    }
}

/// Renders the preview area above the strip.
pub fn view<'a, Message>(latest: Option<&PreviewImage>) -> Element<'a, Message>
where
    Message: 'a,
{
    match latest {
        Some(image_data) => image(image_data.handle.clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        None => container(text("No preview frame"))
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
    }
}
