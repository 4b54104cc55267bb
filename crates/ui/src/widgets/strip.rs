use iced::widget::scrollable::{Direction, Scrollbar, Viewport};
use iced::widget::{Space, container, image, row, scrollable, stack, text, vertical_rule};
use iced::{Color, Element, Length};
use scrub::Phase;

const PLACEHOLDER_CELL_COUNT: usize = 10;

/// Strip state already converted to renderable handles.
#[derive(Debug, Clone, PartialEq)]
pub struct StripDisplay {
    pub handles: Vec<image::Handle>,
    pub thumb_width: f32,
}

/// Renders the scrubbable thumbnail strip with a fixed center playhead.
pub fn view<'a, Message>(
    phase: Phase,
    strip: Option<&'a StripDisplay>,
    height: f32,
    viewport_width: f32,
    on_scroll: fn(f64) -> Message,
) -> Element<'a, Message>
where
    Message: 'a,
{
    let cells: Element<'a, Message> = match (phase, strip) {
        (Phase::Loading, _) => placeholder_cells(height),
        (Phase::Ready, Some(display)) if !display.handles.is_empty() => {
            row(display.handles.iter().map(|handle| {
                image(handle.clone())
                    .width(Length::Fixed(display.thumb_width))
                    .height(Length::Fixed(height))
                    .into()
            }))
            .into()
        }
        (Phase::Ready, _) => container(text("No thumbnails available"))
            .center_y(Length::Fixed(height))
            .into(),
        _ => container(text("No media loaded"))
            .center_y(Length::Fixed(height))
            .into(),
    };

    // Half-viewport pads line the strip start up with the center marker, so
    // the scrollable's absolute x offset is the distance scrubbed past
    // center.
    let padded = row![
        Space::with_width(Length::Fixed(viewport_width / 2.0)),
        cells,
        Space::with_width(Length::Fixed(viewport_width / 2.0)),
    ];

    let strip_scroll = scrollable(padded)
        .direction(Direction::Horizontal(Scrollbar::new()))
        .width(Length::Fixed(viewport_width))
        .height(Length::Fixed(height))
        .on_scroll(move |viewport: Viewport| on_scroll(f64::from(viewport.absolute_offset().x)));

    stack![
        strip_scroll,
        container(vertical_rule(2))
            .center_x(Length::Fixed(viewport_width))
            .height(Length::Fixed(height)),
    ]
    .into()
}

fn placeholder_cells<'a, Message>(height: f32) -> Element<'a, Message>
where
    Message: 'a,
{
    row((0..PLACEHOLDER_CELL_COUNT).map(|_| {
        container(Space::new(Length::Fixed(height), Length::Fixed(height)))
            .style(|_theme| container::Style {
                background: Some(Color::from_rgb8(44, 47, 54).into()),
                ..container::Style::default()
            })
            .into()
    }))
    .spacing(2)
    .into()
}
