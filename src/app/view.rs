use super::messages::Message;
use super::state::{
    App, BODY_LINE_HEIGHT, COLUMN_SPACING_PX, COMPOSER_HEIGHT_PX, HEADER_HEIGHT_PX,
    OUTER_PADDING_PX, POST_META_FONT_SIZE_PX, POST_META_HEIGHT_PX, POST_PADDING_PX,
    SCRUBBER_BUTTON_HEIGHT_PX, SCRUBBER_INFO_HEIGHT_PX, SCRUBBER_WIDTH_PX, STREAM_PADDING_X_PX,
    STREAM_SCROLL_ID, item_height,
};
use crate::config::ThemeMode;
use iced::alignment::{Horizontal, Vertical};
use iced::widget::text::{LineHeight, Wrapping};
use iced::widget::{
    Column, Space, button, column, container, horizontal_space, mouse_area, row, scrollable,
    stack, text, text_input, vertical_space,
};
use iced::{Background, Border, Color, Element, Length, Theme};
use poststream_core::{FlashTarget, Post, PostKind, ScrubberLayout, StreamItem};

impl App {
    pub fn view(&self) -> Element<'_, Message> {
        let stream = stack![
            self.stream_scrollable(),
            column![self.header(), vertical_space(), self.composer()]
                .width(Length::Fill)
                .height(Length::Fill),
        ]
        .width(Length::Fill)
        .height(Length::Fill);

        row![stream, self.scrubber()]
            .padding(OUTER_PADDING_PX)
            .spacing(COLUMN_SPACING_PX)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

impl App {
    fn stream_scrollable(&self) -> Element<'_, Message> {
        let width = self.scroll.viewport.width;
        let font_size = self.config.font_size;
        let flash = self.stream.flash();

        let mut items: Column<'_, Message> =
            column![Space::with_height(Length::Fixed(HEADER_HEIGHT_PX))].width(Length::Fill);
        for item in self.stream.items() {
            let height = item_height(&item, width, font_size);
            let highlighted = match (&item, flash) {
                (StreamItem::Post { post, .. }, Some(FlashTarget::Number(number))) => {
                    post.number == number
                }
                (StreamItem::Reply { .. }, Some(FlashTarget::Reply)) => true,
                _ => false,
            };
            let body = match item {
                StreamItem::Post { post, kind, .. } => self.post_view(post, kind),
                StreamItem::Placeholder { index, .. } => container(text("Loading…").size(14))
                    .padding(POST_PADDING_PX)
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .align_x(Horizontal::Center)
                    .align_y(Vertical::Center)
                    .style(move |theme: &Theme| placeholder_style(theme, index))
                    .into(),
                StreamItem::TimeGap(gap) => container(text(gap.label).size(13))
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .align_x(Horizontal::Center)
                    .align_y(Vertical::Center)
                    .into(),
                StreamItem::Reply { .. } => self.reply_view(),
            };
            items = items.push(
                container(body)
                    .width(Length::Fill)
                    .height(Length::Fixed(height))
                    .clip(true)
                    .style(move |theme: &Theme| item_style(theme, highlighted)),
            );
        }
        items = items.push(Space::with_height(Length::Fixed(COMPOSER_HEIGHT_PX)));

        scrollable(container(items).padding([0.0, STREAM_PADDING_X_PX]))
            .on_scroll(|viewport| Message::Scrolled {
                offset_y: viewport.absolute_offset().y,
                viewport_width: viewport.bounds().width,
                viewport_height: viewport.bounds().height,
            })
            .id(STREAM_SCROLL_ID.clone())
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn post_view<'a>(&self, post: &'a Post, kind: Option<PostKind>) -> Element<'a, Message> {
        let time = post.created_at.format("%Y-%m-%d %H:%M").to_string();
        match kind {
            Some(kind) if kind.is_event() => row![
                text(kind.to_string()).size(POST_META_FONT_SIZE_PX),
                text(post.author.as_str()).size(POST_META_FONT_SIZE_PX),
                horizontal_space(),
                text(format!("#{} · {time}", post.number)).size(POST_META_FONT_SIZE_PX),
            ]
            .spacing(8)
            .padding(POST_PADDING_PX)
            .align_y(Vertical::Center)
            .height(Length::Fill)
            .into(),
            Some(_) => column![
                post_meta(post, time),
                text(post.content.as_str())
                    .size(self.config.font_size as f32)
                    .line_height(LineHeight::Relative(BODY_LINE_HEIGHT))
                    .wrapping(Wrapping::WordOrGlyph)
                    .width(Length::Fill),
            ]
            .padding(POST_PADDING_PX)
            .into(),
            None => column![post_meta(post, time)]
                .padding(POST_PADDING_PX)
                .into(),
        }
    }

    fn reply_view(&self) -> Element<'_, Message> {
        let prompt = if self.stream.stream().discussion().can_reply() {
            "Write a reply…"
        } else {
            "Replies are closed."
        };
        container(text(prompt).size(14))
            .padding(POST_PADDING_PX)
            .width(Length::Fill)
            .height(Length::Fill)
            .align_y(Vertical::Center)
            .into()
    }

    fn header(&self) -> Element<'_, Message> {
        let position = self
            .position
            .map(|(start, end)| format!("#{start} - #{end}"))
            .unwrap_or_default();

        let mut jump = column![
            text_input("Jump to #", &self.jump.input)
                .on_input(Message::JumpInputChanged)
                .on_submit(Message::JumpSubmitted)
                .size(14)
                .width(Length::Fixed(110.0)),
        ];
        if let Some(error) = &self.jump.error {
            jump = jump.push(text(error.as_str()).size(11));
        }

        container(
            row![
                text(self.title.as_str()).size(20),
                horizontal_space(),
                text(position).size(14),
                jump,
            ]
            .spacing(12)
            .align_y(Vertical::Center),
        )
        .padding([8.0, 16.0])
        .width(Length::Fill)
        .height(Length::Fixed(HEADER_HEIGHT_PX))
        .style(chrome_style)
        .into()
    }

    fn composer(&self) -> Element<'_, Message> {
        let theme_label = if matches!(self.config.theme, ThemeMode::Night) {
            "Day Mode"
        } else {
            "Night Mode"
        };
        let reply = button("Reply").on_press_maybe(
            self.stream
                .stream()
                .discussion()
                .can_reply()
                .then_some(Message::GoToReply),
        );

        let mut bar = row![
            reply,
            button("Simulate new post").on_press(Message::SimulateNewPost),
            button(theme_label).on_press(Message::ToggleTheme),
            horizontal_space(),
        ]
        .spacing(10)
        .align_y(Vertical::Center);
        if let Some(error) = &self.load_error {
            bar = bar.push(text(error.as_str()).size(13));
        }

        container(bar)
            .padding([8.0, 16.0])
            .width(Length::Fill)
            .height(Length::Fixed(COMPOSER_HEIGHT_PX))
            .align_y(Vertical::Center)
            .style(chrome_style)
            .into()
    }

    fn scrubber(&self) -> Element<'_, Message> {
        let track_height = self.scroll.viewport.track_height();
        let layout = self.stream.scrubber_layout();
        let disabled = layout.is_none_or(|layout| layout.disabled);

        let first = button(text("First").align_x(Horizontal::Center))
            .width(Length::Fill)
            .height(Length::Fixed(SCRUBBER_BUTTON_HEIGHT_PX))
            .on_press_maybe((!disabled).then_some(Message::GoToFirst));
        let last = button(text("Last").align_x(Horizontal::Center))
            .width(Length::Fill)
            .height(Length::Fixed(SCRUBBER_BUTTON_HEIGHT_PX))
            .on_press_maybe((!disabled).then_some(Message::GoToLast));

        let (label, description) = layout
            .map(|layout| (layout.label(), layout.description.clone()))
            .unwrap_or_default();
        let info = column![text(label).size(14), text(description).size(12)]
            .spacing(4)
            .padding([8.0, 0.0])
            .height(Length::Fixed(SCRUBBER_INFO_HEIGHT_PX));

        let track: Element<'_, Message> = match layout {
            Some(layout) => scrubber_track(layout, track_height),
            None => Space::with_height(Length::Fixed(track_height)).into(),
        };
        let track: Element<'_, Message> = if disabled {
            track
        } else {
            mouse_area(track)
                .on_move(|point| Message::ScrubberMoved(point.y))
                .on_press(Message::ScrubberPressed)
                .on_release(Message::ScrubberReleased)
                .into()
        };

        column![first, track, info, last]
            .width(Length::Fixed(SCRUBBER_WIDTH_PX))
            .height(Length::Fill)
            .into()
    }
}

fn post_meta<'a>(post: &'a Post, time: String) -> Element<'a, Message> {
    row![
        text(post.author.as_str()).size(POST_META_FONT_SIZE_PX),
        horizontal_space(),
        text(format!("#{} · {time}", post.number)).size(POST_META_FONT_SIZE_PX),
    ]
    .spacing(8)
    .height(Length::Fixed(POST_META_HEIGHT_PX))
    .align_y(Vertical::Center)
    .into()
}

fn scrubber_track<'a>(layout: &ScrubberLayout, track_height: f32) -> Element<'a, Message> {
    let px = |percent: f64| Length::Fixed((percent / 100.0 * f64::from(track_height)) as f32);

    let bar = column![
        Space::with_height(px(layout.before)),
        container(Space::with_width(Length::Fill))
            .width(Length::Fill)
            .height(px(layout.handle))
            .style(|theme: &Theme| {
                let palette = theme.extended_palette();
                container::Style {
                    background: Some(Background::Color(palette.primary.strong.color)),
                    border: Border {
                        radius: 3.0.into(),
                        ..Border::default()
                    },
                    ..container::Style::default()
                }
            }),
        Space::with_height(px(layout.after)),
    ]
    .width(Length::Fixed(6.0));

    let opacity = layout.unread.opacity as f32;
    let unread = column![
        Space::with_height(px(layout.unread.top)),
        container(Space::with_width(Length::Fill))
            .width(Length::Fill)
            .height(px(layout.unread.height))
            .style(move |theme: &Theme| {
                let mut color = theme.extended_palette().primary.weak.color;
                color.a *= 0.35 * opacity;
                container::Style {
                    background: Some(Background::Color(color)),
                    ..container::Style::default()
                }
            }),
    ]
    .width(Length::Fixed(6.0));

    container(stack![unread, bar])
        .width(Length::Fill)
        .height(Length::Fixed(track_height))
        .padding([0.0, 12.0])
        .style(|theme: &Theme| {
            let mut color = theme.extended_palette().background.strong.color;
            color.a = 0.25;
            container::Style {
                background: Some(Background::Color(color)),
                ..container::Style::default()
            }
        })
        .into()
}

fn item_style(theme: &Theme, highlighted: bool) -> container::Style {
    if !highlighted {
        return container::Style::default();
    }
    let mut color = theme.extended_palette().primary.weak.color;
    color.a = 0.3;
    container::Style {
        background: Some(Background::Color(color)),
        border: Border {
            radius: 4.0.into(),
            ..Border::default()
        },
        ..container::Style::default()
    }
}

fn placeholder_style(theme: &Theme, index: usize) -> container::Style {
    let base = theme.extended_palette().background.weak.color;
    let alpha = if index % 2 == 0 { 0.35 } else { 0.2 };
    container::Style {
        background: Some(Background::Color(Color { a: alpha, ..base })),
        ..container::Style::default()
    }
}

fn chrome_style(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();
    container::Style {
        background: Some(Background::Color(palette.background.base.color)),
        border: Border {
            color: palette.background.strong.color,
            width: 1.0,
            radius: 0.0.into(),
        },
        ..container::Style::default()
    }
}
