// UI rendering logic
use crate::theme::Palette;
use crate::{App, InputMode};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

pub fn render(frame: &mut Frame, app: &mut App) {
    let palette = Palette::for_mode(app.theme);

    frame.render_widget(
        Block::default().style(Style::default().bg(palette.background)),
        frame.area(),
    );

    let has_profile = app.session.profile().is_some();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(if has_profile {
            vec![
                Constraint::Length(3), // Header
                Constraint::Length(3), // Username search bar
                Constraint::Length(3), // Repository filter bar
                Constraint::Min(5),    // Main content
                Constraint::Length(1), // Status bar
            ]
        } else {
            vec![
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(1),
            ]
        })
        .split(frame.area());

    render_header(frame, app, &palette, chunks[0]);
    render_username_bar(frame, app, &palette, chunks[1]);

    let (content_area, status_area) = if has_profile {
        render_filter_bar(frame, app, &palette, chunks[2]);
        (chunks[3], chunks[4])
    } else {
        (chunks[2], chunks[3])
    };

    if has_profile {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
            .split(content_area);

        render_profile_card(frame, app, &palette, content_chunks[0]);
        render_repo_list(frame, app, &palette, content_chunks[1]);
    } else {
        render_empty_content(frame, app, &palette, content_area);
    }

    if app.input_mode == InputMode::PickingLanguage {
        render_language_picker(frame, app, &palette, content_area);
    }

    render_status_bar(frame, app, &palette, status_area);
}

fn render_header(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let title = Line::from(vec![
        Span::styled(
            "RepoLens",
            Style::default()
                .fg(palette.title)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "  browse a user's repositories",
            Style::default().fg(palette.muted),
        ),
    ]);

    let theme_label = match app.theme {
        repolens_core::ThemeMode::Dark => "dark",
        repolens_core::ThemeMode::Light => "light",
    };

    let header = Paragraph::new(title)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border))
                .title(Span::styled(
                    format!(" theme: {theme_label} (t) "),
                    Style::default().fg(palette.muted),
                ))
                .title_alignment(Alignment::Right),
        )
        .style(Style::default().fg(palette.foreground));
    frame.render_widget(header, area);
}

fn render_username_bar(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let focused = app.input_mode == InputMode::EnteringUsername;
    let border = if focused {
        palette.border_focused
    } else {
        palette.border
    };

    let text = if app.username_input.is_empty() && !focused {
        Span::styled(
            "press / to search for a user",
            Style::default().fg(palette.muted),
        )
    } else {
        Span::styled(
            app.username_input.as_str(),
            Style::default().fg(palette.foreground),
        )
    };

    let input = Paragraph::new(Line::from(text)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" Account "),
    );
    frame.render_widget(input, area);

    if focused {
        frame.set_cursor_position((input_cursor_x(area, &app.username_input), area.y + 1));
    }
}

/// Cursor column after the typed text. Counts characters, not bytes, so
/// multibyte input does not push the cursor past the text.
fn input_cursor_x(area: Rect, input: &str) -> u16 {
    area.x + input.chars().count() as u16 + 1
}

fn render_filter_bar(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let editing = app.input_mode == InputMode::EditingNameFilter;
    let name_border = if editing {
        palette.border_focused
    } else {
        palette.border
    };

    let name_filter = app.session.browse().name_filter();
    let name_text = if name_filter.is_empty() && !editing {
        Span::styled(
            "press f to filter by name",
            Style::default().fg(palette.muted),
        )
    } else {
        Span::styled(name_filter, Style::default().fg(palette.foreground))
    };

    let name_widget = Paragraph::new(Line::from(name_text)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(name_border))
            .title(" Repository filter "),
    );
    frame.render_widget(name_widget, chunks[0]);

    if editing {
        frame.set_cursor_position((input_cursor_x(chunks[0], &app.filter_input), chunks[0].y + 1));
    }

    let language_filter = app.session.browse().language_filter();
    let language_text = if language_filter.is_empty() {
        Span::styled("all languages (l)", Style::default().fg(palette.muted))
    } else {
        Span::styled(language_filter, Style::default().fg(palette.language))
    };

    let language_widget = Paragraph::new(Line::from(language_text)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.border))
            .title(" Language "),
    );
    frame.render_widget(language_widget, chunks[1]);
}

fn render_profile_card(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let Some(profile) = app.session.profile() else {
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            profile.login.clone(),
            Style::default()
                .fg(palette.title)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if let Some(bio) = &profile.bio {
        lines.push(Line::from(Span::styled(
            bio.clone(),
            Style::default().fg(palette.foreground),
        )));
        lines.push(Line::from(""));
    }

    if let Some(location) = &profile.location {
        lines.push(Line::from(vec![
            Span::styled("location: ", Style::default().fg(palette.muted)),
            Span::styled(location.clone(), Style::default().fg(palette.foreground)),
        ]));
    }

    lines.push(Line::from(vec![
        Span::styled("avatar: ", Style::default().fg(palette.muted)),
        Span::styled(profile.avatar_url.clone(), Style::default().fg(palette.link)),
    ]));
    lines.push(Line::from(vec![
        Span::styled("profile: ", Style::default().fg(palette.muted)),
        Span::styled(profile.html_url.clone(), Style::default().fg(palette.link)),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "o: open profile in browser",
        Style::default().fg(palette.muted),
    )));

    let card = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border))
                .title(" Profile "),
        );
    frame.render_widget(card, area);
}

fn render_repo_list(frame: &mut Frame, app: &mut App, palette: &Palette, area: Rect) {
    if app.session.loading() {
        let loading = Paragraph::new(Span::styled(
            "Loading repositories...",
            Style::default().fg(palette.accent),
        ))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border))
                .title(" Repositories "),
        );
        frame.render_widget(loading, area);
        return;
    }

    let items: Vec<ListItem> = app
        .session
        .browse()
        .displayed()
        .iter()
        .map(|repo| {
            let language = repo
                .language
                .as_deref()
                .unwrap_or("language not specified");
            let description = repo.description.as_deref().unwrap_or("no description");

            ListItem::new(vec![
                Line::from(Span::styled(
                    repo.name.clone(),
                    Style::default()
                        .fg(palette.foreground)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    language.to_string(),
                    Style::default().fg(palette.language),
                )),
                Line::from(Span::styled(
                    description.to_string(),
                    Style::default().fg(palette.muted),
                )),
            ])
        })
        .collect();

    let empty = items.is_empty();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border))
                .title(format!(
                    " Repositories ({} matching) ",
                    app.session.browse().filtered_len()
                )),
        )
        .highlight_style(
            Style::default()
                .bg(palette.selected_bg)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(list, area, &mut app.list_state);

    if empty && area.height > 2 && area.width > 4 {
        let inner = Rect {
            x: area.x + 2,
            y: area.y + 1,
            width: area.width.saturating_sub(4),
            height: 1,
        };
        frame.render_widget(
            Paragraph::new(Span::styled(
                "no repositories match",
                Style::default().fg(palette.muted),
            )),
            inner,
        );
    }
}

fn render_empty_content(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let message = if app.session.user_not_found() {
        Span::styled("User not found.", Style::default().fg(palette.error))
    } else if app.session.loading() {
        Span::styled("Loading...", Style::default().fg(palette.accent))
    } else {
        Span::styled(
            "Search for a GitHub user to browse their repositories.",
            Style::default().fg(palette.muted),
        )
    };

    let body = Paragraph::new(Line::from(message))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border)),
        );
    frame.render_widget(body, area);
}

fn render_language_picker(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let options: Vec<String> = std::iter::once("(all)".to_string())
        .chain(app.session.browse().languages().iter().cloned())
        .collect();

    let height = (options.len() as u16 + 2).min(area.height);
    let width = 30.min(area.width);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    let items: Vec<ListItem> = options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let style = if i == app.language_cursor {
                Style::default()
                    .fg(palette.foreground)
                    .bg(palette.selected_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.foreground)
            };
            ListItem::new(Span::styled(option.clone(), style))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.border_focused))
            .title(" Language "),
    );

    frame.render_widget(Clear, popup);
    frame.render_widget(list, popup);
}

fn render_status_bar(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let line = if let Some(error) = app.session.error_message() {
        Line::from(Span::styled(error, Style::default().fg(palette.error)))
    } else if app.session.user_not_found() {
        Line::from(Span::styled(
            "User not found.",
            Style::default().fg(palette.error),
        ))
    } else if app.session.profile().is_some() {
        let browse = app.session.browse();
        let page_size = repolens_core::models::PAGE_SIZE;
        let total_pages = ((browse.filtered_len() + page_size - 1) / page_size).max(1);
        let mut spans = vec![Span::styled(
            format!(
                " page {}/{}  {} of {} repositories ",
                browse.page() + 1,
                total_pages,
                browse.filtered_len(),
                browse.total_len()
            ),
            Style::default().fg(palette.foreground),
        )];

        if browse.has_previous_page() {
            spans.push(Span::styled("<- prev ", Style::default().fg(palette.accent)));
        }
        if browse.has_next_page() {
            spans.push(Span::styled("next -> ", Style::default().fg(palette.accent)));
        }
        spans.push(Span::styled(
            " /: user  f: filter  l: language  t: theme  q: quit",
            Style::default().fg(palette.muted),
        ));
        Line::from(spans)
    } else {
        Line::from(Span::styled(
            " /: user  t: theme  q: quit",
            Style::default().fg(palette.muted),
        ))
    };

    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_counts_characters_not_bytes() {
        let area = Rect {
            x: 2,
            y: 0,
            width: 40,
            height: 3,
        };
        // 8 characters, 10 bytes
        assert_eq!(input_cursor_x(area, "müller-é"), 2 + 8 + 1);
        assert_eq!(input_cursor_x(area, ""), 3);
    }
}
