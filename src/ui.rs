use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::{
    app::{App, ClickableRegions, DashboardState, Field, SignInForm},
    format::{axis_tick, day_month, format_inr, format_signed_inr, group_indian, long_date},
    position::{FundManager, InvestmentPosition},
    range::{DisplayDomain, TimeRange},
    series::SeriesPoint,
    session::Identity,
};

const BRAND: &str = "Rakesh & Associates";
const SPINNER: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

pub fn ui(f: &mut Frame, app: &mut App) {
    // Clear clickable regions before each render
    app.clickable_regions = ClickableRegions::default();

    let user = app.session.current_user().cloned();
    match user {
        None => render_sign_in(f, &app.sign_in, &mut app.clickable_regions),
        Some(user) => {
            app.ensure_series(App::today());
            render_dashboard(f, app, &user);
        }
    }
}

fn render_sign_in(f: &mut Frame, form: &SignInForm, regions: &mut ClickableRegions) {
    let area = centered_rect(50, 60, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Welcome Back ")
        .title_alignment(Alignment::Center)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Subtitle
            Constraint::Length(2), // Error
            Constraint::Length(3), // Email
            Constraint::Length(3), // Password
            Constraint::Length(3), // Button
            Constraint::Min(0),
            Constraint::Length(2), // Hints
        ])
        .margin(1)
        .split(inner);

    let subtitle = Paragraph::new(format!("Sign in to {BRAND}"))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    f.render_widget(subtitle, chunks[0]);

    if let Some(error) = &form.error {
        let error = Paragraph::new(Line::from(vec![
            Span::styled("⚠ ", Style::default().fg(Color::Red)),
            Span::styled(error.as_str(), Style::default().fg(Color::Red)),
        ]))
        .wrap(Wrap { trim: true });
        f.render_widget(error, chunks[1]);
    }

    let masked = "•".repeat(form.password.chars().count());
    render_field(f, chunks[2], "Email Address", &form.email, "Enter your email", form.focus == Field::Email && !form.is_pending());
    render_field(f, chunks[3], "Password", &masked, "Enter your password", form.focus == Field::Password && !form.is_pending());
    regions.email_field = chunks[2];
    regions.password_field = chunks[3];

    let button = match form.pending {
        Some((_, started)) => {
            let frame = (started.elapsed().as_millis() / 100) as usize % SPINNER.len();
            Line::from(format!("{} Signing in…", SPINNER[frame])).yellow()
        }
        None => Line::from("Sign In →").bold(),
    };
    let button = Paragraph::new(button)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));
    f.render_widget(button, chunks[4]);
    regions.submit_button = chunks[4];

    let hints = vec![
        Line::from(" Tab=Switch field | Enter=Sign in | Esc=Quit ").style(Style::default().fg(Color::Yellow)),
        Line::from("By signing in, you agree to our Terms of Service and Privacy Policy.")
            .style(Style::default().fg(Color::DarkGray)),
    ];
    f.render_widget(Paragraph::new(hints).alignment(Alignment::Center), chunks[6]);
}

fn render_field(f: &mut Frame, area: Rect, label: &str, value: &str, placeholder: &str, focused: bool) {
    let border = if focused { Color::Yellow } else { Color::DarkGray };
    let content = if value.is_empty() && !focused {
        Span::styled(placeholder.to_string(), Style::default().fg(Color::DarkGray))
    } else {
        let cursor = if focused { "█" } else { "" };
        Span::raw(format!("{value}{cursor}"))
    };
    let paragraph = Paragraph::new(Line::from(content)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {label} "))
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(paragraph, area);
}

fn render_dashboard(f: &mut Frame, app: &mut App, user: &Identity) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(2), // Welcome
            Constraint::Length(5), // Stat tiles
            Constraint::Min(16),   // Details + chart
            Constraint::Length(1), // Footer
        ])
        .split(f.area());

    render_header(f, user, chunks[0], &mut app.clickable_regions);

    let welcome = vec![
        Line::from(format!(" Welcome, {}", user.first_name())).bold(),
        Line::from(" Here is an overview of your investment portfolio.").style(Style::default().fg(Color::Gray)),
    ];
    f.render_widget(Paragraph::new(welcome), chunks[1]);

    render_stats(f, &app.position, chunks[2]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(chunks[3]);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(13), Constraint::Min(8)])
        .split(body[0]);

    render_position(f, &app.position, left[0]);
    render_manager(f, &app.manager, left[1]);
    render_chart(f, &app.dashboard, body[1], &mut app.clickable_regions);
    render_footer(f, chunks[4]);
}

fn render_header(f: &mut Frame, user: &Identity, area: Rect, regions: &mut ClickableRegions) {
    let block = Block::default().borders(Borders::BOTTOM);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let sign_out = " Sign out ";
    let user_text = format!("{} <{}>  ", user.name, user.email);
    let right_width = (user_text.chars().count() + sign_out.len()) as u16;

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(right_width)])
        .split(inner);

    let brand = Paragraph::new(Line::from(vec![
        Span::styled(" ₹ ", Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::styled(format!(" {BRAND}"), Style::default().fg(Color::Cyan).bold()),
    ]));
    f.render_widget(brand, cols[0]);

    let right = Paragraph::new(Line::from(vec![
        Span::styled(user_text.clone(), Style::default().fg(Color::Gray)),
        Span::styled(sign_out, Style::default().fg(Color::Red).add_modifier(Modifier::REVERSED)),
    ]));
    f.render_widget(right, cols[1]);

    let user_len = user_text.chars().count() as u16;
    regions.sign_out_button = Rect::new(
        cols[1].x + user_len,
        cols[1].y,
        (sign_out.len() as u16).min(cols[1].width.saturating_sub(user_len)),
        1,
    );
}

fn render_stats(f: &mut Frame, position: &InvestmentPosition, area: Rect) {
    let tiles = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let gain_color = if position.is_positive() { Color::Green } else { Color::Red };
    let sub_value = format!(
        "{} ({}%)",
        format_signed_inr(position.profit(), 0),
        position.return_percentage
    );

    render_stat(f, tiles[0], "Total Invested", &format_inr(position.invested_amount, 0), None);
    render_stat(
        f,
        tiles[1],
        "Current Value",
        &format_inr(position.current_value, 0),
        Some((sub_value, gain_color)),
    );
    render_stat(f, tiles[2], "Total Funds", &format!("{:02}", position.fund_count), None);
}

fn render_stat(f: &mut Frame, area: Rect, label: &str, value: &str, sub_value: Option<(String, Color)>) {
    let mut lines = vec![
        Line::from(format!(" {label}")).style(Style::default().fg(Color::Gray)),
        Line::from(format!(" {value}")).bold(),
    ];
    if let Some((text, color)) = sub_value {
        lines.push(Line::from(Span::styled(format!(" {text}"), Style::default().fg(color))));
    }
    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

fn render_position(f: &mut Frame, position: &InvestmentPosition, area: Rect) {
    let lock_in_end = position
        .lock_in_ends()
        .map(long_date)
        .unwrap_or_else(|| "-".to_string());

    let row = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("  {label:<22}"), Style::default().fg(Color::Gray)),
            Span::raw(value),
        ])
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(format!("  {}", position.fund_name), Style::default().bold()),
            Span::styled(format!("  {}", position.category), Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(""),
        row("Start Date", long_date(position.start_date)),
        row("Lock-in Period", format!("{} Years", position.lock_in_years)),
        row("Lock-in Ends", lock_in_end),
        Line::from(""),
        Line::from(Span::styled("  ⚠ Withdrawal Locked", Style::default().fg(Color::Yellow).bold())),
        Line::from(Span::styled(format!("    {}", position.withdrawal_message), Style::default().fg(Color::Yellow))),
        Line::from(""),
        row("Net Asset Value (NAV)", format_inr(position.nav, 2)),
        row("Units Held", group_indian(position.units_held, 2)),
    ];

    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Investment "));
    f.render_widget(paragraph, area);
}

fn render_manager(f: &mut Frame, manager: &FundManager, area: Rect) {
    let mut lines = vec![
        Line::from(format!("  {}", manager.name)).bold(),
        Line::from(Span::styled(format!("  {}", manager.title), Style::default().fg(Color::Cyan))),
        Line::from(Span::styled(format!("  {}", manager.credentials), Style::default().fg(Color::Gray))),
        Line::from(Span::styled(format!("  {}", manager.bio), Style::default().fg(Color::DarkGray))),
        Line::from(""),
        Line::from(Span::styled("  COMPANY ADDRESS", Style::default().fg(Color::DarkGray).bold())),
        Line::from(format!("  {}", manager.company)),
    ];
    lines.extend(manager.address.iter().map(|l| Line::from(format!("  {l}"))));

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Fund Management "));
    f.render_widget(paragraph, area);
}

fn render_chart(f: &mut Frame, dashboard: &DashboardState, area: Rect, regions: &mut ClickableRegions) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Portfolio Growth ")
        .title_bottom(Line::from(" NAV performance over time ").style(Style::default().fg(Color::DarkGray)))
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Range tabs
            Constraint::Min(6),    // Chart
            Constraint::Length(1), // Inspect line
        ])
        .split(inner);

    render_range_tabs(f, dashboard.range, chunks[0], regions);

    let visible = dashboard.visible();
    if visible.is_empty() {
        let no_data = Paragraph::new("  No history available").style(Style::default().fg(Color::DarkGray));
        f.render_widget(no_data, chunks[1]);
        return;
    }

    let data: Vec<(f64, f64)> = visible
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.value))
        .collect();
    let [min_y, max_y] = y_bounds(DisplayDomain::of(visible), visible);
    let max_x = (visible.len() - 1).max(1) as f64;

    let cursor_data: Vec<(f64, f64)> = dashboard
        .cursor
        .and_then(|i| data.get(i).copied())
        .into_iter()
        .collect();

    let mut datasets = vec![Dataset::default()
        .name("Value")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&data)];
    if !cursor_data.is_empty() {
        datasets.push(
            Dataset::default()
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(Color::Yellow))
                .data(&cursor_data),
        );
    }

    let mid_y = (min_y + max_y) / 2.0;
    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, max_x])
                .labels(x_labels(visible)),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([min_y, max_y])
                .labels(vec![
                    Span::raw(axis_tick(min_y)),
                    Span::raw(axis_tick(mid_y)),
                    Span::raw(axis_tick(max_y)),
                ]),
        );
    f.render_widget(chart, chunks[1]);

    let inspect = match dashboard.cursor.and_then(|i| visible.get(i)) {
        Some(point) => Line::from(vec![
            Span::styled(format!(" {}: ", point.label()), Style::default().fg(Color::Gray)),
            Span::styled(format_inr(point.value, 0), Style::default().fg(Color::Yellow).bold()),
        ]),
        None => Line::from(" ←→=Inspect | 1-5=Range").style(Style::default().fg(Color::DarkGray)),
    };
    f.render_widget(Paragraph::new(inspect), chunks[2]);
}

fn render_range_tabs(f: &mut Frame, selected: TimeRange, area: Rect, regions: &mut ClickableRegions) {
    let titles: Vec<Line> = TimeRange::ORDER
        .iter()
        .map(|range| {
            let title = format!(" {} ", range.label());
            if *range == selected {
                Line::from(title).cyan().bold().reversed()
            } else {
                Line::from(title).dark_gray()
            }
        })
        .collect();

    // Widths match the titles above; padding is disabled so only the divider sits between them
    let mut x = area.x;
    for range in TimeRange::ORDER {
        let width = range.label().len() as u16 + 2;
        if x + width > area.x + area.width {
            break;
        }
        regions.range_tabs.push((Rect::new(x, area.y, width, 1), range));
        x += width + 1;
    }

    let selected_idx = TimeRange::ORDER
        .iter()
        .position(|r| *r == selected)
        .unwrap_or_default();
    let tabs = Tabs::new(titles)
        .select(selected_idx)
        .padding("", "")
        .divider("|");
    f.render_widget(tabs, area);
}

fn render_footer(f: &mut Frame, area: Rect) {
    let keys = " 1-5=Range | ←→=Inspect | Home/End | Esc=Clear | o=Sign out | q=Quit ";
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(keys, Style::default().fg(Color::Yellow)))),
        area,
    );
}

/// Y bounds for the chart: the padded domain, or the data extent when auto-scaling.
/// A flat series is widened so the axis has height.
fn y_bounds(domain: DisplayDomain, visible: &[SeriesPoint]) -> [f64; 2] {
    let [min, max] = domain.bounds().unwrap_or_else(|| {
        let min = visible.iter().map(|p| p.value).fold(f64::INFINITY, f64::min);
        let max = visible.iter().map(|p| p.value).fold(f64::NEG_INFINITY, f64::max);
        if min.is_finite() && max.is_finite() {
            [min, max]
        } else {
            [0.0, 1.0]
        }
    });
    if max > min {
        [min, max]
    } else {
        [min - 1.0, max + 1.0]
    }
}

fn x_labels(visible: &[SeriesPoint]) -> Vec<Span<'static>> {
    match visible {
        [] => Vec::new(),
        [only] => vec![Span::raw(only.label())],
        [first, .., last] => {
            let middle = &visible[visible.len() / 2];
            vec![
                Span::raw(day_month(first.date)),
                Span::raw(day_month(middle.date)),
                Span::raw(day_month(last.date)),
            ]
        }
    }
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn points(values: &[f64]) -> Vec<SeriesPoint> {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| SeriesPoint {
                date: start + Duration::days(i as i64),
                value,
            })
            .collect()
    }

    #[test]
    fn y_bounds_use_padded_domain() {
        let visible = points(&[100.0, 200.0]);
        assert_eq!(y_bounds(DisplayDomain::of(&visible), &visible), [90.0, 210.0]);
    }

    #[test]
    fn y_bounds_widen_flat_series() {
        let visible = points(&[50.0, 50.0]);
        assert_eq!(y_bounds(DisplayDomain::of(&visible), &visible), [49.0, 51.0]);
    }

    #[test]
    fn y_bounds_auto_falls_back_to_data() {
        let visible = points(&[3.0, 7.0]);
        assert_eq!(y_bounds(DisplayDomain::Auto, &visible), [3.0, 7.0]);
        assert_eq!(y_bounds(DisplayDomain::Auto, &[]), [0.0, 1.0]);
    }

    #[test]
    fn x_labels_first_middle_last() {
        let labels: Vec<String> = x_labels(&points(&[1.0, 2.0, 3.0]))
            .into_iter()
            .map(|s| s.content.into_owned())
            .collect();
        assert_eq!(labels, vec!["1 Mar", "2 Mar", "3 Mar"]);
        assert_eq!(x_labels(&points(&[1.0])).len(), 1);
    }
}
