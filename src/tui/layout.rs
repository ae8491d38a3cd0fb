use ratatui::layout::{Constraint, Direction, Layout as RatLayout, Rect};

pub struct Layout {
    pub inner_area: Rect, // Area inside the outer border
    pub tabs_area: Rect,
    pub calendar_area: Rect,
    pub panel_area: Rect,
    pub status_area: Rect,
}

impl Layout {
    /// Minimum terminal dimensions required for the application.
    /// Width: the month grid needs ~7*6 columns plus the side panel minimum;
    /// height: border + tabs + six grid rows of two lines + status.
    pub const MIN_WIDTH: u16 = 64;
    pub const MIN_HEIGHT: u16 = 18;

    pub fn calculate(size: Rect, panel_width_percent: u16, panel_collapsed: bool) -> Self {
        let min_width_with_border = Self::MIN_WIDTH + 2;
        let min_height_with_border = Self::MIN_HEIGHT + 2;
        let width = size.width.max(min_width_with_border);
        let height = size.height.max(min_height_with_border);
        let size = Rect::new(size.x, size.y, width, height);

        // Inner area accounts for the outer border, 1 char on each side
        let inner_area = Rect::new(
            size.x + 1,
            size.y + 1,
            size.width.saturating_sub(2),
            size.height.saturating_sub(2),
        );

        // Panel width: requested percent, clamped so the calendar keeps at
        // least 42 columns (a readable 7-column grid)
        let panel_width = if panel_collapsed {
            0
        } else {
            let requested = (inner_area.width * panel_width_percent) / 100;
            let max_width = (inner_area.width * 45) / 100;
            requested
                .max(26)
                .min(max_width)
                .min(inner_area.width.saturating_sub(42))
        };

        let vertical = RatLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // View tabs
                Constraint::Min(1),    // Content (calendar + panel)
                Constraint::Length(1), // Status
            ])
            .split(inner_area);

        let horizontal = RatLayout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(panel_width)])
            .split(vertical[1]);

        Self {
            inner_area,
            tabs_area: vertical[0],
            calendar_area: horizontal[0],
            panel_area: horizontal[1],
            status_area: vertical[2],
        }
    }
}
