// theme support for the tui

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeKind {
    Dark,
    Light,
    Dracula,
    Nord,
    CatppuccinLatte,
    CatppuccinMocha,
}

impl ThemeKind {
    pub const ALL: &'static [ThemeKind] = &[
        Self::Dark,
        Self::Light,
        Self::Dracula,
        Self::Nord,
        Self::CatppuccinLatte,
        Self::CatppuccinMocha,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
            Self::Dracula => "dracula",
            Self::Nord => "nord",
            Self::CatppuccinLatte => "catppuccin latte",
            Self::CatppuccinMocha => "catppuccin mocha",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|&t| t == self).unwrap_or(0)
    }
}

/// Light terminals get the light theme, everything else dark.
pub fn detect_theme() -> ThemeKind {
    match terminal_light::luma() {
        Ok(luma) if luma > 0.6 => ThemeKind::Light,
        _ => ThemeKind::Dark,
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub accent: Color,
    pub border: Color,
    pub selection: Color,
    pub error: Color,
    pub success: Color,
    pub warning: Color,
    pub muted: Color,
}

impl Theme {
    pub fn from_kind(kind: ThemeKind) -> Self {
        let rgb = Color::Rgb;
        match kind {
            ThemeKind::Dark => Self {
                bg: rgb(20, 20, 30),
                fg: rgb(220, 220, 230),
                accent: rgb(100, 150, 255),
                border: rgb(60, 60, 80),
                selection: rgb(50, 50, 70),
                error: rgb(255, 100, 100),
                success: rgb(100, 255, 150),
                warning: rgb(255, 200, 100),
                muted: rgb(120, 120, 140),
            },
            ThemeKind::Light => Self {
                bg: rgb(250, 250, 252),
                fg: rgb(30, 30, 40),
                accent: rgb(50, 100, 200),
                border: rgb(200, 200, 210),
                selection: rgb(230, 240, 255),
                error: rgb(200, 50, 50),
                success: rgb(50, 150, 80),
                warning: rgb(200, 150, 50),
                muted: rgb(140, 140, 150),
            },
            ThemeKind::Dracula => Self {
                bg: rgb(40, 42, 54),
                fg: rgb(248, 248, 242),
                accent: rgb(189, 147, 249),
                border: rgb(68, 71, 90),
                selection: rgb(68, 71, 90),
                error: rgb(255, 85, 85),
                success: rgb(80, 250, 123),
                warning: rgb(255, 184, 108),
                muted: rgb(98, 114, 164),
            },
            ThemeKind::Nord => Self {
                bg: rgb(46, 52, 64),
                fg: rgb(236, 239, 244),
                accent: rgb(136, 192, 208),
                border: rgb(67, 76, 94),
                selection: rgb(67, 76, 94),
                error: rgb(191, 97, 106),
                success: rgb(163, 190, 140),
                warning: rgb(235, 203, 139),
                muted: rgb(76, 86, 106),
            },
            ThemeKind::CatppuccinLatte => Self {
                bg: rgb(239, 241, 245),
                fg: rgb(76, 79, 105),
                accent: rgb(114, 135, 253),
                border: rgb(204, 208, 218),
                selection: rgb(188, 192, 204),
                error: rgb(210, 15, 57),
                success: rgb(64, 160, 43),
                warning: rgb(223, 142, 29),
                muted: rgb(108, 111, 133),
            },
            ThemeKind::CatppuccinMocha => Self {
                bg: rgb(30, 30, 46),
                fg: rgb(205, 214, 244),
                accent: rgb(180, 190, 254),
                border: rgb(49, 50, 68),
                selection: rgb(69, 71, 90),
                error: rgb(243, 139, 168),
                success: rgb(166, 227, 161),
                warning: rgb(249, 226, 175),
                muted: rgb(166, 173, 200),
            },
        }
    }

    // style helpers
    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn active_border(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .bg(self.selection)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn success(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn warning(&self) -> Style {
        Style::default().fg(self.warning)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }
}
