use ratatui::style::{Color, Modifier, Style};
use std::str::FromStr;

/// Fixed ordered palette used for deterministic developer tags.
pub const TAG_PALETTE: [Color; 17] = [
    Color::Rgb(239, 68, 68),   // red-500
    Color::Rgb(147, 197, 253), // blue-300
    Color::Rgb(22, 163, 74),   // green-600
    Color::Rgb(250, 205, 21),  // yellow-400
    Color::Rgb(67, 56, 202),   // indigo-700
    Color::Rgb(251, 207, 232), // pink-200
    Color::Rgb(168, 85, 247),  // purple-500
    Color::Rgb(110, 231, 183), // emerald-300
    Color::Rgb(8, 145, 178),   // cyan-600
    Color::Rgb(190, 242, 100), // lime-400
    Color::Rgb(20, 184, 166),  // teal-500
    Color::Rgb(253, 186, 116), // orange-300
    Color::Rgb(225, 29, 72),   // rose-600
    Color::Rgb(96, 165, 250),  // sky-400
    Color::Rgb(192, 38, 211),  // fuchsia-700
    Color::Rgb(233, 213, 255), // violet-200
    Color::Rgb(245, 158, 11),  // amber-500
];

/// Deterministic mapping from an arbitrary string to a palette entry:
/// sum of char code points modulo the palette size. Different strings may
/// collide on the same color.
pub fn color_for(input: &str) -> Color {
    let sum: usize = input.chars().map(|c| c as usize).sum();
    TAG_PALETTE[sum % TAG_PALETTE.len()]
}

/// Complete theme configuration for ratatui
#[derive(Clone)]
pub struct ThemeConfig {
    pub list_normal: Style,
    pub list_selected: Style,
    pub border: Style,
    pub border_selected: Style,
    pub title: Style,
    pub text: Style,
    pub dim: Style,
    pub tag_date: Style,
    pub tag_free: Style,
    pub tag_paid: Style,
    pub link: Style,
    pub error: Style,
}

/// Named themes selectable with `--theme`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dracula,
    SolarizedDark,
    Gruvbox,
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dracula" => Ok(Theme::Dracula),
            "solarized" | "solarized_dark" => Ok(Theme::SolarizedDark),
            "gruvbox" => Ok(Theme::Gruvbox),
            other => Err(format!(
                "Unknown theme: {} (expected dracula, solarized, gruvbox)",
                other
            )),
        }
    }
}

impl Theme {
    pub fn config(&self) -> ThemeConfig {
        match self {
            Theme::Dracula => dracula_theme(),
            Theme::SolarizedDark => solarized_dark(),
            Theme::Gruvbox => gruvbox_theme(),
        }
    }
}

/// Returns a ThemeConfig based on the Dracula color palette.
fn dracula_theme() -> ThemeConfig {
    // Dracula palette
    let bg = Color::Rgb(40, 42, 54);
    let selection = Color::Rgb(68, 71, 90);
    let fg = Color::Rgb(248, 248, 242);
    let comment = Color::Rgb(98, 114, 164);
    let purple = Color::Rgb(189, 147, 249);
    let green = Color::Rgb(80, 250, 123);
    let orange = Color::Rgb(255, 184, 108);
    let cyan = Color::Rgb(139, 233, 253);
    let red = Color::Rgb(255, 85, 85);

    ThemeConfig {
        list_normal: Style::default().fg(fg).bg(bg),
        list_selected: Style::default()
            .fg(fg)
            .bg(selection)
            .add_modifier(Modifier::BOLD),
        border: Style::default().fg(comment),
        border_selected: Style::default().fg(purple),
        title: Style::default().fg(purple).add_modifier(Modifier::BOLD),
        text: Style::default().fg(fg).bg(bg),
        dim: Style::default().fg(comment),
        tag_date: Style::default().fg(bg).bg(comment).add_modifier(Modifier::BOLD),
        tag_free: Style::default().fg(bg).bg(green).add_modifier(Modifier::BOLD),
        tag_paid: Style::default().fg(bg).bg(orange).add_modifier(Modifier::BOLD),
        link: Style::default().fg(cyan).add_modifier(Modifier::UNDERLINED),
        error: Style::default().fg(red).add_modifier(Modifier::BOLD),
    }
}

/// Returns a ThemeConfig based on the Solarized Dark color palette.
fn solarized_dark() -> ThemeConfig {
    // Solarized Dark palette
    let base03 = Color::Rgb(0, 43, 54);
    let base02 = Color::Rgb(7, 54, 66);
    let base01 = Color::Rgb(88, 110, 117);
    let base0 = Color::Rgb(131, 148, 150);
    let base3 = Color::Rgb(253, 246, 227);
    let orange = Color::Rgb(203, 75, 22);
    let red = Color::Rgb(220, 50, 47);
    let blue = Color::Rgb(38, 139, 210);
    let cyan = Color::Rgb(42, 161, 152);
    let green = Color::Rgb(133, 153, 0);

    ThemeConfig {
        list_normal: Style::default().fg(base0).bg(base02),
        list_selected: Style::default()
            .fg(base3)
            .bg(blue)
            .add_modifier(Modifier::BOLD),
        border: Style::default().fg(base01),
        border_selected: Style::default().fg(blue),
        title: Style::default().fg(blue).add_modifier(Modifier::BOLD),
        text: Style::default().fg(base0).bg(base02),
        dim: Style::default().fg(base01),
        tag_date: Style::default().fg(base03).bg(base01).add_modifier(Modifier::BOLD),
        tag_free: Style::default().fg(base03).bg(green).add_modifier(Modifier::BOLD),
        tag_paid: Style::default().fg(base03).bg(orange).add_modifier(Modifier::BOLD),
        link: Style::default().fg(cyan).add_modifier(Modifier::UNDERLINED),
        error: Style::default().fg(red).add_modifier(Modifier::BOLD),
    }
}

/// Returns a ThemeConfig based on the Gruvbox Dark color palette.
fn gruvbox_theme() -> ThemeConfig {
    // Gruvbox Dark palette
    let bg0 = Color::Rgb(40, 40, 40);
    let fg1 = Color::Rgb(235, 219, 178);
    let gray = Color::Rgb(146, 131, 116);
    let blue = Color::Rgb(69, 133, 136);
    let green = Color::Rgb(152, 151, 26);
    let orange = Color::Rgb(214, 93, 14);
    let red = Color::Rgb(204, 36, 29);

    ThemeConfig {
        list_normal: Style::default().fg(fg1).bg(bg0),
        list_selected: Style::default()
            .fg(bg0)
            .bg(fg1)
            .add_modifier(Modifier::BOLD),
        border: Style::default().fg(gray),
        border_selected: Style::default().fg(orange),
        title: Style::default().fg(orange).add_modifier(Modifier::BOLD),
        text: Style::default().fg(fg1).bg(bg0),
        dim: Style::default().fg(gray),
        tag_date: Style::default().fg(bg0).bg(gray).add_modifier(Modifier::BOLD),
        tag_free: Style::default().fg(bg0).bg(green).add_modifier(Modifier::BOLD),
        tag_paid: Style::default().fg(bg0).bg(orange).add_modifier(Modifier::BOLD),
        link: Style::default().fg(blue).add_modifier(Modifier::UNDERLINED),
        error: Style::default().fg(red).add_modifier(Modifier::BOLD),
    }
}
