use crate::model::CardStyle;
use ratatui::style::{Color, Modifier, Style};
use std::str::FromStr;

/// Border and fill colors for one vehicle card variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardColors {
    pub border: Color,
    pub fill: Color,
    pub text: Color,
}

/// Card colors per [`CardStyle`]. These follow the site and do not change
/// with the UI theme.
#[derive(Clone, Copy, Debug)]
pub struct CardPalette {
    pub premium: CardColors,
    pub special: CardColors,
    pub clan: CardColors,
    pub regular: CardColors,
}

impl CardPalette {
    pub fn colors(&self, style: CardStyle) -> CardColors {
        match style {
            CardStyle::Premium => self.premium,
            CardStyle::Special => self.special,
            CardStyle::Clan => self.clan,
            CardStyle::Regular => self.regular,
        }
    }
}

fn card_palette() -> CardPalette {
    let white = Color::Rgb(255, 255, 255);
    CardPalette {
        premium: CardColors {
            border: Color::Rgb(234, 179, 8),
            fill: Color::Rgb(250, 204, 21),
            text: Color::Rgb(0, 0, 0),
        },
        special: CardColors {
            border: Color::Rgb(146, 64, 14),
            fill: Color::Rgb(120, 53, 15),
            text: white,
        },
        clan: CardColors {
            border: Color::Rgb(22, 101, 52),
            fill: Color::Rgb(20, 83, 45),
            text: white,
        },
        regular: CardColors {
            border: Color::Rgb(21, 94, 117),
            fill: Color::Rgb(22, 78, 99),
            text: white,
        },
    }
}

/// Complete theme configuration for ratatui
#[derive(Clone)]
pub struct ThemeConfig {
    pub background: Color,
    pub border: Style,
    pub border_selected: Style,
    pub title: Style,
    pub text: Style,
    pub dim: Style,
    pub error: Style,
    pub button: Style,
    pub button_busy: Style,
    pub status: Style,
    pub cards: CardPalette,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Dracula,
    Gruvbox,
    Solarized,
}

impl Theme {
    pub fn config(self) -> ThemeConfig {
        match self {
            Theme::Dracula => dracula_theme(),
            Theme::Gruvbox => gruvbox_theme(),
            Theme::Solarized => solarized_dark(),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dracula" => Ok(Theme::Dracula),
            "gruvbox" => Ok(Theme::Gruvbox),
            "solarized" | "solarized-dark" => Ok(Theme::Solarized),
            other => Err(format!(
                "unknown theme '{other}', expected dracula, gruvbox or solarized"
            )),
        }
    }
}

/// Returns a ThemeConfig based on the Solarized Dark color palette.
pub fn solarized_dark() -> ThemeConfig {
    let base03 = Color::Rgb(0, 43, 54);
    let base02 = Color::Rgb(7, 54, 66);
    let base01 = Color::Rgb(88, 110, 117);
    let base0 = Color::Rgb(131, 148, 150);
    let base3 = Color::Rgb(253, 246, 227);
    let red = Color::Rgb(220, 50, 47);
    let blue = Color::Rgb(38, 139, 210);
    let green = Color::Rgb(133, 153, 0);

    ThemeConfig {
        background: base03,
        border: Style::default().fg(base01),
        border_selected: Style::default().fg(blue),
        title: Style::default().fg(blue).add_modifier(Modifier::BOLD),
        text: Style::default().fg(base0).bg(base03),
        dim: Style::default().fg(base01),
        error: Style::default().fg(red).add_modifier(Modifier::BOLD),
        button: Style::default()
            .fg(base3)
            .bg(blue)
            .add_modifier(Modifier::BOLD),
        button_busy: Style::default().fg(base01).bg(base02),
        status: Style::default().fg(green),
        cards: card_palette(),
    }
}

/// Returns a ThemeConfig based on the Dracula color palette.
pub fn dracula_theme() -> ThemeConfig {
    let bg = Color::Rgb(40, 42, 54);
    let selection = Color::Rgb(68, 71, 90);
    let fg = Color::Rgb(248, 248, 242);
    let comment = Color::Rgb(98, 114, 164);
    let purple = Color::Rgb(189, 147, 249);
    let red = Color::Rgb(255, 85, 85);
    let green = Color::Rgb(80, 250, 123);

    ThemeConfig {
        background: bg,
        border: Style::default().fg(comment),
        border_selected: Style::default().fg(purple),
        title: Style::default().fg(purple).add_modifier(Modifier::BOLD),
        text: Style::default().fg(fg).bg(bg),
        dim: Style::default().fg(comment),
        error: Style::default().fg(red).add_modifier(Modifier::BOLD),
        button: Style::default()
            .fg(bg)
            .bg(purple)
            .add_modifier(Modifier::BOLD),
        button_busy: Style::default().fg(comment).bg(selection),
        status: Style::default().fg(green),
        cards: card_palette(),
    }
}

/// Returns a ThemeConfig based on the Gruvbox Dark color palette.
pub fn gruvbox_theme() -> ThemeConfig {
    let bg0 = Color::Rgb(40, 40, 40);
    let bg1 = Color::Rgb(60, 56, 54);
    let fg1 = Color::Rgb(235, 219, 178);
    let gray = Color::Rgb(146, 131, 116);
    let red = Color::Rgb(204, 36, 29);
    let green = Color::Rgb(152, 151, 26);
    let orange = Color::Rgb(214, 93, 14);

    ThemeConfig {
        background: bg0,
        border: Style::default().fg(gray),
        border_selected: Style::default().fg(orange),
        title: Style::default().fg(orange).add_modifier(Modifier::BOLD),
        text: Style::default().fg(fg1).bg(bg0),
        dim: Style::default().fg(gray),
        error: Style::default().fg(red).add_modifier(Modifier::BOLD),
        button: Style::default()
            .fg(bg0)
            .bg(orange)
            .add_modifier(Modifier::BOLD),
        button_busy: Style::default().fg(gray).bg(bg1),
        status: Style::default().fg(green),
        cards: card_palette(),
    }
}
