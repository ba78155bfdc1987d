use std::collections::HashMap;

use derive_deref::{Deref, DerefMut};
use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Deserializer};

use crate::app::Mode;

/// Per-mode named styles, written in config as strings like
/// `"bold yellow on darkgray"`.
#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct Styles(pub HashMap<Mode, HashMap<String, Style>>);

impl<'de> Deserialize<'de> for Styles {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed_map = HashMap::<Mode, HashMap<String, String>>::deserialize(deserializer)?;

        let styles = parsed_map
            .into_iter()
            .map(|(mode, inner)| {
                let inner = inner
                    .into_iter()
                    .map(|(key, line)| (key, parse_style(&line)))
                    .collect();
                (mode, inner)
            })
            .collect();

        Ok(Styles(styles))
    }
}

/// Parses `"[modifiers] [fg] [on bg]"`. Unknown words are ignored rather
/// than rejected so a typo in a user config degrades to the default style.
pub fn parse_style(line: &str) -> Style {
    let line = line.to_lowercase();
    let (foreground, background) = match line.split_once("on ") {
        Some((fg, bg)) => (fg.to_string(), bg.to_string()),
        None => (line.clone(), String::new()),
    };

    let (foreground, fg_modifiers) = process_color_string(&foreground);
    let (background, bg_modifiers) = process_color_string(&background);

    let mut style = Style::default();
    if let Ok(fg) = foreground.parse::<Color>() {
        style = style.fg(fg);
    }
    if let Ok(bg) = background.parse::<Color>() {
        style = style.bg(bg);
    }
    style.add_modifier(fg_modifiers | bg_modifiers)
}

fn process_color_string(color_str: &str) -> (String, Modifier) {
    let mut modifiers = Modifier::empty();
    if color_str.contains("bold") {
        modifiers |= Modifier::BOLD;
    }
    if color_str.contains("dim") {
        modifiers |= Modifier::DIM;
    }
    if color_str.contains("italic") {
        modifiers |= Modifier::ITALIC;
    }
    if color_str.contains("underline") {
        modifiers |= Modifier::UNDERLINED;
    }
    if color_str.contains("inverse") {
        modifiers |= Modifier::REVERSED;
    }

    let color = color_str
        .replace("grey", "gray")
        .replace("bold", "")
        .replace("dim", "")
        .replace("italic", "")
        .replace("underline", "")
        .replace("inverse", "")
        .trim()
        .to_string();

    (color, modifiers)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_plain_color() {
        assert_eq!(parse_style("red"), Style::default().fg(Color::Red));
    }

    #[test]
    fn parse_fg_on_bg() {
        assert_eq!(
            parse_style("white on blue"),
            Style::default().fg(Color::White).bg(Color::Blue)
        );
    }

    #[test]
    fn parse_modifiers() {
        assert_eq!(
            parse_style("bold yellow on darkgray"),
            Style::default()
                .fg(Color::Yellow)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD)
        );
        assert_eq!(
            parse_style("underline"),
            Style::default().add_modifier(Modifier::UNDERLINED)
        );
    }

    #[test]
    fn unknown_words_fall_back_to_default() {
        assert_eq!(parse_style("no-such-color"), Style::default());
        assert_eq!(parse_style(""), Style::default());
    }

    #[test]
    fn deserialize_styles() {
        let styles: Styles =
            serde_json::from_str(r#"{"List": {"selected_row": "bold on darkgray"}}"#).unwrap();
        assert_eq!(
            styles.get(&Mode::List).unwrap().get("selected_row"),
            Some(
                &Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD)
            )
        );
    }
}
