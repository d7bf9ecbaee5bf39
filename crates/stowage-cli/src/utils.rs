use std::{
    fmt::Display,
    sync::{LazyLock, RwLock},
};

use nu_ansi_term::Color;

pub static COLOR: LazyLock<RwLock<bool>> = LazyLock::new(|| RwLock::new(true));

pub fn set_color(enabled: bool) {
    match COLOR.write() {
        Ok(mut color) => *color = enabled,
        Err(poisoned) => *poisoned.into_inner() = enabled,
    }
}

fn color_enabled() -> bool {
    COLOR.read().map(|color| *color).unwrap_or(true)
}

pub fn term_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

pub struct Colored<T: Display>(pub Color, pub T);

impl<T: Display> Display for Colored<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if color_enabled() {
            write!(f, "{}", self.0.prefix())?;
            self.1.fmt(f)?;
            write!(f, "{}", self.0.suffix())
        } else {
            self.1.fmt(f)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colored_respects_switch() {
        set_color(false);
        assert_eq!(Colored(Color::Red, "plain").to_string(), "plain");

        set_color(true);
        let colored = Colored(Color::Red, "red").to_string();
        assert!(colored.contains("red"));
        assert_ne!(colored, "red");
    }
}
