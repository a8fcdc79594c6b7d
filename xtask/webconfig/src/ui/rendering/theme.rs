use crate::ui::state::{StatusKind, ValueClass};
use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    // Colors
    pub fg: Color,
    pub border: Color,
    pub highlight: Color,
    pub disabled: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub new_item: Color,
    pub module: Color,

    // Styles
    pub selected_modifier: Modifier,
}

impl Theme {
    pub fn default_dark() -> Self {
        Self {
            fg: Color::White,
            border: Color::Gray,
            highlight: Color::Cyan,
            disabled: Color::DarkGray,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Blue,
            new_item: Color::Magenta,
            module: Color::Yellow,
            selected_modifier: Modifier::BOLD,
        }
    }

    pub fn get_border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn get_selected_style(&self) -> Style {
        Style::default()
            .fg(self.highlight)
            .add_modifier(self.selected_modifier)
    }

    /// Row under the cursor that is not the selected item.
    pub fn get_cursor_style(&self) -> Style {
        Style::default().add_modifier(Modifier::REVERSED)
    }

    pub fn get_disabled_style(&self) -> Style {
        Style::default().fg(self.disabled)
    }

    pub fn get_success_style(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn get_warning_style(&self) -> Style {
        Style::default().fg(self.warning)
    }

    pub fn get_error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn get_info_style(&self) -> Style {
        Style::default().fg(self.info)
    }

    pub fn get_new_item_style(&self) -> Style {
        Style::default().fg(self.new_item)
    }

    pub fn get_value_style(&self, class: &ValueClass) -> Style {
        match class {
            ValueClass::Bool(v) if v == "y" => Style::default().fg(self.success),
            ValueClass::Bool(v) if v == "n" => Style::default().fg(self.error),
            ValueClass::Bool(_) => Style::default().fg(self.fg),
            ValueClass::TristateModule => Style::default().fg(self.module),
            ValueClass::Plain => Style::default().fg(self.info),
        }
    }

    pub fn get_status_style(&self, kind: StatusKind) -> Style {
        match kind {
            StatusKind::Info => self.get_info_style(),
            StatusKind::Success => self.get_success_style(),
            StatusKind::Error => self.get_error_style(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_and_status_styles() {
        let theme = Theme::default();
        let y = theme.get_value_style(&ValueClass::Bool("y".to_string()));
        let n = theme.get_value_style(&ValueClass::Bool("n".to_string()));

        assert_eq!(y.fg, Some(Color::Green));
        assert_eq!(n.fg, Some(Color::Red));
        assert_eq!(theme.get_value_style(&ValueClass::TristateModule).fg, Some(Color::Yellow));
        assert_eq!(theme.get_status_style(StatusKind::Error), n);
    }
}
