use super::super::super::messages::Message;
use super::super::super::state::App;
use iced::keyboard::{Key, Modifiers, key};

impl App {
    pub(super) fn shortcut_message_for_key(
        &self,
        key: Key,
        modifiers: Modifiers,
    ) -> Option<Message> {
        let pressed = Self::key_token(&key)?;

        let bindings: [(&str, &str, Message); 8] = [
            (&self.config.key_next_post, "j", Message::NextPost),
            (&self.config.key_prev_post, "k", Message::PreviousPost),
            (&self.config.key_first_post, "g", Message::GoToFirst),
            (&self.config.key_last_post, "shift+g", Message::GoToLast),
            (&self.config.key_reply, "r", Message::GoToReply),
            (&self.config.key_new_post, "n", Message::SimulateNewPost),
            (&self.config.key_toggle_theme, "ctrl+t", Message::ToggleTheme),
            (&self.config.key_safe_quit, "q", Message::SafeQuit),
        ];
        bindings
            .into_iter()
            .find(|(raw, fallback, _)| Self::shortcut_matches(raw, fallback, &pressed, modifiers))
            .map(|(_, _, message)| message)
    }

    pub(super) fn key_token(key: &Key) -> Option<String> {
        match key.as_ref() {
            Key::Named(key::Named::Space) => Some("space".to_string()),
            Key::Named(key::Named::Home) => Some("home".to_string()),
            Key::Named(key::Named::End) => Some("end".to_string()),
            Key::Named(key::Named::ArrowDown) => Some("down".to_string()),
            Key::Named(key::Named::ArrowUp) => Some("up".to_string()),
            Key::Character(ch) => Some(ch.to_ascii_lowercase()),
            _ => None,
        }
    }

    pub(super) fn shortcut_matches(
        raw: &str,
        fallback: &str,
        pressed: &str,
        modifiers: Modifiers,
    ) -> bool {
        let normalized = Self::normalize_shortcut_token(raw, fallback);

        let mut required_ctrl = false;
        let mut required_alt = false;
        let mut required_logo = false;
        let mut required_shift = false;
        let mut required_key: Option<&str> = None;

        for token in normalized
            .split('+')
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            match token {
                "ctrl" | "control" => required_ctrl = true,
                "alt" => required_alt = true,
                "logo" | "meta" | "super" | "cmd" | "command" => required_logo = true,
                "shift" => required_shift = true,
                key => required_key = Some(key),
            }
        }

        let Some(required_key) = required_key else {
            return false;
        };
        if pressed != required_key {
            return false;
        }

        modifiers.control() == required_ctrl
            && modifiers.alt() == required_alt
            && modifiers.logo() == required_logo
            && modifiers.shift() == required_shift
    }

    pub(super) fn normalize_shortcut_token(raw: &str, fallback: &str) -> String {
        let normalized = raw.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            fallback.to_string()
        } else {
            normalized
                .replace("spacebar", "space")
                .replace("arrowdown", "down")
                .replace("arrowup", "up")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced::keyboard::Modifiers;

    #[test]
    fn normalizes_arrow_aliases() {
        assert_eq!(App::normalize_shortcut_token(" ArrowDown ", "x"), "down");
        assert_eq!(App::normalize_shortcut_token("", "shift+g"), "shift+g");
    }

    #[test]
    fn shift_distinguishes_first_from_last() {
        assert!(App::shortcut_matches("g", "g", "g", Modifiers::empty()));
        assert!(!App::shortcut_matches("g", "g", "g", Modifiers::SHIFT));
        assert!(App::shortcut_matches("shift+g", "shift+g", "g", Modifiers::SHIFT));
    }

    #[test]
    fn matches_ctrl_t_shortcut() {
        assert!(App::shortcut_matches("ctrl+t", "x", "t", Modifiers::CTRL));
    }

    #[test]
    fn rejects_unexpected_extra_modifier() {
        assert!(!App::shortcut_matches(
            "ctrl+t",
            "x",
            "t",
            Modifiers::CTRL | Modifiers::SHIFT,
        ));
    }

    #[test]
    fn uppercase_characters_are_lowered() {
        assert_eq!(
            App::key_token(&Key::Character("G".into())).as_deref(),
            Some("g")
        );
        assert_eq!(
            App::key_token(&Key::Named(key::Named::Home)).as_deref(),
            Some("home")
        );
        assert_eq!(App::key_token(&Key::Named(key::Named::Tab)), None);
    }
}
