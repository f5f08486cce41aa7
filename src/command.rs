//! The `/admin` command: paged help, configuration reload, and tab
//! completion. Permission checks go through the host-facing
//! [`CommandSender`] seam.

use crate::color::Colorizer;
use crate::config::{render_template, Messages, Settings};

/// Host-facing view of whoever ran the command.
pub trait CommandSender {
    fn has_permission(&self, node: &str) -> bool;
    fn send_message(&mut self, message: &str);
}

/// What the host should do after dispatch. `ReloadRequested` means the
/// sender passed the reload permission check and the plugin should
/// re-read its configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminOutcome {
    Handled,
    ReloadRequested,
}

pub struct AdminCommand<'a> {
    settings: &'a Settings,
    messages: &'a Messages,
    colorizer: &'a Colorizer,
}

impl<'a> AdminCommand<'a> {
    pub fn new(settings: &'a Settings, messages: &'a Messages, colorizer: &'a Colorizer) -> Self {
        Self {
            settings,
            messages,
            colorizer,
        }
    }

    /// Dispatch one invocation. Unknown sub-commands and wrong arities
    /// fall back to help page 1; a non-numeric help page yields a
    /// templated error instead of failing dispatch.
    pub fn execute(&self, sender: &mut impl CommandSender, args: &[&str]) -> AdminOutcome {
        if !sender.has_permission(&self.settings.permissions.admin) {
            self.send(sender, &self.messages.no_permission);
            return AdminOutcome::Handled;
        }

        match args {
            [sub] if sub.eq_ignore_ascii_case("reload") => {
                if !sender.has_permission(&self.settings.permissions.admin_reload) {
                    self.send(sender, &self.messages.no_permission);
                } else {
                    self.send(sender, &self.messages.reload_done);
                    return AdminOutcome::ReloadRequested;
                }
            }
            [sub, page] if sub.eq_ignore_ascii_case("help") => {
                if contains_only_numbers(page) {
                    // Absurdly long digit strings clamp to the last page.
                    let page = page.parse::<usize>().unwrap_or(usize::MAX);
                    self.show_help(sender, page);
                } else {
                    let message =
                        render_template(&self.messages.only_numbers_allowed, &[("{arg}", page)]);
                    self.send(sender, &message);
                }
            }
            _ => self.show_help(sender, 1),
        }
        AdminOutcome::Handled
    }

    /// Tab completion. Depth 1 offers the sub-commands the sender may
    /// run; depth 2 offers the literal `[page]` hint after `help`.
    pub fn tab_complete(&self, sender: &impl CommandSender, args: &[&str]) -> Vec<String> {
        match args.len() {
            1 => {
                let mut completions = Vec::new();
                if sender.has_permission(&self.settings.permissions.admin) {
                    completions.push("help".to_string());
                    if sender.has_permission(&self.settings.permissions.admin_reload) {
                        completions.push("reload".to_string());
                    }
                }
                completions
            }
            2 if args[0].eq_ignore_ascii_case("help")
                && sender.has_permission(&self.settings.permissions.admin) =>
            {
                vec!["[page]".to_string()]
            }
            _ => Vec::new(),
        }
    }

    fn show_help(&self, sender: &mut impl CommandSender, requested_page: usize) {
        let page_size = self.settings.help_page_size.max(1);
        let lines = &self.messages.help_lines;
        let pages = lines.len().div_ceil(page_size).max(1);
        let page = requested_page.clamp(1, pages);

        let header = render_template(
            &self.messages.help_header,
            &[
                ("{page}", page.to_string().as_str()),
                ("{pages}", pages.to_string().as_str()),
            ],
        );
        self.send(sender, &header);
        for line in lines.iter().skip((page - 1) * page_size).take(page_size) {
            self.send(sender, line);
        }
    }

    fn send(&self, sender: &mut impl CommandSender, raw: &str) {
        sender.send_message(&self.colorizer.process(raw));
    }
}

fn contains_only_numbers(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeSender {
        permissions: Vec<&'static str>,
        received: Vec<String>,
    }

    impl FakeSender {
        fn with_permissions(permissions: Vec<&'static str>) -> Self {
            Self {
                permissions,
                received: Vec::new(),
            }
        }
    }

    impl CommandSender for FakeSender {
        fn has_permission(&self, node: &str) -> bool {
            self.permissions.contains(&node)
        }

        fn send_message(&mut self, message: &str) {
            self.received.push(message.to_string());
        }
    }

    fn fixtures() -> (Settings, Messages, Colorizer) {
        let mut settings = Settings::default();
        settings.help_page_size = 2;
        let mut messages = Messages::default();
        messages.help_lines = (1..=5).map(|i| format!("line {i}")).collect();
        messages.help_header = "help {page}/{pages}".to_string();
        (settings, messages, Colorizer::new(16))
    }

    #[test]
    fn missing_base_permission_is_rejected() {
        let (settings, messages, colorizer) = fixtures();
        let command = AdminCommand::new(&settings, &messages, &colorizer);
        let mut sender = FakeSender::with_permissions(vec![]);

        let outcome = command.execute(&mut sender, &[]);
        assert_eq!(outcome, AdminOutcome::Handled);
        assert_eq!(sender.received.len(), 1);
        assert!(sender.received[0].contains("permission"));
    }

    #[test]
    fn no_args_shows_first_help_page() {
        let (settings, messages, colorizer) = fixtures();
        let command = AdminCommand::new(&settings, &messages, &colorizer);
        let mut sender = FakeSender::with_permissions(vec!["voxdrops.admin"]);

        command.execute(&mut sender, &[]);
        assert_eq!(
            sender.received,
            vec!["help 1/3", "line 1", "line 2"]
        );
    }

    #[test]
    fn help_page_argument_selects_the_page() {
        let (settings, messages, colorizer) = fixtures();
        let command = AdminCommand::new(&settings, &messages, &colorizer);
        let mut sender = FakeSender::with_permissions(vec!["voxdrops.admin"]);

        command.execute(&mut sender, &["help", "3"]);
        assert_eq!(sender.received, vec!["help 3/3", "line 5"]);
    }

    #[test]
    fn out_of_range_page_clamps() {
        let (settings, messages, colorizer) = fixtures();
        let command = AdminCommand::new(&settings, &messages, &colorizer);
        let mut sender = FakeSender::with_permissions(vec!["voxdrops.admin"]);

        command.execute(&mut sender, &["help", "999"]);
        assert_eq!(sender.received[0], "help 3/3");
    }

    #[test]
    fn non_numeric_page_yields_templated_error() {
        let (settings, messages, colorizer) = fixtures();
        let command = AdminCommand::new(&settings, &messages, &colorizer);
        let mut sender = FakeSender::with_permissions(vec!["voxdrops.admin"]);

        command.execute(&mut sender, &["help", "abc"]);
        assert_eq!(sender.received.len(), 1);
        assert!(sender.received[0].contains("'abc'"));
    }

    #[test]
    fn unknown_subcommand_falls_back_to_help() {
        let (settings, messages, colorizer) = fixtures();
        let command = AdminCommand::new(&settings, &messages, &colorizer);
        let mut sender = FakeSender::with_permissions(vec!["voxdrops.admin"]);

        command.execute(&mut sender, &["bogus"]);
        assert_eq!(sender.received[0], "help 1/3");
    }

    #[test]
    fn reload_requires_its_own_permission() {
        let (settings, messages, colorizer) = fixtures();
        let command = AdminCommand::new(&settings, &messages, &colorizer);

        let mut denied = FakeSender::with_permissions(vec!["voxdrops.admin"]);
        assert_eq!(command.execute(&mut denied, &["reload"]), AdminOutcome::Handled);
        assert!(denied.received[0].contains("permission"));

        let mut allowed =
            FakeSender::with_permissions(vec!["voxdrops.admin", "voxdrops.admin.reload"]);
        assert_eq!(
            command.execute(&mut allowed, &["RELOAD"]),
            AdminOutcome::ReloadRequested
        );
    }

    #[test]
    fn tab_completion_is_permission_filtered() {
        let (settings, messages, colorizer) = fixtures();
        let command = AdminCommand::new(&settings, &messages, &colorizer);

        let none = FakeSender::with_permissions(vec![]);
        assert!(command.tab_complete(&none, &[""]).is_empty());

        let base = FakeSender::with_permissions(vec!["voxdrops.admin"]);
        assert_eq!(command.tab_complete(&base, &[""]), vec!["help"]);
        assert_eq!(command.tab_complete(&base, &["help", ""]), vec!["[page]"]);
        assert!(command.tab_complete(&base, &["reload", ""]).is_empty());

        let full = FakeSender::with_permissions(vec!["voxdrops.admin", "voxdrops.admin.reload"]);
        assert_eq!(command.tab_complete(&full, &[""]), vec!["help", "reload"]);
    }
}
