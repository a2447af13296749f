use chrono::{DateTime, Local};
use frontdesk_core::{Announcer, Notifier};

/// Prints notifications as timestamped lines; they scroll away on their own.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        println!("{}", notice_line(Local::now(), message));
    }
}

pub(crate) fn notice_line(at: DateTime<Local>, message: &str) -> String {
    format!("[{}] {}", at.format("%H:%M:%S"), message)
}

/// No speech engine in a terminal: spoken text and audio links are echoed.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ConsoleAnnouncer {
    pub quiet: bool,
}

impl Announcer for ConsoleAnnouncer {
    fn announce(&self, text: &str) {
        if !self.quiet {
            println!("  (say) {text}");
        }
    }

    fn play(&self, audio_url: &str) {
        if !self.quiet {
            println!("  (audio) {audio_url}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn notice_carries_wall_clock_time() {
        let at = Local.with_ymd_and_hms(2024, 5, 1, 9, 7, 3).unwrap();
        assert_eq!(
            notice_line(at, "Request resolved and learned!"),
            "[09:07:03] Request resolved and learned!"
        );
    }
}
