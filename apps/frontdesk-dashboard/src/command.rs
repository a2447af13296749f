use frontdesk_core::Tab;

/// One line typed at the dashboard prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Tab(Tab),
    /// `answer: None` retries the draft kept from a failed attempt.
    Resolve {
        id: String,
        answer: Option<String>,
    },
    Call(Option<String>),
    Clear,
    Refresh,
    Help,
    Quit,
}

pub(crate) const HELP: &str = "\
commands:
  tab <pending|resolved|learned|statistics>   switch view (or 1-4)
  resolve <id> [answer]                       answer a pending request
  call [question]                             simulate an incoming call
  clear                                       wipe pending and learned data
  refresh                                     poll now
  quit";

/// `Ok(None)` for a blank line.
pub(crate) fn parse(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    let rest = (!rest.is_empty()).then(|| rest.to_string());

    let cmd = match head.to_ascii_lowercase().as_str() {
        "1" => Command::Tab(Tab::Pending),
        "2" => Command::Tab(Tab::Resolved),
        "3" => Command::Tab(Tab::Learned),
        "4" => Command::Tab(Tab::Statistics),
        "tab" | "t" => {
            let slug = rest.ok_or("usage: tab <pending|resolved|learned|statistics>")?;
            let tab = Tab::from_slug(&slug).ok_or_else(|| format!("unknown tab '{slug}'"))?;
            Command::Tab(tab)
        }
        "stats" => Command::Tab(Tab::Statistics),
        "resolve" | "r" => {
            let rest = rest.ok_or("usage: resolve <id> [answer]")?;
            let (id, answer) = match rest.split_once(char::is_whitespace) {
                Some((id, answer)) => (id.to_string(), Some(answer.trim().to_string())),
                None => (rest, None),
            };
            Command::Resolve { id, answer }
        }
        "call" | "c" => Command::Call(rest),
        "clear" => Command::Clear,
        "refresh" | "poll" => Command::Refresh,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command '{other}' (try help)")),
    };
    Ok(Some(cmd))
}
