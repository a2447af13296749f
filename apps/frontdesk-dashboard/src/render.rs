use std::fmt::Write as _;

use frontdesk_core::{DashboardState, Statistics, Tab};
use frontdesk_protocol::PendingRequest;
use serde_json::{json, Value};

const BAR_WIDTH: usize = 30;

/// Text view of the active tab, header included.
pub(crate) fn render(state: &DashboardState) -> String {
    let mut out = header(state);
    out.push('\n');
    match state.active_tab() {
        Tab::Pending => pending(&mut out, state.pending()),
        Tab::Resolved => resolved(&mut out, state),
        Tab::Learned => learned(&mut out, state),
        Tab::Statistics => statistics(&mut out, &state.statistics()),
    }
    out
}

fn header(state: &DashboardState) -> String {
    let tabs = Tab::ALL
        .iter()
        .map(|tab| {
            let label = match count_for(state, *tab) {
                Some(n) => format!("{} ({n})", tab.display_label()),
                None => tab.display_label().to_string(),
            };
            if *tab == state.active_tab() {
                format!("[{label}]")
            } else {
                format!(" {label} ")
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    if state.is_loading() {
        format!("{tabs}  refreshing...")
    } else {
        tabs
    }
}

fn count_for(state: &DashboardState, tab: Tab) -> Option<usize> {
    match tab {
        Tab::Pending => Some(state.pending().len()),
        Tab::Resolved | Tab::Learned => Some(state.resolved().len()),
        Tab::Statistics => None,
    }
}

fn pending(out: &mut String, requests: &[PendingRequest]) {
    if requests.is_empty() {
        out.push_str("  no pending requests\n");
        return;
    }
    for request in requests {
        let _ = writeln!(out, "  {}  {}", request.id, request.question);
        let details = context_line(request);
        if !details.is_empty() {
            let _ = writeln!(out, "      {details}");
        }
    }
}

/// Scalar context fields, in key order; nested values are skipped.
fn context_line(request: &PendingRequest) -> String {
    let mut keys: Vec<&String> = request.context.keys().collect();
    keys.sort();
    keys.into_iter()
        .filter_map(|key| {
            let value = match &request.context[key.as_str()] {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some(format!("{key}={value}"))
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn resolved(out: &mut String, state: &DashboardState) {
    if state.resolved().is_empty() {
        out.push_str("  nothing resolved yet\n");
        return;
    }
    for entry in state.resolved() {
        let _ = writeln!(out, "  Q: {}", entry.question);
        let _ = writeln!(out, "  A: {}", entry.answer);
    }
}

fn learned(out: &mut String, state: &DashboardState) {
    if state.resolved().is_empty() {
        out.push_str("  no learned answers\n");
        return;
    }
    for entry in state.resolved() {
        let _ = writeln!(out, "  {} -> {}", entry.question, entry.learned_answer);
    }
}

fn statistics(out: &mut String, stats: &Statistics) {
    let _ = writeln!(out, "  resolved: {}", stats.resolved);
    let _ = writeln!(out, "  pending:  {}", stats.pending);
    let peak = stats
        .trend
        .iter()
        .flat_map(|p| [p.resolved, p.pending])
        .max()
        .unwrap_or(0)
        .max(1);
    out.push_str("  weekly trend\n");
    for point in &stats.trend {
        let _ = writeln!(
            out,
            "    {:<7} resolved {:>3} {}",
            point.name,
            point.resolved,
            bar(point.resolved, peak)
        );
        let _ = writeln!(
            out,
            "    {:<7} pending  {:>3} {}",
            "",
            point.pending,
            bar(point.pending, peak)
        );
    }
}

fn bar(value: usize, peak: usize) -> String {
    "#".repeat(value * BAR_WIDTH / peak)
}

/// Machine-readable view for `--json`.
pub(crate) fn to_json(state: &DashboardState) -> Value {
    json!({
        "tab": state.active_tab(),
        "loading": state.is_loading(),
        "pending": state.pending(),
        "resolved": state.resolved(),
        "statistics": state.statistics(),
    })
}

/// Text or JSON frame for the watch loop.
pub(crate) fn frame(state: &DashboardState, json: bool) -> String {
    if json {
        serde_json::to_string(&to_json(state)).unwrap_or_else(|_| "{}".to_string())
    } else {
        render(state)
    }
}

/// Decides when the watch loop reprints. Frames are compared with the
/// loading flag cleared, so a poll that brings nothing new stays quiet.
#[derive(Debug, Default)]
pub(crate) struct Redraw {
    last: String,
}

impl Redraw {
    /// The frame to print, or `None` when only the loading flag moved.
    pub fn changed(&mut self, state: &DashboardState, json: bool) -> Option<String> {
        let key = frame(&settled(state), json);
        if key == self.last {
            return None;
        }
        self.last = key;
        Some(frame(state, json))
    }

    /// The frame to print after an explicit command; always printed.
    pub fn force(&mut self, state: &DashboardState, json: bool) -> String {
        self.last = frame(&settled(state), json);
        frame(state, json)
    }
}

fn settled(state: &DashboardState) -> DashboardState {
    let mut state = state.clone();
    state.set_loading(false);
    state
}
