use crate::model::{Conclusion, RunStatus};

/// Themed icon reference. `name` is resolved by the host's icon theme;
/// `glyph` is the terminal fallback used by the dump output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Icon {
    pub name: &'static str,
    pub glyph: &'static str,
}

const fn icon(name: &'static str, glyph: &'static str) -> Icon {
    Icon { name, glyph }
}

/// Pure mapping from run/job/step state to an icon.
pub fn icon_for(status: RunStatus, conclusion: Option<Conclusion>) -> Icon {
    match (status, conclusion) {
        (RunStatus::Completed, Some(Conclusion::Success)) => icon("pass", "✓"),
        (RunStatus::Completed, Some(Conclusion::Failure)) => icon("fail", "✗"),
        (RunStatus::Completed, Some(Conclusion::TimedOut)) => icon("timed-out", "✗"),
        (RunStatus::Completed, Some(Conclusion::Cancelled)) => icon("cancelled", "⊘"),
        (RunStatus::Completed, Some(Conclusion::Skipped)) => icon("skipped", "⊘"),
        (RunStatus::Completed, _) => icon("neutral", "·"),
        (RunStatus::InProgress, _) => icon("in-progress", "⟳"),
        _ => icon("queued", "·"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conclusion_drives_completed_icons() {
        assert_eq!(icon_for(RunStatus::Completed, Some(Conclusion::Success)).name, "pass");
        assert_eq!(icon_for(RunStatus::Completed, Some(Conclusion::Failure)).name, "fail");
        assert_eq!(icon_for(RunStatus::Completed, None).name, "neutral");
    }

    #[test]
    fn pending_statuses_share_the_queued_icon() {
        for status in [RunStatus::Queued, RunStatus::Waiting, RunStatus::Pending, RunStatus::Requested] {
            assert_eq!(icon_for(status, None).name, "queued");
        }
        assert_eq!(icon_for(RunStatus::InProgress, None).name, "in-progress");
    }
}
