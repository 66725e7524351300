//! Outcome-label classification.
//!
//! Every predicate is a case-insensitive substring test on the trimmed label.

const EXCLUDED_FROM_CONNECT: &[&str] = &[
    "gatekeeper",
    "gate keeper",
    "voicemail",
    "voice mail",
    "no answer",
    "noanswer",
];

const GATEKEEPER: &[&str] = &["gatekeeper", "gate keeper", "receptionist", "assistant"];

const MEETING: &[&str] = &["meeting scheduled", "meeting set", "appointment set", "scheduled"];

const NEGATIVE_OUTCOME: &[&str] = &["not interested", "wrong number", "bad number", "dnc", "not me"];

fn normalized(disposition: &str) -> String {
    disposition.trim().to_lowercase()
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

pub fn is_excluded_from_connect_rate(disposition: &str) -> bool {
    let lower = normalized(disposition);
    lower.is_empty() || contains_any(&lower, EXCLUDED_FROM_CONNECT)
}

pub fn is_gatekeeper(disposition: &str) -> bool {
    contains_any(&normalized(disposition), GATEKEEPER)
}

pub fn is_meeting_scheduled(disposition: &str) -> bool {
    let lower = normalized(disposition);
    contains_any(&lower, MEETING)
        || (lower.contains("meeting") && (lower.contains("set") || lower.contains("scheduled")))
}

/// Connect is the default for any label not excluded from the connect rate,
/// unless it names a negative outcome.
pub fn is_connect(disposition: &str) -> bool {
    if is_excluded_from_connect_rate(disposition) {
        return false;
    }
    !contains_any(&normalized(disposition), NEGATIVE_OUTCOME)
}

/// All facets of one label, computed together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub excluded_from_connect_rate: bool,
    pub connect: bool,
    pub gatekeeper: bool,
    pub meeting_scheduled: bool,
}

impl Classification {
    pub fn of(disposition: &str) -> Self {
        Self {
            excluded_from_connect_rate: is_excluded_from_connect_rate(disposition),
            connect: is_connect(disposition),
            gatekeeper: is_gatekeeper(disposition),
            meeting_scheduled: is_meeting_scheduled(disposition),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_label_is_excluded_and_nothing_else() {
        let facets = Classification::of("  ");
        assert!(facets.excluded_from_connect_rate);
        assert!(!facets.connect);
        assert!(!facets.gatekeeper);
        assert!(!facets.meeting_scheduled);
    }

    #[test]
    fn voicemail_and_no_answer_are_excluded() {
        for label in ["Voicemail", "Left Voice Mail", "No Answer", "NOANSWER"] {
            assert!(is_excluded_from_connect_rate(label), "{label}");
            assert!(!is_connect(label), "{label}");
        }
    }

    #[test]
    fn receptionist_is_gatekeeper_but_still_counts_as_connect() {
        assert!(is_gatekeeper("Spoke to Receptionist"));
        assert!(!is_excluded_from_connect_rate("Spoke to Receptionist"));
        assert!(is_connect("Spoke to Receptionist"));
    }

    #[test]
    fn negative_outcomes_are_not_connects_but_stay_in_rate() {
        for label in ["Not Interested", "Wrong Number", "Bad number", "DNC", "Not me"] {
            assert!(!is_connect(label), "{label}");
            assert!(!is_excluded_from_connect_rate(label), "{label}");
        }
        assert!(is_connect("Connected"));
        assert!(is_connect("Call back later"));
    }

    #[test]
    fn meeting_variants() {
        assert!(is_meeting_scheduled("Meeting Scheduled"));
        assert!(is_meeting_scheduled("meeting set"));
        assert!(is_meeting_scheduled("Appointment Set"));
        assert!(is_meeting_scheduled("Demo scheduled"));
        assert!(is_meeting_scheduled("Meeting - reset"));
        assert!(!is_meeting_scheduled("Meeting requested"));
        assert!(!is_meeting_scheduled("Connected"));
    }

    proptest! {
        #[test]
        fn gatekeeper_anywhere_forces_exclusion(prefix in "[a-z ]{0,8}", suffix in "[a-z ]{0,8}", upper in any::<bool>()) {
            let word = if upper { "GATEKEEPER" } else { "Gatekeeper" };
            let label = format!("{prefix}{word}{suffix}");
            let facets = Classification::of(&label);
            prop_assert!(facets.gatekeeper);
            prop_assert!(facets.excluded_from_connect_rate);
            prop_assert!(!facets.connect);
        }

        #[test]
        fn exclusion_always_forbids_connect(label in ".{0,24}") {
            let facets = Classification::of(&label);
            prop_assert!(!(facets.excluded_from_connect_rate && facets.connect));
        }
    }
}
