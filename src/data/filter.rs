use crate::data::hazard::{Hazard, HazardType, Severity};
use serde::{Deserialize, Serialize};

/// Type and severity filter. `None` means "all".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    pub kind: Option<HazardType>,
    pub severity: Option<Severity>,
}

/// A partial change to [`Filters`]; fields left as `None` keep their current value.
///
/// Setting a field to `Some(None)` resets it to "all".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterUpdate {
    pub kind: Option<Option<HazardType>>,
    pub severity: Option<Option<Severity>>,
}

impl FilterUpdate {
    pub fn kind(kind: Option<HazardType>) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn severity(severity: Option<Severity>) -> Self {
        Self {
            severity: Some(severity),
            ..Self::default()
        }
    }
}

impl Filters {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn matches(&self, hazard: &Hazard) -> bool {
        self.kind.map_or(true, |kind| hazard.kind == kind)
            && self.severity.map_or(true, |severity| hazard.severity == severity)
    }

    /// Merges `update` into these filters; returns `true` if anything changed
    pub fn apply(&mut self, update: FilterUpdate) -> bool {
        let before = *self;
        if let Some(kind) = update.kind {
            self.kind = kind;
        }
        if let Some(severity) = update.severity {
            self.severity = severity;
        }
        before != *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::Point;
    use chrono::Utc;

    fn hazard(kind: HazardType, severity: Severity) -> Hazard {
        Hazard::new("h", kind, severity, Point::ORIGIN, Utc::now())
    }

    #[test]
    fn test_matches_every_combination() {
        for kind in HazardType::ALL {
            for severity in Severity::ALL {
                let h = hazard(kind, severity);
                assert!(Filters::all().matches(&h));
                assert!(Filters { kind: Some(kind), severity: None }.matches(&h));
                assert!(Filters { kind: None, severity: Some(severity) }.matches(&h));
                assert!(Filters { kind: Some(kind), severity: Some(severity) }.matches(&h));

                for other in HazardType::ALL.into_iter().filter(|k| *k != kind) {
                    assert!(!Filters { kind: Some(other), severity: None }.matches(&h));
                }
                for other in Severity::ALL.into_iter().filter(|s| *s != severity) {
                    assert!(!Filters { kind: Some(kind), severity: Some(other) }.matches(&h));
                }
            }
        }
    }

    #[test]
    fn test_partial_update_merges() {
        let mut filters = Filters::all();
        assert!(filters.apply(FilterUpdate::kind(Some(HazardType::Debris))));
        assert!(filters.apply(FilterUpdate::severity(Some(Severity::Low))));
        assert_eq!(
            filters,
            Filters {
                kind: Some(HazardType::Debris),
                severity: Some(Severity::Low)
            }
        );

        // no-op update
        assert!(!filters.apply(FilterUpdate::default()));

        assert!(filters.apply(FilterUpdate::kind(None)));
        assert_eq!(filters.kind, None);
        assert_eq!(filters.severity, Some(Severity::Low));
        assert_ne!(filters, Filters::all());
    }
}
