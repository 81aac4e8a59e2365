//! Post-login fetches and their per-field outcome.

use serde::Serialize;

use crate::error::Error;

/// Session data fetched once a token is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentField {
    User,
    Menu,
    ContentTypes,
    SavedSearches,
    Localization,
    SearchOperators,
    SearchStandardFields,
}

impl EnrichmentField {
    pub const ALL: [Self; 7] = [
        Self::User,
        Self::Menu,
        Self::ContentTypes,
        Self::SavedSearches,
        Self::Localization,
        Self::SearchOperators,
        Self::SearchStandardFields,
    ];

    /// Endpoint relative to the API base. Only localization uses the
    /// language id.
    #[must_use]
    pub fn endpoint(self, language_id: u8) -> String {
        match self {
            Self::User => "account/current".into(),
            Self::Menu => "user/get-menu-options".into(),
            Self::ContentTypes => "content-type/list".into(),
            Self::SavedSearches => "search/user-saved-list".into(),
            Self::Localization => format!("localization/{language_id}"),
            Self::SearchOperators => "search/get-operators".into(),
            Self::SearchStandardFields => "search/get-standard-fields".into(),
        }
    }
}

impl std::fmt::Display for EnrichmentField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::User => "user",
            Self::Menu => "menu",
            Self::ContentTypes => "content_types",
            Self::SavedSearches => "saved_searches",
            Self::Localization => "localization",
            Self::SearchOperators => "search_operators",
            Self::SearchStandardFields => "search_standard_fields",
        };
        f.write_str(name)
    }
}

/// Result of one enrichment fetch.
#[derive(Debug)]
pub struct EnrichmentOutcome {
    pub field: EnrichmentField,
    pub result: Result<(), Error>,
}

/// Settled results of a whole enrichment batch, in dispatch order.
#[derive(Debug, Default)]
pub struct EnrichmentReport {
    pub outcomes: Vec<EnrichmentOutcome>,
}

impl EnrichmentReport {
    /// True when every fetch stored its data.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (EnrichmentField, &Error)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.field, e)))
    }

    pub fn succeeded(&self) -> impl Iterator<Item = EnrichmentField> + '_ {
        self.outcomes
            .iter()
            .filter(|o| o.result.is_ok())
            .map(|o| o.field)
    }

    #[must_use]
    pub fn outcome(&self, field: EnrichmentField) -> Option<&EnrichmentOutcome> {
        self.outcomes.iter().find(|o| o.field == field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(EnrichmentField::User.endpoint(1), "account/current");
        assert_eq!(EnrichmentField::Localization.endpoint(4), "localization/4");
        assert_eq!(
            EnrichmentField::SearchStandardFields.endpoint(1),
            "search/get-standard-fields"
        );
    }

    #[test]
    fn test_report_partitions_outcomes() {
        let report = EnrichmentReport {
            outcomes: vec![
                EnrichmentOutcome {
                    field: EnrichmentField::User,
                    result: Ok(()),
                },
                EnrichmentOutcome {
                    field: EnrichmentField::Localization,
                    result: Err(Error::Api {
                        status: 500,
                        message: "boom".into(),
                    }),
                },
            ],
        };

        assert!(!report.is_complete());
        assert_eq!(report.succeeded().collect::<Vec<_>>(), vec![EnrichmentField::User]);
        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, EnrichmentField::Localization);
        assert_eq!(failures[0].1.status(), Some(500));
    }
}
