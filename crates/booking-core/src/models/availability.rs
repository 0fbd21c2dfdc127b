// ABOUTME: Availability constraints that gate the date, time and provider steps
// ABOUTME: Each variant is the resolved answer to one Fingerprint query
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::catalog::{Provider, ProviderId, TimeOfDay};
use super::selection::{Step, StepValue};

/// Resolved constraint for one constrained step
///
/// An empty set is a valid answer: no booked dates means every date is open,
/// no slots or providers means nothing can be chosen at that step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    /// Dates that cannot be chosen
    BookedDates(BTreeSet<NaiveDate>),
    /// Times that can be chosen
    OpenSlots(BTreeSet<TimeOfDay>),
    /// Providers that can be chosen
    Providers(BTreeSet<Provider>),
}

impl Availability {
    /// Step this constraint gates
    #[must_use]
    pub const fn step(&self) -> Step {
        match self {
            Self::BookedDates(_) => Step::Date,
            Self::OpenSlots(_) => Step::Time,
            Self::Providers(_) => Step::Provider,
        }
    }

    /// Whether `value` may be chosen under this constraint
    ///
    /// Values for another step are never allowed. Providers match by id.
    #[must_use]
    pub fn allows(&self, value: &StepValue) -> bool {
        match (self, value) {
            (Self::BookedDates(booked), StepValue::Date(date)) => !booked.contains(date),
            (Self::OpenSlots(slots), StepValue::Time(time)) => slots.contains(time),
            (Self::Providers(providers), StepValue::Provider(provider)) => providers
                .iter()
                .any(|offered| offered.id == provider.id),
            _ => false,
        }
    }

    /// Provider record with the given id, if offered
    #[must_use]
    pub fn provider(&self, id: ProviderId) -> Option<&Provider> {
        match self {
            Self::Providers(providers) => providers.iter().find(|provider| provider.id == id),
            Self::BookedDates(_) | Self::OpenSlots(_) => None,
        }
    }

    /// Number of entries in the underlying set
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::BookedDates(dates) => dates.len(),
            Self::OpenSlots(slots) => slots.len(),
            Self::Providers(providers) => providers.len(),
        }
    }

    /// Whether the underlying set is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether at least one value can be chosen
    ///
    /// A booked-dates constraint always leaves dates open.
    #[must_use]
    pub fn has_options(&self) -> bool {
        match self {
            Self::BookedDates(_) => true,
            Self::OpenSlots(_) | Self::Providers(_) => !self.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booked_dates_exclude() {
        let booked = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let open = NaiveDate::from_ymd_opt(2024, 6, 4).unwrap();
        let availability = Availability::BookedDates(BTreeSet::from([booked]));
        assert!(!availability.allows(&StepValue::Date(booked)));
        assert!(availability.allows(&StepValue::Date(open)));
        assert!(Availability::BookedDates(BTreeSet::new()).has_options());
    }

    #[test]
    fn test_slots_and_providers_include() {
        let nine = TimeOfDay::from_hm(9, 0).unwrap();
        let ten = TimeOfDay::from_hm(10, 0).unwrap();
        let slots = Availability::OpenSlots(BTreeSet::from([nine]));
        assert!(slots.allows(&StepValue::Time(nine)));
        assert!(!slots.allows(&StepValue::Time(ten)));
        assert!(!slots.allows(&StepValue::Provider(Provider::new(1, "Ana"))));

        let providers = Availability::Providers(BTreeSet::from([Provider::new(1, "Ana")]));
        // Matching is by id; a stale display name still selects the provider
        assert!(providers.allows(&StepValue::Provider(Provider::new(1, "Dr. Ana"))));
        assert!(!providers.allows(&StepValue::Provider(Provider::new(2, "Ben"))));
        assert!(!Availability::Providers(BTreeSet::new()).has_options());
    }
}
