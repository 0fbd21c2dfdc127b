// ABOUTME: Booking workflow state machine owning the step, the selection and step constraints
// ABOUTME: Synchronous: it issues fingerprinted queries and applies their results, never awaits
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Booking workflow state machine
//!
//! The machine never performs I/O. Transitions that enter a constrained
//! step return the [`Fingerprint`] of the availability query the caller must
//! run; the result comes back through [`BookingWorkflow::apply_availability`]
//! and is applied only if that fingerprint is still the current one. This is
//! the only cancellation mechanism: superseded queries finish and are
//! dropped on arrival.
//!
//! Every rejected operation returns a [`WorkflowError`] and leaves the
//! machine unchanged.

use std::collections::BTreeMap;

use booking_core::models::{
    Availability, BookingConfirmation, BookingRequest, Fingerprint, PaymentMethod, Selection,
    Step, StepValue,
};
use booking_core::{BookingError, BookingResult, ErrorKind, WorkflowError};
use tracing::debug;

use super::state::{AsyncState, Constraint};

/// Everything needed to create a booking, taken when submission starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionTicket {
    /// Booking creation payload
    pub request: BookingRequest,
    /// Method to open the checkout with
    pub payment_method: PaymentMethod,
}

/// The booking workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingWorkflow {
    step: Step,
    selection: Selection,
    constraints: BTreeMap<Step, Constraint>,
    submission: AsyncState<BookingConfirmation>,
}

impl Default for BookingWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingWorkflow {
    /// Workflow at the `Service` step with an empty selection
    #[must_use]
    pub fn new() -> Self {
        Self {
            step: Step::Service,
            selection: Selection::default(),
            constraints: BTreeMap::new(),
            submission: AsyncState::Idle,
        }
    }

    /// Current step
    #[must_use]
    pub const fn step(&self) -> Step {
        self.step
    }

    /// Choices made so far
    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Constraint held for `step`
    #[must_use]
    pub fn constraint(&self, step: Step) -> Option<&Constraint> {
        self.constraints.get(&step)
    }

    /// Constraint of the current step
    #[must_use]
    pub fn current_constraint(&self) -> Option<&Constraint> {
        self.constraint(self.step)
    }

    /// Resolved availability for `step`
    #[must_use]
    pub fn availability(&self, step: Step) -> Option<&Availability> {
        self.constraint(step).and_then(Constraint::availability)
    }

    /// Steps that currently hold a constraint
    pub fn constrained_steps(&self) -> impl Iterator<Item = Step> + '_ {
        self.constraints.keys().copied()
    }

    /// Submission state
    #[must_use]
    pub const fn submission(&self) -> &AsyncState<BookingConfirmation> {
        &self.submission
    }

    /// Error of the failed submission while at `Failed`
    #[must_use]
    pub fn failure(&self) -> Option<&BookingError> {
        if self.step == Step::Failed {
            self.submission.error()
        } else {
            None
        }
    }

    /// Whether `advance()` would currently succeed
    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.check_advance().is_ok()
    }

    /// Whether the workflow instance is finished
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.step == Step::Success
    }

    /// Record the choice for the current step
    ///
    /// Provider choices are matched by id and stored as the record offered
    /// by the constraint. Changing a value drops the selection and
    /// constraints of every later step.
    ///
    /// # Errors
    ///
    /// Rejects values for another step, values disallowed by the step's
    /// constraint, and choices while the constraint is loading or missing
    pub fn select(&mut self, value: StepValue) -> Result<(), WorkflowError> {
        self.check_interactive()?;
        let step = self.step;
        if value.step() != step {
            return Err(WorkflowError::WrongStep {
                expected: step,
                actual: value.step(),
            });
        }
        if !self.selection.prefix_complete(step) {
            return Err(WorkflowError::PrerequisiteMissing { step });
        }

        let value = if step.is_constrained() {
            let availability = self.loaded_availability(step)?;
            if !availability.allows(&value) {
                return Err(WorkflowError::ValueRejected {
                    step,
                    value: value.to_string(),
                });
            }
            match value {
                StepValue::Provider(provider) => StepValue::Provider(
                    availability
                        .provider(provider.id)
                        .cloned()
                        .unwrap_or(provider),
                ),
                other => other,
            }
        } else {
            value
        };

        debug!(%step, %value, "selection recorded");
        if self.selection.set(value)? {
            self.drop_constraints_after(step);
        }
        Ok(())
    }

    /// Move to the next step
    ///
    /// Returns the fingerprint of the availability query to run when the
    /// new step is constrained. Entering a constrained step always issues a
    /// fresh query.
    ///
    /// # Errors
    ///
    /// Rejects advancing without a (still allowed) selection, while the
    /// step's query is loading, and from `Summary` (use submission instead)
    pub fn advance(&mut self) -> Result<Option<Fingerprint>, WorkflowError> {
        let next = self.check_advance()?;
        self.step = next;
        debug!(step = %next, "advanced");
        Ok(self.issue_query(next))
    }

    /// Move to the previous step
    ///
    /// The selection is kept; constraints for every step after the new
    /// current step are dropped. Returns the fingerprint of a query to run
    /// when the new step is constrained and holds no usable constraint.
    ///
    /// # Errors
    ///
    /// Rejects retreating from `Service`, during or after submission, and
    /// from `Failed` before the failure is acknowledged
    pub fn retreat(&mut self) -> Result<Option<Fingerprint>, WorkflowError> {
        self.check_interactive()?;
        let previous = self.step.previous().ok_or(WorkflowError::NoPreviousStep)?;

        self.drop_constraints_after(previous);
        self.step = previous;
        debug!(step = %previous, "retreated");

        let reusable = match (
            self.constraints.get(&previous),
            self.selection.fingerprint(previous),
        ) {
            (Some(constraint), Some(current)) => {
                constraint.fingerprint == current
                    && matches!(
                        constraint.state,
                        AsyncState::Loading | AsyncState::Ready(_)
                    )
            }
            _ => false,
        };
        if reusable {
            return Ok(None);
        }
        Ok(self.issue_query(previous))
    }

    /// Re-run the query of the current step
    ///
    /// # Errors
    ///
    /// Rejects unconstrained steps and a query that is still loading
    pub fn retry_availability(&mut self) -> Result<Fingerprint, WorkflowError> {
        self.check_interactive()?;
        let step = self.step;
        if self
            .constraints
            .get(&step)
            .is_some_and(|constraint| constraint.state.is_loading())
        {
            return Err(WorkflowError::QueryPending { step });
        }
        self.issue_query(step)
            .ok_or(WorkflowError::ConstraintUnavailable { step })
    }

    /// Apply a query result
    ///
    /// Returns whether it was applied. Results whose fingerprint is not the
    /// current step's fingerprint, or whose query is no longer pending, are
    /// discarded.
    pub fn apply_availability(
        &mut self,
        fingerprint: Fingerprint,
        result: BookingResult<Availability>,
    ) -> bool {
        let step = fingerprint.step();
        let current = self.selection.fingerprint(self.step);
        let Some(constraint) = self.constraints.get_mut(&step) else {
            debug!(%fingerprint, "discarding availability: step has no pending query");
            return false;
        };
        if step != self.step
            || current != Some(fingerprint)
            || constraint.fingerprint != fingerprint
            || !constraint.state.is_loading()
        {
            debug!(%fingerprint, "discarding stale availability");
            return false;
        }
        if let Ok(availability) = &result {
            if availability.step() != step {
                debug!(%fingerprint, "discarding availability for another step");
                return false;
            }
        }

        debug!(%fingerprint, ok = result.is_ok(), "availability applied");
        constraint.state = AsyncState::from(result);
        true
    }

    /// Start submission from `Summary`
    ///
    /// # Errors
    ///
    /// Rejects submission away from `Summary` or with an incomplete selection
    pub fn begin_submit(&mut self) -> Result<SubmissionTicket, WorkflowError> {
        match self.step {
            Step::Summary => {}
            Step::Submitting => return Err(WorkflowError::SubmissionPending),
            Step::Failed => return Err(WorkflowError::AcknowledgeRequired),
            Step::Success => return Err(WorkflowError::Terminal { step: self.step }),
            step => return Err(WorkflowError::NotAtSummary { step }),
        }
        let (Some(request), Some(payment_method)) = (
            self.selection.to_request(),
            self.selection.payment_method(),
        ) else {
            return Err(WorkflowError::PrerequisiteMissing {
                step: Step::Summary,
            });
        };

        self.step = Step::Submitting;
        self.submission = AsyncState::Loading;
        debug!("submission started");
        Ok(SubmissionTicket {
            request,
            payment_method,
        })
    }

    /// Record the outcome of the submission in flight
    ///
    /// Success resets the selection and finishes the workflow. Failure moves
    /// to `Failed`; a taken slot also drops every constraint so they are
    /// fetched again when the user goes back.
    ///
    /// # Errors
    ///
    /// Rejects an outcome when no submission is in flight
    pub fn complete_submit(
        &mut self,
        result: BookingResult<BookingConfirmation>,
    ) -> Result<(), WorkflowError> {
        if self.step != Step::Submitting {
            return Err(WorkflowError::NotSubmitting { step: self.step });
        }
        match result {
            Ok(confirmation) => {
                debug!(booking_id = %confirmation.booking_id, "submission succeeded");
                self.step = Step::Success;
                self.selection = Selection::default();
                self.constraints.clear();
                self.submission = AsyncState::Ready(confirmation);
            }
            Err(error) => {
                debug!(%error, "submission failed");
                if error.kind() == ErrorKind::SlotUnavailable {
                    self.constraints.clear();
                }
                self.step = Step::Failed;
                self.submission = AsyncState::Failed(error);
            }
        }
        Ok(())
    }

    /// Leave `Failed` for `Summary`, keeping the selection
    ///
    /// # Errors
    ///
    /// Rejects acknowledging when nothing failed
    pub fn acknowledge_failure(&mut self) -> Result<(), WorkflowError> {
        if self.step != Step::Failed {
            return Err(WorkflowError::NothingToAcknowledge);
        }
        self.step = Step::Summary;
        self.submission = AsyncState::Idle;
        debug!("failure acknowledged");
        Ok(())
    }

    /// Reject operations outside the selection steps and `Summary`
    fn check_interactive(&self) -> Result<(), WorkflowError> {
        match self.step {
            Step::Submitting => Err(WorkflowError::SubmissionPending),
            Step::Success => Err(WorkflowError::Terminal { step: self.step }),
            Step::Failed => Err(WorkflowError::AcknowledgeRequired),
            _ => Ok(()),
        }
    }

    fn check_advance(&self) -> Result<Step, WorkflowError> {
        self.check_interactive()?;
        let step = self.step;
        if step == Step::Summary {
            return Err(WorkflowError::SubmitRequired);
        }
        if step.is_constrained() {
            let availability = self.loaded_availability(step)?;
            let value = self
                .selection
                .value(step)
                .ok_or(WorkflowError::StepIncomplete { step })?;
            if !availability.allows(&value) {
                return Err(WorkflowError::ValueRejected {
                    step,
                    value: value.to_string(),
                });
            }
        } else if !self.selection.is_set(step) {
            return Err(WorkflowError::StepIncomplete { step });
        }
        step.next().ok_or(WorkflowError::Terminal { step })
    }

    /// Resolved constraint of `step`, or why there is none
    fn loaded_availability(&self, step: Step) -> Result<&Availability, WorkflowError> {
        let current = self.selection.fingerprint(step);
        match self.constraints.get(&step) {
            Some(constraint) if Some(constraint.fingerprint) == current => {
                match &constraint.state {
                    AsyncState::Loading => Err(WorkflowError::QueryPending { step }),
                    AsyncState::Ready(availability) => Ok(availability),
                    AsyncState::Idle | AsyncState::Failed(_) => {
                        Err(WorkflowError::ConstraintUnavailable { step })
                    }
                }
            }
            _ => Err(WorkflowError::ConstraintUnavailable { step }),
        }
    }

    /// Mark a fresh query for `step` as loading; `None` for unconstrained steps
    fn issue_query(&mut self, step: Step) -> Option<Fingerprint> {
        let fingerprint = self.selection.fingerprint(step)?;
        self.constraints
            .insert(step, Constraint::loading(fingerprint));
        debug!(%fingerprint, "availability query issued");
        Some(fingerprint)
    }

    fn drop_constraints_after(&mut self, step: Step) {
        self.constraints.retain(|constrained, _| *constrained <= step);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use booking_core::models::{BookingId, Provider, Service, ServiceId, TimeOfDay};
    use chrono::NaiveDate;

    use super::*;

    fn service() -> Service {
        Service {
            id: ServiceId(1),
            name: "Cleaning".to_owned(),
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn time(hour: u32) -> TimeOfDay {
        TimeOfDay::from_hm(hour, 0).unwrap()
    }

    fn booked(days: &[u32]) -> Availability {
        Availability::BookedDates(days.iter().map(|day| date(*day)).collect())
    }

    fn slots(hours: &[u32]) -> Availability {
        Availability::OpenSlots(hours.iter().map(|hour| time(*hour)).collect())
    }

    fn providers(ids: &[u64]) -> Availability {
        Availability::Providers(
            ids.iter()
                .map(|id| Provider::new(*id, format!("Dr {id}")))
                .collect::<BTreeSet<_>>(),
        )
    }

    /// Advance and answer the issued query
    fn advance_with(workflow: &mut BookingWorkflow, availability: Availability) {
        let query = workflow.advance().unwrap().unwrap();
        assert!(workflow.apply_availability(query, Ok(availability)));
    }

    fn at_summary() -> BookingWorkflow {
        let mut workflow = BookingWorkflow::new();
        workflow.select(StepValue::Service(service())).unwrap();
        advance_with(&mut workflow, booked(&[1]));
        workflow.select(StepValue::Date(date(2))).unwrap();
        advance_with(&mut workflow, slots(&[9, 10]));
        workflow.select(StepValue::Time(time(9))).unwrap();
        advance_with(&mut workflow, providers(&[5]));
        workflow
            .select(StepValue::Provider(Provider::new(5_u64, "")))
            .unwrap();
        assert_eq!(workflow.advance().unwrap(), None);
        workflow
            .select(StepValue::PaymentMethod(PaymentMethod::Gcash))
            .unwrap();
        assert_eq!(workflow.advance().unwrap(), None);
        assert_eq!(workflow.step(), Step::Summary);
        workflow
    }

    #[test]
    fn test_advance_requires_selection() {
        let mut workflow = BookingWorkflow::new();
        assert_eq!(
            workflow.advance(),
            Err(WorkflowError::StepIncomplete {
                step: Step::Service
            })
        );
        assert_eq!(workflow, BookingWorkflow::new());
    }

    #[test]
    fn test_retreat_from_first_step_is_noop() {
        let mut workflow = BookingWorkflow::new();
        assert_eq!(workflow.retreat(), Err(WorkflowError::NoPreviousStep));
        assert_eq!(workflow, BookingWorkflow::new());

        workflow.select(StepValue::Service(service())).unwrap();
        let chosen = workflow.clone();
        assert_eq!(workflow.retreat(), Err(WorkflowError::NoPreviousStep));
        assert_eq!(workflow, chosen);
        assert_eq!(workflow.step(), Step::Service);
    }

    #[test]
    fn test_entering_constrained_step_issues_query() {
        let mut workflow = BookingWorkflow::new();
        workflow.select(StepValue::Service(service())).unwrap();
        let query = workflow.advance().unwrap();
        assert_eq!(
            query,
            Some(Fingerprint::BookedDates {
                service: ServiceId(1)
            })
        );
        assert!(workflow.current_constraint().unwrap().state.is_loading());
        assert_eq!(
            workflow.select(StepValue::Date(date(2))),
            Err(WorkflowError::QueryPending { step: Step::Date })
        );
    }

    #[test]
    fn test_booked_date_is_rejected() {
        let mut workflow = BookingWorkflow::new();
        workflow.select(StepValue::Service(service())).unwrap();
        advance_with(&mut workflow, booked(&[1]));
        assert!(matches!(
            workflow.select(StepValue::Date(date(1))),
            Err(WorkflowError::ValueRejected {
                step: Step::Date,
                ..
            })
        ));
        assert_eq!(workflow.selection().date(), None);
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut workflow = BookingWorkflow::new();
        workflow.select(StepValue::Service(service())).unwrap();
        advance_with(&mut workflow, booked(&[]));
        workflow.select(StepValue::Date(date(2))).unwrap();
        let first = workflow.advance().unwrap().unwrap();

        workflow.retreat().unwrap();
        workflow.select(StepValue::Date(date(3))).unwrap();
        let second = workflow.advance().unwrap().unwrap();
        assert_ne!(first, second);

        assert!(!workflow.apply_availability(first, Ok(slots(&[9]))));
        assert!(workflow.current_constraint().unwrap().state.is_loading());
        assert!(workflow.apply_availability(second, Ok(slots(&[11]))));
        assert_eq!(workflow.availability(Step::Time), Some(&slots(&[11])));
    }

    #[test]
    fn test_changing_upstream_clears_downstream() {
        let mut workflow = at_summary();
        for _ in 0..4 {
            workflow.retreat().unwrap();
        }
        assert_eq!(workflow.step(), Step::Date);
        workflow.select(StepValue::Date(date(3))).unwrap();
        assert_eq!(workflow.selection().time(), None);
        assert_eq!(workflow.selection().provider(), None);
        assert_eq!(workflow.selection().payment_method(), None);
        assert_eq!(workflow.constrained_steps().collect::<Vec<_>>(), [Step::Date]);
    }

    #[test]
    fn test_retreat_reuses_matching_constraint() {
        let mut workflow = BookingWorkflow::new();
        workflow.select(StepValue::Service(service())).unwrap();
        advance_with(&mut workflow, booked(&[]));
        workflow.select(StepValue::Date(date(2))).unwrap();
        advance_with(&mut workflow, slots(&[9]));
        assert_eq!(workflow.retreat().unwrap(), None);
        assert_eq!(workflow.availability(Step::Date), Some(&booked(&[])));
        assert_eq!(workflow.constraint(Step::Time), None);
    }

    #[test]
    fn test_provider_is_stored_as_offered() {
        let mut workflow = BookingWorkflow::new();
        workflow.select(StepValue::Service(service())).unwrap();
        advance_with(&mut workflow, booked(&[]));
        workflow.select(StepValue::Date(date(2))).unwrap();
        advance_with(&mut workflow, slots(&[9]));
        workflow.select(StepValue::Time(time(9))).unwrap();
        advance_with(&mut workflow, providers(&[5, 6]));
        workflow
            .select(StepValue::Provider(Provider::new(6_u64, "")))
            .unwrap();
        assert_eq!(workflow.selection().provider().unwrap().name, "Dr 6");
    }

    #[test]
    fn test_failed_query_blocks_then_retries() {
        let mut workflow = BookingWorkflow::new();
        workflow.select(StepValue::Service(service())).unwrap();
        let query = workflow.advance().unwrap().unwrap();
        assert!(workflow.apply_availability(query, Err(BookingError::network("down"))));
        assert_eq!(
            workflow.select(StepValue::Date(date(2))),
            Err(WorkflowError::ConstraintUnavailable { step: Step::Date })
        );
        assert_eq!(workflow.retry_availability().unwrap(), query);
        assert_eq!(
            workflow.retry_availability(),
            Err(WorkflowError::QueryPending { step: Step::Date })
        );
    }

    #[test]
    fn test_submission_success_resets() {
        let mut workflow = at_summary();
        assert_eq!(workflow.advance(), Err(WorkflowError::SubmitRequired));
        let ticket = workflow.begin_submit().unwrap();
        assert_eq!(ticket.payment_method, PaymentMethod::Gcash);
        assert_eq!(ticket.request.provider_id.0, 5);
        assert_eq!(workflow.retreat(), Err(WorkflowError::SubmissionPending));

        workflow
            .complete_submit(Ok(BookingConfirmation {
                booking_id: BookingId(42),
                message: None,
            }))
            .unwrap();
        assert!(workflow.is_finished());
        assert_eq!(workflow.selection(), &Selection::default());
        assert_eq!(
            workflow.begin_submit(),
            Err(WorkflowError::Terminal {
                step: Step::Success
            })
        );
    }

    #[test]
    fn test_taken_slot_fails_until_acknowledged() {
        let mut workflow = at_summary();
        workflow.begin_submit().unwrap();
        workflow
            .complete_submit(Err(BookingError::SlotUnavailable {
                message: "taken".to_owned(),
            }))
            .unwrap();
        assert_eq!(workflow.step(), Step::Failed);
        assert!(workflow.failure().is_some());
        assert_eq!(workflow.constrained_steps().count(), 0);
        assert_eq!(workflow.retreat(), Err(WorkflowError::AcknowledgeRequired));

        workflow.acknowledge_failure().unwrap();
        assert_eq!(workflow.step(), Step::Summary);
        assert!(workflow.selection().is_complete());
        assert_eq!(
            workflow.acknowledge_failure(),
            Err(WorkflowError::NothingToAcknowledge)
        );
    }

    #[test]
    fn test_complete_without_submission_is_rejected() {
        let mut workflow = at_summary();
        assert_eq!(
            workflow.complete_submit(Err(BookingError::network("late"))),
            Err(WorkflowError::NotSubmitting {
                step: Step::Summary
            })
        );
    }
}
