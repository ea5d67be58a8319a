//! Validated, read-only view of a [`SolveRequest`].

use std::collections::HashSet;

use crate::{Job, SolveRequest, TravelTimeMatrix, ValidationError, Vehicle};

/// A request whose matrix and jobs have passed validation.
///
/// Fleet and range checks run when the fleet and graph are built from the
/// instance, still ahead of model construction.
#[derive(Debug, Clone, Copy)]
pub struct ProblemInstance<'a> {
    request: &'a SolveRequest,
}

impl<'a> ProblemInstance<'a> {
    /// Validate `request` and borrow it.
    ///
    /// # Examples
    /// ```
    /// use waybill_core::{ProblemInstance, SolveRequest, ValidationError};
    ///
    /// let err = ProblemInstance::new(&SolveRequest::default()).unwrap_err();
    /// assert!(matches!(err, ValidationError::Matrix(_)));
    /// ```
    pub fn new(request: &'a SolveRequest) -> Result<Self, ValidationError> {
        request.matrix.validate()?;
        let mut seen = HashSet::with_capacity(request.jobs.len());
        for job in &request.jobs {
            if job.id.0 == 0 {
                return Err(ValidationError::ZeroJobId);
            }
            if !seen.insert(job.id) {
                return Err(ValidationError::DuplicateJobId { id: job.id });
            }
            if job.delivery.is_empty() {
                return Err(ValidationError::MissingDelivery { id: job.id });
            }
        }
        Ok(Self { request })
    }

    /// Jobs in request order.
    #[must_use]
    pub fn jobs(&self) -> &'a [Job] {
        &self.request.jobs
    }

    /// Vehicles in request order.
    #[must_use]
    pub fn vehicles(&self) -> &'a [Vehicle] {
        &self.request.vehicles
    }

    /// The validated travel-time matrix.
    #[must_use]
    pub fn matrix(&self) -> &'a TravelTimeMatrix {
        &self.request.matrix
    }
}
