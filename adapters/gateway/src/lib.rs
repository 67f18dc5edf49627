#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Client side of the external solver.
//!
//! The solver is an opaque HTTP service: it receives the painted grid and
//! answers with the ordered trace of its actions. This crate defines the wire
//! request, the [`SolverGateway`] seam the board surface depends on, and the
//! reqwest-backed [`HttpSolverGateway`].

use std::time::Duration;

use async_trait::async_trait;
use queens_master_core::{Grid, StepSequence};
use serde::Serialize;
use thiserror::Error;

/// Default base address of the solver service.
pub const DEFAULT_SOLVER_URL: &str = "http://localhost:8000";

/// Path of the solve endpoint relative to the base address.
pub const SOLVE_PATH: &str = "/api/solve";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_ERROR_BODY_LEN: usize = 200;

/// Body of a solve request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SolveRequest {
    /// Number of rows in `grid`.
    pub rows: u32,
    /// Number of columns in `grid`.
    pub cols: u32,
    /// Painted board submitted for solving.
    pub grid: Grid,
}

impl SolveRequest {
    /// Builds a request describing the provided grid.
    #[must_use]
    pub fn from_grid(grid: &Grid) -> Self {
        let size = grid.size();
        Self {
            rows: size.rows(),
            cols: size.columns(),
            grid: grid.clone(),
        }
    }
}

/// Failures surfaced by a solver gateway. All of them are recoverable.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request could not be sent or the response could not be read.
    #[error("could not reach the solver: {0}")]
    Transport(#[from] reqwest::Error),
    /// The solver answered with a non-success status.
    #[error("solver answered with status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Start of the response body.
        body: String,
    },
    /// The response body is not a valid step trace.
    #[error("could not decode the solver response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Seam between the board surface and whatever computes solutions.
#[async_trait]
pub trait SolverGateway {
    /// Submits the grid and returns the solver's ordered step trace.
    async fn solve(&self, request: &SolveRequest) -> Result<StepSequence, GatewayError>;
}

/// Decodes a JSON step trace as returned by the solve endpoint.
pub fn decode_steps(body: &str) -> Result<StepSequence, GatewayError> {
    Ok(serde_json::from_str(body)?)
}

/// Gateway that talks to the solver over HTTP.
#[derive(Clone, Debug)]
pub struct HttpSolverGateway {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSolverGateway {
    /// Creates a gateway for the solver hosted at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, GatewayError> {
        let client = reqwest::ClientBuilder::new()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}{SOLVE_PATH}", base_url.trim_end_matches('/')),
        })
    }

    /// Full address of the solve endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SolverGateway for HttpSolverGateway {
    async fn solve(&self, request: &SolveRequest) -> Result<StepSequence, GatewayError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            rows = request.rows,
            cols = request.cols,
            "posting solve request"
        );
        let response = self.client.post(&self.endpoint).json(request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "solver rejected the request");
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let steps = decode_steps(&body)?;
        tracing::debug!(steps = steps.len(), "solver returned a trace");
        Ok(steps)
    }
}

fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY_LEN) {
        Some((cut, _)) => format!("{} ...", &body[..cut]),
        None => body.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_bodies_are_kept_whole() {
        assert_eq!(truncate_body("Internal Server Error"), "Internal Server Error");
    }

    #[test]
    fn long_bodies_are_truncated_on_a_char_boundary() {
        let body = "é".repeat(MAX_ERROR_BODY_LEN + 10);
        let truncated = truncate_body(&body);
        assert!(truncated.ends_with(" ..."));
        assert_eq!(truncated.chars().count(), MAX_ERROR_BODY_LEN + 4);
    }
}
