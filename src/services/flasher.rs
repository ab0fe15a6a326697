//! Background flash sequences.
//!
//! A flash runs as a detached tokio task: the request handler spawns it and
//! returns straight away. There is no cancellation and no completion signal
//! back to the caller. Overlapping flashes are not rejected or queued; their
//! writes interleave on the shared pin. Once the shared state is shutting
//! down, every flash stops before its next write.

use std::sync::Arc;

use log::{error, info};
use tokio::task::JoinHandle;

use crate::traits::RelayPin;
use crate::{FlashPlan, LampError};

use super::shared::SharedLampState;

/// Run `plan` to completion on the shared lamp.
///
/// Each step writes the pin under the lock, then sleeps with the lock
/// released. Stops at the first failed write, or quietly once
/// [`SharedLampState::shutdown`] has been called.
pub async fn run_flash<P>(state: Arc<SharedLampState<P>>, plan: FlashPlan) -> Result<(), LampError>
where
    P: RelayPin + Send + 'static,
{
    let _active = state.begin_flash();
    info!(
        "flash started: {} flashes over {}s ({:?} per phase)",
        plan.flashes(),
        plan.duration_secs(),
        plan.half_period()
    );

    for step in plan.steps() {
        // Checked under the lock so no step can land after the final `off`
        let written = state.with_lamp(|lamp| {
            if state.is_closing() {
                return Ok(false);
            }
            lamp.set_level(step.level).map(|_| true)
        })?;
        if !written {
            info!("flash stopped for shutdown");
            return Ok(());
        }
        tokio::time::sleep(step.hold).await;
    }

    info!("flash finished");
    Ok(())
}

/// Spawn `plan` as a detached task.
///
/// Callers may drop the handle; it is returned for tests and shutdown code
/// that want to await completion.
pub fn spawn_flash<P>(state: Arc<SharedLampState<P>>, plan: FlashPlan) -> JoinHandle<Result<(), LampError>>
where
    P: RelayPin + Send + 'static,
{
    tokio::spawn(async move {
        let result = run_flash(state, plan).await;
        if let Err(e) = &result {
            error!("flash aborted: {}", e);
        }
        result
    })
}
