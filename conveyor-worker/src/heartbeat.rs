//! Automatic heartbeat loop for activities registered with auto-heartbeat.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use conveyor_service::{RecordActivityTaskHeartbeatRequest, WorkflowService};

/// Spawn a heartbeat task for a running activity.
///
/// Heartbeats are sent at half the heartbeat timeout until the activity
/// completes (`cancel_rx` fires) or the service requests cancellation, in
/// which case the shared `cancelled` flag is raised for the activity to
/// observe.
pub fn start_heartbeat_loop(
    service: Arc<dyn WorkflowService>,
    task_token: String,
    heartbeat_timeout: Duration,
    identity: String,
    details: Arc<Mutex<Option<Vec<u8>>>>,
    cancelled: Arc<AtomicBool>,
    cancel_rx: oneshot::Receiver<()>,
) -> tokio::task::JoinHandle<()> {
    let interval = heartbeat_timeout.mul_f32(0.5);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        let mut cancel_rx = cancel_rx;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let current_details = details.lock().expect("lock poisoned").clone();
                    let request = RecordActivityTaskHeartbeatRequest {
                        task_token: task_token.clone(),
                        details: current_details,
                        identity: identity.clone(),
                    };

                    match service.record_activity_task_heartbeat(request).await {
                        Ok(response) => {
                            if response.cancel_requested {
                                info!(task_token = %task_token, "activity cancellation requested by service");
                                cancelled.store(true, Ordering::Relaxed);
                                break;
                            }
                        }
                        Err(e) => {
                            // Keep heartbeating even if one send fails
                            warn!(task_token = %task_token, error = %e, "heartbeat failed");
                        }
                    }
                }
                _ = &mut cancel_rx => {
                    debug!(task_token = %task_token, "heartbeat loop stopped, activity finished");
                    break;
                }
            }
        }
    })
}
