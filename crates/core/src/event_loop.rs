//! Single-threaded readiness loop
//!
//! Waits on three sources at once: socket readiness in the direction the
//! session asks for, the console's next input event, and the idle timer.
//! The timer is re-armed on every iteration, so a poll request only goes
//! out after `poll_interval` without any activity.

use tokio::net::TcpStream;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::config::ClientConfig;
use crate::error::{CoreError, Result};
use crate::session::Session;
use crate::terminal::{Console, InputEvent};
use crate::transport::{Direction, StreamIo};
use crate::types::ChatEvent;

/// Drive the session until input closes or a fatal error occurs
///
/// Returns `Ok(())` once the console reports end of input and every request
/// submitted before that has been sent and answered. A second end of input
/// while those are still pending leaves at once. Non-fatal errors (rejected
/// input) are printed as notices and the loop carries on.
pub async fn run<C>(stream: &TcpStream, console: &mut C, config: &ClientConfig) -> Result<()>
where
    C: Console + ?Sized,
{
    let mut session = Session::new();
    let mut draining = false;
    console.redraw().map_err(CoreError::Terminal)?;

    loop {
        if draining && !session.is_busy() && session.backlog_len() == 0 {
            info!("All requests answered, leaving");
            return Ok(());
        }
        let direction = session.direction();

        tokio::select! {
            ready = stream.ready(direction.interest()) => {
                let ready = ready.map_err(CoreError::Socket)?;
                match direction {
                    Direction::Read if ready.is_readable() || ready.is_read_closed() => {
                        session
                            .on_readable(&mut StreamIo(stream), console)
                            .map_err(log_fatal)?;
                    }
                    Direction::Write if ready.is_writable() => {
                        session.on_writable(&mut StreamIo(stream)).map_err(log_fatal)?;
                    }
                    _ => debug!("Ignoring readiness {:?} while waiting to {:?}", ready, direction),
                }
            }

            input = console.next_input() => {
                match input.map_err(CoreError::Terminal)? {
                    InputEvent::Line(line) => {
                        if let Err(e) = session.submit(&line) {
                            if e.is_fatal() {
                                return Err(log_fatal(e));
                            }
                            console
                                .print(&ChatEvent::notice(e.to_string()))
                                .map_err(CoreError::Terminal)?;
                        }
                    }
                    InputEvent::Edited => {}
                    InputEvent::Closed if draining => {
                        warn!(
                            "Input closed again, abandoning {} queued requests",
                            session.backlog_len()
                        );
                        return Ok(());
                    }
                    InputEvent::Closed => {
                        info!(
                            "Input closed, finishing {} queued requests",
                            session.backlog_len()
                        );
                        draining = true;
                    }
                }
            }

            _ = sleep(config.poll_interval), if !draining => {
                if session.on_idle()? {
                    debug!("Idle for {:?}, polling for new messages", config.poll_interval);
                }
            }
        }
    }
}

fn log_fatal(err: CoreError) -> CoreError {
    error!("{}", err);
    err
}
