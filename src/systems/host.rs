//! Host bridge systems and the host writer thread.
//!
//! - [`host_thread`] runs on its own OS thread and writes every
//!   [`HostCmd`] it receives as one line of JSON.
//! - [`forward_host_cmds`] drains the ECS `HostCmd` messages into the
//!   bridge's channel each tick.
//! - [`update_bevy_host_cmds`] advances the ECS message queue.
//!
//! See also [`crate::resources::host`].

use crate::events::host::HostCmd;
use crate::resources::host::HostBridge;
use bevy_ecs::prelude::{MessageReader, Messages, Res, ResMut};
use crossbeam_channel::Receiver;
use log::{debug, error};
use std::io::{BufWriter, Write};

/// Forward ECS `HostCmd` messages to the host thread.
pub fn forward_host_cmds(bridge: Res<HostBridge>, mut reader: MessageReader<HostCmd>) {
    for cmd in reader.read() {
        // Ignore send errors on shutdown.
        let _ = bridge.tx_cmd.send(cmd.clone());
    }
}

/// Advance the ECS message queue for `HostCmd`.
pub fn update_bevy_host_cmds(mut msgs: ResMut<Messages<HostCmd>>) {
    msgs.update();
}

/// Entry point of the host writer thread.
///
/// Writes commands as JSON lines until [`HostCmd::Shutdown`] arrives or all
/// senders are gone. Output is flushed on every display refresh so a reader
/// on the other end sees whole animation steps. Returns the writer.
pub fn host_thread<W: Write>(rx_cmd: Receiver<HostCmd>, out: W) -> W {
    debug!("host thread starting (id={:?})", std::thread::current().id());
    let mut out = BufWriter::new(out);

    for cmd in rx_cmd.iter() {
        if cmd == HostCmd::Shutdown {
            break;
        }
        let written = serde_json::to_writer(&mut out, &cmd)
            .map_err(std::io::Error::from)
            .and_then(|()| writeln!(out));
        let flushed = match (&written, &cmd) {
            (Ok(()), HostCmd::RefreshDisplay) => out.flush(),
            _ => Ok(()),
        };
        if let Err(e) = written.and(flushed) {
            error!("host output failed: {e}");
            break;
        }
    }

    if let Err(e) = out.flush() {
        error!("host output flush failed: {e}");
    }
    debug!("host thread exiting");
    out.into_parts().0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::bodyregistry::BodyId;
    use crossbeam_channel::unbounded;

    #[test]
    fn test_host_thread_writes_json_lines() {
        let (tx, rx) = unbounded();
        tx.send(HostCmd::SetBodyPosition {
            id: BodyId::new("Center_F"),
            position: [0.0, 0.0, 25.0],
            orientation: [0.0, 0.0, 0.0, 1.0],
        })
        .unwrap();
        tx.send(HostCmd::RefreshDisplay).unwrap();
        tx.send(HostCmd::Shutdown).unwrap();
        tx.send(HostCmd::RefreshDisplay).unwrap();

        let out = host_thread(rx, Vec::new());
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"Center_F\""));
        assert_eq!(lines[1], r#"{"cmd":"refresh_display"}"#);
    }

    #[test]
    fn test_host_thread_stops_when_senders_drop() {
        let (tx, rx) = unbounded();
        tx.send(HostCmd::RefreshDisplay).unwrap();
        drop(tx);
        let out = host_thread(rx, Vec::new());
        assert_eq!(out, b"{\"cmd\":\"refresh_display\"}\n");
    }
}
