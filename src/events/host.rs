//! Commands for the host application that owns the document and display.
//!
//! The geometric core never talks to a CAD document directly. It emits
//! [`HostCmd`] values through a [`HostSink`]: inside the ECS world that is a
//! `MessageWriter<HostCmd>` whose messages are forwarded to the host thread
//! (see [`crate::resources::host`]); outside of it, any sink will do, e.g. a
//! `Vec<HostCmd>` in tests.

use crate::geometry::{Orientation, Point};
use crate::resources::bodyregistry::{Body, BodyId, BodyKind, GeometrySpec, Rgb};
use bevy_ecs::message::Message;
use bevy_ecs::prelude::MessageWriter;
use serde::Serialize;

/// Commands sent *to* the host.
///
/// Orientations are unit quaternions written as `[x, y, z, w]`, the net
/// rotation from the pose the body was created in.
#[derive(Message, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum HostCmd {
    CreateBody {
        id: BodyId,
        kind: BodyKind,
        geometry: GeometrySpec,
        color: Rgb,
        position: [f64; 3],
        orientation: [f64; 4],
    },
    SetBodyPosition {
        id: BodyId,
        position: [f64; 3],
        orientation: [f64; 4],
    },
    RefreshDisplay,
    Shutdown,
}

/// Receiver of host-side effects.
pub trait HostSink {
    fn send(&mut self, cmd: HostCmd);

    fn create_body(&mut self, body: &Body) {
        self.send(HostCmd::CreateBody {
            id: body.id.clone(),
            kind: body.kind,
            geometry: body.geometry,
            color: body.color,
            position: body.position.coords.into(),
            orientation: quaternion_xyzw(&body.orientation),
        });
    }

    fn set_body_position(&mut self, id: &BodyId, position: Point, orientation: &Orientation) {
        self.send(HostCmd::SetBodyPosition {
            id: id.clone(),
            position: position.coords.into(),
            orientation: quaternion_xyzw(orientation),
        });
    }

    fn refresh_display(&mut self) {
        self.send(HostCmd::RefreshDisplay);
    }
}

fn quaternion_xyzw(q: &Orientation) -> [f64; 4] {
    q.coords.into()
}

impl HostSink for Vec<HostCmd> {
    fn send(&mut self, cmd: HostCmd) {
        self.push(cmd);
    }
}

impl HostSink for MessageWriter<'_, HostCmd> {
    fn send(&mut self, cmd: HostCmd) {
        self.write(cmd);
    }
}

/// Discards everything. For headless runs that only need the registry.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHost;

impl HostSink for NullHost {
    fn send(&mut self, _cmd: HostCmd) {}
}
