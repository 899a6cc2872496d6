//! Builds the movable bodies of the cube.
//!
//! Cubelets sit on the 3×3×3 grid at `{-s, 0, +s}` per axis, where `s` is the
//! cubelet size plus gap. The grid center is the static spider frame, which
//! the host draws on its own and is not a movable body.
//!
//! Each corner optionally carries two leg segments along its body diagonal:
//! an outer segment that moves rigidly with the corner, and an inner segment
//! that can also telescope in and out.

use crate::events::host::HostSink;
use crate::geometry::Point;
use crate::resources::bodyregistry::{
    Body, BodyKind, BodyRegistry, GeometrySpec, Rgb, Telescope,
};
use crate::resources::cubeconfig::{CubeConfig, LegSettings};
use log::info;

pub const CENTER_COLOR: Rgb = Rgb::new(0.9, 0.5, 0.5);
pub const EDGE_COLOR: Rgb = Rgb::new(0.5, 0.9, 0.5);
pub const CORNER_COLOR: Rgb = Rgb::new(0.5, 0.5, 0.9);
pub const INNER_LEG_COLOR: Rgb = Rgb::new(0.9, 0.7, 0.3);

/// How far the fully retracted inner segment starts past the outer one.
const INNER_LEG_SEAT: f64 = 1.0;

/// Face letters of a grid cell, X then Y then Z (`RUF`, `LD`, `B`, ...).
pub fn cell_name(cell: [i32; 3]) -> String {
    let letters = [('R', 'L'), ('U', 'D'), ('F', 'B')];
    cell.iter()
        .zip(letters)
        .filter(|(c, _)| **c != 0)
        .map(|(c, (pos, neg))| if *c > 0 { pos } else { neg })
        .collect()
}

/// Distance from a corner centroid to its outer leg centroid.
pub fn outer_leg_distance(leg: &LegSettings) -> f64 {
    leg.offset + leg.outer_length / 2.0
}

/// Distance from a corner centroid to its inner leg centroid at `extension`.
pub fn inner_leg_distance(leg: &LegSettings, extension: f64) -> f64 {
    leg.offset + INNER_LEG_SEAT + extension + leg.inner_length / 2.0
}

/// Create every movable body in its solved position.
pub fn build_assembly(config: &CubeConfig) -> BodyRegistry {
    let s = config.spacing();
    let mut registry = BodyRegistry::new();

    for x in -1..=1 {
        for y in -1..=1 {
            for z in -1..=1 {
                let cell = [x, y, z];
                let (prefix, kind, color) = match cell.iter().filter(|c| **c != 0).count() {
                    0 => continue,
                    1 => ("Center", BodyKind::Center, CENTER_COLOR),
                    2 => ("Edge", BodyKind::Edge, EDGE_COLOR),
                    _ => ("Corner", BodyKind::Corner, CORNER_COLOR),
                };
                let name = cell_name(cell);
                let position = Point::new(f64::from(x) * s, f64::from(y) * s, f64::from(z) * s);
                registry.insert(Body::new(
                    format!("{prefix}_{name}"),
                    kind,
                    position,
                    GeometrySpec::Box {
                        size: config.cubelet_size,
                    },
                    color,
                ));
                if kind == BodyKind::Corner && config.legs {
                    add_legs(&mut registry, &name, position, &config.leg);
                }
            }
        }
    }

    info!(
        "Assembly built: {} cubelets, {} leg segments",
        registry.cubelet_count(),
        registry.leg_count()
    );
    registry
}

fn add_legs(registry: &mut BodyRegistry, corner: &str, corner_pos: Point, leg: &LegSettings) {
    let dir = corner_pos.coords.normalize();
    let axis: [f64; 3] = dir.into();

    registry.insert(Body::new(
        format!("OuterLeg_{corner}"),
        BodyKind::LegOuter,
        corner_pos + dir * outer_leg_distance(leg),
        GeometrySpec::Cylinder {
            radius: leg.outer_diameter / 2.0,
            length: leg.outer_length,
            axis,
        },
        CORNER_COLOR,
    ));
    registry.insert(
        Body::new(
            format!("InnerLeg_{corner}"),
            BodyKind::LegInner,
            corner_pos + dir * inner_leg_distance(leg, 0.0),
            GeometrySpec::Cylinder {
                radius: leg.inner_diameter / 2.0,
                length: leg.inner_length,
                axis,
            },
            INNER_LEG_COLOR,
        )
        .with_telescope(Telescope::default()),
    );
}

/// Ask the host to create every body in the registry.
pub fn announce_assembly<H: HostSink + ?Sized>(registry: &BodyRegistry, host: &mut H) {
    for body in registry.iter() {
        host.create_body(body);
    }
    host.refresh_display();
}
