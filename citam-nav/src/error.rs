#[derive(thiserror::Error, Debug)]
pub enum RoutingError {
    #[error("no path from {from:?} to {to:?} on floor {floor}")]
    Unreachable {
        from: citam_geom::Point,
        to: citam_geom::Point,
        floor: u32,
    },
    #[error("floor {0} has no navigation graph")]
    UnknownFloor(u32),
}
