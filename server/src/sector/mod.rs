mod sector;
mod snapshot;

pub use sector::Sector;
pub use snapshot::SectorSnapshot;
