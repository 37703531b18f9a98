pub use board::{HazardBoard, HazardStore, MemoryStore, ReportOutcome, NEARBY_RADIUS_M};
pub use hazard::Hazard;
pub use preview::Preview;
pub use resolver::{Coordinate, ResolveError};

pub mod board;
pub mod geotag;
pub mod hazard;
pub mod preview;
pub mod resolver;

/// Front desk for hazard reports: resolves each photo to a coordinate and
/// files it on the board.
pub struct ReportDesk {
    board: HazardBoard,
}

impl ReportDesk {
    pub fn new() -> ReportDesk {
        ReportDesk {
            board: HazardBoard::new(),
        }
    }

    /// Submits one report. Resolution failures abort before the board is
    /// touched; a resolved report always lands, either as corroboration of
    /// every hazard within range or as a fresh unverified hazard.
    pub fn submit(
        &self,
        image: &[u8],
        description: &str,
        fallback_lat: Option<&str>,
        fallback_lng: Option<&str>,
    ) -> Result<ReportOutcome, ResolveError> {
        let position = resolver::resolve(image, fallback_lat, fallback_lng)?;
        let preview = Preview::render(image);
        Ok(self.board.record(position, description.trim(), preview))
    }

    /// Verified hazards in insertion order, the only projection served to
    /// map clients.
    pub fn verified(&self) -> Vec<Hazard> {
        self.board.verified()
    }
}

impl Default for ReportDesk {
    fn default() -> ReportDesk {
        ReportDesk::new()
    }
}
