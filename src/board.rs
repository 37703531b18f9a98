use geo::{Distance, HaversineMeasure, Point};
use parking_lot::Mutex;

use crate::hazard::Hazard;
use crate::preview::Preview;
use crate::resolver::Coordinate;

/// Reports within this great-circle distance of a hazard corroborate it.
pub const NEARBY_RADIUS_M: f64 = 100.0;

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters between two positions.
pub fn distance_m(a: Coordinate, b: Coordinate) -> f64 {
    HaversineMeasure::new(EARTH_RADIUS_M)
        .distance(Point::new(a.lng, a.lat), Point::new(b.lng, b.lat))
}

/// Ordered hazard storage. Entries are appended, never removed, and keep
/// their insertion index as a stable handle.
pub trait HazardStore {
    /// Indices of every stored hazard within `radius_m` of `center`, in
    /// insertion order. All entries are tested; a report may match several
    /// clustered hazards at once.
    fn find_within_radius(&self, center: Coordinate, radius_m: f64) -> Vec<usize>;
    /// Counts one more corroborating report, promoting to verified at two.
    fn corroborate(&mut self, index: usize);
    fn append(&mut self, hazard: Hazard);
    fn get(&self, index: usize) -> &Hazard;
    /// The verified-only projection, in insertion order.
    fn verified(&self) -> Vec<Hazard>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    hazards: Vec<Hazard>,
}

impl HazardStore for MemoryStore {
    fn find_within_radius(&self, center: Coordinate, radius_m: f64) -> Vec<usize> {
        self.hazards
            .iter()
            .enumerate()
            .filter(|(_, hazard)| distance_m(center, hazard.position()) <= radius_m)
            .map(|(index, _)| index)
            .collect()
    }

    fn corroborate(&mut self, index: usize) {
        let hazard = &mut self.hazards[index];
        hazard.reports += 1;
        if hazard.reports >= 2 {
            hazard.verified = true;
        }
    }

    fn append(&mut self, hazard: Hazard) {
        self.hazards.push(hazard);
    }

    fn get(&self, index: usize) -> &Hazard {
        &self.hazards[index]
    }

    fn verified(&self) -> Vec<Hazard> {
        self.hazards
            .iter()
            .filter(|hazard| hazard.verified)
            .cloned()
            .collect()
    }
}

/// What a submission did to the map: the hazard it created or corroborated
/// (the earliest-inserted one when several matched), whether it was newly
/// created, and whether any matched hazard is now verified.
#[derive(Debug, Clone)]
pub struct ReportOutcome {
    pub hazard: Hazard,
    pub created: bool,
    pub verified: bool,
}

/// The hazard map. The whole scan-then-mutate-or-append step for one report
/// runs under a single lock, so concurrent submissions cannot double-insert
/// or double-count each other.
pub struct HazardBoard<S: HazardStore = MemoryStore> {
    store: Mutex<S>,
}

impl HazardBoard<MemoryStore> {
    pub fn new() -> Self {
        HazardBoard::with_store(MemoryStore::default())
    }
}

impl Default for HazardBoard<MemoryStore> {
    fn default() -> Self {
        HazardBoard::new()
    }
}

impl<S: HazardStore> HazardBoard<S> {
    pub fn with_store(store: S) -> Self {
        HazardBoard {
            store: Mutex::new(store),
        }
    }

    /// Files one resolved report: corroborates every hazard within
    /// [`NEARBY_RADIUS_M`], or appends a fresh unverified hazard when
    /// nothing is nearby.
    pub fn record(&self, position: Coordinate, description: &str, preview: Preview) -> ReportOutcome {
        let mut store = self.store.lock();

        let matches = store.find_within_radius(position, NEARBY_RADIUS_M);
        if matches.is_empty() {
            let hazard = Hazard::new(position, description, preview);
            log::info!(
                "new hazard {} at ({}, {})",
                hazard.id,
                hazard.lat,
                hazard.lng
            );
            store.append(hazard.clone());
            return ReportOutcome {
                hazard,
                created: true,
                verified: false,
            };
        }

        for &index in &matches {
            store.corroborate(index);
        }
        let verified = matches.iter().any(|&index| store.get(index).verified);
        let hazard = store.get(matches[0]).clone();
        log::info!(
            "report corroborates {} hazard(s) near ({}, {}), verified: {verified}",
            matches.len(),
            position.lat,
            position.lng
        );
        ReportOutcome {
            hazard,
            created: false,
            verified,
        }
    }

    pub fn verified(&self) -> Vec<Hazard> {
        self.store.lock().verified()
    }
}
