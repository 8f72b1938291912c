//! The `LotSource` trait and the in-memory implementation.

use parkrace_lot::ParkingLot;

use crate::SourceError;

/// Fetches pages of parking lots from wherever they live.
///
/// # Trait bounds
///
/// - `Send + Sync + 'static` → one source is shared by every room-creation
///   task for the lifetime of the service.
/// - The returned future is `Send` so creation can run on a spawned task.
///
/// # Example
///
/// ```rust
/// use parkrace_lot::{LotCounters, ParkingLot};
/// use parkrace_source::{LotSource, SourceError};
///
/// /// Always returns the same single lot.
/// struct OneLot;
///
/// impl LotSource for OneLot {
///     async fn fetch_lots(
///         &self,
///         _page: u32,
///         _per_page: u32,
///     ) -> Result<Vec<ParkingLot>, SourceError> {
///         let counters = LotCounters::new(1, 0, 1, 0);
///         Ok(vec![ParkingLot::new(1, "Jongno-gu", "300", counters, 2)])
///     }
/// }
/// ```
pub trait LotSource: Send + Sync + 'static {
    /// Returns page `page` (1-based) of up to `per_page` lots, in the
    /// source's stable order.
    fn fetch_lots(
        &self,
        page: u32,
        per_page: u32,
    ) -> impl std::future::Future<Output = Result<Vec<ParkingLot>, SourceError>>
           + Send;
}

// ---------------------------------------------------------------------------
// StaticLotSource
// ---------------------------------------------------------------------------

/// A [`LotSource`] serving a fixed list of lots.
///
/// Pages are 1-based slices of the list; page 0 or a page past the end is
/// empty. Never fails.
#[derive(Debug, Clone, Default)]
pub struct StaticLotSource {
    lots: Vec<ParkingLot>,
}

impl StaticLotSource {
    pub fn new(lots: Vec<ParkingLot>) -> Self {
        Self { lots }
    }

    /// Number of lots across all pages.
    pub fn len(&self) -> usize {
        self.lots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lots.is_empty()
    }

    fn page(&self, page: u32, per_page: u32) -> Vec<ParkingLot> {
        if page == 0 || per_page == 0 {
            return Vec::new();
        }
        let start = (page as usize - 1).saturating_mul(per_page as usize);
        self.lots
            .iter()
            .skip(start)
            .take(per_page as usize)
            .cloned()
            .collect()
    }
}

impl LotSource for StaticLotSource {
    async fn fetch_lots(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<ParkingLot>, SourceError> {
        Ok(self.page(page, per_page))
    }
}
