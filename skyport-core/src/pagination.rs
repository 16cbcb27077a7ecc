pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Effective pagination for a flight listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Build from raw query values. Bad input never fails: missing,
    /// non-numeric or below-range values fall back to the defaults and an
    /// oversized page size is clamped to [`MAX_PAGE_SIZE`].
    pub fn from_raw(page: Option<&str>, size: Option<&str>) -> Self {
        let page = match parse(page) {
            Some(p) if p >= 1 => p.min(u32::MAX as i64) as u32,
            _ => DEFAULT_PAGE,
        };
        let size = match parse(size) {
            Some(s) if s > MAX_PAGE_SIZE as i64 => MAX_PAGE_SIZE,
            Some(s) if s >= 1 => s as u32,
            _ => DEFAULT_PAGE_SIZE,
        };

        Self { page, size }
    }
}

fn parse(raw: Option<&str>) -> Option<i64> {
    raw.map(str::trim).and_then(|v| v.parse::<i64>().ok())
}
